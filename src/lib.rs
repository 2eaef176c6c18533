//! # mahjong-engine
//!
//! Rule engine and turn-flow state machine for four-player mahjong.
//!
//! ## Design Principles
//!
//! 1. **One Mutable Root**: `GameState` owns the wall, hands, discards and
//!    claim state. Only `TurnController` mutates it; the evaluator and the
//!    claim resolver read it.
//!
//! 2. **Commands In, Snapshots Out**: A presentation layer sends `Command`s
//!    and reads `Snapshot`s and `Notification`s. Invalid commands are
//!    ignored, never raised.
//!
//! 3. **Deterministic**: All randomness flows through a seeded `GameRng`,
//!    so a seed fully reproduces a round.
//!
//! ## Architecture
//!
//! - **Single In-Flight Transition**: Automatic steps are scheduled with a
//!   pacing delay and fired by the host. At most one is pending; a reset
//!   cancels it.
//!
//! - **Persistent Data Structures**: The wall, discard pile and history use
//!   `im` vectors so `GameState` clones in O(1).
//!
//! ## Modules
//!
//! - `core`: Seats, players, state, commands, RNG, configuration, errors
//! - `tiles`: Tiles, the wall, hands and melds
//! - `rules`: Winning-hand detection and meld eligibility
//! - `claims`: Arbitration of claims on a discard
//! - `ai`: Policies for computer-controlled seats
//! - `turn`: The turn controller, scheduler and presentation output

pub mod ai;
pub mod claims;
pub mod core;
pub mod rules;
pub mod tiles;
pub mod turn;

// Re-export commonly used types
pub use crate::core::{
    ActionRecord, Command, CommandOutcome, EngineConfig, EngineError, EngineResult, GameRng,
    GameState, IgnoreReason, Pacing, Player, RecordedAction, Seat, SeatMap, SEAT_COUNT,
};

pub use crate::tiles::{Hand, Meld, MeldKind, Tile, TileFace, TileId, TileKind, Wall, Wind, TILE_COUNT};

pub use crate::rules::HandEvaluator;

pub use crate::claims::{Claim, ClaimClass, ClaimKind, ClaimOptions, ClaimResolver, ClaimWindow, Discard};

pub use crate::ai::{CountingStrategy, SeatStrategy};

pub use crate::turn::{
    ActionFlags, Modal, Notification, Scheduler, Snapshot, Step, TurnController, TurnPhase,
};
