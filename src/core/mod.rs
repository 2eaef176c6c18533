//! Core engine types: seats, players, state, commands, RNG, configuration.
//!
//! This module contains the building blocks every other module shares.
//! `GameState` is the single mutable root; everything else reads it.

pub mod action;
pub mod config;
pub mod error;
pub mod player;
pub mod rng;
pub mod seat;
pub mod state;

pub use action::{ActionRecord, Command, CommandOutcome, IgnoreReason, RecordedAction};
pub use config::{EngineConfig, Pacing};
pub use error::{EngineError, EngineResult};
pub use player::Player;
pub use rng::GameRng;
pub use seat::{Seat, SeatMap, SEAT_COUNT};
pub use state::GameState;
