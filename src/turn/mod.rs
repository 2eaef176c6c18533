//! Turn flow: the state machine that drives a round.
//!
//! ## Key Types
//!
//! - `TurnPhase`: Where the round is (deal, discard, claim, draw, terminal)
//! - `Scheduler`: Holds the single pending automatic transition
//! - `TurnController`: Applies commands and transitions to `GameState`
//! - `Snapshot` / `Notification`: Output for the presentation layer
//!
//! ## Pacing
//!
//! Automatic steps are never run inline. They are scheduled with a delay
//! and run when the host calls `fire`. Delays carry no game meaning; a host
//! that ignores them (or uses `Pacing::instant`) sees the same game.

pub mod controller;
pub mod phase;
pub mod scheduler;
pub mod snapshot;

pub use controller::TurnController;
pub use phase::TurnPhase;
pub use scheduler::{PendingTransition, Scheduler, Step};
pub use snapshot::{ActionFlags, Modal, Notification, SeatView, Snapshot};
