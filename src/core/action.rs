//! Commands from the presentation layer and the recorded action history.
//!
//! Commands are human-seat intents. The engine either applies a command or
//! ignores it; ignoring never mutates state. Every accepted command and
//! automatic transition is recorded as an `ActionRecord`.

use serde::{Deserialize, Serialize};

use super::seat::Seat;
use crate::claims::ClaimKind;
use crate::tiles::{Tile, TileFace};

/// Intent accepted from the presentation layer.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Command {
    /// Start a new round. Valid when idle or after a round ends.
    StartGame,
    /// Select a concealed tile; selecting the same index again discards it.
    Select(usize),
    DeclareHu,
    DeclarePeng,
    DeclareChi,
    /// Claim a quad from a discard, or meld a concealed quad on your turn.
    DeclareGang,
    /// Decline the current claim offer.
    Pass,
    /// Cosmetic reorder of the human hand.
    SortHand,
    /// Close the end-of-round modal.
    DismissModal,
    /// Abandon the round, cancel any pending transition, return to idle.
    Reset,
}

/// Why a command had no effect.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum IgnoreReason {
    /// An automatic transition is still scheduled.
    TransitionPending,
    /// A round is already running.
    RoundInProgress,
    /// The table has no human seat.
    NoHumanSeat,
    /// It is not the human seat's discard turn.
    NotYourTurn,
    /// The concealed index does not exist.
    InvalidIndex,
    /// The matching eligibility flag is not set.
    NotEligible,
}

impl std::fmt::Display for IgnoreReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let text = match self {
            IgnoreReason::TransitionPending => "a transition is pending",
            IgnoreReason::RoundInProgress => "a round is in progress",
            IgnoreReason::NoHumanSeat => "no human seat",
            IgnoreReason::NotYourTurn => "not the human seat's turn",
            IgnoreReason::InvalidIndex => "no tile at that index",
            IgnoreReason::NotEligible => "action not available",
        };
        f.write_str(text)
    }
}

/// Result of handing a command to the engine.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum CommandOutcome {
    Accepted,
    Ignored(IgnoreReason),
}

impl CommandOutcome {
    #[must_use]
    pub fn is_accepted(self) -> bool {
        matches!(self, CommandOutcome::Accepted)
    }
}

/// What happened, for the history log.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum RecordedAction {
    Deal { dealer: Seat },
    FlowerReplaced { count: usize },
    Draw,
    Discard(Tile),
    Claim { kind: ClaimKind, tile: Tile },
    SelfGang(TileFace),
    Win { self_drawn: bool },
    WallExhausted,
}

/// A recorded action with ordering metadata.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActionRecord {
    /// The seat that acted.
    pub seat: Seat,

    /// The action taken.
    pub action: RecordedAction,

    /// Turn number (incremented on every discard).
    pub turn: u32,

    /// Global sequence number.
    pub sequence: u32,
}

impl ActionRecord {
    /// Create a new action record.
    #[must_use]
    pub fn new(seat: Seat, action: RecordedAction, turn: u32, sequence: u32) -> Self {
        Self {
            seat,
            action,
            turn,
            sequence,
        }
    }
}
