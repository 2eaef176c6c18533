//! Turn-flow states.

use serde::{Deserialize, Serialize};

use crate::claims::Claim;
use crate::core::Seat;
use crate::tiles::Tile;

/// Where a round is in the turn state machine.
///
/// ```text
/// Idle → Dealing → AwaitingDiscard(s) → AwaitingClaim → ResolvingClaim → AwaitingDiscard(claimant)
///                        ↑                    ↓
///                        └── AwaitingDraw(s') ┘
/// ```
///
/// `RoundWonBy` and `RoundDrawn` are terminal.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum TurnPhase {
    /// No round in progress.
    #[default]
    Idle,
    /// Tiles dealt and flowers replaced; waiting for the deal to finish.
    Dealing,
    /// `seat` holds 14 effective tiles and must discard.
    AwaitingDiscard(Seat),
    /// A discard is on the table and may be claimed.
    AwaitingClaim { tile: Tile, discarder: Seat },
    /// A claim has been chosen and is being applied.
    ResolvingClaim(Claim),
    /// Nobody claimed; `seat` draws next.
    AwaitingDraw(Seat),
    /// Terminal: `seat` completed a winning hand.
    RoundWonBy(Seat),
    /// Terminal: the wall ran out.
    RoundDrawn,
}

impl TurnPhase {
    /// True for `RoundWonBy` and `RoundDrawn`.
    #[must_use]
    pub const fn is_terminal(self) -> bool {
        matches!(self, TurnPhase::RoundWonBy(_) | TurnPhase::RoundDrawn)
    }

    /// True when a new round may be started.
    #[must_use]
    pub const fn accepts_start(self) -> bool {
        matches!(self, TurnPhase::Idle) || self.is_terminal()
    }

    /// Seat that must act next, if the phase names one.
    #[must_use]
    pub const fn active_seat(self) -> Option<Seat> {
        match self {
            TurnPhase::AwaitingDiscard(seat)
            | TurnPhase::AwaitingDraw(seat)
            | TurnPhase::RoundWonBy(seat) => Some(seat),
            TurnPhase::ResolvingClaim(claim) => Some(claim.seat),
            _ => None,
        }
    }
}

impl std::fmt::Display for TurnPhase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TurnPhase::Idle => write!(f, "idle"),
            TurnPhase::Dealing => write!(f, "dealing"),
            TurnPhase::AwaitingDiscard(seat) => write!(f, "awaiting discard from {seat}"),
            TurnPhase::AwaitingClaim { tile, discarder } => {
                write!(f, "awaiting claims on {tile} from {discarder}")
            }
            TurnPhase::ResolvingClaim(claim) => write!(f, "resolving {} by {}", claim.kind, claim.seat),
            TurnPhase::AwaitingDraw(seat) => write!(f, "awaiting draw by {seat}"),
            TurnPhase::RoundWonBy(seat) => write!(f, "won by {seat}"),
            TurnPhase::RoundDrawn => write!(f, "drawn"),
        }
    }
}
