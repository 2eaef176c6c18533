//! Read-only output for the presentation layer.
//!
//! ## Snapshot
//!
//! Everything a display needs, captured by value so the host never holds a
//! reference into `GameState`. Only the human seat's concealed tiles are
//! revealed; other seats show a count.
//!
//! ## Notification
//!
//! Discrete events queued by the controller as they happen, drained by the
//! host with `TurnController::drain_notifications`.

use serde::{Deserialize, Serialize};

use super::phase::TurnPhase;
use crate::claims::{ClaimKind, ClaimOptions, Discard};
use crate::core::{GameState, Seat};
use crate::tiles::{Meld, Tile, TileFace, Wind};

/// Which human actions are currently offerable.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActionFlags {
    pub hu: bool,
    pub peng: bool,
    pub chi: bool,
    pub gang: bool,
}

impl From<ClaimOptions> for ActionFlags {
    fn from(options: ClaimOptions) -> Self {
        Self {
            hu: options.hu,
            peng: options.peng,
            chi: options.chi,
            gang: options.gang,
        }
    }
}

impl ActionFlags {
    #[must_use]
    pub fn any(self) -> bool {
        self.hu || self.peng || self.chi || self.gang
    }
}

/// End-of-round dialog.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Modal {
    pub title: String,
    pub message: String,
}

/// Public view of one seat.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeatView {
    pub seat: Seat,
    pub name: String,
    /// Concealed tiles held (visible as backs).
    pub concealed_count: usize,
    pub melds: Vec<Meld>,
    pub flowers: Vec<Tile>,
    pub score: i64,
    pub is_human: bool,
    pub has_won: bool,
}

/// Display state captured at one instant.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Snapshot {
    pub phase: TurnPhase,
    /// Seats in seat order.
    pub seats: Vec<SeatView>,
    /// The human seat's concealed tiles in display order; empty without one.
    pub human_hand: Vec<Tile>,
    pub human_seat: Option<Seat>,
    /// Discards still on the table, oldest first.
    pub discard_pile: Vec<Tile>,
    pub last_discard: Option<Discard>,
    pub current_seat: Seat,
    pub dealer_seat: Seat,
    pub round_wind: Wind,
    pub wall_remaining: usize,
    pub turn_number: u32,
    pub flags: ActionFlags,
    /// Concealed index selected for discard.
    pub selected: Option<usize>,
    /// Free-text status line.
    pub status: String,
    pub modal: Option<Modal>,
    /// An automatic transition is scheduled; commands other than reset and
    /// modal dismissal are ignored until it runs.
    pub transition_pending: bool,
}

impl Snapshot {
    /// Capture `state` as seen from `human_seat`.
    #[must_use]
    pub fn capture(
        state: &GameState,
        human_seat: Option<Seat>,
        selected: Option<usize>,
        status: &str,
        modal: Option<&Modal>,
        transition_pending: bool,
    ) -> Self {
        let seats = state
            .players
            .iter()
            .map(|(seat, player)| SeatView {
                seat,
                name: player.name.clone(),
                concealed_count: player.hand.len(),
                melds: player.hand.melds().to_vec(),
                flowers: player.hand.flowers().to_vec(),
                score: player.score,
                is_human: player.is_human,
                has_won: player.has_won,
            })
            .collect();

        let (human_hand, flags) = match human_seat {
            Some(seat) => (
                state.players[seat].hand.concealed().to_vec(),
                ActionFlags::from(state.eligibility[seat]),
            ),
            None => (Vec::new(), ActionFlags::default()),
        };

        Self {
            phase: state.phase,
            seats,
            human_hand,
            human_seat,
            discard_pile: state.discard_pile.iter().copied().collect(),
            last_discard: state.last_discard,
            current_seat: state.current_seat,
            dealer_seat: state.dealer_seat,
            round_wind: state.round_wind,
            wall_remaining: state.wall.len(),
            turn_number: state.turn_number,
            flags,
            selected,
            status: status.to_string(),
            modal: modal.cloned(),
            transition_pending,
        }
    }

    /// View of `seat`.
    #[must_use]
    pub fn seat(&self, seat: Seat) -> &SeatView {
        &self.seats[seat.index()]
    }
}

/// Something that just happened at the table.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Notification {
    GameStarted { dealer: Seat },
    Dealt { wall_remaining: usize },
    FlowerReplaced { seat: Seat, count: usize },
    /// `tile` is only revealed for the human seat's own draws.
    Drew { seat: Seat, tile: Option<Tile> },
    Discarded { seat: Seat, tile: Tile },
    /// The human seat may claim the current discard.
    ClaimOffered { seat: Seat, options: ClaimOptions },
    Claimed { seat: Seat, kind: ClaimKind, tile: Tile },
    SelfGang { seat: Seat, face: TileFace },
    Won { seat: Seat, self_drawn: bool, score: i64 },
    WallExhausted,
}
