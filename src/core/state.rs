//! Game state: the single mutable root of a round.
//!
//! ## GameState
//!
//! Owns everything that changes during a round:
//! - The wall and the four players (hands, melds, flowers, scores)
//! - Current seat, dealer, prevailing wind, and turn phase
//! - The discard pile and the last discard
//! - The open claim window and per-seat eligibility flags
//! - Action history and the RNG
//!
//! Components read it by reference; only the turn controller mutates it.
//! Uses `im` persistent vectors so snapshots and clones are O(1).

use im::Vector;

use super::action::{ActionRecord, RecordedAction};
use super::config::EngineConfig;
use super::error::{EngineError, EngineResult};
use super::player::Player;
use super::rng::GameRng;
use super::seat::{Seat, SeatMap};
use crate::claims::{ClaimOptions, ClaimWindow, Discard};
use crate::tiles::{Tile, Wall, Wind, TILE_COUNT};
use crate::turn::TurnPhase;

/// Complete state of one round.
#[derive(Clone, Debug)]
pub struct GameState {
    /// Undrawn tiles.
    pub wall: Wall,

    /// Players by seat.
    pub players: SeatMap<Player>,

    /// Seat whose turn it is.
    pub current_seat: Seat,

    pub dealer_seat: Seat,

    pub round_wind: Wind,

    /// Where the round is in the turn state machine.
    pub phase: TurnPhase,

    /// Every discard still on the table, oldest first.
    pub discard_pile: Vector<Tile>,

    /// The most recent discard while it can still be claimed.
    pub last_discard: Option<Discard>,

    /// The open claim window, if any.
    pub claim_window: Option<ClaimWindow>,

    /// Transient eligibility flags, cleared whenever the window or turn moves on.
    pub eligibility: SeatMap<ClaimOptions>,

    /// Turn number (incremented on every discard, starts at 1).
    pub turn_number: u32,

    /// Next history sequence number.
    pub action_sequence: u32,

    /// Everything that has happened this round.
    pub history: Vector<ActionRecord>,

    /// Deterministic RNG for the shuffle and AI choices.
    pub rng: GameRng,
}

impl GameState {
    /// Create an idle state with empty hands and an empty wall.
    #[must_use]
    pub fn new(config: &EngineConfig, rng: GameRng) -> Self {
        Self {
            wall: Wall::default(),
            players: SeatMap::new(|seat| {
                Player::new(
                    config.player_names[seat.index()].clone(),
                    seat,
                    config.is_human(seat),
                )
            }),
            current_seat: config.dealer_seat,
            dealer_seat: config.dealer_seat,
            round_wind: config.round_wind,
            phase: TurnPhase::Idle,
            discard_pile: Vector::new(),
            last_discard: None,
            claim_window: None,
            eligibility: SeatMap::default(),
            turn_number: 1,
            action_sequence: 0,
            history: Vector::new(),
            rng,
        }
    }

    // === Counting ===

    /// Tiles held by all seats (concealed, melded and flowers).
    #[must_use]
    pub fn tiles_in_hands(&self) -> usize {
        self.players.values().map(|p| p.hand.physical_len()).sum()
    }

    /// Wall + hands + melds + flowers + discard pile.
    #[must_use]
    pub fn total_tiles(&self) -> usize {
        self.wall.len() + self.tiles_in_hands() + self.discard_pile.len()
    }

    // === Eligibility ===

    /// Clear every seat's eligibility flags.
    pub fn clear_eligibility(&mut self) {
        self.eligibility = SeatMap::default();
    }

    // === History ===

    /// Record an action in history.
    pub fn record(&mut self, seat: Seat, action: RecordedAction) {
        let sequence = self.action_sequence;
        self.action_sequence += 1;
        self.history
            .push_back(ActionRecord::new(seat, action, self.turn_number, sequence));
    }

    // === Invariants ===

    /// Check tile conservation and hand sizes.
    ///
    /// Conservation holds once tiles have been dealt. Effective hand sizes
    /// must be 13 or 14, except after the wall ran dry mid-replacement.
    pub fn check_invariants(&self) -> EngineResult<()> {
        if matches!(self.phase, TurnPhase::Idle) {
            return Ok(());
        }

        let total = self.total_tiles();
        if total != TILE_COUNT {
            return Err(EngineError::TileConservation {
                expected: TILE_COUNT,
                found: total,
            });
        }

        if matches!(self.phase, TurnPhase::RoundDrawn) {
            return Ok(());
        }
        for (seat, player) in self.players.iter() {
            let size = player.hand.effective_len();
            if !(13..=14).contains(&size) {
                return Err(EngineError::HandSize { seat, size });
            }
        }
        Ok(())
    }
}
