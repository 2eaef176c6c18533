//! Engine configuration.
//!
//! A host configures the engine once with `EngineConfig`:
//! - Which seat (if any) is driven by a human
//! - Dealer, prevailing wind, and seat names
//! - RNG seed for the shuffle and AI choices
//! - AI claim acceptance and the flat win score
//! - `Pacing`: delays inserted between automatic transitions

use serde::{Deserialize, Serialize};

use super::error::{EngineError, EngineResult};
use super::seat::{Seat, SEAT_COUNT};
use crate::tiles::Wind;

/// Delays (milliseconds) between automatic transitions.
///
/// Delays exist only so a presentation layer can show each step. They never
/// change game logic; `Pacing::instant()` collapses them all to zero.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pacing {
    /// Per dealt tile.
    pub deal_ms: u64,
    /// Before a seat draws.
    pub draw_ms: u64,
    /// AI "thinking" before a discard.
    pub think_ms: u64,
    /// Before claims are processed or applied.
    pub claim_ms: u64,
}

impl Default for Pacing {
    fn default() -> Self {
        Self {
            deal_ms: 50,
            draw_ms: 500,
            think_ms: 1000,
            claim_ms: 500,
        }
    }
}

impl Pacing {
    /// No delays. Useful for tests and simulation.
    #[must_use]
    pub const fn instant() -> Self {
        Self {
            deal_ms: 0,
            draw_ms: 0,
            think_ms: 0,
            claim_ms: 0,
        }
    }
}

/// Complete engine configuration.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Seed for the wall shuffle and AI randomness.
    pub seed: u64,

    /// Seat controlled by the presentation layer. `None` for all-AI play.
    pub human_seat: Option<Seat>,

    /// Seat that receives the 14th tile and discards first.
    pub dealer_seat: Seat,

    /// Prevailing wind of the round.
    pub round_wind: Wind,

    /// Display names, indexed by seat.
    pub player_names: [String; SEAT_COUNT],

    /// Points awarded to the winner (flat placeholder scoring).
    pub win_score: i64,

    /// Probability that an AI seat accepts an available peng or gang.
    pub ai_claim_probability: f64,

    /// Delays between automatic transitions.
    pub pacing: Pacing,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            seed: 42,
            human_seat: Some(Seat::new(0)),
            dealer_seat: Seat::new(0),
            round_wind: Wind::East,
            player_names: [
                "Player".to_string(),
                "Bot 1".to_string(),
                "Bot 2".to_string(),
                "Bot 3".to_string(),
            ],
            win_score: 100,
            ai_claim_probability: 0.5,
            pacing: Pacing::default(),
        }
    }
}

impl EngineConfig {
    /// Set the RNG seed.
    #[must_use]
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// Set (or clear) the human seat.
    #[must_use]
    pub fn with_human_seat(mut self, seat: Option<Seat>) -> Self {
        self.human_seat = seat;
        self
    }

    /// Set the dealer.
    #[must_use]
    pub fn with_dealer(mut self, seat: Seat) -> Self {
        self.dealer_seat = seat;
        self
    }

    /// Set the prevailing wind.
    #[must_use]
    pub fn with_round_wind(mut self, wind: Wind) -> Self {
        self.round_wind = wind;
        self
    }

    /// Set the AI peng/gang acceptance probability.
    #[must_use]
    pub fn with_ai_claim_probability(mut self, probability: f64) -> Self {
        self.ai_claim_probability = probability;
        self
    }

    /// Set pacing.
    #[must_use]
    pub fn with_pacing(mut self, pacing: Pacing) -> Self {
        self.pacing = pacing;
        self
    }

    /// All-AI table with no delays, for simulation.
    #[must_use]
    pub fn simulation(seed: u64) -> Self {
        Self::default()
            .with_seed(seed)
            .with_human_seat(None)
            .with_pacing(Pacing::instant())
    }

    /// Is `seat` the human seat?
    #[must_use]
    pub fn is_human(&self, seat: Seat) -> bool {
        self.human_seat == Some(seat)
    }

    /// Reject configurations the engine cannot run.
    pub fn validate(&self) -> EngineResult<()> {
        if !(0.0..=1.0).contains(&self.ai_claim_probability) {
            return Err(EngineError::InvalidConfig(format!(
                "ai_claim_probability {} is outside 0..=1",
                self.ai_claim_probability
            )));
        }
        if self.win_score < 0 {
            return Err(EngineError::InvalidConfig(format!(
                "win_score {} is negative",
                self.win_score
            )));
        }
        if let Some(seat) = self.player_names.iter().position(|n| n.trim().is_empty()) {
            return Err(EngineError::InvalidConfig(format!("seat {seat} has an empty name")));
        }
        for seat in [Some(self.dealer_seat), self.human_seat].into_iter().flatten() {
            if seat.index() >= SEAT_COUNT {
                return Err(EngineError::InvalidConfig(format!("{seat} does not exist")));
            }
        }
        Ok(())
    }
}
