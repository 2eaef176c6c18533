//! Decision policies for computer-controlled seats.
//!
//! Policies are trait-based so hosts and tests can swap them:
//! - `choose_discard`: which concealed tile to throw
//! - `decide_claim`: whether to take an offered claim
//! - `declare_self_win`: whether to declare a self-drawn win

use rustc_hash::FxHashMap;

use crate::claims::{ClaimKind, ClaimOptions};
use crate::core::{GameRng, Seat};
use crate::tiles::{Hand, TileFace};

// =============================================================================
// Seat Strategy
// =============================================================================

/// Policy for a non-human seat.
pub trait SeatStrategy: Send + Sync {
    /// Index into `hand.concealed()` of the tile to discard.
    ///
    /// The hand is never empty when this is called.
    fn choose_discard(&self, seat: Seat, hand: &Hand, rng: &mut GameRng) -> usize;

    /// Claim to take from `options`, or `None` to decline.
    fn decide_claim(&self, seat: Seat, options: ClaimOptions, rng: &mut GameRng) -> Option<ClaimKind>;

    /// Declare a self-drawn win when the hand is complete.
    fn declare_self_win(&self, _seat: Seat, _hand: &Hand) -> bool {
        true
    }
}

/// Default policy: discard from the rarest face, always take hu, take
/// peng/gang with a fixed probability, never chi.
#[derive(Clone, Debug)]
pub struct CountingStrategy {
    /// Probability of accepting an available peng or gang.
    pub claim_probability: f64,
}

impl Default for CountingStrategy {
    fn default() -> Self {
        Self {
            claim_probability: 0.5,
        }
    }
}

impl CountingStrategy {
    /// Create a strategy with the given peng/gang acceptance probability.
    #[must_use]
    pub fn new(claim_probability: f64) -> Self {
        Self { claim_probability }
    }
}

impl SeatStrategy for CountingStrategy {
    fn choose_discard(&self, _seat: Seat, hand: &Hand, rng: &mut GameRng) -> usize {
        let tiles = hand.concealed();
        let mut counts: FxHashMap<TileFace, usize> = FxHashMap::default();
        for tile in tiles {
            *counts.entry(tile.face).or_default() += 1;
        }

        let Some(&fewest) = counts.values().min() else {
            return 0;
        };
        let mut rarest: Vec<TileFace> = counts
            .iter()
            .filter(|&(_, &count)| count == fewest)
            .map(|(&face, _)| face)
            .collect();
        // Map iteration order is arbitrary; sort so the seed alone decides.
        rarest.sort_unstable();

        rng.choose(&rarest)
            .and_then(|&face| tiles.iter().position(|t| t.matches(face)))
            .unwrap_or(0)
    }

    fn decide_claim(&self, _seat: Seat, options: ClaimOptions, rng: &mut GameRng) -> Option<ClaimKind> {
        if options.hu {
            return Some(ClaimKind::Hu);
        }
        if options.gang || options.peng {
            if !rng.gen_bool(self.claim_probability) {
                return None;
            }
            return Some(if options.gang { ClaimKind::Gang } else { ClaimKind::Peng });
        }
        None
    }
}
