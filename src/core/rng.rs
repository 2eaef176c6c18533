//! Deterministic random number generation for shuffles and AI choices.
//!
//! ## Key Features
//!
//! - **Deterministic**: Same seed produces the identical wall and AI play
//! - **Forkable**: Each restart draws a fresh but reproducible stream
//!
//! ```
//! use mahjong_engine::core::GameRng;
//!
//! let mut rng = GameRng::new(42);
//! let mut next_round = rng.fork();
//!
//! // Forks are deterministic: the same fork counter gives the same seed
//! let mut rng2 = GameRng::new(42);
//! assert_eq!(next_round.below(1000), rng2.fork().below(1000));
//! ```

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

/// Deterministic RNG injected into the wall shuffle and the AI policy.
///
/// Uses ChaCha8 for speed while keeping a uniform distribution, which the
/// Fisher–Yates shuffle relies on.
#[derive(Clone, Debug)]
pub struct GameRng {
    inner: ChaCha8Rng,
    seed: u64,
    fork_counter: u64,
}

impl GameRng {
    /// Create a new RNG with the given seed.
    #[must_use]
    pub fn new(seed: u64) -> Self {
        Self {
            inner: ChaCha8Rng::seed_from_u64(seed),
            seed,
            fork_counter: 0,
        }
    }

    /// Fork this RNG to create an independent stream.
    ///
    /// Used when a game is restarted so the next wall differs from the
    /// previous one while staying reproducible from the original seed.
    #[must_use]
    pub fn fork(&mut self) -> Self {
        self.fork_counter += 1;
        let fork_seed = self.seed.wrapping_add(self.fork_counter.wrapping_mul(0x9E3779B97F4A7C15));
        Self {
            inner: ChaCha8Rng::seed_from_u64(fork_seed),
            seed: fork_seed,
            fork_counter: 0,
        }
    }

    /// Seed this stream was created from.
    #[must_use]
    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// Uniform integer in `0..upper`.
    ///
    /// Panics if `upper` is zero.
    pub fn below(&mut self, upper: usize) -> usize {
        self.inner.gen_range(0..upper)
    }

    /// Generate a random boolean with given probability of true.
    pub fn gen_bool(&mut self, probability: f64) -> bool {
        self.inner.gen_bool(probability.clamp(0.0, 1.0))
    }

    /// Choose a random element from a slice.
    #[must_use]
    pub fn choose<'a, T>(&mut self, slice: &'a [T]) -> Option<&'a T> {
        if slice.is_empty() {
            return None;
        }
        let index = self.below(slice.len());
        slice.get(index)
    }
}
