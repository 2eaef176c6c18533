//! Single-in-flight scheduling of automatic transitions.
//!
//! Every automatic step (finishing the deal, an AI turn, AI claim
//! processing, a draw) is scheduled with a pacing delay instead of being
//! run inline. At most one step is pending at a time. Each scheduled step
//! carries a generation number; cancelling bumps the generation so a host
//! timer that fires late can be recognised as stale.

use serde::{Deserialize, Serialize};

use crate::core::Seat;

/// An automatic transition the controller will run when fired.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Step {
    /// Move from `Dealing` to the dealer's first discard.
    FinishDeal,
    /// Let an AI seat declare a win or discard.
    AiTurn(Seat),
    /// Ask the AI candidates of the open claim window.
    ProcessClaims,
    /// `seat` draws from the wall.
    Draw(Seat),
}

/// A scheduled step with its delay and generation.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PendingTransition {
    pub step: Step,
    /// Delay before the step should run, for presentation pacing.
    pub delay_ms: u64,
    /// Generation this step was scheduled under.
    pub generation: u64,
}

/// Holds at most one pending transition.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct Scheduler {
    pending: Option<PendingTransition>,
    generation: u64,
}

impl Scheduler {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Schedule `step`, returning its generation.
    ///
    /// Only one transition may be in flight; scheduling over a pending one
    /// is a controller bug.
    pub fn schedule(&mut self, step: Step, delay_ms: u64) -> u64 {
        debug_assert!(
            self.pending.is_none(),
            "scheduling {step:?} over pending {:?}",
            self.pending
        );
        self.generation += 1;
        self.pending = Some(PendingTransition {
            step,
            delay_ms,
            generation: self.generation,
        });
        self.generation
    }

    /// Remove and return the pending transition.
    pub fn take(&mut self) -> Option<PendingTransition> {
        self.pending.take()
    }

    /// Drop the pending transition and invalidate its generation.
    pub fn cancel(&mut self) -> Option<PendingTransition> {
        self.generation += 1;
        self.pending.take()
    }

    #[must_use]
    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }

    #[must_use]
    pub fn pending(&self) -> Option<PendingTransition> {
        self.pending
    }

    /// Latest generation handed out.
    #[must_use]
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// True if `generation` names the transition currently pending.
    #[must_use]
    pub fn is_current(&self, generation: u64) -> bool {
        self.pending.is_some_and(|p| p.generation == generation)
    }
}
