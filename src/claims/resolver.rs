//! Claim arbitration over a read-only `GameState`.

use log::debug;

use super::{Candidate, Claim, ClaimKind, ClaimOptions, ClaimWindow, Discard};
use crate::core::{GameState, Seat, SeatMap};
use crate::rules::HandEvaluator;

/// Decides which seats may claim a discard and in what order they are asked.
///
/// The resolver never mutates hands or the wall; it only reports.
#[derive(Clone, Copy, Debug, Default)]
pub struct ClaimResolver;

impl ClaimResolver {
    /// Eligibility of one seat for `discard`.
    ///
    /// The discarder is never eligible for its own tile.
    #[must_use]
    pub fn options_for(state: &GameState, seat: Seat, discard: &Discard) -> ClaimOptions {
        if seat == discard.seat {
            return ClaimOptions::NONE;
        }

        let hand = &state.players[seat].hand;
        let concealed = hand.concealed();
        ClaimOptions {
            hu: HandEvaluator::wins_with(concealed, hand.melds().len(), discard.tile),
            gang: HandEvaluator::can_claim_gang(concealed, discard.tile),
            peng: HandEvaluator::can_peng(concealed, discard.tile),
            chi: HandEvaluator::can_chi(concealed, discard.tile, seat, discard.seat),
        }
    }

    /// Raw eligibility for every seat, before priority is applied.
    #[must_use]
    pub fn eligibility(state: &GameState, discard: &Discard) -> SeatMap<ClaimOptions> {
        SeatMap::new(|seat| Self::options_for(state, seat, discard))
    }

    /// Open a claim window, or `None` if nobody can claim.
    ///
    /// The class is the best one available anywhere at the table; candidates
    /// are the seats holding that class, nearest successor first.
    #[must_use]
    pub fn open_window(state: &GameState, discard: Discard) -> Option<ClaimWindow> {
        let eligibility = Self::eligibility(state, &discard);

        let class = discard
            .seat
            .others()
            .filter_map(|seat| eligibility[seat].best_class())
            .min()?;

        let candidates = discard
            .seat
            .others()
            .map(|seat| Candidate {
                seat,
                options: eligibility[seat].restricted_to(class),
            })
            .filter(|c| c.options.any())
            .collect();

        debug!(
            "claim window on {} from {}: {:?} {:?}",
            discard.tile, discard.seat, class, candidates
        );
        Some(ClaimWindow {
            discard,
            class,
            candidates,
            cursor: 0,
        })
    }

    /// Walk a window to completion with a decision function.
    ///
    /// `decide` returns the claim a candidate takes, or `None` to decline.
    /// A returned kind outside the candidate's options counts as a decline.
    pub fn run_window(
        mut window: ClaimWindow,
        mut decide: impl FnMut(&Candidate) -> Option<ClaimKind>,
    ) -> Option<Claim> {
        while let Some(candidate) = window.current() {
            match decide(&candidate) {
                Some(kind) if candidate.options.allows(kind) => {
                    return Some(Claim {
                        seat: candidate.seat,
                        kind,
                        discard: window.discard,
                    });
                }
                _ => window.decline(),
            }
        }
        None
    }

    /// Arbitrate `discard` in one call.
    pub fn resolve(
        state: &GameState,
        discard: Discard,
        decide: impl FnMut(&Candidate) -> Option<ClaimKind>,
    ) -> Option<Claim> {
        Self::run_window(Self::open_window(state, discard)?, decide)
    }
}
