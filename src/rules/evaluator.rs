//! Winning-hand detection and claim eligibility checks.
//!
//! All checks are pure: they read tiles and report, never mutate.
//!
//! ## Win search
//!
//! A winning shape is one pair plus any number of sets (triplets or runs).
//! For every face with at least two copies the pair is removed and the rest
//! is decomposed into sets. Decomposition always works on the lowest
//! remaining face: that tile can only be part of a triplet of itself or a
//! run starting at it, so trying those two branches covers every exact
//! cover without depending on which sets are tried first.

use smallvec::SmallVec;

use crate::core::Seat;
use crate::tiles::{Tile, TileFace, FACE_COUNT};

/// Concealed sizes a hand may have when checked for a win.
const WIN_SIZES: [usize; 2] = [13, 14];

/// Per-face tile counts.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
struct FaceCounts([u8; FACE_COUNT]);

impl FaceCounts {
    fn from_faces(faces: impl IntoIterator<Item = TileFace>) -> Self {
        let mut counts = [0u8; FACE_COUNT];
        for face in faces {
            counts[face.index()] += 1;
        }
        Self(counts)
    }

    fn total(&self) -> usize {
        self.0.iter().map(|&c| c as usize).sum()
    }

    fn get(&self, face: TileFace) -> u8 {
        self.0[face.index()]
    }

    fn lowest(&self) -> Option<TileFace> {
        self.0
            .iter()
            .position(|&c| c > 0)
            .and_then(TileFace::from_index)
    }
}

/// Two concealed faces that complete a run with a claimed tile.
pub type ChiPair = [TileFace; 2];

/// Rule checks over concealed tiles.
///
/// Melds are never re-evaluated: they are complete sets by construction.
#[derive(Clone, Copy, Debug, Default)]
pub struct HandEvaluator;

impl HandEvaluator {
    /// True if the concealed tiles form a complete hand on their own.
    ///
    /// The input must hold 13 or 14 tiles; flowers are ignored and the
    /// remaining count must be 2 mod 3.
    #[must_use]
    pub fn is_winning_hand(tiles: &[Tile]) -> bool {
        Self::is_winning_hand_with_melds(tiles, 0)
    }

    /// Win check for a hand that already has `meld_count` revealed melds.
    ///
    /// The size gate applies to `tiles.len() + 3 × meld_count`.
    #[must_use]
    pub fn is_winning_hand_with_melds(tiles: &[Tile], meld_count: usize) -> bool {
        if !WIN_SIZES.contains(&(tiles.len() + 3 * meld_count)) {
            return false;
        }
        Self::is_complete(tiles.iter().map(|t| t.face))
    }

    /// Win check for concealed tiles plus a claimed discard.
    #[must_use]
    pub fn wins_with(tiles: &[Tile], meld_count: usize, claimed: Tile) -> bool {
        if !WIN_SIZES.contains(&(tiles.len() + 1 + 3 * meld_count)) {
            return false;
        }
        Self::is_complete(tiles.iter().map(|t| t.face).chain(std::iter::once(claimed.face)))
    }

    /// Pair-plus-sets search over a multiset of faces, without a size gate.
    fn is_complete(faces: impl Iterator<Item = TileFace>) -> bool {
        let mut counts = FaceCounts::from_faces(faces.filter(|f| !f.is_flower()));
        if counts.total() % 3 != 2 {
            return false;
        }

        for index in 0..FACE_COUNT {
            if counts.0[index] >= 2 {
                counts.0[index] -= 2;
                let found = Self::decompose_sets(&mut counts);
                counts.0[index] += 2;
                if found {
                    return true;
                }
            }
        }
        false
    }

    /// True if the counts split exactly into triplets and runs.
    fn decompose_sets(counts: &mut FaceCounts) -> bool {
        let Some(face) = counts.lowest() else {
            return true;
        };
        let index = face.index();

        if counts.0[index] >= 3 {
            counts.0[index] -= 3;
            let found = Self::decompose_sets(counts);
            counts.0[index] += 3;
            if found {
                return true;
            }
        }

        if let (Some(second), Some(third)) = (face.shifted(1), face.shifted(2)) {
            if counts.get(second) > 0 && counts.get(third) > 0 {
                let run = [index, second.index(), third.index()];
                run.iter().for_each(|&i| counts.0[i] -= 1);
                let found = Self::decompose_sets(counts);
                run.iter().for_each(|&i| counts.0[i] += 1);
                if found {
                    return true;
                }
            }
        }

        false
    }

    /// Face of a concealed quad (exactly four copies), if any.
    #[must_use]
    pub fn quad_face(tiles: &[Tile]) -> Option<TileFace> {
        let counts = FaceCounts::from_faces(tiles.iter().map(|t| t.face));
        counts
            .0
            .iter()
            .position(|&c| c == 4)
            .and_then(TileFace::from_index)
    }

    /// True iff some face appears exactly four times among the concealed tiles.
    #[must_use]
    pub fn can_gang(tiles: &[Tile]) -> bool {
        Self::quad_face(tiles).is_some()
    }

    /// True iff three concealed copies let `tile` be claimed as a quad.
    #[must_use]
    pub fn can_claim_gang(tiles: &[Tile], tile: Tile) -> bool {
        tiles.iter().filter(|t| t.matches(tile.face)).count() >= 3
    }

    /// True iff at least two concealed copies of `tile`'s face are held.
    #[must_use]
    pub fn can_peng(tiles: &[Tile], tile: Tile) -> bool {
        tiles.iter().filter(|t| t.matches(tile.face)).count() >= 2
    }

    /// True iff `claimant` sits right after `discarder` and holds two tiles
    /// that complete a run with `tile`.
    #[must_use]
    pub fn can_chi(tiles: &[Tile], tile: Tile, claimant: Seat, discarder: Seat) -> bool {
        claimant == discarder.next() && !Self::chi_options(tiles, tile.face).is_empty()
    }

    /// Every run completion available for `face`, in the order
    /// `{v-2, v-1}`, `{v-1, v+1}`, `{v+1, v+2}`.
    #[must_use]
    pub fn chi_options(tiles: &[Tile], face: TileFace) -> SmallVec<[ChiPair; 3]> {
        let has = |delta: i8| {
            face.shifted(delta)
                .filter(|f| tiles.iter().any(|t| t.matches(*f)))
        };

        [(-2, -1), (-1, 1), (1, 2)]
            .into_iter()
            .filter_map(|(a, b)| Some([has(a)?, has(b)?]))
            .collect()
    }
}
