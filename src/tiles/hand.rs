//! A seat's concealed tiles, revealed melds, and set-aside flowers.

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use super::tile::{Tile, TileFace};
use crate::core::Seat;

/// Kind of revealed grouping.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MeldKind {
    /// Run of three consecutive ranks in one suit.
    Chi,
    /// Triplet.
    Peng,
    /// Quad.
    Gang,
}

/// A revealed grouping owned by one seat. Immutable once formed.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Meld {
    pub kind: MeldKind,
    /// Physical tiles in the meld (3 for chi/peng, 4 for gang).
    pub tiles: SmallVec<[Tile; 4]>,
    /// Seat whose discard completed the meld; `None` for a concealed gang.
    pub claimed_from: Option<Seat>,
}

impl Meld {
    /// Build a meld, sorting its tiles by face.
    #[must_use]
    pub fn new(kind: MeldKind, tiles: impl IntoIterator<Item = Tile>, claimed_from: Option<Seat>) -> Self {
        let mut tiles: SmallVec<[Tile; 4]> = tiles.into_iter().collect();
        tiles.sort_by_key(|t| t.face);
        debug_assert_eq!(
            tiles.len(),
            if kind == MeldKind::Gang { 4 } else { 3 },
            "malformed {kind:?} meld"
        );
        Self {
            kind,
            tiles,
            claimed_from,
        }
    }

    /// Lowest face in the meld.
    #[must_use]
    pub fn face(&self) -> Option<TileFace> {
        self.tiles.first().map(|t| t.face)
    }
}

/// Concealed tiles plus melds and flowers for one seat.
///
/// Concealed order is display order only; rules treat it as a multiset.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Hand {
    concealed: Vec<Tile>,
    melds: Vec<Meld>,
    flowers: Vec<Tile>,
}

impl Hand {
    /// Create an empty hand.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a hand holding the given concealed tiles.
    #[must_use]
    pub fn from_tiles(tiles: impl IntoIterator<Item = Tile>) -> Self {
        Self {
            concealed: tiles.into_iter().collect(),
            ..Self::default()
        }
    }

    // === Concealed tiles ===

    #[must_use]
    pub fn concealed(&self) -> &[Tile] {
        &self.concealed
    }

    /// Number of concealed tiles.
    #[must_use]
    pub fn len(&self) -> usize {
        self.concealed.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.concealed.is_empty()
    }

    /// Add a tile to the end of the concealed tiles.
    pub fn push(&mut self, tile: Tile) {
        self.concealed.push(tile);
    }

    /// Remove the concealed tile at `index`.
    pub fn remove_at(&mut self, index: usize) -> Option<Tile> {
        (index < self.concealed.len()).then(|| self.concealed.remove(index))
    }

    /// Concealed copies of `face`.
    #[must_use]
    pub fn count_of(&self, face: TileFace) -> usize {
        self.concealed.iter().filter(|t| t.matches(face)).count()
    }

    /// True if at least one concealed tile has `face`.
    #[must_use]
    pub fn contains(&self, face: TileFace) -> bool {
        self.concealed.iter().any(|t| t.matches(face))
    }

    /// Remove one concealed tile for each face in `faces`.
    ///
    /// All-or-nothing: if any face is missing the hand is left unchanged
    /// and `None` is returned.
    pub fn take_faces(&mut self, faces: &[TileFace]) -> Option<SmallVec<[Tile; 4]>> {
        let mut picked: SmallVec<[usize; 4]> = SmallVec::new();
        for &face in faces {
            let index = self
                .concealed
                .iter()
                .enumerate()
                .position(|(i, t)| t.matches(face) && !picked.contains(&i))?;
            picked.push(index);
        }

        let taken = picked.iter().map(|&i| self.concealed[i]).collect();
        picked.sort_unstable_by(|a, b| b.cmp(a));
        for index in picked {
            self.concealed.remove(index);
        }
        Some(taken)
    }

    /// Index of the first concealed flower, if any.
    #[must_use]
    pub fn first_flower(&self) -> Option<usize> {
        self.concealed.iter().position(Tile::is_flower)
    }

    /// Cosmetic reorder by face. Stable, so calling it twice is a no-op.
    pub fn sort(&mut self) {
        self.concealed.sort_by_key(|t| t.face);
    }

    // === Melds and flowers ===

    #[must_use]
    pub fn melds(&self) -> &[Meld] {
        &self.melds
    }

    /// Append a revealed meld.
    pub fn add_meld(&mut self, meld: Meld) {
        self.melds.push(meld);
    }

    /// Flowers set aside by replacement draws.
    #[must_use]
    pub fn flowers(&self) -> &[Tile] {
        &self.flowers
    }

    /// Move a flower to the revealed bonus area.
    pub fn set_aside_flower(&mut self, tile: Tile) {
        debug_assert!(tile.is_flower());
        self.flowers.push(tile);
    }

    // === Counting ===

    /// Concealed count plus three per meld: 13 at rest, 14 before a discard.
    #[must_use]
    pub fn effective_len(&self) -> usize {
        self.concealed.len() + 3 * self.melds.len()
    }

    /// Every physical tile this seat owns (concealed, melded, flowers).
    #[must_use]
    pub fn physical_len(&self) -> usize {
        self.concealed.len()
            + self.melds.iter().map(|m| m.tiles.len()).sum::<usize>()
            + self.flowers.len()
    }
}
