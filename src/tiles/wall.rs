//! The wall: the undrawn tile stack.
//!
//! Dealing takes tiles from the head; ordinary draws, flower replacements
//! and gang replacements take tiles from the tail.
//!
//! Backed by `im::Vector` so `GameState` clones in O(1).

use im::Vector;
use log::debug;
use rustc_hash::FxHashSet;
use serde::{Deserialize, Serialize};

use super::hand::Hand;
use super::tile::{Tile, TileFace, TileId, FACE_COUNT};
use crate::core::{EngineError, EngineResult, GameRng, Seat, SeatMap, SEAT_COUNT};

/// Total tiles in a full set: 136 suited/honor tiles plus 8 flowers.
pub const TILE_COUNT: usize = 144;

/// Concealed tiles dealt to each seat before the dealer's extra tile.
pub const DEAL_SIZE: usize = 13;

/// Tiles taken from the wall by the initial deal.
pub const DEAL_TOTAL: usize = DEAL_SIZE * SEAT_COUNT + 1;

/// Result of a flower-replacement pass over one hand.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Replacement {
    /// Flowers moved to the bonus area.
    pub flowers: usize,
    /// The wall ran out while a replacement was still owed.
    pub exhausted: bool,
}

/// Remaining undealt tiles, ordered head to tail.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Wall {
    tiles: Vector<Tile>,
}

impl Wall {
    /// Build the full, unshuffled 144-tile set.
    ///
    /// Panics if the population invariant is broken, which would be a
    /// programming error in the tile catalogue.
    #[must_use]
    pub fn build() -> Self {
        let mut tiles = Vector::new();
        let mut next_id = 0u16;
        for face in TileFace::all() {
            for _ in 0..face.kind().copies() {
                tiles.push_back(Tile::new(TileId(next_id), face));
                next_id += 1;
            }
        }

        if let Err(err) = check_population(tiles.iter()) {
            panic!("tile catalogue is broken: {err}");
        }
        Self { tiles }
    }

    /// Wrap an explicit tile order (head first). Used to stage fixed deals.
    #[must_use]
    pub fn from_tiles(tiles: impl IntoIterator<Item = Tile>) -> Self {
        Self {
            tiles: tiles.into_iter().collect(),
        }
    }

    /// Uniform Fisher–Yates shuffle.
    pub fn shuffle(&mut self, rng: &mut GameRng) {
        for i in (1..self.tiles.len()).rev() {
            let j = rng.below(i + 1);
            self.tiles.swap(i, j);
        }
    }

    /// Deal 13 tiles to every seat round-robin starting at the dealer, then
    /// one extra tile to the dealer. Deterministic given the wall order.
    ///
    /// Returns `None` (wall untouched) if fewer than 53 tiles remain.
    pub fn deal_initial(&mut self, dealer: Seat) -> Option<SeatMap<Vec<Tile>>> {
        if self.tiles.len() < DEAL_TOTAL {
            return None;
        }

        let mut hands: SeatMap<Vec<Tile>> = SeatMap::new(|_| Vec::with_capacity(DEAL_SIZE + 1));
        for round in 0..DEAL_TOTAL {
            let seat = dealer.offset((round % SEAT_COUNT) as u8);
            let tile = self.tiles.pop_front()?;
            hands[seat].push(tile);
        }
        debug!("dealt {DEAL_TOTAL} tiles from dealer {dealer}, {} left", self.tiles.len());
        Some(hands)
    }

    /// Draw from the tail. `None` means the wall is exhausted.
    pub fn draw_one(&mut self) -> Option<Tile> {
        self.tiles.pop_back()
    }

    /// Replace every flower in `hand` with a tail draw, repeating until no
    /// flower remains or the wall runs out.
    pub fn replace_flowers(&mut self, hand: &mut Hand) -> Replacement {
        let mut result = Replacement::default();
        while let Some(index) = hand.first_flower() {
            let Some(flower) = hand.remove_at(index) else {
                break;
            };
            hand.set_aside_flower(flower);
            result.flowers += 1;

            match self.draw_one() {
                Some(tile) => hand.push(tile),
                None => {
                    result.exhausted = true;
                    break;
                }
            }
        }
        result
    }

    /// Remove the tile nearest the head with the given face.
    pub fn take_face(&mut self, face: TileFace) -> Option<Tile> {
        let index = self.tiles.iter().position(|t| t.matches(face))?;
        Some(self.tiles.remove(index))
    }

    /// Put a tile on the tail so it is the next one drawn.
    pub fn push_tail(&mut self, tile: Tile) {
        self.tiles.push_back(tile);
    }

    /// Tiles remaining.
    #[must_use]
    pub fn len(&self) -> usize {
        self.tiles.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.tiles.is_empty()
    }

    /// Iterate from head to tail.
    pub fn iter(&self) -> impl Iterator<Item = &Tile> {
        self.tiles.iter()
    }
}

/// Verify that `tiles` is exactly one full set: four copies of every
/// suited/wind/dragon face, one of every flower, and no repeated ids.
pub fn check_population<'a>(tiles: impl IntoIterator<Item = &'a Tile>) -> EngineResult<()> {
    let mut counts = [0usize; FACE_COUNT];
    let mut ids = FxHashSet::default();
    let mut total = 0;
    for tile in tiles {
        counts[tile.face.index()] += 1;
        ids.insert(tile.id);
        total += 1;
    }

    for face in TileFace::all() {
        let expected = face.kind().copies();
        let found = counts[face.index()];
        if found != expected {
            return Err(EngineError::PopulationMismatch {
                face: face.to_string(),
                expected,
                found,
            });
        }
    }
    if ids.len() != total || total != TILE_COUNT {
        return Err(EngineError::TileConservation {
            expected: TILE_COUNT,
            found: ids.len(),
        });
    }
    Ok(())
}
