//! Tiles and the containers they move between.
//!
//! ## Key Types
//!
//! - `TileFace`: The `(kind, rank)` identity that rules compare
//! - `Tile`: One physical tile (face plus unique `TileId`)
//! - `Wall`: The undrawn stack; deals from the head, draws from the tail
//! - `Hand`: Concealed tiles, revealed `Meld`s, and set-aside flowers
//!
//! Tiles are never duplicated: every tile lives in exactly one of the wall,
//! a hand (concealed, melded or flower area), or the discard pile.

pub mod hand;
pub mod tile;
pub mod wall;

pub use hand::{Hand, Meld, MeldKind};
pub use tile::{Tile, TileFace, TileId, TileKind, Wind, FACE_COUNT};
pub use wall::{check_population, Replacement, Wall, DEAL_SIZE, DEAL_TOTAL, TILE_COUNT};
