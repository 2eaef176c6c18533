//! Tile values: kinds, faces, and physical tile instances.
//!
//! A `TileFace` is the `(kind, rank)` pair the rules care about. A `Tile`
//! pairs a face with a `TileId` so that otherwise-identical copies can be
//! told apart by a presentation layer. Rules never look at the id.

use serde::{Deserialize, Serialize};
use std::str::FromStr;

use crate::core::{EngineError, EngineResult};

/// Number of distinct faces (27 suited + 4 winds + 3 dragons + 8 flowers).
pub const FACE_COUNT: usize = 42;

/// Tile kind. The three numbered suits are labelled A, B and C.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum TileKind {
    /// Characters (suit A).
    Characters,
    /// Bamboo (suit B).
    Bamboo,
    /// Dots (suit C).
    Dots,
    Wind,
    Dragon,
    Flower,
}

impl TileKind {
    /// The three numbered suits, in sort order.
    pub const SUITS: [TileKind; 3] = [TileKind::Characters, TileKind::Bamboo, TileKind::Dots];

    /// True for the numbered suits that can form runs.
    #[must_use]
    pub const fn is_suited(self) -> bool {
        matches!(self, TileKind::Characters | TileKind::Bamboo | TileKind::Dots)
    }

    /// Valid ranks for this kind.
    #[must_use]
    pub fn ranks(self) -> std::ops::RangeInclusive<u8> {
        match self {
            TileKind::Characters | TileKind::Bamboo | TileKind::Dots => 1..=9,
            TileKind::Wind => 0..=3,
            TileKind::Dragon => 0..=2,
            TileKind::Flower => 0..=7,
        }
    }

    /// Physical copies of each face of this kind in a full set.
    #[must_use]
    pub const fn copies(self) -> usize {
        match self {
            TileKind::Flower => 1,
            _ => 4,
        }
    }

    const fn face_offset(self) -> usize {
        match self {
            TileKind::Characters => 0,
            TileKind::Bamboo => 9,
            TileKind::Dots => 18,
            TileKind::Wind => 27,
            TileKind::Dragon => 31,
            TileKind::Flower => 34,
        }
    }

    const fn suit_letter(self) -> Option<char> {
        match self {
            TileKind::Characters => Some('A'),
            TileKind::Bamboo => Some('B'),
            TileKind::Dots => Some('C'),
            _ => None,
        }
    }
}

/// Prevailing or seat wind.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Wind {
    #[default]
    East,
    South,
    West,
    North,
}

impl Wind {
    /// Wind tile rank (East = 0 .. North = 3).
    #[must_use]
    pub const fn rank(self) -> u8 {
        self as u8
    }
}

impl std::fmt::Display for Wind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Wind::East => "East",
            Wind::South => "South",
            Wind::West => "West",
            Wind::North => "North",
        };
        f.write_str(name)
    }
}

const WIND_LABELS: [&str; 4] = ["E", "S", "W", "N"];
const DRAGON_LABELS: [&str; 3] = ["Red", "Green", "White"];

/// The rule-relevant identity of a tile: `(kind, rank)`.
///
/// Ordering is by kind (suits A, B, C, then winds, dragons, flowers) and
/// then by rank, which is also the display sort order of a hand.
///
/// Fields are private so every face holds a rank valid for its kind;
/// deserialization goes through the same check.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "RawFace")]
pub struct TileFace {
    kind: TileKind,
    rank: u8,
}

impl TileFace {
    /// Create a face. Panics if the rank is out of range for the kind.
    #[must_use]
    pub fn new(kind: TileKind, rank: u8) -> Self {
        assert!(kind.ranks().contains(&rank), "rank {rank} out of range for {kind:?}");
        Self { kind, rank }
    }

    /// Create a face, or `None` if the rank is out of range for the kind.
    #[must_use]
    pub fn try_new(kind: TileKind, rank: u8) -> Option<Self> {
        kind.ranks().contains(&rank).then_some(Self { kind, rank })
    }

    #[must_use]
    pub const fn kind(self) -> TileKind {
        self.kind
    }

    #[must_use]
    pub const fn rank(self) -> u8 {
        self.rank
    }

    /// Suited face, e.g. `TileFace::suited(TileKind::Dots, 5)`.
    #[must_use]
    pub fn suited(kind: TileKind, rank: u8) -> Self {
        assert!(kind.is_suited(), "{kind:?} is not a numbered suit");
        Self::new(kind, rank)
    }

    /// Wind face.
    #[must_use]
    pub const fn wind(wind: Wind) -> Self {
        Self {
            kind: TileKind::Wind,
            rank: wind.rank(),
        }
    }

    #[must_use]
    pub const fn is_suited(self) -> bool {
        self.kind.is_suited()
    }

    #[must_use]
    pub const fn is_flower(self) -> bool {
        matches!(self.kind, TileKind::Flower)
    }

    /// Dense index in `0..FACE_COUNT`, used by count tables.
    #[must_use]
    pub const fn index(self) -> usize {
        self.kind.face_offset() + self.rank as usize - if self.kind.is_suited() { 1 } else { 0 }
    }

    /// Inverse of [`TileFace::index`].
    #[must_use]
    pub fn from_index(index: usize) -> Option<Self> {
        let (kind, base, first_rank) = match index {
            0..=8 => (TileKind::Characters, 0, 1),
            9..=17 => (TileKind::Bamboo, 9, 1),
            18..=26 => (TileKind::Dots, 18, 1),
            27..=30 => (TileKind::Wind, 27, 0),
            31..=33 => (TileKind::Dragon, 31, 0),
            34..=41 => (TileKind::Flower, 34, 0),
            _ => return None,
        };
        Some(Self {
            kind,
            rank: (index - base) as u8 + first_rank,
        })
    }

    /// Same-kind face `delta` ranks away, if that rank exists.
    #[must_use]
    pub fn shifted(self, delta: i8) -> Option<Self> {
        if !self.is_suited() {
            return None;
        }
        let rank = self.rank as i8 + delta;
        (1..=9).contains(&rank).then(|| Self {
            kind: self.kind,
            rank: rank as u8,
        })
    }

    /// Parse a whitespace-separated list of labels such as `"1A 1A 5C E Red"`.
    pub fn parse_list(labels: &str) -> EngineResult<Vec<TileFace>> {
        labels.split_whitespace().map(str::parse).collect()
    }

    /// Every face in a full set, in sort order.
    pub fn all() -> impl Iterator<Item = TileFace> {
        (0..FACE_COUNT).filter_map(TileFace::from_index)
    }
}

#[derive(Deserialize)]
struct RawFace {
    kind: TileKind,
    rank: u8,
}

impl TryFrom<RawFace> for TileFace {
    type Error = EngineError;

    fn try_from(raw: RawFace) -> Result<Self, Self::Error> {
        TileFace::try_new(raw.kind, raw.rank)
            .ok_or_else(|| EngineError::ParseTile(format!("{:?} rank {}", raw.kind, raw.rank)))
    }
}

impl std::fmt::Display for TileFace {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.kind {
            TileKind::Wind => f.write_str(WIND_LABELS[self.rank as usize]),
            TileKind::Dragon => f.write_str(DRAGON_LABELS[self.rank as usize]),
            TileKind::Flower => write!(f, "F{}", self.rank),
            suit => match suit.suit_letter() {
                Some(letter) => write!(f, "{}{}", self.rank, letter),
                None => write!(f, "?{}", self.rank),
            },
        }
    }
}

impl FromStr for TileFace {
    type Err = EngineError;

    fn from_str(label: &str) -> Result<Self, Self::Err> {
        let err = || EngineError::ParseTile(label.to_string());

        if let Some(rank) = WIND_LABELS.iter().position(|&l| l == label) {
            return Ok(Self { kind: TileKind::Wind, rank: rank as u8 });
        }
        if let Some(rank) = DRAGON_LABELS.iter().position(|&l| l == label) {
            return Ok(Self { kind: TileKind::Dragon, rank: rank as u8 });
        }
        if let Some(rest) = label.strip_prefix('F') {
            let rank: u8 = rest.parse().map_err(|_| err())?;
            return TileKind::Flower
                .ranks()
                .contains(&rank)
                .then_some(Self { kind: TileKind::Flower, rank })
                .ok_or_else(err);
        }

        let mut chars = label.chars();
        let (Some(digit), Some(letter), None) = (chars.next(), chars.next(), chars.next()) else {
            return Err(err());
        };
        let rank = digit.to_digit(10).ok_or_else(err)? as u8;
        let kind = TileKind::SUITS
            .into_iter()
            .find(|k| k.suit_letter() == Some(letter))
            .ok_or_else(err)?;
        if !(1..=9).contains(&rank) {
            return Err(err());
        }
        Ok(Self { kind, rank })
    }
}

/// Unique identifier of one physical tile.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TileId(pub u16);

/// One physical tile. Immutable; moves between wall, hands, melds and the
/// discard pile but is never duplicated.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Tile {
    pub id: TileId,
    pub face: TileFace,
}

impl Tile {
    #[must_use]
    pub const fn new(id: TileId, face: TileFace) -> Self {
        Self { id, face }
    }

    #[must_use]
    pub const fn is_flower(&self) -> bool {
        self.face.is_flower()
    }

    /// Same `(kind, rank)` as `face`.
    #[must_use]
    pub fn matches(&self, face: TileFace) -> bool {
        self.face == face
    }
}

impl std::fmt::Display for Tile {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        std::fmt::Display::fmt(&self.face, f)
    }
}
