//! Claim arbitration on a discarded tile.
//!
//! When a tile is discarded every other seat may be eligible to claim it.
//! Arbitration picks at most one claim per discard:
//!
//! 1. **Priority class**: hu beats peng/gang, peng/gang beats chi. The class
//!    is fixed across all seats before anyone is asked.
//! 2. **Proximity**: within a class, the seat nearest after the discarder
//!    in turn order is asked first.
//! 3. **Decline**: a candidate that passes hands the claim to the next
//!    candidate of the same class; lower classes are never reopened.
//!
//! ## Key Types
//!
//! - `ClaimOptions`: Per-seat eligibility flags (hu/peng/gang/chi)
//! - `ClaimWindow`: The open claim, its class, and candidates in order
//! - `Claim`: The single claim chosen for execution
//! - `ClaimResolver`: Pure arbitration over `GameState`

mod resolver;

pub use resolver::ClaimResolver;

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use crate::core::Seat;
use crate::tiles::Tile;

/// A claim a seat can make on a discard.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ClaimKind {
    Hu,
    Gang,
    Peng,
    Chi,
}

impl ClaimKind {
    /// Priority class this claim belongs to.
    #[must_use]
    pub const fn class(self) -> ClaimClass {
        match self {
            ClaimKind::Hu => ClaimClass::Hu,
            ClaimKind::Gang | ClaimKind::Peng => ClaimClass::Meld,
            ClaimKind::Chi => ClaimClass::Chi,
        }
    }
}

impl std::fmt::Display for ClaimKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            ClaimKind::Hu => "hu",
            ClaimKind::Gang => "gang",
            ClaimKind::Peng => "peng",
            ClaimKind::Chi => "chi",
        };
        f.write_str(name)
    }
}

/// Priority class, highest first.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum ClaimClass {
    Hu,
    /// Peng or gang.
    Meld,
    Chi,
}

/// Eligibility flags for one seat.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ClaimOptions {
    pub hu: bool,
    pub gang: bool,
    pub peng: bool,
    pub chi: bool,
}

impl ClaimOptions {
    /// No flags set.
    pub const NONE: Self = Self {
        hu: false,
        gang: false,
        peng: false,
        chi: false,
    };

    /// True if any flag is set.
    #[must_use]
    pub const fn any(self) -> bool {
        self.hu || self.gang || self.peng || self.chi
    }

    /// Is `kind` allowed?
    #[must_use]
    pub const fn allows(self, kind: ClaimKind) -> bool {
        match kind {
            ClaimKind::Hu => self.hu,
            ClaimKind::Gang => self.gang,
            ClaimKind::Peng => self.peng,
            ClaimKind::Chi => self.chi,
        }
    }

    /// Highest class among the set flags.
    #[must_use]
    pub const fn best_class(self) -> Option<ClaimClass> {
        if self.hu {
            Some(ClaimClass::Hu)
        } else if self.gang || self.peng {
            Some(ClaimClass::Meld)
        } else if self.chi {
            Some(ClaimClass::Chi)
        } else {
            None
        }
    }

    /// Keep only the flags belonging to `class`.
    #[must_use]
    pub const fn restricted_to(self, class: ClaimClass) -> Self {
        match class {
            ClaimClass::Hu => Self { hu: self.hu, ..Self::NONE },
            ClaimClass::Meld => Self {
                gang: self.gang,
                peng: self.peng,
                ..Self::NONE
            },
            ClaimClass::Chi => Self { chi: self.chi, ..Self::NONE },
        }
    }
}

/// A discarded tile and the seat that discarded it.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Discard {
    pub tile: Tile,
    pub seat: Seat,
}

/// A seat eligible in the window's class, with its class-restricted flags.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Candidate {
    pub seat: Seat,
    pub options: ClaimOptions,
}

/// An open claim window: one discard, one class, candidates by proximity.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClaimWindow {
    pub discard: Discard,
    pub class: ClaimClass,
    pub candidates: SmallVec<[Candidate; 3]>,
    /// Index of the candidate currently being asked.
    pub cursor: usize,
}

impl ClaimWindow {
    /// The candidate currently being asked, if any remain.
    #[must_use]
    pub fn current(&self) -> Option<Candidate> {
        self.candidates.get(self.cursor).copied()
    }

    /// Record that the current candidate declined.
    pub fn decline(&mut self) {
        self.cursor += 1;
    }
}

/// The single claim chosen for a discard.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claim {
    pub seat: Seat,
    pub kind: ClaimKind,
    pub discard: Discard,
}
