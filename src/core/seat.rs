//! Seat identification and per-seat data storage.
//!
//! ## Seat
//!
//! Type-safe seat index for the four seats at the table (0-3).
//! Turn order runs 0 → 1 → 2 → 3 → 0.
//!
//! ## SeatMap
//!
//! Fixed-size per-seat storage backed by an array for O(1) access.
//! Supports iteration and indexing by `Seat`.

use serde::{Deserialize, Serialize};
use std::ops::{Index, IndexMut};

/// Number of seats at a mahjong table.
pub const SEAT_COUNT: usize = 4;

/// Seat index at the table.
///
/// Seat indices are 0-based: the first seat is `Seat(0)`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Seat(pub u8);

impl Seat {
    /// Create a new seat, wrapping out-of-range indices onto the table.
    #[must_use]
    pub const fn new(index: u8) -> Self {
        Self(index % SEAT_COUNT as u8)
    }

    /// Get the raw seat index (0-based).
    #[must_use]
    pub const fn index(self) -> usize {
        self.0 as usize
    }

    /// The seat that plays after this one.
    #[must_use]
    pub const fn next(self) -> Self {
        Self::new(self.0 + 1)
    }

    /// The seat `steps` places after this one in turn order.
    #[must_use]
    pub const fn offset(self, steps: u8) -> Self {
        Self::new(self.0 + steps % SEAT_COUNT as u8)
    }

    /// How many places after `from` this seat sits in turn order (0-3).
    ///
    /// ```
    /// use mahjong_engine::core::Seat;
    ///
    /// assert_eq!(Seat::new(1).distance_from(Seat::new(0)), 1);
    /// assert_eq!(Seat::new(0).distance_from(Seat::new(3)), 1);
    /// assert_eq!(Seat::new(2).distance_from(Seat::new(2)), 0);
    /// ```
    #[must_use]
    pub const fn distance_from(self, from: Seat) -> u8 {
        (self.0 + SEAT_COUNT as u8 - from.0) % SEAT_COUNT as u8
    }

    /// Iterate over all four seats in index order.
    pub fn all() -> impl Iterator<Item = Seat> {
        (0..SEAT_COUNT as u8).map(Seat)
    }

    /// The other three seats, in turn order starting after this one.
    pub fn others(self) -> impl Iterator<Item = Seat> {
        (1..SEAT_COUNT as u8).map(move |step| self.offset(step))
    }
}

impl std::fmt::Display for Seat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Seat {}", self.0)
    }
}

/// Per-seat data storage with O(1) access.
///
/// ## Example
///
/// ```
/// use mahjong_engine::core::{Seat, SeatMap};
///
/// let mut scores: SeatMap<i64> = SeatMap::new(|_| 0);
/// scores[Seat::new(2)] += 100;
/// assert_eq!(scores[Seat::new(2)], 100);
/// assert_eq!(scores[Seat::new(0)], 0);
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SeatMap<T> {
    data: [T; SEAT_COUNT],
}

impl<T> SeatMap<T> {
    /// Create a new SeatMap with values from a factory function.
    pub fn new(factory: impl Fn(Seat) -> T) -> Self {
        Self {
            data: std::array::from_fn(|i| factory(Seat(i as u8))),
        }
    }

    /// Create a new SeatMap with all entries set to the same value.
    pub fn with_value(value: T) -> Self
    where
        T: Clone,
    {
        Self::new(|_| value.clone())
    }

    /// Get a reference to a seat's data.
    #[must_use]
    pub fn get(&self, seat: Seat) -> &T {
        &self.data[seat.index()]
    }

    /// Get a mutable reference to a seat's data.
    pub fn get_mut(&mut self, seat: Seat) -> &mut T {
        &mut self.data[seat.index()]
    }

    /// Iterate over (Seat, &T) pairs.
    pub fn iter(&self) -> impl Iterator<Item = (Seat, &T)> {
        self.data
            .iter()
            .enumerate()
            .map(|(i, v)| (Seat(i as u8), v))
    }

    /// Iterate over (Seat, &mut T) pairs.
    pub fn iter_mut(&mut self) -> impl Iterator<Item = (Seat, &mut T)> {
        self.data
            .iter_mut()
            .enumerate()
            .map(|(i, v)| (Seat(i as u8), v))
    }

    /// Iterate over the values in seat order.
    pub fn values(&self) -> impl Iterator<Item = &T> {
        self.data.iter()
    }
}

impl<T: Default> Default for SeatMap<T> {
    fn default() -> Self {
        Self::new(|_| T::default())
    }
}

impl<T> Index<Seat> for SeatMap<T> {
    type Output = T;

    fn index(&self, seat: Seat) -> &Self::Output {
        self.get(seat)
    }
}

impl<T> IndexMut<Seat> for SeatMap<T> {
    fn index_mut(&mut self, seat: Seat) -> &mut Self::Output {
        self.get_mut(seat)
    }
}
