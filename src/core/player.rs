//! Per-seat player record.

use serde::{Deserialize, Serialize};

use super::seat::Seat;
use crate::tiles::Hand;

/// One seated player.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Player {
    pub name: String,
    pub seat: Seat,
    pub hand: Hand,
    pub score: i64,
    pub is_human: bool,
    pub has_won: bool,
}

impl Player {
    /// Create a player with an empty hand and zero score.
    pub fn new(name: impl Into<String>, seat: Seat, is_human: bool) -> Self {
        Self {
            name: name.into(),
            seat,
            hand: Hand::new(),
            score: 0,
            is_human,
            has_won: false,
        }
    }
}
