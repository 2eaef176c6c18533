//! Decision policies for computer-controlled seats.
//!
//! The turn controller consults a `SeatStrategy` synchronously whenever a
//! non-human seat must discard, may claim, or may declare a self-drawn win.
//! `CountingStrategy` is the default heuristic; it has no lookahead.

pub mod strategy;

pub use strategy::{CountingStrategy, SeatStrategy};
