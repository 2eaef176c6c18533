//! Engine error type.
//!
//! Gameplay rejections are not errors: they are reported as
//! `CommandOutcome::Ignored`. `EngineError` covers configuration problems,
//! tile parsing, and invariant faults that a correct engine never reaches.

use crate::core::Seat;

/// Result alias used throughout the engine.
pub type EngineResult<T> = Result<T, EngineError>;

/// Errors raised by configuration, parsing, and invariant checks.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum EngineError {
    /// Configuration rejected by `EngineConfig::validate`.
    InvalidConfig(String),
    /// A tile label could not be parsed.
    ParseTile(String),
    /// A `(kind, rank)` face has the wrong number of physical copies.
    PopulationMismatch {
        face: String,
        expected: usize,
        found: usize,
    },
    /// Tiles were created or lost while moving between containers.
    TileConservation { expected: usize, found: usize },
    /// A hand's effective size left the {13, 14} range.
    HandSize { seat: Seat, size: usize },
}

impl std::fmt::Display for EngineError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            EngineError::InvalidConfig(msg) => write!(f, "invalid config: {msg}"),
            EngineError::ParseTile(label) => write!(f, "cannot parse tile '{label}'"),
            EngineError::PopulationMismatch {
                face,
                expected,
                found,
            } => write!(f, "tile {face}: expected {expected} copies, found {found}"),
            EngineError::TileConservation { expected, found } => {
                write!(f, "tile conservation broken: expected {expected}, found {found}")
            }
            EngineError::HandSize { seat, size } => {
                write!(f, "{seat} holds an effective hand of {size} tiles")
            }
        }
    }
}

impl std::error::Error for EngineError {}
