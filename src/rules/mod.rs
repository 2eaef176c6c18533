//! Hand evaluation rules.
//!
//! `HandEvaluator` answers the rule questions the claim resolver and turn
//! controller ask:
//! - Is this a complete winning hand (hu)?
//! - Can a seat peng, gang, or chi a given discard?
//! - Does a concealed hand hold a quad?
//!
//! Evaluation is read-only; callers own all mutation.

pub mod evaluator;

pub use evaluator::{ChiPair, HandEvaluator};
