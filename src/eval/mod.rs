//! Position evaluation
//!
//! - [`patterns`]: run classification table
//! - [`heuristic`]: whole-board static evaluation

pub mod heuristic;
pub mod patterns;

pub use heuristic::{evaluate, evaluate_weighted, DEFAULT_OPPONENT_WEIGHT, MAX_EVAL};
pub use patterns::{score_run, PatternScore};
