//! Search module for Gomoku AI
//!
//! Contains:
//! - Search options and the shared cancellation token
//! - Candidate generation with one-ply move ordering
//! - Alpha-Beta search with iterative deepening

pub mod alphabeta;
pub mod movegen;
pub mod options;

pub use alphabeta::{
    search_best_move, SearchOutcome, SearchProgress, SearchResult, SearchStats, Searcher,
    WIN_SCORE, WIN_THRESHOLD,
};
pub use movegen::{generate_moves, MoveGenConfig, ScoredMove};
pub use options::{CancelToken, SearchOptions};
