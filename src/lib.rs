//! Gomoku AI Engine for free-style Gomoku
//!
//! A move-search engine for free-style Gomoku:
//! - 15x15 board
//! - 5-in-a-row to win (overlines allowed)
//! - No captures and no forbidden moves
//!
//! # Architecture
//!
//! The engine is organized into several modules:
//! - [`board`]: Board representation with bitboards
//! - [`rules`]: Win detection
//! - [`eval`]: Position evaluation and heuristics
//! - [`search`]: Move generation and alpha-beta search
//! - [`worker`]: Off-thread search with progress, cancellation and a JSON protocol
//! - [`game`]: Canonical game state the search results are applied to
//!
//! # Quick Start
//!
//! ```
//! use gomoku_ai::{Game, SearchOptions, SearchOutcome, search_best_move};
//!
//! let mut game = Game::new();
//! game.play(7, 7).unwrap();
//!
//! // Engine answers as White
//! let opts = SearchOptions::with_config(2, 500);
//! let outcome = search_best_move(game.board(), game.current(), &opts);
//! if let SearchOutcome::Found(result) = &outcome {
//!     println!("AI plays at {}", result.best_move);
//! }
//! game.apply_outcome(&outcome).unwrap();
//! ```
//!
//! # Search
//!
//! For each request the engine:
//! 1. Plays an immediate five if one exists
//! 2. Deepens a negamax alpha-beta search one ply at a time
//! 3. Keeps the last fully completed depth when the time budget runs out
//! 4. Stops with no move as soon as its cancel token is tripped

pub mod board;
pub mod error;
pub mod eval;
pub mod game;
pub mod rules;
pub mod search;
pub mod worker;

// Re-export commonly used types for convenience
pub use board::{Board, Pos, Stone, BOARD_SIZE};
pub use error::GameError;
pub use game::{Game, GameStatus, Move};
pub use search::{
    search_best_move, CancelToken, SearchOptions, SearchOutcome, SearchResult, Searcher,
};
pub use worker::{spawn_search, SearchHandle, SearchRequest, SearchWorker, WorkerMessage};
