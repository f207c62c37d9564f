//! Error type shared by the board, game state and worker layers.

use thiserror::Error;

use crate::board::Pos;

/// Errors raised synchronously by the public API.
///
/// Nothing in here is produced mid-search: cancellation and timeouts are
/// ordinary search outcomes, not errors.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GameError {
    /// Placement outside the grid.
    #[error("invalid move ({x}, {y}): out of bounds")]
    OutOfBounds { x: i32, y: i32 },

    /// Placement on an occupied cell.
    #[error("invalid move {0}: cell is occupied")]
    Occupied(Pos),

    /// Placing an `Empty` stone is never a move.
    #[error("invalid move {0}: no player given")]
    NoPlayer(Pos),

    /// A grid handed in from outside has the wrong shape or cell values.
    #[error("invalid board: {0}")]
    InvalidBoard(String),

    /// Player number other than 1 or 2.
    #[error("invalid player {0}: expected 1 or 2")]
    InvalidPlayer(u8),

    /// A search option outside its accepted range.
    #[error("invalid option {name}: {value}")]
    InvalidOption { name: &'static str, value: String },

    /// The game already has a winner or the board is full.
    #[error("game is over")]
    GameOver,

    /// Undo requested with an empty move history.
    #[error("nothing to undo")]
    NothingToUndo,
}

impl GameError {
    /// True for the placement errors grouped as "invalid move".
    pub fn is_invalid_move(&self) -> bool {
        matches!(
            self,
            GameError::OutOfBounds { .. } | GameError::Occupied(_) | GameError::NoPlayer(_)
        )
    }
}
