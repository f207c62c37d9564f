//! Game rules for free-style Gomoku
//!
//! Five or more in a row wins for either side; there are no captures and
//! no forbidden moves.

pub mod win;

// Re-exports for convenient access
pub use win::{check_win, find_winner, has_five_at_pos, is_valid_move, Win};
