//! Win condition checking for free-style Gomoku
//!
//! Five or more stones in a row wins. Overlines count, and the rule is the
//! same for both colors.

use crate::board::{Board, Pos, Stone, AXES};

/// A completed line of five.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Win {
    pub winner: Stone,
    /// First five cells of the winning run, in axis order.
    pub line: [Pos; 5],
}

/// Count stones of `color` contiguous to `pos` along `(dx, dy)`, not counting `pos`.
#[inline]
pub(crate) fn count_direction(board: &Board, pos: Pos, dx: i32, dy: i32, color: Stone) -> i32 {
    let mut count = 0;
    let mut step = 1;
    while let Some(p) = pos.offset(dx, dy, step) {
        if board.get(p) != color {
            break;
        }
        count += 1;
        step += 1;
    }
    count
}

/// Fast five-in-a-row check at a specific position.
///
/// Only checks the 4 axes through `pos`. No allocation; this runs at every
/// search node.
#[inline]
pub fn has_five_at_pos(board: &Board, pos: Pos, color: Stone) -> bool {
    if color == Stone::Empty {
        return false;
    }
    AXES.iter().any(|&(dx, dy)| {
        1 + count_direction(board, pos, dx, dy, color) + count_direction(board, pos, -dx, -dy, color)
            >= 5
    })
}

/// Check whether the stone at `last_move` completed a five.
///
/// Returns the winner and the winning line, or `None`.
pub fn check_win(board: &Board, last_move: Pos) -> Option<Win> {
    let color = board.get(last_move);
    if color == Stone::Empty {
        return None;
    }

    for &(dx, dy) in &AXES {
        let back = count_direction(board, last_move, -dx, -dy, color);
        let forward = count_direction(board, last_move, dx, dy, color);
        if 1 + back + forward >= 5 {
            // Walk from the back end of the run
            let start = last_move.offset(-dx, -dy, back)?;
            let mut line = [start; 5];
            for (i, cell) in line.iter_mut().enumerate().skip(1) {
                #[allow(clippy::cast_possible_truncation, clippy::cast_possible_wrap)]
                let step = i as i32;
                *cell = start.offset(dx, dy, step)?;
            }
            return Some(Win { winner: color, line });
        }
    }
    None
}

/// Whole-board scan for a winner, used when no last move is known.
pub fn find_winner(board: &Board) -> Option<Win> {
    board.occupied().iter_ones().find_map(|pos| check_win(board, pos))
}

/// A move is valid if it is on the board and the cell is empty.
#[inline]
pub fn is_valid_move(board: &Board, x: i32, y: i32) -> bool {
    Pos::try_new(x, y).is_some_and(|p| board.is_empty(p))
}
