//! Candidate move generation with one-ply ordering
//!
//! Only empty cells near existing stones are considered. Each candidate is
//! scored by the best line it would make for the mover and the best line it
//! would take away from the opponent, so that wins and forced blocks come
//! first and alpha-beta prunes early.

use crate::board::{Board, Pos, Stone, AXES, BOARD_SIZE, TOTAL_CELLS};
use crate::eval::score_run;
use crate::rules::win::count_direction;

use super::options::SearchOptions;

/// Ordering score for a move that completes five for the mover.
pub const WIN_MOVE: i32 = 1_000_000_000;
/// Ordering score for a move that stops the opponent's five.
pub const BLOCK_MOVE: i32 = 900_000_000;

/// Attack weight in tenths: own shapes count 1.1x the opponent's.
const ATTACK_WEIGHT_TENTHS: i32 = 11;

/// Tiebreak for cells close to the center.
const CENTER_BONUS: i32 = (BOARD_SIZE / 2) as i32;

/// A candidate and its ordering score.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScoredMove {
    pub pos: Pos,
    pub score: i32,
}

/// Move generator parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MoveGenConfig {
    /// Chebyshev radius around stones
    pub neighbor_distance: u8,
    /// Maximum candidates returned
    pub move_cap: usize,
}

impl Default for MoveGenConfig {
    fn default() -> Self {
        Self {
            neighbor_distance: 2,
            move_cap: 20,
        }
    }
}

impl MoveGenConfig {
    /// Neighborhood radius, kept within what the board can use.
    #[allow(clippy::cast_possible_truncation)]
    pub fn radius(&self) -> i32 {
        i32::from(self.neighbor_distance.clamp(1, (BOARD_SIZE - 1) as u8))
    }
}

impl From<&SearchOptions> for MoveGenConfig {
    fn from(opts: &SearchOptions) -> Self {
        Self {
            neighbor_distance: opts.neighbor_distance,
            move_cap: opts.move_cap,
        }
    }
}

/// Generate candidate moves for `color`, best first, at most `move_cap` of them.
///
/// An empty board yields the center only. A full board yields nothing.
/// Ties keep scan order, so the result is deterministic.
pub fn generate_moves(board: &Board, color: Stone, config: MoveGenConfig) -> Vec<ScoredMove> {
    if board.is_board_empty() {
        return vec![ScoredMove {
            pos: Pos::center(),
            score: 0,
        }];
    }

    let near = neighborhood(board, config.radius());
    let opponent = color.opponent();

    let mut scored: Vec<ScoredMove> = (0..TOTAL_CELLS)
        .filter(|&idx| near[idx])
        .map(Pos::from_index)
        .filter(|&pos| board.is_empty(pos))
        .map(|pos| ScoredMove {
            pos,
            score: score_move(board, pos, color, opponent),
        })
        .collect();

    // Stable: equal scores stay in scan order
    scored.sort_by(|a, b| b.score.cmp(&a.score));
    scored.truncate(config.move_cap.max(1));
    scored
}

/// Mark every cell within `radius` (Chebyshev) of an occupied cell.
fn neighborhood(board: &Board, radius: i32) -> [bool; TOTAL_CELLS] {
    let mut near = [false; TOTAL_CELLS];
    for stone in board.occupied().iter_ones() {
        for dy in -radius..=radius {
            for dx in -radius..=radius {
                if let Some(p) = stone.offset(dx, dy, 1) {
                    near[p.to_index()] = true;
                }
            }
        }
    }
    near
}

/// One-ply lookahead score of placing at `pos`.
fn score_move(board: &Board, pos: Pos, color: Stone, opponent: Stone) -> i32 {
    let (my_len, my_shape) = best_line(board, pos, color);
    if my_len >= 5 {
        return WIN_MOVE;
    }
    let (opp_len, opp_shape) = best_line(board, pos, opponent);
    if opp_len >= 5 {
        return BLOCK_MOVE;
    }

    my_shape.saturating_mul(ATTACK_WEIGHT_TENTHS) / 10
        + opp_shape
        + (CENTER_BONUS - pos.center_distance())
}

/// Best (length, shape score) over the 4 axes if `color` played at `pos`.
#[inline]
fn best_line(board: &Board, pos: Pos, color: Stone) -> (i32, i32) {
    let mut best_len = 0;
    let mut best_shape = 0;
    for &(dx, dy) in &AXES {
        let forward = count_direction(board, pos, dx, dy, color);
        let back = count_direction(board, pos, -dx, -dy, color);
        let len = 1 + forward + back;

        let mut open_ends = 0;
        if pos
            .offset(dx, dy, forward + 1)
            .is_some_and(|p| board.is_empty(p))
        {
            open_ends += 1;
        }
        if pos
            .offset(-dx, -dy, back + 1)
            .is_some_and(|p| board.is_empty(p))
        {
            open_ends += 1;
        }

        best_len = best_len.max(len);
        best_shape = best_shape.max(score_run(len, open_ends));
    }
    (best_len, best_shape)
}
