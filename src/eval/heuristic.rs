//! Heuristic evaluation function for Gomoku board positions
//!
//! Static leaf value for the negamax search. Every run of stones is scored
//! once per axis by length and open ends, then the two sides are compared
//! with a configurable weight on the opponent's total.

use crate::board::{Board, Pos, Stone, AXES};

use super::patterns::score_run;

/// Default weight applied to the opponent's pattern total.
/// Slightly above 1.0 so that equal threats favor defending.
pub const DEFAULT_OPPONENT_WEIGHT: f64 = 1.05;

/// Static scores are clamped to this magnitude, strictly below the
/// search's proven-win band.
pub const MAX_EVAL: i32 = 500_000_000;

/// Evaluate the board from the perspective of the given color.
///
/// Positive values favor `color`. Uses [`DEFAULT_OPPONENT_WEIGHT`].
#[must_use]
pub fn evaluate(board: &Board, color: Stone) -> i32 {
    evaluate_weighted(board, color, DEFAULT_OPPONENT_WEIGHT)
}

/// Evaluate with an explicit opponent weight `k`:
/// `own patterns - floor(opponent patterns * k)`.
#[must_use]
#[allow(clippy::cast_possible_truncation)]
pub fn evaluate_weighted(board: &Board, color: Stone, opponent_weight: f64) -> i32 {
    if color == Stone::Empty {
        return 0;
    }
    let own = evaluate_patterns(board, color);
    let opp = evaluate_patterns(board, color.opponent());
    let opp_weighted = (opp as f64 * opponent_weight).floor() as i64;
    (own - opp_weighted).clamp(-i64::from(MAX_EVAL), i64::from(MAX_EVAL)) as i32
}

/// Sum of run scores for one color.
///
/// A run is only scored from its start cell (the axis predecessor is not the
/// same color), so each run is counted exactly once per axis.
fn evaluate_patterns(board: &Board, color: Stone) -> i64 {
    let Some(stones) = board.stones(color) else {
        return 0;
    };

    let mut score = 0i64;
    for pos in stones.iter_ones() {
        for &(dx, dy) in &AXES {
            let prev = pos.offset(-dx, -dy, 1);
            if prev.is_some_and(|p| board.get(p) == color) {
                continue;
            }
            let (len, open_ends) = measure_run(board, pos, dx, dy, color, prev);
            score += i64::from(score_run(len, open_ends));
        }
    }
    score
}

/// Length of the run starting at `start` and its open-end count.
#[inline]
fn measure_run(
    board: &Board,
    start: Pos,
    dx: i32,
    dy: i32,
    color: Stone,
    prev: Option<Pos>,
) -> (i32, i32) {
    let mut len = 1;
    while start
        .offset(dx, dy, len)
        .is_some_and(|p| board.get(p) == color)
    {
        len += 1;
    }

    let mut open_ends = 0;
    if prev.is_some_and(|p| board.is_empty(p)) {
        open_ends += 1;
    }
    if start.offset(dx, dy, len).is_some_and(|p| board.is_empty(p)) {
        open_ends += 1;
    }
    (len, open_ends)
}
