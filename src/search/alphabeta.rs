//! Alpha-Beta search with iterative deepening
//!
//! This module implements the core search algorithm for the Gomoku AI.
//! It uses negamax with alpha-beta pruning over a single board that is
//! mutated in place: every move is applied before descending and undone
//! before the next sibling, on every return path.
//!
//! # Features
//!
//! - Iterative deepening; only fully completed depths are trusted
//! - Principal-variation ordering of the root from the previous depth
//! - Immediate-win shortcut before the depth loop
//! - Deadline and cancellation polled at every node
//! - Terminal scores shaped by ply, preferring fast wins and slow losses
//!
//! # Example
//!
//! ```
//! use gomoku_ai::board::{Board, Pos, Stone};
//! use gomoku_ai::search::{SearchOptions, SearchOutcome, Searcher};
//!
//! let mut board = Board::new();
//! board.apply(Pos::new(7, 7), Stone::Black);
//!
//! let mut searcher = Searcher::new(SearchOptions::with_config(2, 200));
//! if let SearchOutcome::Found(result) = searcher.search(&board, Stone::White) {
//!     println!("Best move: {}", result.best_move);
//! }
//! ```

use std::time::{Duration, Instant};

use log::{debug, info, warn};

use crate::board::{Board, Pos, Stone};
use crate::eval::evaluate_weighted;
use crate::rules::has_five_at_pos;

use super::movegen::{generate_moves, MoveGenConfig};
use super::options::{CancelToken, SearchOptions};

/// Score of a proven win at the root. A win found `ply` moves deep scores
/// `WIN_SCORE - ply`.
pub const WIN_SCORE: i32 = 1_000_000_000;

/// Scores at or beyond this magnitude are proven wins or losses.
pub const WIN_THRESHOLD: i32 = WIN_SCORE - 1_000;

/// Infinity score for alpha-beta bounds
const INF: i32 = WIN_SCORE + 1;

/// Search statistics for diagnostics and tuning.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SearchStats {
    /// Nodes visited, root excluded
    pub nodes: u64,
    /// Total beta cutoffs (fail-high)
    pub beta_cutoffs: u64,
    /// Beta cutoffs on the first move tried (measures move ordering quality)
    pub first_move_cutoffs: u64,
}

impl SearchStats {
    /// First-move cutoff rate in percent
    pub fn first_move_rate(&self) -> f64 {
        if self.beta_cutoffs == 0 {
            0.0
        } else {
            self.first_move_cutoffs as f64 / self.beta_cutoffs as f64 * 100.0
        }
    }
}

/// Result of a search that produced a move.
#[derive(Debug, Clone, PartialEq)]
pub struct SearchResult {
    /// Move to play
    pub best_move: Pos,
    /// Score of the move from the mover's perspective
    pub score: i32,
    /// Deepest fully completed iteration (0 for the fallback move)
    pub depth: u8,
    /// Wall-clock time spent
    pub elapsed: Duration,
    /// Search diagnostics
    pub stats: SearchStats,
}

impl SearchResult {
    /// True when the score is a proven win for the mover.
    pub fn is_win(&self) -> bool {
        self.score >= WIN_THRESHOLD
    }

    /// True when every candidate loses by force.
    pub fn is_loss(&self) -> bool {
        self.score <= -WIN_THRESHOLD
    }
}

/// Terminal outcome of one search invocation.
#[derive(Debug, Clone, PartialEq)]
pub enum SearchOutcome {
    /// A legal move was chosen.
    Found(SearchResult),
    /// The cancel token tripped; no move is reported.
    Cancelled,
    /// The board is full.
    NoLegalMove,
}

impl SearchOutcome {
    /// The chosen move, if any.
    pub fn best_move(&self) -> Option<Pos> {
        match self {
            SearchOutcome::Found(result) => Some(result.best_move),
            _ => None,
        }
    }
}

/// Snapshot emitted after each completed depth.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SearchProgress {
    pub depth: u8,
    pub best_move: Pos,
    pub score: i32,
    pub nodes: u64,
}

/// Why a depth iteration stopped before finishing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Interrupt {
    Cancelled,
    TimedOut,
}

type ProgressFn<'a> = Box<dyn FnMut(&SearchProgress) + Send + 'a>;

/// Negamax alpha-beta searcher.
///
/// One searcher runs one search at a time. The board it searches is either
/// a private clone ([`Searcher::search`]) or borrowed exclusively for the
/// call ([`Searcher::search_in_place`]); either way it is restored exactly
/// before the call returns.
pub struct Searcher<'a> {
    options: SearchOptions,
    movegen: MoveGenConfig,
    cancel: CancelToken,
    deadline: Instant,
    stats: SearchStats,
    progress: Option<ProgressFn<'a>>,
}

impl<'a> Searcher<'a> {
    #[must_use]
    pub fn new(options: SearchOptions) -> Self {
        let movegen = MoveGenConfig::from(&options);
        Self {
            options,
            movegen,
            cancel: CancelToken::new(),
            deadline: Instant::now(),
            stats: SearchStats::default(),
            progress: None,
        }
    }

    /// Use an externally owned cancel token.
    #[must_use]
    pub fn with_cancel(mut self, token: CancelToken) -> Self {
        self.cancel = token;
        self
    }

    /// Register a callback invoked after each completed depth.
    #[must_use]
    pub fn on_progress(mut self, callback: impl FnMut(&SearchProgress) + Send + 'a) -> Self {
        self.progress = Some(Box::new(callback));
        self
    }

    pub fn options(&self) -> &SearchOptions {
        &self.options
    }

    /// Token that cancels this searcher's current and future searches.
    pub fn cancel_token(&self) -> CancelToken {
        self.cancel.clone()
    }

    /// Search a private copy of `board` for the best move for `color`.
    pub fn search(&mut self, board: &Board, color: Stone) -> SearchOutcome {
        let mut work_board = board.clone();
        self.search_in_place(&mut work_board, color)
    }

    /// Search `board` in place. The board is bit-identical on return,
    /// whatever the outcome.
    pub fn search_in_place(&mut self, board: &mut Board, color: Stone) -> SearchOutcome {
        debug_assert!(color != Stone::Empty, "search needs a side to move");
        let start = Instant::now();
        self.deadline = start + self.options.time_budget;
        self.stats = SearchStats::default();
        let stones_before = board.stone_count();

        if self.cancel.is_cancelled() {
            debug!("search cancelled before start");
            return SearchOutcome::Cancelled;
        }
        let Some(fallback) = board.first_empty() else {
            info!("board is full, no legal move");
            return SearchOutcome::NoLegalMove;
        };

        let mut root_moves: Vec<Pos> = generate_moves(board, color, self.movegen)
            .into_iter()
            .map(|m| m.pos)
            .collect();

        if let Some(win) = find_immediate_win(board, color, &root_moves) {
            debug!("immediate win at {}", win);
            return SearchOutcome::Found(self.result(win, WIN_SCORE, 1, start));
        }

        let mut best: Option<(Pos, i32, u8)> = None;
        if !root_moves.is_empty() {
            for depth in 1..=self.options.max_depth.max(1) {
                if let Some((pv, _, _)) = best {
                    move_to_front(&mut root_moves, pv);
                }

                match self.search_root(board, color, depth, &root_moves) {
                    Ok((mov, score)) => {
                        best = Some((mov, score, depth));
                        debug!(
                            "depth {} complete: best {} score {} nodes {} ({:?})",
                            depth,
                            mov,
                            score,
                            self.stats.nodes,
                            start.elapsed()
                        );
                        let nodes = self.stats.nodes;
                        if let Some(callback) = self.progress.as_mut() {
                            callback(&SearchProgress {
                                depth,
                                best_move: mov,
                                score,
                                nodes,
                            });
                        }
                        if score.abs() >= WIN_THRESHOLD {
                            break;
                        }
                    }
                    Err(Interrupt::Cancelled) => {
                        debug_assert_eq!(board.stone_count(), stones_before);
                        info!("search cancelled during depth {}", depth);
                        return SearchOutcome::Cancelled;
                    }
                    Err(Interrupt::TimedOut) => {
                        debug!("depth {} timed out, keeping previous depth", depth);
                        break;
                    }
                }
            }
        }
        debug_assert_eq!(board.stone_count(), stones_before);

        let result = match best {
            Some((mov, score, depth)) => self.result(mov, score, depth, start),
            None => {
                warn!("no depth completed, falling back to first empty cell {}", fallback);
                self.result(fallback, 0, 0, start)
            }
        };
        info!(
            "search done: {} score {} depth {} nodes {} in {:?}",
            result.best_move, result.score, result.depth, result.stats.nodes, result.elapsed
        );
        SearchOutcome::Found(result)
    }

    fn result(&self, best_move: Pos, score: i32, depth: u8, start: Instant) -> SearchResult {
        SearchResult {
            best_move,
            score,
            depth,
            elapsed: start.elapsed(),
            stats: self.stats.clone(),
        }
    }

    /// Deadline and cancellation check, run at every node.
    #[inline]
    fn check_interrupt(&self) -> Result<(), Interrupt> {
        if self.cancel.is_cancelled() {
            Err(Interrupt::Cancelled)
        } else if Instant::now() >= self.deadline {
            Err(Interrupt::TimedOut)
        } else {
            Ok(())
        }
    }

    /// Root-level search with full alpha-beta window.
    fn search_root(
        &mut self,
        board: &mut Board,
        color: Stone,
        depth: u8,
        moves: &[Pos],
    ) -> Result<(Pos, i32), Interrupt> {
        self.check_interrupt()?;

        let mut alpha = -INF;
        let mut best_move = moves[0];
        let mut best_score = -INF;

        for &mov in moves {
            board.apply(mov, color);
            let child = self.alpha_beta(board, color.opponent(), depth - 1, 1, -INF, -alpha, mov);
            board.undo(mov);
            let score = -child?;

            if score > best_score {
                best_score = score;
                best_move = mov;
            }
            alpha = alpha.max(score);
        }

        Ok((best_move, best_score))
    }

    /// Recursive alpha-beta search with negamax formulation.
    ///
    /// `last_move` produced this node; `ply` is its distance from the root.
    #[allow(clippy::too_many_arguments)]
    fn alpha_beta(
        &mut self,
        board: &mut Board,
        color: Stone,
        depth: u8,
        ply: i32,
        mut alpha: i32,
        beta: i32,
        last_move: Pos,
    ) -> Result<i32, Interrupt> {
        self.stats.nodes += 1;
        self.check_interrupt()?;

        // Terminal: the side that just moved made five
        if has_five_at_pos(board, last_move, color.opponent()) {
            return Ok(-(WIN_SCORE - ply));
        }

        if depth == 0 {
            return Ok(evaluate_weighted(board, color, self.options.opponent_weight));
        }

        let moves = generate_moves(board, color, self.movegen);
        if moves.is_empty() {
            // Full board: draw
            return Ok(0);
        }

        let mut best_score = -INF;
        for (i, candidate) in moves.iter().enumerate() {
            let mov = candidate.pos;
            board.apply(mov, color);
            let child = self.alpha_beta(board, color.opponent(), depth - 1, ply + 1, -beta, -alpha, mov);
            board.undo(mov);
            let score = -child?;

            if score > best_score {
                best_score = score;
            }
            if score > alpha {
                alpha = score;
            }
            if alpha >= beta {
                self.stats.beta_cutoffs += 1;
                if i == 0 {
                    self.stats.first_move_cutoffs += 1;
                }
                break;
            }
        }

        Ok(best_score)
    }
}

/// Search a private copy of `board` with a fresh cancel token.
pub fn search_best_move(board: &Board, color: Stone, options: &SearchOptions) -> SearchOutcome {
    Searcher::new(options.clone()).search(board, color)
}

/// First root candidate that completes five for `color`.
///
/// Only the capped candidate list is checked. Winning moves always survive
/// the cap because they carry the top ordering score.
fn find_immediate_win(board: &mut Board, color: Stone, moves: &[Pos]) -> Option<Pos> {
    moves.iter().copied().find(|&mov| {
        board.apply(mov, color);
        let wins = has_five_at_pos(board, mov, color);
        board.undo(mov);
        wins
    })
}

/// Move `pv` to the front, keeping the rest in order.
fn move_to_front(moves: &mut [Pos], pv: Pos) {
    if let Some(i) = moves.iter().position(|&m| m == pv) {
        moves[..=i].rotate_right(1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::thread;

    fn quiet() -> Board {
        let mut board = Board::new();
        board.apply(Pos::new(7, 7), Stone::Black);
        board.apply(Pos::new(8, 8), Stone::White);
        board
    }

    fn midgame() -> Board {
        let mut board = Board::new();
        let moves = [
            (7, 7, Stone::Black),
            (8, 8, Stone::White),
            (6, 7, Stone::Black),
            (8, 7, Stone::White),
            (6, 6, Stone::Black),
            (8, 6, Stone::White),
        ];
        for (x, y, stone) in moves {
            board.apply(Pos::new(x, y), stone);
        }
        board
    }

    #[test]
    fn test_search_empty_board() {
        let outcome = search_best_move(&Board::new(), Stone::Black, &SearchOptions::with_config(2, 500));
        assert_eq!(outcome.best_move(), Some(Pos::new(7, 7)));
    }

    #[test]
    fn test_search_finds_winning_move() {
        let mut board = Board::new();
        for x in 3..7 {
            board.apply(Pos::new(x, 7), Stone::Black);
        }

        let SearchOutcome::Found(result) =
            search_best_move(&board, Stone::Black, &SearchOptions::with_config(1, 1000))
        else {
            panic!("expected a move");
        };
        assert!(result.best_move == Pos::new(2, 7) || result.best_move == Pos::new(7, 7));
        assert_eq!(result.score, WIN_SCORE);
        assert!(result.is_win());
    }

    #[test]
    fn test_winning_move_survives_move_cap() {
        let mut board = Board::new();
        board.apply(Pos::new(0, 0), Stone::White);
        board.apply(Pos::new(1, 0), Stone::White);
        for x in 3..7 {
            board.apply(Pos::new(x, 10), Stone::Black);
        }

        let opts = SearchOptions::with_config(2, 1000).with_move_cap(1);
        let SearchOutcome::Found(result) = search_best_move(&board, Stone::Black, &opts) else {
            panic!("expected a move");
        };
        assert!(result.best_move == Pos::new(2, 10) || result.best_move == Pos::new(7, 10));
        assert_eq!(result.score, WIN_SCORE);
    }

    #[test]
    fn test_search_blocks_opponent_win() {
        let mut board = Board::new();
        for x in 3..7 {
            board.apply(Pos::new(x, 7), Stone::White);
        }
        board.apply(Pos::new(2, 7), Stone::Black);

        for depth in 1..=3 {
            let outcome =
                search_best_move(&board, Stone::Black, &SearchOptions::with_config(depth, 2000));
            assert_eq!(outcome.best_move(), Some(Pos::new(7, 7)), "depth {}", depth);
        }
    }

    #[test]
    fn test_immediate_win_preferred_over_open_four() {
        // Black can win now on row 7, or build an open four on row 3
        let mut board = Board::new();
        for x in 3..7 {
            board.apply(Pos::new(x, 7), Stone::Black);
        }
        board.apply(Pos::new(2, 7), Stone::White);
        for x in 4..7 {
            board.apply(Pos::new(x, 3), Stone::Black);
        }
        board.apply(Pos::new(0, 14), Stone::White);
        board.apply(Pos::new(14, 14), Stone::White);

        let mut searcher = Searcher::new(SearchOptions::with_config(3, 2000));
        let outcome = searcher.search(&board, Stone::Black);
        assert_eq!(outcome.best_move(), Some(Pos::new(7, 7)));
    }

    #[test]
    fn test_loss_score_is_shaped_by_ply() {
        // White has an open four; Black can only block one end
        let mut board = Board::new();
        for x in 3..7 {
            board.apply(Pos::new(x, 7), Stone::White);
        }
        board.apply(Pos::new(0, 0), Stone::Black);

        let mut searcher = Searcher::new(SearchOptions::with_config(2, 2000));
        let SearchOutcome::Found(result) = searcher.search(&board, Stone::Black) else {
            panic!("expected a move");
        };
        // Whatever Black blocks, White completes five two plies down
        assert_eq!(result.score, -(WIN_SCORE - 2));
        assert!(result.is_loss());
    }

    #[test]
    fn test_board_restored_after_completed_search() {
        let mut board = midgame();
        let snapshot = board.clone();
        let mut searcher = Searcher::new(SearchOptions::with_config(3, 5000));
        let outcome = searcher.search_in_place(&mut board, Stone::Black);
        assert!(matches!(outcome, SearchOutcome::Found(_)));
        assert_eq!(board, snapshot);
    }

    #[test]
    fn test_board_restored_after_timeout() {
        let mut board = quiet();
        let snapshot = board.clone();
        let opts = SearchOptions::with_config(12, 20);
        let mut searcher = Searcher::new(opts);
        let outcome = searcher.search_in_place(&mut board, Stone::Black);
        assert!(matches!(outcome, SearchOutcome::Found(_)));
        assert_eq!(board, snapshot);
    }

    #[test]
    fn test_board_restored_after_cancel() {
        let mut board = quiet();
        let snapshot = board.clone();
        let token = CancelToken::new();
        let canceller = token.clone();
        let handle = thread::spawn(move || {
            thread::sleep(Duration::from_millis(20));
            canceller.cancel();
        });

        let mut searcher =
            Searcher::new(SearchOptions::with_config(12, 30_000)).with_cancel(token);
        let outcome = searcher.search_in_place(&mut board, Stone::Black);
        handle.join().expect("canceller thread");

        assert_eq!(outcome, SearchOutcome::Cancelled);
        assert_eq!(board, snapshot);
    }

    #[test]
    fn test_cancel_before_start_yields_no_move() {
        let token = CancelToken::new();
        token.cancel();
        let mut searcher = Searcher::new(SearchOptions::default()).with_cancel(token);
        assert_eq!(searcher.search(&midgame(), Stone::Black), SearchOutcome::Cancelled);
    }

    #[test]
    fn test_zero_budget_falls_back_to_first_empty() {
        let board = midgame();
        let opts = SearchOptions::default().with_time_budget(Duration::ZERO);
        let SearchOutcome::Found(result) = search_best_move(&board, Stone::Black, &opts) else {
            panic!("expected fallback move");
        };
        assert_eq!(result.best_move, Pos::new(0, 0));
        assert_eq!(result.score, 0);
        assert_eq!(result.depth, 0);
    }

    #[test]
    fn test_full_board_has_no_legal_move() {
        let mut board = Board::new();
        for (i, pos) in board.empty_cells().collect::<Vec<_>>().into_iter().enumerate() {
            board.apply(pos, if i % 2 == 0 { Stone::Black } else { Stone::White });
        }
        assert_eq!(
            search_best_move(&board, Stone::Black, &SearchOptions::default()),
            SearchOutcome::NoLegalMove
        );
    }

    #[test]
    fn test_progress_reports_each_depth() {
        let mut depths = Vec::new();
        {
            let mut searcher = Searcher::new(SearchOptions::with_config(3, 10_000))
                .on_progress(|p| depths.push(p.depth));
            let outcome = searcher.search(&midgame(), Stone::Black);
            assert!(matches!(outcome, SearchOutcome::Found(ref r) if r.depth == 3));
        }
        assert_eq!(depths, vec![1, 2, 3]);
    }

    #[test]
    fn test_time_budget_respected() {
        let budget = Duration::from_millis(50);
        let opts = SearchOptions::with_config(20, 50);
        let start = Instant::now();
        let outcome = search_best_move(&midgame(), Stone::White, &opts);
        let elapsed = start.elapsed();
        assert!(outcome.best_move().is_some());
        assert!(
            elapsed < budget + Duration::from_millis(250),
            "search took {:?}",
            elapsed
        );
    }

    #[test]
    fn test_stats_counted() {
        let mut searcher = Searcher::new(SearchOptions::with_config(3, 10_000));
        let SearchOutcome::Found(result) = searcher.search(&midgame(), Stone::Black) else {
            panic!("expected a move");
        };
        assert!(result.stats.nodes > 0);
        assert!(result.stats.beta_cutoffs > 0);
        assert!(result.stats.first_move_rate() <= 100.0);
    }

    #[test]
    fn test_move_to_front() {
        let mut moves = vec![Pos::new(1, 1), Pos::new(2, 2), Pos::new(3, 3), Pos::new(4, 4)];
        move_to_front(&mut moves, Pos::new(3, 3));
        assert_eq!(
            moves,
            vec![Pos::new(3, 3), Pos::new(1, 1), Pos::new(2, 2), Pos::new(4, 4)]
        );
    }
}
