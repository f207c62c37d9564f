//! Game state management
//!
//! The canonical game: board, side to move, move history and result. The
//! search never touches this board; a finished search is applied here from
//! its outcome.

use std::fmt;

use crate::board::{Board, Pos, Stone};
use crate::error::GameError;
use crate::rules::{check_win, find_winner, Win};
use crate::search::{SearchOptions, SearchOutcome};
use crate::worker::{SearchRequest, WorkerMessage};

/// A move in the game history.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Move {
    pub pos: Pos,
    pub player: Stone,
}

/// Game result
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameStatus {
    InProgress,
    Won(Win),
    /// Board full with no five.
    Draw,
}

impl fmt::Display for GameStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GameStatus::InProgress => write!(f, "in progress"),
            GameStatus::Won(win) => write!(
                f,
                "{} wins with {} .. {}",
                win.winner.glyph(),
                win.line[0],
                win.line[4]
            ),
            GameStatus::Draw => write!(f, "draw"),
        }
    }
}

/// Main game state
#[derive(Debug, Clone)]
pub struct Game {
    board: Board,
    current: Stone,
    history: Vec<Move>,
    status: GameStatus,
}

impl Default for Game {
    fn default() -> Self {
        Self::new()
    }
}

impl Game {
    /// Empty board, Black to move.
    pub fn new() -> Self {
        Self {
            board: Board::new(),
            current: Stone::Black,
            history: Vec::new(),
            status: GameStatus::InProgress,
        }
    }

    /// Resume from a loaded position. History starts empty.
    pub fn from_board(board: Board, to_move: Stone) -> Result<Self, GameError> {
        if to_move == Stone::Empty {
            return Err(GameError::InvalidPlayer(to_move.player()));
        }
        let status = match find_winner(&board) {
            Some(win) => GameStatus::Won(win),
            None if board.is_full() => GameStatus::Draw,
            None => GameStatus::InProgress,
        };
        Ok(Self {
            board,
            current: to_move,
            history: Vec::new(),
            status,
        })
    }

    pub fn reset(&mut self) {
        *self = Self::new();
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    /// Side to move.
    pub fn current(&self) -> Stone {
        self.current
    }

    pub fn history(&self) -> &[Move] {
        &self.history
    }

    pub fn last_move(&self) -> Option<Move> {
        self.history.last().copied()
    }

    pub fn status(&self) -> GameStatus {
        self.status
    }

    pub fn winner(&self) -> Option<Stone> {
        match self.status {
            GameStatus::Won(win) => Some(win.winner),
            _ => None,
        }
    }

    pub fn is_over(&self) -> bool {
        self.status != GameStatus::InProgress
    }

    /// Place a stone for the side to move.
    pub fn play(&mut self, x: i32, y: i32) -> Result<GameStatus, GameError> {
        if self.is_over() {
            return Err(GameError::GameOver);
        }
        let color = self.current;
        let pos = self.board.place(x, y, color)?;
        self.history.push(Move { pos, player: color });

        if let Some(win) = check_win(&self.board, pos) {
            self.status = GameStatus::Won(win);
        } else if self.board.is_full() {
            self.status = GameStatus::Draw;
        } else {
            self.current = color.opponent();
        }
        Ok(self.status)
    }

    pub fn play_pos(&mut self, pos: Pos) -> Result<GameStatus, GameError> {
        self.play(i32::from(pos.x), i32::from(pos.y))
    }

    /// Take back the last move.
    pub fn undo(&mut self) -> Result<Move, GameError> {
        let mv = self.history.pop().ok_or(GameError::NothingToUndo)?;
        self.board.undo(mv.pos);
        self.current = mv.player;
        self.status = GameStatus::InProgress;
        Ok(mv)
    }

    /// Take back the last two moves (a reply and the move before it), so the
    /// side that made the earlier move is to move again.
    ///
    /// With fewer than two moves in the history nothing changes.
    pub fn undo_pair(&mut self) -> Result<[Move; 2], GameError> {
        if self.history.len() < 2 {
            return Err(GameError::NothingToUndo);
        }
        let reply = self.undo()?;
        let earlier = self.undo()?;
        Ok([earlier, reply])
    }

    /// Search request for the side to move.
    pub fn search_request(&self, options: &SearchOptions) -> SearchRequest {
        SearchRequest::new(&self.board, self.current, options)
    }

    /// Apply a finished search. Returns the move played, if any.
    pub fn apply_outcome(&mut self, outcome: &SearchOutcome) -> Result<Option<Pos>, GameError> {
        match outcome {
            SearchOutcome::Found(result) => {
                self.play_pos(result.best_move)?;
                Ok(Some(result.best_move))
            }
            SearchOutcome::NoLegalMove => {
                self.status = GameStatus::Draw;
                Ok(None)
            }
            SearchOutcome::Cancelled => Ok(None),
        }
    }

    /// Apply a terminal worker message. Progress, cancellation and errors
    /// leave the game untouched.
    pub fn apply_message(&mut self, msg: &WorkerMessage) -> Result<Option<Pos>, GameError> {
        match msg {
            WorkerMessage::Result {
                best_move: Some(pos),
                ..
            } => {
                self.play_pos(*pos)?;
                Ok(Some(*pos))
            }
            WorkerMessage::Result {
                best_move: None, ..
            } => {
                self.status = GameStatus::Draw;
                Ok(None)
            }
            _ => Ok(None),
        }
    }
}
