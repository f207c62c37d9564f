//! Board structure with checked placement and search-side apply/undo

use std::fmt;

use super::bitboard::Bitboard;
use super::{Pos, Stone, BOARD_SIZE};
use crate::error::GameError;

/// Game board: one bitboard per side
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Board {
    /// Black stones bitboard (player 1)
    pub black: Bitboard,
    /// White stones bitboard (player 2)
    pub white: Bitboard,
}

impl Board {
    pub fn new() -> Self {
        Self {
            black: Bitboard::new(),
            white: Bitboard::new(),
        }
    }

    /// Build a board from row-major player numbers (`rows[y][x]`).
    pub fn from_rows(rows: &[Vec<u8>]) -> Result<Self, GameError> {
        if rows.len() != BOARD_SIZE {
            return Err(GameError::InvalidBoard(format!(
                "expected {} rows, got {}",
                BOARD_SIZE,
                rows.len()
            )));
        }
        let mut board = Board::new();
        for (y, row) in rows.iter().enumerate() {
            if row.len() != BOARD_SIZE {
                return Err(GameError::InvalidBoard(format!(
                    "row {} has {} cells, expected {}",
                    y,
                    row.len(),
                    BOARD_SIZE
                )));
            }
            for (x, &cell) in row.iter().enumerate() {
                let stone = Stone::from_player(cell).ok_or_else(|| {
                    GameError::InvalidBoard(format!("cell ({}, {}) has value {}", x, y, cell))
                })?;
                #[allow(clippy::cast_possible_truncation)]
                let pos = Pos::new(x as u8, y as u8);
                if stone != Stone::Empty {
                    board.apply(pos, stone);
                }
            }
        }
        Ok(board)
    }

    /// Row-major player numbers, the inverse of [`Board::from_rows`].
    pub fn to_rows(&self) -> Vec<Vec<u8>> {
        (0..BOARD_SIZE)
            .map(|y| {
                (0..BOARD_SIZE)
                    .map(|x| {
                        #[allow(clippy::cast_possible_truncation)]
                        let pos = Pos::new(x as u8, y as u8);
                        self.get(pos).player()
                    })
                    .collect()
            })
            .collect()
    }

    #[inline]
    pub fn size(&self) -> usize {
        BOARD_SIZE
    }

    /// Get stone at position
    #[inline]
    pub fn get(&self, pos: Pos) -> Stone {
        if self.black.get(pos) {
            Stone::Black
        } else if self.white.get(pos) {
            Stone::White
        } else {
            Stone::Empty
        }
    }

    /// Stone at signed coordinates; `None` when off the board.
    #[inline]
    pub fn get_at(&self, x: i32, y: i32) -> Option<Stone> {
        Pos::try_new(x, y).map(|p| self.get(p))
    }

    /// Check if position is empty
    #[inline]
    pub fn is_empty(&self, pos: Pos) -> bool {
        !self.black.get(pos) && !self.white.get(pos)
    }

    /// Place a stone for a game move.
    ///
    /// Rejects out-of-bounds coordinates and occupied cells. Use
    /// [`Board::apply`] on the search hot path where legality is known.
    pub fn place(&mut self, x: i32, y: i32, stone: Stone) -> Result<Pos, GameError> {
        let pos = Pos::try_new(x, y).ok_or(GameError::OutOfBounds { x, y })?;
        if stone == Stone::Empty {
            return Err(GameError::NoPlayer(pos));
        }
        if !self.is_empty(pos) {
            return Err(GameError::Occupied(pos));
        }
        self.apply(pos, stone);
        Ok(pos)
    }

    /// Put a stone on an empty cell without validation.
    #[inline]
    pub fn apply(&mut self, pos: Pos, stone: Stone) {
        debug_assert!(self.is_empty(pos), "apply on occupied cell {}", pos);
        match stone {
            Stone::Black => self.black.set(pos),
            Stone::White => self.white.set(pos),
            Stone::Empty => {}
        }
    }

    /// Exact inverse of [`Board::apply`].
    #[inline]
    pub fn undo(&mut self, pos: Pos) {
        debug_assert!(!self.is_empty(pos), "undo on empty cell {}", pos);
        self.black.clear(pos);
        self.white.clear(pos);
    }

    /// Get bitboard for a color (returns None for Empty)
    #[inline]
    pub fn stones(&self, stone: Stone) -> Option<&Bitboard> {
        match stone {
            Stone::Black => Some(&self.black),
            Stone::White => Some(&self.white),
            Stone::Empty => None,
        }
    }

    /// All occupied cells.
    #[inline]
    pub fn occupied(&self) -> Bitboard {
        self.black.union(&self.white)
    }

    /// Total stones on board
    #[inline]
    pub fn stone_count(&self) -> u32 {
        self.black.count() + self.white.count()
    }

    #[inline]
    pub fn is_board_empty(&self) -> bool {
        self.black.is_empty() && self.white.is_empty()
    }

    #[inline]
    pub fn is_full(&self) -> bool {
        self.stone_count() as usize == BOARD_SIZE * BOARD_SIZE
    }

    /// Empty cells in scan order (row by row).
    pub fn empty_cells(&self) -> impl Iterator<Item = Pos> + '_ {
        (0..BOARD_SIZE * BOARD_SIZE)
            .map(Pos::from_index)
            .filter(move |&p| self.is_empty(p))
    }

    /// First empty cell in scan order; the engine's last-resort move.
    pub fn first_empty(&self) -> Option<Pos> {
        self.empty_cells().next()
    }
}

impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "   ")?;
        for x in 0..BOARD_SIZE {
            write!(f, "{:2}", x)?;
        }
        writeln!(f)?;
        for y in 0..BOARD_SIZE {
            write!(f, "{:2} ", y)?;
            for x in 0..BOARD_SIZE {
                #[allow(clippy::cast_possible_truncation)]
                let pos = Pos::new(x as u8, y as u8);
                write!(f, " {}", self.get(pos).glyph())?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}
