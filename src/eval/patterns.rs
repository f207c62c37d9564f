//! Pattern scores for Gomoku evaluation
//!
//! A run is classified by its length and the number of open (empty,
//! in-bounds) cells touching its two ends.

/// Pattern scores for evaluation
pub struct PatternScore;

impl PatternScore {
    // Winning patterns
    /// Five or more in a row
    pub const FIVE: i32 = 10_000_000;

    // Strong attacking patterns
    /// Open four: _OOOO_ (cannot be stopped)
    pub const OPEN_FOUR: i32 = 1_000_000;
    /// Closed four: XOOOO_ or _OOOOX (one way to extend)
    pub const CLOSED_FOUR: i32 = 100_000;

    // Moderate threats
    /// Open three: _OOO_ (becomes open four if not blocked)
    pub const OPEN_THREE: i32 = 12_000;
    /// Closed three: XOOO_ or _OOOX
    pub const CLOSED_THREE: i32 = 1_500;

    // Building patterns
    /// Open two: _OO_
    pub const OPEN_TWO: i32 = 400;
    /// Closed two: XOO_ or _OOX
    pub const CLOSED_TWO: i32 = 100;

    /// Lone stone with both sides free
    pub const OPEN_ONE: i32 = 20;
    /// Lone stone with one side free
    pub const CLOSED_ONE: i32 = 4;
}

/// Score one run of `len` stones with `open_ends` free ends (0, 1 or 2).
///
/// Dead runs (both ends blocked) are worth nothing unless they are already five.
#[inline]
pub fn score_run(len: i32, open_ends: i32) -> i32 {
    match (len, open_ends) {
        (5.., _) => PatternScore::FIVE,
        (4, 2) => PatternScore::OPEN_FOUR,
        (4, 1) => PatternScore::CLOSED_FOUR,
        (3, 2) => PatternScore::OPEN_THREE,
        (3, 1) => PatternScore::CLOSED_THREE,
        (2, 2) => PatternScore::OPEN_TWO,
        (2, 1) => PatternScore::CLOSED_TWO,
        (1, 2) => PatternScore::OPEN_ONE,
        (1, 1) => PatternScore::CLOSED_ONE,
        _ => 0,
    }
}
