//! Search tuning knobs and the cancellation token.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use crate::eval::DEFAULT_OPPONENT_WEIGHT;

/// Independent tuning knobs for one search.
///
/// The defaults finish well inside an interactive budget on a 15x15 board.
#[derive(Debug, Clone, PartialEq)]
pub struct SearchOptions {
    /// Wall-clock budget for the whole search.
    pub time_budget: Duration,
    /// Deepest iteration of the iterative-deepening loop.
    pub max_depth: u8,
    /// Chebyshev radius around existing stones for candidate moves.
    pub neighbor_distance: u8,
    /// Maximum candidates searched per node.
    pub move_cap: usize,
    /// Weight on the opponent's pattern total in the evaluator.
    pub opponent_weight: f64,
}

impl Default for SearchOptions {
    fn default() -> Self {
        Self {
            time_budget: Duration::from_millis(1000),
            max_depth: 4,
            neighbor_distance: 2,
            move_cap: 20,
            opponent_weight: DEFAULT_OPPONENT_WEIGHT,
        }
    }
}

impl SearchOptions {
    /// Options with a custom time budget and depth, other knobs at default.
    #[must_use]
    pub fn with_config(max_depth: u8, time_budget_ms: u64) -> Self {
        Self {
            time_budget: Duration::from_millis(time_budget_ms),
            max_depth,
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_time_budget(mut self, budget: Duration) -> Self {
        self.time_budget = budget;
        self
    }

    #[must_use]
    pub fn with_max_depth(mut self, depth: u8) -> Self {
        self.max_depth = depth;
        self
    }

    #[must_use]
    pub fn with_neighbor_distance(mut self, distance: u8) -> Self {
        self.neighbor_distance = distance;
        self
    }

    #[must_use]
    pub fn with_move_cap(mut self, cap: usize) -> Self {
        self.move_cap = cap;
        self
    }

    #[must_use]
    pub fn with_opponent_weight(mut self, weight: f64) -> Self {
        self.opponent_weight = weight;
        self
    }
}

/// Shared abort flag, polled by the search at every node.
///
/// Cloning yields another handle to the same flag.
#[derive(Debug, Clone, Default)]
pub struct CancelToken {
    flag: Arc<AtomicBool>,
}

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    /// Request cancellation. Idempotent.
    pub fn cancel(&self) {
        self.flag.store(true, Ordering::Relaxed);
    }

    #[inline]
    pub fn is_cancelled(&self) -> bool {
        self.flag.load(Ordering::Relaxed)
    }
}
