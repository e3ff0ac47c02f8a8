//! Bounded-time move selection.
//!
//! The search is a classic negamax alpha-beta over the full move list with a
//! quiescence extension at the horizon, driven by iterative deepening under a
//! per-level time budget. Difficulty levels additionally mix in a random-move
//! probability so low levels play convincingly weak moves.
//!
//! The board is treated purely as a rules service: the search applies and
//! undoes moves through it and never copies it, leaving it bit-identical
//! after every call.

mod config;
mod constants;
mod driver;
mod eval;
mod move_order;
mod negamax;
mod quiescence;

use std::sync::Arc;

use crate::board::Move;

pub use config::{SearchConfig, DEFAULT_LEVEL, MAX_LEVEL, MAX_TIME_LIMIT_MS, MIN_LEVEL};
pub use constants::{is_mate_score, INFINITY, MATE_SCORE, MATE_THRESHOLD};
pub use driver::{find_best_move, search};
pub use eval::evaluate;

/// Result of a search.
#[derive(Debug, Clone, Copy)]
pub struct SearchResult {
    /// The selected move, or `None` if the side to move has no legal moves.
    pub best_move: Option<Move>,
    /// Score of the deepest completed iteration, from the searching side's
    /// perspective.
    pub score: i32,
    /// Deepest fully or partially completed iteration.
    pub depth: u32,
    /// Nodes visited, quiescence included.
    pub nodes: u64,
    /// Wall-clock time spent, in milliseconds.
    pub time_ms: u64,
}

/// Snapshot taken after each deepening iteration finishes.
#[derive(Debug, Clone)]
pub struct SearchIterationInfo {
    pub depth: u32,
    pub score: i32,
    pub best_move: Move,
    pub nodes: u64,
    pub nps: u64,
    pub time_ms: u64,
}

/// Receiver for per-iteration snapshots.
pub type SearchInfoCallback = Arc<dyn Fn(&SearchIterationInfo) + Send + Sync>;
