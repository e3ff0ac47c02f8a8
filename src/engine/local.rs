//! In-process search backend.

use rand::rngs::StdRng;
use rand::SeedableRng;

use crate::board::{Board, Move};
use crate::search;

use super::{EngineError, MoveBackend};

/// Move backend that runs the built-in iterative-deepening search.
///
/// Owns the random source used for weak-play emulation, so a seeded engine
/// replays the same choices on the same positions.
pub struct LocalEngine {
    rng: StdRng,
    in_search: bool,
}

impl LocalEngine {
    /// Create a backend seeded from system entropy.
    #[must_use]
    pub fn new() -> Self {
        LocalEngine {
            rng: StdRng::from_entropy(),
            in_search: false,
        }
    }

    /// Create a backend with a fixed seed for reproducible play.
    #[must_use]
    pub fn with_seed(seed: u64) -> Self {
        LocalEngine {
            rng: StdRng::seed_from_u64(seed),
            in_search: false,
        }
    }
}

impl Default for LocalEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl MoveBackend for LocalEngine {
    fn select_move(
        &mut self,
        board: &mut Board,
        level: u32,
    ) -> Result<Option<Move>, EngineError> {
        // The flag stays set if a search panicked out from under us, in
        // which case the board state can no longer be trusted.
        if self.in_search {
            return Err(EngineError::SearchInProgress);
        }
        self.in_search = true;
        let best = search::find_best_move(board, level, &mut self.rng);
        self.in_search = false;
        Ok(best)
    }

    fn name(&self) -> &str {
        "built-in search"
    }
}
