//! Search configuration and the difficulty-level lookup tables.

use super::SearchInfoCallback;

/// Lowest supported difficulty level.
pub const MIN_LEVEL: u32 = 1;
/// Highest supported difficulty level.
pub const MAX_LEVEL: u32 = 6;
/// Level used when the caller does not specify one.
pub const DEFAULT_LEVEL: u32 = 3;

/// Hard ceiling on any time budget, in milliseconds.
pub const MAX_TIME_LIMIT_MS: u64 = 10_000;

// Per-level settings, indexed by level - 1.
const LEVEL_DEPTH: [u32; 6] = [1, 2, 3, 4, 5, 6];
const LEVEL_TIME_MS: [u64; 6] = [300, 700, 2000, 3000, 5000, 8000];
const LEVEL_RANDOMNESS: [f64; 6] = [0.6, 0.4, 0.15, 0.07, 0.03, 0.01];

/// Settings for one search invocation.
///
/// Usually derived from a difficulty level via [`SearchConfig::from_level`],
/// which maps the level to a target depth, a time budget, and a probability
/// of discarding the computed move for a random one (weak-play emulation).
#[derive(Clone)]
pub struct SearchConfig {
    /// Deepest iteration to attempt.
    pub max_depth: u32,
    /// Time budget in milliseconds (0 = unlimited).
    pub time_limit_ms: u64,
    /// Probability in `[0, 1]` of substituting a uniformly random legal move.
    pub randomness: f64,
    /// Optional callback for per-iteration info.
    pub info_callback: Option<SearchInfoCallback>,
}

impl Default for SearchConfig {
    fn default() -> Self {
        SearchConfig::from_level(DEFAULT_LEVEL)
    }
}

impl SearchConfig {
    /// Look up the settings for a difficulty level.
    ///
    /// Levels outside `MIN_LEVEL..=MAX_LEVEL` are clamped into range.
    #[must_use]
    pub fn from_level(level: u32) -> Self {
        let idx = (level.clamp(MIN_LEVEL, MAX_LEVEL) - 1) as usize;
        SearchConfig {
            max_depth: LEVEL_DEPTH[idx],
            time_limit_ms: LEVEL_TIME_MS[idx].min(MAX_TIME_LIMIT_MS),
            randomness: LEVEL_RANDOMNESS[idx],
            info_callback: None,
        }
    }

    /// Create a depth-limited config with no time cap and no randomness.
    #[must_use]
    pub fn depth(max_depth: u32) -> Self {
        SearchConfig {
            max_depth,
            time_limit_ms: 0,
            randomness: 0.0,
            info_callback: None,
        }
    }

    /// Set the time budget in milliseconds, clamped to [`MAX_TIME_LIMIT_MS`].
    #[must_use]
    pub fn with_time_limit(mut self, time_limit_ms: u64) -> Self {
        self.time_limit_ms = time_limit_ms.min(MAX_TIME_LIMIT_MS);
        self
    }

    /// Set the random-move substitution probability.
    #[must_use]
    pub fn with_randomness(mut self, randomness: f64) -> Self {
        self.randomness = randomness;
        self
    }

    /// Register a callback invoked after every finished iteration.
    #[must_use]
    pub fn with_info_callback(mut self, callback: SearchInfoCallback) -> Self {
        self.info_callback = Some(callback);
        self
    }
}

impl std::fmt::Debug for SearchConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SearchConfig")
            .field("max_depth", &self.max_depth)
            .field("time_limit_ms", &self.time_limit_ms)
            .field("randomness", &self.randomness)
            .field("info_callback", &self.info_callback.is_some())
            .finish()
    }
}
