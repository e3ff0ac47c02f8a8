//! Search score constants.

/// Upper bound for alpha-beta windows. Larger than any reachable score.
pub const INFINITY: i32 = 1_000_000;

/// Score returned for the side that has been checkmated.
///
/// A large fixed magnitude rather than `INFINITY` so mate scores stay
/// comparable with ordinary centipawn scores during backpropagation.
pub const MATE_SCORE: i32 = 999_999;

/// Scores with absolute value >= this are considered checkmate scores.
pub const MATE_THRESHOLD: i32 = 900_000;

/// Ordering bonus for promotions, on top of any captured piece value.
pub(crate) const PROMOTION_ORDER_BONUS: i32 = 200;

/// Legal moves per centipawn of mobility credit.
pub(crate) const MOBILITY_DIVISOR: i32 = 5;

/// Whether a score indicates a forced checkmate for either side.
#[inline]
#[must_use]
pub fn is_mate_score(score: i32) -> bool {
    score.abs() >= MATE_THRESHOLD
}
