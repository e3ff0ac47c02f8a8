//! Move ordering for better alpha-beta pruning.

use crate::board::{Move, MoveList};

use super::constants::PROMOTION_ORDER_BONUS;

/// Ordering key: value of the captured piece plus a flat promotion bonus.
///
/// Quiet moves score zero. Higher keys are searched first.
fn order_key(m: &Move) -> i32 {
    let capture = m.captured_piece.map_or(0, |p| p.value());
    let promotion = if m.is_promotion() {
        PROMOTION_ORDER_BONUS
    } else {
        0
    };
    capture + promotion
}

/// Sort moves in descending order of [`order_key`].
///
/// The sort is stable, so equally scored moves keep their generation order.
/// Ordering only affects pruning efficiency, never the move set itself.
pub(crate) fn order_moves(moves: &mut MoveList) {
    moves
        .as_mut_slice()
        .sort_by_key(|m| std::cmp::Reverse(order_key(m)));
}
