//! Quiescence search: captures and promotions only, at the search horizon.

use rand::Rng;

use super::driver::SearchContext;
use super::eval::evaluate;
use super::move_order::order_moves;

impl<R: Rng> SearchContext<'_, R> {
    /// Fail-hard quiescence search from the side to move's perspective.
    ///
    /// Stands pat on the static evaluation, then tries only captures and
    /// promotions. The recursion has no depth cap: every capture removes a
    /// piece from the board, so the tactical tree bottoms out on its own.
    pub(crate) fn quiescence(&mut self, mut alpha: i32, beta: i32) -> i32 {
        self.nodes += 1;

        let stand_pat = self.board.side_to_move().sign() * evaluate(self.board);
        if stand_pat >= beta {
            return beta;
        }
        if stand_pat > alpha {
            alpha = stand_pat;
        }

        let mut moves = self.board.generate_tactical_moves();
        order_moves(&mut moves);
        for m in &moves {
            let info = self.board.make_move(m);
            let score = -self.quiescence(-beta, -alpha);
            self.board.unmake_move(m, info);

            if score >= beta {
                return beta;
            }
            if score > alpha {
                alpha = score;
            }
        }
        alpha
    }
}
