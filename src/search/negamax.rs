//! Negamax alpha-beta search over full moves.

use rand::Rng;

use super::constants::{INFINITY, MATE_SCORE};
use super::driver::SearchContext;
use super::eval::evaluate;
use super::move_order::order_moves;

impl<R: Rng> SearchContext<'_, R> {
    /// Fail-soft negamax with alpha-beta pruning.
    ///
    /// Returns a score from the perspective of the side to move at this
    /// node; the caller negates it. When the clock expires mid-tree the
    /// node degrades to its static evaluation instead of aborting, so the
    /// apply/undo discipline holds on every path out.
    pub(crate) fn negamax(&mut self, depth: u32, mut alpha: i32, beta: i32) -> i32 {
        self.nodes += 1;
        let side = self.board.side_to_move();

        if self.out_of_time() {
            return side.sign() * evaluate(self.board);
        }
        if depth == 0 {
            return self.quiescence(-INFINITY, INFINITY);
        }
        if self.board.is_theoretical_draw() {
            return 0;
        }

        let mut moves = self.board.generate_moves();
        if moves.is_empty() {
            // Mated scores carry a fixed large magnitude, not infinity, so
            // they stay comparable with ordinary scores.
            return if self.board.is_in_check(side) {
                -MATE_SCORE
            } else {
                0
            };
        }
        order_moves(&mut moves);

        let mut best_score = -INFINITY;
        for m in &moves {
            let info = self.board.make_move(m);
            let score = -self.negamax(depth - 1, -beta, -alpha);
            self.board.unmake_move(m, info);

            if score > best_score {
                best_score = score;
            }
            if best_score > alpha {
                alpha = best_score;
            }
            if alpha >= beta {
                break;
            }
            if self.out_of_time() {
                break;
            }
        }
        best_score
    }
}
