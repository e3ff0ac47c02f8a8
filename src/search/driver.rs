//! Iterative-deepening driver and public search entry points.

use std::time::Instant;

use rand::Rng;

use crate::board::{Board, Move, MoveList};

use super::constants::INFINITY;
use super::eval::evaluate;
use super::move_order::order_moves;
use super::{SearchConfig, SearchIterationInfo, SearchResult};

/// State for a single search invocation.
///
/// Everything is borrowed from the caller and a fresh context is built per
/// call, so no search state survives between invocations. The caller is
/// responsible for not starting a second search on the same board while one
/// is running.
pub(crate) struct SearchContext<'a, R: Rng> {
    pub board: &'a mut Board,
    pub config: &'a SearchConfig,
    pub rng: &'a mut R,
    pub start_time: Instant,
    pub nodes: u64,
}

impl<R: Rng> SearchContext<'_, R> {
    /// Whether the time budget is exhausted (0 = unlimited).
    #[inline]
    pub(crate) fn out_of_time(&self) -> bool {
        self.config.time_limit_ms > 0 && self.elapsed_ms() >= self.config.time_limit_ms
    }

    #[inline]
    fn elapsed_ms(&self) -> u64 {
        self.start_time.elapsed().as_millis() as u64
    }

    /// Iterative deepening over the given root moves.
    ///
    /// Each depth re-searches every root move with a full window. A partially
    /// completed iteration still replaces the running best, as long as it
    /// evaluated at least one move before the clock ran out. After the loop
    /// the configured randomization policy may substitute a uniformly random
    /// legal move for the computed one.
    fn iterative_deepening(&mut self, moves: &MoveList) -> SearchResult {
        let mut best_move = moves.first();
        let mut best_score = -INFINITY;
        let mut completed_depth = 0;

        for depth in 1..=self.config.max_depth {
            if self.out_of_time() {
                break;
            }

            let mut ordered = moves.clone();
            order_moves(&mut ordered);

            let mut iteration_best: Option<Move> = None;
            let mut iteration_score = -INFINITY;
            for m in &ordered {
                if self.out_of_time() {
                    break;
                }
                let info = self.board.make_move(m);
                let score = -self.negamax(depth - 1, -INFINITY, INFINITY);
                self.board.unmake_move(m, info);

                if iteration_best.is_none() || score > iteration_score {
                    iteration_best = Some(*m);
                    iteration_score = score;
                }
            }

            let Some(iteration_move) = iteration_best else {
                break;
            };
            best_move = Some(iteration_move);
            best_score = iteration_score;
            completed_depth = depth;

            self.report_iteration(depth, iteration_score, iteration_move);
        }

        if self.rng.gen::<f64>() < self.config.randomness {
            best_move = moves.get(self.rng.gen_range(0..moves.len()));
            #[cfg(feature = "logging")]
            log::debug!(
                "randomization replaced best move with {}",
                best_move.map_or_else(String::new, |m| m.to_string())
            );
        }

        SearchResult {
            best_move,
            score: best_score,
            depth: completed_depth,
            nodes: self.nodes,
            time_ms: self.elapsed_ms(),
        }
    }

    fn report_iteration(&self, depth: u32, score: i32, best_move: Move) {
        let time_ms = self.elapsed_ms();
        #[cfg(feature = "logging")]
        log::debug!(
            "depth {depth} score {score} nodes {} time {time_ms}ms best {best_move}",
            self.nodes
        );
        if let Some(cb) = &self.config.info_callback {
            let nps = if time_ms > 0 {
                self.nodes * 1000 / time_ms
            } else {
                0
            };
            cb(&SearchIterationInfo {
                depth,
                score,
                best_move,
                nodes: self.nodes,
                nps,
                time_ms,
            });
        }
    }
}

/// Search a position under the given configuration.
///
/// `best_move` in the result is `None` when the side to move has no legal
/// moves; the caller distinguishes checkmate from stalemate via the board's
/// terminal-state queries. The position is left exactly as it was passed in.
pub fn search<R: Rng>(board: &mut Board, config: &SearchConfig, rng: &mut R) -> SearchResult {
    let start_time = Instant::now();
    let moves = board.generate_moves();

    if moves.is_empty() {
        return SearchResult {
            best_move: None,
            score: 0,
            depth: 0,
            nodes: 0,
            time_ms: 0,
        };
    }
    if moves.len() == 1 {
        // No point searching a forced move; report its static score.
        let score = board.side_to_move().sign() * evaluate(board);
        return SearchResult {
            best_move: moves.first(),
            score,
            depth: 0,
            nodes: 0,
            time_ms: start_time.elapsed().as_millis() as u64,
        };
    }

    let mut ctx = SearchContext {
        board,
        config,
        rng,
        start_time,
        nodes: 0,
    };
    ctx.iterative_deepening(&moves)
}

/// Find a move for the side to move at the given difficulty level.
///
/// The level picks the target depth, the time budget, and the probability of
/// playing a random move instead of the computed one. `None` means the side
/// to move has no legal moves (checkmate or stalemate).
pub fn find_best_move<R: Rng>(board: &mut Board, level: u32, rng: &mut R) -> Option<Move> {
    search(board, &SearchConfig::from_level(level), rng).best_move
}
