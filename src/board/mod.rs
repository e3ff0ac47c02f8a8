//! Board representation and the rules of chess.
//!
//! A mailbox board (8x8 array of optional pieces) with fully legal move
//! generation, reversible make/unmake, FEN in both directions, and the
//! draw rules the search needs (repetition, fifty moves, dead positions).
//! Castling, en passant, and promotion are all handled.
//!
//! # Example
//! ```
//! use gemstone_chess::board::Board;
//!
//! let mut board = Board::new();
//! assert_eq!(board.generate_moves().len(), 20);
//! ```

mod error;
mod fen;
mod make_unmake;
mod movegen;
mod state;
#[cfg(test)]
mod tests;
mod types;

pub use error::{FenError, MoveParseError, SquareError};
pub use state::{Board, UnmakeInfo};
pub use types::{Color, Move, MoveList, Piece, Square};

pub(crate) use types::{CASTLE_BLACK_K, CASTLE_BLACK_Q, CASTLE_WHITE_K, CASTLE_WHITE_Q};
