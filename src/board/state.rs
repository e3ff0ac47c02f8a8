//! Board state: piece placement, side to move, castling rights, clocks,
//! Zobrist hash, and repetition tracking.

use std::collections::HashMap;
use std::fmt;

use crate::zobrist::ZOBRIST;

use super::{
    Color, Piece, Square, CASTLE_BLACK_K, CASTLE_BLACK_Q, CASTLE_WHITE_K, CASTLE_WHITE_Q,
};

/// State saved by `make_move` so `unmake_move` can restore the position
/// exactly, including hash and repetition bookkeeping.
///
/// All fields except `hash_after` and `repetitions_before` hold the value
/// from just before the move was applied.
#[derive(Clone, Debug)]
pub struct UnmakeInfo {
    pub(crate) victim: Option<(Color, Piece)>,
    pub(crate) en_passant: Option<Square>,
    pub(crate) castling_rights: u8,
    pub(crate) halfmove_clock: u32,
    pub(crate) fullmove_number: u32,
    pub(crate) hash_before: u64,
    pub(crate) hash_after: u64,
    /// Repetition count of the resulting position before it was counted.
    pub(crate) repetitions_before: u32,
}

#[derive(Clone, Debug)]
pub(crate) struct RepetitionTable {
    counts: HashMap<u64, u32>,
}

impl RepetitionTable {
    pub(crate) fn new() -> Self {
        RepetitionTable {
            counts: HashMap::new(),
        }
    }

    pub(crate) fn get(&self, hash: u64) -> u32 {
        self.counts.get(&hash).copied().unwrap_or(0)
    }

    pub(crate) fn set(&mut self, hash: u64, count: u32) {
        if count == 0 {
            self.counts.remove(&hash);
        } else {
            self.counts.insert(hash, count);
        }
    }

    pub(crate) fn increment(&mut self, hash: u64) -> u32 {
        let next = self.get(hash).saturating_add(1);
        self.set(hash, next);
        next
    }
}

/// A chess position.
///
/// Mailbox representation: `squares[rank][file]` holds the occupant, with
/// rank 0 = White's back rank. The Zobrist hash is kept incrementally by
/// `make_move`/`unmake_move`.
#[derive(Clone, Debug)]
pub struct Board {
    pub(crate) squares: [[Option<(Color, Piece)>; 8]; 8],
    pub(crate) white_to_move: bool,
    pub(crate) en_passant_target: Option<Square>,
    pub(crate) castling_rights: u8, // CASTLE_* bits
    pub(crate) hash: u64,
    pub(crate) halfmove_clock: u32,
    pub(crate) fullmove_number: u32,
    pub(crate) repetition_counts: RepetitionTable,
}

impl Board {
    /// Create a board in the standard starting position.
    #[must_use]
    pub fn new() -> Self {
        let mut board = Board::empty();
        let back_rank = [
            Piece::Rook,
            Piece::Knight,
            Piece::Bishop,
            Piece::Queen,
            Piece::King,
            Piece::Bishop,
            Piece::Knight,
            Piece::Rook,
        ];
        for (i, piece) in back_rank.iter().enumerate() {
            board.squares[0][i] = Some((Color::White, *piece));
            board.squares[7][i] = Some((Color::Black, *piece));
            board.squares[1][i] = Some((Color::White, Piece::Pawn));
            board.squares[6][i] = Some((Color::Black, Piece::Pawn));
        }

        board.castling_rights = CASTLE_WHITE_K | CASTLE_WHITE_Q | CASTLE_BLACK_K | CASTLE_BLACK_Q;
        board.white_to_move = true;
        board.hash = board.calculate_initial_hash();
        board.repetition_counts.set(board.hash, 1);
        board
    }

    pub(crate) fn empty() -> Self {
        Board {
            squares: [[None; 8]; 8],
            white_to_move: true,
            en_passant_target: None,
            castling_rights: 0,
            hash: 0,
            halfmove_clock: 0,
            fullmove_number: 1,
            repetition_counts: RepetitionTable::new(),
        }
    }

    /// The piece on `sq`, if any.
    #[inline]
    #[must_use]
    pub fn piece_at(&self, sq: Square) -> Option<(Color, Piece)> {
        self.squares[sq.0][sq.1]
    }

    #[inline]
    #[must_use]
    pub fn white_to_move(&self) -> bool {
        self.white_to_move
    }

    /// The color whose turn it is.
    #[inline]
    #[must_use]
    pub fn side_to_move(&self) -> Color {
        if self.white_to_move {
            Color::White
        } else {
            Color::Black
        }
    }

    #[inline]
    #[must_use]
    pub fn hash(&self) -> u64 {
        self.hash
    }

    #[inline]
    #[must_use]
    pub fn halfmove_clock(&self) -> u32 {
        self.halfmove_clock
    }

    #[inline]
    #[must_use]
    pub fn fullmove_number(&self) -> u32 {
        self.fullmove_number
    }

    #[inline]
    #[must_use]
    pub fn en_passant_target(&self) -> Option<Square> {
        self.en_passant_target
    }

    /// Locate the king of `color`.
    #[must_use]
    pub fn king_square(&self, color: Color) -> Option<Square> {
        for rank in 0..8 {
            for file in 0..8 {
                if self.squares[rank][file] == Some((color, Piece::King)) {
                    return Some(Square(rank, file));
                }
            }
        }
        None
    }

    /// Full Zobrist hash of the current position, computed from scratch.
    ///
    /// Used after construction and FEN parsing; moves update the hash
    /// incrementally.
    pub(crate) fn calculate_initial_hash(&self) -> u64 {
        let mut hash: u64 = 0;
        for r in 0..8 {
            for f in 0..8 {
                if let Some((color, piece)) = self.squares[r][f] {
                    hash ^= ZOBRIST.piece(color, piece, Square(r, f));
                }
            }
        }
        if !self.white_to_move {
            hash ^= ZOBRIST.side_to_move();
        }
        hash ^= castling_hash(self.castling_rights);
        if let Some(ep) = self.en_passant_target {
            hash ^= ZOBRIST.en_passant_file(ep.1);
        }
        hash
    }

    /// Whether the position is drawn by the fifty-move rule or threefold
    /// repetition.
    #[must_use]
    pub fn is_draw(&self) -> bool {
        if self.halfmove_clock >= 100 {
            return true;
        }
        self.repetition_counts.get(self.hash) >= 3
    }

    /// `is_draw` extended with insufficient-material detection.
    #[must_use]
    pub fn is_theoretical_draw(&self) -> bool {
        self.is_draw() || self.is_insufficient_material()
    }

    fn is_insufficient_material(&self) -> bool {
        let mut minors = 0;
        let mut bishop_squares: Vec<Square> = Vec::new();
        let mut knights = 0;

        for rank in 0..8 {
            for file in 0..8 {
                let Some((_, piece)) = self.squares[rank][file] else {
                    continue;
                };
                match piece {
                    Piece::Pawn | Piece::Rook | Piece::Queen => return false,
                    Piece::Knight => {
                        minors += 1;
                        knights += 1;
                    }
                    Piece::Bishop => {
                        minors += 1;
                        bishop_squares.push(Square(rank, file));
                    }
                    Piece::King => {}
                }
            }
        }

        if minors <= 1 {
            return true;
        }

        // Two bishops on same-colored squares cannot mate either.
        if knights == 0 && bishop_squares.len() == 2 {
            let shade = |sq: Square| (sq.0 + sq.1) % 2;
            return shade(bishop_squares[0]) == shade(bishop_squares[1]);
        }

        false
    }
}

impl Default for Board {
    fn default() -> Self {
        Board::new()
    }
}

impl fmt::Display for Board {
    /// ASCII diagram from White's point of view, rank 8 on top.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for rank in (0..8).rev() {
            write!(f, "{} ", rank + 1)?;
            for file in 0..8 {
                match self.squares[rank][file] {
                    Some((color, piece)) => write!(f, "{} ", piece.to_fen_char(color))?,
                    None => write!(f, ". ")?,
                }
            }
            writeln!(f)?;
        }
        write!(f, "  a b c d e f g h")
    }
}

/// XOR of the castling keys selected by `rights`.
fn castling_hash(rights: u8) -> u64 {
    let mut hash = 0;
    for flag in [CASTLE_WHITE_K, CASTLE_WHITE_Q, CASTLE_BLACK_K, CASTLE_BLACK_Q] {
        if rights & flag != 0 {
            hash ^= ZOBRIST.castling_right(flag);
        }
    }
    hash
}
