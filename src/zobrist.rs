//! Zobrist keys for position hashing.
//!
//! Every hashable feature of a position (a piece on a square, Black to
//! move, each castling right, the en passant file) gets its own random
//! 64-bit key, and a position's hash is the XOR of the keys for the
//! features it has. XOR-ing a feature's key toggles it, which is what lets
//! `make_move` and `unmake_move` maintain the hash incrementally.

use once_cell::sync::Lazy;
use rand::prelude::*;

use crate::board::{Color, Piece, Square};

// Fixed seed so the key set, and with it every hash, is stable across runs.
const KEY_SEED: u64 = 0x9E37_79B9_7F4A_7C15;

pub(crate) static ZOBRIST: Lazy<ZobristKeys> = Lazy::new(ZobristKeys::generate);

pub(crate) struct ZobristKeys {
    pieces: [[u64; 64]; 12],
    black_to_move: u64,
    castling: [u64; 4],
    en_passant_files: [u64; 8],
}

impl ZobristKeys {
    fn generate() -> Self {
        let mut rng = StdRng::seed_from_u64(KEY_SEED);
        ZobristKeys {
            pieces: std::array::from_fn(|_| std::array::from_fn(|_| rng.gen())),
            black_to_move: rng.gen(),
            castling: std::array::from_fn(|_| rng.gen()),
            en_passant_files: std::array::from_fn(|_| rng.gen()),
        }
    }

    /// Key for `piece` of `color` standing on `sq`.
    #[inline]
    pub(crate) fn piece(&self, color: Color, piece: Piece, sq: Square) -> u64 {
        self.pieces[color.index() * 6 + piece.index()][sq.as_index()]
    }

    /// Key toggled whenever the side to move flips.
    #[inline]
    pub(crate) fn side_to_move(&self) -> u64 {
        self.black_to_move
    }

    /// Key for one castling right, identified by its `CASTLE_*` bit.
    #[inline]
    pub(crate) fn castling_right(&self, flag: u8) -> u64 {
        self.castling[flag.trailing_zeros() as usize]
    }

    /// Key for an en passant target on `file`.
    #[inline]
    pub(crate) fn en_passant_file(&self, file: usize) -> u64 {
        self.en_passant_files[file]
    }
}
