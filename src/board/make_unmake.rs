//! Applying and reverting moves with incremental Zobrist updates.

use crate::zobrist::ZOBRIST;

use super::{
    Board, Color, Move, Piece, Square, UnmakeInfo, CASTLE_BLACK_K, CASTLE_BLACK_Q, CASTLE_WHITE_K,
    CASTLE_WHITE_Q,
};

/// Rook start and landing squares for a castling move arriving on `king_to`.
fn castling_rook_squares(king_to: Square) -> (Square, Square) {
    if king_to.1 == 6 {
        (Square(king_to.0, 7), Square(king_to.0, 5))
    } else {
        (Square(king_to.0, 0), Square(king_to.0, 3))
    }
}

const fn kingside_flag(color: Color) -> u8 {
    match color {
        Color::White => CASTLE_WHITE_K,
        Color::Black => CASTLE_BLACK_K,
    }
}

const fn queenside_flag(color: Color) -> u8 {
    match color {
        Color::White => CASTLE_WHITE_Q,
        Color::Black => CASTLE_BLACK_Q,
    }
}

impl Board {
    pub(crate) fn has_kingside_right(&self, color: Color) -> bool {
        self.castling_rights & kingside_flag(color) != 0
    }

    pub(crate) fn has_queenside_right(&self, color: Color) -> bool {
        self.castling_rights & queenside_flag(color) != 0
    }

    #[inline]
    fn set_piece(&mut self, sq: Square, color: Color, piece: Piece) {
        self.squares[sq.0][sq.1] = Some((color, piece));
    }

    #[inline]
    fn remove_piece(&mut self, sq: Square) {
        self.squares[sq.0][sq.1] = None;
    }

    fn drop_right(&mut self, flag: u8, hash: &mut u64) {
        if self.castling_rights & flag != 0 {
            *hash ^= ZOBRIST.castling_right(flag);
            self.castling_rights &= !flag;
        }
    }

    /// Apply `m` and return the state needed to revert it.
    ///
    /// The move must come from this position's move generation. Panics on a
    /// structurally impossible move (empty origin square), since that means
    /// make and unmake calls got out of sync.
    pub fn make_move(&mut self, m: &Move) -> UnmakeInfo {
        let color = self.side_to_move();
        let mut hash = self.hash;

        let saved = UnmakeInfo {
            victim: None, // filled in below
            en_passant: self.en_passant_target,
            castling_rights: self.castling_rights,
            halfmove_clock: self.halfmove_clock,
            fullmove_number: self.fullmove_number,
            hash_before: self.hash,
            hash_after: 0,
            repetitions_before: 0,
        };

        hash ^= ZOBRIST.side_to_move();
        if let Some(ep) = self.en_passant_target {
            hash ^= ZOBRIST.en_passant_file(ep.1);
        }

        // Lift the victim off the board. An en passant victim stands on the
        // mover's own rank in the destination file.
        let mut victim: Option<(Color, Piece)> = None;
        if m.is_en_passant {
            let victim_sq = Square(m.from.0, m.to.1);
            victim = self.piece_at(victim_sq);
            if let Some((victim_color, victim_piece)) = victim {
                self.remove_piece(victim_sq);
                hash ^= ZOBRIST.piece(victim_color, victim_piece, victim_sq);
            }
        } else if !m.is_castling {
            victim = self.piece_at(m.to);
            if let Some((victim_color, victim_piece)) = victim {
                self.remove_piece(m.to);
                hash ^= ZOBRIST.piece(victim_color, victim_piece, m.to);
            }
        }

        let (_, mover) = self
            .piece_at(m.from)
            .expect("make_move applied to an empty origin square");
        hash ^= ZOBRIST.piece(color, mover, m.from);
        self.remove_piece(m.from);

        if m.is_castling {
            self.set_piece(m.to, color, Piece::King);
            hash ^= ZOBRIST.piece(color, Piece::King, m.to);

            let (rook_from, rook_to) = castling_rook_squares(m.to);
            debug_assert_eq!(self.piece_at(rook_from), Some((color, Piece::Rook)));
            self.remove_piece(rook_from);
            self.set_piece(rook_to, color, Piece::Rook);
            hash ^= ZOBRIST.piece(color, Piece::Rook, rook_from);
            hash ^= ZOBRIST.piece(color, Piece::Rook, rook_to);
        } else {
            let landed = m.promotion.unwrap_or(mover);
            self.set_piece(m.to, color, landed);
            hash ^= ZOBRIST.piece(color, landed, m.to);
        }

        self.en_passant_target = None;
        if mover == Piece::Pawn && m.from.0.abs_diff(m.to.0) == 2 {
            let ep = Square((m.from.0 + m.to.0) / 2, m.from.1);
            self.en_passant_target = Some(ep);
            hash ^= ZOBRIST.en_passant_file(ep.1);
        }

        if mover == Piece::Pawn || victim.is_some() {
            self.halfmove_clock = 0;
        } else {
            self.halfmove_clock = self.halfmove_clock.saturating_add(1);
        }

        if mover == Piece::King {
            self.drop_right(kingside_flag(color), &mut hash);
            self.drop_right(queenside_flag(color), &mut hash);
        } else if mover == Piece::Rook {
            let home = color.back_rank();
            if m.from == Square(home, 0) {
                self.drop_right(queenside_flag(color), &mut hash);
            } else if m.from == Square(home, 7) {
                self.drop_right(kingside_flag(color), &mut hash);
            }
        }

        // A rook captured on its home square also forfeits that right.
        if let Some((victim_color, Piece::Rook)) = victim {
            let home = victim_color.back_rank();
            if m.to == Square(home, 0) {
                self.drop_right(queenside_flag(victim_color), &mut hash);
            } else if m.to == Square(home, 7) {
                self.drop_right(kingside_flag(victim_color), &mut hash);
            }
        }

        if color == Color::Black {
            self.fullmove_number = self.fullmove_number.saturating_add(1);
        }
        self.white_to_move = !self.white_to_move;
        self.hash = hash;

        let repetitions_before = self.repetition_counts.get(hash);
        self.repetition_counts.increment(hash);

        UnmakeInfo {
            victim,
            hash_after: hash,
            repetitions_before,
            ..saved
        }
    }

    /// Revert a move made by `make_move`, restoring hash, clocks, rights,
    /// and repetition counts exactly.
    pub fn unmake_move(&mut self, m: &Move, info: UnmakeInfo) {
        self.repetition_counts
            .set(info.hash_after, info.repetitions_before);

        self.white_to_move = !self.white_to_move;
        self.en_passant_target = info.en_passant;
        self.castling_rights = info.castling_rights;
        self.halfmove_clock = info.halfmove_clock;
        self.fullmove_number = info.fullmove_number;
        self.hash = info.hash_before;

        let color = self.side_to_move();

        if m.is_castling {
            self.remove_piece(m.to);
            self.set_piece(m.from, color, Piece::King);

            let (rook_from, rook_to) = castling_rook_squares(m.to);
            self.remove_piece(rook_to);
            self.set_piece(rook_from, color, Piece::Rook);
            return;
        }

        let (_, landed) = self
            .piece_at(m.to)
            .expect("unmake_move found an empty destination square");
        self.remove_piece(m.to);
        // A promoted piece turns back into the pawn that moved.
        let mover = if m.promotion.is_some() {
            Piece::Pawn
        } else {
            landed
        };
        self.set_piece(m.from, color, mover);

        if let Some((victim_color, victim_piece)) = info.victim {
            let victim_sq = if m.is_en_passant {
                Square(m.from.0, m.to.1)
            } else {
                m.to
            };
            self.set_piece(victim_sq, victim_color, victim_piece);
        }
    }
}
