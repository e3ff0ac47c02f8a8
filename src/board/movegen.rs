//! Pseudo-legal move generation plus the make/unmake legality filter.

use super::types::PROMOTION_PIECES;
use super::{Board, Color, Move, MoveList, Piece, Square};

const KNIGHT_OFFSETS: [(isize, isize); 8] = [
    (2, 1),
    (2, -1),
    (-2, 1),
    (-2, -1),
    (1, 2),
    (1, -2),
    (-1, 2),
    (-1, -2),
];

const KING_OFFSETS: [(isize, isize); 8] = [
    (1, 0),
    (-1, 0),
    (0, 1),
    (0, -1),
    (1, 1),
    (1, -1),
    (-1, 1),
    (-1, -1),
];

const ROOK_DIRECTIONS: [(isize, isize); 4] = [(1, 0), (-1, 0), (0, 1), (0, -1)];
const BISHOP_DIRECTIONS: [(isize, isize); 4] = [(1, 1), (1, -1), (-1, 1), (-1, -1)];
const QUEEN_DIRECTIONS: [(isize, isize); 8] = [
    (1, 0),
    (-1, 0),
    (0, 1),
    (0, -1),
    (1, 1),
    (1, -1),
    (-1, 1),
    (-1, -1),
];

#[inline]
fn in_bounds(rank: isize, file: isize) -> bool {
    (0..8).contains(&rank) && (0..8).contains(&file)
}

impl Board {
    #[inline]
    pub(crate) fn is_empty_square(&self, sq: Square) -> bool {
        self.squares[sq.0][sq.1].is_none()
    }

    fn create_move(
        &self,
        from: Square,
        to: Square,
        promotion: Option<Piece>,
        is_castling: bool,
        is_en_passant: bool,
    ) -> Move {
        let captured_piece = if is_en_passant {
            Some(Piece::Pawn)
        } else if !is_castling {
            self.piece_at(to).map(|(_, p)| p)
        } else {
            None
        };

        Move {
            from,
            to,
            promotion,
            captured_piece,
            is_castling,
            is_en_passant,
        }
    }

    fn generate_pseudo_moves(&self) -> MoveList {
        let mut moves = MoveList::new();
        let color = self.side_to_move();

        for rank in 0..8 {
            for file in 0..8 {
                let Some((piece_color, piece)) = self.squares[rank][file] else {
                    continue;
                };
                if piece_color != color {
                    continue;
                }
                let from = Square(rank, file);
                match piece {
                    Piece::Pawn => self.generate_pawn_moves(from, &mut moves),
                    Piece::Knight => self.generate_step_moves(from, &KNIGHT_OFFSETS, &mut moves),
                    Piece::Bishop => {
                        self.generate_sliding_moves(from, &BISHOP_DIRECTIONS, &mut moves)
                    }
                    Piece::Rook => self.generate_sliding_moves(from, &ROOK_DIRECTIONS, &mut moves),
                    Piece::Queen => {
                        self.generate_sliding_moves(from, &QUEEN_DIRECTIONS, &mut moves)
                    }
                    Piece::King => self.generate_king_moves(from, &mut moves),
                }
            }
        }
        moves
    }

    fn generate_pawn_moves(&self, from: Square, moves: &mut MoveList) {
        let color = self.side_to_move();
        let dir = color.pawn_direction();
        let start_rank = color.pawn_start_rank();
        let promotion_rank = color.pawn_promotion_rank();

        let r = from.0 as isize;
        let f = from.1 as isize;
        let forward_r = r + dir;

        if in_bounds(forward_r, f) {
            let forward_sq = Square(forward_r as usize, f as usize);
            if self.is_empty_square(forward_sq) {
                if forward_sq.0 == promotion_rank {
                    for promo in PROMOTION_PIECES {
                        moves.push(self.create_move(from, forward_sq, Some(promo), false, false));
                    }
                } else {
                    moves.push(self.create_move(from, forward_sq, None, false, false));
                    if from.0 == start_rank {
                        let double_sq = Square((r + 2 * dir) as usize, f as usize);
                        if self.is_empty_square(double_sq) {
                            moves.push(self.create_move(from, double_sq, None, false, false));
                        }
                    }
                }
            }
        }

        for df in [-1, 1] {
            let capture_f = f + df;
            if !in_bounds(forward_r, capture_f) {
                continue;
            }
            let target_sq = Square(forward_r as usize, capture_f as usize);
            if let Some((target_color, _)) = self.piece_at(target_sq) {
                if target_color != color {
                    if target_sq.0 == promotion_rank {
                        for promo in PROMOTION_PIECES {
                            moves.push(self.create_move(from, target_sq, Some(promo), false, false));
                        }
                    } else {
                        moves.push(self.create_move(from, target_sq, None, false, false));
                    }
                }
            } else if Some(target_sq) == self.en_passant_target {
                moves.push(self.create_move(from, target_sq, None, false, true));
            }
        }
    }

    fn generate_step_moves(&self, from: Square, offsets: &[(isize, isize)], moves: &mut MoveList) {
        let color = self.side_to_move();
        let r = from.0 as isize;
        let f = from.1 as isize;

        for &(dr, df) in offsets {
            let (to_r, to_f) = (r + dr, f + df);
            if !in_bounds(to_r, to_f) {
                continue;
            }
            let to_sq = Square(to_r as usize, to_f as usize);
            match self.piece_at(to_sq) {
                Some((occupant, _)) if occupant == color => {}
                _ => moves.push(self.create_move(from, to_sq, None, false, false)),
            }
        }
    }

    fn generate_sliding_moves(
        &self,
        from: Square,
        directions: &[(isize, isize)],
        moves: &mut MoveList,
    ) {
        let color = self.side_to_move();
        let r = from.0 as isize;
        let f = from.1 as isize;

        for &(dr, df) in directions {
            let (mut to_r, mut to_f) = (r + dr, f + df);
            while in_bounds(to_r, to_f) {
                let to_sq = Square(to_r as usize, to_f as usize);
                match self.piece_at(to_sq) {
                    None => moves.push(self.create_move(from, to_sq, None, false, false)),
                    Some((occupant, _)) => {
                        if occupant != color {
                            moves.push(self.create_move(from, to_sq, None, false, false));
                        }
                        break;
                    }
                }
                to_r += dr;
                to_f += df;
            }
        }
    }

    fn generate_king_moves(&self, from: Square, moves: &mut MoveList) {
        let color = self.side_to_move();
        self.generate_step_moves(from, &KING_OFFSETS, moves);

        let back_rank = color.back_rank();
        if from == Square(back_rank, 4) {
            if self.has_kingside_right(color)
                && self.is_empty_square(Square(back_rank, 5))
                && self.is_empty_square(Square(back_rank, 6))
                && self.piece_at(Square(back_rank, 7)) == Some((color, Piece::Rook))
            {
                moves.push(self.create_move(from, Square(back_rank, 6), None, true, false));
            }
            if self.has_queenside_right(color)
                && self.is_empty_square(Square(back_rank, 1))
                && self.is_empty_square(Square(back_rank, 2))
                && self.is_empty_square(Square(back_rank, 3))
                && self.piece_at(Square(back_rank, 0)) == Some((color, Piece::Rook))
            {
                moves.push(self.create_move(from, Square(back_rank, 2), None, true, false));
            }
        }
    }

    /// Whether `attacker_color` attacks `square`.
    pub(crate) fn is_square_attacked(&self, square: Square, attacker_color: Color) -> bool {
        let r = square.0 as isize;
        let f = square.1 as isize;

        // Pawns attack diagonally forward, so look one rank back toward
        // the attacker's side.
        let pawn_rank = r - attacker_color.pawn_direction();
        for df in [-1, 1] {
            if in_bounds(pawn_rank, f + df)
                && self.squares[pawn_rank as usize][(f + df) as usize]
                    == Some((attacker_color, Piece::Pawn))
            {
                return true;
            }
        }

        for &(dr, df) in &KNIGHT_OFFSETS {
            if in_bounds(r + dr, f + df)
                && self.squares[(r + dr) as usize][(f + df) as usize]
                    == Some((attacker_color, Piece::Knight))
            {
                return true;
            }
        }

        for &(dr, df) in &KING_OFFSETS {
            if in_bounds(r + dr, f + df)
                && self.squares[(r + dr) as usize][(f + df) as usize]
                    == Some((attacker_color, Piece::King))
            {
                return true;
            }
        }

        // Slider rays stop at the first occupied square.
        for &(dr, df) in &ROOK_DIRECTIONS {
            let (mut to_r, mut to_f) = (r + dr, f + df);
            while in_bounds(to_r, to_f) {
                if let Some((color, piece)) = self.squares[to_r as usize][to_f as usize] {
                    if color == attacker_color
                        && matches!(piece, Piece::Rook | Piece::Queen)
                    {
                        return true;
                    }
                    break;
                }
                to_r += dr;
                to_f += df;
            }
        }

        for &(dr, df) in &BISHOP_DIRECTIONS {
            let (mut to_r, mut to_f) = (r + dr, f + df);
            while in_bounds(to_r, to_f) {
                if let Some((color, piece)) = self.squares[to_r as usize][to_f as usize] {
                    if color == attacker_color
                        && matches!(piece, Piece::Bishop | Piece::Queen)
                    {
                        return true;
                    }
                    break;
                }
                to_r += dr;
                to_f += df;
            }
        }

        false
    }

    /// Whether `color`'s king is attacked.
    #[must_use]
    pub fn is_in_check(&self, color: Color) -> bool {
        if let Some(king_sq) = self.king_square(color) {
            self.is_square_attacked(king_sq, color.opponent())
        } else {
            false
        }
    }

    /// Generate all legal moves for the side to move.
    ///
    /// Pseudo-legal moves are filtered by playing each one and rejecting
    /// those that leave the mover's king attacked. Castling additionally
    /// requires the king's start, transit, and end squares to be safe.
    pub fn generate_moves(&mut self) -> MoveList {
        let current_color = self.side_to_move();
        let opponent_color = current_color.opponent();
        let pseudo_moves = self.generate_pseudo_moves();
        let mut legal_moves = MoveList::new();

        for m in pseudo_moves.iter() {
            if m.is_castling {
                let king_mid_sq = Square(m.from.0, (m.from.1 + m.to.1) / 2);
                if self.is_square_attacked(m.from, opponent_color)
                    || self.is_square_attacked(king_mid_sq, opponent_color)
                    || self.is_square_attacked(m.to, opponent_color)
                {
                    continue;
                }
            }

            let info = self.make_move(m);
            if !self.is_in_check(current_color) {
                legal_moves.push(*m);
            }
            self.unmake_move(m, info);
        }
        legal_moves
    }

    /// Legal captures and promotions only, for quiescence search.
    pub(crate) fn generate_tactical_moves(&mut self) -> MoveList {
        let current_color = self.side_to_move();
        let mut pseudo_moves = self.generate_pseudo_moves();
        pseudo_moves.retain(|m| (m.is_capture() || m.is_promotion()) && !m.is_castling);

        let mut legal_moves = MoveList::new();
        for m in pseudo_moves.iter() {
            let info = self.make_move(m);
            if !self.is_in_check(current_color) {
                legal_moves.push(*m);
            }
            self.unmake_move(m, info);
        }
        legal_moves
    }

    #[must_use]
    pub fn is_checkmate(&mut self) -> bool {
        let color = self.side_to_move();
        self.is_in_check(color) && self.generate_moves().is_empty()
    }

    #[must_use]
    pub fn is_stalemate(&mut self) -> bool {
        let color = self.side_to_move();
        !self.is_in_check(color) && self.generate_moves().is_empty()
    }

    /// Count leaf nodes of the legal move tree to `depth`.
    pub fn perft(&mut self, depth: usize) -> u64 {
        if depth == 0 {
            return 1;
        }

        let moves = self.generate_moves();
        if depth == 1 {
            return moves.len() as u64;
        }

        let mut nodes = 0;
        for m in moves.iter() {
            let info = self.make_move(m);
            nodes += self.perft(depth - 1);
            self.unmake_move(m, info);
        }

        nodes
    }
}
