//! Static position evaluation: material, piece-square tables, and mobility.
//!
//! Scores are centipawns from White's perspective. Search callers flip the
//! sign for the side to move.

use crate::board::{Board, Color, Piece, Square};

use super::constants::MOBILITY_DIVISOR;

// Piece-square tables, indexed by `Square::as_index()` (a1 = 0, h8 = 63).
// Rows therefore run from rank 1 at the top of each literal to rank 8 at
// the bottom. White reads the tables directly; Black reads through the
// vertical mirror (`idx ^ 56`) so one table serves both colors.

const PAWN_TABLE: [i32; 64] = [
    0,   0,   0,   0,   0,   0,   0,   0,
    5,   10,  10,  -20, -20, 10,  10,  5,
    5,   -5,  -10, 0,   0,   -10, -5,  5,
    0,   0,   0,   20,  20,  0,   0,   0,
    5,   5,   10,  25,  25,  10,  5,   5,
    10,  10,  20,  30,  30,  20,  10,  10,
    50,  50,  50,  50,  50,  50,  50,  50,
    0,   0,   0,   0,   0,   0,   0,   0,
];

const KNIGHT_TABLE: [i32; 64] = [
    -50, -40, -30, -30, -30, -30, -40, -50,
    -40, -20, 0,   5,   5,   0,   -20, -40,
    -30, 5,   10,  15,  15,  10,  5,   -30,
    -30, 0,   15,  20,  20,  15,  0,   -30,
    -30, 5,   15,  20,  20,  15,  5,   -30,
    -30, 0,   10,  15,  15,  10,  0,   -30,
    -40, -20, 0,   0,   0,   0,   -20, -40,
    -50, -40, -30, -30, -30, -30, -40, -50,
];

const BISHOP_TABLE: [i32; 64] = [
    -20, -10, -10, -10, -10, -10, -10, -20,
    -10, 5,   0,   0,   0,   0,   5,   -10,
    -10, 10,  10,  10,  10,  10,  10,  -10,
    -10, 0,   10,  10,  10,  10,  0,   -10,
    -10, 5,   5,   10,  10,  5,   5,   -10,
    -10, 0,   5,   10,  10,  5,   0,   -10,
    -10, 0,   0,   0,   0,   0,   0,   -10,
    -20, -10, -10, -10, -10, -10, -10, -20,
];

const ROOK_TABLE: [i32; 64] = [
    0,   0,   0,   5,   5,   0,   0,   0,
    -5,  0,   0,   0,   0,   0,   0,   -5,
    -5,  0,   0,   0,   0,   0,   0,   -5,
    -5,  0,   0,   0,   0,   0,   0,   -5,
    -5,  0,   0,   0,   0,   0,   0,   -5,
    -5,  0,   0,   0,   0,   0,   0,   -5,
    5,   10,  10,  10,  10,  10,  10,  5,
    0,   0,   0,   0,   0,   0,   0,   0,
];

const QUEEN_TABLE: [i32; 64] = [
    -20, -10, -10, -5,  -5,  -10, -10, -20,
    -10, 0,   5,   0,   0,   0,   0,   -10,
    -10, 5,   5,   5,   5,   5,   0,   -10,
    0,   0,   5,   5,   5,   5,   0,   -5,
    -5,  0,   5,   5,   5,   5,   0,   -5,
    -10, 0,   5,   5,   5,   5,   0,   -10,
    -10, 0,   0,   0,   0,   0,   0,   -10,
    -20, -10, -10, -5,  -5,  -10, -10, -20,
];

const KING_TABLE: [i32; 64] = [
    20,  30,  10,  0,   0,   10,  30,  20,
    20,  20,  0,   0,   0,   0,   20,  20,
    -10, -20, -20, -20, -20, -20, -20, -10,
    -20, -30, -30, -40, -40, -30, -30, -20,
    -30, -40, -40, -50, -50, -40, -40, -30,
    -30, -40, -40, -50, -50, -40, -40, -30,
    -30, -40, -40, -50, -50, -40, -40, -30,
    -30, -40, -40, -50, -50, -40, -40, -30,
];

/// Piece-square bonus for a piece of the given color on a square.
fn piece_square_bonus(color: Color, piece: Piece, square: Square) -> i32 {
    let sq = square.as_index();
    let table_sq = match color {
        Color::White => sq,
        Color::Black => sq ^ 56, // vertical mirror
    };
    match piece {
        Piece::Pawn => PAWN_TABLE[table_sq],
        Piece::Knight => KNIGHT_TABLE[table_sq],
        Piece::Bishop => BISHOP_TABLE[table_sq],
        Piece::Rook => ROOK_TABLE[table_sq],
        Piece::Queen => QUEEN_TABLE[table_sq],
        Piece::King => KING_TABLE[table_sq],
    }
}

/// Evaluate a position from White's perspective, in centipawns.
///
/// Sums material and piece-square terms over all pieces, plus a small
/// mobility term (a fifth of a centipawn per legal move) credited to the
/// side to move. Needs `&mut Board` because counting legal moves plays
/// each candidate out internally, but the position is fully restored
/// before returning.
#[must_use]
pub fn evaluate(board: &mut Board) -> i32 {
    let mut score = 0;
    for rank in 0..8 {
        for file in 0..8 {
            let square = Square(rank, file);
            if let Some((color, piece)) = board.piece_at(square) {
                score += color.sign() * (piece.value() + piece_square_bonus(color, piece, square));
            }
        }
    }

    let mobility = board.generate_moves().len() as i32 / MOBILITY_DIVISOR;
    score + board.side_to_move().sign() * mobility
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sq(name: &str) -> Square {
        name.parse().unwrap()
    }

    #[test]
    fn table_anchors() {
        assert_eq!(piece_square_bonus(Color::White, Piece::Pawn, sq("e2")), -20);
        assert_eq!(piece_square_bonus(Color::White, Piece::Pawn, sq("e4")), 20);
        assert_eq!(piece_square_bonus(Color::White, Piece::Pawn, sq("e7")), 50);
        assert_eq!(piece_square_bonus(Color::White, Piece::Knight, sq("f3")), 10);
        assert_eq!(piece_square_bonus(Color::White, Piece::Bishop, sq("b2")), 5);
        assert_eq!(piece_square_bonus(Color::White, Piece::Rook, sq("d1")), 5);
        assert_eq!(piece_square_bonus(Color::White, Piece::Queen, sq("d1")), -5);
        assert_eq!(piece_square_bonus(Color::White, Piece::King, sq("e1")), 0);
        assert_eq!(piece_square_bonus(Color::White, Piece::King, sq("g1")), 30);
    }

    #[test]
    fn black_mirrors_white() {
        // A black piece on its seventh rank scores like a white piece on rank 2.
        assert_eq!(piece_square_bonus(Color::Black, Piece::Pawn, sq("e7")), -20);
        assert_eq!(piece_square_bonus(Color::Black, Piece::Pawn, sq("e5")), 20);
        assert_eq!(piece_square_bonus(Color::Black, Piece::Knight, sq("f6")), 10);
        assert_eq!(piece_square_bonus(Color::Black, Piece::King, sq("g8")), 30);
        for piece in Piece::ALL {
            for idx in 0..64 {
                let square = Square::from_index(idx);
                assert_eq!(
                    piece_square_bonus(Color::White, piece, square),
                    piece_square_bonus(Color::Black, piece, square.flip_vertical()),
                );
            }
        }
    }

    #[test]
    fn startpos_eval_is_mobility_only() {
        // Material and piece-square terms cancel; White's 20 legal moves
        // contribute 20 / 5 = 4.
        let mut board = Board::new();
        assert_eq!(evaluate(&mut board), 4);
    }

    #[test]
    fn eval_after_e4() {
        // The e-pawn goes from -20 to +20, and the mobility term now counts
        // Black's 20 replies: 40 - 4 = 36.
        let mut board = Board::new();
        board.make_move_uci("e2e4").unwrap();
        assert_eq!(evaluate(&mut board), 36);
    }

    #[test]
    fn queen_up_is_winning() {
        let mut white_up =
            Board::try_from_fen("rnb1kbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1")
                .unwrap();
        let mut black_up =
            Board::try_from_fen("rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNB1KBNR w KQkq - 0 1")
                .unwrap();
        assert!(evaluate(&mut white_up) > 800);
        assert!(evaluate(&mut black_up) < -800);
    }

    #[test]
    fn evaluation_is_antisymmetric() {
        // Positions mirrored vertically with colors swapped must evaluate to
        // exact negations, including the side-to-move mobility term.
        let pairs = [
            (
                "rnbqkbnr/pppppppp/8/8/4P3/8/PPPP1PPP/RNBQKBNR b KQkq - 0 1",
                "rnbqkbnr/pppp1ppp/8/4p3/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1",
            ),
            (
                "r1bqkbnr/pppp1ppp/2n5/4p3/2B1P3/5N2/PPPP1PPP/RNBQK2R w KQkq - 0 1",
                "rnbqk2r/pppp1ppp/5n2/2b1p3/4P3/2N5/PPPP1PPP/R1BQKBNR b KQkq - 0 1",
            ),
            (
                "4k3/8/8/3Q4/8/8/8/4K3 w - - 0 1",
                "4k3/8/8/8/3q4/8/8/4K3 b - - 0 1",
            ),
        ];
        for (original, mirrored) in pairs {
            let mut a = Board::try_from_fen(original).unwrap();
            let mut b = Board::try_from_fen(mirrored).unwrap();
            assert_eq!(evaluate(&mut a), -evaluate(&mut b), "fen: {original}");
        }
    }

    #[test]
    fn evaluate_restores_position() {
        let fen = "r3k2r/p1ppqpb1/bn2pnp1/3PN3/1p2P3/2N2Q1p/PPPBBPPP/R3K2R w KQkq - 0 1";
        let mut board = Board::try_from_fen(fen).unwrap();
        let hash_before = board.hash();
        evaluate(&mut board);
        assert_eq!(board.hash(), hash_before);
        assert_eq!(board.to_fen(), fen);
    }
}
