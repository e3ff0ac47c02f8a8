//! FEN parsing and serialization, plus coordinate-notation move parsing.

use std::str::FromStr;

use super::error::{FenError, MoveParseError};
use super::{
    Board, Color, Move, Piece, Square, CASTLE_BLACK_K, CASTLE_BLACK_Q, CASTLE_WHITE_K,
    CASTLE_WHITE_Q,
};

/// Castling rights bits paired with their FEN flags, in FEN field order.
const CASTLING_FLAGS: [(u8, char); 4] = [
    (CASTLE_WHITE_K, 'K'),
    (CASTLE_WHITE_Q, 'Q'),
    (CASTLE_BLACK_K, 'k'),
    (CASTLE_BLACK_Q, 'q'),
];

fn castling_from_field(field: &str) -> Result<u8, FenError> {
    if field == "-" {
        return Ok(0);
    }
    let mut rights = 0;
    for symbol in field.chars() {
        rights |= match symbol {
            'K' => CASTLE_WHITE_K,
            'Q' => CASTLE_WHITE_Q,
            'k' => CASTLE_BLACK_K,
            'q' => CASTLE_BLACK_Q,
            _ => return Err(FenError::BadCastlingFlag { symbol }),
        };
    }
    Ok(rights)
}

fn en_passant_from_field(field: &str) -> Result<Option<Square>, FenError> {
    if field == "-" {
        return Ok(None);
    }
    field
        .parse::<Square>()
        .map(Some)
        .map_err(|_| FenError::BadEnPassant {
            token: field.to_string(),
        })
}

fn counter_from_field(field: &str) -> Result<u32, FenError> {
    field.parse().map_err(|_| FenError::BadCounter {
        token: field.to_string(),
    })
}

impl Board {
    /// Parse a position from FEN notation.
    ///
    /// The halfmove clock and fullmove number fields are optional and
    /// default to 0 and 1.
    pub fn try_from_fen(fen: &str) -> Result<Self, FenError> {
        let fields: Vec<&str> = fen.split_whitespace().collect();
        if fields.len() < 4 {
            return Err(FenError::MissingFields {
                found: fields.len(),
            });
        }

        let mut board = Board::empty();
        board.read_placement(fields[0])?;
        board.white_to_move = match fields[1] {
            "w" => true,
            "b" => false,
            token => {
                return Err(FenError::BadSideToMove {
                    token: token.to_string(),
                })
            }
        };
        board.castling_rights = castling_from_field(fields[2])?;
        board.en_passant_target = en_passant_from_field(fields[3])?;
        if let Some(&field) = fields.get(4) {
            board.halfmove_clock = counter_from_field(field)?;
        }
        if let Some(&field) = fields.get(5) {
            board.fullmove_number = counter_from_field(field)?;
        }

        board.hash = board.calculate_initial_hash();
        board.repetition_counts.set(board.hash, 1);
        Ok(board)
    }

    /// Fill the piece array from the FEN placement field.
    fn read_placement(&mut self, field: &str) -> Result<(), FenError> {
        let rank_count = field.split('/').count();
        if rank_count != 8 {
            return Err(FenError::RankCount { found: rank_count });
        }

        // FEN lists ranks from 8 down to 1.
        for (row, rank_field) in field.split('/').enumerate() {
            let rank = 7 - row;
            let mut file = 0;
            for symbol in rank_field.chars() {
                if let Some(run) = symbol.to_digit(10) {
                    file += run as usize;
                    continue;
                }
                let piece = Piece::from_char(symbol).ok_or(FenError::UnknownPiece { symbol })?;
                let color = if symbol.is_ascii_uppercase() {
                    Color::White
                } else {
                    Color::Black
                };
                if file >= 8 {
                    return Err(FenError::RankTooLong { rank: rank + 1 });
                }
                self.squares[rank][file] = Some((color, piece));
                file += 1;
            }
            // Empty-square runs skip the in-loop bound check, so the total
            // has to be validated per rank.
            if file != 8 {
                return Err(FenError::BadRankWidth {
                    rank: rank + 1,
                    found: file,
                });
            }
        }
        Ok(())
    }

    /// Serialize the position to FEN notation.
    #[must_use]
    pub fn to_fen(&self) -> String {
        let mut fen = String::new();

        for rank in (0..8).rev() {
            let mut run: u8 = 0;
            for file in 0..8 {
                match self.squares[rank][file] {
                    Some((color, piece)) => {
                        if run > 0 {
                            fen.push((b'0' + run) as char);
                            run = 0;
                        }
                        fen.push(piece.to_fen_char(color));
                    }
                    None => run += 1,
                }
            }
            if run > 0 {
                fen.push((b'0' + run) as char);
            }
            if rank > 0 {
                fen.push('/');
            }
        }

        fen.push(' ');
        fen.push(if self.white_to_move { 'w' } else { 'b' });

        fen.push(' ');
        if self.castling_rights == 0 {
            fen.push('-');
        } else {
            for (bit, flag) in CASTLING_FLAGS {
                if self.castling_rights & bit != 0 {
                    fen.push(flag);
                }
            }
        }

        fen.push(' ');
        match self.en_passant_target {
            Some(square) => fen.push_str(&square.to_string()),
            None => fen.push('-'),
        }

        fen.push(' ');
        fen.push_str(&self.halfmove_clock.to_string());
        fen.push(' ');
        fen.push_str(&self.fullmove_number.to_string());
        fen
    }

    /// Parse a move in coordinate notation (e.g. `e2e4`, `e7e8q`) against
    /// the current position.
    ///
    /// The move must be legal here; parsing resolves it to the generated
    /// [`Move`] with its capture and castling details filled in.
    ///
    /// # Example
    /// ```
    /// use gemstone_chess::board::Board;
    ///
    /// let mut board = Board::new();
    /// let mv = board.parse_move("e2e4").unwrap();
    /// assert_eq!(mv.to_string(), "e2e4");
    /// ```
    pub fn parse_move(&mut self, notation: &str) -> Result<Move, MoveParseError> {
        let len = notation.chars().count();
        if len != 4 && len != 5 {
            return Err(MoveParseError::BadLength { len });
        }
        if !notation.is_ascii() {
            return Err(MoveParseError::BadSquare {
                notation: notation.to_string(),
            });
        }

        let square = |range: std::ops::Range<usize>| {
            notation[range]
                .parse::<Square>()
                .map_err(|_| MoveParseError::BadSquare {
                    notation: notation.to_string(),
                })
        };
        let from = square(0..2)?;
        let to = square(2..4)?;

        let promotion = if len == 5 {
            let symbol = notation.as_bytes()[4] as char;
            match Piece::from_char(symbol) {
                None | Some(Piece::Pawn) | Some(Piece::King) => {
                    return Err(MoveParseError::BadPromotion { symbol })
                }
                Some(piece) => Some(piece),
            }
        } else {
            None
        };

        self.generate_moves()
            .iter()
            .find(|m| m.from == from && m.to == to && m.promotion == promotion)
            .copied()
            .ok_or(MoveParseError::Illegal {
                notation: notation.to_string(),
            })
    }

    /// Parse a coordinate-notation move and play it in one call.
    ///
    /// # Example
    /// ```
    /// use gemstone_chess::board::Board;
    ///
    /// let mut board = Board::new();
    /// board.make_move_uci("e2e4").unwrap();
    /// board.make_move_uci("e7e5").unwrap();
    /// ```
    pub fn make_move_uci(&mut self, notation: &str) -> Result<Move, MoveParseError> {
        let mv = self.parse_move(notation)?;
        self.make_move(&mv);
        Ok(mv)
    }
}

impl FromStr for Board {
    type Err = FenError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Board::try_from_fen(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round_trips_the_start_position() {
        let fen = "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1";
        let board = Board::try_from_fen(fen).unwrap();
        assert_eq!(board.to_fen(), fen);
    }

    #[test]
    fn round_trips_clocks_castling_and_en_passant() {
        let fens = [
            "r3k2r/p1ppqpb1/bn2pnp1/3PN3/1p2P3/2N2Q1p/PPPBBPPP/R3K2R w KQkq - 3 12",
            "rnbqkbnr/pppppppp/8/8/4P3/8/PPPP1PPP/RNBQKBNR b KQkq e3 0 1",
            "8/8/8/8/8/8/8/K1k5 w - - 42 60",
            "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w Kq - 0 1",
        ];
        for fen in fens {
            let board = Board::try_from_fen(fen).unwrap();
            assert_eq!(board.to_fen(), fen, "fen: {fen}");
        }
    }

    #[test]
    fn reads_side_to_move_and_en_passant() {
        let board =
            Board::try_from_fen("rnbqkbnr/pppppppp/8/8/4P3/8/PPPP1PPP/RNBQKBNR b KQkq e3 0 1")
                .unwrap();
        assert!(!board.white_to_move());
        assert_eq!(board.en_passant_target(), Some(Square::new(2, 4)));
    }

    #[test]
    fn reads_partial_castling_rights() {
        let board =
            Board::try_from_fen("rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w Kq - 0 1").unwrap();
        assert_ne!(board.castling_rights & CASTLE_WHITE_K, 0);
        assert_eq!(board.castling_rights & CASTLE_WHITE_Q, 0);
        assert_eq!(board.castling_rights & CASTLE_BLACK_K, 0);
        assert_ne!(board.castling_rights & CASTLE_BLACK_Q, 0);

        let none = Board::try_from_fen("rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w - - 0 1")
            .unwrap();
        assert_eq!(none.castling_rights, 0);
    }

    #[test]
    fn rejects_malformed_fens() {
        let board = Board::try_from_fen("rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w");
        assert!(matches!(board, Err(FenError::MissingFields { found: 2 })));

        let board = Board::try_from_fen("8/8/8/8/8/8/8 w - - 0 1");
        assert!(matches!(board, Err(FenError::RankCount { found: 7 })));

        let board = Board::try_from_fen("ppppppppp/8/8/8/8/8/8/8 b - - 0 1");
        assert!(matches!(board, Err(FenError::RankTooLong { rank: 8 })));

        let board =
            Board::try_from_fen("rnbqkbnr/pppjpppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1");
        assert!(matches!(board, Err(FenError::UnknownPiece { symbol: 'j' })));

        let board =
            Board::try_from_fen("rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR white KQkq - 0 1");
        assert!(matches!(board, Err(FenError::BadSideToMove { .. })));

        let board =
            Board::try_from_fen("rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkA - 0 1");
        assert!(matches!(board, Err(FenError::BadCastlingFlag { symbol: 'A' })));

        let board =
            Board::try_from_fen("rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq e9 0 1");
        assert!(matches!(board, Err(FenError::BadEnPassant { .. })));

        let board = Board::try_from_fen("8/8/8/8/8/8/8/K1k5 w - - abc 1");
        assert!(matches!(board, Err(FenError::BadCounter { .. })));
    }

    #[test]
    fn rejects_ranks_not_totalling_eight_squares() {
        // Underfull rank: seven squares described.
        let board = Board::try_from_fen("p6/8/8/8/8/8/8/8 b - - 0 1");
        assert!(matches!(
            board,
            Err(FenError::BadRankWidth { rank: 8, found: 7 })
        ));

        // Digit overrun with no piece to trip the per-square bound.
        let board = Board::try_from_fen("9/8/8/8/8/8/8/8 w - - 0 1");
        assert!(matches!(
            board,
            Err(FenError::BadRankWidth { rank: 8, found: 9 })
        ));

        let board = Board::try_from_fen("8/8/8/44444444/8/8/8/8 w - - 0 1");
        assert!(matches!(
            board,
            Err(FenError::BadRankWidth { rank: 5, found: 32 })
        ));
    }

    #[test]
    fn parses_a_plain_move() {
        let mut board = Board::new();
        let mv = board.parse_move("e2e4").unwrap();
        assert_eq!(mv.from, Square::new(1, 4));
        assert_eq!(mv.to, Square::new(3, 4));
        assert!(!mv.is_capture());
    }

    #[test]
    fn parses_a_promotion_move() {
        let mut board = Board::try_from_fen("8/P7/8/8/8/8/8/K1k5 w - - 0 1").unwrap();
        let mv = board.parse_move("a7a8q").unwrap();
        assert_eq!(mv.promotion, Some(Piece::Queen));
        let mv = board.parse_move("a7a8n").unwrap();
        assert_eq!(mv.promotion, Some(Piece::Knight));
    }

    #[test]
    fn rejects_malformed_moves() {
        let mut board = Board::new();
        assert!(matches!(
            board.parse_move("e2"),
            Err(MoveParseError::BadLength { len: 2 })
        ));
        assert!(matches!(
            board.parse_move("z9z9"),
            Err(MoveParseError::BadSquare { .. })
        ));
        // A pawn cannot jump three ranks.
        assert!(matches!(
            board.parse_move("e2e5"),
            Err(MoveParseError::Illegal { .. })
        ));

        let mut promo = Board::try_from_fen("8/P7/8/8/8/8/8/K1k5 w - - 0 1").unwrap();
        assert!(matches!(
            promo.parse_move("a7a8p"),
            Err(MoveParseError::BadPromotion { symbol: 'p' })
        ));
        assert!(matches!(
            promo.parse_move("a7a8k"),
            Err(MoveParseError::BadPromotion { symbol: 'k' })
        ));
    }

    #[test]
    fn make_move_uci_advances_the_position() {
        let mut board = Board::new();
        board.make_move_uci("e2e4").unwrap();
        assert!(!board.white_to_move());
        board.make_move_uci("e7e5").unwrap();
        assert!(board.white_to_move());
    }

    #[test]
    fn castling_round_trips_through_fen() {
        let mut board = Board::try_from_fen("r3k2r/8/8/8/8/8/8/R3K2R w KQkq - 0 1").unwrap();
        board.make_move_uci("e1g1").unwrap();
        assert!(board.to_fen().starts_with("r3k2r/8/8/8/8/8/8/R4RK1 b kq -"));
    }

    #[test]
    fn implements_from_str() {
        let board: Board = "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1"
            .parse()
            .unwrap();
        assert!(board.white_to_move());
    }
}
