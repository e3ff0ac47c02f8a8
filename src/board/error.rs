//! Error types for FEN, move, and square parsing.

use std::fmt;

/// Why a FEN string was rejected.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FenError {
    /// Fewer than the four mandatory fields are present.
    MissingFields { found: usize },
    /// The placement field does not describe exactly eight ranks.
    RankCount { found: usize },
    /// A rank in the placement field describes more than eight squares.
    RankTooLong { rank: usize },
    /// A rank in the placement field does not total exactly eight squares.
    BadRankWidth { rank: usize, found: usize },
    /// A character in the placement field names no piece.
    UnknownPiece { symbol: char },
    /// The side-to-move field is neither `w` nor `b`.
    BadSideToMove { token: String },
    /// The castling field contains an unrecognized flag.
    BadCastlingFlag { symbol: char },
    /// The en passant field is neither `-` nor a square.
    BadEnPassant { token: String },
    /// A move counter is not a non-negative number.
    BadCounter { token: String },
}

impl fmt::Display for FenError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FenError::MissingFields { found } => {
                write!(f, "FEN has {found} fields, at least 4 are required")
            }
            FenError::RankCount { found } => {
                write!(f, "FEN placement needs 8 ranks, found {found}")
            }
            FenError::RankTooLong { rank } => {
                write!(f, "rank {rank} of the FEN placement is longer than 8 squares")
            }
            FenError::BadRankWidth { rank, found } => {
                write!(f, "rank {rank} of the FEN placement describes {found} squares, not 8")
            }
            FenError::UnknownPiece { symbol } => write!(f, "'{symbol}' is not a piece"),
            FenError::BadSideToMove { token } => {
                write!(f, "side to move must be 'w' or 'b', got '{token}'")
            }
            FenError::BadCastlingFlag { symbol } => {
                write!(f, "'{symbol}' is not a castling flag")
            }
            FenError::BadEnPassant { token } => {
                write!(f, "'{token}' is not an en passant square")
            }
            FenError::BadCounter { token } => {
                write!(f, "'{token}' is not a move counter")
            }
        }
    }
}

impl std::error::Error for FenError {}

/// Why a coordinate-notation move was rejected.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MoveParseError {
    /// The string is not 4 or 5 characters long.
    BadLength { len: usize },
    /// The from or to coordinate names no square.
    BadSquare { notation: String },
    /// The promotion suffix names no promotable piece.
    BadPromotion { symbol: char },
    /// The move is well formed but not legal in this position.
    Illegal { notation: String },
}

impl fmt::Display for MoveParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MoveParseError::BadLength { len } => {
                write!(f, "a coordinate move has 4 or 5 characters, got {len}")
            }
            MoveParseError::BadSquare { notation } => {
                write!(f, "'{notation}' does not name board squares")
            }
            MoveParseError::BadPromotion { symbol } => {
                write!(f, "'{symbol}' is not a promotion piece")
            }
            MoveParseError::Illegal { notation } => {
                write!(f, "'{notation}' is not legal in this position")
            }
        }
    }
}

impl std::error::Error for MoveParseError {}

/// Why a square reference was rejected.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SquareError {
    /// Rank index outside `0..=7`.
    RankRange { rank: usize },
    /// File index outside `0..=7`.
    FileRange { file: usize },
    /// The string is not a file letter followed by a rank digit.
    Unparsable { text: String },
}

impl fmt::Display for SquareError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SquareError::RankRange { rank } => write!(f, "rank {rank} is off the board"),
            SquareError::FileRange { file } => write!(f, "file {file} is off the board"),
            SquareError::Unparsable { text } => {
                write!(f, "'{text}' is not a square in algebraic notation")
            }
        }
    }
}

impl std::error::Error for SquareError {}
