pub mod board;
pub mod engine;
pub mod search;
mod zobrist;

pub use board::{Board, Color, Move, Piece, Square};
pub use engine::{EngineError, ExternalEngine, LocalEngine, MoveBackend};
pub use search::{find_best_move, search, SearchConfig, SearchResult};
