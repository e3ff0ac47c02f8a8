//! Pluggable move-selection backends.
//!
//! A backend turns a position and a difficulty level into a single move for
//! the side to move. Two interchangeable implementations are provided:
//! [`LocalEngine`] runs the built-in search in-process, [`ExternalEngine`]
//! delegates to a UCI engine running as a child process. Callers pick one by
//! configuration and drive both through the [`MoveBackend`] trait.

mod external;
mod local;

use std::fmt;
use std::io;

use crate::board::{Board, Move};

pub use external::{ExternalEngine, MAX_EXTERNAL_LEVEL, MIN_EXTERNAL_LEVEL};
pub use local::LocalEngine;

/// Error type for backend failures.
///
/// A position with no legal moves is not an error; backends report it as
/// `Ok(None)` so the caller can consult the board's terminal-state queries.
#[derive(Debug)]
pub enum EngineError {
    /// A selection was requested while a previous one is still outstanding
    SearchInProgress,
    /// I/O failure talking to an external engine process
    Io(io::Error),
    /// External engine violated the expected command/reply protocol
    Protocol(String),
    /// External engine proposed a move that is not legal in the position
    IllegalEngineMove(String),
}

impl fmt::Display for EngineError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EngineError::SearchInProgress => {
                write!(f, "A move selection is already in progress")
            }
            EngineError::Io(err) => write!(f, "Engine I/O error: {err}"),
            EngineError::Protocol(msg) => write!(f, "Engine protocol error: {msg}"),
            EngineError::IllegalEngineMove(notation) => {
                write!(f, "Engine proposed illegal move '{notation}'")
            }
        }
    }
}

impl std::error::Error for EngineError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            EngineError::Io(err) => Some(err),
            _ => None,
        }
    }
}

impl From<io::Error> for EngineError {
    fn from(err: io::Error) -> Self {
        EngineError::Io(err)
    }
}

/// A source of moves for the side to move.
///
/// `select_move` blocks until a move is chosen or the backend gives up, and
/// must leave the board exactly as it found it. Implementations are not
/// reentrant; a second call while one is outstanding fails with
/// [`EngineError::SearchInProgress`].
pub trait MoveBackend {
    /// Select a move for the side to move at the given difficulty level.
    ///
    /// Returns `Ok(None)` when the side to move has no legal moves.
    fn select_move(&mut self, board: &mut Board, level: u32)
        -> Result<Option<Move>, EngineError>;

    /// Short human-readable backend name.
    fn name(&self) -> &str;

    /// Ask an outstanding selection to wrap up early.
    ///
    /// The in-process search checks its own time budget, so the default is a
    /// no-op; process-backed implementations override this to send a stop
    /// message.
    fn abort(&mut self) {}
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_engine_error_display() {
        let err = EngineError::IllegalEngineMove("a1a1".to_string());
        assert!(err.to_string().contains("a1a1"));

        let err = EngineError::Protocol("no reply".to_string());
        assert!(err.to_string().contains("no reply"));
    }

    #[test]
    fn test_io_error_conversion() {
        let io_err = io::Error::new(io::ErrorKind::BrokenPipe, "pipe closed");
        let err = EngineError::from(io_err);
        assert!(matches!(err, EngineError::Io(_)));
        assert!(std::error::Error::source(&err).is_some());
    }
}
