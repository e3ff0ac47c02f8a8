//! External UCI engine backend.
//!
//! Spawns a UCI-speaking engine as a child process and drives it over
//! stdin/stdout. A dedicated reader thread parses engine output and hands
//! `bestmove` replies back through a condvar-guarded slot, so a selection
//! request is a plain blocking call from the caller's point of view.

use std::io::{BufRead, BufReader, Write};
use std::process::{Child, ChildStdin, ChildStdout, Command, Stdio};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

use parking_lot::{Condvar, Mutex};

use crate::board::{Board, Move};

use super::{EngineError, MoveBackend};

/// Lowest difficulty level understood by the external backend.
pub const MIN_EXTERNAL_LEVEL: u32 = 1;
/// Highest difficulty level understood by the external backend.
pub const MAX_EXTERNAL_LEVEL: u32 = 20;

/// How long to wait for `uciok`/`readyok` when starting the engine.
const HANDSHAKE_TIMEOUT_MS: u64 = 5_000;

/// Grace period past the requested movetime before a reply counts as lost.
const REPLY_MARGIN_MS: u64 = 2_000;

/// How long `abort` waits for the stale reply after sending `stop`.
const ABORT_DRAIN_MS: u64 = 1_000;

const QUIT_POLLS: u32 = 10;
const QUIT_POLL_MS: u64 = 10;

/// UCI `Skill Level` option value for a difficulty level.
fn skill_for_level(level: u32) -> u32 {
    (level - 1) * 4 / 5
}

/// Think time in milliseconds for a difficulty level.
fn movetime_for_level(level: u32) -> u64 {
    200 + u64::from(level) * 400
}

/// Extract the move token from a `bestmove` line, if it is one.
fn bestmove_token(line: &str) -> Option<String> {
    let trimmed = line.trim();
    if !trimmed.starts_with("bestmove") {
        return None;
    }
    Some(
        trimmed
            .split_whitespace()
            .nth(1)
            .unwrap_or("")
            .to_string(),
    )
}

/// Engine output the reader thread has seen so far.
#[derive(Default)]
struct ReplyState {
    id_name: Option<String>,
    uciok: bool,
    readyok: bool,
    bestmove: Option<String>,
    eof: bool,
}

struct ReplySlot {
    state: Mutex<ReplyState>,
    ready: Condvar,
}

impl ReplySlot {
    fn new() -> Self {
        ReplySlot {
            state: Mutex::new(ReplyState::default()),
            ready: Condvar::new(),
        }
    }

    /// Block until `take` yields a value, the engine output closes, or the
    /// timeout expires.
    fn wait_for<T>(
        &self,
        timeout: Duration,
        mut take: impl FnMut(&mut ReplyState) -> Option<T>,
    ) -> Result<T, EngineError> {
        let deadline = Instant::now() + timeout;
        let mut state = self.state.lock();
        loop {
            if let Some(value) = take(&mut state) {
                return Ok(value);
            }
            if state.eof {
                return Err(EngineError::Protocol(
                    "engine process closed its output".to_string(),
                ));
            }
            let now = Instant::now();
            if now >= deadline {
                return Err(EngineError::Protocol(
                    "timed out waiting for engine reply".to_string(),
                ));
            }
            self.ready.wait_for(&mut state, deadline - now);
        }
    }
}

fn run_reader(stdout: ChildStdout, slot: &ReplySlot) {
    let mut reader = BufReader::new(stdout);
    let mut line = String::new();
    loop {
        line.clear();
        match reader.read_line(&mut line) {
            Ok(0) | Err(_) => {
                slot.state.lock().eof = true;
                slot.ready.notify_all();
                return;
            }
            Ok(_) => {}
        }
        let trimmed = line.trim();
        #[cfg(feature = "logging")]
        log::trace!("engine says: {trimmed}");
        if let Some(token) = bestmove_token(trimmed) {
            slot.state.lock().bestmove = Some(token);
            slot.ready.notify_all();
        } else if trimmed == "uciok" {
            slot.state.lock().uciok = true;
            slot.ready.notify_all();
        } else if trimmed == "readyok" {
            slot.state.lock().readyok = true;
            slot.ready.notify_all();
        } else if let Some(rest) = trimmed.strip_prefix("id name ") {
            slot.state.lock().id_name = Some(rest.to_string());
        }
    }
}

/// Move backend that delegates selection to a UCI engine process.
///
/// Difficulty levels 1..=20 map onto the engine's `Skill Level` option and a
/// per-move think time; levels outside that range are clamped. Dropping the
/// backend asks the process to quit and reaps it.
pub struct ExternalEngine {
    child: Child,
    stdin: ChildStdin,
    slot: Arc<ReplySlot>,
    reader: Option<JoinHandle<()>>,
    name: String,
    pending: bool,
}

impl ExternalEngine {
    /// Spawn `program` and complete the UCI handshake.
    pub fn spawn(program: &str) -> Result<Self, EngineError> {
        Self::spawn_with_args(program, &[])
    }

    /// Spawn `program` with arguments and complete the UCI handshake.
    pub fn spawn_with_args(program: &str, args: &[&str]) -> Result<Self, EngineError> {
        let mut child = Command::new(program)
            .args(args)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::null())
            .spawn()?;

        let stdin = child
            .stdin
            .take()
            .ok_or_else(|| EngineError::Protocol("engine stdin was not captured".to_string()))?;
        let stdout = child
            .stdout
            .take()
            .ok_or_else(|| EngineError::Protocol("engine stdout was not captured".to_string()))?;

        let slot = Arc::new(ReplySlot::new());
        let reader_slot = Arc::clone(&slot);
        let reader = thread::Builder::new()
            .name("engine-reader".to_string())
            .spawn(move || run_reader(stdout, &reader_slot))?;

        let mut engine = ExternalEngine {
            child,
            stdin,
            slot,
            reader: Some(reader),
            name: program.to_string(),
            pending: false,
        };
        engine.handshake()?;
        Ok(engine)
    }

    fn handshake(&mut self) -> Result<(), EngineError> {
        let timeout = Duration::from_millis(HANDSHAKE_TIMEOUT_MS);

        self.send("uci")?;
        self.slot
            .wait_for(timeout, |state| state.uciok.then_some(()))?;
        if let Some(id) = self.slot.state.lock().id_name.take() {
            self.name = id;
        }

        self.send("isready")?;
        self.slot
            .wait_for(timeout, |state| state.readyok.then_some(()))?;
        Ok(())
    }

    fn send(&mut self, command: &str) -> Result<(), EngineError> {
        #[cfg(feature = "logging")]
        log::trace!("engine gets: {command}");
        writeln!(self.stdin, "{command}")?;
        self.stdin.flush()?;
        Ok(())
    }

    fn request_move(&mut self, fen: &str, level: u32) -> Result<(), EngineError> {
        self.send("ucinewgame")?;
        self.send(&format!("position fen {fen}"))?;
        self.send(&format!(
            "setoption name Skill Level value {}",
            skill_for_level(level)
        ))?;
        self.send(&format!("go movetime {}", movetime_for_level(level)))?;
        Ok(())
    }
}

impl MoveBackend for ExternalEngine {
    fn select_move(
        &mut self,
        board: &mut Board,
        level: u32,
    ) -> Result<Option<Move>, EngineError> {
        if self.pending {
            return Err(EngineError::SearchInProgress);
        }
        if board.generate_moves().is_empty() {
            return Ok(None);
        }

        let level = level.clamp(MIN_EXTERNAL_LEVEL, MAX_EXTERNAL_LEVEL);
        self.slot.state.lock().bestmove = None;
        self.pending = true;

        let fen = board.to_fen();
        if let Err(err) = self.request_move(&fen, level) {
            self.pending = false;
            return Err(err);
        }

        // The engine stays pending after a lost reply; abort() clears it.
        let timeout = Duration::from_millis(movetime_for_level(level) + REPLY_MARGIN_MS);
        let token = self
            .slot
            .wait_for(timeout, |state| state.bestmove.take())?;
        self.pending = false;

        if token == "(none)" || token == "0000" {
            return Ok(None);
        }
        match board.parse_move(&token) {
            Ok(mv) => Ok(Some(mv)),
            Err(_) => Err(EngineError::IllegalEngineMove(token)),
        }
    }

    fn name(&self) -> &str {
        &self.name
    }

    /// Send `stop` and discard whatever reply the engine settles on.
    fn abort(&mut self) {
        if !self.pending {
            return;
        }
        if self.send("stop").is_ok() {
            let _ = self.slot.wait_for(Duration::from_millis(ABORT_DRAIN_MS), |state| {
                state.bestmove.take()
            });
        }
        self.pending = false;
    }
}

impl Drop for ExternalEngine {
    fn drop(&mut self) {
        let _ = writeln!(self.stdin, "quit");
        let _ = self.stdin.flush();
        for _ in 0..QUIT_POLLS {
            match self.child.try_wait() {
                Ok(Some(_)) => break,
                Ok(None) => thread::sleep(Duration::from_millis(QUIT_POLL_MS)),
                Err(_) => break,
            }
        }
        let _ = self.child.kill();
        let _ = self.child.wait();
        if let Some(reader) = self.reader.take() {
            let _ = reader.join();
        }
    }
}
