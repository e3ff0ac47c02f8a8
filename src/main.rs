use std::env;
use std::process::ExitCode;

use rand::rngs::StdRng;
use rand::SeedableRng;

use gemstone_chess::board::{Board, Color};
use gemstone_chess::search::{search, SearchConfig, DEFAULT_LEVEL};

/// Self-play stops after this many half-moves.
const MAX_PLIES: u32 = 160;

fn usage() -> ExitCode {
    eprintln!("usage: gemstone_chess [level 1-6] [fen]");
    ExitCode::FAILURE
}

fn main() -> ExitCode {
    let args: Vec<String> = env::args().skip(1).collect();

    let level = match args.first() {
        Some(raw) => match raw.parse::<u32>() {
            Ok(level) => level,
            Err(_) => return usage(),
        },
        None => DEFAULT_LEVEL,
    };

    let mut board = if args.len() > 1 {
        let fen = args[1..].join(" ");
        match Board::try_from_fen(&fen) {
            Ok(board) => board,
            Err(err) => {
                eprintln!("bad FEN: {err}");
                return usage();
            }
        }
    } else {
        Board::new()
    };

    let config = SearchConfig::from_level(level);
    let mut rng = StdRng::from_entropy();

    println!("{board}");
    println!();

    let mut plies = 0;
    let verdict = loop {
        if plies == MAX_PLIES {
            break format!("stopped after {MAX_PLIES} half-moves");
        }
        if board.is_draw() {
            break "drawn by repetition or the fifty-move rule".to_string();
        }

        let side = board.side_to_move();
        let result = search(&mut board, &config, &mut rng);
        let Some(best) = result.best_move else {
            break if board.is_in_check(side) {
                format!("checkmate, {:?} wins", side.opponent())
            } else {
                "stalemate".to_string()
            };
        };

        let dots = if side == Color::White { "." } else { "..." };
        println!(
            "{}{dots} {best}  depth {} score {} nodes {} ({} ms)",
            board.fullmove_number(),
            result.depth,
            result.score,
            result.nodes,
            result.time_ms
        );
        board.make_move(&best);
        plies += 1;
    };

    println!();
    println!("{board}");
    println!("{verdict}");
    ExitCode::SUCCESS
}
