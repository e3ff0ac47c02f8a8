//! Tactical problem suite driven by a JSON fixture.
//!
//! Each entry is a position with a single clearly best move that a depth-3
//! search must find. Keep fixture positions simple enough that the expected
//! move is strictly better than every alternative at that depth.

use std::fs;
use std::path::Path;

use rand::rngs::mock::StepRng;
use serde::Deserialize;

use gemstone_chess::board::Board;
use gemstone_chess::search::{search, SearchConfig};

#[derive(Deserialize)]
struct Problem {
    fen: String,
    best: String,
    description: String,
}

fn load_problems() -> Vec<Problem> {
    let path = Path::new(env!("CARGO_MANIFEST_DIR")).join("tests/data/problems.json");
    let data = fs::read_to_string(&path).expect("problem fixture should be readable");
    serde_json::from_str(&data).expect("problem fixture should be valid JSON")
}

#[test]
fn solves_the_problem_suite_at_depth_three() {
    let config = SearchConfig::depth(3);

    for problem in load_problems() {
        let mut board =
            Board::try_from_fen(&problem.fen).expect("fixture FEN should parse");
        let mut rng = StepRng::new(0, 0);

        let result = search(&mut board, &config, &mut rng);
        let best = result.best_move.expect("fixture positions all have moves");

        assert_eq!(
            best.to_string(),
            problem.best,
            "{}: expected {} in {}",
            problem.description,
            problem.best,
            problem.fen
        );
    }
}
