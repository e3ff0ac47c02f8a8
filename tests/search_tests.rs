//! End-to-end checks that the search picks sensible moves.

use rand::rngs::mock::StepRng;

use gemstone_chess::board::Board;
use gemstone_chess::search::{find_best_move, search, SearchConfig, MATE_THRESHOLD};

/// A back-rank mate in one is found and scored as mate.
#[test]
fn back_rank_mate_in_one() {
    // Qe8 mates the cornered king.
    let mut board = Board::try_from_fen("6k1/5ppp/8/8/8/8/8/4Q2K w - - 0 1").unwrap();
    let mut rng = StepRng::new(0, 0);

    let result = search(&mut board, &SearchConfig::depth(2), &mut rng);
    let best = result.best_move.expect("a move exists here");

    assert_eq!(best.to_string(), "e1e8", "expected the back-rank mate");
    assert!(
        result.score >= MATE_THRESHOLD,
        "mate scored only {}",
        result.score
    );
}

/// Black finds its own mate in one, scored from Black's point of view.
#[test]
fn black_mate_in_one_scores_mate() {
    // Mirror of the back-rank position: Qe1 mates the g1 king.
    let mut board = Board::try_from_fen("4q2k/8/8/8/8/8/5PPP/6K1 b - - 0 1").unwrap();
    let mut rng = StepRng::new(0, 0);

    let result = search(&mut board, &SearchConfig::depth(2), &mut rng);
    let best = result.best_move.expect("a move exists here");

    assert_eq!(best.to_string(), "e8e1", "expected the back-rank mate");
    assert!(
        result.score >= MATE_THRESHOLD,
        "mate scored only {}",
        result.score
    );
}

/// The scholar's mate pattern is played when available.
#[test]
fn scholars_mate_in_one() {
    // Qxf7 is mate, guarded by the c4 bishop.
    let mut board = Board::try_from_fen(
        "r1bqkb1r/pppp1ppp/2n2n2/4p2Q/2B1P3/8/PPPP1PPP/RNB1K1NR w KQkq - 0 4",
    )
    .unwrap();
    let mut rng = StepRng::new(0, 0);

    let result = search(&mut board, &SearchConfig::depth(2), &mut rng);
    let best = result.best_move.expect("a move exists here");

    assert_eq!(best.to_string(), "h5f7", "expected Qxf7 mate");
}

/// Undefended material gets taken.
#[test]
fn captures_hanging_rook() {
    // The rook on h4 has no defender.
    let mut board = Board::try_from_fen("4k3/8/8/8/7r/8/8/4K2R w K - 0 1").unwrap();
    let mut rng = StepRng::new(0, 0);

    let result = search(&mut board, &SearchConfig::depth(3), &mut rng);
    let best = result.best_move.expect("a move exists here");

    assert_eq!(best.to_string(), "h1h4", "the free rook should be taken");
    assert!(result.score > 300, "score {} does not reflect a won rook", result.score);
}

/// Quiescence keeps the engine from grabbing a defended pawn with the queen.
#[test]
fn avoids_losing_the_queen_for_a_pawn() {
    // The d5 pawn is covered by e6; Qxd5 drops the queen.
    let mut board = Board::try_from_fen("4k3/8/4p3/3p4/8/8/8/3QK3 w - - 0 1").unwrap();
    let mut rng = StepRng::new(0, 0);

    let result = search(&mut board, &SearchConfig::depth(2), &mut rng);
    let best = result.best_move.expect("a move exists here");

    assert_ne!(best.to_string(), "d1d5", "queen takes a defended pawn");
}

/// Every difficulty level hands back a legal move.
#[test]
fn legal_move_at_every_level() {
    let fen = "8/2k5/8/8/3PK3/8/8/8 w - - 0 1";

    for level in 1..=6 {
        let mut board = Board::try_from_fen(fen).unwrap();
        let mut rng = StepRng::new(0, 0);

        let best = find_best_move(&mut board, level, &mut rng)
            .expect("position has legal moves");

        let legal = board.generate_moves();
        assert!(
            legal.iter().any(|m| *m == best),
            "level {level} returned illegal move {best}"
        );
    }
}

/// With the randomization probability forced to 1, the pick comes from the
/// unordered move list.
#[test]
fn forced_randomization_picks_first_generated_move() {
    let mut board = Board::new();
    // StepRng yields 0.0 for the probability roll and index 0 for the pick.
    let mut rng = StepRng::new(0, 0);

    let config = SearchConfig::from_level(1).with_randomness(1.0);
    let result = search(&mut board, &config, &mut rng);

    let expected = board.generate_moves().first().expect("startpos has moves");
    assert_eq!(result.best_move, Some(expected));
}

/// A mated side has no move to select, and the board is left untouched.
#[test]
fn no_move_when_checkmated() {
    // Fool's mate, from White's side.
    let mut board = Board::try_from_fen(
        "rnb1kbnr/pppp1ppp/4p3/8/6Pq/5P2/PPPPP2P/RNBQKBNR w KQkq - 0 1",
    )
    .unwrap();
    let fen_before = board.to_fen();
    let mut rng = StepRng::new(0, 0);

    let best = find_best_move(&mut board, 4, &mut rng);

    assert!(best.is_none(), "mate leaves nothing to select");
    assert_eq!(board.to_fen(), fen_before, "selection must not disturb the board");
}

/// Stalemate also leaves nothing to select, without being scored as mate.
#[test]
fn no_move_when_stalemated() {
    let mut board = Board::try_from_fen("7k/5Q2/6K1/8/8/8/8/8 b - - 0 1").unwrap();
    assert!(board.is_stalemate());

    let mut rng = StepRng::new(0, 0);
    let best = find_best_move(&mut board, 3, &mut rng);
    assert!(best.is_none(), "stalemate leaves nothing to select");
}

/// With one legal move there is nothing to search over.
#[test]
fn single_legal_move() {
    // The cornered black king can only step to a7.
    let mut board = Board::try_from_fen("k1Q5/8/8/8/8/8/8/K7 b - - 0 1").unwrap();
    let mut rng = StepRng::new(0, 0);

    let best = find_best_move(&mut board, 3, &mut rng).expect("a move exists here");
    assert_eq!(best.to_string(), "a8a7", "only Ka7 is legal");
}

/// The third occurrence of a position is a draw.
#[test]
fn threefold_repetition_is_a_draw() {
    let mut board = Board::new();

    // Knights out and back twice; the start position recurs a third time.
    for uci in [
        "g1f3", "g8f6", "f3g1", "f6g8", "g1f3", "g8f6", "f3g1", "f6g8",
    ] {
        board.make_move_uci(uci).unwrap();
    }

    assert!(board.is_draw(), "third occurrence should draw");
}

/// Insufficient material is a draw terminal, not a material edge.
#[test]
fn dead_material_position_scores_zero() {
    // K+B vs K cannot be won; the bishop must not be scored as an
    // advantage worth steering toward.
    let mut board = Board::try_from_fen("k7/8/8/8/8/8/8/KB6 w - - 0 1").unwrap();
    let mut rng = StepRng::new(0, 0);

    let result = search(&mut board, &SearchConfig::depth(3), &mut rng);

    assert_eq!(result.score, 0, "dead draw scored {} instead of 0", result.score);
}

/// A halfmove clock at 100 triggers the fifty-move rule.
#[test]
fn fifty_move_rule() {
    let board = Board::try_from_fen("8/8/8/8/8/8/8/K1k5 w - - 100 1").unwrap();
    assert!(board.is_draw(), "clock at 100 should draw");
}

/// The result records the deepest finished iteration and a node count.
#[test]
fn reports_completed_depth_and_nodes() {
    let mut board = Board::new();
    let mut rng = StepRng::new(0, 0);

    let result = search(&mut board, &SearchConfig::depth(3), &mut rng);

    assert_eq!(result.depth, 3, "all three iterations should finish");
    assert!(result.nodes > 0, "no nodes counted");
    assert!(result.best_move.is_some());
}

/// With ample time, the depth-D pick is at least as good under depth-D
/// evaluation as the depth-(D-1) pick.
#[test]
fn deeper_iteration_never_picks_a_worse_move() {
    let mut board = Board::try_from_fen(
        "r3k2r/p1ppqpb1/bn2pnp1/3PN3/1p2P3/2N2Q1p/PPPBBPPP/R3K2R w KQkq - 0 1",
    )
    .unwrap();
    let mut rng = StepRng::new(0, 0);

    let shallow = search(&mut board, &SearchConfig::depth(2), &mut rng);
    let deep = search(&mut board, &SearchConfig::depth(3), &mut rng);
    let shallow_pick = shallow.best_move.expect("a move exists here");
    deep.best_move.expect("a move exists here");

    // Value the shallow pick with the same lookahead the deep search had:
    // one ply here plus a depth-2 reply search.
    let info = board.make_move(&shallow_pick);
    let reply = search(&mut board, &SearchConfig::depth(2), &mut rng);
    board.unmake_move(&shallow_pick, info);
    let shallow_pick_deep_value = -reply.score;

    assert!(
        deep.score >= shallow_pick_deep_value,
        "depth-3 pick scored {} but the depth-2 pick is worth {} at depth 3",
        deep.score,
        shallow_pick_deep_value
    );
}

/// Scores are from the side to move's point of view.
#[test]
fn score_follows_side_to_move() {
    // Black to move wins the undefended rook on d1.
    let mut board = Board::try_from_fen("3q3k/8/8/8/8/8/8/3R3K b - - 0 1").unwrap();
    let mut rng = StepRng::new(0, 0);

    let result = search(&mut board, &SearchConfig::depth(2), &mut rng);

    assert!(
        result.score > 300,
        "winning side to move should see a positive score, got {}",
        result.score
    );
    assert_eq!(result.best_move.map(|m| m.to_string()), Some("d8d1".to_string()));
}

/// A time budget truncates deep searches but still yields a move, and the
/// truncated recursion still unwinds the board completely.
#[test]
fn respects_the_time_budget() {
    let mut board = Board::new();
    let fen_before = board.to_fen();
    let hash_before = board.hash();
    let mut rng = StepRng::new(0, 0);

    let config = SearchConfig::depth(6).with_time_limit(100);
    let result = search(&mut board, &config, &mut rng);

    assert!(result.best_move.is_some(), "truncated search still returns a move");
    assert!(
        result.time_ms < 5_000,
        "search ran far past its budget ({} ms)",
        result.time_ms
    );
    assert_eq!(board.to_fen(), fen_before, "timed-out search must restore the position");
    assert_eq!(board.hash(), hash_before);
}
