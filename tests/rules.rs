use chess_rules::fen::START_FEN;
use chess_rules::{ChessError, Color, DrawReason, Game, GameResult, MoveKind, PieceType, Square};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;

fn sq(s: &str) -> Square {
    Square::from_algebraic(s).expect("valid square")
}

fn play(game: &mut Game, moves: &[&str]) {
    for uci in moves {
        game.apply_uci(uci).unwrap_or_else(|e| panic!("{uci}: {e}"));
    }
}

/// Everything observable about a game, for before/after comparisons.
fn fingerprint(game: &Game) -> String {
    format!(
        "{:?}|{:?}|{:?}|{}|{}|{}",
        game.board(),
        game.state(),
        game.captured(),
        game.history().len(),
        game.repetition_count(),
        game.to_fen(),
    )
}

#[test]
fn initial_position_has_twenty_legal_moves() {
    let game = Game::new();
    assert_eq!(game.legal_moves_for(Color::White).len(), 20);
}

#[test]
fn scholars_mate_ends_in_checkmate() {
    let mut game = Game::new();
    play(&mut game, &["e2e4", "e7e5", "f1c4", "b8c6", "d1h5", "g8f6"]);
    assert!(!game.is_game_over());

    let outcome = game.apply_uci("h5f7").expect("Qxf7 is legal");
    assert!(outcome.status.checkmate);
    assert!(outcome.status.check);
    assert!(!outcome.status.stalemate);
    assert_eq!(outcome.record.san, "Qxf7#");
    assert_eq!(outcome.record.kind, MoveKind::Capture);
    assert_eq!(game.game_result(), Some(GameResult::WhiteWins));
    assert_eq!(game.game_result().map(GameResult::as_str), Some("1-0"));
    assert!(game.legal_moves().is_empty());
    assert_eq!(game.movetext(), "1. e4 e5 2. Bc4 Nc6 3. Qh5 Nf6 4. Qxf7#");
}

#[test]
fn black_can_deliver_mate_too() {
    let mut game = Game::new();
    play(&mut game, &["f2f3", "e7e5", "g2g4", "d8h4"]);
    assert!(game.status().checkmate);
    assert_eq!(game.game_result().map(GameResult::as_str), Some("0-1"));
    assert_eq!(game.last_move().map(|r| r.san.as_str()), Some("Qh4#"));
}

#[test]
fn bare_kings_are_drawn_by_insufficient_material() {
    let game = Game::from_fen("8/8/4k3/8/8/3K4/8/8 w - - 0 1").expect("valid");
    assert!(game.status().is_draw());
    assert_eq!(game.status().draw, Some(DrawReason::InsufficientMaterial));
    assert_eq!(game.game_result(), Some(GameResult::Draw));
}

#[test]
fn capturing_the_last_piece_triggers_insufficient_material() {
    let mut game = Game::from_fen("8/8/4k3/8/4r3/4K3/8/8 w - - 0 1").expect("valid");
    assert!(game.status().check);
    assert!(!game.status().is_draw());
    play(&mut game, &["e3e4"]);
    assert_eq!(game.status().draw, Some(DrawReason::InsufficientMaterial));
}

#[test]
fn castling_through_an_attacked_square_is_illegal() {
    // f1 is covered by the rook on f8; g1 itself is safe.
    let mut game = Game::from_fen("4kr2/8/8/8/8/8/8/4K2R w K - 0 1").expect("valid");
    let before = fingerprint(&game);
    let err = game.apply_move(sq("e1"), sq("g1"), None).unwrap_err();
    assert!(matches!(err, ChessError::IllegalMove { .. }));
    assert_eq!(fingerprint(&game), before);
}

#[test]
fn castling_out_of_check_is_illegal() {
    let mut game = Game::from_fen("4k3/4r3/8/8/8/8/8/4K2R w K - 0 1").expect("valid");
    assert!(game.status().check);
    assert!(matches!(game.apply_uci("e1g1"), Err(ChessError::IllegalMove { .. })));
}

#[test]
fn castling_queen_side_relocates_both_pieces() {
    let mut game = Game::from_fen("r3k3/8/8/8/8/8/8/4K3 b q - 4 20").expect("valid");
    let outcome = game.apply_uci("e8c8").expect("castle");
    assert_eq!(outcome.record.san, "O-O-O");
    assert!(game.board().get(sq("c8")).unwrap().is(PieceType::King, Color::Black));
    assert!(game.board().get(sq("d8")).unwrap().is(PieceType::Rook, Color::Black));
    assert_eq!(game.to_fen(), "2kr4/8/8/8/8/8/8/4K3 w - - 5 21");
}

#[test]
fn third_occurrence_draws_not_the_second() {
    let mut game = Game::new();
    let shuffle = ["g1f3", "g8f6", "f3g1", "f6g8"];

    play(&mut game, &shuffle);
    assert_eq!(game.repetition_count(), 2);
    assert!(!game.status().is_draw());

    play(&mut game, &shuffle[..3]);
    assert!(!game.status().is_draw());
    play(&mut game, &shuffle[3..]);
    assert_eq!(game.repetition_count(), 3);
    assert_eq!(game.status().draw, Some(DrawReason::ThreefoldRepetition));
    assert!(matches!(game.apply_uci("e2e4"), Err(ChessError::GameOver)));

    game.undo_move().expect("undo");
    assert!(!game.status().is_draw());
    game.undo_move().expect("undo");
    assert_eq!(game.repetition_count(), 2);
}

#[test]
fn lost_castling_rights_make_positions_differ() {
    // Same squares as the start, but the king and rook have wandered and
    // returned, so the rights differ and the count restarts.
    let mut game = Game::from_fen("r3k2r/pppppppp/8/8/8/8/PPPPPPPP/R3K2R w KQkq - 0 1").expect("valid");
    play(&mut game, &["e1f1", "e8f8", "f1e1", "f8e8"]);
    assert_eq!(game.repetition_count(), 1);
    play(&mut game, &["e1f1", "e8f8", "f1e1", "f8e8"]);
    assert_eq!(game.repetition_count(), 2);
    assert!(!game.status().is_draw());
}

#[test]
fn apply_then_undo_restores_every_special_move() {
    let cases = [
        ("r3k2r/8/8/8/8/8/8/R3K2R w KQkq - 3 9", "e1g1"),
        ("r3k2r/8/8/8/8/8/8/R3K2R w KQkq - 3 9", "e1c1"),
        ("r3k2r/8/8/8/8/8/8/R3K2R b KQkq - 3 9", "e8g8"),
        ("4k3/8/8/3pP3/8/8/8/4K3 w - d6 0 2", "e5d6"),
        ("r3k3/1P6/8/8/8/8/8/4K3 w q - 0 30", "b7a8n"),
        ("r3k3/1P6/8/8/8/8/8/4K3 w q - 0 30", "b7b8"),
        ("r3k2r/8/8/8/8/8/8/R3K2R w KQkq - 3 9", "a1a8"),
        (START_FEN, "e2e4"),
    ];
    for (fen, uci) in cases {
        let mut game = Game::from_fen(fen).expect("valid");
        let before = fingerprint(&game);
        game.apply_uci(uci).unwrap_or_else(|e| panic!("{fen} {uci}: {e}"));
        assert_ne!(fingerprint(&game), before);
        game.undo_move().expect("undo");
        assert_eq!(fingerprint(&game), before, "{fen} {uci}");
    }
}

#[test]
fn rejected_moves_change_nothing() {
    let mut game = Game::new();
    play(&mut game, &["e2e4", "e7e5"]);
    let before = fingerprint(&game);
    let attempts = [
        (Square { row: 9, col: 9 }, sq("e4")),
        (sq("e3"), sq("e4")),
        (sq("d7"), sq("d5")),
        (sq("e4"), sq("e5")),
        (sq("e1"), sq("g1")),
    ];
    for (from, to) in attempts {
        assert!(game.apply_move(from, to, None).is_err());
        assert_eq!(fingerprint(&game), before);
    }
    assert!(game.apply_uci("zz99").is_err());
    assert_eq!(fingerprint(&game), before);
}

/// Walk seeded random games. At every position: each legal move keeps the
/// mover's king safe, apply+undo is a no-op, and FEN re-export is stable.
#[test]
fn random_games_hold_core_invariants() {
    let mut rng = StdRng::seed_from_u64(0x5eed);
    for _ in 0..6 {
        let mut game = Game::new();
        for _ in 0..120 {
            if game.is_game_over() {
                break;
            }
            let mover = game.turn();
            let moves = game.legal_moves();
            assert!(!moves.is_empty());

            for mv in &moves {
                let mut probe = game.clone();
                probe.apply_move(mv.from, mv.to, None).expect("listed move is legal");
                assert!(!probe.board().is_in_check(mover), "{} leaves king attacked", mv.to_uci());
            }

            let fen = game.to_fen();
            let reloaded = Game::from_fen(&fen).expect("exported FEN reloads");
            assert_eq!(reloaded.to_fen(), fen);

            let before = fingerprint(&game);
            let mv = *moves.choose(&mut rng).expect("non-empty");
            let promotion = PieceType::PROMOTIONS.choose(&mut rng).copied();
            game.apply_move(mv.from, mv.to, promotion).expect("legal");
            let after = fingerprint(&game);
            game.undo_move().expect("undo");
            assert_eq!(fingerprint(&game), before);

            game.apply_move(mv.from, mv.to, promotion).expect("legal");
            assert_eq!(fingerprint(&game), after);
        }
    }
}

#[test]
fn undo_all_the_way_back_to_the_start() {
    let mut game = Game::new();
    play(&mut game, &["e2e4", "d7d5", "e4d5", "d8d5", "b1c3", "d5a5", "g1f3", "c8g4", "f1e2", "b8c6"]);
    play(&mut game, &["e1g1", "e8c8"]);
    assert_eq!(game.captured().tally(Color::White, PieceType::Pawn), 1);
    assert_eq!(game.captured().tally(Color::Black, PieceType::Pawn), 1);
    while game.undo_move().is_ok() {}
    assert_eq!(game.to_fen(), START_FEN);
    assert_eq!(fingerprint(&game), fingerprint(&Game::new()));
}

struct PerftCase {
    fen: &'static str,
    nodes: &'static [u64],
}

const PERFT_CASES: &[PerftCase] = &[
    PerftCase {
        fen: START_FEN,
        nodes: &[20, 400, 8902],
    },
    PerftCase {
        fen: "r3k2r/p1ppqpb1/bn2pnp1/3PN3/1p2P3/2N2Q1p/PPPBBPPP/R3K2R w KQkq - 0 1",
        nodes: &[48, 2039],
    },
    PerftCase {
        fen: "8/2p5/3p4/KP5r/1R3p1k/8/4P1P1/8 w - - 0 1",
        nodes: &[14, 191, 2812],
    },
    PerftCase {
        fen: "r3k2r/Pppp1ppp/1b3nbN/nP6/BBP1P3/q4N2/Pp1P2PP/R2Q1RK1 w kq - 0 1",
        nodes: &[6, 264],
    },
    PerftCase {
        fen: "rnbq1k1r/pp1Pbppp/2p5/8/2B5/8/PPP1NnPP/RNBQK2R w KQ - 1 8",
        nodes: &[44, 1486],
    },
];

#[test]
fn perft_matches_reference_counts() {
    for case in PERFT_CASES {
        let mut game = Game::from_fen(case.fen).expect("valid");
        for (depth, &expected) in case.nodes.iter().enumerate() {
            let depth = depth as u32 + 1;
            assert_eq!(game.perft(depth), expected, "{} depth {depth}", case.fen);
        }
        assert_eq!(game.to_fen(), case.fen);
        assert!(game.history().is_empty());
    }
}
