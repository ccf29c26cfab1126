use chess_rules::{Game, GameResult, PieceType, Rules};
use clap::Parser;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use serde::Serialize;
use tracing::info;
use tracing_subscriber::EnvFilter;

/// Play random legal games through the public API and tally the results.
#[derive(Parser, Debug)]
struct Args {
    /// Number of games to play.
    #[arg(long, default_value_t = 100)]
    games: usize,

    /// Stop a game after this many plies and count it as unfinished.
    #[arg(long, default_value_t = 400)]
    max_plies: u32,

    #[arg(long, default_value_t = 1)]
    seed: u64,

    /// Start every game from this position instead of the initial one.
    #[arg(long)]
    fen: Option<String>,

    /// Rules as JSON, e.g. '{"castling": false}'.
    #[arg(long)]
    rules: Option<String>,
}

#[derive(Serialize, Default)]
struct Summary {
    games: usize,
    white_wins: u32,
    black_wins: u32,
    draws: u32,
    unfinished: u32,
    stalemates: u32,
    fifty_move: u32,
    insufficient_material: u32,
    repetition: u32,
    total_plies: u64,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();
    let rules = match &args.rules {
        Some(text) => Rules::from_json(text)?,
        None => Rules::default(),
    };
    let start = match &args.fen {
        Some(fen) => Game::from_fen_with_rules(fen, rules)?,
        None => Game::with_rules(rules),
    };

    let mut rng = StdRng::seed_from_u64(args.seed);
    let mut summary = Summary {
        games: args.games,
        ..Summary::default()
    };

    for n in 0..args.games {
        let mut game = start.clone();
        let mut plies = 0;
        while !game.is_game_over() && plies < args.max_plies {
            let moves = game.legal_moves();
            let Some(mv) = moves.choose(&mut rng) else {
                break;
            };
            let promotion = PieceType::PROMOTIONS.choose(&mut rng).copied();
            game.apply_move(mv.from, mv.to, promotion)?;
            plies += 1;
        }
        summary.total_plies += plies as u64;

        let status = game.status();
        match game.game_result() {
            Some(GameResult::WhiteWins) => summary.white_wins += 1,
            Some(GameResult::BlackWins) => summary.black_wins += 1,
            Some(GameResult::Draw) => summary.draws += 1,
            None => summary.unfinished += 1,
        }
        match status.draw {
            Some(chess_rules::DrawReason::Stalemate) => summary.stalemates += 1,
            Some(chess_rules::DrawReason::FiftyMove) => summary.fifty_move += 1,
            Some(chess_rules::DrawReason::InsufficientMaterial) => summary.insufficient_material += 1,
            Some(chess_rules::DrawReason::ThreefoldRepetition) => summary.repetition += 1,
            None => {}
        }
        info!(game = n + 1, plies, result = ?game.game_result(), "finished");
    }

    println!("{}", serde_json::to_string_pretty(&summary)?);
    Ok(())
}
