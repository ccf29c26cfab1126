use std::time::Instant;

use chess_rules::fen::START_FEN;
use chess_rules::Game;
use clap::Parser;
use tracing_subscriber::EnvFilter;

/// Count leaf nodes of the legal move tree from a position.
#[derive(Parser, Debug)]
struct Args {
    #[arg(long, default_value_t = 3)]
    depth: u32,

    #[arg(long, default_value = START_FEN)]
    fen: String,

    /// Print the node count under each root move.
    #[arg(long)]
    divide: bool,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();
    let mut game = Game::from_fen(&args.fen)?;
    let started = Instant::now();

    let nodes = if args.divide {
        let split = game.perft_divide(args.depth);
        for (mv, count) in &split {
            println!("{}: {count}", mv.to_uci());
        }
        split.iter().map(|(_, count)| count).sum()
    } else {
        game.perft(args.depth)
    };

    let elapsed = started.elapsed();
    println!("\nNodes searched: {nodes}");
    eprintln!("depth {} in {:.3}s", args.depth, elapsed.as_secs_f64());
    Ok(())
}
