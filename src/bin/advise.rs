use std::io::{BufRead, BufReader, Write};
use std::process::{Child, ChildStdin, ChildStdout, Command, Stdio};

use chess_rules::fen::START_FEN;
use chess_rules::Game;
use clap::Parser;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

/// Ask an external UCI engine for moves and play them through the rules core.
#[derive(Parser, Debug)]
struct Args {
    /// Path to a UCI engine binary, e.g. stockfish.
    #[arg(long)]
    engine: String,

    #[arg(long, default_value = START_FEN)]
    fen: String,

    /// Thinking time per move in milliseconds.
    #[arg(long, default_value_t = 100)]
    movetime: u32,

    /// How many plies to let the engine play from the position.
    #[arg(long, default_value_t = 1)]
    plies: u32,
}

struct UciEngine {
    child: Child,
    stdin: ChildStdin,
    reader: BufReader<ChildStdout>,
}

impl UciEngine {
    fn spawn(path: &str) -> std::io::Result<Self> {
        let mut child = Command::new(path)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::null())
            .spawn()?;

        let missing = || std::io::Error::new(std::io::ErrorKind::BrokenPipe, "engine pipe missing");
        let stdin = child.stdin.take().ok_or_else(missing)?;
        let stdout = child.stdout.take().ok_or_else(missing)?;

        let mut engine = UciEngine {
            child,
            stdin,
            reader: BufReader::new(stdout),
        };
        engine.send("uci")?;
        engine.wait_for("uciok")?;
        engine.send("isready")?;
        engine.wait_for("readyok")?;
        Ok(engine)
    }

    fn send(&mut self, cmd: &str) -> std::io::Result<()> {
        writeln!(self.stdin, "{cmd}")?;
        self.stdin.flush()
    }

    fn wait_for(&mut self, prefix: &str) -> std::io::Result<String> {
        let mut line = String::new();
        loop {
            line.clear();
            if self.reader.read_line(&mut line)? == 0 {
                return Err(std::io::Error::new(
                    std::io::ErrorKind::UnexpectedEof,
                    format!("engine exited before {prefix}"),
                ));
            }
            if line.trim().starts_with(prefix) {
                return Ok(line.trim().to_string());
            }
        }
    }

    /// Position in as FEN, move out as UCI text.
    fn best_move(&mut self, fen: &str, movetime: u32) -> std::io::Result<Option<String>> {
        self.send(&format!("position fen {fen}"))?;
        self.send(&format!("go movetime {movetime}"))?;
        let line = self.wait_for("bestmove")?;
        Ok(line
            .split_whitespace()
            .nth(1)
            .filter(|mv| *mv != "0000" && *mv != "(none)")
            .map(str::to_string))
    }
}

impl Drop for UciEngine {
    fn drop(&mut self) {
        let _ = self.send("quit");
        let _ = self.child.wait();
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();
    let mut game = Game::from_fen(&args.fen)?;
    let mut engine = UciEngine::spawn(&args.engine)?;

    for _ in 0..args.plies {
        if game.is_game_over() {
            break;
        }
        let fen = game.to_fen();
        let Some(uci) = engine.best_move(&fen, args.movetime)? else {
            warn!(%fen, "engine returned no move");
            break;
        };
        match game.apply_uci(&uci) {
            Ok(outcome) => info!(%uci, san = %outcome.record.san, "advisor move"),
            Err(err) => {
                warn!(%uci, %err, "advisor move rejected");
                break;
            }
        }
    }

    println!("{}", game.movetext());
    println!("{}", game.to_fen());
    if let Some(result) = game.game_result() {
        println!("{}", result.as_str());
    }
    Ok(())
}
