pub mod board;
pub mod config;
pub mod error;
pub mod fen;
pub mod game;
pub mod movegen;
pub mod moves;
pub mod notation;
pub mod piece;
pub mod repetition;
pub mod square;

#[cfg(target_arch = "wasm32")]
mod wasm_api;

pub use config::Rules;
pub use error::{ChessError, ChessResult};
pub use game::{DrawReason, Game, GameResult, MoveOutcome, Status};
pub use moves::{Move, MoveKind, MoveRecord};
pub use piece::{Color, Piece, PieceType};
pub use square::Square;
