//! Error type shared by move application, undo, FEN loading and config parsing.
//!
//! Every variant means "rejected, state unchanged": callers can retry with
//! different input without having to restore anything.

use crate::piece::Color;
use crate::square::Square;

#[derive(Debug, thiserror::Error)]
pub enum ChessError {
    #[error("square {0} is off the board")]
    InvalidSquare(Square),

    #[error("no piece on {0}")]
    NoPieceAtSource(Square),

    #[error("it is {expected:?}'s turn, not {found:?}'s")]
    WrongTurn { expected: Color, found: Color },

    #[error("illegal move: {from} -> {to}")]
    IllegalMove { from: Square, to: Square },

    #[error("no moves to undo")]
    NothingToUndo,

    #[error("malformed FEN: {0}")]
    MalformedFen(String),

    #[error("game is already over")]
    GameOver,

    #[error("cannot parse move or square: {0}")]
    InvalidNotation(String),

    #[error("invalid rules config: {0}")]
    InvalidConfig(#[from] serde_json::Error),
}

pub type ChessResult<T> = Result<T, ChessError>;
