use serde::{Deserialize, Serialize};

use crate::board::Board;
use crate::error::{ChessError, ChessResult};
use crate::game::GameState;
use crate::piece::{Piece, PieceType};
use crate::square::Square;

#[derive(Clone, Copy, Serialize, Deserialize, Debug, PartialEq, Eq, Hash)]
pub struct Move {
    pub from: Square,
    pub to: Square,
    pub promotion: Option<PieceType>,
}

impl Move {
    pub fn new(from: Square, to: Square) -> Self {
        Move {
            from,
            to,
            promotion: None,
        }
    }

    /// Convert to UCI notation, e.g. "e2e4", "a7a8q"
    pub fn to_uci(&self) -> String {
        let promo = match self.promotion {
            Some(pt) if pt.is_promotion_choice() => pt.letter().to_ascii_lowercase().to_string(),
            _ => String::new(),
        };
        format!("{}{}{promo}", self.from, self.to)
    }

    /// Parse from UCI notation
    pub fn from_uci(s: &str) -> ChessResult<Move> {
        let bad = || ChessError::InvalidNotation(s.to_string());
        if !s.is_ascii() || !(4..=5).contains(&s.len()) {
            return Err(bad());
        }
        let from = Square::from_algebraic(&s[0..2]).ok_or_else(bad)?;
        let to = Square::from_algebraic(&s[2..4]).ok_or_else(bad)?;
        let promotion = match s[4..].chars().next() {
            None => None,
            Some(c) => match PieceType::from_letter(c) {
                Some(pt) if pt.is_promotion_choice() => Some(pt),
                _ => return Err(bad()),
            },
        };
        Ok(Move {
            from,
            to,
            promotion,
        })
    }
}

#[derive(Clone, Copy, Serialize, Deserialize, Debug, PartialEq, Eq, Hash)]
pub enum CastleSide {
    KingSide,
    QueenSide,
}

#[derive(Clone, Copy, Serialize, Deserialize, Debug, PartialEq, Eq, Hash)]
pub enum MoveKind {
    Normal,
    Capture,
    PawnDouble,
    EnPassant,
    Castling(CastleSide),
    Promotion,
}

impl MoveKind {
    /// Classify a move purely from its geometry on the pre-move board.
    pub fn classify(board: &Board, piece: Piece, from: Square, to: Square) -> MoveKind {
        let d_row = (to.row as i32 - from.row as i32).abs();
        let d_col = to.col as i32 - from.col as i32;
        match piece.piece_type {
            PieceType::King if d_col == 2 => MoveKind::Castling(CastleSide::KingSide),
            PieceType::King if d_col == -2 => MoveKind::Castling(CastleSide::QueenSide),
            PieceType::Pawn if to.row == piece.color.promotion_rank() => MoveKind::Promotion,
            PieceType::Pawn if d_row == 2 => MoveKind::PawnDouble,
            PieceType::Pawn if d_col != 0 && board.is_empty(to) => MoveKind::EnPassant,
            _ if board.is_opponent_piece(to, piece.color) => MoveKind::Capture,
            _ => MoveKind::Normal,
        }
    }
}

/// Everything needed to report a committed move and to take it back.
///
/// `before` is the full pre-move board and state, so undo restores captured
/// pieces and castled rooks by value rather than by replaying the move.
#[derive(Clone, Serialize, Deserialize, Debug, PartialEq)]
pub struct MoveRecord {
    pub mv: Move,
    pub piece: Piece,
    pub captured: Option<Piece>,
    pub kind: MoveKind,
    pub san: String,
    /// Repetition key of the position the move produced.
    pub position_key: u64,
    pub before: Snapshot,
}

impl MoveRecord {
    pub fn is_capture(&self) -> bool {
        self.captured.is_some()
    }
}

#[derive(Clone, Copy, Serialize, Deserialize, Debug, PartialEq)]
pub struct Snapshot {
    pub board: Board,
    pub state: GameState,
}
