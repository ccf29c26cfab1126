//! Standard Algebraic Notation, captured-piece tallies and material counts.

use serde::{Deserialize, Serialize};

use crate::board::Board;
use crate::game::Status;
use crate::moves::{CastleSide, Move, MoveKind, MoveRecord};
use crate::piece::{Color, Piece, PieceType};
use crate::square::Square;

/// SAN for a move on the pre-move `board`, without the check/mate suffix.
///
/// `legal` is the mover's full legal move list in that position; it is only
/// consulted to disambiguate between identical pieces reaching `to`.
pub fn san_body(
    board: &Board,
    piece: Piece,
    from: Square,
    to: Square,
    kind: MoveKind,
    promotion: PieceType,
    legal: &[Move],
) -> String {
    match kind {
        MoveKind::Castling(CastleSide::KingSide) => return "O-O".to_string(),
        MoveKind::Castling(CastleSide::QueenSide) => return "O-O-O".to_string(),
        _ => {}
    }

    let capture = kind == MoveKind::EnPassant || board.is_opponent_piece(to, piece.color);
    let mut san = String::new();

    if piece.piece_type == PieceType::Pawn {
        if capture {
            san.push(from.file_char());
            san.push('x');
        }
        san.push_str(&to.to_string());
        if kind == MoveKind::Promotion {
            san.push('=');
            san.push(promotion.letter());
        }
        return san;
    }

    san.push(piece.piece_type.letter());
    san.push_str(&disambiguation(board, piece, from, to, legal));
    if capture {
        san.push('x');
    }
    san.push_str(&to.to_string());
    san
}

/// Minimal origin hint: nothing, the file, the rank, or the full square.
fn disambiguation(board: &Board, piece: Piece, from: Square, to: Square, legal: &[Move]) -> String {
    let rivals: Vec<Square> = legal
        .iter()
        .filter(|m| m.to == to && m.from != from)
        .filter(|m| board.get(m.from).map(|p| p.piece_type == piece.piece_type).unwrap_or(false))
        .map(|m| m.from)
        .collect();

    if rivals.is_empty() {
        String::new()
    } else if rivals.iter().all(|r| r.col != from.col) {
        from.file_char().to_string()
    } else if rivals.iter().all(|r| r.row != from.row) {
        from.rank_char().to_string()
    } else {
        from.to_string()
    }
}

pub fn san_suffix(status: &Status) -> &'static str {
    if status.checkmate {
        "#"
    } else if status.check {
        "+"
    } else {
        ""
    }
}

/// Numbered move list, e.g. `1. e4 e5 2. Nf3`. A history that starts with
/// black to move opens with `N...`.
pub fn movetext(history: &[MoveRecord]) -> String {
    let mut parts = Vec::with_capacity(history.len() * 3 / 2);
    for (i, record) in history.iter().enumerate() {
        let state = &record.before.state;
        match state.turn {
            Color::White => parts.push(format!("{}. {}", state.fullmove_number, record.san)),
            Color::Black if i == 0 => parts.push(format!("{}... {}", state.fullmove_number, record.san)),
            Color::Black => parts.push(record.san.clone()),
        }
    }
    parts.join(" ")
}

/// Pieces taken off the board, grouped by the color they belonged to.
#[derive(Clone, Serialize, Deserialize, Debug, Default, PartialEq, Eq)]
pub struct CapturedPieces {
    pub white: Vec<Piece>,
    pub black: Vec<Piece>,
}

impl CapturedPieces {
    pub fn of(&self, color: Color) -> &[Piece] {
        match color {
            Color::White => &self.white,
            Color::Black => &self.black,
        }
    }

    pub(crate) fn push(&mut self, piece: Piece) {
        match piece.color {
            Color::White => self.white.push(piece),
            Color::Black => self.black.push(piece),
        }
    }

    pub(crate) fn pop(&mut self, color: Color) -> Option<Piece> {
        match color {
            Color::White => self.white.pop(),
            Color::Black => self.black.pop(),
        }
    }

    /// How many of `color`'s pieces of `piece_type` have been taken.
    pub fn tally(&self, color: Color, piece_type: PieceType) -> usize {
        self.of(color).iter().filter(|p| p.piece_type == piece_type).count()
    }
}

/// Sum of piece values still on the board for `color` (P=1, N=B=3, R=5, Q=9).
pub fn material(board: &Board, color: Color) -> u32 {
    board
        .pieces()
        .filter(|(_, p)| p.color == color)
        .map(|(_, p)| p.piece_type.value())
        .sum()
}

/// White material minus black material.
pub fn material_balance(board: &Board) -> i32 {
    material(board, Color::White) as i32 - material(board, Color::Black) as i32
}
