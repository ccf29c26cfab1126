//! Candidate generation and the self-check filter.
//!
//! Pseudo-legal generation never asks whether the mover's own king ends up
//! attacked. That question is answered afterwards by probing each candidate
//! on a copied board, which keeps castling-safety checks (plain attack
//! queries) from recursing into legality.

use crate::board::{Board, CastlingRights, BISHOP_DIRS, KING_OFFSETS, KNIGHT_OFFSETS, ROOK_DIRS};
use crate::moves::Move;
use crate::piece::{Color, Piece, PieceType};
use crate::square::Square;

/// The parts of game state that shape move generation. Rights and target are
/// already filtered through the active `Rules` by the caller.
#[derive(Clone, Copy, Debug)]
pub struct MoveContext {
    pub castling: CastlingRights,
    pub en_passant: Option<Square>,
}

/// Candidate destinations for `piece` standing on `from`, ignoring self-check.
pub fn pseudo_destinations(board: &Board, from: Square, piece: Piece, ctx: &MoveContext) -> Vec<Square> {
    let mut out = Vec::new();
    match piece.piece_type {
        PieceType::Pawn => pawn_destinations(board, from, piece.color, ctx, &mut out),
        PieceType::Knight => step_destinations(board, from, piece.color, &KNIGHT_OFFSETS, &mut out),
        PieceType::Bishop => slide_destinations(board, from, piece.color, &BISHOP_DIRS, &mut out),
        PieceType::Rook => slide_destinations(board, from, piece.color, &ROOK_DIRS, &mut out),
        PieceType::Queen => {
            slide_destinations(board, from, piece.color, &ROOK_DIRS, &mut out);
            slide_destinations(board, from, piece.color, &BISHOP_DIRS, &mut out);
        }
        PieceType::King => {
            step_destinations(board, from, piece.color, &KING_OFFSETS, &mut out);
            castling_destinations(board, from, piece.color, ctx, &mut out);
        }
    }
    out
}

fn pawn_destinations(board: &Board, from: Square, color: Color, ctx: &MoveContext, out: &mut Vec<Square>) {
    let dir = color.forward();

    if let Some(one) = from.offset(dir, 0) {
        if board.is_empty(one) {
            out.push(one);
            if from.row == color.pawn_start_rank() {
                if let Some(two) = one.offset(dir, 0) {
                    if board.is_empty(two) {
                        out.push(two);
                    }
                }
            }
        }
    }

    for dc in [-1, 1] {
        let Some(target) = from.offset(dir, dc) else {
            continue;
        };
        if board.is_opponent_piece(target, color) {
            out.push(target);
        } else if ctx.en_passant == Some(target) && board.is_empty(target) {
            let victim = Square {
                row: from.row,
                col: target.col,
            };
            if board.get(victim).map(|p| p.is(PieceType::Pawn, color.opposite())).unwrap_or(false) {
                out.push(target);
            }
        }
    }
}

fn step_destinations(board: &Board, from: Square, color: Color, offsets: &[(i32, i32)], out: &mut Vec<Square>) {
    for &(dr, dc) in offsets {
        if let Some(to) = from.offset(dr, dc) {
            if !board.is_own_piece(to, color) {
                out.push(to);
            }
        }
    }
}

fn slide_destinations(board: &Board, from: Square, color: Color, dirs: &[(i32, i32)], out: &mut Vec<Square>) {
    for &(dr, dc) in dirs {
        let mut cur = from.offset(dr, dc);
        while let Some(to) = cur {
            match board.get(to) {
                None => out.push(to),
                Some(p) => {
                    if p.color != color {
                        out.push(to);
                    }
                    break;
                }
            }
            cur = to.offset(dr, dc);
        }
    }
}

/// Castling candidates. The rights table is authoritative; the king must still
/// stand on its home square with its own rook in the corner, every square
/// strictly between them must be empty, and neither the king's origin nor any
/// square it crosses or lands on may be attacked.
fn castling_destinations(board: &Board, from: Square, color: Color, ctx: &MoveContext, out: &mut Vec<Square>) {
    let row = color.back_rank();
    if from != (Square { row, col: 4 }) {
        return;
    }
    let rights = ctx.castling.side(color);
    if !rights.king_side && !rights.queen_side {
        return;
    }
    if board.is_square_attacked(from, color) {
        return;
    }

    let at = |col: u8| Square { row, col };
    let rook_home = |col: u8| board.get(at(col)).map(|p| p.is(PieceType::Rook, color)).unwrap_or(false);
    let clear = |cols: &[u8]| cols.iter().all(|&c| board.is_empty(at(c)));
    let safe = |cols: &[u8]| cols.iter().all(|&c| !board.is_square_attacked(at(c), color));

    if rights.king_side && rook_home(7) && clear(&[5, 6]) && safe(&[5, 6]) {
        out.push(at(6));
    }
    if rights.queen_side && rook_home(0) && clear(&[1, 2, 3]) && safe(&[3, 2]) {
        out.push(at(2));
    }
}

/// Whether playing `from -> to` leaves `color`'s king unattacked. Runs on a
/// value copy of the board; promotion is irrelevant here and never applied.
pub fn leaves_king_safe(board: &Board, from: Square, to: Square, color: Color) -> bool {
    let mut probe = *board;
    probe.relocate(from, to);
    !probe.is_in_check(color)
}

/// Legal destinations for the piece on `from`, or nothing if the square is empty.
pub fn legal_destinations(board: &Board, from: Square, ctx: &MoveContext) -> Vec<Square> {
    let Some(piece) = board.get(from) else {
        return Vec::new();
    };
    pseudo_destinations(board, from, piece, ctx)
        .into_iter()
        .filter(|&to| leaves_king_safe(board, from, to, piece.color))
        .collect()
}

/// Every legal move for `color`, one entry per (from, to). Promotion choice is
/// supplied when the move is applied, so `promotion` is always `None` here.
pub fn legal_moves(board: &Board, color: Color, ctx: &MoveContext) -> Vec<Move> {
    board
        .pieces()
        .filter(|(_, p)| p.color == color)
        .flat_map(|(from, _)| {
            legal_destinations(board, from, ctx)
                .into_iter()
                .map(move |to| Move::new(from, to))
        })
        .collect()
}
