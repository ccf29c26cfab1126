use serde::{Deserialize, Serialize};

use crate::piece::{Color, Piece, PieceType};
use crate::square::Square;

pub(crate) const KNIGHT_OFFSETS: [(i32, i32); 8] = [
    (-2, -1), (-2, 1), (-1, -2), (-1, 2),
    (1, -2), (1, 2), (2, -1), (2, 1),
];

pub(crate) const KING_OFFSETS: [(i32, i32); 8] = [
    (-1, -1), (-1, 0), (-1, 1),
    (0, -1), (0, 1),
    (1, -1), (1, 0), (1, 1),
];

pub(crate) const ROOK_DIRS: [(i32, i32); 4] = [(0, 1), (0, -1), (1, 0), (-1, 0)];
pub(crate) const BISHOP_DIRS: [(i32, i32); 4] = [(1, 1), (1, -1), (-1, 1), (-1, -1)];

/// Castling availability for one color.
#[derive(Clone, Copy, Serialize, Deserialize, Debug, PartialEq, Eq, Default)]
pub struct SideRights {
    pub king_side: bool,
    pub queen_side: bool,
}

/// Only ever cleared by play; `undo_move` and full reloads are the sole way
/// back to a set flag.
#[derive(Clone, Copy, Serialize, Deserialize, Debug, PartialEq, Eq, Default)]
pub struct CastlingRights {
    pub white: SideRights,
    pub black: SideRights,
}

impl CastlingRights {
    pub fn all() -> Self {
        let both = SideRights {
            king_side: true,
            queen_side: true,
        };
        CastlingRights {
            white: both,
            black: both,
        }
    }

    pub fn none() -> Self {
        CastlingRights::default()
    }

    pub fn side(&self, color: Color) -> SideRights {
        match color {
            Color::White => self.white,
            Color::Black => self.black,
        }
    }

    pub fn side_mut(&mut self, color: Color) -> &mut SideRights {
        match color {
            Color::White => &mut self.white,
            Color::Black => &mut self.black,
        }
    }

    /// Drop `color`'s right tied to a rook home corner, if `square` is one.
    pub(crate) fn clear_corner(&mut self, color: Color, square: Square) {
        if square.row != color.back_rank() {
            return;
        }
        match square.col {
            0 => self.side_mut(color).queen_side = false,
            7 => self.side_mut(color).king_side = false,
            _ => {}
        }
    }
}

/// Fixed 8x8 grid of optional pieces. Row 0 is rank 8.
///
/// `Board` is `Copy`: cloning it for a legality probe or an undo snapshot is a
/// 64-cell value copy and never aliases the live board.
#[derive(Clone, Copy, Serialize, Deserialize, Debug, PartialEq, Eq)]
pub struct Board {
    pub squares: [[Option<Piece>; 8]; 8],
}

impl Default for Board {
    fn default() -> Self {
        Self::new()
    }
}

impl Board {
    /// Create an empty board with no pieces. Useful for setting up test positions.
    pub fn empty() -> Self {
        Board {
            squares: [[None; 8]; 8],
        }
    }

    /// Standard starting position.
    pub fn new() -> Self {
        let mut board = Board::empty();
        let back = [
            PieceType::Rook,
            PieceType::Knight,
            PieceType::Bishop,
            PieceType::Queen,
            PieceType::King,
            PieceType::Bishop,
            PieceType::Knight,
            PieceType::Rook,
        ];
        for color in [Color::White, Color::Black] {
            let home = color.back_rank() as usize;
            let pawns = color.pawn_start_rank() as usize;
            for (col, &pt) in back.iter().enumerate() {
                board.squares[home][col] = Some(Piece::new(pt, color));
                board.squares[pawns][col] = Some(Piece::new(PieceType::Pawn, color));
            }
        }
        board
    }

    pub fn in_bounds(square: Square) -> bool {
        square.in_bounds()
    }

    pub fn get(&self, square: Square) -> Option<Piece> {
        if !square.in_bounds() {
            return None;
        }
        self.squares[square.row as usize][square.col as usize]
    }

    /// Off-board squares are ignored.
    pub fn set(&mut self, square: Square, piece: Option<Piece>) {
        if square.in_bounds() {
            self.squares[square.row as usize][square.col as usize] = piece;
        }
    }

    pub fn take(&mut self, square: Square) -> Option<Piece> {
        if !square.in_bounds() {
            return None;
        }
        self.squares[square.row as usize][square.col as usize].take()
    }

    pub fn is_empty(&self, square: Square) -> bool {
        self.get(square).is_none()
    }

    pub fn is_own_piece(&self, square: Square, color: Color) -> bool {
        self.get(square).map(|p| p.color == color).unwrap_or(false)
    }

    pub fn is_opponent_piece(&self, square: Square, color: Color) -> bool {
        self.get(square).map(|p| p.color != color).unwrap_or(false)
    }

    /// Occupied squares with their pieces, rank 8 first.
    pub fn pieces(&self) -> impl Iterator<Item = (Square, Piece)> + '_ {
        Square::all().filter_map(move |sq| self.get(sq).map(|p| (sq, p)))
    }

    pub fn find_king(&self, color: Color) -> Option<Square> {
        self.pieces()
            .find(|(_, p)| p.is(PieceType::King, color))
            .map(|(sq, _)| sq)
    }

    /// Whether `square` is attacked by the side opposing `defender`.
    ///
    /// Probes pawn, knight, slider and king geometry in that order and returns
    /// on the first hit. Occupancy of `square` itself is ignored, so this also
    /// answers "would a king standing here be attacked".
    pub fn is_square_attacked(&self, square: Square, defender: Color) -> bool {
        let attacker = defender.opposite();

        // A pawn attacks one row toward the defender, so it sits one row back
        // from the target in its own direction of travel.
        for dc in [-1, 1] {
            if let Some(from) = square.offset(-attacker.forward(), dc) {
                if self.get(from).map(|p| p.is(PieceType::Pawn, attacker)).unwrap_or(false) {
                    return true;
                }
            }
        }

        for &(dr, dc) in &KNIGHT_OFFSETS {
            if let Some(from) = square.offset(dr, dc) {
                if self.get(from).map(|p| p.is(PieceType::Knight, attacker)).unwrap_or(false) {
                    return true;
                }
            }
        }

        if self.ray_hits(square, &ROOK_DIRS, attacker, PieceType::Rook)
            || self.ray_hits(square, &BISHOP_DIRS, attacker, PieceType::Bishop)
        {
            return true;
        }

        for &(dr, dc) in &KING_OFFSETS {
            if let Some(from) = square.offset(dr, dc) {
                if self.get(from).map(|p| p.is(PieceType::King, attacker)).unwrap_or(false) {
                    return true;
                }
            }
        }

        false
    }

    /// Walk each ray until the first occupant; a hit needs the occupant to be
    /// the attacker's `slider` or queen.
    fn ray_hits(&self, square: Square, dirs: &[(i32, i32)], attacker: Color, slider: PieceType) -> bool {
        for &(dr, dc) in dirs {
            let mut cur = square.offset(dr, dc);
            while let Some(sq) = cur {
                if let Some(p) = self.get(sq) {
                    if p.color == attacker
                        && (p.piece_type == slider || p.piece_type == PieceType::Queen)
                    {
                        return true;
                    }
                    break;
                }
                cur = sq.offset(dr, dc);
            }
        }
        false
    }

    pub fn is_in_check(&self, color: Color) -> bool {
        match self.find_king(color) {
            Some(king) => self.is_square_attacked(king, color),
            None => false,
        }
    }

    /// Move whatever stands on `from` to `to`, with the board side-effects of
    /// the move's geometry: a pawn stepping diagonally onto an empty square
    /// takes en passant (the victim sits beside `from`, not on `to`), and a
    /// king stepping two files drags the matching rook across.
    ///
    /// Returns the captured piece and where it stood. Promotion, `has_moved`
    /// and every game-state field are the caller's business.
    pub fn relocate(&mut self, from: Square, to: Square) -> Option<(Square, Piece)> {
        let piece = self.take(from)?;

        let mut captured = self.get(to).map(|p| (to, p));
        if piece.piece_type == PieceType::Pawn && from.col != to.col && captured.is_none() {
            let victim_sq = Square {
                row: from.row,
                col: to.col,
            };
            captured = self.take(victim_sq).map(|p| (victim_sq, p));
        }

        self.set(to, Some(piece));

        if piece.piece_type == PieceType::King && (to.col as i32 - from.col as i32).abs() == 2 {
            let (rook_from, rook_to) = castle_rook_squares(from.row, to.col > from.col);
            if let Some(mut rook) = self.take(rook_from) {
                rook.has_moved = true;
                self.set(rook_to, Some(rook));
            }
        }

        captured
    }

    /// Insufficient material: no pawn, rook or queen, and one of K v K,
    /// K+minor v K, or K+B v K+B with both bishops on the same square color.
    pub fn has_insufficient_material(&self) -> bool {
        let mut minors: Vec<(Square, Piece)> = Vec::new();
        for (sq, p) in self.pieces() {
            match p.piece_type {
                PieceType::King => {}
                PieceType::Knight | PieceType::Bishop => minors.push((sq, p)),
                PieceType::Pawn | PieceType::Rook | PieceType::Queen => return false,
            }
        }

        match minors.as_slice() {
            [] | [_] => true,
            [(sq_a, a), (sq_b, b)] => {
                a.piece_type == PieceType::Bishop
                    && b.piece_type == PieceType::Bishop
                    && a.color != b.color
                    && sq_a.is_dark() == sq_b.is_dark()
            }
            _ => false,
        }
    }

    /// Eight text ranks, rank 8 first, `.` for empty squares.
    pub fn ascii(&self) -> String {
        let mut out = String::with_capacity(8 * 18);
        for row in 0..8 {
            out.push((b'8' - row as u8) as char);
            for col in 0..8 {
                out.push(' ');
                out.push(self.squares[row][col].map(|p| p.fen_char()).unwrap_or('.'));
            }
            out.push('\n');
        }
        out.push_str("  a b c d e f g h\n");
        out
    }
}

/// Rook origin and destination for a castle on `row`.
pub(crate) fn castle_rook_squares(row: u8, king_side: bool) -> (Square, Square) {
    if king_side {
        (Square { row, col: 7 }, Square { row, col: 5 })
    } else {
        (Square { row, col: 0 }, Square { row, col: 3 })
    }
}
