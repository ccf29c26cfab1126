//! FEN encoding and decoding.
//!
//! Decoding validates structure (eight ranks of eight files, one king per
//! side, sane side/rights/target/clock fields) and returns `MalformedFen`
//! otherwise. It never touches a live game; `Game::load_fen` swaps the parsed
//! position in whole.

use crate::board::{Board, CastlingRights};
use crate::error::{ChessError, ChessResult};
use crate::piece::{Color, Piece, PieceType};
use crate::square::Square;

pub const START_FEN: &str = "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1";

/// The six FEN fields, decoded.
#[derive(Clone, Debug, PartialEq)]
pub struct Fen {
    pub board: Board,
    pub turn: Color,
    pub castling: CastlingRights,
    pub en_passant: Option<Square>,
    pub halfmove_clock: u32,
    pub fullmove_number: u32,
}

impl Fen {
    pub fn encode(&self) -> String {
        format!(
            "{} {} {} {} {} {}",
            encode_placement(&self.board),
            match self.turn {
                Color::White => 'w',
                Color::Black => 'b',
            },
            encode_castling(&self.castling),
            self.en_passant.map(|sq| sq.to_string()).unwrap_or_else(|| "-".to_string()),
            self.halfmove_clock,
            self.fullmove_number,
        )
    }

    /// Anything after the sixth field is ignored.
    pub fn parse(text: &str) -> ChessResult<Fen> {
        let fields: Vec<&str> = text.split_whitespace().collect();
        if fields.len() < 6 {
            return Err(malformed(format!("expected 6 fields, found {}", fields.len())));
        }

        let board = parse_placement(fields[0])?;
        let turn = match fields[1] {
            "w" => Color::White,
            "b" => Color::Black,
            other => return Err(malformed(format!("side to move must be w or b, got {other:?}"))),
        };
        let castling = parse_castling(fields[2])?;
        let en_passant = parse_en_passant(fields[3], turn)?;
        let halfmove_clock = parse_number(fields[4], "half-move clock")?;
        let fullmove_number = parse_number(fields[5], "full-move number")?;

        Ok(Fen {
            board,
            turn,
            castling,
            en_passant,
            halfmove_clock,
            fullmove_number,
        })
    }
}

fn malformed(reason: impl Into<String>) -> ChessError {
    ChessError::MalformedFen(reason.into())
}

fn encode_placement(board: &Board) -> String {
    let mut out = String::with_capacity(72);
    for (row, rank) in board.squares.iter().enumerate() {
        if row > 0 {
            out.push('/');
        }
        let mut empty = 0;
        for cell in rank {
            match cell {
                Some(piece) => {
                    if empty > 0 {
                        out.push_str(&empty.to_string());
                        empty = 0;
                    }
                    out.push(piece.fen_char());
                }
                None => empty += 1,
            }
        }
        if empty > 0 {
            out.push_str(&empty.to_string());
        }
    }
    out
}

fn encode_castling(rights: &CastlingRights) -> String {
    let flags = [
        (rights.white.king_side, 'K'),
        (rights.white.queen_side, 'Q'),
        (rights.black.king_side, 'k'),
        (rights.black.queen_side, 'q'),
    ];
    let s: String = flags.iter().filter(|(set, _)| *set).map(|(_, c)| *c).collect();
    if s.is_empty() {
        "-".to_string()
    } else {
        s
    }
}

/// Loaded pieces are marked as already moved: FEN carries no move history.
fn parse_placement(field: &str) -> ChessResult<Board> {
    let ranks: Vec<&str> = field.split('/').collect();
    if ranks.len() != 8 {
        return Err(malformed(format!("expected 8 ranks, found {}", ranks.len())));
    }

    let mut board = Board::empty();
    for (row, rank) in ranks.iter().enumerate() {
        let mut col = 0usize;
        for c in rank.chars() {
            if let Some(run) = c.to_digit(10) {
                if !(1..=8).contains(&run) {
                    return Err(malformed(format!("bad empty-run digit {c:?}")));
                }
                col += run as usize;
            } else {
                let mut piece = Piece::from_fen_char(c)
                    .ok_or_else(|| malformed(format!("unknown piece letter {c:?}")))?;
                if col >= 8 {
                    return Err(malformed(format!("rank {} is longer than 8 files", 8 - row)));
                }
                if piece.piece_type == PieceType::Pawn && (row == 0 || row == 7) {
                    return Err(malformed("pawn on the first or last rank"));
                }
                piece.has_moved = true;
                board.squares[row][col] = Some(piece);
                col += 1;
            }
            if col > 8 {
                return Err(malformed(format!("rank {} is longer than 8 files", 8 - row)));
            }
        }
        if col != 8 {
            return Err(malformed(format!("rank {} has {col} files", 8 - row)));
        }
    }

    for color in [Color::White, Color::Black] {
        let kings = board.pieces().filter(|(_, p)| p.is(PieceType::King, color)).count();
        if kings != 1 {
            return Err(malformed(format!("{color:?} has {kings} kings")));
        }
    }
    Ok(board)
}

fn parse_castling(field: &str) -> ChessResult<CastlingRights> {
    let mut rights = CastlingRights::none();
    if field == "-" {
        return Ok(rights);
    }
    for c in field.chars() {
        let flag = match c {
            'K' => &mut rights.white.king_side,
            'Q' => &mut rights.white.queen_side,
            'k' => &mut rights.black.king_side,
            'q' => &mut rights.black.queen_side,
            _ => return Err(malformed(format!("bad castling flag {c:?}"))),
        };
        if *flag {
            return Err(malformed(format!("castling flag {c:?} repeated")));
        }
        *flag = true;
    }
    Ok(rights)
}

/// The target sits behind a pawn that just made a double step, so it must be
/// on rank 6 when white is to move and rank 3 when black is.
fn parse_en_passant(field: &str, turn: Color) -> ChessResult<Option<Square>> {
    if field == "-" {
        return Ok(None);
    }
    let square = Square::from_algebraic(field)
        .ok_or_else(|| malformed(format!("bad en-passant square {field:?}")))?;
    let expected_row = match turn {
        Color::White => 2,
        Color::Black => 5,
    };
    if square.row != expected_row {
        return Err(malformed(format!("en-passant square {field} is on the wrong rank")));
    }
    Ok(Some(square))
}

fn parse_number(field: &str, what: &str) -> ChessResult<u32> {
    field
        .parse()
        .map_err(|_| malformed(format!("{what} must be a number, got {field:?}")))
}
