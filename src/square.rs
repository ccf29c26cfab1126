use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ChessError;

/// A board coordinate. Row 0 is rank 8, column 0 is file a.
///
/// The fields are public so callers can hand over raw UI coordinates; anything
/// that reaches the state machine is bounds-checked there.
#[derive(Clone, Copy, Serialize, Deserialize, Debug, PartialEq, Eq, Hash)]
pub struct Square {
    pub row: u8,
    pub col: u8,
}

impl Square {
    pub fn new(row: u8, col: u8) -> Option<Square> {
        let square = Square { row, col };
        square.in_bounds().then_some(square)
    }

    pub fn in_bounds(self) -> bool {
        self.row < 8 && self.col < 8
    }

    /// The square `(dr, dc)` away, if it is still on the board.
    pub fn offset(self, dr: i32, dc: i32) -> Option<Square> {
        let r = self.row as i32 + dr;
        let c = self.col as i32 + dc;
        if (0..8).contains(&r) && (0..8).contains(&c) {
            Some(Square {
                row: r as u8,
                col: c as u8,
            })
        } else {
            None
        }
    }

    pub fn file_char(self) -> char {
        (b'a' + self.col) as char
    }

    pub fn rank_char(self) -> char {
        (b'8' - self.row) as char
    }

    /// Dark squares are those where a1 sits; used for bishop parity.
    pub fn is_dark(self) -> bool {
        (self.row + self.col) % 2 == 1
    }

    pub fn from_algebraic(s: &str) -> Option<Square> {
        let bytes = s.as_bytes();
        if bytes.len() != 2 {
            return None;
        }
        let (file, rank) = (bytes[0], bytes[1]);
        if !(b'a'..=b'h').contains(&file) || !(b'1'..=b'8').contains(&rank) {
            return None;
        }
        Some(Square {
            row: b'8' - rank,
            col: file - b'a',
        })
    }

    /// Every on-board square, rank 8 first.
    pub fn all() -> impl Iterator<Item = Square> {
        (0..8u8).flat_map(|row| (0..8u8).map(move |col| Square { row, col }))
    }
}

impl fmt::Display for Square {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.in_bounds() {
            write!(f, "{}{}", self.file_char(), self.rank_char())
        } else {
            write!(f, "({}, {})", self.row, self.col)
        }
    }
}

impl FromStr for Square {
    type Err = ChessError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Square::from_algebraic(s).ok_or_else(|| ChessError::InvalidNotation(s.to_string()))
    }
}
