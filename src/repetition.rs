use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::board::{Board, CastlingRights};
use crate::piece::{Color, PieceType};
use crate::square::Square;

/// splitmix64 finalizer; gives every feature of a position its own fixed key.
const fn mix(seed: u64) -> u64 {
    let mut z = seed.wrapping_add(0x9e3779b97f4a7c15);
    z = (z ^ (z >> 30)).wrapping_mul(0xbf58476d1ce4e5b9);
    z = (z ^ (z >> 27)).wrapping_mul(0x94d049bb133111eb);
    z ^ (z >> 31)
}

const TURN_KEY: u64 = mix(0x1000);
const CASTLING_BASE: u64 = 0x2000;
const EN_PASSANT_BASE: u64 = 0x3000;

/// Key of a position for repetition counting: board contents, side to move,
/// castling rights, and the en-passant file when a capture onto it is
/// actually on offer. `has_moved` flags are not part of it.
pub fn position_key(
    board: &Board,
    turn: Color,
    castling: &CastlingRights,
    en_passant: Option<Square>,
) -> u64 {
    let mut key = 0u64;
    for (sq, p) in board.pieces() {
        let index = (sq.row as u64 * 8 + sq.col as u64) * 12
            + p.color.index() as u64 * 6
            + p.piece_type.index() as u64;
        key ^= mix(index + 1);
    }
    if turn == Color::Black {
        key ^= TURN_KEY;
    }
    let flags = [
        castling.white.king_side,
        castling.white.queen_side,
        castling.black.king_side,
        castling.black.queen_side,
    ];
    for (i, set) in flags.into_iter().enumerate() {
        if set {
            key ^= mix(CASTLING_BASE + i as u64);
        }
    }
    if let Some(target) = en_passant {
        if en_passant_available(board, turn, target) {
            key ^= mix(EN_PASSANT_BASE + target.col as u64);
        }
    }
    key
}

/// Whether a pawn of `turn` stands ready to capture onto `target`.
fn en_passant_available(board: &Board, turn: Color, target: Square) -> bool {
    [-1, 1].into_iter().any(|dc| {
        target
            .offset(-turn.forward(), dc)
            .and_then(|sq| board.get(sq))
            .map(|p| p.is(PieceType::Pawn, turn))
            .unwrap_or(false)
    })
}

/// Occurrence count per position key.
#[derive(Clone, Serialize, Deserialize, Debug, Default, PartialEq, Eq)]
pub struct RepetitionTable {
    counts: HashMap<u64, u32>,
}

impl RepetitionTable {
    /// Record one more occurrence and return the new count.
    pub fn record(&mut self, key: u64) -> u32 {
        let count = self.counts.entry(key).or_insert(0);
        *count += 1;
        *count
    }

    /// Take back one occurrence recorded by `record`.
    pub fn forget(&mut self, key: u64) {
        if let Some(count) = self.counts.get_mut(&key) {
            *count -= 1;
            if *count == 0 {
                self.counts.remove(&key);
            }
        }
    }

    pub fn count(&self, key: u64) -> u32 {
        self.counts.get(&key).copied().unwrap_or(0)
    }
}
