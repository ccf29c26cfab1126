use serde::{Deserialize, Serialize};

use crate::error::ChessResult;

/// Optional rules that can be switched off for variants and teaching modes.
/// Fixed for the lifetime of a `Game`; `reset` and `load_fen` keep it.
#[derive(Clone, Copy, Serialize, Deserialize, Debug, PartialEq, Eq)]
#[serde(default)]
pub struct Rules {
    pub en_passant: bool,
    pub castling: bool,
    pub fifty_move_rule: bool,
}

impl Default for Rules {
    fn default() -> Self {
        Rules {
            en_passant: true,
            castling: true,
            fifty_move_rule: true,
        }
    }
}

impl Rules {
    /// Parse from JSON. Missing keys keep their default (enabled).
    pub fn from_json(text: &str) -> ChessResult<Rules> {
        Ok(serde_json::from_str(text)?)
    }

    pub fn to_json(&self) -> ChessResult<String> {
        Ok(serde_json::to_string(self)?)
    }
}
