use crate::config::Rules;
use crate::game::Game;
use crate::piece::{Color, PieceType};
use crate::square::Square;
use serde::Serialize;
use wasm_bindgen::prelude::*;

#[derive(Serialize)]
struct SquarePiece {
    piece_type: String,
    color: String,
}

#[derive(Serialize)]
struct BoardState {
    squares: Vec<Vec<Option<SquarePiece>>>,
    current_turn: String,
    fen: String,
    is_in_check: bool,
    checkmate: bool,
    stalemate: bool,
    draw: Option<String>,
    game_over: bool,
    result: Option<String>,
    captured_white: Vec<String>,
    captured_black: Vec<String>,
    material_balance: i32,
    last_move: Option<[[u8; 2]; 2]>,
    movetext: String,
}

#[derive(Serialize)]
struct MoveResult {
    legal: bool,
    san: Option<String>,
    #[serde(flatten)]
    board_state: Option<BoardState>,
    error: Option<String>,
}

fn piece_type_to_string(pt: PieceType) -> String {
    format!("{pt:?}")
}

fn color_to_string(c: Color) -> String {
    format!("{c:?}")
}

fn build_board_state(game: &Game) -> BoardState {
    let board = game.board();
    let squares = board
        .squares
        .iter()
        .map(|rank| {
            rank.iter()
                .map(|cell| {
                    cell.map(|p| SquarePiece {
                        piece_type: piece_type_to_string(p.piece_type),
                        color: color_to_string(p.color),
                    })
                })
                .collect()
        })
        .collect();

    let status = game.status();
    let names = |pieces: &[crate::piece::Piece]| -> Vec<String> {
        pieces.iter().map(|p| piece_type_to_string(p.piece_type)).collect()
    };

    BoardState {
        squares,
        current_turn: color_to_string(game.turn()),
        fen: game.to_fen(),
        is_in_check: status.check,
        checkmate: status.checkmate,
        stalemate: status.stalemate,
        draw: status.draw.map(|reason| format!("{reason:?}")),
        game_over: status.game_over(),
        result: game.game_result().map(|r| r.as_str().to_string()),
        captured_white: names(&game.captured().white),
        captured_black: names(&game.captured().black),
        material_balance: game.material_balance(),
        last_move: game
            .last_move()
            .map(|r| [[r.mv.from.row, r.mv.from.col], [r.mv.to.row, r.mv.to.col]]),
        movetext: game.movetext(),
    }
}

fn to_js<T: Serialize>(value: &T) -> JsValue {
    serde_wasm_bindgen::to_value(value).unwrap_or(JsValue::NULL)
}

fn rejected(err: impl ToString) -> JsValue {
    to_js(&MoveResult {
        legal: false,
        san: None,
        board_state: None,
        error: Some(err.to_string()),
    })
}

#[wasm_bindgen(js_name = Game)]
pub struct WasmGame {
    game: Game,
}

#[wasm_bindgen(js_class = Game)]
impl WasmGame {
    /// `rules_json` may switch off castling, en passant or the fifty-move rule.
    #[wasm_bindgen(constructor)]
    pub fn new(rules_json: Option<String>) -> Result<WasmGame, JsValue> {
        let rules = match rules_json {
            Some(text) => Rules::from_json(&text).map_err(|e| JsValue::from_str(&e.to_string()))?,
            None => Rules::default(),
        };
        Ok(WasmGame {
            game: Game::with_rules(rules),
        })
    }

    pub fn get_board_state(&self) -> JsValue {
        to_js(&build_board_state(&self.game))
    }

    pub fn make_move(
        &mut self,
        from_row: u8,
        from_col: u8,
        to_row: u8,
        to_col: u8,
        promotion: Option<String>,
    ) -> JsValue {
        let from = Square { row: from_row, col: from_col };
        let to = Square { row: to_row, col: to_col };
        // Unknown names are rejected here; King and Pawn by `apply_move`.
        let promo_pt = match promotion.as_deref() {
            None => None,
            Some(name) => match PieceType::from_name(name) {
                Some(pt) => Some(pt),
                None => return rejected(format!("unknown promotion piece {name:?}")),
            },
        };

        match self.game.apply_move(from, to, promo_pt) {
            Ok(outcome) => to_js(&MoveResult {
                legal: true,
                san: Some(outcome.record.san),
                board_state: Some(build_board_state(&self.game)),
                error: None,
            }),
            Err(err) => rejected(err),
        }
    }

    /// Apply a move in UCI form, as returned by an external advisor engine.
    pub fn make_uci_move(&mut self, uci: &str) -> JsValue {
        match self.game.apply_uci(uci) {
            Ok(outcome) => to_js(&MoveResult {
                legal: true,
                san: Some(outcome.record.san),
                board_state: Some(build_board_state(&self.game)),
                error: None,
            }),
            Err(err) => rejected(err),
        }
    }

    pub fn get_legal_moves_for_square(&self, row: u8, col: u8) -> JsValue {
        let dests: Vec<[u8; 2]> = self
            .game
            .legal_destinations(Square { row, col })
            .into_iter()
            .map(|sq| [sq.row, sq.col])
            .collect();
        to_js(&dests)
    }

    pub fn undo(&mut self) -> JsValue {
        match self.game.undo_move() {
            Ok(_) => to_js(&build_board_state(&self.game)),
            Err(err) => rejected(err),
        }
    }

    pub fn reset(&mut self) -> JsValue {
        self.game.reset();
        to_js(&build_board_state(&self.game))
    }

    pub fn export_fen(&self) -> String {
        self.game.to_fen()
    }

    /// Returns `null` on success, the error text otherwise.
    pub fn load_fen(&mut self, fen: &str) -> Option<String> {
        self.game.load_fen(fen).err().map(|e| e.to_string())
    }

    pub fn get_game_result(&self) -> Option<String> {
        self.game.game_result().map(|r| r.as_str().to_string())
    }
}
