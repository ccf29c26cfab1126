// =============================================================================
// Game state machine
//
// Owns the live board plus turn, castling rights, en-passant target, clocks,
// history, captured pieces and repetition counts. The only mutators are
// apply_move, undo_move, load_fen and reset; each either fully succeeds or
// returns an error with nothing changed.
//
// Coordinate system: row 0 = rank 8, col 0 = file a.
// =============================================================================

use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

use crate::board::{Board, CastlingRights};
use crate::config::Rules;
use crate::error::{ChessError, ChessResult};
use crate::fen::Fen;
use crate::movegen::{self, MoveContext};
use crate::moves::{Move, MoveKind, MoveRecord, Snapshot};
use crate::notation::{self, CapturedPieces};
use crate::piece::{Color, Piece, PieceType};
use crate::repetition::{position_key, RepetitionTable};
use crate::square::Square;

#[derive(Clone, Copy, Serialize, Deserialize, Debug, PartialEq, Eq, Hash)]
pub enum DrawReason {
    Stalemate,
    FiftyMove,
    InsufficientMaterial,
    ThreefoldRepetition,
}

/// Derived flags for the side to move. `check` stays set on checkmate;
/// stalemate also sets `draw`.
#[derive(Clone, Copy, Serialize, Deserialize, Debug, PartialEq, Eq, Default)]
pub struct Status {
    pub check: bool,
    pub checkmate: bool,
    pub stalemate: bool,
    pub draw: Option<DrawReason>,
}

impl Status {
    pub fn is_draw(&self) -> bool {
        self.draw.is_some()
    }

    pub fn game_over(&self) -> bool {
        self.checkmate || self.draw.is_some()
    }
}

#[derive(Clone, Copy, Serialize, Deserialize, Debug, PartialEq, Eq)]
pub enum GameResult {
    WhiteWins,
    BlackWins,
    Draw,
}

impl GameResult {
    pub fn as_str(self) -> &'static str {
        match self {
            GameResult::WhiteWins => "1-0",
            GameResult::BlackWins => "0-1",
            GameResult::Draw => "1/2-1/2",
        }
    }
}

/// Everything about a position besides the piece placement. Restored
/// wholesale from a `Snapshot` on undo.
#[derive(Clone, Copy, Serialize, Deserialize, Debug, PartialEq)]
pub struct GameState {
    pub turn: Color,
    pub castling_rights: CastlingRights,
    pub en_passant: Option<Square>,
    pub halfmove_clock: u32,
    pub fullmove_number: u32,
    pub status: Status,
}

/// What a successful `apply_move` reports back to the caller.
#[derive(Clone, Debug, PartialEq)]
pub struct MoveOutcome {
    pub record: MoveRecord,
    pub status: Status,
}

#[derive(Clone, Debug)]
pub struct Game {
    board: Board,
    state: GameState,
    rules: Rules,
    history: Vec<MoveRecord>,
    captured: CapturedPieces,
    repetitions: RepetitionTable,
}

impl Default for Game {
    fn default() -> Self {
        Self::new()
    }
}

impl Game {
    pub fn new() -> Self {
        Self::with_rules(Rules::default())
    }

    pub fn with_rules(rules: Rules) -> Self {
        let state = GameState {
            turn: Color::White,
            castling_rights: CastlingRights::all(),
            en_passant: None,
            halfmove_clock: 0,
            fullmove_number: 1,
            status: Status::default(),
        };
        Self::from_parts(Board::new(), state, rules)
    }

    pub fn from_fen(text: &str) -> ChessResult<Self> {
        Self::from_fen_with_rules(text, Rules::default())
    }

    pub fn from_fen_with_rules(text: &str, rules: Rules) -> ChessResult<Self> {
        let fen = Fen::parse(text)?;
        let state = GameState {
            turn: fen.turn,
            castling_rights: fen.castling,
            en_passant: fen.en_passant,
            halfmove_clock: fen.halfmove_clock,
            fullmove_number: fen.fullmove_number,
            status: Status::default(),
        };
        Ok(Self::from_parts(fen.board, state, rules))
    }

    /// Fresh game around a position: empty history, first occurrence of the
    /// position counted, flags derived from the board.
    fn from_parts(board: Board, state: GameState, rules: Rules) -> Self {
        let mut game = Game {
            board,
            state,
            rules,
            history: Vec::new(),
            captured: CapturedPieces::default(),
            repetitions: RepetitionTable::default(),
        };
        game.repetitions.record(game.position_key());
        game.state.status = game.compute_status();
        game
    }

    // -------------------------------------------------------------------------
    // Accessors
    // -------------------------------------------------------------------------

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    pub fn status(&self) -> Status {
        self.state.status
    }

    pub fn rules(&self) -> Rules {
        self.rules
    }

    pub fn turn(&self) -> Color {
        self.state.turn
    }

    pub fn castling_rights(&self) -> CastlingRights {
        self.state.castling_rights
    }

    pub fn en_passant(&self) -> Option<Square> {
        self.state.en_passant
    }

    pub fn halfmove_clock(&self) -> u32 {
        self.state.halfmove_clock
    }

    pub fn fullmove_number(&self) -> u32 {
        self.state.fullmove_number
    }

    pub fn history(&self) -> &[MoveRecord] {
        &self.history
    }

    pub fn last_move(&self) -> Option<&MoveRecord> {
        self.history.last()
    }

    pub fn captured(&self) -> &CapturedPieces {
        &self.captured
    }

    pub fn is_game_over(&self) -> bool {
        self.state.status.game_over()
    }

    pub fn position_key(&self) -> u64 {
        position_key(
            &self.board,
            self.state.turn,
            &self.state.castling_rights,
            self.move_context().en_passant,
        )
    }

    /// How many times the current position has occurred, itself included.
    pub fn repetition_count(&self) -> u32 {
        self.repetitions.count(self.position_key())
    }

    pub fn game_result(&self) -> Option<GameResult> {
        let status = &self.state.status;
        if status.checkmate {
            Some(match self.state.turn {
                Color::White => GameResult::BlackWins,
                Color::Black => GameResult::WhiteWins,
            })
        } else if status.is_draw() {
            Some(GameResult::Draw)
        } else {
            None
        }
    }

    pub fn material(&self, color: Color) -> u32 {
        notation::material(&self.board, color)
    }

    pub fn material_balance(&self) -> i32 {
        notation::material_balance(&self.board)
    }

    pub fn movetext(&self) -> String {
        notation::movetext(&self.history)
    }

    pub fn ascii(&self) -> String {
        self.board.ascii()
    }

    pub fn to_fen(&self) -> String {
        Fen {
            board: self.board,
            turn: self.state.turn,
            castling: self.state.castling_rights,
            en_passant: self.state.en_passant,
            halfmove_clock: self.state.halfmove_clock,
            fullmove_number: self.state.fullmove_number,
        }
        .encode()
    }

    // -------------------------------------------------------------------------
    // Move generation
    // -------------------------------------------------------------------------

    /// Rights and target as seen by the move generator under the active rules.
    fn move_context(&self) -> MoveContext {
        MoveContext {
            castling: if self.rules.castling {
                self.state.castling_rights
            } else {
                CastlingRights::none()
            },
            en_passant: if self.rules.en_passant {
                self.state.en_passant
            } else {
                None
            },
        }
    }

    /// Legal moves for the side to move.
    pub fn legal_moves(&self) -> Vec<Move> {
        self.legal_moves_for(self.state.turn)
    }

    pub fn legal_moves_for(&self, color: Color) -> Vec<Move> {
        movegen::legal_moves(&self.board, color, &self.move_context())
    }

    /// Where the piece on `square` may legally go. Empty when the square is
    /// empty or off-board, holds a piece of the side not to move, or the game
    /// is over.
    pub fn legal_destinations(&self, square: Square) -> Vec<Square> {
        if self.is_game_over() || !self.board.is_own_piece(square, self.state.turn) {
            return Vec::new();
        }
        movegen::legal_destinations(&self.board, square, &self.move_context())
    }

    // -------------------------------------------------------------------------
    // Transitions
    // -------------------------------------------------------------------------

    /// Validate and play `from -> to`. `promotion` picks the piece for a pawn
    /// reaching the last rank (queen if `None`). It has no effect on other
    /// moves but must still be one of Q, R, B or N when given.
    pub fn apply_move(&mut self, from: Square, to: Square, promotion: Option<PieceType>) -> ChessResult<MoveOutcome> {
        let rejected = |err: ChessError| {
            debug!(%err, "move rejected");
            Err(err)
        };

        for square in [from, to] {
            if !square.in_bounds() {
                return rejected(ChessError::InvalidSquare(square));
            }
        }
        let Some(piece) = self.board.get(from) else {
            return rejected(ChessError::NoPieceAtSource(from));
        };
        if piece.color != self.state.turn {
            return rejected(ChessError::WrongTurn {
                expected: self.state.turn,
                found: piece.color,
            });
        }
        if self.is_game_over() {
            return rejected(ChessError::GameOver);
        }

        let legal = self.legal_moves();
        if !legal.iter().any(|m| m.from == from && m.to == to) {
            return rejected(ChessError::IllegalMove { from, to });
        }
        let choice = promotion.unwrap_or(PieceType::Queen);
        if !choice.is_promotion_choice() {
            return rejected(ChessError::IllegalMove { from, to });
        }

        let record = self.commit(piece, from, to, choice, &legal).clone();
        debug!(san = %record.san, fen = %self.to_fen(), "move applied");
        if self.is_game_over() {
            debug!(status = ?self.state.status, result = ?self.game_result(), "game over");
        }
        Ok(MoveOutcome {
            record,
            status: self.state.status,
        })
    }

    /// Parse a UCI move (`e2e4`, `e7e8n`) and apply it.
    pub fn apply_uci(&mut self, text: &str) -> ChessResult<MoveOutcome> {
        let mv = Move::from_uci(text.trim())?;
        self.apply_move(mv.from, mv.to, mv.promotion)
    }

    /// Play an already validated move. `legal` is the mover's legal list in
    /// the current position, used for SAN disambiguation.
    fn commit(&mut self, piece: Piece, from: Square, to: Square, promotion: PieceType, legal: &[Move]) -> &MoveRecord {
        let before = Snapshot {
            board: self.board,
            state: self.state,
        };
        let kind = MoveKind::classify(&self.board, piece, from, to);
        let san_body = notation::san_body(&self.board, piece, from, to, kind, promotion, legal);

        let captured = self.board.relocate(from, to).map(|(_, p)| p);
        let mut moved = piece;
        moved.has_moved = true;
        if kind == MoveKind::Promotion {
            moved.piece_type = promotion;
        }
        self.board.set(to, Some(moved));

        let mover = piece.color;
        let state = &mut self.state;
        if captured.is_some() || piece.piece_type == PieceType::Pawn {
            state.halfmove_clock = 0;
        } else {
            state.halfmove_clock = state.halfmove_clock.saturating_add(1);
        }
        if mover == Color::Black {
            state.fullmove_number = state.fullmove_number.saturating_add(1);
        }
        state.turn = mover.opposite();
        state.en_passant = if kind == MoveKind::PawnDouble {
            Some(Square {
                row: (from.row + to.row) / 2,
                col: from.col,
            })
        } else {
            None
        };
        match piece.piece_type {
            PieceType::King => {
                let side = state.castling_rights.side_mut(mover);
                side.king_side = false;
                side.queen_side = false;
            }
            PieceType::Rook => state.castling_rights.clear_corner(mover, from),
            _ => {}
        }
        if let Some(victim) = captured {
            state.castling_rights.clear_corner(victim.color, to);
            self.captured.push(victim);
        }

        let key = self.position_key();
        self.repetitions.record(key);
        self.state.status = self.compute_status();

        let san = format!("{san_body}{}", notation::san_suffix(&self.state.status));
        self.history.push(MoveRecord {
            mv: Move {
                from,
                to,
                promotion: (kind == MoveKind::Promotion).then_some(promotion),
            },
            piece,
            captured,
            kind,
            san,
            position_key: key,
            before,
        });
        &self.history[self.history.len() - 1]
    }

    /// Flags for the side to move in the current position. Checkmate and
    /// stalemate take precedence over the other draw rules.
    fn compute_status(&self) -> Status {
        let turn = self.state.turn;
        let check = self.board.is_in_check(turn);
        let no_moves = self.legal_moves().is_empty();

        let mut status = Status {
            check,
            checkmate: check && no_moves,
            stalemate: !check && no_moves,
            draw: None,
        };
        if status.stalemate {
            status.draw = Some(DrawReason::Stalemate);
        } else if !status.checkmate {
            if self.rules.fifty_move_rule && self.state.halfmove_clock >= 100 {
                status.draw = Some(DrawReason::FiftyMove);
            } else if self.board.has_insufficient_material() {
                status.draw = Some(DrawReason::InsufficientMaterial);
            } else if self.repetitions.count(self.position_key()) >= 3 {
                status.draw = Some(DrawReason::ThreefoldRepetition);
            }
        }
        status
    }

    /// Take back the most recent move, restoring board and state exactly.
    pub fn undo_move(&mut self) -> ChessResult<MoveRecord> {
        let record = self.pop_record().ok_or(ChessError::NothingToUndo)?;
        debug!(san = %record.san, "move undone");
        Ok(record)
    }

    fn pop_record(&mut self) -> Option<MoveRecord> {
        let record = self.history.pop()?;
        self.board = record.before.board;
        self.state = record.before.state;
        self.repetitions.forget(record.position_key);
        if let Some(victim) = record.captured {
            self.captured.pop(victim.color);
        }
        Some(record)
    }

    /// Back to the standard starting position, keeping the rules.
    pub fn reset(&mut self) {
        *self = Self::with_rules(self.rules);
        debug!("game reset");
    }

    /// Replace the whole game with the position in `text`, keeping the rules.
    /// On error the current game is untouched.
    pub fn load_fen(&mut self, text: &str) -> ChessResult<()> {
        let loaded = Self::from_fen_with_rules(text, self.rules).inspect_err(|err| {
            debug!(%err, "FEN rejected");
        })?;
        *self = loaded;
        debug!(fen = %text, status = ?self.state.status, "FEN loaded");
        Ok(())
    }

    // -------------------------------------------------------------------------
    // Perft
    // -------------------------------------------------------------------------

    /// Count leaf nodes `depth` plies down, counting each promotion choice as
    /// its own move. Terminal draw flags do not stop the walk.
    pub fn perft(&mut self, depth: u32) -> u64 {
        if depth == 0 {
            return 1;
        }
        let legal = self.legal_moves();
        if depth == 1 {
            return legal.iter().map(|m| self.promotion_choices(m).len() as u64).sum();
        }

        let mut nodes = 0;
        for mv in &legal {
            let Some(piece) = self.board.get(mv.from) else {
                continue;
            };
            for choice in self.promotion_choices(mv) {
                self.commit(piece, mv.from, mv.to, choice, &legal);
                nodes += self.perft(depth - 1);
                self.pop_record();
            }
        }
        trace!(depth, nodes, "perft");
        nodes
    }

    /// Per-root-move node counts, for comparing against another move generator.
    pub fn perft_divide(&mut self, depth: u32) -> Vec<(Move, u64)> {
        let legal = self.legal_moves();
        let mut out = Vec::new();
        for mv in &legal {
            let Some(piece) = self.board.get(mv.from) else {
                continue;
            };
            for choice in self.promotion_choices(mv) {
                let played = self.commit(piece, mv.from, mv.to, choice, &legal).mv;
                let nodes = self.perft(depth.saturating_sub(1));
                self.pop_record();
                out.push((played, nodes));
            }
        }
        out
    }

    fn promotion_choices(&self, mv: &Move) -> Vec<PieceType> {
        let promotes = self
            .board
            .get(mv.from)
            .map(|p| p.piece_type == PieceType::Pawn && mv.to.row == p.color.promotion_rank())
            .unwrap_or(false);
        if promotes {
            PieceType::PROMOTIONS.to_vec()
        } else {
            vec![PieceType::Queen]
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fen::START_FEN;

    fn sq(s: &str) -> Square {
        Square::from_algebraic(s).expect("valid square")
    }

    fn play(game: &mut Game, moves: &[&str]) {
        for uci in moves {
            game.apply_uci(uci).unwrap_or_else(|e| panic!("{uci}: {e}"));
        }
    }

    #[test]
    fn new_game_matches_start_fen() {
        let game = Game::new();
        assert_eq!(game.to_fen(), START_FEN);
        assert_eq!(game.legal_moves().len(), 20);
        assert_eq!(game.repetition_count(), 1);
        assert_eq!(game.game_result(), None);
    }

    #[test]
    fn rejections_follow_validation_order() {
        let mut game = Game::new();
        let off = Square { row: 8, col: 0 };
        assert!(matches!(game.apply_move(off, sq("e4"), None), Err(ChessError::InvalidSquare(_))));
        assert!(matches!(game.apply_move(sq("e4"), sq("e5"), None), Err(ChessError::NoPieceAtSource(_))));
        assert!(matches!(game.apply_move(sq("e7"), sq("e5"), None), Err(ChessError::WrongTurn { .. })));
        assert!(matches!(game.apply_move(sq("e2"), sq("e5"), None), Err(ChessError::IllegalMove { .. })));
        assert_eq!(game.to_fen(), START_FEN);
        assert!(game.history().is_empty());
    }

    #[test]
    fn double_step_sets_target_for_one_ply_only() {
        let mut game = Game::new();
        play(&mut game, &["e2e4"]);
        assert_eq!(game.en_passant(), Some(sq("e3")));
        assert_eq!(game.to_fen(), "rnbqkbnr/pppppppp/8/8/4P3/8/PPPP1PPP/RNBQKBNR b KQkq e3 0 1");
        play(&mut game, &["g8f6"]);
        assert_eq!(game.en_passant(), None);
        assert_eq!(game.halfmove_clock(), 1);
        assert_eq!(game.fullmove_number(), 2);
    }

    #[test]
    fn en_passant_removes_the_passed_pawn() {
        let mut game = Game::new();
        play(&mut game, &["e2e4", "a7a6", "e4e5", "d7d5"]);
        let outcome = game.apply_uci("e5d6").expect("en passant is legal");
        assert_eq!(outcome.record.kind, MoveKind::EnPassant);
        assert_eq!(outcome.record.san, "exd6");
        assert!(game.board().is_empty(sq("d5")));
        assert_eq!(game.captured().tally(Color::Black, PieceType::Pawn), 1);

        game.undo_move().expect("undo");
        assert!(game.board().get(sq("d5")).unwrap().is(PieceType::Pawn, Color::Black));
        assert!(game.captured().black.is_empty());
        assert_eq!(game.en_passant(), Some(sq("d6")));
    }

    #[test]
    fn en_passant_expires_after_one_ply() {
        let mut game = Game::new();
        play(&mut game, &["e2e4", "a7a6", "e4e5", "d7d5", "h2h3", "h7h6"]);
        assert!(matches!(game.apply_uci("e5d6"), Err(ChessError::IllegalMove { .. })));
    }

    #[test]
    fn castling_moves_the_rook_and_clears_rights() {
        let mut game = Game::from_fen("r3k2r/8/8/8/8/8/8/R3K2R w KQkq - 0 1").expect("valid");
        let outcome = game.apply_uci("e1g1").expect("castle");
        assert_eq!(outcome.record.san, "O-O");
        assert!(game.board().get(sq("f1")).unwrap().is(PieceType::Rook, Color::White));
        assert!(game.board().is_empty(sq("h1")));
        assert_eq!(game.to_fen(), "r3k2r/8/8/8/8/8/8/R4RK1 b kq - 1 1");

        play(&mut game, &["a8b8"]);
        assert!(!game.castling_rights().black.queen_side);
        assert!(game.castling_rights().black.king_side);
    }

    #[test]
    fn capturing_a_home_rook_clears_that_right() {
        let mut game = Game::from_fen("r3k2r/8/8/8/8/8/8/R3K2R w KQkq - 0 1").expect("valid");
        play(&mut game, &["a1a8"]);
        assert!(!game.castling_rights().black.queen_side);
        assert!(!game.castling_rights().white.queen_side);
        assert_eq!(game.to_fen(), "R3k2r/8/8/8/8/8/8/4K2R b Kk - 0 1");
    }

    #[test]
    fn promotion_defaults_to_queen_and_honors_choice() {
        let mut game = Game::from_fen("8/P6k/8/8/8/8/8/K7 w - - 0 1").expect("valid");
        let outcome = game.apply_move(sq("a7"), sq("a8"), None).expect("promote");
        assert_eq!(outcome.record.kind, MoveKind::Promotion);
        assert!(game.board().get(sq("a8")).unwrap().is(PieceType::Queen, Color::White));
        game.undo_move().expect("undo");

        game.apply_move(sq("a7"), sq("a8"), Some(PieceType::Knight)).expect("underpromote");
        assert!(game.board().get(sq("a8")).unwrap().is(PieceType::Knight, Color::White));
        assert_eq!(game.last_move().unwrap().san, "a8=N");
        game.undo_move().expect("undo");

        assert!(matches!(
            game.apply_move(sq("a7"), sq("a8"), Some(PieceType::King)),
            Err(ChessError::IllegalMove { .. })
        ));
        assert!(game.board().get(sq("a7")).unwrap().is(PieceType::Pawn, Color::White));
    }

    #[test]
    fn undo_on_empty_history_fails() {
        let mut game = Game::new();
        assert!(matches!(game.undo_move(), Err(ChessError::NothingToUndo)));
    }

    #[test]
    fn fifty_move_rule_fires_at_one_hundred_half_moves() {
        let mut game = Game::from_fen("8/8/8/8/8/2k5/8/K6R w - - 99 80").expect("valid");
        assert!(!game.status().is_draw());
        play(&mut game, &["h1h2"]);
        assert_eq!(game.status().draw, Some(DrawReason::FiftyMove));
        assert_eq!(game.game_result(), Some(GameResult::Draw));
        assert!(matches!(game.apply_uci("c3b3"), Err(ChessError::GameOver)));

        let rules = Rules {
            fifty_move_rule: false,
            ..Rules::default()
        };
        let mut game = Game::from_fen_with_rules("8/8/8/8/8/2k5/8/K6R w - - 99 80", rules).expect("valid");
        play(&mut game, &["h1h2"]);
        assert!(!game.status().is_draw());
    }

    #[test]
    fn stalemate_is_a_draw() {
        let mut game = Game::from_fen("k7/8/1QK5/8/8/8/8/8 w - - 0 1").expect("valid");
        play(&mut game, &["c6c7"]);
        let status = game.status();
        assert!(status.stalemate);
        assert!(!status.check);
        assert_eq!(status.draw, Some(DrawReason::Stalemate));
        assert_eq!(game.game_result().map(GameResult::as_str), Some("1/2-1/2"));
    }

    #[test]
    fn rules_can_switch_off_castling_and_en_passant() {
        let rules = Rules {
            castling: false,
            en_passant: false,
            ..Rules::default()
        };
        let game = Game::from_fen_with_rules("r3k2r/8/8/8/8/8/8/R3K2R w KQkq - 0 1", rules).expect("valid");
        assert!(!game.legal_destinations(sq("e1")).contains(&sq("g1")));
        assert_eq!(game.to_fen(), "r3k2r/8/8/8/8/8/8/R3K2R w KQkq - 0 1");

        let game = Game::from_fen_with_rules("4k3/8/8/3pP3/8/8/8/4K3 w - d6 0 2", rules).expect("valid");
        assert_eq!(game.legal_destinations(sq("e5")), vec![sq("e6")]);
    }

    #[test]
    fn legal_destinations_only_for_side_to_move() {
        let game = Game::new();
        let mut knight = game.legal_destinations(sq("g1"));
        knight.sort_by_key(|s| s.col);
        assert_eq!(knight, vec![sq("f3"), sq("h3")]);
        assert!(game.legal_destinations(sq("g8")).is_empty());
        assert!(game.legal_destinations(sq("e4")).is_empty());
    }

    #[test]
    fn load_fen_failure_keeps_the_game() {
        let mut game = Game::new();
        play(&mut game, &["e2e4"]);
        let before = game.to_fen();
        assert!(game.load_fen("not a fen").is_err());
        assert_eq!(game.to_fen(), before);
        assert_eq!(game.history().len(), 1);

        game.load_fen("4k3/8/8/8/8/8/8/4K3 w - - 0 1").expect("valid");
        assert!(game.history().is_empty());
        assert_eq!(game.status().draw, Some(DrawReason::InsufficientMaterial));
    }

    #[test]
    fn reset_keeps_rules() {
        let rules = Rules {
            castling: false,
            ..Rules::default()
        };
        let mut game = Game::with_rules(rules);
        play(&mut game, &["e2e4", "e7e5"]);
        game.reset();
        assert_eq!(game.to_fen(), START_FEN);
        assert!(game.history().is_empty());
        assert_eq!(game.rules(), rules);
    }

    #[test]
    fn movetext_numbers_moves() {
        let mut game = Game::new();
        play(&mut game, &["e2e4", "e7e5", "g1f3"]);
        assert_eq!(game.movetext(), "1. e4 e5 2. Nf3");

        let mut game = Game::from_fen("rnbqkbnr/pppppppp/8/8/4P3/8/PPPP1PPP/RNBQKBNR b KQkq e3 0 1").expect("valid");
        play(&mut game, &["e7e5", "g1f3"]);
        assert_eq!(game.movetext(), "1... e5 2. Nf3");
    }

    #[test]
    fn clocks_saturate_instead_of_overflowing() {
        let mut game = Game::from_fen("4k3/8/8/8/8/8/8/R3K3 b - - 0 4294967295").expect("valid");
        play(&mut game, &["e8d8"]);
        assert_eq!(game.fullmove_number(), u32::MAX);

        let rules = Rules {
            fifty_move_rule: false,
            ..Rules::default()
        };
        let mut game = Game::from_fen_with_rules("4k3/8/8/8/8/8/8/R3K3 w - - 4294967295 9", rules).expect("valid");
        play(&mut game, &["a1a2"]);
        assert_eq!(game.halfmove_clock(), u32::MAX);
        game.undo_move().expect("undo");
        assert_eq!(game.halfmove_clock(), u32::MAX);
    }

    #[test]
    fn perft_start_position() {
        let mut game = Game::new();
        assert_eq!(game.perft(1), 20);
        assert_eq!(game.perft(2), 400);
        assert_eq!(game.perft(3), 8902);
        assert_eq!(game.to_fen(), START_FEN);
    }
}
