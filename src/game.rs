use chrono::prelude::*;
use itertools::Itertools;
use tracing::{debug, info};

use crate::board::*;
use crate::engine::{pick_move, SearchOptions};
use crate::error::FenError;
use crate::evaluate;
use crate::history::PositionHistory;
use crate::rules::{classify_game_end, detect_game_end};
use crate::san::{move_to_san, push_check_suffix, rival_origins};
use crate::types::*;

/// A committed move together with everything needed to display or replay it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MoveRecord {
    pub mv: Move,
    pub piece: Piece,
    pub captured: Option<Piece>,
    pub san: String,
    /// Position after the move
    pub board_after: Board,
    pub is_check: bool,
    pub is_checkmate: bool,
    pub is_stalemate: bool,
}

/// Pieces taken so far, grouped by the side that took them
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CapturedPieces {
    pub by_white: Vec<Piece>,
    pub by_black: Vec<Piece>,
}

/// A game in progress: the live position, the moves that led to it and the
/// repetition history.
pub struct Game {
    board: Board,
    start_board: Board,
    moves: Vec<MoveRecord>,
    history: PositionHistory,
    status: Option<Status>,
    game_start_time: DateTime<Local>,
}

impl Game {
    pub fn new() -> Self {
        Self::from_board(Board::new())
    }

    pub fn from_fen(fen: &str) -> Result<Self, FenError> {
        Ok(Self::from_board(Board::from_fen(fen)?))
    }

    fn from_board(board: Board) -> Self {
        let mut history = PositionHistory::new();
        history.record(&board);
        let status = detect_game_end(&board, &history);
        Self {
            start_board: board.clone(),
            board,
            moves: Vec::new(),
            history,
            status,
            game_start_time: Local::now(),
        }
    }

    /// Back to the standard starting position with an empty history
    pub fn reset(&mut self) {
        *self = Self::from_board(Board::new());
    }

    /// Replace the game with the position in `fen`. On error the game is left untouched.
    pub fn load_position(&mut self, fen: &str) -> Result<(), FenError> {
        let board = Board::from_fen(fen)?;
        info!("loaded position {}", fen);
        *self = Self::from_board(board);
        Ok(())
    }

    pub fn export_position(&self) -> String {
        self.board.to_fen()
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn start_board(&self) -> &Board {
        &self.start_board
    }

    /// Side to move, read from the live position
    pub fn turn(&self) -> Color {
        self.board.get_active_color()
    }

    pub fn status(&self) -> Option<Status> {
        self.status
    }

    pub fn is_game_over(&self) -> bool {
        self.status.is_some()
    }

    pub fn move_history(&self) -> &[MoveRecord] {
        &self.moves
    }

    pub fn repetitions(&self) -> u32 {
        self.history.count(&self.board)
    }

    /// Legal moves of the piece on `square`. Empty when the game is over, the
    /// square is empty, or the piece does not belong to the side to move.
    pub fn legal_moves(&self, square: Square) -> Vec<Move> {
        match self.board.piece_at(square) {
            Some(piece) if piece.color == self.turn() && !self.is_game_over() => {
                self.board.get_legal_moves_from(square)
            }
            _ => vec![],
        }
    }

    /// Every legal move of the side to move, empty once the game is over
    pub fn all_legal_moves(&self) -> Vec<Move> {
        if self.is_game_over() {
            return vec![];
        }
        self.board.get_legal_moves(self.turn())
    }

    /// Play `request` if it names exactly one legal move. Returns `None` (and
    /// changes nothing) for illegal requests, for promotions without a piece,
    /// and once the game is over.
    pub fn make_move(&mut self, request: MoveRequest) -> Option<MoveRecord> {
        if let Some(status) = self.status {
            debug!("rejected {:?}: game is over ({})", request, status.to_human());
            return None;
        }
        let legal = self.board.get_legal_moves(self.turn());
        let mut candidates = legal.iter().filter(|m| m.matches(&request));
        let (Some(mv), None) = (candidates.next(), candidates.next()) else {
            debug!("rejected {:?}: not a legal move", request);
            return None;
        };
        let mv = *mv;
        let piece = self.board.piece_at(mv.from)?;
        let captured = mv.capture_square().and_then(|sq| self.board.piece_at(sq));

        let rivals = rival_origins(&self.board, &legal, &mv);
        let board_after = self.board.execute_move(&mv);

        let to_move = board_after.get_active_color();
        let is_check = board_after.is_in_check(to_move);
        let no_moves = board_after.get_legal_moves(to_move).is_empty();
        let san = push_check_suffix(
            move_to_san(&mv, piece, captured, &rivals),
            is_check,
            is_check && no_moves,
        );

        let record = MoveRecord {
            mv,
            piece,
            captured,
            san,
            board_after: board_after.clone(),
            is_check,
            is_checkmate: is_check && no_moves,
            is_stalemate: !is_check && no_moves,
        };

        self.board = board_after;
        self.history.record(&self.board);
        self.status = classify_game_end(&self.board, &self.history, !no_moves);
        self.moves.push(record.clone());

        info!("{} plays {}", piece.color.to_human(), record.san);
        if let Some(status) = self.status {
            info!("game over: {}", status.to_human());
        }
        Some(record)
    }

    /// Take back the last move. Undo also reopens a finished game.
    pub fn undo_move(&mut self) -> Option<MoveRecord> {
        let record = self.moves.pop()?;
        self.history.forget(&self.board);
        self.board = self
            .moves
            .last()
            .map_or_else(|| self.start_board.clone(), |r| r.board_after.clone());
        self.status = detect_game_end(&self.board, &self.history);
        debug!("took back {}", record.san);
        Some(record)
    }

    /// Static evaluation of the live position, positive when white is better
    pub fn evaluate(&self) -> i32 {
        evaluate::evaluate_board(&self.board)
    }

    pub fn is_in_check(&self, color: Color) -> bool {
        self.board.is_in_check(color)
    }

    /// Point balance (pawn 1 ... queen 9), positive when white is ahead
    pub fn material_balance(&self) -> i32 {
        evaluate::material_balance(&self.board)
    }

    pub fn captured(&self) -> CapturedPieces {
        let mut captured = CapturedPieces::default();
        for record in &self.moves {
            if let Some(piece) = record.captured {
                match record.piece.color {
                    Color::White => captured.by_white.push(piece),
                    Color::Black => captured.by_black.push(piece),
                }
            }
        }
        captured
    }

    /// Let the engine play both sides for up to `max_moves` full moves.
    /// Returns the final status if the game ended.
    pub fn play(&mut self, max_moves: u32, options: &SearchOptions) -> Option<Status> {
        for _ in 0..2 * max_moves {
            if self.is_game_over() {
                break;
            }
            let result = pick_move(&self.board, options)?;
            self.make_move(MoveRequest::from(result.best_move))?;
        }
        self.status
    }

    pub fn to_pgn(&self) -> String {
        let mut pgn = String::new();
        let result = self.status.map_or("*", |s| s.pgn_result());

        pgn.push_str("[Event \"Casual game\"]\n");
        pgn.push_str("[Site \"?\"]\n");
        pgn.push_str(&format!("[Date \"{}\"]\n", self.game_start_time.format("%Y.%m.%d")));
        pgn.push_str("[Round \"1\"]\n");
        pgn.push_str("[White \"?\"]\n");
        pgn.push_str("[Black \"?\"]\n");
        pgn.push_str(&format!("[Result \"{}\"]\n", result));
        let start_fen = self.start_board.to_fen();
        if start_fen != STARTING_POSITION_FEN {
            pgn.push_str("[SetUp \"1\"]\n");
            pgn.push_str(&format!("[FEN \"{}\"]\n", start_fen));
        }
        pgn.push('\n');

        let mut number = self.start_board.fullmove_number();
        let mut tokens = Vec::new();
        for (i, record) in self.moves.iter().enumerate() {
            if record.piece.color == Color::White {
                tokens.push(format!("{}.", number));
            } else if i == 0 {
                tokens.push(format!("{}...", number));
            }
            tokens.push(record.san.clone());
            if record.piece.color == Color::Black {
                number += 1;
            }
        }
        tokens.push(result.to_string());
        pgn.push_str(&tokens.iter().join(" "));
        pgn.push('\n');
        pgn
    }
}

impl Default for Game {
    fn default() -> Self {
        Self::new()
    }
}
