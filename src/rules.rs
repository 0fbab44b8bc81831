//! Game-end detection: mate, stalemate and the automatic draw rules.

use crate::board::Board;
use crate::history::PositionHistory;
use crate::types::*;

/// Halfmoves without a capture or pawn move after which the game is drawn
pub const FIFTY_MOVE_HALFMOVES: u32 = 100;

/// Occurrences of one position that draw the game
pub const REPETITION_LIMIT: u32 = 3;

/// Status of the game for the side to move, first match wins: checkmate,
/// stalemate, fifty-move rule, threefold repetition, insufficient material.
pub fn detect_game_end(board: &Board, history: &PositionHistory) -> Option<Status> {
    let has_legal_moves = !board.get_legal_moves(board.get_active_color()).is_empty();
    classify_game_end(board, history, has_legal_moves)
}

/// [`detect_game_end`] for a caller that already generated the legal moves
/// of the side to move.
pub fn classify_game_end(
    board: &Board,
    history: &PositionHistory,
    has_legal_moves: bool,
) -> Option<Status> {
    let to_move = board.get_active_color();
    if !has_legal_moves {
        return if board.is_in_check(to_move) {
            Some(Status::Checkmate(to_move.other_color()))
        } else {
            Some(Status::Stalemate)
        };
    }
    if board.halfmove_clock() >= FIFTY_MOVE_HALFMOVES {
        return Some(Status::FiftyMoveRule);
    }
    if history.has_repetition(REPETITION_LIMIT) {
        return Some(Status::ThreefoldRepetition);
    }
    if insufficient_material(board) {
        return Some(Status::InsufficientMaterial);
    }
    None
}

/// Draw rules that can be read off the board alone, ignoring repetition
pub fn is_draw_by_rule(board: &Board) -> Option<Status> {
    if board.halfmove_clock() >= FIFTY_MOVE_HALFMOVES {
        Some(Status::FiftyMoveRule)
    } else if insufficient_material(board) {
        Some(Status::InsufficientMaterial)
    } else {
        None
    }
}

/// King against king, king and one minor piece against a lone king, or king
/// and bishop against king and bishop with both bishops on the same square color.
pub fn insufficient_material(board: &Board) -> bool {
    let others: Vec<(Square, Piece)> = board
        .pieces()
        .filter(|(_, p)| p.piece_type != PieceType::King)
        .collect();

    match others.as_slice() {
        [] => true,
        [(_, piece)] => matches!(piece.piece_type, PieceType::Knight | PieceType::Bishop),
        [(sq_a, a), (sq_b, b)] => {
            a.piece_type == PieceType::Bishop
                && b.piece_type == PieceType::Bishop
                && a.color != b.color
                && sq_a.is_light() == sq_b.is_light()
        }
        _ => false,
    }
}
