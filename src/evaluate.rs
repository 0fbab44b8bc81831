use crate::board::Board;
use crate::rules::is_draw_by_rule;
use crate::types::{Color, Move, MoveKind, Piece, PieceType, Square};

/// Score of a mated position, from the winner's point of view
pub const MATE_SCORE: i32 = 1_000_000;

/// Non-king material (both sides, centipawns) below which kings use the endgame table
pub const ENDGAME_MATERIAL_THRESHOLD: i32 = 2600;

/// Mobility counts one point per this many pseudo-legal moves of difference
pub const MOBILITY_DIVISOR: i32 = 10;

/// Flat ordering bonus for en passant captures
pub const EN_PASSANT_ORDER_BONUS: i32 = 900;

/// Static evaluation in centipawns, positive when white is better.
///
/// A side to move with no legal moves is either mated (scored as a full mate
/// against it) or stalemated (0). Positions drawn by the fifty-move rule or by
/// insufficient material are 0 as well.
pub fn evaluate_board(board: &Board) -> i32 {
    let to_move = board.get_active_color();
    if board.get_legal_moves(to_move).is_empty() {
        return if board.is_in_check(to_move) {
            -to_move.sign() * MATE_SCORE
        } else {
            0
        };
    }
    if is_draw_by_rule(board).is_some() {
        return 0;
    }
    static_score(board) + mobility_score(board)
}

/// Material plus piece-square bonuses
pub fn static_score(board: &Board) -> i32 {
    let endgame = is_endgame(board);
    board
        .pieces()
        .map(|(square, piece)| {
            let value = piece.piece_type.value() + get_pst_value(&piece, square, endgame);
            piece.color.sign() * value
        })
        .sum()
}

/// A tenth of a centipawn per pseudo-move of difference, rounded to the
/// nearest centipawn with halves away from zero
pub fn mobility_score(board: &Board) -> i32 {
    let white = board.count_pseudo_moves(Color::White) as i32;
    let black = board.count_pseudo_moves(Color::Black) as i32;
    let diff = white - black;
    (diff + diff.signum() * MOBILITY_DIVISOR / 2) / MOBILITY_DIVISOR
}

/// Centipawn value of every piece except the kings
pub fn total_material(board: &Board) -> i32 {
    board
        .pieces()
        .filter(|(_, p)| p.piece_type != PieceType::King)
        .map(|(_, p)| p.piece_type.value())
        .sum()
}

pub fn is_endgame(board: &Board) -> bool {
    total_material(board) < ENDGAME_MATERIAL_THRESHOLD
}

/// Classic point balance (pawn 1, minor 3, rook 5, queen 9), positive when white is ahead
pub fn material_balance(board: &Board) -> i32 {
    board
        .pieces()
        .map(|(_, p)| p.color.sign() * p.piece_type.to_material())
        .sum()
}

/// Ordering heuristic: most valuable victim, least valuable attacker. A king
/// attacker costs nothing; promotions add the promoted piece; en passant gets a
/// flat bonus.
pub fn guess_move_value(board: &Board, mv: &Move) -> i32 {
    if mv.kind == MoveKind::EnPassant {
        return EN_PASSANT_ORDER_BONUS;
    }

    let mut score = 0;
    let material_difference_multiplier = 10;

    if let Some(victim) = mv.capture_square().and_then(|sq| board.piece_at(sq)) {
        let attacker = match board.piece_at(mv.from) {
            Some(Piece {
                piece_type: PieceType::King,
                ..
            })
            | None => 0,
            Some(p) => p.piece_type.value(),
        };
        score += material_difference_multiplier * victim.piece_type.value() - attacker;
    }

    if let Some(promo_type) = mv.promote_to {
        score += promo_type.value();
    }
    score
}

/// Piece-square bonus. Tables are laid out from white's side with rank 8
/// first, which matches square indices; black reads them mirrored.
pub fn get_pst_value(piece: &Piece, square: Square, is_endgame: bool) -> i32 {
    let raw_table = get_raw_pst_table(piece.piece_type, is_endgame);
    let row = match piece.color {
        Color::White => square.row(),
        Color::Black => 7 - square.row(),
    };
    raw_table[(row * 8 + square.file()) as usize]
}

fn get_raw_pst_table(piece_type: PieceType, is_endgame: bool) -> &'static [i32; 64] {
    match piece_type {
        PieceType::Pawn => &PAWNS,
        PieceType::Rook => &ROOKS,
        PieceType::Knight => &KNIGHTS,
        PieceType::Bishop => &BISHOPS,
        PieceType::Queen => &QUEENS,
        PieceType::King => {
            if is_endgame {
                &KING_END
            } else {
                &KING_START
            }
        }
    }
}

#[rustfmt::skip]
const PAWNS: [i32; 64] = [
     0,  0,   0,   0,   0,   0,  0,  0,
    50, 50,  50,  50,  50,  50, 50, 50,
    10, 10,  20,  30,  30,  20, 10, 10,
     5,  5,  10,  25,  25,  10,  5,  5,
     0,  0,   0,  20,  20,   0,  0,  0,
     5, -5, -10,   0,   0, -10, -5,  5,
     5, 10,  10, -20, -20,  10, 10,  5,
     0,  0,   0,   0,   0,   0,  0,  0,
];

#[rustfmt::skip]
const ROOKS: [i32; 64] = [
     0,  0,  0,  0,  0,  0,  0,  0,
     5, 10, 10, 10, 10, 10, 10,  5,
    -5,  0,  0,  0,  0,  0,  0, -5,
    -5,  0,  0,  0,  0,  0,  0, -5,
    -5,  0,  0,  0,  0,  0,  0, -5,
    -5,  0,  0,  0,  0,  0,  0, -5,
    -5,  0,  0,  0,  0,  0,  0, -5,
     0,  0,  0,  5,  5,  0,  0,  0,
];

#[rustfmt::skip]
const KNIGHTS: [i32; 64] = [
    -50, -40, -30, -30, -30, -30, -40, -50,
    -40, -20,   0,   0,   0,   0, -20, -40,
    -30,   0,  10,  15,  15,  10,   0, -30,
    -30,   5,  15,  20,  20,  15,   5, -30,
    -30,   0,  15,  20,  20,  15,   0, -30,
    -30,   5,  10,  15,  15,  10,   5, -30,
    -40, -20,   0,   5,   5,   0, -20, -40,
    -50, -40, -30, -30, -30, -30, -40, -50,
];

#[rustfmt::skip]
const BISHOPS: [i32; 64] = [
    -20, -10, -10, -10, -10, -10, -10, -20,
    -10,   0,   0,   0,   0,   0,   0, -10,
    -10,   0,   5,  10,  10,   5,   0, -10,
    -10,   5,   5,  10,  10,   5,   5, -10,
    -10,   0,  10,  10,  10,  10,   0, -10,
    -10,  10,  10,  10,  10,  10,  10, -10,
    -10,   5,   0,   0,   0,   0,   5, -10,
    -20, -10, -10, -10, -10, -10, -10, -20,
];

#[rustfmt::skip]
const QUEENS: [i32; 64] = [
    -20, -10, -10, -5, -5, -10, -10, -20,
    -10,   0,   0,  0,  0,   0,   0, -10,
    -10,   0,   5,  5,  5,   5,   0, -10,
     -5,   0,   5,  5,  5,   5,   0,  -5,
      0,   0,   5,  5,  5,   5,   0,  -5,
    -10,   5,   5,  5,  5,   5,   0, -10,
    -10,   0,   5,  0,  0,   0,   0, -10,
    -20, -10, -10, -5, -5, -10, -10, -20,
];

#[rustfmt::skip]
const KING_START: [i32; 64] = [
    -80, -70, -70, -70, -70, -70, -70, -80,
    -60, -60, -60, -60, -60, -60, -60, -60,
    -40, -50, -50, -60, -60, -50, -50, -40,
    -30, -40, -40, -50, -50, -40, -40, -30,
    -20, -30, -30, -40, -40, -30, -30, -20,
    -10, -20, -20, -20, -20, -20, -20, -10,
     20,  20,  -5,  -5,  -5,  -5,  20,  20,
     20,  30,  10,   0,   0,  10,  30,  20,
];

#[rustfmt::skip]
const KING_END: [i32; 64] = [
    -20, -10, -10, -10, -10, -10, -10, -20,
     -5,   0,   5,   5,   5,   5,   0,  -5,
    -10,  -5,  20,  30,  30,  20,  -5, -10,
    -15, -10,  35,  45,  45,  35, -10, -15,
    -20, -15,  30,  40,  40,  30, -15, -20,
    -25, -20,  20,  25,  25,  20, -20, -25,
    -30, -25,   0,   0,   0,   0, -25, -30,
    -50, -30, -30, -30, -30, -30, -30, -50,
];

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::MoveRequest;

    fn find(board: &Board, uci: &str) -> Move {
        let request = MoveRequest::from_uci(uci).unwrap();
        board
            .get_legal_moves(board.get_active_color())
            .into_iter()
            .find(|m| m.matches(&request))
            .unwrap()
    }

    #[test]
    fn test_mobility_rounds_to_nearest() {
        // 14 white moves against 5
        let b = Board::from_fen("4k3/8/8/8/8/8/8/4K2R w - - 0 1").unwrap();
        assert_eq!(mobility_score(&b), 1);
        let b = Board::from_fen("4k2r/8/8/8/8/8/8/4K3 w - - 0 1").unwrap();
        assert_eq!(mobility_score(&b), -1);
        // 5 against 5 plus a knight in the corner
        let b = Board::from_fen("4k3/8/8/8/8/8/8/N3K3 w - - 0 1").unwrap();
        assert_eq!(mobility_score(&b), 0);
    }

    #[test]
    fn test_starting_position_is_balanced() {
        let b = Board::new();
        assert_eq!(static_score(&b), 0);
        assert_eq!(mobility_score(&b), 0);
        assert_eq!(evaluate_board(&b), 0);
        assert_eq!(material_balance(&b), 0);
        assert!(!is_endgame(&b));
    }

    #[test]
    fn test_pst_is_mirrored_for_black() {
        // every square has the same bonus for a white piece as the mirrored square for black
        for square in Square::all() {
            let mirrored = Square::from_row_file(7 - square.row(), square.file());
            for piece_type in [
                PieceType::Pawn,
                PieceType::Rook,
                PieceType::Knight,
                PieceType::Bishop,
                PieceType::Queen,
                PieceType::King,
            ] {
                for endgame in [false, true] {
                    assert_eq!(
                        get_pst_value(&Piece::new(Color::White, piece_type), square, endgame),
                        get_pst_value(&Piece::new(Color::Black, piece_type), mirrored, endgame),
                    );
                }
            }
        }
        // a white pawn about to promote is worth more than one at home
        let pawn = Piece::new(Color::White, PieceType::Pawn);
        let a7 = Square::from_algebraic("a7").unwrap();
        let a2 = Square::from_algebraic("a2").unwrap();
        assert!(get_pst_value(&pawn, a7, false) > get_pst_value(&pawn, a2, false));
    }

    #[test]
    fn test_extra_material_favours_its_owner() {
        let white_up = Board::from_fen("4k3/8/8/8/8/8/8/3QK3 w - - 0 1").unwrap();
        assert!(evaluate_board(&white_up) > 800);
        let black_up = Board::from_fen("3qk3/8/8/8/8/8/8/4K3 w - - 0 1").unwrap();
        assert!(evaluate_board(&black_up) < -800);
        assert_eq!(material_balance(&black_up), -9);
    }

    #[test]
    fn test_mated_positions_score_full_mate() {
        // black to move and mated
        let b = Board::from_fen("R5k1/5ppp/8/8/8/8/8/6K1 b - - 1 1").unwrap();
        assert_eq!(evaluate_board(&b), MATE_SCORE);
        // white to move and mated
        let b = Board::from_fen("rnb1kbnr/pppp1ppp/8/4p3/6Pq/5P2/PPPPP2P/RNBQKBNR w KQkq - 1 3")
            .unwrap();
        assert_eq!(evaluate_board(&b), -MATE_SCORE);
    }

    #[test]
    fn test_draws_score_zero() {
        let stalemate = Board::from_fen("7k/5Q2/6K1/8/8/8/8/8 b - - 0 1").unwrap();
        assert_eq!(evaluate_board(&stalemate), 0);
        let bare_kings = Board::from_fen("4k3/8/8/8/8/8/8/4K3 w - - 0 1").unwrap();
        assert_eq!(evaluate_board(&bare_kings), 0);
        let fifty = Board::from_fen("4k3/8/8/8/8/8/8/3QK3 w - - 100 90").unwrap();
        assert_eq!(evaluate_board(&fifty), 0);
    }

    #[test]
    fn test_endgame_switches_king_table() {
        let b = Board::from_fen("4k3/8/8/8/8/8/8/R3K3 w - - 0 1").unwrap();
        assert!(is_endgame(&b));
        assert_eq!(total_material(&b), 500);
        assert!(!is_endgame(&Board::new()));
    }

    #[test]
    fn test_guess_move_value_prefers_big_victims() {
        // 8  . . . . k . . .
        // 7  . . . . . . . .
        // 6  . . . . . . . .
        // 5  . . . q . r . .
        // 4  . . . . P . . .
        // 3  . . . . . . . .
        // 2  . . . . . . . .
        // 1  . . . . K . . .
        //    a b c d e f g h
        let b = Board::from_fen("4k3/8/8/3q1r2/4P3/8/8/4K3 w - - 0 1").unwrap();
        let takes_queen = guess_move_value(&b, &find(&b, "e4d5"));
        let takes_rook = guess_move_value(&b, &find(&b, "e4f5"));
        let push = guess_move_value(&b, &find(&b, "e4e5"));
        assert_eq!(takes_queen, 10 * 900 - 100);
        assert_eq!(takes_rook, 10 * 500 - 100);
        assert_eq!(push, 0);

        let promo = Board::from_fen("4k3/P7/8/8/8/8/8/4K3 w - - 0 1").unwrap();
        assert_eq!(guess_move_value(&promo, &find(&promo, "a7a8q")), 900);

        let ep = Board::from_fen("4k3/8/8/3pP3/8/8/8/4K3 w - d6 0 2").unwrap();
        assert_eq!(
            guess_move_value(&ep, &find(&ep, "e5d6")),
            EN_PASSANT_ORDER_BONUS
        );
    }

    #[test]
    fn test_king_captures_cost_nothing() {
        let b = Board::from_fen("4k3/8/8/8/8/8/3p4/4K3 w - - 0 1").unwrap();
        assert_eq!(guess_move_value(&b, &find(&b, "e1d2")), 1000);
    }
}
