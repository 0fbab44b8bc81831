//! Standard Algebraic Notation for moves.

use itertools::Itertools;

use crate::board::Board;
use crate::types::*;

/// Format `mv` in SAN, without check or mate suffix.
///
/// `piece` is the piece that moves, `captured` whatever it removes, and `rivals`
/// the origin squares of other pieces of the same kind that could legally reach
/// the same destination. Disambiguation tries the origin file, then the origin
/// rank, then the full square.
pub fn move_to_san(mv: &Move, piece: Piece, captured: Option<Piece>, rivals: &[Square]) -> String {
    match mv.kind {
        MoveKind::CastleKingSide => return "O-O".to_string(),
        MoveKind::CastleQueenSide => return "O-O-O".to_string(),
        _ => {}
    }

    let is_capture = captured.is_some() || mv.is_capture();
    let mut san = String::new();

    if piece.piece_type == PieceType::Pawn {
        if is_capture {
            san.push(mv.from.file_char());
        }
    } else {
        san.push(piece.piece_type.to_char());
        san.push_str(&disambiguation(mv.from, rivals));
    }

    if is_capture {
        san.push('x');
    }
    san.push_str(&mv.to.to_algebraic());

    if let Some(promo) = mv.promote_to {
        san.push('=');
        san.push(promo.to_char());
    }
    san
}

fn disambiguation(from: Square, rivals: &[Square]) -> String {
    if rivals.is_empty() {
        String::new()
    } else if rivals.iter().all(|r| r.file() != from.file()) {
        from.file_char().to_string()
    } else if rivals.iter().all(|r| r.row() != from.row()) {
        from.rank_char().to_string()
    } else {
        from.to_algebraic()
    }
}

/// Origins of the other pieces identical to the mover that also have a legal
/// move to `mv.to`. Pawns and kings never need disambiguation.
pub fn rival_origins(board: &Board, legal: &[Move], mv: &Move) -> Vec<Square> {
    let Some(piece) = board.piece_at(mv.from) else {
        return vec![];
    };
    if matches!(piece.piece_type, PieceType::Pawn | PieceType::King) {
        return vec![];
    }
    legal
        .iter()
        .filter(|m| m.to == mv.to && m.from != mv.from && board.piece_at(m.from) == Some(piece))
        .map(|m| m.from)
        .unique()
        .collect()
}

/// Append `#` if the side to move in `after` is mated, `+` if merely in check.
pub fn with_check_suffix(san: String, after: &Board) -> String {
    let to_move = after.get_active_color();
    let is_check = after.is_in_check(to_move);
    let is_mate = is_check && after.get_legal_moves(to_move).is_empty();
    push_check_suffix(san, is_check, is_mate)
}

pub fn push_check_suffix(mut san: String, is_check: bool, is_mate: bool) -> String {
    if is_mate {
        san.push('#');
    } else if is_check {
        san.push('+');
    }
    san
}

impl Board {
    /// Full SAN of a legal move in this position, check suffix included
    pub fn move_to_san(&self, mv: &Move) -> String {
        let Some(piece) = self.piece_at(mv.from) else {
            return mv.to_uci();
        };
        let captured = mv.capture_square().and_then(|sq| self.piece_at(sq));
        let legal = self.get_legal_moves(piece.color);
        let rivals = rival_origins(self, &legal, mv);
        with_check_suffix(move_to_san(mv, piece, captured, &rivals), &self.execute_move(mv))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn sq(s: &str) -> Square {
        Square::from_algebraic(s).unwrap()
    }

    fn find(board: &Board, uci: &str) -> Move {
        let request = MoveRequest::from_uci(uci).unwrap();
        board
            .get_legal_moves(board.get_active_color())
            .into_iter()
            .find(|m| m.matches(&request))
            .unwrap()
    }

    #[test]
    fn test_pawn_and_piece_moves() {
        let b = Board::new();
        assert_eq!(b.move_to_san(&find(&b, "e2e4")), "e4");
        assert_eq!(b.move_to_san(&find(&b, "g1f3")), "Nf3");
    }

    #[test]
    fn test_captures() {
        let b = Board::from_fen("rnbqkbnr/ppp1pppp/8/3p4/4P3/8/PPPP1PPP/RNBQKBNR w KQkq d6 0 2")
            .unwrap();
        assert_eq!(b.move_to_san(&find(&b, "e4d5")), "exd5");

        let b = Board::from_fen("rnbqkbnr/ppp1p1pp/8/3pPp2/8/8/PPPP1PPP/RNBQKBNR w KQkq f6 0 3")
            .unwrap();
        assert_eq!(b.move_to_san(&find(&b, "e5f6")), "exf6");
    }

    #[test]
    fn test_castling() {
        let b = Board::from_fen("r3k2r/8/8/8/8/8/8/R3K2R w KQkq - 0 1").unwrap();
        assert_eq!(b.move_to_san(&find(&b, "e1g1")), "O-O");
        assert_eq!(b.move_to_san(&find(&b, "e1c1")), "O-O-O");
    }

    #[test]
    fn test_promotion() {
        let b = Board::from_fen("1n2k3/P7/8/8/8/8/8/4K3 w - - 0 1").unwrap();
        assert_eq!(b.move_to_san(&find(&b, "a7a8q")), "a8=Q");
        assert_eq!(b.move_to_san(&find(&b, "a7b8n")), "axb8=N");
    }

    #[test]
    fn test_disambiguation() {
        // knights on b1 and f1 both reach d2: file tells them apart
        let b = Board::from_fen("4k3/8/8/8/8/8/8/1N2KN2 w - - 0 1").unwrap();
        assert_eq!(b.move_to_san(&find(&b, "b1d2")), "Nbd2");

        // rooks on a1 and a5 share a file: rank tells them apart
        let b = Board::from_fen("4k3/8/8/R7/8/8/8/R3K3 w - - 0 1").unwrap();
        assert_eq!(b.move_to_san(&find(&b, "a1a3")), "R1a3");

        // three queens around e4 need the full square
        let queen = Piece::new(Color::White, PieceType::Queen);
        let mv = Move::new(sq("d3"), sq("e4"), MoveKind::Normal);
        assert_eq!(move_to_san(&mv, queen, None, &[sq("d5"), sq("f3")]), "Qd3e4");
    }

    #[test]
    fn test_check_and_mate_suffix() {
        let b = Board::from_fen("6k1/5ppp/8/8/8/8/8/R5K1 w - - 0 1").unwrap();
        assert_eq!(b.move_to_san(&find(&b, "a1a8")), "Ra8#");

        let b = Board::from_fen("6k1/8/8/8/8/8/8/R5K1 w - - 0 1").unwrap();
        assert_eq!(b.move_to_san(&find(&b, "a1a8")), "Ra8+");
    }

    #[test]
    fn test_push_check_suffix() {
        assert_eq!(push_check_suffix("Nf3".to_string(), false, false), "Nf3");
        assert_eq!(push_check_suffix("Bb5".to_string(), true, false), "Bb5+");
        assert_eq!(push_check_suffix("Qxf7".to_string(), true, true), "Qxf7#");
    }
}
