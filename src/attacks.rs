//! Attack detection: is a square attacked by a side, is a king in check.

use once_cell::sync::Lazy;

use crate::board::Board;
use crate::types::*;

pub(crate) const KNIGHT_JUMPS: [(i8, i8); 8] = [
    (-2, -1),
    (-2, 1),
    (-1, -2),
    (-1, 2),
    (1, -2),
    (1, 2),
    (2, -1),
    (2, 1),
];

pub(crate) const KING_STEPS: [(i8, i8); 8] = [
    (-1, -1),
    (-1, 0),
    (-1, 1),
    (0, -1),
    (0, 1),
    (1, -1),
    (1, 0),
    (1, 1),
];

pub(crate) const DIAGONALS: [(i8, i8); 4] = [(-1, -1), (-1, 1), (1, -1), (1, 1)];
pub(crate) const ORTHOGONALS: [(i8, i8); 4] = [(-1, 0), (1, 0), (0, -1), (0, 1)];

fn jump_table(deltas: &[(i8, i8); 8]) -> Vec<Vec<Square>> {
    Square::all()
        .map(|sq| {
            deltas
                .iter()
                .filter_map(|(d_row, d_file)| sq.offset(*d_row, *d_file))
                .collect()
        })
        .collect()
}

/// On-board knight destinations for every square
pub static KNIGHT_TARGETS: Lazy<Vec<Vec<Square>>> = Lazy::new(|| jump_table(&KNIGHT_JUMPS));
/// On-board king destinations for every square
pub static KING_TARGETS: Lazy<Vec<Vec<Square>>> = Lazy::new(|| jump_table(&KING_STEPS));

impl Board {
    /// First piece met walking from `square` (exclusive) in direction `dir`
    pub(crate) fn first_piece_along(&self, square: Square, dir: (i8, i8)) -> Option<Piece> {
        let mut current = square;
        while let Some(next) = current.offset(dir.0, dir.1) {
            if let Some(piece) = self.piece_at(next) {
                return Some(piece);
            }
            current = next;
        }
        None
    }

    /// Whether any piece of `by` attacks `square`. The square itself may be
    /// empty or occupied by either side.
    pub fn is_attacked(&self, square: Square, by: Color) -> bool {
        // a pawn of `by` attacks us if it stands one row behind us in its own direction of travel
        let pawn = Some(Piece::new(by, PieceType::Pawn));
        for d_file in [-1, 1] {
            if let Some(from) = square.offset(-by.pawn_direction(), d_file) {
                if self.piece_at(from) == pawn {
                    return true;
                }
            }
        }

        let knight = Some(Piece::new(by, PieceType::Knight));
        if KNIGHT_TARGETS[square.index()]
            .iter()
            .any(|sq| self.piece_at(*sq) == knight)
        {
            return true;
        }

        let king = Some(Piece::new(by, PieceType::King));
        if KING_TARGETS[square.index()]
            .iter()
            .any(|sq| self.piece_at(*sq) == king)
        {
            return true;
        }

        let diagonal_hit = DIAGONALS.iter().any(|dir| {
            matches!(
                self.first_piece_along(square, *dir),
                Some(Piece { color, piece_type: PieceType::Bishop | PieceType::Queen }) if color == by
            )
        });
        if diagonal_hit {
            return true;
        }

        ORTHOGONALS.iter().any(|dir| {
            matches!(
                self.first_piece_along(square, *dir),
                Some(Piece { color, piece_type: PieceType::Rook | PieceType::Queen }) if color == by
            )
        })
    }

    /// Is the king of `color` attacked? A side without a king is never in check.
    pub fn is_in_check(&self, color: Color) -> bool {
        match self.king_square(color) {
            Some(sq) => self.is_attacked(sq, color.other_color()),
            None => false,
        }
    }
}
