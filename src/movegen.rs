use crate::attacks::{DIAGONALS, KING_TARGETS, KNIGHT_TARGETS, ORTHOGONALS};
use crate::board::{king_home_square, rook_home_square, Board};
use crate::types::*;

const MAX_MOVES: usize = 218;

/// Collects the pseudo-legal moves of one side: every geometrically valid move,
/// without asking whether it leaves the mover's own king attacked.
pub struct MoveGenerator<'a> {
    board: &'a Board,
    color: Color,
    moves: Vec<Move>,
}

impl<'a> MoveGenerator<'a> {
    pub fn new(board: &'a Board, color: Color) -> Self {
        Self {
            board,
            color,
            moves: Vec::with_capacity(MAX_MOVES),
        }
    }

    pub fn collect(&mut self) -> Vec<Move> {
        let board = self.board;
        for (square, piece) in board.pieces_of(self.color) {
            match piece.piece_type {
                PieceType::Pawn => self.generate_pawn_moves(square),
                PieceType::Knight => self.generate_jump_moves(square, &KNIGHT_TARGETS[square.index()]),
                PieceType::Bishop => self.generate_sliding_moves(square, &DIAGONALS),
                PieceType::Rook => self.generate_sliding_moves(square, &ORTHOGONALS),
                PieceType::Queen => {
                    self.generate_sliding_moves(square, &DIAGONALS);
                    self.generate_sliding_moves(square, &ORTHOGONALS);
                }
                PieceType::King => {
                    self.generate_jump_moves(square, &KING_TARGETS[square.index()]);
                    self.generate_castling_moves(square);
                }
            }
        }
        std::mem::take(&mut self.moves)
    }

    fn is_enemy(&self, square: Square) -> bool {
        matches!(self.board.piece_at(square), Some(p) if p.color != self.color)
    }

    /// Quiet move onto an empty square, capture onto an enemy, nothing onto a friend.
    fn push_step(&mut self, from: Square, to: Square) {
        match self.board.piece_at(to) {
            None => self.moves.push(Move::new(from, to, MoveKind::Normal)),
            Some(p) if p.color != self.color => self.moves.push(Move::new(from, to, MoveKind::Capture)),
            Some(_) => {}
        }
    }

    fn generate_jump_moves(&mut self, from: Square, targets: &[Square]) {
        for to in targets {
            self.push_step(from, *to);
        }
    }

    fn generate_sliding_moves(&mut self, from: Square, directions: &[(i8, i8); 4]) {
        for (d_row, d_file) in directions {
            let mut current = from;
            while let Some(to) = current.offset(*d_row, *d_file) {
                self.push_step(from, to);
                if self.board.piece_at(to).is_some() {
                    break;
                }
                current = to;
            }
        }
    }

    fn push_pawn_move(&mut self, from: Square, to: Square, is_capture: bool) {
        if to.row() == self.color.promotion_row() {
            for piece_type in PIECES_CAN_PROMOTE_TO {
                self.moves.push(Move::promotion(from, to, piece_type, is_capture));
            }
        } else if is_capture {
            self.moves.push(Move::new(from, to, MoveKind::Capture));
        } else {
            self.moves.push(Move::new(from, to, MoveKind::Normal));
        }
    }

    fn generate_pawn_moves(&mut self, from: Square) {
        let dir = self.color.pawn_direction();

        if let Some(one) = from.offset(dir, 0) {
            if self.board.piece_at(one).is_none() {
                self.push_pawn_move(from, one, false);

                if from.row() == self.color.pawn_start_row() {
                    if let Some(two) = one.offset(dir, 0) {
                        if self.board.piece_at(two).is_none() {
                            self.moves.push(Move::new(from, two, MoveKind::DoublePush));
                        }
                    }
                }
            }
        }

        for d_file in [-1, 1] {
            let Some(to) = from.offset(dir, d_file) else {
                continue;
            };
            if self.is_enemy(to) {
                self.push_pawn_move(from, to, true);
            } else if self.board.en_passant_target() == Some(to) {
                // the passed pawn sits one row behind the target, from the capturer's view
                if let Some(captured) = to.offset(-dir, 0) {
                    let passed_pawn = Some(Piece::new(self.color.other_color(), PieceType::Pawn));
                    if self.board.piece_at(to).is_none() && self.board.piece_at(captured) == passed_pawn {
                        self.moves.push(Move::en_passant(from, to, captured));
                    }
                }
            }
        }
    }

    /// Structural castling candidates only. Whether the king passes through
    /// check is decided by the legality filter.
    fn generate_castling_moves(&mut self, from: Square) {
        if from != king_home_square(self.color) {
            return;
        }
        let rights = self.board.castling_rights();
        let own_rook = Some(Piece::new(self.color, PieceType::Rook));
        let row = self.color.home_row();

        for wing in [Wing::KingSide, Wing::QueenSide] {
            if !rights.has(self.color, wing) {
                continue;
            }
            let rook_from = rook_home_square(self.color, wing);
            if self.board.piece_at(rook_from) != own_rook {
                continue;
            }
            let (low, high) = if rook_from.file() < KING_HOME_FILE {
                (rook_from.file() + 1, KING_HOME_FILE)
            } else {
                (KING_HOME_FILE + 1, rook_from.file())
            };
            let path_clear = (low..high).all(|file| {
                self.board
                    .piece_at(Square::from_row_file(row, file))
                    .is_none()
            });
            if path_clear {
                self.moves.push(Move::castle(
                    from,
                    Square::from_row_file(row, wing.king_target_file()),
                    wing,
                    rook_from,
                    Square::from_row_file(row, wing.rook_target_file()),
                ));
            }
        }
    }
}

impl Board {
    /// Pseudo-legal moves of `color`
    pub fn get_pseudo_moves(&self, color: Color) -> Vec<Move> {
        MoveGenerator::new(self, color).collect()
    }

    /// Number of pseudo-legal moves of `color`, used as a mobility measure
    pub fn count_pseudo_moves(&self, color: Color) -> usize {
        self.get_pseudo_moves(color).len()
    }

    /// Legal moves of `color`. Works on one private copy of the board.
    pub fn get_legal_moves(&self, color: Color) -> Vec<Move> {
        let mut scratch = self.clone();
        scratch.legal_moves_in_place(color)
    }

    /// Legal moves of `color`, testing each candidate with make/unmake on `self`.
    /// The board is left exactly as it was found.
    pub fn legal_moves_in_place(&mut self, color: Color) -> Vec<Move> {
        let mut moves = self.get_pseudo_moves(color);
        let enemy = color.other_color();
        let in_check = self.is_in_check(color);

        moves.retain(|m| {
            if m.is_castle() {
                if in_check {
                    return false;
                }
                // origin, passed square and destination must all be safe
                let row = m.from.row();
                let (low, high) = if m.to.file() < m.from.file() {
                    (m.to.file(), m.from.file())
                } else {
                    (m.from.file(), m.to.file())
                };
                if (low..=high).any(|file| self.is_attacked(Square::from_row_file(row, file), enemy)) {
                    return false;
                }
            }
            let undo = self.make_move(m);
            let leaves_king_safe = !self.is_in_check(color);
            self.unmake_move(&undo);
            leaves_king_safe
        });
        moves
    }

    /// Legal moves of the piece standing on `square`, empty if the square is empty
    pub fn get_legal_moves_from(&self, square: Square) -> Vec<Move> {
        match self.piece_at(square) {
            Some(piece) => self
                .get_legal_moves(piece.color)
                .into_iter()
                .filter(|m| m.from == square)
                .collect(),
            None => vec![],
        }
    }
}
