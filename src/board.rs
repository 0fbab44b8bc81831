use std::fmt;

use crate::types::*;

pub const STARTING_POSITION_FEN: &str = "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1";

const BACK_RANK: [PieceType; 8] = [
    PieceType::Rook,
    PieceType::Knight,
    PieceType::Bishop,
    PieceType::Queen,
    PieceType::King,
    PieceType::Bishop,
    PieceType::Knight,
    PieceType::Rook,
];

/// Square the king of `color` starts on
pub fn king_home_square(color: Color) -> Square {
    Square::from_row_file(color.home_row(), KING_HOME_FILE)
}

/// Square the rook of `color` castling on `wing` starts on
pub fn rook_home_square(color: Color, wing: Wing) -> Square {
    Square::from_row_file(color.home_row(), wing.rook_home_file())
}

/// A full game position: piece placement plus the metadata FEN records.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Board {
    pub(crate) squares: [Option<Piece>; 64],
    // who's move it is
    pub(crate) active_color: Color,
    pub(crate) castling: CastlingRights,
    pub(crate) en_passant_target: Option<Square>,
    // number of half moves since last capture or pawn advance
    pub(crate) halfmove_clock: u32,
    // number of full moves. Starts at 1, and gets incremented after every black move
    pub(crate) fullmove_number: u32,
}

/// Information needed to undo a move. Stored during make_move, used in unmake_move.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UndoInfo {
    /// The move that was made
    pub mv: Move,
    /// Piece that stood on the origin square
    pub moved: Option<Piece>,
    /// Piece removed by the move and the square it stood on
    pub captured: Option<Piece>,
    pub captured_square: Square,
    /// Previous castling rights
    pub castling: CastlingRights,
    /// Previous en passant target
    pub en_passant_target: Option<Square>,
    /// Previous clocks
    pub halfmove_clock: u32,
    pub fullmove_number: u32,
}

impl Board {
    /// The standard starting position
    pub fn new() -> Board {
        let mut board = Board::empty();
        for (file, piece_type) in BACK_RANK.iter().enumerate() {
            let file = file as u8;
            board.set_piece(
                Square::from_row_file(0, file),
                Some(Piece::new(Color::Black, *piece_type)),
            );
            board.set_piece(
                Square::from_row_file(1, file),
                Some(Piece::new(Color::Black, PieceType::Pawn)),
            );
            board.set_piece(
                Square::from_row_file(6, file),
                Some(Piece::new(Color::White, PieceType::Pawn)),
            );
            board.set_piece(
                Square::from_row_file(7, file),
                Some(Piece::new(Color::White, *piece_type)),
            );
        }
        board.castling = CastlingRights::all();
        board
    }

    /// A board with no pieces, white to move and no castling rights
    pub fn empty() -> Board {
        Board {
            squares: [None; 64],
            active_color: Color::White,
            castling: CastlingRights::none(),
            en_passant_target: None,
            halfmove_clock: 0,
            fullmove_number: 1,
        }
    }

    #[inline]
    pub fn piece_at(&self, square: Square) -> Option<Piece> {
        self.squares[square.index()]
    }

    pub fn set_piece(&mut self, square: Square, piece: Option<Piece>) {
        self.squares[square.index()] = piece;
    }

    /// Get the color of the side to move
    pub fn get_active_color(&self) -> Color {
        self.active_color
    }

    pub fn castling_rights(&self) -> CastlingRights {
        self.castling
    }

    pub fn en_passant_target(&self) -> Option<Square> {
        self.en_passant_target
    }

    pub fn halfmove_clock(&self) -> u32 {
        self.halfmove_clock
    }

    pub fn fullmove_number(&self) -> u32 {
        self.fullmove_number
    }

    /// All occupied squares with their pieces, in square order
    pub fn pieces(&self) -> impl Iterator<Item = (Square, Piece)> + '_ {
        Square::all().filter_map(move |sq| self.piece_at(sq).map(|p| (sq, p)))
    }

    pub fn pieces_of(&self, color: Color) -> impl Iterator<Item = (Square, Piece)> + '_ {
        self.pieces().filter(move |(_, p)| p.color == color)
    }

    pub fn piece_count(&self) -> usize {
        self.squares.iter().filter(|p| p.is_some()).count()
    }

    pub fn king_square(&self, color: Color) -> Option<Square> {
        let king = Some(Piece::new(color, PieceType::King));
        Square::all().find(|sq| self.piece_at(*sq) == king)
    }

    /// Apply `m` in place and return what is needed to take it back.
    ///
    /// The move is trusted to come from the move generator. Rules, in order:
    /// place the moving (or promoted) piece, remove the captured piece (which for
    /// en passant is not on the destination), relocate the castling rook, then
    /// update en passant target, castling rights, clocks and the side to move.
    pub fn make_move(&mut self, m: &Move) -> UndoInfo {
        let moved = self.squares[m.from.index()].take();
        let color = moved.map(|p| p.color).unwrap_or(self.active_color);
        let captured_square = m.captured_square.unwrap_or(m.to);
        let captured = self.squares[captured_square.index()].take();

        let undo = UndoInfo {
            mv: *m,
            moved,
            captured,
            captured_square,
            castling: self.castling,
            en_passant_target: self.en_passant_target,
            halfmove_clock: self.halfmove_clock,
            fullmove_number: self.fullmove_number,
        };

        self.squares[m.to.index()] = match m.promote_to {
            Some(piece_type) => Some(Piece::new(color, piece_type)),
            None => moved,
        };

        if let (Some(rook_from), Some(rook_to)) = (m.rook_from, m.rook_to) {
            let rook = self.squares[rook_from.index()].take();
            self.squares[rook_to.index()] = rook;
        }

        self.en_passant_target = if m.kind == MoveKind::DoublePush {
            m.from.offset(color.pawn_direction(), 0)
        } else {
            None
        };

        let moved_type = moved.map(|p| p.piece_type);
        if moved_type == Some(PieceType::King) {
            self.castling.clear_color(color);
        }
        // rights follow the rook's home square, not the rook itself
        for wing in [Wing::KingSide, Wing::QueenSide] {
            if m.from == rook_home_square(color, wing) {
                self.castling.clear(color, wing);
            }
        }

        if moved_type == Some(PieceType::Pawn) || captured.is_some() {
            self.halfmove_clock = 0;
        } else {
            self.halfmove_clock = self.halfmove_clock.saturating_add(1);
        }
        if self.active_color == Color::Black {
            self.fullmove_number = self.fullmove_number.saturating_add(1);
        }
        self.active_color = self.active_color.other_color();

        undo
    }

    /// Exact inverse of [`Board::make_move`]
    pub fn unmake_move(&mut self, undo: &UndoInfo) {
        let m = undo.mv;
        if let (Some(rook_from), Some(rook_to)) = (m.rook_from, m.rook_to) {
            let rook = self.squares[rook_to.index()].take();
            self.squares[rook_from.index()] = rook;
        }
        self.squares[m.to.index()] = None;
        self.squares[undo.captured_square.index()] = undo.captured;
        self.squares[m.from.index()] = undo.moved;

        self.castling = undo.castling;
        self.en_passant_target = undo.en_passant_target;
        self.halfmove_clock = undo.halfmove_clock;
        self.fullmove_number = undo.fullmove_number;
        self.active_color = self.active_color.other_color();
    }

    /// The position after `m`, leaving `self` untouched
    pub fn execute_move(&self, m: &Move) -> Board {
        let mut board = self.clone();
        board.make_move(m);
        board
    }

    pub fn draw_board(&self) -> String {
        let mut string = String::new();

        for row in 0..8 {
            string.push_str(&format!("{} ", 8 - row));
            for file in 0..8 {
                let p = self.piece_at(Square::from_row_file(row, file));
                string.push(' ');
                string.push_str(match p {
                    Some(ref pp) => pp.to_symbol(),
                    None => ".",
                });
            }
            string.push('\n');
        }
        string.push_str("   a b c d e f g h\n");
        string
    }

    pub fn draw_to_terminal(&self) {
        println!("{}", self.draw_board());
    }
}

impl Default for Board {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.draw_board())
    }
}
