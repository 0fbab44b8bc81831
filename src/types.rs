use std::fmt;
use std::str::FromStr;

use crate::error::MoveParseError;

#[derive(Debug, PartialEq, Eq, Clone, Copy, Hash)]
pub enum Color {
    White,
    Black,
}

impl Color {
    /// Parse the side-to-move token of a FEN string.
    pub fn from_char(c: char) -> Option<Color> {
        match c {
            'w' => Some(Color::White),
            'b' => Some(Color::Black),
            _ => None,
        }
    }

    pub fn from_case(c: char) -> Color {
        if c.is_uppercase() {
            Color::White
        } else {
            Color::Black
        }
    }

    pub fn other_color(&self) -> Color {
        if *self == Color::White {
            Color::Black
        } else {
            Color::White
        }
    }

    pub fn to_char(&self) -> char {
        match self {
            Self::White => 'w',
            Self::Black => 'b',
        }
    }

    pub fn to_human(&self) -> &str {
        match self {
            Self::White => "white",
            Self::Black => "black",
        }
    }

    /// Row delta of a pawn step. Row 0 is rank 8, so white pawns move towards row 0.
    pub fn pawn_direction(&self) -> i8 {
        match self {
            Self::White => -1,
            Self::Black => 1,
        }
    }

    /// Row pawns of this color start on (and may double push from)
    pub fn pawn_start_row(&self) -> u8 {
        match self {
            Self::White => 6,
            Self::Black => 1,
        }
    }

    /// Row on which pawns of this color promote
    pub fn promotion_row(&self) -> u8 {
        match self {
            Self::White => 0,
            Self::Black => 7,
        }
    }

    /// Row holding the king and rooks at the start of the game
    pub fn home_row(&self) -> u8 {
        match self {
            Self::White => 7,
            Self::Black => 0,
        }
    }

    /// +1 for white, -1 for black. Scores are always from white's point of view.
    pub fn sign(&self) -> i32 {
        match self {
            Self::White => 1,
            Self::Black => -1,
        }
    }
}

#[derive(Debug, PartialEq, Eq, Clone, Copy, Hash)]
pub enum PieceType {
    Pawn,
    Rook,
    Knight,
    Bishop,
    Queen,
    King,
}

impl PieceType {
    pub fn from_char(c: char) -> Option<PieceType> {
        match c.to_ascii_lowercase() {
            'p' => Some(PieceType::Pawn),
            'r' => Some(PieceType::Rook),
            'n' => Some(PieceType::Knight),
            'b' => Some(PieceType::Bishop),
            'q' => Some(PieceType::Queen),
            'k' => Some(PieceType::King),
            _ => None,
        }
    }

    /// Is the piece a sliding piece (one which can move multiple square in a given direction)
    pub fn is_sliding(&self) -> bool {
        matches!(
            *self,
            PieceType::Rook | PieceType::Bishop | PieceType::Queen
        )
    }

    pub fn to_human(&self) -> &str {
        match self {
            Self::Pawn => "pawn",
            Self::Rook => "rook",
            Self::Knight => "knight",
            Self::Bishop => "bishop",
            Self::Queen => "queen",
            Self::King => "king",
        }
    }

    pub fn to_char(&self) -> char {
        match self {
            Self::Pawn => 'P',
            Self::Rook => 'R',
            Self::Knight => 'N',
            Self::Bishop => 'B',
            Self::Queen => 'Q',
            Self::King => 'K',
        }
    }

    /// Value in centipawns used by the evaluator and move ordering
    pub fn value(&self) -> i32 {
        match self {
            Self::Pawn => 100,
            Self::Knight => 320,
            Self::Bishop => 330,
            Self::Rook => 500,
            Self::Queen => 900,
            Self::King => 20_000,
        }
    }

    /// Classic point count, used for the material balance shown to players
    pub fn to_material(&self) -> i32 {
        match self {
            Self::Pawn => 1,
            Self::Rook => 5,
            Self::Knight => 3,
            Self::Bishop => 3,
            Self::Queen => 9,
            Self::King => 0,
        }
    }
}

pub const PIECES_CAN_PROMOTE_TO: [PieceType; 4] = [
    PieceType::Queen,
    PieceType::Rook,
    PieceType::Bishop,
    PieceType::Knight,
];

#[derive(Debug, PartialEq, Eq, Clone, Copy, Hash)]
pub struct Piece {
    pub color: Color,
    pub piece_type: PieceType,
}

impl Piece {
    pub const fn new(color: Color, piece_type: PieceType) -> Self {
        Self { color, piece_type }
    }

    /// Piece from a FEN placement letter, uppercase for white.
    pub fn from_fen_char(c: char) -> Option<Piece> {
        if !c.is_ascii_alphabetic() {
            return None;
        }
        PieceType::from_char(c).map(|piece_type| Piece {
            color: Color::from_case(c),
            piece_type,
        })
    }

    pub fn to_fen_char(&self) -> char {
        let c = self.piece_type.to_char();
        if self.color == Color::White {
            c
        } else {
            c.to_ascii_lowercase()
        }
    }

    pub fn to_symbol(&self) -> &str {
        let is_white = self.color == Color::White;
        match (self.piece_type, is_white) {
            (PieceType::Pawn, true) => "♙",
            (PieceType::Pawn, false) => "♟︎",
            (PieceType::Rook, true) => "♖",
            (PieceType::Rook, false) => "♜",
            (PieceType::Knight, true) => "♘",
            (PieceType::Knight, false) => "♞",
            (PieceType::Bishop, true) => "♗",
            (PieceType::Bishop, false) => "♝",
            (PieceType::Queen, true) => "♕",
            (PieceType::Queen, false) => "♛",
            (PieceType::King, true) => "♔",
            (PieceType::King, false) => "♚",
        }
    }
}

/// A board square, 0..63 in row-major order from the top left of the printed
/// board: a8 = 0, h8 = 7, a1 = 56, h1 = 63.
#[derive(Debug, PartialEq, Eq, Clone, Copy, Hash, PartialOrd, Ord)]
pub struct Square(u8);

impl Square {
    pub const fn from_row_file(row: u8, file: u8) -> Square {
        Square(row * 8 + file)
    }

    pub fn from_index(index: usize) -> Option<Square> {
        if index < 64 {
            Some(Square(index as u8))
        } else {
            None
        }
    }

    #[inline]
    pub const fn index(&self) -> usize {
        self.0 as usize
    }

    /// Row as printed, 0 is rank 8
    #[inline]
    pub const fn row(&self) -> u8 {
        self.0 / 8
    }

    /// File, 0 is the a-file
    #[inline]
    pub const fn file(&self) -> u8 {
        self.0 % 8
    }

    /// Rank as written in algebraic notation (1..=8)
    pub const fn rank(&self) -> u8 {
        8 - self.row()
    }

    /// The square `d_row` rows and `d_file` files away, if it is on the board.
    #[inline]
    pub fn offset(&self, d_row: i8, d_file: i8) -> Option<Square> {
        let row = self.row() as i8 + d_row;
        let file = self.file() as i8 + d_file;
        if (0..8).contains(&row) && (0..8).contains(&file) {
            Some(Square::from_row_file(row as u8, file as u8))
        } else {
            None
        }
    }

    pub fn from_algebraic(s: &str) -> Option<Square> {
        let mut chars = s.chars();
        let file_char = chars.next()?;
        let rank_char = chars.next()?;
        if chars.next().is_some() {
            return None;
        }
        if !('a'..='h').contains(&file_char) || !('1'..='8').contains(&rank_char) {
            return None;
        }
        let file = file_char as u8 - b'a';
        let rank = rank_char as u8 - b'0';
        Some(Square::from_row_file(8 - rank, file))
    }

    pub fn to_algebraic(&self) -> String {
        format!("{}{}", self.file_char(), self.rank())
    }

    pub fn file_char(&self) -> char {
        (b'a' + self.file()) as char
    }

    pub fn rank_char(&self) -> char {
        (b'0' + self.rank()) as char
    }

    /// Light squares are those where row + file is even (a8 and h1 are light).
    pub fn is_light(&self) -> bool {
        (self.row() + self.file()) % 2 == 0
    }

    pub fn all() -> impl Iterator<Item = Square> {
        (0..64u8).map(Square)
    }
}

impl fmt::Display for Square {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.file_char(), self.rank())
    }
}

#[derive(Debug, PartialEq, Eq, Clone, Copy, Hash)]
pub enum Wing {
    KingSide,
    QueenSide,
}

impl Wing {
    /// File of the rook that castles on this wing, before castling
    pub fn rook_home_file(&self) -> u8 {
        match self {
            Wing::KingSide => 7,
            Wing::QueenSide => 0,
        }
    }

    pub fn king_target_file(&self) -> u8 {
        match self {
            Wing::KingSide => 6,
            Wing::QueenSide => 2,
        }
    }

    pub fn rook_target_file(&self) -> u8 {
        match self {
            Wing::KingSide => 5,
            Wing::QueenSide => 3,
        }
    }
}

pub const KING_HOME_FILE: u8 = 4;

#[derive(Debug, PartialEq, Eq, Clone, Copy, Hash)]
pub struct CastlingRights {
    pub white_king_side: bool,
    pub white_queen_side: bool,
    pub black_king_side: bool,
    pub black_queen_side: bool,
}

impl CastlingRights {
    pub const fn all() -> Self {
        Self {
            white_king_side: true,
            white_queen_side: true,
            black_king_side: true,
            black_queen_side: true,
        }
    }

    pub const fn none() -> Self {
        Self {
            white_king_side: false,
            white_queen_side: false,
            black_king_side: false,
            black_queen_side: false,
        }
    }

    pub fn has(&self, color: Color, wing: Wing) -> bool {
        match (color, wing) {
            (Color::White, Wing::KingSide) => self.white_king_side,
            (Color::White, Wing::QueenSide) => self.white_queen_side,
            (Color::Black, Wing::KingSide) => self.black_king_side,
            (Color::Black, Wing::QueenSide) => self.black_queen_side,
        }
    }

    pub fn set(&mut self, color: Color, wing: Wing, allowed: bool) {
        match (color, wing) {
            (Color::White, Wing::KingSide) => self.white_king_side = allowed,
            (Color::White, Wing::QueenSide) => self.white_queen_side = allowed,
            (Color::Black, Wing::KingSide) => self.black_king_side = allowed,
            (Color::Black, Wing::QueenSide) => self.black_queen_side = allowed,
        }
    }

    pub fn clear(&mut self, color: Color, wing: Wing) {
        self.set(color, wing, false);
    }

    pub fn clear_color(&mut self, color: Color) {
        self.clear(color, Wing::KingSide);
        self.clear(color, Wing::QueenSide);
    }

    pub fn is_empty(&self) -> bool {
        *self == Self::none()
    }

    /// FEN castling field, `-` when no rights remain
    pub fn to_fen(&self) -> String {
        if self.is_empty() {
            return "-".to_string();
        }
        let mut res = String::new();
        if self.white_king_side {
            res.push('K');
        }
        if self.white_queen_side {
            res.push('Q');
        }
        if self.black_king_side {
            res.push('k');
        }
        if self.black_queen_side {
            res.push('q');
        }
        res
    }
}

#[derive(Debug, PartialEq, Eq, Clone, Copy, Hash)]
pub enum MoveKind {
    Normal,
    Capture,
    DoublePush,
    EnPassant,
    Promotion,
    PromotionCapture,
    CastleKingSide,
    CastleQueenSide,
}

impl MoveKind {
    pub fn is_capture(&self) -> bool {
        matches!(
            self,
            MoveKind::Capture | MoveKind::EnPassant | MoveKind::PromotionCapture
        )
    }

    pub fn is_promotion(&self) -> bool {
        matches!(self, MoveKind::Promotion | MoveKind::PromotionCapture)
    }

    pub fn is_castle(&self) -> bool {
        matches!(self, MoveKind::CastleKingSide | MoveKind::CastleQueenSide)
    }
}

/// A fully described state transition. Castling carries the rook relocation and
/// en passant the square of the pawn it removes, so applying a move never has to
/// re-derive intent from the two squares alone.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Move {
    pub from: Square,
    pub to: Square,
    pub kind: MoveKind,
    pub promote_to: Option<PieceType>,
    pub rook_from: Option<Square>,
    pub rook_to: Option<Square>,
    pub captured_square: Option<Square>,
}

impl Move {
    pub fn new(from: Square, to: Square, kind: MoveKind) -> Self {
        Self {
            from,
            to,
            kind,
            promote_to: None,
            rook_from: None,
            rook_to: None,
            captured_square: None,
        }
    }

    pub fn promotion(from: Square, to: Square, piece_type: PieceType, is_capture: bool) -> Self {
        let kind = if is_capture {
            MoveKind::PromotionCapture
        } else {
            MoveKind::Promotion
        };
        Self {
            promote_to: Some(piece_type),
            ..Self::new(from, to, kind)
        }
    }

    pub fn en_passant(from: Square, to: Square, captured_square: Square) -> Self {
        Self {
            captured_square: Some(captured_square),
            ..Self::new(from, to, MoveKind::EnPassant)
        }
    }

    pub fn castle(from: Square, to: Square, wing: Wing, rook_from: Square, rook_to: Square) -> Self {
        let kind = match wing {
            Wing::KingSide => MoveKind::CastleKingSide,
            Wing::QueenSide => MoveKind::CastleQueenSide,
        };
        Self {
            rook_from: Some(rook_from),
            rook_to: Some(rook_to),
            ..Self::new(from, to, kind)
        }
    }

    pub fn is_capture(&self) -> bool {
        self.kind.is_capture()
    }

    pub fn is_castle(&self) -> bool {
        self.kind.is_castle()
    }

    pub fn is_promotion(&self) -> bool {
        self.kind.is_promotion()
    }

    /// Square of the piece this move removes, if it is a capture
    pub fn capture_square(&self) -> Option<Square> {
        if self.kind == MoveKind::EnPassant {
            self.captured_square
        } else if self.is_capture() {
            Some(self.to)
        } else {
            None
        }
    }

    /// Long algebraic notation, e.g. `e2e4` or `e7e8q`
    pub fn to_uci(&self) -> String {
        match self.promote_to {
            Some(pt) => format!("{}{}{}", self.from, self.to, pt.to_char().to_ascii_lowercase()),
            None => format!("{}{}", self.from, self.to),
        }
    }

    /// Does this move satisfy the request? The promotion piece only matters for promotions.
    pub fn matches(&self, request: &MoveRequest) -> bool {
        if self.from != request.from || self.to != request.to {
            return false;
        }
        if self.is_promotion() {
            self.promote_to == request.promotion
        } else {
            true
        }
    }
}

impl fmt::Display for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_uci())
    }
}

/// A move as submitted by a player: the square pair plus, for pawns reaching the
/// last rank, the piece to promote to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MoveRequest {
    pub from: Square,
    pub to: Square,
    pub promotion: Option<PieceType>,
}

impl MoveRequest {
    pub fn new(from: Square, to: Square) -> Self {
        Self {
            from,
            to,
            promotion: None,
        }
    }

    pub fn with_promotion(from: Square, to: Square, promotion: PieceType) -> Self {
        Self {
            from,
            to,
            promotion: Some(promotion),
        }
    }

    pub fn from_uci(s: &str) -> Result<Self, MoveParseError> {
        if s.len() != 4 && s.len() != 5 || !s.is_ascii() {
            return Err(MoveParseError::InvalidLength {
                found: s.to_string(),
            });
        }
        let from = Square::from_algebraic(&s[0..2]).ok_or_else(|| MoveParseError::InvalidSquare {
            found: s[0..2].to_string(),
        })?;
        let to = Square::from_algebraic(&s[2..4]).ok_or_else(|| MoveParseError::InvalidSquare {
            found: s[2..4].to_string(),
        })?;
        let promotion = match s[4..].chars().next() {
            None => None,
            Some(c) => match PieceType::from_char(c) {
                Some(pt) if PIECES_CAN_PROMOTE_TO.contains(&pt) => Some(pt),
                _ => return Err(MoveParseError::InvalidPromotion { found: c }),
            },
        };
        Ok(Self {
            from,
            to,
            promotion,
        })
    }
}

impl FromStr for MoveRequest {
    type Err = MoveParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_uci(s)
    }
}

impl From<Move> for MoveRequest {
    fn from(m: Move) -> Self {
        Self {
            from: m.from,
            to: m.to,
            promotion: m.promote_to,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Status {
    /// Contains the winner
    Checkmate(Color),
    Stalemate,
    FiftyMoveRule,
    ThreefoldRepetition,
    InsufficientMaterial,
}

impl Status {
    pub fn winner(&self) -> Option<Color> {
        match self {
            Status::Checkmate(color) => Some(*color),
            _ => None,
        }
    }

    pub fn is_draw(&self) -> bool {
        self.winner().is_none()
    }

    pub fn to_human(&self) -> String {
        match self {
            Status::Checkmate(color) => format!("checkmate, {} wins", color.to_human()),
            Status::Stalemate => "draw by stalemate".to_string(),
            Status::FiftyMoveRule => "draw by the fifty-move rule".to_string(),
            Status::ThreefoldRepetition => "draw by threefold repetition".to_string(),
            Status::InsufficientMaterial => "draw by insufficient material".to_string(),
        }
    }

    /// PGN result token
    pub fn pgn_result(&self) -> &'static str {
        match self {
            Status::Checkmate(Color::White) => "1-0",
            Status::Checkmate(Color::Black) => "0-1",
            _ => "1/2-1/2",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_color_from_char() {
        assert_eq!(Color::from_char('w'), Some(Color::White));
        assert_eq!(Color::from_char('b'), Some(Color::Black));
        assert_eq!(Color::from_char('g'), None);
    }

    #[test]
    fn test_other_color() {
        assert_eq!(Color::White, Color::Black.other_color());
        assert_eq!(Color::Black, Color::White.other_color());
    }

    #[test]
    fn test_piece_type_from_char() {
        assert_eq!(PieceType::from_char('p'), Some(PieceType::Pawn));
        assert_eq!(PieceType::from_char('R'), Some(PieceType::Rook));
        assert_eq!(PieceType::from_char('n'), Some(PieceType::Knight));
        assert_eq!(PieceType::from_char('B'), Some(PieceType::Bishop));
        assert_eq!(PieceType::from_char('Q'), Some(PieceType::Queen));
        assert_eq!(PieceType::from_char('k'), Some(PieceType::King));
        assert_eq!(PieceType::from_char('x'), None);
    }

    #[test]
    fn test_is_sliding() {
        assert!(!PieceType::Pawn.is_sliding());
        assert!(PieceType::Rook.is_sliding());
        assert!(PieceType::Bishop.is_sliding());
        assert!(!PieceType::Knight.is_sliding());
        assert!(PieceType::Queen.is_sliding());
        assert!(!PieceType::King.is_sliding());
    }

    #[test]
    fn test_piece_fen_chars() {
        assert_eq!(
            Piece::from_fen_char('K'),
            Some(Piece::new(Color::White, PieceType::King))
        );
        assert_eq!(
            Piece::from_fen_char('n'),
            Some(Piece::new(Color::Black, PieceType::Knight))
        );
        assert_eq!(Piece::from_fen_char('3'), None);
        assert_eq!(Piece::new(Color::Black, PieceType::Queen).to_fen_char(), 'q');
    }

    #[test]
    fn test_square_row_file() {
        let a8 = Square::from_row_file(0, 0);
        assert_eq!(a8.index(), 0);
        let h1 = Square::from_row_file(7, 7);
        assert_eq!(h1.index(), 63);
        for sq in Square::all() {
            assert_eq!(Square::from_row_file(sq.row(), sq.file()), sq);
        }
    }

    #[test]
    fn test_square_from_algebraic() {
        assert_eq!(Square::from_algebraic("a8"), Some(Square::from_row_file(0, 0)));
        assert_eq!(Square::from_algebraic("e4"), Some(Square::from_row_file(4, 4)));
        assert_eq!(Square::from_algebraic("h1"), Some(Square::from_row_file(7, 7)));
        assert_eq!(Square::from_algebraic("i1"), None);
        assert_eq!(Square::from_algebraic("a9"), None);
        assert_eq!(Square::from_algebraic("a"), None);
        assert_eq!(Square::from_algebraic("a11"), None);
        for sq in Square::all() {
            assert_eq!(Square::from_algebraic(&sq.to_algebraic()), Some(sq));
        }
    }

    #[test]
    fn test_square_offset_stays_on_board() {
        let a1 = Square::from_algebraic("a1").unwrap();
        assert_eq!(a1.offset(0, -1), None);
        assert_eq!(a1.offset(1, 0), None);
        assert_eq!(a1.offset(-1, 1), Square::from_algebraic("b2"));
        let h8 = Square::from_algebraic("h8").unwrap();
        assert_eq!(h8.offset(-1, 0), None);
        assert_eq!(h8.offset(0, 1), None);
    }

    #[test]
    fn test_square_colors() {
        assert!(Square::from_algebraic("a8").unwrap().is_light());
        assert!(Square::from_algebraic("h1").unwrap().is_light());
        assert!(!Square::from_algebraic("a1").unwrap().is_light());
        assert!(!Square::from_algebraic("c1").unwrap().is_light());
        assert!(Square::from_algebraic("f1").unwrap().is_light());
    }

    #[test]
    fn test_castling_rights_fen() {
        assert_eq!(CastlingRights::all().to_fen(), "KQkq");
        assert_eq!(CastlingRights::none().to_fen(), "-");
        let mut rights = CastlingRights::all();
        rights.clear_color(Color::White);
        rights.clear(Color::Black, Wing::KingSide);
        assert_eq!(rights.to_fen(), "q");
    }

    #[test]
    fn test_move_request_from_uci() {
        let req = MoveRequest::from_uci("e2e4").unwrap();
        assert_eq!(req.from, Square::from_algebraic("e2").unwrap());
        assert_eq!(req.to, Square::from_algebraic("e4").unwrap());
        assert_eq!(req.promotion, None);

        let req: MoveRequest = "a7a8n".parse().unwrap();
        assert_eq!(req.promotion, Some(PieceType::Knight));

        assert!(matches!(
            MoveRequest::from_uci("e2"),
            Err(MoveParseError::InvalidLength { .. })
        ));
        assert!(matches!(
            MoveRequest::from_uci("z2e4"),
            Err(MoveParseError::InvalidSquare { .. })
        ));
        assert!(matches!(
            MoveRequest::from_uci("a7a8k"),
            Err(MoveParseError::InvalidPromotion { found: 'k' })
        ));
    }

    #[test]
    fn test_move_matches_request() {
        let from = Square::from_algebraic("a7").unwrap();
        let to = Square::from_algebraic("a8").unwrap();
        let m = Move::promotion(from, to, PieceType::Queen, false);
        assert!(m.matches(&MoveRequest::with_promotion(from, to, PieceType::Queen)));
        assert!(!m.matches(&MoveRequest::with_promotion(from, to, PieceType::Rook)));
        assert!(!m.matches(&MoveRequest::new(from, to)));

        let quiet = Move::new(from, to, MoveKind::Normal);
        assert!(quiet.matches(&MoveRequest::new(from, to)));
        assert_eq!(m.to_uci(), "a7a8q");
    }

    #[test]
    fn test_status_results() {
        assert_eq!(Status::Checkmate(Color::White).pgn_result(), "1-0");
        assert_eq!(Status::Checkmate(Color::Black).winner(), Some(Color::Black));
        assert!(Status::Stalemate.is_draw());
        assert_eq!(Status::ThreefoldRepetition.pgn_result(), "1/2-1/2");
    }
}
