//! Forsyth-Edwards Notation import and export for [`Board`].

use itertools::Itertools;

use crate::board::Board;
use crate::error::FenError;
use crate::types::*;

impl Board {
    /// Parse a FEN string. The two clock fields may be omitted and default to
    /// `0` and `1`. Nothing is returned unless every field is valid.
    pub fn from_fen(fen: &str) -> Result<Board, FenError> {
        let fields: Vec<&str> = fen.split_whitespace().collect();
        if !(4..=6).contains(&fields.len()) {
            return Err(FenError::WrongFieldCount {
                found: fields.len(),
            });
        }

        let mut board = Board::empty();

        let ranks: Vec<&str> = fields[0].split('/').collect();
        if ranks.len() != 8 {
            return Err(FenError::WrongRankCount { found: ranks.len() });
        }
        for (row, rank) in ranks.iter().enumerate() {
            let mut file: usize = 0;
            for c in rank.chars() {
                // a run of empty squares is at least one square long
                if let Some(skip) = c.to_digit(10).filter(|&n| n >= 1) {
                    file += skip as usize;
                    continue;
                }
                let piece = Piece::from_fen_char(c).ok_or(FenError::InvalidPiece { found: c })?;
                if file < 8 {
                    board.set_piece(Square::from_row_file(row as u8, file as u8), Some(piece));
                }
                file += 1;
            }
            if file != 8 {
                return Err(FenError::WrongFileCount {
                    rank: 8 - row as u8,
                    files: file,
                });
            }
        }

        let mut turn_chars = fields[1].chars();
        board.active_color = match (turn_chars.next(), turn_chars.next()) {
            (Some(c), None) => Color::from_char(c),
            _ => None,
        }
        .ok_or_else(|| FenError::InvalidTurn {
            found: fields[1].to_string(),
        })?;

        board.castling = parse_castling(fields[2])?;
        board.en_passant_target = parse_en_passant(fields[3])?;

        if let Some(halfmove) = fields.get(4) {
            board.halfmove_clock =
                halfmove
                    .parse()
                    .map_err(|_| FenError::InvalidHalfmoveClock {
                        found: halfmove.to_string(),
                    })?;
        }
        if let Some(fullmove) = fields.get(5) {
            board.fullmove_number = fullmove
                .parse()
                .ok()
                .filter(|n: &u32| *n >= 1)
                .ok_or_else(|| FenError::InvalidFullmoveNumber {
                    found: fullmove.to_string(),
                })?;
        }

        Ok(board)
    }

    /// Serialise to a six-field FEN string.
    pub fn to_fen(&self) -> String {
        let placement = (0..8u8)
            .map(|row| {
                let mut rank = String::new();
                let mut empty = 0;
                for file in 0..8u8 {
                    match self.piece_at(Square::from_row_file(row, file)) {
                        Some(piece) => {
                            if empty > 0 {
                                rank.push_str(&empty.to_string());
                                empty = 0;
                            }
                            rank.push(piece.to_fen_char());
                        }
                        None => empty += 1,
                    }
                }
                if empty > 0 {
                    rank.push_str(&empty.to_string());
                }
                rank
            })
            .join("/");

        let en_passant = self
            .en_passant_target
            .map_or_else(|| "-".to_string(), |sq| sq.to_algebraic());

        [
            placement,
            self.active_color.to_char().to_string(),
            self.castling.to_fen(),
            en_passant,
            self.halfmove_clock.to_string(),
            self.fullmove_number.to_string(),
        ]
        .iter()
        .join(" ")
    }
}

fn parse_castling(field: &str) -> Result<CastlingRights, FenError> {
    let mut rights = CastlingRights::none();
    if field == "-" {
        return Ok(rights);
    }
    let invalid = || FenError::InvalidCastling {
        found: field.to_string(),
    };
    if field.is_empty() {
        return Err(invalid());
    }
    for c in field.chars() {
        let (color, wing) = match c {
            'K' => (Color::White, Wing::KingSide),
            'Q' => (Color::White, Wing::QueenSide),
            'k' => (Color::Black, Wing::KingSide),
            'q' => (Color::Black, Wing::QueenSide),
            _ => return Err(invalid()),
        };
        rights.set(color, wing, true);
    }
    Ok(rights)
}

fn parse_en_passant(field: &str) -> Result<Option<Square>, FenError> {
    if field == "-" {
        return Ok(None);
    }
    match Square::from_algebraic(field) {
        Some(sq) if sq.rank() == 3 || sq.rank() == 6 => Ok(Some(sq)),
        _ => Err(FenError::InvalidEnPassant {
            found: field.to_string(),
        }),
    }
}
