//! Error types for position import and move parsing.
//!
//! Illegal moves are not errors: the game answers them with `None`.

use thiserror::Error;

/// Why a FEN string was rejected
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FenError {
    #[error("FEN must have between 4 and 6 space-separated fields, found {found}")]
    WrongFieldCount { found: usize },

    #[error("Piece placement must describe 8 ranks, found {found}")]
    WrongRankCount { found: usize },

    #[error("Rank {rank} of the piece placement describes {files} files, expected 8")]
    WrongFileCount { rank: u8, files: usize },

    #[error("Invalid character '{found}' in piece placement")]
    InvalidPiece { found: char },

    #[error("Invalid side to move '{found}', expected 'w' or 'b'")]
    InvalidTurn { found: String },

    #[error("Invalid castling field '{found}', expected '-' or letters from 'KQkq'")]
    InvalidCastling { found: String },

    #[error("Invalid en passant field '{found}', expected '-' or a square on rank 3 or 6")]
    InvalidEnPassant { found: String },

    #[error("Invalid halfmove clock '{found}'")]
    InvalidHalfmoveClock { found: String },

    #[error("Invalid fullmove number '{found}'")]
    InvalidFullmoveNumber { found: String },
}

/// Why a long algebraic move string (`e2e4`, `e7e8q`) could not be parsed
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum MoveParseError {
    #[error("Move '{found}' must be 4 or 5 characters long")]
    InvalidLength { found: String },

    #[error("Invalid square '{found}' in move")]
    InvalidSquare { found: String },

    #[error("Invalid promotion piece '{found}'")]
    InvalidPromotion { found: char },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fen_error_messages_name_the_field() {
        let err = FenError::InvalidTurn {
            found: "x".to_string(),
        };
        assert!(err.to_string().contains("'x'"));
        assert!(err.to_string().contains("side to move"));

        let err = FenError::WrongFileCount { rank: 3, files: 9 };
        assert!(err.to_string().contains("Rank 3"));
        assert!(err.to_string().contains('9'));

        let err = FenError::InvalidCastling {
            found: "KX".to_string(),
        };
        assert!(err.to_string().contains("castling"));
    }

    #[test]
    fn test_move_parse_error_messages() {
        let err = MoveParseError::InvalidSquare {
            found: "z9".to_string(),
        };
        assert!(err.to_string().contains("z9"));
        let err = MoveParseError::InvalidPromotion { found: 'k' };
        assert!(err.to_string().contains("'k'"));
    }
}
