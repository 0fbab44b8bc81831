//! Position repetition tracking.

use std::collections::HashMap;

use crate::board::Board;
use crate::types::*;

/// The part of a position that decides whether two positions repeat: placement,
/// side to move, castling rights and en passant target. Clocks are left out.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PositionKey {
    squares: [Option<Piece>; 64],
    turn: Color,
    castling: CastlingRights,
    en_passant_target: Option<Square>,
}

impl Board {
    pub fn position_key(&self) -> PositionKey {
        PositionKey {
            squares: self.squares,
            turn: self.active_color,
            castling: self.castling,
            en_passant_target: self.en_passant_target,
        }
    }
}

/// Multiset of every position reached in a game, including the starting one.
#[derive(Debug, Clone, Default)]
pub struct PositionHistory {
    counts: HashMap<PositionKey, u32>,
}

impl PositionHistory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Count one more occurrence of `board`, returning the new count
    pub fn record(&mut self, board: &Board) -> u32 {
        let count = self.counts.entry(board.position_key()).or_insert(0);
        *count += 1;
        *count
    }

    /// Take back one occurrence of `board`
    pub fn forget(&mut self, board: &Board) {
        let key = board.position_key();
        if let Some(count) = self.counts.get_mut(&key) {
            *count -= 1;
            if *count == 0 {
                self.counts.remove(&key);
            }
        }
    }

    pub fn count(&self, board: &Board) -> u32 {
        self.counts.get(&board.position_key()).copied().unwrap_or(0)
    }

    /// Highest occurrence count of any recorded position
    pub fn max_repetitions(&self) -> u32 {
        self.counts.values().copied().max().unwrap_or(0)
    }

    pub fn has_repetition(&self, times: u32) -> bool {
        self.max_repetitions() >= times
    }

    /// Number of distinct positions recorded
    pub fn len(&self) -> usize {
        self.counts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }

    pub fn clear(&mut self) {
        self.counts.clear();
    }
}
