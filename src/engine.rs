//! Engine driver
//!
//! Turns a difficulty setting into a search and runs it, either on the calling
//! thread or deferred onto a background thread that can be asked to stop.

use std::thread::{self, JoinHandle};
use std::time::Instant;

use tracing::{debug, info};

use crate::board::Board;
use crate::search::{
    depth_for_difficulty, minimax_with_control, SearchControl, MAX_DIFFICULTY, MAX_SEARCH_DEPTH,
    MIN_DIFFICULTY, MIN_SEARCH_DEPTH,
};
use crate::types::Move;

/// Search options for pick_move
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SearchOptions {
    /// Explicit depth in plies, overrides the difficulty when set
    pub depth: Option<u8>,
    /// Difficulty level, 1 (weakest) to 10
    pub difficulty: u8,
}

impl Default for SearchOptions {
    fn default() -> Self {
        Self {
            depth: None,
            difficulty: 5,
        }
    }
}

impl SearchOptions {
    pub fn with_depth(depth: u8) -> Self {
        Self {
            depth: Some(depth),
            ..Default::default()
        }
    }

    pub fn with_difficulty(difficulty: u8) -> Self {
        Self {
            depth: None,
            difficulty: difficulty.clamp(MIN_DIFFICULTY, MAX_DIFFICULTY),
        }
    }

    /// Depth the search will run to
    pub fn effective_depth(&self) -> u8 {
        match self.depth {
            Some(depth) => depth.clamp(MIN_SEARCH_DEPTH, MAX_SEARCH_DEPTH),
            None => depth_for_difficulty(self.difficulty),
        }
    }
}

/// Result of an engine search
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EngineResult {
    pub best_move: Move,
    pub score: i32,
    pub depth_reached: u8,
    pub nodes_searched: u64,
    pub time_ms: u64,
    pub stopped: bool,
}

/// Search `board` on the calling thread. `None` when the side to move has no legal move.
pub fn pick_move(board: &Board, options: &SearchOptions) -> Option<EngineResult> {
    run_search(board, options, &SearchControl::new())
}

fn run_search(board: &Board, options: &SearchOptions, control: &SearchControl) -> Option<EngineResult> {
    let start = Instant::now();
    let depth = options.effective_depth();
    let result = minimax_with_control(depth, board, control, &mut rand::thread_rng());
    let time_ms = start.elapsed().as_millis() as u64;

    let best_move = result.best_move?;
    info!(
        "engine plays {} (score {}, depth {}, {} nodes, {} ms)",
        best_move, result.best_score, result.depth, result.nodes_searched, time_ms
    );
    Some(EngineResult {
        best_move,
        score: result.best_score,
        depth_reached: result.depth,
        nodes_searched: result.nodes_searched,
        time_ms,
        stopped: result.stopped,
    })
}

/// A search running on its own thread over a private copy of the board.
pub struct SearchHandle {
    control: SearchControl,
    handle: JoinHandle<Option<EngineResult>>,
}

impl SearchHandle {
    /// Request a stop. The root move being searched is finished first, and the
    /// best move found so far is still reported.
    pub fn stop(&self) {
        debug!("stop requested");
        self.control.stop();
    }

    pub fn is_finished(&self) -> bool {
        self.handle.is_finished()
    }

    /// Wait for the search. `None` if there was no legal move or the thread panicked.
    pub fn join(self) -> Option<EngineResult> {
        self.handle.join().ok().flatten()
    }
}

/// Start a search in the background. The board is copied, so the caller may
/// keep using (and mutating) its own board while the search runs.
pub fn spawn_search(board: &Board, options: SearchOptions) -> SearchHandle {
    let control = SearchControl::new();
    let thread_control = control.clone();
    let board = board.clone();

    let handle = thread::spawn(move || {
        // let the caller's thread get on with its work before the search starts
        thread::yield_now();
        run_search(&board, &options, &thread_control)
    });

    SearchHandle { control, handle }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Square;

    #[test]
    fn test_search_options() {
        assert_eq!(SearchOptions::default().effective_depth(), 2);
        assert_eq!(SearchOptions::with_depth(3).effective_depth(), 3);
        assert_eq!(SearchOptions::with_depth(9).effective_depth(), MAX_SEARCH_DEPTH);
        assert_eq!(SearchOptions::with_difficulty(10).effective_depth(), 4);
        assert_eq!(SearchOptions::with_difficulty(0).difficulty, 1);
    }

    #[test]
    fn test_pick_move_finds_mate() {
        let b = Board::from_fen("6k1/5ppp/8/8/8/8/8/R5K1 w - - 0 1").unwrap();
        let result = pick_move(&b, &SearchOptions::with_depth(2)).unwrap();
        assert_eq!(result.best_move.to, Square::from_algebraic("a8").unwrap());
        assert!(!result.stopped);
    }

    #[test]
    fn test_pick_move_without_legal_moves() {
        let b = Board::from_fen("7k/5Q2/6K1/8/8/8/8/8 b - - 0 1").unwrap();
        assert_eq!(pick_move(&b, &SearchOptions::default()), None);
    }

    #[test]
    fn test_background_search_on_a_copy() {
        let mut b = Board::from_fen("6k1/5ppp/8/8/8/8/8/R5K1 w - - 0 1").unwrap();
        let handle = spawn_search(&b, SearchOptions::with_depth(2));
        // the live board can change while the search runs
        b = Board::new();
        let result = handle.join().unwrap();
        assert_eq!(result.best_move.to, Square::from_algebraic("a8").unwrap());
        assert_eq!(b, Board::new());
    }

    #[test]
    fn test_stopped_search_still_reports_a_move() {
        let handle = spawn_search(&Board::new(), SearchOptions::with_depth(4));
        handle.stop();
        let result = handle.join().unwrap();
        assert!(result.stopped);
        let legal = Board::new().get_legal_moves(crate::types::Color::White);
        assert!(legal.contains(&result.best_move));
    }
}
