use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Instant;

use rand::seq::SliceRandom;
use rand::Rng;
use tracing::debug;

use crate::board::Board;
use crate::evaluate::*;
use crate::rules::is_draw_by_rule;
use crate::types::{Color, Move};

pub const MIN_SCORE: i32 = -1_000_000_000;
pub const MAX_SCORE: i32 = 1_000_000_000;

pub const MIN_SEARCH_DEPTH: u8 = 1;
pub const MAX_SEARCH_DEPTH: u8 = 4;
pub const MIN_DIFFICULTY: u8 = 1;
pub const MAX_DIFFICULTY: u8 = 10;

/// Map a difficulty level onto a search depth, linearly and rounded to the
/// nearest ply. Levels outside the supported range are clamped.
pub fn depth_for_difficulty(difficulty: u8) -> u8 {
    let level = difficulty.clamp(MIN_DIFFICULTY, MAX_DIFFICULTY) - MIN_DIFFICULTY;
    let levels = MAX_DIFFICULTY - MIN_DIFFICULTY;
    let depths = MAX_SEARCH_DEPTH - MIN_SEARCH_DEPTH;
    MIN_SEARCH_DEPTH + (level * depths + levels / 2) / levels
}

/// Shared stop flag. Cloning hands out another handle to the same flag.
#[derive(Debug, Clone, Default)]
pub struct SearchControl {
    stop: Arc<AtomicBool>,
}

impl SearchControl {
    pub fn new() -> Self {
        Self::default()
    }

    /// Ask the search to stop. Honoured between root moves only.
    pub fn stop(&self) {
        self.stop.store(true, Ordering::Relaxed);
    }

    #[inline]
    pub fn should_stop(&self) -> bool {
        self.stop.load(Ordering::Relaxed)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SearchResult {
    /// `None` only when the side to move has no legal move
    pub best_move: Option<Move>,
    /// Score from white's point of view
    pub best_score: i32,
    pub nodes_searched: u64,
    pub depth: u8,
    /// Set when a stop request cut the root loop short
    pub stopped: bool,
}

/// Alpha-beta search to `depth` plies with a fresh, never-stopped control.
pub fn minimax(depth: u8, board: &Board) -> SearchResult {
    minimax_with_control(depth, board, &SearchControl::new(), &mut rand::thread_rng())
}

/// Alpha-beta search to `depth` plies. Root moves are shuffled with `rng`
/// before the (stable) ordering so equal moves are tried in varying order.
/// `control` is polled before every root move after the first one.
pub fn minimax_with_control<R: Rng + ?Sized>(
    depth: u8,
    board: &Board,
    control: &SearchControl,
    rng: &mut R,
) -> SearchResult {
    let start = Instant::now();
    let depth = depth.max(MIN_SEARCH_DEPTH);
    let mut board = board.clone();
    let color = board.get_active_color();
    let mut nodes_searched = 0;

    let mut moves = board.legal_moves_in_place(color);
    if moves.is_empty() {
        return SearchResult {
            best_move: None,
            best_score: evaluate_board(&board),
            nodes_searched: 1,
            depth,
            stopped: false,
        };
    }
    moves.shuffle(rng);
    order_moves(&board, &mut moves);

    let mut alpha = MIN_SCORE;
    let mut beta = MAX_SCORE;
    let mut best_move: Option<Move> = None;
    let mut best_score = if color == Color::White {
        MIN_SCORE
    } else {
        MAX_SCORE
    };
    let mut stopped = false;

    for (i, mv) in moves.iter().enumerate() {
        if i > 0 && control.should_stop() {
            debug!("search stopped after {} of {} root moves", i, moves.len());
            stopped = true;
            break;
        }
        let undo = board.make_move(mv);
        let score = alpha_beta(&mut board, depth - 1, alpha, beta, &mut nodes_searched);
        board.unmake_move(&undo);

        let improves = match color {
            Color::White => score > best_score,
            Color::Black => score < best_score,
        };
        if best_move.is_none() || improves {
            best_move = Some(*mv);
            best_score = score;
        }
        match color {
            Color::White => alpha = alpha.max(score),
            Color::Black => beta = beta.min(score),
        }
    }

    debug!(
        "depth {} best {} score {} nodes {} in {:?}",
        depth,
        best_move.map_or_else(|| "-".to_string(), |m| m.to_uci()),
        best_score,
        nodes_searched,
        start.elapsed()
    );

    SearchResult {
        best_move,
        best_score,
        nodes_searched,
        depth,
        stopped,
    }
}

/// White maximises, black minimises. The board is restored before returning.
fn alpha_beta(board: &mut Board, depth: u8, mut alpha: i32, mut beta: i32, nodes: &mut u64) -> i32 {
    *nodes += 1;
    if depth == 0 {
        return evaluate_board(board);
    }

    let color = board.get_active_color();
    let mut moves = board.legal_moves_in_place(color);
    if moves.is_empty() {
        return no_moves_score(board, color, depth);
    }
    if is_draw_by_rule(board).is_some() {
        return 0;
    }
    order_moves(board, &mut moves);

    match color {
        Color::White => {
            let mut best = MIN_SCORE;
            for mv in &moves {
                let undo = board.make_move(mv);
                let score = alpha_beta(board, depth - 1, alpha, beta, nodes);
                board.unmake_move(&undo);
                best = best.max(score);
                alpha = alpha.max(score);
                if alpha >= beta {
                    break;
                }
            }
            best
        }
        Color::Black => {
            let mut best = MAX_SCORE;
            for mv in &moves {
                let undo = board.make_move(mv);
                let score = alpha_beta(board, depth - 1, alpha, beta, nodes);
                board.unmake_move(&undo);
                best = best.min(score);
                beta = beta.min(score);
                if alpha >= beta {
                    break;
                }
            }
            best
        }
    }
}

/// Mate scores grow with the remaining depth so nearer mates are preferred.
fn no_moves_score(board: &Board, color: Color, depth: u8) -> i32 {
    if board.is_in_check(color) {
        -color.sign() * (MATE_SCORE + depth as i32)
    } else {
        0
    }
}

/// Sort by descending [`guess_move_value`]. The sort is stable, so moves of
/// equal value keep their relative order.
pub fn order_moves(board: &Board, moves: &mut [Move]) {
    moves.sort_by_cached_key(|mv| -guess_move_value(board, mv));
}

/// Plain minimax without pruning or ordering, used to check that alpha-beta
/// finds the same score.
pub fn minimax_no_pruning(depth: u8, board: &Board) -> SearchResult {
    let depth = depth.max(MIN_SEARCH_DEPTH);
    let mut board = board.clone();
    let color = board.get_active_color();
    let mut nodes_searched = 0;

    let moves = board.legal_moves_in_place(color);
    let mut best_move = None;
    let mut best_score = evaluate_board(&board);
    for mv in &moves {
        let undo = board.make_move(mv);
        let score = full_minimax(&mut board, depth - 1, &mut nodes_searched);
        board.unmake_move(&undo);
        let improves = match color {
            Color::White => score > best_score,
            Color::Black => score < best_score,
        };
        if best_move.is_none() || improves {
            best_move = Some(*mv);
            best_score = score;
        }
    }

    SearchResult {
        best_move,
        best_score,
        nodes_searched,
        depth,
        stopped: false,
    }
}

fn full_minimax(board: &mut Board, depth: u8, nodes: &mut u64) -> i32 {
    *nodes += 1;
    if depth == 0 {
        return evaluate_board(board);
    }
    let color = board.get_active_color();
    let moves = board.legal_moves_in_place(color);
    if moves.is_empty() {
        return no_moves_score(board, color, depth);
    }
    if is_draw_by_rule(board).is_some() {
        return 0;
    }

    let scores = moves.iter().map(|mv| {
        let undo = board.make_move(mv);
        let score = full_minimax(board, depth - 1, nodes);
        board.unmake_move(&undo);
        score
    });
    let scores: Vec<i32> = scores.collect();
    match color {
        Color::White => scores.into_iter().max().unwrap_or(0),
        Color::Black => scores.into_iter().min().unwrap_or(0),
    }
}
