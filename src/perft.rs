use rayon::prelude::*;

use crate::board::Board;
use crate::types::Move;

/// Number of leaf positions reachable in exactly `depth` plies
pub fn run_perft_test(board: &Board, depth: u8) -> u64 {
    let mut board = board.clone();
    perft(&mut board, depth)
}

fn perft(board: &mut Board, depth: u8) -> u64 {
    if depth == 0 {
        return 1;
    }
    let moves = board.legal_moves_in_place(board.get_active_color());
    if depth == 1 {
        return moves.len() as u64;
    }

    let mut nodes = 0;
    for m in &moves {
        let undo = board.make_move(m);
        nodes += perft(board, depth - 1);
        board.unmake_move(&undo);
    }
    nodes
}

/// Leaf counts below each root move, split across threads. Sorted by move text.
pub fn perft_divide(board: &Board, depth: u8) -> Vec<(Move, u64)> {
    let moves = board.get_legal_moves(board.get_active_color());
    let mut counts: Vec<(Move, u64)> = moves
        .par_iter()
        .map(|m| {
            let mut child = board.execute_move(m);
            (*m, perft(&mut child, depth.saturating_sub(1)))
        })
        .collect();
    counts.sort_by_key(|(m, _)| m.to_uci());
    counts
}

/// Perft from starting position
///
/// https://www.chessprogramming.org/Perft_Results
///
/// | Depth | Nodes       |
/// | ----- | ----------- |
/// | 1     | 20          |
/// | 2     | 400         |
/// | 3     | 8,902       |
/// | 4     | 197,281     |
/// | 5     | 4,865,609   |
/// | 6     | 119,060,324 |
pub fn get_perft_expected_node_count(depth: u8) -> Option<u64> {
    match depth {
        0 => Some(1),
        1 => Some(20),
        2 => Some(400),
        3 => Some(8902),
        4 => Some(197_281),
        5 => Some(4_865_609),
        6 => Some(119_060_324),
        _ => None,
    }
}
