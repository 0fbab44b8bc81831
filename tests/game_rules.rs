//! End-to-end game scenarios played through `Game`.

use pretty_assertions::assert_eq;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;

use chess_core::board::{Board, STARTING_POSITION_FEN};
use chess_core::engine::{spawn_search, SearchOptions};
use chess_core::game::Game;
use chess_core::types::{Color, MoveRequest, Status};

fn play(game: &mut Game, moves: &[&str]) {
    for uci in moves {
        let request = MoveRequest::from_uci(uci).unwrap();
        assert!(game.make_move(request).is_some(), "{} was rejected", uci);
    }
}

#[test]
fn scholars_mate() {
    let mut game = Game::new();
    play(&mut game, &["e2e4", "e7e5", "f1c4", "b8c6", "d1h5", "g8f6", "h5f7"]);

    assert_eq!(game.status(), Some(Status::Checkmate(Color::White)));
    assert!(game.is_in_check(Color::Black));
    assert!(game.all_legal_moves().is_empty());
    let last = game.move_history().last().unwrap();
    assert_eq!(last.san, "Qxf7#");
    assert!(last.is_checkmate);
    assert!(game.to_pgn().contains("4. Qxf7# 1-0"));
}

#[test]
fn threefold_repetition_fires_on_third_occurrence() {
    let mut game = Game::new();
    let shuffle = ["g1f3", "g8f6", "f3g1", "f6g8"];

    play(&mut game, &shuffle);
    assert_eq!(game.repetitions(), 2);
    assert_eq!(game.status(), None);

    play(&mut game, &shuffle[..3]);
    assert_eq!(game.status(), None);
    play(&mut game, &shuffle[3..]);
    assert_eq!(game.move_history().len(), 8);
    assert_eq!(game.repetitions(), 3);
    assert_eq!(game.status(), Some(Status::ThreefoldRepetition));

    // taking the last move back makes the game playable again
    game.undo_move().unwrap();
    assert_eq!(game.status(), None);
    assert_eq!(game.turn(), Color::Black);
}

#[test]
fn capturing_into_insufficient_material() {
    let mut game = Game::from_fen("4k3/8/8/8/8/8/3r4/4K1N1 w - - 0 1").unwrap();
    play(&mut game, &["e1d2"]);
    assert_eq!(game.status(), Some(Status::InsufficientMaterial));
    assert_eq!(game.captured().by_white.len(), 1);
}

#[test]
fn knight_each_is_not_a_draw() {
    let game = Game::from_fen("4kn2/8/8/8/8/8/8/4KN2 w - - 0 1").unwrap();
    assert_eq!(game.status(), None);
}

#[test]
fn fifty_move_rule() {
    let mut game = Game::from_fen("4k3/8/8/8/8/8/8/R3K3 w - - 99 70").unwrap();
    play(&mut game, &["a1a2"]);
    assert_eq!(game.status(), Some(Status::FiftyMoveRule));

    // a pawn move would have reset the clock
    let mut game = Game::from_fen("4k3/8/8/8/8/8/P7/R3K3 w - - 99 70").unwrap();
    play(&mut game, &["a2a3"]);
    assert_eq!(game.status(), None);
    assert_eq!(game.board().halfmove_clock(), 0);
}

#[test]
fn stalemate_by_move() {
    let mut game = Game::from_fen("7k/8/5QK1/8/8/8/8/8 w - - 0 1").unwrap();
    play(&mut game, &["f6f7"]);
    assert_eq!(game.status(), Some(Status::Stalemate));
    assert!(game.move_history().last().unwrap().is_stalemate);
}

#[test]
fn random_games_round_trip_through_fen() {
    let mut rng = StdRng::seed_from_u64(0x5eed);
    for _ in 0..8 {
        let mut board = Board::new();
        for _ in 0..120 {
            let moves = board.get_legal_moves(board.get_active_color());
            let Some(mv) = moves.choose(&mut rng) else {
                break;
            };

            let before = board.clone();
            let undo = board.make_move(mv);
            let fen = board.to_fen();
            assert_eq!(Board::from_fen(&fen).unwrap().to_fen(), fen);
            assert_eq!(Board::from_fen(&fen).unwrap(), board);

            board.unmake_move(&undo);
            assert_eq!(board, before);
            board.make_move(mv);
        }
    }
}

#[test]
fn undo_back_to_the_start() {
    let mut game = Game::new();
    play(&mut game, &["e2e4", "c7c5", "g1f3", "d7d6", "e1e2"]);
    assert!(!game.board().castling_rights().white_king_side);
    while game.undo_move().is_some() {}
    assert_eq!(game.export_position(), STARTING_POSITION_FEN);
    assert_eq!(game.repetitions(), 1);
}

#[test]
fn background_search_feeds_the_game() {
    let mut game = Game::from_fen("6k1/5ppp/8/8/8/8/8/R5K1 w - - 0 1").unwrap();
    let handle = spawn_search(game.board(), SearchOptions::with_depth(2));
    let result = handle.join().unwrap();
    let record = game.make_move(MoveRequest::from(result.best_move)).unwrap();
    assert_eq!(record.san, "Ra8#");
    assert_eq!(game.status(), Some(Status::Checkmate(Color::White)));
}
