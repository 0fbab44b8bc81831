pub mod attacks;
pub mod board;
pub mod engine;
pub mod error;
pub mod evaluate;
pub mod fen;
pub mod game;
pub mod history;
pub mod movegen;
pub mod perft;
pub mod rules;
pub mod san;
pub mod search;
pub mod types;
