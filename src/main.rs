use clap::Parser;
use color_eyre::eyre::{eyre, Result, WrapErr};
use tracing::info;
use tracing_subscriber::EnvFilter;

use chess_core::board::STARTING_POSITION_FEN;
use chess_core::engine::{pick_move, SearchOptions};
use chess_core::game::Game;
use chess_core::perft::{perft_divide, run_perft_test};
use chess_core::types::MoveRequest;

#[derive(Parser, Debug)]
#[command(name = "chess_core")]
#[command(about = "Play, analyse and perft-test chess positions")]
struct Args {
    /// Starting position
    #[arg(long, default_value = STARTING_POSITION_FEN)]
    fen: String,

    /// Engine strength, 1 to 10
    #[arg(short, long, default_value_t = 5)]
    difficulty: u8,

    /// Search depth in plies, overrides the difficulty
    #[arg(long)]
    depth: Option<u8>,

    /// Moves to apply before anything else, in long algebraic notation (e2e4,e7e5)
    #[arg(long, value_delimiter = ',')]
    apply: Vec<String>,

    /// Number of full moves the engine plays against itself
    #[arg(short, long, default_value_t = 10)]
    moves: u32,

    /// Count leaf positions to this depth instead of playing
    #[arg(long)]
    perft: Option<u8>,

    /// With --perft, print the count below every root move
    #[arg(long)]
    divide: bool,

    /// Print the evaluation and the engine's choice instead of playing
    #[arg(long)]
    analyse: bool,

    /// Print the game as PGN when done
    #[arg(long)]
    pgn: bool,

    /// More logging (-v debug, -vv trace). RUST_LOG takes precedence.
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

fn main() -> Result<()> {
    color_eyre::install()?;
    let args = Args::parse();

    let default_level = match args.verbose {
        0 => "info",
        1 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let mut game = Game::from_fen(&args.fen).wrap_err("could not load the starting position")?;
    for uci in &args.apply {
        let request: MoveRequest = uci.parse().wrap_err_with(|| format!("bad move '{}'", uci))?;
        game.make_move(request)
            .ok_or_else(|| eyre!("illegal move '{}' in {}", uci, game.export_position()))?;
    }

    let options = match args.depth {
        Some(depth) => SearchOptions::with_depth(depth),
        None => SearchOptions::with_difficulty(args.difficulty),
    };

    if let Some(depth) = args.perft {
        if args.divide {
            let divided = perft_divide(game.board(), depth);
            for (mv, nodes) in &divided {
                println!("{}: {}", mv, nodes);
            }
            println!("\nNodes searched: {}", divided.iter().map(|(_, n)| n).sum::<u64>());
        } else {
            println!("Nodes searched: {}", run_perft_test(game.board(), depth));
        }
        return Ok(());
    }

    if args.analyse {
        game.board().draw_to_terminal();
        println!("fen: {}", game.export_position());
        println!("evaluation: {}", game.evaluate());
        println!("material balance: {}", game.material_balance());
        match game.status() {
            Some(status) => println!("status: {}", status.to_human()),
            None => match pick_move(game.board(), &options) {
                Some(result) => println!(
                    "best move: {} (score {}, depth {}, {} nodes)",
                    game.board().move_to_san(&result.best_move),
                    result.score,
                    result.depth_reached,
                    result.nodes_searched
                ),
                None => println!("no legal moves"),
            },
        }
        return Ok(());
    }

    info!(
        "self-play for {} moves at depth {}",
        args.moves,
        options.effective_depth()
    );
    let status = game.play(args.moves, &options);
    game.board().draw_to_terminal();
    match status {
        Some(status) => println!("{}", status.to_human()),
        None => println!("game still in progress: {}", game.export_position()),
    }
    if args.pgn {
        println!("\n{}", game.to_pgn());
    }
    Ok(())
}
