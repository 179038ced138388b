use std::path::PathBuf;

use clap::Parser;
use uttt::Player;

/// Ultimate tic-tac-toe in the terminal.
#[derive(Debug, Parser)]
#[command(name = "uttt", version, about)]
pub struct Cli {
    /// Who moves first (x or o).
    #[arg(long, default_value = "x")]
    pub first: Player,

    /// Let both sides play random legal moves.
    #[arg(long)]
    pub autoplay: bool,

    /// Seed for --autoplay, for reproducible games.
    #[arg(long, requires = "autoplay")]
    pub seed: Option<u64>,

    /// RON file with a list of (x, y) moves to apply before playing.
    #[arg(long, value_name = "FILE")]
    pub replay: Option<PathBuf>,

    /// Print the final board as RON when the game ends.
    #[arg(long)]
    pub dump: bool,

    /// Render without terminal colors.
    #[arg(long)]
    pub no_color: bool,

    /// Log at debug level regardless of RUST_LOG.
    #[arg(short, long)]
    pub verbose: bool,
}
