//! Tic-Tac-Toe CLI - Command-line driver for the perfect-play engine
//!
//! Commands:
//! - best: Print the engine's move for a board
//! - selfplay: Engine vs engine to completion
//! - play: Interactive game against the engine
//! - verify: Check alpha-beta against plain minimax on every reachable board

mod best_cmd;
mod play_cmd;
mod report;
mod selfplay_cmd;
mod timing;
mod verify_cmd;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "tictactoe")]
#[command(about = "Perfect-play tic-tac-toe engine")]
struct Cli {
    /// Log search statistics (overridden by RUST_LOG)
    #[arg(long, short, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the engine's move for a board
    Best(best_cmd::BestArgs),
    /// Let the engine play both sides
    Selfplay(selfplay_cmd::SelfplayArgs),
    /// Play against the engine on stdin/stdout
    Play(play_cmd::PlayArgs),
    /// Compare pruned search with plain minimax on every reachable board
    Verify(verify_cmd::VerifyArgs),
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    init_logging(cli.verbose);

    match cli.command {
        Commands::Best(args) => best_cmd::run(args),
        Commands::Selfplay(args) => selfplay_cmd::run(args),
        Commands::Play(args) => play_cmd::run(args),
        Commands::Verify(args) => verify_cmd::run(args),
    }
}

/// Logs go to stderr so `--json` output stays clean
fn init_logging(verbose: bool) {
    let default_level = if verbose { "debug" } else { "info" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}
