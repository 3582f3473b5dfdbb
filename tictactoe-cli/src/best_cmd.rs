//! Best command - print the engine's move for a single board
//!
//! ## Architecture
//!
//! - Level 1: run() - orchestration
//! - Level 2: parse_board(), report_move()
//! - Level 3: formatting utilities

use anyhow::{Context, Result};
use clap::Args;
use serde::Serialize;

use tictactoe_core::{Action, Board, GameResult, Player};

use crate::report::{describe_result, describe_value};
use crate::timing::{millis, timed_search, TimedSearch};

// ============================================================================
// COMMAND ARGUMENTS
// ============================================================================

#[derive(Args)]
pub struct BestArgs {
    /// Board in compact form, e.g. "X.O/.X./..O"
    #[arg(long, value_name = "BOARD")]
    pub board: String,

    /// Output results as JSON
    #[arg(long)]
    pub json: bool,
}

/// Everything reported for one board
#[derive(Debug, Serialize)]
struct MoveReport {
    board: String,
    to_move: Player,
    result: GameResult,
    action: Option<Action>,
    value: Option<i32>,
    nodes: Option<u64>,
    elapsed_ms: f64,
}

// ============================================================================
// LEVEL 1 - ORCHESTRATION
// ============================================================================

/// Run best command
pub fn run(args: BestArgs) -> Result<()> {
    let board = parse_board(&args.board)?;

    let timed = timed_search(&board);
    let report = build_report(&board, &timed);

    if args.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        print_text_report(&board, &report);
    }

    Ok(())
}

// ============================================================================
// LEVEL 2 - PHASES
// ============================================================================

pub fn parse_board(s: &str) -> Result<Board> {
    s.parse::<Board>()
        .with_context(|| format!("Failed to parse board '{}'", s))
}

fn build_report(board: &Board, timed: &TimedSearch) -> MoveReport {
    MoveReport {
        board: board.to_string(),
        to_move: board.active_player(),
        result: board.result(),
        action: timed.report.map(|r| r.action),
        value: timed.report.map(|r| r.value),
        nodes: timed.report.map(|r| r.nodes),
        elapsed_ms: millis(timed.elapsed),
    }
}

// ============================================================================
// LEVEL 3 - FORMATTING
// ============================================================================

fn print_text_report(board: &Board, report: &MoveReport) {
    println!("{}\n", board.render());

    match (report.action, report.value) {
        (Some(action), Some(value)) => {
            println!("Best move for {}: {}", report.to_move, action);
            println!("Outcome with perfect play: {}", describe_value(value));
            if let Some(nodes) = report.nodes {
                println!("Nodes searched: {}", nodes);
            }
        }
        _ => println!("Game over: {}", describe_result(report.result)),
    }
}

// ============================================================================
// TESTS
// ============================================================================
