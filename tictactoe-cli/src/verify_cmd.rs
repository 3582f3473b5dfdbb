//! Verify command - check the pruned search against plain minimax
//!
//! ## Architecture
//!
//! - Level 1: run() - orchestration
//! - Level 2: collect_reachable(), verify_boards(), report_results()
//! - Level 3: formatting utilities

use anyhow::{bail, Result};
use clap::Args;
use rustc_hash::FxHashSet;
use serde::Serialize;

use tictactoe_core::ai::{exhaustive_best_move, search, SearchReport};
use tictactoe_core::{Board, GameResult};

use crate::best_cmd::parse_board;

// ============================================================================
// COMMAND ARGUMENTS
// ============================================================================

#[derive(Args)]
pub struct VerifyArgs {
    /// Root board (defaults to the empty board)
    #[arg(long, value_name = "BOARD")]
    pub board: Option<String>,

    /// Output results as JSON
    #[arg(long)]
    pub json: bool,
}

/// A board where the two searches disagree
#[derive(Clone, Debug, Serialize)]
struct Mismatch {
    board: String,
    pruned: SearchReport,
    exhaustive: SearchReport,
}

/// Aggregated verification results
#[derive(Clone, Debug, Default, Serialize)]
struct VerifyResults {
    reachable: usize,
    terminal: usize,
    x_wins: usize,
    o_wins: usize,
    draws: usize,
    checked: usize,
    pruned_nodes: u64,
    exhaustive_nodes: u64,
    mismatches: Vec<Mismatch>,
}

// ============================================================================
// LEVEL 1 - ORCHESTRATION
// ============================================================================

/// Run verify command
pub fn run(args: VerifyArgs) -> Result<()> {
    let root = match &args.board {
        Some(s) => parse_board(s)?,
        None => Board::initial(),
    };

    let boards = collect_reachable(root);
    tracing::info!("Collected {} reachable boards from {}", boards.len(), root);

    let results = verify_boards(&boards);

    if args.json {
        println!("{}", serde_json::to_string_pretty(&results)?);
    } else {
        print_text_results(&results);
    }

    if !results.mismatches.is_empty() {
        bail!(
            "{} boards where alpha-beta disagrees with plain minimax",
            results.mismatches.len()
        );
    }

    Ok(())
}

// ============================================================================
// LEVEL 2 - PHASES
// ============================================================================

/// Every distinct board reachable from `root`, root included
fn collect_reachable(root: Board) -> Vec<Board> {
    let mut seen = FxHashSet::default();
    let mut stack = vec![root];
    let mut boards = Vec::new();

    seen.insert(root);
    while let Some(board) = stack.pop() {
        boards.push(board);
        if board.is_terminal() {
            continue;
        }
        for (_, child) in board.successors() {
            if seen.insert(child) {
                stack.push(child);
            }
        }
    }

    boards
}

fn verify_boards(boards: &[Board]) -> VerifyResults {
    let mut results = VerifyResults {
        reachable: boards.len(),
        ..Default::default()
    };

    for board in boards {
        match board.result() {
            GameResult::XWins => results.x_wins += 1,
            GameResult::OWins => results.o_wins += 1,
            GameResult::Draw => results.draws += 1,
            GameResult::Ongoing => {}
        }

        let (Some(pruned), Some(exhaustive)) = (search(board), exhaustive_best_move(board)) else {
            results.terminal += 1;
            continue;
        };

        results.checked += 1;
        results.pruned_nodes += pruned.nodes;
        results.exhaustive_nodes += exhaustive.nodes;

        if pruned.action != exhaustive.action || pruned.value != exhaustive.value {
            tracing::warn!(
                "Mismatch on {}: pruned {} ({}) vs exhaustive {} ({})",
                board,
                pruned.action,
                pruned.value,
                exhaustive.action,
                exhaustive.value
            );
            results.mismatches.push(Mismatch {
                board: board.to_string(),
                pruned,
                exhaustive,
            });
        }
    }

    results
}

// ============================================================================
// LEVEL 3 - FORMATTING
// ============================================================================

fn print_text_results(results: &VerifyResults) {
    println!("\n=== Verification Results ===");
    println!("Reachable boards: {}", results.reachable);
    println!(
        "Terminal boards:  {} (X wins {}, O wins {}, draws {})",
        results.terminal, results.x_wins, results.o_wins, results.draws
    );
    println!("Boards checked:   {}", results.checked);
    println!(
        "Nodes searched:   {} pruned vs {} exhaustive ({:.1}%)",
        results.pruned_nodes,
        results.exhaustive_nodes,
        if results.exhaustive_nodes > 0 {
            results.pruned_nodes as f64 / results.exhaustive_nodes as f64 * 100.0
        } else {
            0.0
        }
    );
    println!("Mismatches:       {}", results.mismatches.len());

    for m in &results.mismatches {
        println!(
            "  {}: pruned {} ({}) vs exhaustive {} ({})",
            m.board, m.pruned.action, m.pruned.value, m.exhaustive.action, m.exhaustive.value
        );
    }
}

// ============================================================================
// TESTS
// ============================================================================
