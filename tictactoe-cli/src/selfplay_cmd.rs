//! Selfplay command - the engine plays both sides
//!
//! ## Architecture
//!
//! - Level 1: run() - orchestration
//! - Level 2: play_out(), report_game()
//! - Level 3: formatting utilities

use anyhow::{Context, Result};
use clap::Args;
use serde::Serialize;

use tictactoe_core::{Action, Board, GameResult, Player};

use crate::best_cmd::parse_board;
use crate::report::{describe_result, describe_value};
use crate::timing::{millis, timed_search};

// ============================================================================
// COMMAND ARGUMENTS
// ============================================================================

#[derive(Args)]
pub struct SelfplayArgs {
    /// Starting board (defaults to the empty board)
    #[arg(long, value_name = "BOARD")]
    pub board: Option<String>,

    /// Output results as JSON
    #[arg(long)]
    pub json: bool,
}

/// One engine move
#[derive(Clone, Debug, Serialize)]
struct MoveRecord {
    player: Player,
    action: Action,
    value: i32,
    nodes: u64,
    elapsed_ms: f64,
}

/// A finished game
#[derive(Clone, Debug, Serialize)]
struct GameRecord {
    start: String,
    moves: Vec<MoveRecord>,
    #[serde(rename = "final")]
    final_board: String,
    result: GameResult,
}

// ============================================================================
// LEVEL 1 - ORCHESTRATION
// ============================================================================

/// Run selfplay command
pub fn run(args: SelfplayArgs) -> Result<()> {
    let start = match &args.board {
        Some(s) => parse_board(s)?,
        None => Board::initial(),
    };

    tracing::info!("Starting self-play from {}", start);

    let record = play_out(start)?;

    tracing::info!(
        "Game finished: {} after {} moves",
        describe_result(record.result),
        record.moves.len()
    );

    if args.json {
        println!("{}", serde_json::to_string_pretty(&record)?);
    } else {
        print_text_record(&start, &record);
    }

    Ok(())
}

// ============================================================================
// LEVEL 2 - PHASES
// ============================================================================

/// Play the engine against itself until the board is terminal
fn play_out(start: Board) -> Result<GameRecord> {
    let mut board = start;
    let mut moves = Vec::new();

    loop {
        let timed = timed_search(&board);
        let Some(report) = timed.report else {
            break;
        };

        let player = board.active_player();
        board = board
            .apply(report.action)
            .with_context(|| format!("Engine produced an illegal move {}", report.action))?;

        moves.push(MoveRecord {
            player,
            action: report.action,
            value: report.value,
            nodes: report.nodes,
            elapsed_ms: millis(timed.elapsed),
        });
    }

    Ok(GameRecord {
        start: start.to_string(),
        moves,
        final_board: board.to_string(),
        result: board.result(),
    })
}

// ============================================================================
// LEVEL 3 - FORMATTING
// ============================================================================

fn print_text_record(start: &Board, record: &GameRecord) {
    let mut board = *start;
    println!("{}\n", board.render());

    for (i, mv) in record.moves.iter().enumerate() {
        if let Ok(next) = board.apply(mv.action) {
            board = next;
        }
        println!(
            "Move {}: {} plays {} (expects {}, {} nodes)",
            i + 1,
            mv.player,
            mv.action,
            describe_value(mv.value),
            mv.nodes
        );
        println!("{}\n", board.render());
    }

    println!("Result: {}", describe_result(record.result));
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_play_out_from_empty_is_draw() {
        let record = play_out(Board::initial()).unwrap();
        assert_eq!(record.result, GameResult::Draw);
        assert_eq!(record.moves.len(), 9);
        assert_eq!(record.moves[0].player, Player::X);
        assert_eq!(record.moves[1].player, Player::O);
        assert!(record.moves.iter().all(|m| m.value == 0));
    }

    #[test]
    fn test_play_out_terminal_start() {
        let start = parse_board("XXX/OO./...").unwrap();
        let record = play_out(start).unwrap();
        assert!(record.moves.is_empty());
        assert_eq!(record.result, GameResult::XWins);
        assert_eq!(record.final_board, record.start);
    }

    #[test]
    fn test_play_out_converts_win() {
        let start = parse_board("OXO/.O./XX.").unwrap();
        let record = play_out(start).unwrap();
        assert_eq!(record.result, GameResult::XWins);
        assert_eq!(record.moves.len(), 1);
    }
}
