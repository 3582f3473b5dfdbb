//! Play command - a human against the engine on stdin/stdout
//!
//! ## Architecture
//!
//! - Level 1: run() - wire up stdio
//! - Level 2: play() - game loop
//! - Level 3: human_turn(), engine_turn()

use std::io::{self, BufRead, Write};

use anyhow::{bail, Context, Result};
use clap::Args;

use tictactoe_core::{Action, Board, Error, GameResult, Player};

use crate::report::{describe_result, parse_player};
use crate::timing::timed_search;

// ============================================================================
// COMMAND ARGUMENTS
// ============================================================================

#[derive(Args)]
pub struct PlayArgs {
    /// Side played by the human (x moves first)
    #[arg(long, default_value = "x", value_parser = parse_player)]
    pub human: Player,
}

/// What the human typed
enum HumanInput {
    Move(Board),
    Quit,
}

// ============================================================================
// LEVEL 1 - ORCHESTRATION
// ============================================================================

/// Run play command
pub fn run(args: PlayArgs) -> Result<()> {
    let stdin = io::stdin();
    let mut input = stdin.lock();
    let mut output = io::stdout();

    tracing::info!("Starting game, human plays {}", args.human);

    let result = play(&mut input, &mut output, args.human)?;

    tracing::info!("Game ended: {}", describe_result(result));
    Ok(())
}

// ============================================================================
// LEVEL 2 - GAME LOOP
// ============================================================================

/// Alternate human and engine moves until the game ends or the human quits.
///
/// Returns the result of the last board; `Ongoing` if the human quit.
pub fn play<R: BufRead, W: Write>(input: &mut R, output: &mut W, human: Player) -> Result<GameResult> {
    let mut board = Board::initial();

    while !board.is_terminal() {
        writeln!(output, "\n{}\n", board.render())?;

        if board.active_player() == human {
            match human_turn(&board, input, output)? {
                HumanInput::Move(next) => board = next,
                HumanInput::Quit => return Ok(GameResult::Ongoing),
            }
        } else {
            board = engine_turn(&board, output)?;
        }
    }

    writeln!(output, "\n{}\n", board.render())?;
    writeln!(output, "Game over: {}", describe_result(board.result()))?;

    Ok(board.result())
}

// ============================================================================
// LEVEL 3 - TURNS
// ============================================================================

/// Prompt until the human enters a legal move or quits
fn human_turn<R: BufRead, W: Write>(board: &Board, input: &mut R, output: &mut W) -> Result<HumanInput> {
    loop {
        write!(output, "Your move as {} (row,col or q): ", board.active_player())?;
        output.flush()?;

        let mut line = String::new();
        if input.read_line(&mut line).context("Failed to read move")? == 0 {
            bail!("Input closed before the game ended");
        }

        let line = line.trim();
        if line.eq_ignore_ascii_case("q") || line.eq_ignore_ascii_case("quit") {
            return Ok(HumanInput::Quit);
        }

        match try_move(board, line) {
            Ok(next) => return Ok(HumanInput::Move(next)),
            Err(e) => {
                tracing::warn!("Rejected move '{}': {}", line, e);
                writeln!(output, "Invalid move: {}", e)?;
            }
        }
    }
}

fn try_move(board: &Board, line: &str) -> Result<Board, Error> {
    let action: Action = line.parse()?;
    board.apply(action)
}

fn engine_turn<W: Write>(board: &Board, output: &mut W) -> Result<Board> {
    let timed = timed_search(board);
    let report = timed
        .report
        .context("Engine asked to move on a finished board")?;

    writeln!(output, "Engine ({}) plays {}", board.active_player(), report.action)?;

    board
        .apply(report.action)
        .with_context(|| format!("Engine produced an illegal move {}", report.action))
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn run_script(script: &str, human: Player) -> (Result<GameResult>, String) {
        let mut input = Cursor::new(script.as_bytes().to_vec());
        let mut output = Vec::new();
        let result = play(&mut input, &mut output, human);
        (result, String::from_utf8(output).unwrap())
    }

    #[test]
    fn test_quit_immediately() {
        let (result, output) = run_script("q\n", Player::X);
        assert_eq!(result.unwrap(), GameResult::Ongoing);
        assert!(output.contains("Your move as X"));
    }

    #[test]
    fn test_engine_moves_first_when_human_is_o() {
        let (result, output) = run_script("quit\n", Player::O);
        assert_eq!(result.unwrap(), GameResult::Ongoing);
        assert!(output.contains("Engine (X) plays"));
        assert!(output.contains("Your move as O"));
    }

    #[test]
    fn test_invalid_input_reprompts() {
        let (result, output) = run_script("9,9\nhello\n1,1\nq\n", Player::X);
        assert_eq!(result.unwrap(), GameResult::Ongoing);
        assert_eq!(output.matches("Invalid move").count(), 2);
        assert!(output.contains("Engine (O) plays"));
    }

    #[test]
    fn test_occupied_cell_rejected() {
        // Engine answers a center opening with a corner; retaking the
        // center must be refused
        let (result, output) = run_script("1,1\n1,1\nq\n", Player::X);
        assert_eq!(result.unwrap(), GameResult::Ongoing);
        assert!(output.contains("already occupied"));
    }

    #[test]
    fn test_closed_input_is_error() {
        let (result, _) = run_script("", Player::X);
        assert!(result.is_err());
    }

    #[test]
    fn test_human_cannot_beat_engine() {
        // Try every cell in order; occupied ones are rejected and skipped
        let script = "0,0\n0,1\n0,2\n1,0\n1,1\n1,2\n2,0\n2,1\n2,2\n";
        let (result, output) = run_script(script, Player::X);
        let result = result.unwrap();
        assert_ne!(result, GameResult::XWins);
        assert_ne!(result, GameResult::Ongoing);
        assert!(output.contains("Game over"));
    }
}
