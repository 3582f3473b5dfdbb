//! Shared text formatting for command output

use tictactoe_core::{GameResult, Player};

pub fn describe_result(result: GameResult) -> &'static str {
    match result {
        GameResult::Ongoing => "in progress",
        GameResult::XWins => "X wins",
        GameResult::OWins => "O wins",
        GameResult::Draw => "draw",
    }
}

/// Outcome promised by a minimax value under perfect play
pub fn describe_value(value: i32) -> &'static str {
    match value.signum() {
        1 => "X wins",
        -1 => "O wins",
        _ => "draw",
    }
}

/// Parse a `--human` style side name
pub fn parse_player(s: &str) -> Result<Player, String> {
    match s.trim() {
        "x" | "X" => Ok(Player::X),
        "o" | "O" => Ok(Player::O),
        other => Err(format!("unknown side '{}' (expected x or o)", other)),
    }
}
