//! Error types for the tic-tac-toe core

use std::fmt;

use thiserror::Error;

/// Why an action was rejected by [`Board::apply`](crate::Board::apply)
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ActionFault {
    /// Row or column outside 0..=2
    OutOfBounds,
    /// Target cell already holds a mark
    Occupied,
}

impl fmt::Display for ActionFault {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ActionFault::OutOfBounds => f.write_str("cell is off the board"),
            ActionFault::Occupied => f.write_str("cell is already occupied"),
        }
    }
}

/// Main error type for the tic-tac-toe core
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum Error {
    #[error("invalid action ({row}, {col}): {fault}")]
    InvalidAction {
        row: usize,
        col: usize,
        fault: ActionFault,
    },

    #[error("utility is only defined for terminal boards")]
    NotTerminal,

    #[error("board has {got} cells, expected {expected}")]
    InvalidBoardLength { expected: usize, got: usize },

    #[error("invalid character '{character}' at cell {position}")]
    InvalidCellCharacter { character: char, position: usize },

    #[error("invalid piece counts: X={x_count}, O={o_count} (must be equal or X ahead by 1)")]
    InvalidPieceCounts { x_count: usize, o_count: usize },

    #[error("invalid action '{input}' (expected 'row,col' with values 0-2)")]
    InvalidActionFormat { input: String },
}

/// Convenience type alias for Results using the crate's Error type
pub type Result<T> = std::result::Result<T, Error>;
