//! Tic-Tac-Toe Core - Game model and perfect-play search
//!
//! This crate provides the core game logic:
//! - Immutable 3x3 board with derived turn order
//! - Legal move generation and terminal detection
//! - Minimax search with alpha-beta pruning
//! - Plain minimax oracle for verifying the pruned search

pub mod board;
pub mod ai;
pub mod error;

// Re-exports for convenient access
pub use board::{Action, Board, Cell, GameResult, Player, BOARD_SIZE, CELL_COUNT, WINNING_LINES};
pub use ai::{best_move, minimax_value, play_game, search, SearchReport};
pub use error::{ActionFault, Error, Result};
