//! Minimax search with alpha-beta pruning

use serde::{Deserialize, Serialize};

use crate::board::{Action, Board, Player};

// ============================================================================
// CONSTANTS
// ============================================================================

/// Initial alpha; below every utility
const NEG_INF: i32 = i32::MIN;

/// Initial beta; above every utility
const POS_INF: i32 = i32::MAX;

// ============================================================================
// PUBLIC API
// ============================================================================

/// Outcome of a root search
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchReport {
    /// Chosen move
    pub action: Action,
    /// Minimax value of the chosen move (+1 X wins, -1 O wins, 0 draw)
    pub value: i32,
    /// Boards visited, root included
    pub nodes: u64,
}

/// Optimal move for the player to move, or `None` on a terminal board
pub fn best_move(board: &Board) -> Option<Action> {
    search(board).map(|report| report.action)
}

/// Alpha-beta search from `board`. `None` if the game is already over.
///
/// Ties keep the earliest move in [`Board::legal_actions`] order.
pub fn search(board: &Board) -> Option<SearchReport> {
    let mut ab = AlphaBeta::default();
    let chosen = choose(board, |child| ab.value(child));
    chosen.map(|(action, value)| SearchReport {
        action,
        value,
        nodes: ab.nodes + 1,
    })
}

/// Alpha-beta value of any board; the utility itself when terminal
pub fn minimax_value(board: &Board) -> i32 {
    AlphaBeta::default().value(board)
}

/// Plain minimax without pruning. Same tie-breaking as [`search`].
pub fn exhaustive_best_move(board: &Board) -> Option<SearchReport> {
    let mut nodes = 0;
    let chosen = choose(board, |child| exhaustive(child, &mut nodes));
    chosen.map(|(action, value)| SearchReport {
        action,
        value,
        nodes: nodes + 1,
    })
}

/// Value of `board` by plain minimax without pruning
pub fn exhaustive_value(board: &Board) -> i32 {
    let mut nodes = 0;
    exhaustive(board, &mut nodes)
}

/// Let the engine play both sides until the game ends
pub fn play_game(initial: Board) -> (Board, Vec<Action>) {
    let mut board = initial;
    let mut history = Vec::new();

    while let Some(action) = best_move(&board) {
        let Ok(next) = board.apply(action) else {
            break;
        };
        board = next;
        history.push(action);
    }

    (board, history)
}

// ============================================================================
// ROOT SELECTION
// ============================================================================

/// Pick the move with the strictly best child value for the player to move.
///
/// Each child is evaluated with a fresh full window so its value is exact.
fn choose(board: &Board, mut eval: impl FnMut(&Board) -> i32) -> Option<(Action, i32)> {
    if board.is_terminal() {
        return None;
    }

    let maximizing = board.active_player() == Player::X;
    let mut best: Option<(Action, i32)> = None;

    for (action, child) in board.successors() {
        let value = eval(&child);
        let improves = match best {
            None => true,
            Some((_, v)) if maximizing => value > v,
            Some((_, v)) => value < v,
        };
        if improves {
            best = Some((action, value));
        }
    }

    best
}

// ============================================================================
// ALPHA-BETA
// ============================================================================

#[derive(Default)]
struct AlphaBeta {
    nodes: u64,
}

impl AlphaBeta {
    /// Value with a full window, dispatched on the player to move
    fn value(&mut self, board: &Board) -> i32 {
        match board.active_player() {
            Player::X => self.max_value(board, NEG_INF, POS_INF),
            Player::O => self.min_value(board, NEG_INF, POS_INF),
        }
    }

    fn max_value(&mut self, board: &Board, mut alpha: i32, beta: i32) -> i32 {
        self.nodes += 1;
        if let Ok(utility) = board.utility() {
            return utility;
        }

        let mut v = NEG_INF;
        for (_, child) in board.successors() {
            v = v.max(self.min_value(&child, alpha, beta));
            alpha = alpha.max(v);
            if alpha >= beta {
                break;
            }
        }
        v
    }

    fn min_value(&mut self, board: &Board, alpha: i32, mut beta: i32) -> i32 {
        self.nodes += 1;
        if let Ok(utility) = board.utility() {
            return utility;
        }

        let mut v = POS_INF;
        for (_, child) in board.successors() {
            v = v.min(self.max_value(&child, alpha, beta));
            beta = beta.min(v);
            if beta <= alpha {
                break;
            }
        }
        v
    }
}

// ============================================================================
// EXHAUSTIVE MINIMAX
// ============================================================================

fn exhaustive(board: &Board, nodes: &mut u64) -> i32 {
    *nodes += 1;
    if let Ok(utility) = board.utility() {
        return utility;
    }

    let values = board.successors().map(|(_, child)| exhaustive(&child, nodes));
    let best = match board.active_player() {
        Player::X => values.max(),
        Player::O => values.min(),
    };
    // Non-terminal boards always have a successor
    best.unwrap_or(0)
}

// ============================================================================
// TESTS
// ============================================================================
