//! Board state, turn derivation and terminal detection

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{ActionFault, Error, Result};

// ============================================================================
// CONSTANTS
// ============================================================================

/// Board side length
pub const BOARD_SIZE: usize = 3;

/// Number of cells on the board
pub const CELL_COUNT: usize = BOARD_SIZE * BOARD_SIZE;

/// Winning lines as (row, col) triples, in scan order:
/// rows, then columns, then main diagonal, then anti-diagonal
pub const WINNING_LINES: [[(usize, usize); 3]; 8] = [
    [(0, 0), (0, 1), (0, 2)],
    [(1, 0), (1, 1), (1, 2)],
    [(2, 0), (2, 1), (2, 2)],
    [(0, 0), (1, 0), (2, 0)],
    [(0, 1), (1, 1), (2, 1)],
    [(0, 2), (1, 2), (2, 2)],
    [(0, 0), (1, 1), (2, 2)],
    [(0, 2), (1, 1), (2, 0)],
];

// ============================================================================
// CORE TYPES
// ============================================================================

/// Player mark. X always moves first.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Player {
    X,
    O,
}

impl Player {
    pub fn opponent(self) -> Self {
        match self {
            Player::X => Player::O,
            Player::O => Player::X,
        }
    }

    pub fn symbol(self) -> char {
        match self {
            Player::X => 'X',
            Player::O => 'O',
        }
    }
}

impl fmt::Display for Player {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.symbol())
    }
}

/// Contents of a single cell
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Cell {
    #[default]
    Empty,
    X,
    O,
}

impl Cell {
    /// The player owning this cell, if any
    pub fn player(self) -> Option<Player> {
        match self {
            Cell::Empty => None,
            Cell::X => Some(Player::X),
            Cell::O => Some(Player::O),
        }
    }

    pub fn symbol(self) -> char {
        match self {
            Cell::Empty => '.',
            Cell::X => 'X',
            Cell::O => 'O',
        }
    }

    fn from_symbol(c: char) -> Option<Self> {
        match c {
            'X' | 'x' => Some(Cell::X),
            'O' | 'o' => Some(Cell::O),
            '.' | '-' | '_' => Some(Cell::Empty),
            _ => None,
        }
    }
}

impl From<Player> for Cell {
    fn from(player: Player) -> Self {
        match player {
            Player::X => Cell::X,
            Player::O => Cell::O,
        }
    }
}

/// A (row, col) coordinate to mark.
///
/// Actions are not validated on construction: whether one is legal depends
/// on the board it is applied to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Action {
    pub row: usize,
    pub col: usize,
}

impl Action {
    pub const fn new(row: usize, col: usize) -> Self {
        Self { row, col }
    }

    /// Check if this coordinate is on the board
    pub fn is_valid(&self) -> bool {
        self.row < BOARD_SIZE && self.col < BOARD_SIZE
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.row, self.col)
    }
}

impl FromStr for Action {
    type Err = Error;

    /// Parse `"r,c"` or `"r c"`
    fn from_str(s: &str) -> Result<Self> {
        let invalid = || Error::InvalidActionFormat {
            input: s.to_string(),
        };

        let parts: Vec<&str> = s
            .split(|c: char| c == ',' || c.is_whitespace())
            .filter(|p| !p.is_empty())
            .collect();

        match parts.as_slice() {
            [row, col] => {
                let row = row.parse::<usize>().map_err(|_| invalid())?;
                let col = col.parse::<usize>().map_err(|_| invalid())?;
                let action = Action::new(row, col);
                if action.is_valid() {
                    Ok(action)
                } else {
                    Err(invalid())
                }
            }
            _ => Err(invalid()),
        }
    }
}

/// Game outcome as seen from a single board
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameResult {
    Ongoing,
    XWins,
    OWins,
    Draw,
}

// ============================================================================
// BOARD
// ============================================================================

/// Immutable 3x3 board snapshot.
///
/// The player to move is never stored; it is derived from the mark counts,
/// so every board produced by [`Board::apply`] keeps X's count equal to or
/// one ahead of O's.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Board {
    cells: [[Cell; BOARD_SIZE]; BOARD_SIZE],
}

impl Board {
    // ========================================================================
    // CONSTRUCTORS
    // ========================================================================

    /// The empty starting board
    pub fn initial() -> Self {
        Self::default()
    }

    /// Build a board from raw cells without checking the alternation invariant
    pub fn from_cells(cells: [[Cell; BOARD_SIZE]; BOARD_SIZE]) -> Self {
        Self { cells }
    }

    // ========================================================================
    // ACCESSORS
    // ========================================================================

    pub fn cells(&self) -> &[[Cell; BOARD_SIZE]; BOARD_SIZE] {
        &self.cells
    }

    /// Cell at `action`, or `None` if the coordinate is off the board
    pub fn cell(&self, action: Action) -> Option<Cell> {
        if action.is_valid() {
            Some(self.cells[action.row][action.col])
        } else {
            None
        }
    }

    /// Number of marks placed by `player`
    pub fn count(&self, player: Player) -> usize {
        let target = Cell::from(player);
        self.iter_cells().filter(|&c| c == target).count()
    }

    pub fn empty_count(&self) -> usize {
        self.iter_cells().filter(|&c| c == Cell::Empty).count()
    }

    fn iter_cells(&self) -> impl Iterator<Item = Cell> + '_ {
        self.cells.iter().flatten().copied()
    }

    // ========================================================================
    // RULES
    // ========================================================================

    /// Player to move, derived from mark counts.
    ///
    /// Does not validate the alternation invariant; on a board that breaks
    /// it the answer is meaningless.
    pub fn active_player(&self) -> Player {
        if self.count(Player::X) > self.count(Player::O) {
            Player::O
        } else {
            Player::X
        }
    }

    /// All empty cells, in row-major order
    pub fn legal_actions(&self) -> Vec<Action> {
        let mut actions = Vec::with_capacity(CELL_COUNT);
        for (row, cells) in self.cells.iter().enumerate() {
            for (col, cell) in cells.iter().enumerate() {
                if *cell == Cell::Empty {
                    actions.push(Action::new(row, col));
                }
            }
        }
        actions
    }

    /// Successor board with the active player's mark at `action`
    pub fn apply(&self, action: Action) -> Result<Board> {
        match self.cell(action) {
            None => Err(Error::InvalidAction {
                row: action.row,
                col: action.col,
                fault: ActionFault::OutOfBounds,
            }),
            Some(Cell::Empty) => {
                let mut next = *self;
                next.cells[action.row][action.col] = Cell::from(self.active_player());
                Ok(next)
            }
            Some(_) => Err(Error::InvalidAction {
                row: action.row,
                col: action.col,
                fault: ActionFault::Occupied,
            }),
        }
    }

    /// Every legal action paired with the board it produces
    pub fn successors(&self) -> impl Iterator<Item = (Action, Board)> + '_ {
        self.legal_actions()
            .into_iter()
            .filter_map(move |action| self.apply(action).ok().map(|next| (action, next)))
    }

    /// Owner of the first complete line in [`WINNING_LINES`] order
    pub fn winner(&self) -> Option<Player> {
        WINNING_LINES.iter().find_map(|&line| {
            let [a, b, c] = line.map(|(row, col)| self.cells[row][col]);
            if a == b && b == c {
                a.player()
            } else {
                None
            }
        })
    }

    /// True once a line is complete or no empty cell remains
    pub fn is_terminal(&self) -> bool {
        self.winner().is_some() || self.empty_count() == 0
    }

    /// +1 if X won, -1 if O won, 0 for a draw.
    ///
    /// Fails with [`Error::NotTerminal`] while the game is still running.
    pub fn utility(&self) -> Result<i32> {
        match self.result() {
            GameResult::XWins => Ok(1),
            GameResult::OWins => Ok(-1),
            GameResult::Draw => Ok(0),
            GameResult::Ongoing => Err(Error::NotTerminal),
        }
    }

    pub fn result(&self) -> GameResult {
        match self.winner() {
            Some(Player::X) => GameResult::XWins,
            Some(Player::O) => GameResult::OWins,
            None if self.empty_count() == 0 => GameResult::Draw,
            None => GameResult::Ongoing,
        }
    }

    // ========================================================================
    // FORMATTING
    // ========================================================================

    /// Multi-line grid for terminal display
    pub fn render(&self) -> String {
        let rows: Vec<String> = self
            .cells
            .iter()
            .map(|row| {
                row.iter()
                    .map(|c| match c {
                        Cell::Empty => " ".to_string(),
                        other => other.symbol().to_string(),
                    })
                    .collect::<Vec<_>>()
                    .join(" | ")
            })
            .map(|row| format!(" {} ", row))
            .collect();
        rows.join("\n---+---+---\n")
    }
}

impl fmt::Display for Board {
    /// Compact form, e.g. `X.O/.X./..O`
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, row) in self.cells.iter().enumerate() {
            if i > 0 {
                f.write_str("/")?;
            }
            for cell in row {
                write!(f, "{}", cell.symbol())?;
            }
        }
        Ok(())
    }
}

impl FromStr for Board {
    type Err = Error;

    /// Parse nine row-major cell characters; `/` and whitespace are ignored
    fn from_str(s: &str) -> Result<Self> {
        let mut parsed = Vec::with_capacity(CELL_COUNT);
        for c in s.chars().filter(|c| *c != '/' && !c.is_whitespace()) {
            let cell = Cell::from_symbol(c).ok_or(Error::InvalidCellCharacter {
                character: c,
                position: parsed.len(),
            })?;
            parsed.push(cell);
        }

        if parsed.len() != CELL_COUNT {
            return Err(Error::InvalidBoardLength {
                expected: CELL_COUNT,
                got: parsed.len(),
            });
        }

        let mut cells = [[Cell::Empty; BOARD_SIZE]; BOARD_SIZE];
        for (i, cell) in parsed.into_iter().enumerate() {
            cells[i / BOARD_SIZE][i % BOARD_SIZE] = cell;
        }
        let board = Board::from_cells(cells);

        let x_count = board.count(Player::X);
        let o_count = board.count(Player::O);
        if x_count != o_count && x_count != o_count + 1 {
            return Err(Error::InvalidPieceCounts { x_count, o_count });
        }

        Ok(board)
    }
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn board(s: &str) -> Board {
        s.parse().unwrap()
    }

    #[test]
    fn test_initial_board() {
        let b = Board::initial();
        assert_eq!(b.empty_count(), 9);
        assert_eq!(b.active_player(), Player::X);
        assert_eq!(b.legal_actions().len(), 9);
        assert_eq!(b.result(), GameResult::Ongoing);
        assert!(!b.is_terminal());
    }

    #[test]
    fn test_active_player_alternates() {
        let mut b = Board::initial();
        let mut expected = Player::X;
        for action in [(1, 1), (0, 0), (2, 2), (0, 2), (0, 1)] {
            assert_eq!(b.active_player(), expected);
            b = b.apply(Action::new(action.0, action.1)).unwrap();
            expected = expected.opponent();
        }
        assert_eq!(b.count(Player::X), 3);
        assert_eq!(b.count(Player::O), 2);
    }

    #[test]
    fn test_apply_places_active_mark() {
        let b = Board::initial().apply(Action::new(0, 2)).unwrap();
        assert_eq!(b.cell(Action::new(0, 2)), Some(Cell::X));
        let b = b.apply(Action::new(2, 0)).unwrap();
        assert_eq!(b.cell(Action::new(2, 0)), Some(Cell::O));
    }

    #[test]
    fn test_apply_occupied_leaves_board_unchanged() {
        let b = board("X../.O./...");
        let before = b;
        let err = b.apply(Action::new(1, 1)).unwrap_err();
        assert_eq!(
            err,
            Error::InvalidAction {
                row: 1,
                col: 1,
                fault: ActionFault::Occupied
            }
        );
        assert_eq!(b, before);
    }

    #[test]
    fn test_apply_out_of_bounds() {
        let err = Board::initial().apply(Action::new(3, 0)).unwrap_err();
        assert!(matches!(
            err,
            Error::InvalidAction {
                fault: ActionFault::OutOfBounds,
                ..
            }
        ));
    }

    #[test]
    fn test_apply_does_not_mutate_parent() {
        let parent = board("X../.../...");
        let child = parent.apply(Action::new(2, 2)).unwrap();
        assert_eq!(parent.cell(Action::new(2, 2)), Some(Cell::Empty));
        assert_ne!(parent, child);
    }

    #[test]
    fn test_legal_actions_are_empty_cells() {
        let b = board("XO./.X./..O");
        let actions = b.legal_actions();
        assert_eq!(actions.len(), 5);
        for a in &actions {
            assert_eq!(b.cell(*a), Some(Cell::Empty));
        }
        assert_eq!(actions[0], Action::new(0, 2));
    }

    #[test]
    fn test_legal_actions_full_board() {
        assert!(board("XOX/XOO/OXX").legal_actions().is_empty());
    }

    #[test]
    fn test_winner_every_line() {
        let cases = [
            ("XXX/OO./...", Player::X),
            ("OO./XXX/...", Player::X),
            ("OO./.../XXX", Player::X),
            ("OX./OX./O.X", Player::O),
            ("XO./XO./.OX", Player::O),
            ("X.O/XXO/..O", Player::O),
            ("XOO/.X./..X", Player::X),
            ("OOX/.X./X..", Player::X),
        ];
        for (s, expected) in cases {
            assert_eq!(board(s).winner(), Some(expected), "board {}", s);
        }
    }

    #[test]
    fn test_no_winner() {
        assert_eq!(Board::initial().winner(), None);
        assert_eq!(board("XOX/XOO/OXX").winner(), None);
        assert_eq!(board("XX./OO./...").winner(), None);
    }

    #[test]
    fn test_winner_scan_order() {
        // Unreachable board with two completed lines: rows are scanned first
        let b = Board::from_cells([
            [Cell::O, Cell::O, Cell::O],
            [Cell::X, Cell::X, Cell::X],
            [Cell::Empty, Cell::Empty, Cell::Empty],
        ]);
        assert_eq!(b.winner(), Some(Player::O));

        // Column 0 is scanned before column 1
        let b = Board::from_cells([
            [Cell::X, Cell::O, Cell::Empty],
            [Cell::X, Cell::O, Cell::Empty],
            [Cell::X, Cell::O, Cell::Empty],
        ]);
        assert_eq!(b.winner(), Some(Player::X));
    }

    #[test]
    fn test_utility() {
        assert_eq!(board("XXX/OO./...").utility(), Ok(1));
        assert_eq!(board("OX./OX./O.X").utility(), Ok(-1));
        assert_eq!(board("XOX/XOO/OXX").utility(), Ok(0));
        assert_eq!(Board::initial().utility(), Err(Error::NotTerminal));
    }

    #[test]
    fn test_result() {
        assert_eq!(board("XXX/OO./...").result(), GameResult::XWins);
        assert_eq!(board("XO./XO./.OX").result(), GameResult::OWins);
        assert_eq!(board("XOX/XOO/OXX").result(), GameResult::Draw);
        assert_eq!(board("XO./.../...").result(), GameResult::Ongoing);
    }

    #[test]
    fn test_is_terminal() {
        assert!(board("XXX/OO./...").is_terminal());
        assert!(board("XOX/XOO/OXX").is_terminal());
        assert!(!board("XOX/XOO/OX.").is_terminal());
    }

    #[test]
    fn test_display_round_trip() {
        let b = board("x-o/ .X. /..o");
        assert_eq!(b.to_string(), "X.O/.X./..O");
        assert_eq!(board(&b.to_string()), b);
    }

    #[test]
    fn test_parse_errors() {
        assert_eq!(
            "X.O/...".parse::<Board>(),
            Err(Error::InvalidBoardLength { expected: 9, got: 6 })
        );
        assert_eq!(
            "X.Z/.../...".parse::<Board>(),
            Err(Error::InvalidCellCharacter {
                character: 'Z',
                position: 2
            })
        );
        assert_eq!(
            "XX./.../...".parse::<Board>(),
            Err(Error::InvalidPieceCounts { x_count: 2, o_count: 0 })
        );
        assert_eq!(
            "O../.../...".parse::<Board>(),
            Err(Error::InvalidPieceCounts { x_count: 0, o_count: 1 })
        );
    }

    #[test]
    fn test_parse_action() {
        assert_eq!("1,2".parse::<Action>(), Ok(Action::new(1, 2)));
        assert_eq!(" 0 2 ".parse::<Action>(), Ok(Action::new(0, 2)));
        assert_eq!("2, 1".parse::<Action>(), Ok(Action::new(2, 1)));
        assert!("3,0".parse::<Action>().is_err());
        assert!("a,b".parse::<Action>().is_err());
        assert!("1".parse::<Action>().is_err());
        assert!("1,1,1".parse::<Action>().is_err());
    }

    #[test]
    fn test_render() {
        let rendered = board("X.O/.X./..O").render();
        let lines: Vec<&str> = rendered.lines().collect();
        assert_eq!(lines.len(), 5);
        assert_eq!(lines[0], " X |   | O ");
        assert_eq!(lines[1], "---+---+---");
    }

    #[test]
    fn test_serde_json() {
        let b = board("X.O/.X./..O");
        let json = serde_json::to_string(&b).unwrap();
        let back: Board = serde_json::from_str(&json).unwrap();
        assert_eq!(back, b);
    }
}
