use std::fmt;
use std::str::FromStr;

use super::player::Player;
use crate::error::{BoardError, MoveError};

pub const ROWS: usize = 6;
pub const COLS: usize = 7;

/// Number of pieces in a line needed to win.
pub const CONNECT: usize = 4;

/// Step vectors as (row, col); rows grow upward from the bottom.
pub const DIRECTIONS: [(isize, isize); 4] = [(0, 1), (1, 0), (1, 1), (1, -1)];

pub type StandardBoard = Board<ROWS, COLS>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Cell {
    Empty,
    Red,
    Yellow,
}

/// Four cells in a straight line, all on the board.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Window {
    pub row: usize,
    pub col: usize,
    pub direction: (isize, isize),
}

impl Window {
    /// The (row, col) positions covered by this window, starting cell first.
    pub fn cells(self) -> impl Iterator<Item = (usize, usize)> {
        let (dr, dc) = self.direction;
        (0..CONNECT as isize).map(move |i| {
            (
                (self.row as isize + i * dr) as usize,
                (self.col as isize + i * dc) as usize,
            )
        })
    }
}

/// A `R` x `C` grid stored row-major. Row 0 is the bottom row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Board<const R: usize, const C: usize> {
    cells: [[Cell; C]; R],
    heights: [usize; C],
    pieces: usize,
}

impl<const R: usize, const C: usize> Board<R, C> {
    /// Create a new empty board
    pub fn new() -> Self {
        Board {
            cells: [[Cell::Empty; C]; R],
            heights: [0; C],
            pieces: 0,
        }
    }

    pub fn rows(&self) -> usize {
        R
    }

    pub fn cols(&self) -> usize {
        C
    }

    /// Get the cell at a specific position
    pub fn get(&self, row: usize, col: usize) -> Cell {
        self.cells[row][col]
    }

    /// Number of pieces stacked in a column.
    pub fn height(&self, col: usize) -> usize {
        self.heights[col]
    }

    pub fn piece_count(&self) -> usize {
        self.pieces
    }

    pub fn is_empty(&self) -> bool {
        self.pieces == 0
    }

    /// True iff `col` is on the board and still has room.
    pub fn is_legal(&self, col: usize) -> bool {
        col < C && self.heights[col] < R
    }

    /// Legal columns in ascending order.
    pub fn legal_columns(&self) -> impl Iterator<Item = usize> + '_ {
        (0..C).filter(move |&col| self.is_legal(col))
    }

    /// Lowest empty row in `col`. The column must not be full.
    pub fn next_open_row(&self, col: usize) -> usize {
        debug_assert!(self.is_legal(col), "next_open_row on full column {col}");
        self.heights[col]
    }

    /// Put `player`'s piece at (`row`, `col`). The cell must be the next open
    /// cell of its column; this is only checked in debug builds.
    pub fn place(&mut self, row: usize, col: usize, player: Player) {
        debug_assert_eq!(
            self.cells[row][col],
            Cell::Empty,
            "place into occupied cell ({row}, {col})"
        );
        debug_assert_eq!(
            self.heights[col], row,
            "place at ({row}, {col}) would break gravity"
        );
        self.cells[row][col] = player.to_cell();
        self.heights[col] = row + 1;
        self.pieces += 1;
    }

    /// Undo a `place` at (`row`, `col`). Only the top piece of a column can be
    /// removed.
    pub fn unplace(&mut self, row: usize, col: usize) {
        debug_assert_ne!(
            self.cells[row][col],
            Cell::Empty,
            "unplace of empty cell ({row}, {col})"
        );
        debug_assert_eq!(
            self.heights[col],
            row + 1,
            "unplace at ({row}, {col}) is not the top of its column"
        );
        self.cells[row][col] = Cell::Empty;
        self.heights[col] = row;
        self.pieces -= 1;
    }

    /// Drop a piece in a column, returns the row where it landed
    pub fn apply_move(&mut self, col: usize, player: Player) -> Result<usize, MoveError> {
        if col >= C {
            return Err(MoveError::InvalidColumn(col));
        }
        if !self.is_legal(col) {
            return Err(MoveError::ColumnFull(col));
        }

        let row = self.next_open_row(col);
        self.place(row, col, player);
        Ok(row)
    }

    /// Check if the board is completely full
    pub fn is_full(&self) -> bool {
        (0..C).all(|col| self.cells[R - 1][col] != Cell::Empty)
    }

    /// Every window of `CONNECT` cells that fits on the board, grouped by
    /// direction.
    pub fn windows() -> impl Iterator<Item = Window> {
        DIRECTIONS
            .into_iter()
            .flat_map(|direction| {
                (0..R).flat_map(move |row| {
                    (0..C).map(move |col| Window {
                        row,
                        col,
                        direction,
                    })
                })
            })
            .filter(|window| Self::fits(window))
    }

    fn fits(window: &Window) -> bool {
        let span = (CONNECT - 1) as isize;
        let end_row = window.row as isize + span * window.direction.0;
        let end_col = window.col as isize + span * window.direction.1;
        (0..R as isize).contains(&end_row) && (0..C as isize).contains(&end_col)
    }

    /// True if `player` has `CONNECT` pieces in a line anywhere on the board.
    pub fn has_connection(&self, player: Player) -> bool {
        let cell = player.to_cell();
        Self::windows().any(|window| window.cells().all(|(r, c)| self.cells[r][c] == cell))
    }
}

impl<const R: usize, const C: usize> Default for Board<R, C> {
    fn default() -> Self {
        Self::new()
    }
}

/// Top row first, one line per row: `.` empty, `R` red, `Y` yellow.
impl<const R: usize, const C: usize> fmt::Display for Board<R, C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in (0..R).rev() {
            for col in 0..C {
                let ch = match self.cells[row][col] {
                    Cell::Empty => '.',
                    Cell::Red => 'R',
                    Cell::Yellow => 'Y',
                };
                write!(f, "{ch}")?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

/// Parses the `Display` format. `X`/`O` are accepted for red/yellow, and
/// blank lines and surrounding whitespace are ignored.
impl<const R: usize, const C: usize> FromStr for Board<R, C> {
    type Err = BoardError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lines: Vec<&str> = s
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .collect();
        if lines.len() != R {
            return Err(BoardError::RowCount {
                expected: R,
                found: lines.len(),
            });
        }

        let mut cells = [[Cell::Empty; C]; R];
        for (line_idx, line) in lines.iter().enumerate() {
            let width = line.chars().count();
            if width != C {
                return Err(BoardError::RowWidth {
                    line: line_idx,
                    expected: C,
                    found: width,
                });
            }
            let row = R - 1 - line_idx;
            for (col, ch) in line.chars().enumerate() {
                cells[row][col] = match ch {
                    '.' | '_' => Cell::Empty,
                    'R' | 'r' | 'X' | 'x' => Cell::Red,
                    'Y' | 'y' | 'O' | 'o' => Cell::Yellow,
                    other => return Err(BoardError::InvalidCell(other)),
                };
            }
        }

        let mut heights = [0; C];
        let mut pieces = 0;
        for (col, height) in heights.iter_mut().enumerate() {
            for row in 0..R {
                if cells[row][col] == Cell::Empty {
                    continue;
                }
                if row != *height {
                    return Err(BoardError::FloatingPiece { row, col });
                }
                *height += 1;
                pieces += 1;
            }
        }

        Ok(Board {
            cells,
            heights,
            pieces,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};

    fn board(diagram: &str) -> StandardBoard {
        diagram.parse().unwrap()
    }

    #[test]
    fn test_new_board_is_empty() {
        let board = StandardBoard::new();
        for row in 0..ROWS {
            for col in 0..COLS {
                assert_eq!(board.get(row, col), Cell::Empty);
            }
        }
        assert!(board.is_empty());
        assert_eq!(board.piece_count(), 0);
        assert!(!board.is_full());
    }

    #[test]
    fn test_drop_piece() {
        let mut board = StandardBoard::new();

        // First piece lands on the bottom row
        let row = board.apply_move(3, Player::Red).unwrap();
        assert_eq!(row, 0);
        assert_eq!(board.get(0, 3), Cell::Red);

        // Second piece stacks on top of it
        let row = board.apply_move(3, Player::Yellow).unwrap();
        assert_eq!(row, 1);
        assert_eq!(board.get(1, 3), Cell::Yellow);
        assert_eq!(board.height(3), 2);
        assert_eq!(board.piece_count(), 2);
    }

    #[test]
    fn test_column_full() {
        let mut board = StandardBoard::new();
        for _ in 0..ROWS {
            board.apply_move(0, Player::Red).unwrap();
        }

        assert!(!board.is_legal(0));
        let before = board;
        assert_eq!(
            board.apply_move(0, Player::Yellow),
            Err(MoveError::ColumnFull(0))
        );
        assert_eq!(board, before);
    }

    #[test]
    fn test_invalid_column() {
        let mut board = StandardBoard::new();
        assert!(!board.is_legal(7));
        assert_eq!(
            board.apply_move(7, Player::Red),
            Err(MoveError::InvalidColumn(7))
        );
        assert!(board.is_empty());
    }

    #[test]
    fn test_full_board() {
        let mut board = StandardBoard::new();
        for col in 0..COLS {
            for _ in 0..ROWS {
                board.apply_move(col, Player::Red).unwrap();
            }
        }
        assert!(board.is_full());
        assert_eq!(board.legal_columns().count(), 0);
    }

    #[test]
    fn test_window_count() {
        // 24 horizontal + 21 vertical + 12 per diagonal
        assert_eq!(StandardBoard::windows().count(), 69);
        assert_eq!(Board::<4, 4>::windows().count(), 10);
        assert_eq!(Board::<3, 3>::windows().count(), 0);
    }

    #[test]
    fn test_windows_stay_on_board() {
        for window in StandardBoard::windows() {
            for (row, col) in window.cells() {
                assert!(row < ROWS && col < COLS, "{window:?} leaves the board");
            }
        }
    }

    #[test]
    fn test_horizontal_win() {
        let board = board(
            "
            .......
            .......
            .......
            .......
            YYY....
            RRRR...
            ",
        );
        assert!(board.has_connection(Player::Red));
        assert!(!board.has_connection(Player::Yellow));
    }

    #[test]
    fn test_vertical_win() {
        let board = board(
            "
            .......
            .......
            ...Y...
            ...Y...
            ..RYR..
            ..RYR..
            ",
        );
        assert!(board.has_connection(Player::Yellow));
        assert!(!board.has_connection(Player::Red));
    }

    #[test]
    fn test_diagonal_up_win() {
        let board = board(
            "
            .......
            .......
            ...R...
            ..RY...
            .RYY...
            RYYY...
            ",
        );
        assert!(board.has_connection(Player::Red));
        assert!(!board.has_connection(Player::Yellow));
    }

    #[test]
    fn test_diagonal_down_win() {
        let board = board(
            "
            .......
            .......
            R......
            YR.....
            YYR....
            YYYR...
            ",
        );
        assert!(board.has_connection(Player::Red));
        assert!(!board.has_connection(Player::Yellow));
    }

    #[test]
    fn test_win_on_far_edge() {
        let board = board(
            "
            ......Y
            ......Y
            ......Y
            ......Y
            .....RR
            ....RRR
            ",
        );
        assert!(board.has_connection(Player::Yellow));
        assert!(!board.has_connection(Player::Red));
    }

    #[test]
    fn test_no_win_with_three() {
        let mut board = StandardBoard::new();
        for col in 0..3 {
            board.apply_move(col, Player::Red).unwrap();
        }
        assert!(!board.has_connection(Player::Red));
        assert!(!board.has_connection(Player::Yellow));
    }

    #[test]
    fn test_place_unplace_restores_board() {
        let mut board = board(
            "
            .......
            .......
            ...Y...
            ..RR...
            .YYRY..
            RRYYRY.
            ",
        );
        let before = board;
        for col in 0..COLS {
            assert!(board.is_legal(col));
            let row = board.next_open_row(col);
            for player in [Player::Red, Player::Yellow] {
                board.place(row, col, player);
                assert_ne!(board, before);
                board.unplace(row, col);
                assert_eq!(board, before, "probe in column {col} leaked");
            }
        }
    }

    #[test]
    fn test_gravity_holds_for_random_games() {
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..200 {
            let mut board = StandardBoard::new();
            let mut player = Player::Red;
            while !board.is_full() && !board.has_connection(player.other()) {
                let legal: Vec<usize> = board.legal_columns().collect();
                let col = legal[rng.random_range(0..legal.len())];
                board.apply_move(col, player).unwrap();
                player = player.other();

                let mut total = 0;
                for col in 0..COLS {
                    let height = board.height(col);
                    for row in 0..ROWS {
                        assert_eq!(board.get(row, col) != Cell::Empty, row < height);
                    }
                    total += height;
                }
                assert_eq!(total, board.piece_count());
            }
        }
    }

    #[test]
    fn test_small_board_generic() {
        let mut board = Board::<4, 4>::new();
        for col in 0..4 {
            board.apply_move(col, Player::Yellow).unwrap();
        }
        assert!(board.has_connection(Player::Yellow));
        assert_eq!(board.apply_move(4, Player::Red), Err(MoveError::InvalidColumn(4)));
    }

    #[test]
    fn test_diagram_roundtrip() {
        let start = board(
            "
            .......
            .......
            ...Y...
            ..RR...
            .YYRY..
            RRYYRY.
            ",
        );
        let reparsed: StandardBoard = start.to_string().parse().unwrap();
        assert_eq!(reparsed, start);
        assert_eq!(start.piece_count(), 13);
        assert_eq!(start.height(3), 4);
    }

    #[test]
    fn test_diagram_rejects_floating_piece() {
        let err = "
            .......
            .......
            .......
            .......
            ...R...
            .......
            "
        .parse::<StandardBoard>()
        .unwrap_err();
        assert_eq!(err, BoardError::FloatingPiece { row: 1, col: 3 });
    }

    #[test]
    fn test_diagram_rejects_bad_shape_and_chars() {
        assert_eq!(
            ".......\n".parse::<StandardBoard>().unwrap_err(),
            BoardError::RowCount {
                expected: 6,
                found: 1
            }
        );
        let bad_char = ".......\n.......\n.......\n.......\n.......\n...Z...\n";
        assert_eq!(
            bad_char.parse::<StandardBoard>().unwrap_err(),
            BoardError::InvalidCell('Z')
        );
    }
}
