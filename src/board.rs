use std::{
    fmt::Display,
    ops::{Index, IndexMut, Not},
    str::FromStr,
};

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::info;

use crate::{coord::Coord, game::MoveError};

#[derive(Debug, Default, PartialEq, Eq, Clone, Copy, Hash, Serialize, Deserialize)]
pub enum Player {
    O,
    #[default]
    X,
}

impl Not for Player {
    type Output = Self;

    fn not(self) -> Self::Output {
        match self {
            Player::O => Player::X,
            Player::X => Player::O,
        }
    }
}

impl Display for Player {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Player::O => write!(f, "O"),
            Player::X => write!(f, "X"),
        }
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
#[error("unknown player {0:?}, expected x or o")]
pub struct ParsePlayerError(String);

impl FromStr for Player {
    type Err = ParsePlayerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "x" | "X" => Ok(Player::X),
            "o" | "O" => Ok(Player::O),
            _ => Err(ParsePlayerError(s.to_string())),
        }
    }
}

// row:
// 0: 0 1 2
// 1: 3 4 5
// 2: 6 7 8
//    0 1 2 : col
/// Position inside a 3×3 grid. Both axes are always in `0..3`.
#[derive(Debug, Default, PartialEq, Eq, Clone, Copy, Hash, Serialize, Deserialize)]
pub struct Pos {
    row: u8,
    col: u8,
}

impl Pos {
    pub const fn new(row: u8, col: u8) -> Option<Self> {
        if row >= 3 || col >= 3 {
            None
        } else {
            Some(Self { row, col })
        }
    }

    pub const fn row(self) -> u8 {
        self.row
    }

    pub const fn col(self) -> u8 {
        self.col
    }

    const fn index(self) -> usize {
        (self.row * 3 + self.col) as usize
    }

    const fn from_index(index: usize) -> Self {
        Self {
            row: index as u8 / 3,
            col: index as u8 % 3,
        }
    }

    /// All nine positions in row-major order.
    pub fn all() -> impl Iterator<Item = Pos> {
        (0..9).map(Pos::from_index)
    }

    /// The lines running through this position: its row, its column and
    /// whichever diagonals it sits on.
    fn lines(self) -> impl Iterator<Item = [Pos; 3]> {
        let Pos { row, col } = self;
        let row_line = [0, 1, 2].map(|c| Pos { row, col: c });
        let col_line = [0, 1, 2].map(|r| Pos { row: r, col });
        let main = (row == col).then(|| [0, 1, 2].map(|i| Pos { row: i, col: i }));
        let anti = (row + col == 2).then(|| [0, 1, 2].map(|i| Pos { row: i, col: 2 - i }));

        [row_line, col_line].into_iter().chain(main).chain(anti)
    }
}

impl Display for Pos {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({}, {})", self.row, self.col)
    }
}

/// Something that can sit in a 3×3 grid and take part in a line.
pub trait Mark: Copy {
    /// The player this entry counts for when completing a line.
    fn owner(self) -> Option<Player>;

    /// Whether this entry is settled. A grid whose entries are all settled
    /// without a winning line is drawn.
    fn is_filled(self) -> bool;
}

impl Mark for Option<Player> {
    fn owner(self) -> Option<Player> {
        self
    }

    fn is_filled(self) -> bool {
        self.is_some()
    }
}

/// Derived state of a 3×3 grid, used for both sub-boards and the meta-board.
#[derive(Debug, Default, PartialEq, Eq, Clone, Copy, Hash, Serialize, Deserialize)]
pub enum Status {
    #[default]
    Open,
    Won(Player),
    Drawn,
}

impl Status {
    pub fn is_open(self) -> bool {
        matches!(self, Status::Open)
    }

    pub fn is_terminal(self) -> bool {
        !self.is_open()
    }
}

// A decided sub-board is a mark on the meta-board; a drawn one blocks every
// line through it but still fills its square.
impl Mark for Status {
    fn owner(self) -> Option<Player> {
        match self {
            Status::Won(player) => Some(player),
            Status::Open | Status::Drawn => None,
        }
    }

    fn is_filled(self) -> bool {
        self.is_terminal()
    }
}

#[derive(Debug, Default, PartialEq, Eq, Clone, Serialize, Deserialize)]
pub struct Grid<T> {
    entries: [T; 9],
}

impl<T> Grid<T> {
    pub fn map<U>(&self, mut f: impl FnMut(&T) -> U) -> Grid<U> {
        Grid {
            entries: std::array::from_fn(|i| f(&self.entries[i])),
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (Pos, &T)> {
        self.entries
            .iter()
            .enumerate()
            .map(|(i, entry)| (Pos::from_index(i), entry))
    }
}

impl<T: Mark> Grid<T> {
    /// Status of the grid after the entry at `changed` was updated.
    ///
    /// Only lines through `changed` can have been completed by the update, so
    /// only those are checked for a winner.
    pub fn evaluate(&self, changed: Pos) -> Status {
        let winner = changed.lines().find_map(|line| {
            let owner = self[line[0]].owner()?;
            line[1..]
                .iter()
                .all(|&pos| self[pos].owner() == Some(owner))
                .then_some(owner)
        });

        match winner {
            Some(player) => Status::Won(player),
            None if self.entries.iter().all(|entry| entry.is_filled()) => Status::Drawn,
            None => Status::Open,
        }
    }
}

impl<T> Index<Pos> for Grid<T> {
    type Output = T;

    fn index(&self, pos: Pos) -> &Self::Output {
        &self.entries[pos.index()]
    }
}

impl<T> IndexMut<Pos> for Grid<T> {
    fn index_mut(&mut self, pos: Pos) -> &mut Self::Output {
        &mut self.entries[pos.index()]
    }
}

/// One of the nine small boards.
#[derive(Debug, Default, PartialEq, Eq, Clone, Serialize, Deserialize)]
pub struct SubBoard {
    cells: Grid<Option<Player>>,
    status: Status,
}

impl SubBoard {
    pub fn cell(&self, pos: Pos) -> Option<Player> {
        self.cells[pos]
    }

    pub fn status(&self) -> Status {
        self.status
    }

    pub fn mark_count(&self) -> u8 {
        self.cells.iter().filter(|(_, cell)| cell.is_some()).count() as u8
    }

    /// Marks `pos` for `player` and returns the resulting status. A decided
    /// board keeps its cells but accepts no further marks.
    pub fn mark(&mut self, pos: Pos, player: Player) -> Result<Status, MoveError> {
        if self.cells[pos].is_some() {
            return Err(MoveError::SquareTaken);
        }
        if self.status.is_terminal() {
            return Err(MoveError::BoardClosed);
        }

        self.cells[pos] = Some(player);
        self.status = self.cells.evaluate(pos);
        Ok(self.status)
    }
}

/// Result of placing a mark on the meta-board.
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub struct Placement {
    /// Status of the sub-board that received the mark.
    pub board: Status,
    /// Status of the meta-board.
    pub game: Status,
}

/// The 3×3 board of sub-boards.
#[derive(Debug, Default, PartialEq, Eq, Clone, Serialize, Deserialize)]
pub struct MetaBoard {
    boards: Grid<SubBoard>,
    status: Status,
}

impl MetaBoard {
    pub fn sub_board(&self, pos: Pos) -> &SubBoard {
        &self.boards[pos]
    }

    pub fn sub_boards(&self) -> impl Iterator<Item = (Pos, &SubBoard)> {
        self.boards.iter()
    }

    pub fn cell(&self, coord: Coord) -> Option<Player> {
        self.boards[coord.board].cell(coord.cell)
    }

    pub fn status(&self) -> Status {
        self.status
    }

    /// Statuses of the sub-boards, the grid the meta-board status is
    /// derived from.
    pub fn statuses(&self) -> Grid<Status> {
        self.boards.map(SubBoard::status)
    }

    pub fn place(&mut self, coord: Coord, player: Player) -> Result<Placement, MoveError> {
        if self.status.is_terminal() {
            return Err(MoveError::GameAlreadyOver);
        }

        let board = self.boards[coord.board].mark(coord.cell, player)?;
        if board.is_terminal() {
            info!(board = %coord.board, status = ?board, "sub-board decided");
            self.status = self.statuses().evaluate(coord.board);
        }

        Ok(Placement {
            board,
            game: self.status,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pos(row: u8, col: u8) -> Pos {
        Pos::new(row, col).unwrap()
    }

    fn grid(rows: [&str; 3]) -> Grid<Option<Player>> {
        let mut grid = Grid::<Option<Player>>::default();
        for (row, line) in rows.iter().enumerate() {
            for (col, c) in line.chars().enumerate() {
                grid[pos(row as u8, col as u8)] = match c {
                    'X' => Some(Player::X),
                    'O' => Some(Player::O),
                    _ => None,
                };
            }
        }
        grid
    }

    #[test]
    fn pos_rejects_out_of_range() {
        assert_eq!(Pos::new(3, 0), None);
        assert_eq!(Pos::new(0, 3), None);
        assert_eq!(Pos::all().count(), 9);
    }

    #[test]
    fn lines_through_corner_center_and_edge() {
        assert_eq!(pos(0, 0).lines().count(), 3);
        assert_eq!(pos(1, 1).lines().count(), 4);
        assert_eq!(pos(0, 1).lines().count(), 2);
        assert_eq!(pos(2, 0).lines().count(), 3);
    }

    #[test]
    fn evaluate_finds_every_line() {
        let wins = [
            ["XXX", "...", "..."],
            ["...", "XXX", "..."],
            ["...", "...", "XXX"],
            ["X..", "X..", "X.."],
            [".X.", ".X.", ".X."],
            ["..X", "..X", "..X"],
            ["X..", ".X.", "..X"],
            ["..X", ".X.", "X.."],
        ];
        for rows in wins {
            let g = grid(rows);
            let changed = g.iter().find(|(_, c)| c.is_some()).unwrap().0;
            assert_eq!(g.evaluate(changed), Status::Won(Player::X), "{rows:?}");
        }
    }

    #[test]
    fn evaluate_ignores_lines_not_through_change() {
        let g = grid(["XXX", "O..", "..."]);
        assert_eq!(g.evaluate(pos(1, 0)), Status::Open);
        assert_eq!(g.evaluate(pos(0, 2)), Status::Won(Player::X));
    }

    #[test]
    fn evaluate_mixed_line_is_not_a_win() {
        let g = grid(["XXO", "...", "..."]);
        assert_eq!(g.evaluate(pos(0, 2)), Status::Open);
    }

    #[test]
    fn evaluate_full_grid_without_line_is_drawn() {
        let g = grid(["XOX", "XOO", "OXX"]);
        assert_eq!(g.evaluate(pos(2, 2)), Status::Drawn);
    }

    #[test]
    fn evaluate_win_on_last_square_beats_draw() {
        let g = grid(["XOX", "OXO", "OXX"]);
        assert_eq!(g.evaluate(pos(2, 2)), Status::Won(Player::X));
    }

    #[test]
    fn drawn_entries_block_meta_lines() {
        let mut g = Grid::<Status>::default();
        g[pos(0, 0)] = Status::Won(Player::O);
        g[pos(0, 1)] = Status::Drawn;
        g[pos(0, 2)] = Status::Won(Player::O);
        assert_eq!(g.evaluate(pos(0, 2)), Status::Open);
    }

    #[test]
    fn drawn_entries_fill_the_meta_grid() {
        let g = Grid {
            entries: [
                Status::Won(Player::X),
                Status::Won(Player::O),
                Status::Won(Player::X),
                Status::Drawn,
                Status::Drawn,
                Status::Won(Player::O),
                Status::Won(Player::O),
                Status::Won(Player::X),
                Status::Drawn,
            ],
        };
        assert_eq!(g.evaluate(pos(2, 2)), Status::Drawn);
    }

    #[test]
    fn sub_board_is_write_once_after_win() {
        let mut board = SubBoard::default();
        assert_eq!(board.mark(pos(0, 0), Player::O), Ok(Status::Open));
        assert_eq!(board.mark(pos(1, 1), Player::O), Ok(Status::Open));
        assert_eq!(board.mark(pos(2, 2), Player::O), Ok(Status::Won(Player::O)));

        assert_eq!(board.mark(pos(0, 1), Player::X), Err(MoveError::BoardClosed));
        assert_eq!(board.mark(pos(0, 0), Player::X), Err(MoveError::SquareTaken));
        assert_eq!(board.status(), Status::Won(Player::O));
        assert_eq!(board.cell(pos(0, 1)), None);
        assert_eq!(board.mark_count(), 3);
    }

    #[test]
    fn sub_board_draws_when_full() {
        let mut board = SubBoard::default();
        let moves = [
            (0, 0, Player::X),
            (0, 1, Player::O),
            (0, 2, Player::X),
            (1, 1, Player::O),
            (1, 0, Player::X),
            (1, 2, Player::O),
            (2, 1, Player::X),
            (2, 0, Player::O),
        ];
        for (row, col, player) in moves {
            assert_eq!(board.mark(pos(row, col), player), Ok(Status::Open));
        }
        assert_eq!(board.mark(pos(2, 2), Player::X), Ok(Status::Drawn));
        assert_eq!(board.mark_count(), 9);
    }

    #[test]
    fn meta_board_is_won_by_three_sub_boards_in_a_column() {
        let mut meta = MetaBoard::default();
        for board_row in 0..3 {
            for cell_col in 0..3 {
                let coord = Coord {
                    board: pos(board_row, 1),
                    cell: pos(0, cell_col),
                };
                let placement = meta.place(coord, Player::X).unwrap();
                if board_row < 2 || cell_col < 2 {
                    assert_eq!(placement.game, Status::Open);
                }
            }
        }
        assert_eq!(meta.status(), Status::Won(Player::X));
        assert_eq!(meta.statuses()[pos(1, 1)], Status::Won(Player::X));

        let late = Coord {
            board: pos(0, 0),
            cell: pos(0, 0),
        };
        assert_eq!(meta.place(late, Player::O), Err(MoveError::GameAlreadyOver));
        assert_eq!(meta.cell(late), None);
    }

    #[test]
    fn player_parses_and_flips() {
        assert_eq!("x".parse(), Ok(Player::X));
        assert_eq!("O".parse(), Ok(Player::O));
        assert!("z".parse::<Player>().is_err());
        assert_eq!(!Player::X, Player::O);
        assert_eq!(Player::O.to_string(), "O");
    }
}
