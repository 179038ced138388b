//! Translation between global coordinates and (sub-board, cell) pairs.
//!
//! Global coordinates run `0..9` on both axes. `x` selects the row of the
//! sub-board and the row inside it, `y` the columns:
//!
//! ```text
//! board = (x / 3, y / 3)
//! cell  = (x % 3, y % 3)
//! ```

use serde::{Deserialize, Serialize};

use crate::{board::Pos, game::MoveError};

/// Width and height of the full board in cells.
pub const SIZE: u8 = 9;

#[derive(Debug, PartialEq, Eq, Clone, Copy, Hash, Serialize, Deserialize)]
pub struct Coord {
    pub board: Pos,
    pub cell: Pos,
}

impl Coord {
    pub fn from_global(x: u8, y: u8) -> Result<Self, MoveError> {
        let invalid = MoveError::InvalidCoordinate { x, y };
        if x >= SIZE || y >= SIZE {
            return Err(invalid);
        }

        let board = Pos::new(x / 3, y / 3).ok_or(invalid)?;
        let cell = Pos::new(x % 3, y % 3).ok_or(invalid)?;
        Ok(Self { board, cell })
    }

    pub fn to_global(self) -> (u8, u8) {
        (
            self.board.row() * 3 + self.cell.row(),
            self.board.col() * 3 + self.cell.col(),
        )
    }

    /// The sub-board the opponent is sent to by a move at this coordinate.
    ///
    /// Derived from the cell inside the sub-board, never from the sub-board
    /// itself.
    pub fn indicated_board(self) -> Pos {
        self.cell
    }

    /// Every coordinate on the board, `x` major.
    pub fn all() -> impl Iterator<Item = Coord> {
        (0..SIZE).flat_map(|x| (0..SIZE).filter_map(move |y| Coord::from_global(x, y).ok()))
    }
}
