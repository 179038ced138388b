//! Read-only view of a game for renderers.

use serde::{Deserialize, Serialize};

use crate::{
    board::{Player, Pos, Status},
    coord::{Coord, SIZE},
    game::{Game, State},
};

/// Owner of a single cell together with the status of its sub-board.
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub struct CellView {
    pub owner: Option<Player>,
    pub board_status: Status,
}

#[derive(Debug, PartialEq, Eq, Clone, Serialize, Deserialize)]
pub struct Snapshot {
    /// Cell owners indexed `[x][y]` by global coordinate.
    pub cells: [[Option<Player>; 9]; 9],
    /// Sub-board statuses indexed `[row][col]`.
    pub boards: [[Status; 3]; 3],
    pub state: State,
    pub last_move: Option<(u8, u8)>,
    pub required_board: Option<Pos>,
}

impl Snapshot {
    pub fn cell(&self, x: u8, y: u8) -> Option<CellView> {
        if x >= SIZE || y >= SIZE {
            return None;
        }
        Some(CellView {
            owner: self.cells[x as usize][y as usize],
            board_status: self.boards[(x / 3) as usize][(y / 3) as usize],
        })
    }

    pub fn board_status(&self, board: Pos) -> Status {
        self.boards[board.row() as usize][board.col() as usize]
    }
}

impl From<&Game> for Snapshot {
    fn from(game: &Game) -> Self {
        let board = game.board();
        let mut cells = [[None; 9]; 9];
        for coord in Coord::all() {
            let (x, y) = coord.to_global();
            cells[x as usize][y as usize] = board.cell(coord);
        }

        let mut boards = [[Status::Open; 3]; 3];
        for (pos, sub_board) in board.sub_boards() {
            boards[pos.row() as usize][pos.col() as usize] = sub_board.status();
        }

        Snapshot {
            cells,
            boards,
            state: game.state(),
            last_move: game.last_move().map(Coord::to_global),
            required_board: game.required_board(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fresh_game_is_empty() {
        let snapshot = Game::default().snapshot();
        for x in 0..SIZE {
            for y in 0..SIZE {
                assert_eq!(
                    snapshot.cell(x, y),
                    Some(CellView {
                        owner: None,
                        board_status: Status::Open
                    })
                );
            }
        }
        assert_eq!(snapshot.state, State::Playing(Player::X));
        assert_eq!(snapshot.last_move, None);
        assert_eq!(snapshot.required_board, None);
        assert_eq!(snapshot.cell(9, 0), None);
    }

    #[test]
    fn reflects_moves_and_decided_boards() {
        let mut game = Game::default();
        // O keeps sending X back to board (0, 0) until X owns its first column.
        for (x, y) in [(1, 0), (3, 0), (2, 0), (6, 0), (0, 0)] {
            game.play(x, y).unwrap();
        }

        let snapshot = game.snapshot();
        let won = Status::Won(Player::X);
        assert_eq!(snapshot.cell(1, 0).unwrap().owner, Some(Player::X));
        assert_eq!(snapshot.cell(3, 0).unwrap().owner, Some(Player::O));
        assert_eq!(snapshot.cell(3, 0).unwrap().board_status, Status::Open);
        assert_eq!(snapshot.cell(1, 1).unwrap().board_status, won);
        assert_eq!(snapshot.board_status(Pos::new(0, 0).unwrap()), won);
        assert_eq!(snapshot.last_move, Some((0, 0)));
        assert_eq!(snapshot.required_board, None);
    }
}
