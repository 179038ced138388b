use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, info};

use crate::{
    board::{MetaBoard, Player, Pos, Status},
    coord::Coord,
    snapshot::Snapshot,
};

/// Why a move was rejected. A rejected move never changes the game.
#[derive(Debug, Error, PartialEq, Eq, Clone, Copy)]
pub enum MoveError {
    #[error("coordinates ({x}, {y}) are outside 0..=8")]
    InvalidCoordinate { x: u8, y: u8 },
    #[error("square is already marked")]
    SquareTaken,
    #[error("board is already decided")]
    BoardClosed,
    #[error("must play in board {expected}")]
    BoardMismatch { expected: Pos },
    #[error("it is {expected}'s turn")]
    NotYourTurn { expected: Player },
    #[error("game is already over")]
    GameAlreadyOver,
}

#[derive(Debug, PartialEq, Eq, Clone, Copy, Serialize, Deserialize)]
pub enum Conclusion {
    Win(Player),
    Draw,
}

#[derive(Debug, PartialEq, Eq, Clone, Copy, Serialize, Deserialize)]
pub enum State {
    Playing(Player),
    Concluded(Conclusion),
}

/// What an accepted move did.
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub struct MoveOutcome {
    pub coord: Coord,
    pub player: Player,
    /// Status of the sub-board the move landed in, after the move.
    pub board_status: Status,
    pub state: State,
}

/// A game of ultimate tic-tac-toe.
///
/// A `Game` is plain data with no interior mutability; it is not meant to be
/// shared between threads while moves are applied. Clone it to keep a copy.
#[derive(Debug, PartialEq, Eq, Clone)]
pub struct Game {
    board: MetaBoard,
    state: State,
    last_move: Option<Coord>,
    moves_played: u8,
}

impl Default for Game {
    fn default() -> Self {
        Game::new(Player::default())
    }
}

impl Game {
    pub fn new(first_turn: Player) -> Self {
        Game {
            board: MetaBoard::default(),
            state: State::Playing(first_turn),
            last_move: None,
            moves_played: 0,
        }
    }

    pub fn board(&self) -> &MetaBoard {
        &self.board
    }

    pub fn state(&self) -> State {
        self.state
    }

    /// The player to move, or `None` once the game is over.
    pub fn whos_turn(&self) -> Option<Player> {
        match self.state {
            State::Playing(player) => Some(player),
            State::Concluded(_) => None,
        }
    }

    pub fn last_move(&self) -> Option<Coord> {
        self.last_move
    }

    pub fn moves_played(&self) -> u8 {
        self.moves_played
    }

    /// The sub-board the next move has to go to. `None` on the first move and
    /// whenever the indicated board is already decided, in which case any
    /// open board may be played.
    pub fn required_board(&self) -> Option<Pos> {
        if let State::Concluded(_) = self.state {
            return None;
        }
        self.last_move
            .map(Coord::indicated_board)
            .filter(|&pos| self.board.sub_board(pos).status().is_open())
    }

    /// Checks a move against the placement rules without applying it.
    ///
    /// Rules are checked in order: coordinate range, occupied square, decided
    /// target board, then the board indicated by the previous move.
    pub fn validate(&self, x: u8, y: u8) -> Result<Coord, MoveError> {
        let coord = Coord::from_global(x, y)?;
        let target = self.board.sub_board(coord.board);

        if target.cell(coord.cell).is_some() {
            return Err(MoveError::SquareTaken);
        }
        if target.status().is_terminal() {
            return Err(MoveError::BoardClosed);
        }
        if let Some(expected) = self.required_board() {
            if coord.board != expected {
                return Err(MoveError::BoardMismatch { expected });
            }
        }

        Ok(coord)
    }

    /// Every global coordinate the player to move may play.
    pub fn legal_moves(&self) -> Vec<(u8, u8)> {
        if let State::Concluded(_) = self.state {
            return Vec::new();
        }
        Coord::all()
            .map(Coord::to_global)
            .filter(|&(x, y)| self.validate(x, y).is_ok())
            .collect()
    }

    pub fn apply_move(&mut self, x: u8, y: u8, player: Player) -> Result<MoveOutcome, MoveError> {
        let turn = match self.state {
            State::Playing(turn) => turn,
            State::Concluded(_) => return Err(MoveError::GameAlreadyOver),
        };
        if player != turn {
            return Err(MoveError::NotYourTurn { expected: turn });
        }

        let coord = self.validate(x, y).inspect_err(|e| {
            debug!(x, y, %player, error = %e, "move rejected");
        })?;
        let placement = self.board.place(coord, player)?;

        self.last_move = Some(coord);
        self.moves_played += 1;
        self.state = match placement.game {
            Status::Open => State::Playing(!player),
            Status::Won(winner) => State::Concluded(Conclusion::Win(winner)),
            Status::Drawn => State::Concluded(Conclusion::Draw),
        };
        debug!(x, y, %player, board = ?placement.board, "move applied");

        if let State::Concluded(conclusion) = self.state {
            info!(?conclusion, moves = self.moves_played, "game concluded");
        }

        Ok(MoveOutcome {
            coord,
            player,
            board_status: placement.board,
            state: self.state,
        })
    }

    /// Applies a move for the player whose turn it is.
    pub fn play(&mut self, x: u8, y: u8) -> Result<MoveOutcome, MoveError> {
        let player = self.whos_turn().ok_or(MoveError::GameAlreadyOver)?;
        self.apply_move(x, y, player)
    }

    pub fn snapshot(&self) -> Snapshot {
        Snapshot::from(self)
    }
}
