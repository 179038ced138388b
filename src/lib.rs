//! Ultimate tic-tac-toe: nine tic-tac-toe boards arranged in a 3×3 grid.
//!
//! Every move lands in one cell of one sub-board. The cell's position inside
//! its sub-board picks the sub-board the opponent has to play next, unless
//! that board is already decided. Winning three sub-boards in a line wins the
//! game.
//!
//! ```
//! use uttt::{Game, Player, State};
//!
//! let mut game = Game::new(Player::X);
//! game.play(4, 4).unwrap();
//! assert_eq!(game.state(), State::Playing(Player::O));
//! ```

pub mod board;
pub mod coord;
pub mod game;
pub mod snapshot;

pub use board::{Grid, Mark, MetaBoard, Player, Pos, Status, SubBoard};
pub use coord::Coord;
pub use game::{Conclusion, Game, MoveError, MoveOutcome, State};
pub use snapshot::{CellView, Snapshot};
