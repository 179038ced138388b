use std::{
    fmt::{self, Display},
    fs,
    io::{self, Write},
    path::Path,
};

use anyhow::Context;
use crossterm::style::{Color, Stylize};
use rand::{seq::IndexedRandom, Rng};
use thiserror::Error;
use tracing::{info, warn};
use uttt::{Conclusion, Coord, Game, Player, Pos, Snapshot, State, Status};

pub struct Options {
    pub color: bool,
}

#[derive(Debug, PartialEq, Eq, Clone, Copy)]
enum Command {
    Coordinate(u8),
    Undo,
    Quit,
}

#[derive(Debug, Error, PartialEq, Eq)]
enum InputError {
    #[error("{0:?} is not a valid number.")]
    NotANumber(String),
    #[error("{0} is out of bounds.")]
    OutOfBounds(i64),
}

fn parse_command(input: &str) -> Result<Command, InputError> {
    match input {
        "u" | "U" => return Ok(Command::Undo),
        "q" | "Q" => return Ok(Command::Quit),
        _ => {}
    }

    let value: i64 = input
        .parse()
        .map_err(|_| InputError::NotANumber(input.to_string()))?;
    u8::try_from(value)
        .ok()
        .filter(|&v| v < 9)
        .map(Command::Coordinate)
        .ok_or(InputError::OutOfBounds(value))
}

pub fn play(mut game: Game, options: &Options) -> anyhow::Result<Game> {
    let stdin = io::stdin();
    let mut stdout = io::stdout();
    let mut input = String::new();
    let mut history: Vec<Game> = Vec::new();

    let mut prompt = |axis: &str| -> anyhow::Result<Command> {
        loop {
            input.clear();
            print!("Enter {axis} coordinate (0..8, u to undo, q to quit): ");
            stdout.flush()?;
            if stdin.read_line(&mut input)? == 0 {
                return Ok(Command::Quit);
            }
            match parse_command(input.trim()) {
                Ok(command) => return Ok(command),
                Err(e) => println!("{e}"),
            }
        }
    };

    while let Some(turn) = game.whos_turn() {
        println!("\n{}\n", BoardView::new(&game.snapshot(), options.color));
        match game.required_board() {
            Some(board) => println!("{turn}'s turn, play in board {board}."),
            None => println!("{turn}'s turn, play in any open board."),
        }

        let x = match prompt("x")? {
            Command::Coordinate(x) => x,
            Command::Undo => {
                undo(&mut game, &mut history);
                continue;
            }
            Command::Quit => break,
        };
        let y = match prompt("y")? {
            Command::Coordinate(y) => y,
            Command::Undo => {
                undo(&mut game, &mut history);
                continue;
            }
            Command::Quit => break,
        };

        let before = game.clone();
        match game.apply_move(x, y, turn) {
            Ok(outcome) => {
                history.push(before);
                report_board(outcome.coord, outcome.board_status);
            }
            Err(e) => {
                println!("\nInvalid move at x: {x} - y: {y}");
                println!(" *Error: {e}");
            }
        }
    }

    println!("\n{}\n", BoardView::new(&game.snapshot(), options.color));
    Ok(game)
}

fn undo(game: &mut Game, history: &mut Vec<Game>) {
    match history.pop() {
        Some(previous) => *game = previous,
        None => println!("Nothing to undo."),
    }
}

fn report_board(coord: Coord, status: Status) {
    match status {
        Status::Won(player) => println!("Board {} won by {player}!", coord.board),
        Status::Drawn => println!("Board {} is a draw.", coord.board),
        Status::Open => {}
    }
}

/// Plays random legal moves for both sides until the game ends.
pub fn autoplay<R: Rng + ?Sized>(mut game: Game, rng: &mut R, options: &Options) -> Game {
    while let Some(turn) = game.whos_turn() {
        let moves = game.legal_moves();
        let Some(&(x, y)) = moves.choose(rng) else {
            warn!(%turn, "no legal moves left");
            break;
        };

        match game.apply_move(x, y, turn) {
            Ok(outcome) => {
                println!("{turn} plays ({x}, {y})");
                report_board(outcome.coord, outcome.board_status);
            }
            Err(e) => {
                warn!(x, y, error = %e, "generated move was rejected");
                break;
            }
        }
    }

    println!("\n{}\n", BoardView::new(&game.snapshot(), options.color));
    game
}

pub fn parse_moves(source: &str) -> Result<Vec<(u8, u8)>, ron::error::SpannedError> {
    ron::from_str(source)
}

fn replay_moves(mut game: Game, moves: &[(u8, u8)]) -> anyhow::Result<Game> {
    for (i, &(x, y)) in moves.iter().enumerate() {
        game.play(x, y)
            .with_context(|| format!("move {} at ({x}, {y})", i + 1))?;
    }
    Ok(game)
}

/// Applies the moves listed in a RON file, e.g. `[(4, 4), (3, 3)]`.
pub fn replay(game: Game, path: &Path) -> anyhow::Result<Game> {
    let source = fs::read_to_string(path)
        .with_context(|| format!("failed to read {}", path.display()))?;
    let moves =
        parse_moves(&source).with_context(|| format!("failed to parse {}", path.display()))?;
    let game = replay_moves(game, &moves)
        .with_context(|| format!("failed to replay {}", path.display()))?;

    info!(moves = moves.len(), path = %path.display(), "replayed moves");
    Ok(game)
}

fn player_color(player: Player) -> Color {
    match player {
        Player::O => Color::Red,
        Player::X => Color::Blue,
    }
}

const MARGIN: &str = "       ";

/// The 9×9 board as text. `x` runs left to right, `y` bottom to top, with
/// the global, sub-board and local index printed along both axes.
pub struct BoardView<'a> {
    snapshot: &'a Snapshot,
    color: bool,
}

impl<'a> BoardView<'a> {
    pub fn new(snapshot: &'a Snapshot, color: bool) -> Self {
        Self { snapshot, color }
    }

    fn paint(&self, text: &str, color: Option<Color>) -> String {
        match color {
            Some(color) if self.color => text.with(color).bold().to_string(),
            _ => text.to_string(),
        }
    }

    fn mark(&self, owner: Option<Player>) -> String {
        match owner {
            Some(player) => self.paint(&format!(" {player} "), Some(player_color(player))),
            None => "   ".to_string(),
        }
    }

    fn bar(&self, board: Pos) -> String {
        let color = match self.snapshot.board_status(board) {
            Status::Won(player) => Some(player_color(player)),
            Status::Drawn => Some(Color::DarkGrey),
            Status::Open if self.snapshot.required_board == Some(board) => Some(Color::Yellow),
            Status::Open => None,
        };
        self.paint("|", color)
    }

    fn labels(f: &mut fmt::Formatter<'_>, label: impl Fn(u8) -> u8) -> fmt::Result {
        write!(f, "{MARGIN}")?;
        for x in 0..9 {
            if x % 3 == 0 {
                write!(f, " ")?;
            }
            write!(f, " {} ", label(x))?;
            if x % 3 == 2 {
                write!(f, "  ")?;
            }
        }
        writeln!(f)
    }
}

impl Display for BoardView<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let State::Concluded(conclusion) = self.snapshot.state {
            let banner = match conclusion {
                Conclusion::Win(player) => format!("!!! {player} WINS !!!"),
                Conclusion::Draw => "!!! DRAW !!!".to_string(),
            };
            let rule = "!".repeat(banner.len());
            writeln!(f, "{rule}\n{banner}\n{rule}\n")?;
        }

        let rule = format!("{MARGIN}{}", "-".repeat(36));
        Self::labels(f, |x| x % 3)?;
        Self::labels(f, |x| x / 3)?;
        Self::labels(f, |x| x)?;
        writeln!(f, "{rule}")?;

        for y in (0..9).rev() {
            write!(f, " {} {} {} ", y % 3, y / 3, y)?;
            for x in 0..9 {
                let coord = Coord::from_global(x, y).map_err(|_| fmt::Error)?;
                if coord.cell.row() == 0 {
                    write!(f, "{}", self.bar(coord.board))?;
                }
                write!(f, "{}", self.mark(self.snapshot.cells[x as usize][y as usize]))?;
                if coord.cell.row() == 2 {
                    write!(f, "{} ", self.bar(coord.board))?;
                }
            }
            writeln!(f, "{} {} {}", y, y / 3, y % 3)?;
            if y % 3 == 0 {
                writeln!(f, "{rule}")?;
            }
        }

        Self::labels(f, |x| x)?;
        Self::labels(f, |x| x / 3)?;
        Self::labels(f, |x| x % 3)
    }
}
