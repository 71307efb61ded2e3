//! Core Connect Four game logic: board representation, player types, and game
//! state machine.

mod board;
mod player;
mod state;

pub use board::{Board, Cell, StandardBoard, Window, COLS, CONNECT, DIRECTIONS, ROWS};
pub use player::Player;
pub use state::{GameOutcome, GameState, StandardGame};

/// A fresh, empty board of the standard size.
pub fn new_game() -> StandardBoard {
    StandardBoard::new()
}
