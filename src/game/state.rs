use super::board::{Board, COLS, ROWS};
use super::player::Player;
use crate::error::MoveError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameOutcome {
    Winner(Player),
    Draw,
}

pub type StandardGame = GameState<ROWS, COLS>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GameState<const R: usize, const C: usize> {
    board: Board<R, C>,
    current_player: Player,
    outcome: Option<GameOutcome>,
}

impl<const R: usize, const C: usize> GameState<R, C> {
    /// Create initial game state
    pub fn initial() -> Self {
        GameState {
            board: Board::new(),
            current_player: Player::Red, // Red starts
            outcome: None,
        }
    }

    /// Resume from an existing position with `to_move` on turn. The outcome
    /// is derived from the board.
    pub fn from_board(board: Board<R, C>, to_move: Player) -> Self {
        let outcome = if board.has_connection(to_move.other()) {
            Some(GameOutcome::Winner(to_move.other()))
        } else if board.has_connection(to_move) {
            Some(GameOutcome::Winner(to_move))
        } else if board.is_full() {
            Some(GameOutcome::Draw)
        } else {
            None
        };
        GameState {
            board,
            current_player: to_move,
            outcome,
        }
    }

    /// Get current player
    pub fn current_player(&self) -> Player {
        self.current_player
    }

    /// Get reference to board
    pub fn board(&self) -> &Board<R, C> {
        &self.board
    }

    /// Get game outcome if game is over
    pub fn outcome(&self) -> Option<GameOutcome> {
        self.outcome
    }

    /// Check if game is over
    pub fn is_terminal(&self) -> bool {
        self.outcome.is_some()
    }

    /// Mark the game drawn; used when the engine finds no legal move.
    pub fn declare_draw(&mut self) {
        if self.outcome.is_none() {
            self.outcome = Some(GameOutcome::Draw);
        }
    }

    /// Get list of legal columns (not full)
    pub fn legal_actions(&self) -> Vec<usize> {
        if self.is_terminal() {
            return Vec::new();
        }
        self.board.legal_columns().collect()
    }

    /// Apply a move and return new state (immutable)
    pub fn apply_move(&self, column: usize) -> Result<GameState<R, C>, MoveError> {
        let mut next = *self;
        next.apply_move_mut(column)?;
        Ok(next)
    }

    /// Apply move in place, returning the row the piece landed in
    pub fn apply_move_mut(&mut self, column: usize) -> Result<usize, MoveError> {
        if self.is_terminal() {
            return Err(MoveError::GameOver);
        }

        let row = self.board.apply_move(column, self.current_player)?;

        if self.board.has_connection(self.current_player) {
            self.outcome = Some(GameOutcome::Winner(self.current_player));
        } else if self.board.is_full() {
            self.outcome = Some(GameOutcome::Draw);
        }

        self.current_player = self.current_player.other();

        Ok(row)
    }
}

impl<const R: usize, const C: usize> Default for GameState<R, C> {
    fn default() -> Self {
        Self::initial()
    }
}
