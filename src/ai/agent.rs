use crate::error::SearchError;
use crate::game::StandardGame;

use super::search::SearchEngine;

/// Universal interface for anything that picks columns.
pub trait Agent: Send {
    /// Select a column for the player on turn in `state`.
    fn select_action(&mut self, state: &StandardGame) -> Result<usize, SearchError>;

    /// Return the agent's display name.
    fn name(&self) -> &str;
}

/// Plays with the minimax search engine.
pub struct EngineAgent {
    name: String,
    engine: SearchEngine,
}

impl EngineAgent {
    pub fn new(depth: usize) -> Self {
        Self::with_engine(SearchEngine::new(depth))
    }

    pub fn with_engine(engine: SearchEngine) -> Self {
        EngineAgent {
            name: format!("Minimax(depth={})", engine.depth()),
            engine,
        }
    }

    pub fn engine(&self) -> SearchEngine {
        self.engine
    }
}

impl Agent for EngineAgent {
    fn select_action(&mut self, state: &StandardGame) -> Result<usize, SearchError> {
        if state.is_terminal() {
            return Err(SearchError::NoLegalMove);
        }
        let mut board = *state.board();
        self.engine.select_move(&mut board, state.current_player())
    }

    fn name(&self) -> &str {
        &self.name
    }
}
