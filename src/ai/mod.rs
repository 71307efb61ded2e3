//! Move selection: the minimax search engine, its static evaluator, and the
//! agents that wrap it.

mod agent;
pub mod evaluate;
mod random;
pub mod search;

pub use agent::{Agent, EngineAgent};
pub use evaluate::{evaluate_board, evaluate_player};
pub use random::RandomAgent;
pub use search::{Role, SearchEngine, SearchReport, Tier, DEFAULT_DEPTH, WIN_SCORE};
