//! A live game shared between the input loop and an optional background match
//! thread.
//!
//! Every turn runs "choose, apply, query status" under one lock, so there is
//! never more than one mutation of the board in flight.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{mpsc, Arc, Mutex, MutexGuard, PoisonError};
use std::thread::{self, JoinHandle};
use std::time::Duration;

use tracing::{debug, info, warn};

use crate::ai::SearchEngine;
use crate::error::{MoveError, SearchError, SessionError};
use crate::game::{GameOutcome, Player, StandardBoard, StandardGame};

/// Sleep granularity while pacing, so `quit` is noticed promptly.
const PACE_SLICE: Duration = Duration::from_millis(50);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameMode {
    HumanVsEngine { human: Player },
    EngineVsEngine,
}

impl GameMode {
    /// Whether the engine moves for `player`.
    pub fn is_engine(self, player: Player) -> bool {
        match self {
            GameMode::HumanVsEngine { human } => player != human,
            GameMode::EngineVsEngine => true,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            GameMode::HumanVsEngine { .. } => "Human vs Engine",
            GameMode::EngineVsEngine => "Engine vs Engine",
        }
    }
}

/// One completed move.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Turn {
    pub player: Player,
    pub column: usize,
    pub row: usize,
    /// Set when this move ended the game.
    pub outcome: Option<GameOutcome>,
    /// Board right after the move.
    pub board: StandardBoard,
}

/// Updates sent from the match thread to the UI.
#[derive(Debug, Clone)]
pub enum MatchUpdate {
    Move(Turn),
    Finished(GameOutcome),
}

#[derive(Debug, Clone)]
pub struct GameSession {
    state: Arc<Mutex<StandardGame>>,
    mode: GameMode,
    engine: SearchEngine,
}

impl GameSession {
    pub fn new(mode: GameMode, engine: SearchEngine) -> Self {
        Self::from_state(StandardGame::initial(), mode, engine)
    }

    pub fn from_state(state: StandardGame, mode: GameMode, engine: SearchEngine) -> Self {
        GameSession {
            state: Arc::new(Mutex::new(state)),
            mode,
            engine,
        }
    }

    pub fn mode(&self) -> GameMode {
        self.mode
    }

    pub fn engine(&self) -> SearchEngine {
        self.engine
    }

    fn lock(&self) -> MutexGuard<'_, StandardGame> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Copy of the current game.
    pub fn snapshot(&self) -> StandardGame {
        *self.lock()
    }

    pub fn reset(&self) {
        *self.lock() = StandardGame::initial();
        info!(mode = self.mode.label(), "new game");
    }

    /// True when the game is running and the engine is on turn.
    pub fn is_engine_turn(&self) -> bool {
        let state = self.lock();
        !state.is_terminal() && self.mode.is_engine(state.current_player())
    }

    /// Play a human-chosen column.
    pub fn play_human(&self, column: usize) -> Result<Turn, SessionError> {
        let mut state = self.lock();
        if state.is_terminal() {
            return Err(MoveError::GameOver.into());
        }
        if self.mode.is_engine(state.current_player()) {
            return Err(SessionError::NotYourTurn);
        }
        apply(&mut state, column)
    }

    /// Let the engine play for the side on turn. If it finds no legal move the
    /// game is declared drawn and `SearchError::NoLegalMove` is returned.
    pub fn play_engine(&self) -> Result<Turn, SessionError> {
        let mut state = self.lock();
        if state.is_terminal() {
            return Err(MoveError::GameOver.into());
        }
        let player = state.current_player();
        if !self.mode.is_engine(player) {
            return Err(SessionError::NotEngineTurn);
        }

        let mut board = *state.board();
        let column = match self.engine.select_move(&mut board, player) {
            Ok(column) => column,
            Err(err) => {
                state.declare_draw();
                info!(player = player.name(), "no legal move, game drawn");
                return Err(err.into());
            }
        };
        apply(&mut state, column)
    }
}

fn apply(state: &mut StandardGame, column: usize) -> Result<Turn, SessionError> {
    let player = state.current_player();
    let row = state.apply_move_mut(column)?;
    let turn = Turn {
        player,
        column,
        row,
        outcome: state.outcome(),
        board: *state.board(),
    };

    info!(player = player.name(), column, row, "move played");
    if let Some(outcome) = turn.outcome {
        info!(?outcome, "game over");
    }
    Ok(turn)
}

/// Sleep for `delay`, waking early if `quit` is raised. Returns false on quit.
fn pace(delay: Duration, quit: &AtomicBool) -> bool {
    let mut remaining = delay;
    while !remaining.is_zero() {
        if quit.load(Ordering::Relaxed) {
            return false;
        }
        let step = remaining.min(PACE_SLICE);
        thread::sleep(step);
        remaining -= step;
    }
    !quit.load(Ordering::Relaxed)
}

/// Run engine turns on a background thread until the game ends or `quit` is
/// raised, pausing `delay` before each move.
pub fn spawn_auto_match(
    session: GameSession,
    delay: Duration,
    updates: mpsc::Sender<MatchUpdate>,
    quit: Arc<AtomicBool>,
) -> JoinHandle<()> {
    thread::spawn(move || loop {
        if quit.load(Ordering::Relaxed) {
            debug!("auto match stopped");
            return;
        }
        if let Some(outcome) = session.snapshot().outcome() {
            let _ = updates.send(MatchUpdate::Finished(outcome));
            return;
        }
        if !pace(delay, &quit) {
            debug!("auto match stopped");
            return;
        }

        match session.play_engine() {
            Ok(turn) => {
                let _ = updates.send(MatchUpdate::Move(turn));
            }
            Err(SessionError::Search(SearchError::NoLegalMove)) => {
                let _ = updates.send(MatchUpdate::Finished(GameOutcome::Draw));
                return;
            }
            Err(err) => {
                warn!(error = %err, "auto match aborted");
                return;
            }
        }
    })
}

/// Play a whole engine-vs-engine game on the calling thread.
pub fn play_headless_match(
    engine: SearchEngine,
    delay: Duration,
    mut on_turn: impl FnMut(&Turn),
) -> Result<GameOutcome, SessionError> {
    let session = GameSession::new(GameMode::EngineVsEngine, engine);
    loop {
        if let Some(outcome) = session.snapshot().outcome() {
            return Ok(outcome);
        }
        if !delay.is_zero() {
            thread::sleep(delay);
        }
        match session.play_engine() {
            Ok(turn) => on_turn(&turn),
            Err(SessionError::Search(SearchError::NoLegalMove)) => return Ok(GameOutcome::Draw),
            Err(err) => return Err(err),
        }
    }
}
