use std::io::{self, Stdout};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{mpsc, Arc};
use std::thread::JoinHandle;
use std::time::Duration;

use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind};
use ratatui::{backend::CrosstermBackend, Terminal};
use tracing::warn;

use crate::ai::Tier;
use crate::error::{MoveError, SearchError, SessionError};
use crate::game::{GameOutcome, COLS};
use crate::session::{spawn_auto_match, GameMode, GameSession, MatchUpdate, Turn};

pub struct App {
    session: GameSession,
    move_delay: Duration,
    selected_column: usize,
    should_quit: bool,
    message: Option<String>,
    updates: Option<mpsc::Receiver<MatchUpdate>>,
    stop: Arc<AtomicBool>,
    worker: Option<JoinHandle<()>>,
}

impl App {
    pub fn new(session: GameSession, move_delay: Duration) -> Self {
        let mut app = App {
            session,
            move_delay,
            selected_column: COLS / 2, // Start in middle
            should_quit: false,
            message: None,
            updates: None,
            stop: Arc::new(AtomicBool::new(false)),
            worker: None,
        };
        app.start_game();
        app
    }

    /// Main application loop
    pub fn run(&mut self, terminal: &mut Terminal<CrosstermBackend<Stdout>>) -> io::Result<()> {
        loop {
            self.drain_updates();
            terminal.draw(|f| self.render(f))?;

            if self.should_quit {
                break;
            }

            self.handle_events()?;
        }
        self.stop_worker();
        Ok(())
    }

    /// Kick off whoever moves first.
    fn start_game(&mut self) {
        match self.session.mode() {
            GameMode::EngineVsEngine => {
                let (tx, rx) = mpsc::channel();
                self.stop = Arc::new(AtomicBool::new(false));
                self.worker = Some(spawn_auto_match(
                    self.session.clone(),
                    self.move_delay,
                    tx,
                    self.stop.clone(),
                ));
                self.updates = Some(rx);
            }
            GameMode::HumanVsEngine { .. } => {
                if self.session.is_engine_turn() {
                    self.engine_reply();
                }
            }
        }
    }

    fn stop_worker(&mut self) {
        self.stop.store(true, Ordering::Relaxed);
        if let Some(worker) = self.worker.take() {
            if worker.join().is_err() {
                warn!("auto match thread panicked");
            }
        }
        self.updates = None;
    }

    /// Apply updates from the background match, if one is running.
    fn drain_updates(&mut self) {
        let Some(rx) = &self.updates else {
            return;
        };
        let mut latest = None;
        while let Ok(update) = rx.try_recv() {
            latest = Some(match update {
                MatchUpdate::Move(turn) => describe_turn(&turn),
                MatchUpdate::Finished(outcome) => describe_outcome(outcome),
            });
        }
        if latest.is_some() {
            self.message = latest;
        }
    }

    /// Handle keyboard events
    fn handle_events(&mut self) -> io::Result<()> {
        if event::poll(Duration::from_millis(100))? {
            if let Event::Key(key) = event::read()? {
                if key.kind == KeyEventKind::Press {
                    self.handle_key(key);
                }
            }
        }
        Ok(())
    }

    /// Handle key press
    fn handle_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Char('q') | KeyCode::Esc => {
                self.should_quit = true;
            }
            KeyCode::Left => {
                self.selected_column = self.selected_column.saturating_sub(1);
            }
            KeyCode::Right => {
                if self.selected_column + 1 < COLS {
                    self.selected_column += 1;
                }
            }
            KeyCode::Enter | KeyCode::Char(' ') => {
                self.drop_piece();
            }
            KeyCode::Char('h') => {
                self.show_hint();
            }
            KeyCode::Char('r') => {
                self.stop_worker();
                self.session.reset();
                self.selected_column = COLS / 2;
                self.message = Some("New game started!".to_string());
                self.start_game();
            }
            _ => {}
        }
    }

    /// Drop piece in selected column, then let the engine answer
    fn drop_piece(&mut self) {
        match self.session.play_human(self.selected_column) {
            Ok(turn) => {
                self.message = Some(describe_turn(&turn));
                if turn.outcome.is_none() {
                    self.engine_reply();
                }
            }
            Err(err) => self.message = Some(describe_error(err)),
        }
    }

    fn engine_reply(&mut self) {
        self.message = Some(match self.session.play_engine() {
            Ok(turn) => describe_turn(&turn),
            Err(err) => describe_error(err),
        });
    }

    /// Ask the engine what it would play for the human.
    fn show_hint(&mut self) {
        let state = self.session.snapshot();
        if state.is_terminal() || self.session.mode() == GameMode::EngineVsEngine {
            return;
        }
        let mut board = *state.board();
        self.message = Some(
            match self.session.engine().analyze(&mut board, state.current_player()) {
                Ok(report) => {
                    let reason = match report.tier {
                        Tier::ImmediateWin => "wins now",
                        Tier::ImmediateBlock => "blocks a win",
                        Tier::Opening => "any opening",
                        Tier::Minimax => "best by search",
                    };
                    format!("Hint: column {} ({reason})", report.column + 1)
                }
                Err(err) => err.to_string(),
            },
        );
    }

    /// Render the UI
    fn render(&self, frame: &mut ratatui::Frame) {
        let state = self.session.snapshot();
        let selected = match self.session.mode() {
            GameMode::HumanVsEngine { .. } => Some(self.selected_column),
            GameMode::EngineVsEngine => None,
        };
        super::game_view::render(
            frame,
            &state,
            selected,
            &self.message,
            self.session.mode().label(),
        );
    }
}

impl Drop for App {
    fn drop(&mut self) {
        self.stop_worker();
    }
}

fn describe_turn(turn: &Turn) -> String {
    match turn.outcome {
        Some(outcome) => describe_outcome(outcome),
        None => format!("{} played column {}", turn.player, turn.column + 1),
    }
}

fn describe_outcome(outcome: GameOutcome) -> String {
    match outcome {
        GameOutcome::Winner(player) => format!("{player} wins! Press 'r' to restart."),
        GameOutcome::Draw => "It's a draw! Press 'r' to restart.".to_string(),
    }
}

fn describe_error(err: SessionError) -> String {
    match err {
        SessionError::Move(MoveError::ColumnFull(_)) => "Column is full!".to_string(),
        SessionError::Move(MoveError::InvalidColumn(_)) => "Invalid column!".to_string(),
        SessionError::Move(MoveError::GameOver) => {
            "Game over! Press 'r' to restart.".to_string()
        }
        SessionError::Search(SearchError::NoLegalMove) => {
            "It's a draw! Press 'r' to restart.".to_string()
        }
        SessionError::NotYourTurn | SessionError::NotEngineTurn => {
            "Wait for the engine to move.".to_string()
        }
    }
}
