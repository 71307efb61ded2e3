//! # Connect Four
//!
//! Connect Four against a computer opponent. The opponent takes an immediate
//! win, otherwise blocks an immediate loss, otherwise runs a depth-limited
//! minimax search with alpha-beta pruning over a simple material evaluator.
//!
//! ## Modules
//!
//! - [`game`] — Core game logic: board, player, state machine
//! - [`ai`] — Search engine, static evaluator, agents
//! - [`session`] — Shared game behind a mutex, unattended match thread
//! - [`ui`] — Terminal UI
//! - [`config`] — TOML configuration loading and validation
//! - [`error`] — Structured error types

pub mod ai;
pub mod config;
pub mod error;
pub mod game;
pub mod session;
pub mod ui;
