//! Terminal UI: a board view for human-vs-engine play and for watching an
//! unattended engine-vs-engine match.

mod app;
mod game_view;

pub use app::App;
