//! Ratatui front-end: three panes (people, teams, leaderboard) over a footer,
//! with modal forms layered on top.

mod app;
mod forms;
mod helpers;
mod screens;
mod terminal;
mod theme;

pub use app::App;
pub use terminal::run_app;
