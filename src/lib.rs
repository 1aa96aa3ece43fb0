//! Core library surface for the team builder TUI.
//!
//! The binary only wires configuration, logging, storage and the event loop
//! together; everything it needs is re-exported here.
pub mod config;
pub mod db;
pub mod error;
pub mod export;
pub mod leaderboard;
pub mod logging;
pub mod models;
pub mod partition;
pub mod persist;
pub mod roster;
pub mod ui;

pub use config::AppConfig;
pub use db::open_database;
pub use error::DistributeError;
pub use export::{write_backup, Backup};
pub use leaderboard::{rank, LeaderboardEntry, Medal, SortDirection};
pub use logging::init_tracing;
pub use models::{AppState, Participant, Team, Theme};
pub use partition::DistributionMode;
pub use persist::{load_theme, save_theme};
pub use roster::{parse_score, Distribution, RosterStore};

/// The interactive application entry point and state container.
pub use ui::{run_app, App};
