//! Load and save of the JSON state blob and the theme preference, each
//! under its own storage key.

use anyhow::{Context, Result};
use rusqlite::Connection;
use tracing::{debug, warn};

use crate::db::{get_value, set_value};
use crate::models::{AppState, Theme};

/// Storage key holding the serialized `AppState`.
pub const DATA_KEY: &str = "data";
/// Storage key holding the theme preference, independent of `DATA_KEY`.
pub const THEME_KEY: &str = "theme";

/// Hydrate the state saved under `DATA_KEY`. A missing, unreadable or
/// corrupt value means a fresh start, never an error.
pub fn load_state(conn: &Connection) -> AppState {
    let raw = match get_value(conn, DATA_KEY) {
        Ok(Some(raw)) => raw,
        Ok(None) => return AppState::default(),
        Err(err) => {
            warn!(error = %err, "could not read saved state; starting empty");
            return AppState::default();
        }
    };

    let Some(state) = decode_state(&raw) else {
        warn!(bytes = raw.len(), "saved state is not valid JSON; starting empty");
        return AppState::default();
    };
    debug!(users = state.users.len(), teams = state.teams.len(), "loaded saved state");
    state
}

/// Overwrite the blob under `DATA_KEY` with the whole state.
pub fn save_state(conn: &Connection, state: &AppState) -> Result<()> {
    let json = encode_state(state)?;
    set_value(conn, DATA_KEY, &json)?;
    debug!(users = state.users.len(), teams = state.teams.len(), "saved state");
    Ok(())
}

pub fn encode_state(state: &AppState) -> Result<String> {
    serde_json::to_string(state).context("failed to serialize state")
}

pub fn decode_state(raw: &str) -> Option<AppState> {
    serde_json::from_str(raw).ok()
}

pub fn load_theme(conn: &Connection) -> Theme {
    match get_value(conn, THEME_KEY) {
        Ok(Some(raw)) => Theme::from_stored(&raw),
        Ok(None) => Theme::default(),
        Err(err) => {
            warn!(error = %err, "could not read theme preference");
            Theme::default()
        }
    }
}

pub fn save_theme(conn: &Connection, theme: Theme) -> Result<()> {
    set_value(conn, THEME_KEY, theme.as_str())
}
