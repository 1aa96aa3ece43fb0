//! JSON backups of the in-memory state. An export is a point-in-time copy
//! stamped with the moment it was taken; it never reads from or writes to
//! the storage database.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::models::{AppState, Participant, Team};

/// File name prefix shared by every backup.
const BACKUP_PREFIX: &str = "team-builder-backup-";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
/// On-disk shape of a backup file.
pub struct Backup {
    pub users: Vec<Participant>,
    pub teams: Vec<Team>,
    /// ISO-8601 UTC timestamp with millisecond precision.
    pub export_date: String,
}

impl Backup {
    pub fn snapshot(state: &AppState, at: DateTime<Utc>) -> Self {
        Self {
            users: state.users.clone(),
            teams: state.teams.clone(),
            export_date: export_timestamp(at),
        }
    }
}

/// `2024-05-01T12:00:00.000Z` style timestamp.
pub fn export_timestamp(at: DateTime<Utc>) -> String {
    at.to_rfc3339_opts(SecondsFormat::Millis, true)
}

/// `team-builder-backup-<epoch-millis>.json`
pub fn backup_file_name(at: DateTime<Utc>) -> String {
    format!("{BACKUP_PREFIX}{}.json", at.timestamp_millis())
}

/// Pretty-printed backup document for `state` taken at `at`.
pub fn render_backup(state: &AppState, at: DateTime<Utc>) -> Result<String> {
    serde_json::to_string_pretty(&Backup::snapshot(state, at)).context("failed to serialize backup")
}

/// Write a backup of `state` into `dir` and return the path of the new file.
pub fn write_backup(dir: &Path, state: &AppState, at: DateTime<Utc>) -> Result<PathBuf> {
    fs::create_dir_all(dir)
        .with_context(|| format!("failed to create export directory {}", dir.display()))?;

    let path = dir.join(backup_file_name(at));
    let json = render_backup(state, at)?;
    fs::write(&path, json).with_context(|| format!("failed to write {}", path.display()))?;

    info!(path = %path.display(), users = state.users.len(), teams = state.teams.len(), "exported backup");
    Ok(path)
}
