//! Runtime configuration resolved from the environment with home-directory
//! defaults.

use std::env;
use std::path::{Path, PathBuf};

use anyhow::{anyhow, Result};
use directories::{BaseDirs, UserDirs};

/// Folder name used beneath the user's home directory for application data.
const DATA_DIR_NAME: &str = ".team-builder";
/// SQLite file name stored inside the application data directory.
const DB_FILE_NAME: &str = "team-builder.sqlite";
/// Log file name stored inside the application data directory.
const LOG_FILE_NAME: &str = "team-builder.log";
/// Filter applied when `LOG_FILTER_ENV` is unset.
const DEFAULT_LOG_FILTER: &str = "info";

/// Overrides the data directory.
pub const HOME_ENV: &str = "TEAM_BUILDER_HOME";
/// Overrides where backups are written.
pub const EXPORT_DIR_ENV: &str = "TEAM_BUILDER_EXPORT_DIR";
/// `tracing_subscriber::EnvFilter` directive for the log file.
pub const LOG_FILTER_ENV: &str = "TEAM_BUILDER_LOG";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    pub data_dir: PathBuf,
    pub export_dir: PathBuf,
    pub log_filter: String,
}

impl AppConfig {
    /// Resolve the configuration from the process environment.
    pub fn from_env() -> Result<Self> {
        Self::resolve(|key| env::var(key).ok())
    }

    /// Resolve the configuration through `lookup`, which stands in for the
    /// environment. Blank values count as unset.
    pub fn resolve<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let lookup = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());

        let data_dir = match lookup(HOME_ENV) {
            Some(dir) => PathBuf::from(dir),
            None => default_data_dir()?,
        };
        let export_dir = match lookup(EXPORT_DIR_ENV) {
            Some(dir) => PathBuf::from(dir),
            None => default_export_dir(&data_dir),
        };
        let log_filter = lookup(LOG_FILTER_ENV).unwrap_or_else(|| DEFAULT_LOG_FILTER.to_string());

        Ok(Self {
            data_dir,
            export_dir,
            log_filter,
        })
    }

    pub fn db_path(&self) -> PathBuf {
        self.data_dir.join(DB_FILE_NAME)
    }

    pub fn log_path(&self) -> PathBuf {
        self.data_dir.join(LOG_FILE_NAME)
    }
}

fn default_data_dir() -> Result<PathBuf> {
    let base_dirs = BaseDirs::new().ok_or_else(|| anyhow!("could not locate home directory"))?;
    Ok(base_dirs.home_dir().join(DATA_DIR_NAME))
}

/// Backups land where a browser would put them: the download folder, or the
/// data directory when the platform has none.
fn default_export_dir(data_dir: &Path) -> PathBuf {
    UserDirs::new()
        .and_then(|dirs| dirs.download_dir().map(Path::to_path_buf))
        .unwrap_or_else(|| data_dir.to_path_buf())
}
