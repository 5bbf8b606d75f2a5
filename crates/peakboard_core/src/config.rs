//! Process configuration resolved from environment variables.
//!
//! Blank values are treated as unset.

use crate::logging::default_log_level;
use std::path::PathBuf;

pub const DB_PATH_ENV: &str = "PEAKBOARD_DB_PATH";
pub const LOG_LEVEL_ENV: &str = "PEAKBOARD_LOG_LEVEL";
pub const LOG_DIR_ENV: &str = "PEAKBOARD_LOG_DIR";

const DEFAULT_DB_FILE_NAME: &str = "peakboard.sqlite3";

/// Resolved core settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CoreConfig {
    /// SQLite file holding the key-value space.
    pub db_path: PathBuf,
    /// One of `trace|debug|info|warn|error`.
    pub log_level: String,
    /// Rolling log directory; file logging stays off when `None`.
    pub log_dir: Option<PathBuf>,
}

impl CoreConfig {
    /// Reads `PEAKBOARD_*` variables from the process environment.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Resolves settings through `lookup`, falling back to defaults.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let non_blank = |key: &str| {
            lookup(key)
                .map(|value| value.trim().to_string())
                .filter(|value| !value.is_empty())
        };

        Self {
            db_path: non_blank(DB_PATH_ENV)
                .map(PathBuf::from)
                .unwrap_or_else(|| std::env::temp_dir().join(DEFAULT_DB_FILE_NAME)),
            log_level: non_blank(LOG_LEVEL_ENV)
                .unwrap_or_else(|| default_log_level().to_string()),
            log_dir: non_blank(LOG_DIR_ENV).map(PathBuf::from),
        }
    }
}
