//! Store configuration
//!
//! Resolves where the conversation database lives and the defaults used by
//! listing and statistics queries.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::database::{StoreError, StoreResult};

/// Environment variable that overrides the database location
pub const DB_PATH_ENV: &str = "MEMORY_DB_PATH";

pub const DEFAULT_PAGE_SIZE: u32 = 50;
pub const DEFAULT_RECENT_WINDOW_DAYS: i64 = 7;
/// Upper bound on the recent window; keeps the cutoff within chrono's range
pub const MAX_RECENT_WINDOW_DAYS: i64 = 36_500;

const APP_DIR_NAME: &str = "ai-memory";
const DB_FILE_NAME: &str = "memory.db";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StoreConfig {
    /// SQLite file backing the store
    pub db_path: PathBuf,
    /// Page size used when a consumer does not choose one
    pub default_page_size: u32,
    /// How far back `recent_conversations` reaches
    pub recent_window_days: i64,
}

impl StoreConfig {
    pub fn new(db_path: impl Into<PathBuf>) -> Self {
        Self {
            db_path: db_path.into(),
            ..Default::default()
        }
    }

    /// Default config with `MEMORY_DB_PATH` applied when set
    pub fn from_env() -> Self {
        let mut config = Self::default();
        if let Some(path) = std::env::var_os(DB_PATH_ENV).filter(|p| !p.is_empty()) {
            log::info!("Using database path from {}: {:?}", DB_PATH_ENV, path);
            config.db_path = PathBuf::from(path);
        }
        config
    }

    /// Reject values the store cannot work with
    pub fn validate(&self) -> StoreResult<()> {
        if self.default_page_size == 0 {
            return Err(StoreError::validation("default_page_size", "must be > 0"));
        }
        if !(0..=MAX_RECENT_WINDOW_DAYS).contains(&self.recent_window_days) {
            return Err(StoreError::validation(
                "recent_window_days",
                format!(
                    "must be between 0 and {}, got {}",
                    MAX_RECENT_WINDOW_DAYS, self.recent_window_days
                ),
            ));
        }
        Ok(())
    }
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            db_path: default_db_path(),
            default_page_size: DEFAULT_PAGE_SIZE,
            recent_window_days: DEFAULT_RECENT_WINDOW_DAYS,
        }
    }
}

/// `<data dir>/ai-memory/memory.db`, or `./memory.db` when the platform has no data dir
pub fn default_db_path() -> PathBuf {
    dirs::data_dir()
        .map(|dir| dir.join(APP_DIR_NAME).join(DB_FILE_NAME))
        .unwrap_or_else(|| PathBuf::from(DB_FILE_NAME))
}
