// Conversation store for AI Memory
// Owns the SQLite connection and its lifecycle

use anyhow::{Context, Result};
use rusqlite::Connection;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use super::error::StoreResult;
use super::migrations;
use super::models::Page;
use crate::config::{StoreConfig, DEFAULT_PAGE_SIZE, DEFAULT_RECENT_WINDOW_DAYS};

/// Durable store of conversation records.
///
/// Every operation holds the connection lock for its whole duration, so
/// writes are serialized and each statement applies atomically. Share it
/// across threads with `Arc`.
pub struct ConversationStore {
    conn: Mutex<Connection>,
    db_path: Option<PathBuf>,
    default_page_size: u32,
    recent_window_days: i64,
}

impl ConversationStore {
    /// Open (creating if needed) the store described by `config`
    pub fn open(config: &StoreConfig) -> StoreResult<Self> {
        config.validate()?;

        let store = Self::open_at(&config.db_path)?;
        Ok(Self {
            default_page_size: config.default_page_size,
            recent_window_days: config.recent_window_days,
            ..store
        })
    }

    /// Open the store at `db_path` with default settings
    pub fn open_at(db_path: impl AsRef<Path>) -> StoreResult<Self> {
        let db_path = db_path.as_ref();

        // Ensure parent directory exists
        if let Some(parent) = db_path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create database directory {:?}", parent))?;
        }

        let conn = Connection::open(db_path)
            .with_context(|| format!("Failed to open database {:?}", db_path))?;
        let store = Self::from_connection(conn, Some(db_path.to_path_buf()))?;

        log::info!("Conversation store opened at: {:?}", db_path);
        Ok(store)
    }

    /// Open a store that lives only as long as this value
    pub fn open_in_memory() -> StoreResult<Self> {
        let conn = Connection::open_in_memory().context("Failed to open in-memory database")?;
        Self::from_connection(conn, None)
    }

    fn from_connection(conn: Connection, db_path: Option<PathBuf>) -> StoreResult<Self> {
        migrations::run_migrations(&conn).context("Failed to run database migrations")?;

        Ok(Self {
            conn: Mutex::new(conn),
            db_path,
            default_page_size: DEFAULT_PAGE_SIZE,
            recent_window_days: DEFAULT_RECENT_WINDOW_DAYS,
        })
    }

    /// Execute a function with access to the database connection
    pub(crate) fn with_connection<F, T>(&self, f: F) -> Result<T>
    where
        F: FnOnce(&Connection) -> Result<T>,
    {
        let conn = self
            .conn
            .lock()
            .map_err(|e| anyhow::anyhow!("Failed to lock database connection: {}", e))?;
        f(&conn)
    }

    /// First page of the listing at the configured page size
    pub fn default_page(&self) -> Page {
        Page::new(self.default_page_size, 0)
    }

    /// Length in days of the window counted by `recent_conversations`
    pub fn recent_window_days(&self) -> i64 {
        self.recent_window_days
    }

    /// Path of the backing file, `None` for in-memory stores
    pub fn db_path(&self) -> Option<&Path> {
        self.db_path.as_deref()
    }

    /// Release the underlying file handle, reporting any failure to close it
    pub fn close(self) -> StoreResult<()> {
        let conn = self
            .conn
            .into_inner()
            .map_err(|e| anyhow::anyhow!("Database connection lock poisoned: {}", e))?;

        conn.close()
            .map_err(|(_, e)| e)
            .context("Failed to close database")?;

        log::info!("Conversation store closed: {:?}", self.db_path);
        Ok(())
    }
}
