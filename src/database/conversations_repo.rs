// Conversations repository for AI Memory
// Handles CRUD operations for conversation records

use anyhow::{Context, Result};
use chrono::Utc;
use rusqlite::{params, Connection, Row};

use super::error::{StoreError, StoreResult};
use super::models::{
    format_timestamp, non_empty, parse_timestamp, ConversationRecord, ConversationUpdate,
    NewConversation, Page,
};
use super::ConversationStore;

pub(super) const CONVERSATION_COLUMNS: &str = "id, title, transcription, duration, created_at, \
     updated_at, audio_file_name, summary, tags";

impl ConversationStore {
    /// Save a new conversation and return its id
    pub fn save(&self, new: &NewConversation) -> StoreResult<i64> {
        validate_title(&new.title)?;
        validate_duration(new.duration)?;

        let id = timed!(
            "save_conversation",
            self.with_connection(|conn| save_impl(conn, new))
        )?;
        log::debug!("Saved conversation {} ({:?})", id, new.title);
        Ok(id)
    }

    /// Get a conversation by ID
    pub fn get_by_id(&self, id: i64) -> StoreResult<Option<ConversationRecord>> {
        Ok(self.with_connection(|conn| get_by_id_impl(conn, id))?)
    }

    /// Get a page of conversations, most recent first
    pub fn get_all(&self, page: Page) -> StoreResult<Vec<ConversationRecord>> {
        Ok(timed!(
            "get_all_conversations",
            self.with_connection(|conn| get_all_impl(conn, Some(page)))
        )?)
    }

    /// Get every conversation, most recent first
    pub fn list_all(&self) -> StoreResult<Vec<ConversationRecord>> {
        Ok(self.with_connection(|conn| get_all_impl(conn, None))?)
    }

    /// Number of stored conversations
    pub fn count(&self) -> StoreResult<i64> {
        Ok(self.with_connection(count_impl)?)
    }

    /// Apply the fields set in `updates`.
    ///
    /// Returns `false` when no conversation has this id, or when `updates`
    /// carries no fields (the row is left untouched in that case).
    pub fn update(&self, id: i64, updates: &ConversationUpdate) -> StoreResult<bool> {
        if let Some(ref title) = updates.title {
            validate_title(title)?;
        }
        if let Some(duration) = updates.duration {
            validate_duration(duration)?;
        }

        if updates.is_empty() {
            log::debug!("Ignoring empty update for conversation {}", id);
            return Ok(false);
        }

        let updated = self.with_connection(|conn| update_impl(conn, id, updates))?;
        log::debug!("Update conversation {}: applied={}", id, updated);
        Ok(updated)
    }

    /// Permanently delete a conversation. Returns `false` if it did not exist.
    pub fn delete(&self, id: i64) -> StoreResult<bool> {
        let deleted = self.with_connection(|conn| delete_impl(conn, id))?;
        log::debug!("Delete conversation {}: removed={}", id, deleted);
        Ok(deleted)
    }
}

fn validate_title(title: &str) -> StoreResult<()> {
    if title.trim().is_empty() {
        log::warn!("Rejected conversation with empty title");
        return Err(StoreError::validation("title", "must not be empty"));
    }
    Ok(())
}

fn validate_duration(duration: i64) -> StoreResult<()> {
    if duration < 0 {
        log::warn!("Rejected conversation with negative duration {}", duration);
        return Err(StoreError::validation(
            "duration",
            format!("must be >= 0, got {}", duration),
        ));
    }
    Ok(())
}

pub(super) fn row_to_conversation(row: &Row<'_>) -> rusqlite::Result<ConversationRecord> {
    Ok(ConversationRecord {
        id: row.get(0)?,
        title: row.get(1)?,
        transcription: row.get(2)?,
        duration: row.get(3)?,
        created_at: timestamp_column(row, 4)?,
        updated_at: timestamp_column(row, 5)?,
        audio_file_name: row.get(6)?,
        summary: row.get(7)?,
        tags: row.get(8)?,
    })
}

fn timestamp_column(row: &Row<'_>, idx: usize) -> rusqlite::Result<chrono::DateTime<Utc>> {
    let raw: String = row.get(idx)?;
    parse_timestamp(&raw).map_err(|e| {
        rusqlite::Error::FromSqlConversionFailure(idx, rusqlite::types::Type::Text, Box::new(e))
    })
}

fn save_impl(conn: &Connection, new: &NewConversation) -> Result<i64> {
    let now = format_timestamp(&Utc::now());

    conn.execute(
        r#"
        INSERT INTO conversations (
            title, transcription, duration, created_at, updated_at,
            audio_file_name, summary, tags
        ) VALUES (?1, ?2, ?3, ?4, ?4, ?5, ?6, ?7)
        "#,
        params![
            new.title,
            new.transcription,
            new.duration,
            now,
            non_empty(&new.audio_file_name),
            non_empty(&new.summary),
            non_empty(&new.tags),
        ],
    ).context("Failed to save conversation")?;

    Ok(conn.last_insert_rowid())
}

fn get_by_id_impl(conn: &Connection, id: i64) -> Result<Option<ConversationRecord>> {
    let mut stmt = conn.prepare(&format!(
        "SELECT {} FROM conversations WHERE id = ?",
        CONVERSATION_COLUMNS
    )).context("Failed to prepare get_conversation query")?;

    let result = stmt.query_row(params![id], row_to_conversation);

    match result {
        Ok(record) => Ok(Some(record)),
        Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
        Err(e) => Err(e).context("Failed to get conversation"),
    }
}

fn get_all_impl(conn: &Connection, page: Option<Page>) -> Result<Vec<ConversationRecord>> {
    let mut sql = format!(
        "SELECT {} FROM conversations ORDER BY created_at DESC, id DESC",
        CONVERSATION_COLUMNS
    );
    let mut params_vec: Vec<Box<dyn rusqlite::ToSql>> = Vec::new();

    if let Some(page) = page {
        sql.push_str(" LIMIT ?1 OFFSET ?2");
        params_vec.push(Box::new(page.limit));
        params_vec.push(Box::new(page.offset));
    }

    let params_refs: Vec<&dyn rusqlite::ToSql> = params_vec.iter().map(|b| b.as_ref()).collect();

    let mut stmt = conn.prepare(&sql).context("Failed to prepare get_all_conversations query")?;
    let records = stmt
        .query_map(params_refs.as_slice(), row_to_conversation)
        .context("Failed to query conversations")?;

    records
        .collect::<std::result::Result<Vec<_>, _>>()
        .context("Failed to read conversation row")
}

fn count_impl(conn: &Connection) -> Result<i64> {
    conn.query_row("SELECT COUNT(*) FROM conversations", [], |row| row.get(0))
        .context("Failed to count conversations")
}

fn update_impl(conn: &Connection, id: i64, updates: &ConversationUpdate) -> Result<bool> {
    let mut set_clauses = Vec::new();
    let mut params_vec: Vec<Box<dyn rusqlite::ToSql>> = Vec::new();

    if let Some(ref title) = updates.title {
        set_clauses.push("title = ?");
        params_vec.push(Box::new(title.clone()));
    }
    if let Some(ref transcription) = updates.transcription {
        set_clauses.push("transcription = ?");
        params_vec.push(Box::new(transcription.clone()));
    }
    if let Some(duration) = updates.duration {
        set_clauses.push("duration = ?");
        params_vec.push(Box::new(duration));
    }
    // Empty string means "clear the field" (set to NULL)
    if updates.audio_file_name.is_some() {
        set_clauses.push("audio_file_name = ?");
        params_vec.push(Box::new(non_empty(&updates.audio_file_name).map(str::to_string)));
    }
    if updates.summary.is_some() {
        set_clauses.push("summary = ?");
        params_vec.push(Box::new(non_empty(&updates.summary).map(str::to_string)));
    }
    if updates.tags.is_some() {
        set_clauses.push("tags = ?");
        params_vec.push(Box::new(non_empty(&updates.tags).map(str::to_string)));
    }

    if set_clauses.is_empty() {
        return Ok(false);
    }

    // Never move updated_at backwards, even if the clock does
    set_clauses.push("updated_at = MAX(?, updated_at)");
    params_vec.push(Box::new(format_timestamp(&Utc::now())));
    params_vec.push(Box::new(id));

    let query = format!(
        "UPDATE conversations SET {} WHERE id = ?",
        set_clauses.join(", ")
    );

    let params_refs: Vec<&dyn rusqlite::ToSql> = params_vec.iter().map(|b| b.as_ref()).collect();

    let changed = conn.execute(&query, params_refs.as_slice())
        .context("Failed to update conversation")?;

    Ok(changed > 0)
}

fn delete_impl(conn: &Connection, id: i64) -> Result<bool> {
    let deleted = conn.execute("DELETE FROM conversations WHERE id = ?", params![id])
        .context("Failed to delete conversation")?;
    Ok(deleted > 0)
}
