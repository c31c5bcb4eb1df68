// Statistics for AI Memory
// Aggregates recomputed from the conversations table on every call

use anyhow::{anyhow, Context, Result};
use chrono::{DateTime, Duration, Utc};
use rusqlite::{params, Connection};

use super::error::StoreResult;
use super::models::{format_timestamp, ConversationStats};
use super::ConversationStore;

impl ConversationStore {
    /// Totals over all conversations, plus the count created in the recent window
    pub fn get_stats(&self) -> StoreResult<ConversationStats> {
        let cutoff = self.recent_cutoff(Utc::now())?;
        Ok(self.with_connection(|conn| get_stats_impl(conn, cutoff))?)
    }

    /// Earliest `created_at` that still counts as recent at `now`
    pub fn recent_cutoff(&self, now: DateTime<Utc>) -> StoreResult<DateTime<Utc>> {
        Ok(recent_cutoff(now, self.recent_window_days())?)
    }
}

fn recent_cutoff(now: DateTime<Utc>, window_days: i64) -> Result<DateTime<Utc>> {
    Duration::try_days(window_days)
        .and_then(|window| now.checked_sub_signed(window))
        .ok_or_else(|| anyhow!("Recent window of {} days is out of range", window_days))
}

fn get_stats_impl(conn: &Connection, cutoff: DateTime<Utc>) -> Result<ConversationStats> {
    let cutoff = format_timestamp(&cutoff);

    conn.query_row(
        r#"
        SELECT COUNT(*),
               COALESCE(SUM(duration), 0),
               COUNT(CASE WHEN created_at >= ?1 THEN 1 END)
        FROM conversations
        "#,
        params![cutoff],
        |row| {
            Ok(ConversationStats {
                total_conversations: row.get(0)?,
                total_duration: row.get(1)?,
                recent_conversations: row.get(2)?,
            })
        },
    ).context("Failed to compute conversation stats")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::StoreConfig;
    use crate::database::NewConversation;

    fn backdate(store: &ConversationStore, id: i64, ts: DateTime<Utc>) {
        store
            .with_connection(|conn| {
                conn.execute(
                    "UPDATE conversations SET created_at = ?1, updated_at = ?1 WHERE id = ?2",
                    params![format_timestamp(&ts), id],
                )?;
                Ok(())
            })
            .unwrap();
    }

    #[test]
    fn test_stats_on_empty_store() {
        let store = ConversationStore::open_in_memory().unwrap();
        assert_eq!(store.get_stats().unwrap(), ConversationStats::default());
    }

    #[test]
    fn test_stats_totals_and_recent_window() {
        let store = ConversationStore::open_in_memory().unwrap();
        store.save(&NewConversation::new("Today A", "").with_duration(60)).unwrap();
        store.save(&NewConversation::new("Today B", "").with_duration(125)).unwrap();
        let old = store.save(&NewConversation::new("Old", "").with_duration(300)).unwrap();
        backdate(&store, old, Utc::now() - Duration::days(10));

        let stats = store.get_stats().unwrap();
        assert_eq!(stats.total_conversations, 3);
        assert_eq!(stats.total_duration, 485);
        assert_eq!(stats.recent_conversations, 2);
    }

    #[test]
    fn test_stats_follow_deletes() {
        let store = ConversationStore::open_in_memory().unwrap();
        let id = store.save(&NewConversation::new("Memo", "").with_duration(90)).unwrap();
        assert_eq!(store.get_stats().unwrap().total_duration, 90);

        store.delete(id).unwrap();
        assert_eq!(store.get_stats().unwrap(), ConversationStats::default());
    }

    #[test]
    fn test_recent_window_boundary() {
        let store = ConversationStore::open_in_memory().unwrap();
        let now = Utc::now();
        let inside = store.save(&NewConversation::new("Inside", "")).unwrap();
        let outside = store.save(&NewConversation::new("Outside", "")).unwrap();
        backdate(&store, inside, now - Duration::days(7) + Duration::minutes(1));
        backdate(&store, outside, now - Duration::days(7) - Duration::minutes(1));

        let cutoff = recent_cutoff(now, 7).unwrap();
        let stats = store
            .with_connection(|conn| get_stats_impl(conn, cutoff))
            .unwrap();
        assert_eq!(stats.total_conversations, 2);
        assert_eq!(stats.recent_conversations, 1);
    }

    #[test]
    fn test_cutoff_out_of_range_is_an_error() {
        let now = Utc::now();
        assert!(recent_cutoff(now, 100_000_000).is_err());
        assert!(recent_cutoff(now, i64::MAX).is_err());
        assert_eq!(recent_cutoff(now, 0).unwrap(), now);
    }

    #[test]
    fn test_configured_window_drives_recent_count() {
        let dir = tempfile::tempdir().unwrap();
        let config = StoreConfig {
            recent_window_days: 30,
            ..StoreConfig::new(dir.path().join("memory.db"))
        };
        let store = ConversationStore::open(&config).unwrap();
        let id = store.save(&NewConversation::new("Last month", "")).unwrap();
        backdate(&store, id, Utc::now() - Duration::days(10));

        assert_eq!(store.get_stats().unwrap().recent_conversations, 1);
    }
}
