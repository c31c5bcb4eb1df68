//! Memory browsing view
//!
//! The consumer side of the store: free-text search that falls back to the
//! default listing, a client-side "all / recent / long" filter, and display
//! helpers. Nothing here writes except an explicit delete.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::database::{ConversationRecord, ConversationStats, ConversationStore, Page, StoreResult};

/// Conversations longer than this count as "long" (seconds)
pub const LONG_CONVERSATION_SECS: i64 = 300;

/// Client-side filter layered over the listing
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MemoryFilter {
    #[default]
    All,
    /// Created within the store's recent window
    Recent,
    /// Longer than five minutes
    Long,
}

impl MemoryFilter {
    /// `recent_cutoff` is the earliest creation time that counts as recent
    pub fn matches(&self, record: &ConversationRecord, recent_cutoff: DateTime<Utc>) -> bool {
        match self {
            MemoryFilter::All => true,
            MemoryFilter::Recent => record.created_at >= recent_cutoff,
            MemoryFilter::Long => record.duration > LONG_CONVERSATION_SECS,
        }
    }
}

pub struct MemoryView<'a> {
    store: &'a ConversationStore,
    page: Page,
}

impl<'a> MemoryView<'a> {
    pub fn new(store: &'a ConversationStore) -> Self {
        Self {
            store,
            page: store.default_page(),
        }
    }

    pub fn with_page_size(mut self, limit: u32) -> Self {
        self.page = Page::new(limit, 0);
        self
    }

    /// Conversations to show for `query` after applying `filter`.
    ///
    /// A blank query shows the first page of the listing; anything else is a
    /// full search.
    pub fn load(&self, query: &str, filter: MemoryFilter) -> StoreResult<Vec<ConversationRecord>> {
        let records = if query.trim().is_empty() {
            self.store.get_all(self.page)?
        } else {
            self.store.search(query)?
        };

        let recent_cutoff = self.store.recent_cutoff(Utc::now())?;
        Ok(records
            .into_iter()
            .filter(|record| filter.matches(record, recent_cutoff))
            .collect())
    }

    pub fn stats(&self) -> StoreResult<ConversationStats> {
        self.store.get_stats()
    }

    pub fn delete(&self, id: i64) -> StoreResult<bool> {
        let deleted = self.store.delete(id)?;
        if !deleted {
            log::warn!("Conversation {} was already gone", id);
        }
        Ok(deleted)
    }
}

/// `m:ss`, minutes unbounded
pub fn format_duration(seconds: i64) -> String {
    let seconds = seconds.max(0);
    format!("{}:{:02}", seconds / 60, seconds % 60)
}
