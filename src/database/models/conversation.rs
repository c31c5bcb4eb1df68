// Database models - Conversation
use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};

/// One captured-and-processed audio session
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConversationRecord {
    pub id: i64,
    pub title: String,
    pub transcription: String,
    /// Length in seconds
    pub duration: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub audio_file_name: Option<String>,
    pub summary: Option<String>,
    pub tags: Option<String>,
}

/// Fields supplied when saving a new conversation.
///
/// `id`, `created_at` and `updated_at` are assigned by the store.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NewConversation {
    pub title: String,
    pub transcription: String,
    #[serde(default)]
    pub duration: i64,
    #[serde(default)]
    pub audio_file_name: Option<String>,
    #[serde(default)]
    pub summary: Option<String>,
    #[serde(default)]
    pub tags: Option<String>,
}

impl NewConversation {
    pub fn new(title: impl Into<String>, transcription: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            transcription: transcription.into(),
            ..Default::default()
        }
    }

    pub fn with_duration(mut self, seconds: i64) -> Self {
        self.duration = seconds;
        self
    }

    pub fn with_audio_file_name(mut self, name: impl Into<String>) -> Self {
        self.audio_file_name = Some(name.into());
        self
    }

    pub fn with_summary(mut self, summary: impl Into<String>) -> Self {
        self.summary = Some(summary.into());
        self
    }

    pub fn with_tags(mut self, tags: impl Into<String>) -> Self {
        self.tags = Some(tags.into());
        self
    }
}

/// Updates that can be applied to a conversation.
///
/// Only `Some` fields are written. For the optional text fields an empty
/// string clears the stored value.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ConversationUpdate {
    pub title: Option<String>,
    pub transcription: Option<String>,
    pub duration: Option<i64>,
    pub audio_file_name: Option<String>,
    pub summary: Option<String>,
    pub tags: Option<String>,
}

impl ConversationUpdate {
    pub fn is_empty(&self) -> bool {
        self.title.is_none()
            && self.transcription.is_none()
            && self.duration.is_none()
            && self.audio_file_name.is_none()
            && self.summary.is_none()
            && self.tags.is_none()
    }
}

/// Aggregate figures over the whole store, computed at query time
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConversationStats {
    pub total_conversations: i64,
    /// Sum of all durations in seconds
    pub total_duration: i64,
    pub recent_conversations: i64,
}

/// A window over the ordered conversation list
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Page {
    pub limit: u32,
    pub offset: u32,
}

impl Page {
    pub const DEFAULT_LIMIT: u32 = crate::config::DEFAULT_PAGE_SIZE;

    pub fn new(limit: u32, offset: u32) -> Self {
        Self { limit, offset }
    }
}

impl Default for Page {
    fn default() -> Self {
        Self::new(Self::DEFAULT_LIMIT, 0)
    }
}

/// Storage form of a timestamp. Fixed width so text order is time order.
pub(crate) fn format_timestamp(ts: &DateTime<Utc>) -> String {
    ts.to_rfc3339_opts(SecondsFormat::Millis, true)
}

pub(crate) fn parse_timestamp(raw: &str) -> Result<DateTime<Utc>, chrono::ParseError> {
    DateTime::parse_from_rfc3339(raw).map(|ts| ts.with_timezone(&Utc))
}

/// Empty optional text is stored as NULL
pub(crate) fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|v| !v.is_empty())
}
