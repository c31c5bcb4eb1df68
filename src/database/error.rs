// Error types for the conversation store
// Separates caller-correctable input problems from storage failures

use thiserror::Error;

/// Errors returned by [`ConversationStore`](super::ConversationStore) operations
#[derive(Debug, Error)]
pub enum StoreError {
    /// Input rejected before touching the database
    #[error("invalid {field}: {message}")]
    Validation {
        field: &'static str,
        message: String,
    },

    /// SQLite or file-system failure. Not recoverable by the store.
    #[error("storage failure: {0:#}")]
    Storage(#[from] anyhow::Error),
}

impl StoreError {
    pub(crate) fn validation(field: &'static str, message: impl Into<String>) -> Self {
        StoreError::Validation {
            field,
            message: message.into(),
        }
    }

    /// True for errors the caller can fix by changing the input
    pub fn is_validation(&self) -> bool {
        matches!(self, StoreError::Validation { .. })
    }
}

pub type StoreResult<T> = std::result::Result<T, StoreError>;
