// Database module for AI Memory
// Provides SQLite persistence for conversation records

pub mod manager;
pub mod migrations;
pub mod models;
pub mod error;
pub mod conversations_repo;
pub mod search;
pub mod stats_repo;

pub use manager::ConversationStore;
pub use error::{StoreError, StoreResult};
pub use models::*;
