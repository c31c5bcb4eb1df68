// AI Memory - local conversation record store
//
// Persists captured audio sessions (title, transcription, summary, tags) in
// SQLite and answers listing, search and statistics queries for the memory
// browser.

// Query timing macro - exported for use by other modules
#[macro_use]
pub mod macros;

pub mod config;
pub mod database;
pub mod memory_view;

pub use config::StoreConfig;
pub use database::{
    ConversationRecord, ConversationStats, ConversationStore, ConversationUpdate,
    NewConversation, Page, StoreError, StoreResult,
};
pub use memory_view::{format_duration, MemoryFilter, MemoryView};

/// Install the process logger: stderr, `RUST_LOG` aware, `info` by default.
///
/// Safe to call more than once; later calls are ignored.
pub fn init_logging() {
    let _ = env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .format_timestamp_millis()
        .try_init();
}
