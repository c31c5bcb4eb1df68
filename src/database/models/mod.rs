// Database models - Re-exports all domain-specific models
//
// - conversation.rs: Conversation records, inputs and aggregates

mod conversation;

pub use conversation::{
    ConversationRecord, ConversationStats, ConversationUpdate, NewConversation, Page,
};
pub(crate) use conversation::{format_timestamp, non_empty, parse_timestamp};
