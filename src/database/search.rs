// Search functionality for AI Memory
// Substring search across conversation title, transcription and summary

use anyhow::{Context, Result};
use rusqlite::{params, Connection};

use super::conversations_repo::{row_to_conversation, CONVERSATION_COLUMNS};
use super::error::StoreResult;
use super::models::ConversationRecord;
use super::ConversationStore;

impl ConversationStore {
    /// Find conversations whose title, transcription or summary contains `query`.
    ///
    /// Matching is a case-insensitive (ASCII) substring test with no ranking.
    /// An empty query returns every conversation; whitespace is matched like
    /// any other text. Results are most recent first.
    pub fn search(&self, query: &str) -> StoreResult<Vec<ConversationRecord>> {
        if query.is_empty() {
            return self.list_all();
        }

        let results = timed!(
            "search_conversations",
            self.with_connection(|conn| search_impl(conn, query))
        )?;
        log::debug!("Search {:?} matched {} conversations", query, results.len());
        Ok(results)
    }
}

/// Escape LIKE wildcards so the query matches literally
fn like_pattern(query: &str) -> String {
    let mut escaped = String::with_capacity(query.len() + 2);
    escaped.push('%');
    for ch in query.chars() {
        if matches!(ch, '%' | '_' | '\\') {
            escaped.push('\\');
        }
        escaped.push(ch);
    }
    escaped.push('%');
    escaped
}

fn search_impl(conn: &Connection, query: &str) -> Result<Vec<ConversationRecord>> {
    let search_pattern = like_pattern(query);

    let mut stmt = conn.prepare(&format!(
        r#"
        SELECT {}
        FROM conversations
        WHERE title LIKE ?1 ESCAPE '\'
           OR transcription LIKE ?1 ESCAPE '\'
           OR summary LIKE ?1 ESCAPE '\'
        ORDER BY created_at DESC, id DESC
        "#,
        CONVERSATION_COLUMNS
    )).context("Failed to prepare search query")?;

    let records = stmt
        .query_map(params![search_pattern], row_to_conversation)
        .context("Failed to execute search query")?;

    records
        .collect::<std::result::Result<Vec<_>, _>>()
        .context("Failed to read search result")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::{NewConversation, Page};

    fn setup_store() -> ConversationStore {
        let store = ConversationStore::open_in_memory().unwrap();
        store
            .save(&NewConversation::new("Quarterly Planning", "Budget for Q3 was approved."))
            .unwrap();
        store
            .save(&NewConversation::new("Standup", "Blocked on the deploy pipeline.").with_summary("Deploy is blocked"))
            .unwrap();
        store
            .save(&NewConversation::new("Voice memo", "Remember to buy milk."))
            .unwrap();
        store
    }

    fn titles(records: &[ConversationRecord]) -> Vec<&str> {
        records.iter().map(|r| r.title.as_str()).collect()
    }

    #[test]
    fn test_empty_search() {
        let store = ConversationStore::open_in_memory().unwrap();
        assert!(store.search("").unwrap().is_empty());
    }

    #[test]
    fn test_search_no_results() {
        let store = setup_store();
        assert!(store.search("nonexistent").unwrap().is_empty());
    }

    #[test]
    fn test_search_matches_title_case_insensitively() {
        let store = setup_store();
        assert_eq!(titles(&store.search("planning").unwrap()), vec!["Quarterly Planning"]);
        assert_eq!(titles(&store.search("STANDUP").unwrap()), vec!["Standup"]);
    }

    #[test]
    fn test_search_matches_transcription_and_summary() {
        let store = setup_store();
        assert_eq!(titles(&store.search("milk").unwrap()), vec!["Voice memo"]);

        let deploy = store.search("deploy").unwrap();
        assert_eq!(titles(&deploy), vec!["Standup"]);
    }

    #[test]
    fn test_search_matches_any_field() {
        let store = setup_store();
        // "o" appears in every title or transcription
        assert_eq!(store.search("o").unwrap().len(), 3);
    }

    #[test]
    fn test_blank_query_returns_everything() {
        let store = setup_store();
        let all = store.search("").unwrap();
        assert_eq!(all, store.list_all().unwrap());
        assert_eq!(all, store.get_all(Page::default()).unwrap());
    }

    #[test]
    fn test_whitespace_query_is_a_substring_match() {
        let store = ConversationStore::open_in_memory().unwrap();
        store.save(&NewConversation::new("Standup", "nospace")).unwrap();
        store.save(&NewConversation::new("Quarterly Planning", "has space")).unwrap();

        assert_eq!(titles(&store.search(" ").unwrap()), vec!["Quarterly Planning"]);
        assert!(store.search("   ").unwrap().is_empty());
    }

    #[test]
    fn test_wildcards_are_literal() {
        let store = setup_store();
        store
            .save(&NewConversation::new("Growth", "Revenue up 50% this month"))
            .unwrap();

        assert_eq!(titles(&store.search("50%").unwrap()), vec!["Growth"]);
        assert!(store.search("%_%").unwrap().is_empty());
    }

    #[test]
    fn test_search_results_are_most_recent_first() {
        let store = setup_store();
        let results = store.search("e").unwrap();
        assert!(results.windows(2).all(|w| {
            (w[0].created_at, w[0].id) > (w[1].created_at, w[1].id)
        }));
    }

    #[test]
    fn test_like_pattern_escapes() {
        assert_eq!(like_pattern("a_b"), r"%a\_b%");
        assert_eq!(like_pattern(r"50%\"), r"%50\%\\%");
    }
}
