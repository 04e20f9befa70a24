//! Storage module for the lyrics corpus
//!
//! This module handles all database operations for the ingester:
//! - SQLite database initialization and schema management
//! - Title-keyed dedup lookups and per-record commits
//! - The read surface behind the CLI (recent, search, counters)

mod schema;
mod sqlite;
mod traits;

pub use sqlite::SqliteStore;
pub use traits::{LyricStore, StoreError, StoreResult};

use serde::Deserialize;

/// A stored lyrics record
///
/// `title` is the dedup key: exact string equality, enforced by a unique
/// index. Near-duplicate titles (trailing punctuation and the like) are
/// intentionally not merged.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LyricRecord {
    pub id: i64,
    pub title: String,
    pub content: String,
    pub created_at: String,
    pub updated_at: String,
    pub last_opened_at: Option<String>,
    pub view_count: u32,
}

/// What to do when a scraped title already exists in the corpus
///
/// The two observed source variants disagree here, so it is a
/// configuration choice rather than a fixed behavior.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DuplicatePolicy {
    /// Leave the existing record untouched
    #[default]
    Skip,
    /// Overwrite content and updated_at in place, preserving identity,
    /// created_at, and the read-side counters
    Update,
}

impl DuplicatePolicy {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Skip => "skip",
            Self::Update => "update",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_policy_is_skip() {
        assert_eq!(DuplicatePolicy::default(), DuplicatePolicy::Skip);
    }

    #[test]
    fn test_policy_deserializes_lowercase() {
        #[derive(Deserialize)]
        struct Wrapper {
            policy: DuplicatePolicy,
        }
        let wrapper: Wrapper = toml::from_str(r#"policy = "update""#).unwrap();
        assert_eq!(wrapper.policy, DuplicatePolicy::Update);
    }

    #[test]
    fn test_policy_as_str() {
        assert_eq!(DuplicatePolicy::Skip.as_str(), "skip");
        assert_eq!(DuplicatePolicy::Update.as_str(), "update");
    }
}
