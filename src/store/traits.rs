//! Store trait and error types

use crate::store::LyricRecord;
use thiserror::Error;

/// Errors that can occur during store operations
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    #[error("Record not found: {0}")]
    RecordNotFound(i64),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for store operations
pub type StoreResult<T> = Result<T, StoreError>;

/// Trait for corpus storage backends
///
/// Write operations are single autocommitted statements: a crash between
/// two items never rolls back an earlier commit.
pub trait LyricStore {
    // ===== Dedup / write path =====

    /// Looks up a record by exact title
    fn lookup_by_title(&self, title: &str) -> StoreResult<Option<LyricRecord>>;

    /// Inserts a new record; created_at = updated_at = now
    ///
    /// Returns the new record id.
    fn insert(&mut self, title: &str, content: &str, now: &str) -> StoreResult<i64>;

    /// Overwrites content and updated_at of an existing record
    ///
    /// Identity, created_at, and the read-side counters are preserved.
    fn update_content(&mut self, id: i64, content: &str, now: &str) -> StoreResult<()>;

    // ===== Read surface =====

    /// Gets a record by id
    fn get(&self, id: i64) -> StoreResult<LyricRecord>;

    /// Counts all stored records
    fn count_records(&self) -> StoreResult<u64>;

    /// Lists records, most recently opened (then created) first
    fn list_recent(&self, limit: usize) -> StoreResult<Vec<LyricRecord>>;

    /// Searches title and content with a LIKE match
    fn search(&self, keyword: &str) -> StoreResult<Vec<LyricRecord>>;

    /// Records one read: bumps view_count and stamps last_opened_at
    fn touch(&mut self, id: i64, now: &str) -> StoreResult<()>;

    /// Deletes a record
    fn delete(&mut self, id: i64) -> StoreResult<()>;
}
