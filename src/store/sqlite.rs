//! SQLite store implementation

use crate::store::schema::initialize_schema;
use crate::store::traits::{LyricStore, StoreError, StoreResult};
use crate::store::LyricRecord;
use crate::KashimoriError;
use rusqlite::{params, Connection, OptionalExtension, Row};
use std::path::Path;

/// SQLite storage backend for the lyrics corpus
pub struct SqliteStore {
    conn: Connection,
}

const RECORD_COLUMNS: &str =
    "id, title, content, created_at, updated_at, last_opened_at, view_count";

fn record_from_row(row: &Row<'_>) -> Result<LyricRecord, rusqlite::Error> {
    Ok(LyricRecord {
        id: row.get(0)?,
        title: row.get(1)?,
        content: row.get(2)?,
        created_at: row.get(3)?,
        updated_at: row.get(4)?,
        last_opened_at: row.get(5)?,
        view_count: row.get(6)?,
    })
}

impl SqliteStore {
    /// Opens or creates the corpus database at the given path
    pub fn new(path: &Path) -> Result<Self, KashimoriError> {
        let conn = Connection::open(path)?;

        conn.execute_batch(
            "
            PRAGMA journal_mode = WAL;
            PRAGMA synchronous = NORMAL;
            PRAGMA foreign_keys = ON;
        ",
        )?;

        initialize_schema(&conn)?;

        Ok(Self { conn })
    }

    /// Creates an in-memory database (for testing)
    #[cfg(test)]
    pub fn new_in_memory() -> Result<Self, KashimoriError> {
        let conn = Connection::open_in_memory()?;
        initialize_schema(&conn)?;
        Ok(Self { conn })
    }
}

impl LyricStore for SqliteStore {
    fn lookup_by_title(&self, title: &str) -> StoreResult<Option<LyricRecord>> {
        let mut stmt = self.conn.prepare(&format!(
            "SELECT {} FROM lyrics WHERE title = ?1",
            RECORD_COLUMNS
        ))?;

        let record = stmt
            .query_row(params![title], record_from_row)
            .optional()?;

        Ok(record)
    }

    fn insert(&mut self, title: &str, content: &str, now: &str) -> StoreResult<i64> {
        self.conn.execute(
            "INSERT INTO lyrics (title, content, created_at, updated_at) VALUES (?1, ?2, ?3, ?3)",
            params![title, content, now],
        )?;
        Ok(self.conn.last_insert_rowid())
    }

    fn update_content(&mut self, id: i64, content: &str, now: &str) -> StoreResult<()> {
        let changed = self.conn.execute(
            "UPDATE lyrics SET content = ?1, updated_at = ?2 WHERE id = ?3",
            params![content, now, id],
        )?;
        if changed == 0 {
            return Err(StoreError::RecordNotFound(id));
        }
        Ok(())
    }

    fn get(&self, id: i64) -> StoreResult<LyricRecord> {
        let mut stmt = self.conn.prepare(&format!(
            "SELECT {} FROM lyrics WHERE id = ?1",
            RECORD_COLUMNS
        ))?;

        stmt.query_row(params![id], record_from_row)
            .optional()?
            .ok_or(StoreError::RecordNotFound(id))
    }

    fn count_records(&self) -> StoreResult<u64> {
        let count: i64 = self
            .conn
            .query_row("SELECT COUNT(*) FROM lyrics", [], |row| row.get(0))?;
        Ok(count as u64)
    }

    fn list_recent(&self, limit: usize) -> StoreResult<Vec<LyricRecord>> {
        let mut stmt = self.conn.prepare(&format!(
            "SELECT {} FROM lyrics
             ORDER BY last_opened_at DESC, created_at DESC
             LIMIT ?1",
            RECORD_COLUMNS
        ))?;

        let records = stmt
            .query_map(params![limit as i64], record_from_row)?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(records)
    }

    fn search(&self, keyword: &str) -> StoreResult<Vec<LyricRecord>> {
        let pattern = format!("%{}%", keyword);
        let mut stmt = self.conn.prepare(&format!(
            "SELECT {} FROM lyrics
             WHERE title LIKE ?1 OR content LIKE ?1
             ORDER BY last_opened_at DESC, created_at DESC",
            RECORD_COLUMNS
        ))?;

        let records = stmt
            .query_map(params![pattern], record_from_row)?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(records)
    }

    fn touch(&mut self, id: i64, now: &str) -> StoreResult<()> {
        let changed = self.conn.execute(
            "UPDATE lyrics SET last_opened_at = ?1, view_count = view_count + 1 WHERE id = ?2",
            params![now, id],
        )?;
        if changed == 0 {
            return Err(StoreError::RecordNotFound(id));
        }
        Ok(())
    }

    fn delete(&mut self, id: i64) -> StoreResult<()> {
        let changed = self
            .conn
            .execute("DELETE FROM lyrics WHERE id = ?1", params![id])?;
        if changed == 0 {
            return Err(StoreError::RecordNotFound(id));
        }
        Ok(())
    }
}
