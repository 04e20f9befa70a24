//! Database schema definitions
//!
//! This module contains the SQL schema for the lyrics corpus.

use rusqlite::Connection;

/// SQL schema for the corpus database
///
/// The unique index on `title` is the dedup key. The ingester writes one
/// row per statement so every record is durable before the next song is
/// fetched.
pub const SCHEMA_SQL: &str = r#"
CREATE TABLE IF NOT EXISTS lyrics (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    title TEXT NOT NULL,
    content TEXT NOT NULL,
    created_at TEXT NOT NULL,
    updated_at TEXT NOT NULL,
    last_opened_at TEXT,
    view_count INTEGER NOT NULL DEFAULT 0
);

CREATE UNIQUE INDEX IF NOT EXISTS idx_lyrics_title ON lyrics(title);
"#;

/// Initializes the database schema
pub fn initialize_schema(conn: &Connection) -> Result<(), rusqlite::Error> {
    conn.execute_batch(SCHEMA_SQL)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_schema_initializes() {
        let conn = Connection::open_in_memory().unwrap();
        initialize_schema(&conn).unwrap();

        // Idempotent
        initialize_schema(&conn).unwrap();

        let count: i64 = conn
            .query_row("SELECT COUNT(*) FROM lyrics", [], |row| row.get(0))
            .unwrap();
        assert_eq!(count, 0);
    }

    #[test]
    fn test_title_unique_index() {
        let conn = Connection::open_in_memory().unwrap();
        initialize_schema(&conn).unwrap();

        conn.execute(
            "INSERT INTO lyrics (title, content, created_at, updated_at) VALUES (?1, ?2, ?3, ?3)",
            rusqlite::params!["雨と僕", "content", "2024-01-01T00:00:00Z"],
        )
        .unwrap();

        let duplicate = conn.execute(
            "INSERT INTO lyrics (title, content, created_at, updated_at) VALUES (?1, ?2, ?3, ?3)",
            rusqlite::params!["雨と僕", "other", "2024-01-02T00:00:00Z"],
        );
        assert!(duplicate.is_err());
    }
}
