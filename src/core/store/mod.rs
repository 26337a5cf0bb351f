//! Record store backing the site content
//!
//! The import pipeline only needs two capabilities from the store: append a
//! batch of rows to a table, and read a table back. [`RecordStore`] is that
//! seam; [`SqliteStore`] is the local implementation.
//!
//! Rows are schemaless JSON objects. The store assigns every row an `id`
//! (ULID) and a `created_at` timestamp; both are merged into the object on
//! read and ignored on write.

mod schema;

use std::fs;
use std::path::{Path, PathBuf};

use chrono::Utc;
use rusqlite::{params, Connection};
use serde_json::Value;
use thiserror::Error;
use ulid::Ulid;

/// A single row as stored: a JSON object
pub type Record = serde_json::Map<String, Value>;

/// Current schema version
const SCHEMA_VERSION: i32 = 1;

/// Generic table-oriented store
pub trait RecordStore {
    /// Append all rows to `table` in one call
    fn insert(&mut self, table: &str, rows: &[Record]) -> Result<(), StoreError>;

    /// Read every row of `table` in insertion order
    fn select(&self, table: &str) -> Result<Vec<Record>, StoreError>;
}

/// Errors raised by a record store
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("invalid table name '{0}'")]
    InvalidTable(String),

    #[error("store schema version {found} is not supported (expected {expected})")]
    SchemaVersion { found: i32, expected: i32 },

    #[error("malformed record in '{table}': {source}")]
    Malformed {
        table: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// SQLite-backed record store
pub struct SqliteStore {
    conn: Connection,
    path: Option<PathBuf>,
}

impl SqliteStore {
    /// Open or create a store file
    pub fn open(path: &Path) -> Result<Self, StoreError> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }

        let conn = Connection::open(path)?;
        conn.execute_batch("PRAGMA journal_mode=WAL;")?;

        let mut store = Self {
            conn,
            path: Some(path.to_path_buf()),
        };
        store.init_schema()?;

        tracing::debug!(path = %path.display(), "opened record store");
        Ok(store)
    }

    /// Open a throwaway in-memory store
    pub fn open_in_memory() -> Result<Self, StoreError> {
        let mut store = Self {
            conn: Connection::open_in_memory()?,
            path: None,
        };
        store.init_schema()?;
        Ok(store)
    }

    /// Location on disk, if any
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    /// Number of rows in a table
    pub fn count(&self, table: &str) -> Result<usize, StoreError> {
        check_table_name(table)?;
        let count: i64 = self.conn.query_row(
            "SELECT COUNT(*) FROM records WHERE table_name = ?1",
            params![table],
            |row| row.get(0),
        )?;
        Ok(count as usize)
    }
}

impl RecordStore for SqliteStore {
    fn insert(&mut self, table: &str, rows: &[Record]) -> Result<(), StoreError> {
        check_table_name(table)?;

        // All rows or none
        let tx = self.conn.transaction()?;
        {
            let mut stmt = tx.prepare(
                "INSERT INTO records (id, table_name, data, created_at) VALUES (?1, ?2, ?3, ?4)",
            )?;

            for row in rows {
                let mut data = row.clone();
                data.remove("id");
                data.remove("created_at");

                let json = serde_json::to_string(&data).map_err(|source| StoreError::Malformed {
                    table: table.to_string(),
                    source,
                })?;

                stmt.execute(params![
                    Ulid::new().to_string(),
                    table,
                    json,
                    Utc::now().to_rfc3339()
                ])?;
            }
        }
        tx.commit()?;

        tracing::debug!(table, rows = rows.len(), "inserted records");
        Ok(())
    }

    fn select(&self, table: &str) -> Result<Vec<Record>, StoreError> {
        check_table_name(table)?;

        let mut stmt = self.conn.prepare(
            "SELECT id, data, created_at FROM records WHERE table_name = ?1 ORDER BY seq",
        )?;
        let rows = stmt.query_map(params![table], |row| {
            Ok((
                row.get::<_, String>(0)?,
                row.get::<_, String>(1)?,
                row.get::<_, String>(2)?,
            ))
        })?;

        let mut records = Vec::new();
        for row in rows {
            let (id, data, created_at) = row?;
            let mut record: Record =
                serde_json::from_str(&data).map_err(|source| StoreError::Malformed {
                    table: table.to_string(),
                    source,
                })?;
            record.insert("id".to_string(), Value::String(id));
            record.insert("created_at".to_string(), Value::String(created_at));
            records.push(record);
        }

        Ok(records)
    }
}

/// Table names are plain identifiers: `[a-z_][a-z0-9_]*`
fn check_table_name(table: &str) -> Result<(), StoreError> {
    let mut chars = table.chars();
    let valid = match chars.next() {
        Some(first) => {
            (first.is_ascii_lowercase() || first == '_')
                && chars.all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '_')
        }
        None => false,
    };

    if valid {
        Ok(())
    } else {
        Err(StoreError::InvalidTable(table.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use tempfile::tempdir;

    fn record(value: Value) -> Record {
        value.as_object().cloned().unwrap()
    }

    #[test]
    fn test_insert_then_select_assigns_ids() {
        let mut store = SqliteStore::open_in_memory().unwrap();
        store
            .insert(
                "reviews",
                &[
                    record(json!({"client_name": "Ada", "rating": 3})),
                    record(json!({"client_name": "Grace", "rating": 5})),
                ],
            )
            .unwrap();

        let rows = store.select("reviews").unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0]["client_name"], "Ada");
        assert_eq!(rows[1]["client_name"], "Grace");
        assert!(rows[0]["id"].as_str().is_some());
        assert_ne!(rows[0]["id"], rows[1]["id"]);
        assert!(rows[0]["created_at"].as_str().is_some());
    }

    #[test]
    fn test_tables_are_isolated() {
        let mut store = SqliteStore::open_in_memory().unwrap();
        store
            .insert("reviews", &[record(json!({"client_name": "Ada"}))])
            .unwrap();
        store
            .insert("leads", &[record(json!({"email": "x@example.com"}))])
            .unwrap();

        assert_eq!(store.count("reviews").unwrap(), 1);
        assert_eq!(store.count("leads").unwrap(), 1);
        assert!(store.select("skills").unwrap().is_empty());
    }

    #[test]
    fn test_store_assigns_its_own_id() {
        let mut store = SqliteStore::open_in_memory().unwrap();
        store
            .insert("reviews", &[record(json!({"id": "mine", "client_name": "Ada"}))])
            .unwrap();

        let rows = store.select("reviews").unwrap();
        assert_ne!(rows[0]["id"], "mine");
    }

    #[test]
    fn test_invalid_table_name_rejected() {
        let mut store = SqliteStore::open_in_memory().unwrap();
        for name in ["", "Reviews", "1abc", "drop table;"] {
            let err = store.insert(name, &[]).unwrap_err();
            assert!(matches!(err, StoreError::InvalidTable(_)), "{name}");
        }
    }

    #[test]
    fn test_persists_across_reopen() {
        let tmp = tempdir().unwrap();
        let path = tmp.path().join("nested/store.db");

        {
            let mut store = SqliteStore::open(&path).unwrap();
            store
                .insert("reviews", &[record(json!({"client_name": "Ada"}))])
                .unwrap();
        }

        let store = SqliteStore::open(&path).unwrap();
        assert_eq!(store.path(), Some(path.as_path()));
        assert_eq!(store.count("reviews").unwrap(), 1);
    }

    #[test]
    fn test_newer_schema_version_rejected() {
        let tmp = tempdir().unwrap();
        let path = tmp.path().join("store.db");
        SqliteStore::open(&path).unwrap();

        let conn = Connection::open(&path).unwrap();
        conn.execute("UPDATE schema_version SET version = 99", [])
            .unwrap();
        drop(conn);

        let err = SqliteStore::open(&path).err().unwrap();
        assert!(matches!(
            err,
            StoreError::SchemaVersion {
                found: 99,
                expected: 1
            }
        ));
    }
}
