//! Database schema initialization

use rusqlite::{params, OptionalExtension};

use super::{SqliteStore, StoreError, SCHEMA_VERSION};

impl SqliteStore {
    /// Create tables if needed and check the stored schema version
    pub(super) fn init_schema(&mut self) -> Result<(), StoreError> {
        self.conn.execute_batch(
            r#"
            -- Schema version tracking
            CREATE TABLE IF NOT EXISTS schema_version (
                version INTEGER PRIMARY KEY
            );

            -- One row per stored record; `data` holds the JSON object
            CREATE TABLE IF NOT EXISTS records (
                seq INTEGER PRIMARY KEY AUTOINCREMENT,
                id TEXT NOT NULL UNIQUE,
                table_name TEXT NOT NULL,
                data TEXT NOT NULL,
                created_at TEXT NOT NULL
            );
            CREATE INDEX IF NOT EXISTS idx_records_table ON records(table_name, seq);
            "#,
        )?;

        let found: Option<i32> = self
            .conn
            .query_row("SELECT MAX(version) FROM schema_version", [], |row| {
                row.get(0)
            })
            .optional()?
            .flatten();

        match found {
            None => {
                self.conn.execute(
                    "INSERT INTO schema_version (version) VALUES (?1)",
                    params![SCHEMA_VERSION],
                )?;
                tracing::debug!(version = SCHEMA_VERSION, "initialised store schema");
                Ok(())
            }
            Some(v) if v == SCHEMA_VERSION => Ok(()),
            Some(v) => Err(StoreError::SchemaVersion {
                found: v,
                expected: SCHEMA_VERSION,
            }),
        }
    }
}
