use std::path::Path;

use chrono::Utc;
use log::debug;
use rusqlite::{params, Connection, OptionalExtension};
use serde::{Deserialize, Serialize};

use crate::db::annotations::{
    AnnotationCategory, AnnotationKey, AnnotationStore, StoreError, StoreResult,
};

/// Minimum schema version we know how to handle.
///
/// `0` means "no schema yet" (fresh DB).
const MIN_SUPPORTED_SCHEMA_VERSION: i32 = 0;

/// Latest schema version this crate knows about.
pub const CURRENT_SCHEMA_VERSION: i32 = 2;

/// One persisted annotation, as listed for inspection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnnotationRecord {
    pub key: String,
    pub address: u64,
    pub category: AnnotationCategory,
    pub name: String,
    pub value: String,
    pub updated_at: Option<String>,
}

/// SQLite-backed annotation store.
///
/// This is a thin wrapper around `rusqlite::Connection` that is responsible for:
/// - Opening/creating the store file.
/// - Applying schema migrations.
/// - Reading and upserting records by their persisted key.
#[derive(Debug)]
pub struct SqliteAnnotationStore {
    conn: Connection,
}

impl SqliteAnnotationStore {
    /// Open (or create) a store at the given path and ensure the schema exists.
    pub fn open(path: &Path) -> StoreResult<Self> {
        let conn = Connection::open(path)?;
        apply_migrations(&conn)?;
        Ok(Self { conn })
    }

    /// Open a throwaway store that lives only as long as the connection.
    pub fn open_in_memory() -> StoreResult<Self> {
        let conn = Connection::open_in_memory()?;
        apply_migrations(&conn)?;
        Ok(Self { conn })
    }

    /// Expose a reference to the underlying connection for advanced callers.
    /// For most code, prefer higher-level helpers.
    pub fn connection(&self) -> &Connection {
        &self.conn
    }

    /// List every record attached to a function address, ordered by category then name.
    pub fn list_for_address(&self, address: u64) -> StoreResult<Vec<AnnotationRecord>> {
        let mut stmt = self.conn.prepare(
            r#"
            SELECT key, value, updated_at
            FROM annotations
            WHERE address = ?1
            ORDER BY category, name
            "#,
        )?;
        let rows = stmt.query_map(params![address as i64], |row| {
            Ok((
                row.get::<_, String>(0)?,
                row.get::<_, String>(1)?,
                row.get::<_, Option<String>>(2)?,
            ))
        })?;

        let mut out = Vec::new();
        for row in rows {
            let (key, value, updated_at) = row?;
            let parsed: AnnotationKey = key.parse()?;
            out.push(AnnotationRecord {
                key,
                address: parsed.address,
                category: parsed.category,
                name: parsed.name,
                value,
                updated_at,
            });
        }
        Ok(out)
    }
}

impl AnnotationStore for SqliteAnnotationStore {
    fn find(&self, key: &AnnotationKey) -> StoreResult<Option<String>> {
        let value = self
            .conn
            .query_row(
                "SELECT value FROM annotations WHERE key = ?1",
                params![key.to_string()],
                |row| row.get::<_, String>(0),
            )
            .optional()?;
        Ok(value)
    }

    fn save(&self, key: &AnnotationKey, value: &str) -> StoreResult<()> {
        let now = Utc::now().to_rfc3339();
        self.conn.execute(
            r#"
            INSERT INTO annotations (key, address, category, name, value, updated_at)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6)
            ON CONFLICT(key) DO UPDATE SET value = excluded.value, updated_at = excluded.updated_at
            "#,
            params![
                key.to_string(),
                key.address as i64,
                key.category.as_str(),
                key.name,
                value,
                now
            ],
        )?;
        debug!("saved annotation {key}");
        Ok(())
    }
}

/// Apply schema migrations to bring the store to the latest version.
///
/// We use `PRAGMA user_version` as the schema version indicator.
///
/// Version map:
/// - 0: no schema
/// - 1: annotations table keyed by the persisted key string
/// - 2: add updated_at column
fn apply_migrations(conn: &Connection) -> StoreResult<()> {
    let current_version = current_schema_version(conn)?;

    // Reject stores created with a newer schema than we support.
    if current_version > CURRENT_SCHEMA_VERSION {
        return Err(StoreError::UnsupportedSchemaVersion {
            found: current_version,
            min_supported: MIN_SUPPORTED_SCHEMA_VERSION,
            max_supported: CURRENT_SCHEMA_VERSION,
        });
    }

    if current_version == 0 {
        conn.execute_batch(
            r#"
            BEGIN;
            CREATE TABLE IF NOT EXISTS annotations (
                key      TEXT PRIMARY KEY NOT NULL,
                address  INTEGER NOT NULL,
                category TEXT NOT NULL,
                name     TEXT NOT NULL,
                value    TEXT NOT NULL
            );
            CREATE INDEX IF NOT EXISTS annotations_by_address ON annotations (address);

            PRAGMA user_version = 1;
            COMMIT;
            "#,
        )?;
    }

    if current_version < 2 {
        if !column_exists(conn, "annotations", "updated_at")? {
            conn.execute("ALTER TABLE annotations ADD COLUMN updated_at TEXT;", [])?;
        }
        conn.execute("PRAGMA user_version = 2;", [])?;
    }

    Ok(())
}

/// Read the SQLite schema version from `PRAGMA user_version`.
fn current_schema_version(conn: &Connection) -> StoreResult<i32> {
    let version: i32 = conn.query_row("PRAGMA user_version;", [], |row| row.get(0))?;
    Ok(version)
}

fn column_exists(conn: &Connection, table: &str, column: &str) -> StoreResult<bool> {
    let pragma = format!("PRAGMA table_info({table});");
    let mut stmt = conn.prepare(&pragma)?;
    let rows = stmt.query_map([], |row| row.get::<_, String>(1))?;
    for name in rows {
        if name? == column {
            return Ok(true);
        }
    }
    Ok(false)
}
