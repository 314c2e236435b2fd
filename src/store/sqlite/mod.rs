//! `SQLite` Data Store Implementation
//!
//! # Features
//! - File-based connections (`/path/to/roster.db`)
//! - In-memory connections (`:memory:`), used as the test substitute
//! - Foreign keys enforced on every connection
//!
//! # Implementation Notes
//! - Uses `rusqlite` (synchronous driver); calls complete before the future
//!   resolves, so statements never overlap
//! - The connection lives behind a `Mutex` so the store can be shared by `&self`
//! - `$N` placeholders are bound by position
//! - BLOB data is Base64-encoded for JSON safety

use rusqlite::types::Value;
use rusqlite::{Connection, OpenFlags, Row};
use std::sync::{Mutex, MutexGuard};

use crate::error::{Result, RosterError};
use crate::store::{ConnectionConfig, DataStore, DatabaseType, QueryResult, SqlParam};

/// `SQLite` data store
#[derive(Debug)]
pub struct SqliteStore {
    conn: Mutex<Connection>,
}

impl SqliteStore {
    /// Open the database file named by `config`
    pub async fn connect(config: &ConnectionConfig) -> Result<Self> {
        if config.engine != DatabaseType::SQLite {
            return Err(RosterError::invalid_input(format!(
                "Expected SQLite engine, got {}",
                config.engine
            )));
        }

        let file_path = config
            .file
            .as_ref()
            .ok_or_else(|| RosterError::invalid_input("SQLite requires 'file' parameter"))?;

        let path_str = file_path.to_str().ok_or_else(|| {
            RosterError::invalid_input("SQLite file path contains invalid UTF-8 characters")
        })?;

        let store = Self::from_connection(open_connection(path_str)?)?;
        tracing::debug!(file = path_str, "opened sqlite database");
        Ok(store)
    }

    /// Open a private in-memory database
    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory().map_err(|e| {
            RosterError::connection_failed(format!("Failed to open in-memory SQLite database: {e}"))
        })?;
        Self::from_connection(conn)
    }

    fn from_connection(conn: Connection) -> Result<Self> {
        conn.execute_batch("PRAGMA foreign_keys = ON;").map_err(|e| {
            RosterError::connection_failed(format!("Failed to enable foreign keys: {e}"))
        })?;
        Ok(Self { conn: Mutex::new(conn) })
    }

    fn lock(&self) -> Result<MutexGuard<'_, Connection>> {
        self.conn
            .lock()
            .map_err(|_| RosterError::engine_error("sqlite", "Connection lock poisoned"))
    }
}

impl DataStore for SqliteStore {
    fn engine(&self) -> DatabaseType {
        DatabaseType::SQLite
    }

    async fn execute(&self, query: &str, params: &[SqlParam]) -> Result<QueryResult> {
        let conn = self.lock()?;
        tracing::debug!(
            query,
            params = params.len(),
            nulls = params.iter().filter(|p| p.is_null()).count(),
            "executing sqlite statement"
        );
        execute_query(&conn, query, params)
    }

    async fn close(self) -> Result<()> {
        let conn = self
            .conn
            .into_inner()
            .map_err(|_| RosterError::engine_error("sqlite", "Connection lock poisoned"))?;

        conn.close().map_err(|(_, e)| {
            RosterError::engine_error("sqlite", format!("Failed to close database: {e}"))
        })?;
        tracing::debug!("closed sqlite database");
        Ok(())
    }
}

/// Open `SQLite` connection for reading and writing
fn open_connection(path: &str) -> Result<Connection> {
    let flags = OpenFlags::SQLITE_OPEN_READ_WRITE | OpenFlags::SQLITE_OPEN_CREATE;

    Connection::open_with_flags(path, flags)
        .map_err(|e| RosterError::connection_failed(format!("Failed to open SQLite database: {e}")))
}

fn to_sqlite_value(param: &SqlParam) -> Value {
    match param {
        SqlParam::Text(Some(text)) => Value::Text(text.clone()),
        SqlParam::Integer(Some(int)) => Value::Integer(*int),
        SqlParam::Text(None) | SqlParam::Integer(None) => Value::Null,
    }
}

/// Execute one statement and return `QueryResult`
fn execute_query(conn: &Connection, query: &str, params: &[SqlParam]) -> Result<QueryResult> {
    let mut stmt = conn
        .prepare(query)
        .map_err(|e| RosterError::query_failed(format!("Failed to prepare query: {e}")))?;

    let column_names: Vec<String> = stmt.column_names().iter().map(|s| (*s).to_string()).collect();
    let bound = rusqlite::params_from_iter(params.iter().map(to_sqlite_value));

    if column_names.is_empty() {
        // INSERT or DDL
        let changed = stmt
            .execute(bound)
            .map_err(|e| RosterError::query_failed(format!("Failed to execute query: {e}")))?;

        return Ok(QueryResult {
            columns: Vec::new(),
            rows: Vec::new(),
            rows_affected: Some(changed as u64),
        });
    }

    let rows = stmt
        .query(bound)
        .map_err(|e| RosterError::query_failed(format!("Failed to execute query: {e}")))?;

    let rows_data = rows
        .mapped(|row| row_to_json(column_names.len(), row))
        .collect::<std::result::Result<Vec<_>, _>>()
        .map_err(|e| RosterError::query_failed(format!("Failed to fetch row: {e}")))?;

    Ok(QueryResult { columns: column_names, rows: rows_data, rows_affected: None })
}

/// Convert a `SQLite` row to a JSON-safe `Vec`
fn row_to_json(
    column_count: usize,
    row: &Row,
) -> std::result::Result<Vec<serde_json::Value>, rusqlite::Error> {
    (0..column_count).map(|idx| sqlite_value_to_json(row, idx)).collect()
}

/// Convert `SQLite` value to JSON value
fn sqlite_value_to_json(
    row: &Row,
    idx: usize,
) -> std::result::Result<serde_json::Value, rusqlite::Error> {
    use rusqlite::types::ValueRef;

    Ok(match row.get_ref(idx)? {
        ValueRef::Null => serde_json::Value::Null,
        ValueRef::Integer(i) => serde_json::Value::Number(i.into()),
        ValueRef::Real(f) => serde_json::Number::from_f64(f)
            .map_or(serde_json::Value::Null, serde_json::Value::Number), // NaN/Infinity
        ValueRef::Text(s) => {
            let text = std::str::from_utf8(s).map_err(|e| {
                rusqlite::Error::FromSqlConversionFailure(
                    idx,
                    rusqlite::types::Type::Text,
                    Box::new(e),
                )
            })?;
            serde_json::Value::String(text.to_string())
        }
        ValueRef::Blob(b) => {
            use base64::Engine;
            serde_json::Value::String(base64::engine::general_purpose::STANDARD.encode(b))
        }
    })
}
