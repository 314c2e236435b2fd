//! Data Store Gateway
//!
//! This module defines the abstraction the repository talks to.
//! Each engine (`PostgreSQL`, `SQLite`) implements the `DataStore` trait.
//!
//! # Connection Lifecycle
//! A store is opened once with `connect()` at startup, shared by every
//! repository call for the life of the process, and released with `close()`.
//! Statements are issued one at a time and each one auto-commits.
//!
//! # Parameter Binding
//! Queries use positional placeholders (`$1`, `$2`, ...). Values are always
//! bound through the driver, never spliced into the query text.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::error::{Result, RosterError};

#[cfg(feature = "sqlite")]
pub mod sqlite;

#[cfg(feature = "postgres")]
pub mod postgres;

/// Supported database engine types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DatabaseType {
    /// `PostgreSQL` database
    Postgres,
    /// `SQLite` database
    SQLite,
}

impl DatabaseType {
    /// Get the engine name as a string
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Postgres => "postgres",
            Self::SQLite => "sqlite",
        }
    }
}

impl std::fmt::Display for DatabaseType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for DatabaseType {
    type Err = RosterError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "postgres" | "postgresql" | "pg" => Ok(Self::Postgres),
            "sqlite" | "sqlite3" => Ok(Self::SQLite),
            other => Err(RosterError::invalid_input(format!(
                "Unknown database engine '{other}' (expected 'postgres' or 'sqlite')"
            ))),
        }
    }
}

/// Connection configuration for database engines
///
/// Fields are engine-specific (e.g., `file` only applies to `SQLite`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConnectionConfig {
    /// Database engine type
    pub engine: DatabaseType,

    /// Hostname (for postgres)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub host: Option<String>,

    /// Port number (for postgres)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub port: Option<u16>,

    /// Username (for postgres)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user: Option<String>,

    /// Password (for postgres)
    /// WARNING: Sensitive data, do not log or include in error messages
    #[serde(skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,

    /// Database name (for postgres)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub database: Option<String>,

    /// Database file path (for sqlite, `:memory:` allowed)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub file: Option<PathBuf>,
}

impl ConnectionConfig {
    /// Create a new `PostgreSQL` connection config
    #[must_use]
    pub const fn postgres(
        host: String,
        port: u16,
        user: String,
        password: String,
        database: String,
    ) -> Self {
        Self {
            engine: DatabaseType::Postgres,
            host: Some(host),
            port: Some(port),
            user: Some(user),
            password: Some(password),
            database: Some(database),
            file: None,
        }
    }

    /// Create a new `SQLite` connection config
    #[must_use]
    pub const fn sqlite(file: PathBuf) -> Self {
        Self {
            engine: DatabaseType::SQLite,
            host: None,
            port: None,
            user: None,
            password: None,
            database: None,
            file: Some(file),
        }
    }
}

/// A positionally bound query parameter
///
/// Nulls are typed so the engine can infer the parameter type of a
/// `NULL` value (e.g. a missing manager is an integer NULL).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SqlParam {
    Text(Option<String>),
    Integer(Option<i64>),
}

impl SqlParam {
    /// Whether this parameter binds SQL `NULL`
    #[must_use]
    pub const fn is_null(&self) -> bool {
        matches!(self, Self::Text(None) | Self::Integer(None))
    }
}

impl From<&str> for SqlParam {
    fn from(value: &str) -> Self {
        Self::Text(Some(value.to_string()))
    }
}

impl From<String> for SqlParam {
    fn from(value: String) -> Self {
        Self::Text(Some(value))
    }
}

impl From<i64> for SqlParam {
    fn from(value: i64) -> Self {
        Self::Integer(Some(value))
    }
}

impl From<Option<i64>> for SqlParam {
    fn from(value: Option<i64>) -> Self {
        Self::Integer(value)
    }
}

/// Query execution result
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct QueryResult {
    /// Column names in result set order
    pub columns: Vec<String>,

    /// Result rows (one value per column, same order as `columns`)
    pub rows: Vec<Vec<serde_json::Value>>,

    /// Number of rows affected (for statements without a result set)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rows_affected: Option<u64>,
}

impl QueryResult {
    /// View each row as a column-name → value mapping
    pub fn records(&self) -> impl Iterator<Item = serde_json::Map<String, serde_json::Value>> + '_ {
        self.rows.iter().map(|row| {
            self.columns.iter().cloned().zip(row.iter().cloned()).collect()
        })
    }

    /// Decode every row into `T` by column name
    pub fn decode<T: DeserializeOwned>(&self) -> Result<Vec<T>> {
        self.records()
            .map(|record| {
                serde_json::from_value(serde_json::Value::Object(record))
                    .map_err(|e| RosterError::query_failed(format!("Failed to decode row: {e}")))
            })
            .collect()
    }
}

/// Database gateway trait
///
/// Implementations hold one open connection. Methods take `&self` so a store
/// can be shared by the repository for the life of the process.
pub trait DataStore {
    /// Engine dialect behind this store
    fn engine(&self) -> DatabaseType;

    /// Execute a single statement with positional parameters
    ///
    /// Statements with a result set return their rows; all others return
    /// `rows_affected`. Any failure is returned as `QueryFailed`.
    fn execute(
        &self,
        query: &str,
        params: &[SqlParam],
    ) -> impl std::future::Future<Output = Result<QueryResult>> + Send;

    /// Release the connection
    fn close(self) -> impl std::future::Future<Output = Result<()>> + Send
    where
        Self: Sized;
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn test_database_type_serialization() {
        assert_eq!(serde_json::to_string(&DatabaseType::Postgres).unwrap(), r#""postgres""#);
        assert_eq!(serde_json::to_string(&DatabaseType::SQLite).unwrap(), r#""sqlite""#);
    }

    #[test]
    fn test_database_type_from_str() {
        assert_eq!("postgresql".parse::<DatabaseType>().unwrap(), DatabaseType::Postgres);
        assert_eq!("PG".parse::<DatabaseType>().unwrap(), DatabaseType::Postgres);
        assert_eq!("sqlite".parse::<DatabaseType>().unwrap(), DatabaseType::SQLite);

        let err = "mysql".parse::<DatabaseType>().unwrap_err();
        assert!(err.message().contains("Unknown database engine 'mysql'"));
    }

    #[test]
    fn test_connection_config_constructors() {
        let pg_config = ConnectionConfig::postgres(
            "localhost".to_string(),
            5432,
            "user".to_string(),
            "pass".to_string(),
            "db".to_string(),
        );
        assert_eq!(pg_config.engine, DatabaseType::Postgres);
        assert_eq!(pg_config.port, Some(5432));
        assert!(pg_config.file.is_none());

        let sqlite_config = ConnectionConfig::sqlite(PathBuf::from("/tmp/roster.db"));
        assert_eq!(sqlite_config.engine, DatabaseType::SQLite);
        assert!(sqlite_config.host.is_none());
    }

    #[test]
    fn test_sql_param_conversions() {
        assert_eq!(SqlParam::from("Sales"), SqlParam::Text(Some("Sales".to_string())));
        assert_eq!(SqlParam::from(7_i64), SqlParam::Integer(Some(7)));
        assert_eq!(SqlParam::from(None::<i64>), SqlParam::Integer(None));
        assert!(SqlParam::from(None::<i64>).is_null());
        assert!(!SqlParam::from(3_i64).is_null());
    }

    #[derive(Debug, Deserialize, PartialEq)]
    struct Pair {
        id: i64,
        name: Option<String>,
    }

    #[test]
    fn test_query_result_decode_by_column_name() {
        let result = QueryResult {
            columns: vec!["name".to_string(), "id".to_string()],
            rows: vec![vec![json!("Legal"), json!(2)], vec![json!(null), json!(3)]],
            rows_affected: None,
        };

        let pairs: Vec<Pair> = result.decode().unwrap();
        assert_eq!(
            pairs,
            vec![
                Pair { id: 2, name: Some("Legal".to_string()) },
                Pair { id: 3, name: None },
            ]
        );
    }

    #[test]
    fn test_query_result_decode_type_mismatch() {
        let result = QueryResult {
            columns: vec!["id".to_string()],
            rows: vec![vec![json!("not a number")]],
            rows_affected: None,
        };

        let err = result.decode::<Pair>().unwrap_err();
        assert_eq!(err.error_code(), "QUERY_FAILED");
        assert!(err.message().contains("Failed to decode row"));
    }

    #[test]
    fn test_records_preserve_column_names() {
        let result = QueryResult {
            columns: vec!["id".to_string(), "name".to_string()],
            rows: vec![vec![json!(1), json!("Engineering")]],
            rows_affected: None,
        };

        let records: Vec<_> = result.records().collect();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0]["id"], json!(1));
        assert_eq!(records[0]["name"], json!("Engineering"));
    }
}
