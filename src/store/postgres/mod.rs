//! `PostgreSQL` Data Store Implementation
//!
//! # Features
//! - Client-server connection via TCP, opened once at startup
//! - Statements prepared with explicit parameter types
//! - Rows converted to JSON values for decoding and display
//!
//! # Implementation Notes
//! - Uses `tokio-postgres` (async driver, requires tokio runtime)
//! - The connection driver runs as a spawned task; dropping the client ends it
//! - Text parameters are declared `TEXT`, integers `INT8`. Queries cast where
//!   the column type differs (e.g. `CAST($2 AS DECIMAL)`), so the server
//!   performs the conversion and reports malformed input
//! - `NUMERIC` cannot be decoded directly; select it with a cast to
//!   `DOUBLE PRECISION`
//! - BYTEA data is Base64-encoded for JSON safety

use tokio::task::JoinHandle;
use tokio_postgres::types::{ToSql, Type};
use tokio_postgres::{Client, Config, NoTls, Row};

use crate::error::{Result, RosterError};
use crate::store::{ConnectionConfig, DataStore, DatabaseType, QueryResult, SqlParam};

/// Default `PostgreSQL` port
pub const DEFAULT_PORT: u16 = 5432;

/// `PostgreSQL` data store
#[derive(Debug)]
pub struct PostgresStore {
    client: Client,
    driver: JoinHandle<()>,
}

impl PostgresStore {
    /// Connect using `config` and start the connection driver
    pub async fn connect(config: &ConnectionConfig) -> Result<Self> {
        if config.engine != DatabaseType::Postgres {
            return Err(RosterError::invalid_input(format!(
                "Expected PostgreSQL engine, got {}",
                config.engine
            )));
        }

        let pg_config = build_pg_config(config)?;

        let (client, connection) = pg_config.connect(NoTls).await.map_err(|e| {
            RosterError::connection_failed(format!("Failed to connect to PostgreSQL: {e}"))
        })?;

        // Connection errors carry no credentials, only the driver's message
        let driver = tokio::spawn(async move {
            if let Err(e) = connection.await {
                tracing::error!(error = %e, "postgres connection closed with error");
            }
        });

        tracing::debug!(
            host = config.host.as_deref().unwrap_or_default(),
            database = config.database.as_deref().unwrap_or_default(),
            "connected to postgres"
        );

        Ok(Self { client, driver })
    }
}

impl DataStore for PostgresStore {
    fn engine(&self) -> DatabaseType {
        DatabaseType::Postgres
    }

    async fn execute(&self, query: &str, params: &[SqlParam]) -> Result<QueryResult> {
        tracing::debug!(
            query,
            params = params.len(),
            nulls = params.iter().filter(|p| p.is_null()).count(),
            "executing postgres statement"
        );

        let types: Vec<Type> = params.iter().map(param_type).collect();
        let stmt = self
            .client
            .prepare_typed(query, &types)
            .await
            .map_err(|e| RosterError::query_failed(format!("Failed to prepare query: {e}")))?;

        let bound: Vec<&(dyn ToSql + Sync)> = params.iter().map(as_to_sql).collect();

        if stmt.columns().is_empty() {
            // INSERT or DDL
            let rows_affected = self
                .client
                .execute(&stmt, &bound)
                .await
                .map_err(|e| RosterError::query_failed(format!("Failed to execute query: {e}")))?;

            return Ok(QueryResult {
                columns: Vec::new(),
                rows: Vec::new(),
                rows_affected: Some(rows_affected),
            });
        }

        let rows = self
            .client
            .query(&stmt, &bound)
            .await
            .map_err(|e| RosterError::query_failed(format!("Failed to execute query: {e}")))?;

        let columns: Vec<String> = stmt.columns().iter().map(|c| c.name().to_string()).collect();
        let rows = rows.iter().map(row_to_json).collect::<Result<Vec<_>>>()?;

        Ok(QueryResult { columns, rows, rows_affected: None })
    }

    async fn close(self) -> Result<()> {
        // Dropping the last client handle makes the driver task finish
        drop(self.client);
        self.driver.await.map_err(|e| {
            RosterError::engine_error("postgres", format!("Connection task failed: {e}"))
        })?;
        tracing::debug!("closed postgres connection");
        Ok(())
    }
}

/// Build `PostgreSQL` connection config from `ConnectionConfig`
fn build_pg_config(config: &ConnectionConfig) -> Result<Config> {
    let host = config
        .host
        .as_ref()
        .ok_or_else(|| RosterError::invalid_input("PostgreSQL requires 'host' parameter"))?;

    let user = config
        .user
        .as_ref()
        .ok_or_else(|| RosterError::invalid_input("PostgreSQL requires 'user' parameter"))?;

    let database = config
        .database
        .as_ref()
        .ok_or_else(|| RosterError::invalid_input("PostgreSQL requires 'database' parameter"))?;

    let mut pg_config = Config::new();
    pg_config
        .host(host)
        .port(config.port.unwrap_or(DEFAULT_PORT))
        .user(user)
        .dbname(database)
        .application_name("roster");

    // Trust/peer authentication needs no password
    if let Some(password) = &config.password {
        pg_config.password(password);
    }

    Ok(pg_config)
}

fn param_type(param: &SqlParam) -> Type {
    match param {
        SqlParam::Text(_) => Type::TEXT,
        SqlParam::Integer(_) => Type::INT8,
    }
}

fn as_to_sql(param: &SqlParam) -> &(dyn ToSql + Sync) {
    match param {
        SqlParam::Text(value) => value as &(dyn ToSql + Sync),
        SqlParam::Integer(value) => value as &(dyn ToSql + Sync),
    }
}

/// Convert a `PostgreSQL` row to a JSON-safe `Vec`
fn row_to_json(row: &Row) -> Result<Vec<serde_json::Value>> {
    (0..row.len()).map(|idx| postgres_value_to_json(row, idx)).collect()
}

fn get<'a, T>(row: &'a Row, idx: usize) -> Result<Option<T>>
where
    T: tokio_postgres::types::FromSql<'a>,
{
    row.try_get::<_, Option<T>>(idx).map_err(|e| {
        RosterError::query_failed(format!(
            "Failed to read column '{}': {e}",
            row.columns()[idx].name()
        ))
    })
}

/// Convert `PostgreSQL` value to JSON value
fn postgres_value_to_json(row: &Row, idx: usize) -> Result<serde_json::Value> {
    use serde_json::Value;

    let col_type = row.columns()[idx].type_().clone();

    let value = match col_type {
        Type::BOOL => get::<bool>(row, idx)?.map(Value::Bool),
        Type::INT2 => get::<i16>(row, idx)?.map(|v| Value::Number(v.into())),
        Type::INT4 => get::<i32>(row, idx)?.map(|v| Value::Number(v.into())),
        Type::INT8 => get::<i64>(row, idx)?.map(|v| Value::Number(v.into())),
        Type::FLOAT4 => get::<f32>(row, idx)?
            .and_then(|v| serde_json::Number::from_f64(f64::from(v)))
            .map(Value::Number),
        Type::FLOAT8 => {
            get::<f64>(row, idx)?.and_then(serde_json::Number::from_f64).map(Value::Number)
        }
        Type::BYTEA => get::<Vec<u8>>(row, idx)?.map(|v| {
            use base64::Engine;
            Value::String(base64::engine::general_purpose::STANDARD.encode(v))
        }),
        Type::NUMERIC => {
            return Err(RosterError::query_failed(format!(
                "Column '{}' is NUMERIC; cast it to DOUBLE PRECISION in the query",
                row.columns()[idx].name()
            )))
        }
        // VARCHAR, TEXT, BPCHAR, NAME and anything else with a text form
        _ => get::<String>(row, idx)?.map(Value::String),
    };

    Ok(value.unwrap_or(Value::Null))
}
