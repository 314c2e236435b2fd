//! Configuration Management
//!
//! Resolves the database connection from layered sources.
//!
//! # Configuration Locations
//! - Local: `.roster/config.json` (per-project)
//! - Global: `~/.config/roster/config.json` (per-user)
//!
//! # Resolution Precedence
//! 1. Command-line flags and their `DB_*` environment variables (highest)
//! 2. Local config file
//! 3. Global config file
//!
//! Each layer is a partial [`ConnectionSettings`]; fields set in a higher
//! layer replace the lower one's, unset fields fall through.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{Result, RosterError};
use crate::store::{ConnectionConfig, DatabaseType};

/// Default port when the engine is `PostgreSQL`
pub const DEFAULT_POSTGRES_PORT: u16 = 5432;

/// Partial connection settings from one configuration layer
///
/// Example config file:
/// ```json
/// {
///   "engine": "postgres",
///   "host": "localhost",
///   "user": "roster",
///   "password_env": "ROSTER_DB_PASSWORD",
///   "database": "company"
/// }
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConnectionSettings {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub engine: Option<DatabaseType>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub host: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub port: Option<u16>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user: Option<String>,

    /// WARNING: Sensitive data, prefer `password_env` in files
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,

    /// Environment variable holding the password
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub password_env: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub database: Option<String>,

    /// `SQLite` database file
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file: Option<PathBuf>,
}

impl ConnectionSettings {
    /// Layer `higher` on top of `self`
    #[must_use]
    pub fn overlay(self, higher: Self) -> Self {
        Self {
            engine: higher.engine.or(self.engine),
            host: higher.host.or(self.host),
            port: higher.port.or(self.port),
            user: higher.user.or(self.user),
            password: higher.password.or(self.password),
            password_env: higher.password_env.or(self.password_env),
            database: higher.database.or(self.database),
            file: higher.file.or(self.file),
        }
    }

    /// Resolve into a complete `ConnectionConfig`
    ///
    /// The engine defaults to `PostgreSQL` unless only a file was given. An
    /// explicit password wins over `password_env`.
    pub fn into_config(self) -> Result<ConnectionConfig> {
        let engine = match self.engine {
            Some(engine) => engine,
            None if self.file.is_some() && self.host.is_none() => DatabaseType::SQLite,
            None => DatabaseType::Postgres,
        };

        match engine {
            DatabaseType::SQLite => {
                let file = self.file.ok_or_else(|| {
                    RosterError::config_error("SQLite requires a database file (--file or DB_FILE)")
                })?;
                Ok(ConnectionConfig::sqlite(file))
            }
            DatabaseType::Postgres => {
                let password = match (self.password, self.password_env) {
                    (Some(password), _) => Some(password),
                    (None, Some(env_var)) => Some(std::env::var(&env_var).map_err(|_| {
                        RosterError::config_error(format!(
                            "Environment variable {env_var} not found for password"
                        ))
                    })?),
                    (None, None) => None,
                };

                let require = |value: Option<String>, what: &str| {
                    value.ok_or_else(|| {
                        RosterError::config_error(format!("PostgreSQL requires a {what}"))
                    })
                };

                Ok(ConnectionConfig {
                    engine,
                    host: Some(require(self.host, "host (--host or DB_HOST)")?),
                    port: Some(self.port.unwrap_or(DEFAULT_POSTGRES_PORT)),
                    user: Some(require(self.user, "user (--user or DB_USER)")?),
                    password,
                    database: Some(require(self.database, "database name (--database or DB_NAME)")?),
                    file: None,
                })
            }
        }
    }
}

/// Get path to local config file (`.roster/config.json`)
pub fn local_config_path() -> Result<PathBuf> {
    let current_dir = std::env::current_dir().map_err(|e| {
        RosterError::config_error(format!("Could not determine current directory: {e}"))
    })?;

    Ok(current_dir.join(".roster").join("config.json"))
}

/// Get path to global config file (`~/.config/roster/config.json`)
pub fn global_config_path() -> Result<PathBuf> {
    let config_dir = dirs::config_dir()
        .ok_or_else(|| RosterError::config_error("Could not determine user config directory"))?;

    Ok(config_dir.join("roster").join("config.json"))
}

/// Load settings from a config file; a missing file is an empty layer
pub fn load_settings(path: &Path) -> Result<ConnectionSettings> {
    if !path.exists() {
        return Ok(ConnectionSettings::default());
    }

    let contents = fs::read_to_string(path)
        .map_err(|e| RosterError::config_error(format!("Could not read config file: {e}")))?;

    serde_json::from_str(&contents).map_err(|e| {
        RosterError::config_error(format!("Invalid config file {}: {e}", path.display()))
    })
}

/// Merge the given file layers (lowest first) under `overrides`
pub fn resolve_from(files: &[PathBuf], overrides: ConnectionSettings) -> Result<ConnectionConfig> {
    let mut settings = ConnectionSettings::default();
    for path in files {
        settings = settings.overlay(load_settings(path)?);
    }
    settings.overlay(overrides).into_config()
}

/// Resolve the connection: global file, then local file, then `overrides`
pub fn resolve_connection(overrides: ConnectionSettings) -> Result<ConnectionConfig> {
    let files = [global_config_path()?, local_config_path()?];
    resolve_from(&files, overrides)
}
