//! Roster - Interactive Department, Role and Employee Manager
//!
//! Roster is a menu-driven command-line tool for a small organizational
//! dataset stored in `PostgreSQL` or `SQLite`. Each menu action either lists
//! rows as a table or collects input and inserts a single row.
//!
//! # Architecture
//! The binary is a thin wrapper: it resolves configuration, connects a store
//! and hands it to [`App`]. Everything else lives in this library so it can be
//! driven by tests with an in-memory store and a scripted prompter.
//!
//! # Module Organization
//! - [`error`] - Error types and handling
//! - [`store`] - Data store gateway trait and engine implementations
//! - [`model`] - Entity and insert types
//! - [`repository`] - Named queries over the schema, plus DDL and seed data
//! - [`selection`] - Choice lists for referenced entities
//! - [`prompt`] - Prompt capability and its terminal implementation
//! - [`app`] - The interaction loop
//! - [`output`] - Table rendering and JSON envelopes
//! - [`config`] - Connection configuration resolution
//! - [`logging`] - Tracing subscriber setup

pub mod app;
pub mod config;
pub mod error;
pub mod logging;
pub mod model;
pub mod output;
pub mod prompt;
pub mod repository;
pub mod selection;
pub mod store;

pub use app::{Action, App, EntityKind, State};
pub use config::{resolve_connection, ConnectionSettings};
pub use error::{Result, RosterError};
pub use model::{Department, EmployeeView, NewEmployee, NewRole, RoleView};
pub use output::{render_table, ErrorEnvelope, Metadata, SuccessEnvelope, Tabular};
pub use prompt::{DialoguerPrompter, Prompter};
pub use repository::Repository;
pub use selection::{department_choices, manager_choices, role_choices, Choice, NO_MANAGER};
pub use store::{ConnectionConfig, DataStore, DatabaseType, QueryResult, SqlParam};
