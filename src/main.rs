//! Roster CLI Entry Point
//!
//! Subcommands:
//! - `run` (default) - Interactive menu
//! - `init` - Create the tables, optionally with sample data
//! - `view` - One-shot listing as a table or JSON envelope
//!
//! Menus and tables go to stdout. Logs go to stderr.

use std::io;
use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Instant;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand, ValueEnum};
use serde::Serialize;

use roster::repository::schema;
use roster::{
    render_table, App, ConnectionConfig, ConnectionSettings, DataStore, DatabaseType,
    DialoguerPrompter, ErrorEnvelope, Metadata, Repository, SuccessEnvelope, Tabular,
};

/// Roster - manage departments, roles and employees
#[derive(Parser)]
#[command(name = "roster")]
#[command(about = "Interactive CLI for departments, roles and employees")]
#[command(version)]
struct Cli {
    #[command(flatten)]
    connection: ConnectionArgs,

    /// Enable debug logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

/// Connection overrides; each flag can also come from the environment
#[derive(Args)]
struct ConnectionArgs {
    /// Database engine (postgres or sqlite)
    #[arg(long, env = "DB_ENGINE", global = true)]
    engine: Option<DatabaseType>,

    #[arg(long, env = "DB_HOST", global = true)]
    host: Option<String>,

    #[arg(long, env = "DB_PORT", global = true)]
    port: Option<u16>,

    #[arg(long, env = "DB_USER", global = true)]
    user: Option<String>,

    #[arg(long, env = "DB_PASSWORD", hide_env_values = true, global = true)]
    password: Option<String>,

    /// Database name
    #[arg(long, env = "DB_NAME", global = true)]
    database: Option<String>,

    /// SQLite database file
    #[arg(long, env = "DB_FILE", global = true)]
    file: Option<PathBuf>,
}

impl ConnectionArgs {
    fn into_settings(self) -> ConnectionSettings {
        ConnectionSettings {
            engine: self.engine,
            host: self.host,
            port: self.port,
            user: self.user,
            password: self.password,
            password_env: None,
            database: self.database,
            file: self.file,
        }
    }
}

#[derive(Subcommand, Clone, Copy)]
enum Commands {
    /// Start the interactive menu
    Run,

    /// Create the department, role and employee tables
    Init {
        /// Insert a small sample organization
        #[arg(long)]
        seed: bool,
    },

    /// Print one listing and exit
    View {
        #[arg(value_enum)]
        entity: ViewTarget,

        /// Print a JSON envelope instead of a table
        #[arg(long)]
        json: bool,
    },
}

#[derive(ValueEnum, Clone, Copy)]
enum ViewTarget {
    Departments,
    Roles,
    Employees,
}

impl ViewTarget {
    const fn command(self) -> &'static str {
        match self {
            Self::Departments => "view departments",
            Self::Roles => "view roles",
            Self::Employees => "view employees",
        }
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    // Before parsing, so clap's `env` fallbacks see the .env values
    let dotenv = dotenvy::dotenv();

    let cli = Cli::parse();
    if let Err(e) = roster::logging::init_tracing(cli.verbose) {
        eprintln!("{e}");
    }

    if let Some(e) = roster::logging::dotenv_problem(&dotenv) {
        tracing::warn!(error = %e, "could not load .env file");
    }

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!(error = %format!("{e:#}"), "roster exited with an error");
            eprintln!("Error: {e:#}");
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> Result<()> {
    let config = roster::resolve_connection(cli.connection.into_settings())
        .context("resolving connection settings")?;
    let command = cli.command.unwrap_or(Commands::Run);

    match config.engine {
        DatabaseType::Postgres => run_postgres(&config, command).await,
        DatabaseType::SQLite => run_sqlite(&config, command).await,
    }
}

#[cfg(feature = "postgres")]
async fn run_postgres(config: &ConnectionConfig, command: Commands) -> Result<()> {
    let store = roster::store::postgres::PostgresStore::connect(config)
        .await
        .context("connecting to PostgreSQL")?;
    dispatch(store, command).await
}

#[cfg(not(feature = "postgres"))]
async fn run_postgres(_config: &ConnectionConfig, _command: Commands) -> Result<()> {
    anyhow::bail!("roster was built without PostgreSQL support (enable the `postgres` feature)")
}

#[cfg(feature = "sqlite")]
async fn run_sqlite(config: &ConnectionConfig, command: Commands) -> Result<()> {
    let store = roster::store::sqlite::SqliteStore::connect(config)
        .await
        .context("opening SQLite database")?;
    dispatch(store, command).await
}

#[cfg(not(feature = "sqlite"))]
async fn run_sqlite(_config: &ConnectionConfig, _command: Commands) -> Result<()> {
    anyhow::bail!("roster was built without SQLite support (enable the `sqlite` feature)")
}

async fn dispatch<S: DataStore>(store: S, command: Commands) -> Result<()> {
    let engine = store.engine();

    match command {
        // Prompts block this thread; the postgres driver task runs on a worker
        Commands::Run => {
            let app = App::new(Repository::new(store), DialoguerPrompter::new(), io::stdout());
            app.run().await?;
        }
        Commands::Init { seed } => {
            schema::apply(&store).await.context("creating tables")?;
            let repo = Repository::new(store);
            if seed {
                schema::seed(&repo).await.context("inserting sample data")?;
            }
            repo.close().await?;
            println!("Tables ready ({engine})");
        }
        Commands::View { entity, json } => {
            let repo = Repository::new(store);
            let result = view(&repo, entity, json).await;
            repo.close().await?;

            if let Err(e) = &result {
                if json {
                    let envelope = ErrorEnvelope::from_error(engine.as_str(), entity.command(), e);
                    println!("{}", serde_json::to_string(&envelope)?);
                }
            }
            result?;
        }
    }

    Ok(())
}

async fn view<S: DataStore>(
    repo: &Repository<S>,
    entity: ViewTarget,
    json: bool,
) -> roster::Result<()> {
    let start = Instant::now();
    let engine = repo.store().engine();

    match entity {
        ViewTarget::Departments => {
            emit(engine, entity, &repo.list_departments().await?, start, json)
        }
        ViewTarget::Roles => emit(engine, entity, &repo.list_roles().await?, start, json),
        ViewTarget::Employees => emit(engine, entity, &repo.list_employees().await?, start, json),
    }
}

fn emit<T: Serialize + Tabular>(
    engine: DatabaseType,
    entity: ViewTarget,
    rows: &[T],
    start: Instant,
    json: bool,
) -> roster::Result<()> {
    if json {
        let meta = Metadata::with_rows(start.elapsed().as_millis() as u64, rows.len());
        let envelope = SuccessEnvelope::new(engine.as_str(), entity.command(), rows, meta);
        let text = serde_json::to_string(&envelope)
            .map_err(|e| roster::RosterError::query_failed(format!("Could not encode JSON: {e}")))?;
        println!("{text}");
    } else {
        println!("{}", render_table(rows));
    }
    Ok(())
}
