//! Tracing setup for the `roster` binary.
//!
//! Logs go to stderr so they never interleave with menus and tables on
//! stdout.
//!
//!   roster -v                   # debug logging
//!   RUST_LOG=roster=trace roster  # fine-grained control

use tracing_subscriber::EnvFilter;

use crate::error::{Result, RosterError};

/// Default filter when `RUST_LOG` is unset
pub const DEFAULT_FILTER: &str = "roster=warn";

/// Filter used by `--verbose` when `RUST_LOG` is unset
pub const VERBOSE_FILTER: &str = "roster=debug";

/// Install the global subscriber
pub fn init_tracing(verbose: bool) -> Result<()> {
    let fallback = if verbose { VERBOSE_FILTER } else { DEFAULT_FILTER };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(fallback));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(verbose)
        .compact()
        .try_init()
        .map_err(|e| RosterError::config_error(format!("Could not initialize logging: {e}")))
}

/// The error worth reporting from loading `.env`, if any
///
/// A missing file is the normal case and yields `None`; a file that exists
/// but cannot be read or parsed is returned so the caller can warn.
pub fn dotenv_problem<T>(result: &dotenvy::Result<T>) -> Option<&dotenvy::Error> {
    match result {
        Err(e) if !e.not_found() => Some(e),
        _ => None,
    }
}
