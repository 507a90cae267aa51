//! Diagnostic logging.
//!
//! The library emits `tracing` events (query stages, source loads, exports).
//! The CLI installs a `fmt` subscriber writing to stderr so stdout stays clean
//! for tables and JSON. The filter comes from `COOPDASH_LOG` when set,
//! otherwise `warn`, or `debug` with `--verbose`.

use anyhow::{anyhow, Result};
use tracing_subscriber::EnvFilter;

pub const LOG_ENV: &str = "COOPDASH_LOG";

fn default_level(verbose: bool) -> &'static str {
    if verbose {
        "debug"
    } else {
        "warn"
    }
}

fn create_env_filter(verbose: bool) -> EnvFilter {
    EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new(default_level(verbose)))
}

pub fn init_logging(verbose: bool) -> Result<()> {
    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(create_env_filter(verbose))
        .with_writer(std::io::stderr)
        .with_target(verbose)
        .compact()
        .finish();

    tracing::subscriber::set_global_default(subscriber)
        .map_err(|e| anyhow!("failed to initialize logging: {}", e))
}
