//! Diagnostic logging to stderr

use tracing_subscriber::EnvFilter;

/// Overrides the level chosen from `--verbose`
pub const LOG_ENV: &str = "PAGESMITH_LOG";

pub fn init(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    let filter =
        EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new(default_level));

    // A subscriber may already be installed when running under a test harness
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .try_init();
}
