//! Diagnostics setup (tracing/tracing-subscriber).
//!
//! `CRUXLOG_LOG` takes env-filter directives (e.g. "debug" or
//! "warn,cruxlog::core=debug"). When unset, the `log_level` from the config
//! file applies. Output goes to stderr so command output stays clean.

use tracing_subscriber::EnvFilter;

pub const LOG_ENV: &str = "CRUXLOG_LOG";

pub fn init_tracing(default_level: &str) {
    let filter = EnvFilter::try_from_env(LOG_ENV)
        .or_else(|_| EnvFilter::try_new(default_level))
        .unwrap_or_else(|_| EnvFilter::new("warn"));

    // A second init (tests calling `run` twice) is not an error for us.
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(true)
        .try_init();
}
