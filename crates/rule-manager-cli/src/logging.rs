//! Logging setup.
//!
//! Logs go to stderr so stdout carries only command output. The filter is
//! read from `RULE_MANAGER_LOG` (e.g. `rule_manager_core=debug`).

use tracing_subscriber::EnvFilter;

/// Environment variable holding the log filter.
pub const LOG_ENV: &str = "RULE_MANAGER_LOG";

/// Build the filter: `RULE_MANAGER_LOG` if set, else `debug` when verbose, else `warn`.
pub fn filter(verbose: bool) -> EnvFilter {
    EnvFilter::try_from_env(LOG_ENV)
        .unwrap_or_else(|_| EnvFilter::new(if verbose { "debug" } else { "warn" }))
}

/// Install the global subscriber. Later calls are no-ops.
pub fn init_logging(verbose: bool) {
    let _ = tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(filter(verbose))
        .with_target(false)
        .try_init();
}
