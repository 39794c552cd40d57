//! Logging configuration and initialization

use crate::app::config::AppConfig;
use tracing::{debug, trace};
use tracing_subscriber::EnvFilter;

/// Environment variable that overrides the verbosity-derived filter
pub const LOG_ENV: &str = "ROUNDTABLE_LOG";

/// Initialize tracing/logging for the application
pub fn init_logging(config: &AppConfig) {
    let filter = EnvFilter::try_from_env(LOG_ENV)
        .or_else(|_| EnvFilter::try_from_default_env())
        .unwrap_or_else(|_| EnvFilter::new(config.log_level()));

    let initialized = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(config.verbose >= 2) // Show target module for -vv and above
        .with_thread_ids(config.verbose >= 3) // Show thread IDs for -vvv
        .with_line_number(config.verbose >= 3) // Show line numbers for -vvv
        .try_init();

    if initialized.is_ok() {
        debug!("Roundtable started with verbosity level: {}", config.verbose);
        trace!("Full CLI args: {:?}", std::env::args().collect::<Vec<_>>());
    }
}
