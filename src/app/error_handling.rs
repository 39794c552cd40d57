//! Error handling utilities

use tracing::error;

use crate::error::{Error, ErrorKind};

/// Handle fatal errors and exit with appropriate status code
///
/// Configuration errors exit with 2, everything else with 1. The cause
/// chain is printed in verbose mode.
pub fn handle_fatal_error(error: anyhow::Error, verbose: u8) -> ! {
    error!("Fatal error: {}", error);
    eprintln!("Error: {error}");

    if verbose >= 1 {
        eprintln!("\nError chain:");
        for (i, cause) in error.chain().enumerate() {
            eprintln!("  {}: {}", i, cause);
        }
    }

    std::process::exit(exit_code(&error))
}

fn exit_code(error: &anyhow::Error) -> i32 {
    match error.downcast_ref::<Error>().map(Error::kind) {
        Some(ErrorKind::Configuration) => 2, // CONFIGURATION_ERROR
        _ => 1,                              // GENERAL_ERROR
    }
}
