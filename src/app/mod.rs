//! Application module
//!
//! Process-level concerns: configuration, logging, fatal errors and runtime
//! wiring.

pub mod config;
pub mod error_handling;
pub mod logging;
pub mod runtime;

// Re-export main application functions
pub use config::AppConfig;
pub use error_handling::handle_fatal_error;
pub use logging::init_logging;
pub use runtime::{build_orchestrator, initialize_app};
