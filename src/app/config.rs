//! Application configuration
//!
//! Collects process-level settings plus the storage and AI sections.

use anyhow::Result;
use std::net::SocketAddr;

use crate::ai::AiConfig;
use crate::error::Error;
use crate::storage::StorageConfig;

/// Application configuration structure
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Verbosity level for logging
    pub verbose: u8,
    /// Address the HTTP API listens on
    pub bind: SocketAddr,
    pub storage: StorageConfig,
    pub ai: AiConfig,
}

impl AppConfig {
    /// Create configuration from environment variables
    pub fn from_env(verbose: u8) -> Result<Self> {
        Self::from_lookup(verbose, |key| std::env::var(key).ok())
    }

    pub fn from_lookup(verbose: u8, lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let bind = match (lookup("ROUNDTABLE_BIND"), lookup("PORT")) {
            (Some(bind), _) => bind.parse().map_err(|_| {
                Error::config(format!("ROUNDTABLE_BIND `{bind}` is not a socket address"))
            })?,
            (None, Some(port)) => {
                let port: u16 = port
                    .parse()
                    .map_err(|_| Error::config(format!("PORT `{port}` is not a port number")))?;
                SocketAddr::from(([0, 0, 0, 0], port))
            }
            (None, None) => default_bind(),
        };

        Ok(Self {
            verbose,
            bind,
            storage: StorageConfig::from_lookup(&lookup)?,
            ai: AiConfig::from_lookup(&lookup)?,
        })
    }

    /// Set the bind address
    pub fn with_bind(mut self, bind: SocketAddr) -> Self {
        self.bind = bind;
        self
    }

    /// Get the log level string based on verbosity
    pub fn log_level(&self) -> &'static str {
        match self.verbose {
            0 => "info",
            1 => "debug",
            2 => "trace",
            _ => "trace,hyper=debug,tower=debug",
        }
    }
}

fn default_bind() -> SocketAddr {
    SocketAddr::from(([0, 0, 0, 0], 3001))
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            verbose: 0,
            bind: default_bind(),
            storage: StorageConfig::default(),
            ai: AiConfig::default(),
        }
    }
}
