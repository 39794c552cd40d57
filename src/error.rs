use std::fmt;
use thiserror::Error;

use crate::storage::StorageError;

/// Coarse classification used by the boundary layer to map failures
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Referenced candidate or session does not exist
    NotFound,
    /// Operation attempted outside its legal lifecycle state
    InvalidState,
    /// Malformed caller input or malformed evaluation payload
    Validation,
    /// Startup configuration is unusable
    Configuration,
    /// The AI capability failed or answered with garbage
    Upstream,
    /// Persistence failed
    Storage,
}

impl ErrorKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorKind::NotFound => "not_found",
            ErrorKind::InvalidState => "invalid_state",
            ErrorKind::Validation => "validation",
            ErrorKind::Configuration => "configuration",
            ErrorKind::Upstream => "upstream",
            ErrorKind::Storage => "storage",
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Error, Debug)]
pub enum Error {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Invalid state: {0}")]
    InvalidState(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("External API error: {0}")]
    External(String),

    #[error("Request error: {0}")]
    Request(#[from] reqwest::Error),

    #[error(transparent)]
    Storage(#[from] StorageError),
}

impl Error {
    pub fn not_found(what: impl fmt::Display) -> Self {
        Self::NotFound(what.to_string())
    }

    pub fn invalid_state(msg: impl fmt::Display) -> Self {
        Self::InvalidState(msg.to_string())
    }

    pub fn validation(msg: impl fmt::Display) -> Self {
        Self::Validation(msg.to_string())
    }

    pub fn config(msg: impl fmt::Display) -> Self {
        Self::Config(msg.to_string())
    }

    pub fn external(msg: impl fmt::Display) -> Self {
        Self::External(msg.to_string())
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::NotFound(_) => ErrorKind::NotFound,
            Error::InvalidState(_) => ErrorKind::InvalidState,
            Error::Validation(_) => ErrorKind::Validation,
            Error::Config(_) => ErrorKind::Configuration,
            Error::External(_) | Error::Request(_) => ErrorKind::Upstream,
            Error::Storage(StorageError::Configuration(_)) => ErrorKind::Configuration,
            Error::Storage(_) => ErrorKind::Storage,
        }
    }

    pub fn is_not_found(&self) -> bool {
        self.kind() == ErrorKind::NotFound
    }

    pub fn is_invalid_state(&self) -> bool {
        self.kind() == ErrorKind::InvalidState
    }

    pub fn is_validation(&self) -> bool {
        self.kind() == ErrorKind::Validation
    }
}

pub type Result<T> = std::result::Result<T, Error>;
