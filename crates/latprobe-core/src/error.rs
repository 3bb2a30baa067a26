//! Shared error type across latprobe crates.

use thiserror::Error;

/// Stable error codes (used by the CLI exit path and tests).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Input file does not exist.
    NotFound,
    /// Input file exists but could not be read.
    Unreadable,
    /// Malformed metrics input (label blocks and the like).
    Malformed,
    /// Invalid configuration.
    BadConfig,
    /// Unsupported config version.
    UnsupportedVersion,
    /// Internal error.
    Internal,
}

impl ErrorKind {
    /// String representation used in logs and tests.
    pub fn as_str(self) -> &'static str {
        match self {
            ErrorKind::NotFound => "NOT_FOUND",
            ErrorKind::Unreadable => "UNREADABLE",
            ErrorKind::Malformed => "MALFORMED",
            ErrorKind::BadConfig => "BAD_CONFIG",
            ErrorKind::UnsupportedVersion => "UNSUPPORTED_VERSION",
            ErrorKind::Internal => "INTERNAL",
        }
    }
}

/// Shared result type.
pub type Result<T> = std::result::Result<T, LatProbeError>;

/// Unified error type used by core and cli.
#[derive(Debug, Error)]
pub enum LatProbeError {
    #[error("File '{0}' not found.")]
    NotFound(String),
    #[error("Error reading file: {0}")]
    Unreadable(String),
    #[error("malformed input: {0}")]
    Malformed(String),
    #[error("bad config: {0}")]
    BadConfig(String),
    #[error("unsupported config version")]
    UnsupportedVersion,
    #[error("internal: {0}")]
    Internal(String),
}

impl LatProbeError {
    /// Map the error to its stable code.
    pub fn kind(&self) -> ErrorKind {
        match self {
            LatProbeError::NotFound(_) => ErrorKind::NotFound,
            LatProbeError::Unreadable(_) => ErrorKind::Unreadable,
            LatProbeError::Malformed(_) => ErrorKind::Malformed,
            LatProbeError::BadConfig(_) => ErrorKind::BadConfig,
            LatProbeError::UnsupportedVersion => ErrorKind::UnsupportedVersion,
            LatProbeError::Internal(_) => ErrorKind::Internal,
        }
    }
}
