//! Platform error types

use thiserror::Error;

/// Platform-related errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PlatformError {
    /// The requested frame scheduling back end is not available on this host
    #[error("Frame scheduler not available: {0}")]
    Unavailable(String),

    /// Back end name not recognized
    #[error("Unknown frame scheduler back end: {0}")]
    UnknownBackend(String),
}

/// Result type for platform operations
pub type Result<T> = std::result::Result<T, PlatformError>;
