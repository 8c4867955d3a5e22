//! Domain error types

use thiserror::Error;

/// Domain-level errors that can occur during validation or processing.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// The HTTP method is not supported.
    #[error("unsupported HTTP method: {0}")]
    UnsupportedMethod(String),

    /// The base URL or path could not be resolved into a request URL.
    #[error("invalid URL: {0}")]
    InvalidUrl(String),

    /// A deadline string is not a recognised date-time format.
    #[error("invalid deadline: {0}")]
    InvalidDeadline(String),
}

/// Result type alias for domain operations.
pub type DomainResult<T> = Result<T, DomainError>;
