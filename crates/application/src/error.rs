//! Application error types

use thiserror::Error;

/// Application-level errors.
///
/// Nothing a server under test sends ends up here; those are
/// [`FailureReason`](taskcheck_domain::FailureReason)s. These are the
/// errors that stop a run before it starts.
#[derive(Debug, Error)]
pub enum ApplicationError {
    /// The transport could not be constructed.
    #[error("transport error: {0}")]
    Transport(String),
}

/// Result type alias for application operations.
pub type ApplicationResult<T> = Result<T, ApplicationError>;

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_transport_error_message() {
        let error = ApplicationError::Transport("no TLS backend".to_string());
        assert_eq!(error.to_string(), "transport error: no TLS backend");
    }
}
