//! Run configuration

use std::time::Duration;

/// Per-request timeout of the HTTP transport.
pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Number of redirects followed before a request is abandoned.
pub const MAX_REDIRECTS: usize = 10;

/// Settings for one conformance run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckerConfig {
    /// Base URL of the server under test
    pub endpoint: String,
    /// Log every request and response
    pub verbose: bool,
    /// Treat any failed scenario as a failed run
    pub strict: bool,
    /// User agent sent with every request
    pub user_agent: String,
}

impl CheckerConfig {
    /// Creates a configuration with defaults for everything but the endpoint.
    #[must_use]
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self {
            endpoint: endpoint.into(),
            verbose: false,
            strict: false,
            user_agent: format!("taskcheck/{}", env!("CARGO_PKG_VERSION")),
        }
    }

    /// Enables or disables verbose logging (builder pattern).
    #[must_use]
    pub fn with_verbose(mut self, verbose: bool) -> Self {
        self.verbose = verbose;
        self
    }

    /// Enables or disables strict mode (builder pattern).
    #[must_use]
    pub fn with_strict(mut self, strict: bool) -> Self {
        self.strict = strict;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_defaults() {
        let config = CheckerConfig::new("http://localhost:8080");
        assert_eq!(config.endpoint, "http://localhost:8080");
        assert!(!config.verbose);
        assert!(!config.strict);
        assert!(config.user_agent.starts_with("taskcheck/"));
    }

    #[test]
    fn test_builders() {
        let config = CheckerConfig::new("http://localhost")
            .with_verbose(true)
            .with_strict(true);
        assert!(config.verbose);
        assert!(config.strict);
    }
}
