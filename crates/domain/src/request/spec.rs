//! Request specification type

use url::Url;

use super::HttpMethod;
use crate::error::{DomainError, DomainResult};

/// One request the conformance client wants sent.
///
/// The target URL is kept as the pair the harness works with (endpoint base
/// plus resource path) and only resolved by [`RequestSpec::resolve_url`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestSpec {
    /// HTTP method
    pub method: HttpMethod,
    /// Server endpoint the path is resolved against
    pub base: String,
    /// Resource path, possibly with a query string
    pub path: String,
    /// Serialized JSON body, if any
    pub body: Option<String>,
}

impl RequestSpec {
    /// Creates a request without a body.
    #[must_use]
    pub fn new(method: HttpMethod, base: impl Into<String>, path: impl Into<String>) -> Self {
        Self {
            method,
            base: base.into(),
            path: path.into(),
            body: None,
        }
    }

    /// Creates a request from a raw method name.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::UnsupportedMethod` when `method` is not one of
    /// GET, HEAD, OPTIONS, POST, PUT, PATCH or DELETE.
    pub fn parse(
        method: &str,
        base: impl Into<String>,
        path: impl Into<String>,
        body: Option<String>,
    ) -> DomainResult<Self> {
        let method = method.parse::<HttpMethod>()?;
        Ok(Self::new(method, base, path).with_body(body))
    }

    /// Attaches an optional body (builder pattern).
    #[must_use]
    pub fn with_body(mut self, body: Option<String>) -> Self {
        self.body = body;
        self
    }

    /// Joins `path` onto `base` using standard URL resolution.
    ///
    /// A relative path replaces the last segment of the base path, an
    /// absolute path replaces the whole base path and a full URL replaces
    /// everything.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::InvalidUrl` if the base is not an absolute URL
    /// or the joined result is malformed.
    pub fn resolve_url(&self) -> DomainResult<Url> {
        let base = Url::parse(&self.base)
            .map_err(|e| DomainError::InvalidUrl(format!("{e}: {}", self.base)))?;
        base.join(&self.path)
            .map_err(|e| DomainError::InvalidUrl(format!("{e}: {}", self.path)))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_absolute_path_replaces_base_path() {
        let request = RequestSpec::new(HttpMethod::Get, "http://127.0.0.1:8080/api/", "/tasks.json");
        assert_eq!(
            request.resolve_url().unwrap().as_str(),
            "http://127.0.0.1:8080/tasks.json"
        );
    }

    #[test]
    fn test_relative_path_replaces_last_segment() {
        let request = RequestSpec::new(HttpMethod::Get, "http://localhost/api/v1", "tasks.json?q=x");
        assert_eq!(
            request.resolve_url().unwrap().as_str(),
            "http://localhost/api/tasks.json?q=x"
        );
    }

    #[test]
    fn test_full_url_replaces_everything() {
        let request = RequestSpec::new(HttpMethod::Get, "http://localhost/", "http://example.com/tasks.json");
        assert_eq!(
            request.resolve_url().unwrap().as_str(),
            "http://example.com/tasks.json"
        );
    }

    #[test]
    fn test_base_without_scheme_is_invalid() {
        let request = RequestSpec::new(HttpMethod::Get, "localhost", "/tasks.json");
        assert!(matches!(request.resolve_url(), Err(DomainError::InvalidUrl(_))));
    }

    #[test]
    fn test_parse_rejects_unknown_method() {
        let result = RequestSpec::parse("BREW", "http://localhost/", "/tasks.json", None);
        assert_eq!(result, Err(DomainError::UnsupportedMethod("BREW".to_string())));
    }

    #[test]
    fn test_parse_keeps_body() {
        let request =
            RequestSpec::parse("POST", "http://localhost/", "/tasks.json", Some("{}".to_string()))
                .unwrap();
        assert_eq!(request.method, HttpMethod::Post);
        assert_eq!(request.body.as_deref(), Some("{}"));
    }
}
