//! HTTP transport implementation using reqwest.
//!
//! This adapter implements the `Transport` port. Every failure that keeps a
//! response from arriving is logged with its kind and then collapsed into a
//! single `NetworkFailure`.

use async_trait::async_trait;
use reqwest::{Client, Method, header::CONTENT_TYPE, redirect::Policy};
use taskcheck_application::{
    ApplicationError, ApplicationResult, CheckerConfig, MAX_REDIRECTS, NetworkFailure,
    REQUEST_TIMEOUT, Transport,
};
use taskcheck_domain::{HttpMethod, NormalizedResponse, RequestSpec};
use tracing::debug;

/// Why a request produced no response. Only ever logged.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum FailureKind {
    InvalidUrl,
    Timeout,
    Network,
    Redirects,
    InvalidResponse,
}

impl FailureKind {
    const fn label(self) -> &'static str {
        match self {
            Self::InvalidUrl => "Invalid request URL",
            Self::Timeout => "Connection timed out",
            Self::Network => "Network problem occurred",
            Self::Redirects => "Too many redirects",
            Self::InvalidResponse => "Invalid HTTP response",
        }
    }

    fn classify(error: &reqwest::Error) -> Self {
        if error.is_timeout() {
            Self::Timeout
        } else if error.is_redirect() {
            Self::Redirects
        } else if error.is_builder() {
            Self::InvalidUrl
        } else if error.is_connect() || error.is_request() {
            Self::Network
        } else {
            Self::InvalidResponse
        }
    }
}

/// Transport implementation using reqwest.
///
/// Wraps one `reqwest::Client` for the whole run, so connections to the
/// server under test are reused between scenarios.
pub struct ReqwestTransport {
    client: Client,
}

impl ReqwestTransport {
    /// Creates a transport for `config`.
    ///
    /// Configuration:
    /// - Request timeout: 30 seconds
    /// - Follow redirects: up to 10
    /// - User-Agent: `config.user_agent`
    ///
    /// # Errors
    ///
    /// Returns an error if the client cannot be created.
    pub fn new(config: &CheckerConfig) -> ApplicationResult<Self> {
        let client = Client::builder()
            .user_agent(config.user_agent.as_str())
            .redirect(Policy::limited(MAX_REDIRECTS))
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(|e| ApplicationError::Transport(e.to_string()))?;

        Ok(Self { client })
    }

    /// Creates a transport over a preconfigured reqwest client.
    #[must_use]
    pub const fn with_client(client: Client) -> Self {
        Self { client }
    }

    /// Converts domain `HttpMethod` to reqwest `Method`.
    const fn to_reqwest_method(method: HttpMethod) -> Method {
        match method {
            HttpMethod::Get => Method::GET,
            HttpMethod::Head => Method::HEAD,
            HttpMethod::Options => Method::OPTIONS,
            HttpMethod::Post => Method::POST,
            HttpMethod::Put => Method::PUT,
            HttpMethod::Patch => Method::PATCH,
            HttpMethod::Delete => Method::DELETE,
        }
    }

    fn fail(kind: FailureKind, detail: &dyn std::fmt::Display) -> NetworkFailure {
        debug!(kind = kind.label(), %detail, "request failed");
        NetworkFailure
    }
}

#[async_trait]
impl Transport for ReqwestTransport {
    async fn send(&self, request: &RequestSpec) -> Result<NormalizedResponse, NetworkFailure> {
        let url = request
            .resolve_url()
            .map_err(|e| Self::fail(FailureKind::InvalidUrl, &e))?;

        debug!(url = %url, method = %request.method, "Request");
        if let Some(body) = &request.body {
            debug!(body = %body, "Request body");
        }

        let mut builder = self
            .client
            .request(Self::to_reqwest_method(request.method), url);
        if let Some(body) = &request.body {
            builder = builder
                .header(CONTENT_TYPE, "application/json")
                .body(body.clone());
        }

        let response = builder
            .send()
            .await
            .map_err(|e| Self::fail(FailureKind::classify(&e), &e))?;

        let status = response.status().as_u16();
        let headers: Vec<(String, String)> = response
            .headers()
            .iter()
            .map(|(name, value)| {
                (
                    name.to_string(),
                    String::from_utf8_lossy(value.as_bytes()).into_owned(),
                )
            })
            .collect();
        let body = response
            .bytes()
            .await
            .map_err(|e| Self::fail(FailureKind::InvalidResponse, &e))?
            .to_vec();

        let response = NormalizedResponse::new(status, headers, body);
        debug!(
            status,
            body = %response.body_text(),
            headers = ?response.headers(),
            "Response"
        );
        Ok(response)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_to_reqwest_method() {
        assert_eq!(
            ReqwestTransport::to_reqwest_method(HttpMethod::Get),
            Method::GET
        );
        assert_eq!(
            ReqwestTransport::to_reqwest_method(HttpMethod::Head),
            Method::HEAD
        );
        assert_eq!(
            ReqwestTransport::to_reqwest_method(HttpMethod::Options),
            Method::OPTIONS
        );
        assert_eq!(
            ReqwestTransport::to_reqwest_method(HttpMethod::Patch),
            Method::PATCH
        );
    }

    #[test]
    fn test_transport_creation() {
        let transport = ReqwestTransport::new(&CheckerConfig::new("http://127.0.0.1:8080"));
        assert!(transport.is_ok());
    }

    #[test]
    fn test_failure_labels() {
        assert_eq!(FailureKind::InvalidUrl.label(), "Invalid request URL");
        assert_eq!(FailureKind::Timeout.label(), "Connection timed out");
        assert_eq!(FailureKind::Redirects.label(), "Too many redirects");
    }

    #[tokio::test]
    async fn test_malformed_base_is_network_failure() {
        let transport = ReqwestTransport::with_client(Client::new());
        let request = RequestSpec::new(HttpMethod::Get, "localhost", "/tasks.json");

        assert_eq!(transport.send(&request).await.err(), Some(NetworkFailure));
    }
}
