//! Transport port

use async_trait::async_trait;
use taskcheck_domain::{NormalizedResponse, RequestSpec};
use thiserror::Error;

/// A request that produced no response to assert on.
///
/// Connection errors, malformed URLs, timeouts, redirect loops and protocol
/// errors all collapse into this one value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("HTTP request didn't succeed")]
pub struct NetworkFailure;

/// Port for issuing HTTP requests against the server under test.
///
/// One call is one attempt; implementations never retry.
#[async_trait]
pub trait Transport: Send + Sync {
    /// Sends `request` and returns the normalized response.
    ///
    /// # Errors
    ///
    /// Returns `NetworkFailure` if no HTTP response was received.
    async fn send(&self, request: &RequestSpec) -> Result<NormalizedResponse, NetworkFailure>;
}
