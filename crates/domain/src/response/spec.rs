//! Normalized response type
//!
//! Everything an assertion routine needs from one HTTP exchange: the status,
//! the headers with case-insensitive lookup, and the raw body with a lazily
//! decoded JSON view.

use std::borrow::Cow;
use std::collections::BTreeMap;
use std::sync::OnceLock;

use serde_json::Value;

/// HTTP response as seen by the assertion library.
///
/// Built once per transport call and never mutated afterwards; the JSON view
/// is decoded on first access and cached.
#[derive(Debug, Clone, Default)]
pub struct NormalizedResponse {
    status: u16,
    headers: BTreeMap<String, String>,
    body_raw: Vec<u8>,
    body_parsed: OnceLock<Option<Value>>,
}

impl NormalizedResponse {
    /// Creates a new `NormalizedResponse` from raw response data.
    ///
    /// Header names are folded to lowercase. When a name repeats, the values
    /// are joined with `", "` as HTTP list headers allow.
    #[must_use]
    pub fn new<I, K, V>(status: u16, headers: I, body_raw: Vec<u8>) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: Into<String>,
    {
        let mut folded: BTreeMap<String, String> = BTreeMap::new();
        for (name, value) in headers {
            let value = value.into();
            folded
                .entry(name.as_ref().to_ascii_lowercase())
                .and_modify(|existing| {
                    existing.push_str(", ");
                    existing.push_str(&value);
                })
                .or_insert(value);
        }

        Self {
            status,
            headers: folded,
            body_raw,
            body_parsed: OnceLock::new(),
        }
    }

    /// Returns the numeric status code.
    #[must_use]
    pub const fn status(&self) -> u16 {
        self.status
    }

    /// Gets a header value by name (case-insensitive).
    #[must_use]
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .get(&name.to_ascii_lowercase())
            .map(String::as_str)
    }

    /// Returns all headers, keyed by lowercase name.
    #[must_use]
    pub const fn headers(&self) -> &BTreeMap<String, String> {
        &self.headers
    }

    /// Returns the body exactly as received.
    #[must_use]
    pub fn body_raw(&self) -> &[u8] {
        &self.body_raw
    }

    /// Returns the body as a lossy UTF-8 string.
    #[must_use]
    pub fn body_text(&self) -> Cow<'_, str> {
        String::from_utf8_lossy(&self.body_raw)
    }

    /// Returns the body decoded as JSON, or `None` if it is not valid JSON.
    #[must_use]
    pub fn json(&self) -> Option<&Value> {
        self.body_parsed
            .get_or_init(|| serde_json::from_slice(&self.body_raw).ok())
            .as_ref()
    }
}
