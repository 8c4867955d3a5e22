//! In-memory transport for unit tests.

#![allow(clippy::unwrap_used)]

use std::collections::VecDeque;
use std::sync::Mutex;

use async_trait::async_trait;
use serde_json::Value;
use taskcheck_domain::{NormalizedResponse, RequestSpec};

use crate::ports::{NetworkFailure, Transport};

/// Replays canned responses in order and records every request it receives.
///
/// Once the queue is empty every further call fails like an unreachable host.
#[derive(Default)]
pub struct MockTransport {
    responses: Mutex<VecDeque<Result<NormalizedResponse, NetworkFailure>>>,
    requests: Mutex<Vec<RequestSpec>>,
}

impl MockTransport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn json(self, status: u16, headers: &[(&str, &str)], body: &Value) -> Self {
        let raw = serde_json::to_vec(body).unwrap();
        self.push(Ok(NormalizedResponse::new(status, headers.iter().copied(), raw)))
    }

    pub fn empty(self, status: u16, headers: &[(&str, &str)]) -> Self {
        self.push(Ok(NormalizedResponse::new(
            status,
            headers.iter().copied(),
            Vec::new(),
        )))
    }

    pub fn unreachable(self) -> Self {
        self.push(Err(NetworkFailure))
    }

    fn push(self, response: Result<NormalizedResponse, NetworkFailure>) -> Self {
        self.responses.lock().unwrap().push_back(response);
        self
    }

    pub fn requests(&self) -> Vec<RequestSpec> {
        self.requests.lock().unwrap().clone()
    }
}

#[async_trait]
impl Transport for MockTransport {
    async fn send(&self, request: &RequestSpec) -> Result<NormalizedResponse, NetworkFailure> {
        self.requests.lock().unwrap().push(request.clone());
        self.responses
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or(Err(NetworkFailure))
    }
}
