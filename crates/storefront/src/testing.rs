//! Test doubles for the transport seam.
//!
//! Enabled for this crate's own tests and, through the `test-util` feature,
//! for downstream crates that exercise stores without a server.

use async_trait::async_trait;
use parking_lot::Mutex;

use crate::http::{ApiRequest, RawResponse, Transport, TransportError};

type Handler = dyn Fn(&ApiRequest) -> Result<RawResponse, TransportError> + Send + Sync;

/// A [`Transport`] that answers every request with a closure and records
/// what was sent.
pub struct MockTransport {
    handler: Box<Handler>,
    requests: Mutex<Vec<ApiRequest>>,
    yield_before_reply: bool,
}

impl MockTransport {
    /// Answer requests with `handler`.
    pub fn new<F>(handler: F) -> Self
    where
        F: Fn(&ApiRequest) -> Result<RawResponse, TransportError> + Send + Sync + 'static,
    {
        Self {
            handler: Box::new(handler),
            requests: Mutex::new(Vec::new()),
            yield_before_reply: false,
        }
    }

    /// Yield to the scheduler before each reply so concurrent requests
    /// interleave on a single-threaded runtime.
    #[must_use]
    pub const fn yielding(mut self) -> Self {
        self.yield_before_reply = true;
        self
    }

    /// Requests sent so far, in order.
    pub fn requests(&self) -> Vec<ApiRequest> {
        self.requests.lock().clone()
    }

    /// Number of requests sent to `path`.
    pub fn count_path(&self, path: &str) -> usize {
        self.requests
            .lock()
            .iter()
            .filter(|r| r.path == path)
            .count()
    }

    /// The most recent request.
    pub fn last_request(&self) -> Option<ApiRequest> {
        self.requests.lock().last().cloned()
    }
}

#[async_trait]
impl Transport for MockTransport {
    async fn send(&self, request: &ApiRequest) -> Result<RawResponse, TransportError> {
        self.requests.lock().push(request.clone());
        if self.yield_before_reply {
            tokio::task::yield_now().await;
        }
        (self.handler)(request)
    }
}

/// A success envelope wrapping `data`.
#[must_use]
pub fn envelope(status: u16, data: serde_json::Value) -> RawResponse {
    RawResponse::new(
        status,
        serde_json::json!({
            "success": true,
            "statusCode": status,
            "message": "OK",
            "data": data,
        })
        .to_string(),
    )
}

/// A failure envelope with a message.
#[must_use]
pub fn failure(status: u16, message: &str) -> RawResponse {
    RawResponse::new(
        status,
        serde_json::json!({
            "success": false,
            "statusCode": status,
            "message": message,
        })
        .to_string(),
    )
}
