//! Wire transport seam.
//!
//! [`ApiClient`](super::ApiClient) builds [`ApiRequest`]s and hands them to a
//! [`Transport`]. Production uses [`ReqwestTransport`]; tests script
//! responses without a network.

use std::time::Duration;

use async_trait::async_trait;
use secrecy::{ExposeSecret, SecretString};
use thiserror::Error;
use tracing::debug;
use url::Url;
use uuid::Uuid;

/// Header carrying the per-request correlation ID.
pub const REQUEST_ID_HEADER: &str = "x-request-id";

/// HTTP methods used by the storefront API.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Method {
    Get,
    Post,
    Put,
    Patch,
    Delete,
}

impl Method {
    /// Upper-case method name.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Get => "GET",
            Self::Post => "POST",
            Self::Put => "PUT",
            Self::Patch => "PATCH",
            Self::Delete => "DELETE",
        }
    }
}

impl std::fmt::Display for Method {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<Method> for reqwest::Method {
    fn from(method: Method) -> Self {
        match method {
            Method::Get => Self::GET,
            Method::Post => Self::POST,
            Method::Put => Self::PUT,
            Method::Patch => Self::PATCH,
            Method::Delete => Self::DELETE,
        }
    }
}

/// One outbound request, fully resolved except for the base URL.
#[derive(Debug, Clone)]
pub struct ApiRequest {
    pub method: Method,
    /// Path relative to the API base, e.g. `/cart/ci_1`.
    pub path: String,
    pub body: Option<serde_json::Value>,
    pub bearer: Option<SecretString>,
    pub request_id: Uuid,
}

impl ApiRequest {
    /// A request with a fresh correlation ID.
    #[must_use]
    pub fn new(method: Method, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            body: None,
            bearer: None,
            request_id: Uuid::new_v4(),
        }
    }

    /// Attach a JSON body.
    #[must_use]
    pub fn with_body(mut self, body: Option<serde_json::Value>) -> Self {
        self.body = body;
        self
    }

    /// Attach a bearer token.
    #[must_use]
    pub fn with_bearer(mut self, bearer: Option<SecretString>) -> Self {
        self.bearer = bearer;
        self
    }

    /// The bearer token in plain text, for comparisons.
    #[must_use]
    pub fn bearer_str(&self) -> Option<&str> {
        self.bearer.as_ref().map(|t| t.expose_secret())
    }
}

/// Status and body of a response, before envelope decoding.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawResponse {
    pub status: u16,
    pub body: String,
}

impl RawResponse {
    /// Build a response.
    #[must_use]
    pub fn new(status: u16, body: impl Into<String>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }

    /// Whether the status is 2xx.
    #[must_use]
    pub const fn is_success(&self) -> bool {
        self.status >= 200 && self.status < 300
    }
}

/// Failures below HTTP: the request never produced a status code.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum TransportError {
    /// The blanket request timeout elapsed.
    #[error("request timed out")]
    Timeout,

    /// Connection, TLS, or protocol failure.
    #[error("network error: {0}")]
    Network(String),

    /// The request could not be built (bad path, bad client config).
    #[error("invalid request: {0}")]
    InvalidRequest(String),
}

/// Sends [`ApiRequest`]s somewhere and returns what came back.
#[async_trait]
pub trait Transport: Send + Sync {
    /// Send one request. Never retries.
    async fn send(&self, request: &ApiRequest) -> Result<RawResponse, TransportError>;
}

/// [`Transport`] over `reqwest`.
#[derive(Debug, Clone)]
pub struct ReqwestTransport {
    client: reqwest::Client,
    base_url: Url,
}

impl ReqwestTransport {
    /// Create a transport rooted at `base_url` with a blanket timeout.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be built.
    pub fn new(base_url: Url, timeout: Duration) -> Result<Self, TransportError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| TransportError::InvalidRequest(e.to_string()))?;

        Ok(Self {
            client,
            base_url: ensure_trailing_slash(base_url),
        })
    }

    /// The API base URL.
    #[must_use]
    pub const fn base_url(&self) -> &Url {
        &self.base_url
    }

    fn url_for(&self, path: &str) -> Result<Url, TransportError> {
        let route = path.split(['?', '#']).next().unwrap_or_default();
        if route.split('/').any(is_dot_segment) {
            return Err(TransportError::InvalidRequest(format!(
                "{path}: dot segments are not allowed"
            )));
        }
        self.base_url
            .join(path.trim_start_matches('/'))
            .map_err(|e| TransportError::InvalidRequest(format!("{path}: {e}")))
    }
}

/// `.` and `..`, including their percent-encoded spellings, which URL
/// joining resolves the same way.
fn is_dot_segment(segment: &str) -> bool {
    let decoded = segment.to_ascii_lowercase().replace("%2e", ".");
    decoded == "." || decoded == ".."
}

/// Escape an id or slug so it stays a single path segment.
///
/// `/`, `?`, `#` and `%` are percent-encoded, so a value can only ever name
/// a resource under the route it is appended to.
#[must_use]
pub fn path_segment(raw: &str) -> String {
    url::form_urlencoded::byte_serialize(raw.as_bytes())
        .collect::<String>()
        .replace('+', "%20")
}

#[async_trait]
impl Transport for ReqwestTransport {
    async fn send(&self, request: &ApiRequest) -> Result<RawResponse, TransportError> {
        let url = self.url_for(&request.path)?;

        let mut builder = self
            .client
            .request(request.method.into(), url)
            .header(REQUEST_ID_HEADER, request.request_id.to_string())
            .header("Accept", "application/json");

        if let Some(token) = &request.bearer {
            builder = builder.bearer_auth(token.expose_secret());
        }
        if let Some(body) = &request.body {
            builder = builder.json(body);
        }

        let response = builder.send().await.map_err(map_reqwest_error)?;
        let status = response.status().as_u16();
        let body = response.text().await.map_err(map_reqwest_error)?;

        debug!(status, bytes = body.len(), "Received response");
        Ok(RawResponse { status, body })
    }
}

fn map_reqwest_error(e: reqwest::Error) -> TransportError {
    if e.is_timeout() {
        TransportError::Timeout
    } else {
        TransportError::Network(e.to_string())
    }
}

/// `Url::join` drops the last path segment unless the base ends with `/`.
#[must_use]
pub fn ensure_trailing_slash(mut url: Url) -> Url {
    if !url.path().ends_with('/') {
        let path = format!("{}/", url.path());
        url.set_path(&path);
    }
    url
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_ensure_trailing_slash() {
        let url = ensure_trailing_slash(Url::parse("https://shop.test/api").unwrap());
        assert_eq!(url.as_str(), "https://shop.test/api/");

        let url = ensure_trailing_slash(Url::parse("https://shop.test/api/").unwrap());
        assert_eq!(url.as_str(), "https://shop.test/api/");
    }

    #[test]
    fn test_url_for_keeps_base_path() {
        let transport = ReqwestTransport::new(
            Url::parse("https://shop.test/api").unwrap(),
            Duration::from_secs(5),
        )
        .unwrap();
        assert_eq!(
            transport.url_for("/cart/ci_1").unwrap().as_str(),
            "https://shop.test/api/cart/ci_1"
        );
    }

    #[test]
    fn test_path_segment_escapes_separators() {
        assert_eq!(path_segment("ci_1"), "ci_1");
        assert_eq!(path_segment("../admin/users"), "..%2Fadmin%2Fusers");
        assert_eq!(path_segment("a?b#c"), "a%3Fb%23c");
        assert_eq!(path_segment("50% off"), "50%25%20off");
        assert_eq!(path_segment("tee+cap"), "tee%2Bcap");
    }

    #[test]
    fn test_url_for_refuses_dot_segments() {
        let transport = ReqwestTransport::new(
            Url::parse("https://shop.test/api").unwrap(),
            Duration::from_secs(5),
        )
        .unwrap();
        for path in ["/cart/..", "/cart/.", "/cart/%2E%2e", "/cart/..?x=1"] {
            assert!(
                matches!(transport.url_for(path), Err(TransportError::InvalidRequest(_))),
                "{path} should be refused"
            );
        }
        assert_eq!(
            transport
                .url_for(&format!("/cart/{}", path_segment("../admin/users")))
                .unwrap()
                .as_str(),
            "https://shop.test/api/cart/..%2Fadmin%2Fusers"
        );
        assert!(transport.url_for("/products?search=a..b").is_ok());
    }

    #[test]
    fn test_raw_response_success_range() {
        assert!(RawResponse::new(200, "").is_success());
        assert!(RawResponse::new(204, "").is_success());
        assert!(!RawResponse::new(401, "").is_success());
    }
}
