//! HTTP client wrapper for the storefront API.
//!
//! # Request flow
//!
//! 1. Read the access token from durable storage and attach it as a bearer.
//! 2. Send through the [`Transport`].
//! 3. On a 401 for a request that has not been replayed yet, run the
//!    refresh path once:
//!    - `POST /auth/refresh` with the stored refresh token;
//!    - on success persist the new pair and replay the request once;
//!    - on failure clear both tokens, run the hooks registered with
//!      [`ApiClient::on_login_required`], broadcast
//!      [`SessionEvent::LoginRequired`], and return
//!      [`ApiError::SessionExpired`].
//! 4. Unwrap the response envelope and return `data`.
//!
//! A 401 on the replay is returned as [`ApiError::Unauthorized`]; it never
//! triggers a second refresh.
//!
//! # Single-flight refresh
//!
//! Refreshes are serialized on one lock. A request that waited on the lock
//! compares the token it failed with against the stored token; if another
//! request already rotated it, the waiter replays with the new token instead
//! of refreshing again.

mod envelope;
mod transport;

use std::sync::Arc;

use secrecy::{ExposeSecret, SecretString};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tokio::sync::{Mutex, broadcast};
use tracing::{debug, instrument, warn};

pub use envelope::{Envelope, decode};
pub use transport::{
    ApiRequest, Method, REQUEST_ID_HEADER, RawResponse, ReqwestTransport, Transport,
    TransportError, ensure_trailing_slash, path_segment,
};

use crate::error::ApiError;
use crate::storage::{CredentialStore, Storage, TokenPair};

/// Path of the token refresh endpoint.
pub const REFRESH_PATH: &str = "/auth/refresh";

/// Session lifecycle notifications.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionEvent {
    /// The token pair was rotated by the refresh path.
    TokensRefreshed,
    /// Refresh failed and credentials were cleared. Send the user to login.
    LoginRequired,
}

/// Whether a 401 may be recovered with a token refresh.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RefreshPolicy {
    /// Refresh once and replay once.
    OnUnauthorized,
    /// Return the 401 as-is (auth endpoints themselves).
    Never,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct RefreshRequest<'a> {
    refresh_token: &'a str,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct RefreshResponse {
    access_token: String,
    refresh_token: String,
}

type SessionHook = dyn Fn() + Send + Sync;

/// Client for the storefront JSON API.
///
/// Cheap to clone; clones share the transport, credentials, refresh lock,
/// and event channel.
#[derive(Clone)]
pub struct ApiClient {
    inner: Arc<ApiClientInner>,
}

struct ApiClientInner {
    transport: Arc<dyn Transport>,
    credentials: CredentialStore,
    refresh_lock: Mutex<()>,
    events: broadcast::Sender<SessionEvent>,
    login_required_hooks: parking_lot::Mutex<Vec<Arc<SessionHook>>>,
}

impl ApiClient {
    /// Create a client over a transport and a storage backend.
    #[must_use]
    pub fn new(transport: Arc<dyn Transport>, storage: Arc<dyn Storage>) -> Self {
        let (events, _) = broadcast::channel(16);
        Self {
            inner: Arc::new(ApiClientInner {
                transport,
                credentials: CredentialStore::new(storage),
                refresh_lock: Mutex::new(()),
                events,
                login_required_hooks: parking_lot::Mutex::new(Vec::new()),
            }),
        }
    }

    /// Stored credentials.
    #[must_use]
    pub fn credentials(&self) -> &CredentialStore {
        &self.inner.credentials
    }

    /// Durable storage shared with the credentials.
    #[must_use]
    pub fn storage(&self) -> &Arc<dyn Storage> {
        self.inner.credentials.storage()
    }

    /// Run `hook` whenever the refresh path gives up.
    ///
    /// Hooks run synchronously after the credentials are cleared and before
    /// the failing request returns [`ApiError::SessionExpired`].
    pub fn on_login_required(&self, hook: impl Fn() + Send + Sync + 'static) {
        self.inner.login_required_hooks.lock().push(Arc::new(hook));
    }

    /// Subscribe to session events (refreshes, forced logouts).
    #[must_use]
    pub fn subscribe(&self) -> broadcast::Receiver<SessionEvent> {
        self.inner.events.subscribe()
    }

    // =========================================================================
    // Typed helpers
    // =========================================================================

    /// `GET` and return `data`.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or `data` is missing.
    pub async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T, ApiError> {
        self.request(Method::Get, path, None::<&()>).await
    }

    /// `POST` a JSON body and return `data`.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or `data` is missing.
    pub async fn post<B: Serialize + ?Sized, T: DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T, ApiError> {
        self.request(Method::Post, path, Some(body)).await
    }

    /// `PUT` a JSON body and return `data`.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or `data` is missing.
    pub async fn put<B: Serialize + ?Sized, T: DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T, ApiError> {
        self.request(Method::Put, path, Some(body)).await
    }

    /// `PATCH` a JSON body and return `data`.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or `data` is missing.
    pub async fn patch<B: Serialize + ?Sized, T: DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T, ApiError> {
        self.request(Method::Patch, path, Some(body)).await
    }

    /// `DELETE`, ignoring any `data`.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    pub async fn delete(&self, path: &str) -> Result<(), ApiError> {
        self.send::<serde_json::Value>(Method::Delete, path, None, RefreshPolicy::OnUnauthorized)
            .await
            .map(drop)
    }

    /// Send `body` and discard any `data` in the reply.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    pub async fn submit<B: Serialize + ?Sized>(
        &self,
        method: Method,
        path: &str,
        body: &B,
    ) -> Result<(), ApiError> {
        let body = serde_json::to_value(body)?;
        self.send::<serde_json::Value>(method, path, Some(body), RefreshPolicy::OnUnauthorized)
            .await
            .map(drop)
    }

    /// `POST` without refresh-on-401, for the auth endpoints.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    pub async fn post_auth<B: Serialize + ?Sized, T: DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<Option<T>, ApiError> {
        let body = serde_json::to_value(body)?;
        self.send(Method::Post, path, Some(body), RefreshPolicy::Never)
            .await
    }

    async fn request<B: Serialize + ?Sized, T: DeserializeOwned>(
        &self,
        method: Method,
        path: &str,
        body: Option<&B>,
    ) -> Result<T, ApiError> {
        let body = body.map(serde_json::to_value).transpose()?;
        self.send(method, path, body, RefreshPolicy::OnUnauthorized)
            .await?
            .ok_or_else(|| ApiError::MissingData(path.to_string()))
    }

    // =========================================================================
    // Core send path
    // =========================================================================

    /// Send a request, running the refresh path on 401, and decode the
    /// envelope.
    ///
    /// # Errors
    ///
    /// Returns the classified [`ApiError`].
    #[instrument(skip(self, body))]
    pub async fn send<T: DeserializeOwned>(
        &self,
        method: Method,
        path: &str,
        body: Option<serde_json::Value>,
        policy: RefreshPolicy,
    ) -> Result<Option<T>, ApiError> {
        let token = self.inner.credentials.access_token()?;
        let response = self
            .send_once(method, path, body.clone(), token.clone())
            .await?;

        if response.status != 401 || policy == RefreshPolicy::Never {
            return decode(&response);
        }

        debug!("Received 401, attempting token refresh");
        let fresh = self.refresh_after_unauthorized(token.as_ref()).await?;

        let replay = self.send_once(method, path, body, Some(fresh)).await?;
        if replay.status == 401 {
            warn!("Replayed request was unauthorized again; not refreshing twice");
        }
        decode(&replay)
    }

    async fn send_once(
        &self,
        method: Method,
        path: &str,
        body: Option<serde_json::Value>,
        bearer: Option<SecretString>,
    ) -> Result<RawResponse, ApiError> {
        let request = ApiRequest::new(method, path)
            .with_body(body)
            .with_bearer(bearer);
        debug!(request_id = %request.request_id, "Sending request");

        let response = self.inner.transport.send(&request).await?;
        if response.status >= 500 {
            tracing::error!(
                request_id = %request.request_id,
                status = response.status,
                body = %response.body.chars().take(200).collect::<String>(),
                "API returned server error"
            );
        }
        Ok(response)
    }

    /// Obtain a usable access token after `failed` was rejected.
    #[instrument(skip_all)]
    async fn refresh_after_unauthorized(
        &self,
        failed: Option<&SecretString>,
    ) -> Result<SecretString, ApiError> {
        let _guard = self.inner.refresh_lock.lock().await;

        // Another request may have rotated the pair while we waited
        if let Some(current) = self.inner.credentials.access_token()?
            && failed.is_none_or(|f| f.expose_secret() != current.expose_secret())
        {
            debug!("Token already refreshed by a concurrent request");
            return Ok(current);
        }

        let Some(refresh_token) = self.inner.credentials.refresh_token()? else {
            self.expire_session("no refresh token stored");
            return Err(ApiError::SessionExpired);
        };

        let body = serde_json::to_value(RefreshRequest {
            refresh_token: refresh_token.expose_secret(),
        })?;

        let outcome = match self
            .send_once(Method::Post, REFRESH_PATH, Some(body), None)
            .await
        {
            Ok(response) => decode::<RefreshResponse>(&response)
                .and_then(|data| data.ok_or_else(|| ApiError::MissingData(REFRESH_PATH.into()))),
            Err(e) => Err(e),
        };

        match outcome {
            Ok(data) => {
                let pair = TokenPair::new(data.access_token, data.refresh_token);
                self.inner.credentials.save(&pair)?;
                let _ = self.inner.events.send(SessionEvent::TokensRefreshed);
                debug!("Token pair refreshed");
                Ok(pair.access_token)
            }
            Err(e) => {
                self.expire_session(&e.to_string());
                Err(ApiError::SessionExpired)
            }
        }
    }

    fn expire_session(&self, reason: &str) {
        warn!(reason, "Token refresh failed, clearing credentials");
        if let Err(e) = self.inner.credentials.clear() {
            tracing::error!(error = %e, "Failed to clear stored credentials");
        }
        let hooks = self.inner.login_required_hooks.lock().clone();
        for hook in hooks {
            hook();
        }
        let _ = self.inner.events.send(SessionEvent::LoginRequired);
    }
}

impl std::fmt::Debug for ApiClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApiClient").finish_non_exhaustive()
    }
}
