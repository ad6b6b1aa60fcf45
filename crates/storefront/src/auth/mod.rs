//! Authentication store.
//!
//! Holds the current user and drives the session state machine:
//!
//! ```text
//! Anonymous --login/register--> Authenticating --ok--> Authenticated
//!                                     |
//!                                     +--error--> Anonymous (tokens untouched)
//! Authenticated --logout--> Anonymous (tokens cleared, remote best-effort)
//! ```
//!
//! Snapshots are published through a `watch` channel; views subscribe
//! instead of reading a global.
//!
//! Token persistence and the state flip are two separate steps. A crash in
//! between leaves tokens stored while the in-memory flag is stale; the next
//! [`AuthStore::restore`] reconciles it.

mod error;
mod state;

use std::sync::{Arc, Weak};

use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use tokio::sync::watch;
use tracing::{debug, info, instrument, warn};

use shopfront_core::{Email, User};

pub use error::AuthError;
pub use state::{AuthEvent, AuthState, AuthStatus};

use crate::http::ApiClient;
use crate::storage::TokenPair;

/// Login form input.
#[derive(Clone)]
pub struct LoginCredentials {
    pub email: String,
    pub password: SecretString,
}

impl LoginCredentials {
    /// Build credentials from plain strings.
    #[must_use]
    pub fn new(email: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            email: email.into(),
            password: SecretString::from(password.into()),
        }
    }
}

impl std::fmt::Debug for LoginCredentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LoginCredentials")
            .field("email", &self.email)
            .field("password", &"[REDACTED]")
            .finish()
    }
}

/// Registration form input.
#[derive(Clone)]
pub struct Registration {
    pub name: String,
    pub email: String,
    pub password: SecretString,
}

impl Registration {
    /// Build a registration from plain strings.
    #[must_use]
    pub fn new(
        name: impl Into<String>,
        email: impl Into<String>,
        password: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            email: email.into(),
            password: SecretString::from(password.into()),
        }
    }
}

impl std::fmt::Debug for Registration {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Registration")
            .field("name", &self.name)
            .field("email", &self.email)
            .field("password", &"[REDACTED]")
            .finish()
    }
}

#[derive(Serialize)]
struct LoginBody<'a> {
    email: &'a str,
    password: &'a str,
}

#[derive(Serialize)]
struct RegisterBody<'a> {
    name: &'a str,
    email: &'a str,
    password: &'a str,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct LogoutBody<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    refresh_token: Option<&'a str>,
}

/// Payload of `/auth/login` and `/auth/register`.
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct AuthPayload {
    user: User,
    access_token: String,
    refresh_token: String,
}

/// Session state container.
#[derive(Clone)]
pub struct AuthStore {
    inner: Arc<AuthStoreInner>,
}

struct AuthStoreInner {
    client: ApiClient,
    state: watch::Sender<AuthState>,
}

impl AuthStore {
    /// Create an anonymous store over a client.
    #[must_use]
    pub fn new(client: ApiClient) -> Self {
        let (state, _) = watch::channel(AuthState::default());
        Self {
            inner: Arc::new(AuthStoreInner { client, state }),
        }
    }

    /// The client this store authenticates.
    #[must_use]
    pub fn client(&self) -> &ApiClient {
        &self.inner.client
    }

    /// Current snapshot.
    #[must_use]
    pub fn state(&self) -> AuthState {
        self.inner.state.borrow().clone()
    }

    /// Subscribe to snapshots.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<AuthState> {
        self.inner.state.subscribe()
    }

    /// Signed-in user, if any.
    #[must_use]
    pub fn user(&self) -> Option<User> {
        self.inner.state.borrow().user.clone()
    }

    /// Whether a user is signed in.
    #[must_use]
    pub fn is_authenticated(&self) -> bool {
        self.inner.state.borrow().is_authenticated()
    }

    /// Whether the signed-in user is an admin.
    #[must_use]
    pub fn is_admin(&self) -> bool {
        self.inner.state.borrow().is_admin()
    }

    fn dispatch(&self, event: AuthEvent) {
        self.inner.state.send_modify(|state| {
            let next = std::mem::take(state).reduce(event);
            debug!(status = ?next.status, "Auth state changed");
            *state = next;
        });
    }

    /// Sign in with email and password.
    ///
    /// On failure the store returns to `Anonymous` and stored tokens are left
    /// as they were.
    ///
    /// # Errors
    ///
    /// Returns an error for an invalid email, a rejected login, or a
    /// storage failure while saving tokens.
    #[instrument(skip(self, credentials), fields(email = %credentials.email))]
    pub async fn login(&self, credentials: &LoginCredentials) -> Result<User, AuthError> {
        self.dispatch(AuthEvent::Started);
        let result = self.login_inner(credentials).await;
        self.settle(result)
    }

    async fn login_inner(&self, credentials: &LoginCredentials) -> Result<User, AuthError> {
        let email = Email::parse(&credentials.email)?;
        let body = LoginBody {
            email: email.as_str(),
            password: credentials.password.expose_secret(),
        };
        let payload: Option<AuthPayload> =
            self.inner.client.post_auth("/auth/login", &body).await?;
        self.accept(payload)
    }

    /// Create an account and sign in.
    ///
    /// # Errors
    ///
    /// Returns an error for blank fields, an invalid email, a rejected
    /// registration, or a storage failure while saving tokens.
    #[instrument(skip(self, registration), fields(email = %registration.email))]
    pub async fn register(&self, registration: &Registration) -> Result<User, AuthError> {
        self.dispatch(AuthEvent::Started);
        let result = self.register_inner(registration).await;
        self.settle(result)
    }

    async fn register_inner(&self, registration: &Registration) -> Result<User, AuthError> {
        let name = registration.name.trim();
        if name.is_empty() {
            return Err(AuthError::MissingField("name"));
        }
        if registration.password.expose_secret().is_empty() {
            return Err(AuthError::MissingField("password"));
        }
        let email = Email::parse(&registration.email)?;

        let body = RegisterBody {
            name,
            email: email.as_str(),
            password: registration.password.expose_secret(),
        };
        let payload: Option<AuthPayload> =
            self.inner.client.post_auth("/auth/register", &body).await?;
        self.accept(payload)
    }

    fn accept(&self, payload: Option<AuthPayload>) -> Result<User, AuthError> {
        let payload = payload.ok_or(AuthError::IncompleteResponse)?;
        let tokens = TokenPair::new(payload.access_token, payload.refresh_token);
        self.inner.client.credentials().save(&tokens)?;
        Ok(payload.user)
    }

    fn settle(&self, result: Result<User, AuthError>) -> Result<User, AuthError> {
        match result {
            Ok(user) => {
                info!(user_id = %user.id, "Signed in");
                self.dispatch(AuthEvent::Authenticated(user.clone()));
                Ok(user)
            }
            Err(e) => {
                self.dispatch(AuthEvent::Failed(e.user_message()));
                Err(e)
            }
        }
    }

    /// Re-fetch the signed-in user's profile.
    ///
    /// Success (re)asserts `Authenticated`. Failure records the error but
    /// leaves the status flag as it was.
    ///
    /// # Errors
    ///
    /// Returns an error if the profile request fails.
    #[instrument(skip(self))]
    pub async fn current_user(&self) -> Result<User, AuthError> {
        match self.inner.client.get::<User>("/auth/me").await {
            Ok(user) => {
                self.dispatch(AuthEvent::Authenticated(user.clone()));
                Ok(user)
            }
            Err(e) => {
                self.dispatch(AuthEvent::ProfileFailed(e.user_message()));
                Err(e.into())
            }
        }
    }

    /// Restore a session from stored tokens at startup.
    ///
    /// Returns `None` when no token is stored or the stored session is no
    /// longer valid.
    #[instrument(skip(self))]
    pub async fn restore(&self) -> Option<User> {
        match self.inner.client.credentials().has_session() {
            Ok(true) => {}
            Ok(false) => return None,
            Err(e) => {
                warn!(error = %e, "Could not read stored credentials");
                return None;
            }
        }
        match self.current_user().await {
            Ok(user) => Some(user),
            Err(e) => {
                debug!(error = %e, "Stored session could not be restored");
                None
            }
        }
    }

    /// Sign out.
    ///
    /// The remote logout is best-effort. Stored tokens are cleared and the
    /// state forced to `Anonymous` whatever the remote outcome.
    #[instrument(skip(self))]
    pub async fn logout(&self) {
        let credentials = self.inner.client.credentials();
        let refresh_token = credentials.refresh_token().ok().flatten();
        let body = LogoutBody {
            refresh_token: refresh_token.as_ref().map(|t| t.expose_secret()),
        };

        if let Err(e) = self
            .inner
            .client
            .post_auth::<_, serde_json::Value>("/auth/logout", &body)
            .await
        {
            warn!(error = %e, "Remote logout failed, clearing local session anyway");
        }

        if let Err(e) = credentials.clear() {
            tracing::error!(error = %e, "Failed to clear stored tokens on logout");
        }
        self.dispatch(AuthEvent::LoggedOut);
        info!("Signed out");
    }

    /// Drop to `Anonymous` synchronously whenever the client's session
    /// expires.
    pub(crate) fn sign_out_on_login_required(&self) {
        let inner: Weak<AuthStoreInner> = Arc::downgrade(&self.inner);
        self.inner.client.on_login_required(move || {
            if let Some(inner) = inner.upgrade() {
                Self { inner }.dispatch(AuthEvent::LoggedOut);
            }
        });
    }
}
