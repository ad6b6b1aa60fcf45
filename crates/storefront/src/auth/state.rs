//! Auth state as an immutable snapshot plus a pure reducer.

use shopfront_core::User;

/// Where the session stands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AuthStatus {
    #[default]
    Anonymous,
    Authenticating,
    Authenticated,
}

/// Everything a view needs to render the session.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct AuthState {
    pub status: AuthStatus,
    pub user: Option<User>,
    /// Last failure, for display. Cleared by the next success.
    pub error: Option<String>,
}

/// Inputs to the reducer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthEvent {
    /// Login or registration started.
    Started,
    /// Login, registration, or profile fetch succeeded.
    Authenticated(User),
    /// Login or registration failed.
    Failed(String),
    /// Profile fetch failed; the status flag is left alone.
    ProfileFailed(String),
    /// Logout, or credentials were cleared by the refresh path.
    LoggedOut,
}

impl AuthState {
    /// Apply an event, producing the next snapshot.
    #[must_use]
    pub fn reduce(self, event: AuthEvent) -> Self {
        match event {
            AuthEvent::Started => Self {
                status: AuthStatus::Authenticating,
                error: None,
                ..self
            },
            AuthEvent::Authenticated(user) => Self {
                status: AuthStatus::Authenticated,
                user: Some(user),
                error: None,
            },
            AuthEvent::Failed(message) => Self {
                status: AuthStatus::Anonymous,
                user: None,
                error: Some(message),
            },
            AuthEvent::ProfileFailed(message) => Self {
                error: Some(message),
                ..self
            },
            AuthEvent::LoggedOut => Self::default(),
        }
    }

    /// Whether a user is signed in.
    #[must_use]
    pub fn is_authenticated(&self) -> bool {
        self.status == AuthStatus::Authenticated
    }

    /// Whether the signed-in user is an admin.
    #[must_use]
    pub fn is_admin(&self) -> bool {
        self.is_authenticated() && self.user.as_ref().is_some_and(User::is_admin)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use shopfront_core::{Role, UserId};

    fn user(role: Role) -> User {
        User {
            id: UserId::new("u_1"),
            name: "Jo".to_string(),
            email: "jo@shop.test".to_string(),
            role,
            is_verified: true,
            created_at: None,
        }
    }

    #[test]
    fn test_login_success_path() {
        let state = AuthState::default().reduce(AuthEvent::Started);
        assert_eq!(state.status, AuthStatus::Authenticating);

        let state = state.reduce(AuthEvent::Authenticated(user(Role::User)));
        assert!(state.is_authenticated());
        assert!(!state.is_admin());
        assert_eq!(state.error, None);
    }

    #[test]
    fn test_login_failure_returns_to_anonymous() {
        let state = AuthState::default()
            .reduce(AuthEvent::Started)
            .reduce(AuthEvent::Failed("Invalid credentials".into()));
        assert_eq!(state.status, AuthStatus::Anonymous);
        assert_eq!(state.error.as_deref(), Some("Invalid credentials"));
    }

    #[test]
    fn test_profile_failure_keeps_status() {
        let signed_in = AuthState::default().reduce(AuthEvent::Authenticated(user(Role::Admin)));
        let state = signed_in.clone().reduce(AuthEvent::ProfileFailed("timeout".into()));
        assert_eq!(state.status, AuthStatus::Authenticated);
        assert_eq!(state.user, signed_in.user);
        assert!(state.is_admin());

        let anonymous = AuthState::default().reduce(AuthEvent::ProfileFailed("401".into()));
        assert_eq!(anonymous.status, AuthStatus::Anonymous);
    }

    #[test]
    fn test_logout_resets_everything() {
        let state = AuthState::default()
            .reduce(AuthEvent::Authenticated(user(Role::Admin)))
            .reduce(AuthEvent::LoggedOut);
        assert_eq!(state, AuthState::default());
    }
}
