//! Role gate for admin views.

use shopfront_core::{Role, User};
use shopfront_storefront::auth::AuthStore;
use shopfront_storefront::http::ApiClient;
use tracing::warn;

use crate::error::{AdminError, Result};

/// Proof that the signed-in user is an admin.
///
/// Every admin service is built from one of these, so no admin request can
/// be sent on behalf of a regular user. The server enforces the same rule.
#[derive(Clone)]
pub struct AdminSession {
    client: ApiClient,
    user: User,
}

impl AdminSession {
    /// Open a session for the user signed in to `auth`.
    ///
    /// # Errors
    ///
    /// Returns [`AdminError::Unauthorized`] with no signed-in user and
    /// [`AdminError::Forbidden`] for a non-admin.
    pub fn from_auth(auth: &AuthStore) -> Result<Self> {
        let user = auth.user().ok_or(AdminError::Unauthorized)?;
        Self::new(auth.client().clone(), user)
    }

    /// Open a session for an already-fetched user.
    ///
    /// # Errors
    ///
    /// Returns [`AdminError::Forbidden`] if `user` is not an admin.
    pub fn new(client: ApiClient, user: User) -> Result<Self> {
        if user.role != Role::Admin {
            warn!(user_id = %user.id, role = %user.role, "Admin access denied");
            return Err(AdminError::Forbidden { role: user.role });
        }
        Ok(Self { client, user })
    }

    /// The admin user.
    #[must_use]
    pub const fn user(&self) -> &User {
        &self.user
    }

    pub(crate) const fn client(&self) -> &ApiClient {
        &self.client
    }
}

impl std::fmt::Debug for AdminSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AdminSession")
            .field("user_id", &self.user.id)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::testing::{admin_user, client, user_json};
    use shopfront_storefront::testing::{MockTransport, envelope};

    #[test]
    fn test_non_admin_is_forbidden() {
        let mut user = admin_user();
        user.role = Role::User;
        let (client, _) = client(MockTransport::new(|_| Ok(envelope(200, serde_json::Value::Null))));
        assert!(matches!(
            AdminSession::new(client, user),
            Err(AdminError::Forbidden { role: Role::User })
        ));
    }

    #[tokio::test]
    async fn test_from_auth() {
        let (client, _) = client(MockTransport::new(|_| {
            Ok(envelope(200, user_json("u1", "Root", "root@shop.com", "ADMIN")))
        }));
        let auth = AuthStore::new(client);
        assert!(matches!(
            AdminSession::from_auth(&auth),
            Err(AdminError::Unauthorized)
        ));

        auth.current_user().await.unwrap();
        let session = AdminSession::from_auth(&auth).unwrap();
        assert_eq!(session.user().email, "root@shop.com");
    }
}
