//! User management view.

use std::sync::Arc;

use serde::Serialize;
use tracing::{info, instrument};

use shopfront_core::{ListQuery, Role, User, UserId};
use shopfront_storefront::http::path_segment;

use crate::error::{AdminError, Result};
use crate::records::{RecordList, patch_inline};
use crate::session::AdminSession;

#[derive(Serialize)]
struct RoleBody {
    role: Role,
}

/// Every registered user, filterable by name, email and role.
#[derive(Clone)]
pub struct UsersAdmin {
    session: AdminSession,
    users: Arc<RecordList<User>>,
}

impl UsersAdmin {
    #[must_use]
    pub fn new(session: AdminSession) -> Self {
        Self {
            session,
            users: Arc::new(RecordList::default()),
        }
    }

    /// The loaded collection.
    #[must_use]
    pub fn records(&self) -> &RecordList<User> {
        &self.users
    }

    /// Load every user.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails; the loaded list is kept.
    #[instrument(skip(self))]
    pub async fn load(&self) -> Result<Vec<User>> {
        let users: Vec<User> = self.session.client().get("/admin/users").await?;
        info!(count = users.len(), "Loaded admin users");
        self.users.replace(users.clone());
        Ok(users)
    }

    /// Loaded users matching `query`.
    #[must_use]
    pub fn list(&self, query: &ListQuery<Role>) -> Vec<User> {
        self.users.filter(query)
    }

    /// Change a user's role inline.
    ///
    /// An admin cannot demote themself; the server would lock them out of
    /// the view they are using.
    ///
    /// # Errors
    ///
    /// Returns an error if the user is not loaded, already being edited,
    /// is the signed-in admin, or the request fails.
    #[instrument(skip(self), fields(user_id = %id, role = %role))]
    pub async fn set_role(&self, id: &UserId, role: Role) -> Result<User> {
        if id == &self.session.user().id && role != Role::Admin {
            return Err(AdminError::Forbidden { role });
        }
        patch_inline(
            &self.users,
            self.session.client(),
            id.as_str(),
            &format!("/admin/users/{}", path_segment(id.as_str())),
            &RoleBody { role },
            |user| user.role = role,
        )
        .await
    }
}
