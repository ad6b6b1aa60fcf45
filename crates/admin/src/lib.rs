//! Shopfront admin views.
//!
//! Order and user management over the admin endpoints: full-collection
//! loads, client-side search and filtering, and inline edits that roll back
//! when the server refuses them.
//!
//! Every entry point takes an [`AdminSession`], which can only be opened
//! for a signed-in user with the `ADMIN` role.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod dashboard;
pub mod error;
pub mod orders;
pub mod records;
pub mod session;
pub mod users;

#[cfg(test)]
mod testing;

pub use dashboard::{DashboardStats, dashboard};
pub use error::AdminError;
pub use orders::OrdersAdmin;
pub use records::{AdminRecord, PendingEdit, RecordList};
pub use session::AdminSession;
pub use users::UsersAdmin;
