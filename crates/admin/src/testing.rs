//! Fixtures shared by this crate's tests.

use std::sync::Arc;

use shopfront_core::{Role, User, UserId};
use shopfront_storefront::http::ApiClient;
use shopfront_storefront::storage::MemoryStorage;
use shopfront_storefront::testing::MockTransport;

use crate::session::AdminSession;

pub fn admin_user() -> User {
    User {
        id: UserId::new("u1"),
        name: "Root".to_string(),
        email: "root@shop.com".to_string(),
        role: Role::Admin,
        is_verified: true,
        created_at: None,
    }
}

pub fn user_json(id: &str, name: &str, email: &str, role: &str) -> serde_json::Value {
    serde_json::json!({"id": id, "name": name, "email": email, "role": role})
}

pub fn order_json(id: &str, number: &str, email: &str, status: &str) -> serde_json::Value {
    serde_json::json!({
        "id": id,
        "orderNumber": number,
        "userId": "u9",
        "user": {"name": "Customer", "email": email},
        "items": [],
        "subtotal": "10.00",
        "shippingFee": "10.00",
        "tax": "1.00",
        "total": "21.00",
        "status": status
    })
}

pub fn client(transport: MockTransport) -> (ApiClient, Arc<MockTransport>) {
    let transport = Arc::new(transport);
    let storage = Arc::new(MemoryStorage::with_entries([("access_token", "admin-token")]));
    (ApiClient::new(transport.clone(), storage), transport)
}

#[allow(clippy::unwrap_used)]
pub fn session(transport: MockTransport) -> (AdminSession, Arc<MockTransport>) {
    let (client, transport) = client(transport);
    (AdminSession::new(client, admin_user()).unwrap(), transport)
}
