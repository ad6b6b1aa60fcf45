//! Session lifecycle against the mock API over real HTTP.
//!
//! Run with: cargo test -p shopfront-integration-tests

use std::sync::Arc;

use shopfront_core::{NewCartItem, ProductId, Role};
use shopfront_integration_tests::TestContext;
use shopfront_storefront::auth::{AuthError, AuthStatus, LoginCredentials};
use shopfront_storefront::cart::CartError;
use shopfront_storefront::error::ApiError;
use shopfront_storefront::http::SessionEvent;
use shopfront_storefront::storage::{MemoryStorage, Storage, keys};

async fn context() -> TestContext {
    TestContext::start().await.expect("Failed to start mock API")
}

fn stored(storage: &MemoryStorage, key: &str) -> Option<String> {
    storage.get(key).expect("Failed to read storage")
}

#[tokio::test]
async fn test_login_stores_tokens_and_loads_profile() {
    let ctx = context().await;
    let storage = Arc::new(MemoryStorage::new());
    let shop = ctx.shop_with_storage(storage.clone()).expect("Failed to build client");

    let user = shop
        .auth
        .login(&LoginCredentials::new(" Root@Shop.com ", "root-pass"))
        .await
        .expect("Login failed");
    assert_eq!(user.role, Role::Admin);
    assert!(shop.auth.is_admin());
    assert!(stored(&storage, keys::ACCESS_TOKEN).is_some());
    assert!(stored(&storage, keys::REFRESH_TOKEN).is_some());

    let me = shop.auth.current_user().await.expect("Profile failed");
    assert_eq!(me.email, "root@shop.com");
}

#[tokio::test]
async fn test_bad_login_surfaces_server_message() {
    let ctx = context().await;
    let storage = Arc::new(MemoryStorage::new());
    let shop = ctx.shop_with_storage(storage.clone()).expect("Failed to build client");

    let err = shop
        .auth
        .login(&LoginCredentials::new("john@shop.com", "wrong"))
        .await
        .expect_err("Login should fail");
    assert_eq!(err.user_message(), "Invalid email or password");
    assert_eq!(shop.auth.state().status, AuthStatus::Anonymous);
    assert!(storage.is_empty());
    // auth endpoints never go through the refresh path
    assert_eq!(ctx.api.stats().refresh_calls, 0);
}

#[tokio::test]
async fn test_expired_access_token_refreshes_once() {
    let ctx = context().await;
    let storage = Arc::new(MemoryStorage::new());
    let shop = ctx.shop_with_storage(storage.clone()).expect("Failed to build client");
    shop.auth
        .login(&LoginCredentials::new("john@shop.com", "john-pass"))
        .await
        .expect("Login failed");
    let before = stored(&storage, keys::ACCESS_TOKEN);
    let mut events = shop.client.subscribe();

    ctx.api.expire_access_tokens();
    let me = shop.auth.current_user().await.expect("Profile after refresh failed");

    assert_eq!(me.email, "john@shop.com");
    assert_eq!(ctx.api.stats().refresh_calls, 1);
    assert_ne!(stored(&storage, keys::ACCESS_TOKEN), before);
    assert_eq!(
        events.try_recv().expect("No session event"),
        SessionEvent::TokensRefreshed
    );
}

#[tokio::test]
async fn test_concurrent_unauthorized_requests_share_one_refresh() {
    let ctx = context().await;
    let shop = ctx.shop().expect("Failed to build client");
    shop.auth
        .login(&LoginCredentials::new("john@shop.com", "john-pass"))
        .await
        .expect("Login failed");

    ctx.api.expire_access_tokens();
    let (me, cart, me_again) = tokio::join!(
        shop.auth.current_user(),
        shop.cart.fetch(),
        shop.auth.current_user(),
    );

    me.expect("First profile failed");
    cart.expect("Cart failed");
    me_again.expect("Second profile failed");
    assert_eq!(ctx.api.stats().refresh_calls, 1);
}

#[tokio::test]
async fn test_revoked_session_requires_login() {
    let ctx = context().await;
    let storage = Arc::new(MemoryStorage::new());
    let shop = ctx.shop_with_storage(storage.clone()).expect("Failed to build client");
    shop.auth
        .login(&LoginCredentials::new("ann@shop.com", "ann-pass"))
        .await
        .expect("Login failed");
    shop.cart
        .add(&NewCartItem::new(ProductId::new("tee"), 1))
        .await
        .expect("Add failed");
    let mut events = shop.client.subscribe();

    ctx.api.revoke_sessions();
    let err = shop.cart.fetch().await.expect_err("Cart should fail");

    assert!(matches!(err, CartError::Api(ApiError::SessionExpired)));
    assert!(storage.is_empty());
    assert!(!shop.auth.is_authenticated());
    assert!(shop.cart.state().is_empty());
    assert_eq!(
        events.recv().await.expect("No session event"),
        SessionEvent::LoginRequired
    );
    assert!(matches!(
        shop.auth.current_user().await,
        Err(AuthError::Api(ApiError::SessionExpired))
    ));
}

#[tokio::test]
async fn test_logout_clears_tokens() {
    let ctx = context().await;
    let storage = Arc::new(MemoryStorage::with_entries([(keys::LOCALE, "ko")]));
    let shop = ctx.shop_with_storage(storage.clone()).expect("Failed to build client");
    shop.auth
        .login(&LoginCredentials::new("john@shop.com", "john-pass"))
        .await
        .expect("Login failed");

    shop.logout().await;

    assert_eq!(ctx.api.stats().logout_calls, 1);
    assert_eq!(stored(&storage, keys::ACCESS_TOKEN), None);
    assert_eq!(stored(&storage, keys::REFRESH_TOKEN), None);
    assert_eq!(stored(&storage, keys::LOCALE).as_deref(), Some("ko"));
    assert!(!shop.auth.is_authenticated());
}
