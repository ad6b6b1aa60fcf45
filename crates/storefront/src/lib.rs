//! Shopfront storefront client.
//!
//! State containers for a shopping storefront backed by a remote JSON API:
//! authentication with transparent token refresh, the cart, the wishlist,
//! orders and checkout, the catalog, and a few stored preferences.
//!
//! [`Shopfront`] wires every store over one shared [`http::ApiClient`].

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod auth;
pub mod cart;
pub mod catalog;
pub mod config;
pub mod error;
pub mod http;
pub mod orders;
pub mod popup;
pub mod preferences;
pub mod storage;
pub mod wishlist;

#[cfg(any(test, feature = "test-util"))]
pub mod testing;

use std::sync::Arc;

use auth::AuthStore;
use cart::CartStore;
use catalog::CatalogClient;
use config::StorefrontConfig;
use http::{ApiClient, ReqwestTransport, Transport, TransportError};
use orders::OrdersService;
use popup::{DailyPopup, PopupConfig};
use preferences::Preferences;
use storage::{FileStorage, Storage, StorageError};
use wishlist::WishlistStore;

/// Errors building a [`Shopfront`] from configuration.
#[derive(Debug, thiserror::Error)]
pub enum SetupError {
    #[error(transparent)]
    Storage(#[from] StorageError),
    #[error(transparent)]
    Transport(#[from] TransportError),
}

/// Every store, sharing one client and one storage backend.
#[derive(Clone)]
pub struct Shopfront {
    pub client: ApiClient,
    pub auth: AuthStore,
    pub cart: CartStore,
    pub wishlist: WishlistStore,
    pub orders: OrdersService,
    pub catalog: CatalogClient,
    pub popup: DailyPopup,
    pub preferences: Preferences,
}

impl Shopfront {
    /// Build over file storage and `reqwest`, as configured.
    ///
    /// # Errors
    ///
    /// Returns an error if the storage file is unreadable or the HTTP client
    /// cannot be built.
    pub fn from_config(config: &StorefrontConfig) -> Result<Self, SetupError> {
        let storage = Arc::new(FileStorage::open(&config.storage_path)?);
        let transport = Arc::new(ReqwestTransport::new(
            config.api_url.clone(),
            config.timeout,
        )?);
        Ok(Self::new(transport, storage, config.popup.clone()))
    }

    /// Build over an arbitrary transport and storage.
    ///
    /// When the client gives up on refreshing the session, the auth store
    /// drops to `Anonymous` and the cart and wishlist are emptied before the
    /// failing call returns.
    #[must_use]
    pub fn new(
        transport: Arc<dyn Transport>,
        storage: Arc<dyn Storage>,
        popup: PopupConfig,
    ) -> Self {
        let client = ApiClient::new(transport, storage.clone());
        let auth = AuthStore::new(client.clone());
        let cart = CartStore::new(client.clone());
        let wishlist = WishlistStore::new(client.clone());
        auth.sign_out_on_login_required();
        cart.reset_on_login_required();
        wishlist.reset_on_login_required();
        Self {
            orders: OrdersService::new(client.clone(), cart.clone()),
            catalog: CatalogClient::new(client.clone()),
            popup: DailyPopup::new(storage.clone(), popup),
            preferences: Preferences::new(storage),
            auth,
            cart,
            wishlist,
            client,
        }
    }

    /// Log out and drop every per-user local copy.
    pub async fn logout(&self) {
        self.auth.logout().await;
        self.cart.reset();
        self.wishlist.reset();
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::error::ApiError;
    use crate::http::Method;
    use crate::storage::{MemoryStorage, keys};
    use crate::testing::{MockTransport, envelope, failure};

    fn cart_json() -> serde_json::Value {
        serde_json::json!({"items": [{
            "id": "c1",
            "productId": "p1",
            "quantity": 1,
            "product": {"id": "p1", "name": "Tee", "slug": "tee", "price": "9.00"}
        }]})
    }

    #[tokio::test]
    async fn test_expired_session_clears_per_user_state() {
        let transport = Arc::new(MockTransport::new(|req| {
            let signed_in = req.bearer_str() == Some("a");
            Ok(match (req.method, req.path.as_str()) {
                (Method::Post, "/auth/login") => envelope(
                    200,
                    serde_json::json!({
                        "user": {"id": "u2", "name": "John", "email": "john@shop.com", "role": "USER"},
                        "accessToken": "a",
                        "refreshToken": "r"
                    }),
                ),
                (Method::Post, "/auth/refresh") => failure(401, "Refresh token revoked"),
                (Method::Get, "/cart") if signed_in => envelope(200, cart_json()),
                (Method::Get, "/wishlist") if signed_in => {
                    envelope(200, serde_json::json!({"items": [{"id": "w1", "productId": "p1"}]}))
                }
                _ => failure(401, "Unauthorized"),
            })
        }));
        let storage = Arc::new(MemoryStorage::new());
        let shop = Shopfront::new(transport, storage.clone(), PopupConfig::default());

        shop.auth
            .login(&auth::LoginCredentials::new("john@shop.com", "pw"))
            .await
            .unwrap();
        shop.cart.fetch().await.unwrap();
        shop.wishlist.fetch().await.unwrap();
        assert!(shop.auth.is_authenticated());

        // the server forgets the session; the next call cannot be refreshed
        storage.set(keys::ACCESS_TOKEN, "stale").unwrap();
        let err = shop.cart.fetch().await.unwrap_err();
        assert!(matches!(err, cart::CartError::Api(ApiError::SessionExpired)));

        assert!(!shop.auth.is_authenticated());
        assert!(shop.auth.user().is_none());
        assert!(shop.cart.state().is_empty());
        assert!(shop.wishlist.items().is_empty());
        assert_eq!(storage.get(keys::REFRESH_TOKEN).unwrap(), None);
    }

    #[tokio::test]
    async fn test_logout_clears_per_user_state() {
        let transport = Arc::new(MockTransport::new(|req| {
            Ok(match (req.method, req.path.as_str()) {
                (Method::Get, "/cart") => envelope(200, cart_json()),
                (Method::Get, "/wishlist") => {
                    envelope(200, serde_json::json!({"items": [{"id": "w1", "productId": "p1"}]}))
                }
                _ => envelope(200, serde_json::Value::Null),
            })
        }));
        let storage = Arc::new(MemoryStorage::with_entries([
            (keys::ACCESS_TOKEN, "a"),
            (keys::REFRESH_TOKEN, "r"),
            (keys::LOCALE, "ko"),
        ]));
        let shop = Shopfront::new(transport, storage.clone(), PopupConfig::default());

        shop.cart.fetch().await.unwrap();
        shop.wishlist.fetch().await.unwrap();
        shop.logout().await;

        assert!(shop.cart.state().is_empty());
        assert!(shop.wishlist.items().is_empty());
        assert_eq!(storage.get(keys::ACCESS_TOKEN).unwrap(), None);
        assert_eq!(storage.get(keys::REFRESH_TOKEN).unwrap(), None);
        assert_eq!(storage.get(keys::LOCALE).unwrap().as_deref(), Some("ko"));
    }
}
