//! Wishlist store.
//!
//! A remote list of (user, product) pairs. Adds append the server's item;
//! removes filter the local list by product id once the server confirms.

use std::sync::{Arc, Weak};

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tokio::sync::watch;
use tracing::{debug, instrument};

use shopfront_core::{ProductId, WishlistItem};

use crate::error::ApiError;
use crate::http::{ApiClient, path_segment};

/// Errors from wishlist operations.
#[derive(Debug, Error)]
pub enum WishlistError {
    /// Remote call failed.
    #[error(transparent)]
    Api(#[from] ApiError),
}

impl WishlistError {
    /// Text for a blocking notification.
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            Self::Api(err) => err.user_message(),
        }
    }
}

#[derive(Deserialize)]
struct WishlistPayload {
    #[serde(default)]
    items: Vec<WishlistItem>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct AddBody<'a> {
    product_id: &'a ProductId,
}

/// Whether a toggle added or removed the product.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Toggled {
    Added,
    Removed,
}

/// Wishlist state container.
#[derive(Clone)]
pub struct WishlistStore {
    inner: Arc<WishlistInner>,
}

struct WishlistInner {
    client: ApiClient,
    items: watch::Sender<Vec<WishlistItem>>,
}

impl WishlistStore {
    /// Create an empty wishlist over a client.
    #[must_use]
    pub fn new(client: ApiClient) -> Self {
        let (items, _) = watch::channel(Vec::new());
        Self {
            inner: Arc::new(WishlistInner { client, items }),
        }
    }

    /// Current items.
    #[must_use]
    pub fn items(&self) -> Vec<WishlistItem> {
        self.inner.items.borrow().clone()
    }

    /// Subscribe to changes.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<Vec<WishlistItem>> {
        self.inner.items.subscribe()
    }

    /// Whether a product is on the list.
    #[must_use]
    pub fn contains(&self, product_id: &ProductId) -> bool {
        self.inner
            .items
            .borrow()
            .iter()
            .any(|item| &item.product_id == product_id)
    }

    /// Drop the local copy without a network call (after logout).
    pub fn reset(&self) {
        self.inner.items.send_replace(Vec::new());
    }

    /// Empty the local copy whenever the client's session expires.
    pub(crate) fn reset_on_login_required(&self) {
        let inner: Weak<WishlistInner> = Arc::downgrade(&self.inner);
        self.inner.client.on_login_required(move || {
            if let Some(inner) = inner.upgrade() {
                Self { inner }.reset();
            }
        });
    }

    /// Replace the list with the server's copy.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails; the list is left untouched.
    #[instrument(skip(self))]
    pub async fn fetch(&self) -> Result<Vec<WishlistItem>, WishlistError> {
        let payload: WishlistPayload = self.inner.client.get("/wishlist").await?;
        debug!(count = payload.items.len(), "Loaded wishlist");
        self.inner.items.send_replace(payload.items.clone());
        Ok(payload.items)
    }

    /// Add a product.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    #[instrument(skip(self), fields(product_id = %product_id))]
    pub async fn add(&self, product_id: &ProductId) -> Result<WishlistItem, WishlistError> {
        let item: WishlistItem = self
            .inner
            .client
            .post("/wishlist", &AddBody { product_id })
            .await?;

        self.inner.items.send_modify(|items| {
            if !items.iter().any(|i| i.product_id == item.product_id) {
                items.push(item.clone());
            }
        });
        Ok(item)
    }

    /// Remove a product.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails; the item stays.
    #[instrument(skip(self), fields(product_id = %product_id))]
    pub async fn remove(&self, product_id: &ProductId) -> Result<(), WishlistError> {
        self.inner
            .client
            .delete(&format!("/wishlist/{}", path_segment(product_id.as_str())))
            .await?;
        self.inner
            .items
            .send_modify(|items| items.retain(|i| &i.product_id != product_id));
        Ok(())
    }

    /// Add if absent, remove if present.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    pub async fn toggle(&self, product_id: &ProductId) -> Result<Toggled, WishlistError> {
        if self.contains(product_id) {
            self.remove(product_id).await?;
            Ok(Toggled::Removed)
        } else {
            self.add(product_id).await?;
            Ok(Toggled::Added)
        }
    }
}
