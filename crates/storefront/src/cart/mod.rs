//! Cart store.
//!
//! Mirrors the server-side cart. Each operation awaits the remote call
//! first and only then folds the confirmed result into the snapshot, so a
//! failed call leaves the items exactly as they were. There is no
//! optimistic update to roll back.

mod state;

use std::sync::{Arc, Weak};

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tokio::sync::watch;
use tracing::{debug, instrument};

use shopfront_core::{CartItem, CartItemId, NewCartItem, OrderSummary};

pub use state::{CartEvent, CartState};

use crate::error::ApiError;
use crate::http::{ApiClient, path_segment};

/// Errors from cart operations.
#[derive(Debug, Error)]
pub enum CartError {
    /// Quantities below one are rejected before any network call.
    #[error("quantity must be at least 1 (got {0})")]
    InvalidQuantity(u32),

    /// The requested quantity is above the product's known stock.
    #[error("only {available} left in stock (requested {requested})")]
    ExceedsStock { requested: u32, available: u32 },

    /// Remote call failed.
    #[error(transparent)]
    Api(#[from] ApiError),
}

impl CartError {
    /// Text for a blocking notification.
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            Self::Api(err) => err.user_message(),
            other => other.to_string(),
        }
    }
}

#[derive(Deserialize)]
struct CartPayload {
    #[serde(default)]
    items: Vec<CartItem>,
}

#[derive(Serialize)]
struct QuantityBody {
    quantity: u32,
}

/// Cart state container.
#[derive(Clone)]
pub struct CartStore {
    inner: Arc<CartStoreInner>,
}

struct CartStoreInner {
    client: ApiClient,
    state: watch::Sender<CartState>,
}

impl CartStore {
    /// Create an empty cart over a client.
    #[must_use]
    pub fn new(client: ApiClient) -> Self {
        let (state, _) = watch::channel(CartState::default());
        Self {
            inner: Arc::new(CartStoreInner { client, state }),
        }
    }

    /// Current snapshot.
    #[must_use]
    pub fn state(&self) -> CartState {
        self.inner.state.borrow().clone()
    }

    /// Subscribe to snapshots.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<CartState> {
        self.inner.state.subscribe()
    }

    /// Checkout summary for the current subtotal.
    #[must_use]
    pub fn summary(&self) -> OrderSummary {
        self.inner.state.borrow().summary()
    }

    fn dispatch(&self, event: CartEvent) {
        self.inner.state.send_modify(|state| {
            *state = std::mem::take(state).reduce(event);
            debug!(
                items = state.totals.item_count,
                subtotal = %state.totals.subtotal,
                "Cart state changed"
            );
        });
    }

    fn fail<T>(&self, err: ApiError) -> Result<T, CartError> {
        self.dispatch(CartEvent::Failed(err.user_message()));
        Err(err.into())
    }

    /// Replace the cart with the server's copy.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails; the cart is left untouched.
    #[instrument(skip(self))]
    pub async fn fetch(&self) -> Result<CartState, CartError> {
        match self.inner.client.get::<CartPayload>("/cart").await {
            Ok(payload) => {
                self.dispatch(CartEvent::Loaded(payload.items));
                Ok(self.state())
            }
            Err(e) => self.fail(e),
        }
    }

    /// Add a product. The server merges with an existing identical line and
    /// returns the resulting item, which is upserted by id.
    ///
    /// # Errors
    ///
    /// Returns an error for a zero quantity, a quantity above known stock, or
    /// a failed request.
    #[instrument(skip(self), fields(product_id = %item.product_id, quantity = item.quantity))]
    pub async fn add(&self, item: &NewCartItem) -> Result<CartItem, CartError> {
        if item.quantity < 1 {
            return Err(CartError::InvalidQuantity(item.quantity));
        }
        self.check_merged_stock(item)?;

        match self.inner.client.post::<_, CartItem>("/cart", item).await {
            Ok(added) => {
                self.dispatch(CartEvent::Upserted(added.clone()));
                Ok(added)
            }
            Err(e) => self.fail(e),
        }
    }

    /// Reject adds that would push an existing identical line over stock.
    fn check_merged_stock(&self, item: &NewCartItem) -> Result<(), CartError> {
        let state = self.inner.state.borrow();
        let existing = state.items.iter().find(|line| {
            line.product_id == item.product_id && line.color == item.color && line.size == item.size
        });
        if let Some(line) = existing
            && let Some(available) = line.stock()
        {
            let requested = line.quantity.saturating_add(item.quantity);
            if requested > available {
                return Err(CartError::ExceedsStock {
                    requested,
                    available,
                });
            }
        }
        Ok(())
    }

    /// Change a line's quantity.
    ///
    /// # Errors
    ///
    /// Returns an error for a quantity below one or above known stock
    /// (before any network call), or a failed request.
    #[instrument(skip(self), fields(item_id = %id))]
    pub async fn update_quantity(&self, id: &CartItemId, quantity: u32) -> Result<CartItem, CartError> {
        if quantity < 1 {
            return Err(CartError::InvalidQuantity(quantity));
        }
        let available = self.inner.state.borrow().item(id).and_then(CartItem::stock);
        if let Some(available) = available
            && quantity > available
        {
            return Err(CartError::ExceedsStock {
                requested: quantity,
                available,
            });
        }

        let path = format!("/cart/{}", path_segment(id.as_str()));
        match self
            .inner
            .client
            .put::<_, CartItem>(&path, &QuantityBody { quantity })
            .await
        {
            Ok(updated) => {
                self.dispatch(CartEvent::Updated(updated.clone()));
                Ok(updated)
            }
            Err(e) => self.fail(e),
        }
    }

    /// Delete a line.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails; the line stays.
    #[instrument(skip(self), fields(item_id = %id))]
    pub async fn remove(&self, id: &CartItemId) -> Result<(), CartError> {
        let path = format!("/cart/{}", path_segment(id.as_str()));
        match self.inner.client.delete(&path).await {
            Ok(()) => {
                self.dispatch(CartEvent::Removed(id.clone()));
                Ok(())
            }
            Err(e) => self.fail(e),
        }
    }

    /// Empty the cart.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails; the items stay.
    #[instrument(skip(self))]
    pub async fn clear(&self) -> Result<(), CartError> {
        match self.inner.client.delete("/cart").await {
            Ok(()) => {
                self.dispatch(CartEvent::Cleared);
                Ok(())
            }
            Err(e) => self.fail(e),
        }
    }

    /// Drop the local copy without a network call (after order placement
    /// or logout; the server already emptied or owns the cart).
    pub fn reset(&self) {
        self.dispatch(CartEvent::Cleared);
    }

    /// Empty the local copy whenever the client's session expires.
    pub(crate) fn reset_on_login_required(&self) {
        let inner: Weak<CartStoreInner> = Arc::downgrade(&self.inner);
        self.inner.client.on_login_required(move || {
            if let Some(inner) = inner.upgrade() {
                Self { inner }.reset();
            }
        });
    }
}
