//! Order management view.

use std::sync::Arc;

use serde::Serialize;
use tracing::{info, instrument};

use shopfront_core::{ListQuery, Order, OrderId, OrderStatus};
use shopfront_storefront::http::path_segment;

use crate::error::Result;
use crate::records::{RecordList, patch_inline};
use crate::session::AdminSession;

#[derive(Serialize)]
struct StatusBody {
    status: OrderStatus,
}

/// Every order in the store, filterable by order number, customer email
/// and status.
#[derive(Clone)]
pub struct OrdersAdmin {
    session: AdminSession,
    orders: Arc<RecordList<Order>>,
}

impl OrdersAdmin {
    #[must_use]
    pub fn new(session: AdminSession) -> Self {
        Self {
            session,
            orders: Arc::new(RecordList::default()),
        }
    }

    /// The loaded collection.
    #[must_use]
    pub fn records(&self) -> &RecordList<Order> {
        &self.orders
    }

    /// Load every order.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails; the loaded list is kept.
    #[instrument(skip(self))]
    pub async fn load(&self) -> Result<Vec<Order>> {
        let orders: Vec<Order> = self.session.client().get("/admin/orders").await?;
        info!(count = orders.len(), "Loaded admin orders");
        self.orders.replace(orders.clone());
        Ok(orders)
    }

    /// Loaded orders matching `query`.
    #[must_use]
    pub fn list(&self, query: &ListQuery<OrderStatus>) -> Vec<Order> {
        self.orders.filter(query)
    }

    /// Change an order's status inline.
    ///
    /// The new status shows immediately and is rolled back if the server
    /// rejects it.
    ///
    /// # Errors
    ///
    /// Returns an error if the order is not loaded, already being edited,
    /// or the request fails.
    #[instrument(skip(self), fields(order_id = %id, status = %status))]
    pub async fn set_status(&self, id: &OrderId, status: OrderStatus) -> Result<Order> {
        patch_inline(
            &self.orders,
            self.session.client(),
            id.as_str(),
            &format!("/admin/orders/{}", path_segment(id.as_str())),
            &StatusBody { status },
            |order| order.status = status,
        )
        .await
    }
}
