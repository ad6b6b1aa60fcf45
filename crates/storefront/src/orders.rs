//! Order history and checkout.

use std::sync::Arc;

use serde::Serialize;
use thiserror::Error;
use tokio::sync::watch;
use tracing::{info, instrument};

use shopfront_core::{Order, OrderId, OrderStatus, PaymentMethod, ShippingAddress};

use crate::cart::CartStore;
use crate::error::ApiError;
use crate::http::{ApiClient, path_segment};

/// Errors from order operations.
#[derive(Debug, Error)]
pub enum OrderError {
    /// Checkout with nothing in the cart.
    #[error("your cart is empty")]
    EmptyCart,

    /// The order's known status no longer allows cancellation.
    #[error("order {id} cannot be cancelled while {status}")]
    NotCancellable { id: OrderId, status: OrderStatus },

    /// Remote call failed.
    #[error(transparent)]
    Api(#[from] ApiError),
}

impl OrderError {
    /// Text for a blocking notification.
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            Self::Api(err) => err.user_message(),
            other => other.to_string(),
        }
    }
}

/// Checkout input. The server builds the order from the caller's cart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Checkout {
    pub shipping_address: ShippingAddress,
    pub payment_method: PaymentMethod,
}

/// The caller's orders.
#[derive(Clone)]
pub struct OrdersService {
    inner: Arc<OrdersInner>,
}

struct OrdersInner {
    client: ApiClient,
    cart: CartStore,
    orders: watch::Sender<Vec<Order>>,
}

impl OrdersService {
    /// Create the service. `cart` is consulted and reset by checkout.
    #[must_use]
    pub fn new(client: ApiClient, cart: CartStore) -> Self {
        let (orders, _) = watch::channel(Vec::new());
        Self {
            inner: Arc::new(OrdersInner {
                client,
                cart,
                orders,
            }),
        }
    }

    /// Orders seen so far, newest first as the server sent them.
    #[must_use]
    pub fn orders(&self) -> Vec<Order> {
        self.inner.orders.borrow().clone()
    }

    /// Subscribe to the order list.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<Vec<Order>> {
        self.inner.orders.subscribe()
    }

    fn remember(&self, order: &Order) {
        self.inner.orders.send_modify(|orders| {
            match orders.iter_mut().find(|o| o.id == order.id) {
                Some(existing) => *existing = order.clone(),
                None => orders.insert(0, order.clone()),
            }
        });
    }

    /// Load the caller's orders.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    #[instrument(skip(self))]
    pub async fn list(&self) -> Result<Vec<Order>, OrderError> {
        let orders: Vec<Order> = self.inner.client.get("/orders").await?;
        self.inner.orders.send_replace(orders.clone());
        Ok(orders)
    }

    /// Load one order.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    #[instrument(skip(self), fields(order_id = %id))]
    pub async fn get(&self, id: &OrderId) -> Result<Order, OrderError> {
        let path = format!("/orders/{}", path_segment(id.as_str()));
        let order: Order = self.inner.client.get(&path).await?;
        self.remember(&order);
        Ok(order)
    }

    /// Place an order from the current cart.
    ///
    /// The local cart is reset once the server confirms; it emptied its copy
    /// as part of placement.
    ///
    /// # Errors
    ///
    /// Returns [`OrderError::EmptyCart`] without a network call if the cart
    /// is empty, or an error if the request fails.
    #[instrument(skip(self, checkout), fields(payment_method = ?checkout.payment_method))]
    pub async fn place(&self, checkout: &Checkout) -> Result<Order, OrderError> {
        if self.inner.cart.state().is_empty() {
            return Err(OrderError::EmptyCart);
        }

        let order: Order = self.inner.client.post("/orders", checkout).await?;
        info!(order_number = %order.order_number, total = %order.total, "Order placed");

        self.inner.cart.reset();
        self.remember(&order);
        Ok(order)
    }

    /// Request cancellation.
    ///
    /// # Errors
    ///
    /// Returns [`OrderError::NotCancellable`] without a network call if the
    /// order is known to be past cancellation, or an error if the request
    /// fails.
    #[instrument(skip(self), fields(order_id = %id))]
    pub async fn cancel(&self, id: &OrderId) -> Result<Order, OrderError> {
        let known = self
            .inner
            .orders
            .borrow()
            .iter()
            .find(|o| &o.id == id)
            .map(|o| o.status);
        if let Some(status) = known
            && !status.is_cancellable()
        {
            return Err(OrderError::NotCancellable {
                id: id.clone(),
                status,
            });
        }

        let path = format!("/orders/{}/cancel", path_segment(id.as_str()));
        let order: Order = self
            .inner
            .client
            .post(&path, &serde_json::json!({}))
            .await?;
        self.remember(&order);
        Ok(order)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::http::Method;
    use crate::storage::MemoryStorage;
    use crate::testing::{MockTransport, envelope};

    fn order_json(id: &str, status: &str) -> serde_json::Value {
        serde_json::json!({
            "id": id,
            "orderNumber": format!("ORD-{id}"),
            "userId": "u1",
            "items": [{"productId": "p1", "name": "Tee", "price": "20.00", "quantity": 2}],
            "subtotal": "40.00",
            "shippingFee": "10.00",
            "tax": "4.00",
            "total": "54.00",
            "status": status
        })
    }

    fn cart_json() -> serde_json::Value {
        serde_json::json!({"items": [{
            "id": "c1",
            "productId": "p1",
            "quantity": 2,
            "product": {"id": "p1", "name": "Tee", "slug": "tee", "price": "20.00"}
        }]})
    }

    fn service(transport: MockTransport) -> (OrdersService, CartStore, Arc<MockTransport>) {
        let transport = Arc::new(transport);
        let client = ApiClient::new(transport.clone(), Arc::new(MemoryStorage::new()));
        let cart = CartStore::new(client.clone());
        (OrdersService::new(client, cart.clone()), cart, transport)
    }

    fn checkout() -> Checkout {
        Checkout {
            shipping_address: ShippingAddress {
                full_name: "Jane Doe".to_string(),
                phone: "010-0000-0000".to_string(),
                address: "1 Main St".to_string(),
                city: "Seoul".to_string(),
                postal_code: None,
                country: "KR".to_string(),
            },
            payment_method: PaymentMethod::Card,
        }
    }

    #[tokio::test]
    async fn test_place_refuses_empty_cart() {
        let (orders, _, transport) = service(MockTransport::new(|_| {
            Ok(envelope(201, order_json("o1", "PENDING")))
        }));
        assert!(matches!(
            orders.place(&checkout()).await.unwrap_err(),
            OrderError::EmptyCart
        ));
        assert!(transport.requests().is_empty());
    }

    #[tokio::test]
    async fn test_place_resets_cart() {
        let (orders, cart, transport) = service(MockTransport::new(|req| {
            Ok(match (req.method, req.path.as_str()) {
                (Method::Get, "/cart") => envelope(200, cart_json()),
                _ => envelope(201, order_json("o1", "PENDING")),
            })
        }));
        cart.fetch().await.unwrap();

        let order = orders.place(&checkout()).await.unwrap();
        assert_eq!(order.order_number, "ORD-o1");
        assert!(cart.state().is_empty());
        assert_eq!(orders.orders().len(), 1);

        let body = transport.last_request().unwrap().body.unwrap();
        assert_eq!(body["paymentMethod"], "CARD");
        assert_eq!(body["shippingAddress"]["fullName"], "Jane Doe");
    }

    #[tokio::test]
    async fn test_cancel_refused_for_shipped_order() {
        let (orders, _, transport) = service(MockTransport::new(|_| {
            Ok(envelope(200, serde_json::json!([order_json("o1", "SHIPPED")])))
        }));
        orders.list().await.unwrap();

        let err = orders.cancel(&OrderId::new("o1")).await.unwrap_err();
        assert!(matches!(
            err,
            OrderError::NotCancellable {
                status: OrderStatus::Shipped,
                ..
            }
        ));
        assert_eq!(transport.requests().len(), 1);
    }

    #[tokio::test]
    async fn test_cancel_updates_known_order() {
        let (orders, _, transport) = service(MockTransport::new(|req| {
            Ok(match req.method {
                Method::Get => envelope(200, serde_json::json!([order_json("o1", "PENDING")])),
                _ => envelope(200, order_json("o1", "CANCELLED")),
            })
        }));
        orders.list().await.unwrap();

        let order = orders.cancel(&OrderId::new("o1")).await.unwrap();
        assert_eq!(order.status, OrderStatus::Cancelled);
        assert_eq!(orders.orders()[0].status, OrderStatus::Cancelled);
        assert_eq!(transport.last_request().unwrap().path, "/orders/o1/cancel");
    }
}
