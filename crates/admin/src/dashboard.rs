//! Store-wide statistics.

use serde::{Deserialize, Serialize};
use tracing::instrument;

use shopfront_core::{Money, Order};

use crate::error::Result;
use crate::session::AdminSession;

/// Totals shown on the admin landing page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardStats {
    #[serde(default)]
    pub total_orders: u64,
    #[serde(default)]
    pub total_revenue: Money,
    #[serde(default)]
    pub total_users: u64,
    #[serde(default)]
    pub total_products: u64,
    #[serde(default)]
    pub recent_orders: Vec<Order>,
}

/// Fetch dashboard statistics.
///
/// # Errors
///
/// Returns an error if the request fails.
#[instrument(skip(session))]
pub async fn dashboard(session: &AdminSession) -> Result<DashboardStats> {
    Ok(session.client().get("/admin/dashboard").await?)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::testing::{order_json, session};
    use shopfront_storefront::testing::{MockTransport, envelope};

    #[tokio::test]
    async fn test_dashboard() {
        let (session, _) = session(MockTransport::new(|_| {
            Ok(envelope(
                200,
                serde_json::json!({
                    "totalOrders": 12,
                    "totalRevenue": "1234.50",
                    "totalUsers": 40,
                    "totalProducts": 8,
                    "recentOrders": [order_json("o1", "ORD-1", "a@shop.com", "PENDING")]
                }),
            ))
        }));

        let stats = dashboard(&session).await.unwrap();
        assert_eq!(stats.total_orders, 12);
        assert_eq!(stats.total_revenue, Money::from_cents(123_450));
        assert_eq!(stats.recent_orders.len(), 1);
    }
}
