//! Wishlist entries.

use serde::{Deserialize, Serialize};

use crate::models::catalog::ProductSummary;
use crate::types::{ProductId, WishlistItemId};

/// A (user, product) pair. Existence only, no quantity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WishlistItem {
    pub id: WishlistItemId,
    pub product_id: ProductId,
    #[serde(default)]
    pub product: Option<ProductSummary>,
}
