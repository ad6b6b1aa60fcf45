//! Cart line items.

use serde::{Deserialize, Serialize};

use crate::models::catalog::ProductSummary;
use crate::types::{CartItemId, Money, ProductId};

/// One cart line: a product with a quantity and optional variant options.
///
/// Invariant: `1 <= quantity <= product.stock`. The server does not enforce
/// this atomically; the cart store checks it before sending updates.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartItem {
    pub id: CartItemId,
    pub product_id: ProductId,
    pub quantity: u32,
    #[serde(default)]
    pub color: Option<String>,
    #[serde(default)]
    pub size: Option<String>,
    #[serde(default)]
    pub note: Option<String>,
    pub product: ProductSummary,
}

impl CartItem {
    /// Unit price of the line.
    #[must_use]
    pub const fn unit_price(&self) -> Money {
        self.product.price
    }

    /// `price * quantity`, exact.
    #[must_use]
    pub fn line_total(&self) -> Money {
        self.product.price.times(self.quantity)
    }

    /// Known stock ceiling for this line, if the server sent one.
    #[must_use]
    pub const fn stock(&self) -> Option<u32> {
        self.product.stock
    }
}

/// Body of `POST /cart`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewCartItem {
    pub product_id: ProductId,
    pub quantity: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub size: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
}

impl NewCartItem {
    /// A plain line with no variant options.
    #[must_use]
    pub fn new(product_id: ProductId, quantity: u32) -> Self {
        Self {
            product_id,
            quantity,
            color: None,
            size: None,
            note: None,
        }
    }

    /// Set the color option.
    #[must_use]
    pub fn with_color(mut self, color: impl Into<String>) -> Self {
        self.color = Some(color.into());
        self
    }

    /// Set the size option.
    #[must_use]
    pub fn with_size(mut self, size: impl Into<String>) -> Self {
        self.size = Some(size.into());
        self
    }

    /// Attach a free-form note.
    #[must_use]
    pub fn with_note(mut self, note: impl Into<String>) -> Self {
        self.note = Some(note.into());
        self
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_deserialize_cart_item() {
        let json = r#"{
            "id": "ci_1",
            "productId": "p_1",
            "quantity": 2,
            "color": "red",
            "product": {"id": "p_1", "name": "Mug", "slug": "mug", "price": 20, "stock": 5}
        }"#;
        let item: CartItem = serde_json::from_str(json).unwrap();
        assert_eq!(item.quantity, 2);
        assert_eq!(item.color.as_deref(), Some("red"));
        assert_eq!(item.size, None);
        assert_eq!(item.stock(), Some(5));
        assert_eq!(item.line_total(), Money::from_units(40));
    }

    #[test]
    fn test_new_cart_item_omits_unset_options() {
        let body = NewCartItem::new(ProductId::new("p_1"), 1).with_size("M");
        let json = serde_json::to_value(&body).unwrap();
        assert_eq!(
            json,
            serde_json::json!({"productId": "p_1", "quantity": 1, "size": "M"})
        );
    }
}
