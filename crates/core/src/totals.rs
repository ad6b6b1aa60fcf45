//! Cart item count and subtotal.
//!
//! [`CartTotals::compute`] is a pure fold over the current items. The cart
//! store calls it after every mutation, so the totals can never drift from
//! the item list.

use serde::Serialize;

use crate::models::CartItem;
use crate::types::Money;

/// Derived cart totals.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CartTotals {
    /// Number of distinct line items.
    pub item_count: usize,
    /// Sum of quantities across lines (badge count).
    pub total_quantity: u32,
    /// Sum of `price * quantity`, exact and unrounded.
    pub subtotal: Money,
}

impl CartTotals {
    /// Fold the totals out of a list of cart items.
    #[must_use]
    pub fn compute(items: &[CartItem]) -> Self {
        items.iter().fold(Self::default(), |acc, item| Self {
            item_count: acc.item_count + 1,
            total_quantity: acc.total_quantity.saturating_add(item.quantity),
            subtotal: acc.subtotal + item.line_total(),
        })
    }
}
