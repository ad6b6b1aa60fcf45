//! Cart snapshot and reducer.
//!
//! Every mutation goes through [`CartState::reduce`], which recomputes the
//! totals from the resulting item list. Totals are never patched
//! incrementally.

use shopfront_core::{CartItem, CartItemId, CartTotals, Money, OrderSummary};

/// Line items plus derived totals.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct CartState {
    pub items: Vec<CartItem>,
    pub totals: CartTotals,
    /// Last failure, for display. Cleared by the next success.
    pub error: Option<String>,
}

/// Confirmed server results to fold into the cart.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CartEvent {
    /// Full replace from `GET /cart`.
    Loaded(Vec<CartItem>),
    /// Item returned by `POST /cart`; replaces the line with the same id or
    /// is appended.
    Upserted(CartItem),
    /// Item returned by `PUT /cart/:id`; replaces the line in place.
    Updated(CartItem),
    /// Line deleted.
    Removed(CartItemId),
    /// Cart emptied.
    Cleared,
    /// A call failed; items stay as they were.
    Failed(String),
}

impl CartState {
    /// Apply an event, producing the next snapshot.
    #[must_use]
    pub fn reduce(self, event: CartEvent) -> Self {
        let items = match event {
            CartEvent::Failed(message) => {
                return Self {
                    error: Some(message),
                    ..self
                };
            }
            CartEvent::Loaded(items) => items,
            CartEvent::Upserted(item) => {
                let mut items = self.items;
                match items.iter_mut().find(|existing| existing.id == item.id) {
                    Some(existing) => *existing = item,
                    None => items.push(item),
                }
                items
            }
            CartEvent::Updated(item) => {
                let mut items = self.items;
                if let Some(existing) = items.iter_mut().find(|existing| existing.id == item.id) {
                    *existing = item;
                }
                items
            }
            CartEvent::Removed(id) => {
                let mut items = self.items;
                items.retain(|item| item.id != id);
                items
            }
            CartEvent::Cleared => Vec::new(),
        };

        Self {
            totals: CartTotals::compute(&items),
            items,
            error: None,
        }
    }

    /// Number of distinct lines.
    #[must_use]
    pub const fn item_count(&self) -> usize {
        self.totals.item_count
    }

    /// Exact subtotal.
    #[must_use]
    pub const fn subtotal(&self) -> Money {
        self.totals.subtotal
    }

    /// Checkout summary for the live subtotal.
    #[must_use]
    pub fn summary(&self) -> OrderSummary {
        OrderSummary::from_subtotal(self.totals.subtotal)
    }

    /// Whether the cart has no lines.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Look up a line.
    #[must_use]
    pub fn item(&self, id: &CartItemId) -> Option<&CartItem> {
        self.items.iter().find(|item| &item.id == id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use shopfront_core::{ProductId, ProductSummary};

    fn item(id: &str, cents: i64, quantity: u32) -> CartItem {
        CartItem {
            id: CartItemId::new(id),
            product_id: ProductId::new(format!("p_{id}")),
            quantity,
            color: None,
            size: None,
            note: None,
            product: ProductSummary {
                id: ProductId::new(format!("p_{id}")),
                name: id.to_string(),
                slug: id.to_string(),
                price: Money::from_cents(cents),
                stock: Some(10),
                images: vec![],
            },
        }
    }

    fn assert_totals_consistent(state: &CartState) {
        let expected: Money = state.items.iter().map(CartItem::line_total).sum();
        assert_eq!(state.subtotal(), expected);
        assert_eq!(state.item_count(), state.items.len());
    }

    #[test]
    fn test_every_step_keeps_totals_consistent() {
        let steps = vec![
            CartEvent::Loaded(vec![item("a", 2000, 2)]),
            CartEvent::Upserted(item("b", 1500, 1)),
            CartEvent::Upserted(item("a", 2000, 3)),
            CartEvent::Updated(item("b", 1500, 4)),
            CartEvent::Failed("timeout".into()),
            CartEvent::Removed(CartItemId::new("a")),
            CartEvent::Upserted(item("c", 333, 3)),
            CartEvent::Cleared,
        ];

        let mut state = CartState::default();
        for event in steps {
            state = state.reduce(event);
            assert_totals_consistent(&state);
        }
        assert!(state.is_empty());
    }

    #[test]
    fn test_two_item_summary() {
        let state = CartState::default().reduce(CartEvent::Loaded(vec![
            item("a", 2000, 2),
            item("b", 1500, 1),
        ]));
        let summary = state.summary();
        assert_eq!(summary.subtotal, Money::from_cents(5500));
        assert_eq!(summary.shipping, Money::from_cents(1000));
        assert_eq!(summary.tax, Money::from_cents(550));
        assert_eq!(summary.total, Money::from_cents(7050));
    }

    #[test]
    fn test_upsert_replaces_existing_line() {
        let state = CartState::default()
            .reduce(CartEvent::Loaded(vec![item("a", 1000, 1)]))
            .reduce(CartEvent::Upserted(item("a", 1000, 5)));
        assert_eq!(state.items.len(), 1);
        assert_eq!(state.items[0].quantity, 5);
        assert_eq!(state.subtotal(), Money::from_cents(5000));
    }

    #[test]
    fn test_update_of_unknown_line_is_ignored() {
        let state = CartState::default()
            .reduce(CartEvent::Loaded(vec![item("a", 1000, 1)]))
            .reduce(CartEvent::Updated(item("zzz", 1000, 5)));
        assert_eq!(state.items.len(), 1);
        assert_eq!(state.subtotal(), Money::from_cents(1000));
    }

    #[test]
    fn test_failure_keeps_items_and_records_error() {
        let loaded = CartState::default().reduce(CartEvent::Loaded(vec![item("a", 1000, 2)]));
        let failed = loaded.clone().reduce(CartEvent::Failed("offline".into()));
        assert_eq!(failed.items, loaded.items);
        assert_eq!(failed.totals, loaded.totals);
        assert_eq!(failed.error.as_deref(), Some("offline"));

        let recovered = failed.reduce(CartEvent::Loaded(vec![]));
        assert_eq!(recovered.error, None);
    }

    #[test]
    fn test_clear_is_idempotent() {
        let once = CartState::default()
            .reduce(CartEvent::Loaded(vec![item("a", 1000, 2)]))
            .reduce(CartEvent::Cleared);
        let twice = once.clone().reduce(CartEvent::Cleared);
        assert_eq!(once, twice);
        assert_eq!(twice, CartState::default());
    }
}
