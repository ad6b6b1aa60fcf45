//! Checkout summary derivation.
//!
//! Shipping is free at or above [`FREE_SHIPPING_THRESHOLD`], otherwise a
//! flat [`FLAT_SHIPPING_FEE`]. Tax is [`TAX_RATE`] of the subtotal, rounded
//! to cents. Nothing here is persisted; callers recompute from the live
//! subtotal whenever they render.

use rust_decimal::Decimal;
use serde::Serialize;

use crate::types::Money;

/// Subtotal at which shipping becomes free (inclusive).
pub const FREE_SHIPPING_THRESHOLD: Money = Money::new(Decimal::from_parts(100, 0, 0, false, 0));

/// Shipping fee below the threshold.
pub const FLAT_SHIPPING_FEE: Money = Money::new(Decimal::from_parts(10, 0, 0, false, 0));

/// Tax rate applied to the subtotal (10%).
pub const TAX_RATE: Decimal = Decimal::from_parts(10, 0, 0, false, 2);

/// Shipping, tax, and total for a subtotal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderSummary {
    pub subtotal: Money,
    pub shipping: Money,
    pub tax: Money,
    pub total: Money,
}

impl OrderSummary {
    /// Derive the summary for a subtotal.
    #[must_use]
    pub fn from_subtotal(subtotal: Money) -> Self {
        let shipping = shipping_fee(subtotal);
        let tax = tax_for(subtotal);
        Self {
            subtotal,
            shipping,
            tax,
            total: subtotal + shipping + tax,
        }
    }

    /// Whether this order qualifies for free shipping.
    #[must_use]
    pub fn has_free_shipping(&self) -> bool {
        self.shipping.is_zero()
    }
}

/// Shipping fee for a subtotal.
#[must_use]
pub fn shipping_fee(subtotal: Money) -> Money {
    if subtotal >= FREE_SHIPPING_THRESHOLD {
        Money::ZERO
    } else {
        FLAT_SHIPPING_FEE
    }
}

/// Tax for a subtotal, rounded to cents.
#[must_use]
pub fn tax_for(subtotal: Money) -> Money {
    (subtotal * TAX_RATE).round_cents()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_constants() {
        assert_eq!(FREE_SHIPPING_THRESHOLD, Money::from_units(100));
        assert_eq!(FLAT_SHIPPING_FEE, Money::from_units(10));
        assert_eq!(TAX_RATE, Decimal::new(10, 2));
    }

    #[test]
    fn test_two_item_scenario() {
        let summary = OrderSummary::from_subtotal(Money::from_cents(5500));
        assert_eq!(summary.shipping, Money::from_cents(1000));
        assert_eq!(summary.tax, Money::from_cents(550));
        assert_eq!(summary.total, Money::from_cents(7050));
    }

    #[test]
    fn test_free_shipping_boundary_is_inclusive() {
        assert_eq!(shipping_fee(Money::from_cents(10000)), Money::ZERO);
        assert_eq!(shipping_fee(Money::from_cents(9999)), FLAT_SHIPPING_FEE);
        assert_eq!(shipping_fee(Money::from_cents(10001)), Money::ZERO);
    }

    #[test]
    fn test_tax_rounds_half_away_from_zero() {
        // 10% of 0.05 is 0.005
        assert_eq!(tax_for(Money::from_cents(5)), Money::from_cents(1));
        // 10% of 0.04 is 0.004
        assert_eq!(tax_for(Money::from_cents(4)), Money::ZERO);
    }

    #[test]
    fn test_empty_subtotal_still_charges_shipping() {
        let summary = OrderSummary::from_subtotal(Money::ZERO);
        assert!(!summary.has_free_shipping());
        assert_eq!(summary.total, FLAT_SHIPPING_FEE);
    }

    #[test]
    fn test_summary_is_deterministic() {
        let subtotal = Money::from_cents(12_345);
        assert_eq!(
            OrderSummary::from_subtotal(subtotal),
            OrderSummary::from_subtotal(subtotal)
        );
    }
}
