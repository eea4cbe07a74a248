//! Order totals in minor units, plus the flat-shipping surcharge rule.

use serde::Serialize;

use crate::error::{AppError, Result};
use crate::money::CartLine;

/// Store-level pricing knobs, loaded from the environment.
#[derive(Debug, Clone)]
pub struct PricingRule {
    /// Orders with at least this many items ship free.
    pub free_shipping_min_qty: i64,
    /// Flat shipping fee (cents) charged below the free-shipping threshold.
    pub shipping_fee_cents: i64,
    /// Gateway-imposed minimum transaction amount (cents).
    pub min_transaction_cents: i64,
}

impl Default for PricingRule {
    fn default() -> Self {
        Self {
            free_shipping_min_qty: 3,
            shipping_fee_cents: 1500,
            min_transaction_cents: 500,
        }
    }
}

/// A priced order, computed per checkout request and never persisted.
#[derive(Debug, Clone, Serialize)]
pub struct Order {
    pub order_id: String,
    pub items: Vec<CartLine>,
    pub subtotal_cents: i64,
    pub surcharge_cents: i64,
    pub total_cents: i64,
    pub total_quantity: i64,
}

impl Order {
    /// Prices a normalized cart. Fails when the grand total would land
    /// under the gateway minimum, before any remote call is made.
    /// Amounts that overflow i64 cents are rejected rather than wrapped.
    pub fn price(items: Vec<CartLine>, rule: &PricingRule) -> Result<Self> {
        let subtotal_cents = items
            .iter()
            .try_fold(0i64, |acc, l| {
                l.unit_price_cents
                    .checked_mul(l.quantity)
                    .and_then(|line| acc.checked_add(line))
            })
            .ok_or_else(|| AppError::Validation("cart total out of range".to_string()))?;
        let total_quantity: i64 = items.iter().map(|l| l.quantity).sum();

        let surcharge_cents = if total_quantity < rule.free_shipping_min_qty {
            rule.shipping_fee_cents
        } else {
            0
        };
        let total_cents = subtotal_cents
            .checked_add(surcharge_cents)
            .ok_or_else(|| AppError::Validation("cart total out of range".to_string()))?;

        if total_cents < rule.min_transaction_cents {
            return Err(AppError::BelowMinimum {
                amount: total_cents,
                minimum: rule.min_transaction_cents,
            });
        }

        // Time-based uniqueness is all the id needs; orders are ephemeral.
        let order_id = format!("ord_{}", chrono::Utc::now().timestamp_millis());

        Ok(Self {
            order_id,
            items,
            subtotal_cents,
            surcharge_cents,
            total_cents,
            total_quantity,
        })
    }

    /// Human-readable title attached to the gateway offer.
    pub fn title(&self) -> String {
        format!("Pedido {} - {} itens", self.order_id, self.total_quantity)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn line(price: i64, qty: i64) -> CartLine {
        CartLine {
            id: "p1".into(),
            name: "Produto".into(),
            unit_price_cents: price,
            quantity: qty,
        }
    }

    #[test]
    fn total_is_subtotal_plus_surcharge() {
        let rule = PricingRule::default();
        let order = Order::price(vec![line(1500, 2)], &rule).unwrap();
        assert_eq!(order.subtotal_cents, 3000);
        assert_eq!(order.surcharge_cents, 1500);
        assert_eq!(order.total_cents, 4500);
        assert_eq!(
            order.total_cents,
            order.subtotal_cents + order.surcharge_cents
        );
    }

    #[test]
    fn threshold_waives_surcharge() {
        let rule = PricingRule::default();
        let order = Order::price(vec![line(1000, 3)], &rule).unwrap();
        assert_eq!(order.surcharge_cents, 0);
        assert_eq!(order.total_cents, 3000);

        // Quantity spread across lines counts the same way.
        let order = Order::price(vec![line(1000, 2), line(1000, 1)], &rule).unwrap();
        assert_eq!(order.surcharge_cents, 0);
    }

    #[test]
    fn below_minimum_is_rejected() {
        let rule = PricingRule {
            free_shipping_min_qty: 3,
            shipping_fee_cents: 0,
            min_transaction_cents: 500,
        };
        let err = Order::price(vec![line(499, 1)], &rule).unwrap_err();
        match err {
            AppError::BelowMinimum { amount, minimum } => {
                assert_eq!(amount, 499);
                assert_eq!(minimum, 500);
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn overflowing_amounts_are_rejected() {
        let rule = PricingRule::default();
        let err = Order::price(vec![line(i64::MAX, 2)], &rule).unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));

        // Overflow on the running sum rather than a single line.
        let err = Order::price(vec![line(i64::MAX, 1), line(i64::MAX, 1)], &rule).unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
    }

    #[test]
    fn surcharge_can_lift_total_over_minimum() {
        let rule = PricingRule::default();
        // 400 alone is under the 500 minimum, but the shipping fee applies.
        let order = Order::price(vec![line(400, 1)], &rule).unwrap();
        assert_eq!(order.total_cents, 1900);
    }
}
