//! Line item model for invoice-service.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// One billable row on an invoice.
///
/// `total` is always `quantity * price - discount`; it is stored alongside
/// the inputs so the persisted JSON matches what was rendered, but it is
/// recomputed from the inputs whenever totals are derived.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LineItem {
    pub title: String,
    pub quantity: Decimal,
    pub unit: String,
    pub price: Decimal,
    #[serde(default)]
    pub discount: Decimal,
    pub total: Decimal,
}

impl LineItem {
    /// Returns `None` when `quantity * price - discount` overflows
    /// `Decimal`, so oversized submissions can be rejected instead of
    /// panicking.
    pub fn new(
        title: String,
        quantity: Decimal,
        unit: String,
        price: Decimal,
        discount: Decimal,
    ) -> Option<Self> {
        let total = quantity.checked_mul(price)?.checked_sub(discount)?;
        Some(Self {
            title,
            quantity,
            unit,
            price,
            discount,
            total,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal::Decimal;

    #[test]
    fn test_line_total_is_quantity_times_price_minus_discount() {
        let item = LineItem::new(
            "کابل شبکه".to_string(),
            Decimal::from(2),
            "عدد".to_string(),
            Decimal::from(1000),
            Decimal::from(100),
        )
        .unwrap();
        assert_eq!(item.total, Decimal::from(1900));
    }

    #[test]
    fn test_line_total_may_go_negative_when_discount_exceeds_line_value() {
        let item = LineItem::new(
            "اشتراک".to_string(),
            Decimal::from(1),
            "ماه".to_string(),
            Decimal::from(500),
            Decimal::from(800),
        )
        .unwrap();
        assert_eq!(item.total, Decimal::from(-300));
    }

    #[test]
    fn test_overflowing_line_total_is_refused() {
        let item = LineItem::new(
            "آیتم".to_string(),
            Decimal::MAX,
            "عدد".to_string(),
            Decimal::from(2),
            Decimal::ZERO,
        );
        assert!(item.is_none());
    }
}
