//! Totals arithmetic over invoice line items.
//!
//! All computation is exact `Decimal` arithmetic; display rounding happens
//! in the document template, never here.

use crate::models::LineItem;
use rust_decimal::Decimal;
use serde::Serialize;

/// Computed totals for one invoice.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct InvoiceTotals {
    pub subtotal: Decimal,
    pub discount_total: Decimal,
    pub tax_amount: Decimal,
    pub total: Decimal,
}

/// Compute totals from line items and a tax-rate percentage.
///
/// subtotal        = Σ quantity × price
/// discount total  = Σ discount
/// tax amount      = (subtotal − discount total) × rate ÷ 100
/// total           = subtotal − discount total + tax amount
///
/// Returns `None` when any intermediate value overflows `Decimal`;
/// callers turn that into a rejection rather than a panic.
pub fn compute_totals(items: &[LineItem], tax_rate: Decimal) -> Option<InvoiceTotals> {
    let mut subtotal = Decimal::ZERO;
    let mut discount_total = Decimal::ZERO;

    for item in items {
        subtotal = subtotal.checked_add(item.quantity.checked_mul(item.price)?)?;
        discount_total = discount_total.checked_add(item.discount)?;
    }

    let taxable = subtotal.checked_sub(discount_total)?;
    let tax_amount = taxable
        .checked_mul(tax_rate)?
        .checked_div(Decimal::from(100))?;
    let total = taxable.checked_add(tax_amount)?;

    Some(InvoiceTotals {
        subtotal,
        discount_total,
        tax_amount,
        total,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal::Decimal;
    use std::str::FromStr;

    fn item(quantity: u32, price: u32, discount: u32) -> LineItem {
        LineItem::new(
            "آیتم".to_string(),
            Decimal::from(quantity),
            "عدد".to_string(),
            Decimal::from(price),
            Decimal::from(discount),
        )
        .unwrap()
    }

    #[test]
    fn test_single_item_with_tax_matches_expected_exactly() {
        let totals = compute_totals(&[item(2, 1000, 100)], Decimal::from(10)).unwrap();
        assert_eq!(totals.subtotal, Decimal::from(2000));
        assert_eq!(totals.discount_total, Decimal::from(100));
        assert_eq!(totals.tax_amount, Decimal::from(190));
        assert_eq!(totals.total, Decimal::from(2090));
    }

    #[test]
    fn test_empty_items_produce_all_zeros() {
        let totals = compute_totals(&[], Decimal::from(5)).unwrap();
        assert_eq!(totals.subtotal, Decimal::ZERO);
        assert_eq!(totals.discount_total, Decimal::ZERO);
        assert_eq!(totals.tax_amount, Decimal::ZERO);
        assert_eq!(totals.total, Decimal::ZERO);
    }

    #[test]
    fn test_total_identity_holds_for_mixed_items() {
        let items = vec![item(3, 250, 50), item(1, 999, 0), item(10, 12, 20)];
        let rate = Decimal::from_str("9.5").unwrap();
        let totals = compute_totals(&items, rate).unwrap();

        assert_eq!(
            totals.total,
            totals.subtotal - totals.discount_total + totals.tax_amount
        );
        assert_eq!(
            totals.tax_amount,
            (totals.subtotal - totals.discount_total) * rate / Decimal::from(100)
        );
    }

    #[test]
    fn test_fractional_quantities_stay_exact() {
        let items = vec![LineItem::new(
            "کابل".to_string(),
            Decimal::from_str("2.5").unwrap(),
            "متر".to_string(),
            Decimal::from_str("10.10").unwrap(),
            Decimal::ZERO,
        )
        .unwrap()];
        let totals = compute_totals(&items, Decimal::ZERO).unwrap();
        assert_eq!(totals.subtotal, Decimal::from_str("25.25").unwrap());
        assert_eq!(totals.total, Decimal::from_str("25.25").unwrap());
    }

    #[test]
    fn test_discount_larger_than_subtotal_yields_negative_total() {
        let totals = compute_totals(&[item(1, 100, 500)], Decimal::from(10)).unwrap();
        assert_eq!(totals.total, Decimal::from(-440));
    }

    fn raw_item(quantity: Decimal, price: Decimal) -> LineItem {
        LineItem {
            title: "آیتم".to_string(),
            quantity,
            unit: "عدد".to_string(),
            price,
            discount: Decimal::ZERO,
            total: Decimal::ZERO,
        }
    }

    #[test]
    fn test_overflowing_line_value_returns_none() {
        let items = vec![raw_item(Decimal::MAX, Decimal::from(2))];
        assert!(compute_totals(&items, Decimal::from(10)).is_none());
    }

    #[test]
    fn test_overflowing_subtotal_sum_returns_none() {
        let items = vec![
            raw_item(Decimal::MAX, Decimal::ONE),
            raw_item(Decimal::MAX, Decimal::ONE),
        ];
        assert!(compute_totals(&items, Decimal::ZERO).is_none());
    }

    #[test]
    fn test_overflowing_tax_returns_none() {
        let items = vec![raw_item(Decimal::MAX, Decimal::ONE)];
        assert!(compute_totals(&items, Decimal::from(200)).is_none());
    }
}
