use serde::{Deserialize, Serialize};

use crate::errors::{ensure_finite, Result};

const DOCUMENT_SCOPE: &str = "document";

/// A priced line on a quote, estimate, or invoice.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LineItem {
    pub description: String,
    pub quantity: f64,
    pub unit_price: f64,
}

impl LineItem {
    pub fn new(description: impl Into<String>, quantity: f64, unit_price: f64) -> Self {
        Self {
            description: description.into(),
            quantity,
            unit_price,
        }
    }

    pub fn total(&self) -> f64 {
        self.quantity * self.unit_price
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Default)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum Discount {
    #[default]
    None,
    /// Percentage of the subtotal.
    Percent(f64),
    /// Absolute amount off the subtotal.
    Amount(f64),
}

/// Subtotal, discount, and tax breakdown of a document.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Default)]
pub struct DocumentTotals {
    pub subtotal: f64,
    pub discount: f64,
    pub taxable: f64,
    pub tax: f64,
    pub total: f64,
}

impl DocumentTotals {
    /// Tax is charged on the discounted subtotal. The discount never exceeds
    /// the subtotal and is never negative.
    pub fn compute(items: &[LineItem], discount: &Discount, tax_percent: f64) -> Result<Self> {
        let mut subtotal = 0.0;
        for (index, item) in items.iter().enumerate() {
            let line = format!("line {}", index + 1);
            let quantity = ensure_finite(item.quantity, "quantity", &line)?;
            let unit_price = ensure_finite(item.unit_price, "unit_price", &line)?;
            subtotal += quantity * unit_price;
        }

        let requested = match discount {
            Discount::None => 0.0,
            Discount::Percent(percent) => {
                subtotal * ensure_finite(*percent, "discount_percent", DOCUMENT_SCOPE)? / 100.0
            }
            Discount::Amount(amount) => ensure_finite(*amount, "discount_amount", DOCUMENT_SCOPE)?,
        };
        let discount = requested.clamp(0.0, subtotal.max(0.0));
        let taxable = subtotal - discount;
        let tax = taxable * ensure_finite(tax_percent, "tax_percent", DOCUMENT_SCOPE)? / 100.0;

        Ok(Self {
            subtotal,
            discount,
            taxable,
            tax,
            total: taxable + tax,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::FieldOpsError;

    fn approx(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    fn quote() -> Vec<LineItem> {
        vec![
            LineItem::new("Condenser coil", 1.0, 850.0),
            LineItem::new("Labor (hours)", 3.5, 120.0),
            LineItem::new("Refrigerant (lb)", 4.0, 37.5),
        ]
    }

    #[test]
    fn percent_discount_applies_before_tax() {
        let totals = DocumentTotals::compute(&quote(), &Discount::Percent(10.0), 8.25).unwrap();
        assert!(approx(totals.subtotal, 1420.0));
        assert!(approx(totals.discount, 142.0));
        assert!(approx(totals.taxable, 1278.0));
        assert!(approx(totals.tax, 105.435));
        assert!(approx(totals.total, 1383.435));
    }

    #[test]
    fn amount_discount_is_clamped_to_subtotal() {
        let totals = DocumentTotals::compute(&quote(), &Discount::Amount(5000.0), 5.0).unwrap();
        assert!(approx(totals.discount, 1420.0));
        assert!(approx(totals.total, 0.0));

        let negative = DocumentTotals::compute(&quote(), &Discount::Amount(-50.0), 0.0).unwrap();
        assert!(approx(negative.discount, 0.0));
        assert!(approx(negative.total, 1420.0));
    }

    #[test]
    fn empty_document_totals_zero() {
        let totals = DocumentTotals::compute(&[], &Discount::Percent(15.0), 7.0).unwrap();
        assert_eq!(totals, DocumentTotals::default());
    }

    #[test]
    fn non_finite_line_is_rejected() {
        let mut items = quote();
        items[1].quantity = f64::NAN;
        let err = DocumentTotals::compute(&items, &Discount::None, 0.0).unwrap_err();
        assert!(
            matches!(err, FieldOpsError::InvalidNumericInput { ref record_id, .. } if record_id == "line 2")
        );
        assert!(DocumentTotals::compute(&quote(), &Discount::None, f64::NAN).is_err());
    }

    #[test]
    fn discount_serializes_with_kind_and_value() {
        let json = serde_json::to_string(&Discount::Percent(12.5)).unwrap();
        assert_eq!(json, r#"{"kind":"percent","value":12.5}"#);
    }
}
