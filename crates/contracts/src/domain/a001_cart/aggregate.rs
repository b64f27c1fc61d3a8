use serde::{Deserialize, Serialize};

use crate::domain::common::Money;

// ============================================================================
// ID Type
// ============================================================================

/// Opaque product identifier as rendered by the storefront
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProductId(String);

impl ProductId {
    /// Blank identifiers count as missing
    pub fn parse(raw: &str) -> Option<Self> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            None
        } else {
            Some(Self(trimmed.to_string()))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for ProductId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

// ============================================================================
// Cart line
// ============================================================================

/// One rendered cart row
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CartLineView {
    pub product_id: ProductId,
    pub product_name: Option<String>,
    pub quantity: u32,
    pub unit_price: Money,
    pub line_total: Money,
}

impl CartLineView {
    pub fn new(product_id: ProductId, quantity: u32, unit_price: Money) -> Self {
        Self {
            product_id,
            product_name: None,
            quantity,
            unit_price,
            line_total: unit_price.times(quantity),
        }
    }

    /// Overwrite quantity and total. The server total wins; without one the
    /// total is derived from the unit price.
    pub fn apply_quantity(&mut self, quantity: u32, server_total: Option<Money>) {
        self.quantity = quantity;
        self.line_total = server_total.unwrap_or_else(|| self.unit_price.times(quantity));
    }
}

// ============================================================================
// Summary
// ============================================================================

/// Aggregate cart totals. Only ever written from server values.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct CartSummary {
    pub subtotal: Money,
    pub tax: Money,
    pub grand_total: Money,
    pub item_count: u32,
}

impl CartSummary {
    pub fn apply(&mut self, patch: &SummaryPatch) {
        if let Some(subtotal) = patch.subtotal {
            self.subtotal = subtotal;
        }
        if let Some(tax) = patch.tax {
            self.tax = tax;
        }
        if let Some(grand_total) = patch.grand_total {
            self.grand_total = grand_total;
        }
    }
}

/// Summary fields carried by one response; `None` leaves the element alone
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct SummaryPatch {
    pub subtotal: Option<Money>,
    pub tax: Option<Money>,
    pub grand_total: Option<Money>,
}

impl SummaryPatch {
    pub fn is_empty(&self) -> bool {
        self.subtotal.is_none() && self.tax.is_none() && self.grand_total.is_none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_product_id_rejects_blank() {
        assert_eq!(ProductId::parse("  "), None);
        assert_eq!(ProductId::parse(" 42 ").map(|p| p.to_string()), Some("42".to_string()));
    }

    #[test]
    fn test_apply_quantity_prefers_server_total() {
        let id = ProductId::parse("7").unwrap();
        let mut line = CartLineView::new(id, 2, Money::from_minor(999));
        assert_eq!(line.line_total, Money::from_minor(1998));

        line.apply_quantity(3, Some(Money::from_minor(2990)));
        assert_eq!(line.quantity, 3);
        assert_eq!(line.line_total, Money::from_minor(2990));

        line.apply_quantity(4, None);
        assert_eq!(line.line_total, Money::from_minor(3996));
    }

    #[test]
    fn test_summary_patch_is_per_field() {
        let mut summary = CartSummary {
            subtotal: Money::from_minor(100),
            tax: Money::from_minor(18),
            grand_total: Money::from_minor(118),
            item_count: 1,
        };
        summary.apply(&SummaryPatch {
            grand_total: Some(Money::from_minor(2997)),
            ..Default::default()
        });
        assert_eq!(summary.subtotal, Money::from_minor(100));
        assert_eq!(summary.grand_total, Money::from_minor(2997));
        assert!(SummaryPatch::default().is_empty());
    }
}
