use serde::{Deserialize, Serialize};

use super::aggregate::SummaryPatch;
use crate::domain::common::Money;

/// Message the backend sends instead of a quantity when a decrease removed
/// the line. Part of the wire contract, independent of any UI text.
pub const REMOVED_MESSAGE: &str = "Ürün sepetten silindi!";

/// JSON body returned by add, update, remove and clear endpoints.
///
/// Every field except `success` may be absent; absence means "do not touch
/// that element". The summary fields keep the backend's wire names.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CartMutationResponse {
    #[serde(default)]
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cart_count: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub new_quantity: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub new_total: Option<Money>,
    #[serde(rename = "toplam_tutar", default, skip_serializing_if = "Option::is_none")]
    pub subtotal: Option<Money>,
    #[serde(rename = "kdv_tutari", default, skip_serializing_if = "Option::is_none")]
    pub tax: Option<Money>,
    #[serde(rename = "genel_toplam", default, skip_serializing_if = "Option::is_none")]
    pub grand_total: Option<Money>,
}

impl CartMutationResponse {
    pub fn summary_patch(&self) -> SummaryPatch {
        SummaryPatch {
            subtotal: self.subtotal,
            tax: self.tax,
            grand_total: self.grand_total,
        }
    }

    /// True when the line is gone: quantity reported as zero, or the backend
    /// answered with its "removed" message instead of a quantity.
    pub fn line_removed(&self) -> bool {
        self.new_quantity == Some(0) || self.message.as_deref() == Some(REMOVED_MESSAGE)
    }

    pub fn empties_cart(&self) -> bool {
        self.cart_count == Some(0)
    }
}

/// Body of the page-load cart validation call
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CartValidateResponse {
    #[serde(default)]
    pub changed: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_update_response() {
        let body = r#"{"success":true,"message":"Miktar güncellendi!","new_quantity":3,
            "new_total":29.97,"cart_count":3,"toplam_tutar":25.4,"kdv_tutari":4.57,"genel_toplam":29.97}"#;
        let response: CartMutationResponse = serde_json::from_str(body).unwrap();
        assert!(response.success);
        assert_eq!(response.new_quantity, Some(3));
        assert_eq!(response.new_total, Some(Money::from_minor(2997)));
        assert_eq!(response.subtotal, Some(Money::from_minor(2540)));
        assert_eq!(response.summary_patch().tax, Some(Money::from_minor(457)));
        assert!(!response.empties_cart());
    }

    #[test]
    fn test_missing_fields_are_none() {
        let response: CartMutationResponse =
            serde_json::from_str(r#"{"success":false,"message":"Stokta yok","extra":1}"#).unwrap();
        assert!(!response.success);
        assert_eq!(response.cart_count, None);
        assert!(response.summary_patch().is_empty());
    }

    #[test]
    fn test_line_removed_by_quantity_or_message() {
        let by_quantity = CartMutationResponse {
            success: true,
            new_quantity: Some(0),
            ..Default::default()
        };
        let by_message = CartMutationResponse {
            success: true,
            message: Some(REMOVED_MESSAGE.to_string()),
            ..Default::default()
        };
        let updated = CartMutationResponse {
            success: true,
            new_quantity: Some(1),
            ..Default::default()
        };
        let other_message = CartMutationResponse {
            success: true,
            message: Some("Item removed".to_string()),
            ..Default::default()
        };
        assert!(by_quantity.line_removed());
        assert!(by_message.line_removed());
        assert!(!updated.line_removed());
        assert!(!other_message.line_removed());
    }

    #[test]
    fn test_validate_response_defaults_to_unchanged() {
        let response: CartValidateResponse = serde_json::from_str("{}").unwrap();
        assert!(!response.changed);
    }
}
