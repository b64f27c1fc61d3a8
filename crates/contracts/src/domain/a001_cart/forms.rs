use serde::Serialize;

use super::aggregate::ProductId;
use crate::enums::QuantityAction;

/// Hidden form field carrying the anti-forgery token
pub const CSRF_FORM_FIELD: &str = "csrfmiddlewaretoken";

/// Form body of the add-to-cart request
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AddToCartForm {
    #[serde(rename = "productId")]
    pub product_id: ProductId,
}

/// Form body of the quantity update request
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AdjustQuantityForm {
    pub action: QuantityAction,
    #[serde(rename = "csrfmiddlewaretoken", skip_serializing_if = "Option::is_none")]
    pub csrf_token: Option<String>,
}
