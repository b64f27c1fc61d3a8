//! Class names and attributes the storefront templates render

use contracts::domain::a001_cart::{ProductId, SummaryPatch, CSRF_FORM_FIELD};
use contracts::enums::QuantityAction;

use super::super::lock::ControlId;
use crate::shared::number_format::format_price;

pub const BADGE: &str = ".cart-count";
pub const SUMMARY_SUBTOTAL: &str = ".cart-summary-subtotal";
pub const SUMMARY_TAX: &str = ".cart-summary-tax";
pub const SUMMARY_TOTAL: &str = ".cart-summary-total";
pub const CART_ITEMS: &str = ".cart-items";

pub const PRODUCT_ROW: &str = ".product-row";
/// Closest container of a line form that holds its price cells
pub const LINE_SCOPE: &str = ".product-row, .row";
pub const QUANTITY_INPUT: &str = ".quantity-input";
/// First match is the unit price, second the line total
pub const PRICE_CELLS: &str = ".price-column .fw-bold";

pub const ADD_BUTTON: &str = ".add-to-cart-form button";
pub const QUANTITY_BUTTON: &str = r#"button[name="increase"], button[name="decrease"]"#;
pub const REMOVE_BUTTON: &str = ".remove-cart-form button";
pub const CLEAR_BUTTON: &str = ".clear-cart-form button";

/// Forms whose native submit is replaced by the cart requests
pub const INTERCEPTED_FORMS: &str =
    ".quantity-control, .add-to-cart-form, .remove-cart-form, .clear-cart-form";

pub const PRODUCT_ID_ATTR: &str = "data-urun-id";
pub const PRODUCT_NAME_ATTR: &str = "data-urun-adi";
pub const PRODUCT_ID_INPUT: &str = r#"[name="productId"], [name="urun_id"]"#;

pub const EMPTY_CART_CLASS: &str = "alert alert-info";

/// Selector for whatever carries `data-urun-id="<id>"`
pub fn product_scope(product_id: &ProductId) -> String {
    let escaped = product_id.as_str().replace('\\', "\\\\").replace('"', "\\\"");
    format!(r#"[{}="{}"]"#, PRODUCT_ID_ATTR, escaped)
}

/// Hidden token input rendered into every cart form
pub fn form_token_input() -> String {
    format!(r#"[name="{}"]"#, CSRF_FORM_FIELD)
}

/// Button selector for a control, relative to its product row
pub fn control_button(control: &ControlId) -> &'static str {
    match control {
        ControlId::Quantity(_, QuantityAction::Increase) => r#"button[name="increase"]"#,
        ControlId::Quantity(_, QuantityAction::Decrease) => r#"button[name="decrease"]"#,
        ControlId::Remove(_) => REMOVE_BUTTON,
        ControlId::ClearCart => CLEAR_BUTTON,
    }
}

/// `display` value of the badge: hidden while the cart is empty
pub fn badge_display(count: u32) -> &'static str {
    if count > 0 {
        "inline-block"
    } else {
        "none"
    }
}

/// Text for each summary selector the patch touches. Every element matching
/// a selector receives the same text.
pub fn summary_texts(patch: &SummaryPatch, currency: &str) -> Vec<(&'static str, String)> {
    [
        (SUMMARY_SUBTOTAL, patch.subtotal),
        (SUMMARY_TAX, patch.tax),
        (SUMMARY_TOTAL, patch.grand_total),
    ]
    .into_iter()
    .filter_map(|(selector, value)| Some((selector, format_price(value?, currency))))
    .collect()
}

/// Whole-number text such as a badge or quantity field
pub fn parse_count(text: &str) -> Option<u32> {
    text.trim().parse().ok()
}
