//! `CartView` over the server-rendered cart page
//!
//! Rows are indexed by product id at boot; line forms outside those rows are
//! bound to their nearest container when first used. Every write looks its target
//! up again (or checks the row is still attached) and silently does nothing
//! when the node is gone.

use contracts::domain::a001_cart::{CartLineView, CartSummary, ProductId, SummaryPatch};
use contracts::domain::common::Money;
use std::cell::RefCell;
use std::collections::HashMap;
use wasm_bindgen::JsCast;
use web_sys::{Document, Element, HtmlButtonElement, HtmlElement, HtmlInputElement, NodeList};

use super::markup;
use crate::domain::a001_cart::lock::ControlId;
use crate::domain::a001_cart::ports::CartView;
use crate::domain::a001_cart::state::CartState;
use crate::shared::config::CartConfig;
use crate::shared::number_format::format_price;

pub struct DomCartView {
    document: Document,
    rows: RefCell<HashMap<ProductId, Element>>,
    currency: String,
    empty_message: String,
}

fn elements(list: NodeList) -> Vec<Element> {
    (0..list.length())
        .filter_map(|i| list.item(i))
        .filter_map(|node| node.dyn_into::<Element>().ok())
        .collect()
}

fn query_all(document: &Document, selector: &str) -> Vec<Element> {
    document
        .query_selector_all(selector)
        .map(elements)
        .unwrap_or_default()
}

fn query_in(root: &Element, selector: &str) -> Vec<Element> {
    root.query_selector_all(selector)
        .map(elements)
        .unwrap_or_default()
}

fn first_in(root: &Element, selector: &str) -> Option<Element> {
    root.query_selector(selector).ok().flatten()
}

fn set_style(element: &Element, property: &str, value: &str) {
    if let Some(html) = element.dyn_ref::<HtmlElement>() {
        if let Err(err) = html.style().set_property(property, value) {
            log::warn!("Could not set {} on cart element: {:?}", property, err);
        }
    }
}

fn text_money(element: Option<&Element>) -> Option<Money> {
    element
        .and_then(|e| e.text_content())
        .and_then(|text| Money::parse(&text))
}

/// Product id of a row: on the row itself or on a form inside it
pub fn row_product_id(row: &Element) -> Option<ProductId> {
    let raw = row.get_attribute(markup::PRODUCT_ID_ATTR).or_else(|| {
        first_in(row, &format!("[{}]", markup::PRODUCT_ID_ATTR))
            .and_then(|e| e.get_attribute(markup::PRODUCT_ID_ATTR))
    })?;
    ProductId::parse(&raw)
}

fn row_product_name(row: &Element) -> Option<String> {
    row.get_attribute(markup::PRODUCT_NAME_ATTR).or_else(|| {
        first_in(row, &format!("[{}]", markup::PRODUCT_NAME_ATTR))
            .and_then(|e| e.get_attribute(markup::PRODUCT_NAME_ATTR))
    })
}

/// Line view model read from a row (or any container of its form)
pub fn read_line(row: &Element, product_id: ProductId) -> CartLineView {
    let quantity = first_in(row, markup::QUANTITY_INPUT)
        .and_then(|e| e.dyn_into::<HtmlInputElement>().ok())
        .and_then(|input| markup::parse_count(&input.value()))
        .unwrap_or(0);
    let prices = query_in(row, markup::PRICE_CELLS);
    let unit_price = text_money(prices.first()).unwrap_or(Money::ZERO);

    let mut line = CartLineView::new(product_id, quantity, unit_price);
    if let Some(total) = text_money(prices.get(1)) {
        line.line_total = total;
    }
    line.product_name = row_product_name(row);
    line
}

/// Index the rendered cart and build the page's starting view model
pub fn bind_cart_page(document: &Document, config: &CartConfig) -> (DomCartView, CartState) {
    let mut rows = HashMap::new();
    let mut lines = Vec::new();
    for row in query_all(document, markup::PRODUCT_ROW) {
        let Some(product_id) = row_product_id(&row) else {
            log::warn!("Cart row without {}, skipping", markup::PRODUCT_ID_ATTR);
            continue;
        };
        lines.push(read_line(&row, product_id.clone()));
        rows.insert(product_id, row);
    }

    let first = |selector: &str| document.query_selector(selector).ok().flatten();
    let item_count = first(markup::BADGE)
        .and_then(|e| e.text_content())
        .and_then(|text| markup::parse_count(&text))
        .unwrap_or_else(|| lines.iter().map(|l| l.quantity).sum());
    let summary = CartSummary {
        subtotal: text_money(first(markup::SUMMARY_SUBTOTAL).as_ref()).unwrap_or(Money::ZERO),
        tax: text_money(first(markup::SUMMARY_TAX).as_ref()).unwrap_or(Money::ZERO),
        grand_total: text_money(first(markup::SUMMARY_TOTAL).as_ref()).unwrap_or(Money::ZERO),
        item_count,
    };
    log::debug!("Bound {} cart rows, {} items", rows.len(), item_count);

    let view = DomCartView {
        document: document.clone(),
        rows: RefCell::new(rows),
        currency: config.display.currency_symbol.clone(),
        empty_message: config.messages.empty_cart.clone(),
    };
    (view, CartState::new(lines, summary))
}

impl DomCartView {
    fn row(&self, product_id: &ProductId) -> Option<Element> {
        let row = self.rows.borrow().get(product_id).cloned()?;
        if row.is_connected() {
            Some(row)
        } else {
            self.rows.borrow_mut().remove(product_id);
            None
        }
    }

    /// Whether writes for this line have a live target
    pub fn is_bound(&self, product_id: &ProductId) -> bool {
        self.row(product_id).is_some()
    }

    /// Track a line by the container around its form
    pub fn bind_line(&self, product_id: ProductId, scope: Element) {
        self.rows.borrow_mut().insert(product_id, scope);
    }

    fn control_buttons(&self, control: &ControlId) -> Vec<Element> {
        let selector = markup::control_button(control);
        let scope = match control {
            ControlId::Quantity(id, _) | ControlId::Remove(id) => self.row(id),
            ControlId::ClearCart => None,
        };
        match (scope, control) {
            (Some(row), _) => query_in(&row, selector),
            (None, ControlId::ClearCart) => query_all(&self.document, selector),
            (None, ControlId::Quantity(id, _) | ControlId::Remove(id)) => {
                // quantity forms outside a bound row, e.g. on a product page
                let scoped = format!("{} {}", markup::product_scope(id), selector);
                query_all(&self.document, &scoped)
            }
        }
    }
}

impl CartView for DomCartView {
    fn set_item_count(&self, count: u32) {
        let Some(badge) = self.document.query_selector(markup::BADGE).ok().flatten() else {
            return;
        };
        badge.set_text_content(Some(&count.to_string()));
        set_style(&badge, "display", markup::badge_display(count));
    }

    fn set_line_quantity(&self, product_id: &ProductId, quantity: u32) {
        let input = self
            .row(product_id)
            .and_then(|row| first_in(&row, markup::QUANTITY_INPUT))
            .and_then(|e| e.dyn_into::<HtmlInputElement>().ok());
        if let Some(input) = input {
            input.set_value(&quantity.to_string());
        }
    }

    fn set_line_total(&self, product_id: &ProductId, total: Money) {
        let Some(row) = self.row(product_id) else { return };
        if let Some(cell) = query_in(&row, markup::PRICE_CELLS).get(1) {
            cell.set_text_content(Some(&format_price(total, &self.currency)));
        }
    }

    fn set_row_opacity(&self, product_id: &ProductId, opacity: f32) {
        if let Some(row) = self.row(product_id) {
            set_style(&row, "opacity", &opacity.to_string());
        }
    }

    fn remove_row(&self, product_id: &ProductId) {
        if let Some(row) = self.rows.borrow_mut().remove(product_id) {
            row.remove();
        }
    }

    fn patch_summary(&self, patch: &SummaryPatch) {
        for (selector, text) in markup::summary_texts(patch, &self.currency) {
            for element in query_all(&self.document, selector) {
                element.set_text_content(Some(&text));
            }
        }
    }

    fn show_empty_cart(&self) {
        let Some(container) = self.document.query_selector(markup::CART_ITEMS).ok().flatten() else {
            return;
        };
        let notice = match self.document.create_element("div") {
            Ok(notice) => notice,
            Err(err) => {
                log::warn!("Could not create empty cart notice: {:?}", err);
                return;
            }
        };
        notice.set_class_name(markup::EMPTY_CART_CLASS);
        notice.set_text_content(Some(&self.empty_message));
        container.set_text_content(None);
        if let Err(err) = container.append_child(&notice) {
            log::warn!("Could not show empty cart notice: {:?}", err);
        }
        self.rows.borrow_mut().clear();
    }

    fn set_control_busy(&self, control: &ControlId, busy: bool) {
        for button in self.control_buttons(control) {
            if let Some(button) = button.dyn_ref::<HtmlButtonElement>() {
                button.set_disabled(busy);
            }
        }
    }
}
