//! Delegated click and submit handling for the cart controls
//!
//! One listener each on the page body; the clicked element is matched
//! against the control selectors and the form around it supplies endpoint,
//! product and token.

use contracts::domain::a001_cart::ProductId;
use contracts::enums::QuantityAction;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use std::rc::Rc;
use wasm_bindgen_futures::spawn_local;
use web_sys::{Element, Event, HtmlElement, HtmlInputElement, MouseEvent};

use super::dom::{read_line, row_product_id, DomCartView};
use super::markup;
use crate::domain::a001_cart::controller::{AddItemRequest, CartSyncController, LineContext};
use crate::shared::api_utils::line_target;

fn closest(element: &Element, selector: &str) -> Option<Element> {
    element.closest(selector).ok().flatten()
}

fn input_value(form: &Element, selector: &str) -> Option<String> {
    form.query_selector(selector)
        .ok()
        .flatten()
        .and_then(|e| e.dyn_into::<HtmlInputElement>().ok())
        .map(|input| input.value())
}

/// Read an attribute from the form, falling back to its product row
fn form_or_row_attr(form: &Element, name: &str) -> Option<String> {
    form.get_attribute(name).or_else(|| {
        closest(form, markup::PRODUCT_ROW).and_then(|row| row.get_attribute(name))
    })
}

fn form_product_id(form: &Element) -> Option<ProductId> {
    form.get_attribute(markup::PRODUCT_ID_ATTR)
        .and_then(|raw| ProductId::parse(&raw))
        .or_else(|| closest(form, markup::PRODUCT_ROW).and_then(|row| row_product_id(&row)))
}

fn add_request(button: &Element) -> Option<AddItemRequest> {
    let form = closest(button, "form")?;
    let Some(endpoint) = form.get_attribute("action").filter(|a| !a.trim().is_empty()) else {
        log::error!("Add to cart form has no action");
        return None;
    };
    Some(AddItemRequest {
        product_id: input_value(&form, markup::PRODUCT_ID_INPUT)
            .and_then(|raw| ProductId::parse(&raw)),
        product_name: form_or_row_attr(&form, markup::PRODUCT_NAME_ATTR),
        endpoint,
    })
}

fn line_context(form: &Element, update_prefix: Option<&str>) -> Option<LineContext> {
    let action = form.get_attribute("action");
    let Some((product_id, endpoint)) =
        line_target(action.as_deref(), form_product_id(form), update_prefix)
    else {
        log::error!("Cart form has neither a usable action nor {}", markup::PRODUCT_ID_ATTR);
        return None;
    };
    Some(LineContext {
        product_name: form_or_row_attr(form, markup::PRODUCT_NAME_ATTR),
        form_token: input_value(form, &markup::form_token_input()),
        product_id,
        endpoint,
    })
}

/// Make sure writes for this line reach the form that triggered it
fn adopt_form_line(form: &Element, line: &LineContext, handlers: &Handlers) {
    if handlers.view.is_bound(&line.product_id) {
        return;
    }
    let scope = closest(form, markup::LINE_SCOPE).unwrap_or_else(|| form.clone());
    handlers
        .controller
        .adopt_line(read_line(&scope, line.product_id.clone()));
    handlers.view.bind_line(line.product_id.clone(), scope);
}

struct Handlers {
    controller: CartSyncController,
    view: Rc<DomCartView>,
    update_prefix: String,
}

fn dispatch(target: &Element, event: &MouseEvent, handlers: &Handlers) {
    let controller = &handlers.controller;
    if let Some(button) = closest(target, markup::ADD_BUTTON) {
        event.prevent_default();
        let Some(request) = add_request(&button) else { return };
        let controller = controller.clone();
        spawn_local(async move { controller.add_item(request).await });
    } else if let Some(button) = closest(target, markup::QUANTITY_BUTTON) {
        event.prevent_default();
        let action = button
            .get_attribute("name")
            .and_then(|name| QuantityAction::from_code(&name));
        let Some(action) = action else { return };
        let Some(form) = closest(&button, "form") else {
            log::error!("Quantity button outside a form");
            return;
        };
        let Some(line) = line_context(&form, Some(&handlers.update_prefix)) else { return };
        adopt_form_line(&form, &line, handlers);
        // locks now; the request runs on the next tick
        spawn_local(controller.adjust_quantity(action, line));
    } else if let Some(button) = closest(target, markup::REMOVE_BUTTON) {
        event.prevent_default();
        let Some(form) = closest(&button, "form") else { return };
        let Some(line) = line_context(&form, None) else { return };
        adopt_form_line(&form, &line, handlers);
        let controller = controller.clone();
        spawn_local(async move { controller.remove_item(line).await });
    } else if let Some(button) = closest(target, markup::CLEAR_BUTTON) {
        event.prevent_default();
        let endpoint = closest(&button, "form")
            .and_then(|form| form.get_attribute("action"))
            .filter(|a| !a.trim().is_empty());
        let controller = controller.clone();
        spawn_local(async move { controller.clear_cart(endpoint).await });
    }
}

/// Attach the delegated listeners. They live as long as the page.
pub fn install_cart_handlers(
    root: &HtmlElement,
    controller: CartSyncController,
    view: Rc<DomCartView>,
    update_prefix: String,
) -> Result<(), JsValue> {
    let handlers = Handlers {
        controller,
        view,
        update_prefix,
    };
    let on_click = Closure::wrap(Box::new(move |event: MouseEvent| {
        let Some(target) = event.target().and_then(|t| t.dyn_into::<Element>().ok()) else {
            return;
        };
        dispatch(&target, &event, &handlers);
    }) as Box<dyn FnMut(MouseEvent)>);

    let on_submit = Closure::wrap(Box::new(move |event: Event| {
        let intercepted = event
            .target()
            .and_then(|t| t.dyn_into::<Element>().ok())
            .is_some_and(|form| form.matches(markup::INTERCEPTED_FORMS).unwrap_or(false));
        if intercepted {
            event.prevent_default();
        }
    }) as Box<dyn FnMut(Event)>);

    root.add_event_listener_with_callback("click", on_click.as_ref().unchecked_ref())?;
    root.add_event_listener_with_callback("submit", on_submit.as_ref().unchecked_ref())?;

    on_click.forget();
    on_submit.forget();
    Ok(())
}
