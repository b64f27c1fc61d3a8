use leptos::prelude::*;
use std::rc::Rc;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use wasm_bindgen_futures::spawn_local;
use web_sys::{Document, HtmlElement};

use crate::domain::a001_cart::api::GlooTransport;
use crate::domain::a001_cart::ports::CartPorts;
use crate::domain::a001_cart::ui::{
    bind_cart_page, install_cart_handlers, BrowserDialogs, BrowserNavigator, TimerScheduler,
    ToastNotifier,
};
use crate::domain::a001_cart::CartSyncController;
use crate::shared::api_utils::document_cookie;
use crate::shared::config::CartConfig;
use crate::shared::toast::{ToastHost, ToastService};

const TOAST_CONTAINER_ID: &str = "toast-container";

/// Reuse the page's toast container or add one to the body
fn toast_container(document: &Document, body: &HtmlElement) -> Result<HtmlElement, JsValue> {
    if let Some(existing) = document.get_element_by_id(TOAST_CONTAINER_ID) {
        return existing.dyn_into::<HtmlElement>().map_err(JsValue::from);
    }
    let container = document.create_element("div")?;
    container.set_id(TOAST_CONTAINER_ID);
    container.set_class_name("position-fixed bottom-0 end-0 p-3");
    let container = container.dyn_into::<HtmlElement>().map_err(JsValue::from)?;
    container.style().set_property("z-index", "11")?;
    body.append_child(&container)?;
    Ok(container)
}

/// Wire the cart controller into the current page
pub fn boot(config: CartConfig) -> Result<(), JsValue> {
    let document = web_sys::window()
        .and_then(|w| w.document())
        .ok_or_else(|| JsValue::from_str("no document"))?;
    let body = document
        .body()
        .ok_or_else(|| JsValue::from_str("document has no body"))?;

    let toasts = ToastService::new(config.timings.toast());
    let container = toast_container(&document, &body)?;
    leptos::mount::mount_to(container, move || view! { <ToastHost service=toasts/> }).forget();

    let csrf_token = document_cookie(&config.csrf.cookie_name);
    if csrf_token.is_none() {
        log::warn!("No {} cookie, cart requests go out without a CSRF header", config.csrf.cookie_name);
    }

    let (view, state) = bind_cart_page(&document, &config);
    let view = Rc::new(view);
    let ports = CartPorts {
        transport: Rc::new(GlooTransport),
        view: view.clone(),
        notifier: Rc::new(ToastNotifier(toasts)),
        dialogs: Rc::new(BrowserDialogs),
        navigator: Rc::new(BrowserNavigator),
        scheduler: Rc::new(TimerScheduler),
    };
    let update_prefix = config.endpoints.update_prefix.clone();
    let validate_on_load = config.behavior.validate_on_load;
    let controller = CartSyncController::new(Rc::new(config), state, ports, csrf_token);

    install_cart_handlers(&body, controller.clone(), view, update_prefix)?;

    if validate_on_load {
        spawn_local(async move { controller.validate_cart().await });
    }
    log::info!("Cart sync ready");
    Ok(())
}
