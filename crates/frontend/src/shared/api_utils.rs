//! Helpers for talking to the storefront backend
//!
//! Cookie lookup for the anti-forgery token, form encoding and endpoint
//! resolution for forms rendered without a usable `action`.

use contracts::domain::a001_cart::ProductId;
use serde::Serialize;
use wasm_bindgen::JsCast;

/// Marker header that lets the backend answer with JSON instead of a redirect
pub const PROGRAMMATIC_HEADER: (&str, &str) = ("X-Requested-With", "XMLHttpRequest");

/// Header used on calls whose result must never come from the browser cache
pub const NO_CACHE_HEADER: (&str, &str) = ("Cache-Control", "no-cache, no-store");

pub const FORM_CONTENT_TYPE: (&str, &str) = ("Content-Type", "application/x-www-form-urlencoded");

/// Find a cookie value in a `document.cookie` string.
///
/// Values are percent-decoded; an undecodable value is returned as is.
pub fn read_cookie(cookies: &str, name: &str) -> Option<String> {
    cookies
        .split(';')
        .map(str::trim)
        .find_map(|pair| pair.strip_prefix(name)?.strip_prefix('='))
        .map(|raw| {
            urlencoding::decode(raw)
                .map(|v| v.into_owned())
                .unwrap_or_else(|_| raw.to_string())
        })
}

/// Read a cookie from the current document
pub fn document_cookie(name: &str) -> Option<String> {
    let document = web_sys::window()?.document()?;
    let html = document.dyn_into::<web_sys::HtmlDocument>().ok()?;
    let cookies = html.cookie().ok()?;
    read_cookie(&cookies, name)
}

/// Encode a form struct as `application/x-www-form-urlencoded`
pub fn form_body<T: Serialize>(form: &T) -> Result<String, serde_qs::Error> {
    serde_qs::to_string(form)
}

/// Endpoint for a line form.
///
/// Uses the form's `action` when it holds a real URL. Otherwise, when a
/// fallback prefix is given, builds `<prefix><id>/` from the product id.
pub fn resolve_endpoint(
    action: Option<&str>,
    product_id: Option<&ProductId>,
    fallback_prefix: Option<&str>,
) -> Option<String> {
    let usable = action
        .map(str::trim)
        .filter(|a| !a.is_empty() && !a.contains("[object"));
    if let Some(action) = usable {
        return Some(action.to_string());
    }
    let prefix = fallback_prefix?;
    let id = product_id?;
    let separator = if prefix.ends_with('/') { "" } else { "/" };
    Some(format!("{}{}{}/", prefix, separator, id))
}

/// Key and endpoint for a line form.
///
/// The product id is only needed when the form's `action` is unusable. A
/// form without one is keyed by its endpoint instead.
pub fn line_target(
    action: Option<&str>,
    product_id: Option<ProductId>,
    fallback_prefix: Option<&str>,
) -> Option<(ProductId, String)> {
    let endpoint = resolve_endpoint(action, product_id.as_ref(), fallback_prefix)?;
    let key = product_id.or_else(|| ProductId::parse(&endpoint))?;
    Some((key, endpoint))
}
