use async_trait::async_trait;
use contracts::domain::a001_cart::{AddToCartForm, AdjustQuantityForm, ProductId};
use contracts::enums::QuantityAction;
use gloo_net::http::Request;
use serde::de::DeserializeOwned;

use super::error::CartError;
use super::ports::{CartRequest, CartTransport, HttpMethod, TransportReply};
use crate::shared::api_utils::{form_body, FORM_CONTENT_TYPE, NO_CACHE_HEADER, PROGRAMMATIC_HEADER};

/// Anti-forgery header attached to every mutating request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CsrfHeader {
    pub name: String,
    pub token: Option<String>,
}

fn request(method: HttpMethod, url: &str) -> CartRequest {
    CartRequest {
        method,
        url: url.to_string(),
        headers: vec![(PROGRAMMATIC_HEADER.0.to_string(), PROGRAMMATIC_HEADER.1.to_string())],
        body: None,
    }
}

fn mutation(url: &str, csrf: &CsrfHeader) -> CartRequest {
    let mut req = request(HttpMethod::Post, url);
    if let Some(token) = &csrf.token {
        req.headers.push((csrf.name.clone(), token.clone()));
    }
    req
}

fn with_form_body(mut req: CartRequest, body: String) -> CartRequest {
    req.headers
        .push((FORM_CONTENT_TYPE.0.to_string(), FORM_CONTENT_TYPE.1.to_string()));
    req.body = Some(body);
    req
}

fn with_no_cache(mut req: CartRequest) -> CartRequest {
    req.headers
        .push((NO_CACHE_HEADER.0.to_string(), NO_CACHE_HEADER.1.to_string()));
    req
}

/// `POST <endpoint>` with `productId=<id>`
pub fn add_item_request(
    endpoint: &str,
    product_id: &ProductId,
    csrf: &CsrfHeader,
) -> Result<CartRequest, CartError> {
    let form = AddToCartForm {
        product_id: product_id.clone(),
    };
    let body = form_body(&form).map_err(|e| CartError::Encode(e.to_string()))?;
    Ok(with_form_body(mutation(endpoint, csrf), body))
}

/// `POST <endpoint>` with `action=<increase|decrease>` and the form's token
pub fn adjust_quantity_request(
    endpoint: &str,
    action: QuantityAction,
    form_token: Option<String>,
    csrf: &CsrfHeader,
) -> Result<CartRequest, CartError> {
    let form = AdjustQuantityForm {
        action,
        csrf_token: form_token,
    };
    let body = form_body(&form).map_err(|e| CartError::Encode(e.to_string()))?;
    Ok(with_form_body(mutation(endpoint, csrf), body))
}

pub fn remove_item_request(endpoint: &str, csrf: &CsrfHeader) -> CartRequest {
    with_no_cache(mutation(endpoint, csrf))
}

pub fn clear_cart_request(endpoint: &str, csrf: &CsrfHeader) -> CartRequest {
    with_no_cache(mutation(endpoint, csrf))
}

pub fn validate_cart_request(endpoint: &str) -> CartRequest {
    with_no_cache(request(HttpMethod::Get, endpoint))
}

fn snippet(body: &str) -> String {
    body.chars().take(200).collect()
}

/// Status check then JSON parse; the two failure classes stay distinct
pub fn decode<T: DeserializeOwned>(reply: TransportReply) -> Result<T, CartError> {
    if !reply.is_ok() {
        log::error!(
            "Cart request failed with HTTP {}: {}",
            reply.status,
            snippet(&reply.body)
        );
        return Err(CartError::Status(reply.status));
    }
    serde_json::from_str(&reply.body).map_err(|e| {
        log::error!("Cart response is not valid JSON ({}): {}", e, snippet(&reply.body));
        CartError::Parse(e.to_string())
    })
}

/// `fetch`-backed transport
pub struct GlooTransport;

#[async_trait(?Send)]
impl CartTransport for GlooTransport {
    async fn send(&self, request: CartRequest) -> Result<TransportReply, CartError> {
        let mut builder = match request.method {
            HttpMethod::Get => Request::get(&request.url),
            HttpMethod::Post => Request::post(&request.url),
        };
        for (name, value) in &request.headers {
            builder = builder.header(name, value);
        }

        let response = match request.body {
            Some(body) => builder
                .body(body)
                .map_err(|e| CartError::Encode(e.to_string()))?
                .send()
                .await,
            None => builder.send().await,
        }
        .map_err(|e| CartError::Network(e.to_string()))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| CartError::Network(e.to_string()))?;
        Ok(TransportReply { status, body })
    }
}
