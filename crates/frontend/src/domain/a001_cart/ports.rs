//! Seams between the cart controller and the browser
//!
//! The controller only talks to these traits; `ui` provides the DOM, fetch
//! and timer implementations, tests provide recording fakes.

use async_trait::async_trait;
use contracts::domain::a001_cart::{ProductId, SummaryPatch};
use contracts::domain::common::Money;
use std::rc::Rc;
use std::time::Duration;

use super::error::CartError;
use super::lock::ControlId;
use crate::shared::toast::Notice;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HttpMethod {
    Get,
    Post,
}

/// A fully built outbound request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CartRequest {
    pub method: HttpMethod,
    pub url: String,
    pub headers: Vec<(String, String)>,
    pub body: Option<String>,
}

impl CartRequest {
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(n, _)| n.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }
}

/// Raw answer: status and body text, before any JSON parsing
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransportReply {
    pub status: u16,
    pub body: String,
}

impl TransportReply {
    pub fn is_ok(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

#[async_trait(?Send)]
pub trait CartTransport {
    /// Errors only on network failure; any HTTP status is a reply
    async fn send(&self, request: CartRequest) -> Result<TransportReply, CartError>;
}

/// Rendered cart regions. Every method is a no-op when its target is gone.
pub trait CartView {
    fn set_item_count(&self, count: u32);
    fn set_line_quantity(&self, product_id: &ProductId, quantity: u32);
    fn set_line_total(&self, product_id: &ProductId, total: Money);
    fn set_row_opacity(&self, product_id: &ProductId, opacity: f32);
    fn remove_row(&self, product_id: &ProductId);
    fn patch_summary(&self, patch: &SummaryPatch);
    fn show_empty_cart(&self);
    fn set_control_busy(&self, control: &ControlId, busy: bool);
}

pub trait Notifier {
    fn notify(&self, notice: &Notice);
}

/// Blocking browser prompts
pub trait Dialogs {
    fn confirm(&self, message: &str) -> bool;
    fn alert(&self, message: &str);
}

pub trait Navigator {
    fn reload(&self);
}

/// Fire-and-forget timers
pub trait Scheduler {
    fn schedule(&self, delay: Duration, task: Box<dyn FnOnce()>);
}

#[derive(Clone)]
pub struct CartPorts {
    pub transport: Rc<dyn CartTransport>,
    pub view: Rc<dyn CartView>,
    pub notifier: Rc<dyn Notifier>,
    pub dialogs: Rc<dyn Dialogs>,
    pub navigator: Rc<dyn Navigator>,
    pub scheduler: Rc<dyn Scheduler>,
}
