//! In-memory ports for driving the controller in tests

use async_trait::async_trait;
use contracts::domain::a001_cart::{CartLineView, CartSummary, ProductId, SummaryPatch};
use contracts::domain::common::Money;
use std::cell::{Cell, RefCell};
use std::collections::VecDeque;
use std::future::Future;
use std::pin::Pin;
use std::rc::Rc;
use std::task::{Context, Poll, RawWaker, RawWakerVTable, Waker};
use std::time::Duration;

use super::controller::{CartSyncController, LineContext};
use super::error::CartError;
use super::lock::ControlId;
use super::ports::{
    CartPorts, CartRequest, CartTransport, CartView, Dialogs, Navigator, Notifier, Scheduler,
    TransportReply,
};
use super::state::CartState;
use crate::shared::config::CartConfig;
use crate::shared::toast::Notice;

type ScriptedReply = (Result<TransportReply, CartError>, Option<Rc<Cell<bool>>>);

/// Replies are handed out in send order. A held reply stays pending until
/// its gate is opened, so tests can control the order responses land in.
#[derive(Default)]
pub struct FakeTransport {
    replies: RefCell<VecDeque<ScriptedReply>>,
    pub sent: RefCell<Vec<CartRequest>>,
}

impl FakeTransport {
    pub fn reply(&self, status: u16, body: &str) {
        self.replies.borrow_mut().push_back((
            Ok(TransportReply {
                status,
                body: body.to_string(),
            }),
            None,
        ));
    }

    /// Returns the gate; set it to true to let the reply through
    pub fn reply_held(&self, status: u16, body: &str) -> Rc<Cell<bool>> {
        let gate = Rc::new(Cell::new(false));
        self.replies.borrow_mut().push_back((
            Ok(TransportReply {
                status,
                body: body.to_string(),
            }),
            Some(gate.clone()),
        ));
        gate
    }

    pub fn fail(&self, err: CartError) {
        self.replies.borrow_mut().push_back((Err(err), None));
    }

    pub fn sent_count(&self) -> usize {
        self.sent.borrow().len()
    }
}

#[async_trait(?Send)]
impl CartTransport for FakeTransport {
    async fn send(&self, request: CartRequest) -> Result<TransportReply, CartError> {
        self.sent.borrow_mut().push(request);
        let next = self.replies.borrow_mut().pop_front();
        let Some((reply, gate)) = next else {
            return Err(CartError::Network("no scripted reply".to_string()));
        };
        if let Some(gate) = gate {
            GateOpen(gate).await;
        }
        reply
    }
}

struct GateOpen(Rc<Cell<bool>>);

impl Future for GateOpen {
    type Output = ();

    fn poll(self: Pin<&mut Self>, _cx: &mut Context<'_>) -> Poll<()> {
        if self.0.get() {
            Poll::Ready(())
        } else {
            Poll::Pending
        }
    }
}

/// Waker for polling a future by hand
pub fn noop_waker() -> Waker {
    fn clone(_: *const ()) -> RawWaker {
        RawWaker::new(std::ptr::null(), &VTABLE)
    }
    fn noop(_: *const ()) {}
    static VTABLE: RawWakerVTable = RawWakerVTable::new(clone, noop, noop, noop);

    // SAFETY: the vtable functions never touch the data pointer
    unsafe { Waker::from_raw(RawWaker::new(std::ptr::null(), &VTABLE)) }
}

#[derive(Debug, Clone, PartialEq)]
pub enum ViewCall {
    ItemCount(u32),
    LineQuantity(ProductId, u32),
    LineTotal(ProductId, Money),
    RowOpacity(ProductId, f32),
    RowRemoved(ProductId),
    Summary(SummaryPatch),
    EmptyCart,
    ControlBusy(ControlId, bool),
}

#[derive(Default)]
pub struct RecordingView {
    pub calls: RefCell<Vec<ViewCall>>,
}

impl RecordingView {
    pub fn record(&self, call: ViewCall) {
        self.calls.borrow_mut().push(call);
    }

    pub fn has(&self, call: &ViewCall) -> bool {
        self.calls.borrow().contains(call)
    }

    /// Calls other than control busy toggling
    pub fn content_calls(&self) -> Vec<ViewCall> {
        self.calls
            .borrow()
            .iter()
            .filter(|c| !matches!(c, ViewCall::ControlBusy(..)))
            .cloned()
            .collect()
    }
}

impl CartView for RecordingView {
    fn set_item_count(&self, count: u32) {
        self.record(ViewCall::ItemCount(count));
    }

    fn set_line_quantity(&self, product_id: &ProductId, quantity: u32) {
        self.record(ViewCall::LineQuantity(product_id.clone(), quantity));
    }

    fn set_line_total(&self, product_id: &ProductId, total: Money) {
        self.record(ViewCall::LineTotal(product_id.clone(), total));
    }

    fn set_row_opacity(&self, product_id: &ProductId, opacity: f32) {
        self.record(ViewCall::RowOpacity(product_id.clone(), opacity));
    }

    fn remove_row(&self, product_id: &ProductId) {
        self.record(ViewCall::RowRemoved(product_id.clone()));
    }

    fn patch_summary(&self, patch: &SummaryPatch) {
        self.record(ViewCall::Summary(*patch));
    }

    fn show_empty_cart(&self) {
        self.record(ViewCall::EmptyCart);
    }

    fn set_control_busy(&self, control: &ControlId, busy: bool) {
        self.record(ViewCall::ControlBusy(control.clone(), busy));
    }
}

#[derive(Default)]
pub struct RecordingNotifier {
    pub notices: RefCell<Vec<Notice>>,
}

impl Notifier for RecordingNotifier {
    fn notify(&self, notice: &Notice) {
        self.notices.borrow_mut().push(notice.clone());
    }
}

pub struct ScriptedDialogs {
    pub answer: Cell<bool>,
    pub confirms: RefCell<Vec<String>>,
    pub alerts: RefCell<Vec<String>>,
}

impl Default for ScriptedDialogs {
    fn default() -> Self {
        Self {
            answer: Cell::new(true),
            confirms: RefCell::new(Vec::new()),
            alerts: RefCell::new(Vec::new()),
        }
    }
}

impl Dialogs for ScriptedDialogs {
    fn confirm(&self, message: &str) -> bool {
        self.confirms.borrow_mut().push(message.to_string());
        self.answer.get()
    }

    fn alert(&self, message: &str) {
        self.alerts.borrow_mut().push(message.to_string());
    }
}

#[derive(Default)]
pub struct CountingNavigator {
    pub reloads: Cell<u32>,
}

impl Navigator for CountingNavigator {
    fn reload(&self) {
        self.reloads.set(self.reloads.get() + 1);
    }
}

/// Timers that only fire when the test says so
#[derive(Default)]
pub struct ManualScheduler {
    pending: RefCell<Vec<(Duration, Box<dyn FnOnce()>)>>,
}

impl ManualScheduler {
    pub fn pending(&self) -> usize {
        self.pending.borrow().len()
    }

    pub fn delays(&self) -> Vec<Duration> {
        self.pending.borrow().iter().map(|(d, _)| *d).collect()
    }

    /// Fire everything due, including timers scheduled by fired timers
    pub fn run_all(&self) {
        loop {
            let due: Vec<_> = self.pending.borrow_mut().drain(..).collect();
            if due.is_empty() {
                break;
            }
            for (_, task) in due {
                task();
            }
        }
    }
}

impl Scheduler for ManualScheduler {
    fn schedule(&self, delay: Duration, task: Box<dyn FnOnce()>) {
        self.pending.borrow_mut().push((delay, task));
    }
}

pub struct Harness {
    pub transport: Rc<FakeTransport>,
    pub view: Rc<RecordingView>,
    pub notifier: Rc<RecordingNotifier>,
    pub dialogs: Rc<ScriptedDialogs>,
    pub navigator: Rc<CountingNavigator>,
    pub scheduler: Rc<ManualScheduler>,
    pub controller: CartSyncController,
}

impl Harness {
    pub fn new(state: CartState) -> Self {
        Self::with_config(state, CartConfig::default())
    }

    pub fn with_config(state: CartState, config: CartConfig) -> Self {
        let transport = Rc::new(FakeTransport::default());
        let view = Rc::new(RecordingView::default());
        let notifier = Rc::new(RecordingNotifier::default());
        let dialogs = Rc::new(ScriptedDialogs::default());
        let navigator = Rc::new(CountingNavigator::default());
        let scheduler = Rc::new(ManualScheduler::default());

        let ports = CartPorts {
            transport: transport.clone(),
            view: view.clone(),
            notifier: notifier.clone(),
            dialogs: dialogs.clone(),
            navigator: navigator.clone(),
            scheduler: scheduler.clone(),
        };
        let controller =
            CartSyncController::new(Rc::new(config), state, ports, Some("cookie-token".to_string()));

        Self {
            transport,
            view,
            notifier,
            dialogs,
            navigator,
            scheduler,
            controller,
        }
    }

    pub fn notices(&self) -> Vec<Notice> {
        self.notifier.notices.borrow().clone()
    }

    pub fn reloads(&self) -> u32 {
        self.navigator.reloads.get()
    }
}

pub fn product(raw: &str) -> ProductId {
    ProductId::parse(raw).unwrap()
}

pub fn money(minor: i64) -> Money {
    Money::from_minor(minor)
}

/// One line in the cart with a matching summary
pub fn cart_with_line(id: &str, quantity: u32, unit_minor: i64) -> CartState {
    let mut line = CartLineView::new(product(id), quantity, money(unit_minor));
    line.product_name = Some("Filtre Kahve".to_string());
    let summary = CartSummary {
        subtotal: line.line_total,
        tax: Money::ZERO,
        grand_total: line.line_total,
        item_count: quantity,
    };
    CartState::new([line], summary)
}

pub fn line_context(id: &str) -> LineContext {
    LineContext {
        product_id: product(id),
        product_name: Some("Filtre Kahve".to_string()),
        endpoint: format!("/cart/update/{}/", id),
        form_token: Some("form-token".to_string()),
    }
}
