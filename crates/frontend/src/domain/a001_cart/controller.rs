use contracts::domain::a001_cart::{
    CartLineView, CartMutationResponse, CartSummary, CartValidateResponse, ProductId,
};
use contracts::enums::QuantityAction;
use std::cell::RefCell;
use std::future::Future;
use std::rc::Rc;
use std::time::Duration;

use super::api::{self, CsrfHeader};
use super::error::{CartError, CartOutcome};
use super::lock::{ControlId, ControlLocks};
use super::ports::{CartPorts, CartRequest};
use super::reconcile::{reconcile, CartEffect, CartOperation, PENDING_REMOVAL_OPACITY};
use super::state::CartState;
use crate::shared::config::CartConfig;

/// Add-to-cart activation as read from the product form
#[derive(Debug, Clone, PartialEq)]
pub struct AddItemRequest {
    pub product_id: Option<ProductId>,
    pub product_name: Option<String>,
    pub endpoint: String,
}

/// A cart line's form: where to post and the token rendered into it
#[derive(Debug, Clone, PartialEq)]
pub struct LineContext {
    pub product_id: ProductId,
    pub product_name: Option<String>,
    pub endpoint: String,
    pub form_token: Option<String>,
}

/// Owns the cart view model for one page load and runs every cart operation.
///
/// Cheap to clone; clones share state, locks and ports.
#[derive(Clone)]
pub struct CartSyncController {
    config: Rc<CartConfig>,
    csrf: Rc<CsrfHeader>,
    state: Rc<RefCell<CartState>>,
    locks: Rc<ControlLocks>,
    ports: CartPorts,
}

impl CartSyncController {
    pub fn new(
        config: Rc<CartConfig>,
        state: CartState,
        ports: CartPorts,
        csrf_token: Option<String>,
    ) -> Self {
        let csrf = CsrfHeader {
            name: config.csrf.header_name.clone(),
            token: csrf_token,
        };
        Self {
            config,
            csrf: Rc::new(csrf),
            state: Rc::new(RefCell::new(state)),
            locks: Rc::new(ControlLocks::new()),
            ports,
        }
    }

    pub fn line(&self, product_id: &ProductId) -> Option<CartLineView> {
        self.state.borrow().line(product_id).cloned()
    }

    pub fn summary(&self) -> CartSummary {
        *self.state.borrow().summary()
    }

    /// Start tracking a line the page scan did not see
    pub fn adopt_line(&self, line: CartLineView) {
        let product_id = line.product_id.clone();
        if self.state.borrow_mut().adopt_line(line) {
            log::debug!("Tracking cart line {} from its form", product_id);
        }
    }

    pub fn is_locked(&self, control: &ControlId) -> bool {
        self.locks.is_locked(control)
    }

    pub async fn add_item(&self, request: AddItemRequest) {
        let Some(product_id) = request.product_id else {
            log::debug!("Add to cart without a product id, ignoring");
            return;
        };

        let built = api::add_item_request(&request.endpoint, &product_id, &self.csrf);
        self.run(
            CartOperation::Add {
                product_name: request.product_name,
            },
            built,
        )
        .await;
    }

    /// Takes the control's lock at call time, before the returned future is
    /// first polled, so a second activation in the same tick is ignored.
    pub fn adjust_quantity(
        &self,
        action: QuantityAction,
        line: LineContext,
    ) -> impl Future<Output = ()> + 'static {
        let control = ControlId::Quantity(line.product_id.clone(), action);
        let acquired = self.acquire(&control);
        let this = self.clone();
        async move {
            if !acquired {
                return;
            }

            let built =
                api::adjust_quantity_request(&line.endpoint, action, line.form_token, &this.csrf);
            this.run(
                CartOperation::Adjust {
                    product_id: line.product_id,
                },
                built,
            )
            .await;

            this.release_after_cooldown(control);
        }
    }

    pub async fn remove_item(&self, line: LineContext) {
        let control = ControlId::Remove(line.product_id.clone());
        if self.locks.is_locked(&control) {
            return;
        }
        if !self.ports.dialogs.confirm(&self.config.messages.confirm_remove) {
            return;
        }
        if !self.acquire(&control) {
            return;
        }

        // dimmed until the server answers; the reload settles it either way
        self.apply(CartEffect::SetRowOpacity {
            product_id: line.product_id.clone(),
            opacity: PENDING_REMOVAL_OPACITY,
        });

        let built = Ok(api::remove_item_request(&line.endpoint, &self.csrf));
        self.run(
            CartOperation::Remove {
                product_id: line.product_id,
                product_name: line.product_name,
            },
            built,
        )
        .await;

        self.release_after_cooldown(control);
    }

    pub async fn clear_cart(&self, endpoint: Option<String>) {
        let control = ControlId::ClearCart;
        if self.locks.is_locked(&control) {
            return;
        }
        if !self.ports.dialogs.confirm(&self.config.messages.confirm_clear) {
            return;
        }
        if !self.acquire(&control) {
            return;
        }

        let endpoint = endpoint.unwrap_or_else(|| self.config.endpoints.clear.clone());
        let built = Ok(api::clear_cart_request(&endpoint, &self.csrf));
        self.run(CartOperation::Clear, built).await;

        self.release_after_cooldown(control);
    }

    /// Ask the backend whether the session cart changed behind this page
    /// (stock or prices moved). A changed cart reloads; failures are logged.
    pub async fn validate_cart(&self) {
        let request = api::validate_cart_request(&self.config.endpoints.validate);
        let result = match self.ports.transport.send(request).await {
            Ok(reply) => api::decode::<CartValidateResponse>(reply),
            Err(err) => Err(err),
        };
        match result {
            Ok(response) if response.changed => {
                log::info!("Cart changed on the server, reloading");
                self.ports.navigator.reload();
            }
            Ok(_) => {}
            Err(err) => log::warn!("Cart validation failed: {}", err),
        }
    }

    fn acquire(&self, control: &ControlId) -> bool {
        if !self.locks.try_lock(control) {
            return false;
        }
        self.ports.view.set_control_busy(control, true);
        true
    }

    fn release_after_cooldown(&self, control: ControlId) {
        let locks = Rc::clone(&self.locks);
        let view = Rc::clone(&self.ports.view);
        self.ports.scheduler.schedule(
            self.config.timings.control_cooldown(),
            Box::new(move || {
                locks.unlock(&control);
                view.set_control_busy(&control, false);
            }),
        );
    }

    async fn exchange(&self, built: Result<CartRequest, CartError>) -> CartOutcome {
        let request = match built {
            Ok(request) => request,
            Err(err) => return CartOutcome::Failed(err),
        };
        let result: Result<CartMutationResponse, CartError> =
            match self.ports.transport.send(request).await {
                Ok(reply) => api::decode(reply),
                Err(err) => {
                    log::error!("Cart request did not complete: {}", err);
                    Err(err)
                }
            };
        CartOutcome::from(result)
    }

    async fn run(&self, operation: CartOperation, built: Result<CartRequest, CartError>) {
        let seq = self.state.borrow_mut().issue_seq();
        let outcome = self.exchange(built).await;
        self.settle(&operation, seq, &outcome);
    }

    fn settle(&self, operation: &CartOperation, seq: u64, outcome: &CartOutcome) {
        let effects = reconcile(operation, outcome, &self.state.borrow(), &self.config);

        let fresh = if effects.iter().any(CartEffect::is_aggregate) {
            self.state.borrow_mut().admit_aggregate(seq)
                || !self.config.behavior.discard_stale_summaries
        } else {
            true
        };

        for effect in effects {
            if !fresh && effect.is_aggregate() {
                log::debug!("Dropping stale cart totals from request #{}", seq);
                continue;
            }
            self.apply(effect);
        }
    }

    fn apply(&self, effect: CartEffect) {
        let ports = &self.ports;
        match effect {
            CartEffect::Notify(notice) => ports.notifier.notify(&notice),
            CartEffect::Alert(message) => ports.dialogs.alert(&message),
            CartEffect::SetItemCount(count) => {
                self.state.borrow_mut().set_item_count(count);
                ports.view.set_item_count(count);
            }
            CartEffect::UpdateLine {
                product_id,
                quantity,
                total,
            } => {
                let current = self
                    .state
                    .borrow_mut()
                    .update_line(&product_id, quantity, total);
                if let Some(quantity) = quantity {
                    ports.view.set_line_quantity(&product_id, quantity);
                }
                if let Some(total) = current.or(total) {
                    ports.view.set_line_total(&product_id, total);
                }
            }
            CartEffect::SetRowOpacity {
                product_id,
                opacity,
            } => ports.view.set_row_opacity(&product_id, opacity),
            CartEffect::RemoveRow { product_id, delay } if delay.is_zero() => {
                self.state.borrow_mut().remove_line(&product_id);
                ports.view.remove_row(&product_id);
            }
            CartEffect::RemoveRow { product_id, delay } => {
                self.defer(
                    delay,
                    CartEffect::RemoveRow {
                        product_id,
                        delay: Duration::ZERO,
                    },
                );
            }
            CartEffect::PatchSummary(patch) => {
                self.state.borrow_mut().patch_summary(&patch);
                ports.view.patch_summary(&patch);
            }
            CartEffect::ShowEmptyCart => ports.view.show_empty_cart(),
            CartEffect::Reload { delay } if delay.is_zero() => {
                log::info!("Reloading cart page");
                ports.navigator.reload();
            }
            CartEffect::Reload { delay } => {
                self.defer(
                    delay,
                    CartEffect::Reload {
                        delay: Duration::ZERO,
                    },
                );
            }
        }
    }

    fn defer(&self, delay: Duration, effect: CartEffect) {
        let this = self.clone();
        self.ports
            .scheduler
            .schedule(delay, Box::new(move || this.apply(effect)));
    }
}
