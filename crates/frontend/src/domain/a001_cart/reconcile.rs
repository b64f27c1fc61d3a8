//! One reconciliation for every cart operation
//!
//! `reconcile` turns an operation and its outcome into an ordered list of
//! effects. It never touches the page itself; the controller applies the
//! effects. A full page reload is an ordinary effect (`CartEffect::Reload`)
//! so every path that escalates to it is visible in the returned list.

use contracts::domain::a001_cart::{CartMutationResponse, ProductId, SummaryPatch};
use contracts::domain::common::Money;
use std::time::Duration;

use super::error::{CartError, CartOutcome};
use super::state::CartState;
use crate::shared::config::CartConfig;
use crate::shared::toast::Notice;

/// Opacity of a row whose removal is in flight
pub const PENDING_REMOVAL_OPACITY: f32 = 0.5;

#[derive(Debug, Clone, PartialEq)]
pub enum CartOperation {
    Add { product_name: Option<String> },
    Adjust { product_id: ProductId },
    Remove { product_id: ProductId, product_name: Option<String> },
    Clear,
}

#[derive(Debug, Clone, PartialEq)]
pub enum CartEffect {
    Notify(Notice),
    /// Blocking alert
    Alert(String),
    SetItemCount(u32),
    UpdateLine {
        product_id: ProductId,
        quantity: Option<u32>,
        total: Option<Money>,
    },
    SetRowOpacity { product_id: ProductId, opacity: f32 },
    RemoveRow { product_id: ProductId, delay: Duration },
    PatchSummary(SummaryPatch),
    ShowEmptyCart,
    /// Escape hatch: discard the page and take the server's state
    Reload { delay: Duration },
}

impl CartEffect {
    /// Effects that write cart-wide values shared by all lines
    pub fn is_aggregate(&self) -> bool {
        matches!(self, CartEffect::SetItemCount(_) | CartEffect::PatchSummary(_))
    }
}

fn fill(template: &str, name: &str, message: &str) -> String {
    template.replace("{name}", name).replace("{message}", message)
}

fn product_label<'a>(name: &'a Option<String>, config: &'a CartConfig) -> &'a str {
    name.as_deref()
        .map(str::trim)
        .filter(|n| !n.is_empty())
        .unwrap_or(config.messages.fallback_product_name.as_str())
}

fn failure_notice(err: &CartError, config: &CartConfig) -> Notice {
    match err {
        CartError::Parse(_) => Notice::danger(config.messages.parse_error.clone()),
        _ => Notice::danger(config.messages.network_error.clone()),
    }
}

/// Summary patch and badge, in that order, for whatever the response carries
fn aggregate_effects(response: &CartMutationResponse, effects: &mut Vec<CartEffect>) {
    let patch = response.summary_patch();
    if !patch.is_empty() {
        effects.push(CartEffect::PatchSummary(patch));
    }
    if let Some(count) = response.cart_count {
        effects.push(CartEffect::SetItemCount(count));
    }
}

pub fn reconcile(
    operation: &CartOperation,
    outcome: &CartOutcome,
    state: &CartState,
    config: &CartConfig,
) -> Vec<CartEffect> {
    match operation {
        CartOperation::Add { product_name } => reconcile_add(product_name, outcome, config),
        CartOperation::Adjust { product_id } => reconcile_adjust(product_id, outcome, state, config),
        CartOperation::Remove {
            product_id,
            product_name,
        } => reconcile_remove(product_id, product_name, outcome, config),
        CartOperation::Clear => reconcile_clear(outcome, config),
    }
}

fn reconcile_add(
    product_name: &Option<String>,
    outcome: &CartOutcome,
    config: &CartConfig,
) -> Vec<CartEffect> {
    match outcome {
        CartOutcome::Accepted(response) => {
            let name = product_label(product_name, config);
            let mut effects = vec![CartEffect::Notify(Notice::success(fill(
                &config.messages.added,
                name,
                "",
            )))];
            if let Some(count) = response.cart_count {
                effects.push(CartEffect::SetItemCount(count));
            }
            effects
        }
        CartOutcome::Rejected(message) => vec![CartEffect::Notify(Notice::warning(
            message
                .clone()
                .unwrap_or_else(|| config.messages.generic_failure.clone()),
        ))],
        // the add button gives one generic message for every failure class
        CartOutcome::Failed(_) => vec![CartEffect::Notify(Notice::danger(
            config.messages.network_error.clone(),
        ))],
    }
}

fn reconcile_adjust(
    product_id: &ProductId,
    outcome: &CartOutcome,
    state: &CartState,
    config: &CartConfig,
) -> Vec<CartEffect> {
    let response = match outcome {
        CartOutcome::Accepted(response) => response,
        CartOutcome::Rejected(message) => {
            return vec![CartEffect::Notify(Notice::warning(
                message
                    .clone()
                    .unwrap_or_else(|| config.messages.update_failed.clone()),
            ))]
        }
        CartOutcome::Failed(err) => return vec![CartEffect::Notify(failure_notice(err, config))],
    };

    let mut effects = Vec::new();
    let removed = response.line_removed();
    if removed {
        effects.push(CartEffect::SetRowOpacity {
            product_id: product_id.clone(),
            opacity: 0.0,
        });
        effects.push(CartEffect::RemoveRow {
            product_id: product_id.clone(),
            delay: config.timings.row_fade(),
        });
        effects.push(CartEffect::Notify(Notice::success(
            config.messages.line_removed.clone(),
        )));
    } else {
        let total = match (response.new_total, response.new_quantity) {
            (Some(total), _) => Some(total),
            (None, Some(quantity)) => state
                .line(product_id)
                .map(|line| line.unit_price.times(quantity)),
            (None, None) => None,
        };
        if response.new_quantity.is_some() || total.is_some() {
            effects.push(CartEffect::UpdateLine {
                product_id: product_id.clone(),
                quantity: response.new_quantity,
                total,
            });
        }
        effects.push(CartEffect::Notify(Notice::success(
            config.messages.quantity_updated.clone(),
        )));
    }

    aggregate_effects(response, &mut effects);

    if response.empties_cart() {
        // after the fading row is gone
        let delay = if removed {
            config.timings.row_fade()
        } else {
            Duration::ZERO
        };
        effects.push(CartEffect::Reload { delay });
    }
    effects
}

fn reconcile_remove(
    product_id: &ProductId,
    product_name: &Option<String>,
    outcome: &CartOutcome,
    config: &CartConfig,
) -> Vec<CartEffect> {
    match outcome {
        CartOutcome::Accepted(response) => {
            let mut effects = vec![CartEffect::RemoveRow {
                product_id: product_id.clone(),
                delay: Duration::ZERO,
            }];
            aggregate_effects(response, &mut effects);
            if response.empties_cart() {
                effects.push(CartEffect::ShowEmptyCart);
            }
            let name = product_label(product_name, config);
            effects.push(CartEffect::Notify(Notice::success(fill(
                &config.messages.removed,
                name,
                "",
            ))));
            if config.behavior.reload_after_remove || response.empties_cart() {
                effects.push(CartEffect::Reload {
                    delay: config.timings.reload_delay(),
                });
            }
            effects
        }
        CartOutcome::Rejected(message) => {
            let message = message
                .as_deref()
                .unwrap_or(&config.messages.generic_failure);
            vec![
                CartEffect::Alert(fill(&config.messages.remove_rejected, "", message)),
                CartEffect::Reload {
                    delay: Duration::ZERO,
                },
            ]
        }
        CartOutcome::Failed(_) => vec![
            CartEffect::Alert(config.messages.remove_failed.clone()),
            CartEffect::Reload {
                delay: Duration::ZERO,
            },
        ],
    }
}

fn reconcile_clear(outcome: &CartOutcome, config: &CartConfig) -> Vec<CartEffect> {
    match outcome {
        CartOutcome::Accepted(response) => {
            let mut effects = vec![
                CartEffect::SetItemCount(response.cart_count.unwrap_or(0)),
                CartEffect::ShowEmptyCart,
                CartEffect::Notify(Notice::success(
                    response
                        .message
                        .clone()
                        .unwrap_or_else(|| config.messages.cleared.clone()),
                )),
            ];
            effects.push(CartEffect::Reload {
                delay: config.timings.reload_delay(),
            });
            effects
        }
        CartOutcome::Rejected(message) => {
            let message = message
                .as_deref()
                .unwrap_or(&config.messages.generic_failure);
            vec![
                CartEffect::Alert(fill(&config.messages.remove_rejected, "", message)),
                CartEffect::Reload {
                    delay: Duration::ZERO,
                },
            ]
        }
        CartOutcome::Failed(_) => vec![
            CartEffect::Alert(config.messages.remove_failed.clone()),
            CartEffect::Reload {
                delay: Duration::ZERO,
            },
        ],
    }
}
