pub mod api;
pub mod controller;
pub mod error;
pub mod lock;
pub mod ports;
pub mod reconcile;
pub mod state;
pub mod ui;

#[cfg(test)]
mod test_support;

pub use controller::{AddItemRequest, CartSyncController, LineContext};
pub use error::{CartError, CartOutcome};
pub use state::CartState;
