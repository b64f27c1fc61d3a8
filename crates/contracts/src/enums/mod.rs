pub mod quantity_action;

pub use quantity_action::QuantityAction;
