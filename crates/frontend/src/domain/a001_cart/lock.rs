use contracts::domain::a001_cart::ProductId;
use contracts::enums::QuantityAction;
use std::cell::RefCell;
use std::collections::HashSet;

/// A control that can be activated by the user
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ControlId {
    Quantity(ProductId, QuantityAction),
    Remove(ProductId),
    ClearCart,
}

/// Per-control debounce: `Unlocked -> Locked -> Unlocked`, nothing else.
///
/// Different controls never block each other.
#[derive(Debug, Default)]
pub struct ControlLocks {
    locked: RefCell<HashSet<ControlId>>,
}

impl ControlLocks {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns false when the control is already locked
    pub fn try_lock(&self, control: &ControlId) -> bool {
        self.locked.borrow_mut().insert(control.clone())
    }

    pub fn unlock(&self, control: &ControlId) {
        self.locked.borrow_mut().remove(control);
    }

    pub fn is_locked(&self, control: &ControlId) -> bool {
        self.locked.borrow().contains(control)
    }
}
