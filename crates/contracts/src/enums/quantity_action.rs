use serde::{Deserialize, Serialize};

/// Direction of a quantity step on a cart line
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum QuantityAction {
    Increase,
    Decrease,
}

impl QuantityAction {
    /// Value sent in the `action` form field and used as the button name
    pub fn code(&self) -> &'static str {
        match self {
            QuantityAction::Increase => "increase",
            QuantityAction::Decrease => "decrease",
        }
    }

    pub fn from_code(code: &str) -> Option<Self> {
        match code {
            "increase" => Some(QuantityAction::Increase),
            "decrease" => Some(QuantityAction::Decrease),
            _ => None,
        }
    }
}

impl std::fmt::Display for QuantityAction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.code())
    }
}
