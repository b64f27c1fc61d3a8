use contracts::domain::a001_cart::CartMutationResponse;
use thiserror::Error;

/// Failures below the business layer: nothing usable came back
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CartError {
    #[error("network error: {0}")]
    Network(String),

    #[error("server responded with status {0}")]
    Status(u16),

    #[error("response is not valid JSON: {0}")]
    Parse(String),

    #[error("failed to encode request: {0}")]
    Encode(String),
}

/// Result of one cart request after the structured-result boundary
#[derive(Debug, Clone, PartialEq)]
pub enum CartOutcome {
    /// `success: true`
    Accepted(CartMutationResponse),
    /// Well-formed response with `success: false`, carrying the server message
    Rejected(Option<String>),
    Failed(CartError),
}

impl From<Result<CartMutationResponse, CartError>> for CartOutcome {
    fn from(result: Result<CartMutationResponse, CartError>) -> Self {
        match result {
            Ok(response) if response.success => CartOutcome::Accepted(response),
            Ok(response) => {
                CartOutcome::Rejected(response.message.filter(|m| !m.trim().is_empty()))
            }
            Err(err) => CartOutcome::Failed(err),
        }
    }
}
