pub mod aggregate;
pub mod forms;
pub mod response;

pub use aggregate::{CartLineView, CartSummary, ProductId, SummaryPatch};
pub use forms::{AddToCartForm, AdjustQuantityForm, CSRF_FORM_FIELD};
pub use response::{CartMutationResponse, CartValidateResponse, REMOVED_MESSAGE};
