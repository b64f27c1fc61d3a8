//! Wire contracts shared between the storefront backend and the cart client.

pub mod domain;
pub mod enums;
