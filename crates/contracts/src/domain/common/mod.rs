//! Value types shared by all cart contracts

pub mod money;

pub use money::Money;
