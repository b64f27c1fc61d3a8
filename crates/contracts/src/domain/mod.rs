pub mod a001_cart;
pub mod common;
