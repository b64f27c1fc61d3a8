pub mod a001_cart;
