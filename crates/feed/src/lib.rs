pub mod adapter;
pub mod yahoo;
