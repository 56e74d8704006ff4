pub mod common;
pub mod config;
pub mod market;
pub mod render;
pub mod series;
pub mod simulation;
