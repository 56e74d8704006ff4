pub mod comparison;
pub mod reel;
pub mod report;
pub mod sampler;
pub mod selection;
pub mod simulator;
pub mod summary;
