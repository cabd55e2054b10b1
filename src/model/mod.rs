pub mod audit;
pub mod common;
pub mod election;
