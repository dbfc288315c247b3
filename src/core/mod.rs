pub mod catalog;
pub mod evaluator;
pub mod stats;
