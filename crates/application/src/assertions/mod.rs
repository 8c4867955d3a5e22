//! Assertion library
//!
//! [`CheckRunner`] evaluates contracts; [`ScenarioRunner`] pairs each
//! scenario kind with its request and contract.

mod runner;
mod scenarios;

pub use runner::CheckRunner;
pub use scenarios::{COLLECTION_METHODS, ITEM_METHODS, ScenarioRunner, TASKS_PATH};
