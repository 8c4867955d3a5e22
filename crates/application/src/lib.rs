//! Taskcheck Application - Assertion library and scenario harness
//!
//! This crate defines the application layer with:
//! - Port traits (transport and reporter)
//! - Contract evaluation and per-scenario assertion routines
//! - The scenario script and its tally

pub mod assertions;
pub mod config;
pub mod error;
pub mod fixtures;
pub mod ports;
pub mod script;
pub mod tally;

#[cfg(test)]
mod test_support;

pub use assertions::{CheckRunner, ScenarioRunner};
pub use config::{CheckerConfig, MAX_REDIRECTS, REQUEST_TIMEOUT};
pub use error::{ApplicationError, ApplicationResult};
pub use ports::{NetworkFailure, Reporter, Transport};
pub use script::run_script;
pub use tally::Tally;
