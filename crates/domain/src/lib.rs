//! Taskcheck Domain - Core conformance types
//!
//! This crate defines what the conformance client sends, what it receives
//! and what a correct response looks like. All types here are pure Rust with
//! no I/O dependencies.

pub mod error;
pub mod outcome;
pub mod request;
pub mod response;
pub mod task;
pub mod testing;
pub mod verify;

pub use error::{DomainError, DomainResult};
pub use outcome::{FailureReason, Outcome, Verdict};
pub use request::{HttpMethod, RequestSpec};
pub use response::NormalizedResponse;
pub use task::{
    MAX_DESCRIPTION_CHARS, MAX_TITLE_CHARS, MIN_TITLE_CHARS, TaskFixture, TaskId, TaskPatch,
    item_path, parse_deadline,
};
pub use testing::{Check, Contract, TASK_FIELDS};
pub use verify::{verify_allow, verify_ids, verify_order};
