//! Port definitions (interfaces)
//!
//! Ports define the boundaries between the conformance engine and the outside
//! world. The infrastructure layer implements the transport; the binary
//! implements the reporter.

mod reporter;
mod transport;

pub use reporter::Reporter;
pub use transport::{NetworkFailure, Transport};
