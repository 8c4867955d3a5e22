//! Scenario outcomes and failure reasons

use thiserror::Error;

use crate::task::TaskId;

/// Why a scenario failed.
///
/// Every check in a contract has its own variant, so a missing field and a
/// field with the wrong value are always reported differently.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FailureReason {
    /// The request never produced a response.
    #[error("HTTP request didn't succeed")]
    RequestFailed,

    /// Unexpected status code.
    #[error("Status code {actual} != {expected}")]
    StatusMismatch {
        /// Expected status
        expected: u16,
        /// Status received
        actual: u16,
    },

    /// A required header is absent.
    #[error("{name} value is undefined")]
    HeaderMissing {
        /// Header name
        name: &'static str,
    },

    /// A counting header does not hold an integer.
    #[error("{name} value '{value}' is not an integer")]
    HeaderNotInteger {
        /// Header name
        name: &'static str,
        /// Raw header value
        value: String,
    },

    /// A counting header holds the wrong number.
    #[error("{name} value {actual} != {expected}")]
    HeaderCountMismatch {
        /// Header name
        name: &'static str,
        /// Expected count
        expected: u64,
        /// Count received
        actual: u64,
    },

    /// The `Allow` method list differs from the expected set.
    #[error("Allow value is incorrect. Value={value}")]
    AllowMismatch {
        /// Raw header value
        value: String,
    },

    /// The body could not be decoded as JSON at all.
    #[error("Response body is not valid JSON. Body={body}")]
    InvalidJson {
        /// Body text
        body: String,
    },

    /// The body is JSON but not an object.
    #[error("Response body is not a JSON object. Body={body}")]
    NotAnObject {
        /// Body text
        body: String,
    },

    /// The body is JSON but not an array.
    #[error("Response body is not an array. Body={body}")]
    NotAnArray {
        /// Body text
        body: String,
    },

    /// The body array has the wrong number of elements.
    #[error("JSON array length mismatch {actual} != {expected}")]
    LengthMismatch {
        /// Expected length
        expected: usize,
        /// Length received
        actual: usize,
    },

    /// The task array is not sorted by deadline, newest first.
    #[error("Task array out of order")]
    OutOfOrder,

    /// The task array holds the wrong ids or holds them in the wrong order.
    #[error("Task array content not as expected. Ids={actual:?} != {expected:?}")]
    IdsMismatch {
        /// Expected ids
        expected: Vec<TaskId>,
        /// Ids received, `None` where a task had no integer id
        actual: Vec<Option<TaskId>>,
    },

    /// A required body field is absent.
    #[error("{} property doesn't exist in response", capitalize(.field))]
    MissingField {
        /// Field name
        field: &'static str,
    },

    /// A body field has the wrong value.
    #[error("{} doesn't match '{actual}' != '{expected}'", capitalize(.field))]
    FieldMismatch {
        /// Field name
        field: &'static str,
        /// Expected value, JSON-encoded
        expected: String,
        /// Value received, JSON-encoded
        actual: String,
    },

    /// A body field that must be an array is something else.
    #[error("{field} is not an array. {field}={value}")]
    FieldNotAnArray {
        /// Field name
        field: &'static str,
        /// Value received, JSON-encoded
        value: String,
    },

    /// The error message list has the wrong length.
    #[error("Unexpected number of errors. {actual} != {expected}")]
    MessageCountMismatch {
        /// Expected number of messages
        expected: usize,
        /// Number of messages received
        actual: usize,
    },

    /// A created task came back with an id that is not an integer.
    #[error("Id property is not an integer. Id={value}")]
    IdNotInteger {
        /// Value received, JSON-encoded
        value: String,
    },

    /// A deleted task is still served.
    #[error("GET request found task (status {status})")]
    StillPresent {
        /// Status of the follow-up GET
        status: u16,
    },
}

fn capitalize(field: &str) -> String {
    let mut chars = field.chars();
    chars.next().map_or_else(String::new, |first| {
        first.to_uppercase().chain(chars).collect()
    })
}

/// Pass or fail verdict of one scenario.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Verdict {
    /// Every check held.
    Passed,
    /// The first check that did not hold.
    Failed(FailureReason),
}

/// Result of one scenario.
///
/// Exactly one of [`Outcome::failed`] and [`Outcome::succeeded`] is 1. A
/// value is only ever extracted from a passing scenario.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Outcome {
    verdict: Verdict,
    extracted: Option<TaskId>,
}

impl Outcome {
    /// A passing outcome with nothing extracted.
    #[must_use]
    pub const fn passed() -> Self {
        Self {
            verdict: Verdict::Passed,
            extracted: None,
        }
    }

    /// A passing outcome carrying a server-assigned id.
    #[must_use]
    pub const fn passed_with(id: TaskId) -> Self {
        Self {
            verdict: Verdict::Passed,
            extracted: Some(id),
        }
    }

    /// A failing outcome.
    #[must_use]
    pub const fn failed_with(reason: FailureReason) -> Self {
        Self {
            verdict: Verdict::Failed(reason),
            extracted: None,
        }
    }

    /// Returns the verdict.
    #[must_use]
    pub const fn verdict(&self) -> &Verdict {
        &self.verdict
    }

    /// Returns the failure reason, if the scenario failed.
    #[must_use]
    pub const fn reason(&self) -> Option<&FailureReason> {
        match &self.verdict {
            Verdict::Passed => None,
            Verdict::Failed(reason) => Some(reason),
        }
    }

    /// Returns whether the scenario passed.
    #[must_use]
    pub const fn is_success(&self) -> bool {
        matches!(self.verdict, Verdict::Passed)
    }

    /// 1 if the scenario failed, 0 otherwise.
    #[must_use]
    pub const fn failed(&self) -> u32 {
        if self.is_success() { 0 } else { 1 }
    }

    /// 1 if the scenario passed, 0 otherwise.
    #[must_use]
    pub const fn succeeded(&self) -> u32 {
        if self.is_success() { 1 } else { 0 }
    }

    /// Returns the extracted id, if any.
    #[must_use]
    pub const fn extracted(&self) -> Option<TaskId> {
        self.extracted
    }
}

impl From<Result<(), FailureReason>> for Outcome {
    fn from(result: Result<(), FailureReason>) -> Self {
        match result {
            Ok(()) => Self::passed(),
            Err(reason) => Self::failed_with(reason),
        }
    }
}

impl From<Result<TaskId, FailureReason>> for Outcome {
    fn from(result: Result<TaskId, FailureReason>) -> Self {
        match result {
            Ok(id) => Self::passed_with(id),
            Err(reason) => Self::failed_with(reason),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_counts_are_exclusive() {
        let outcomes = [
            Outcome::passed(),
            Outcome::passed_with(3),
            Outcome::failed_with(FailureReason::RequestFailed),
            Outcome::failed_with(FailureReason::OutOfOrder),
        ];
        for outcome in outcomes {
            assert_eq!(outcome.failed() + outcome.succeeded(), 1);
        }
    }

    #[test]
    fn test_failed_outcome_extracts_nothing() {
        let outcome = Outcome::from(Err::<TaskId, _>(FailureReason::RequestFailed));
        assert_eq!(outcome.extracted(), None);
        assert_eq!(outcome.reason(), Some(&FailureReason::RequestFailed));
        assert!(!outcome.is_success());
    }

    #[test]
    fn test_passed_outcome_keeps_id() {
        let outcome = Outcome::from(Ok::<TaskId, FailureReason>(12));
        assert_eq!(outcome.extracted(), Some(12));
        assert_eq!(outcome.verdict(), &Verdict::Passed);
    }

    #[test]
    fn test_reason_messages() {
        assert_eq!(
            FailureReason::StatusMismatch {
                expected: 200,
                actual: 404
            }
            .to_string(),
            "Status code 404 != 200"
        );
        assert_eq!(
            FailureReason::HeaderMissing { name: "X-Count" }.to_string(),
            "X-Count value is undefined"
        );
        assert_eq!(
            FailureReason::MissingField { field: "errorCode" }.to_string(),
            "ErrorCode property doesn't exist in response"
        );
        assert_eq!(
            FailureReason::FieldMismatch {
                field: "title",
                expected: "\"Task1\"".to_string(),
                actual: "\"Tas\"".to_string(),
            }
            .to_string(),
            "Title doesn't match '\"Tas\"' != '\"Task1\"'"
        );
    }

    #[test]
    fn test_capitalize() {
        assert_eq!(capitalize("id"), "Id");
        assert_eq!(capitalize("errorMessages"), "ErrorMessages");
        assert_eq!(capitalize(""), "");
    }
}
