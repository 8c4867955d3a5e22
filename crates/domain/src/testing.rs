//! Response contracts.
//!
//! A contract is an ordered list of checks. Checks run coarse to fine and
//! evaluation stops at the first one that fails, so a malformed response is
//! reported once instead of as a cascade of field failures.

use serde_json::Value;

use crate::request::HttpMethod;
use crate::task::TaskId;

/// One check a response must pass.
#[derive(Debug, Clone, PartialEq)]
pub enum Check {
    /// Status code equals the given value.
    Status(u16),
    /// Header holds an integer equal to `expected`.
    HeaderCount {
        /// Header name (case-insensitive).
        name: &'static str,
        /// Expected value.
        expected: u64,
    },
    /// `Allow` header lists exactly these methods, in any order.
    Allow(Vec<HttpMethod>),
    /// Body is a JSON object.
    JsonObject,
    /// Body is a JSON array.
    JsonArray,
    /// Body array has exactly this many elements.
    ArrayLength(usize),
    /// Body object has this field.
    FieldPresent(&'static str),
    /// Body object field equals the given value.
    FieldEquals {
        /// Field name.
        field: &'static str,
        /// Expected value.
        expected: Value,
    },
    /// Body object field is an array of exactly `expected` elements.
    FieldArrayLength {
        /// Field name.
        field: &'static str,
        /// Expected length.
        expected: usize,
    },
    /// Body array is sorted by deadline, newest first.
    Ordered,
    /// Body array holds exactly these ids, in this order.
    Ids(Vec<TaskId>),
}

impl Check {
    /// Get a human-readable description of this check.
    #[must_use]
    pub fn description(&self) -> String {
        match self {
            Self::Status(code) => format!("Status code = {code}"),
            Self::HeaderCount { name, expected } => format!("Header '{name}' = {expected}"),
            Self::Allow(methods) => {
                let names: Vec<_> = methods.iter().map(|m| m.as_str()).collect();
                format!("Allow = {}", names.join(","))
            }
            Self::JsonObject => "Body is a JSON object".to_string(),
            Self::JsonArray => "Body is a JSON array".to_string(),
            Self::ArrayLength(len) => format!("Body array length = {len}"),
            Self::FieldPresent(field) => format!("Field '{field}' exists"),
            Self::FieldEquals { field, expected } => format!("Field '{field}' = {expected}"),
            Self::FieldArrayLength { field, expected } => {
                format!("Field '{field}' is an array of length {expected}")
            }
            Self::Ordered => "Tasks ordered by deadline descending".to_string(),
            Self::Ids(ids) => format!("Task ids = {ids:?}"),
        }
    }
}

/// Field set every task object must carry.
pub const TASK_FIELDS: [&str; 4] = ["id", "title", "description", "deadline"];

/// Ordered checks for one scenario.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Contract {
    /// Checks in evaluation order.
    pub checks: Vec<Check>,
}

impl Contract {
    /// Create an empty contract.
    #[must_use]
    pub const fn new() -> Self {
        Self { checks: Vec::new() }
    }

    /// Add a check (builder pattern).
    #[must_use]
    pub fn with_check(mut self, check: Check) -> Self {
        self.checks.push(check);
        self
    }

    /// Add several checks (builder pattern).
    #[must_use]
    pub fn with_checks(mut self, checks: impl IntoIterator<Item = Check>) -> Self {
        self.checks.extend(checks);
        self
    }

    /// Check if the contract is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.checks.is_empty()
    }

    /// Get the number of checks.
    #[must_use]
    pub fn len(&self) -> usize {
        self.checks.len()
    }

    /// HEAD on the collection: 204 and an `X-Count` of `count`.
    #[must_use]
    pub fn head_count(count: u64) -> Self {
        Self::new()
            .with_check(Check::Status(204))
            .with_check(Check::HeaderCount {
                name: "X-Count",
                expected: count,
            })
    }

    /// OPTIONS: 204 and an `Allow` header equal to `methods` as a set.
    #[must_use]
    pub fn allow(methods: &[HttpMethod]) -> Self {
        Self::new()
            .with_check(Check::Status(204))
            .with_check(Check::Allow(methods.to_vec()))
    }

    /// Error response: `status`, and a body echoing it as `errorCode` with
    /// `messages` entries in `errorMessages`.
    #[must_use]
    pub fn error(status: u16, messages: usize) -> Self {
        Self::new().with_checks([
            Check::Status(status),
            Check::JsonObject,
            Check::FieldPresent("errorCode"),
            Check::FieldPresent("errorMessages"),
            Check::FieldEquals {
                field: "errorCode",
                expected: Value::from(status),
            },
            Check::FieldArrayLength {
                field: "errorMessages",
                expected: messages,
            },
        ])
    }

    /// Collection GET: 200, `length` tasks ordered by deadline, `X-Count` of
    /// `count`, and optionally an exact id sequence.
    #[must_use]
    pub fn list(count: u64, length: usize, ids: Option<&[TaskId]>) -> Self {
        let mut contract = Self::new().with_checks([
            Check::Status(200),
            Check::JsonArray,
            Check::ArrayLength(length),
            Check::HeaderCount {
                name: "X-Count",
                expected: count,
            },
        ]);
        if length > 0 {
            contract = contract.with_check(Check::Ordered);
        }
        if let Some(ids) = ids {
            contract = contract.with_check(Check::Ids(ids.to_vec()));
        }
        contract
    }

    /// 200 and a JSON object carrying every task field.
    #[must_use]
    pub fn task_object() -> Self {
        Self::new()
            .with_checks([Check::Status(200), Check::JsonObject])
            .with_checks(TASK_FIELDS.map(Check::FieldPresent))
    }

    /// Add an equality check per `(field, value)` pair.
    #[must_use]
    pub fn with_fields<'a>(self, fields: impl IntoIterator<Item = (&'static str, &'a str)>) -> Self {
        self.with_checks(fields.into_iter().map(|(field, value)| Check::FieldEquals {
            field,
            expected: Value::from(value),
        }))
    }

    /// Add an `id` equality check.
    #[must_use]
    pub fn with_id(self, id: Option<TaskId>) -> Self {
        self.with_check(Check::FieldEquals {
            field: "id",
            expected: id.map_or(Value::Null, Value::from),
        })
    }
}
