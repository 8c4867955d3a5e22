//! Contract runner
//!
//! Evaluates a [`Contract`] against one response, stopping at the first
//! check that fails.

use serde_json::{Map, Value};
use taskcheck_domain::{
    Check, Contract, FailureReason, HttpMethod, NormalizedResponse, TaskId, verify_allow,
    verify_ids, verify_order,
};
use tracing::trace;

/// Runs contracts against responses.
#[derive(Debug, Default, Clone, Copy)]
pub struct CheckRunner;

impl CheckRunner {
    /// Create a new check runner.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }

    /// Run every check of `contract` in order.
    ///
    /// # Errors
    ///
    /// Returns the reason of the first check that does not hold.
    pub fn run(&self, contract: &Contract, response: &NormalizedResponse) -> Result<(), FailureReason> {
        for check in &contract.checks {
            let result = self.run_check(check, response);
            trace!(check = %check.description(), passed = result.is_ok(), "check evaluated");
            result?;
        }
        Ok(())
    }

    /// Run a single check against a response.
    ///
    /// # Errors
    ///
    /// Returns the reason the check does not hold.
    pub fn run_check(&self, check: &Check, response: &NormalizedResponse) -> Result<(), FailureReason> {
        match check {
            Check::Status(expected) => check_status(response, *expected),
            Check::HeaderCount { name, expected } => check_header_count(response, name, *expected),
            Check::Allow(methods) => check_allow(response, methods),
            Check::JsonObject => body_object(response).map(|_| ()),
            Check::JsonArray => body_array(response).map(|_| ()),
            Check::ArrayLength(expected) => check_array_length(response, *expected),
            Check::FieldPresent(field) => field_value(response, field).map(|_| ()),
            Check::FieldEquals { field, expected } => check_field_equals(response, field, expected),
            Check::FieldArrayLength { field, expected } => {
                check_field_array_length(response, field, *expected)
            }
            Check::Ordered => check_ordered(response),
            Check::Ids(ids) => check_ids(response, ids),
        }
    }
}

fn check_status(response: &NormalizedResponse, expected: u16) -> Result<(), FailureReason> {
    let actual = response.status();
    if actual == expected {
        Ok(())
    } else {
        Err(FailureReason::StatusMismatch { expected, actual })
    }
}

fn check_header_count(
    response: &NormalizedResponse,
    name: &'static str,
    expected: u64,
) -> Result<(), FailureReason> {
    let raw = response
        .header(name)
        .ok_or(FailureReason::HeaderMissing { name })?;
    let actual = raw
        .trim()
        .parse::<u64>()
        .map_err(|_| FailureReason::HeaderNotInteger {
            name,
            value: raw.to_string(),
        })?;
    if actual == expected {
        Ok(())
    } else {
        Err(FailureReason::HeaderCountMismatch {
            name,
            expected,
            actual,
        })
    }
}

fn check_allow(response: &NormalizedResponse, methods: &[HttpMethod]) -> Result<(), FailureReason> {
    let value = response
        .header("Allow")
        .ok_or(FailureReason::HeaderMissing { name: "Allow" })?;
    if verify_allow(Some(value), methods) {
        Ok(())
    } else {
        Err(FailureReason::AllowMismatch {
            value: value.to_string(),
        })
    }
}

fn body_json(response: &NormalizedResponse) -> Result<&Value, FailureReason> {
    response.json().ok_or_else(|| FailureReason::InvalidJson {
        body: response.body_text().into_owned(),
    })
}

fn body_object(response: &NormalizedResponse) -> Result<&Map<String, Value>, FailureReason> {
    let json = body_json(response)?;
    json.as_object().ok_or_else(|| FailureReason::NotAnObject {
        body: json.to_string(),
    })
}

fn body_array(response: &NormalizedResponse) -> Result<&Vec<Value>, FailureReason> {
    let json = body_json(response)?;
    json.as_array().ok_or_else(|| FailureReason::NotAnArray {
        body: json.to_string(),
    })
}

fn field_value<'r>(
    response: &'r NormalizedResponse,
    field: &'static str,
) -> Result<&'r Value, FailureReason> {
    body_object(response)?
        .get(field)
        .ok_or(FailureReason::MissingField { field })
}

fn check_array_length(response: &NormalizedResponse, expected: usize) -> Result<(), FailureReason> {
    let actual = body_array(response)?.len();
    if actual == expected {
        Ok(())
    } else {
        Err(FailureReason::LengthMismatch { expected, actual })
    }
}

fn check_field_equals(
    response: &NormalizedResponse,
    field: &'static str,
    expected: &Value,
) -> Result<(), FailureReason> {
    let actual = field_value(response, field)?;
    if actual == expected {
        Ok(())
    } else {
        Err(FailureReason::FieldMismatch {
            field,
            expected: expected.to_string(),
            actual: actual.to_string(),
        })
    }
}

fn check_field_array_length(
    response: &NormalizedResponse,
    field: &'static str,
    expected: usize,
) -> Result<(), FailureReason> {
    let value = field_value(response, field)?;
    let items = value.as_array().ok_or_else(|| FailureReason::FieldNotAnArray {
        field,
        value: value.to_string(),
    })?;
    if items.len() == expected {
        Ok(())
    } else {
        Err(FailureReason::MessageCountMismatch {
            expected,
            actual: items.len(),
        })
    }
}

fn check_ordered(response: &NormalizedResponse) -> Result<(), FailureReason> {
    if verify_order(body_array(response)?) {
        Ok(())
    } else {
        Err(FailureReason::OutOfOrder)
    }
}

fn check_ids(response: &NormalizedResponse, ids: &[TaskId]) -> Result<(), FailureReason> {
    let tasks = body_array(response)?;
    if verify_ids(tasks, ids) {
        Ok(())
    } else {
        Err(FailureReason::IdsMismatch {
            expected: ids.to_vec(),
            actual: tasks
                .iter()
                .map(|task| task.get("id").and_then(Value::as_i64))
                .collect(),
        })
    }
}
