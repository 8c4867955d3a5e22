//! Structural verifiers
//!
//! Pure predicates over decoded response data. None of them perform I/O and
//! none of them panic on malformed input; anything they cannot interpret
//! counts as a violation.

use serde_json::Value;

use crate::request::HttpMethod;
use crate::task::{TaskId, parse_deadline};

/// Checks that tasks are sorted by deadline, newest first.
///
/// Equal deadlines may appear in any order. A task without a parseable
/// `deadline` string makes the sequence unordered.
#[must_use]
pub fn verify_order(tasks: &[Value]) -> bool {
    tasks.windows(2).all(|pair| {
        match (deadline_of(&pair[0]), deadline_of(&pair[1])) {
            (Some(previous), Some(current)) => previous >= current,
            _ => false,
        }
    })
}

fn deadline_of(task: &Value) -> Option<chrono::DateTime<chrono::FixedOffset>> {
    task.get("deadline")
        .and_then(Value::as_str)
        .and_then(|raw| parse_deadline(raw).ok())
}

/// Checks that the task ids, in sequence order, are exactly `ids`.
#[must_use]
pub fn verify_ids(tasks: &[Value], ids: &[TaskId]) -> bool {
    tasks.len() == ids.len()
        && tasks
            .iter()
            .zip(ids)
            .all(|(task, id)| task.get("id").and_then(Value::as_i64) == Some(*id))
}

/// Checks an `Allow` header against the expected method list.
///
/// The header is normalized by dropping one trailing comma, splitting on
/// commas and trimming each token. It matches when it has as many tokens as
/// `expected` and contains every expected method. Tokens are compared
/// case-sensitively.
#[must_use]
pub fn verify_allow(value: Option<&str>, expected: &[HttpMethod]) -> bool {
    let Some(value) = value else {
        return false;
    };
    let tokens = allow_tokens(value);
    tokens.len() == expected.len()
        && expected
            .iter()
            .all(|method| tokens.contains(&method.as_str()))
}

fn allow_tokens(value: &str) -> Vec<&str> {
    let value = value.strip_suffix(',').unwrap_or(value);
    value.split(',').map(str::trim).collect()
}
