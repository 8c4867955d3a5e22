//! Task fixtures
//!
//! The literal task objects the harness submits, and the deadline parsing
//! shared by the ordering verifier and the reference server.

use chrono::{DateTime, FixedOffset, NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

use crate::error::{DomainError, DomainResult};

/// Server-assigned task identifier.
pub type TaskId = i64;

/// Longest title the server must accept.
pub const MAX_TITLE_CHARS: usize = 64;

/// Shortest title the server must accept.
pub const MIN_TITLE_CHARS: usize = 4;

/// Longest description the server must accept.
pub const MAX_DESCRIPTION_CHARS: usize = 255;

/// A complete task as submitted by POST and PUT.
///
/// The id is not part of the wire body; it is attached once a create call
/// returns one.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskFixture {
    /// Task title
    pub title: String,
    /// Task description (may be empty)
    pub description: String,
    /// Deadline as a date-time string
    pub deadline: String,
    /// Id assigned by the server under test
    #[serde(skip)]
    pub id: Option<TaskId>,
}

impl TaskFixture {
    /// Creates a fixture without an id.
    #[must_use]
    pub fn new(
        title: impl Into<String>,
        description: impl Into<String>,
        deadline: impl Into<String>,
    ) -> Self {
        Self {
            title: title.into(),
            description: description.into(),
            deadline: deadline.into(),
            id: None,
        }
    }

    /// Records the id returned by a create call.
    pub fn assign_id(&mut self, id: Option<TaskId>) {
        self.id = id;
    }

    /// Returns the `(field, value)` pairs this fixture submits.
    #[must_use]
    pub fn fields(&self) -> [(&'static str, &str); 3] {
        [
            ("title", self.title.as_str()),
            ("description", self.description.as_str()),
            ("deadline", self.deadline.as_str()),
        ]
    }

    /// Path of this task's item resource.
    ///
    /// A fixture whose create call failed renders as `/tasks/null.json`, so
    /// the dependent scenario still runs and fails on its own checks.
    #[must_use]
    pub fn item_path(&self) -> String {
        item_path(self.id)
    }
}

/// Path of a task item resource.
#[must_use]
pub fn item_path(id: Option<TaskId>) -> String {
    id.map_or_else(
        || "/tasks/null.json".to_string(),
        |id| format!("/tasks/{id}.json"),
    )
}

/// A partial task as submitted by PATCH. Absent fields are not serialized.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskPatch {
    /// New title
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    /// New description
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// New deadline
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub deadline: Option<String>,
}

impl TaskPatch {
    /// Creates a patch that only changes the title.
    #[must_use]
    pub fn title(title: impl Into<String>) -> Self {
        Self {
            title: Some(title.into()),
            ..Self::default()
        }
    }

    /// Returns the `(field, value)` pairs this patch submits.
    #[must_use]
    pub fn fields(&self) -> Vec<(&'static str, &str)> {
        [
            ("title", self.title.as_deref()),
            ("description", self.description.as_deref()),
            ("deadline", self.deadline.as_deref()),
        ]
        .into_iter()
        .filter_map(|(field, value)| value.map(|v| (field, v)))
        .collect()
    }
}

/// Parses a deadline string into an instant.
///
/// Accepts RFC 3339, RFC 2822, naive `YYYY-MM-DDTHH:MM:SS[.fff]` and plain
/// `YYYY-MM-DD`. Naive values are taken as UTC.
///
/// # Errors
///
/// Returns `DomainError::InvalidDeadline` if none of the formats match.
pub fn parse_deadline(value: &str) -> DomainResult<DateTime<FixedOffset>> {
    let value = value.trim();
    if let Ok(parsed) = DateTime::parse_from_rfc3339(value) {
        return Ok(parsed);
    }
    if let Ok(parsed) = DateTime::parse_from_rfc2822(value) {
        return Ok(parsed);
    }
    let naive = NaiveDateTime::parse_from_str(value, "%Y-%m-%dT%H:%M:%S%.f")
        .or_else(|_| NaiveDateTime::parse_from_str(value, "%Y-%m-%d %H:%M:%S%.f"))
        .ok()
        .or_else(|| {
            NaiveDate::parse_from_str(value, "%Y-%m-%d")
                .ok()
                .and_then(|date| date.and_hms_opt(0, 0, 0))
        })
        .ok_or_else(|| DomainError::InvalidDeadline(value.to_string()))?;
    Ok(naive.and_utc().fixed_offset())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn test_fixture_serializes_without_id() {
        let mut task = TaskFixture::new("Task1", "Task description 1", "2015-09-11T09:00:00+01:00");
        task.assign_id(Some(7));
        assert_eq!(
            serde_json::to_value(&task).unwrap(),
            json!({
                "title": "Task1",
                "description": "Task description 1",
                "deadline": "2015-09-11T09:00:00+01:00"
            })
        );
    }

    #[test]
    fn test_item_path() {
        let mut task = TaskFixture::new("Task1", "", "2015-09-11");
        assert_eq!(task.item_path(), "/tasks/null.json");
        task.assign_id(Some(42));
        assert_eq!(task.item_path(), "/tasks/42.json");
    }

    #[test]
    fn test_fixture_fields() {
        let task = TaskFixture::new("Task3", "", "2015-09-13T09:00:00+01:00");
        assert_eq!(
            task.fields(),
            [
                ("title", "Task3"),
                ("description", ""),
                ("deadline", "2015-09-13T09:00:00+01:00")
            ]
        );
    }

    #[test]
    fn test_patch_omits_absent_fields() {
        let patch = TaskPatch::title("Task2.1");
        assert_eq!(serde_json::to_value(&patch).unwrap(), json!({"title": "Task2.1"}));
        assert_eq!(patch.fields(), vec![("title", "Task2.1")]);
    }

    #[test]
    fn test_parse_rfc3339_deadline() {
        let a = parse_deadline("2015-09-11T09:00:00+01:00").unwrap();
        let b = parse_deadline("2015-09-11T08:00:00Z").unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_parse_naive_deadlines() {
        let full = parse_deadline("2015-09-11T00:00:00").unwrap();
        let date = parse_deadline("2015-09-11").unwrap();
        assert_eq!(full, date);
    }

    #[test]
    fn test_parse_rejects_garbage() {
        assert!(matches!(
            parse_deadline("2015/09/11"),
            Err(DomainError::InvalidDeadline(_))
        ));
        assert!(parse_deadline("").is_err());
    }
}
