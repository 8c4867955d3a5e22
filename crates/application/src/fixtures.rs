//! Literal test data for the scenario script.

use serde_json::{Value, json};
use taskcheck_domain::{TaskFixture, TaskPatch};

const DEADLINE_1: &str = "2015-09-11T09:00:00+01:00";
const DEADLINE_2: &str = "2015-09-12T09:00:00+01:00";
const DEADLINE_3: &str = "2015-09-13T09:00:00+01:00";

const LONG_DESCRIPTION_SENTENCE: &str =
    "A very long task description that repeats in order to be bigger than 255 characters.";

/// The first valid task; the oldest deadline.
#[must_use]
pub fn task1() -> TaskFixture {
    TaskFixture::new("Task1", "Task description 1", DEADLINE_1)
}

/// The second valid task.
#[must_use]
pub fn task2() -> TaskFixture {
    TaskFixture::new("Task2", "Task description 2", DEADLINE_2)
}

/// The third valid task, with an empty description; the newest deadline.
#[must_use]
pub fn task3() -> TaskFixture {
    TaskFixture::new("Task3", "", DEADLINE_3)
}

/// Full replacement submitted for the third task.
#[must_use]
pub fn task3_replacement() -> TaskFixture {
    TaskFixture::new("Task3.1", "", DEADLINE_3)
}

/// Partial update submitted for the second task.
#[must_use]
pub fn task2_patch() -> TaskPatch {
    TaskPatch::title("Task2.1")
}

/// Create bodies a server must refuse with 400 and one error message.
#[must_use]
pub fn invalid_creates() -> Vec<Value> {
    let long_description = [LONG_DESCRIPTION_SENTENCE; 4].join(" ");
    vec![
        json!({"title": "Tas", "description": "Task description 1", "deadline": DEADLINE_1}),
        json!({
            "title": "A very long title that doesn't repeat in order to be bigger than 64 characters.",
            "description": "Task description 1",
            "deadline": DEADLINE_1
        }),
        json!({"title": "Task1", "deadline": DEADLINE_1}),
        json!({"title": "Task1", "description": long_description, "deadline": DEADLINE_1}),
        json!({"title": "Task1", "description": "Task description 1", "deadline": "2015/09/11"}),
        json!({"title": "Task1", "description": "Task description 1", "deadline": ""}),
    ]
}

/// Replacement body without a description.
#[must_use]
pub fn replacement_missing_field() -> Value {
    json!({"title": "Task3.1", "deadline": DEADLINE_3})
}

/// Replacement body with a one-character title.
#[must_use]
pub fn replacement_invalid_field() -> Value {
    json!({"title": "T", "description": "", "deadline": DEADLINE_3})
}

/// Partial update with a one-character title.
#[must_use]
pub fn patch_invalid_field() -> Value {
    json!({"title": "T"})
}
