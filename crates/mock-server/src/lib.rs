//! Reference tasks server
//!
//! An in-memory implementation of the tasks resource that answers every
//! scenario the way a compliant server must. It backs the end-to-end tests
//! of the conformance client.

use std::collections::BTreeMap;
use std::sync::Arc;

use axum::{
    Json, Router,
    body::Bytes,
    extract::{Path, Query, State},
    http::{HeaderName, StatusCode},
    response::{IntoResponse, Response},
    routing::get,
};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use taskcheck_domain::{
    MAX_DESCRIPTION_CHARS, MAX_TITLE_CHARS, MIN_TITLE_CHARS, parse_deadline,
};
use tokio::{net::TcpListener, sync::RwLock};

const X_COUNT: HeaderName = HeaderName::from_static("x-count");

const COLLECTION_ALLOW: &str = "GET,HEAD,OPTIONS,POST";
const ITEM_ALLOW: &str = "OPTIONS,GET,PUT,PATCH,DELETE";

const DEFAULT_PAGE_SIZE: usize = 10;

const TITLE_MESSAGE: &str = "Title must be a string between 4 and 64 characters";
const DESCRIPTION_MESSAGE: &str = "Description must be a string between 0 and 255 characters";
const DEADLINE_MESSAGE: &str = "Date must be ISO8601 formatted string!";

/// A stored task.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    /// Server-assigned id
    pub id: i64,
    /// Title, 4 to 64 characters
    pub title: String,
    /// Description, at most 255 characters
    pub description: String,
    /// ISO 8601 deadline
    pub deadline: String,
}

/// Error body returned for every refused request.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiError {
    /// HTTP status repeated in the body
    pub error_code: u16,
    /// One entry per problem found
    pub error_messages: Vec<String>,
}

impl ApiError {
    fn new(status: StatusCode, messages: Vec<String>) -> Self {
        Self {
            error_code: status.as_u16(),
            error_messages: messages,
        }
    }

    fn not_found(id: &str) -> Self {
        Self::new(
            StatusCode::NOT_FOUND,
            vec![format!("Task {id} not found.")],
        )
    }

    fn invalid(messages: Vec<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, messages)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = StatusCode::from_u16(self.error_code).unwrap_or(StatusCode::BAD_REQUEST);
        (status, Json(self)).into_response()
    }
}

/// Task fields after validation.
#[derive(Clone, Debug, PartialEq, Eq)]
struct Draft {
    title: String,
    description: String,
    deadline: String,
}

impl Draft {
    fn into_task(self, id: i64) -> Task {
        Task {
            id,
            title: self.title,
            description: self.description,
            deadline: self.deadline,
        }
    }
}

/// In-memory task table.
#[derive(Debug, Default)]
pub struct Store {
    tasks: BTreeMap<i64, Task>,
    next_id: i64,
}

impl Store {
    fn insert(&mut self, draft: Draft) -> Task {
        self.next_id += 1;
        let task = draft.into_task(self.next_id);
        self.tasks.insert(task.id, task.clone());
        task
    }

    /// Tasks matching `query`, newest deadline first.
    fn matching(&self, query: &str) -> Vec<&Task> {
        let needle = query.to_lowercase();
        let mut tasks: Vec<&Task> = self
            .tasks
            .values()
            .filter(|task| {
                needle.is_empty()
                    || task.title.to_lowercase().contains(&needle)
                    || task.description.to_lowercase().contains(&needle)
            })
            .collect();
        tasks.sort_by(|a, b| {
            parse_deadline(&b.deadline)
                .ok()
                .cmp(&parse_deadline(&a.deadline).ok())
                .then(a.id.cmp(&b.id))
        });
        tasks
    }
}

/// Shared server state.
pub type Db = Arc<RwLock<Store>>;

/// Query parameters of the collection GET. Kept as strings so junk values
/// fall back to the defaults instead of failing extraction.
#[derive(Debug, Default, Deserialize)]
pub struct ListParams {
    q: Option<String>,
    page: Option<String>,
    #[serde(rename = "pageSize")]
    page_size: Option<String>,
}

/// Builds the router over an empty store.
pub fn app() -> Router {
    let db: Db = Arc::new(RwLock::new(Store::default()));
    Router::new()
        .route(
            "/tasks.json",
            get(list_tasks)
                .head(count_tasks)
                .options(collection_options)
                .post(create_task),
        )
        .route(
            "/tasks/{file}",
            get(get_task)
                .options(item_options)
                .put(replace_task)
                .patch(patch_task)
                .delete(delete_task),
        )
        .with_state(db)
}

/// Serves the router on `listener` until the process exits.
///
/// # Errors
///
/// Returns the I/O error that stopped the server.
pub async fn run(listener: TcpListener) -> Result<(), std::io::Error> {
    axum::serve(listener, app()).await
}

async fn count_tasks(State(db): State<Db>) -> impl IntoResponse {
    let count = db.read().await.tasks.len();
    (StatusCode::NO_CONTENT, [(X_COUNT, count.to_string())])
}

async fn collection_options() -> impl IntoResponse {
    (StatusCode::NO_CONTENT, [("allow", COLLECTION_ALLOW)])
}

async fn list_tasks(State(db): State<Db>, Query(params): Query<ListParams>) -> Response {
    let store = db.read().await;
    let matching = store.matching(params.q.as_deref().unwrap_or_default());
    let page = positive(params.page.as_deref()).unwrap_or(1);
    let page_size = positive(params.page_size.as_deref()).unwrap_or(DEFAULT_PAGE_SIZE);
    let tasks: Vec<Task> = matching
        .iter()
        .skip((page - 1).saturating_mul(page_size))
        .take(page_size)
        .map(|task| (*task).clone())
        .collect();
    (
        StatusCode::OK,
        [(X_COUNT, matching.len().to_string())],
        Json(tasks),
    )
        .into_response()
}

async fn create_task(State(db): State<Db>, body: Bytes) -> Result<Json<Task>, ApiError> {
    let draft = validate(&decode(&body)).map_err(ApiError::invalid)?;
    Ok(Json(db.write().await.insert(draft)))
}

async fn item_options(State(db): State<Db>, Path(file): Path<String>) -> Response {
    let store = db.read().await;
    match task_id(&file).filter(|id| store.tasks.contains_key(id)) {
        Some(_) => (StatusCode::NO_CONTENT, [("allow", ITEM_ALLOW)]).into_response(),
        None => ApiError::not_found(id_label(&file)).into_response(),
    }
}

async fn get_task(State(db): State<Db>, Path(file): Path<String>) -> Result<Json<Task>, ApiError> {
    let store = db.read().await;
    task_id(&file)
        .and_then(|id| store.tasks.get(&id))
        .cloned()
        .map(Json)
        .ok_or_else(|| ApiError::not_found(id_label(&file)))
}

async fn replace_task(
    State(db): State<Db>,
    Path(file): Path<String>,
    body: Bytes,
) -> Result<Json<Task>, ApiError> {
    let draft = validate(&decode(&body)).map_err(ApiError::invalid)?;
    let mut store = db.write().await;
    let slot = task_id(&file)
        .and_then(|id| store.tasks.get_mut(&id))
        .ok_or_else(|| ApiError::not_found(id_label(&file)))?;
    *slot = draft.into_task(slot.id);
    Ok(Json(slot.clone()))
}

async fn patch_task(
    State(db): State<Db>,
    Path(file): Path<String>,
    body: Bytes,
) -> Result<Json<Task>, ApiError> {
    let mut store = db.write().await;
    let slot = task_id(&file)
        .and_then(|id| store.tasks.get_mut(&id))
        .ok_or_else(|| ApiError::not_found(id_label(&file)))?;
    let merged = merge(slot, &decode(&body));
    let draft = validate(&merged).map_err(ApiError::invalid)?;
    *slot = draft.into_task(slot.id);
    Ok(Json(slot.clone()))
}

async fn delete_task(
    State(db): State<Db>,
    Path(file): Path<String>,
) -> Result<Json<Task>, ApiError> {
    let mut store = db.write().await;
    task_id(&file)
        .and_then(|id| store.tasks.remove(&id))
        .map(Json)
        .ok_or_else(|| ApiError::not_found(id_label(&file)))
}

fn id_label(file: &str) -> &str {
    file.strip_suffix(".json").unwrap_or(file)
}

/// Id encoded in an item file name such as `12.json`.
fn task_id(file: &str) -> Option<i64> {
    file.strip_suffix(".json")?.parse().ok()
}

fn positive(raw: Option<&str>) -> Option<usize> {
    raw?.trim().parse().ok().filter(|n: &usize| *n > 0)
}

/// Undecodable bodies are treated as `null`, which fails every field check.
fn decode(body: &[u8]) -> Value {
    serde_json::from_slice(body).unwrap_or(Value::Null)
}

/// Overlays the fields present in `patch` onto `task`.
fn merge(task: &Task, patch: &Value) -> Value {
    let mut merged = Map::new();
    merged.insert("title".into(), Value::from(task.title.as_str()));
    merged.insert("description".into(), Value::from(task.description.as_str()));
    merged.insert("deadline".into(), Value::from(task.deadline.as_str()));
    if let Some(fields) = patch.as_object() {
        for key in ["title", "description", "deadline"] {
            if let Some(value) = fields.get(key).filter(|v| !v.is_null()) {
                merged.insert(key.into(), value.clone());
            }
        }
    }
    Value::Object(merged)
}

fn validate(body: &Value) -> Result<Draft, Vec<String>> {
    let text = |field: &str| body.get(field).and_then(Value::as_str);
    let mut messages = Vec::new();

    let title = text("title")
        .filter(|t| (MIN_TITLE_CHARS..=MAX_TITLE_CHARS).contains(&t.chars().count()));
    if title.is_none() {
        messages.push(TITLE_MESSAGE.to_string());
    }
    let description =
        text("description").filter(|d| d.chars().count() <= MAX_DESCRIPTION_CHARS);
    if description.is_none() {
        messages.push(DESCRIPTION_MESSAGE.to_string());
    }
    let deadline = text("deadline").filter(|d| parse_deadline(d).is_ok());
    if deadline.is_none() {
        messages.push(DEADLINE_MESSAGE.to_string());
    }

    match (title, description, deadline) {
        (Some(title), Some(description), Some(deadline)) => Ok(Draft {
            title: title.to_string(),
            description: description.to_string(),
            deadline: deadline.to_string(),
        }),
        _ => Err(messages),
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn draft(title: &str, description: &str, deadline: &str) -> Draft {
        Draft {
            title: title.to_string(),
            description: description.to_string(),
            deadline: deadline.to_string(),
        }
    }

    #[test]
    fn test_validate_accepts_empty_description() {
        let body = json!({"title": "Task3", "description": "", "deadline": "2015-09-13T09:00:00+01:00"});
        assert_eq!(
            validate(&body),
            Ok(draft("Task3", "", "2015-09-13T09:00:00+01:00"))
        );
    }

    #[test]
    fn test_validate_reports_each_broken_field() {
        assert_eq!(
            validate(&json!({"title": "Tas", "description": "d", "deadline": "2015-09-11"})),
            Err(vec![TITLE_MESSAGE.to_string()])
        );
        assert_eq!(
            validate(&json!({"title": "Task1", "deadline": "2015-09-11"})),
            Err(vec![DESCRIPTION_MESSAGE.to_string()])
        );
        assert_eq!(
            validate(&json!({"title": "Task1", "description": "d", "deadline": "2015/09/11"})),
            Err(vec![DEADLINE_MESSAGE.to_string()])
        );
        assert_eq!(validate(&Value::Null).unwrap_err().len(), 3);
    }

    #[test]
    fn test_title_limits() {
        let body = |title: String| {
            json!({"title": title, "description": "", "deadline": "2015-09-11"})
        };
        assert!(validate(&body("x".repeat(MAX_TITLE_CHARS + 1))).is_err());
        assert!(validate(&body("x".repeat(MAX_TITLE_CHARS))).is_ok());
        assert!(validate(&body("x".repeat(MIN_TITLE_CHARS))).is_ok());
        assert!(validate(&body("x".repeat(MIN_TITLE_CHARS - 1))).is_err());
    }

    #[test]
    fn test_description_limit() {
        let body = |description: String| {
            json!({"title": "Task1", "description": description, "deadline": "2015-09-11"})
        };
        assert!(validate(&body("d".repeat(MAX_DESCRIPTION_CHARS))).is_ok());
        assert_eq!(
            validate(&body("d".repeat(MAX_DESCRIPTION_CHARS + 1))),
            Err(vec![DESCRIPTION_MESSAGE.to_string()])
        );
    }

    #[test]
    fn test_deadline_formats_follow_the_checker() {
        for deadline in ["2015-09-11T09:00:00+01:00", "2015-09-11T09:00:00", "2015-09-11"] {
            let body = json!({"title": "Task1", "description": "", "deadline": deadline});
            assert!(validate(&body).is_ok(), "{deadline} rejected");
            assert!(parse_deadline(deadline).is_ok());
        }
        for deadline in ["2015/09/11", ""] {
            let body = json!({"title": "Task1", "description": "", "deadline": deadline});
            assert_eq!(validate(&body), Err(vec![DEADLINE_MESSAGE.to_string()]));
        }
    }

    #[test]
    fn test_task_id() {
        assert_eq!(task_id("12.json"), Some(12));
        assert_eq!(task_id("null.json"), None);
        assert_eq!(task_id("12"), None);
    }

    #[test]
    fn test_positive() {
        assert_eq!(positive(Some("2")), Some(2));
        assert_eq!(positive(Some("0")), None);
        assert_eq!(positive(Some("abc")), None);
        assert_eq!(positive(None), None);
    }

    #[test]
    fn test_merge_keeps_unpatched_fields() {
        let task = draft("Task2", "Task description 2", "2015-09-12").into_task(2);
        let merged = merge(&task, &json!({"title": "Task2.1"}));
        assert_eq!(
            merged,
            json!({"title": "Task2.1", "description": "Task description 2", "deadline": "2015-09-12"})
        );
    }

    #[test]
    fn test_matching_orders_by_deadline_and_searches() {
        let mut store = Store::default();
        store.insert(draft("Task1", "Task description 1", "2015-09-11T09:00:00+01:00"));
        store.insert(draft("Task2", "Task description 2", "2015-09-12T09:00:00+01:00"));
        store.insert(draft("Task3", "", "2015-09-13T09:00:00+01:00"));

        let ids: Vec<i64> = store.matching("").iter().map(|t| t.id).collect();
        assert_eq!(ids, vec![3, 2, 1]);

        let ids: Vec<i64> = store.matching("TASK1").iter().map(|t| t.id).collect();
        assert_eq!(ids, vec![1]);
    }

    #[test]
    fn test_error_body_shape() {
        let error = ApiError::not_found("88");
        assert_eq!(
            serde_json::to_value(&error).unwrap(),
            json!({"errorCode": 404, "errorMessages": ["Task 88 not found."]})
        );
    }
}
