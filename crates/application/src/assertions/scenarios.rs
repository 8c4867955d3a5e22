//! Scenario runner
//!
//! One method per scenario kind. Each sends its request through the
//! [`Transport`], applies the scenario's [`Contract`] and returns exactly one
//! [`Outcome`]. Network failures and contract violations both end up as a
//! failed outcome; nothing escapes as an error.

use std::sync::Arc;

use serde::Serialize;
use serde_json::Value;
use taskcheck_domain::{
    Contract, FailureReason, HttpMethod, NormalizedResponse, Outcome, RequestSpec, TaskFixture,
    TaskId, TaskPatch, item_path,
};
use tracing::debug;

use super::CheckRunner;
use crate::ports::Transport;

/// Path of the task collection resource.
pub const TASKS_PATH: &str = "/tasks.json";

/// Methods the collection resource must allow.
pub const COLLECTION_METHODS: [HttpMethod; 4] = [
    HttpMethod::Get,
    HttpMethod::Head,
    HttpMethod::Options,
    HttpMethod::Post,
];

/// Methods an item resource must allow.
pub const ITEM_METHODS: [HttpMethod; 5] = [
    HttpMethod::Get,
    HttpMethod::Options,
    HttpMethod::Put,
    HttpMethod::Patch,
    HttpMethod::Delete,
];

/// Runs scenarios against one server endpoint.
pub struct ScenarioRunner<T: Transport> {
    transport: Arc<T>,
    base: String,
    checks: CheckRunner,
}

impl<T: Transport> ScenarioRunner<T> {
    /// Creates a runner that resolves every path against `base`.
    pub fn new(transport: Arc<T>, base: impl Into<String>) -> Self {
        Self {
            transport,
            base: base.into(),
            checks: CheckRunner::new(),
        }
    }

    /// Returns the endpoint paths are resolved against.
    #[must_use]
    pub fn base(&self) -> &str {
        &self.base
    }

    /// HEAD `path`: 204 with an `X-Count` of `count`.
    pub async fn head_count(&self, path: &str, count: u64) -> Outcome {
        self.verify(HttpMethod::Head.as_str(), path, None, &Contract::head_count(count))
            .await
            .map(drop)
            .into()
    }

    /// OPTIONS `path`: 204 with an `Allow` header equal to `methods` as a set.
    pub async fn options_allow(&self, path: &str, methods: &[HttpMethod]) -> Outcome {
        self.verify(HttpMethod::Options.as_str(), path, None, &Contract::allow(methods))
            .await
            .map(drop)
            .into()
    }

    /// Any method on `path` that must be refused with `status` and
    /// `messages` error messages.
    ///
    /// `method` is taken as a raw name; an unsupported one fails the scenario
    /// without contacting the server.
    pub async fn expect_error(
        &self,
        method: &str,
        path: &str,
        body: Option<&Value>,
        status: u16,
        messages: usize,
    ) -> Outcome {
        self.try_expect_error(method, path, body, status, messages)
            .await
            .into()
    }

    async fn try_expect_error(
        &self,
        method: &str,
        path: &str,
        body: Option<&Value>,
        status: u16,
        messages: usize,
    ) -> Result<(), FailureReason> {
        let body = body.map(encode).transpose()?;
        self.verify(method, path, body, &Contract::error(status, messages))
            .await?;
        Ok(())
    }

    /// GET a collection `path`: `length` tasks in deadline order, a total of
    /// `count` in `X-Count`, and optionally exactly `ids`.
    pub async fn list(
        &self,
        path: &str,
        count: u64,
        length: usize,
        ids: Option<&[TaskId]>,
    ) -> Outcome {
        self.verify(
            HttpMethod::Get.as_str(),
            path,
            None,
            &Contract::list(count, length, ids),
        )
        .await
        .map(drop)
        .into()
    }

    /// GET one task by id.
    pub async fn fetch(&self, id: Option<TaskId>) -> Outcome {
        let contract = Contract::task_object().with_id(id);
        self.verify(HttpMethod::Get.as_str(), &item_path(id), None, &contract)
            .await
            .map(drop)
            .into()
    }

    /// POST `task` to the collection. A passing outcome carries the new id.
    pub async fn create(&self, task: &TaskFixture) -> Outcome {
        self.try_create(task).await.into()
    }

    async fn try_create(&self, task: &TaskFixture) -> Result<TaskId, FailureReason> {
        let contract = Contract::task_object().with_fields(task.fields());
        let body = encode(task)?;
        let response = self
            .verify(HttpMethod::Post.as_str(), TASKS_PATH, Some(body), &contract)
            .await?;
        let id = response.json().and_then(|json| json.get("id"));
        id.and_then(Value::as_i64)
            .ok_or_else(|| FailureReason::IdNotInteger {
                value: id.map_or_else(|| Value::Null.to_string(), Value::to_string),
            })
    }

    /// PUT `task` over the task with `id`.
    pub async fn replace(&self, task: &TaskFixture, id: Option<TaskId>) -> Outcome {
        self.try_replace(task, id).await.into()
    }

    async fn try_replace(&self, task: &TaskFixture, id: Option<TaskId>) -> Result<(), FailureReason> {
        let contract = Contract::task_object()
            .with_fields(task.fields())
            .with_id(id);
        let body = encode(task)?;
        self.verify(HttpMethod::Put.as_str(), &item_path(id), Some(body), &contract)
            .await?;
        Ok(())
    }

    /// PATCH the task with `id`. Only the submitted fields are compared.
    pub async fn patch(&self, patch: &TaskPatch, id: Option<TaskId>) -> Outcome {
        self.try_patch(patch, id).await.into()
    }

    async fn try_patch(&self, patch: &TaskPatch, id: Option<TaskId>) -> Result<(), FailureReason> {
        let contract = Contract::task_object()
            .with_fields(patch.fields())
            .with_id(id);
        let body = encode(patch)?;
        self.verify(HttpMethod::Patch.as_str(), &item_path(id), Some(body), &contract)
            .await?;
        Ok(())
    }

    /// DELETE the task with `id`, then confirm a GET on it returns 404.
    pub async fn delete_and_confirm(&self, id: Option<TaskId>) -> Outcome {
        self.try_delete(id).await.into()
    }

    async fn try_delete(&self, id: Option<TaskId>) -> Result<(), FailureReason> {
        let path = item_path(id);
        let contract = Contract::task_object().with_id(id);
        self.verify(HttpMethod::Delete.as_str(), &path, None, &contract)
            .await?;

        let status = self
            .dispatch(HttpMethod::Get.as_str(), &path, None)
            .await?
            .status();
        if status == 404 {
            Ok(())
        } else {
            Err(FailureReason::StillPresent { status })
        }
    }

    async fn verify(
        &self,
        method: &str,
        path: &str,
        body: Option<String>,
        contract: &Contract,
    ) -> Result<NormalizedResponse, FailureReason> {
        let response = self.dispatch(method, path, body).await?;
        self.checks.run(contract, &response)?;
        Ok(response)
    }

    async fn dispatch(
        &self,
        method: &str,
        path: &str,
        body: Option<String>,
    ) -> Result<NormalizedResponse, FailureReason> {
        let request = RequestSpec::parse(method, self.base.as_str(), path, body).map_err(|e| {
            debug!(error = %e, "Unknown method");
            FailureReason::RequestFailed
        })?;
        self.transport
            .send(&request)
            .await
            .map_err(|_| FailureReason::RequestFailed)
    }
}

fn encode<B: Serialize + ?Sized>(body: &B) -> Result<String, FailureReason> {
    serde_json::to_string(body).map_err(|e| {
        debug!(error = %e, "Request body could not be encoded");
        FailureReason::RequestFailed
    })
}
