//! Remote record store talking to the todo HTTP API.

use super::{RecordStore, StoreError, StoreResult};
use crate::model::task::{sort_by_creation, Task, TaskId, TaskPatch};
use async_trait::async_trait;
use log::debug;
use reqwest::{Client, Response, StatusCode};
use serde::Deserialize;

#[derive(Debug, Deserialize)]
struct ErrorBody {
    error: String,
}

/// Client for `GET/POST /todos` and `PATCH/DELETE /todos/{id}`.
#[derive(Clone, Debug)]
pub struct HttpStore {
    client: Client,
    base_url: String,
}

impl HttpStore {
    /// Creates a client rooted at `base_url` (e.g. `http://127.0.0.1:3000`).
    pub fn new(base_url: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self {
            client: Client::new(),
            base_url,
        }
    }

    fn collection_url(&self) -> String {
        format!("{}/todos", self.base_url)
    }

    fn item_url(&self, id: TaskId) -> String {
        format!("{}/todos/{id}", self.base_url)
    }
}

/// Maps a non-success response onto a store error.
async fn check(response: Response, id: Option<TaskId>) -> StoreResult<Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    match (status, id) {
        (StatusCode::NOT_FOUND, Some(id)) => return Err(StoreError::NotFound(id)),
        (StatusCode::CONFLICT, Some(id)) => return Err(StoreError::Conflict(id)),
        _ => {}
    }

    let message = match response.json::<ErrorBody>().await {
        Ok(body) => body.error,
        Err(_) => status
            .canonical_reason()
            .unwrap_or("unexpected response")
            .to_string(),
    };
    Err(StoreError::Status {
        status: status.as_u16(),
        message,
    })
}

#[async_trait]
impl RecordStore for HttpStore {
    async fn load_all(&self) -> StoreResult<Vec<Task>> {
        let response = self.client.get(self.collection_url()).send().await?;
        let mut tasks: Vec<Task> = check(response, None).await?.json().await?;
        sort_by_creation(&mut tasks);
        debug!("event=remote_load module=store status=ok count={}", tasks.len());
        Ok(tasks)
    }

    async fn create_one(&self, task: &Task) -> StoreResult<Task> {
        let response = self
            .client
            .post(self.collection_url())
            .json(task)
            .send()
            .await?;
        Ok(check(response, Some(task.id)).await?.json().await?)
    }

    async fn delete_one(&self, id: TaskId) -> StoreResult<()> {
        let response = self.client.delete(self.item_url(id)).send().await?;
        check(response, Some(id)).await?;
        Ok(())
    }

    async fn update_one(&self, id: TaskId, patch: &TaskPatch) -> StoreResult<Task> {
        patch.validate()?;
        let response = self
            .client
            .patch(self.item_url(id))
            .json(patch)
            .send()
            .await?;
        Ok(check(response, Some(id)).await?.json().await?)
    }
}
