//! Todo endpoints.
//!
//! # Responsibility
//! - Translate `/todos` requests directly into `RecordStore` calls.
//! - Validate request shape before any store I/O.
//!
//! # Invariants
//! - Handlers carry no business logic beyond payload validation.
//! - A path id that is not a UUID is reported as an unknown todo.

use crate::error::ApiError;
use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, Request, State};
use axum::http::StatusCode;
use axum::middleware::{self, Next};
use axum::response::Response;
use axum::routing::{get, patch};
use axum::{Json, Router};
use log::info;
use serde::Deserialize;
use serde_json::{json, Value};
use std::sync::Arc;
use std::time::Instant;
use todo_core::{RecordStore, Task, TaskId, TaskPatch};
use uuid::Uuid;

const MISSING_FIELDS: &str = "Missing required fields";

/// Shared handler dependencies.
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn RecordStore>,
}

/// Builds the `/todos` router over `store`.
pub fn router(store: Arc<dyn RecordStore>) -> Router {
    Router::new()
        .route("/todos", get(list_todos).post(create_todo))
        .route("/todos/{id}", patch(patch_todo).delete(delete_todo))
        .layer(middleware::from_fn(log_request))
        .with_state(AppState { store })
}

async fn log_request(request: Request, next: Next) -> Response {
    let started_at = Instant::now();
    let method = request.method().clone();
    let path = request.uri().path().to_string();

    let response = next.run(request).await;

    info!(
        "event=http_request module=server method={method} path={path} status={} duration_ms={}",
        response.status().as_u16(),
        started_at.elapsed().as_millis()
    );
    response
}

/// Creation payload; every field is required but parsed as optional so a
/// missing field is a 400 rather than a deserialization failure.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CreateTodoBody {
    id: Option<String>,
    text: Option<String>,
    completed: Option<bool>,
    created_at: Option<i64>,
}

impl CreateTodoBody {
    fn into_task(self) -> Result<Task, ApiError> {
        let (Some(id), Some(text), Some(completed), Some(created_at)) =
            (self.id, self.text, self.completed, self.created_at)
        else {
            return Err(ApiError::BadRequest(MISSING_FIELDS.to_string()));
        };

        let id = Uuid::parse_str(&id)
            .map_err(|_| ApiError::BadRequest(format!("Invalid todo id `{id}`")))?;
        let task = Task {
            id,
            text: text.trim().to_string(),
            completed,
            created_at,
        };
        task.validate()
            .map_err(|err| ApiError::BadRequest(err.to_string()))?;
        Ok(task)
    }
}

fn parse_path_id(raw: &str) -> Result<TaskId, ApiError> {
    Uuid::parse_str(raw).map_err(|_| ApiError::NotFound)
}

fn bad_json(rejection: JsonRejection) -> ApiError {
    ApiError::BadRequest(format!("Invalid request body: {}", rejection.body_text()))
}

async fn list_todos(State(state): State<AppState>) -> Result<Json<Vec<Task>>, ApiError> {
    let tasks = state
        .store
        .load_all()
        .await
        .map_err(|err| ApiError::from_store("Failed to fetch todos", err))?;
    Ok(Json(tasks))
}

async fn create_todo(
    State(state): State<AppState>,
    payload: Result<Json<CreateTodoBody>, JsonRejection>,
) -> Result<(StatusCode, Json<Task>), ApiError> {
    let Json(body) = payload.map_err(bad_json)?;
    let task = body.into_task()?;

    let created = state
        .store
        .create_one(&task)
        .await
        .map_err(|err| ApiError::from_store("Failed to create todo", err))?;
    Ok((StatusCode::CREATED, Json(created)))
}

async fn patch_todo(
    State(state): State<AppState>,
    Path(raw_id): Path<String>,
    payload: Result<Json<TaskPatch>, JsonRejection>,
) -> Result<Json<Task>, ApiError> {
    let Json(patch) = payload.map_err(bad_json)?;
    let patch = patch.trimmed();
    patch
        .validate()
        .map_err(|err| ApiError::BadRequest(err.to_string()))?;
    let id = parse_path_id(&raw_id)?;

    let updated = state
        .store
        .update_one(id, &patch)
        .await
        .map_err(|err| ApiError::from_store("Failed to update todo", err))?;
    Ok(Json(updated))
}

async fn delete_todo(
    State(state): State<AppState>,
    Path(raw_id): Path<String>,
) -> Result<Json<Value>, ApiError> {
    let id = parse_path_id(&raw_id)?;

    state
        .store
        .delete_one(id)
        .await
        .map_err(|err| ApiError::from_store("Failed to delete todo", err))?;
    Ok(Json(json!({ "success": true })))
}
