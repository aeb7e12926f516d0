//! Record stores behind one uniform CRUD contract.
//!
//! # Responsibility
//! - Define `RecordStore`, the persistence collaborator of `TodoState`.
//! - Provide interchangeable backends: in-memory, local JSON blob, SQLite
//!   table, and the remote HTTP API.
//!
//! # Invariants
//! - `load_all` returns tasks in creation order.
//! - `update_one` rejects empty patches before touching storage.
//! - `update_one` and `delete_one` report `NotFound` for unknown IDs.

use crate::model::task::{Task, TaskId, TaskPatch, TaskValidationError};
use crate::repo::task_repo::RepoError;
use async_trait::async_trait;
use std::error::Error;
use std::fmt::{Display, Formatter};

mod http;
mod local;
mod memory;
mod sqlite;

pub use http::HttpStore;
pub use local::{load_todos, save_todos, LocalStore, STORAGE_KEY};
pub use memory::MemoryStore;
pub use sqlite::SqliteStore;

pub type StoreResult<T> = Result<T, StoreError>;

/// Failure of a store call.
#[derive(Debug)]
pub enum StoreError {
    Validation(TaskValidationError),
    NotFound(TaskId),
    Conflict(TaskId),
    Repo(RepoError),
    Io(std::io::Error),
    Encode(serde_json::Error),
    Http(reqwest::Error),
    /// Non-success HTTP response that has no semantic mapping.
    Status { status: u16, message: String },
}

impl Display for StoreError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation(err) => write!(f, "{err}"),
            Self::NotFound(id) => write!(f, "todo not found: {id}"),
            Self::Conflict(id) => write!(f, "todo already exists: {id}"),
            Self::Repo(err) => write!(f, "{err}"),
            Self::Io(err) => write!(f, "storage io error: {err}"),
            Self::Encode(err) => write!(f, "storage encoding error: {err}"),
            Self::Http(err) => write!(f, "transport error: {err}"),
            Self::Status { status, message } => write!(f, "server returned {status}: {message}"),
        }
    }
}

impl Error for StoreError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            Self::Repo(err) => Some(err),
            Self::Io(err) => Some(err),
            Self::Encode(err) => Some(err),
            Self::Http(err) => Some(err),
            Self::NotFound(_) | Self::Conflict(_) | Self::Status { .. } => None,
        }
    }
}

impl From<TaskValidationError> for StoreError {
    fn from(value: TaskValidationError) -> Self {
        Self::Validation(value)
    }
}

impl From<RepoError> for StoreError {
    fn from(value: RepoError) -> Self {
        match value {
            RepoError::Validation(err) => Self::Validation(err),
            RepoError::NotFound(id) => Self::NotFound(id),
            RepoError::Conflict(id) => Self::Conflict(id),
            other => Self::Repo(other),
        }
    }
}

impl From<std::io::Error> for StoreError {
    fn from(value: std::io::Error) -> Self {
        Self::Io(value)
    }
}

impl From<serde_json::Error> for StoreError {
    fn from(value: serde_json::Error) -> Self {
        Self::Encode(value)
    }
}

impl From<reqwest::Error> for StoreError {
    fn from(value: reqwest::Error) -> Self {
        Self::Http(value)
    }
}

/// Persistence contract required by `TodoState`.
#[async_trait]
pub trait RecordStore: Send + Sync {
    /// Loads the full collection in creation order.
    async fn load_all(&self) -> StoreResult<Vec<Task>>;
    /// Persists a new task; duplicate IDs are rejected with `Conflict`.
    async fn create_one(&self, task: &Task) -> StoreResult<Task>;
    async fn delete_one(&self, id: TaskId) -> StoreResult<()>;
    /// Applies the present patch fields and returns the stored result.
    async fn update_one(&self, id: TaskId, patch: &TaskPatch) -> StoreResult<Task>;
}

#[async_trait]
impl<S: RecordStore + ?Sized> RecordStore for std::sync::Arc<S> {
    async fn load_all(&self) -> StoreResult<Vec<Task>> {
        (**self).load_all().await
    }

    async fn create_one(&self, task: &Task) -> StoreResult<Task> {
        (**self).create_one(task).await
    }

    async fn delete_one(&self, id: TaskId) -> StoreResult<()> {
        (**self).delete_one(id).await
    }

    async fn update_one(&self, id: TaskId, patch: &TaskPatch) -> StoreResult<Task> {
        (**self).update_one(id, patch).await
    }
}

/// Applies a create against an in-process collection.
///
/// Shared by the memory and local-blob backends so both enforce the same
/// contract as the SQLite table.
pub(crate) fn create_in(tasks: &mut Vec<Task>, task: &Task) -> StoreResult<Task> {
    task.validate()?;
    if tasks.iter().any(|existing| existing.id == task.id) {
        return Err(StoreError::Conflict(task.id));
    }
    tasks.push(task.clone());
    Ok(task.clone())
}

pub(crate) fn delete_in(tasks: &mut Vec<Task>, id: TaskId) -> StoreResult<()> {
    let before = tasks.len();
    tasks.retain(|task| task.id != id);
    if tasks.len() == before {
        return Err(StoreError::NotFound(id));
    }
    Ok(())
}

pub(crate) fn update_in(tasks: &mut [Task], id: TaskId, patch: &TaskPatch) -> StoreResult<Task> {
    patch.validate()?;
    let task = tasks
        .iter_mut()
        .find(|task| task.id == id)
        .ok_or(StoreError::NotFound(id))?;
    task.apply(patch);
    Ok(task.clone())
}
