//! Record store over the SQLite `todos` table.
//!
//! # Responsibility
//! - Adapt `SqliteTaskRepository` to the async `RecordStore` contract.
//!
//! # Invariants
//! - Connections opened here are migrated before the store is built.
//! - The connection lock is released before any await point.

use super::{RecordStore, StoreResult};
use crate::db::{open_db, open_db_in_memory, DbResult};
use crate::model::task::{Task, TaskId, TaskPatch};
use crate::repo::task_repo::{SqliteTaskRepository, TaskRepository};
use async_trait::async_trait;
use rusqlite::Connection;
use std::path::Path;
use std::sync::{Mutex, PoisonError};

/// Record store over the relational `todos` table.
///
/// The connection is held only for the duration of one statement; callers
/// are never blocked across an await point.
#[derive(Debug)]
pub struct SqliteStore {
    conn: Mutex<Connection>,
}

impl SqliteStore {
    pub fn new(conn: Connection) -> Self {
        Self {
            conn: Mutex::new(conn),
        }
    }

    /// Opens (and bootstraps) a database file.
    pub fn open(path: impl AsRef<Path>) -> DbResult<Self> {
        open_db(path).map(Self::new)
    }

    pub fn open_in_memory() -> DbResult<Self> {
        open_db_in_memory().map(Self::new)
    }

    fn with_repo<T>(
        &self,
        op: impl FnOnce(&SqliteTaskRepository<'_>) -> crate::repo::task_repo::RepoResult<T>,
    ) -> StoreResult<T> {
        let conn = self.conn.lock().unwrap_or_else(PoisonError::into_inner);
        let repo = SqliteTaskRepository::new(&conn);
        Ok(op(&repo)?)
    }
}

#[async_trait]
impl RecordStore for SqliteStore {
    async fn load_all(&self) -> StoreResult<Vec<Task>> {
        self.with_repo(|repo| repo.list_tasks())
    }

    async fn create_one(&self, task: &Task) -> StoreResult<Task> {
        self.with_repo(|repo| repo.create_task(task))?;
        Ok(task.clone())
    }

    async fn delete_one(&self, id: TaskId) -> StoreResult<()> {
        self.with_repo(|repo| repo.delete_task(id))
    }

    async fn update_one(&self, id: TaskId, patch: &TaskPatch) -> StoreResult<Task> {
        self.with_repo(|repo| repo.update_task(id, patch))
    }
}
