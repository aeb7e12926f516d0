//! In-process record store.
//!
//! # Responsibility
//! - Back `TodoState` in tests and sessions that need no persistence.
//!
//! # Invariants
//! - Clones share one collection; a change through any clone is visible to all.
//! - `load_all` returns tasks in creation order.

use super::{create_in, delete_in, update_in, RecordStore, StoreResult};
use crate::model::task::{sort_by_creation, Task, TaskId, TaskPatch};
use async_trait::async_trait;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

/// In-memory record store for tests and ephemeral sessions.
///
/// Clones share the same underlying collection.
#[derive(Clone, Debug, Default)]
pub struct MemoryStore {
    tasks: Arc<Mutex<Vec<Task>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seeds the store with an existing collection.
    pub fn with_tasks(tasks: Vec<Task>) -> Self {
        Self {
            tasks: Arc::new(Mutex::new(tasks)),
        }
    }

    /// Returns a copy of the stored collection in creation order.
    pub fn snapshot(&self) -> Vec<Task> {
        let mut tasks = self.lock().clone();
        sort_by_creation(&mut tasks);
        tasks
    }

    fn lock(&self) -> MutexGuard<'_, Vec<Task>> {
        self.tasks.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

#[async_trait]
impl RecordStore for MemoryStore {
    async fn load_all(&self) -> StoreResult<Vec<Task>> {
        Ok(self.snapshot())
    }

    async fn create_one(&self, task: &Task) -> StoreResult<Task> {
        create_in(&mut self.lock(), task)
    }

    async fn delete_one(&self, id: TaskId) -> StoreResult<()> {
        delete_in(&mut self.lock(), id)
    }

    async fn update_one(&self, id: TaskId, patch: &TaskPatch) -> StoreResult<Task> {
        update_in(&mut self.lock(), id, patch)
    }
}

#[cfg(test)]
mod tests {
    use super::MemoryStore;
    use crate::model::task::{Task, TaskPatch};
    use crate::store::{RecordStore, StoreError};
    use uuid::Uuid;

    #[tokio::test]
    async fn duplicate_create_is_a_conflict() {
        let store = MemoryStore::new();
        let task = Task::new("once");
        store.create_one(&task).await.expect("first create");

        let err = store.create_one(&task).await.expect_err("duplicate id");
        assert!(matches!(err, StoreError::Conflict(id) if id == task.id));
        assert_eq!(store.snapshot().len(), 1);
    }

    #[tokio::test]
    async fn update_and_delete_report_missing_ids() {
        let store = MemoryStore::new();
        let missing = Uuid::new_v4();

        let err = store
            .update_one(missing, &TaskPatch::completed(true))
            .await
            .expect_err("unknown id");
        assert!(matches!(err, StoreError::NotFound(id) if id == missing));

        let err = store.delete_one(missing).await.expect_err("unknown id");
        assert!(matches!(err, StoreError::NotFound(_)));
    }

    #[tokio::test]
    async fn empty_patch_is_rejected_before_lookup() {
        let store = MemoryStore::new();
        let err = store
            .update_one(Uuid::new_v4(), &TaskPatch::default())
            .await
            .expect_err("empty patch");
        assert!(matches!(err, StoreError::Validation(_)));
    }
}
