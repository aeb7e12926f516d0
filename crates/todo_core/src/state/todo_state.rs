//! Optimistic todo state.
//!
//! Each mutation captures a snapshot of the collection, applies its change
//! locally, then awaits the store. A failed confirmation restores exactly
//! that snapshot (or, for `add`, drops the synthesized task) and records an
//! error message.
//!
//! Mutations are not serialized against each other. Confirmations settle in
//! completion order, so a late-failing rollback can overwrite a mutation that
//! was applied after its snapshot was taken.

use crate::model::filter::{Filter, Stats};
use crate::model::task::{sort_by_creation, Task, TaskId, TaskPatch};
use crate::store::{RecordStore, StoreError};
use log::{error, info};
use std::sync::{Mutex, MutexGuard, PoisonError};

/// Result of a mutation call, as observed by the caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MutationOutcome {
    /// Rejected before touching state (blank text or unknown id).
    Skipped,
    /// Applied locally and confirmed by the store.
    Committed(TaskId),
    /// Applied locally, refused by the store, then reverted.
    RolledBack(TaskId),
}

impl MutationOutcome {
    pub fn is_committed(self) -> bool {
        matches!(self, Self::Committed(_))
    }
}

#[derive(Debug)]
struct StateInner {
    tasks: Vec<Task>,
    filter: Filter,
    is_loading: bool,
    error: Option<String>,
}

/// Owned todo state bound to one record store.
pub struct TodoState<S> {
    store: S,
    inner: Mutex<StateInner>,
}

impl<S: RecordStore> TodoState<S> {
    /// Creates an empty state in the loading phase.
    ///
    /// Call [`TodoState::load`] (or use [`TodoState::activate`]) to fetch the
    /// stored collection.
    pub fn new(store: S) -> Self {
        Self {
            store,
            inner: Mutex::new(StateInner {
                tasks: Vec::new(),
                filter: Filter::default(),
                is_loading: true,
                error: None,
            }),
        }
    }

    /// Creates the state and performs the initial load.
    pub async fn activate(store: S) -> Self {
        let state = Self::new(store);
        state.load().await;
        state
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Replaces local state with the stored collection.
    ///
    /// On failure local state is left untouched and an error is recorded.
    /// The loading flag is cleared either way.
    pub async fn load(&self) {
        {
            let mut inner = self.lock();
            inner.is_loading = true;
            inner.error = None;
        }

        let loaded = self.store.load_all().await;

        let mut inner = self.lock();
        match loaded {
            Ok(mut tasks) => {
                sort_by_creation(&mut tasks);
                info!(
                    "event=todo_load module=state status=ok count={}",
                    tasks.len()
                );
                inner.tasks = tasks;
            }
            Err(err) => {
                error!("event=todo_load module=state status=error error={err}");
                inner.error = Some(failure_message("Failed to fetch todos", &err));
            }
        }
        inner.is_loading = false;
    }

    /// Tasks matching the active filter, in creation order.
    pub fn list(&self) -> Vec<Task> {
        let inner = self.lock();
        inner
            .tasks
            .iter()
            .filter(|task| inner.filter.matches(task))
            .cloned()
            .collect()
    }

    /// The whole collection regardless of filter.
    pub fn all(&self) -> Vec<Task> {
        self.lock().tasks.clone()
    }

    pub fn filter(&self) -> Filter {
        self.lock().filter
    }

    /// Changes the projection only; no store I/O.
    pub fn set_filter(&self, filter: Filter) {
        self.lock().filter = filter;
    }

    pub fn stats(&self) -> Stats {
        Stats::from_tasks(&self.lock().tasks)
    }

    pub fn is_loading(&self) -> bool {
        self.lock().is_loading
    }

    /// Last advisory error, if any mutation or load has failed.
    pub fn error(&self) -> Option<String> {
        self.lock().error.clone()
    }

    /// Appends a new task, then asks the store to persist it.
    pub async fn add(&self, text: &str) -> MutationOutcome {
        if text.trim().is_empty() {
            return MutationOutcome::Skipped;
        }

        let task = Task::new(text);
        self.lock().tasks.push(task.clone());

        match self.store.create_one(&task).await {
            Ok(_) => MutationOutcome::Committed(task.id),
            Err(err) => {
                let mut inner = self.lock();
                inner.tasks.retain(|existing| existing.id != task.id);
                self.record_failure(&mut inner, "add", task.id, "Failed to add todo", &err);
                MutationOutcome::RolledBack(task.id)
            }
        }
    }

    /// Removes a task locally, then asks the store to delete it.
    pub async fn remove(&self, id: TaskId) -> MutationOutcome {
        let snapshot = {
            let mut inner = self.lock();
            if !inner.tasks.iter().any(|task| task.id == id) {
                return MutationOutcome::Skipped;
            }
            let snapshot = inner.tasks.clone();
            inner.tasks.retain(|task| task.id != id);
            snapshot
        };

        let confirmed = self.store.delete_one(id).await;
        self.settle(confirmed, snapshot, "remove", id, "Failed to delete todo")
    }

    /// Replaces a task's text locally, then sends a text-only patch.
    pub async fn update(&self, id: TaskId, text: &str) -> MutationOutcome {
        let text = text.trim();
        if text.is_empty() {
            return MutationOutcome::Skipped;
        }

        let Some((snapshot, patch)) = self.apply_local(id, |_| TaskPatch::text(text)) else {
            return MutationOutcome::Skipped;
        };

        let confirmed = self.store.update_one(id, &patch).await.map(|_| ());
        self.settle(confirmed, snapshot, "update", id, "Failed to update todo")
    }

    /// Flips a task's completion locally, then sends the new value.
    pub async fn toggle(&self, id: TaskId) -> MutationOutcome {
        let Some((snapshot, patch)) =
            self.apply_local(id, |task| TaskPatch::completed(!task.completed))
        else {
            return MutationOutcome::Skipped;
        };

        let confirmed = self.store.update_one(id, &patch).await.map(|_| ());
        self.settle(confirmed, snapshot, "toggle", id, "Failed to toggle todo")
    }

    /// Builds a patch from the current task and applies it under one guard.
    ///
    /// Returns the pre-mutation snapshot and the applied patch, or `None`
    /// when the task is not present.
    fn apply_local(
        &self,
        id: TaskId,
        build: impl FnOnce(&Task) -> TaskPatch,
    ) -> Option<(Vec<Task>, TaskPatch)> {
        let mut inner = self.lock();
        let snapshot = inner.tasks.clone();
        let task = inner.tasks.iter_mut().find(|task| task.id == id)?;
        let patch = build(task);
        task.apply(&patch);
        Some((snapshot, patch))
    }

    fn settle(
        &self,
        confirmed: Result<(), StoreError>,
        snapshot: Vec<Task>,
        op: &str,
        id: TaskId,
        context: &str,
    ) -> MutationOutcome {
        match confirmed {
            Ok(()) => MutationOutcome::Committed(id),
            Err(err) => {
                let mut inner = self.lock();
                inner.tasks = snapshot;
                self.record_failure(&mut inner, op, id, context, &err);
                MutationOutcome::RolledBack(id)
            }
        }
    }

    fn record_failure(
        &self,
        inner: &mut StateInner,
        op: &str,
        id: TaskId,
        context: &str,
        err: &StoreError,
    ) {
        error!("event=todo_{op} module=state status=rolled_back id={id} error={err}");
        inner.error = Some(failure_message(context, err));
    }

    fn lock(&self) -> MutexGuard<'_, StateInner> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

fn failure_message(context: &str, err: &StoreError) -> String {
    format!("{context}: {err}")
}
