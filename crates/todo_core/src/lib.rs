//! Core domain logic for the todo tracker.
//! Owns the task model, persistence backends and the optimistic client state.

pub mod db;
pub mod logging;
pub mod model;
pub mod repo;
pub mod state;
pub mod store;

pub use logging::{default_log_level, init_logging, logging_status, LogTarget};
pub use model::filter::{Filter, Stats};
pub use model::task::{now_epoch_ms, Task, TaskId, TaskPatch, TaskValidationError};
pub use repo::task_repo::{RepoError, RepoResult, SqliteTaskRepository, TaskRepository};
pub use state::todo_state::{MutationOutcome, TodoState};
pub use store::{
    HttpStore, LocalStore, MemoryStore, RecordStore, SqliteStore, StoreError, StoreResult,
};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[cfg(test)]
mod tests {
    use super::core_version;

    #[test]
    fn version_is_not_empty() {
        assert!(!core_version().is_empty());
    }
}
