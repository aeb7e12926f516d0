//! Local key-value blob store.
//!
//! The whole collection is one JSON array under a fixed key, materialized as
//! `<dir>/<STORAGE_KEY>.json`. Reads never fail: a missing or malformed blob
//! is an empty collection and the problem is only logged.

use super::{create_in, delete_in, update_in, RecordStore, StoreResult};
use crate::model::task::{sort_by_creation, Task, TaskId, TaskPatch};
use async_trait::async_trait;
use log::{error, warn};
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, PoisonError};

/// Fixed key the collection is stored under.
pub const STORAGE_KEY: &str = "todos";

fn blob_path(dir: &Path) -> PathBuf {
    dir.join(format!("{STORAGE_KEY}.json"))
}

/// Loads the stored collection from `dir`.
///
/// Absent or malformed content yields an empty collection.
pub fn load_todos(dir: &Path) -> Vec<Task> {
    let path = blob_path(dir);
    let raw = match std::fs::read_to_string(&path) {
        Ok(raw) => raw,
        Err(err) if err.kind() == ErrorKind::NotFound => return Vec::new(),
        Err(err) => {
            error!(
                "event=local_load module=store status=error path={} error={err}",
                path.display()
            );
            return Vec::new();
        }
    };

    if raw.trim().is_empty() {
        return Vec::new();
    }

    match serde_json::from_str::<Vec<Task>>(&raw) {
        Ok(mut tasks) => {
            sort_by_creation(&mut tasks);
            tasks
        }
        Err(err) => {
            warn!(
                "event=local_load module=store status=malformed path={} error={err}",
                path.display()
            );
            Vec::new()
        }
    }
}

/// Replaces the stored collection in `dir`.
///
/// Writes a sibling temp file and renames it over the blob, so a failed
/// write leaves the previous collection intact.
pub fn save_todos(dir: &Path, tasks: &[Task]) -> StoreResult<()> {
    let path = blob_path(dir);
    let result = write_blob(dir, &path, tasks);
    if let Err(err) = &result {
        error!(
            "event=local_save module=store status=error path={} error={err}",
            path.display()
        );
    }
    result
}

fn write_blob(dir: &Path, path: &Path, tasks: &[Task]) -> StoreResult<()> {
    std::fs::create_dir_all(dir)?;
    let encoded = serde_json::to_vec(tasks)?;
    let tmp_path = path.with_extension("json.tmp");
    std::fs::write(&tmp_path, encoded)?;
    std::fs::rename(&tmp_path, path)?;
    Ok(())
}

/// Record store over the local JSON blob.
///
/// Every mutation is a load-modify-save of the whole collection, serialized
/// through an in-process lock.
#[derive(Debug)]
pub struct LocalStore {
    dir: PathBuf,
    write_lock: Mutex<()>,
}

impl LocalStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: dir.into(),
            write_lock: Mutex::new(()),
        }
    }

    fn mutate<T>(&self, change: impl FnOnce(&mut Vec<Task>) -> StoreResult<T>) -> StoreResult<T> {
        let _guard = self.write_lock.lock().unwrap_or_else(PoisonError::into_inner);
        let mut tasks = load_todos(&self.dir);
        let outcome = change(&mut tasks)?;
        save_todos(&self.dir, &tasks)?;
        Ok(outcome)
    }
}

#[async_trait]
impl RecordStore for LocalStore {
    async fn load_all(&self) -> StoreResult<Vec<Task>> {
        Ok(load_todos(&self.dir))
    }

    async fn create_one(&self, task: &Task) -> StoreResult<Task> {
        self.mutate(|tasks| create_in(tasks, task))
    }

    async fn delete_one(&self, id: TaskId) -> StoreResult<()> {
        self.mutate(|tasks| delete_in(tasks, id))
    }

    async fn update_one(&self, id: TaskId, patch: &TaskPatch) -> StoreResult<Task> {
        self.mutate(|tasks| update_in(tasks, id, patch))
    }
}
