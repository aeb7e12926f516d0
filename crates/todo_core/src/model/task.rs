//! Task domain model.
//!
//! # Responsibility
//! - Define the canonical record rendered by every view.
//! - Define `TaskPatch`, the partial-update shape shared by stores and HTTP.
//!
//! # Invariants
//! - `id` is stable and never reused for another task.
//! - `text` is never empty after trim.
//! - `created_at` never changes after creation and is the sole sort key.

use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::time::{SystemTime, UNIX_EPOCH};
use uuid::Uuid;

/// Stable identifier for every task.
pub type TaskId = Uuid;

/// Validation failures for task and patch payloads.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TaskValidationError {
    EmptyText,
    EmptyPatch,
}

impl Display for TaskValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyText => write!(f, "task text cannot be empty"),
            Self::EmptyPatch => {
                write!(f, "at least one field (text or completed) is required")
            }
        }
    }
}

impl Error for TaskValidationError {}

/// Canonical todo record.
///
/// Serialized with camelCase keys (`createdAt`) to match the wire format
/// used by the HTTP API and the local blob.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    pub id: TaskId,
    pub text: String,
    pub completed: bool,
    /// Unix epoch milliseconds.
    pub created_at: i64,
}

impl Task {
    /// Creates an incomplete task with a generated ID, stamped with now.
    ///
    /// The text is trimmed; callers are expected to reject blank input first.
    pub fn new(text: &str) -> Self {
        Self::with_id(Uuid::new_v4(), text, now_epoch_ms())
    }

    /// Creates a task with caller-provided identity and timestamp.
    ///
    /// Used by import paths and tests where identity already exists.
    pub fn with_id(id: TaskId, text: &str, created_at: i64) -> Self {
        Self {
            id,
            text: text.trim().to_string(),
            completed: false,
            created_at,
        }
    }

    /// Checks the text invariant.
    pub fn validate(&self) -> Result<(), TaskValidationError> {
        if self.text.trim().is_empty() {
            return Err(TaskValidationError::EmptyText);
        }
        Ok(())
    }

    /// Applies the present fields of `patch` in place.
    pub fn apply(&mut self, patch: &TaskPatch) {
        if let Some(text) = &patch.text {
            self.text = text.trim().to_string();
        }
        if let Some(completed) = patch.completed {
            self.completed = completed;
        }
    }
}

/// Partial update: each field is either present (change it) or absent.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskPatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub completed: Option<bool>,
}

impl TaskPatch {
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            text: Some(text.into()),
            completed: None,
        }
    }

    pub fn completed(completed: bool) -> Self {
        Self {
            text: None,
            completed: Some(completed),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.text.is_none() && self.completed.is_none()
    }

    /// Same patch with surrounding whitespace stripped from `text`.
    pub fn trimmed(self) -> Self {
        Self {
            text: self.text.map(|text| text.trim().to_string()),
            completed: self.completed,
        }
    }

    /// Rejects empty patches and blank replacement text.
    pub fn validate(&self) -> Result<(), TaskValidationError> {
        if self.is_empty() {
            return Err(TaskValidationError::EmptyPatch);
        }
        if matches!(&self.text, Some(text) if text.trim().is_empty()) {
            return Err(TaskValidationError::EmptyText);
        }
        Ok(())
    }
}

/// Current wall-clock time in Unix epoch milliseconds.
pub fn now_epoch_ms() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map_or(0, |elapsed| elapsed.as_millis() as i64)
}

/// Sorts tasks into creation order, breaking ties by ID for determinism.
pub fn sort_by_creation(tasks: &mut [Task]) {
    tasks.sort_by(|a, b| a.created_at.cmp(&b.created_at).then(a.id.cmp(&b.id)));
}

#[cfg(test)]
mod tests {
    use super::{sort_by_creation, Task, TaskPatch, TaskValidationError};
    use uuid::Uuid;

    #[test]
    fn new_task_is_trimmed_and_incomplete() {
        let task = Task::new("  buy milk  ");
        assert_eq!(task.text, "buy milk");
        assert!(!task.completed);
        assert!(task.created_at > 0);
    }

    #[test]
    fn serializes_with_camel_case_timestamp() {
        let task = Task::with_id(Uuid::nil(), "write docs", 42);
        let value = serde_json::to_value(&task).expect("task should serialize");
        assert_eq!(value["createdAt"], 42);
        assert_eq!(value["text"], "write docs");
        assert!(value.get("created_at").is_none());
    }

    #[test]
    fn empty_patch_is_rejected() {
        assert_eq!(
            TaskPatch::default().validate(),
            Err(TaskValidationError::EmptyPatch)
        );
        assert_eq!(
            TaskPatch::text("   ").validate(),
            Err(TaskValidationError::EmptyText)
        );
        assert!(TaskPatch::completed(false).validate().is_ok());
    }

    #[test]
    fn trimmed_patch_strips_text_only() {
        let patch = TaskPatch {
            text: Some("\n x \t".to_string()),
            completed: Some(true),
        }
        .trimmed();
        assert_eq!(patch.text.as_deref(), Some("x"));
        assert_eq!(patch.completed, Some(true));
        assert_eq!(TaskPatch::completed(false).trimmed(), TaskPatch::completed(false));
    }

    #[test]
    fn apply_only_touches_present_fields() {
        let mut task = Task::with_id(Uuid::new_v4(), "original", 1);
        task.apply(&TaskPatch::completed(true));
        assert_eq!(task.text, "original");
        assert!(task.completed);
    }

    #[test]
    fn sort_by_creation_orders_ascending() {
        let mut tasks = vec![
            Task::with_id(Uuid::new_v4(), "late", 30),
            Task::with_id(Uuid::new_v4(), "early", 10),
            Task::with_id(Uuid::new_v4(), "middle", 20),
        ];
        sort_by_creation(&mut tasks);
        let texts: Vec<_> = tasks.iter().map(|task| task.text.as_str()).collect();
        assert_eq!(texts, ["early", "middle", "late"]);
    }
}
