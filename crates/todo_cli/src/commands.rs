//! Command execution against a `TodoState`.
//!
//! Output is written to a caller-supplied writer so commands can be checked
//! without a terminal.

use clap::Subcommand;
use std::io::{self, Write};
use todo_core::{Filter, MutationOutcome, RecordStore, Task, TaskId, TodoState};
use uuid::Uuid;

const SHORT_ID_LEN: usize = 8;

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Show todos, optionally filtered.
    List {
        #[arg(short, long, default_value = "all")]
        filter: Filter,
    },
    /// Add a todo.
    Add {
        #[arg(required = true, num_args = 1..)]
        text: Vec<String>,
    },
    /// Replace a todo's text.
    Edit {
        id: String,
        #[arg(required = true, num_args = 1..)]
        text: Vec<String>,
    },
    /// Flip a todo between active and completed.
    Toggle { id: String },
    /// Delete a todo.
    Rm { id: String },
    /// Show total/active/completed counts.
    Stats,
}

/// Why a command did not complete.
#[derive(Debug)]
pub enum CommandError {
    /// The id argument matched zero or several todos.
    UnknownId(String),
    /// The input was rejected before reaching the store.
    Rejected(&'static str),
    /// The store refused the change and local state was rolled back.
    Store(String),
    Io(io::Error),
}

impl std::fmt::Display for CommandError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::UnknownId(raw) => write!(f, "no single todo matches `{raw}`"),
            Self::Rejected(reason) => f.write_str(reason),
            Self::Store(message) => f.write_str(message),
            Self::Io(err) => write!(f, "{err}"),
        }
    }
}

impl std::error::Error for CommandError {}

impl From<io::Error> for CommandError {
    fn from(value: io::Error) -> Self {
        Self::Io(value)
    }
}

/// Runs `command` against an already loaded state.
pub async fn execute<S: RecordStore>(
    state: &TodoState<S>,
    command: Command,
    out: &mut impl Write,
) -> Result<(), CommandError> {
    if let Some(message) = state.error() {
        return Err(CommandError::Store(message));
    }

    match command {
        Command::List { filter } => {
            state.set_filter(filter);
            for task in state.list() {
                writeln!(out, "{}", render_task(&task))?;
            }
        }
        Command::Stats => {
            let stats = state.stats();
            writeln!(
                out,
                "{} total, {} active, {} completed",
                stats.total, stats.active, stats.completed
            )?;
        }
        Command::Add { text } => {
            let outcome = state.add(&text.join(" ")).await;
            let id = settle(state, outcome, "todo text cannot be empty")?;
            writeln!(out, "added {}", short_id(id))?;
        }
        Command::Edit { id, text } => {
            let id = resolve_id(&state.all(), &id)?;
            let outcome = state.update(id, &text.join(" ")).await;
            settle(state, outcome, "todo text cannot be empty")?;
            writeln!(out, "updated {}", short_id(id))?;
        }
        Command::Toggle { id } => {
            let id = resolve_id(&state.all(), &id)?;
            settle(state, state.toggle(id).await, "todo not found")?;
            writeln!(out, "toggled {}", short_id(id))?;
        }
        Command::Rm { id } => {
            let id = resolve_id(&state.all(), &id)?;
            settle(state, state.remove(id).await, "todo not found")?;
            writeln!(out, "removed {}", short_id(id))?;
        }
    }

    Ok(())
}

fn settle<S: RecordStore>(
    state: &TodoState<S>,
    outcome: MutationOutcome,
    skipped_reason: &'static str,
) -> Result<TaskId, CommandError> {
    match outcome {
        MutationOutcome::Committed(id) => Ok(id),
        MutationOutcome::Skipped => Err(CommandError::Rejected(skipped_reason)),
        MutationOutcome::RolledBack(_) => Err(CommandError::Store(
            state.error().unwrap_or_else(|| "store refused the change".to_string()),
        )),
    }
}

/// Accepts a full UUID or a unique prefix of one, among `tasks` only.
pub fn resolve_id(tasks: &[Task], raw: &str) -> Result<TaskId, CommandError> {
    let needle = raw.trim().to_ascii_lowercase();
    if let Ok(id) = Uuid::parse_str(&needle) {
        return tasks
            .iter()
            .find(|task| task.id == id)
            .map(|task| task.id)
            .ok_or_else(|| CommandError::UnknownId(raw.to_string()));
    }

    let mut matches = tasks
        .iter()
        .filter(|task| !needle.is_empty() && task.id.to_string().starts_with(&needle));
    match (matches.next(), matches.next()) {
        (Some(task), None) => Ok(task.id),
        _ => Err(CommandError::UnknownId(raw.to_string())),
    }
}

fn short_id(id: TaskId) -> String {
    id.to_string()[..SHORT_ID_LEN].to_string()
}

fn render_task(task: &Task) -> String {
    let mark = if task.completed { 'x' } else { ' ' };
    format!("[{mark}] {}  {}", short_id(task.id), task.text)
}

#[cfg(test)]
mod tests {
    use super::{execute, resolve_id, Command, CommandError};
    use todo_core::store::load_todos;
    use todo_core::{Filter, LocalStore, MemoryStore, RecordStore, Task, TodoState};
    use uuid::Uuid;

    async fn run<S: RecordStore>(
        state: &TodoState<S>,
        command: Command,
    ) -> Result<String, CommandError> {
        let mut out = Vec::new();
        execute(state, command, &mut out).await?;
        Ok(String::from_utf8(out).expect("output should be UTF-8"))
    }

    #[tokio::test]
    async fn add_then_list_renders_tasks() {
        let state = TodoState::activate(MemoryStore::new()).await;

        let added = run(
            &state,
            Command::Add {
                text: vec!["buy".to_string(), "milk".to_string()],
            },
        )
        .await
        .expect("add should succeed");
        assert!(added.starts_with("added "));

        let listed = run(&state, Command::List { filter: Filter::All })
            .await
            .expect("list should succeed");
        assert!(listed.starts_with("[ ] "));
        assert!(listed.trim_end().ends_with("buy milk"));
    }

    #[tokio::test]
    async fn toggle_by_prefix_moves_task_between_filters() {
        let task = Task::with_id(Uuid::new_v4(), "prefix me", 1);
        let prefix = task.id.to_string()[..6].to_string();
        let state = TodoState::activate(MemoryStore::with_tasks(vec![task])).await;

        run(&state, Command::Toggle { id: prefix })
            .await
            .expect("toggle should succeed");

        let active = run(&state, Command::List { filter: Filter::Active })
            .await
            .unwrap();
        assert!(active.is_empty());
        let stats = run(&state, Command::Stats).await.unwrap();
        assert_eq!(stats.trim(), "1 total, 0 active, 1 completed");
    }

    #[tokio::test]
    async fn blank_add_is_rejected() {
        let state = TodoState::activate(MemoryStore::new()).await;
        let err = run(
            &state,
            Command::Add {
                text: vec!["   ".to_string()],
            },
        )
        .await
        .unwrap_err();
        assert!(matches!(err, CommandError::Rejected(_)));
    }

    #[tokio::test]
    async fn edit_with_unknown_full_id_reports_unknown_id() {
        let state = TodoState::activate(MemoryStore::new()).await;
        let missing = Uuid::new_v4().to_string();

        let err = run(
            &state,
            Command::Edit {
                id: missing.clone(),
                text: vec!["real text".to_string()],
            },
        )
        .await
        .unwrap_err();

        assert!(matches!(err, CommandError::UnknownId(raw) if raw == missing));
    }

    #[tokio::test]
    async fn local_store_commands_survive_reload() {
        let dir = tempfile::tempdir().unwrap();

        let state = TodoState::activate(LocalStore::new(dir.path())).await;
        run(
            &state,
            Command::Add {
                text: vec!["water plants".to_string()],
            },
        )
        .await
        .expect("add should succeed");
        let id = state.all()[0].id.to_string();
        run(&state, Command::Toggle { id })
            .await
            .expect("toggle should succeed");

        let persisted = load_todos(dir.path());
        assert_eq!(persisted.len(), 1);
        assert!(persisted[0].completed);

        let reloaded = TodoState::activate(LocalStore::new(dir.path())).await;
        let listed = run(&reloaded, Command::List { filter: Filter::Completed })
            .await
            .expect("list should succeed");
        assert!(listed.starts_with("[x] "));
        assert!(listed.trim_end().ends_with("water plants"));
    }

    #[test]
    fn ambiguous_or_empty_prefix_is_rejected() {
        let tasks = vec![
            Task::with_id(Uuid::parse_str("aaaaaaaa-0000-4000-8000-000000000001").unwrap(), "a", 1),
            Task::with_id(Uuid::parse_str("aaaaaaaa-0000-4000-8000-000000000002").unwrap(), "b", 2),
        ];
        assert!(resolve_id(&tasks, "aaaa").is_err());
        assert!(resolve_id(&tasks, "").is_err());
        assert_eq!(
            resolve_id(&tasks, "AAAAAAAA-0000-4000-8000-000000000002").unwrap(),
            tasks[1].id
        );
    }
}
