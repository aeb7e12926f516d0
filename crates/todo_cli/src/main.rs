//! Command-line front end for the todo tracker.
//!
//! Drives `TodoState` against the local blob store by default, or against
//! a running `todo_server` when `--remote` is given.

mod commands;

use clap::Parser;
use commands::{execute, Command};
use log::debug;
use std::io;
use std::path::PathBuf;
use std::process::ExitCode;
use todo_core::{init_logging, HttpStore, LocalStore, LogTarget, RecordStore, TodoState};

#[derive(Debug, Parser)]
#[command(name = "todo", version, about = "Track short todo items")]
struct Cli {
    /// Directory holding the local todo blob.
    #[arg(long, env = "TODO_DATA_DIR", default_value = ".todo")]
    data_dir: PathBuf,

    /// Base URL of a todo server; overrides the local blob.
    #[arg(long, env = "TODO_REMOTE_URL")]
    remote: Option<String>,

    /// Diagnostic log level written to stderr.
    #[arg(long, default_value = "warn")]
    log_level: String,

    #[command(subcommand)]
    command: Command,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    if let Err(err) = init_logging(&cli.log_level, LogTarget::Stderr) {
        eprintln!("todo: logging disabled: {err}");
    }

    let result = match cli.remote {
        Some(url) => {
            debug!("event=cli_start module=cli store=remote url={url}");
            run(HttpStore::new(url), cli.command).await
        }
        None => {
            debug!(
                "event=cli_start module=cli store=local dir={}",
                cli.data_dir.display()
            );
            run(LocalStore::new(cli.data_dir), cli.command).await
        }
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("todo: {err}");
            ExitCode::FAILURE
        }
    }
}

async fn run<S: RecordStore>(store: S, command: Command) -> Result<(), commands::CommandError> {
    let state = TodoState::activate(store).await;
    execute(&state, command, &mut io::stdout().lock()).await
}
