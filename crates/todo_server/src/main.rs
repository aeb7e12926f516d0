//! Todo API server entry point.

use log::{error, info};
use std::process::ExitCode;
use std::sync::Arc;
use todo_core::{init_logging, LogTarget, SqliteStore};
use todo_server::{serve, Settings};
use tokio::net::TcpListener;

#[tokio::main]
async fn main() -> ExitCode {
    let settings = match Settings::new() {
        Ok(settings) => settings,
        Err(err) => {
            eprintln!("todo_server: invalid configuration: {err}");
            return ExitCode::FAILURE;
        }
    };

    let logging = LogTarget::from_dir(&settings.log.dir)
        .and_then(|target| init_logging(&settings.log.level, target));
    if let Err(err) = logging {
        eprintln!("todo_server: logging disabled: {err}");
    }

    match run(settings).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            error!("event=server_exit module=server status=error error={err}");
            eprintln!("todo_server: {err}");
            ExitCode::FAILURE
        }
    }
}

async fn run(settings: Settings) -> Result<(), Box<dyn std::error::Error>> {
    let store = match settings.database.file() {
        Some(path) => {
            info!("event=store_open module=server mode=file path={}", path.display());
            SqliteStore::open(path)?
        }
        None => SqliteStore::open_in_memory()?,
    };

    let listener = TcpListener::bind(settings.server.addr()).await?;
    serve(listener, Arc::new(store)).await?;
    Ok(())
}
