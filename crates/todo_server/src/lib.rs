//! HTTP endpoint layer for the todo table.
//!
//! # Responsibility
//! - Expose list/create/patch/delete over `/todos`.
//! - Load server settings and bootstrap the backing store.
//!
//! # See also
//! - `todo_core::store` for the store contract served here.

pub mod error;
pub mod routes;
pub mod settings;

pub use error::ApiError;
pub use routes::{router, AppState};
pub use settings::Settings;

use log::info;
use std::sync::Arc;
use todo_core::RecordStore;
use tokio::net::TcpListener;

/// Serves the todo API on an already bound listener until the process ends.
pub async fn serve(listener: TcpListener, store: Arc<dyn RecordStore>) -> std::io::Result<()> {
    if let Ok(addr) = listener.local_addr() {
        info!("event=server_listen module=server status=ok addr={addr}");
    }
    axum::serve(listener, router(store)).await
}
