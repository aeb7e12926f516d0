//! Server settings.
//!
//! # Responsibility
//! - Resolve listen address, database path and log settings.
//!
//! # Invariants
//! - Precedence is defaults, then the optional TOML file, then `TODO__*`
//!   environment variables.
//! - A missing config file is not an error.

use config::{Config, ConfigError, Environment, File, FileFormat};
use serde::Deserialize;
use std::path::PathBuf;

/// Default config file looked up in the working directory.
pub const DEFAULT_CONFIG_FILE: &str = "todo_server.toml";

#[derive(Debug, Deserialize)]
pub struct Server {
    pub host: String,
    pub port: u16,
}

impl Server {
    pub fn addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

#[derive(Debug, Deserialize)]
pub struct Database {
    /// SQLite file path; blank keeps the table in memory.
    pub path: String,
}

impl Database {
    pub fn file(&self) -> Option<PathBuf> {
        let trimmed = self.path.trim();
        (!trimmed.is_empty()).then(|| PathBuf::from(trimmed))
    }
}

#[derive(Debug, Deserialize)]
pub struct Log {
    pub level: String,
    /// Absolute directory for rolling log files; blank logs to stderr.
    pub dir: String,
}

#[derive(Debug, Deserialize)]
pub struct Settings {
    pub server: Server,
    pub database: Database,
    pub log: Log,
}

impl Settings {
    /// Loads defaults, then `todo_server.toml`, then `TODO__*` env vars.
    pub fn new() -> Result<Self, ConfigError> {
        Self::from_file(DEFAULT_CONFIG_FILE)
    }

    /// Same layering as [`Settings::new`] with an explicit optional file.
    pub fn from_file(path: &str) -> Result<Self, ConfigError> {
        let config = Config::builder()
            .set_default("server.host", "127.0.0.1")?
            .set_default("server.port", 3000)?
            .set_default("database.path", "todos.sqlite3")?
            .set_default("log.level", todo_core::default_log_level())?
            .set_default("log.dir", "")?
            .add_source(File::with_name(path).format(FileFormat::Toml).required(false))
            .add_source(
                Environment::with_prefix("TODO")
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        config.try_deserialize()
    }
}

#[cfg(test)]
mod tests {
    use super::Settings;
    use std::io::Write;

    #[test]
    fn defaults_apply_without_a_file() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("absent.toml");

        let settings = Settings::from_file(missing.to_str().unwrap()).unwrap();

        assert_eq!(settings.server.addr(), "127.0.0.1:3000");
        assert!(settings.database.file().is_some());
        assert!(settings.log.dir.is_empty());
    }

    #[test]
    fn file_values_override_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("todo_server.toml");
        let mut file = std::fs::File::create(&path).unwrap();
        writeln!(
            file,
            "[server]\nport = 8088\n\n[database]\npath = \"\"\n\n[log]\nlevel = \"warn\""
        )
        .unwrap();

        let settings = Settings::from_file(path.to_str().unwrap()).unwrap();

        assert_eq!(settings.server.port, 8088);
        assert_eq!(settings.server.host, "127.0.0.1");
        assert!(settings.database.file().is_none());
        assert_eq!(settings.log.level, "warn");
    }
}
