//! Repository layer for the relational todo table.
//!
//! # Responsibility
//! - Define the row-level CRUD contract over `todos`.
//! - Isolate SQLite query details from stores and HTTP handlers.
//!
//! # Invariants
//! - Write paths validate before SQL mutations.
//! - Repository APIs return semantic errors (`NotFound`, `Conflict`) in
//!   addition to DB transport errors.

pub mod task_repo;
