//! Domain model for the todo collection.
//!
//! # Responsibility
//! - Define the single persisted entity (`Task`) and its partial-update shape.
//! - Provide the derived, non-persisted view types (`Filter`, `Stats`).
//!
//! # Invariants
//! - Every task is identified by a stable `TaskId`.
//! - Deletion is a hard delete; there are no tombstones or history.

pub mod filter;
pub mod task;
