//! Client-side state holder for the todo collection.
//!
//! # Responsibility
//! - Own the in-memory collection, filter, loading flag and last error.
//! - Apply mutations optimistically and reconcile them with a `RecordStore`.
//!
//! # Invariants
//! - Store failures never escape; they become an advisory error plus rollback.
//! - The state lock is never held across a store await.

pub mod todo_state;
