//! Domain model for the task list.
//!
//! # Responsibility
//! - Define the canonical task record shared by store, persistence and FFI.
//!
//! # Invariants
//! - Every task is identified by a stable `TaskId` assigned at creation.
//! - Collection order is creation order; no operation reorders tasks.
//!
//! # See also
//! - docs/architecture/data-model.md

pub mod task;
