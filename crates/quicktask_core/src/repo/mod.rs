//! Repository layer abstractions and persistence implementations.
//!
//! # Responsibility
//! - Define the slot persistence contract used by the task store.
//! - Isolate SQLite and payload-encoding details from store orchestration.
//!
//! # Invariants
//! - Every save writes the full task collection, never a delta.
//! - Load never fails on missing or malformed payloads; it recovers to an
//!   empty collection and reports the recovery to the caller.

pub mod task_slot_repo;
