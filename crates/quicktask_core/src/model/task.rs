//! Task domain model.
//!
//! # Responsibility
//! - Define the canonical record rendered by the task list UI.
//! - Provide lifecycle helpers for completion state.
//!
//! # Invariants
//! - `id` is stable and never reused for another task.
//! - `text` is stored verbatim; input validation happens at the store
//!   boundary, not here.
//!
//! # See also
//! - docs/architecture/data-model.md

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Stable identifier for every task in the collection.
///
/// Kept as a type alias to make semantic intent explicit in signatures.
pub type TaskId = Uuid;

/// Canonical task record.
///
/// Serialized field names (`id`, `text`, `completed`) are the wire contract
/// of the persisted slot payload and must stay stable.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    /// Stable global ID used for lookups, removal and edit targeting.
    pub id: TaskId,
    /// Free-form task text, stored exactly as the user entered it.
    pub text: String,
    /// Completion flag, toggled independently of `text`.
    pub completed: bool,
}

impl Task {
    /// Creates a new task with a generated stable ID.
    ///
    /// # Invariants
    /// - `completed` starts as `false`.
    /// - `text` is taken verbatim, untrimmed.
    pub fn new(text: impl Into<String>) -> Self {
        Self::with_id(Uuid::new_v4(), text)
    }

    /// Creates a task with a caller-provided stable ID.
    ///
    /// Used by slot-decoding and test paths where identity already exists.
    pub fn with_id(id: TaskId, text: impl Into<String>) -> Self {
        Self {
            id,
            text: text.into(),
            completed: false,
        }
    }

    /// Flips the completion flag in place.
    pub fn toggle_completed(&mut self) {
        self.completed = !self.completed;
    }
}
