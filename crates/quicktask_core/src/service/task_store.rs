//! Authoritative task collection and its mutation operations.
//!
//! # Responsibility
//! - Own the in-memory task list exclusively; all reads go through
//!   accessors or snapshots.
//! - Persist the full collection after every committed mutation.
//!
//! # Invariants
//! - No two tasks share an id; order is creation order and is never
//!   reordered by any operation.
//! - Every committed mutation triggers exactly one slot write; no-ops
//!   trigger none. Writes are not batched or debounced.
//! - Save failures never roll back in-memory state; the collection stays
//!   authoritative even when the persisted copy is stale.

use crate::model::task::{Task, TaskId};
use crate::repo::task_slot_repo::TaskSlotRepository;
use log::{debug, error, info};

/// In-memory task store backed by a slot repository.
pub struct TaskStore<R: TaskSlotRepository> {
    repo: R,
    tasks: Vec<Task>,
    startup_recovery: Option<String>,
}

impl<R: TaskSlotRepository> TaskStore<R> {
    /// Opens the store by loading the persisted slot.
    ///
    /// Load problems never fail startup: a missing slot means first run, a
    /// malformed or unreadable slot is recovered as an empty collection and
    /// remembered in [`TaskStore::startup_recovery`] for the UI layer.
    pub fn open(repo: R) -> Self {
        let (tasks, startup_recovery) = match repo.load_slot() {
            Ok(loaded) => {
                let recovery = loaded.recovery.map(|note| {
                    error!("event=slot_load module=store status=recovered error={note}");
                    note.to_string()
                });
                (loaded.tasks, recovery)
            }
            Err(err) => {
                error!("event=slot_load module=store status=error error={err}");
                (Vec::new(), Some(err.to_string()))
            }
        };

        info!(
            "event=store_open module=store status=ok count={} recovered={}",
            tasks.len(),
            startup_recovery.is_some()
        );

        Self {
            repo,
            tasks,
            startup_recovery,
        }
    }

    /// Adds a new task from raw user input.
    ///
    /// Trimming applies to the validity check only: blank input is a silent
    /// no-op, but accepted input is stored untrimmed, exactly as entered.
    /// Returns the new task id on success.
    pub fn add(&mut self, raw_text: &str) -> Option<TaskId> {
        if raw_text.trim().is_empty() {
            debug!("event=task_add module=store status=ignored reason=blank_text");
            return None;
        }

        let task = Task::new(raw_text);
        let id = task.id;
        self.tasks.push(task);
        debug!("event=task_add module=store status=ok id={id}");
        self.persist();
        Some(id)
    }

    /// Removes the task with the given id; silent no-op when absent.
    pub fn remove(&mut self, id: TaskId) -> bool {
        let Some(index) = self.tasks.iter().position(|task| task.id == id) else {
            debug!("event=task_remove module=store status=ignored reason=unknown_id id={id}");
            return false;
        };

        self.tasks.remove(index);
        debug!("event=task_remove module=store status=ok id={id}");
        self.persist();
        true
    }

    /// Flips the completion flag on the matching task; no-op when absent.
    pub fn toggle(&mut self, id: TaskId) -> bool {
        let Some(task) = self.tasks.iter_mut().find(|task| task.id == id) else {
            debug!("event=task_toggle module=store status=ignored reason=unknown_id id={id}");
            return false;
        };

        task.toggle_completed();
        debug!(
            "event=task_toggle module=store status=ok id={id} completed={}",
            task.completed
        );
        self.persist();
        true
    }

    /// Replaces the text on the matching task verbatim; no-op when absent.
    ///
    /// Unlike [`TaskStore::add`], edit performs no validation at all: empty
    /// and whitespace-only replacements are committed as-is.
    pub fn edit(&mut self, id: TaskId, new_text: impl Into<String>) -> bool {
        let Some(task) = self.tasks.iter_mut().find(|task| task.id == id) else {
            debug!("event=task_edit module=store status=ignored reason=unknown_id id={id}");
            return false;
        };

        task.text = new_text.into();
        debug!("event=task_edit module=store status=ok id={id}");
        self.persist();
        true
    }

    /// Looks up a task by id.
    pub fn get(&self, id: TaskId) -> Option<&Task> {
        self.tasks.iter().find(|task| task.id == id)
    }

    /// Borrowed view of the collection in insertion order.
    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    /// Immutable point-in-time copy of the collection for rendering.
    pub fn snapshot(&self) -> Vec<Task> {
        self.tasks.clone()
    }

    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    /// Human-readable note when startup recovered from a bad slot payload.
    pub fn startup_recovery(&self) -> Option<&str> {
        self.startup_recovery.as_deref()
    }

    /// Writes the full collection to the slot.
    ///
    /// Failures are reported and swallowed: persistence is fire-and-forget
    /// for mutation callers, and the write is not retried.
    fn persist(&self) {
        match self.repo.save_slot(&self.tasks) {
            Ok(()) => {
                debug!(
                    "event=slot_save module=store status=ok count={}",
                    self.tasks.len()
                );
            }
            Err(err) => {
                error!("event=slot_save module=store status=error error={err}");
            }
        }
    }
}
