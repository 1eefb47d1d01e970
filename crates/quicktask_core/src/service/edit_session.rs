//! Single-task edit session state machine.
//!
//! # Responsibility
//! - Track the one task currently being edited and its unsaved draft.
//! - Commit drafts through the task store.
//!
//! # Invariants
//! - At most one task is being edited at a time.
//! - Starting a new edit while one is active silently discards the
//!   previous draft; there is no merge and no confirmation.
//! - There is no explicit cancel path: the session leaves `Editing` only
//!   through `commit` or by starting a different edit.

use crate::model::task::TaskId;
use crate::repo::task_slot_repo::TaskSlotRepository;
use crate::service::task_store::TaskStore;
use log::debug;

#[derive(Debug, Clone, PartialEq, Eq, Default)]
enum EditState {
    #[default]
    Idle,
    Editing {
        target: TaskId,
        draft: String,
    },
}

/// Tracks the task being edited and its draft text.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct EditSession {
    state: EditState,
}

impl EditSession {
    pub fn new() -> Self {
        Self::default()
    }

    /// Begins editing the given task, seeding the draft with its current
    /// text. Replaces any active edit, discarding that draft.
    ///
    /// An unknown id leaves the session unchanged and returns `false`.
    pub fn start<R: TaskSlotRepository>(&mut self, store: &TaskStore<R>, id: TaskId) -> bool {
        let Some(task) = store.get(id) else {
            debug!("event=edit_start module=edit status=ignored reason=unknown_id id={id}");
            return false;
        };

        self.state = EditState::Editing {
            target: id,
            draft: task.text.clone(),
        };
        debug!("event=edit_start module=edit status=ok id={id}");
        true
    }

    /// Replaces the draft text. Valid only while editing; no validation.
    pub fn update_draft(&mut self, text: impl Into<String>) -> bool {
        match &mut self.state {
            EditState::Editing { draft, .. } => {
                *draft = text.into();
                true
            }
            EditState::Idle => false,
        }
    }

    /// Commits the draft to the store and returns the session to idle.
    ///
    /// Committing while idle is a no-op. The draft is written verbatim; if
    /// the target task was removed mid-edit the store edit is itself a
    /// no-op, but the session still resets.
    pub fn commit<R: TaskSlotRepository>(&mut self, store: &mut TaskStore<R>) -> bool {
        match std::mem::take(&mut self.state) {
            EditState::Editing { target, draft } => {
                store.edit(target, draft);
                debug!("event=edit_commit module=edit status=ok id={target}");
                true
            }
            EditState::Idle => false,
        }
    }

    pub fn is_editing(&self) -> bool {
        matches!(self.state, EditState::Editing { .. })
    }

    /// Id of the task being edited, when active.
    pub fn target(&self) -> Option<TaskId> {
        match &self.state {
            EditState::Editing { target, .. } => Some(*target),
            EditState::Idle => None,
        }
    }

    /// Current draft text, when active.
    pub fn draft(&self) -> Option<&str> {
        match &self.state {
            EditState::Editing { draft, .. } => Some(draft.as_str()),
            EditState::Idle => None,
        }
    }
}
