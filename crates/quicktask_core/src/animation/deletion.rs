//! Two-phase deletion coordinator.
//!
//! # Responsibility
//! - Guarantee the authoritative removal happens only after the renderer
//!   reports the slide transition complete.
//! - Serialize deletions over the single shared slide parameter.
//!
//! # Invariants
//! - `TaskStore::remove` for a coordinated deletion is never called before
//!   the matching completion signal.
//! - At most one slide is active; further requests queue FIFO and start
//!   only after the active removal commits.
//! - The shared slide parameter reads neutral whenever no slide is active.
//!
//! There is no timeout: a completion signal that never arrives leaves the
//! active deletion pending (and later requests queued) indefinitely.

use crate::animation::{SLIDE_DURATION_MS, SLIDE_NEUTRAL, SLIDE_OFFSET};
use crate::model::task::TaskId;
use crate::repo::task_slot_repo::TaskSlotRepository;
use crate::service::task_store::TaskStore;
use log::{debug, info};
use std::collections::VecDeque;

/// Instruction for the renderer to run one slide transition.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SlideSignal {
    /// Task whose row should slide out.
    pub task_id: TaskId,
    /// Target value for the shared slide parameter.
    pub to_offset: f32,
    /// Transition duration in milliseconds.
    pub duration_ms: u64,
}

/// Sequences visual removal with authoritative state mutation.
#[derive(Debug, Default)]
pub struct DeletionCoordinator {
    active: Option<TaskId>,
    queued: VecDeque<TaskId>,
    slide_offset: f32,
}

impl DeletionCoordinator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Requests deletion of a task.
    ///
    /// Returns the slide signal to run now, or `None` when the request was
    /// queued behind an active slide or dropped as a duplicate. The task
    /// itself is not touched until [`DeletionCoordinator::finish_slide`].
    pub fn request_delete(&mut self, id: TaskId) -> Option<SlideSignal> {
        if self.active == Some(id) || self.queued.contains(&id) {
            debug!("event=delete_request module=animation status=ignored reason=duplicate id={id}");
            return None;
        }

        if self.active.is_some() {
            self.queued.push_back(id);
            debug!(
                "event=delete_request module=animation status=queued id={id} depth={}",
                self.queued.len()
            );
            return None;
        }

        Some(self.begin(id))
    }

    /// Commits the active deletion after the renderer reports the slide
    /// transition complete, resets the shared parameter, and starts the
    /// next queued slide if any.
    ///
    /// A completion signal with no active slide is a silent no-op.
    pub fn finish_slide<R: TaskSlotRepository>(
        &mut self,
        store: &mut TaskStore<R>,
    ) -> Option<SlideSignal> {
        let id = self.active.take()?;

        store.remove(id);
        self.slide_offset = SLIDE_NEUTRAL;
        info!("event=delete_commit module=animation status=ok id={id}");

        let next = self.queued.pop_front()?;
        Some(self.begin(next))
    }

    /// Task whose slide is currently running, if any.
    pub fn active(&self) -> Option<TaskId> {
        self.active
    }

    /// Current value of the shared slide parameter.
    pub fn slide_offset(&self) -> f32 {
        self.slide_offset
    }

    /// True when no slide is running and nothing is queued.
    pub fn is_idle(&self) -> bool {
        self.active.is_none() && self.queued.is_empty()
    }

    fn begin(&mut self, id: TaskId) -> SlideSignal {
        self.active = Some(id);
        self.slide_offset = SLIDE_OFFSET;
        info!("event=delete_request module=animation status=started id={id}");
        SlideSignal {
            task_id: id,
            to_offset: SLIDE_OFFSET,
            duration_ms: SLIDE_DURATION_MS,
        }
    }
}
