//! Core task-list engine for QuickTask.
//! This crate is the single source of truth for task-state invariants.

pub mod animation;
pub mod db;
pub mod logging;
pub mod model;
pub mod repo;
pub mod service;

pub use animation::deletion::{DeletionCoordinator, SlideSignal};
pub use animation::pulse::{CreationPulse, PulsePhase, PulseSignal};
pub use logging::{default_log_level, init_logging, logging_status};
pub use model::task::{Task, TaskId};
pub use repo::task_slot_repo::{
    LoadedSlot, RepoError, RepoResult, SlotRecovery, SqliteTaskSlotRepository, TaskSlotRepository,
    TASKS_SLOT_KEY,
};
pub use service::edit_session::EditSession;
pub use service::task_store::TaskStore;

/// Minimal health-check API for early integration.
pub fn ping() -> &'static str {
    "pong"
}

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[cfg(test)]
mod tests {
    use super::{core_version, ping};

    #[test]
    fn ping_returns_pong() {
        assert_eq!(ping(), "pong");
    }

    #[test]
    fn version_is_not_empty() {
        assert!(!core_version().is_empty());
    }
}
