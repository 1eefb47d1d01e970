//! FFI use-case API for Flutter-facing calls.
//!
//! # Responsibility
//! - Expose the task-list intents to Dart via FRB.
//! - Own the process-wide composition root: one store, one edit session,
//!   one deletion coordinator, one creation pulse.
//!
//! # Invariants
//! - Exported functions must not panic across the FFI boundary.
//! - All state mutation goes through the single locked session; calls are
//!   serialized, so no two mutations ever interleave.
//! - Animation frames returned here are instructions for the UI's animation
//!   capability; the matching `notify_*` call reports completion back.

use quicktask_core::db::open_db;
use quicktask_core::{
    core_version as core_version_inner, init_logging as init_logging_inner, ping as ping_inner,
    CreationPulse, DeletionCoordinator, EditSession, LoadedSlot, PulseSignal, RepoResult,
    SlideSignal, SqliteTaskSlotRepository, Task, TaskId, TaskSlotRepository, TaskStore,
};
use rusqlite::Connection;
use std::sync::{Mutex, OnceLock};
use uuid::Uuid;

static SESSION: OnceLock<Mutex<AppSession>> = OnceLock::new();

/// Slot repository owning the session connection.
///
/// The core repository borrows a connection; the process-wide session needs
/// ownership, so this wrapper holds the connection and rebuilds the
/// borrowed repository per call, the schema guard included.
struct SessionSlotRepository {
    conn: Connection,
}

impl TaskSlotRepository for SessionSlotRepository {
    fn load_slot(&self) -> RepoResult<LoadedSlot> {
        SqliteTaskSlotRepository::try_new(&self.conn)?.load_slot()
    }

    fn save_slot(&self, tasks: &[Task]) -> RepoResult<()> {
        SqliteTaskSlotRepository::try_new(&self.conn)?.save_slot(tasks)
    }
}

struct AppSession {
    store: TaskStore<SessionSlotRepository>,
    edit: EditSession,
    deletions: DeletionCoordinator,
    pulse: CreationPulse,
}

/// Minimal health-check API for FRB smoke integration.
///
/// # FFI contract
/// - Sync call, non-blocking.
/// - Never throws; always returns a UTF-8 string.
#[flutter_rust_bridge::frb(sync)]
pub fn ping() -> String {
    ping_inner().to_owned()
}

/// Expose core crate version through FFI.
///
/// # FFI contract
/// - Sync call, non-blocking.
/// - Never throws; always returns a UTF-8 string.
#[flutter_rust_bridge::frb(sync)]
pub fn core_version() -> String {
    core_version_inner().to_owned()
}

/// Initializes Rust core logging once per process.
///
/// Input semantics:
/// - `level`: one of `trace|debug|info|warn|error` (case-insensitive).
/// - `log_dir`: absolute directory path where rolling logs are written.
///
/// # FFI contract
/// - Sync call; may perform small file-system setup work.
/// - Safe to call repeatedly with the same `level + log_dir` (idempotent).
/// - Never panics; returns empty string on success and error message on
///   failure.
#[flutter_rust_bridge::frb(sync)]
pub fn init_logging(level: String, log_dir: String) -> String {
    match init_logging_inner(level.as_str(), log_dir.as_str()) {
        Ok(()) => String::new(),
        Err(err) => err,
    }
}

/// Generic action response envelope for task-list intents.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActionResponse {
    /// Whether the intent committed a state change.
    pub ok: bool,
    /// Human-readable response message for diagnostics/UI.
    pub message: String,
}

impl ActionResponse {
    fn success(message: impl Into<String>) -> Self {
        Self {
            ok: true,
            message: message.into(),
        }
    }

    fn noop(message: impl Into<String>) -> Self {
        Self {
            ok: false,
            message: message.into(),
        }
    }
}

/// One animation instruction for the UI's animation capability.
#[derive(Debug, Clone, PartialEq)]
pub struct AnimationFrame {
    /// Target parameter value to animate toward.
    pub to_value: f64,
    /// Transition duration in milliseconds.
    pub duration_ms: u64,
}

impl From<SlideSignal> for AnimationFrame {
    fn from(signal: SlideSignal) -> Self {
        Self {
            to_value: f64::from(signal.to_offset),
            duration_ms: signal.duration_ms,
        }
    }
}

impl From<PulseSignal> for AnimationFrame {
    fn from(signal: PulseSignal) -> Self {
        Self {
            to_value: f64::from(signal.to_value),
            duration_ms: signal.duration_ms,
        }
    }
}

/// Response for the add intent, carrying the creation-feedback pulse.
#[derive(Debug, Clone, PartialEq)]
pub struct AddTaskResponse {
    pub ok: bool,
    /// Created task id in string form.
    pub task_id: Option<String>,
    pub message: String,
    /// Scale-up frame to run now; absent when the add was a no-op.
    pub pulse: Option<AnimationFrame>,
}

/// Response for delete requests and slide-completion notifications.
#[derive(Debug, Clone, PartialEq)]
pub struct RemoveTaskResponse {
    pub ok: bool,
    pub message: String,
    /// Task whose slide should run next, when a slide is starting.
    pub slide_task_id: Option<String>,
    /// Slide frame to run now; absent when the request queued or the
    /// queue drained.
    pub slide: Option<AnimationFrame>,
}

/// Response for pulse-completion notifications.
#[derive(Debug, Clone, PartialEq)]
pub struct PulseResponse {
    pub ok: bool,
    /// Next pulse phase to run; absent once the sequence finished.
    pub next: Option<AnimationFrame>,
}

/// One rendered row of the task list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskItem {
    pub task_id: String,
    pub text: String,
    pub completed: bool,
}

/// Snapshot of the task collection for list display.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskListResponse {
    pub items: Vec<TaskItem>,
    /// Present when startup recovered from a bad persisted payload; the UI
    /// may surface it once.
    pub recovery_note: Option<String>,
}

/// Current edit-session state, for showing/hiding the edit field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EditStateResponse {
    pub active: bool,
    pub target_id: Option<String>,
    pub draft: String,
}

/// Opens the process-wide task session against a database file.
///
/// # FFI contract
/// - Sync call, DB-backed execution.
/// - Idempotent: a second call is a success no-op; the path of the first
///   call wins for the process lifetime.
/// - Never panics.
#[flutter_rust_bridge::frb(sync)]
pub fn open_session(db_path: String) -> ActionResponse {
    if SESSION.get().is_some() {
        return ActionResponse::success("Session already open.");
    }

    let conn = match open_db(db_path.trim()) {
        Ok(conn) => conn,
        Err(err) => return ActionResponse::noop(format!("open_session failed: {err}")),
    };
    if let Err(err) = SqliteTaskSlotRepository::try_new(&conn) {
        return ActionResponse::noop(format!("open_session failed: {err}"));
    }

    let session = AppSession {
        store: TaskStore::open(SessionSlotRepository { conn }),
        edit: EditSession::new(),
        deletions: DeletionCoordinator::new(),
        pulse: CreationPulse::new(),
    };

    match SESSION.set(Mutex::new(session)) {
        Ok(()) => {
            log::info!("event=session_open module=ffi status=ok");
            ActionResponse::success("Session open.")
        }
        Err(_) => ActionResponse::success("Session already open."),
    }
}

/// Adds a new task from the input field.
///
/// Blank input (after trimming) is a silent no-op; accepted text is stored
/// untrimmed. A successful add returns the scale-up pulse frame, and the
/// UI should clear the input field.
///
/// # FFI contract
/// - Sync call; persists the updated collection before returning.
/// - Never panics.
#[flutter_rust_bridge::frb(sync)]
pub fn add_new_task(text: String) -> AddTaskResponse {
    let outcome = with_session(|session| {
        let id = session.store.add(&text)?;
        Some((id, session.pulse.trigger()))
    });

    match outcome {
        Ok(Some((id, pulse))) => AddTaskResponse {
            ok: true,
            task_id: Some(id.to_string()),
            message: "Task created.".to_string(),
            pulse: Some(pulse.into()),
        },
        Ok(None) => AddTaskResponse {
            ok: false,
            task_id: None,
            message: "Task text is empty.".to_string(),
            pulse: None,
        },
        Err(message) => AddTaskResponse {
            ok: false,
            task_id: None,
            message,
            pulse: None,
        },
    }
}

/// Flips the completion flag of one task.
///
/// # FFI contract
/// - Sync call; unknown ids are a no-op, not an error.
/// - Never panics.
#[flutter_rust_bridge::frb(sync)]
pub fn toggle_completion_status(task_id: String) -> ActionResponse {
    let id = match parse_task_id(&task_id) {
        Ok(id) => id,
        Err(response) => return response,
    };

    match with_session(|session| session.store.toggle(id)) {
        Ok(true) => ActionResponse::success("Task toggled."),
        Ok(false) => ActionResponse::noop("Task not found."),
        Err(message) => ActionResponse::noop(message),
    }
}

/// Starts editing one task, seeding the draft with its current text.
///
/// # FFI contract
/// - Sync call; replaces any active edit, discarding its draft.
/// - Unknown ids leave the session unchanged.
/// - Never panics.
#[flutter_rust_bridge::frb(sync)]
pub fn start_edit_task(task_id: String) -> ActionResponse {
    let id = match parse_task_id(&task_id) {
        Ok(id) => id,
        Err(response) => return response,
    };

    match with_session(|session| {
        let AppSession { store, edit, .. } = session;
        edit.start(store, id)
    }) {
        Ok(true) => ActionResponse::success("Edit started."),
        Ok(false) => ActionResponse::noop("Task not found."),
        Err(message) => ActionResponse::noop(message),
    }
}

/// Replaces the draft text of the active edit.
///
/// # FFI contract
/// - Sync call; no validation is applied to the draft.
/// - A no-op when no edit is active.
/// - Never panics.
#[flutter_rust_bridge::frb(sync)]
pub fn update_draft_text(text: String) -> ActionResponse {
    match with_session(|session| session.edit.update_draft(text)) {
        Ok(true) => ActionResponse::success("Draft updated."),
        Ok(false) => ActionResponse::noop("No edit in progress."),
        Err(message) => ActionResponse::noop(message),
    }
}

/// Commits the active draft and closes the edit session.
///
/// # FFI contract
/// - Sync call; persists the updated collection before returning.
/// - A no-op when no edit is active.
/// - Never panics.
#[flutter_rust_bridge::frb(sync)]
pub fn save_edited_task() -> ActionResponse {
    match with_session(|session| {
        let AppSession { store, edit, .. } = session;
        edit.commit(store)
    }) {
        Ok(true) => ActionResponse::success("Task saved."),
        Ok(false) => ActionResponse::noop("No edit in progress."),
        Err(message) => ActionResponse::noop(message),
    }
}

/// Requests deletion of one task.
///
/// The task stays in the collection until the UI runs the returned slide
/// frame and calls [`notify_slide_finished`]. Requests during an active
/// slide queue and start later; duplicates are dropped.
///
/// # FFI contract
/// - Sync call; mutates nothing by itself.
/// - Never panics.
#[flutter_rust_bridge::frb(sync)]
pub fn remove_task(task_id: String) -> RemoveTaskResponse {
    let id = match parse_task_id(&task_id) {
        Ok(id) => id,
        Err(response) => {
            return RemoveTaskResponse {
                ok: false,
                message: response.message,
                slide_task_id: None,
                slide: None,
            }
        }
    };

    match with_session(|session| session.deletions.request_delete(id)) {
        Ok(Some(signal)) => RemoveTaskResponse {
            ok: true,
            message: "Slide started.".to_string(),
            slide_task_id: Some(signal.task_id.to_string()),
            slide: Some(signal.into()),
        },
        Ok(None) => RemoveTaskResponse {
            ok: true,
            message: "Deletion queued.".to_string(),
            slide_task_id: None,
            slide: None,
        },
        Err(message) => RemoveTaskResponse {
            ok: false,
            message,
            slide_task_id: None,
            slide: None,
        },
    }
}

/// Reports that the running slide transition finished.
///
/// Commits the pending removal, persists the collection, and returns the
/// next queued slide when one is waiting.
///
/// # FFI contract
/// - Sync call; the only place deletion mutates the collection.
/// - A no-op when no slide is active.
/// - Never panics.
#[flutter_rust_bridge::frb(sync)]
pub fn notify_slide_finished() -> RemoveTaskResponse {
    match with_session(|session| {
        let AppSession {
            store, deletions, ..
        } = session;
        deletions.finish_slide(store)
    }) {
        Ok(Some(signal)) => RemoveTaskResponse {
            ok: true,
            message: "Removal committed; next slide started.".to_string(),
            slide_task_id: Some(signal.task_id.to_string()),
            slide: Some(signal.into()),
        },
        Ok(None) => RemoveTaskResponse {
            ok: true,
            message: "Removal committed.".to_string(),
            slide_task_id: None,
            slide: None,
        },
        Err(message) => RemoveTaskResponse {
            ok: false,
            message,
            slide_task_id: None,
            slide: None,
        },
    }
}

/// Reports that the running pulse phase finished.
///
/// # FFI contract
/// - Sync call; returns the scale-down frame after scale-up, nothing after
///   that.
/// - Never panics.
#[flutter_rust_bridge::frb(sync)]
pub fn notify_pulse_finished() -> PulseResponse {
    match with_session(|session| session.pulse.advance()) {
        Ok(next) => PulseResponse {
            ok: true,
            next: next.map(AnimationFrame::from),
        },
        Err(_) => PulseResponse {
            ok: false,
            next: None,
        },
    }
}

/// Returns the current task collection snapshot for list display.
///
/// # FFI contract
/// - Sync call, read-only.
/// - Never panics.
#[flutter_rust_bridge::frb(sync)]
pub fn list_tasks() -> TaskListResponse {
    match with_session(|session| {
        let items = session
            .store
            .tasks()
            .iter()
            .map(|task| TaskItem {
                task_id: task.id.to_string(),
                text: task.text.clone(),
                completed: task.completed,
            })
            .collect::<Vec<_>>();
        let recovery_note = session.store.startup_recovery().map(str::to_owned);
        (items, recovery_note)
    }) {
        Ok((items, recovery_note)) => TaskListResponse {
            items,
            recovery_note,
        },
        Err(_) => TaskListResponse {
            items: Vec::new(),
            recovery_note: None,
        },
    }
}

/// Returns the current edit-session state.
///
/// # FFI contract
/// - Sync call, read-only.
/// - Never panics.
#[flutter_rust_bridge::frb(sync)]
pub fn edit_state() -> EditStateResponse {
    match with_session(|session| {
        (
            session.edit.is_editing(),
            session.edit.target().map(|id| id.to_string()),
            session.edit.draft().unwrap_or_default().to_string(),
        )
    }) {
        Ok((active, target_id, draft)) => EditStateResponse {
            active,
            target_id,
            draft,
        },
        Err(_) => EditStateResponse {
            active: false,
            target_id: None,
            draft: String::new(),
        },
    }
}

fn parse_task_id(raw: &str) -> Result<TaskId, ActionResponse> {
    Uuid::parse_str(raw.trim())
        .map_err(|_| ActionResponse::noop(format!("invalid task id: `{raw}`")))
}

fn with_session<T>(f: impl FnOnce(&mut AppSession) -> T) -> Result<T, String> {
    let mutex = SESSION
        .get()
        .ok_or_else(|| "session not open; call open_session first".to_string())?;
    let mut guard = mutex
        .lock()
        .map_err(|_| "session state poisoned".to_string())?;
    Ok(f(&mut guard))
}

#[cfg(test)]
mod tests {
    use super::{
        add_new_task, core_version, edit_state, init_logging, list_tasks, notify_pulse_finished,
        notify_slide_finished, open_session, ping, remove_task, save_edited_task, start_edit_task,
        toggle_completion_status, update_draft_text,
    };
    use std::time::{SystemTime, UNIX_EPOCH};

    #[test]
    fn ping_returns_pong() {
        assert_eq!(ping(), "pong");
    }

    #[test]
    fn version_is_not_empty() {
        assert!(!core_version().is_empty());
    }

    #[test]
    fn init_logging_rejects_empty_log_dir() {
        let error = init_logging("info".to_string(), String::new());
        assert!(!error.is_empty());
    }

    #[test]
    fn init_logging_rejects_unsupported_level() {
        let error = init_logging("verbose".to_string(), "tmp/logs".to_string());
        assert!(!error.is_empty());
    }

    #[test]
    fn invalid_task_id_is_rejected_without_panicking() {
        let response = toggle_completion_status("not-a-uuid".to_string());
        assert!(!response.ok);
    }

    // The session is a process-wide singleton, so the full user flow runs
    // in one test to keep ordering deterministic.
    #[test]
    fn session_flow_via_ffi_surface() {
        // Intents before open_session fail gracefully.
        let early = add_new_task("too early".to_string());
        assert!(!early.ok);
        assert!(early.message.contains("session not open"));

        let db_path = unique_db_path();
        let opened = open_session(db_path.clone());
        assert!(opened.ok, "{}", opened.message);
        let reopened = open_session(db_path);
        assert!(reopened.ok);

        // Add: blank input is a no-op with no pulse.
        assert!(!add_new_task("   ".to_string()).ok);
        let added = add_new_task("Buy milk".to_string());
        assert!(added.ok, "{}", added.message);
        let task_id = added.task_id.clone().unwrap();
        let pulse_up = added.pulse.unwrap();
        assert!(pulse_up.to_value > 0.0);

        // Pulse runs scale-up then scale-down then ends.
        let pulse_down = notify_pulse_finished().next.unwrap();
        assert_eq!(pulse_down.to_value, 0.0);
        assert!(notify_pulse_finished().next.is_none());

        // Toggle and edit through the intent surface.
        assert!(toggle_completion_status(task_id.clone()).ok);
        assert!(start_edit_task(task_id.clone()).ok);
        let state = edit_state();
        assert!(state.active);
        assert_eq!(state.draft, "Buy milk");
        assert!(update_draft_text("Buy oat milk".to_string()).ok);
        assert!(save_edited_task().ok);
        assert!(!edit_state().active);

        let listed = list_tasks();
        assert_eq!(listed.items.len(), 1);
        assert_eq!(listed.items[0].text, "Buy oat milk");
        assert!(listed.items[0].completed);

        // Delete: nothing is removed until the slide completion arrives.
        let removal = remove_task(task_id);
        assert!(removal.ok);
        assert!(removal.slide.is_some());
        assert_eq!(list_tasks().items.len(), 1);

        let committed = notify_slide_finished();
        assert!(committed.ok);
        assert!(committed.slide.is_none());
        assert!(list_tasks().items.is_empty());
    }

    fn unique_db_path() -> String {
        let nanos = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .expect("time went backwards")
            .as_nanos();
        std::env::temp_dir()
            .join(format!("quicktask-ffi-{}-{nanos}.db", std::process::id()))
            .to_string_lossy()
            .into_owned()
    }
}
