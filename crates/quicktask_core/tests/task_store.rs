use quicktask_core::{
    LoadedSlot, RepoError, RepoResult, SlotRecovery, Task, TaskSlotRepository, TaskStore,
};
use std::cell::RefCell;
use uuid::Uuid;

/// In-memory repository that records every save for write-count assertions.
struct RecordingSlotRepository {
    initial: LoadedSlot,
    saves: RefCell<Vec<Vec<Task>>>,
    fail_saves: bool,
}

impl RecordingSlotRepository {
    fn empty() -> Self {
        Self::with_slot(LoadedSlot {
            tasks: Vec::new(),
            recovery: None,
        })
    }

    fn with_slot(initial: LoadedSlot) -> Self {
        Self {
            initial,
            saves: RefCell::new(Vec::new()),
            fail_saves: false,
        }
    }

    fn failing_saves() -> Self {
        let mut repo = Self::empty();
        repo.fail_saves = true;
        repo
    }

    fn save_count(&self) -> usize {
        self.saves.borrow().len()
    }

    fn last_save(&self) -> Vec<Task> {
        self.saves.borrow().last().cloned().unwrap()
    }
}

impl TaskSlotRepository for &RecordingSlotRepository {
    fn load_slot(&self) -> RepoResult<LoadedSlot> {
        Ok(self.initial.clone())
    }

    fn save_slot(&self, tasks: &[Task]) -> RepoResult<()> {
        self.saves.borrow_mut().push(tasks.to_vec());
        if self.fail_saves {
            return Err(RepoError::MissingRequiredTable("kv_slots"));
        }
        Ok(())
    }
}

#[test]
fn add_appends_incomplete_task_with_unique_id() {
    let repo = RecordingSlotRepository::empty();
    let mut store = TaskStore::open(&repo);

    let first = store.add("Buy milk").unwrap();
    let second = store.add("Walk the dog").unwrap();

    assert_ne!(first, second);
    assert_eq!(store.len(), 2);
    assert_eq!(store.tasks()[0].text, "Buy milk");
    assert!(!store.tasks()[0].completed);
    assert_eq!(store.tasks()[1].text, "Walk the dog");
}

#[test]
fn add_rejects_blank_input_without_writing() {
    let repo = RecordingSlotRepository::empty();
    let mut store = TaskStore::open(&repo);

    assert_eq!(store.add(""), None);
    assert_eq!(store.add("   "), None);
    assert_eq!(store.add("\t\n"), None);

    assert!(store.is_empty());
    assert_eq!(repo.save_count(), 0);
}

#[test]
fn add_trims_for_validation_only_and_stores_untrimmed_text() {
    let repo = RecordingSlotRepository::empty();
    let mut store = TaskStore::open(&repo);

    let id = store.add("  Buy milk  ").unwrap();

    assert_eq!(store.get(id).unwrap().text, "  Buy milk  ");
    assert_eq!(repo.last_save()[0].text, "  Buy milk  ");
}

#[test]
fn toggle_twice_restores_original_state() {
    let repo = RecordingSlotRepository::empty();
    let mut store = TaskStore::open(&repo);

    let id = store.add("Buy milk").unwrap();
    store.toggle(id);
    assert!(store.get(id).unwrap().completed);

    store.toggle(id);
    assert!(!store.get(id).unwrap().completed);
}

#[test]
fn edit_replaces_text_verbatim_without_validation() {
    let repo = RecordingSlotRepository::empty();
    let mut store = TaskStore::open(&repo);

    let id = store.add("Buy milk").unwrap();

    assert!(store.edit(id, "  "));
    assert_eq!(store.get(id).unwrap().text, "  ");

    assert!(store.edit(id, ""));
    assert_eq!(store.get(id).unwrap().text, "");
}

#[test]
fn edit_is_idempotent() {
    let repo = RecordingSlotRepository::empty();
    let mut store = TaskStore::open(&repo);

    let id = store.add("Buy milk").unwrap();
    store.edit(id, "Buy oat milk");
    let after_first = store.snapshot();

    store.edit(id, "Buy oat milk");
    assert_eq!(store.snapshot(), after_first);
}

#[test]
fn remove_is_safe_to_repeat() {
    let repo = RecordingSlotRepository::empty();
    let mut store = TaskStore::open(&repo);

    let id = store.add("Buy milk").unwrap();
    store.add("Walk the dog").unwrap();

    assert!(store.remove(id));
    assert!(!store.remove(id));
    assert_eq!(store.len(), 1);
    assert_eq!(store.tasks()[0].text, "Walk the dog");
}

#[test]
fn unknown_id_operations_are_silent_no_ops_without_writes() {
    let repo = RecordingSlotRepository::empty();
    let mut store = TaskStore::open(&repo);

    store.add("Buy milk").unwrap();
    let writes_after_add = repo.save_count();
    let before = store.snapshot();

    let unknown = Uuid::new_v4();
    assert!(!store.toggle(unknown));
    assert!(!store.edit(unknown, "ghost"));
    assert!(!store.remove(unknown));

    assert_eq!(store.snapshot(), before);
    assert_eq!(repo.save_count(), writes_after_add);
}

#[test]
fn every_committed_mutation_writes_exactly_once() {
    let repo = RecordingSlotRepository::empty();
    let mut store = TaskStore::open(&repo);

    let id = store.add("Buy milk").unwrap();
    store.toggle(id);
    store.edit(id, "Buy oat milk");
    store.remove(id);

    // No batching: four mutations, four full-snapshot writes.
    assert_eq!(repo.save_count(), 4);
    assert!(repo.last_save().is_empty());
}

#[test]
fn remove_preserves_insertion_order_of_remaining_tasks() {
    let repo = RecordingSlotRepository::empty();
    let mut store = TaskStore::open(&repo);

    let a = store.add("a").unwrap();
    let b = store.add("b").unwrap();
    let c = store.add("c").unwrap();

    store.remove(b);

    let ids: Vec<_> = store.tasks().iter().map(|task| task.id).collect();
    assert_eq!(ids, vec![a, c]);
}

#[test]
fn save_failure_keeps_in_memory_state_authoritative() {
    let repo = RecordingSlotRepository::failing_saves();
    let mut store = TaskStore::open(&repo);

    let id = store.add("Buy milk").unwrap();

    assert_eq!(store.len(), 1);
    assert!(store.get(id).is_some());

    // The failed write is not retried; the next mutation writes again.
    store.toggle(id);
    assert_eq!(repo.save_count(), 2);
}

#[test]
fn open_restores_persisted_tasks_in_order() {
    let tasks = vec![Task::new("first"), Task::new("second")];
    let repo = RecordingSlotRepository::with_slot(LoadedSlot {
        tasks: tasks.clone(),
        recovery: None,
    });

    let store = TaskStore::open(&repo);

    assert_eq!(store.tasks(), tasks.as_slice());
    assert!(store.startup_recovery().is_none());
    // Loading is not a mutation; nothing is written back.
    assert_eq!(repo.save_count(), 0);
}

#[test]
fn open_reports_recovery_when_slot_payload_was_discarded() {
    let repo = RecordingSlotRepository::with_slot(LoadedSlot {
        tasks: Vec::new(),
        recovery: Some(SlotRecovery::MalformedPayload {
            detail: "expected value at line 1".to_string(),
        }),
    });

    let store = TaskStore::open(&repo);

    assert!(store.is_empty());
    let note = store.startup_recovery().unwrap();
    assert!(note.contains("malformed slot payload"));
}
