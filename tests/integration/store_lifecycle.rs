//! Integration tests for the task store lifecycle.
//!
//! Drives `TaskStore` through add/update/toggle/reorder/delete against an
//! in-memory slot and checks both the in-memory collection and the
//! snapshot written through after each step.

#![allow(clippy::expect_used, clippy::unwrap_used)]

use std::cell::Cell;
use std::rc::Rc;

use chrono::{TimeZone, Utc};
use taskdeck::persist::{MemorySlot, PersistWarning, SnapshotAdapter, TaskPersistence};
use taskdeck::tasks::TaskStore;
use taskdeck_model::{Priority, TaskId, TaskPatch, TaskStatus, decode_snapshot};

// ---------------------------------------------------------------------------
// Helper functions
// ---------------------------------------------------------------------------

type MemStore = TaskStore<SnapshotAdapter<MemorySlot>>;

/// Opens a store over a fresh in-memory slot and returns both.
fn make_store() -> (MemStore, MemorySlot) {
    let slot = MemorySlot::new();
    let store = TaskStore::open(SnapshotAdapter::new(slot.clone()));
    (store, slot)
}

/// Opens a store whose clock advances one minute per reading.
fn make_ticking_store() -> (MemStore, MemorySlot) {
    let (store, slot) = make_store();
    let tick = Rc::new(Cell::new(1_714_000_000_i64));
    let store = store.with_clock(move || {
        let secs = tick.get();
        tick.set(secs + 60);
        Utc.timestamp_opt(secs, 0).unwrap()
    });
    (store, slot)
}

/// Titles of the collection in stored order.
fn titles(store: &MemStore) -> Vec<String> {
    store.tasks().iter().map(|t| t.title.clone()).collect()
}

/// Decodes whatever the slot currently holds.
fn persisted(slot: &MemorySlot) -> Vec<taskdeck_model::Task> {
    decode_snapshot(&slot.value().expect("slot written")).expect("valid snapshot")
}

// ===========================================================================
// Scenarios
// ===========================================================================

#[test]
fn buy_milk_scenario() {
    let (mut store, slot) = make_ticking_store();

    let task = store.add("Buy milk", "", Priority::Low).unwrap();
    assert_eq!(store.len(), 1);
    assert_eq!(task.status, TaskStatus::Active);
    assert!(task.completed_at.is_none());

    assert_eq!(store.toggle_status(&task.id), Some(TaskStatus::Completed));
    let completed = store.get(&task.id).unwrap().clone();
    assert_eq!(completed.status, TaskStatus::Completed);
    assert!(completed.completed_at.is_some());

    assert!(store.update(&task.id, TaskPatch::priority(Priority::High)));
    let updated = store.get(&task.id).unwrap();
    assert_eq!(updated.priority, Priority::High);
    assert_eq!(updated.status, completed.status);
    assert_eq!(updated.completed_at, completed.completed_at);

    assert!(store.delete(&task.id).is_some());
    assert!(store.is_empty());
    assert!(persisted(&slot).is_empty());
}

#[test]
fn reorder_first_to_third() {
    let (mut store, slot) = make_store();
    for title in ["A", "B", "C", "D"] {
        store.add(title, "", Priority::Medium).unwrap();
    }

    assert!(store.reorder(0, 2));
    assert_eq!(titles(&store), ["B", "C", "A", "D"]);

    let stored: Vec<String> = persisted(&slot).into_iter().map(|t| t.title).collect();
    assert_eq!(stored, ["B", "C", "A", "D"]);
}

#[test]
fn reorder_there_and_back_restores_order() {
    let (mut store, _) = make_store();
    for title in ["A", "B", "C", "D", "E"] {
        store.add(title, "", Priority::Medium).unwrap();
    }
    let original = store.tasks().to_vec();

    assert!(store.reorder(1, 4));
    assert!(store.reorder(4, 1));
    assert_eq!(store.tasks(), original.as_slice());
}

#[test]
fn toggle_twice_restores_status_but_restamps_completion() {
    let (mut store, _) = make_ticking_store();
    let task = store.add("Water plants", "", Priority::Medium).unwrap();

    store.toggle_status(&task.id).unwrap();
    store.toggle_status(&task.id).unwrap();
    let back = store.get(&task.id).unwrap();
    assert_eq!(back.status, TaskStatus::Active);
    assert!(back.completed_at.is_none());

    store.toggle_status(&task.id).unwrap();
    let first = store.get(&task.id).unwrap().completed_at.unwrap();
    store.toggle_status(&task.id).unwrap();
    store.toggle_status(&task.id).unwrap();
    let second = store.get(&task.id).unwrap().completed_at.unwrap();
    assert_ne!(first, second);
}

#[test]
fn unknown_ids_leave_state_and_storage_untouched() {
    let (mut store, slot) = make_store();
    store.add("Only task", "", Priority::Medium).unwrap();
    let snapshot = slot.value();
    let version = store.version();
    let missing = TaskId::from("does-not-exist");

    assert!(!store.update(&missing, TaskPatch::title("Renamed")));
    assert!(store.delete(&missing).is_none());
    assert!(store.toggle_status(&missing).is_none());

    assert_eq!(slot.value(), snapshot);
    assert_eq!(store.version(), version);
    assert_eq!(titles(&store), ["Only task"]);
}

// ===========================================================================
// Write-through
// ===========================================================================

#[test]
fn every_mutation_writes_full_snapshot() {
    let (mut store, slot) = make_store();
    let a = store.add("A", "first", Priority::Low).unwrap();
    let b = store.add("B", "", Priority::High).unwrap();
    assert_eq!(persisted(&slot).len(), 2);

    store.toggle_status(&a.id).unwrap();
    let stored = persisted(&slot);
    assert_eq!(stored[0].status, TaskStatus::Completed);
    assert_eq!(stored[0].completed_at, store.tasks()[0].completed_at);

    store.update(&b.id, TaskPatch::description("later"));
    assert_eq!(persisted(&slot)[1].description, "later");

    assert_eq!(persisted(&slot), store.tasks());
}

#[test]
fn view_changes_are_not_persisted() {
    let (mut store, slot) = make_store();
    store.add("A", "", Priority::Low).unwrap();
    let writes = slot.write_count();

    store.set_filter(taskdeck::tasks::Filter::Completed);
    store.set_sort_by(taskdeck::tasks::SortBy::Priority);
    store.set_sort_order(taskdeck::tasks::SortOrder::Ascending);

    assert_eq!(slot.write_count(), writes);
    let reopened = TaskStore::open(SnapshotAdapter::new(slot));
    assert_eq!(reopened.view(), taskdeck::tasks::ViewState::default());
}

#[test]
fn quota_failure_keeps_session_state_and_recovers() {
    let (mut store, slot) = make_store();
    store.add("Persisted", "", Priority::Medium).unwrap();

    slot.fail_writes("QuotaExceededError");
    let b = store.add("Memory only", "", Priority::High).unwrap();
    store.toggle_status(&b.id).unwrap();

    // Session keeps both tasks; storage still holds the last good snapshot.
    assert_eq!(store.len(), 2);
    assert_eq!(persisted(&slot).len(), 1);
    let warnings = store.take_warnings();
    assert_eq!(warnings.len(), 2);
    assert!(warnings.iter().all(|w| matches!(w, PersistWarning::SaveFailed { .. })));

    slot.heal();
    store.flush().unwrap();
    assert!(!store.is_dirty());
    assert_eq!(persisted(&slot), store.tasks());
}

#[test]
fn adapter_load_is_what_store_sees() {
    let (mut store, slot) = make_store();
    store.add("A", "", Priority::Low).unwrap();
    let adapter = SnapshotAdapter::new(slot);
    assert_eq!(adapter.load(), store.tasks());
}
