//! Integration tests for the display projection.
//!
//! Checks filter/sort composition through both the free `project`
//! function and a store's `visible()` view.

#![allow(clippy::expect_used, clippy::unwrap_used)]

use std::cell::Cell;
use std::rc::Rc;

use chrono::{TimeZone, Utc};
use taskdeck::persist::{MemorySlot, SnapshotAdapter};
use taskdeck::tasks::{Filter, SortBy, SortOrder, TaskStore, ViewState, project};
use taskdeck_model::{Priority, Task, TaskStatus};

type MemStore = TaskStore<SnapshotAdapter<MemorySlot>>;

/// Store with a clock that advances one second per reading, seeded with
/// tasks of the given priorities (titles `t0`, `t1`, ...).
fn seeded_store(priorities: &[Priority]) -> MemStore {
    let tick = Rc::new(Cell::new(1_714_000_000_i64));
    let mut store = TaskStore::open(SnapshotAdapter::new(MemorySlot::new())).with_clock(move || {
        let secs = tick.get();
        tick.set(secs + 1);
        Utc.timestamp_opt(secs, 0).unwrap()
    });
    for (i, priority) in priorities.iter().enumerate() {
        store.add(&format!("t{i}"), "", *priority).unwrap();
    }
    store
}

fn titles(tasks: &[&Task]) -> Vec<String> {
    tasks.iter().map(|t| t.title.clone()).collect()
}

#[test]
fn priority_ascending_example() {
    let store = seeded_store(&[Priority::High, Priority::Low, Priority::Medium, Priority::Low]);
    let out = project(
        store.tasks(),
        Filter::All,
        SortBy::Priority,
        SortOrder::Ascending,
    );
    let priorities: Vec<Priority> = out.iter().map(|t| t.priority).collect();
    assert_eq!(
        priorities,
        [Priority::Low, Priority::Low, Priority::Medium, Priority::High]
    );
    assert_eq!(titles(&out), ["t1", "t3", "t2", "t0"]);
}

#[test]
fn priority_descending_keeps_ties_in_collection_order() {
    let store = seeded_store(&[Priority::High, Priority::Low, Priority::Medium, Priority::Low]);
    let out = project(
        store.tasks(),
        Filter::All,
        SortBy::Priority,
        SortOrder::Descending,
    );
    assert_eq!(titles(&out), ["t0", "t2", "t1", "t3"]);
}

#[test]
fn date_sort_ignores_manual_order() {
    let mut store = seeded_store(&[Priority::Medium; 4]);
    store.reorder(3, 0);
    assert_eq!(store.tasks()[0].title, "t3");

    let asc = project(store.tasks(), Filter::All, SortBy::Date, SortOrder::Ascending);
    assert_eq!(titles(&asc), ["t0", "t1", "t2", "t3"]);
    let desc = project(store.tasks(), Filter::All, SortBy::Date, SortOrder::Descending);
    assert_eq!(titles(&desc), ["t3", "t2", "t1", "t0"]);
}

#[test]
fn filter_returns_exact_subsets() {
    let mut store = seeded_store(&[Priority::Medium; 5]);
    for index in [1, 3] {
        let id = store.tasks()[index].id.clone();
        store.toggle_status(&id).unwrap();
    }

    let active = project(store.tasks(), Filter::Active, SortBy::Date, SortOrder::Ascending);
    assert_eq!(titles(&active), ["t0", "t2", "t4"]);
    assert!(active.iter().all(|t| t.status == TaskStatus::Active));

    let completed = project(
        store.tasks(),
        Filter::Completed,
        SortBy::Date,
        SortOrder::Ascending,
    );
    assert_eq!(titles(&completed), ["t1", "t3"]);

    let all = project(store.tasks(), Filter::All, SortBy::Date, SortOrder::Ascending);
    assert_eq!(all.len(), active.len() + completed.len());
}

#[test]
fn visible_tracks_store_view_and_mutations() {
    let mut store = seeded_store(&[Priority::Low, Priority::High]);
    store.set_filter(Filter::Active);
    store.set_sort_by(SortBy::Priority);
    store.set_sort_order(SortOrder::Descending);
    assert_eq!(titles(&store.visible()), ["t1", "t0"]);

    let id = store.tasks()[1].id.clone();
    store.toggle_status(&id).unwrap();
    assert_eq!(titles(&store.visible()), ["t0"]);
}

#[test]
fn projection_is_repeatable_and_leaves_collection_alone() {
    let store = seeded_store(&[Priority::High, Priority::Low, Priority::Medium]);
    let before = store.tasks().to_vec();
    let view = ViewState {
        filter: Filter::All,
        sort_by: SortBy::Priority,
        sort_order: SortOrder::Ascending,
    };

    let first = titles(&view.project(store.tasks()));
    let second = titles(&view.project(store.tasks()));
    assert_eq!(first, second);
    assert_eq!(store.tasks(), before.as_slice());
}
