//! Property-based tests for the snapshot format.
//!
//! Uses proptest to verify:
//! 1. Any collection survives encode → decode unchanged, order included.
//! 2. Arbitrary text never causes a panic in `decode_snapshot`.

#![allow(clippy::expect_used, clippy::unwrap_used)]

use chrono::{DateTime, TimeZone, Utc};
use proptest::prelude::*;
use taskdeck_model::{Priority, Task, TaskId, TaskStatus, decode_snapshot, encode_snapshot};

/// Strategy for timestamps between 2001 and 2096, millisecond precision.
fn arb_time() -> impl Strategy<Value = DateTime<Utc>> {
    (1_000_000_000_000_i64..4_000_000_000_000).prop_map(|ms| {
        Utc.timestamp_millis_opt(ms)
            .single()
            .unwrap_or_else(|| Utc.timestamp_opt(0, 0).unwrap())
    })
}

fn arb_priority() -> impl Strategy<Value = Priority> {
    prop_oneof![
        Just(Priority::Low),
        Just(Priority::Medium),
        Just(Priority::High),
    ]
}

/// Strategy for tasks that satisfy the completion invariant.
fn arb_task() -> impl Strategy<Value = Task> {
    (
        "[a-zA-Z0-9-]{1,36}",
        "\\PC{1,40}",
        "\\PC{0,80}",
        arb_priority(),
        arb_time(),
        proptest::option::of(arb_time()),
    )
        .prop_map(|(id, title, description, priority, created, completed)| {
            let mut task = Task::new(TaskId::from(id), title, description, priority, created);
            if let Some(done) = completed {
                task.set_status(TaskStatus::Completed, done);
            }
            task
        })
}

proptest! {
    #[test]
    fn snapshot_round_trip(tasks in prop::collection::vec(arb_task(), 0..12)) {
        let text = encode_snapshot(&tasks).unwrap();
        let decoded = decode_snapshot(&text).unwrap();
        prop_assert_eq!(decoded, tasks);
    }

    #[test]
    fn decode_random_text_never_panics(text in "\\PC{0,256}") {
        let _ = decode_snapshot(&text);
    }
}
