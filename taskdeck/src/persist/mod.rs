//! Durable storage for the task collection.
//!
//! The collection is stored as one snapshot of text in a named [`Slot`].
//! [`SnapshotAdapter`] turns any slot into a [`TaskPersistence`] that the
//! task store writes through to after every mutation.
//!
//! Loading never fails: a missing slot, an unreadable slot, or text that
//! does not decode all yield an empty collection. Text that does not
//! decode is first set aside by the slot so the next save cannot destroy
//! it. Saving reports failures as [`PersistError`] and leaves the decision
//! of what to do to the caller.

pub mod file;
pub mod memory;

pub use file::FileSlot;
pub use memory::MemorySlot;

use std::collections::HashSet;
use std::path::PathBuf;

use taskdeck_model::{CodecError, Task, TaskStatus, decode_snapshot, encode_snapshot};

/// Key of the slot holding the task snapshot.
pub const SNAPSHOT_KEY: &str = "tasks";

/// Errors that can occur while reading or writing a slot.
#[derive(Debug, thiserror::Error)]
pub enum PersistError {
    /// File system access failed.
    #[error("storage I/O error at {path}: {source}")]
    Io {
        /// Path that was being accessed.
        path: PathBuf,
        /// Underlying I/O error.
        source: std::io::Error,
    },

    /// The collection could not be encoded.
    #[error(transparent)]
    Encode(#[from] CodecError),

    /// The storage refused the operation (quota exceeded, disabled, ...).
    #[error("storage unavailable: {0}")]
    Unavailable(String),
}

/// Warning recorded when a write-through save fails.
///
/// The in-memory collection stays authoritative; the presentation layer
/// should surface these as a non-blocking notice.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PersistWarning {
    /// A snapshot could not be saved.
    #[error("changes kept in memory but not saved: {reason}")]
    SaveFailed {
        /// Description of the error.
        reason: String,
    },
}

/// A single named, durable text value.
pub trait Slot {
    /// Returns the stored text, or `None` if nothing has been stored.
    ///
    /// # Errors
    ///
    /// Returns [`PersistError`] if the value exists but cannot be read.
    fn read(&self) -> Result<Option<String>, PersistError>;

    /// Replaces the stored text.
    ///
    /// # Errors
    ///
    /// Returns [`PersistError`] if the value cannot be written.
    fn write(&self, text: &str) -> Result<(), PersistError>;

    /// Keeps a copy of text that failed to decode, out of the way of
    /// later writes.
    ///
    /// # Errors
    ///
    /// Returns [`PersistError`] if the copy cannot be stored.
    fn set_aside(&self, text: &str) -> Result<(), PersistError>;
}

/// Load/save contract between the task store and its storage.
pub trait TaskPersistence {
    /// Loads the stored collection, falling back to empty on any problem.
    fn load(&self) -> Vec<Task>;

    /// Saves a full snapshot of the collection.
    ///
    /// # Errors
    ///
    /// Returns [`PersistError`] if the snapshot cannot be encoded or written.
    fn save(&self, tasks: &[Task]) -> Result<(), PersistError>;
}

/// [`TaskPersistence`] over a [`Slot`] using the JSON snapshot codec.
#[derive(Debug, Clone)]
pub struct SnapshotAdapter<S> {
    slot: S,
}

impl<S: Slot> SnapshotAdapter<S> {
    /// Wraps a slot.
    #[must_use]
    pub const fn new(slot: S) -> Self {
        Self { slot }
    }

    /// Returns the underlying slot.
    #[must_use]
    pub const fn slot(&self) -> &S {
        &self.slot
    }
}

impl<S: Slot> TaskPersistence for SnapshotAdapter<S> {
    fn load(&self) -> Vec<Task> {
        let text = match self.slot.read() {
            Ok(Some(text)) => text,
            Ok(None) => {
                tracing::debug!("no stored snapshot, starting empty");
                return Vec::new();
            }
            Err(err) => {
                tracing::warn!(error = %err, "snapshot unreadable, starting empty");
                return Vec::new();
            }
        };

        match decode_snapshot(&text) {
            Ok(tasks) => normalize(tasks),
            Err(err) => {
                tracing::warn!(error = %err, "stored snapshot is corrupt, starting empty");
                if let Err(err) = self.slot.set_aside(&text) {
                    tracing::warn!(error = %err, "could not keep a copy of the corrupt snapshot");
                }
                Vec::new()
            }
        }
    }

    fn save(&self, tasks: &[Task]) -> Result<(), PersistError> {
        let text = encode_snapshot(tasks)?;
        self.slot.write(&text)?;
        tracing::trace!(count = tasks.len(), bytes = text.len(), "snapshot saved");
        Ok(())
    }
}

/// Repairs a decoded collection so the store's invariants hold.
///
/// Duplicate ids keep their first occurrence. Active tasks lose any
/// completion stamp; completed tasks without one get their creation time.
#[must_use]
pub fn normalize(tasks: Vec<Task>) -> Vec<Task> {
    let mut seen = HashSet::with_capacity(tasks.len());
    let mut out = Vec::with_capacity(tasks.len());

    for mut task in tasks {
        if !seen.insert(task.id.clone()) {
            tracing::warn!(task_id = %task.id, "dropping task with duplicate id");
            continue;
        }
        match (task.status, task.completed_at) {
            (TaskStatus::Active, Some(_)) => {
                tracing::warn!(task_id = %task.id, "clearing completedAt on active task");
                task.completed_at = None;
            }
            (TaskStatus::Completed, None) => {
                tracing::warn!(task_id = %task.id, "back-filling completedAt on completed task");
                task.completed_at = Some(task.created_at);
            }
            _ => {}
        }
        out.push(task);
    }

    out
}
