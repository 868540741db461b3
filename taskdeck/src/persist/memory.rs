//! In-memory [`Slot`] for tests and ephemeral sessions.

use std::sync::Arc;

use parking_lot::Mutex;

use super::{PersistError, Slot};

#[derive(Debug, Default)]
struct Inner {
    value: Option<String>,
    set_aside: Option<String>,
    fail_reason: Option<String>,
    writes: usize,
}

/// Shared in-memory slot. Clones refer to the same value, so a test can
/// hand one clone to the store and inspect the other.
///
/// Writes can be switched to fail with [`fail_writes`](Self::fail_writes)
/// to simulate a full or disabled storage.
#[derive(Debug, Clone, Default)]
pub struct MemorySlot {
    inner: Arc<Mutex<Inner>>,
}

impl MemorySlot {
    /// Creates an empty slot.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a slot already holding `text`.
    #[must_use]
    pub fn with_value(text: impl Into<String>) -> Self {
        let slot = Self::new();
        slot.inner.lock().value = Some(text.into());
        slot
    }

    /// Returns the stored text.
    #[must_use]
    pub fn value(&self) -> Option<String> {
        self.inner.lock().value.clone()
    }

    /// Returns the text most recently set aside as undecodable.
    #[must_use]
    pub fn set_aside_value(&self) -> Option<String> {
        self.inner.lock().set_aside.clone()
    }

    /// Makes every subsequent write fail with `reason`.
    pub fn fail_writes(&self, reason: impl Into<String>) {
        self.inner.lock().fail_reason = Some(reason.into());
    }

    /// Lets writes succeed again.
    pub fn heal(&self) {
        self.inner.lock().fail_reason = None;
    }

    /// Number of successful writes so far.
    #[must_use]
    pub fn write_count(&self) -> usize {
        self.inner.lock().writes
    }
}

impl Slot for MemorySlot {
    fn read(&self) -> Result<Option<String>, PersistError> {
        Ok(self.value())
    }

    fn write(&self, text: &str) -> Result<(), PersistError> {
        let mut inner = self.inner.lock();
        if let Some(reason) = &inner.fail_reason {
            return Err(PersistError::Unavailable(reason.clone()));
        }
        inner.value = Some(text.to_string());
        inner.writes += 1;
        drop(inner);
        Ok(())
    }

    fn set_aside(&self, text: &str) -> Result<(), PersistError> {
        self.inner.lock().set_aside = Some(text.to_string());
        Ok(())
    }
}
