//! Task store: the single owner of the task collection.
//!
//! `TaskStore` holds the ordered collection plus the session's view
//! controls. Every mutation applies to memory first and then writes the
//! full collection through to its [`TaskPersistence`]. A failed write
//! never undoes the mutation; it is logged, recorded as a
//! [`PersistWarning`], and retried with the next write.

use chrono::{DateTime, Utc};
use taskdeck_model::{Priority, Task, TaskId, TaskPatch, TaskStatus};

use super::view::{Filter, SortBy, SortOrder, ViewState};
use crate::persist::{PersistError, PersistWarning, TaskPersistence};

/// Source of the current time for creation and completion stamps.
pub type Clock = Box<dyn Fn() -> DateTime<Utc>>;

/// Owns the task collection and writes it through to storage.
pub struct TaskStore<P: TaskPersistence> {
    /// Collection in display/persistence order.
    tasks: Vec<Task>,
    /// Session-local view controls.
    view: ViewState,
    persistence: P,
    clock: Clock,
    /// Bumped on every collection change.
    version: u64,
    /// `true` while the last snapshot write failed.
    dirty: bool,
    warnings: Vec<PersistWarning>,
}

impl<P: TaskPersistence> TaskStore<P> {
    /// Opens a store over `persistence`, loading whatever it holds.
    #[must_use]
    pub fn open(persistence: P) -> Self {
        let tasks = persistence.load();
        tracing::info!(count = tasks.len(), "task store opened");
        Self {
            tasks,
            view: ViewState::default(),
            persistence,
            clock: Box::new(Utc::now),
            version: 0,
            dirty: false,
            warnings: Vec::new(),
        }
    }

    /// Replaces the clock used for timestamps.
    #[must_use]
    pub fn with_clock(mut self, clock: impl Fn() -> DateTime<Utc> + 'static) -> Self {
        self.clock = Box::new(clock);
        self
    }

    /// Sets the initial view controls.
    #[must_use]
    pub fn with_view(mut self, view: ViewState) -> Self {
        self.view = view;
        self
    }

    // --- reads ---

    /// The collection in its stored order.
    #[must_use]
    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    /// Looks up a task by id.
    #[must_use]
    pub fn get(&self, id: &TaskId) -> Option<&Task> {
        self.tasks.iter().find(|t| &t.id == id)
    }

    /// Number of tasks in the collection.
    #[must_use]
    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    /// Returns `true` if the collection is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    /// Current view controls.
    #[must_use]
    pub const fn view(&self) -> ViewState {
        self.view
    }

    /// The collection projected through the current view controls.
    #[must_use]
    pub fn visible(&self) -> Vec<&Task> {
        self.view.project(&self.tasks)
    }

    /// Counter that changes whenever the collection changes.
    #[must_use]
    pub const fn version(&self) -> u64 {
        self.version
    }

    // --- mutations ---

    /// Appends a new active task and returns it.
    ///
    /// Returns `None` without touching the collection if `title` is empty
    /// after trimming.
    pub fn add(&mut self, title: &str, description: &str, priority: Priority) -> Option<Task> {
        let title = title.trim();
        if title.is_empty() {
            tracing::debug!("add rejected: empty title");
            return None;
        }

        let task = Task::new(self.fresh_id(), title, description, priority, self.now());
        tracing::debug!(task_id = %task.id, "task added");
        self.tasks.push(task.clone());
        self.commit();
        Some(task)
    }

    /// Merges `patch` into the task with `id`.
    ///
    /// Returns `false` if no such task exists or the patch would blank the
    /// title; the collection is then left unchanged.
    pub fn update(&mut self, id: &TaskId, mut patch: TaskPatch) -> bool {
        if let Some(title) = patch.title.take() {
            let trimmed = title.trim();
            if trimmed.is_empty() {
                tracing::debug!(task_id = %id, "update rejected: empty title");
                return false;
            }
            patch.title = Some(trimmed.to_string());
        }

        let Some(task) = self.tasks.iter_mut().find(|t| &t.id == id) else {
            tracing::debug!(task_id = %id, "update ignored: unknown task");
            return false;
        };
        if patch.is_empty() {
            return true;
        }
        task.apply(patch);
        self.commit();
        true
    }

    /// Removes the task with `id`, keeping the others in order.
    pub fn delete(&mut self, id: &TaskId) -> Option<Task> {
        let Some(index) = self.position(id) else {
            tracing::debug!(task_id = %id, "delete ignored: unknown task");
            return None;
        };
        let removed = self.tasks.remove(index);
        self.commit();
        Some(removed)
    }

    /// Flips the task between active and completed and returns the new
    /// status. Completing stamps the current time; reactivating clears it.
    pub fn toggle_status(&mut self, id: &TaskId) -> Option<TaskStatus> {
        let now = self.now();
        let Some(task) = self.tasks.iter_mut().find(|t| &t.id == id) else {
            tracing::debug!(task_id = %id, "toggle ignored: unknown task");
            return None;
        };
        let status = task.status.toggled();
        task.set_status(status, now);
        self.commit();
        Some(status)
    }

    /// Moves the task at `source` to `destination`, shifting the tasks in
    /// between.
    ///
    /// Both indices must be below [`len`](Self::len). Out-of-range input is
    /// rejected and returns `false`. Equal indices are accepted and change
    /// nothing.
    pub fn reorder(&mut self, source: usize, destination: usize) -> bool {
        let len = self.tasks.len();
        if source >= len || destination >= len {
            tracing::debug!(source, destination, len, "reorder rejected: index out of range");
            return false;
        }
        if source == destination {
            return true;
        }
        let task = self.tasks.remove(source);
        self.tasks.insert(destination, task);
        self.commit();
        true
    }

    /// Removes every completed task in one write and returns how many
    /// were removed.
    pub fn clear_completed(&mut self) -> usize {
        let before = self.tasks.len();
        self.tasks.retain(|t| !t.is_completed());
        let removed = before - self.tasks.len();
        if removed > 0 {
            self.commit();
        }
        removed
    }

    /// Sets the projection filter.
    pub const fn set_filter(&mut self, filter: Filter) {
        self.view.filter = filter;
    }

    /// Sets the projection sort key.
    pub const fn set_sort_by(&mut self, sort_by: SortBy) {
        self.view.sort_by = sort_by;
    }

    /// Sets the projection sort direction.
    pub const fn set_sort_order(&mut self, sort_order: SortOrder) {
        self.view.sort_order = sort_order;
    }

    // --- persistence status ---

    /// Returns `true` if the collection has changes that failed to save.
    #[must_use]
    pub const fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// Drains the warnings recorded since the last call.
    pub fn take_warnings(&mut self) -> Vec<PersistWarning> {
        std::mem::take(&mut self.warnings)
    }

    /// Writes the collection now, whether or not it changed.
    ///
    /// # Errors
    ///
    /// Returns the [`PersistError`] from the underlying save. The store
    /// stays dirty in that case.
    pub fn flush(&mut self) -> Result<(), PersistError> {
        self.persistence.save(&self.tasks)?;
        if self.dirty {
            tracing::info!(count = self.tasks.len(), "pending snapshot written");
        }
        self.dirty = false;
        Ok(())
    }

    // --- internal helpers ---

    fn now(&self) -> DateTime<Utc> {
        (self.clock)()
    }

    fn position(&self, id: &TaskId) -> Option<usize> {
        self.tasks.iter().position(|t| &t.id == id)
    }

    /// Generates an id not already used in the collection.
    fn fresh_id(&self) -> TaskId {
        loop {
            let id = TaskId::generate();
            if self.position(&id).is_none() {
                return id;
            }
        }
    }

    /// Records a collection change and writes it through.
    fn commit(&mut self) {
        self.version += 1;
        if let Err(err) = self.flush() {
            tracing::warn!(
                error = %err,
                count = self.tasks.len(),
                "snapshot save failed, keeping changes in memory"
            );
            self.dirty = true;
            self.warnings.push(PersistWarning::SaveFailed {
                reason: err.to_string(),
            });
        }
    }
}
