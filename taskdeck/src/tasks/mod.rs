//! Task collection ownership and its display projection.
//!
//! [`TaskStore`] owns the ordered task collection and writes it through to
//! storage on every change. [`view`] derives the filtered, sorted sequence
//! shown to the user without ever touching the collection.

pub mod store;
pub mod view;

pub use store::{Clock, TaskStore};
pub use view::{Filter, SortBy, SortOrder, ViewState, project};

use thiserror::Error;

/// Input errors reported by callers of the store before they mutate it.
///
/// The store itself treats these cases as silent no-ops; front ends use
/// this type to tell the user why nothing happened.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TaskError {
    /// Task title cannot be empty.
    #[error("task title cannot be empty")]
    TitleEmpty,
    /// Task with the given ID was not found.
    #[error("task not found: {0}")]
    TaskNotFound(String),
    /// More than one task ID starts with the given prefix.
    #[error("ambiguous task id {prefix:?} matches {matches} tasks")]
    AmbiguousId {
        /// The prefix the user typed.
        prefix: String,
        /// How many ids start with it.
        matches: usize,
    },
    /// A reorder position is outside the collection.
    #[error("invalid position: cannot move {from} to {to} in a list of {len}")]
    InvalidIndex {
        /// Source position.
        from: usize,
        /// Destination position.
        to: usize,
        /// Collection length.
        len: usize,
    },
}
