//! Filtered and sorted projection of the task collection.
//!
//! [`project`] is a pure function: it borrows the collection, never
//! reorders it, and returns a fresh sequence for display.

use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use taskdeck_model::{ParseEnumError, Task, TaskStatus};

/// Which tasks the projection keeps.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Filter {
    /// Every task.
    #[default]
    All,
    /// Only tasks that are not completed.
    Active,
    /// Only completed tasks.
    Completed,
}

impl Filter {
    /// Returns `true` if `task` passes this filter.
    #[must_use]
    pub fn matches(self, task: &Task) -> bool {
        match self {
            Self::All => true,
            Self::Active => task.status == TaskStatus::Active,
            Self::Completed => task.status == TaskStatus::Completed,
        }
    }
}

impl fmt::Display for Filter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::All => write!(f, "all"),
            Self::Active => write!(f, "active"),
            Self::Completed => write!(f, "completed"),
        }
    }
}

impl FromStr for Filter {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "all" => Ok(Self::All),
            "active" => Ok(Self::Active),
            "completed" | "done" => Ok(Self::Completed),
            _ => Err(ParseEnumError {
                kind: "filter",
                value: s.to_string(),
                expected: "all, active, completed",
            }),
        }
    }
}

/// Sort key of the projection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortBy {
    /// Creation time.
    #[default]
    Date,
    /// Priority rank (`low < medium < high`).
    Priority,
}

impl fmt::Display for SortBy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Date => write!(f, "date"),
            Self::Priority => write!(f, "priority"),
        }
    }
}

impl FromStr for SortBy {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "date" | "created" => Ok(Self::Date),
            "priority" => Ok(Self::Priority),
            _ => Err(ParseEnumError {
                kind: "sort key",
                value: s.to_string(),
                expected: "date, priority",
            }),
        }
    }
}

/// Direction of the projection's sort.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortOrder {
    /// Smallest key first.
    Ascending,
    /// Largest key first (newest first for dates).
    #[default]
    Descending,
}

impl fmt::Display for SortOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Ascending => write!(f, "asc"),
            Self::Descending => write!(f, "desc"),
        }
    }
}

impl FromStr for SortOrder {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "asc" | "ascending" => Ok(Self::Ascending),
            "desc" | "descending" => Ok(Self::Descending),
            _ => Err(ParseEnumError {
                kind: "sort order",
                value: s.to_string(),
                expected: "asc, desc",
            }),
        }
    }
}

/// Session-local view controls: filter, sort key and sort direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ViewState {
    /// Active filter.
    pub filter: Filter,
    /// Sort key.
    pub sort_by: SortBy,
    /// Sort direction.
    pub sort_order: SortOrder,
}

impl ViewState {
    /// Projects `tasks` through this view.
    #[must_use]
    pub fn project<'a>(&self, tasks: &'a [Task]) -> Vec<&'a Task> {
        project(tasks, self.filter, self.sort_by, self.sort_order)
    }
}

/// Filters and sorts `tasks` for display.
///
/// The sort is stable and descending order reverses the comparison rather
/// than the output, so tasks with equal keys always keep their collection
/// order.
#[must_use]
pub fn project(
    tasks: &[Task],
    filter: Filter,
    sort_by: SortBy,
    sort_order: SortOrder,
) -> Vec<&Task> {
    let mut visible: Vec<&Task> = tasks.iter().filter(|t| filter.matches(t)).collect();
    visible.sort_by(|a, b| {
        let ord = compare(a, b, sort_by);
        match sort_order {
            SortOrder::Ascending => ord,
            SortOrder::Descending => ord.reverse(),
        }
    });
    visible
}

fn compare(a: &Task, b: &Task, sort_by: SortBy) -> Ordering {
    match sort_by {
        SortBy::Date => a.created_at.cmp(&b.created_at),
        SortBy::Priority => a.priority.rank().cmp(&b.priority.rank()),
    }
}
