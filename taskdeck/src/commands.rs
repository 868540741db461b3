//! Command-line front end over the task store.
//!
//! Each [`Command`] validates its input, applies one store operation and
//! returns the lines to print. Ids may be abbreviated to any unique prefix.

use taskdeck_model::{Priority, Task, TaskId, TaskPatch, TaskStatus};

use crate::persist::TaskPersistence;
use crate::tasks::{Filter, SortBy, SortOrder, TaskError, TaskStore};

/// Subcommands of the `taskdeck` binary.
#[derive(clap::Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Add a new task at the end of the list.
    Add {
        /// Task title.
        title: String,
        /// Longer description.
        #[arg(short, long, default_value = "")]
        description: String,
        /// Priority (low, medium, high).
        #[arg(short, long, default_value_t = Priority::Medium)]
        priority: Priority,
    },
    /// Change the title, description or priority of a task.
    Edit {
        /// Task id or unique id prefix.
        id: String,
        /// New title.
        #[arg(long)]
        title: Option<String>,
        /// New description.
        #[arg(short, long)]
        description: Option<String>,
        /// New priority.
        #[arg(short, long)]
        priority: Option<Priority>,
    },
    /// Mark a task completed, or active again if it already is.
    #[command(visible_alias = "done")]
    Toggle {
        /// Task id or unique id prefix.
        id: String,
    },
    /// Delete a task.
    #[command(visible_alias = "delete")]
    Rm {
        /// Task id or unique id prefix.
        id: String,
    },
    /// Move a task from one list position to another (0-based).
    Mv {
        /// Current position.
        from: usize,
        /// New position.
        to: usize,
    },
    /// Delete every completed task.
    ClearCompleted,
    /// Show tasks.
    List {
        /// Which tasks to show (all, active, completed).
        #[arg(long)]
        filter: Option<Filter>,
        /// Sort key (date, priority).
        #[arg(long)]
        sort_by: Option<SortBy>,
        /// Sort direction (asc, desc).
        #[arg(long)]
        order: Option<SortOrder>,
    },
}

impl Default for Command {
    fn default() -> Self {
        Self::List {
            filter: None,
            sort_by: None,
            order: None,
        }
    }
}

/// Runs one command against the store and returns the output lines.
///
/// # Errors
///
/// Returns [`TaskError`] when the input is rejected; the store is left
/// unchanged in that case.
pub fn execute<P: TaskPersistence>(
    store: &mut TaskStore<P>,
    command: Command,
) -> Result<Vec<String>, TaskError> {
    match command {
        Command::Add {
            title,
            description,
            priority,
        } => {
            let task = store
                .add(&title, &description, priority)
                .ok_or(TaskError::TitleEmpty)?;
            Ok(vec![format!("added {}", task.id)])
        }
        Command::Edit {
            id,
            title,
            description,
            priority,
        } => {
            if title.as_deref().is_some_and(|t| t.trim().is_empty()) {
                return Err(TaskError::TitleEmpty);
            }
            let id = resolve_id(store.tasks(), &id)?;
            let patch = TaskPatch {
                title,
                description,
                priority,
            };
            if !store.update(&id, patch) {
                return Err(TaskError::TaskNotFound(id.to_string()));
            }
            Ok(vec![format!("updated {id}")])
        }
        Command::Toggle { id } => {
            let id = resolve_id(store.tasks(), &id)?;
            let status = store
                .toggle_status(&id)
                .ok_or_else(|| TaskError::TaskNotFound(id.to_string()))?;
            Ok(vec![format!("{id} is now {status}")])
        }
        Command::Rm { id } => {
            let id = resolve_id(store.tasks(), &id)?;
            let removed = store
                .delete(&id)
                .ok_or_else(|| TaskError::TaskNotFound(id.to_string()))?;
            Ok(vec![format!("deleted {} ({})", removed.id, removed.title)])
        }
        Command::Mv { from, to } => {
            if !store.reorder(from, to) {
                return Err(TaskError::InvalidIndex {
                    from,
                    to,
                    len: store.len(),
                });
            }
            Ok(vec![format!("moved {from} -> {to}")])
        }
        Command::ClearCompleted => {
            let removed = store.clear_completed();
            Ok(vec![format!("cleared {removed} completed task(s)")])
        }
        Command::List {
            filter,
            sort_by,
            order,
        } => {
            if let Some(filter) = filter {
                store.set_filter(filter);
            }
            if let Some(sort_by) = sort_by {
                store.set_sort_by(sort_by);
            }
            if let Some(order) = order {
                store.set_sort_order(order);
            }
            Ok(render_list(store))
        }
    }
}

/// Finds the task whose id equals `input` or uniquely starts with it.
///
/// # Errors
///
/// Returns [`TaskError::TaskNotFound`] if nothing matches and
/// [`TaskError::AmbiguousId`] if several ids share the prefix.
pub fn resolve_id(tasks: &[Task], input: &str) -> Result<TaskId, TaskError> {
    let input = input.trim();
    if input.is_empty() {
        return Err(TaskError::TaskNotFound(String::new()));
    }
    if let Some(task) = tasks.iter().find(|t| t.id.as_str() == input) {
        return Ok(task.id.clone());
    }

    let mut matches = tasks.iter().filter(|t| t.id.as_str().starts_with(input));
    match (matches.next(), matches.count()) {
        (Some(task), 0) => Ok(task.id.clone()),
        (Some(_), rest) => Err(TaskError::AmbiguousId {
            prefix: input.to_string(),
            matches: rest + 1,
        }),
        (None, _) => Err(TaskError::TaskNotFound(input.to_string())),
    }
}

fn render_list<P: TaskPersistence>(store: &TaskStore<P>) -> Vec<String> {
    let view = store.view();
    let visible = store.visible();
    if visible.is_empty() {
        return match view.filter {
            Filter::All => vec!["no tasks".to_string()],
            filter => vec![format!("no {filter} tasks")],
        };
    }

    let mut lines = Vec::with_capacity(visible.len() + 1);
    lines.push(format!(
        "{} task(s), {} by {} {}",
        visible.len(),
        view.filter,
        view.sort_by,
        view.sort_order
    ));
    for task in visible {
        // Position in the stored collection, the index `mv` expects.
        let position = store
            .tasks()
            .iter()
            .position(|t| t.id == task.id)
            .unwrap_or_default();
        lines.push(render_task(position, task));
        if !task.description.is_empty() {
            lines.push(format!("        {}", task.description));
        }
    }
    lines
}

fn render_task(position: usize, task: &Task) -> String {
    let mark = match task.status {
        TaskStatus::Active => ' ',
        TaskStatus::Completed => 'x',
    };
    format!(
        "{position:>3} [{mark}] {title}  ({priority}, {created})  {id}",
        title = task.title,
        priority = task.priority,
        created = task.created_at.format("%Y-%m-%d %H:%M"),
        id = task.id,
    )
}
