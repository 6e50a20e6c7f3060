//! Public task types and operation parameters.

use serde::{Deserialize, Serialize};

/// A task row.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    /// Store-assigned ID.
    pub id: i64,
    /// Unix seconds at insert.
    pub opened: i64,
    /// Unix seconds at closure, `0` while open.
    pub closed: i64,
    /// Creating user.
    pub author_id: i64,
    /// Assignee.
    pub assigned_id: i64,
    /// Short title.
    pub title: String,
    /// Free text body.
    pub content: String,
}

impl Task {
    /// Whether the task has not been closed.
    pub fn is_open(&self) -> bool {
        self.closed == 0
    }
}

/// Input for creating a task. Every other column is store-generated.
#[derive(Clone, Debug, Default)]
pub struct TaskCreateParams {
    /// Task title.
    pub title: String,
    /// Task body.
    pub content: String,
}

/// Full rewrite of a task's mutable columns.
///
/// `opened` and `author_id` are absent on purpose: they cannot change after
/// creation.
#[derive(Clone, Debug, Default)]
pub struct TaskUpdateParams {
    /// Row to update.
    pub id: i64,
    /// New assignee.
    pub assigned_id: i64,
    /// New closure time, `0` to reopen.
    pub closed: i64,
    /// New title.
    pub title: String,
    /// New body.
    pub content: String,
}

impl From<&Task> for TaskUpdateParams {
    fn from(task: &Task) -> Self {
        Self {
            id: task.id,
            assigned_id: task.assigned_id,
            closed: task.closed,
            title: task.title.clone(),
            content: task.content.clone(),
        }
    }
}

/// Composite filter for [`list_tasks`](crate::TaskStore::list_tasks).
///
/// A field set to `0` does not filter. The default matches every task.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct TaskFilter {
    /// Match a single task ID.
    pub task_id: i64,
    /// Match an author.
    pub author_id: i64,
}

impl TaskFilter {
    /// Filter matching every task.
    pub fn all() -> Self {
        Self::default()
    }

    /// Filter matching one task ID.
    pub fn by_id(task_id: i64) -> Self {
        Self {
            task_id,
            ..Self::default()
        }
    }

    /// Filter matching one author.
    pub fn by_author(author_id: i64) -> Self {
        Self {
            author_id,
            ..Self::default()
        }
    }
}
