//! Task repository: parameterized SQL for the `tasks` table.
//!
//! Every read goes through [`query_tasks`], which scans rows in the fixed
//! [`TASK_COLUMNS`] order. A row that fails to scan fails the whole call.

use rusqlite::{Connection, OptionalExtension, Params, Row, params};
use tracing::{debug, trace};

use crate::errors::{Result, TaskStoreError};
use crate::types::{Task, TaskCreateParams, TaskFilter, TaskUpdateParams};

macro_rules! task_columns {
    () => {
        "id, opened, closed, author_id, assigned_id, title, content"
    };
}

/// Column list shared by every task `SELECT` and `RETURNING` clause.
pub const TASK_COLUMNS: &str = task_columns!();

const LIST_SQL: &str = concat!(
    "SELECT ",
    task_columns!(),
    " FROM tasks \
     WHERE (?1 = 0 OR id = ?1) AND (?2 = 0 OR author_id = ?2) \
     ORDER BY id"
);

const BY_AUTHOR_SQL: &str = concat!(
    "SELECT ",
    task_columns!(),
    " FROM tasks WHERE author_id = ?1 ORDER BY id"
);

const BY_LABEL_SQL: &str = concat!(
    "SELECT ",
    task_columns!(),
    " FROM tasks \
     WHERE id IN ( \
         SELECT task_id FROM tasks_labels WHERE label_id IN ( \
             SELECT id FROM labels WHERE name = ?1 \
         ) \
     ) \
     ORDER BY id"
);

/// Stateless task repository.
pub struct TaskRepo;

impl TaskRepo {
    /// Insert a task and return its generated ID.
    ///
    /// Only `title` and `content` are written; the remaining columns take
    /// their schema defaults.
    pub fn create(conn: &Connection, params: &TaskCreateParams) -> Result<i64> {
        let id: i64 = conn.query_row(
            "INSERT INTO tasks (title, content) VALUES (?1, ?2) RETURNING id",
            params![params.title, params.content],
            |row| row.get(0),
        )?;
        debug!(task_id = id, "task created");
        Ok(id)
    }

    /// List tasks matching a composite filter, ascending by ID.
    pub fn list(conn: &Connection, filter: TaskFilter) -> Result<Vec<Task>> {
        query_tasks(conn, LIST_SQL, params![filter.task_id, filter.author_id])
    }

    /// List tasks created by an author, ascending by ID.
    pub fn list_by_author(conn: &Connection, author_id: i64) -> Result<Vec<Task>> {
        query_tasks(conn, BY_AUTHOR_SQL, params![author_id])
    }

    /// List tasks linked to the label with exactly this name, ascending by ID.
    pub fn list_by_label(conn: &Connection, label_name: &str) -> Result<Vec<Task>> {
        query_tasks(conn, BY_LABEL_SQL, params![label_name])
    }

    /// Rewrite the mutable columns of a task and return the stored row.
    ///
    /// Fails with [`TaskStoreError::TaskNotFound`] when no row has `params.id`.
    pub fn update(conn: &Connection, params: &TaskUpdateParams) -> Result<Task> {
        let sql = format!(
            "UPDATE tasks \
             SET assigned_id = ?1, closed = ?2, content = ?3, title = ?4 \
             WHERE id = ?5 \
             RETURNING {TASK_COLUMNS}"
        );
        let task = conn
            .query_row(
                &sql,
                params![
                    params.assigned_id,
                    params.closed,
                    params.content,
                    params.title,
                    params.id,
                ],
                task_from_row,
            )
            .optional()?
            .ok_or(TaskStoreError::TaskNotFound(params.id))?;
        debug!(task_id = task.id, closed = task.closed, "task updated");
        Ok(task)
    }

    /// Delete a task by ID. Returns true if a row was deleted.
    ///
    /// Deleting a missing ID is not an error.
    pub fn delete(conn: &Connection, id: i64) -> Result<bool> {
        let changed = conn.execute("DELETE FROM tasks WHERE id = ?1", params![id])?;
        debug!(task_id = id, deleted = changed > 0, "task delete");
        Ok(changed > 0)
    }
}

/// Run a task `SELECT` and scan every row.
///
/// `sql` must select [`TASK_COLUMNS`] in order.
pub fn query_tasks<P: Params>(conn: &Connection, sql: &str, params: P) -> Result<Vec<Task>> {
    let mut stmt = conn.prepare(sql)?;
    let tasks = stmt
        .query_map(params, task_from_row)?
        .collect::<rusqlite::Result<Vec<_>>>()?;
    trace!(rows = tasks.len(), "task query");
    Ok(tasks)
}

// ─────────────────────────────────────────────────────────────────────────────
// Row converter
// ─────────────────────────────────────────────────────────────────────────────

fn task_from_row(row: &Row<'_>) -> rusqlite::Result<Task> {
    Ok(Task {
        id: row.get(0)?,
        opened: row.get(1)?,
        closed: row.get(2)?,
        author_id: row.get(3)?,
        assigned_id: row.get(4)?,
        title: row.get(5)?,
        content: row.get(6)?,
    })
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
