//! High-level `TaskStore` API.
//!
//! Owns a connection pool and delegates each call to a stateless repository.
//! Every method checks out one connection, runs one auto-committed statement,
//! and returns the connection to the pool. The store holds no other state, so
//! clones share the pool and may be used from any number of threads.

use tracing::instrument;

use crate::errors::{Result, TaskStoreError};
use crate::sqlite::connection::{self, ConnectionConfig, ConnectionPool, PooledConnection};
use crate::sqlite::repositories::{LabelRepo, TaskRepo};
use crate::sqlite::schema;
use crate::types::{Task, TaskCreateParams, TaskFilter, TaskUpdateParams};

/// Task repository backed by a pooled `SQLite` store.
#[derive(Clone)]
pub struct TaskStore {
    pool: ConnectionPool,
}

impl TaskStore {
    /// Create a `TaskStore` over an existing connection pool.
    pub fn new(pool: ConnectionPool) -> Self {
        Self { pool }
    }

    /// Build a pool for `connection_string` and wrap it.
    ///
    /// Fails with [`TaskStoreError::Connection`] if the store is unreachable.
    pub fn connect(connection_string: &str, config: &ConnectionConfig) -> Result<Self> {
        connection::new_pool(connection_string, config).map(Self::new)
    }

    /// Open a private in-memory store with the schema in place.
    pub fn in_memory() -> Result<Self> {
        let store = Self::new(connection::new_in_memory(&ConnectionConfig::default())?);
        store.ensure_schema()?;
        Ok(store)
    }

    /// Get a connection from the pool.
    fn conn(&self) -> Result<PooledConnection> {
        Ok(self.pool.get()?)
    }

    /// Get the raw connection pool (for advanced/custom queries).
    pub fn pool(&self) -> &ConnectionPool {
        &self.pool
    }

    /// Create the task tables if they do not exist.
    pub fn ensure_schema(&self) -> Result<()> {
        let conn = self.conn()?;
        schema::ensure_schema(&conn)
    }

    // ── Tasks ─────────────────────────────────────────────────────────

    /// Insert a task from its title and content; returns the generated ID.
    #[instrument(skip_all, level = "debug")]
    pub fn create_task(&self, params: &TaskCreateParams) -> Result<i64> {
        let conn = self.conn()?;
        TaskRepo::create(&conn, params)
    }

    /// List tasks matching `filter`, ascending by ID.
    ///
    /// A zero field disables that filter; [`TaskFilter::all`] lists everything.
    #[instrument(skip(self), level = "debug")]
    pub fn list_tasks(&self, filter: TaskFilter) -> Result<Vec<Task>> {
        let conn = self.conn()?;
        TaskRepo::list(&conn, filter)
    }

    /// List tasks by author, ascending by ID.
    #[instrument(skip(self), level = "debug")]
    pub fn tasks_by_author(&self, author_id: i64) -> Result<Vec<Task>> {
        let conn = self.conn()?;
        TaskRepo::list_by_author(&conn, author_id)
    }

    /// List tasks carrying the label named `label_name`, ascending by ID.
    #[instrument(skip(self), level = "debug")]
    pub fn tasks_by_label(&self, label_name: &str) -> Result<Vec<Task>> {
        let conn = self.conn()?;
        TaskRepo::list_by_label(&conn, label_name)
    }

    /// Overwrite assignee, closure time, content, and title; returns the row.
    #[instrument(skip_all, fields(task_id = params.id), level = "debug")]
    pub fn update_task(&self, params: &TaskUpdateParams) -> Result<Task> {
        let conn = self.conn()?;
        TaskRepo::update(&conn, params)
    }

    /// Delete a task. Returns false if no row had `id`.
    #[instrument(skip(self), level = "debug")]
    pub fn delete_task(&self, id: i64) -> Result<bool> {
        let conn = self.conn()?;
        TaskRepo::delete(&conn, id)
    }

    // ── Labels ────────────────────────────────────────────────────────

    /// Create a label; returns its ID.
    pub fn create_label(&self, name: &str) -> Result<i64> {
        let conn = self.conn()?;
        LabelRepo::create(&conn, name)
    }

    /// Look up a label by exact name.
    pub fn label_id_by_name(&self, name: &str) -> Result<Option<i64>> {
        let conn = self.conn()?;
        LabelRepo::id_by_name(&conn, name)
    }

    /// Link a task to a label by ID. Returns false if already linked.
    pub fn attach_label(&self, task_id: i64, label_id: i64) -> Result<bool> {
        let conn = self.conn()?;
        LabelRepo::attach(&conn, task_id, label_id)
    }

    /// Link a task to the label named `name`.
    ///
    /// Fails with [`TaskStoreError::LabelNotFound`] if no such label exists.
    pub fn attach_label_by_name(&self, task_id: i64, name: &str) -> Result<bool> {
        let conn = self.conn()?;
        let label_id = LabelRepo::id_by_name(&conn, name)?
            .ok_or_else(|| TaskStoreError::LabelNotFound(name.to_string()))?;
        LabelRepo::attach(&conn, task_id, label_id)
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
#[allow(unused_results)]
mod tests {
    use assert_matches::assert_matches;

    use super::*;
    use crate::errors::ErrorKind;

    fn setup() -> TaskStore {
        TaskStore::in_memory().unwrap()
    }

    fn params(title: &str, content: &str) -> TaskCreateParams {
        TaskCreateParams {
            title: title.into(),
            content: content.into(),
        }
    }

    #[test]
    fn create_then_list_round_trip() {
        let store = setup();
        let id = store.create_task(&params("t", "c")).unwrap();

        let tasks = store.list_tasks(TaskFilter::by_id(id)).unwrap();
        assert_eq!(tasks.len(), 1);
        assert_eq!(tasks[0].title, "t");
        assert_eq!(tasks[0].content, "c");
        assert_eq!(tasks[0].closed, 0);
        assert_eq!(tasks[0].assigned_id, 0);
        assert!(tasks[0].is_open());
    }

    #[test]
    fn clones_share_the_pool() {
        let store = setup();
        let clone = store.clone();
        let id = store.create_task(&params("shared", "")).unwrap();
        assert_eq!(clone.list_tasks(TaskFilter::by_id(id)).unwrap().len(), 1);
    }

    #[test]
    fn attach_label_by_name() {
        let store = setup();
        let id = store.create_task(&params("t", "c")).unwrap();
        store.create_label("bug").unwrap();

        assert!(store.attach_label_by_name(id, "bug").unwrap());
        let tasks = store.tasks_by_label("bug").unwrap();
        assert_eq!(tasks.len(), 1);
        assert_eq!(tasks[0].id, id);
    }

    #[test]
    fn attach_unknown_label_is_not_found() {
        let store = setup();
        let id = store.create_task(&params("t", "c")).unwrap();
        let err = store.attach_label_by_name(id, "nope").unwrap_err();
        assert_matches!(err, TaskStoreError::LabelNotFound(ref name) if name == "nope");
        assert_eq!(err.kind(), ErrorKind::NotFound);
    }

    #[test]
    fn update_missing_is_not_found_kind() {
        let store = setup();
        let err = store
            .update_task(&TaskUpdateParams {
                id: 77,
                ..Default::default()
            })
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::NotFound);
    }

    #[test]
    fn missing_schema_is_store_error() {
        let store =
            TaskStore::new(connection::new_in_memory(&ConnectionConfig::default()).unwrap());
        let err = store.list_tasks(TaskFilter::all()).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Store);
    }
}
