//! Label repository: the `labels` table and its `tasks_labels` join.

use rusqlite::{Connection, OptionalExtension, params};
use tracing::debug;

use crate::errors::Result;

/// Stateless label repository.
pub struct LabelRepo;

impl LabelRepo {
    /// Insert a label and return its ID. Names are unique.
    pub fn create(conn: &Connection, name: &str) -> Result<i64> {
        let id: i64 = conn.query_row(
            "INSERT INTO labels (name) VALUES (?1) RETURNING id",
            params![name],
            |row| row.get(0),
        )?;
        debug!(label_id = id, name, "label created");
        Ok(id)
    }

    /// Look up a label ID by exact name.
    pub fn id_by_name(conn: &Connection, name: &str) -> Result<Option<i64>> {
        let id = conn
            .query_row(
                "SELECT id FROM labels WHERE name = ?1",
                params![name],
                |row| row.get(0),
            )
            .optional()?;
        Ok(id)
    }

    /// Link a task to a label. Returns false if the link already existed.
    pub fn attach(conn: &Connection, task_id: i64, label_id: i64) -> Result<bool> {
        let changed = conn.execute(
            "INSERT OR IGNORE INTO tasks_labels (task_id, label_id) VALUES (?1, ?2)",
            params![task_id, label_id],
        )?;
        debug!(task_id, label_id, linked = changed > 0, "label attach");
        Ok(changed > 0)
    }
}
