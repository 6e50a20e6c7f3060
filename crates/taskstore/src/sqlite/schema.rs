//! Schema bootstrap for the task tables.
//!
//! The DDL is embedded at compile time via [`include_str!`] and uses
//! `IF NOT EXISTS` throughout, so running it against a database that already
//! holds the tables is a no-op. There is no version tracking: deployments that
//! own their schema can skip this entirely.

use rusqlite::Connection;
use tracing::{debug, info};

use crate::errors::Result;

const SCHEMA_SQL: &str = include_str!("schema.sql");

/// Tables the store depends on.
pub const REQUIRED_TABLES: &[&str] = &["tasks", "labels", "tasks_labels"];

/// Create the `tasks`, `labels`, and `tasks_labels` tables if missing.
pub fn ensure_schema(conn: &Connection) -> Result<()> {
    if missing_tables(conn)?.is_empty() {
        debug!("schema already present, skipping bootstrap");
        return Ok(());
    }

    conn.execute_batch(SCHEMA_SQL)?;
    info!(tables = ?REQUIRED_TABLES, "schema bootstrapped");
    Ok(())
}

/// Return the required tables that do not exist yet.
pub fn missing_tables(conn: &Connection) -> Result<Vec<&'static str>> {
    let mut stmt =
        conn.prepare("SELECT COUNT(*) FROM sqlite_master WHERE type = 'table' AND name = ?1")?;
    let mut missing = Vec::new();
    for table in REQUIRED_TABLES {
        let count: i64 = stmt.query_row([table], |row| row.get(0))?;
        if count == 0 {
            missing.push(*table);
        }
    }
    Ok(missing)
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
#[allow(unused_results)]
mod tests {
    use super::*;

    fn open() -> Connection {
        let conn = Connection::open_in_memory().unwrap();
        conn.execute_batch("PRAGMA foreign_keys = ON;").unwrap();
        conn
    }

    #[test]
    fn fresh_database_reports_all_missing() {
        let conn = open();
        assert_eq!(missing_tables(&conn).unwrap(), REQUIRED_TABLES.to_vec());
    }

    #[test]
    fn ensure_schema_creates_tables() {
        let conn = open();
        ensure_schema(&conn).unwrap();
        assert!(missing_tables(&conn).unwrap().is_empty());
    }

    #[test]
    fn ensure_schema_is_idempotent() {
        let conn = open();
        ensure_schema(&conn).unwrap();
        conn.execute("INSERT INTO tasks (title) VALUES ('keep me')", [])
            .unwrap();
        ensure_schema(&conn).unwrap();

        let count: i64 = conn
            .query_row("SELECT COUNT(*) FROM tasks", [], |row| row.get(0))
            .unwrap();
        assert_eq!(count, 1);
    }

    #[test]
    fn insert_applies_column_defaults() {
        let conn = open();
        ensure_schema(&conn).unwrap();
        conn.execute("INSERT INTO tasks (title, content) VALUES ('t', 'c')", [])
            .unwrap();

        let (opened, closed, author, assigned): (i64, i64, i64, i64) = conn
            .query_row(
                "SELECT opened, closed, author_id, assigned_id FROM tasks",
                [],
                |row| Ok((row.get(0)?, row.get(1)?, row.get(2)?, row.get(3)?)),
            )
            .unwrap();
        assert!(opened > 1_600_000_000, "opened should be unix seconds, got {opened}");
        assert_eq!((closed, author, assigned), (0, 0, 0));
    }

    #[test]
    fn deleting_task_cascades_to_label_links() {
        let conn = open();
        ensure_schema(&conn).unwrap();
        conn.execute_batch(
            "INSERT INTO tasks (id, title) VALUES (1, 't');
             INSERT INTO labels (id, name) VALUES (1, 'bug');
             INSERT INTO tasks_labels (task_id, label_id) VALUES (1, 1);
             DELETE FROM tasks WHERE id = 1;",
        )
        .unwrap();

        let links: i64 = conn
            .query_row("SELECT COUNT(*) FROM tasks_labels", [], |row| row.get(0))
            .unwrap();
        assert_eq!(links, 0);
    }
}
