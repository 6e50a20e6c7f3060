//! Subcommand definitions and their execution against a [`TaskStore`].
//!
//! Each command returns a JSON value; `main` prints it to stdout.

use anyhow::{Context, Result};
use clap::Subcommand;
use serde_json::{Value, json};
use taskstore::{Task, TaskCreateParams, TaskFilter, TaskStore, TaskStoreError, TaskUpdateParams};
use tracing::info;

/// Task store operations.
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Create the task tables if they do not exist.
    Init,
    /// Create a task.
    Add {
        /// Task title.
        #[arg(long)]
        title: String,
        /// Task body.
        #[arg(long, default_value = "")]
        content: String,
    },
    /// List tasks. Zero (the default) disables a filter.
    List {
        /// Only the task with this ID.
        #[arg(long, default_value_t = 0)]
        id: i64,
        /// Only tasks by this author.
        #[arg(long, default_value_t = 0)]
        author: i64,
    },
    /// List tasks by author.
    ByAuthor {
        /// Author ID.
        author: i64,
    },
    /// List tasks carrying a label.
    ByLabel {
        /// Exact label name.
        label: String,
    },
    /// Rewrite a task's mutable fields. Omitted fields keep their value.
    Update {
        /// Task ID.
        id: i64,
        /// New assignee.
        #[arg(long)]
        assigned: Option<i64>,
        /// New closure time in unix seconds, 0 to reopen.
        #[arg(long)]
        closed: Option<i64>,
        /// New title.
        #[arg(long)]
        title: Option<String>,
        /// New body.
        #[arg(long)]
        content: Option<String>,
    },
    /// Close a task now.
    Close {
        /// Task ID.
        id: i64,
    },
    /// Delete a task.
    Delete {
        /// Task ID.
        id: i64,
    },
    /// Manage labels.
    Label {
        #[command(subcommand)]
        command: LabelCommand,
    },
}

/// Label operations.
#[derive(Subcommand, Debug)]
pub enum LabelCommand {
    /// Create a label.
    Create {
        /// Label name.
        name: String,
    },
    /// Attach an existing label to a task.
    Attach {
        /// Task ID.
        task_id: i64,
        /// Label name.
        name: String,
    },
}

/// Run one command.
pub fn execute(store: &TaskStore, command: Command) -> Result<Value> {
    match command {
        Command::Init => {
            store.ensure_schema().context("failed to create schema")?;
            Ok(json!({ "initialized": true }))
        }
        Command::Add { title, content } => {
            let id = store.create_task(&TaskCreateParams { title, content })?;
            info!(task_id = id, "task added");
            Ok(json!({ "id": id }))
        }
        Command::List { id, author } => tasks_json(store.list_tasks(TaskFilter {
            task_id: id,
            author_id: author,
        })?),
        Command::ByAuthor { author } => tasks_json(store.tasks_by_author(author)?),
        Command::ByLabel { label } => tasks_json(store.tasks_by_label(&label)?),
        Command::Update {
            id,
            assigned,
            closed,
            title,
            content,
        } => {
            let current = fetch(store, id)?;
            let params = TaskUpdateParams {
                id,
                assigned_id: assigned.unwrap_or(current.assigned_id),
                closed: closed.unwrap_or(current.closed),
                title: title.unwrap_or(current.title),
                content: content.unwrap_or(current.content),
            };
            Ok(serde_json::to_value(store.update_task(&params)?)?)
        }
        Command::Close { id } => {
            let mut params = TaskUpdateParams::from(&fetch(store, id)?);
            params.closed = chrono::Utc::now().timestamp();
            Ok(serde_json::to_value(store.update_task(&params)?)?)
        }
        Command::Delete { id } => {
            let deleted = store.delete_task(id)?;
            Ok(json!({ "id": id, "deleted": deleted }))
        }
        Command::Label {
            command: LabelCommand::Create { name },
        } => {
            let id = store.create_label(&name)?;
            Ok(json!({ "id": id, "name": name }))
        }
        Command::Label {
            command: LabelCommand::Attach { task_id, name },
        } => {
            let linked = store.attach_label_by_name(task_id, &name)?;
            Ok(json!({ "task_id": task_id, "label": name, "linked": linked }))
        }
    }
}

fn fetch(store: &TaskStore, id: i64) -> Result<Task> {
    store
        .list_tasks(TaskFilter::by_id(id))?
        .into_iter()
        .next()
        .ok_or_else(|| TaskStoreError::TaskNotFound(id).into())
}

fn tasks_json(tasks: Vec<Task>) -> Result<Value> {
    Ok(serde_json::to_value(tasks)?)
}

#[cfg(test)]
#[allow(unused_results)]
mod tests {
    use super::*;

    fn store() -> TaskStore {
        TaskStore::in_memory().unwrap()
    }

    fn add(store: &TaskStore, title: &str) -> i64 {
        let out = execute(
            store,
            Command::Add {
                title: title.into(),
                content: "body".into(),
            },
        )
        .unwrap();
        out["id"].as_i64().unwrap()
    }

    #[test]
    fn add_then_list() {
        let store = store();
        let id = add(&store, "first");

        let out = execute(&store, Command::List { id, author: 0 }).unwrap();
        assert_eq!(out.as_array().unwrap().len(), 1);
        assert_eq!(out[0]["title"], "first");
        assert_eq!(out[0]["closed"], 0);
    }

    #[test]
    fn update_keeps_omitted_fields() {
        let store = store();
        let id = add(&store, "keep");

        let out = execute(
            &store,
            Command::Update {
                id,
                assigned: Some(4),
                closed: None,
                title: None,
                content: Some("changed".into()),
            },
        )
        .unwrap();
        assert_eq!(out["title"], "keep");
        assert_eq!(out["content"], "changed");
        assert_eq!(out["assigned_id"], 4);
    }

    #[test]
    fn close_sets_timestamp() {
        let store = store();
        let id = add(&store, "done");

        let out = execute(&store, Command::Close { id }).unwrap();
        assert!(out["closed"].as_i64().unwrap() > 0);
    }

    #[test]
    fn update_missing_task_fails() {
        let store = store();
        let err = execute(
            &store,
            Command::Update {
                id: 404,
                assigned: None,
                closed: None,
                title: None,
                content: None,
            },
        )
        .unwrap_err();
        assert!(err.to_string().contains("task not found: 404"));
    }

    #[test]
    fn label_flow() {
        let store = store();
        let id = add(&store, "labelled");
        execute(
            &store,
            Command::Label {
                command: LabelCommand::Create { name: "bug".into() },
            },
        )
        .unwrap();
        let out = execute(
            &store,
            Command::Label {
                command: LabelCommand::Attach {
                    task_id: id,
                    name: "bug".into(),
                },
            },
        )
        .unwrap();
        assert_eq!(out["linked"], true);
        assert_eq!(out["task_id"], id);

        let listed = execute(&store, Command::ByLabel { label: "bug".into() }).unwrap();
        assert_eq!(listed[0]["id"], id);
    }

    #[test]
    fn delete_twice_succeeds() {
        let store = store();
        let id = add(&store, "gone");
        let first = execute(&store, Command::Delete { id }).unwrap();
        let second = execute(&store, Command::Delete { id }).unwrap();
        assert_eq!(first["deleted"], true);
        assert_eq!(second["deleted"], false);
    }
}
