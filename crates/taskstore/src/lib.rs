//! # taskstore
//!
//! Task repository over a pooled `SQLite` connection set.
//!
//! - **[`TaskStore`]**: owns the pool; create, list (by composite filter, by
//!   author, by label), update, and delete tasks
//! - **`SQLite` backend**: `r2d2` pool with per-connection pragmas and stateless
//!   repositories issuing parameterized SQL
//! - **Schema bootstrap**: idempotent DDL for the `tasks`, `labels`, and
//!   `tasks_labels` tables
//!
//! ```no_run
//! use taskstore::{ConnectionConfig, TaskCreateParams, TaskFilter, TaskStore};
//!
//! let store = TaskStore::connect("tasks.db", &ConnectionConfig::default())?;
//! store.ensure_schema()?;
//! let id = store.create_task(&TaskCreateParams {
//!     title: "Ship it".into(),
//!     content: "Tag and publish the release".into(),
//! })?;
//! let tasks = store.list_tasks(TaskFilter::by_id(id))?;
//! # Ok::<(), taskstore::TaskStoreError>(())
//! ```

#![deny(unsafe_code)]

pub mod errors;
pub mod sqlite;
pub mod store;
pub mod types;

pub use errors::{ErrorKind, Result, TaskStoreError};
pub use sqlite::{ConnectionConfig, ConnectionPool};
pub use store::TaskStore;
pub use types::{Task, TaskCreateParams, TaskFilter, TaskUpdateParams};
