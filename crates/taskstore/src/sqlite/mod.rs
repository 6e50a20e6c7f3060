//! `SQLite` backend for the task store.
//!
//! - **[`connection`]**: `r2d2` connection pool with WAL mode, foreign keys, and
//!   busy timeout applied to every connection.
//! - **[`schema`]**: idempotent bootstrap of the `tasks`, `labels`, and
//!   `tasks_labels` tables.
//! - **[`repositories`]**: stateless repository structs. Each method takes
//!   `&Connection` and executes parameterized SQL.

pub mod connection;
pub mod repositories;
pub mod schema;

pub use connection::{
    ConnectionConfig, ConnectionPool, PooledConnection, PragmaState, new_file, new_in_memory,
    new_pool, verify_pragmas,
};
pub use schema::{ensure_schema, missing_tables};
