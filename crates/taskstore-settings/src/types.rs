//! Settings type definitions.
//!
//! All types use `#[serde(rename_all = "camelCase", default)]`, so a settings
//! file may name any subset of fields and the rest keep their defaults.

use serde::{Deserialize, Serialize};

use crate::loader::base_dir;

/// Root settings type.
///
/// ```json
/// {
///   "database": { "url": "/srv/tasks.db", "poolSize": 8 },
///   "logging": { "level": "info" }
/// }
/// ```
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct StoreSettings {
    /// Database connection settings.
    pub database: DatabaseSettings,
    /// Logging settings.
    pub logging: LoggingSettings,
}

/// Database connection and pool settings.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct DatabaseSettings {
    /// Connection string: a file path, a `file:` URI, or `:memory:`.
    pub url: String,
    /// Maximum pooled connections.
    pub pool_size: u32,
    /// How long to wait for a pooled connection, in milliseconds.
    pub connection_timeout_ms: u64,
    /// `SQLite` busy timeout in milliseconds.
    pub busy_timeout_ms: u32,
}

impl Default for DatabaseSettings {
    fn default() -> Self {
        Self {
            url: base_dir().join("tasks.db").to_string_lossy().into_owned(),
            pool_size: 16,
            connection_timeout_ms: 5_000,
            busy_timeout_ms: 30_000,
        }
    }
}

/// Logging settings.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct LoggingSettings {
    /// Default `tracing` filter directive; `RUST_LOG` takes precedence.
    pub level: String,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: "warn".to_string(),
        }
    }
}
