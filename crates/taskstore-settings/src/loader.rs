//! Settings loading with deep merge and environment variable overrides.
//!
//! Loading flow:
//! 1. Start with compiled [`StoreSettings::default()`]
//! 2. If `~/.taskstore/settings.json` exists, deep-merge user values over defaults
//! 3. Apply environment variable overrides (highest priority)
//!
//! Deep merge rules:
//! - Objects are merged recursively (source overrides target per-key)
//! - Arrays and primitives are replaced entirely by source
//! - Null values in source are skipped (preserving target)

use std::path::{Path, PathBuf};

use serde_json::Value;
use tracing::{debug, warn};

use crate::errors::Result;
use crate::types::StoreSettings;

/// Override for the database connection string.
pub const ENV_DATABASE_URL: &str = "TASKSTORE_DATABASE_URL";
/// Override for the pool size (1–256).
pub const ENV_POOL_SIZE: &str = "TASKSTORE_POOL_SIZE";
/// Override for the pool checkout timeout (100–600000 ms).
pub const ENV_CONNECTION_TIMEOUT_MS: &str = "TASKSTORE_CONNECTION_TIMEOUT_MS";
/// Override for the `SQLite` busy timeout (0–600000 ms).
pub const ENV_BUSY_TIMEOUT_MS: &str = "TASKSTORE_BUSY_TIMEOUT_MS";
/// Override for the log level.
pub const ENV_LOG_LEVEL: &str = "TASKSTORE_LOG_LEVEL";

/// Resolve the settings directory (`~/.taskstore`).
pub fn base_dir() -> PathBuf {
    let home = std::env::var("HOME").unwrap_or_else(|_| "/tmp".to_string());
    PathBuf::from(home).join(".taskstore")
}

/// Resolve the path to the settings file (`~/.taskstore/settings.json`).
pub fn settings_path() -> PathBuf {
    base_dir().join("settings.json")
}

/// Load settings from the default path with env var overrides.
pub fn load_settings() -> Result<StoreSettings> {
    load_settings_from_path(&settings_path())
}

/// Load settings from a specific path with env var overrides.
///
/// If the file does not exist, returns defaults. If the file contains
/// invalid JSON, returns an error.
pub fn load_settings_from_path(path: &Path) -> Result<StoreSettings> {
    let mut settings = load_file_layer(path)?;
    apply_env_overrides(&mut settings);
    Ok(settings)
}

/// Defaults with the settings file merged over them, without env overrides.
pub fn load_file_layer(path: &Path) -> Result<StoreSettings> {
    let defaults = serde_json::to_value(StoreSettings::default())?;

    let merged = if path.exists() {
        debug!(?path, "loading settings from file");
        let content = std::fs::read_to_string(path)?;
        let user: Value = serde_json::from_str(&content)?;
        deep_merge(defaults, user)
    } else {
        debug!(?path, "settings file not found, using defaults");
        defaults
    };

    Ok(serde_json::from_value(merged)?)
}

/// Recursive deep merge of two JSON values.
pub fn deep_merge(target: Value, source: Value) -> Value {
    match (target, source) {
        (Value::Object(mut target_map), Value::Object(source_map)) => {
            for (key, source_val) in source_map {
                if source_val.is_null() {
                    continue;
                }
                let merged = if let Some(target_val) = target_map.remove(&key) {
                    deep_merge(target_val, source_val)
                } else {
                    source_val
                };
                let _ = target_map.insert(key, merged);
            }
            Value::Object(target_map)
        }
        (_, source) => source,
    }
}

/// Apply process environment overrides to loaded settings.
pub fn apply_env_overrides(settings: &mut StoreSettings) {
    apply_overrides(settings, |name| std::env::var(name).ok());
}

/// Apply overrides read through `lookup`.
///
/// Empty values are ignored. Numbers outside their range are ignored with a
/// warning and the file/default value is kept.
pub fn apply_overrides(settings: &mut StoreSettings, lookup: impl Fn(&str) -> Option<String>) {
    let read = |name: &str| lookup(name).filter(|v| !v.is_empty());

    if let Some(v) = read(ENV_DATABASE_URL) {
        settings.database.url = v;
    }
    if let Some(v) = read(ENV_POOL_SIZE).and_then(|v| checked::<u32>(ENV_POOL_SIZE, &v, 1, 256)) {
        settings.database.pool_size = v;
    }
    if let Some(v) = read(ENV_CONNECTION_TIMEOUT_MS)
        .and_then(|v| checked::<u64>(ENV_CONNECTION_TIMEOUT_MS, &v, 100, 600_000))
    {
        settings.database.connection_timeout_ms = v;
    }
    if let Some(v) =
        read(ENV_BUSY_TIMEOUT_MS).and_then(|v| checked::<u32>(ENV_BUSY_TIMEOUT_MS, &v, 0, 600_000))
    {
        settings.database.busy_timeout_ms = v;
    }
    if let Some(v) = read(ENV_LOG_LEVEL) {
        settings.logging.level = v;
    }
}

// ── Pure parsing functions (testable without env vars) ──────────────────────

/// Parse a string as an integer within an inclusive range.
pub fn parse_range<T>(val: &str, min: T, max: T) -> Option<T>
where
    T: std::str::FromStr + PartialOrd,
{
    let n: T = val.trim().parse().ok()?;
    (n >= min && n <= max).then_some(n)
}

fn checked<T>(name: &str, val: &str, min: T, max: T) -> Option<T>
where
    T: std::str::FromStr + PartialOrd,
{
    let result = parse_range(val, min, max);
    if result.is_none() {
        warn!(key = name, value = %val, "invalid numeric env var, ignoring");
    }
    result
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
