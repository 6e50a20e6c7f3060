//! # taskstore-settings
//!
//! Configuration for the task store, loaded from three layers (in priority
//! order):
//! 1. **Compiled defaults**: [`StoreSettings::default()`]
//! 2. **User file**: `~/.taskstore/settings.json` (deep-merged over defaults)
//! 3. **Environment variables**: `TASKSTORE_*` overrides (highest priority)
//!
//! Settings are plain values handed to whoever builds the store; there is no
//! process-wide singleton.

#![deny(unsafe_code)]

pub mod errors;
pub mod loader;
pub mod types;

pub use errors::{Result, SettingsError};
pub use loader::{
    apply_env_overrides, deep_merge, load_settings, load_settings_from_path, settings_path,
};
pub use types::{DatabaseSettings, LoggingSettings, StoreSettings};
