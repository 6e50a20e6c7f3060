//! # taskstore
//!
//! Command-line access to a task store: loads settings, installs the log
//! subscriber, opens the pool, and runs one subcommand.

#![deny(unsafe_code)]

mod commands;
mod logging;

use std::path::Path;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Parser;
use taskstore::{ConnectionConfig, TaskStore};
use taskstore_settings::{DatabaseSettings, StoreSettings, load_settings};
use tracing::debug;

use crate::commands::Command;

/// Task store administration.
#[derive(Parser, Debug)]
#[command(name = "taskstore", about = "Create, list, update, and delete tasks")]
struct Cli {
    /// Database connection string (overrides settings).
    #[arg(long, global = true)]
    db: Option<String>,

    /// Log filter directive (overrides settings).
    #[arg(long, global = true)]
    log_level: Option<String>,

    #[command(subcommand)]
    command: Command,
}

impl Cli {
    fn apply(&self, settings: &mut StoreSettings) {
        if let Some(ref db) = self.db {
            settings.database.url.clone_from(db);
        }
        if let Some(ref level) = self.log_level {
            settings.logging.level.clone_from(level);
        }
    }
}

fn connection_config(db: &DatabaseSettings) -> ConnectionConfig {
    ConnectionConfig {
        pool_size: db.pool_size,
        busy_timeout_ms: db.busy_timeout_ms,
        connection_timeout: Duration::from_millis(db.connection_timeout_ms),
        ..ConnectionConfig::default()
    }
}

/// Create the parent directory of a plain file path. URIs and `:memory:` are left alone.
fn ensure_parent_dir(url: &str) -> Result<()> {
    if url == ":memory:" || url.starts_with("file:") {
        return Ok(());
    }
    if let Some(parent) = Path::new(url).parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create directory: {}", parent.display()))?;
    }
    Ok(())
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut settings = load_settings().context("Failed to load settings")?;
    cli.apply(&mut settings);
    logging::init_subscriber(&settings.logging.level);
    debug!(db = %settings.database.url, "settings loaded");

    ensure_parent_dir(&settings.database.url)?;
    let store = TaskStore::connect(
        &settings.database.url,
        &connection_config(&settings.database),
    )
    .with_context(|| format!("Failed to open task store at {}", settings.database.url))?;

    let output = commands::execute(&store, cli.command)?;
    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}
