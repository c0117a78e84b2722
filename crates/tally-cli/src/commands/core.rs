//! Core command implementations and shared utilities
//!
//! This module contains:
//! - `open_reconciler` - Shared utility to open the database with config loaded
//! - `print_json` - JSON output for `--json`
//! - `cmd_init` - Initialize the database

use std::path::Path;

use anyhow::{Context, Result};
use serde::Serialize;
use tally_core::config::default_config_path;
use tally_core::{Config, Database, Reconciler, DEFAULT_CATEGORIES};

/// The reconciler over the on-disk store
pub type App = Reconciler<Database>;

pub fn open_db(db_path: &Path) -> Result<Database> {
    let path_str = db_path
        .to_str()
        .context("Database path is not valid UTF-8")?;
    Database::new(path_str).context("Failed to open database")
}

/// Open the database and load configuration (explicit file, user file, then defaults)
pub fn open_reconciler(db_path: &Path, config_path: Option<&Path>) -> Result<App> {
    let config = Config::load(config_path).context("Failed to load configuration")?;
    let db = open_db(db_path)?;
    Ok(Reconciler::new(db, config))
}

pub fn print_json<T: Serialize + ?Sized>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

pub fn cmd_init(db_path: &Path, config_path: Option<&Path>) -> Result<()> {
    println!("🔧 Initializing database at {}...", db_path.display());

    let app = open_reconciler(db_path, config_path)?;
    let detection = &app.config().detection;

    match config_path.filter(|p| p.exists()) {
        Some(path) => println!("   Config: {}", path.display()),
        None => match default_config_path().filter(|p| p.exists()) {
            Some(path) => println!("   Config: {}", path.display()),
            None => println!("   Config: built-in defaults"),
        },
    }
    println!(
        "   Duplicate window: {} day(s), merchant ≥ {}, items ≥ {}%",
        detection.threshold_days, detection.merchant_threshold, detection.duplicate_threshold
    );
    println!("   Categories: {}", DEFAULT_CATEGORIES.join(", "));

    println!("✅ Database initialized successfully!");
    println!();
    println!("Next steps:");
    println!("  1. Import an existing ledger: tally import --file ledger.csv");
    println!("  2. Add a receipt: tally add --file receipt.json");
    println!("  3. Set a budget: tally budgets set Groceries 400");

    Ok(())
}
