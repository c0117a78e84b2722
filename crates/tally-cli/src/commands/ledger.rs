//! Ledger CSV import/export commands

use std::fs::File;
use std::path::Path;

use anyhow::{Context, Result};
use tally_core::store::LedgerStore;
use tally_core::{parse_ledger_csv, write_ledger_csv};

use super::App;

pub fn cmd_import(app: &App, file: &Path) -> Result<()> {
    println!("📥 Importing ledger rows from {}...", file.display());

    let reader =
        File::open(file).with_context(|| format!("Failed to open {}", file.display()))?;
    let rows = parse_ledger_csv(reader).context("Failed to parse ledger CSV")?;

    if rows.is_empty() {
        println!("   No rows found.");
        return Ok(());
    }

    app.store()
        .append(&rows)
        .context("Failed to append rows")?;

    let unparseable = rows.iter().filter(|r| r.parsed_date().is_none()).count();
    println!("✅ Imported {} rows", rows.len());
    if unparseable > 0 {
        println!(
            "   ⚠️  {} row(s) have unreadable dates and will be skipped by reports",
            unparseable
        );
    }

    Ok(())
}

pub fn cmd_export(app: &App, file: &Path) -> Result<()> {
    let rows = app.store().read_all()?;

    let writer =
        File::create(file).with_context(|| format!("Failed to create {}", file.display()))?;
    write_ledger_csv(writer, &rows).context("Failed to write ledger CSV")?;

    println!("✅ Exported {} rows to {}", rows.len(), file.display());
    Ok(())
}
