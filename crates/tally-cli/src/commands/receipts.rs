//! Receipt workflow commands (duplicate check, add)

use std::path::Path;

use anyhow::{Context, Result};
use tally_core::models::DuplicateCandidate;
use tally_core::{load_receipt_file, Error};

use super::{print_json, truncate, App};

fn print_candidates(candidates: &[DuplicateCandidate]) {
    println!(
        "   {:10} │ {:24} │ {:>9} │ {:>8} │ {:>8} │ {}",
        "Date", "Merchant", "Total", "Items", "Merchant", "Contents"
    );
    println!("   ───────────┼──────────────────────────┼───────────┼──────────┼──────────┼──────────────");
    for candidate in candidates {
        println!(
            "   {:10} │ {:24} │ {:>9.2} │ {:>7.1}% │ {:>8.0} │ {} ({})",
            candidate.date,
            truncate(&candidate.merchant, 24),
            candidate.grand_total,
            candidate.match_percentage,
            candidate.merchant_similarity_score,
            candidate.item_summary,
            truncate(&candidate.categories, 30),
        );
    }
}

pub fn cmd_check(app: &App, file: &Path, json: bool) -> Result<()> {
    let receipt = load_receipt_file(file)
        .with_context(|| format!("Failed to read receipt {}", file.display()))?;
    let candidates = app.check_duplicates(&receipt)?;

    if json {
        return print_json(&candidates);
    }

    println!();
    println!(
        "🔍 {} on {} ({:.2})",
        receipt.merchant_details.name, receipt.purchase_date, receipt.total_amounts.total
    );
    if candidates.is_empty() {
        println!("   ✅ No duplicates found.");
    } else {
        println!(
            "   ⚠️  {} possible duplicate(s) already in the ledger:",
            candidates.len()
        );
        println!();
        print_candidates(&candidates);
    }

    Ok(())
}

pub fn cmd_add(app: &mut App, file: &Path, force: bool, json: bool) -> Result<()> {
    let receipt = load_receipt_file(file)
        .with_context(|| format!("Failed to read receipt {}", file.display()))?;
    let staged = app.stage_receipt(receipt)?;

    match app.confirm_receipt(&staged.id, force) {
        Ok(saved) => {
            if json {
                return print_json(&staged.duplicates);
            }
            if saved.overridden_duplicates > 0 {
                println!(
                    "⚠️  Saved despite {} possible duplicate(s) (--force)",
                    saved.overridden_duplicates
                );
            }
            println!(
                "✅ Added {} line item(s) from {}",
                saved.rows_written, staged.receipt.merchant_details.name
            );
            Ok(())
        }
        Err(Error::Duplicate(count)) => {
            app.discard_receipt(&staged.id);
            if json {
                print_json(&staged.duplicates)?;
            } else {
                println!("⚠️  Receipt not saved: {} possible duplicate(s)", count);
                println!();
                print_candidates(&staged.duplicates);
                println!();
                println!("   Re-run with --force to save it anyway.");
            }
            anyhow::bail!("Receipt looks like a duplicate")
        }
        Err(e) => Err(e).context("Failed to save receipt"),
    }
}
