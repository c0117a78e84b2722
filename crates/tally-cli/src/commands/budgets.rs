//! Budget command implementations

use anyhow::{Context, Result};
use tally_core::models::Budget;

use super::{print_json, truncate, App};

pub fn cmd_budgets_list(app: &App, json: bool) -> Result<()> {
    let status = app.get_budget_status()?;

    if json {
        return print_json(&status);
    }

    println!();
    println!("💰 Budgets");
    println!("   ─────────────────────────────────────────────────────────────");

    if status.budgets.is_empty() {
        println!("   No budgets yet. Add one with: tally budgets set Groceries 400");
        return Ok(());
    }

    println!(
        "   {:18} │ {:>9} │ {:>9} │ {:>7} │ {:28} │ {}",
        "Category", "Limit", "Spent", "Used", "Period", "Resets"
    );
    println!("   ───────────────────┼───────────┼───────────┼─────────┼──────────────────────────────┼──────────────");
    for report in &status.budgets {
        let marker = if report.is_exceeded { "🔴" } else { "  " };
        println!(
            "   {:18} │ {:>9.2} │ {:>9.2} │ {:>6.1}% │ {:28} │ {} {}",
            truncate(&report.budget.category, 18),
            report.budget.limit,
            report.current_spend,
            report.percentage_used,
            truncate(&report.period_display, 28),
            report.resets_on,
            marker
        );
    }
    println!();
    println!(
        "   Overall: ${:.2} of ${:.2} ({:.1}%)",
        status.total_spent, status.total_budget, status.overall_percentage
    );

    for report in &status.budgets {
        if let Some(id) = &report.budget.id {
            println!("   \x1b[2m{} = {}\x1b[0m", report.budget.category, id);
        }
    }

    Ok(())
}

pub fn cmd_budgets_set(app: &App, budget: &Budget) -> Result<()> {
    let id = app.save_budget(budget).context("Failed to save budget")?;
    println!(
        "✅ Budget saved: {} ≤ ${:.2} ({}) [{}]",
        budget.category, budget.limit, budget.period_type, id
    );
    Ok(())
}

pub fn cmd_budgets_delete(app: &App, id: &str) -> Result<()> {
    app.delete_budget(id)
        .with_context(|| format!("Failed to delete budget {}", id))?;
    println!("✅ Deleted budget {}", id);
    Ok(())
}
