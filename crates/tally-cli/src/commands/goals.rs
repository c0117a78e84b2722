//! Goal command implementations

use anyhow::{Context, Result};
use tally_core::models::{Goal, GoalTransactionType};

use super::{print_json, truncate, App};

pub fn cmd_goals_list(app: &App, json: bool) -> Result<()> {
    let goals = app.list_goals()?;

    if json {
        return print_json(&goals);
    }

    println!();
    println!("🎯 Goals");
    println!("   ─────────────────────────────────────────────────────────────");

    if goals.is_empty() {
        println!("   No goals yet. Add one with: tally goals add \"Holiday\" 1500 --by 2025-12-01");
        return Ok(());
    }

    println!(
        "   {:38} │ {:20} │ {:14} │ {:>9} │ {:>9} │ {:>7} │ {}",
        "ID", "Name", "Type", "Current", "Target", "Done", "By"
    );
    println!("   ───────────────────────────────────────┼──────────────────────┼────────────────┼───────────┼───────────┼─────────┼────────────");
    for progress in &goals {
        let goal = &progress.goal;
        println!(
            "   {:38} │ {:20} │ {:14} │ {:>9.2} │ {:>9.2} │ {:>6.1}% │ {}",
            goal.id.as_deref().unwrap_or("-"),
            truncate(&goal.name, 20),
            goal.goal_type,
            goal.current_amount,
            goal.target_amount,
            progress.progress_percentage,
            goal.target_date
        );
    }

    Ok(())
}

pub fn cmd_goals_add(app: &App, goal: &Goal) -> Result<()> {
    let id = app.save_goal(goal).context("Failed to save goal")?;
    println!(
        "✅ Goal created: {} (${:.2} by {}) [{}]",
        goal.name, goal.target_amount, goal.target_date, id
    );
    Ok(())
}

pub fn cmd_goals_transaction(
    app: &App,
    goal_id: &str,
    amount: f64,
    transaction_type: GoalTransactionType,
    note: Option<String>,
) -> Result<()> {
    app.add_goal_transaction(goal_id, amount, transaction_type, note)
        .with_context(|| format!("Failed to record {} for goal {}", transaction_type, goal_id))?;

    let goal = app
        .get_goal(goal_id)?
        .with_context(|| format!("Goal {} not found", goal_id))?;
    let progress = app.get_goal_progress(&goal)?;
    println!(
        "✅ Recorded {} of ${:.2}. {} is at ${:.2} ({:.1}%)",
        transaction_type,
        amount,
        progress.goal.name,
        progress.goal.current_amount,
        progress.progress_percentage
    );
    Ok(())
}

pub fn cmd_goals_recalculate(app: &App, goal_id: &str) -> Result<()> {
    let progress = app
        .recalculate_goal(goal_id)
        .with_context(|| format!("Failed to recalculate goal {}", goal_id))?;
    println!(
        "✅ {} recalculated: ${:.2} of ${:.2} ({:.1}%)",
        progress.goal.name,
        progress.goal.current_amount,
        progress.goal.target_amount,
        progress.progress_percentage
    );
    Ok(())
}

pub fn cmd_goals_delete(app: &App, goal_id: &str) -> Result<()> {
    app.delete_goal(goal_id)
        .with_context(|| format!("Failed to delete goal {}", goal_id))?;
    println!("✅ Deleted goal {}", goal_id);
    Ok(())
}
