//! Tally CLI - Receipt ledger reconciliation
//!
//! Usage:
//!   tally init                      Initialize database
//!   tally import --file ledger.csv  Append ledger rows from CSV
//!   tally add --file receipt.json   Add a receipt (refuses likely duplicates)
//!   tally budgets                   Show budget status

mod cli;
mod commands;

#[cfg(test)]
mod tests;

use anyhow::Result;
use clap::Parser;
use tally_core::models::GoalTransactionType;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use cli::*;

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Set up logging
    // Priority: RUST_LOG env var > --verbose flag > default (info)
    let filter = if std::env::var("RUST_LOG").is_ok() {
        EnvFilter::from_default_env()
    } else if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_target(false).compact())
        .init();

    let config = cli.config.as_deref();

    match cli.command {
        Commands::Init => commands::cmd_init(&cli.db, config),
        Commands::Import { file } => {
            let app = commands::open_reconciler(&cli.db, config)?;
            commands::cmd_import(&app, &file)
        }
        Commands::Export { file } => {
            let app = commands::open_reconciler(&cli.db, config)?;
            commands::cmd_export(&app, &file)
        }
        Commands::Check { file } => {
            let app = commands::open_reconciler(&cli.db, config)?;
            commands::cmd_check(&app, &file, cli.json)
        }
        Commands::Add { file, force } => {
            let mut app = commands::open_reconciler(&cli.db, config)?;
            commands::cmd_add(&mut app, &file, force, cli.json)
        }
        Commands::Trends {
            period,
            filter,
            from,
            to,
        } => {
            let app = commands::open_reconciler(&cli.db, config)?;
            commands::cmd_trends(
                &app,
                period,
                filter,
                from.as_deref(),
                to.as_deref(),
                cli.json,
            )
        }
        Commands::Forecast => {
            let app = commands::open_reconciler(&cli.db, config)?;
            commands::cmd_forecast(&app, cli.json)
        }
        Commands::Categories {
            filter,
            from,
            to,
            categories,
            min,
            max,
        } => {
            let app = commands::open_reconciler(&cli.db, config)?;
            let query = commands::CategoryQuery {
                filter,
                from,
                to,
                categories,
                min,
                max,
            };
            commands::cmd_categories(&app, query, cli.json)
        }
        Commands::Budgets { action } => {
            let app = commands::open_reconciler(&cli.db, config)?;
            match action {
                None | Some(BudgetsAction::List) => commands::cmd_budgets_list(&app, cli.json),
                Some(BudgetsAction::Set {
                    category,
                    limit,
                    id,
                    period_type,
                    period,
                    start,
                    end,
                }) => {
                    let mut budget = tally_core::models::Budget::new(category, limit);
                    budget.id = id;
                    budget.period_type = period_type;
                    budget.period = period;
                    budget.start_date = start;
                    budget.end_date = end;
                    commands::cmd_budgets_set(&app, &budget)
                }
                Some(BudgetsAction::Delete { id }) => commands::cmd_budgets_delete(&app, &id),
            }
        }
        Commands::Goals { action } => {
            let app = commands::open_reconciler(&cli.db, config)?;
            match action {
                None | Some(GoalsAction::List) => commands::cmd_goals_list(&app, cli.json),
                Some(GoalsAction::Add {
                    name,
                    target,
                    by,
                    goal_type,
                    category,
                    manual,
                }) => {
                    let goal = tally_core::models::Goal {
                        id: None,
                        name,
                        target_amount: target,
                        current_amount: 0.0,
                        target_date: by,
                        category,
                        goal_type,
                        auto_track: !manual,
                    };
                    commands::cmd_goals_add(&app, &goal)
                }
                Some(GoalsAction::Deposit { id, amount, note }) => commands::cmd_goals_transaction(
                    &app,
                    &id,
                    amount,
                    GoalTransactionType::Deposit,
                    note,
                ),
                Some(GoalsAction::Withdraw { id, amount, note }) => {
                    commands::cmd_goals_transaction(
                        &app,
                        &id,
                        amount,
                        GoalTransactionType::Withdrawal,
                        note,
                    )
                }
                Some(GoalsAction::Recalculate { id }) => commands::cmd_goals_recalculate(&app, &id),
                Some(GoalsAction::Delete { id }) => commands::cmd_goals_delete(&app, &id),
            }
        }
    }
}
