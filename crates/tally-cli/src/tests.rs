//! CLI command tests
//!
//! This module contains all tests for the CLI commands and argument parsing.

use std::io::Write;

use chrono::NaiveDate;
use clap::Parser;
use tally_core::models::{Budget, GoalTransactionType, GoalType, Granularity, PeriodType};
use tally_core::store::{BudgetStore, LedgerStore};
use tally_core::{Config, Database, DateFilter, FixedClock, Reconciler};

use crate::cli::{BudgetsAction, Cli, Commands, GoalsAction};
use crate::commands::{self, truncate, App, CategoryQuery};

const RECEIPT_JSON: &str = r#"{
    "merchant_details": {"name": "Corner Market", "address": "12 High St"},
    "purchase_date": "10-03-2025",
    "line_items": [
        {"item_name": "Apples", "unit_price": 0.5, "quantity": 6, "price": 3.0, "category": "Groceries"},
        {"item_name": "Cheddar", "unit_price": 4.25, "quantity": 1, "price": 4.25, "category": "Groceries"}
    ],
    "total_amounts": {"total": 7.25, "tax": null, "payment_method": "Cash"}
}"#;

fn setup_app() -> App {
    let db = Database::in_memory().unwrap();
    let today = NaiveDate::from_ymd_opt(2025, 3, 12).unwrap();
    Reconciler::with_clock(db, Config::default(), Box::new(FixedClock::at_noon(today)))
}

fn receipt_file() -> tempfile::NamedTempFile {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    file.write_all(RECEIPT_JSON.as_bytes()).unwrap();
    file
}

// ========== Argument Parsing Tests ==========

#[test]
fn test_parse_global_flags() {
    let cli = Cli::try_parse_from(["tally", "--db", "my.db", "--json", "-v", "forecast"]).unwrap();
    assert_eq!(cli.db.to_str(), Some("my.db"));
    assert!(cli.json);
    assert!(cli.verbose);
    assert!(matches!(cli.command, Commands::Forecast));
}

#[test]
fn test_parse_trends_defaults() {
    let cli = Cli::try_parse_from(["tally", "trends"]).unwrap();
    assert_eq!(cli.db.to_str(), Some("tally.db"));
    match cli.command {
        Commands::Trends { period, filter, .. } => {
            assert_eq!(period, Granularity::Monthly);
            assert_eq!(filter, DateFilter::All);
        }
        _ => panic!("expected trends"),
    }
}

#[test]
fn test_parse_trends_weekly_custom() {
    let cli = Cli::try_parse_from([
        "tally", "trends", "--period", "weekly", "--filter", "custom", "--from", "2025-01-01",
    ])
    .unwrap();
    match cli.command {
        Commands::Trends {
            period,
            filter,
            from,
            to,
        } => {
            assert_eq!(period, Granularity::Weekly);
            assert_eq!(filter, DateFilter::Custom);
            assert_eq!(from.as_deref(), Some("2025-01-01"));
            assert!(to.is_none());
        }
        _ => panic!("expected trends"),
    }
}

#[test]
fn test_parse_rejects_unknown_filter() {
    assert!(Cli::try_parse_from(["tally", "categories", "--filter", "last_week"]).is_err());
    assert!(Cli::try_parse_from(["tally", "trends", "--period", "daily"]).is_err());
}

#[test]
fn test_parse_categories_repeated() {
    let cli = Cli::try_parse_from([
        "tally", "categories", "-c", "Dining", "-c", "Groceries", "--min", "5",
    ])
    .unwrap();
    match cli.command {
        Commands::Categories {
            categories, min, max, ..
        } => {
            assert_eq!(categories, vec!["Dining", "Groceries"]);
            assert_eq!(min, Some(5.0));
            assert!(max.is_none());
        }
        _ => panic!("expected categories"),
    }
}

#[test]
fn test_parse_budget_set() {
    let cli = Cli::try_parse_from([
        "tally", "budgets", "set", "Dining", "150", "--period-type", "calendar_week",
    ])
    .unwrap();
    match cli.command {
        Commands::Budgets {
            action:
                Some(BudgetsAction::Set {
                    category,
                    limit,
                    period_type,
                    ..
                }),
        } => {
            assert_eq!(category, "Dining");
            assert_eq!(limit, 150.0);
            assert_eq!(period_type, PeriodType::CalendarWeek);
        }
        _ => panic!("expected budgets set"),
    }
}

#[test]
fn test_parse_goal_add() {
    let cli = Cli::try_parse_from([
        "tally", "goals", "add", "Eat out less", "200", "--by", "2025-06-30", "--type",
        "spending_limit", "-c", "Dining",
    ])
    .unwrap();
    match cli.command {
        Commands::Goals {
            action:
                Some(GoalsAction::Add {
                    goal_type,
                    category,
                    manual,
                    ..
                }),
        } => {
            assert_eq!(goal_type, GoalType::SpendingLimit);
            assert_eq!(category.as_deref(), Some("Dining"));
            assert!(!manual);
        }
        _ => panic!("expected goals add"),
    }
}

#[test]
fn test_parse_bare_budgets_and_goals() {
    let cli = Cli::try_parse_from(["tally", "budgets"]).unwrap();
    assert!(matches!(cli.command, Commands::Budgets { action: None }));
    let cli = Cli::try_parse_from(["tally", "goals"]).unwrap();
    assert!(matches!(cli.command, Commands::Goals { action: None }));
}

// ========== Receipt Command Tests ==========

#[test]
fn test_cmd_add_then_refuse_duplicate() {
    let mut app = setup_app();
    let file = receipt_file();

    commands::cmd_add(&mut app, file.path(), false, false).unwrap();
    assert_eq!(app.store().read_all().unwrap().len(), 2);

    assert!(commands::cmd_add(&mut app, file.path(), false, false).is_err());
    assert_eq!(app.store().read_all().unwrap().len(), 2);
    assert!(app.pending_receipts().is_empty());

    commands::cmd_add(&mut app, file.path(), true, false).unwrap();
    assert_eq!(app.store().read_all().unwrap().len(), 4);
}

#[test]
fn test_cmd_check_does_not_save() {
    let app = setup_app();
    let file = receipt_file();
    commands::cmd_check(&app, file.path(), false).unwrap();
    commands::cmd_check(&app, file.path(), true).unwrap();
    assert!(app.store().read_all().unwrap().is_empty());
}

#[test]
fn test_cmd_check_missing_file() {
    let app = setup_app();
    assert!(commands::cmd_check(&app, std::path::Path::new("/nonexistent/receipt.json"), false).is_err());
}

// ========== Ledger Command Tests ==========

#[test]
fn test_cmd_export_then_import() {
    let mut app = setup_app();
    let receipt = receipt_file();
    commands::cmd_add(&mut app, receipt.path(), false, false).unwrap();

    let dir = tempfile::tempdir().unwrap();
    let csv_path = dir.path().join("ledger.csv");
    commands::cmd_export(&app, &csv_path).unwrap();

    let other = setup_app();
    commands::cmd_import(&other, &csv_path).unwrap();
    assert_eq!(
        other.store().read_all().unwrap(),
        app.store().read_all().unwrap()
    );
}

// ========== Report Command Tests ==========

#[test]
fn test_report_commands_on_empty_and_populated_ledger() {
    let mut app = setup_app();
    commands::cmd_trends(&app, Granularity::Monthly, DateFilter::All, None, None, false).unwrap();
    commands::cmd_forecast(&app, false).unwrap();
    commands::cmd_categories(&app, CategoryQuery::default(), false).unwrap();

    let receipt = receipt_file();
    commands::cmd_add(&mut app, receipt.path(), false, false).unwrap();
    commands::cmd_trends(&app, Granularity::Weekly, DateFilter::ThisMonth, None, None, false)
        .unwrap();
    commands::cmd_forecast(&app, true).unwrap();
    let query = CategoryQuery {
        categories: vec!["groceries".to_string()],
        ..Default::default()
    };
    commands::cmd_categories(&app, query, false).unwrap();
}

// ========== Budget and Goal Command Tests ==========

#[test]
fn test_cmd_budgets() {
    let app = setup_app();
    commands::cmd_budgets_list(&app, false).unwrap();

    commands::cmd_budgets_set(&app, &Budget::new("Groceries", 300.0)).unwrap();
    let budgets = app.store().list_budgets().unwrap();
    assert_eq!(budgets.len(), 1);
    commands::cmd_budgets_list(&app, false).unwrap();

    let id = budgets[0].id.clone().unwrap();
    commands::cmd_budgets_delete(&app, &id).unwrap();
    assert!(commands::cmd_budgets_delete(&app, &id).is_err());
    assert!(commands::cmd_budgets_set(&app, &Budget::new("Groceries", -1.0)).is_err());
}

#[test]
fn test_cmd_goals() {
    let app = setup_app();
    let goal = tally_core::models::Goal {
        id: None,
        name: "Bike".to_string(),
        target_amount: 400.0,
        current_amount: 0.0,
        target_date: "2025-09-01".to_string(),
        category: None,
        goal_type: GoalType::Savings,
        auto_track: true,
    };
    commands::cmd_goals_add(&app, &goal).unwrap();
    let id = app.list_goals().unwrap()[0].goal.id.clone().unwrap();

    commands::cmd_goals_transaction(&app, &id, 100.0, GoalTransactionType::Deposit, None).unwrap();
    commands::cmd_goals_transaction(&app, &id, 20.0, GoalTransactionType::Withdrawal, None)
        .unwrap();
    commands::cmd_goals_recalculate(&app, &id).unwrap();
    commands::cmd_goals_list(&app, false).unwrap();

    assert_eq!(app.get_goal(&id).unwrap().unwrap().current_amount, 80.0);
    assert!(
        commands::cmd_goals_transaction(&app, "goal_missing", 5.0, GoalTransactionType::Deposit, None)
            .is_err()
    );

    commands::cmd_goals_delete(&app, &id).unwrap();
    assert!(app.list_goals().unwrap().is_empty());
}

// ========== Utility Tests ==========

#[test]
fn test_truncate() {
    assert_eq!(truncate("short", 10), "short");
    assert_eq!(truncate("a very long merchant name", 10), "a very ...");
    assert_eq!(truncate("Café Crème Brûlée", 8), "Café ...");
}
