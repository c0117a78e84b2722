//! CLI argument definitions using clap
//!
//! This module contains all the clap structs and enums for parsing CLI arguments.
//! The actual command implementations are in the `commands` module.

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use tally_core::models::{BudgetPeriod, GoalType, Granularity, PeriodType};
use tally_core::DateFilter;

/// Tally - Receipt ledger, duplicate detection and spending reports
#[derive(Parser)]
#[command(name = "tally")]
#[command(about = "Receipt ledger with duplicate detection, budgets and goals", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Database path
    #[arg(long, default_value = "tally.db", global = true)]
    pub db: PathBuf,

    /// Configuration file (thresholds for detection and forecasting)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Print results as JSON instead of tables
    #[arg(long, global = true)]
    pub json: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Initialize the database
    Init,

    /// Append ledger rows from a CSV file
    Import {
        /// CSV file with the ledger header row
        #[arg(short, long)]
        file: PathBuf,
    },

    /// Write the whole ledger to a CSV file
    Export {
        /// Destination CSV file
        #[arg(short, long)]
        file: PathBuf,
    },

    /// Check an extracted receipt for duplicates without saving it
    Check {
        /// Receipt JSON file
        #[arg(short, long)]
        file: PathBuf,
    },

    /// Add an extracted receipt to the ledger
    Add {
        /// Receipt JSON file
        #[arg(short, long)]
        file: PathBuf,

        /// Save even if the receipt looks like a duplicate
        #[arg(long)]
        force: bool,
    },

    /// Spending over time by category
    Trends {
        /// Granularity: monthly, weekly
        #[arg(short, long, default_value = "monthly")]
        period: Granularity,

        /// Date filter: all, this_month, last_month, last_7, last_30, last_90, this_year, custom
        #[arg(long, default_value = "all")]
        filter: DateFilter,

        /// Custom start date (YYYY-MM-DD)
        #[arg(long)]
        from: Option<String>,

        /// Custom end date (YYYY-MM-DD)
        #[arg(long)]
        to: Option<String>,
    },

    /// Forecast next month's spending per category
    Forecast,

    /// Spending breakdown by category
    Categories {
        /// Date filter: all, this_month, last_month, last_7, last_30, last_90, this_year, custom
        #[arg(long, default_value = "all")]
        filter: DateFilter,

        /// Custom start date (YYYY-MM-DD)
        #[arg(long)]
        from: Option<String>,

        /// Custom end date (YYYY-MM-DD)
        #[arg(long)]
        to: Option<String>,

        /// Only include these categories (repeatable)
        #[arg(short, long = "category")]
        categories: Vec<String>,

        /// Minimum line amount
        #[arg(long)]
        min: Option<f64>,

        /// Maximum line amount
        #[arg(long)]
        max: Option<f64>,
    },

    /// Manage budgets (defaults to showing status)
    Budgets {
        #[command(subcommand)]
        action: Option<BudgetsAction>,
    },

    /// Manage goals (defaults to listing with progress)
    Goals {
        #[command(subcommand)]
        action: Option<GoalsAction>,
    },
}

#[derive(Subcommand)]
pub enum BudgetsAction {
    /// Show every budget with its spending for the current window
    List,

    /// Create a budget, or update one when --id is given
    Set {
        /// Category the budget applies to (plural/singular insensitive)
        category: String,

        /// Spending limit
        limit: f64,

        /// Existing budget ID to update
        #[arg(long)]
        id: Option<String>,

        /// Window policy: rolling, calendar_month, calendar_week, custom
        #[arg(long, default_value = "calendar_month")]
        period_type: PeriodType,

        /// Rolling window length: monthly (30 days), weekly (7 days)
        #[arg(long, default_value = "monthly")]
        period: BudgetPeriod,

        /// Custom window start (YYYY-MM-DD)
        #[arg(long)]
        start: Option<String>,

        /// Custom window end (YYYY-MM-DD)
        #[arg(long)]
        end: Option<String>,
    },

    /// Delete a budget
    Delete {
        /// Budget ID
        id: String,
    },
}

#[derive(Subcommand)]
pub enum GoalsAction {
    /// List goals with recomputed progress
    List,

    /// Create a goal
    Add {
        /// Goal name
        name: String,

        /// Target amount
        target: f64,

        /// Target date (YYYY-MM-DD)
        #[arg(long)]
        by: String,

        /// Goal type: savings, spending_limit
        #[arg(long = "type", default_value = "savings")]
        goal_type: GoalType,

        /// Category for spending limits
        #[arg(short, long)]
        category: Option<String>,

        /// Keep the stored amount instead of recomputing it
        #[arg(long)]
        manual: bool,
    },

    /// Record a deposit toward a savings goal
    Deposit {
        /// Goal ID
        id: String,

        /// Amount deposited
        amount: f64,

        /// Optional note
        #[arg(long)]
        note: Option<String>,
    },

    /// Record a withdrawal from a savings goal
    Withdraw {
        /// Goal ID
        id: String,

        /// Amount withdrawn
        amount: f64,

        /// Optional note
        #[arg(long)]
        note: Option<String>,
    },

    /// Recompute a goal's current amount and store it
    Recalculate {
        /// Goal ID
        id: String,
    },

    /// Delete a goal
    Delete {
        /// Goal ID
        id: String,
    },
}
