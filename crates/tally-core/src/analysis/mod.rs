//! Period aggregation over the ledger
//!
//! Every function here is a pure computation over a [`LedgerView`] snapshot,
//! request parameters and an explicit `now`:
//!
//! - **Trends** - per-category spending series by month or week
//! - **Forecast** - next-month estimate from the trailing months
//! - **Categories** - totals, counts and shares per category
//! - **Budgets** - spending against limits in each budget's window
//! - **Goals** - current amount and progress for savings and spending goals
//!
//! Empty or unparseable ledgers produce zeroed reports, never errors.
//!
//! [`LedgerView`]: crate::ledger::LedgerView

pub mod budgets;
pub mod categories;
pub mod forecast;
pub mod goals;
pub mod trends;

pub use budgets::{budget_report, budget_status};
pub use categories::{category_analysis, SpendingFilter};
pub use forecast::{forecast_next_month, ForecastConfig};
pub use goals::goal_progress;
pub use trends::{period_key, spending_trends};

/// `part / whole * 100`, or 0 when `whole` is not positive
pub(crate) fn percentage(part: f64, whole: f64) -> f64 {
    if whole > 0.0 {
        part / whole * 100.0
    } else {
        0.0
    }
}
