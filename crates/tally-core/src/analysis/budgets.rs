//! Budget status against the ledger
//!
//! Spending is recomputed on every call. Nothing derived is stored back.

use chrono::NaiveDateTime;

use super::percentage;
use crate::ledger::LedgerView;
use crate::models::{Budget, BudgetReport, BudgetStatus};
use crate::period::resolve_budget_period;

/// Spending for one budget in its current window
///
/// Rows are matched on normalized category, and every parseable line total
/// counts, refunds included.
pub fn budget_report(view: &LedgerView, budget: &Budget, now: NaiveDateTime) -> BudgetReport {
    let period = resolve_budget_period(
        budget.period_type,
        budget.period,
        budget.start_date.as_deref(),
        budget.end_date.as_deref(),
        now,
    );
    let current_spend = view.category_total(&budget.category, period.window.into());

    BudgetReport {
        budget: budget.clone(),
        current_spend,
        percentage_used: percentage(current_spend, budget.limit),
        is_exceeded: current_spend > budget.limit,
        period_display: period.display,
        resets_on: period.resets_on,
    }
}

/// Reports for every budget plus overall totals
pub fn budget_status(view: &LedgerView, budgets: &[Budget], now: NaiveDateTime) -> BudgetStatus {
    let reports: Vec<BudgetReport> = budgets
        .iter()
        .map(|budget| budget_report(view, budget, now))
        .collect();

    let total_budget: f64 = reports.iter().map(|r| r.budget.limit).sum();
    let total_spent: f64 = reports.iter().map(|r| r.current_spend).sum();

    BudgetStatus {
        budgets: reports,
        total_budget,
        total_spent,
        overall_percentage: percentage(total_spent, total_budget),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{BudgetPeriod, LedgerRow, PeriodType};
    use chrono::NaiveDate;

    fn row(date: &str, category: &str, total: &str) -> LedgerRow {
        LedgerRow {
            date: date.to_string(),
            category: category.to_string(),
            total_price: total.to_string(),
            ..Default::default()
        }
    }

    fn now() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2025, 1, 15)
            .unwrap()
            .and_hms_opt(12, 0, 0)
            .unwrap()
    }

    fn ledger() -> LedgerView {
        LedgerView::new(vec![
            row("02-01-2025", "Groceries", "40"),
            row("14-01-2025", "groceries", "25"),
            row("31-12-2024", "Groceries", "99"),
            row("05-01-2025", "Dining", "12"),
            row("06-01-2025", "Groceries", "-5"),
        ])
    }

    #[test]
    fn test_singular_budget_matches_plural_rows() {
        let report = budget_report(&ledger(), &Budget::new("Grocery", 100.0), now());
        assert_eq!(report.current_spend, 60.0);
        assert_eq!(report.percentage_used, 60.0);
        assert!(!report.is_exceeded);
        assert_eq!(report.period_display, "Jan 01 - Jan 31, 2025");
        assert_eq!(report.resets_on, "Feb 01, 2025");
    }

    #[test]
    fn test_zero_limit() {
        let report = budget_report(&ledger(), &Budget::new("Dining", 0.0), now());
        assert_eq!(report.percentage_used, 0.0);
        assert!(report.is_exceeded);
    }

    #[test]
    fn test_rolling_week() {
        let mut budget = Budget::new("Groceries", 50.0);
        budget.period_type = PeriodType::Rolling;
        budget.period = BudgetPeriod::Weekly;
        let report = budget_report(&ledger(), &budget, now());
        // Only 14-01 is within [08-01 12:00, 15-01 12:00]
        assert_eq!(report.current_spend, 25.0);
        assert_eq!(report.resets_on, "Daily");
    }

    #[test]
    fn test_custom_window() {
        let mut budget = Budget::new("Groceries", 50.0);
        budget.period_type = PeriodType::Custom;
        budget.start_date = Some("2024-12-01".to_string());
        budget.end_date = Some("2025-01-02".to_string());
        let report = budget_report(&ledger(), &budget, now());
        assert_eq!(report.current_spend, 139.0);
        assert!(report.is_exceeded);
        assert_eq!(report.resets_on, "Does not reset");
    }

    #[test]
    fn test_status_totals() {
        let budgets = vec![Budget::new("Groceries", 100.0), Budget::new("Dining", 100.0)];
        let status = budget_status(&ledger(), &budgets, now());
        assert_eq!(status.budgets.len(), 2);
        assert_eq!(status.total_budget, 200.0);
        assert_eq!(status.total_spent, 72.0);
        assert_eq!(status.overall_percentage, 36.0);
    }

    #[test]
    fn test_no_budgets() {
        let status = budget_status(&ledger(), &[], now());
        assert!(status.budgets.is_empty());
        assert_eq!(status.overall_percentage, 0.0);
    }
}
