//! Goal progress
//!
//! Goals without `auto_track` report the amount stored on them. Tracked
//! savings goals sum their manual deposits and withdrawals. Tracked spending
//! limits measure category spending from the ledger.

use chrono::{Datelike, NaiveDateTime};
use tracing::debug;

use super::percentage;
use crate::dates::parse_param_date;
use crate::ledger::LedgerView;
use crate::models::{Goal, GoalProgress, GoalTransaction, GoalType};
use crate::period::calendar_month_window;

/// Current amount for a goal
///
/// `transactions` may hold entries for other goals; only those whose
/// `goal_id` matches the goal are counted.
pub fn current_amount(
    view: &LedgerView,
    goal: &Goal,
    transactions: &[GoalTransaction],
    now: NaiveDateTime,
) -> f64 {
    if !goal.auto_track {
        return goal.current_amount;
    }

    match goal.goal_type {
        GoalType::Savings => {
            let goal_id = goal.id.as_deref().unwrap_or_default();
            transactions
                .iter()
                .filter(|txn| txn.goal_id == goal_id)
                .map(GoalTransaction::signed_amount)
                .sum()
        }
        GoalType::SpendingLimit => spending_toward(view, goal, now),
    }
}

fn spending_toward(view: &LedgerView, goal: &Goal, now: NaiveDateTime) -> f64 {
    let Some(category) = goal.category.as_deref().filter(|c| !c.trim().is_empty()) else {
        return 0.0;
    };
    let Some(target) = parse_param_date(&goal.target_date) else {
        debug!(target_date = %goal.target_date, "Goal target date unparseable");
        return 0.0;
    };

    let today = now.date();
    if target.year() == today.year() && target.month() == today.month() {
        view.category_total(category, calendar_month_window(now).into())
    } else {
        view.entries_for_category(category)
            .filter(|entry| entry.date <= target)
            .map(|entry| entry.amount)
            .sum()
    }
}

/// Goal with its current amount resolved and progress computed
pub fn goal_progress(
    view: &LedgerView,
    goal: &Goal,
    transactions: &[GoalTransaction],
    now: NaiveDateTime,
) -> GoalProgress {
    let mut goal = goal.clone();
    goal.current_amount = current_amount(view, &goal, transactions, now);
    let progress_percentage = percentage(goal.current_amount, goal.target_amount);
    GoalProgress {
        goal,
        progress_percentage,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{GoalTransactionType, LedgerRow};
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
        NaiveDate::from_ymd_opt(2025, 3, 10)
            .unwrap()
            .and_hms_opt(12, 0, 0)
            .unwrap()
    }

    fn goal(goal_type: GoalType, target_date: &str, category: Option<&str>) -> Goal {
        Goal {
            id: Some("goal_1".to_string()),
            name: "Test".to_string(),
            target_amount: 200.0,
            current_amount: 15.0,
            target_date: target_date.to_string(),
            category: category.map(str::to_string),
            goal_type,
            auto_track: true,
        }
    }

    fn txn(goal_id: &str, amount: f64, kind: GoalTransactionType) -> GoalTransaction {
        GoalTransaction {
            id: None,
            goal_id: goal_id.to_string(),
            amount,
            transaction_type: kind,
            date: "2025-03-01".to_string(),
            note: None,
        }
    }

    fn ledger() -> LedgerView {
        LedgerView::new(vec![
            row("01-02-2025", "Dining", "30"),
            row("05-03-2025", "Dining", "20"),
            row("20-04-2025", "Dining", "50"),
            row("05-03-2025", "Transport", "7"),
        ])
    }

    #[test]
    fn test_manual_goal_uses_stored_amount() {
        let mut g = goal(GoalType::Savings, "2025-12-31", None);
        g.auto_track = false;
        let progress = goal_progress(&ledger(), &g, &[], now());
        assert_eq!(progress.goal.current_amount, 15.0);
        assert_eq!(progress.progress_percentage, 7.5);
    }

    #[test]
    fn test_savings_sums_own_transactions() {
        let g = goal(GoalType::Savings, "2025-12-31", None);
        let txns = vec![
            txn("goal_1", 100.0, GoalTransactionType::Deposit),
            txn("goal_1", 30.0, GoalTransactionType::Withdrawal),
            txn("goal_2", 500.0, GoalTransactionType::Deposit),
        ];
        let progress = goal_progress(&ledger(), &g, &txns, now());
        assert_eq!(progress.goal.current_amount, 70.0);
        assert_eq!(progress.progress_percentage, 35.0);
    }

    #[test]
    fn test_spending_limit_current_month() {
        let g = goal(GoalType::SpendingLimit, "2025-03-31", Some("Dining"));
        assert_eq!(current_amount(&ledger(), &g, &[], now()), 20.0);
    }

    #[test]
    fn test_spending_limit_up_to_target_date() {
        let g = goal(GoalType::SpendingLimit, "2025-04-20", Some("dining"));
        assert_eq!(current_amount(&ledger(), &g, &[], now()), 100.0);

        let g = goal(GoalType::SpendingLimit, "2025-02-28", Some("Dining"));
        assert_eq!(current_amount(&ledger(), &g, &[], now()), 30.0);
    }

    #[test]
    fn test_spending_limit_without_category_or_date() {
        let g = goal(GoalType::SpendingLimit, "2025-04-20", None);
        assert_eq!(current_amount(&ledger(), &g, &[], now()), 0.0);

        let g = goal(GoalType::SpendingLimit, "someday", Some("Dining"));
        assert_eq!(current_amount(&ledger(), &g, &[], now()), 0.0);
    }

    #[test]
    fn test_zero_target() {
        let mut g = goal(GoalType::Savings, "2025-12-31", None);
        g.target_amount = 0.0;
        let txns = vec![txn("goal_1", 10.0, GoalTransactionType::Deposit)];
        assert_eq!(goal_progress(&ledger(), &g, &txns, now()).progress_percentage, 0.0);
    }
}
