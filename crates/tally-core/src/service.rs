//! Reconciler: the engine's outward surface
//!
//! Owns a store, the loaded configuration and a clock. Every report reads
//! the ledger once at call start and computes over that snapshot, so
//! concurrent callers never observe a half-applied write.
//!
//! Staged receipts live in an owned [`PendingReceipts`]; the staging methods
//! take `&mut self` and callers that share a reconciler wrap it in a lock.

use chrono::{Duration, NaiveDateTime};
use tracing::{debug, info};

use crate::analysis::{
    budget_status, category_analysis, forecast_next_month, goal_progress, goals::current_amount,
    spending_trends, SpendingFilter,
};
use crate::clock::{Clock, SystemClock};
use crate::config::Config;
use crate::dates::format_ledger_date;
use crate::duplicates::DuplicateDetector;
use crate::error::{Error, Result};
use crate::ledger::LedgerView;
use crate::models::{
    Budget, BudgetStatus, CategoryAnalysis, DuplicateCandidate, ForecastData, Goal, GoalProgress,
    GoalTransaction, GoalTransactionType, Granularity, Receipt, TrendData,
};
use crate::pending::{PendingReceipt, PendingReceipts};
use crate::period::DateFilter;
use crate::store::Store;

/// Outcome of confirming a staged receipt
#[derive(Debug, Clone, PartialEq)]
pub struct SavedReceipt {
    pub rows_written: usize,
    /// Duplicates that were overridden with `force`
    pub overridden_duplicates: usize,
}

pub struct Reconciler<S: Store> {
    store: S,
    config: Config,
    clock: Box<dyn Clock>,
    detector: DuplicateDetector,
    pending: PendingReceipts,
}

impl<S: Store> Reconciler<S> {
    pub fn new(store: S, config: Config) -> Self {
        Self::with_clock(store, config, Box::new(SystemClock))
    }

    pub fn with_clock(store: S, config: Config, clock: Box<dyn Clock>) -> Self {
        let detector = DuplicateDetector::new(config.detection.clone());
        let pending = match Duration::try_minutes(config.pending.ttl_minutes) {
            Some(ttl) => PendingReceipts::new(ttl),
            None => PendingReceipts::default(),
        };
        Self {
            store,
            config,
            clock,
            detector,
            pending,
        }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn now(&self) -> NaiveDateTime {
        self.clock.now()
    }

    fn snapshot(&self) -> Result<LedgerView> {
        Ok(LedgerView::new(self.store.read_all()?))
    }

    // ========== Receipts ==========

    /// Stored receipts the candidate likely duplicates
    pub fn check_duplicates(&self, receipt: &Receipt) -> Result<Vec<DuplicateCandidate>> {
        let rows = self.store.read_all()?;
        Ok(self.detector.find_duplicates(receipt, &rows))
    }

    /// Append a receipt to the ledger without checking for duplicates
    pub fn save_receipt(&self, receipt: &Receipt) -> Result<usize> {
        let rows = receipt.to_ledger_rows();
        self.store.append(&rows)?;
        info!(
            merchant = %receipt.merchant_details.name,
            rows = rows.len(),
            "Saved receipt"
        );
        Ok(rows.len())
    }

    /// Run duplicate detection and hold the receipt until it is confirmed
    pub fn stage_receipt(&mut self, receipt: Receipt) -> Result<PendingReceipt> {
        let now = self.now();
        self.pending.evict_expired(now);

        let duplicates = self.check_duplicates(&receipt)?;
        let id = self.pending.stage(receipt, duplicates, now);
        debug!(%id, "Staged receipt");
        self.pending
            .get(&id)
            .cloned()
            .ok_or_else(|| Error::NotFound(format!("Pending receipt {}", id)))
    }

    pub fn pending_receipt(&self, id: &str) -> Option<&PendingReceipt> {
        self.pending.get(id)
    }

    pub fn pending_receipts(&self) -> Vec<&PendingReceipt> {
        self.pending.list()
    }

    /// Persist a staged receipt
    ///
    /// Refuses with [`Error::Duplicate`] when duplicates were found at staging
    /// time, unless `force` is set. A refused receipt stays staged.
    pub fn confirm_receipt(&mut self, id: &str, force: bool) -> Result<SavedReceipt> {
        self.pending.evict_expired(self.now());

        let duplicates = match self.pending.get(id) {
            Some(pending) => pending.duplicates.len(),
            None => return Err(Error::NotFound(format!("Pending receipt {}", id))),
        };
        if duplicates > 0 && !force {
            return Err(Error::Duplicate(duplicates));
        }

        let pending = self
            .pending
            .take(id)
            .ok_or_else(|| Error::NotFound(format!("Pending receipt {}", id)))?;
        let rows_written = self.save_receipt(&pending.receipt)?;
        Ok(SavedReceipt {
            rows_written,
            overridden_duplicates: if force { duplicates } else { 0 },
        })
    }

    pub fn discard_receipt(&mut self, id: &str) -> bool {
        self.pending.discard(id)
    }

    // ========== Reports ==========

    pub fn get_trends(
        &self,
        granularity: Granularity,
        filter: DateFilter,
        from: Option<&str>,
        to: Option<&str>,
    ) -> Result<TrendData> {
        let view = self.snapshot()?;
        let range = filter.range(from, to, self.now());
        Ok(spending_trends(&view, granularity, range))
    }

    pub fn get_forecast(&self) -> Result<ForecastData> {
        let view = self.snapshot()?;
        Ok(forecast_next_month(&view, &self.config.forecast, self.now()))
    }

    pub fn get_category_analysis(
        &self,
        filter: DateFilter,
        from: Option<&str>,
        to: Option<&str>,
        categories: Vec<String>,
        min_amount: Option<f64>,
        max_amount: Option<f64>,
    ) -> Result<CategoryAnalysis> {
        let view = self.snapshot()?;
        let spending = SpendingFilter::new()
            .range(filter.range(from, to, self.now()))
            .categories(categories)
            .min_amount(min_amount)
            .max_amount(max_amount);
        Ok(category_analysis(&view, &spending, filter.as_str()))
    }

    pub fn get_budget_status(&self) -> Result<BudgetStatus> {
        let view = self.snapshot()?;
        let budgets = self.store.list_budgets()?;
        Ok(budget_status(&view, &budgets, self.now()))
    }

    pub fn get_goal_progress(&self, goal: &Goal) -> Result<GoalProgress> {
        let view = self.snapshot()?;
        let transactions = self.transactions_for(goal)?;
        Ok(goal_progress(&view, goal, &transactions, self.now()))
    }

    /// Every goal with its progress recomputed
    pub fn list_goals(&self) -> Result<Vec<GoalProgress>> {
        let view = self.snapshot()?;
        let now = self.now();
        self.store
            .list_goals()?
            .iter()
            .map(|goal| {
                let transactions = self.transactions_for(goal)?;
                Ok(goal_progress(&view, goal, &transactions, now))
            })
            .collect()
    }

    /// Recompute a goal's current amount and store it
    pub fn recalculate_goal(&self, id: &str) -> Result<GoalProgress> {
        let mut goal = self
            .store
            .get_goal(id)?
            .ok_or_else(|| Error::NotFound(format!("Goal {}", id)))?;
        let view = self.snapshot()?;
        let transactions = self.transactions_for(&goal)?;
        let now = self.now();

        goal.current_amount = current_amount(&view, &goal, &transactions, now);
        self.store.save_goal(&goal)?;
        info!(goal = %id, amount = goal.current_amount, "Recalculated goal");
        Ok(goal_progress(&view, &goal, &transactions, now))
    }

    fn transactions_for(&self, goal: &Goal) -> Result<Vec<GoalTransaction>> {
        match goal.id.as_deref() {
            Some(id) => self.store.goal_transactions(id),
            None => Ok(Vec::new()),
        }
    }

    // ========== Budgets ==========

    pub fn list_budgets(&self) -> Result<Vec<Budget>> {
        self.store.list_budgets()
    }

    /// Create or update a budget, returning its id
    pub fn save_budget(&self, budget: &Budget) -> Result<String> {
        if budget.category.trim().is_empty() {
            return Err(Error::InvalidData("Budget category is required".into()));
        }
        if !budget.limit.is_finite() || budget.limit < 0.0 {
            return Err(Error::InvalidData(format!(
                "Budget limit must be a non-negative number, got {}",
                budget.limit
            )));
        }
        self.store.save_budget(budget)
    }

    pub fn delete_budget(&self, id: &str) -> Result<()> {
        if self.store.delete_budget(id)? {
            Ok(())
        } else {
            Err(Error::NotFound(format!("Budget {}", id)))
        }
    }

    // ========== Goals ==========

    pub fn get_goal(&self, id: &str) -> Result<Option<Goal>> {
        self.store.get_goal(id)
    }

    /// Create or update a goal, returning its id
    pub fn save_goal(&self, goal: &Goal) -> Result<String> {
        if goal.name.trim().is_empty() {
            return Err(Error::InvalidData("Goal name is required".into()));
        }
        if !goal.target_amount.is_finite() || goal.target_amount < 0.0 {
            return Err(Error::InvalidData(format!(
                "Goal target must be a non-negative number, got {}",
                goal.target_amount
            )));
        }
        self.store.save_goal(goal)
    }

    pub fn delete_goal(&self, id: &str) -> Result<()> {
        if self.store.delete_goal(id)? {
            Ok(())
        } else {
            Err(Error::NotFound(format!("Goal {}", id)))
        }
    }

    /// Record a manual deposit or withdrawal against a goal
    pub fn add_goal_transaction(
        &self,
        goal_id: &str,
        amount: f64,
        transaction_type: GoalTransactionType,
        note: Option<String>,
    ) -> Result<String> {
        if !amount.is_finite() || amount <= 0.0 {
            return Err(Error::InvalidData(format!(
                "Transaction amount must be positive, got {}",
                amount
            )));
        }
        if self.store.get_goal(goal_id)?.is_none() {
            return Err(Error::NotFound(format!("Goal {}", goal_id)));
        }

        let transaction = GoalTransaction {
            id: None,
            goal_id: goal_id.to_string(),
            amount,
            transaction_type,
            date: format_ledger_date(self.clock.today()),
            note,
        };
        self.store.add_goal_transaction(&transaction)
    }

    pub fn goal_transactions(&self, goal_id: &str) -> Result<Vec<GoalTransaction>> {
        self.store.goal_transactions(goal_id)
    }
}
