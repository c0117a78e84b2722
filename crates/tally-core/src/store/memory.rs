//! In-memory store for tests and embedding

use std::sync::{Mutex, MutexGuard, PoisonError};

use super::{
    new_id, BudgetStore, GoalStore, GoalTransactionStore, LedgerStore, BUDGET_ID_PREFIX,
    GOAL_ID_PREFIX, GOAL_TRANSACTION_ID_PREFIX,
};
use crate::error::{Error, Result};
use crate::models::{Budget, Goal, GoalTransaction, LedgerRow};

#[derive(Debug, Default)]
struct Tables {
    rows: Vec<LedgerRow>,
    budgets: Vec<Budget>,
    goals: Vec<Goal>,
    goal_transactions: Vec<GoalTransaction>,
}

/// `Vec`-backed store. Every method locks once, so calls are atomic.
#[derive(Debug, Default)]
pub struct MemoryStore {
    tables: Mutex<Tables>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store pre-filled with ledger rows
    pub fn with_rows(rows: Vec<LedgerRow>) -> Self {
        Self {
            tables: Mutex::new(Tables {
                rows,
                ..Default::default()
            }),
        }
    }

    fn tables(&self) -> MutexGuard<'_, Tables> {
        self.tables.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

fn row_out_of_range(index: usize, len: usize) -> Error {
    Error::NotFound(format!("Ledger row {} (ledger has {} rows)", index, len))
}

impl LedgerStore for MemoryStore {
    fn read_all(&self) -> Result<Vec<LedgerRow>> {
        Ok(self.tables().rows.clone())
    }

    fn append(&self, rows: &[LedgerRow]) -> Result<()> {
        self.tables().rows.extend_from_slice(rows);
        Ok(())
    }

    fn update_row(&self, index: usize, row: &LedgerRow) -> Result<()> {
        let mut tables = self.tables();
        let len = tables.rows.len();
        let slot = tables
            .rows
            .get_mut(index)
            .ok_or_else(|| row_out_of_range(index, len))?;
        *slot = row.clone();
        Ok(())
    }

    fn delete_row(&self, index: usize) -> Result<()> {
        let mut tables = self.tables();
        if index >= tables.rows.len() {
            return Err(row_out_of_range(index, tables.rows.len()));
        }
        tables.rows.remove(index);
        Ok(())
    }
}

impl BudgetStore for MemoryStore {
    fn list_budgets(&self) -> Result<Vec<Budget>> {
        Ok(self.tables().budgets.clone())
    }

    fn get_budget(&self, id: &str) -> Result<Option<Budget>> {
        Ok(self
            .tables()
            .budgets
            .iter()
            .find(|b| b.id.as_deref() == Some(id))
            .cloned())
    }

    fn save_budget(&self, budget: &Budget) -> Result<String> {
        let id = budget
            .id
            .clone()
            .unwrap_or_else(|| new_id(BUDGET_ID_PREFIX));
        let mut stored = budget.clone();
        stored.id = Some(id.clone());

        let mut tables = self.tables();
        match tables
            .budgets
            .iter()
            .position(|b| b.id.as_deref() == Some(id.as_str()))
        {
            Some(index) => tables.budgets[index] = stored,
            None => tables.budgets.push(stored),
        }
        Ok(id)
    }

    fn delete_budget(&self, id: &str) -> Result<bool> {
        let mut tables = self.tables();
        let before = tables.budgets.len();
        tables.budgets.retain(|b| b.id.as_deref() != Some(id));
        Ok(tables.budgets.len() != before)
    }
}

impl GoalStore for MemoryStore {
    fn list_goals(&self) -> Result<Vec<Goal>> {
        Ok(self.tables().goals.clone())
    }

    fn get_goal(&self, id: &str) -> Result<Option<Goal>> {
        Ok(self
            .tables()
            .goals
            .iter()
            .find(|g| g.id.as_deref() == Some(id))
            .cloned())
    }

    fn save_goal(&self, goal: &Goal) -> Result<String> {
        let id = goal.id.clone().unwrap_or_else(|| new_id(GOAL_ID_PREFIX));
        let mut stored = goal.clone();
        stored.id = Some(id.clone());

        let mut tables = self.tables();
        match tables
            .goals
            .iter()
            .position(|g| g.id.as_deref() == Some(id.as_str()))
        {
            Some(index) => tables.goals[index] = stored,
            None => tables.goals.push(stored),
        }
        Ok(id)
    }

    fn delete_goal(&self, id: &str) -> Result<bool> {
        let mut tables = self.tables();
        let before = tables.goals.len();
        tables.goals.retain(|g| g.id.as_deref() != Some(id));
        Ok(tables.goals.len() != before)
    }
}

impl GoalTransactionStore for MemoryStore {
    fn add_goal_transaction(&self, transaction: &GoalTransaction) -> Result<String> {
        let id = transaction
            .id
            .clone()
            .unwrap_or_else(|| new_id(GOAL_TRANSACTION_ID_PREFIX));
        let mut stored = transaction.clone();
        stored.id = Some(id.clone());
        self.tables().goal_transactions.push(stored);
        Ok(id)
    }

    fn goal_transactions(&self, goal_id: &str) -> Result<Vec<GoalTransaction>> {
        Ok(self
            .tables()
            .goal_transactions
            .iter()
            .filter(|t| t.goal_id == goal_id)
            .cloned()
            .collect())
    }
}
