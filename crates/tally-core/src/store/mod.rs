//! Storage traits and implementations
//!
//! The engine reads and writes through these traits only:
//! - [`LedgerStore`] - append-only line item rows, insertion order preserved
//! - [`BudgetStore`], [`GoalStore`], [`GoalTransactionStore`] - flat records
//!   keyed by an opaque string id
//!
//! Two implementations ship with the crate:
//! - [`MemoryStore`] - `Vec`-backed, for tests and embedding
//! - [`Database`] - SQLite with pooled connections

mod memory;
mod sqlite;

pub use memory::MemoryStore;
pub use sqlite::{Database, DbConn, DbPool};

use crate::error::Result;
use crate::models::{Budget, Goal, GoalTransaction, LedgerRow};

/// Prefixes for generated record ids
pub const BUDGET_ID_PREFIX: &str = "budget";
pub const GOAL_ID_PREFIX: &str = "goal";
pub const GOAL_TRANSACTION_ID_PREFIX: &str = "txn";

/// Generate a record id such as `budget_4f0c...`
pub fn new_id(prefix: &str) -> String {
    format!("{}_{}", prefix, uuid::Uuid::new_v4().simple())
}

/// Flat ledger of line item rows
pub trait LedgerStore {
    /// Every row, in insertion order
    fn read_all(&self) -> Result<Vec<LedgerRow>>;

    /// Append rows after the existing ones
    fn append(&self, rows: &[LedgerRow]) -> Result<()>;

    /// Position of the first row matching `predicate`
    fn find_row_index(&self, predicate: &dyn Fn(&LedgerRow) -> bool) -> Result<Option<usize>> {
        Ok(self.read_all()?.iter().position(|row| predicate(row)))
    }

    /// Replace the row at `index`
    fn update_row(&self, index: usize, row: &LedgerRow) -> Result<()>;

    /// Remove the row at `index`, shifting later rows down
    fn delete_row(&self, index: usize) -> Result<()>;
}

pub trait BudgetStore {
    fn list_budgets(&self) -> Result<Vec<Budget>>;

    fn get_budget(&self, id: &str) -> Result<Option<Budget>>;

    /// Insert or replace by id, generating one when absent. Returns the id.
    fn save_budget(&self, budget: &Budget) -> Result<String>;

    /// Returns false when no budget had this id
    fn delete_budget(&self, id: &str) -> Result<bool>;
}

pub trait GoalStore {
    fn list_goals(&self) -> Result<Vec<Goal>>;

    fn get_goal(&self, id: &str) -> Result<Option<Goal>>;

    /// Insert or replace by id, generating one when absent. Returns the id.
    fn save_goal(&self, goal: &Goal) -> Result<String>;

    /// Returns false when no goal had this id
    fn delete_goal(&self, id: &str) -> Result<bool>;
}

pub trait GoalTransactionStore {
    /// Record a transaction, generating an id when absent. Returns the id.
    fn add_goal_transaction(&self, transaction: &GoalTransaction) -> Result<String>;

    /// Transactions for one goal, oldest first
    fn goal_transactions(&self, goal_id: &str) -> Result<Vec<GoalTransaction>>;
}

/// Everything the reconciler needs from storage
pub trait Store: LedgerStore + BudgetStore + GoalStore + GoalTransactionStore {}

impl<T> Store for T where T: LedgerStore + BudgetStore + GoalStore + GoalTransactionStore {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_id_prefix_and_uniqueness() {
        let a = new_id(BUDGET_ID_PREFIX);
        let b = new_id(BUDGET_ID_PREFIX);
        assert!(a.starts_with("budget_"));
        assert_eq!(a.len(), "budget_".len() + 32);
        assert_ne!(a, b);
    }
}
