//! SQLite store with connection pooling and migrations

use r2d2::{Pool, PooledConnection};
use r2d2_sqlite::SqliteConnectionManager;
use rusqlite::{params, OptionalExtension};
use tracing::debug;

use super::{
    new_id, BudgetStore, GoalStore, GoalTransactionStore, LedgerStore, BUDGET_ID_PREFIX,
    GOAL_ID_PREFIX, GOAL_TRANSACTION_ID_PREFIX,
};
use crate::error::{Error, Result};
use crate::models::{Budget, Goal, GoalTransaction, GoalTransactionType, LedgerRow};

pub type DbPool = Pool<SqliteConnectionManager>;
pub type DbConn = PooledConnection<SqliteConnectionManager>;

const LEDGER_COLUMNS: &str = "date, merchant, address, item, category, quantity, unit_price, \
     total_price, tax, grand_total, payment";

/// Database wrapper with connection pooling
#[derive(Clone)]
pub struct Database {
    pool: DbPool,
    /// Path to the database file
    db_path: String,
}

impl std::fmt::Debug for Database {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Database")
            .field("db_path", &self.db_path)
            .finish()
    }
}

impl Database {
    /// Open (or create) a database file and run migrations
    pub fn new(path: &str) -> Result<Self> {
        let manager = SqliteConnectionManager::file(path);
        let pool = Pool::builder().max_size(10).build(manager)?;

        let db = Self {
            pool,
            db_path: path.to_string(),
        };
        db.run_migrations()?;

        Ok(db)
    }

    /// Get the path to the database file
    pub fn path(&self) -> &str {
        &self.db_path
    }

    /// Create a throwaway database (for testing)
    ///
    /// Uses a temporary file rather than `:memory:` so every pooled
    /// connection sees the same data.
    pub fn in_memory() -> Result<Self> {
        use std::sync::atomic::{AtomicU64, Ordering};
        static COUNTER: AtomicU64 = AtomicU64::new(0);

        let id = COUNTER.fetch_add(1, Ordering::SeqCst);
        let path = std::env::temp_dir().join(format!(
            "tally_test_{}_{}.db",
            std::process::id(),
            id
        ));

        // Remove any existing file
        let _ = std::fs::remove_file(&path);

        let path = path
            .to_str()
            .ok_or_else(|| Error::InvalidData("Temp path is not valid UTF-8".to_string()))?
            .to_string();
        Self::new(&path)
    }

    /// Get a connection from the pool
    pub fn conn(&self) -> Result<DbConn> {
        Ok(self.pool.get()?)
    }

    /// Run database migrations
    fn run_migrations(&self) -> Result<()> {
        let conn = self.conn()?;

        conn.execute_batch(
            r#"
            -- WAL mode: readers don't block writers
            PRAGMA journal_mode = WAL;
            PRAGMA synchronous = NORMAL;

            -- Ledger rows (one per receipt line item, append order = id order)
            -- Cells are stored as written so malformed values survive a round trip
            CREATE TABLE IF NOT EXISTS ledger_rows (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                date TEXT NOT NULL DEFAULT '',
                merchant TEXT NOT NULL DEFAULT '',
                address TEXT NOT NULL DEFAULT '',
                item TEXT NOT NULL DEFAULT '',
                category TEXT NOT NULL DEFAULT '',
                quantity TEXT NOT NULL DEFAULT '',
                unit_price TEXT NOT NULL DEFAULT '',
                total_price TEXT NOT NULL DEFAULT '',
                tax TEXT NOT NULL DEFAULT '',
                grand_total TEXT NOT NULL DEFAULT '',
                payment TEXT NOT NULL DEFAULT '',
                created_at DATETIME DEFAULT CURRENT_TIMESTAMP
            );

            CREATE INDEX IF NOT EXISTS idx_ledger_rows_merchant ON ledger_rows(merchant);

            -- Budgets
            CREATE TABLE IF NOT EXISTS budgets (
                id TEXT PRIMARY KEY,
                category TEXT NOT NULL,
                limit_amount REAL NOT NULL,
                period TEXT NOT NULL DEFAULT 'monthly',           -- monthly, weekly
                period_type TEXT NOT NULL DEFAULT 'calendar_month', -- rolling, calendar_month, calendar_week, custom
                start_date TEXT,
                end_date TEXT,
                created_at DATETIME DEFAULT CURRENT_TIMESTAMP
            );

            -- Goals
            CREATE TABLE IF NOT EXISTS goals (
                id TEXT PRIMARY KEY,
                name TEXT NOT NULL,
                target_amount REAL NOT NULL,
                current_amount REAL NOT NULL DEFAULT 0,
                target_date TEXT NOT NULL,
                category TEXT,
                goal_type TEXT NOT NULL DEFAULT 'savings',      -- savings, spending_limit
                auto_track BOOLEAN NOT NULL DEFAULT 0,
                created_at DATETIME DEFAULT CURRENT_TIMESTAMP
            );

            -- Manual deposits and withdrawals against goals
            CREATE TABLE IF NOT EXISTS goal_transactions (
                id TEXT PRIMARY KEY,
                goal_id TEXT NOT NULL,
                amount REAL NOT NULL,
                transaction_type TEXT NOT NULL,                 -- deposit, withdrawal
                date TEXT NOT NULL,
                note TEXT,
                created_at DATETIME DEFAULT CURRENT_TIMESTAMP
            );

            CREATE INDEX IF NOT EXISTS idx_goal_transactions_goal ON goal_transactions(goal_id);
            "#,
        )?;

        debug!(path = %self.db_path, "Migrations applied");
        Ok(())
    }

    /// Row id of the ledger row at a zero-based position
    fn ledger_row_id(&self, conn: &DbConn, index: usize) -> Result<i64> {
        conn.query_row(
            "SELECT id FROM ledger_rows ORDER BY id LIMIT 1 OFFSET ?",
            params![index as i64],
            |row| row.get(0),
        )
        .optional()?
        .ok_or_else(|| Error::NotFound(format!("Ledger row {}", index)))
    }
}

fn ledger_row_from(row: &rusqlite::Row<'_>) -> rusqlite::Result<LedgerRow> {
    Ok(LedgerRow {
        date: row.get(0)?,
        merchant: row.get(1)?,
        address: row.get(2)?,
        item: row.get(3)?,
        category: row.get(4)?,
        quantity: row.get(5)?,
        unit_price: row.get(6)?,
        total_price: row.get(7)?,
        tax: row.get(8)?,
        grand_total: row.get(9)?,
        payment: row.get(10)?,
    })
}

impl LedgerStore for Database {
    fn read_all(&self) -> Result<Vec<LedgerRow>> {
        let conn = self.conn()?;
        let mut stmt = conn.prepare(&format!(
            "SELECT {} FROM ledger_rows ORDER BY id",
            LEDGER_COLUMNS
        ))?;
        let rows = stmt
            .query_map([], ledger_row_from)?
            .collect::<std::result::Result<Vec<_>, _>>()?;
        Ok(rows)
    }

    fn append(&self, rows: &[LedgerRow]) -> Result<()> {
        let mut conn = self.conn()?;
        let tx = conn.transaction()?;
        {
            let mut stmt = tx.prepare(&format!(
                "INSERT INTO ledger_rows ({}) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)",
                LEDGER_COLUMNS
            ))?;
            for row in rows {
                stmt.execute(params![
                    row.date,
                    row.merchant,
                    row.address,
                    row.item,
                    row.category,
                    row.quantity,
                    row.unit_price,
                    row.total_price,
                    row.tax,
                    row.grand_total,
                    row.payment,
                ])?;
            }
        }
        tx.commit()?;
        debug!(count = rows.len(), "Appended ledger rows");
        Ok(())
    }

    fn update_row(&self, index: usize, row: &LedgerRow) -> Result<()> {
        let conn = self.conn()?;
        let id = self.ledger_row_id(&conn, index)?;
        conn.execute(
            r#"
            UPDATE ledger_rows
            SET date = ?, merchant = ?, address = ?, item = ?, category = ?, quantity = ?,
                unit_price = ?, total_price = ?, tax = ?, grand_total = ?, payment = ?
            WHERE id = ?
            "#,
            params![
                row.date,
                row.merchant,
                row.address,
                row.item,
                row.category,
                row.quantity,
                row.unit_price,
                row.total_price,
                row.tax,
                row.grand_total,
                row.payment,
                id,
            ],
        )?;
        Ok(())
    }

    fn delete_row(&self, index: usize) -> Result<()> {
        let conn = self.conn()?;
        let id = self.ledger_row_id(&conn, index)?;
        conn.execute("DELETE FROM ledger_rows WHERE id = ?", params![id])?;
        Ok(())
    }
}

fn budget_from(row: &rusqlite::Row<'_>) -> rusqlite::Result<Budget> {
    let period: String = row.get(3)?;
    let period_type: String = row.get(4)?;
    Ok(Budget {
        id: row.get(0)?,
        category: row.get(1)?,
        limit: row.get(2)?,
        period: period.parse().unwrap_or_default(),
        period_type: period_type.parse().unwrap_or_default(),
        start_date: row.get(5)?,
        end_date: row.get(6)?,
    })
}

impl BudgetStore for Database {
    fn list_budgets(&self) -> Result<Vec<Budget>> {
        let conn = self.conn()?;
        let mut stmt = conn.prepare(
            r#"
            SELECT id, category, limit_amount, period, period_type, start_date, end_date
            FROM budgets
            ORDER BY rowid
            "#,
        )?;
        let budgets = stmt
            .query_map([], budget_from)?
            .collect::<std::result::Result<Vec<_>, _>>()?;
        Ok(budgets)
    }

    fn get_budget(&self, id: &str) -> Result<Option<Budget>> {
        let conn = self.conn()?;
        let budget = conn
            .query_row(
                r#"
                SELECT id, category, limit_amount, period, period_type, start_date, end_date
                FROM budgets
                WHERE id = ?
                "#,
                params![id],
                budget_from,
            )
            .optional()?;
        Ok(budget)
    }

    fn save_budget(&self, budget: &Budget) -> Result<String> {
        let id = budget
            .id
            .clone()
            .unwrap_or_else(|| new_id(BUDGET_ID_PREFIX));
        let conn = self.conn()?;
        conn.execute(
            r#"
            INSERT INTO budgets (id, category, limit_amount, period, period_type, start_date, end_date)
            VALUES (?, ?, ?, ?, ?, ?, ?)
            ON CONFLICT(id) DO UPDATE SET
                category = excluded.category,
                limit_amount = excluded.limit_amount,
                period = excluded.period,
                period_type = excluded.period_type,
                start_date = excluded.start_date,
                end_date = excluded.end_date
            "#,
            params![
                id,
                budget.category,
                budget.limit,
                budget.period.as_str(),
                budget.period_type.as_str(),
                budget.start_date,
                budget.end_date,
            ],
        )?;
        Ok(id)
    }

    fn delete_budget(&self, id: &str) -> Result<bool> {
        let conn = self.conn()?;
        let deleted = conn.execute("DELETE FROM budgets WHERE id = ?", params![id])?;
        Ok(deleted > 0)
    }
}

fn goal_from(row: &rusqlite::Row<'_>) -> rusqlite::Result<Goal> {
    let goal_type: String = row.get(6)?;
    Ok(Goal {
        id: row.get(0)?,
        name: row.get(1)?,
        target_amount: row.get(2)?,
        current_amount: row.get(3)?,
        target_date: row.get(4)?,
        category: row.get(5)?,
        goal_type: goal_type.parse().unwrap_or_default(),
        auto_track: row.get(7)?,
    })
}

impl GoalStore for Database {
    fn list_goals(&self) -> Result<Vec<Goal>> {
        let conn = self.conn()?;
        let mut stmt = conn.prepare(
            r#"
            SELECT id, name, target_amount, current_amount, target_date, category, goal_type, auto_track
            FROM goals
            ORDER BY rowid
            "#,
        )?;
        let goals = stmt
            .query_map([], goal_from)?
            .collect::<std::result::Result<Vec<_>, _>>()?;
        Ok(goals)
    }

    fn get_goal(&self, id: &str) -> Result<Option<Goal>> {
        let conn = self.conn()?;
        let goal = conn
            .query_row(
                r#"
                SELECT id, name, target_amount, current_amount, target_date, category, goal_type, auto_track
                FROM goals
                WHERE id = ?
                "#,
                params![id],
                goal_from,
            )
            .optional()?;
        Ok(goal)
    }

    fn save_goal(&self, goal: &Goal) -> Result<String> {
        let id = goal.id.clone().unwrap_or_else(|| new_id(GOAL_ID_PREFIX));
        let conn = self.conn()?;
        conn.execute(
            r#"
            INSERT INTO goals (id, name, target_amount, current_amount, target_date, category, goal_type, auto_track)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?)
            ON CONFLICT(id) DO UPDATE SET
                name = excluded.name,
                target_amount = excluded.target_amount,
                current_amount = excluded.current_amount,
                target_date = excluded.target_date,
                category = excluded.category,
                goal_type = excluded.goal_type,
                auto_track = excluded.auto_track
            "#,
            params![
                id,
                goal.name,
                goal.target_amount,
                goal.current_amount,
                goal.target_date,
                goal.category,
                goal.goal_type.as_str(),
                goal.auto_track,
            ],
        )?;
        Ok(id)
    }

    fn delete_goal(&self, id: &str) -> Result<bool> {
        let conn = self.conn()?;
        let deleted = conn.execute("DELETE FROM goals WHERE id = ?", params![id])?;
        Ok(deleted > 0)
    }
}

impl GoalTransactionStore for Database {
    fn add_goal_transaction(&self, transaction: &GoalTransaction) -> Result<String> {
        let id = transaction
            .id
            .clone()
            .unwrap_or_else(|| new_id(GOAL_TRANSACTION_ID_PREFIX));
        let conn = self.conn()?;
        conn.execute(
            r#"
            INSERT INTO goal_transactions (id, goal_id, amount, transaction_type, date, note)
            VALUES (?, ?, ?, ?, ?, ?)
            "#,
            params![
                id,
                transaction.goal_id,
                transaction.amount,
                transaction.transaction_type.as_str(),
                transaction.date,
                transaction.note,
            ],
        )?;
        Ok(id)
    }

    fn goal_transactions(&self, goal_id: &str) -> Result<Vec<GoalTransaction>> {
        let conn = self.conn()?;
        let mut stmt = conn.prepare(
            r#"
            SELECT id, goal_id, amount, transaction_type, date, note
            FROM goal_transactions
            WHERE goal_id = ?
            ORDER BY rowid
            "#,
        )?;
        let transactions = stmt
            .query_map(params![goal_id], |row| {
                let kind: String = row.get(3)?;
                Ok(GoalTransaction {
                    id: row.get(0)?,
                    goal_id: row.get(1)?,
                    amount: row.get(2)?,
                    transaction_type: match kind.as_str() {
                        "withdrawal" => GoalTransactionType::Withdrawal,
                        _ => GoalTransactionType::Deposit,
                    },
                    date: row.get(4)?,
                    note: row.get(5)?,
                })
            })?
            .collect::<std::result::Result<Vec<_>, _>>()?;
        Ok(transactions)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{BudgetPeriod, GoalType, PeriodType};

    fn row(item: &str, total: &str) -> LedgerRow {
        LedgerRow {
            date: "01-03-2025".to_string(),
            merchant: "Aldi".to_string(),
            item: item.to_string(),
            category: "Groceries".to_string(),
            total_price: total.to_string(),
            grand_total: "9".to_string(),
            ..Default::default()
        }
    }

    #[test]
    fn test_ledger_round_trip_preserves_order_and_cells() {
        let db = Database::in_memory().unwrap();
        db.append(&[row("Milk", "2"), row("Bread", "not a number")]).unwrap();
        db.append(&[row("Eggs", "4")]).unwrap();

        let rows = db.read_all().unwrap();
        assert_eq!(rows.len(), 3);
        assert_eq!(rows[0].item, "Milk");
        assert_eq!(rows[1].total_price, "not a number");
        assert_eq!(rows[2].item, "Eggs");
    }

    #[test]
    fn test_ledger_update_and_delete_by_position() {
        let db = Database::in_memory().unwrap();
        db.append(&[row("a", "1"), row("b", "2"), row("c", "3")]).unwrap();

        let index = db.find_row_index(&|r: &LedgerRow| r.item == "b").unwrap();
        assert_eq!(index, Some(1));

        db.update_row(1, &row("B", "20")).unwrap();
        db.delete_row(0).unwrap();

        let items: Vec<String> = db.read_all().unwrap().into_iter().map(|r| r.item).collect();
        assert_eq!(items, vec!["B", "c"]);
        assert!(matches!(db.delete_row(7), Err(Error::NotFound(_))));
    }

    #[test]
    fn test_budget_crud() {
        let db = Database::in_memory().unwrap();
        let mut budget = Budget::new("Dining", 200.0);
        budget.period = BudgetPeriod::Weekly;
        budget.period_type = PeriodType::Custom;
        budget.start_date = Some("2025-01-01".to_string());
        budget.end_date = Some("2025-01-31".to_string());

        let id = db.save_budget(&budget).unwrap();
        assert!(id.starts_with("budget_"));

        let stored = db.get_budget(&id).unwrap().unwrap();
        assert_eq!(stored.period, BudgetPeriod::Weekly);
        assert_eq!(stored.period_type, PeriodType::Custom);
        assert_eq!(stored.end_date.as_deref(), Some("2025-01-31"));

        let mut updated = stored.clone();
        updated.limit = 250.0;
        db.save_budget(&updated).unwrap();
        let budgets = db.list_budgets().unwrap();
        assert_eq!(budgets.len(), 1);
        assert_eq!(budgets[0].limit, 250.0);

        assert!(db.delete_budget(&id).unwrap());
        assert!(db.get_budget(&id).unwrap().is_none());
    }

    #[test]
    fn test_goal_and_transactions() {
        let db = Database::in_memory().unwrap();
        let goal = Goal {
            id: Some("goal_fixed".to_string()),
            name: "Bike".to_string(),
            target_amount: 500.0,
            current_amount: 0.0,
            target_date: "2025-09-01".to_string(),
            category: Some("Transport".to_string()),
            goal_type: GoalType::SpendingLimit,
            auto_track: true,
        };
        assert_eq!(db.save_goal(&goal).unwrap(), "goal_fixed");
        assert_eq!(db.get_goal("goal_fixed").unwrap().unwrap(), goal);

        for (amount, kind) in [
            (100.0, GoalTransactionType::Deposit),
            (25.0, GoalTransactionType::Withdrawal),
        ] {
            db.add_goal_transaction(&GoalTransaction {
                id: None,
                goal_id: "goal_fixed".to_string(),
                amount,
                transaction_type: kind,
                date: "2025-02-01".to_string(),
                note: None,
            })
            .unwrap();
        }

        let txns = db.goal_transactions("goal_fixed").unwrap();
        assert_eq!(txns.len(), 2);
        assert_eq!(txns[1].transaction_type, GoalTransactionType::Withdrawal);

        assert!(db.delete_goal("goal_fixed").unwrap());
        assert!(!db.delete_goal("goal_fixed").unwrap());
    }

    #[test]
    fn test_reopen_keeps_data() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("tally.db");
        let path = path.to_str().unwrap();

        Database::new(path).unwrap().append(&[row("Milk", "2")]).unwrap();
        let reopened = Database::new(path).unwrap();
        assert_eq!(reopened.read_all().unwrap().len(), 1);
        assert_eq!(reopened.path(), path);
    }
}
