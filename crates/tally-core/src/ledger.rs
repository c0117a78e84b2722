//! Read-only snapshot of the flat ledger
//!
//! Every engine call reads the store once and works on a [`LedgerView`].
//! Rows with unparseable cells are skipped row by row, never failing the call.

use chrono::NaiveDate;
use tracing::debug;

use crate::category::{normalize_category, same_category};
use crate::models::LedgerRow;
use crate::period::DateRange;

/// Category used for rows whose category cell is blank
pub const FALLBACK_CATEGORY: &str = "Other";

/// A ledger row with its date and line total parsed
#[derive(Debug, Clone, Copy)]
pub struct Entry<'a> {
    pub date: NaiveDate,
    pub amount: f64,
    pub row: &'a LedgerRow,
}

impl<'a> Entry<'a> {
    /// Category label, falling back to "Other" when blank
    pub fn category(&self) -> &'a str {
        let category = self.row.category.trim();
        if category.is_empty() {
            FALLBACK_CATEGORY
        } else {
            category
        }
    }
}

/// Immutable snapshot of ledger rows in insertion order
#[derive(Debug, Clone, Default)]
pub struct LedgerView {
    rows: Vec<LedgerRow>,
}

impl LedgerView {
    pub fn new(rows: Vec<LedgerRow>) -> Self {
        Self { rows }
    }

    pub fn rows(&self) -> &[LedgerRow] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Rows whose date and line total both parse
    pub fn entries(&self) -> impl Iterator<Item = Entry<'_>> {
        self.rows.iter().enumerate().filter_map(|(index, row)| {
            let Some(date) = row.parsed_date() else {
                debug!(index, date = %row.date, "Skipping ledger row with unparseable date");
                return None;
            };
            let Some(amount) = row.total_price_value() else {
                debug!(index, total = %row.total_price, "Skipping ledger row with unparseable total");
                return None;
            };
            Some(Entry { date, amount, row })
        })
    }

    /// Entries with a strictly positive line total
    pub fn spending(&self) -> impl Iterator<Item = Entry<'_>> {
        self.entries().filter(|entry| entry.amount > 0.0)
    }

    /// Entries inside a date range
    pub fn entries_in(&self, range: DateRange) -> impl Iterator<Item = Entry<'_>> {
        self.entries()
            .filter(move |entry| range.contains_date(entry.date))
    }

    /// Entries whose category normalizes to the same label as `category`
    pub fn entries_for_category<'a>(
        &'a self,
        category: &'a str,
    ) -> impl Iterator<Item = Entry<'a>> + 'a {
        let target = normalize_category(category);
        self.entries()
            .filter(move |entry| normalize_category(&entry.row.category) == target)
    }

    /// Sum of line totals for a category within a range
    ///
    /// Categories are compared after normalization, so a "Grocery" budget
    /// picks up "Groceries" rows.
    pub fn category_total(&self, category: &str, range: DateRange) -> f64 {
        self.entries()
            .filter(|entry| same_category(&entry.row.category, category))
            .filter(|entry| range.contains_date(entry.date))
            .map(|entry| entry.amount)
            .sum()
    }
}

impl From<Vec<LedgerRow>> for LedgerView {
    fn from(rows: Vec<LedgerRow>) -> Self {
        Self::new(rows)
    }
}
