//! Category-level spending analysis

use std::collections::HashMap;

use super::percentage;
use crate::ledger::{Entry, LedgerView};
use crate::models::{CategoryAnalysis, CategorySpending};
use crate::period::DateRange;

/// Reported as `top_category` when nothing was spent
pub const NO_CATEGORY: &str = "None";

/// Builder for the rows included in a category analysis
///
/// ```rust,ignore
/// let filter = SpendingFilter::new()
///     .range(DateFilter::LastMonth.range(None, None, now))
///     .categories(vec!["Dining".into()])
///     .min_amount(Some(5.0));
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SpendingFilter {
    pub range: DateRange,
    /// Allowed category labels; empty allows all
    pub categories: Vec<String>,
    pub min_amount: Option<f64>,
    pub max_amount: Option<f64>,
}

impl SpendingFilter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the date range
    pub fn range(mut self, range: DateRange) -> Self {
        self.range = range;
        self
    }

    /// Restrict to these category labels (compared case-insensitively)
    pub fn categories(mut self, categories: Vec<String>) -> Self {
        self.categories = categories;
        self
    }

    /// Set the minimum line total (inclusive)
    pub fn min_amount(mut self, amount: Option<f64>) -> Self {
        self.min_amount = amount;
        self
    }

    /// Set the maximum line total (inclusive)
    pub fn max_amount(mut self, amount: Option<f64>) -> Self {
        self.max_amount = amount;
        self
    }

    pub fn matches(&self, entry: &Entry<'_>) -> bool {
        if !self.range.contains_date(entry.date) {
            return false;
        }
        if !self.categories.is_empty()
            && !self
                .categories
                .iter()
                .any(|c| c.trim().eq_ignore_ascii_case(entry.category()))
        {
            return false;
        }
        if self.min_amount.is_some_and(|min| entry.amount < min) {
            return false;
        }
        if self.max_amount.is_some_and(|max| entry.amount > max) {
            return false;
        }
        true
    }
}

/// Totals, counts and shares per category for the filtered rows
///
/// Categories are sorted by total, largest first. `period` is echoed back as
/// given.
pub fn category_analysis(view: &LedgerView, filter: &SpendingFilter, period: &str) -> CategoryAnalysis {
    // category -> (total, count), plus first-seen order for stable ties
    let mut totals: HashMap<&str, (f64, usize)> = HashMap::new();
    let mut order: Vec<&str> = Vec::new();
    let mut total_spending = 0.0;

    for entry in view.spending().filter(|e| filter.matches(e)) {
        let category = entry.category();
        let slot = totals.entry(category).or_insert_with(|| {
            order.push(category);
            (0.0, 0)
        });
        slot.0 += entry.amount;
        slot.1 += 1;
        total_spending += entry.amount;
    }

    let mut categories: Vec<CategorySpending> = order
        .into_iter()
        .map(|category| {
            let (total, count) = totals[category];
            CategorySpending {
                category: category.to_string(),
                total,
                percentage: percentage(total, total_spending),
                count,
                average: total / count as f64,
            }
        })
        .collect();
    categories.sort_by(|a, b| b.total.total_cmp(&a.total));

    let top_category = categories
        .first()
        .map(|c| c.category.clone())
        .unwrap_or_else(|| NO_CATEGORY.to_string());

    CategoryAnalysis {
        categories,
        total_spending,
        top_category,
        period: period.to_string(),
    }
}
