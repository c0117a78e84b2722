//! Spending trends by month or week

use std::collections::BTreeMap;

use chrono::NaiveDate;

use crate::ledger::LedgerView;
use crate::models::{Granularity, TimeSeriesPoint, TrendData};
use crate::period::DateRange;

/// Bucket key for a date: `YYYY-MM`, or `YYYY-Www` with weeks starting on Sunday
pub fn period_key(date: NaiveDate, granularity: Granularity) -> String {
    match granularity {
        Granularity::Monthly => date.format("%Y-%m").to_string(),
        Granularity::Weekly => date.format("%Y-W%U").to_string(),
    }
}

/// Per-category and total spending series inside `range`
///
/// Only positive line totals count. Series are ordered by period key and
/// categories alphabetically.
pub fn spending_trends(view: &LedgerView, granularity: Granularity, range: DateRange) -> TrendData {
    let mut by_category: BTreeMap<String, BTreeMap<String, f64>> = BTreeMap::new();
    let mut totals: BTreeMap<String, f64> = BTreeMap::new();

    for entry in view.entries_in(range).filter(|e| e.amount > 0.0) {
        let key = period_key(entry.date, granularity);
        *by_category
            .entry(entry.category().to_string())
            .or_default()
            .entry(key.clone())
            .or_default() += entry.amount;
        *totals.entry(key).or_default() += entry.amount;
    }

    let data: BTreeMap<String, Vec<TimeSeriesPoint>> = by_category
        .into_iter()
        .map(|(category, series)| {
            let points = series
                .into_iter()
                .map(|(date, amount)| TimeSeriesPoint {
                    date,
                    amount,
                    category: Some(category.clone()),
                })
                .collect();
            (category, points)
        })
        .collect();

    TrendData {
        period: granularity,
        categories: data.keys().cloned().collect(),
        data,
        total_by_period: totals
            .into_iter()
            .map(|(date, amount)| TimeSeriesPoint {
                date,
                amount,
                category: None,
            })
            .collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::LedgerRow;

    fn row(date: &str, category: &str, total: &str) -> LedgerRow {
        LedgerRow {
            date: date.to_string(),
            category: category.to_string(),
            total_price: total.to_string(),
            ..Default::default()
        }
    }

    #[test]
    fn test_monthly_sums() {
        let view = LedgerView::new(vec![
            row("15-01-2025", "Dining", "10"),
            row("20-01-2025", "Dining", "20"),
        ]);
        let trends = spending_trends(&view, Granularity::Monthly, DateRange::unbounded());
        assert_eq!(trends.categories, vec!["Dining"]);
        assert_eq!(trends.total_by_period.len(), 1);
        assert_eq!(trends.total_by_period[0].date, "2025-01");
        assert_eq!(trends.total_by_period[0].amount, 30.0);
        assert_eq!(trends.data["Dining"][0].category.as_deref(), Some("Dining"));
    }

    #[test]
    fn test_weekly_keys_sunday_start() {
        // 2025-01-04 is a Saturday, 2025-01-05 a Sunday
        let saturday = NaiveDate::from_ymd_opt(2025, 1, 4).unwrap();
        let sunday = NaiveDate::from_ymd_opt(2025, 1, 5).unwrap();
        assert_eq!(period_key(saturday, Granularity::Weekly), "2025-W00");
        assert_eq!(period_key(sunday, Granularity::Weekly), "2025-W01");
    }

    #[test]
    fn test_skips_refunds_and_bad_cells() {
        let view = LedgerView::new(vec![
            row("15-01-2025", "Dining", "-5"),
            row("15-01-2025", "Dining", ""),
            row("bad", "Dining", "5"),
            row("15-02-2025", "Transport", "7"),
        ]);
        let trends = spending_trends(&view, Granularity::Monthly, DateRange::unbounded());
        assert_eq!(trends.categories, vec!["Transport"]);
        assert_eq!(trends.total_by_period[0].date, "2025-02");
    }

    #[test]
    fn test_sorted_series_and_categories() {
        let view = LedgerView::new(vec![
            row("01-03-2025", "Zoo", "1"),
            row("01-01-2025", "Art", "2"),
            row("01-02-2025", "Art", "3"),
        ]);
        let trends = spending_trends(&view, Granularity::Monthly, DateRange::unbounded());
        assert_eq!(trends.categories, vec!["Art", "Zoo"]);
        let keys: Vec<&str> = trends.total_by_period.iter().map(|p| p.date.as_str()).collect();
        assert_eq!(keys, vec!["2025-01", "2025-02", "2025-03"]);
    }

    #[test]
    fn test_empty_ledger() {
        let trends = spending_trends(&LedgerView::default(), Granularity::Weekly, DateRange::unbounded());
        assert!(trends.categories.is_empty());
        assert!(trends.data.is_empty());
        assert!(trends.total_by_period.is_empty());
        assert_eq!(trends.period, Granularity::Weekly);
    }
}
