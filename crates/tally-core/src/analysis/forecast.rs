//! Next-month spending forecast
//!
//! A simple moving average: each category's monthly totals over the lookback
//! window are averaged, counting only months in which the category had
//! spending.

use std::collections::BTreeMap;

use chrono::{Duration, NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

use super::percentage;
use crate::dates::start_of_day;
use crate::ledger::LedgerView;
use crate::models::{CategorySpending, ForecastData};

/// Forecast label reported with every result
pub const NEXT_MONTH: &str = "next_month";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ForecastConfig {
    /// Days of history considered
    pub lookback_days: i64,
    /// Months reported as the basis of the forecast
    pub based_on_months: u32,
    /// Confidence reported when any category has data
    pub confidence: f64,
}

impl Default for ForecastConfig {
    fn default() -> Self {
        Self {
            lookback_days: 90,
            based_on_months: 3,
            confidence: 0.7,
        }
    }
}

pub fn forecast_next_month(
    view: &LedgerView,
    config: &ForecastConfig,
    now: NaiveDateTime,
) -> ForecastData {
    // A lookback reaching past the calendar covers all history
    let cutoff = Duration::try_days(config.lookback_days)
        .and_then(|lookback| now.checked_sub_signed(lookback))
        .unwrap_or(NaiveDateTime::MIN);
    let is_recent = |date: NaiveDate| start_of_day(date) >= cutoff;

    let has_recent_rows = view
        .rows()
        .iter()
        .filter_map(|row| row.parsed_date())
        .any(is_recent);
    if !has_recent_rows {
        return ForecastData {
            period: NEXT_MONTH.to_string(),
            forecasts: Vec::new(),
            total_forecast: 0.0,
            confidence: 0.0,
            based_on_months: 0,
        };
    }

    // category -> month -> total
    let mut monthly: BTreeMap<String, BTreeMap<String, f64>> = BTreeMap::new();
    for entry in view.spending().filter(|e| is_recent(e.date)) {
        *monthly
            .entry(entry.category().to_string())
            .or_default()
            .entry(entry.date.format("%Y-%m").to_string())
            .or_default() += entry.amount;
    }

    let mut forecasts: Vec<CategorySpending> = monthly
        .into_iter()
        .map(|(category, months)| {
            let count = months.len();
            let average = months.values().sum::<f64>() / count as f64;
            CategorySpending {
                category,
                total: average,
                percentage: 0.0,
                count,
                average,
            }
        })
        .collect();

    let total_forecast: f64 = forecasts.iter().map(|f| f.total).sum();
    for forecast in &mut forecasts {
        forecast.percentage = percentage(forecast.total, total_forecast);
    }
    forecasts.sort_by(|a, b| b.total.total_cmp(&a.total));

    let confidence = if forecasts.is_empty() {
        0.0
    } else {
        config.confidence
    };

    ForecastData {
        period: NEXT_MONTH.to_string(),
        forecasts,
        total_forecast,
        confidence,
        based_on_months: config.based_on_months,
    }
}
