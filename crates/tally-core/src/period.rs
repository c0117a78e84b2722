//! Period resolution: turning a windowing policy into concrete dates
//!
//! Two families of windows are resolved here:
//! - budget periods ([`resolve_budget_period`]): a [`PeriodType`] plus the
//!   legacy [`BudgetPeriod`], with display and reset labels
//! - report date filters ([`DateFilter`]): named shortcuts such as
//!   `this_month` or `last_90` used by trends and category analysis
//!
//! All bounds are inclusive. Ledger rows carry dates only, so a row is tested
//! at midnight of its date.

use chrono::{Datelike, Duration, NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

use crate::dates::{end_of_day, long_label, parse_param_date, short_label, start_of_day};
use crate::models::{BudgetPeriod, PeriodType};

/// Inclusive window between two instants
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PeriodWindow {
    pub start: NaiveDateTime,
    pub end: NaiveDateTime,
}

impl PeriodWindow {
    pub fn contains(&self, instant: NaiveDateTime) -> bool {
        self.start <= instant && instant <= self.end
    }

    /// Whether a ledger date (taken at midnight) falls in the window
    pub fn contains_date(&self, date: NaiveDate) -> bool {
        self.contains(start_of_day(date))
    }
}

/// A budget window with its human-readable labels
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResolvedPeriod {
    pub window: PeriodWindow,
    /// e.g. "Dec 01 - Dec 31, 2024"
    pub display: String,
    /// Next reset date, "Daily" or "Does not reset"
    pub resets_on: String,
}

/// First day of the month containing `date`
pub fn first_of_month(date: NaiveDate) -> NaiveDate {
    date.with_day(1).unwrap_or(date)
}

/// First day of the month after the one containing `date`
pub fn first_of_next_month(date: NaiveDate) -> NaiveDate {
    let (year, month) = if date.month() == 12 {
        (date.year() + 1, 1)
    } else {
        (date.year(), date.month() + 1)
    };
    NaiveDate::from_ymd_opt(year, month, 1).unwrap_or(date)
}

/// Last day of the month containing `date`
pub fn last_of_month(date: NaiveDate) -> NaiveDate {
    first_of_next_month(date)
        .pred_opt()
        .unwrap_or(date)
}

/// Monday of the week containing `date`
pub fn monday_of_week(date: NaiveDate) -> NaiveDate {
    date - Duration::days(date.weekday().num_days_from_monday() as i64)
}

/// Window of the calendar month containing `now`
pub fn calendar_month_window(now: NaiveDateTime) -> PeriodWindow {
    let today = now.date();
    PeriodWindow {
        start: start_of_day(first_of_month(today)),
        end: end_of_day(last_of_month(today)),
    }
}

/// Resolve a budget's spending window and labels
///
/// | period_type    | window                                   | resets on          |
/// |----------------|------------------------------------------|--------------------|
/// | rolling        | [now - 7d or 30d, now]                   | "Daily"            |
/// | calendar_month | [1st 00:00, last day 23:59:59]           | 1st of next month  |
/// | calendar_week  | [Monday 00:00, Sunday 23:59:59]          | next Monday        |
/// | custom         | [start 00:00, end 23:59:59]              | "Does not reset"   |
///
/// A custom period with a missing or unparseable bound falls back to the
/// calendar month.
pub fn resolve_budget_period(
    period_type: PeriodType,
    period: BudgetPeriod,
    start_date: Option<&str>,
    end_date: Option<&str>,
    now: NaiveDateTime,
) -> ResolvedPeriod {
    let today = now.date();

    match period_type {
        PeriodType::Rolling => {
            let days = match period {
                BudgetPeriod::Weekly => 7,
                BudgetPeriod::Monthly => 30,
            };
            let start = now - Duration::days(days);
            ResolvedPeriod {
                window: PeriodWindow { start, end: now },
                display: format!(
                    "Rolling {} days ({} - {})",
                    days,
                    short_label(start.date()),
                    long_label(today)
                ),
                resets_on: "Daily".to_string(),
            }
        }
        PeriodType::CalendarWeek => {
            let monday = monday_of_week(today);
            let sunday = monday + Duration::days(6);
            ResolvedPeriod {
                window: PeriodWindow {
                    start: start_of_day(monday),
                    end: end_of_day(sunday),
                },
                display: format!("{} - {}", short_label(monday), long_label(sunday)),
                resets_on: long_label(monday + Duration::days(7)),
            }
        }
        PeriodType::Custom => {
            let bounds = start_date
                .and_then(parse_param_date)
                .zip(end_date.and_then(parse_param_date));
            match bounds {
                Some((start, end)) => ResolvedPeriod {
                    window: PeriodWindow {
                        start: start_of_day(start),
                        end: end_of_day(end),
                    },
                    display: format!("{} - {}", short_label(start), long_label(end)),
                    resets_on: "Does not reset".to_string(),
                },
                None => {
                    tracing::debug!(
                        ?start_date,
                        ?end_date,
                        "Custom budget period unresolvable, using calendar month"
                    );
                    calendar_month_period(now)
                }
            }
        }
        PeriodType::CalendarMonth => calendar_month_period(now),
    }
}

fn calendar_month_period(now: NaiveDateTime) -> ResolvedPeriod {
    let today = now.date();
    let month_start = first_of_month(today);
    let month_end = last_of_month(today);
    ResolvedPeriod {
        window: calendar_month_window(now),
        display: format!("{} - {}", short_label(month_start), long_label(month_end)),
        resets_on: long_label(first_of_next_month(today)),
    }
}

/// Named date filter for reports
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum DateFilter {
    /// No bound
    #[default]
    All,
    ThisMonth,
    LastMonth,
    #[serde(rename = "last_7")]
    Last7,
    #[serde(rename = "last_30")]
    Last30,
    #[serde(rename = "last_90")]
    Last90,
    ThisYear,
    /// Explicit start and optional end
    Custom,
}

impl DateFilter {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::All => "all",
            Self::ThisMonth => "this_month",
            Self::LastMonth => "last_month",
            Self::Last7 => "last_7",
            Self::Last30 => "last_30",
            Self::Last90 => "last_90",
            Self::ThisYear => "this_year",
            Self::Custom => "custom",
        }
    }

    /// Resolve to a (possibly open-ended) date range
    ///
    /// `custom_start` and `custom_end` are only read for [`DateFilter::Custom`].
    /// An unparseable custom start leaves the range unbounded.
    pub fn range(
        &self,
        custom_start: Option<&str>,
        custom_end: Option<&str>,
        now: NaiveDateTime,
    ) -> DateRange {
        let today = now.date();
        let days_back = |days: i64| DateRange {
            start: Some(now - Duration::days(days)),
            end: Some(now),
        };

        match self {
            Self::All => DateRange::unbounded(),
            Self::ThisMonth => DateRange {
                start: Some(start_of_day(first_of_month(today))),
                end: Some(now),
            },
            Self::LastMonth => {
                let last_day = first_of_month(today).pred_opt().unwrap_or(today);
                DateRange {
                    start: Some(start_of_day(first_of_month(last_day))),
                    end: Some(end_of_day(last_day)),
                }
            }
            Self::Last7 => days_back(7),
            Self::Last30 => days_back(30),
            Self::Last90 => days_back(90),
            Self::ThisYear => DateRange {
                start: NaiveDate::from_ymd_opt(today.year(), 1, 1).map(start_of_day),
                end: Some(now),
            },
            Self::Custom => match custom_start.and_then(parse_param_date) {
                Some(start) => DateRange {
                    start: Some(start_of_day(start)),
                    end: custom_end.and_then(parse_param_date).map(end_of_day),
                },
                None => {
                    tracing::debug!(?custom_start, "Custom filter without a usable start date");
                    DateRange::unbounded()
                }
            },
        }
    }
}

impl std::str::FromStr for DateFilter {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().replace('-', "_").as_str() {
            "all" => Ok(Self::All),
            "this_month" => Ok(Self::ThisMonth),
            "last_month" => Ok(Self::LastMonth),
            "last_7" => Ok(Self::Last7),
            "last_30" => Ok(Self::Last30),
            "last_90" => Ok(Self::Last90),
            "this_year" => Ok(Self::ThisYear),
            "custom" => Ok(Self::Custom),
            _ => Err(format!(
                "Unknown period: {}. Available: all, this_month, last_month, last_7, last_30, last_90, this_year, custom",
                s
            )),
        }
    }
}

impl std::fmt::Display for DateFilter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Date range where either bound may be open
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct DateRange {
    pub start: Option<NaiveDateTime>,
    pub end: Option<NaiveDateTime>,
}

impl DateRange {
    pub fn unbounded() -> Self {
        Self::default()
    }

    pub fn contains(&self, instant: NaiveDateTime) -> bool {
        self.start.map_or(true, |start| instant >= start)
            && self.end.map_or(true, |end| instant <= end)
    }

    /// Whether a ledger date (taken at midnight) falls in the range
    pub fn contains_date(&self, date: NaiveDate) -> bool {
        self.contains(start_of_day(date))
    }
}

impl From<PeriodWindow> for DateRange {
    fn from(window: PeriodWindow) -> Self {
        Self {
            start: Some(window.start),
            end: Some(window.end),
        }
    }
}
