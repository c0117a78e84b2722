//! Domain models for Tally

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::dates::parse_ledger_date;

// ========== Ledger Models ==========

/// One persisted line item
///
/// Cells are kept exactly as written to the store. Rows that belong to the same
/// physical receipt repeat the date, merchant, tax, grand total and payment
/// cells; only the item-level cells differ. Numeric cells are parsed on demand
/// so a malformed cell only affects the row that carries it.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct LedgerRow {
    /// Purchase date, `dd-mm-yyyy` canonical
    pub date: String,
    pub merchant: String,
    pub address: String,
    pub item: String,
    pub category: String,
    pub quantity: String,
    pub unit_price: String,
    /// Line total for this item
    pub total_price: String,
    /// Receipt tax, empty when the receipt had none
    pub tax: String,
    /// Receipt grand total
    pub grand_total: String,
    pub payment: String,
}

impl LedgerRow {
    pub fn parsed_date(&self) -> Option<NaiveDate> {
        parse_ledger_date(&self.date)
    }

    pub fn total_price_value(&self) -> Option<f64> {
        parse_cell(&self.total_price)
    }

    pub fn grand_total_value(&self) -> Option<f64> {
        parse_cell(&self.grand_total)
    }

    pub fn tax_value(&self) -> Option<f64> {
        parse_cell(&self.tax)
    }
}

/// Parse a numeric ledger cell, tolerating currency symbols and thousands separators
pub fn parse_cell(s: &str) -> Option<f64> {
    let cleaned: String = s.trim().replace(['$', ','], "");
    if cleaned.is_empty() {
        return None;
    }
    cleaned.parse::<f64>().ok().filter(|v| v.is_finite())
}

/// Render an amount the way it is written into a ledger cell
pub fn format_cell(value: f64) -> String {
    format!("{}", value)
}

// ========== Receipt Models ==========

/// Merchant information
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MerchantDetails {
    pub name: String,
    #[serde(default)]
    pub address: String,
}

/// Individual receipt line item
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LineItem {
    pub item_name: String,
    pub unit_price: f64,
    pub quantity: f64,
    /// Line price (unit price x quantity, as printed)
    pub price: f64,
    pub category: String,
}

/// Receipt totals and payment information
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TotalAmounts {
    pub total: f64,
    #[serde(default)]
    pub tax: Option<f64>,
    #[serde(default)]
    pub payment_method: String,
}

/// A receipt in flight: extracted or corrected, not yet persisted
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Receipt {
    pub merchant_details: MerchantDetails,
    /// Purchase date, `dd-mm-yyyy`
    pub purchase_date: String,
    pub line_items: Vec<LineItem>,
    pub total_amounts: TotalAmounts,
}

impl Receipt {
    /// Decompose into one ledger row per line item
    pub fn to_ledger_rows(&self) -> Vec<LedgerRow> {
        let tax = match self.total_amounts.tax {
            Some(tax) if tax != 0.0 => format_cell(tax),
            _ => String::new(),
        };

        self.line_items
            .iter()
            .map(|item| LedgerRow {
                date: self.purchase_date.clone(),
                merchant: self.merchant_details.name.clone(),
                address: self.merchant_details.address.clone(),
                item: item.item_name.clone(),
                category: item.category.clone(),
                quantity: format_cell(item.quantity),
                unit_price: format_cell(item.unit_price),
                total_price: format_cell(item.price),
                tax: tax.clone(),
                grand_total: format_cell(self.total_amounts.total),
                payment: self.total_amounts.payment_method.clone(),
            })
            .collect()
    }
}

/// An item row of a reconstructed receipt
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReconstructedItem {
    pub item: String,
    pub category: String,
    pub quantity: String,
    pub unit_price: String,
    pub total_price: f64,
}

/// A logical receipt rebuilt from a group of ledger rows
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReconstructedReceipt {
    /// Date cell as stored
    pub date: String,
    /// Lower-cased, trimmed merchant name
    pub merchant: String,
    pub address: String,
    pub grand_total: f64,
    pub tax: String,
    pub payment: String,
    pub items: Vec<ReconstructedItem>,
}

/// How a duplicate candidate was found
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum MatchType {
    #[default]
    FuzzyMatch,
}

impl MatchType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::FuzzyMatch => "fuzzy_match",
        }
    }
}

impl std::fmt::Display for MatchType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A stored receipt that looks like a re-submission of the candidate
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DuplicateCandidate {
    pub date: String,
    pub merchant: String,
    pub address: String,
    pub grand_total: f64,
    pub tax: String,
    pub payment: String,
    /// e.g. "3 items"
    pub item_summary: String,
    /// Distinct item categories, comma separated
    pub categories: String,
    pub match_type: MatchType,
    /// Share of items matched (0-100, one decimal)
    pub match_percentage: f64,
    /// Token-set similarity of the merchant names (0-100)
    pub merchant_similarity_score: f64,
    pub items: Vec<ReconstructedItem>,
}

// ========== Budget Models ==========

/// Legacy budget period, still used to pick the rolling window length
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum BudgetPeriod {
    #[default]
    Monthly,
    Weekly,
}

impl BudgetPeriod {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Monthly => "monthly",
            Self::Weekly => "weekly",
        }
    }
}

impl std::str::FromStr for BudgetPeriod {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "monthly" => Ok(Self::Monthly),
            "weekly" => Ok(Self::Weekly),
            _ => Err(format!("Unknown budget period: {} (valid: monthly, weekly)", s)),
        }
    }
}

impl std::fmt::Display for BudgetPeriod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Windowing policy for a budget
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum PeriodType {
    /// Last 7 or 30 days, moving with today
    Rolling,
    /// Current calendar month
    #[default]
    CalendarMonth,
    /// Current Monday-to-Sunday week
    CalendarWeek,
    /// Explicit start and end dates
    Custom,
}

impl PeriodType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Rolling => "rolling",
            Self::CalendarMonth => "calendar_month",
            Self::CalendarWeek => "calendar_week",
            Self::Custom => "custom",
        }
    }
}

impl std::str::FromStr for PeriodType {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "rolling" => Ok(Self::Rolling),
            "calendar_month" => Ok(Self::CalendarMonth),
            "calendar_week" => Ok(Self::CalendarWeek),
            "custom" => Ok(Self::Custom),
            _ => Err(format!(
                "Unknown period type: {} (valid: rolling, calendar_month, calendar_week, custom)",
                s
            )),
        }
    }
}

impl std::fmt::Display for PeriodType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Spending limit for a category
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Budget {
    #[serde(default)]
    pub id: Option<String>,
    pub category: String,
    pub limit: f64,
    #[serde(default)]
    pub period: BudgetPeriod,
    #[serde(default)]
    pub period_type: PeriodType,
    /// Custom period start (`yyyy-mm-dd`)
    #[serde(default)]
    pub start_date: Option<String>,
    /// Custom period end (`yyyy-mm-dd`)
    #[serde(default)]
    pub end_date: Option<String>,
}

impl Budget {
    pub fn new(category: impl Into<String>, limit: f64) -> Self {
        Self {
            id: None,
            category: category.into(),
            limit,
            period: BudgetPeriod::default(),
            period_type: PeriodType::default(),
            start_date: None,
            end_date: None,
        }
    }
}

/// A budget with its spending computed for the current window
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BudgetReport {
    #[serde(flatten)]
    pub budget: Budget,
    pub current_spend: f64,
    pub percentage_used: f64,
    pub is_exceeded: bool,
    /// e.g. "Dec 01 - Dec 31, 2024"
    pub period_display: String,
    /// Next reset date, "Daily" or "Does not reset"
    pub resets_on: String,
}

/// Budget status overview
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BudgetStatus {
    pub budgets: Vec<BudgetReport>,
    pub total_budget: f64,
    pub total_spent: f64,
    pub overall_percentage: f64,
}

// ========== Goal Models ==========

/// Goal kinds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum GoalType {
    /// Money put aside through manual deposits and withdrawals
    #[default]
    Savings,
    /// Cap on spending in one category
    SpendingLimit,
}

impl GoalType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Savings => "savings",
            Self::SpendingLimit => "spending_limit",
        }
    }
}

impl std::str::FromStr for GoalType {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "savings" => Ok(Self::Savings),
            "spending_limit" => Ok(Self::SpendingLimit),
            _ => Err(format!("Unknown goal type: {} (valid: savings, spending_limit)", s)),
        }
    }
}

impl std::fmt::Display for GoalType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Savings or spending goal
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Goal {
    #[serde(default)]
    pub id: Option<String>,
    pub name: String,
    pub target_amount: f64,
    #[serde(default)]
    pub current_amount: f64,
    /// Target date (`yyyy-mm-dd`)
    pub target_date: String,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub goal_type: GoalType,
    /// Recompute `current_amount` from the ledger and goal transactions
    #[serde(default)]
    pub auto_track: bool,
}

/// A goal with its current amount resolved
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GoalProgress {
    #[serde(flatten)]
    pub goal: Goal,
    pub progress_percentage: f64,
}

/// Direction of a manual goal transaction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GoalTransactionType {
    Deposit,
    Withdrawal,
}

impl GoalTransactionType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Deposit => "deposit",
            Self::Withdrawal => "withdrawal",
        }
    }
}

impl std::str::FromStr for GoalTransactionType {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "deposit" => Ok(Self::Deposit),
            "withdrawal" => Ok(Self::Withdrawal),
            _ => Err(format!("Unknown goal transaction type: {}", s)),
        }
    }
}

impl std::fmt::Display for GoalTransactionType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Manual deposit or withdrawal against a savings goal
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GoalTransaction {
    #[serde(default)]
    pub id: Option<String>,
    pub goal_id: String,
    pub amount: f64,
    pub transaction_type: GoalTransactionType,
    pub date: String,
    #[serde(default)]
    pub note: Option<String>,
}

impl GoalTransaction {
    /// Amount with deposits positive and withdrawals negative
    pub fn signed_amount(&self) -> f64 {
        match self.transaction_type {
            GoalTransactionType::Deposit => self.amount,
            GoalTransactionType::Withdrawal => -self.amount,
        }
    }
}

// ========== Report Models ==========

/// Report time granularity
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Granularity {
    #[default]
    Monthly,
    Weekly,
}

impl Granularity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Monthly => "monthly",
            Self::Weekly => "weekly",
        }
    }
}

impl std::str::FromStr for Granularity {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "monthly" => Ok(Self::Monthly),
            "weekly" => Ok(Self::Weekly),
            _ => Err(format!(
                "Unknown granularity: {} (valid: monthly, weekly)",
                s
            )),
        }
    }
}

impl std::fmt::Display for Granularity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Spending data for a category
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategorySpending {
    pub category: String,
    pub total: f64,
    pub percentage: f64,
    pub count: usize,
    pub average: f64,
}

/// Single data point in a time series
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimeSeriesPoint {
    /// Period key (`YYYY-MM` or `YYYY-Www`)
    pub date: String,
    pub amount: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
}

/// Spending trends over time
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrendData {
    pub period: Granularity,
    pub categories: Vec<String>,
    /// Category -> time series
    pub data: BTreeMap<String, Vec<TimeSeriesPoint>>,
    pub total_by_period: Vec<TimeSeriesPoint>,
}

/// Next-month spending forecast
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForecastData {
    /// Always "next_month"
    pub period: String,
    pub forecasts: Vec<CategorySpending>,
    pub total_forecast: f64,
    pub confidence: f64,
    pub based_on_months: u32,
}

/// Category-level analysis
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryAnalysis {
    pub categories: Vec<CategorySpending>,
    pub total_spending: f64,
    /// Highest-total category, or "None"
    pub top_category: String,
    pub period: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_receipt() -> Receipt {
        Receipt {
            merchant_details: MerchantDetails {
                name: "Corner Shop".to_string(),
                address: "1 High St".to_string(),
            },
            purchase_date: "03-02-2025".to_string(),
            line_items: vec![
                LineItem {
                    item_name: "Tea".to_string(),
                    unit_price: 2.5,
                    quantity: 2.0,
                    price: 5.0,
                    category: "Groceries".to_string(),
                },
                LineItem {
                    item_name: "Soap".to_string(),
                    unit_price: 1.25,
                    quantity: 1.0,
                    price: 1.25,
                    category: "Household".to_string(),
                },
            ],
            total_amounts: TotalAmounts {
                total: 6.25,
                tax: None,
                payment_method: "Card".to_string(),
            },
        }
    }

    #[test]
    fn test_parse_cell() {
        assert_eq!(parse_cell("12.50"), Some(12.5));
        assert_eq!(parse_cell(" $1,234.00 "), Some(1234.0));
        assert_eq!(parse_cell(""), None);
        assert_eq!(parse_cell("n/a"), None);
        assert_eq!(parse_cell("NaN"), None);
    }

    #[test]
    fn test_receipt_to_ledger_rows_repeats_receipt_cells() {
        let rows = sample_receipt().to_ledger_rows();
        assert_eq!(rows.len(), 2);
        for row in &rows {
            assert_eq!(row.date, "03-02-2025");
            assert_eq!(row.merchant, "Corner Shop");
            assert_eq!(row.grand_total_value(), Some(6.25));
            assert_eq!(row.tax, "");
            assert_eq!(row.payment, "Card");
        }
        assert_eq!(rows[0].item, "Tea");
        assert_eq!(rows[0].total_price_value(), Some(5.0));
        assert_eq!(rows[1].category, "Household");
    }

    #[test]
    fn test_receipt_tax_written_when_present() {
        let mut receipt = sample_receipt();
        receipt.total_amounts.tax = Some(0.5);
        let rows = receipt.to_ledger_rows();
        assert_eq!(rows[0].tax_value(), Some(0.5));
    }

    #[test]
    fn test_goal_transaction_sign() {
        let mut txn = GoalTransaction {
            id: None,
            goal_id: "goal_1".to_string(),
            amount: 40.0,
            transaction_type: GoalTransactionType::Deposit,
            date: "2025-01-01".to_string(),
            note: None,
        };
        assert_eq!(txn.signed_amount(), 40.0);
        txn.transaction_type = GoalTransactionType::Withdrawal;
        assert_eq!(txn.signed_amount(), -40.0);
    }

    #[test]
    fn test_enum_round_trip_strings() {
        assert_eq!("calendar_week".parse::<PeriodType>().unwrap(), PeriodType::CalendarWeek);
        assert_eq!("Weekly".parse::<BudgetPeriod>().unwrap(), BudgetPeriod::Weekly);
        assert_eq!("spending_limit".parse::<GoalType>().unwrap(), GoalType::SpendingLimit);
        assert!("fortnightly".parse::<Granularity>().is_err());
    }

    #[test]
    fn test_budget_deserializes_with_defaults() {
        let budget: Budget = serde_json::from_str(r#"{"category":"Dining","limit":200}"#).unwrap();
        assert_eq!(budget.period, BudgetPeriod::Monthly);
        assert_eq!(budget.period_type, PeriodType::CalendarMonth);
        assert!(budget.id.is_none());
    }
}
