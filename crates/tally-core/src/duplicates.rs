//! Duplicate receipt detection
//!
//! A submitted receipt is compared against receipts reconstructed from the
//! ledger. A stored receipt is reported when all of the following hold:
//! - its merchant name is similar (token-set score >= merchant threshold)
//! - its date is within `threshold_days` of the candidate's
//! - its grand total is within a cent
//! - enough of the line items match by name (>= duplicate threshold percent)
//!
//! Detection is advisory. Bad rows are skipped and logged, and nothing here
//! returns an error.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::dates::parse_ledger_date;
use crate::fuzzy::{merchant_score, normalize_item_name, ratio};
use crate::models::{
    DuplicateCandidate, LedgerRow, MatchType, Receipt, ReconstructedItem, ReconstructedReceipt,
};
use crate::reconstruct::{group_receipts, normalize_merchant};

/// How candidate items are paired with stored items
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum ItemMatching {
    /// Each candidate item matches if any stored item is similar enough.
    /// A stored item may satisfy several candidate items.
    #[default]
    BestMatch,
    /// Each stored item can be claimed by at most one candidate item
    OneToOne,
}

impl ItemMatching {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::BestMatch => "best_match",
            Self::OneToOne => "one_to_one",
        }
    }
}

impl std::str::FromStr for ItemMatching {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().replace('-', "_").as_str() {
            "best_match" => Ok(Self::BestMatch),
            "one_to_one" => Ok(Self::OneToOne),
            _ => Err(format!(
                "Unknown item matching: {} (valid: best_match, one_to_one)",
                s
            )),
        }
    }
}

impl std::fmt::Display for ItemMatching {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Thresholds for duplicate detection
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DetectionConfig {
    /// Maximum distance in days between purchase dates
    pub threshold_days: i64,
    /// Minimum merchant similarity (0-100)
    pub merchant_threshold: f64,
    /// Minimum item name similarity (0-100) for an item to count as matched
    pub item_threshold: f64,
    /// Minimum share of matched items (0-100) to report a duplicate
    pub duplicate_threshold: f64,
    /// Maximum grand total difference
    pub amount_tolerance: f64,
    pub item_matching: ItemMatching,
}

impl Default for DetectionConfig {
    fn default() -> Self {
        Self {
            threshold_days: 1,
            merchant_threshold: 85.0,
            item_threshold: 85.0,
            duplicate_threshold: 70.0,
            amount_tolerance: 0.01,
            item_matching: ItemMatching::BestMatch,
        }
    }
}

/// Finds stored receipts that look like re-submissions
#[derive(Debug, Clone, Default)]
pub struct DuplicateDetector {
    config: DetectionConfig,
}

impl DuplicateDetector {
    pub fn new(config: DetectionConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &DetectionConfig {
        &self.config
    }

    /// Stored receipts matching `candidate`, in ledger order
    pub fn find_duplicates(&self, candidate: &Receipt, rows: &[LedgerRow]) -> Vec<DuplicateCandidate> {
        if rows.is_empty() {
            debug!("Ledger is empty, nothing to compare against");
            return Vec::new();
        }

        let Some(candidate_date) = parse_ledger_date(&candidate.purchase_date) else {
            info!(
                date = %candidate.purchase_date,
                "Candidate receipt has an unparseable date, skipping duplicate check"
            );
            return Vec::new();
        };

        let candidate_merchant = normalize_merchant(&candidate.merchant_details.name);
        let candidate_total = candidate.total_amounts.total;

        info!(
            rows = rows.len(),
            merchant = %candidate_merchant,
            total = candidate_total,
            "Checking for duplicate receipts"
        );

        // Score each distinct stored merchant once
        let mut scores: HashMap<String, f64> = HashMap::new();
        let mut score_of = |merchant: &str| -> f64 {
            let key = normalize_merchant(merchant);
            if let Some(score) = scores.get(&key) {
                return *score;
            }
            let score = merchant_score(&key, &candidate_merchant);
            scores.insert(key, score);
            score
        };

        let survivors: Vec<&LedgerRow> = rows
            .iter()
            .filter(|row| score_of(&row.merchant) >= self.config.merchant_threshold)
            .filter(|row| match row.parsed_date() {
                Some(date) => (candidate_date - date).num_days().abs() <= self.config.threshold_days,
                None => {
                    debug!(date = %row.date, "Skipping row with unparseable date");
                    false
                }
            })
            .collect();

        debug!(rows = survivors.len(), "Rows matching merchant and date");
        if survivors.is_empty() {
            return Vec::new();
        }

        let candidate_items: Vec<String> = candidate
            .line_items
            .iter()
            .map(|item| normalize_item_name(&item.item_name))
            .collect();

        let duplicates: Vec<DuplicateCandidate> = group_receipts(survivors)
            .into_iter()
            .filter(|group| {
                (group.grand_total - candidate_total).abs() <= self.config.amount_tolerance
            })
            .filter_map(|group| {
                let percentage = self.match_percentage(&candidate_items, &group.items);
                debug!(
                    merchant = %group.merchant,
                    date = %group.date,
                    percentage,
                    "Compared against stored receipt"
                );
                if percentage < self.config.duplicate_threshold {
                    return None;
                }
                let score = merchant_score(&group.merchant, &candidate_merchant);
                Some(summarize(group, percentage, score))
            })
            .collect();

        info!(count = duplicates.len(), "Duplicate check complete");
        duplicates
    }

    /// Share of items matched, 0-100
    ///
    /// Divides by the longer of the two item lists, so extra items on either
    /// side lower the score. Two empty lists score 0.
    fn match_percentage(&self, candidate_items: &[String], stored: &[ReconstructedItem]) -> f64 {
        let total = candidate_items.len().max(stored.len());
        if total == 0 {
            return 0.0;
        }

        let stored_names: Vec<String> = stored
            .iter()
            .map(|item| normalize_item_name(&item.item))
            .collect();
        let threshold = self.config.item_threshold;

        let matched = match self.config.item_matching {
            ItemMatching::BestMatch => candidate_items
                .iter()
                .filter(|name| {
                    stored_names
                        .iter()
                        .any(|stored| ratio(name, stored) >= threshold)
                })
                .count(),
            ItemMatching::OneToOne => {
                let mut claimed = vec![false; stored_names.len()];
                let mut matched = 0;
                for name in candidate_items {
                    let best = stored_names
                        .iter()
                        .enumerate()
                        .filter(|(i, _)| !claimed[*i])
                        .map(|(i, stored)| (i, ratio(name, stored)))
                        .filter(|(_, score)| *score >= threshold)
                        .max_by(|a, b| a.1.total_cmp(&b.1));
                    if let Some((i, _)) = best {
                        claimed[i] = true;
                        matched += 1;
                    }
                }
                matched
            }
        };

        matched as f64 / total as f64 * 100.0
    }
}

fn summarize(group: ReconstructedReceipt, percentage: f64, merchant_score: f64) -> DuplicateCandidate {
    let mut categories: Vec<&str> = Vec::new();
    for item in &group.items {
        let category = item.category.trim();
        if !category.is_empty() && !categories.contains(&category) {
            categories.push(category);
        }
    }
    let categories = categories.join(", ");

    DuplicateCandidate {
        date: group.date,
        merchant: group.merchant,
        address: group.address,
        grand_total: group.grand_total,
        tax: group.tax,
        payment: group.payment,
        item_summary: format!("{} items", group.items.len()),
        categories,
        match_type: MatchType::FuzzyMatch,
        match_percentage: (percentage * 10.0).round() / 10.0,
        merchant_similarity_score: merchant_score,
        items: group.items,
    }
}
