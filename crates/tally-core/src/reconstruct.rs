//! Rebuild logical receipts from flat ledger rows
//!
//! Rows sharing a date cell, merchant (case and surrounding whitespace
//! ignored) and grand total (to the cent) belong to one receipt.

use std::collections::HashMap;

use tracing::debug;

use crate::models::{LedgerRow, ReconstructedItem, ReconstructedReceipt};

/// Grouping key for a ledger row: (date cell, normalized merchant, grand total in cents)
type GroupKey = (String, String, String);

/// Lower-cased, trimmed merchant name used for grouping
pub fn normalize_merchant(name: &str) -> String {
    name.trim().to_lowercase()
}

/// Whether an item cell describes a real line item
///
/// Blank cells and the "TOTAL" summary line some receipts carry are not items.
fn is_line_item(item: &str) -> bool {
    let item = item.trim();
    !item.is_empty() && !item.eq_ignore_ascii_case("total")
}

/// Group rows into logical receipts, in first-seen order
///
/// Rows whose grand total is zero or unparseable are ignored. Each receipt
/// keeps the address, tax and payment of its first row.
pub fn group_receipts<'a, I>(rows: I) -> Vec<ReconstructedReceipt>
where
    I: IntoIterator<Item = &'a LedgerRow>,
{
    let mut receipts: Vec<ReconstructedReceipt> = Vec::new();
    let mut index: HashMap<GroupKey, usize> = HashMap::new();

    for row in rows {
        let grand_total = match row.grand_total_value() {
            Some(total) if total != 0.0 => total,
            _ => {
                debug!(grand_total = %row.grand_total, "Skipping row without a grand total");
                continue;
            }
        };

        let merchant = normalize_merchant(&row.merchant);
        let key = (row.date.clone(), merchant.clone(), format!("{:.2}", grand_total));

        let position = *index.entry(key).or_insert_with(|| {
            receipts.push(ReconstructedReceipt {
                date: row.date.clone(),
                merchant,
                address: row.address.clone(),
                grand_total,
                tax: row.tax.clone(),
                payment: row.payment.clone(),
                items: Vec::new(),
            });
            receipts.len() - 1
        });

        if is_line_item(&row.item) {
            receipts[position].items.push(ReconstructedItem {
                item: row.item.trim().to_string(),
                category: row.category.clone(),
                quantity: row.quantity.clone(),
                unit_price: row.unit_price.clone(),
                total_price: row.total_price_value().unwrap_or(0.0),
            });
        }
    }

    receipts
}
