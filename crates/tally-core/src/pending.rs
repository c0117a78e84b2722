//! Receipts staged for confirmation
//!
//! A receipt that needs a human decision (usually because duplicates were
//! found) is held here under an opaque id until it is confirmed, discarded or
//! evicted. The store is a plain owned value. Callers that share it wrap it
//! in their own lock.

use std::collections::HashMap;

use chrono::{Duration, NaiveDateTime};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::models::{DuplicateCandidate, Receipt};

/// Prefix for pending receipt ids
pub const PENDING_ID_PREFIX: &str = "pending";

/// A staged receipt with the duplicates found when it was staged
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PendingReceipt {
    pub id: String,
    pub receipt: Receipt,
    pub duplicates: Vec<DuplicateCandidate>,
    pub staged_at: NaiveDateTime,
}

impl PendingReceipt {
    pub fn has_duplicates(&self) -> bool {
        !self.duplicates.is_empty()
    }
}

#[derive(Debug, Clone)]
pub struct PendingReceipts {
    entries: HashMap<String, PendingReceipt>,
    ttl: Duration,
}

impl Default for PendingReceipts {
    fn default() -> Self {
        Self::new(Duration::minutes(60))
    }
}

impl PendingReceipts {
    pub fn new(ttl: Duration) -> Self {
        Self {
            entries: HashMap::new(),
            ttl,
        }
    }

    /// Stage a receipt and return its id
    pub fn stage(
        &mut self,
        receipt: Receipt,
        duplicates: Vec<DuplicateCandidate>,
        now: NaiveDateTime,
    ) -> String {
        let id = crate::store::new_id(PENDING_ID_PREFIX);
        self.entries.insert(
            id.clone(),
            PendingReceipt {
                id: id.clone(),
                receipt,
                duplicates,
                staged_at: now,
            },
        );
        id
    }

    pub fn get(&self, id: &str) -> Option<&PendingReceipt> {
        self.entries.get(id)
    }

    /// Remove and return a staged receipt
    pub fn take(&mut self, id: &str) -> Option<PendingReceipt> {
        self.entries.remove(id)
    }

    /// Drop a staged receipt. Returns false when the id was unknown.
    pub fn discard(&mut self, id: &str) -> bool {
        self.entries.remove(id).is_some()
    }

    /// Drop receipts staged more than the TTL before `now`
    pub fn evict_expired(&mut self, now: NaiveDateTime) -> usize {
        let ttl = self.ttl;
        let before = self.entries.len();
        self.entries.retain(|_, pending| now - pending.staged_at <= ttl);
        let evicted = before - self.entries.len();
        if evicted > 0 {
            debug!(evicted, "Evicted expired pending receipts");
        }
        evicted
    }

    /// Staged receipts, oldest first
    pub fn list(&self) -> Vec<&PendingReceipt> {
        let mut pending: Vec<&PendingReceipt> = self.entries.values().collect();
        pending.sort_by_key(|p| p.staged_at);
        pending
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{MerchantDetails, TotalAmounts};
    use chrono::NaiveDate;

    fn receipt() -> Receipt {
        Receipt {
            merchant_details: MerchantDetails {
                name: "Aldi".to_string(),
                address: String::new(),
            },
            purchase_date: "01-03-2025".to_string(),
            line_items: Vec::new(),
            total_amounts: TotalAmounts {
                total: 1.0,
                tax: None,
                payment_method: String::new(),
            },
        }
    }

    fn at(minute: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2025, 3, 1)
            .unwrap()
            .and_hms_opt(10, minute, 0)
            .unwrap()
    }

    #[test]
    fn test_stage_take_discard() {
        let mut pending = PendingReceipts::default();
        let a = pending.stage(receipt(), Vec::new(), at(0));
        let b = pending.stage(receipt(), Vec::new(), at(1));
        assert!(a.starts_with("pending_"));
        assert_ne!(a, b);
        assert_eq!(pending.len(), 2);
        assert!(!pending.get(&a).unwrap().has_duplicates());

        assert_eq!(pending.take(&a).unwrap().id, a);
        assert!(pending.take(&a).is_none());
        assert!(pending.discard(&b));
        assert!(!pending.discard(&b));
        assert!(pending.is_empty());
    }

    #[test]
    fn test_eviction() {
        let mut pending = PendingReceipts::new(Duration::minutes(30));
        let old = pending.stage(receipt(), Vec::new(), at(0));
        let fresh = pending.stage(receipt(), Vec::new(), at(20));

        assert_eq!(pending.evict_expired(at(30)), 0);
        assert_eq!(pending.evict_expired(at(45)), 1);
        assert!(pending.get(&old).is_none());
        assert!(pending.get(&fresh).is_some());
    }

    #[test]
    fn test_list_oldest_first() {
        let mut pending = PendingReceipts::default();
        let second = pending.stage(receipt(), Vec::new(), at(5));
        let first = pending.stage(receipt(), Vec::new(), at(1));
        let ids: Vec<&str> = pending.list().iter().map(|p| p.id.as_str()).collect();
        assert_eq!(ids, vec![first.as_str(), second.as_str()]);
    }
}
