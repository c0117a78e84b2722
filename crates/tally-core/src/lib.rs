//! Tally Core Library
//!
//! Ledger reconciliation for receipt-based spending tracking:
//! - Flat line-item ledger with receipt reconstruction
//! - Fuzzy duplicate receipt detection
//! - Period aggregation (trends, forecast, category analysis)
//! - Budget and goal progress over calendar, rolling and custom windows
//! - SQLite and in-memory stores
//! - CSV ledger interchange and JSON receipt loading

pub mod analysis;
pub mod category;
pub mod clock;
pub mod config;
pub mod dates;
pub mod duplicates;
pub mod error;
pub mod fuzzy;
pub mod import;
pub mod ledger;
pub mod models;
pub mod pending;
pub mod period;
pub mod reconstruct;
pub mod service;
pub mod store;

pub use analysis::{ForecastConfig, SpendingFilter};
pub use category::{normalize_category, DEFAULT_CATEGORIES};
pub use clock::{Clock, FixedClock, SystemClock};
pub use config::Config;
pub use duplicates::{DetectionConfig, DuplicateDetector, ItemMatching};
pub use error::{Error, Result};
pub use import::{load_receipt_file, parse_ledger_csv, parse_receipt_json, write_ledger_csv};
pub use ledger::LedgerView;
pub use pending::{PendingReceipt, PendingReceipts};
pub use period::{resolve_budget_period, DateFilter, DateRange, PeriodWindow, ResolvedPeriod};
pub use reconstruct::group_receipts;
pub use service::{Reconciler, SavedReceipt};
pub use store::{Database, MemoryStore, Store};
