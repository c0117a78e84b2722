//! CLI command implementations
//!
//! Commands are organized by domain:
//! - `core` - Init and shared utilities (open_reconciler, print_json)
//! - `ledger` - CSV import/export of ledger rows
//! - `receipts` - Duplicate check and receipt add workflow
//! - `reports` - Trends, forecast and category breakdown
//! - `budgets` - Budget status and management
//! - `goals` - Goal progress and management

pub mod budgets;
pub mod core;
pub mod goals;
pub mod ledger;
pub mod receipts;
pub mod reports;

// Re-export command functions for main.rs
pub use budgets::*;
pub use self::core::*;
pub use goals::*;
pub use ledger::*;
pub use receipts::*;
pub use reports::*;

/// Truncate a string to a maximum number of characters, adding "..." if truncated
pub fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        s.to_string()
    } else {
        let kept: String = s.chars().take(max.saturating_sub(3)).collect();
        format!("{}...", kept)
    }
}
