//! Ledger interchange
//!
//! - CSV in the spreadsheet layout (`Date,Merchant,...,Payment`), read by
//!   header name so column order does not matter
//! - JSON receipts in the shape produced by the extraction service

use std::io::{Read, Write};
use std::path::Path;

use csv::{ReaderBuilder, StringRecord, WriterBuilder};
use tracing::debug;

use crate::error::{Error, Result};
use crate::models::{LedgerRow, Receipt};

/// Ledger CSV header, in column order
pub const LEDGER_HEADERS: [&str; 11] = [
    "Date",
    "Merchant",
    "Address",
    "Item",
    "Category",
    "Qty",
    "Unit Price",
    "Total Price",
    "Tax",
    "Grand Total",
    "Payment",
];

/// Headers a ledger CSV must carry
const REQUIRED_HEADERS: [&str; 4] = ["Date", "Merchant", "Total Price", "Grand Total"];

/// Column positions of each ledger header in a CSV file
struct ColumnMap {
    positions: [Option<usize>; 11],
}

impl ColumnMap {
    fn from_headers(headers: &StringRecord) -> Result<Self> {
        let mut positions = [None; 11];
        for (slot, name) in positions.iter_mut().zip(LEDGER_HEADERS) {
            *slot = headers
                .iter()
                .position(|h| h.trim().eq_ignore_ascii_case(name));
        }

        let map = Self { positions };
        let missing: Vec<&str> = REQUIRED_HEADERS
            .into_iter()
            .filter(|name| map.position(name).is_none())
            .collect();
        if !missing.is_empty() {
            return Err(Error::Import(format!(
                "Missing ledger column(s): {}",
                missing.join(", ")
            )));
        }
        Ok(map)
    }

    fn position(&self, name: &str) -> Option<usize> {
        LEDGER_HEADERS
            .iter()
            .position(|h| *h == name)
            .and_then(|i| self.positions[i])
    }

    fn cell(&self, record: &StringRecord, name: &str) -> String {
        self.position(name)
            .and_then(|i| record.get(i))
            .map(|s| s.trim().to_string())
            .unwrap_or_default()
    }

    fn row(&self, record: &StringRecord) -> LedgerRow {
        LedgerRow {
            date: self.cell(record, "Date"),
            merchant: self.cell(record, "Merchant"),
            address: self.cell(record, "Address"),
            item: self.cell(record, "Item"),
            category: self.cell(record, "Category"),
            quantity: self.cell(record, "Qty"),
            unit_price: self.cell(record, "Unit Price"),
            total_price: self.cell(record, "Total Price"),
            tax: self.cell(record, "Tax"),
            grand_total: self.cell(record, "Grand Total"),
            payment: self.cell(record, "Payment"),
        }
    }
}

/// Parse a ledger CSV
///
/// Cells are kept as text; malformed numbers or dates surface later as
/// skipped rows, not import errors. Entirely blank lines are dropped.
pub fn parse_ledger_csv<R: Read>(reader: R) -> Result<Vec<LedgerRow>> {
    let mut rdr = ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(reader);

    let columns = ColumnMap::from_headers(rdr.headers()?)?;
    let mut rows = Vec::new();

    for result in rdr.records() {
        let record = result?;
        if record.iter().all(|cell| cell.trim().is_empty()) {
            continue;
        }
        rows.push(columns.row(&record));
    }

    debug!("Parsed {} ledger rows", rows.len());
    Ok(rows)
}

/// Write rows as a ledger CSV with the standard header
pub fn write_ledger_csv<W: Write>(writer: W, rows: &[LedgerRow]) -> Result<()> {
    let mut wtr = WriterBuilder::new().from_writer(writer);
    wtr.write_record(LEDGER_HEADERS)?;
    for row in rows {
        wtr.write_record([
            &row.date,
            &row.merchant,
            &row.address,
            &row.item,
            &row.category,
            &row.quantity,
            &row.unit_price,
            &row.total_price,
            &row.tax,
            &row.grand_total,
            &row.payment,
        ])?;
    }
    wtr.flush()?;
    Ok(())
}

/// Parse an extracted receipt from JSON
pub fn parse_receipt_json(content: &str) -> Result<Receipt> {
    Ok(serde_json::from_str(content)?)
}

/// Read and parse an extracted receipt file
pub fn load_receipt_file(path: &Path) -> Result<Receipt> {
    let content = std::fs::read_to_string(path)?;
    parse_receipt_json(&content)
}
