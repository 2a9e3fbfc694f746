//! Record store trait
//!
//! The `RecordStore` trait abstracts the spreadsheet that backs Live Recap.
//! It exposes two tables:
//! - `Table::Data`: one session record per row
//! - `Table::Setup`: host names in column 1, shop names in column 2
//!
//! Row 1 of both tables is a header. Rows and columns are 1-based, matching
//! spreadsheet addressing.
//!
//! Implementations:
//! - `MemoryRecordStore`: in-process tables (tests, demos)
//! - `SheetsRecordStore` (liverecap-sheets): Google Sheets over REST

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::Result;

/// Logical table inside the store
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Table {
    Data,
    Setup,
}

impl fmt::Display for Table {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Table::Data => write!(f, "data"),
            Table::Setup => write!(f, "setup"),
        }
    }
}

/// A cell value written to the store
///
/// Serialized untagged so a row becomes a plain JSON array of strings and numbers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CellValue {
    Integer(i64),
    Text(String),
}

impl CellValue {
    /// Cell as it reads back from a spreadsheet
    pub fn to_cell_string(&self) -> String {
        match self {
            CellValue::Integer(n) => n.to_string(),
            CellValue::Text(s) => s.clone(),
        }
    }
}

impl From<&str> for CellValue {
    fn from(value: &str) -> Self {
        CellValue::Text(value.to_string())
    }
}

impl From<String> for CellValue {
    fn from(value: String) -> Self {
        CellValue::Text(value)
    }
}

impl From<i64> for CellValue {
    fn from(value: i64) -> Self {
        CellValue::Integer(value)
    }
}

/// Record store trait
///
/// Every call is performed once; implementations do not retry.
///
/// # Errors
/// All methods return `Error::StoreUnavailable` when the backing store cannot be
/// reached or rejects the request.
#[async_trait]
pub trait RecordStore: Send + Sync {
    /// Append a row after the last non-empty row of `table`
    async fn append_row(&self, table: Table, row: Vec<CellValue>) -> Result<()>;

    /// Read every row of `table`, header included
    ///
    /// Trailing empty cells of a row may be omitted.
    async fn read_all(&self, table: Table) -> Result<Vec<Vec<String>>>;

    /// Read one column from row 1 through its last non-empty cell
    ///
    /// Empty cells before the last non-empty one are returned as `""`.
    async fn read_column(&self, table: Table, column: usize) -> Result<Vec<String>>;

    /// Overwrite a single cell, growing the table as needed
    async fn write_cell(&self, table: Table, row: usize, column: usize, value: &str) -> Result<()>;

    /// Backend name for logs and health output
    fn backend_name(&self) -> &'static str;
}
