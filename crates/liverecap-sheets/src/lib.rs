//! Google Sheets backend for Live Recap
//!
//! Implements `RecordStore` against the Sheets v4 REST API. The data table and
//! the setup table are two worksheets of one spreadsheet. Requests carry a
//! pre-issued OAuth bearer token; minting and refreshing it is left to the
//! deployment.
//!
//! # Example
//! ```no_run
//! # use liverecap_sheets::{SheetsConfig, SheetsRecordStore};
//! # use liverecap_core::{RecordStore, Table};
//! # async fn example() -> liverecap_core::Result<()> {
//! let config = SheetsConfig::new("1AbCdEf", "ya29.token");
//! let store = SheetsRecordStore::new(config)?;
//! let rows = store.read_all(Table::Data).await?;
//! # Ok(())
//! # }
//! ```

pub mod client;
mod error;
mod sheets_store;

pub use client::HttpClientConfig;
pub use error::{Result, SheetsError};
pub use sheets_store::{SheetsConfig, SheetsRecordStore};
