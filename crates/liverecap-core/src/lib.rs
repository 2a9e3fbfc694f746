//! Live Recap Core Types and Services
//!
//! This crate provides the building blocks shared by every Live Recap crate:
//! - Session record, reference list and filter types
//! - The `RecordStore` abstraction over the backing spreadsheet, plus an
//!   in-memory implementation
//! - Pure aggregation functions behind the dashboard
//! - Intake and reference-list services
//! - Core error types

pub mod aggregate;
pub mod clock;
pub mod error;
pub mod intake;
pub mod memory_store;
pub mod record_store;
pub mod reference;
pub mod row;
pub mod types;

pub use clock::{Clock, FixedClock, SystemClock};
pub use error::{Error, Result};
pub use memory_store::MemoryRecordStore;
pub use record_store::{RecordStore, Table};
