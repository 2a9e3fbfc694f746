//! Session intake
//!
//! Validates one submitted session and appends it to the data table with
//! today's date. All checks run before the write, so a rejected submission
//! never leaves a partial row behind.

use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{info, warn};

use crate::clock::Clock;
use crate::record_store::{RecordStore, Table};
use crate::reference::read_reference_lists;
use crate::row::encode_record;
use crate::types::{ReferenceKind, ReferenceLists, SessionRecord};
use crate::{Error, Result};

/// Form input as submitted, before validation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewSession {
    pub host: String,
    pub shop: String,
    pub duration_minutes: i64,
    pub revenue: i64,
    pub video_count: i64,
}

impl Default for NewSession {
    /// Values the intake form starts from
    fn default() -> Self {
        Self {
            host: String::new(),
            shop: String::new(),
            duration_minutes: 1,
            revenue: 0,
            video_count: 0,
        }
    }
}

#[derive(Clone)]
pub struct IntakeService {
    store: Arc<dyn RecordStore>,
    clock: Arc<dyn Clock>,
}

impl IntakeService {
    pub fn new(store: Arc<dyn RecordStore>, clock: Arc<dyn Clock>) -> Self {
        Self { store, clock }
    }

    /// Reference lists to offer on the form
    ///
    /// # Errors
    /// - `Error::ReferenceListEmpty` if there are no hosts or no shops
    /// - `Error::StoreUnavailable` if the setup table cannot be read
    pub async fn choices(&self) -> Result<ReferenceLists> {
        let lists = read_reference_lists(self.store.as_ref()).await?;
        for kind in [ReferenceKind::Hosts, ReferenceKind::Shops] {
            if lists.get(kind).is_empty() {
                return Err(Error::ReferenceListEmpty(kind));
            }
        }
        Ok(lists)
    }

    /// Validate and append one session dated today
    ///
    /// Performs exactly one `append_row` on success and none on failure.
    pub async fn submit(&self, input: NewSession) -> Result<SessionRecord> {
        let lists = self.choices().await?;
        let record = validate(input, &lists, self.clock.today())?;

        let row = encode_record(&record)?;
        self.store.append_row(Table::Data, row).await?;
        info!(
            "Recorded session for {} at {} ({} min, revenue {}, {} videos)",
            record.host, record.shop, record.duration_minutes, record.revenue, record.video_count
        );
        Ok(record)
    }
}

fn validate(
    input: NewSession,
    lists: &ReferenceLists,
    today: chrono::NaiveDate,
) -> Result<SessionRecord> {
    let host = input.host.trim();
    let shop = input.shop.trim();

    if host.is_empty() {
        return Err(Error::Validation("Host is required".to_string()));
    }
    if shop.is_empty() {
        return Err(Error::Validation("Shop is required".to_string()));
    }
    if !lists.hosts.iter().any(|h| h == host) {
        warn!("Rejected intake for unknown host '{}'", host);
        return Err(Error::Validation(format!("Unknown host '{}'", host)));
    }
    if !lists.shops.iter().any(|s| s == shop) {
        warn!("Rejected intake for unknown shop '{}'", shop);
        return Err(Error::Validation(format!("Unknown shop '{}'", shop)));
    }

    let duration_minutes = u32::try_from(input.duration_minutes)
        .ok()
        .filter(|d| *d >= 1)
        .ok_or_else(|| Error::Validation("Duration must be at least 1 minute".to_string()))?;
    let revenue = u64::try_from(input.revenue)
        .map_err(|_| Error::Validation("Revenue cannot be negative".to_string()))?;
    let video_count = u32::try_from(input.video_count)
        .map_err(|_| Error::Validation("Video count cannot be negative".to_string()))?;

    Ok(SessionRecord {
        date: today,
        host: host.to_string(),
        shop: shop.to_string(),
        duration_minutes,
        revenue,
        video_count,
    })
}
