//! Reference list administration
//!
//! Hosts live in column 1 of the setup table and shops in column 2, each
//! under a header cell. The lists only grow. Duplicate names are accepted as
//! they always have been; adding one is logged so it can be cleaned up in the
//! spreadsheet by hand.

use std::sync::Arc;
use tracing::{info, warn};

use crate::record_store::{RecordStore, Table};
use crate::row::reference_entries;
use crate::types::{ReferenceKind, ReferenceLists};
use crate::Result;

/// Read one reference list in stored order
pub async fn read_reference_list(store: &dyn RecordStore, kind: ReferenceKind) -> Result<Vec<String>> {
    let column = store.read_column(Table::Setup, kind.column()).await?;
    Ok(reference_entries(column))
}

/// Read both reference lists
pub async fn read_reference_lists(store: &dyn RecordStore) -> Result<ReferenceLists> {
    Ok(ReferenceLists {
        hosts: read_reference_list(store, ReferenceKind::Hosts).await?,
        shops: read_reference_list(store, ReferenceKind::Shops).await?,
    })
}

/// 1-indexed listing for display. The index is not stored anywhere.
pub fn numbered(list: &[String]) -> Vec<(usize, String)> {
    list.iter()
        .enumerate()
        .map(|(i, name)| (i + 1, name.clone()))
        .collect()
}

#[derive(Clone)]
pub struct ReferenceAdmin {
    store: Arc<dyn RecordStore>,
}

impl ReferenceAdmin {
    pub fn new(store: Arc<dyn RecordStore>) -> Self {
        Self { store }
    }

    /// Append a host name. Returns `false` when the name is blank and nothing was written.
    pub async fn add_host(&self, name: &str) -> Result<bool> {
        let name = name.trim();
        if name.is_empty() {
            return Ok(false);
        }
        let kind = ReferenceKind::Hosts;
        let cells = self.store.read_column(Table::Setup, kind.column()).await?;
        warn_if_duplicate(kind, &cells, name);

        self.store
            .append_row(Table::Setup, vec![name.into()])
            .await?;
        info!("Added host '{}'", name);
        Ok(true)
    }

    /// Append a shop name. Returns `false` when the name is blank and nothing was written.
    pub async fn add_shop(&self, name: &str) -> Result<bool> {
        let name = name.trim();
        if name.is_empty() {
            return Ok(false);
        }

        let kind = ReferenceKind::Shops;
        let cells = self.store.read_column(Table::Setup, kind.column()).await?;
        warn_if_duplicate(kind, &cells, name);

        // Column length includes the header, so the next free row is len + 1
        self.store
            .write_cell(Table::Setup, cells.len() + 1, kind.column(), name)
            .await?;
        info!("Added shop '{}'", name);
        Ok(true)
    }

    pub async fn hosts(&self) -> Result<Vec<String>> {
        read_reference_list(self.store.as_ref(), ReferenceKind::Hosts).await
    }

    pub async fn shops(&self) -> Result<Vec<String>> {
        read_reference_list(self.store.as_ref(), ReferenceKind::Shops).await
    }

    pub async fn lists(&self) -> Result<ReferenceLists> {
        read_reference_lists(self.store.as_ref()).await
    }
}

/// Whether `name` is already in a raw setup column (header included)
fn is_listed(cells: &[String], name: &str) -> bool {
    cells.iter().skip(1).any(|c| c.trim() == name)
}

fn warn_if_duplicate(kind: ReferenceKind, cells: &[String], name: &str) {
    if is_listed(cells, name) {
        warn!("{} already lists '{}', adding a duplicate", kind, name);
    }
}
