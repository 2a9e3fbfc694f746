//! In-memory `RecordStore`
//!
//! Keeps both tables as grids of strings guarded by an `RwLock`. Used by the
//! test suites and by the `memory` backend for local demos. Contents are lost
//! when the process exits.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::RwLock;
use tracing::debug;

use crate::record_store::{CellValue, RecordStore, Table};
use crate::row::{DATA_HEADER, SETUP_HEADER};
use crate::{Error, Result};

type Grid = Vec<Vec<String>>;

#[derive(Debug)]
pub struct MemoryRecordStore {
    tables: RwLock<HashMap<Table, Grid>>,
}

impl Default for MemoryRecordStore {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryRecordStore {
    /// Create a store whose tables hold only their header rows
    pub fn new() -> Self {
        let mut tables = HashMap::new();
        tables.insert(
            Table::Data,
            vec![DATA_HEADER.iter().map(|s| s.to_string()).collect()],
        );
        tables.insert(
            Table::Setup,
            vec![SETUP_HEADER.iter().map(|s| s.to_string()).collect()],
        );
        Self {
            tables: RwLock::new(tables),
        }
    }

    /// Create a store with pre-populated reference lists
    pub fn with_references(hosts: &[&str], shops: &[&str]) -> Self {
        let store = Self::new();
        if let Ok(mut tables) = store.tables.write() {
            let setup = tables.entry(Table::Setup).or_default();
            let rows = hosts.len().max(shops.len());
            for i in 0..rows {
                setup.push(vec![
                    hosts.get(i).map(|s| s.to_string()).unwrap_or_default(),
                    shops.get(i).map(|s| s.to_string()).unwrap_or_default(),
                ]);
            }
            trim_row_ends(setup);
        }
        store
    }

    /// Number of rows in `table`, header included
    pub fn row_count(&self, table: Table) -> usize {
        self.tables
            .read()
            .map(|tables| tables.get(&table).map_or(0, Vec::len))
            .unwrap_or(0)
    }

    fn poisoned() -> Error {
        Error::StoreUnavailable("memory store lock poisoned".to_string())
    }
}

/// Drop trailing empty cells so rows read back the way a spreadsheet returns them
fn trim_row_ends(grid: &mut Grid) {
    for row in grid.iter_mut() {
        while row.last().is_some_and(|c| c.is_empty()) {
            row.pop();
        }
    }
}

fn last_non_empty_row(grid: &Grid) -> usize {
    grid.iter()
        .rposition(|row| row.iter().any(|c| !c.is_empty()))
        .map_or(0, |i| i + 1)
}

#[async_trait]
impl RecordStore for MemoryRecordStore {
    async fn append_row(&self, table: Table, row: Vec<CellValue>) -> Result<()> {
        let mut tables = self.tables.write().map_err(|_| Self::poisoned())?;
        let grid = tables.entry(table).or_default();
        let last = last_non_empty_row(grid);
        grid.truncate(last);
        grid.push(row.iter().map(CellValue::to_cell_string).collect());
        trim_row_ends(grid);
        debug!("Appended row {} to {} table", grid.len(), table);
        Ok(())
    }

    async fn read_all(&self, table: Table) -> Result<Vec<Vec<String>>> {
        let tables = self.tables.read().map_err(|_| Self::poisoned())?;
        let grid = tables.get(&table).cloned().unwrap_or_default();
        let last = last_non_empty_row(&grid);
        Ok(grid.into_iter().take(last).collect())
    }

    async fn read_column(&self, table: Table, column: usize) -> Result<Vec<String>> {
        if column == 0 {
            return Err(Error::Validation("columns are 1-based".to_string()));
        }
        let tables = self.tables.read().map_err(|_| Self::poisoned())?;
        let Some(grid) = tables.get(&table) else {
            return Ok(Vec::new());
        };

        let mut cells: Vec<String> = grid
            .iter()
            .map(|row| row.get(column - 1).cloned().unwrap_or_default())
            .collect();
        while cells.last().is_some_and(|c| c.is_empty()) {
            cells.pop();
        }
        Ok(cells)
    }

    async fn write_cell(&self, table: Table, row: usize, column: usize, value: &str) -> Result<()> {
        if row == 0 || column == 0 {
            return Err(Error::Validation("rows and columns are 1-based".to_string()));
        }
        let mut tables = self.tables.write().map_err(|_| Self::poisoned())?;
        let grid = tables.entry(table).or_default();
        if grid.len() < row {
            grid.resize(row, Vec::new());
        }
        let cells = &mut grid[row - 1];
        if cells.len() < column {
            cells.resize(column, String::new());
        }
        cells[column - 1] = value.to_string();
        trim_row_ends(grid);
        debug!("Wrote {} table cell R{}C{}", table, row, column);
        Ok(())
    }

    fn backend_name(&self) -> &'static str {
        "memory"
    }
}
