//! Sheets v4 `RecordStore` implementation

use async_trait::async_trait;
use liverecap_core::record_store::{CellValue, RecordStore, Table};
use reqwest::{Client, Response, Url};
use serde::Deserialize;
use serde_json::json;
use tracing::{debug, error, info, instrument};

use crate::client::{HttpClientConfig, create_client};
use crate::{Result, SheetsError};

pub const DEFAULT_BASE_URL: &str = "https://sheets.googleapis.com";

/// Sheets backend configuration
#[derive(Debug, Clone)]
pub struct SheetsConfig {
    /// Spreadsheet id from the sheet URL
    pub spreadsheet_id: String,

    /// Worksheet holding session records
    pub data_sheet: String,

    /// Worksheet holding the host and shop lists
    pub setup_sheet: String,

    /// OAuth bearer token with the spreadsheets scope
    pub access_token: String,

    /// API root (default: https://sheets.googleapis.com)
    pub base_url: String,

    pub client_config: HttpClientConfig,
}

impl SheetsConfig {
    pub fn new(spreadsheet_id: impl Into<String>, access_token: impl Into<String>) -> Self {
        Self {
            spreadsheet_id: spreadsheet_id.into(),
            data_sheet: "Data".to_string(),
            setup_sheet: "Setup".to_string(),
            access_token: access_token.into(),
            base_url: DEFAULT_BASE_URL.to_string(),
            client_config: HttpClientConfig::default(),
        }
    }

    /// Set the base URL (for proxies and tests)
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    pub fn with_sheets(mut self, data_sheet: impl Into<String>, setup_sheet: impl Into<String>) -> Self {
        self.data_sheet = data_sheet.into();
        self.setup_sheet = setup_sheet.into();
        self
    }
}

/// Body of a `values.get` response
#[derive(Debug, Deserialize)]
struct ValueRange {
    #[serde(default)]
    values: Vec<Vec<serde_json::Value>>,
}

/// Google Sheets record store
pub struct SheetsRecordStore {
    config: SheetsConfig,
    client: Client,
}

impl SheetsRecordStore {
    pub fn new(config: SheetsConfig) -> Result<Self> {
        if config.spreadsheet_id.trim().is_empty() {
            return Err(SheetsError::Config("spreadsheet id is empty".to_string()));
        }
        if config.access_token.trim().is_empty() {
            return Err(SheetsError::Config("access token is empty".to_string()));
        }
        Url::parse(&config.base_url)
            .map_err(|e| SheetsError::Config(format!("Invalid base URL '{}': {}", config.base_url, e)))?;

        let client = create_client(&config.client_config)?;
        info!(
            "Initialized Sheets record store for spreadsheet {} ({} / {})",
            config.spreadsheet_id, config.data_sheet, config.setup_sheet
        );
        Ok(Self { config, client })
    }

    fn sheet_name(&self, table: Table) -> &str {
        match table {
            Table::Data => &self.config.data_sheet,
            Table::Setup => &self.config.setup_sheet,
        }
    }

    /// `.../v4/spreadsheets/{id}/values/{range}` with `range` as a single path segment
    fn values_url(&self, range: &str, query: &[(&str, &str)]) -> Result<Url> {
        let mut url = Url::parse(&self.config.base_url)
            .map_err(|e| SheetsError::Config(format!("Invalid base URL: {}", e)))?;
        url.path_segments_mut()
            .map_err(|_| SheetsError::Config("base URL cannot carry a path".to_string()))?
            .pop_if_empty()
            .extend(["v4", "spreadsheets", self.config.spreadsheet_id.as_str(), "values", range]);
        if !query.is_empty() {
            url.query_pairs_mut().extend_pairs(query);
        }
        Ok(url)
    }

    async fn get_values(&self, range: &str, query: &[(&str, &str)]) -> Result<ValueRange> {
        let url = self.values_url(range, query)?;
        let response = self
            .client
            .get(url)
            .header("Authorization", format!("Bearer {}", self.config.access_token))
            .send()
            .await?;
        let response = check_status(response).await?;
        response
            .json::<ValueRange>()
            .await
            .map_err(|e| SheetsError::InvalidResponse(e.to_string()))
    }

    async fn append(&self, table: Table, row: Vec<CellValue>) -> Result<()> {
        let range = format!("{}!A1:append", a1_sheet(self.sheet_name(table)));
        let url = self.values_url(
            &range,
            &[("valueInputOption", "RAW"), ("insertDataOption", "INSERT_ROWS")],
        )?;
        let response = self
            .client
            .post(url)
            .header("Authorization", format!("Bearer {}", self.config.access_token))
            .json(&json!({ "values": [row] }))
            .send()
            .await?;
        check_status(response).await?;
        Ok(())
    }

    async fn update_cell(&self, table: Table, row: usize, column: usize, value: &str) -> Result<()> {
        let range = format!(
            "{}!{}{}",
            a1_sheet(self.sheet_name(table)),
            column_letters(column),
            row
        );
        let url = self.values_url(&range, &[("valueInputOption", "RAW")])?;
        let response = self
            .client
            .put(url)
            .header("Authorization", format!("Bearer {}", self.config.access_token))
            .json(&json!({ "range": range, "values": [[value]] }))
            .send()
            .await?;
        check_status(response).await?;
        Ok(())
    }
}

async fn check_status(response: Response) -> Result<Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let status_code = status.as_u16();
    if status_code == 401 || status_code == 403 {
        error!("Sheets API rejected credentials: {}", status);
        return Err(SheetsError::Unauthorized { status_code });
    }

    let message = response
        .text()
        .await
        .unwrap_or_else(|_| "Unable to read error body".to_string());
    error!("Sheets API error {}: {}", status_code, message);
    Err(SheetsError::Status {
        status_code,
        message,
    })
}

/// Sheet name as used in A1 notation, quoted when it holds anything but letters and digits
fn a1_sheet(name: &str) -> String {
    if name.chars().all(|c| c.is_ascii_alphanumeric() || c == '_') {
        name.to_string()
    } else {
        format!("'{}'", name.replace('\'', "''"))
    }
}

/// 1 -> A, 26 -> Z, 27 -> AA
fn column_letters(mut column: usize) -> String {
    let mut letters = Vec::new();
    while column > 0 {
        let rem = (column - 1) % 26;
        letters.push(b'A' + rem as u8);
        column = (column - 1) / 26;
    }
    letters.reverse();
    String::from_utf8(letters).unwrap_or_default()
}

fn cell_to_string(value: &serde_json::Value) -> String {
    match value {
        serde_json::Value::String(s) => s.clone(),
        serde_json::Value::Null => String::new(),
        other => other.to_string(),
    }
}

#[async_trait]
impl RecordStore for SheetsRecordStore {
    #[instrument(skip(self, row))]
    async fn append_row(&self, table: Table, row: Vec<CellValue>) -> liverecap_core::Result<()> {
        self.append(table, row).await?;
        debug!("Appended row to {} sheet", self.sheet_name(table));
        Ok(())
    }

    #[instrument(skip(self))]
    async fn read_all(&self, table: Table) -> liverecap_core::Result<Vec<Vec<String>>> {
        let range = a1_sheet(self.sheet_name(table));
        let values = self.get_values(&range, &[]).await?;
        debug!("Read {} rows from {} sheet", values.values.len(), range);
        Ok(values
            .values
            .iter()
            .map(|row| row.iter().map(cell_to_string).collect())
            .collect())
    }

    #[instrument(skip(self))]
    async fn read_column(&self, table: Table, column: usize) -> liverecap_core::Result<Vec<String>> {
        if column == 0 {
            return Err(liverecap_core::Error::Validation("columns are 1-based".to_string()));
        }
        let letters = column_letters(column);
        let range = format!("{}!{}:{}", a1_sheet(self.sheet_name(table)), letters, letters);
        let values = self
            .get_values(&range, &[("majorDimension", "COLUMNS")])
            .await?;

        let mut cells: Vec<String> = values
            .values
            .first()
            .map(|col| col.iter().map(cell_to_string).collect())
            .unwrap_or_default();
        while cells.last().is_some_and(|c| c.is_empty()) {
            cells.pop();
        }
        Ok(cells)
    }

    #[instrument(skip(self, value))]
    async fn write_cell(
        &self,
        table: Table,
        row: usize,
        column: usize,
        value: &str,
    ) -> liverecap_core::Result<()> {
        if row == 0 || column == 0 {
            return Err(liverecap_core::Error::Validation(
                "rows and columns are 1-based".to_string(),
            ));
        }
        self.update_cell(table, row, column, value).await?;
        Ok(())
    }

    fn backend_name(&self) -> &'static str {
        "sheets"
    }
}
