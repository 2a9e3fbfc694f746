//! Record store factory
//!
//! Builds the `RecordStore` selected by `store.backend`.

use crate::config::{StoreBackend, StoreConfig};
use liverecap_core::{MemoryRecordStore, RecordStore, Result};
use liverecap_sheets::{HttpClientConfig, SheetsConfig, SheetsRecordStore};
use std::sync::Arc;

/// Create a record store based on configuration
///
/// # Errors
/// - `Error::Config` if the sheets backend is missing its spreadsheet id or token
pub fn create_record_store(config: &StoreConfig) -> Result<Arc<dyn RecordStore>> {
    match config.backend {
        StoreBackend::Memory => {
            let hosts: Vec<&str> = config.memory.hosts.iter().map(String::as_str).collect();
            let shops: Vec<&str> = config.memory.shops.iter().map(String::as_str).collect();
            tracing::info!(
                "Initializing in-memory record store ({} hosts, {} shops seeded)",
                hosts.len(),
                shops.len()
            );
            Ok(Arc::new(MemoryRecordStore::with_references(&hosts, &shops)))
        }
        StoreBackend::Sheets => {
            let settings = &config.sheets;
            let spreadsheet_id = settings.spreadsheet_id.clone().unwrap_or_default();
            let access_token = settings.access_token.clone().unwrap_or_default();

            let mut sheets = SheetsConfig::new(spreadsheet_id, access_token)
                .with_sheets(&settings.data_sheet, &settings.setup_sheet);
            if let Some(base_url) = &settings.base_url {
                sheets = sheets.with_base_url(base_url);
            }
            sheets.client_config = HttpClientConfig {
                timeout_secs: settings.timeout_secs,
                ..HttpClientConfig::default()
            };

            tracing::info!(
                "Initializing Google Sheets record store (spreadsheet={}, data={}, setup={})",
                sheets.spreadsheet_id,
                sheets.data_sheet,
                sheets.setup_sheet
            );

            let store = SheetsRecordStore::new(sheets)?;
            Ok(Arc::new(store))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use liverecap_core::reference::read_reference_lists;
    use liverecap_core::{Error, Table};

    #[tokio::test]
    async fn test_memory_store_is_seeded() {
        let mut config = StoreConfig::default();
        config.memory.hosts = vec!["Ann".to_string(), "Bob".to_string()];
        config.memory.shops = vec!["ShopA".to_string()];

        let store = create_record_store(&config).unwrap();
        assert_eq!(store.backend_name(), "memory");

        let lists = read_reference_lists(store.as_ref()).await.unwrap();
        assert_eq!(lists.hosts, vec!["Ann", "Bob"]);
        assert_eq!(lists.shops, vec!["ShopA"]);
        assert_eq!(store.read_all(Table::Data).await.unwrap().len(), 1);
    }

    #[test]
    fn test_sheets_store_built_from_settings() {
        let mut config = StoreConfig {
            backend: StoreBackend::Sheets,
            ..StoreConfig::default()
        };
        config.sheets.spreadsheet_id = Some("abc123".to_string());
        config.sheets.access_token = Some("token".to_string());
        config.sheets.base_url = Some("http://localhost:9999".to_string());

        let store = create_record_store(&config).unwrap();
        assert_eq!(store.backend_name(), "sheets");
    }

    #[test]
    fn test_sheets_store_without_token_is_config_error() {
        let mut config = StoreConfig {
            backend: StoreBackend::Sheets,
            ..StoreConfig::default()
        };
        config.sheets.spreadsheet_id = Some("abc123".to_string());

        assert!(matches!(create_record_store(&config), Err(Error::Config(_))));
    }
}
