use liverecap_ui::UiConfig;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    FileRead(String),

    #[error("Failed to parse config file: {0}")]
    ParseError(String),

    #[error("Invalid configuration: {0}")]
    ValidationError(String),
}

/// Which record store backs the app
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum StoreBackend {
    /// Process-local tables, lost on restart
    #[default]
    Memory,
    /// Google Sheets spreadsheet with `Data` and `Setup` tabs
    Sheets,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,

    #[serde(default = "default_port")]
    pub port: u16,

    #[serde(default)]
    pub store: StoreConfig,

    #[serde(default)]
    pub logging: LoggingConfig,

    #[serde(default)]
    pub ui: UiConfig,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StoreConfig {
    #[serde(default)]
    pub backend: StoreBackend,

    #[serde(default)]
    pub sheets: SheetsSettings,

    /// Seed lists for the memory backend
    #[serde(default)]
    pub memory: MemorySeed,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SheetsSettings {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub spreadsheet_id: Option<String>,

    #[serde(default = "default_data_sheet")]
    pub data_sheet: String,

    #[serde(default = "default_setup_sheet")]
    pub setup_sheet: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub base_url: Option<String>,

    /// OAuth bearer token with spreadsheet scope
    #[serde(skip_serializing_if = "Option::is_none")]
    pub access_token: Option<String>,

    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MemorySeed {
    #[serde(default)]
    pub hosts: Vec<String>,

    #[serde(default)]
    pub shops: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Let hyper/reqwest log below warn
    #[serde(default = "default_false")]
    pub log_http_client: bool,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            store: StoreConfig::default(),
            logging: LoggingConfig::default(),
            ui: UiConfig::default(),
        }
    }
}

impl Default for SheetsSettings {
    fn default() -> Self {
        Self {
            spreadsheet_id: None,
            data_sheet: default_data_sheet(),
            setup_sheet: default_setup_sheet(),
            base_url: None,
            access_token: None,
            timeout_secs: default_timeout_secs(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            log_http_client: false,
        }
    }
}

impl ServerConfig {
    /// Load from a YAML or TOML file, picked by extension. `~` is expanded.
    pub fn from_file(path: &str) -> Result<Self, ConfigError> {
        let expanded_path = shellexpand::tilde(path);
        let path = PathBuf::from(expanded_path.as_ref());

        let contents = std::fs::read_to_string(&path).map_err(|e| {
            ConfigError::FileRead(format!("Failed to read {}: {}", path.display(), e))
        })?;

        let config = if path.extension().and_then(|s| s.to_str()) == Some("toml") {
            toml::from_str(&contents)
                .map_err(|e| ConfigError::ParseError(format!("TOML parse error: {}", e)))?
        } else {
            // Default to YAML
            serde_yaml::from_str(&contents)
                .map_err(|e| ConfigError::ParseError(format!("YAML parse error: {}", e)))?
        };

        Ok(config)
    }

    /// Merge environment variables into config (env vars take precedence)
    pub fn merge_env(&mut self) {
        // Store settings
        if let Ok(val) = std::env::var("LIVERECAP_STORE") {
            match val.to_lowercase().as_str() {
                "memory" => self.store.backend = StoreBackend::Memory,
                "sheets" => self.store.backend = StoreBackend::Sheets,
                _ => eprintln!("Warning: Invalid LIVERECAP_STORE '{}', keeping configured backend", val),
            }
        }

        if let Ok(val) = std::env::var("LIVERECAP_SPREADSHEET_ID") {
            self.store.sheets.spreadsheet_id = Some(val);
        }

        if let Ok(val) = std::env::var("LIVERECAP_SHEETS_TOKEN") {
            self.store.sheets.access_token = Some(val);
        }

        if let Ok(val) = std::env::var("LIVERECAP_SHEETS_BASE_URL") {
            self.store.sheets.base_url = Some(val);
        }

        // Logging settings
        if let Ok(val) = std::env::var("LIVERECAP_LOG_LEVEL") {
            self.logging.level = val;
        }

        // Server settings
        if let Ok(val) = std::env::var("LIVERECAP_PORT") {
            if let Ok(port) = val.parse::<u16>() {
                self.port = port;
            }
        }

        if let Ok(val) = std::env::var("LIVERECAP_HOST") {
            self.host = val;
        }
    }

    /// Check the settings the selected backend needs
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.store.backend == StoreBackend::Sheets {
            let sheets = &self.store.sheets;
            if sheets.spreadsheet_id.as_deref().is_none_or(|s| s.trim().is_empty()) {
                return Err(ConfigError::ValidationError(
                    "store.sheets.spreadsheet_id is required when backend is 'sheets'".to_string(),
                ));
            }
            if sheets.access_token.as_deref().is_none_or(|s| s.trim().is_empty()) {
                return Err(ConfigError::ValidationError(
                    "store.sheets.access_token is required when backend is 'sheets'".to_string(),
                ));
            }
        }

        if self.ui.top_n == 0 {
            return Err(ConfigError::ValidationError(
                "ui.top_n must be at least 1".to_string(),
            ));
        }

        Ok(())
    }
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    8501
}

fn default_data_sheet() -> String {
    "Data".to_string()
}

fn default_setup_sheet() -> String {
    "Setup".to_string()
}

fn default_timeout_secs() -> u64 {
    30
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_false() -> bool {
    false
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;
    use std::io::Write;

    const ENV_VARS: [&str; 7] = [
        "LIVERECAP_HOST",
        "LIVERECAP_PORT",
        "LIVERECAP_LOG_LEVEL",
        "LIVERECAP_STORE",
        "LIVERECAP_SPREADSHEET_ID",
        "LIVERECAP_SHEETS_TOKEN",
        "LIVERECAP_SHEETS_BASE_URL",
    ];

    fn clear_env() {
        for var in ENV_VARS {
            unsafe { std::env::remove_var(var) };
        }
    }

    fn write_config(suffix: &str, contents: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::Builder::new().suffix(suffix).tempfile().unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        file
    }

    #[test]
    fn test_default_config() {
        let config = ServerConfig::default();
        assert_eq!(config.host, "127.0.0.1");
        assert_eq!(config.port, 8501);
        assert_eq!(config.store.backend, StoreBackend::Memory);
        assert_eq!(config.store.sheets.data_sheet, "Data");
        assert_eq!(config.logging.level, "info");
        assert_eq!(config.ui.top_n, 3);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_load_yaml() {
        let file = write_config(
            ".yaml",
            r#"
port: 9000
store:
  backend: sheets
  sheets:
    spreadsheet_id: abc123
    access_token: token
    setup_sheet: Lists
logging:
  level: debug
  log_http_client: true
ui:
  currency_prefix: IDR
"#,
        );

        let config = ServerConfig::from_file(file.path().to_str().unwrap()).unwrap();
        assert_eq!(config.port, 9000);
        assert_eq!(config.host, "127.0.0.1");
        assert_eq!(config.store.backend, StoreBackend::Sheets);
        assert_eq!(config.store.sheets.spreadsheet_id.as_deref(), Some("abc123"));
        assert_eq!(config.store.sheets.setup_sheet, "Lists");
        assert_eq!(config.store.sheets.data_sheet, "Data");
        assert!(config.logging.log_http_client);
        assert_eq!(config.ui.currency_prefix, "IDR");
        assert_eq!(config.ui.title, "Live Recap");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_load_toml() {
        let file = write_config(
            ".toml",
            r#"
host = "0.0.0.0"

[store]
backend = "memory"

[store.memory]
hosts = ["Ann", "Bob"]
shops = ["ShopA"]
"#,
        );

        let config = ServerConfig::from_file(file.path().to_str().unwrap()).unwrap();
        assert_eq!(config.host, "0.0.0.0");
        assert_eq!(config.store.memory.hosts, vec!["Ann", "Bob"]);
        assert_eq!(config.store.memory.shops, vec!["ShopA"]);
    }

    #[test]
    fn test_missing_file() {
        let err = ServerConfig::from_file("/nonexistent/liverecap.yaml").unwrap_err();
        assert!(matches!(err, ConfigError::FileRead(_)));
    }

    #[test]
    fn test_malformed_yaml() {
        let file = write_config(".yaml", "port: [not a port");
        let err = ServerConfig::from_file(file.path().to_str().unwrap()).unwrap_err();
        assert!(matches!(err, ConfigError::ParseError(_)));
    }

    #[test]
    fn test_sheets_backend_requires_id_and_token() {
        let mut config = ServerConfig::default();
        config.store.backend = StoreBackend::Sheets;
        assert!(config.validate().is_err());

        config.store.sheets.spreadsheet_id = Some("abc123".to_string());
        assert!(config.validate().is_err());

        config.store.sheets.access_token = Some("  ".to_string());
        assert!(config.validate().is_err());

        config.store.sheets.access_token = Some("token".to_string());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_zero_top_n_rejected() {
        let mut config = ServerConfig::default();
        config.ui.top_n = 0;
        assert!(matches!(
            config.validate(),
            Err(ConfigError::ValidationError(_))
        ));
    }

    #[test]
    #[serial]
    fn test_merge_env_overrides() {
        clear_env();
        unsafe {
            std::env::set_var("LIVERECAP_PORT", "9100");
            std::env::set_var("LIVERECAP_HOST", "0.0.0.0");
            std::env::set_var("LIVERECAP_STORE", "Sheets");
            std::env::set_var("LIVERECAP_SPREADSHEET_ID", "from-env");
            std::env::set_var("LIVERECAP_SHEETS_TOKEN", "secret");
            std::env::set_var("LIVERECAP_SHEETS_BASE_URL", "http://localhost:9999");
            std::env::set_var("LIVERECAP_LOG_LEVEL", "trace");
        }

        let mut config = ServerConfig::default();
        config.merge_env();
        clear_env();

        assert_eq!(config.port, 9100);
        assert_eq!(config.host, "0.0.0.0");
        assert_eq!(config.store.backend, StoreBackend::Sheets);
        assert_eq!(config.store.sheets.spreadsheet_id.as_deref(), Some("from-env"));
        assert_eq!(config.store.sheets.access_token.as_deref(), Some("secret"));
        assert_eq!(
            config.store.sheets.base_url.as_deref(),
            Some("http://localhost:9999")
        );
        assert_eq!(config.logging.level, "trace");
    }

    #[test]
    #[serial]
    fn test_merge_env_ignores_bad_values() {
        clear_env();
        unsafe {
            std::env::set_var("LIVERECAP_PORT", "not-a-port");
            std::env::set_var("LIVERECAP_STORE", "postgres");
        }

        let mut config = ServerConfig::default();
        config.merge_env();
        clear_env();

        assert_eq!(config.port, 8501);
        assert_eq!(config.store.backend, StoreBackend::Memory);
    }
}
