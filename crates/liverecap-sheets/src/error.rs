//! Errors raised by the Sheets backend

use thiserror::Error;

#[derive(Debug, Error)]
pub enum SheetsError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Sheets API returned {status_code}: {message}")]
    Status { status_code: u16, message: String },

    #[error("Sheets API rejected the credentials ({status_code})")]
    Unauthorized { status_code: u16 },

    #[error("Unexpected Sheets API response: {0}")]
    InvalidResponse(String),

    #[error("Configuration error: {0}")]
    Config(String),
}

pub type Result<T> = std::result::Result<T, SheetsError>;

impl From<SheetsError> for liverecap_core::Error {
    fn from(err: SheetsError) -> Self {
        match err {
            SheetsError::Config(msg) => liverecap_core::Error::Config(msg),
            other => liverecap_core::Error::StoreUnavailable(other.to_string()),
        }
    }
}
