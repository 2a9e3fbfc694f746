//! Error types for Live Recap Core

use thiserror::Error;

use crate::types::ReferenceKind;

#[derive(Debug, Error)]
pub enum Error {
    /// Malformed filter, date or form input
    #[error("Validation error: {0}")]
    Validation(String),

    /// Intake attempted while a reference list has nothing to choose from
    #[error("No {0} configured yet, add some on the setup page first")]
    ReferenceListEmpty(ReferenceKind),

    /// Backing store unreachable or rejected our credentials
    #[error("Record store unavailable: {0}")]
    StoreUnavailable(String),

    #[error("Configuration error: {0}")]
    Config(String),
}

impl Error {
    /// Conditions shown to the user as an inline warning rather than a failed page
    pub fn is_user_facing(&self) -> bool {
        matches!(self, Error::Validation(_) | Error::ReferenceListEmpty(_))
    }
}

pub type Result<T> = std::result::Result<T, Error>;
