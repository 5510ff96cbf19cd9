use thiserror::Error;

/// Unified error type for domain, service, and storage layers.
#[derive(Debug, Error)]
pub enum LedgerError {
    #[error("Not authenticated")]
    NotAuthenticated,
    #[error("Validation failed: {0}")]
    Validation(String),
    #[error("Record not found: {collection}/{id}")]
    NotFound {
        collection: &'static str,
        id: String,
    },
    #[error("Persistence error: {0}")]
    Persistence(String),
    #[error("Configuration error: {0}")]
    Config(String),
}

pub type Result<T> = std::result::Result<T, LedgerError>;

impl From<std::io::Error> for LedgerError {
    fn from(err: std::io::Error) -> Self {
        LedgerError::Persistence(err.to_string())
    }
}

impl From<serde_json::Error> for LedgerError {
    fn from(err: serde_json::Error) -> Self {
        LedgerError::Persistence(err.to_string())
    }
}
