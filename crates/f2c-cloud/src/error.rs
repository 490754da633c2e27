//! Adapter-level error types
//!
//! Vendor crates convert their own errors into [`CloudError`] at the adapter
//! boundary, so callers never handle vendor-native failures.

use thiserror::Error;

/// Cloud adapter errors
#[derive(Error, Debug)]
pub enum CloudError {
    #[error("Provider not found: {0}")]
    ProviderNotFound(String),

    #[error("Connection failed: {0}")]
    Connection(String),

    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("Mapping failed: {0}")]
    Mapping(String),

    #[error("Resource not found: {0}")]
    NotFound(String),

    #[error("API error: {0}")]
    Api(String),

    #[error("Timeout: {0}")]
    Timeout(String),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

impl CloudError {
    /// Whether the vendor mutation was refused before being attempted
    pub fn is_validation(&self) -> bool {
        matches!(self, CloudError::Validation(_))
    }

    pub fn is_connection(&self) -> bool {
        matches!(self, CloudError::Connection(_) | CloudError::Timeout(_))
    }
}

pub type Result<T> = std::result::Result<T, CloudError>;
