//! Huawei Cloud adapter error types

use f2c_cloud::CloudError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum HuaweiError {
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(String),

    #[error("IAM authentication failed: {0}")]
    AuthenticationFailed(String),

    #[error("IAM response carried no X-Subject-Token header")]
    MissingToken,

    #[error("Huawei Cloud API error: {0}")]
    ApiError(String),

    #[error("HTTP error: {0}")]
    HttpError(#[from] reqwest::Error),

    #[error("JSON parse error: {0}")]
    JsonError(#[from] serde_json::Error),

    #[error("Cloud error: {0}")]
    CloudError(#[from] f2c_cloud::CloudError),
}

impl From<HuaweiError> for CloudError {
    fn from(err: HuaweiError) -> Self {
        match err {
            HuaweiError::MissingEnvVar(name) => {
                CloudError::InvalidConfig(format!("missing environment variable {}", name))
            }
            HuaweiError::AuthenticationFailed(_) | HuaweiError::MissingToken => {
                CloudError::Connection(err.to_string())
            }
            HuaweiError::ApiError(msg) => CloudError::Api(msg),
            HuaweiError::HttpError(e) if e.is_timeout() => CloudError::Timeout(e.to_string()),
            HuaweiError::HttpError(e) if e.is_connect() => CloudError::Connection(e.to_string()),
            HuaweiError::HttpError(e) => CloudError::Api(e.to_string()),
            HuaweiError::JsonError(e) => CloudError::Json(e),
            HuaweiError::CloudError(e) => e,
        }
    }
}

pub type Result<T> = std::result::Result<T, HuaweiError>;
