//! vSphere adapter error types

use f2c_cloud::CloudError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum VsphereError {
    #[error("vCenter login failed: {0}")]
    LoginFailed(String),

    #[error("vCenter connection lost: {0}")]
    ConnectionLost(String),

    #[error("vSphere fault: {0}")]
    Fault(String),

    #[error("Virtual machine not found: {0}")]
    VmNotFound(String),

    #[error("Cluster not found: {0}")]
    ClusterNotFound(String),

    #[error("Disk not found: {0}")]
    DiskNotFound(String),

    #[error("Invalid disk request: {0}")]
    InvalidDiskRequest(String),

    #[error("Task timed out: {0}")]
    Timeout(String),

    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),

    #[error("Cloud error: {0}")]
    CloudError(#[from] f2c_cloud::CloudError),
}

impl From<VsphereError> for CloudError {
    fn from(err: VsphereError) -> Self {
        match err {
            VsphereError::LoginFailed(msg) | VsphereError::ConnectionLost(msg) => {
                CloudError::Connection(msg)
            }
            VsphereError::Timeout(msg) => CloudError::Timeout(msg),
            VsphereError::VmNotFound(id) => {
                CloudError::NotFound(format!("virtual machine {}", id))
            }
            VsphereError::ClusterNotFound(name) => {
                CloudError::NotFound(format!("cluster {}", name))
            }
            VsphereError::DiskNotFound(id) => CloudError::NotFound(format!("disk {}", id)),
            VsphereError::InvalidDiskRequest(msg) => CloudError::Validation(msg),
            VsphereError::Fault(msg) => CloudError::Api(msg),
            VsphereError::JsonError(e) => CloudError::Json(e),
            VsphereError::CloudError(e) => e,
        }
    }
}

pub type Result<T> = std::result::Result<T, VsphereError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_vendor_errors_keep_message() {
        let err: CloudError = VsphereError::Fault("InvalidPowerState".to_string()).into();
        assert!(matches!(err, CloudError::Api(ref m) if m == "InvalidPowerState"));

        let err: CloudError = VsphereError::LoginFailed("bad password".to_string()).into();
        assert!(err.is_connection());

        let err: CloudError = VsphereError::Timeout("ReconfigVM_Task".to_string()).into();
        assert!(matches!(err, CloudError::Timeout(_)));
    }
}
