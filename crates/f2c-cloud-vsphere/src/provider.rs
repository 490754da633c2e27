//! vSphere provider

use crate::credential::VsphereCredential;
use crate::vim::VimSession;
use f2c_cloud::{Connector, LastError, with_session};
use std::future::Future;
use std::sync::Arc;

/// vSphere adapter bound to one vCenter credential
///
/// Every operation opens its own session through `connector` and closes it
/// before returning.
pub struct VsphereProvider<C> {
    connector: C,
    credential: VsphereCredential,
    pub(crate) last_error: LastError,
}

impl<C> VsphereProvider<C>
where
    C: Connector<Credential = VsphereCredential>,
    C::Session: VimSession,
{
    pub fn new(connector: C, credential: VsphereCredential) -> Self {
        Self {
            connector,
            credential,
            last_error: LastError::new(),
        }
    }

    pub fn credential(&self) -> &VsphereCredential {
        &self.credential
    }

    /// Run `op` in a scoped session, logging a failure with the vCenter address
    pub(crate) async fn run<T, F, Fut>(&self, operation: &str, op: F) -> f2c_cloud::Result<T>
    where
        F: FnOnce(Arc<C::Session>) -> Fut,
        Fut: Future<Output = f2c_cloud::Result<T>>,
    {
        tracing::debug!(vcenter = %self.credential.v_center_ip, operation, "vSphere operation");
        let result = with_session(&self.connector, &self.credential, op).await;
        if let Err(e) = &result {
            tracing::error!(
                vcenter = %self.credential.v_center_ip,
                operation,
                error = %e,
                "vSphere operation failed"
            );
        }
        result
    }
}
