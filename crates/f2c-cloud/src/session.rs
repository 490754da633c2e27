//! Scoped vendor sessions
//!
//! A vendor session is an authenticated handle with server-side state. It is
//! acquired per operation, never shared, and released exactly once whether
//! the operation succeeds, fails, or is dropped half way through.

use crate::error::Result;
use async_trait::async_trait;
use std::future::Future;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

/// Live authenticated handle to a vendor endpoint
#[async_trait]
pub trait VendorSession: Send + Sync + 'static {
    /// Endpoint the session is connected to, for logging
    fn endpoint(&self) -> &str;

    /// Whether the server-side session is still usable
    fn is_valid(&self) -> bool {
        true
    }

    /// Close the server-side session
    async fn logout(&self) -> Result<()>;
}

/// Opens sessions from a vendor credential
#[async_trait]
pub trait Connector: Send + Sync {
    type Credential: Send + Sync;
    type Session: VendorSession;

    async fn connect(&self, credential: &Self::Credential) -> Result<Self::Session>;
}

/// RAII guard owning one vendor session
///
/// [`SessionGuard::release`] is idempotent. A guard dropped without release
/// (cancelled future, panic) schedules the logout on the current tokio
/// runtime.
pub struct SessionGuard<S: VendorSession> {
    session: Arc<S>,
    released: AtomicBool,
}

impl<S: VendorSession> SessionGuard<S> {
    /// Open a session through `connector`
    pub async fn acquire<C>(connector: &C, credential: &C::Credential) -> Result<Self>
    where
        C: Connector<Session = S>,
    {
        let session = connector.connect(credential).await?;
        tracing::debug!(endpoint = session.endpoint(), "Acquired vendor session");
        Ok(Self::new(session))
    }

    pub fn new(session: S) -> Self {
        Self {
            session: Arc::new(session),
            released: AtomicBool::new(false),
        }
    }

    /// Shared handle for the operation running inside the scope
    pub fn shared(&self) -> Arc<S> {
        Arc::clone(&self.session)
    }

    pub fn is_released(&self) -> bool {
        self.released.load(Ordering::SeqCst)
    }

    /// Log out; later calls are no-ops
    pub async fn release(&self) -> Result<()> {
        if self.released.swap(true, Ordering::SeqCst) {
            return Ok(());
        }
        self.session.logout().await?;
        tracing::debug!(endpoint = self.session.endpoint(), "Released vendor session");
        Ok(())
    }
}

impl<S: VendorSession> std::ops::Deref for SessionGuard<S> {
    type Target = S;

    fn deref(&self) -> &S {
        &self.session
    }
}

impl<S: VendorSession> Drop for SessionGuard<S> {
    fn drop(&mut self) {
        if self.released.swap(true, Ordering::SeqCst) {
            return;
        }

        let session = Arc::clone(&self.session);
        match tokio::runtime::Handle::try_current() {
            Ok(handle) => {
                tracing::warn!(
                    endpoint = session.endpoint(),
                    "Vendor session dropped without release, logging out in background"
                );
                handle.spawn(async move {
                    if let Err(e) = session.logout().await {
                        tracing::warn!(
                            endpoint = session.endpoint(),
                            error = %e,
                            "Background logout failed"
                        );
                    }
                });
            }
            Err(_) => {
                tracing::error!(
                    endpoint = session.endpoint(),
                    "Vendor session dropped outside a runtime, server-side session leaked"
                );
            }
        }
    }
}

/// Run `op` inside a freshly acquired session and release it afterwards
///
/// The session is released on both the `Ok` and `Err` paths before the
/// operation's result is returned. A failing logout is logged and does not
/// replace the operation's result.
pub async fn with_session<C, T, F, Fut>(
    connector: &C,
    credential: &C::Credential,
    op: F,
) -> Result<T>
where
    C: Connector,
    F: FnOnce(Arc<C::Session>) -> Fut,
    Fut: Future<Output = Result<T>>,
{
    let guard = SessionGuard::acquire(connector, credential).await?;
    let result = op(guard.shared()).await;

    if let Err(e) = guard.release().await {
        tracing::warn!(endpoint = guard.endpoint(), error = %e, "Failed to release vendor session");
    }

    result
}
