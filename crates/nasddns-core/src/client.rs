//! Session-holding record API client
//!
//! [`RecordApiClient`] combines an [`Authenticator`] and a
//! [`RecordTransport`] into the [`RecordApi`] the reconciler uses.
//!
//! ## Session lifecycle
//!
//! 1. [`RecordApiClient::connect()`] performs the handshake up front; a
//!    client never exists without a session token.
//! 2. Each record operation runs with the current token.
//! 3. If the provider answers `AuthenticationFailed`, the client performs
//!    one fresh handshake and retries that operation once.
//! 4. A second authentication failure in a row is returned to the caller.
//!
//! No other error is retried.

use crate::error::Result;
use crate::record::{RecordType, RecordUpdate, RemoteRecord};
use crate::traits::{Authenticator, RecordApi, RecordTransport, SessionToken};
use async_trait::async_trait;
use std::future::Future;
use tokio::sync::Mutex;
use tracing::{debug, warn};

/// Record API client holding an authenticated session
pub struct RecordApiClient<A, T> {
    authenticator: A,
    transport: T,
    session: Mutex<SessionToken>,
}

impl<A, T> RecordApiClient<A, T>
where
    A: Authenticator,
    T: RecordTransport,
{
    /// Authenticate and build a client holding the new session
    ///
    /// # Errors
    ///
    /// Whatever the handshake returns, typically `Error::AuthenticationFailed`
    /// or a transport error.
    pub async fn connect(authenticator: A, transport: T) -> Result<Self> {
        let session = authenticator.authenticate().await?;
        debug!("Session established");
        Ok(Self::with_session(authenticator, transport, session))
    }

    /// Build a client around a session token obtained elsewhere
    pub fn with_session(authenticator: A, transport: T, session: SessionToken) -> Self {
        Self {
            authenticator,
            transport,
            session: Mutex::new(session),
        }
    }

    /// Run `op` with the current session, re-authenticating once on rejection
    async fn call<R, F, Fut>(&self, name: &str, op: F) -> Result<R>
    where
        F: Fn(SessionToken) -> Fut + Send + Sync,
        Fut: Future<Output = Result<R>> + Send,
        R: Send,
    {
        let session = self.session.lock().await.clone();

        match op(session).await {
            Err(e) if e.is_auth() => {
                warn!("{} rejected the session ({}), re-authenticating", name, e);
                let fresh = self.authenticator.authenticate().await?;
                *self.session.lock().await = fresh.clone();
                op(fresh).await
            }
            result => result,
        }
    }
}

#[async_trait]
impl<A, T> RecordApi for RecordApiClient<A, T>
where
    A: Authenticator,
    T: RecordTransport,
{
    async fn list_records(&self, domain: &str) -> Result<Vec<RemoteRecord>> {
        self.call("list_records", |s| async move {
            self.transport.list_records(&s, domain).await
        })
        .await
    }

    async fn create_record(
        &self,
        domain: &str,
        subdomain: &str,
        record_type: &RecordType,
        value: &str,
        ttl: u32,
    ) -> Result<RemoteRecord> {
        self.call("create_record", |s| async move {
            self.transport
                .create_record(&s, domain, subdomain, record_type, value, ttl)
                .await
        })
        .await
    }

    async fn update_record(
        &self,
        domain: &str,
        record_id: &str,
        fields: &RecordUpdate,
    ) -> Result<RemoteRecord> {
        self.call("update_record", |s| async move {
            self.transport
                .update_record(&s, domain, record_id, fields)
                .await
        })
        .await
    }

    async fn delete_record(&self, domain: &str, record_id: &str) -> Result<()> {
        self.call("delete_record", |s| async move {
            self.transport.delete_record(&s, domain, record_id).await
        })
        .await
    }
}
