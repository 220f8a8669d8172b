// # Record API Traits
//
// Defines the interfaces between the reconciler and a DNS provider.
//
// ## Layers
//
// - `RecordApi`: what the reconciler talks to. Four record operations
//   under a domain, session handling already taken care of.
// - `RecordTransport`: the same four operations over the wire, each
//   taking an explicit session token.
// - `Authenticator`: the provider handshake that yields a session token.
//
// `crate::client::RecordApiClient` glues a transport and an authenticator
// into a `RecordApi`. Provider crates implement the lower two traits;
// tests usually fake `RecordApi` directly.
//
// ## Usage
//
// ```rust,ignore
// use nasddns_core::{RecordApiClient, Reconciler};
//
// let api = /* Authenticator + RecordTransport implementation */;
// let client = RecordApiClient::connect(api.clone(), api).await?;
// let outcome = Reconciler::new(Box::new(client)).reconcile(&target).await?;
// ```

use crate::error::Result;
use crate::record::{RecordType, RecordUpdate, RemoteRecord};
use async_trait::async_trait;
use std::fmt;

/// Session credential returned by the provider handshake
///
/// The Debug implementation never exposes the token value.
#[derive(Clone, PartialEq, Eq)]
pub struct SessionToken(String);

impl SessionToken {
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    /// The raw token, for building request headers only
    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for SessionToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("SessionToken(<REDACTED>)")
    }
}

/// Record operations as seen by the reconciler
///
/// Every operation is a single provider call; implementations do not
/// retry beyond the one re-authentication described on
/// [`crate::client::RecordApiClient`].
#[async_trait]
pub trait RecordApi: Send + Sync {
    /// List every record under `domain`, in provider order
    ///
    /// # Errors
    ///
    /// - `Error::NoSuchHost` if the domain is unknown to the account
    async fn list_records(&self, domain: &str) -> Result<Vec<RemoteRecord>>;

    /// Create a record and return the provider's copy of it
    async fn create_record(
        &self,
        domain: &str,
        subdomain: &str,
        record_type: &RecordType,
        value: &str,
        ttl: u32,
    ) -> Result<RemoteRecord>;

    /// Apply a partial update to the record with `record_id`
    async fn update_record(
        &self,
        domain: &str,
        record_id: &str,
        fields: &RecordUpdate,
    ) -> Result<RemoteRecord>;

    /// Delete the record with `record_id`
    async fn delete_record(&self, domain: &str, record_id: &str) -> Result<()>;
}

/// Wire-level record operations authenticated with an explicit token
///
/// Implementations map provider rejections of the token to
/// `Error::AuthenticationFailed` so the session layer can re-authenticate.
#[async_trait]
pub trait RecordTransport: Send + Sync {
    async fn list_records(&self, session: &SessionToken, domain: &str)
    -> Result<Vec<RemoteRecord>>;

    async fn create_record(
        &self,
        session: &SessionToken,
        domain: &str,
        subdomain: &str,
        record_type: &RecordType,
        value: &str,
        ttl: u32,
    ) -> Result<RemoteRecord>;

    async fn update_record(
        &self,
        session: &SessionToken,
        domain: &str,
        record_id: &str,
        fields: &RecordUpdate,
    ) -> Result<RemoteRecord>;

    async fn delete_record(
        &self,
        session: &SessionToken,
        domain: &str,
        record_id: &str,
    ) -> Result<()>;
}

/// Provider authentication handshake
#[async_trait]
pub trait Authenticator: Send + Sync {
    /// Exchange the account credentials for a fresh session token
    ///
    /// # Errors
    ///
    /// - `Error::AuthenticationFailed` if the credentials are rejected
    async fn authenticate(&self) -> Result<SessionToken>;
}
