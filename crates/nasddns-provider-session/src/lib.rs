// # Session Record API Provider
//
// This crate talks to a DNS provider's session-authenticated record API
// over HTTPS. It implements the two wire-level traits from nasddns-core:
//
// - `Authenticator`: username/password login that yields a session token
// - `RecordTransport`: list/create/update/delete records under a domain
//
// Session reuse and the single re-authentication retry live in
// `nasddns_core::RecordApiClient`, not here. Every method in this crate is
// exactly one HTTP request.
//
// ## Security Requirements
//
// - Password and session token NEVER appear in logs or Debug output
//
// ## API Reference
//
// - Login: POST `/auth/login` `{"username", "password"}` → `{"token"}`
// - List: GET `/domains/:domain/records` → `{"records": [...]}`
// - Create: POST `/domains/:domain/records` → `{"record": {...}}`
// - Update: PATCH `/domains/:domain/records/:id` → `{"record": {...}}`
// - Delete: DELETE `/domains/:domain/records/:id`
//
// ## Status mapping
//
// | HTTP                  | Error                  |
// |-----------------------|------------------------|
// | 401                   | `AuthenticationFailed` |
// | 404 on list           | `NoSuchHost`           |
// | 503                   | `Maintenance`          |
// | other ≥ 400           | `BadRequest`           |
// | connect/DNS failure   | `ResolveError`         |
// | timeout               | `Timeout`              |
// | undecodable 2xx body  | `UnexpectedResponse`   |

mod wire;

use async_trait::async_trait;
use nasddns_core::config::{Credentials, HttpOptions};
use nasddns_core::record::{RecordType, RecordUpdate, RemoteRecord};
use nasddns_core::traits::{Authenticator, RecordTransport, SessionToken};
use nasddns_core::{Error, Result};
use reqwest::{Method, RequestBuilder, Response, StatusCode};
use serde::de::DeserializeOwned;
use std::fmt;
use std::time::Duration;
use wire::{
    CreateRecordRequest, ListRecordsResponse, LoginRequest, LoginResponse, RecordResponse,
    UpdateRecordRequest,
};

/// Session-authenticated record API client
///
/// Cheap to clone: the underlying `reqwest::Client` shares its connection
/// pool between clones, so one value can serve as both the
/// `Authenticator` and the `RecordTransport`.
///
/// # Security
///
/// The Debug implementation intentionally does NOT expose the password.
#[derive(Clone)]
pub struct SessionApi {
    /// Base URL without trailing slash
    base_url: String,

    /// Account credentials
    /// ⚠️ NEVER log the password
    credentials: Credentials,

    /// HTTP client for API requests
    client: reqwest::Client,
}

// Custom Debug implementation that hides the password
impl fmt::Debug for SessionApi {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SessionApi")
            .field("base_url", &self.base_url)
            .field("username", &self.credentials.username)
            .field("password", &"<REDACTED>")
            .finish()
    }
}

impl SessionApi {
    /// Create a new record API client
    ///
    /// # Parameters
    ///
    /// - `base_url`: Provider API root, e.g. `https://api.example-dns.net/v1`
    /// - `credentials`: Account username and password
    /// - `http`: Timeout, TLS verification and User-Agent settings
    ///
    /// # Errors
    ///
    /// `Error::Config` if the password is empty or the HTTP client cannot be built.
    pub fn new(
        base_url: impl Into<String>,
        credentials: Credentials,
        http: &HttpOptions,
    ) -> Result<Self> {
        if credentials.password.is_empty() {
            return Err(Error::config("Provider password cannot be empty"));
        }

        if !http.verify_tls {
            tracing::warn!("TLS certificate verification is disabled for the record API");
        }

        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(http.timeout_secs))
            .user_agent(http.user_agent.clone())
            .danger_accept_invalid_certs(!http.verify_tls)
            .build()
            .map_err(|e| Error::config(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            credentials,
            client,
        })
    }

    fn records_url(&self, domain: &str) -> String {
        format!("{}/domains/{}/records", self.base_url, domain)
    }

    fn record_url(&self, domain: &str, record_id: &str) -> String {
        format!("{}/domains/{}/records/{}", self.base_url, domain, record_id)
    }

    fn request(&self, method: Method, url: &str, session: &SessionToken) -> RequestBuilder {
        self.client
            .request(method, url)
            .bearer_auth(session.expose())
            .header("Accept", "application/json")
    }

    /// Send a request and map transport and HTTP-level failures
    ///
    /// `domain` is set only for listing, where 404 means the domain is
    /// unknown to the account.
    async fn send(&self, request: RequestBuilder, domain: Option<&str>) -> Result<Response> {
        let response = request.send().await.map_err(map_transport_error)?;
        let status = response.status();

        if status.is_success() {
            return Ok(response);
        }

        let body = response
            .text()
            .await
            .unwrap_or_else(|_| "Unable to read error response".to_string());

        tracing::debug!("Record API answered {}: {}", status, body);

        Err(match (status, domain) {
            (StatusCode::UNAUTHORIZED, _) => {
                Error::auth(format!("Provider rejected credentials: {}", body))
            }
            (StatusCode::NOT_FOUND, Some(domain)) => Error::no_such_host(domain),
            (StatusCode::SERVICE_UNAVAILABLE, _) => Error::maintenance(body),
            (s, _) if s.as_u16() >= 400 => Error::bad_request(s.as_u16(), body),
            (s, _) => Error::unexpected(format!("Unexpected HTTP status {}: {}", s, body)),
        })
    }

    async fn decode<T: DeserializeOwned>(response: Response) -> Result<T> {
        let bytes = response.bytes().await.map_err(map_transport_error)?;
        serde_json::from_slice(&bytes)
            .map_err(|e| Error::unexpected(format!("Failed to parse response: {}", e)))
    }
}

/// Map a reqwest send/read failure onto the error taxonomy
fn map_transport_error(e: reqwest::Error) -> Error {
    if e.is_timeout() {
        Error::timeout(format!("Request timed out: {}", e))
    } else if e.is_connect() {
        Error::resolve(format!("Could not reach provider: {}", e))
    } else if e.is_decode() || e.is_body() {
        Error::unexpected(format!("Failed to read response: {}", e))
    } else {
        Error::Other(format!("HTTP request failed: {}", e))
    }
}

#[async_trait]
impl Authenticator for SessionApi {
    async fn authenticate(&self) -> Result<SessionToken> {
        tracing::debug!("Authenticating as {}", self.credentials.username);

        let url = format!("{}/auth/login", self.base_url);
        let request = self.client.post(&url).json(&LoginRequest {
            username: &self.credentials.username,
            password: &self.credentials.password,
        });

        let response = self.send(request, None).await?;
        let login: LoginResponse = Self::decode(response).await?;

        if login.token.is_empty() {
            return Err(Error::unexpected("Login succeeded without a session token"));
        }

        Ok(SessionToken::new(login.token))
    }
}

#[async_trait]
impl RecordTransport for SessionApi {
    async fn list_records(
        &self,
        session: &SessionToken,
        domain: &str,
    ) -> Result<Vec<RemoteRecord>> {
        tracing::debug!("Listing records for {}", domain);

        let request = self.request(Method::GET, &self.records_url(domain), session);
        let response = self.send(request, Some(domain)).await?;
        let list: ListRecordsResponse = Self::decode(response).await?;

        Ok(list.records.into_iter().map(RemoteRecord::from).collect())
    }

    async fn create_record(
        &self,
        session: &SessionToken,
        domain: &str,
        subdomain: &str,
        record_type: &RecordType,
        value: &str,
        ttl: u32,
    ) -> Result<RemoteRecord> {
        let request = self
            .request(Method::POST, &self.records_url(domain), session)
            .json(&CreateRecordRequest {
                sub_domain: subdomain,
                record_type: record_type.as_str(),
                value,
                ttl,
            });

        let response = self.send(request, None).await?;
        let created: RecordResponse = Self::decode(response).await?;
        Ok(created.record.into())
    }

    async fn update_record(
        &self,
        session: &SessionToken,
        domain: &str,
        record_id: &str,
        fields: &RecordUpdate,
    ) -> Result<RemoteRecord> {
        if fields.is_empty() {
            return Err(Error::Other(format!(
                "Refusing to send an empty update for record {}",
                record_id
            )));
        }

        let request = self
            .request(Method::PATCH, &self.record_url(domain, record_id), session)
            .json(&UpdateRecordRequest::from(fields));

        let response = self.send(request, None).await?;
        let updated: RecordResponse = Self::decode(response).await?;
        Ok(updated.record.into())
    }

    async fn delete_record(
        &self,
        session: &SessionToken,
        domain: &str,
        record_id: &str,
    ) -> Result<()> {
        let request = self.request(Method::DELETE, &self.record_url(domain, record_id), session);
        self.send(request, None).await?;
        Ok(())
    }
}
