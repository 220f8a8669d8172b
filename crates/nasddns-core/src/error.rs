//! Error types for the nasddns update client
//!
//! Every variant is terminal for the current run. The reconciler passes
//! client errors through untouched; only the status reporter interprets
//! them.

use thiserror::Error;

/// Result type alias for nasddns operations
pub type Result<T> = std::result::Result<T, Error>;

/// Core error type for the nasddns update client
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// Hostname does not match the FQDN grammar
    #[error("Invalid hostname: {0}")]
    InvalidHostname(String),

    /// Domain is unknown to the provider account
    #[error("No such host: {0}")]
    NoSuchHost(String),

    /// Credentials or session token were rejected
    #[error("Authentication failed: {0}")]
    AuthenticationFailed(String),

    /// Provider host could not be resolved or connected to
    #[error("Resolve error: {0}")]
    ResolveError(String),

    /// Request did not complete within the configured timeout
    #[error("Timeout: {0}")]
    Timeout(String),

    /// Provider rejected the request
    #[error("Bad request ({status}): {message}")]
    BadRequest {
        /// HTTP status returned by the provider
        status: u16,
        /// Provider response body, verbatim
        message: String,
    },

    /// Provider is down for maintenance
    #[error("Provider under maintenance: {0}")]
    Maintenance(String),

    /// Provider answered with something we could not understand
    #[error("Unexpected response: {0}")]
    UnexpectedResponse(String),

    /// Desired IP is not a usable IPv4 literal
    #[error("Invalid address: {0}")]
    InvalidAddress(String),

    /// Configuration errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// Generic error with context
    #[error("{0}")]
    Other(String),
}

impl Error {
    /// Create an invalid hostname error
    pub fn invalid_hostname(msg: impl Into<String>) -> Self {
        Self::InvalidHostname(msg.into())
    }

    /// Create a "no such host" error
    pub fn no_such_host(domain: impl Into<String>) -> Self {
        Self::NoSuchHost(domain.into())
    }

    /// Create an authentication error
    pub fn auth(msg: impl Into<String>) -> Self {
        Self::AuthenticationFailed(msg.into())
    }

    /// Create a resolve error
    pub fn resolve(msg: impl Into<String>) -> Self {
        Self::ResolveError(msg.into())
    }

    /// Create a timeout error
    pub fn timeout(msg: impl Into<String>) -> Self {
        Self::Timeout(msg.into())
    }

    /// Create a bad request error
    pub fn bad_request(status: u16, message: impl Into<String>) -> Self {
        Self::BadRequest {
            status,
            message: message.into(),
        }
    }

    /// Create a maintenance error
    pub fn maintenance(msg: impl Into<String>) -> Self {
        Self::Maintenance(msg.into())
    }

    /// Create an unexpected response error
    pub fn unexpected(msg: impl Into<String>) -> Self {
        Self::UnexpectedResponse(msg.into())
    }

    /// Create an invalid address error
    pub fn invalid_address(msg: impl Into<String>) -> Self {
        Self::InvalidAddress(msg.into())
    }

    /// Create a configuration error
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Whether this error should trigger a fresh authentication handshake
    pub fn is_auth(&self) -> bool {
        matches!(self, Self::AuthenticationFailed(_))
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Self::UnexpectedResponse(err.to_string())
    }
}
