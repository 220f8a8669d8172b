//! Configuration types for the nasddns update client
//!
//! One [`RunConfig`] describes one invocation. The binary fills it from the
//! command line and `DDNS_*` environment variables; library users can
//! deserialize it from anywhere serde reaches.

use crate::error::{Error, Result};
use crate::record::DEFAULT_TTL;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Lowest TTL the client will request (seconds)
pub const MIN_TTL: u32 = 60;

/// Highest TTL the client will request (seconds)
pub const MAX_TTL: u32 = 86_400;

/// Main configuration for one update run
#[derive(Clone, Serialize, Deserialize)]
pub struct RunConfig {
    /// Provider account credentials
    pub credentials: Credentials,

    /// Fully-qualified hostname of the managed A record
    pub hostname: String,

    /// Desired IP; looked up via `ip_grabber_url` when absent
    #[serde(default)]
    pub ip: Option<String>,

    /// Endpoint returning the caller's public IP as plain text
    #[serde(default = "default_ip_grabber_url")]
    pub ip_grabber_url: String,

    /// TTL for created or repointed records (seconds)
    #[serde(default = "default_ttl")]
    pub ttl: u32,

    /// Provider record API base URL
    #[serde(default = "default_api_base")]
    pub api_base: String,

    /// Transport settings shared by every HTTP client
    #[serde(default)]
    pub http: HttpOptions,
}

impl RunConfig {
    /// Create a configuration with defaults for everything optional
    pub fn new(
        username: impl Into<String>,
        password: impl Into<String>,
        hostname: impl Into<String>,
    ) -> Self {
        Self {
            credentials: Credentials::new(username, password),
            hostname: hostname.into(),
            ip: None,
            ip_grabber_url: default_ip_grabber_url(),
            ttl: default_ttl(),
            api_base: default_api_base(),
            http: HttpOptions::default(),
        }
    }

    /// Validate the configuration
    ///
    /// Hostname and IP syntax are checked later, by the hostname splitter
    /// and IP parser, so they surface with their own status tokens.
    pub fn validate(&self) -> Result<()> {
        self.credentials.validate()?;

        if !(MIN_TTL..=MAX_TTL).contains(&self.ttl) {
            return Err(Error::config(format!(
                "TTL must be between {} and {} seconds. Got: {}",
                MIN_TTL, MAX_TTL, self.ttl
            )));
        }

        validate_url("API base URL", &self.api_base)?;

        if self.ip.is_none() {
            validate_url("IP grabber URL", &self.ip_grabber_url)?;
        }

        self.http.validate()
    }
}

// Custom Debug implementation that hides the password
impl fmt::Debug for RunConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RunConfig")
            .field("credentials", &self.credentials)
            .field("hostname", &self.hostname)
            .field("ip", &self.ip)
            .field("ip_grabber_url", &self.ip_grabber_url)
            .field("ttl", &self.ttl)
            .field("api_base", &self.api_base)
            .field("http", &self.http)
            .finish()
    }
}

/// Provider account credentials
#[derive(Clone, Serialize, Deserialize)]
pub struct Credentials {
    pub username: String,
    /// ⚠️ NEVER log this value
    pub password: String,
}

impl Credentials {
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
        }
    }

    fn validate(&self) -> Result<()> {
        if self.username.is_empty() {
            return Err(Error::config("Username cannot be empty"));
        }
        if self.password.is_empty() {
            return Err(Error::config("Password cannot be empty"));
        }
        Ok(())
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &self.username)
            .field("password", &"<REDACTED>")
            .finish()
    }
}

/// HTTP transport settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HttpOptions {
    /// Per-request timeout (seconds)
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// Verify TLS certificates
    #[serde(default = "default_verify_tls")]
    pub verify_tls: bool,

    /// User-Agent header sent with every request
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
}

impl HttpOptions {
    pub fn validate(&self) -> Result<()> {
        if !(1..=300).contains(&self.timeout_secs) {
            return Err(Error::config(format!(
                "HTTP timeout must be between 1 and 300 seconds. Got: {}",
                self.timeout_secs
            )));
        }
        if self.user_agent.is_empty() {
            return Err(Error::config("User agent cannot be empty"));
        }
        Ok(())
    }
}

impl Default for HttpOptions {
    fn default() -> Self {
        Self {
            timeout_secs: default_timeout_secs(),
            verify_tls: default_verify_tls(),
            user_agent: default_user_agent(),
        }
    }
}

fn validate_url(what: &str, url: &str) -> Result<()> {
    if !url.starts_with("https://") && !url.starts_with("http://") {
        return Err(Error::config(format!(
            "{} must use HTTP or HTTPS scheme. Got: {}",
            what, url
        )));
    }
    Ok(())
}

fn default_ip_grabber_url() -> String {
    "https://api.ipify.org".to_string()
}

fn default_ttl() -> u32 {
    DEFAULT_TTL
}

fn default_api_base() -> String {
    "https://api.example-dns.net/v1".to_string()
}

fn default_timeout_secs() -> u64 {
    30
}

fn default_verify_tls() -> bool {
    true
}

fn default_user_agent() -> String {
    concat!("nasddns/", env!("CARGO_PKG_VERSION")).to_string()
}
