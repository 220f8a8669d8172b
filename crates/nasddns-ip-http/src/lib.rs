// # HTTP IP Source
//
// This crate provides an HTTP-based IP source for nasddns.
//
// ## Purpose
//
// When the caller does not pass an IP on the command line, the public
// address is looked up by a plain GET against a "what is my IP" service
// (e.g. api.ipify.org, ifconfig.me/ip, icanhazip.com). The trimmed
// response body is the address.
//
// ## Behaviour
//
// One request per `current()` call. No caching, no polling, no retry.

use async_trait::async_trait;
use nasddns_core::config::HttpOptions;
use nasddns_core::record::parse_ipv4;
use nasddns_core::traits::IpSource;
use nasddns_core::{Error, Result};
use std::net::Ipv4Addr;
use std::time::Duration;

/// HTTP-based IP source
#[derive(Debug, Clone)]
pub struct HttpIpSource {
    /// URL to fetch IP from
    url: String,

    /// HTTP client
    client: reqwest::Client,
}

impl HttpIpSource {
    /// Create a new HTTP IP source
    ///
    /// # Parameters
    ///
    /// - `url`: URL to fetch IP from (e.g., "https://api.ipify.org")
    /// - `http`: Timeout, TLS verification and User-Agent settings
    pub fn new(url: impl Into<String>, http: &HttpOptions) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(http.timeout_secs))
            .user_agent(http.user_agent.clone())
            .danger_accept_invalid_certs(!http.verify_tls)
            .build()
            .map_err(|e| Error::config(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            url: url.into(),
            client,
        })
    }

    pub fn url(&self) -> &str {
        &self.url
    }
}

#[async_trait]
impl IpSource for HttpIpSource {
    async fn current(&self) -> Result<Ipv4Addr> {
        tracing::debug!("Looking up public IP via {}", self.url);

        let response = self.client.get(&self.url).send().await.map_err(|e| {
            if e.is_timeout() {
                Error::timeout(format!("IP lookup timed out: {}", e))
            } else if e.is_connect() {
                Error::resolve(format!("Could not reach {}: {}", self.url, e))
            } else {
                Error::Other(format!("IP lookup failed: {}", e))
            }
        })?;

        let status = response.status();
        if !status.is_success() {
            return Err(Error::bad_request(
                status.as_u16(),
                format!("IP lookup via {} failed", self.url),
            ));
        }

        let ip_text = response
            .text()
            .await
            .map_err(|e| Error::unexpected(format!("Failed to read response: {}", e)))?;

        let ip = parse_ipv4(&ip_text).map_err(|_| {
            Error::unexpected(format!(
                "IP service returned '{}', not an IPv4 address",
                ip_text.trim()
            ))
        })?;

        tracing::info!("Public IP is {}", ip);
        Ok(ip)
    }

    fn source_name(&self) -> &'static str {
        "http"
    }
}
