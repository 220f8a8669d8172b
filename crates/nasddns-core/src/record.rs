//! Record types shared between the reconciler and record API clients

use crate::error::{Error, Result};
use crate::hostname;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::net::Ipv4Addr;

/// Area label of the provider's non-geo-segmented record variant
pub const DEFAULT_AREA: &str = "default";

/// Default TTL for managed records (seconds)
pub const DEFAULT_TTL: u32 = 300;

/// DNS record type as reported by the provider
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum RecordType {
    A,
    Cname,
    /// Any type the reconciler never touches (MX, TXT, AAAA, ...)
    Other(String),
}

impl RecordType {
    pub fn as_str(&self) -> &str {
        match self {
            RecordType::A => "A",
            RecordType::Cname => "CNAME",
            RecordType::Other(s) => s,
        }
    }
}

impl From<String> for RecordType {
    fn from(s: String) -> Self {
        match s.to_ascii_uppercase().as_str() {
            "A" => RecordType::A,
            "CNAME" => RecordType::Cname,
            _ => RecordType::Other(s),
        }
    }
}

impl From<&str> for RecordType {
    fn from(s: &str) -> Self {
        RecordType::from(s.to_string())
    }
}

impl From<RecordType> for String {
    fn from(t: RecordType) -> Self {
        t.as_str().to_string()
    }
}

impl fmt::Display for RecordType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Snapshot of one provider-side record
///
/// Owned by the provider. The reconciler reads it and requests mutations
/// by `id`, but never edits a snapshot in place.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemoteRecord {
    /// Provider-specific opaque identifier
    pub id: String,
    /// Subdomain label ("@" for the apex)
    pub subdomain: String,
    pub record_type: RecordType,
    pub value: String,
    pub enabled: bool,
    /// Area label ("default" or a geo-segmented variant)
    pub area: String,
    pub ttl: Option<u32>,
}

impl RemoteRecord {
    /// Whether the record lives in the default area
    pub fn is_default_area(&self) -> bool {
        self.area == DEFAULT_AREA
    }
}

/// Partial update for an existing record
///
/// Fields left as `None` are not sent to the provider.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RecordUpdate {
    pub value: Option<String>,
    pub enabled: Option<bool>,
    pub ttl: Option<u32>,
}

impl RecordUpdate {
    /// Update that re-enables a disabled record
    pub fn enable() -> Self {
        Self {
            enabled: Some(true),
            ..Self::default()
        }
    }

    /// Update that points a record at a new value
    pub fn value(value: impl Into<String>, ttl: u32) -> Self {
        Self {
            value: Some(value.into()),
            ttl: Some(ttl),
            ..Self::default()
        }
    }

    pub fn is_empty(&self) -> bool {
        self.value.is_none() && self.enabled.is_none() && self.ttl.is_none()
    }
}

/// Desired state for one reconciliation run
///
/// Derived once per invocation from the input hostname and never mutated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Target {
    domain: String,
    subdomain: String,
    desired_value: String,
    record_type: RecordType,
    ttl: u32,
}

impl Target {
    /// Build a target from a hostname and the desired address
    ///
    /// # Errors
    ///
    /// - `Error::InvalidHostname` if `fqdn` is not a fully-qualified name
    pub fn new(fqdn: &str, ip: Ipv4Addr, ttl: u32) -> Result<Self> {
        let (domain, subdomain) = hostname::split(fqdn)?;
        Ok(Self {
            domain,
            subdomain,
            desired_value: ip.to_string(),
            record_type: RecordType::A,
            ttl,
        })
    }

    pub fn domain(&self) -> &str {
        &self.domain
    }

    pub fn subdomain(&self) -> &str {
        &self.subdomain
    }

    pub fn desired_value(&self) -> &str {
        &self.desired_value
    }

    pub fn record_type(&self) -> &RecordType {
        &self.record_type
    }

    pub fn ttl(&self) -> u32 {
        self.ttl
    }

    /// The fully-qualified name this target manages
    pub fn fqdn(&self) -> String {
        if self.subdomain == hostname::ROOT_MARKER {
            self.domain.clone()
        } else {
            format!("{}.{}", self.subdomain, self.domain)
        }
    }
}

/// Parse a caller-supplied IP literal for an A record
pub fn parse_ipv4(raw: &str) -> Result<Ipv4Addr> {
    let raw = raw.trim();
    raw.parse::<Ipv4Addr>()
        .map_err(|_| Error::invalid_address(format!("'{}' is not an IPv4 address", raw)))
}
