// # IP Source Trait
//
// Supplies the address the managed A record should point at.
//
// ## Implementations
//
// - `StaticIpSource`: an address given by the caller (this module)
// - HTTP lookup against a "what is my IP" endpoint: `nasddns-ip-http` crate

use crate::error::Result;
use async_trait::async_trait;
use std::net::Ipv4Addr;

/// Trait for IP source implementations
///
/// Each call is a one-shot lookup: no caching, no polling, no retry.
#[async_trait]
pub trait IpSource: Send + Sync {
    /// Get the current public IPv4 address
    ///
    /// # Returns
    ///
    /// - `Ok(Ipv4Addr)`: The current address
    /// - `Err(Error)`: If the address could not be determined
    async fn current(&self) -> Result<Ipv4Addr>;

    /// Short name for logging
    fn source_name(&self) -> &'static str;
}

/// An IP source that always returns the address it was built with
#[derive(Debug, Clone, Copy)]
pub struct StaticIpSource {
    ip: Ipv4Addr,
}

impl StaticIpSource {
    pub fn new(ip: Ipv4Addr) -> Self {
        Self { ip }
    }
}

#[async_trait]
impl IpSource for StaticIpSource {
    async fn current(&self) -> Result<Ipv4Addr> {
        Ok(self.ip)
    }

    fn source_name(&self) -> &'static str {
        "static"
    }
}
