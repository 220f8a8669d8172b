//! Core traits for the nasddns update client
//!
//! This module defines the abstract interfaces that implementations must follow.
//!
//! - [`RecordApi`]: Record operations used by the reconciler
//! - [`RecordTransport`] / [`Authenticator`]: Provider wire operations and handshake
//! - [`IpSource`]: Where the desired address comes from

pub mod ip_source;
pub mod record_api;

pub use ip_source::{IpSource, StaticIpSource};
pub use record_api::{Authenticator, RecordApi, RecordTransport, SessionToken};
