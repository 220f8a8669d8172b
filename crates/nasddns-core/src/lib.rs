// # nasddns-core
//
// Core library for the nasddns update client.
//
// ## Architecture Overview
//
// This library converges one provider-side DNS A record onto the caller's
// current IP address:
// - **hostname**: Splits an FQDN into registrable domain and subdomain
// - **RecordApi**: Trait for listing and mutating records at a provider
// - **RecordApiClient**: Session-holding client with a single re-authentication
// - **Reconciler**: Computes and issues the corrective record mutations
// - **status**: Maps the terminal result to NAS DDNS status tokens
// - **IpSource**: Trait for finding the address to publish
//
// ## Design Principles
//
// 1. **Separation of Concerns**: Reconciliation knows nothing about HTTP
// 2. **Explicit Sessions**: Authentication happens before any record call
// 3. **Results, not exits**: Every layer returns `Result`; only the binary exits
// 4. **Library-First**: All core functionality can be used as a library
// 5. **Stateless**: Every run lists records fresh; nothing is persisted

pub mod client;
pub mod config;
pub mod error;
pub mod hostname;
pub mod reconciler;
pub mod record;
pub mod status;
pub mod traits;

// Re-export core types for convenience
pub use client::RecordApiClient;
pub use config::{Credentials, HttpOptions, RunConfig};
pub use error::{Error, Result};
pub use reconciler::{Outcome, Reconciler};
pub use record::{RecordType, RecordUpdate, RemoteRecord, Target};
pub use status::Status;
pub use traits::{Authenticator, IpSource, RecordApi, RecordTransport, SessionToken, StaticIpSource};
