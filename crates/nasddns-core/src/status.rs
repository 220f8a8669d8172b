//! Outcome reporting
//!
//! Maps the terminal result of a run to the status vocabulary NAS DDNS
//! clients understand. Pure; printing is left to the caller.

use crate::error::{Error, Result};
use crate::reconciler::Outcome;

/// Status token plus human-readable message for one run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Status {
    /// Stable machine-readable token (`good`, `nochg`, `badauth`, ...)
    pub token: &'static str,
    pub message: String,
    /// Whether the token is in the success set
    pub success: bool,
}

impl Status {
    fn ok(token: &'static str, message: String) -> Self {
        Self {
            token,
            message,
            success: true,
        }
    }

    fn failed(token: &'static str, message: String) -> Self {
        Self {
            token,
            message,
            success: false,
        }
    }
}

/// Report the result of reconciling `fqdn` onto `ip`
pub fn report(result: &Result<Outcome>, fqdn: &str, ip: &str) -> Status {
    match result {
        Ok(Outcome::UpdateApplied) => {
            Status::ok("good", format!("Updated {} to {}", fqdn, ip))
        }
        Ok(Outcome::NoChangeNeeded) => {
            Status::ok("nochg", format!("{} already points to {}", fqdn, ip))
        }
        Err(e) => report_error(e),
    }
}

/// Report a failure that ended the run
pub fn report_error(error: &Error) -> Status {
    let token = match error {
        Error::NoSuchHost(_) => "nohost",
        Error::InvalidHostname(_) => "notfqdn",
        Error::AuthenticationFailed(_) => "badauth",
        Error::ResolveError(_) => "badresolv",
        Error::Timeout(_) => "badconn",
        Error::BadRequest { .. } => "badagent",
        Error::Maintenance(_) => "911",
        Error::UnexpectedResponse(_) => "badresponse",
        Error::InvalidAddress(_) => "badparam",
        Error::Config(_) | Error::Other(_) => "error",
    };

    Status::failed(token, error.to_string())
}
