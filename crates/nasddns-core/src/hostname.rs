//! Hostname splitting
//!
//! Decomposes a fully-qualified hostname into the registrable domain (the
//! last two labels) and the subdomain label the provider stores records
//! under. Pure and deterministic; never touches the network.

use crate::error::{Error, Result};

/// Subdomain label used by providers for the zone apex
pub const ROOT_MARKER: &str = "@";

/// Maximum total length of a domain name (RFC 1035)
const MAX_NAME_LEN: usize = 253;

/// Maximum length of a single label (RFC 1035)
const MAX_LABEL_LEN: usize = 63;

/// Split an FQDN into `(domain, subdomain)`
///
/// ```
/// use nasddns_core::hostname::split;
///
/// let (domain, sub) = split("a.b.example.com").unwrap();
/// assert_eq!(domain, "example.com");
/// assert_eq!(sub, "a.b");
/// ```
///
/// # Errors
///
/// `Error::InvalidHostname` if the name is empty, has fewer than two
/// labels, has a leading/trailing dot or an empty label, or contains a
/// label with characters outside `[A-Za-z0-9-]` or a leading/trailing
/// hyphen.
pub fn split(fqdn: &str) -> Result<(String, String)> {
    validate(fqdn)?;

    let fqdn = fqdn.to_ascii_lowercase();
    let labels: Vec<&str> = fqdn.split('.').collect();
    let (head, tail) = labels.split_at(labels.len() - 2);

    let domain = tail.join(".");
    let subdomain = if head.is_empty() {
        ROOT_MARKER.to_string()
    } else {
        head.join(".")
    };

    Ok((domain, subdomain))
}

fn validate(fqdn: &str) -> Result<()> {
    if fqdn.is_empty() {
        return Err(Error::invalid_hostname("hostname cannot be empty"));
    }

    if fqdn.len() > MAX_NAME_LEN {
        return Err(Error::invalid_hostname(format!(
            "hostname too long: {} chars (max {})",
            fqdn.len(),
            MAX_NAME_LEN
        )));
    }

    let labels: Vec<&str> = fqdn.split('.').collect();
    if labels.len() < 2 {
        return Err(Error::invalid_hostname(format!(
            "'{}' is not fully qualified",
            fqdn
        )));
    }

    for label in labels {
        if label.is_empty() {
            return Err(Error::invalid_hostname(format!(
                "'{}' has an empty label",
                fqdn
            )));
        }

        if label.len() > MAX_LABEL_LEN {
            return Err(Error::invalid_hostname(format!(
                "label '{}' too long: {} chars (max {})",
                label,
                label.len(),
                MAX_LABEL_LEN
            )));
        }

        if !label.chars().all(|c| c.is_ascii_alphanumeric() || c == '-') {
            return Err(Error::invalid_hostname(format!(
                "label '{}' contains invalid characters",
                label
            )));
        }

        if label.starts_with('-') || label.ends_with('-') {
            return Err(Error::invalid_hostname(format!(
                "label '{}' cannot start or end with a hyphen",
                label
            )));
        }
    }

    Ok(())
}
