//! Record reconciler
//!
//! The Reconciler is responsible for:
//! - Fetching the current record set for the target's domain
//! - Deleting records that block the managed A record
//! - Re-enabling and repointing the managed A record
//! - Creating the A record when none exists
//!
//! ## Flow
//!
//! ```text
//!            list_records(domain)
//!                    │
//!                    ▼
//!   keep subdomain == target && type ∈ {A, CNAME}
//!                    │
//!        ┌───────────┴───────────────┐
//!        ▼                           ▼
//!  CNAME or non-default area    first default-area A
//!  → delete, next candidate     → enable if disabled
//!                               → update value if stale
//!                               → stop
//!
//!  no default-area A seen → create
//! ```
//!
//! ## Failure semantics
//!
//! The first failing provider call ends the run with that error, unchanged.
//! Deletions issued before the failure are not rolled back.

use crate::error::Result;
use crate::record::{RecordType, RecordUpdate, RemoteRecord, Target};
use crate::traits::RecordApi;
use std::fmt;
use tracing::{debug, info};

/// Terminal state of a successful reconciliation run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// At least one mutation was needed to point the record at the desired value
    UpdateApplied,
    /// The managed record already held the desired value
    NoChangeNeeded,
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Outcome::UpdateApplied => f.write_str("update applied"),
            Outcome::NoChangeNeeded => f.write_str("no change needed"),
        }
    }
}

/// Converges one provider-side A record onto a [`Target`]
///
/// Runs are independent: nothing is cached between calls to
/// [`Reconciler::reconcile()`], and records are listed fresh every time.
pub struct Reconciler {
    api: Box<dyn RecordApi>,
}

impl Reconciler {
    pub fn new(api: Box<dyn RecordApi>) -> Self {
        Self { api }
    }

    /// Run one reconciliation
    ///
    /// # Returns
    ///
    /// - `Ok(Outcome::UpdateApplied)`: the record was updated or created
    /// - `Ok(Outcome::NoChangeNeeded)`: the record already matched
    /// - `Err(Error)`: the first provider error, verbatim
    pub async fn reconcile(&self, target: &Target) -> Result<Outcome> {
        let domain = target.domain();
        let records = self.api.list_records(domain).await?;
        debug!("Fetched {} record(s) for {}", records.len(), domain);

        for record in records.iter().filter(|r| is_candidate(r, target)) {
            // A CNAME cannot coexist with the A record, and only the
            // default area is managed.
            if record.record_type == RecordType::Cname || !record.is_default_area() {
                info!(
                    "Deleting {} record {} ({} -> {}, area {})",
                    record.record_type,
                    record.id,
                    record.subdomain,
                    record.value,
                    record.area
                );
                self.api.delete_record(domain, &record.id).await?;
                continue;
            }

            return self.converge(target, record).await;
        }

        info!(
            "Creating A record {} -> {} (ttl {})",
            target.fqdn(),
            target.desired_value(),
            target.ttl()
        );
        self.api
            .create_record(
                domain,
                target.subdomain(),
                target.record_type(),
                target.desired_value(),
                target.ttl(),
            )
            .await?;

        Ok(Outcome::UpdateApplied)
    }

    /// Bring the managed record in line with the target
    async fn converge(&self, target: &Target, record: &RemoteRecord) -> Result<Outcome> {
        let domain = target.domain();

        if !record.enabled {
            info!("Enabling disabled record {} ({})", record.id, target.fqdn());
            self.api
                .update_record(domain, &record.id, &RecordUpdate::enable())
                .await?;
        }

        if record.value != target.desired_value() {
            info!(
                "Updating record {} ({}): {} -> {}",
                record.id,
                target.fqdn(),
                record.value,
                target.desired_value()
            );
            self.api
                .update_record(
                    domain,
                    &record.id,
                    &RecordUpdate::value(target.desired_value(), target.ttl()),
                )
                .await?;
            return Ok(Outcome::UpdateApplied);
        }

        debug!(
            "Record {} already points at {}",
            target.fqdn(),
            target.desired_value()
        );
        Ok(Outcome::NoChangeNeeded)
    }
}

/// Records the reconciler may touch: same subdomain, type A or CNAME
fn is_candidate(record: &RemoteRecord, target: &Target) -> bool {
    record.subdomain.eq_ignore_ascii_case(target.subdomain())
        && matches!(record.record_type, RecordType::A | RecordType::Cname)
}
