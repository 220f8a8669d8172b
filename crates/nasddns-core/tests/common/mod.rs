//! Test doubles and common utilities for reconciliation contract tests
//!
//! This module provides in-memory fakes of the record API seams. The fakes
//! record every call and apply mutations to their record set, so a second
//! run observes what the first one did.

#![allow(dead_code)]

use nasddns_core::error::{Error, Result};
use nasddns_core::record::{RecordType, RecordUpdate, RemoteRecord, Target};
use nasddns_core::traits::{Authenticator, RecordApi, RecordTransport, SessionToken};
use std::collections::VecDeque;
use std::net::Ipv4Addr;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

/// One call observed by a fake
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Call {
    List { domain: String },
    Create { domain: String, subdomain: String, value: String, ttl: u32 },
    Update { domain: String, id: String, fields: RecordUpdate },
    Delete { domain: String, id: String },
}

impl Call {
    pub fn is_mutation(&self) -> bool {
        !matches!(self, Call::List { .. })
    }
}

/// Build a provider-side record
pub fn record(id: &str, subdomain: &str, record_type: &str, value: &str) -> RemoteRecord {
    RemoteRecord {
        id: id.to_string(),
        subdomain: subdomain.to_string(),
        record_type: RecordType::from(record_type),
        value: value.to_string(),
        enabled: true,
        area: "default".to_string(),
        ttl: Some(600),
    }
}

/// Build a record in a non-default area
pub fn area_record(id: &str, subdomain: &str, value: &str, area: &str) -> RemoteRecord {
    RemoteRecord {
        area: area.to_string(),
        ..record(id, subdomain, "A", value)
    }
}

/// Build a disabled default-area A record
pub fn disabled_record(id: &str, subdomain: &str, value: &str) -> RemoteRecord {
    RemoteRecord {
        enabled: false,
        ..record(id, subdomain, "A", value)
    }
}

/// Target for `fqdn` pointing at `ip` with the default TTL
pub fn target(fqdn: &str, ip: [u8; 4]) -> Target {
    Target::new(fqdn, Ipv4Addr::from(ip), 300).expect("valid test hostname")
}

/// An in-memory RecordApi that reflects its own mutations
pub struct FakeRecordApi {
    domain: String,
    records: Arc<Mutex<Vec<RemoteRecord>>>,
    calls: Arc<Mutex<Vec<Call>>>,
    /// Error returned by list_records(), if set
    list_error: Arc<Mutex<Option<Error>>>,
    /// Error returned by the N-th mutation (0-based), if set
    mutation_error: Arc<Mutex<Option<(usize, Error)>>>,
    next_id: Arc<AtomicUsize>,
}

impl FakeRecordApi {
    /// Create a fake that knows `domain` and holds `records`
    pub fn new(domain: &str, records: Vec<RemoteRecord>) -> Self {
        Self {
            domain: domain.to_string(),
            records: Arc::new(Mutex::new(records)),
            calls: Arc::new(Mutex::new(Vec::new())),
            list_error: Arc::new(Mutex::new(None)),
            mutation_error: Arc::new(Mutex::new(None)),
            next_id: Arc::new(AtomicUsize::new(1000)),
        }
    }

    /// Create a fake that shares records and call log with an existing one
    pub fn sharing_state_with(other: &Self) -> Self {
        Self {
            domain: other.domain.clone(),
            records: Arc::clone(&other.records),
            calls: Arc::clone(&other.calls),
            list_error: Arc::clone(&other.list_error),
            mutation_error: Arc::clone(&other.mutation_error),
            next_id: Arc::clone(&other.next_id),
        }
    }

    /// Make list_records() fail with `error`
    pub fn fail_list_with(&self, error: Error) {
        *self.list_error.lock().unwrap() = Some(error);
    }

    /// Make the `index`-th mutation (0-based) fail with `error`
    pub fn fail_mutation_with(&self, index: usize, error: Error) {
        *self.mutation_error.lock().unwrap() = Some((index, error));
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    pub fn mutations(&self) -> Vec<Call> {
        self.calls().into_iter().filter(Call::is_mutation).collect()
    }

    pub fn clear_calls(&self) {
        self.calls.lock().unwrap().clear();
    }

    pub fn records(&self) -> Vec<RemoteRecord> {
        self.records.lock().unwrap().clone()
    }

    fn log(&self, call: Call) -> Result<()> {
        let mut calls = self.calls.lock().unwrap();
        let index = calls.iter().filter(|c| c.is_mutation()).count();
        calls.push(call);

        if let Some((failing, error)) = self.mutation_error.lock().unwrap().as_ref()
            && *failing == index
        {
            return Err(error.clone());
        }
        Ok(())
    }

    fn check_domain(&self, domain: &str) -> Result<()> {
        if domain == self.domain {
            Ok(())
        } else {
            Err(Error::no_such_host(domain))
        }
    }
}

#[async_trait::async_trait]
impl RecordApi for FakeRecordApi {
    async fn list_records(&self, domain: &str) -> Result<Vec<RemoteRecord>> {
        self.calls.lock().unwrap().push(Call::List {
            domain: domain.to_string(),
        });

        if let Some(error) = self.list_error.lock().unwrap().clone() {
            return Err(error);
        }
        self.check_domain(domain)?;
        Ok(self.records())
    }

    async fn create_record(
        &self,
        domain: &str,
        subdomain: &str,
        record_type: &RecordType,
        value: &str,
        ttl: u32,
    ) -> Result<RemoteRecord> {
        self.log(Call::Create {
            domain: domain.to_string(),
            subdomain: subdomain.to_string(),
            value: value.to_string(),
            ttl,
        })?;
        self.check_domain(domain)?;

        let created = RemoteRecord {
            id: self.next_id.fetch_add(1, Ordering::SeqCst).to_string(),
            subdomain: subdomain.to_string(),
            record_type: record_type.clone(),
            value: value.to_string(),
            enabled: true,
            area: "default".to_string(),
            ttl: Some(ttl),
        };
        self.records.lock().unwrap().push(created.clone());
        Ok(created)
    }

    async fn update_record(
        &self,
        domain: &str,
        record_id: &str,
        fields: &RecordUpdate,
    ) -> Result<RemoteRecord> {
        self.log(Call::Update {
            domain: domain.to_string(),
            id: record_id.to_string(),
            fields: fields.clone(),
        })?;
        self.check_domain(domain)?;

        let mut records = self.records.lock().unwrap();
        let record = records
            .iter_mut()
            .find(|r| r.id == record_id)
            .ok_or_else(|| Error::bad_request(404, format!("no record {}", record_id)))?;

        if let Some(value) = &fields.value {
            record.value = value.clone();
        }
        if let Some(enabled) = fields.enabled {
            record.enabled = enabled;
        }
        if let Some(ttl) = fields.ttl {
            record.ttl = Some(ttl);
        }
        Ok(record.clone())
    }

    async fn delete_record(&self, domain: &str, record_id: &str) -> Result<()> {
        self.log(Call::Delete {
            domain: domain.to_string(),
            id: record_id.to_string(),
        })?;
        self.check_domain(domain)?;

        self.records.lock().unwrap().retain(|r| r.id != record_id);
        Ok(())
    }
}

/// An Authenticator that hands out numbered tokens and can be scripted to fail
pub struct CountingAuthenticator {
    call_count: Arc<AtomicUsize>,
    /// Results to return before falling back to fresh tokens
    scripted: Arc<Mutex<VecDeque<Error>>>,
}

impl CountingAuthenticator {
    pub fn new() -> Self {
        Self {
            call_count: Arc::new(AtomicUsize::new(0)),
            scripted: Arc::new(Mutex::new(VecDeque::new())),
        }
    }

    pub fn sharing_counters_with(other: &Self) -> Self {
        Self {
            call_count: Arc::clone(&other.call_count),
            scripted: Arc::clone(&other.scripted),
        }
    }

    /// Make the next handshake fail with `error`
    pub fn fail_next_with(&self, error: Error) {
        self.scripted.lock().unwrap().push_back(error);
    }

    /// Get the number of times authenticate() was called
    pub fn call_count(&self) -> usize {
        self.call_count.load(Ordering::SeqCst)
    }
}

#[async_trait::async_trait]
impl Authenticator for CountingAuthenticator {
    async fn authenticate(&self) -> Result<SessionToken> {
        let n = self.call_count.fetch_add(1, Ordering::SeqCst) + 1;
        if let Some(error) = self.scripted.lock().unwrap().pop_front() {
            return Err(error);
        }
        Ok(SessionToken::new(format!("session-{}", n)))
    }
}

/// A RecordTransport that only accepts one token and counts list calls
///
/// Every other operation is a no-op success; list_records() returns an
/// empty record set.
pub struct SessionCheckingTransport {
    valid_token: Arc<Mutex<String>>,
    seen_tokens: Arc<Mutex<Vec<String>>>,
    /// Error returned instead of a result for every call, if set
    always_fail: Arc<Mutex<Option<Error>>>,
}

impl SessionCheckingTransport {
    pub fn accepting(token: &str) -> Self {
        Self {
            valid_token: Arc::new(Mutex::new(token.to_string())),
            seen_tokens: Arc::new(Mutex::new(Vec::new())),
            always_fail: Arc::new(Mutex::new(None)),
        }
    }

    pub fn sharing_state_with(other: &Self) -> Self {
        Self {
            valid_token: Arc::clone(&other.valid_token),
            seen_tokens: Arc::clone(&other.seen_tokens),
            always_fail: Arc::clone(&other.always_fail),
        }
    }

    /// Change which token the transport accepts (simulates session expiry)
    pub fn accept_only(&self, token: &str) {
        *self.valid_token.lock().unwrap() = token.to_string();
    }

    pub fn fail_always_with(&self, error: Error) {
        *self.always_fail.lock().unwrap() = Some(error);
    }

    /// Tokens presented so far, in order
    pub fn seen_tokens(&self) -> Vec<String> {
        self.seen_tokens.lock().unwrap().clone()
    }

    fn check(&self, session: &SessionToken) -> Result<()> {
        self.seen_tokens
            .lock()
            .unwrap()
            .push(session.expose().to_string());

        if let Some(error) = self.always_fail.lock().unwrap().clone() {
            return Err(error);
        }
        if session.expose() == *self.valid_token.lock().unwrap() {
            Ok(())
        } else {
            Err(Error::auth("session expired"))
        }
    }
}

#[async_trait::async_trait]
impl RecordTransport for SessionCheckingTransport {
    async fn list_records(
        &self,
        session: &SessionToken,
        _domain: &str,
    ) -> Result<Vec<RemoteRecord>> {
        self.check(session)?;
        Ok(Vec::new())
    }

    async fn create_record(
        &self,
        session: &SessionToken,
        _domain: &str,
        subdomain: &str,
        record_type: &RecordType,
        value: &str,
        ttl: u32,
    ) -> Result<RemoteRecord> {
        self.check(session)?;
        Ok(RemoteRecord {
            id: "new".to_string(),
            subdomain: subdomain.to_string(),
            record_type: record_type.clone(),
            value: value.to_string(),
            enabled: true,
            area: "default".to_string(),
            ttl: Some(ttl),
        })
    }

    async fn update_record(
        &self,
        session: &SessionToken,
        _domain: &str,
        record_id: &str,
        _fields: &RecordUpdate,
    ) -> Result<RemoteRecord> {
        self.check(session)?;
        Ok(record(record_id, "nas", "A", "0.0.0.0"))
    }

    async fn delete_record(
        &self,
        session: &SessionToken,
        _domain: &str,
        _record_id: &str,
    ) -> Result<()> {
        self.check(session)
    }
}
