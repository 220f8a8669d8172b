//! Record API request and response bodies

use nasddns_core::record::{DEFAULT_AREA, RecordType, RecordUpdate, RemoteRecord};
use serde::{Deserialize, Deserializer, Serialize};

#[derive(Debug, Serialize)]
pub(crate) struct LoginRequest<'a> {
    pub username: &'a str,
    pub password: &'a str,
}

#[derive(Debug, Deserialize)]
pub(crate) struct LoginResponse {
    pub token: String,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ListRecordsResponse {
    #[serde(default)]
    pub records: Vec<WireRecord>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct RecordResponse {
    pub record: WireRecord,
}

#[derive(Debug, Serialize)]
pub(crate) struct CreateRecordRequest<'a> {
    pub sub_domain: &'a str,
    #[serde(rename = "type")]
    pub record_type: &'a str,
    pub value: &'a str,
    pub ttl: u32,
}

/// Partial update; unset fields are omitted from the body
#[derive(Debug, Serialize)]
pub(crate) struct UpdateRecordRequest<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub enabled: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ttl: Option<u32>,
}

impl<'a> From<&'a RecordUpdate> for UpdateRecordRequest<'a> {
    fn from(update: &'a RecordUpdate) -> Self {
        Self {
            value: update.value.as_deref(),
            enabled: update.enabled,
            ttl: update.ttl,
        }
    }
}

/// A record as the provider serializes it
#[derive(Debug, Deserialize)]
pub(crate) struct WireRecord {
    #[serde(deserialize_with = "string_or_number")]
    pub id: String,
    pub sub_domain: String,
    #[serde(rename = "type")]
    pub record_type: RecordType,
    pub value: String,
    #[serde(default = "default_enabled")]
    pub enabled: bool,
    #[serde(default = "default_area")]
    pub area: String,
    #[serde(default)]
    pub ttl: Option<u32>,
}

impl From<WireRecord> for RemoteRecord {
    fn from(w: WireRecord) -> Self {
        RemoteRecord {
            id: w.id,
            subdomain: w.sub_domain,
            record_type: w.record_type,
            value: w.value,
            enabled: w.enabled,
            area: w.area,
            ttl: w.ttl,
        }
    }
}

fn default_enabled() -> bool {
    true
}

fn default_area() -> String {
    DEFAULT_AREA.to_string()
}

/// Record ids arrive as strings from some endpoints and numbers from others
fn string_or_number<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Id {
        Text(String),
        Number(u64),
    }

    Ok(match Id::deserialize(deserializer)? {
        Id::Text(s) => s,
        Id::Number(n) => n.to_string(),
    })
}
