//! Public types and NCP DNS wire structures.

use std::fmt;

use serde::{Deserialize, Serialize};

/// TTL applied to every challenge record (seconds).
pub const TXT_RECORD_TTL: u32 = 300;

// ============ Credentials ============

/// Access key pair and API endpoint for one client instance.
///
/// Supplied once at construction and never mutated afterwards.
#[derive(Clone, PartialEq, Eq)]
pub struct ProviderCredentials {
    /// NCP IAM access key, sent in `x-ncp-iam-access-key`.
    pub access_key: String,
    /// NCP IAM secret key. Used only as the HMAC key, never transmitted.
    pub secret_key: String,
    /// API gateway base URL, e.g. `https://globaldns.apigw.ntruss.com`.
    pub base_url: String,
}

impl ProviderCredentials {
    /// Creates credentials from their three parts.
    pub fn new(
        access_key: impl Into<String>,
        secret_key: impl Into<String>,
        base_url: impl Into<String>,
    ) -> Self {
        Self {
            access_key: access_key.into(),
            secret_key: secret_key.into(),
            base_url: base_url.into(),
        }
    }
}

impl fmt::Debug for ProviderCredentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ProviderCredentials")
            .field("access_key", &self.access_key)
            .field("secret_key", &"***")
            .field("base_url", &self.base_url)
            .finish()
    }
}

// ============ Identifiers ============

/// Provider-assigned numeric identifier of a DNS zone.
///
/// Re-resolved by name for every operation; never cached.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DomainId(pub i64);

impl fmt::Display for DomainId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Provider-assigned numeric identifier of one record inside a domain.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RecordId(pub i64);

impl fmt::Display for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

// ============ Request bodies ============

/// Record type accepted by this client. Only TXT is ever created.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RecordType {
    /// Text record.
    #[serde(rename = "TXT")]
    Txt,
}

impl RecordType {
    /// Value used in the `type` body field and the `recordType` query parameter.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Txt => "TXT",
        }
    }
}

/// One entry of the record-creation request body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TxtRecord {
    /// Record name relative to the zone (e.g. `_acme-challenge`).
    pub host: String,
    /// Always [`RecordType::Txt`].
    #[serde(rename = "type")]
    pub record_type: RecordType,
    /// Challenge token value.
    pub content: String,
    /// Time to live in seconds.
    pub ttl: u32,
}

impl TxtRecord {
    /// Builds a challenge record with the fixed [`TXT_RECORD_TTL`].
    pub fn challenge(host: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            host: host.into(),
            record_type: RecordType::Txt,
            content: content.into(),
            ttl: TXT_RECORD_TTL,
        }
    }
}

// ============ Response bodies ============

/// Paginated search envelope returned by the domain and record search endpoints.
///
/// Only `content` is read; paging counters are ignored.
#[derive(Debug, Deserialize)]
pub(crate) struct Page<T> {
    #[serde(default = "Vec::new")]
    pub content: Vec<T>,
}

/// Domain search entry.
#[derive(Debug, Deserialize)]
pub(crate) struct DomainEntry {
    pub id: i64,
    #[serde(default)]
    pub name: Option<String>,
}

/// Record search entry.
#[derive(Debug, Deserialize)]
pub(crate) struct RecordEntry {
    pub id: i64,
    #[serde(default)]
    pub host: Option<String>,
}
