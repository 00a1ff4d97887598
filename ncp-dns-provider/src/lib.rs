//! # ncp-dns-provider
//!
//! Signed API client for NCP Global DNS, covering the calls needed to answer an
//! ACME DNS-01 challenge: look up a zone, create or delete a TXT record, and
//! publish the pending change.
//!
//! NCP buffers record mutations until an explicit *apply* call. Both
//! [`NcpDnsClient::create_txt_record`] and [`NcpDnsClient::delete_txt_records`]
//! issue that call themselves after a successful mutation.
//!
//! ## Feature Flags
//!
//! - **`native-tls`** *(default)*: Use the platform's native TLS implementation.
//! - **`rustls`**: Use rustls. Recommended for static/container builds.
//! - **`test-util`**: Export [`MockTransport`] for tests in downstream crates.
//!
//! ## Usage
//!
//! ```rust,no_run
//! use ncp_dns_provider::{NcpDnsClient, ProviderCredentials, extract_record_name};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let client = NcpDnsClient::new(ProviderCredentials::new(
//!         "access-key",
//!         "secret-key",
//!         "https://globaldns.apigw.ntruss.com",
//!     ))?;
//!
//!     let zone = "example.com.";
//!     let host = extract_record_name("_acme-challenge.example.com.", zone);
//!
//!     let domain_id = client.get_domain_id(zone).await?;
//!     client.create_txt_record(domain_id, &host, "token").await?;
//!
//!     let record_id = client.get_txt_record_id(domain_id, &host).await?;
//!     client.delete_txt_records(domain_id, &[record_id]).await?;
//!     Ok(())
//! }
//! ```
//!
//! ## Error Handling
//!
//! All operations return [`Result<T, ProviderError>`](ProviderError):
//!
//! - [`ProviderError::DomainNotFound`] / [`ProviderError::RecordNotFound`]: empty search result
//! - [`ProviderError::ApiError`]: non-2xx HTTP status (carries the status)
//! - [`ProviderError::NetworkError`] / [`ProviderError::Timeout`]: transport failure
//! - [`ProviderError::ParseError`]: malformed JSON response
//!
//! Nothing is retried.

mod client;
mod error;
mod http_client;
mod sign;
mod types;
mod utils;

#[cfg(any(test, feature = "test-util"))]
mod testing;

pub use client::{NcpDnsClient, NcpDnsClientBuilder};
pub use error::{ProviderError, Result};
pub use http_client::{
    HttpRequest, HttpResponse, HttpTransport, ReqwestTransport, ReqwestTransportBuilder,
};
pub use sign::{ACCESS_KEY_HEADER, SIGNATURE_HEADER, TIMESTAMP_HEADER, make_signature, request_uri};
pub use types::{DomainId, ProviderCredentials, RecordId, RecordType, TXT_RECORD_TTL, TxtRecord};
pub use utils::domain::{extract_record_name, un_fqdn};
pub use utils::log_sanitizer::mask_key;

#[cfg(any(test, feature = "test-util"))]
pub use testing::MockTransport;

/// Re-exported so callers can parse URLs for [`request_uri`] without a direct `reqwest` dependency.
pub use reqwest::Url;
