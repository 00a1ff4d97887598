//! NCP Global DNS client

mod http;
mod records;

use std::sync::Arc;

use reqwest::Url;

use crate::error::{ProviderError, Result};
use crate::http_client::{HttpTransport, ReqwestTransport};
use crate::types::ProviderCredentials;
use crate::utils::log_sanitizer::mask_key;

/// Domain search endpoint.
pub(crate) const DOMAIN_PATH: &str = "/dns/v1/ncpdns/domain";
/// Record collection endpoint prefix (`/{domainId}` is appended).
pub(crate) const RECORD_PATH: &str = "/dns/v1/ncpdns/record";
/// Change publishing endpoint prefix (`/{domainId}` is appended).
pub(crate) const APPLY_PATH: &str = "/dns/v1/ncpdns/record/apply";
/// Page size used for the domain search.
pub(crate) const DOMAIN_PAGE_SIZE: u32 = 20;

/// NCP Global DNS client.
///
/// Authenticates every call with the API Gateway signature v2 scheme. Holds
/// only the credentials and a transport; zone and record identifiers are
/// looked up again for every operation.
///
/// # Construction
///
/// ```rust,no_run
/// use ncp_dns_provider::{NcpDnsClient, ProviderCredentials};
///
/// let client = NcpDnsClient::new(ProviderCredentials::new(
///     "your-access-key",
///     "your-secret-key",
///     "https://globaldns.apigw.ntruss.com",
/// ))?;
/// # Ok::<(), ncp_dns_provider::ProviderError>(())
/// ```
pub struct NcpDnsClient {
    pub(crate) transport: Arc<dyn HttpTransport>,
    pub(crate) credentials: ProviderCredentials,
    /// `credentials.base_url` without trailing slashes.
    pub(crate) base_url: String,
}

/// Builder for [`NcpDnsClient`] with a replaceable transport.
pub struct NcpDnsClientBuilder {
    credentials: ProviderCredentials,
    transport: Option<Arc<dyn HttpTransport>>,
}

impl NcpDnsClientBuilder {
    fn new(credentials: ProviderCredentials) -> Self {
        Self {
            credentials,
            transport: None,
        }
    }

    /// Use `transport` instead of a freshly created [`ReqwestTransport`].
    pub fn transport(mut self, transport: Arc<dyn HttpTransport>) -> Self {
        self.transport = Some(transport);
        self
    }

    /// Build the [`NcpDnsClient`] instance.
    ///
    /// Fails with [`ProviderError::InvalidParameter`] when the base URL is not
    /// an absolute `http(s)` URL.
    pub fn build(self) -> Result<NcpDnsClient> {
        let base_url = validate_base_url(&self.credentials.base_url)?;
        let transport: Arc<dyn HttpTransport> = match self.transport {
            Some(transport) => transport,
            None => Arc::new(ReqwestTransport::new()?),
        };

        log::debug!(
            "[ncpdns] client for {base_url} (access key {})",
            mask_key(&self.credentials.access_key)
        );

        Ok(NcpDnsClient {
            transport,
            credentials: self.credentials,
            base_url,
        })
    }
}

impl NcpDnsClient {
    /// Creates a client that talks to the provider over `reqwest`.
    pub fn new(credentials: ProviderCredentials) -> Result<Self> {
        Self::builder(credentials).build()
    }

    /// Returns a builder for customizing the client.
    pub fn builder(credentials: ProviderCredentials) -> NcpDnsClientBuilder {
        NcpDnsClientBuilder::new(credentials)
    }
}

fn validate_base_url(raw: &str) -> Result<String> {
    let trimmed = raw.trim().trim_end_matches('/');
    let invalid = |detail: String| ProviderError::InvalidParameter {
        param: "base_url".to_string(),
        detail,
    };

    if trimmed.is_empty() {
        return Err(invalid("base URL is empty".to_string()));
    }
    let url = Url::parse(trimmed).map_err(|e| invalid(format!("'{trimmed}': {e}")))?;
    if !matches!(url.scheme(), "http" | "https") || url.cannot_be_a_base() {
        return Err(invalid(format!("'{trimmed}' is not an http(s) URL")));
    }
    if url.query().is_some() || url.fragment().is_some() {
        return Err(invalid(format!(
            "'{trimmed}' must not carry a query string or fragment"
        )));
    }
    Ok(trimmed.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::MockTransport;

    fn creds(base_url: &str) -> ProviderCredentials {
        ProviderCredentials::new("AK", "SK", base_url)
    }

    #[test]
    fn trailing_slash_is_dropped() {
        let client = NcpDnsClient::builder(creds("https://ncloud.example.test/"))
            .transport(Arc::new(MockTransport::new()))
            .build()
            .unwrap();
        assert_eq!(client.base_url, "https://ncloud.example.test");
    }

    #[test]
    fn path_prefix_is_kept() {
        let client = NcpDnsClient::builder(creds("https://gw.example.test/ncp"))
            .transport(Arc::new(MockTransport::new()))
            .build()
            .unwrap();
        assert_eq!(client.base_url, "https://gw.example.test/ncp");
    }

    #[test]
    fn rejects_empty_base_url() {
        let result = NcpDnsClient::builder(creds("  "))
            .transport(Arc::new(MockTransport::new()))
            .build();
        assert!(
            matches!(&result, Err(ProviderError::InvalidParameter { param, .. }) if param == "base_url"),
            "unexpected result: {:?}",
            result.err()
        );
    }

    #[test]
    fn rejects_relative_base_url() {
        let result = NcpDnsClient::builder(creds("globaldns.apigw.ntruss.com"))
            .transport(Arc::new(MockTransport::new()))
            .build();
        assert!(matches!(
            result,
            Err(ProviderError::InvalidParameter { .. })
        ));
    }

    #[test]
    fn rejects_non_http_scheme() {
        let result = NcpDnsClient::builder(creds("ftp://ncloud.example.test"))
            .transport(Arc::new(MockTransport::new()))
            .build();
        assert!(matches!(
            result,
            Err(ProviderError::InvalidParameter { .. })
        ));
    }

    #[test]
    fn rejects_query_and_fragment() {
        for base in [
            "https://ncloud.example.test/?region=kr",
            "https://ncloud.example.test/#top",
        ] {
            let result = NcpDnsClient::builder(creds(base))
                .transport(Arc::new(MockTransport::new()))
                .build();
            assert!(
                matches!(result, Err(ProviderError::InvalidParameter { .. })),
                "{base} should be rejected"
            );
        }
    }
}
