//! HTTP transport seam
//!
//! The client builds fully signed [`HttpRequest`] values and hands them to an
//! [`HttpTransport`]. Production code uses [`ReqwestTransport`]; tests swap in a
//! transport that records requests and replays canned responses.
//!
//! # design principles
//! - **Signing stays in the client** - the transport only moves bytes
//! - **No retries** - every failure goes straight back to the caller
//! - **Status is data** - non-2xx responses are returned, not turned into errors here

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, Method};
use serde::de::DeserializeOwned;

use crate::error::{ProviderError, Result};
use crate::utils::log_sanitizer::truncate_for_log;

/// 默认连接超时（秒）
const DEFAULT_CONNECT_TIMEOUT_SECS: u64 = 10;
/// 默认请求超时（秒）
const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;

/// A signed request ready to be dispatched.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpRequest {
    /// HTTP method.
    pub method: Method,
    /// Absolute URL including the query string.
    pub url: String,
    /// Header name/value pairs, in insertion order.
    pub headers: Vec<(String, String)>,
    /// JSON body, if any.
    pub body: Option<String>,
}

impl HttpRequest {
    /// Returns the first header value with the given (case-insensitive) name.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }
}

/// Status and body of a provider response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpResponse {
    /// HTTP status code.
    pub status: u16,
    /// Response body as text (may be empty).
    pub body: String,
}

impl HttpResponse {
    /// Creates a response from a status and body.
    pub fn new(status: u16, body: impl Into<String>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }

    /// Whether the status is in the 2xx range.
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Minimal capability used by the client to talk to the provider.
#[async_trait]
pub trait HttpTransport: Send + Sync {
    /// Sends one request and returns its response.
    ///
    /// Implementations return `Err` only for transport failures; any HTTP
    /// status, successful or not, is an `Ok` response.
    async fn send(&self, request: HttpRequest) -> Result<HttpResponse>;
}

/// [`HttpTransport`] backed by `reqwest`.
#[derive(Debug, Clone)]
pub struct ReqwestTransport {
    client: Client,
}

/// Builder for [`ReqwestTransport`] with configurable timeouts.
pub struct ReqwestTransportBuilder {
    connect_timeout: Duration,
    request_timeout: Duration,
}

impl ReqwestTransportBuilder {
    fn new() -> Self {
        Self {
            connect_timeout: Duration::from_secs(DEFAULT_CONNECT_TIMEOUT_SECS),
            request_timeout: Duration::from_secs(DEFAULT_REQUEST_TIMEOUT_SECS),
        }
    }

    /// Set the connection timeout (default: 10s).
    pub fn connect_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout = timeout;
        self
    }

    /// Set the total request timeout (default: 30s).
    pub fn request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = timeout;
        self
    }

    /// Build the [`ReqwestTransport`] instance.
    pub fn build(self) -> Result<ReqwestTransport> {
        let client = Client::builder()
            .connect_timeout(self.connect_timeout)
            .timeout(self.request_timeout)
            .build()
            .map_err(|e| ProviderError::NetworkError {
                detail: format!("Failed to create HTTP client: {e}"),
            })?;
        Ok(ReqwestTransport { client })
    }
}

impl ReqwestTransport {
    /// Creates a transport with the default timeouts.
    pub fn new() -> Result<Self> {
        Self::builder().build()
    }

    /// Returns a builder for customizing timeouts.
    pub fn builder() -> ReqwestTransportBuilder {
        ReqwestTransportBuilder::new()
    }
}

#[async_trait]
impl HttpTransport for ReqwestTransport {
    async fn send(&self, request: HttpRequest) -> Result<HttpResponse> {
        let mut builder = self.client.request(request.method.clone(), &request.url);
        for (name, value) in &request.headers {
            builder = builder.header(name, value);
        }
        if let Some(body) = request.body {
            builder = builder.body(body);
        }

        let response = builder.send().await.map_err(|e| {
            if e.is_timeout() {
                ProviderError::Timeout {
                    detail: e.to_string(),
                }
            } else {
                ProviderError::NetworkError {
                    detail: e.to_string(),
                }
            }
        })?;

        let status = response.status().as_u16();
        let body = response
            .text()
            .await
            .map_err(|e| ProviderError::NetworkError {
                detail: format!("Failed to read response body: {e}"),
            })?;

        Ok(HttpResponse { status, body })
    }
}

/// HTTP tool function set
pub(crate) struct HttpUtils;

impl HttpUtils {
    /// Sends a request through `transport` with request/response logging.
    pub async fn execute(
        transport: &dyn HttpTransport,
        request: HttpRequest,
        operation: &'static str,
    ) -> Result<HttpResponse> {
        log::debug!("[ncpdns] {operation}: {} {}", request.method, request.url);
        if let Some(body) = &request.body {
            log::debug!("[ncpdns] Request Body: {}", truncate_for_log(body));
        }

        let response = transport.send(request).await?;

        log::debug!("[ncpdns] Response Status: {}", response.status);
        log::debug!(
            "[ncpdns] Response Body: {}",
            truncate_for_log(&response.body)
        );
        Ok(response)
    }

    /// Turns a non-2xx response into [`ProviderError::ApiError`].
    pub fn ensure_success(response: &HttpResponse, operation: &'static str) -> Result<()> {
        if response.is_success() {
            return Ok(());
        }
        log::warn!(
            "[ncpdns] {operation} returned HTTP {}: {}",
            response.status,
            truncate_for_log(&response.body)
        );
        Err(ProviderError::ApiError {
            operation,
            status: response.status,
            raw_message: Some(truncate_for_log(&response.body)),
        })
    }

    /// Parse JSON response
    pub fn parse_json<T>(response_text: &str, operation: &'static str) -> Result<T>
    where
        T: DeserializeOwned,
    {
        serde_json::from_str(response_text).map_err(|e| {
            log::error!("[ncpdns] {operation}: JSON parse failed: {e}");
            log::error!(
                "[ncpdns] Raw response: {}",
                truncate_for_log(response_text)
            );
            ProviderError::ParseError {
                operation,
                detail: e.to_string(),
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn success_range() {
        assert!(HttpResponse::new(200, "").is_success());
        assert!(HttpResponse::new(204, "").is_success());
        assert!(!HttpResponse::new(302, "").is_success());
        assert!(!HttpResponse::new(500, "").is_success());
    }

    #[test]
    fn ensure_success_maps_status() {
        let err = HttpUtils::ensure_success(&HttpResponse::new(404, "gone"), "apply_changes")
            .unwrap_err();
        assert!(
            matches!(
                &err,
                ProviderError::ApiError {
                    operation: "apply_changes",
                    status: 404,
                    raw_message: Some(m),
                } if m == "gone"
            ),
            "unexpected error: {err:?}"
        );
    }

    #[test]
    fn header_lookup_is_case_insensitive() {
        let req = HttpRequest {
            method: Method::GET,
            url: "https://example.test/".into(),
            headers: vec![("Content-Type".into(), "application/json".into())],
            body: None,
        };
        assert_eq!(req.header("content-type"), Some("application/json"));
        assert_eq!(req.header("x-missing"), None);
    }

    #[test]
    fn parse_json_valid() {
        #[derive(serde::Deserialize, Debug, PartialEq)]
        struct Foo {
            x: i32,
        }
        let result: Result<Foo> = HttpUtils::parse_json(r#"{"x":42}"#, "test");
        assert!(
            matches!(&result, Ok(Foo { x: 42 })),
            "unexpected parse result: {result:?}"
        );
    }

    #[test]
    fn parse_json_invalid() {
        #[derive(serde::Deserialize, Debug)]
        #[allow(dead_code)]
        struct Foo {
            x: i32,
        }
        let result: Result<Foo> = HttpUtils::parse_json("not json", "test");
        assert!(
            matches!(&result, Err(ProviderError::ParseError { .. })),
            "unexpected parse result: {result:?}"
        );
    }
}
