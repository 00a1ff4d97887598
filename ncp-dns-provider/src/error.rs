/// Unified error type for all NCP DNS API operations.
///
/// Variants carry enough context (operation, domain, record host, HTTP status)
/// to diagnose a failure from the message alone. Nothing in this crate retries:
/// every variant is returned to the caller as soon as it occurs.
#[derive(Debug, Clone)]
pub enum ProviderError {
    /// A network-level error occurred (DNS resolution failure, connection refused, etc.).
    NetworkError {
        /// Error details.
        detail: String,
    },

    /// The HTTP request timed out.
    Timeout {
        /// Error details.
        detail: String,
    },

    /// The provider answered with a non-success HTTP status.
    ApiError {
        /// Client operation that issued the request (e.g. `create_txt_record`).
        operation: &'static str,
        /// HTTP status code returned by the API.
        status: u16,
        /// Response body, if the API returned one.
        raw_message: Option<String>,
    },

    /// The domain search returned no entries.
    DomainNotFound {
        /// Domain name that was searched for.
        domain: String,
    },

    /// The TXT record search returned no entries.
    RecordNotFound {
        /// Domain the search was scoped to.
        domain_id: i64,
        /// Record host that was searched for.
        host: String,
    },

    /// A request parameter is invalid (e.g., malformed base URL).
    InvalidParameter {
        /// Name of the invalid parameter.
        param: String,
        /// Description of what's wrong.
        detail: String,
    },

    /// Failed to parse the provider's API response.
    ParseError {
        /// Client operation whose response could not be decoded.
        operation: &'static str,
        /// Details about the parse failure.
        detail: String,
    },

    /// Failed to serialize a request body.
    SerializationError {
        /// Details about the serialization failure.
        detail: String,
    },
}

impl ProviderError {
    /// 是否为预期行为（资源不存在、参数错误等），用于日志分级。
    ///
    /// 返回 `true` 时应使用 `warn` 级别，`false` 时使用 `error` 级别。
    /// **新增变体时请同步更新此方法。**
    #[must_use]
    pub fn is_expected(&self) -> bool {
        matches!(
            self,
            Self::DomainNotFound { .. }
                | Self::RecordNotFound { .. }
                | Self::InvalidParameter { .. }
        )
    }

    /// Whether the error means "the thing being looked up does not exist".
    #[must_use]
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            Self::DomainNotFound { .. } | Self::RecordNotFound { .. }
        )
    }

    /// HTTP status carried by [`ApiError`](Self::ApiError), if any.
    #[must_use]
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::ApiError { status, .. } => Some(*status),
            _ => None,
        }
    }
}

impl std::fmt::Display for ProviderError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NetworkError { detail } => {
                write!(f, "[ncpdns] Network error: {detail}")
            }
            Self::Timeout { detail } => {
                write!(f, "[ncpdns] Request timeout: {detail}")
            }
            Self::ApiError {
                operation,
                status,
                raw_message,
            } => {
                if let Some(msg) = raw_message.as_deref().filter(|m| !m.is_empty()) {
                    write!(f, "[ncpdns] {operation} failed with HTTP {status}: {msg}")
                } else {
                    write!(f, "[ncpdns] {operation} failed with HTTP {status}")
                }
            }
            Self::DomainNotFound { domain } => {
                write!(f, "[ncpdns] Domain '{domain}' not found")
            }
            Self::RecordNotFound { domain_id, host } => {
                write!(
                    f,
                    "[ncpdns] TXT record '{host}' not found in domain {domain_id}"
                )
            }
            Self::InvalidParameter { param, detail } => {
                write!(f, "[ncpdns] Invalid parameter '{param}': {detail}")
            }
            Self::ParseError { operation, detail } => {
                write!(f, "[ncpdns] Failed to decode {operation} response: {detail}")
            }
            Self::SerializationError { detail } => {
                write!(f, "[ncpdns] Serialization error: {detail}")
            }
        }
    }
}

impl std::error::Error for ProviderError {}

/// Convenience type alias for `Result<T, ProviderError>`.
pub type Result<T> = std::result::Result<T, ProviderError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_network_error() {
        let e = ProviderError::NetworkError {
            detail: "connection refused".to_string(),
        };
        assert_eq!(e.to_string(), "[ncpdns] Network error: connection refused");
    }

    #[test]
    fn display_api_error_with_body() {
        let e = ProviderError::ApiError {
            operation: "get_domain_id",
            status: 500,
            raw_message: Some("internal".to_string()),
        };
        assert_eq!(
            e.to_string(),
            "[ncpdns] get_domain_id failed with HTTP 500: internal"
        );
    }

    #[test]
    fn display_api_error_with_empty_body() {
        let e = ProviderError::ApiError {
            operation: "apply_changes",
            status: 401,
            raw_message: Some(String::new()),
        };
        assert_eq!(e.to_string(), "[ncpdns] apply_changes failed with HTTP 401");
    }

    #[test]
    fn display_domain_not_found() {
        let e = ProviderError::DomainNotFound {
            domain: "example.com".to_string(),
        };
        assert_eq!(e.to_string(), "[ncpdns] Domain 'example.com' not found");
    }

    #[test]
    fn display_record_not_found() {
        let e = ProviderError::RecordNotFound {
            domain_id: 42,
            host: "_acme-challenge".to_string(),
        };
        assert_eq!(
            e.to_string(),
            "[ncpdns] TXT record '_acme-challenge' not found in domain 42"
        );
    }

    #[test]
    fn display_parse_error() {
        let e = ProviderError::ParseError {
            operation: "get_txt_record_id",
            detail: "expected value".to_string(),
        };
        assert_eq!(
            e.to_string(),
            "[ncpdns] Failed to decode get_txt_record_id response: expected value"
        );
    }

    #[test]
    fn status_only_for_api_error() {
        let api = ProviderError::ApiError {
            operation: "x",
            status: 403,
            raw_message: None,
        };
        assert_eq!(api.status(), Some(403));
        assert_eq!(
            ProviderError::Timeout {
                detail: "t".into()
            }
            .status(),
            None
        );
    }

    #[test]
    fn expected_variants() {
        assert!(
            ProviderError::DomainNotFound {
                domain: "x".into()
            }
            .is_expected()
        );
        assert!(
            !ProviderError::NetworkError {
                detail: "x".into()
            }
            .is_expected()
        );
        assert!(
            !ProviderError::ApiError {
                operation: "x",
                status: 500,
                raw_message: None,
            }
            .is_expected()
        );
    }

    #[test]
    fn not_found_variants() {
        assert!(
            ProviderError::RecordNotFound {
                domain_id: 1,
                host: "a".into()
            }
            .is_not_found()
        );
        assert!(
            !ProviderError::ParseError {
                operation: "x",
                detail: "y".into()
            }
            .is_not_found()
        );
    }
}
