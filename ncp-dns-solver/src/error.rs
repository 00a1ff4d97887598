//! Unified error type definition

use thiserror::Error;

// Re-export library error type
pub use ncp_dns_provider::ProviderError;

/// Secret lookup failure.
#[derive(Error, Debug)]
pub enum CredentialError {
    /// The secret itself does not exist in the namespace.
    #[error("secret \"{namespace}/{name}\" not found")]
    SecretNotFound { namespace: String, name: String },

    /// The secret exists but has no entry under `key`.
    #[error("no key \"{key}\" in secret \"{namespace}/{name}\"")]
    KeyNotFound {
        namespace: String,
        name: String,
        key: String,
    },

    /// The secret store could not be read, or the value is unusable.
    #[error("failed to load secret \"{namespace}/{name}\": {detail}")]
    Access {
        namespace: String,
        name: String,
        detail: String,
    },
}

impl CredentialError {
    /// Whether the secret or key is simply absent.
    #[must_use]
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::SecretNotFound { .. } | Self::KeyNotFound { .. })
    }
}

/// Solver layer error type
#[derive(Error, Debug)]
pub enum SolverError {
    /// Missing or malformed solver/startup configuration
    #[error("Config error: {0}")]
    Config(String),

    /// Secret lookup failed
    #[error("Credential error: {0}")]
    Credential(#[from] CredentialError),

    /// The HTTP transport could not be set up
    #[error("HTTP transport: {0}")]
    Transport(#[source] ProviderError),

    /// A provider call failed
    #[error("ncpdns: error {operation} for zone '{zone}': {source}")]
    Provider {
        /// What the solver was doing, e.g. `"getting domain ID"`.
        operation: &'static str,
        /// Zone the challenge belongs to (root separator stripped).
        zone: String,
        #[source]
        source: ProviderError,
    },
}

impl SolverError {
    pub(crate) fn provider(operation: &'static str, zone: &str, source: ProviderError) -> Self {
        Self::Provider {
            operation,
            zone: zone.to_string(),
            source,
        }
    }

    /// Whether it is expected behavior (bad input, missing resource) rather than
    /// an infrastructure failure; used for log classification.
    ///
    /// Level `warn` should be used when returning `true` and level `error` when returning `false`.
    #[must_use]
    pub fn is_expected(&self) -> bool {
        match self {
            Self::Config(_) => true,
            Self::Credential(e) => e.is_not_found(),
            Self::Transport(_) => false,
            Self::Provider { source, .. } => source.is_expected(),
        }
    }

    /// The underlying provider error, if this failure came from the API or its transport.
    #[must_use]
    pub fn provider_error(&self) -> Option<&ProviderError> {
        match self {
            Self::Provider { source, .. } | Self::Transport(source) => Some(source),
            _ => None,
        }
    }
}

/// Solver layer Result type alias
pub type SolverResult<T> = std::result::Result<T, SolverError>;
