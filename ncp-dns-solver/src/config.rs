//! Solver configuration decoding and startup settings

use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::error::{SolverError, SolverResult};
use crate::types::{SecretKeySelector, SolverConfig};

/// Default directory holding mounted secrets (`<dir>/<namespace>/<name>/<key>`).
pub const DEFAULT_SECRETS_DIR: &str = "/var/run/secrets/ncp-dns";
/// Default `tracing` filter when `RUST_LOG` is not set.
pub const DEFAULT_LOG_FILTER: &str = "info";

impl SolverConfig {
    /// Decodes and validates the issuer's solver configuration.
    pub fn from_request_config(raw: Option<&serde_json::Value>) -> SolverResult<Self> {
        let Some(raw) = raw.filter(|v| !v.is_null()) else {
            return Err(SolverError::Config(
                "solver config is missing from the challenge request".to_string(),
            ));
        };

        let config: Self = serde_json::from_value(raw.clone())
            .map_err(|e| SolverError::Config(format!("error decoding solver config: {e}")))?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> SolverResult<()> {
        if self.base_url.trim().is_empty() {
            return Err(SolverError::Config("baseUrl must not be empty".to_string()));
        }
        validate_selector("accessTokenSecretRef", &self.access_key_ref)?;
        validate_selector("secretKeySecretRef", &self.secret_key_ref)
    }
}

fn validate_selector(field: &str, selector: &SecretKeySelector) -> SolverResult<()> {
    if selector.name.is_empty() {
        return Err(SolverError::Config(format!("{field}.name must not be empty")));
    }
    if selector.key.is_empty() {
        return Err(SolverError::Config(format!("{field}.key must not be empty")));
    }
    Ok(())
}

/// Process-wide settings, fixed at startup and passed down explicitly.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct SolverSettings {
    /// API group the solver is registered under with the host framework.
    pub group_name: String,
    /// Root of the mounted-secret directory tree.
    pub secrets_dir: PathBuf,
    /// `tracing` filter directive used when `RUST_LOG` is unset.
    pub log_filter: String,
}

impl Default for SolverSettings {
    fn default() -> Self {
        Self {
            group_name: String::new(),
            secrets_dir: PathBuf::from(DEFAULT_SECRETS_DIR),
            log_filter: DEFAULT_LOG_FILTER.to_string(),
        }
    }
}

impl SolverSettings {
    /// Parses settings from TOML text.
    pub fn from_toml(text: &str) -> SolverResult<Self> {
        toml::from_str(text).map_err(|e| SolverError::Config(format!("invalid settings: {e}")))
    }

    /// Reads and parses a TOML settings file.
    pub async fn load(path: &Path) -> SolverResult<Self> {
        let text = tokio::fs::read_to_string(path).await.map_err(|e| {
            SolverError::Config(format!("failed to read {}: {e}", path.display()))
        })?;
        Self::from_toml(&text)
    }

    /// Checks the values that have no usable default.
    pub fn validate(&self) -> SolverResult<()> {
        if self.group_name.trim().is_empty() {
            return Err(SolverError::Config(
                "group_name must be specified".to_string(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn valid_config() -> serde_json::Value {
        json!({
            "accessTokenSecretRef": {"name": "ncp-credentials", "key": "access-key"},
            "secretKeySecretRef": {"name": "ncp-credentials", "key": "secret-key"},
            "baseUrl": "https://ncloud.example.test"
        })
    }

    #[test]
    fn decodes_valid_config() {
        let config = SolverConfig::from_request_config(Some(&valid_config())).unwrap();
        assert_eq!(config.access_key_ref.name, "ncp-credentials");
    }

    #[test]
    fn missing_config_is_error() {
        assert!(matches!(
            SolverConfig::from_request_config(None),
            Err(SolverError::Config(_))
        ));
        assert!(matches!(
            SolverConfig::from_request_config(Some(&serde_json::Value::Null)),
            Err(SolverError::Config(_))
        ));
    }

    #[test]
    fn malformed_config_is_error() {
        let result = SolverConfig::from_request_config(Some(&json!({"baseUrl": 5})));
        assert!(
            matches!(&result, Err(SolverError::Config(msg)) if msg.starts_with("error decoding solver config")),
            "unexpected result: {result:?}"
        );
    }

    #[test]
    fn empty_base_url_is_error() {
        let mut raw = valid_config();
        raw["baseUrl"] = json!("");
        assert!(matches!(
            SolverConfig::from_request_config(Some(&raw)),
            Err(SolverError::Config(_))
        ));
    }

    #[test]
    fn selector_without_key_is_error() {
        let mut raw = valid_config();
        raw["secretKeySecretRef"] = json!({"name": "ncp-credentials"});
        let result = SolverConfig::from_request_config(Some(&raw));
        assert!(
            matches!(&result, Err(SolverError::Config(msg)) if msg == "secretKeySecretRef.key must not be empty"),
            "unexpected result: {result:?}"
        );
    }

    #[test]
    fn settings_from_toml() {
        let settings = SolverSettings::from_toml(
            r#"
            group_name = "acme.example.com"
            secrets_dir = "/tmp/secrets"
            "#,
        )
        .unwrap();
        assert_eq!(settings.group_name, "acme.example.com");
        assert_eq!(settings.secrets_dir, PathBuf::from("/tmp/secrets"));
        assert_eq!(settings.log_filter, DEFAULT_LOG_FILTER);
        assert!(settings.validate().is_ok());
    }

    #[test]
    fn settings_require_group_name() {
        let settings = SolverSettings::from_toml("").unwrap();
        assert!(matches!(settings.validate(), Err(SolverError::Config(_))));
    }

    #[test]
    fn settings_reject_unknown_types() {
        assert!(SolverSettings::from_toml("group_name = 3").is_err());
    }

    #[tokio::test]
    async fn settings_load_missing_file() {
        let result = SolverSettings::load(Path::new("/nonexistent/ncp-dns.toml")).await;
        assert!(matches!(result, Err(SolverError::Config(_))));
    }
}
