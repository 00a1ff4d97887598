//! Inbound challenge request and per-issuer solver configuration

use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize};

/// Whether the host framework wants the record created or removed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ChallengeAction {
    /// Create the challenge record.
    Present,
    /// Remove the challenge record.
    CleanUp,
}

/// One DNS-01 challenge, as handed over by the host framework.
///
/// Field names follow cert-manager's `ChallengeRequest` JSON.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChallengeRequest {
    #[serde(default)]
    pub uid: Option<String>,
    #[serde(default)]
    pub action: Option<ChallengeAction>,
    #[serde(default, rename = "type")]
    pub challenge_type: Option<String>,
    #[serde(default)]
    pub dns_name: Option<String>,
    /// Challenge token to publish as the TXT value.
    pub key: String,
    /// Namespace secret references are resolved in.
    #[serde(default)]
    pub resource_namespace: String,
    /// Fully-qualified record name with trailing separator.
    #[serde(rename = "resolvedFQDN")]
    pub resolved_fqdn: String,
    /// Fully-qualified zone name with trailing separator.
    pub resolved_zone: String,
    #[serde(default)]
    pub allow_ambient_credentials: bool,
    /// Raw solver configuration from the issuer.
    #[serde(default)]
    pub config: Option<serde_json::Value>,
}

/// Accepted input shapes: a bare request, or the review envelope that wraps it.
///
/// A document with a `request` member is an envelope; anything else is decoded
/// as a bare request. Decode errors name the offending field.
#[derive(Debug)]
pub enum ChallengeInput {
    Envelope { request: ChallengeRequest },
    Bare(ChallengeRequest),
}

impl<'de> Deserialize<'de> for ChallengeInput {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let mut value = serde_json::Value::deserialize(deserializer)?;
        if let Some(request) = value.get_mut("request").map(serde_json::Value::take) {
            return serde_json::from_value(request)
                .map(|request| Self::Envelope { request })
                .map_err(|e| D::Error::custom(format!("request: {e}")));
        }
        serde_json::from_value(value)
            .map(Self::Bare)
            .map_err(D::Error::custom)
    }
}

impl ChallengeInput {
    pub fn into_request(self) -> ChallengeRequest {
        match self {
            Self::Envelope { request } | Self::Bare(request) => request,
        }
    }
}

/// Reference to one key of a namespaced secret.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SecretKeySelector {
    pub name: String,
    #[serde(default)]
    pub key: String,
}

/// Solver configuration carried in [`ChallengeRequest::config`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SolverConfig {
    /// Secret holding the NCP access key.
    #[serde(rename = "accessTokenSecretRef")]
    pub access_key_ref: SecretKeySelector,
    /// Secret holding the NCP secret key.
    #[serde(rename = "secretKeySecretRef")]
    pub secret_key_ref: SecretKeySelector,
    /// NCP API gateway base URL.
    pub base_url: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_cert_manager_request() {
        let json = r#"{
            "uid": "a1b2",
            "action": "Present",
            "type": "dns-01",
            "dnsName": "example.com",
            "key": "abc123",
            "resourceNamespace": "cert-manager",
            "resolvedFQDN": "_acme-challenge.example.com.",
            "resolvedZone": "example.com.",
            "allowAmbientCredentials": false,
            "config": {"baseUrl": "https://ncloud.example.test"}
        }"#;
        let request: ChallengeRequest = serde_json::from_str(json).unwrap();
        assert_eq!(request.action, Some(ChallengeAction::Present));
        assert_eq!(request.resolved_fqdn, "_acme-challenge.example.com.");
        assert_eq!(request.resolved_zone, "example.com.");
        assert_eq!(request.resource_namespace, "cert-manager");
        assert!(request.config.is_some());
    }

    #[test]
    fn envelope_and_bare_inputs() {
        let bare = r#"{"key":"k","resolvedFQDN":"a.example.com.","resolvedZone":"example.com."}"#;
        let envelope = format!(r#"{{"apiVersion":"acme.cert-manager.io/v1alpha1","request":{bare}}}"#);

        let from_bare = serde_json::from_str::<ChallengeInput>(bare)
            .unwrap()
            .into_request();
        let from_envelope = serde_json::from_str::<ChallengeInput>(&envelope)
            .unwrap()
            .into_request();

        assert_eq!(from_bare.resolved_fqdn, "a.example.com.");
        assert_eq!(from_envelope.resolved_fqdn, "a.example.com.");
        assert_eq!(from_envelope.action, None);
    }

    #[test]
    fn decode_error_names_missing_field() {
        let bare = r#"{"key":"k","resolvedZone":"example.com."}"#;
        let envelope = format!(r#"{{"request":{bare}}}"#);

        let err = serde_json::from_str::<ChallengeInput>(bare).unwrap_err();
        assert!(err.to_string().contains("resolvedFQDN"), "{err}");

        let err = serde_json::from_str::<ChallengeInput>(&envelope).unwrap_err();
        assert!(err.to_string().starts_with("request: "), "{err}");
        assert!(err.to_string().contains("resolvedFQDN"), "{err}");
    }

    #[test]
    fn solver_config_field_names() {
        let config: SolverConfig = serde_json::from_value(serde_json::json!({
            "accessTokenSecretRef": {"name": "ncp", "key": "access-key"},
            "secretKeySecretRef": {"name": "ncp", "key": "secret-key"},
            "baseUrl": "https://ncloud.example.test"
        }))
        .unwrap();
        assert_eq!(config.access_key_ref.key, "access-key");
        assert_eq!(config.secret_key_ref.key, "secret-key");
        assert_eq!(config.base_url, "https://ncloud.example.test");
    }
}
