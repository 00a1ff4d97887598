//! DNS-01 challenge solver backed by NCP Global DNS

use std::sync::Arc;

use ncp_dns_provider::{
    HttpTransport, NcpDnsClient, ProviderCredentials, ReqwestTransport, extract_record_name,
    mask_key, un_fqdn,
};

use crate::error::{CredentialError, SolverError, SolverResult};
use crate::secrets::SecretResolver;
use crate::types::{ChallengeAction, ChallengeRequest, SecretKeySelector, SolverConfig};

/// Name the solver registers under with the host framework.
pub const SOLVER_NAME: &str = "ncp-dns-solver";

/// Answers `present` / `clean_up` calls for DNS-01 challenges.
///
/// Holds no per-challenge state: credentials are resolved and a fresh
/// [`NcpDnsClient`] is built for every call.
pub struct NcpDnsSolver {
    group_name: String,
    secrets: Arc<dyn SecretResolver>,
    transport: Arc<dyn HttpTransport>,
}

/// Builder for [`NcpDnsSolver`].
pub struct NcpDnsSolverBuilder {
    group_name: String,
    secrets: Arc<dyn SecretResolver>,
    transport: Option<Arc<dyn HttpTransport>>,
}

impl NcpDnsSolverBuilder {
    /// Use `transport` for provider calls instead of a new [`ReqwestTransport`].
    #[must_use]
    pub fn transport(mut self, transport: Arc<dyn HttpTransport>) -> Self {
        self.transport = Some(transport);
        self
    }

    /// Build the [`NcpDnsSolver`] instance.
    pub fn build(self) -> SolverResult<NcpDnsSolver> {
        if self.group_name.trim().is_empty() {
            return Err(SolverError::Config(
                "group_name must be specified".to_string(),
            ));
        }
        let transport: Arc<dyn HttpTransport> = match self.transport {
            Some(transport) => transport,
            None => Arc::new(ReqwestTransport::new().map_err(SolverError::Transport)?),
        };
        Ok(NcpDnsSolver {
            group_name: self.group_name,
            secrets: self.secrets,
            transport,
        })
    }
}

impl NcpDnsSolver {
    /// Returns a builder; `group_name` is the API group passed in at startup.
    pub fn builder(
        group_name: impl Into<String>,
        secrets: Arc<dyn SecretResolver>,
    ) -> NcpDnsSolverBuilder {
        NcpDnsSolverBuilder {
            group_name: group_name.into(),
            secrets,
            transport: None,
        }
    }

    /// Solver name, as registered with the host framework.
    pub fn name(&self) -> &'static str {
        SOLVER_NAME
    }

    /// API group the solver serves.
    pub fn group_name(&self) -> &str {
        &self.group_name
    }

    /// Creates the challenge TXT record and publishes it.
    #[tracing::instrument(skip_all, fields(zone = %ch.resolved_zone, fqdn = %ch.resolved_fqdn))]
    pub async fn present(&self, ch: &ChallengeRequest) -> SolverResult<()> {
        let client = self.client_for(ch).await?;
        let zone = un_fqdn(&ch.resolved_zone);
        let host = extract_record_name(&ch.resolved_fqdn, zone);

        tracing::info!("Attempting to get domain ID for zone: {zone}");
        let domain_id = client
            .get_domain_id(zone)
            .await
            .map_err(|e| SolverError::provider("getting domain ID", zone, e))?;
        tracing::info!("Domain ID for zone {zone} is {domain_id}");

        client
            .create_txt_record(domain_id, &host, &ch.key)
            .await
            .map_err(|e| SolverError::provider("creating TXT record", zone, e))?;

        tracing::info!("Presented TXT record '{host}' in zone {zone}");
        Ok(())
    }

    /// Deletes the challenge TXT record and publishes the removal.
    #[tracing::instrument(skip_all, fields(zone = %ch.resolved_zone, fqdn = %ch.resolved_fqdn))]
    pub async fn clean_up(&self, ch: &ChallengeRequest) -> SolverResult<()> {
        let client = self.client_for(ch).await?;
        let zone = un_fqdn(&ch.resolved_zone);
        let host = extract_record_name(&ch.resolved_fqdn, zone);

        let domain_id = client
            .get_domain_id(zone)
            .await
            .map_err(|e| SolverError::provider("getting domain ID", zone, e))?;

        let record_id = client
            .get_txt_record_id(domain_id, &host)
            .await
            .map_err(|e| SolverError::provider("getting TXT record ID", zone, e))?;

        client
            .delete_txt_records(domain_id, &[record_id])
            .await
            .map_err(|e| SolverError::provider("deleting TXT record", zone, e))?;

        tracing::info!("Cleaned up TXT record '{host}' (id {record_id}) in zone {zone}");
        Ok(())
    }

    /// Dispatches on the request's `action` field.
    pub async fn handle(&self, ch: &ChallengeRequest) -> SolverResult<()> {
        match ch.action {
            Some(ChallengeAction::Present) => self.present(ch).await,
            Some(ChallengeAction::CleanUp) => self.clean_up(ch).await,
            None => Err(SolverError::Config(
                "challenge request has no action".to_string(),
            )),
        }
    }

    async fn client_for(&self, ch: &ChallengeRequest) -> SolverResult<NcpDnsClient> {
        let config = SolverConfig::from_request_config(ch.config.as_ref())?;
        let namespace = ch.resource_namespace.as_str();

        let access_key = self.load_secret(&config.access_key_ref, namespace).await?;
        let secret_key = self.load_secret(&config.secret_key_ref, namespace).await?;
        tracing::debug!(
            "Loaded NCP credentials (access key {}) from namespace {namespace}",
            mask_key(&access_key)
        );

        NcpDnsClient::builder(ProviderCredentials::new(
            access_key,
            secret_key,
            config.base_url,
        ))
        .transport(Arc::clone(&self.transport))
        .build()
        .map_err(|e| SolverError::Config(e.to_string()))
    }

    async fn load_secret(&self, selector: &SecretKeySelector, namespace: &str) -> SolverResult<String> {
        let bytes = self
            .secrets
            .resolve(namespace, &selector.name, &selector.key)
            .await?;

        let value = String::from_utf8(bytes).map_err(|_| CredentialError::Access {
            namespace: namespace.to_string(),
            name: selector.name.clone(),
            detail: format!("value of key \"{}\" is not valid UTF-8", selector.key),
        })?;
        let value = value.trim();
        if value.is_empty() {
            return Err(CredentialError::Access {
                namespace: namespace.to_string(),
                name: selector.name.clone(),
                detail: format!("value of key \"{}\" is empty", selector.key),
            }
            .into());
        }
        Ok(value.to_string())
    }
}
