//! Domain lookup, TXT record mutation and change publishing

use reqwest::Method;

use crate::error::{ProviderError, Result};
use crate::types::{DomainEntry, DomainId, Page, RecordEntry, RecordId, RecordType, TxtRecord};
use crate::utils::domain::un_fqdn;

use super::{APPLY_PATH, DOMAIN_PAGE_SIZE, DOMAIN_PATH, NcpDnsClient, RECORD_PATH};

impl NcpDnsClient {
    /// Resolves a zone name to the provider's numeric domain id.
    ///
    /// A trailing root separator is stripped before searching. The first
    /// entry of the first result page is returned.
    pub async fn get_domain_id(&self, domain_name: &str) -> Result<DomainId> {
        let name = un_fqdn(domain_name);
        let size = DOMAIN_PAGE_SIZE.to_string();

        let page: Page<DomainEntry> = self
            .get(
                DOMAIN_PATH,
                &[("page", "0"), ("size", size.as_str()), ("domainName", name)],
                "get_domain_id",
            )
            .await?;

        let Some(entry) = page.content.into_iter().next() else {
            return Err(ProviderError::DomainNotFound {
                domain: name.to_string(),
            });
        };

        if let Some(found) = entry.name.as_deref()
            && !found.eq_ignore_ascii_case(name)
        {
            log::warn!("[ncpdns] Domain search for '{name}' returned '{found}' first");
        }

        log::debug!("[ncpdns] Domain '{name}' has id {}", entry.id);
        Ok(DomainId(entry.id))
    }

    /// Creates a TXT record (TTL 300) and publishes the change.
    ///
    /// Publishing is skipped when the creation call fails.
    pub async fn create_txt_record(
        &self,
        domain_id: DomainId,
        host: &str,
        content: &str,
    ) -> Result<()> {
        let path = format!("{RECORD_PATH}/{domain_id}");
        let body = [TxtRecord::challenge(host, content)];

        self.send_json(Method::POST, &path, &body, "create_txt_record")
            .await?;
        log::info!("[ncpdns] Created TXT record '{host}' in domain {domain_id}");

        self.apply_changes(domain_id).await
    }

    /// Finds the id of the TXT record whose host matches `host`.
    ///
    /// The provider's `searchContent` filter is a free-text match; only one
    /// result is requested.
    pub async fn get_txt_record_id(&self, domain_id: DomainId, host: &str) -> Result<RecordId> {
        let path = format!("{RECORD_PATH}/{domain_id}");

        let page: Page<RecordEntry> = self
            .get(
                &path,
                &[
                    ("page", "0"),
                    ("size", "1"),
                    ("recordType", RecordType::Txt.as_str()),
                    ("searchContent", host),
                ],
                "get_txt_record_id",
            )
            .await?;

        let Some(entry) = page.content.into_iter().next() else {
            return Err(ProviderError::RecordNotFound {
                domain_id: domain_id.0,
                host: host.to_string(),
            });
        };

        // TODO: page through results and require an exact host match once
        // the search endpoint's matching rules are confirmed.
        if let Some(found) = entry.host.as_deref()
            && found != host
        {
            log::warn!(
                "[ncpdns] TXT search for '{host}' in domain {domain_id} matched host '{found}'"
            );
        }

        Ok(RecordId(entry.id))
    }

    /// Deletes records by id and publishes the change.
    ///
    /// Publishing is skipped when the deletion call fails.
    pub async fn delete_txt_records(
        &self,
        domain_id: DomainId,
        record_ids: &[RecordId],
    ) -> Result<()> {
        if record_ids.is_empty() {
            return Err(ProviderError::InvalidParameter {
                param: "record_ids".to_string(),
                detail: "at least one record id is required".to_string(),
            });
        }

        let path = format!("{RECORD_PATH}/{domain_id}");
        self.send_json(Method::DELETE, &path, record_ids, "delete_txt_records")
            .await?;
        log::info!(
            "[ncpdns] Deleted {} TXT record(s) from domain {domain_id}",
            record_ids.len()
        );

        self.apply_changes(domain_id).await
    }

    /// Publishes the domain's pending record changes.
    pub(crate) async fn apply_changes(&self, domain_id: DomainId) -> Result<()> {
        let path = format!("{APPLY_PATH}/{domain_id}");
        self.put_empty(&path, "apply_changes").await?;
        log::info!("[ncpdns] Applied pending changes for domain {domain_id}");
        Ok(())
    }
}
