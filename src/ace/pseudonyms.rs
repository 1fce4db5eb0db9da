// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Connector for the pseudonym endpoints of the ACE service.

use std::sync::Arc;

use reqwest::Method;
use serde_json::Value;
use url::Url;

use super::client::{decode, to_body, AceClient};
use super::error::AceError;
use crate::models::PseudonymRecord;

/// Identifies a single pseudonym record within a domain.
///
/// ACE addresses records either by their original identifier plus idType
/// or by the pseudonym value itself.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecordSelector {
    ById { id: String, id_type: String },
    ByPsn { psn: String },
}

impl RecordSelector {
    /// Build a selector from the optional query parameters of a delete
    /// request. Identifier+idType wins when both forms are supplied.
    pub fn from_parts(
        id: Option<String>,
        id_type: Option<String>,
        psn: Option<String>,
    ) -> Option<Self> {
        match (id, id_type, psn) {
            (Some(id), Some(id_type), _) => Some(Self::ById { id, id_type }),
            (_, _, Some(psn)) => Some(Self::ByPsn { psn }),
            _ => None,
        }
    }
}

/// Typed operations against ACE's pseudonym endpoints.
#[derive(Clone)]
pub struct PseudonymConnector {
    client: Arc<AceClient>,
}

impl PseudonymConnector {
    pub fn new(client: Arc<AceClient>) -> Self {
        Self { client }
    }

    /// Create a batch of pseudonym records in a domain.
    pub async fn create_batch(
        &self,
        domain: &str,
        omit_prefix: bool,
        records: &[PseudonymRecord],
    ) -> Result<Vec<PseudonymRecord>, AceError> {
        let mut url = self.client.endpoint(&["domains", domain, "pseudonyms"]);
        url.query_pairs_mut()
            .append_pair("omitPrefix", bool_str(omit_prefix));
        let value = self
            .client
            .send_value(Method::POST, url, Some(&to_body(&records)?))
            .await?;
        into_records(value)
    }

    /// Create a single pseudonym record in a domain.
    ///
    /// ACE answers with an array even for single creations; the result is
    /// normalized to a list either way.
    pub async fn create(
        &self,
        domain: &str,
        record: &PseudonymRecord,
        omit_prefix: bool,
    ) -> Result<Vec<PseudonymRecord>, AceError> {
        let mut url = self.client.endpoint(&["domains", domain, "pseudonym"]);
        url.query_pairs_mut()
            .append_pair("omitPrefix", bool_str(omit_prefix));
        let value = self
            .client
            .send_value(Method::POST, url, Some(&to_body(record)?))
            .await?;
        into_records(value)
    }

    /// Retrieve all pseudonym records in a domain.
    pub async fn get_batch(&self, domain: &str) -> Result<Vec<PseudonymRecord>, AceError> {
        let url = self.client.endpoint(&["domains", domain, "pseudonyms"]);
        let value = self.client.get_value(url).await?;
        into_records(value)
    }

    /// Follow the pseudonym chain from a source domain to a target domain.
    pub async fn linked_pseudonyms(
        &self,
        source_domain: &str,
        target_domain: &str,
        source_identifier: Option<&str>,
        source_id_type: Option<&str>,
        source_psn: Option<&str>,
    ) -> Result<Vec<PseudonymRecord>, AceError> {
        let url = self.linked_pseudonyms_url(
            source_domain,
            target_domain,
            source_identifier,
            source_id_type,
            source_psn,
        );
        let value = self.client.get_value(url).await?;
        into_records(value)
    }

    /// Retrieve a pseudonym record by identifier and idType.
    pub async fn get_by_identifier(
        &self,
        domain: &str,
        id: &str,
        id_type: &str,
    ) -> Result<Vec<PseudonymRecord>, AceError> {
        let mut url = self.client.endpoint(&["domains", domain, "pseudonym"]);
        url.query_pairs_mut()
            .append_pair("id", id)
            .append_pair("idType", id_type);
        let value = self.client.get_value(url).await?;
        into_records(value)
    }

    /// Retrieve a pseudonym record by pseudonym value.
    pub async fn get_by_psn(
        &self,
        domain: &str,
        psn: &str,
    ) -> Result<Vec<PseudonymRecord>, AceError> {
        let mut url = self.client.endpoint(&["domains", domain, "pseudonym"]);
        url.query_pairs_mut().append_pair("psn", psn);
        let value = self.client.get_value(url).await?;
        into_records(value)
    }

    /// Update a batch of pseudonym records.
    pub async fn update_batch(
        &self,
        domain: &str,
        records: &[PseudonymRecord],
    ) -> Result<(), AceError> {
        let url = self.client.endpoint(&["domains", domain, "pseudonyms"]);
        self.client
            .send_no_content(Method::PUT, url, Some(&to_body(&records)?))
            .await
    }

    /// Update a record addressed by identifier and idType, replacing the
    /// entire record.
    pub async fn update_complete_by_identifier(
        &self,
        domain: &str,
        record: &PseudonymRecord,
        id: &str,
        id_type: &str,
    ) -> Result<PseudonymRecord, AceError> {
        let mut url = self
            .client
            .endpoint(&["domains", domain, "pseudonym", "complete"]);
        url.query_pairs_mut()
            .append_pair("id", id)
            .append_pair("idType", id_type);
        self.client
            .send_json(Method::PUT, url, &to_body(record)?)
            .await
    }

    /// Update a record addressed by pseudonym value, replacing the entire
    /// record.
    pub async fn update_complete_by_psn(
        &self,
        domain: &str,
        record: &PseudonymRecord,
        psn: &str,
    ) -> Result<PseudonymRecord, AceError> {
        let mut url = self
            .client
            .endpoint(&["domains", domain, "pseudonym", "complete"]);
        url.query_pairs_mut().append_pair("psn", psn);
        self.client
            .send_json(Method::PUT, url, &to_body(record)?)
            .await
    }

    /// Update a record addressed by identifier and idType.
    pub async fn update_by_identifier(
        &self,
        domain: &str,
        id: &str,
        id_type: &str,
        record: &PseudonymRecord,
    ) -> Result<PseudonymRecord, AceError> {
        let mut url = self.client.endpoint(&["domains", domain, "pseudonym"]);
        url.query_pairs_mut()
            .append_pair("id", id)
            .append_pair("idType", id_type);
        self.client
            .send_json(Method::PUT, url, &to_body(record)?)
            .await
    }

    /// Update a record addressed by pseudonym value.
    pub async fn update_by_psn(
        &self,
        domain: &str,
        psn: &str,
        record: &PseudonymRecord,
    ) -> Result<PseudonymRecord, AceError> {
        let mut url = self.client.endpoint(&["domains", domain, "pseudonym"]);
        url.query_pairs_mut().append_pair("psn", psn);
        self.client
            .send_json(Method::PUT, url, &to_body(record)?)
            .await
    }

    /// Delete all pseudonym records in a domain.
    pub async fn delete_batch(&self, domain: &str) -> Result<(), AceError> {
        let url = self.client.endpoint(&["domains", domain, "pseudonyms"]);
        self.client.send_no_content(Method::DELETE, url, None).await
    }

    /// Delete a single pseudonym record.
    pub async fn delete(&self, domain: &str, selector: &RecordSelector) -> Result<(), AceError> {
        let url = self.delete_url(domain, selector);
        self.client.send_no_content(Method::DELETE, url, None).await
    }

    /// Validate a pseudonym value; ACE answers with a plain text verdict.
    pub async fn validate(&self, domain: &str, psn: &str) -> Result<String, AceError> {
        let mut url = self
            .client
            .endpoint(&["domains", domain, "pseudonym", "validation"]);
        url.query_pairs_mut().append_pair("psn", psn);
        self.client.get_text(url).await
    }

    fn linked_pseudonyms_url(
        &self,
        source_domain: &str,
        target_domain: &str,
        source_identifier: Option<&str>,
        source_id_type: Option<&str>,
        source_psn: Option<&str>,
    ) -> Url {
        let mut url = self.client.endpoint(&["domains", "linked-pseudonyms"]);
        {
            let mut pairs = url.query_pairs_mut();
            pairs
                .append_pair("sourceDomain", source_domain)
                .append_pair("targetDomain", target_domain);
            if let Some(identifier) = source_identifier {
                pairs.append_pair("sourceIdentifier", identifier);
            }
            if let Some(id_type) = source_id_type {
                pairs.append_pair("sourceIdType", id_type);
            }
            if let Some(psn) = source_psn {
                pairs.append_pair("sourcePsn", psn);
            }
        }
        url
    }

    fn delete_url(&self, domain: &str, selector: &RecordSelector) -> Url {
        let mut url = self.client.endpoint(&["domains", domain, "pseudonym"]);
        {
            let mut pairs = url.query_pairs_mut();
            match selector {
                RecordSelector::ById { id, id_type } => {
                    pairs.append_pair("id", id).append_pair("idType", id_type);
                }
                RecordSelector::ByPsn { psn } => {
                    pairs.append_pair("psn", psn);
                }
            }
        }
        url
    }
}

/// Normalize an ACE response to a list of records.
///
/// ACE answers pseudonym reads and creations with either a single object
/// or an array; an empty body means no matches.
fn into_records(value: Value) -> Result<Vec<PseudonymRecord>, AceError> {
    match value {
        Value::Null => Ok(Vec::new()),
        Value::Array(_) => decode(value),
        Value::Object(_) => Ok(vec![decode(value)?]),
        other => Err(AceError::InvalidResponse(format!(
            "expected a record or an array of records, got: {other}"
        ))),
    }
}

fn bool_str(value: bool) -> &'static str {
    if value {
        "true"
    } else {
        "false"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::TokenProvider;
    use crate::config::ConnectorConfig;
    use serde_json::json;

    fn test_connector() -> PseudonymConnector {
        let config = ConnectorConfig {
            service_url: "http://ace.example.com".to_string(),
            keycloak_url: "http://keycloak.example.com".to_string(),
            realm: "trustdeck".to_string(),
            client_id: "connector".to_string(),
            client_secret: "secret".to_string(),
            username: "svc-user".to_string(),
            password: "svc-pass".to_string(),
        };
        let auth = Arc::new(TokenProvider::new(&config));
        let client = AceClient::new(&config.service_url, auth).unwrap();
        PseudonymConnector::new(Arc::new(client))
    }

    #[test]
    fn into_records_normalizes_all_shapes() {
        assert_eq!(into_records(Value::Null).unwrap(), Vec::new());

        let single = into_records(json!({"id": "rec-1", "idType": "mrn"})).unwrap();
        assert_eq!(single.len(), 1);
        assert_eq!(single[0].id.as_deref(), Some("rec-1"));

        let many = into_records(json!([
            {"id": "rec-1", "idType": "mrn"},
            {"id": "rec-2", "idType": "mrn", "psn": "PSN-2"}
        ]))
        .unwrap();
        assert_eq!(many.len(), 2);
        assert_eq!(many[1].psn.as_deref(), Some("PSN-2"));
    }

    #[test]
    fn into_records_rejects_scalars() {
        assert!(matches!(
            into_records(json!("nonsense")),
            Err(AceError::InvalidResponse(_))
        ));
    }

    #[test]
    fn selector_prefers_identifier_over_psn() {
        let selector = RecordSelector::from_parts(
            Some("rec-1".into()),
            Some("mrn".into()),
            Some("PSN-1".into()),
        );
        assert_eq!(
            selector,
            Some(RecordSelector::ById {
                id: "rec-1".into(),
                id_type: "mrn".into()
            })
        );
    }

    #[test]
    fn selector_requires_id_type_with_identifier() {
        // An identifier without idType cannot address a record; fall back
        // to psn when present.
        let selector =
            RecordSelector::from_parts(Some("rec-1".into()), None, Some("PSN-1".into()));
        assert_eq!(selector, Some(RecordSelector::ByPsn { psn: "PSN-1".into() }));

        assert_eq!(RecordSelector::from_parts(Some("rec-1".into()), None, None), None);
        assert_eq!(RecordSelector::from_parts(None, None, None), None);
    }

    #[test]
    fn linked_pseudonyms_url_includes_only_present_params() {
        let connector = test_connector();
        let url = connector.linked_pseudonyms_url("src", "dst", None, None, Some("PSN-1"));
        assert_eq!(
            url.as_str(),
            "http://ace.example.com/api/pseudonymization/domains/linked-pseudonyms?sourceDomain=src&targetDomain=dst&sourcePsn=PSN-1"
        );
    }

    #[test]
    fn delete_url_uses_the_selector_form() {
        let connector = test_connector();
        let by_id = connector.delete_url(
            "study-a",
            &RecordSelector::ById {
                id: "rec 1".into(),
                id_type: "mrn".into(),
            },
        );
        assert_eq!(
            by_id.as_str(),
            "http://ace.example.com/api/pseudonymization/domains/study-a/pseudonym?id=rec+1&idType=mrn"
        );

        let by_psn = connector.delete_url("study-a", &RecordSelector::ByPsn { psn: "PSN-1".into() });
        assert_eq!(
            by_psn.as_str(),
            "http://ace.example.com/api/pseudonymization/domains/study-a/pseudonym?psn=PSN-1"
        );
    }
}
