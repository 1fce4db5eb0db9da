// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Connector for the domain management endpoints of the ACE service.

use std::sync::Arc;

use reqwest::Method;
use serde_json::Value;
use tracing::debug;
use url::Url;

use super::client::{decode, to_body, AceClient};
use super::error::AceError;
use crate::models::DomainRecord;

/// Typed operations against ACE's domain endpoints.
#[derive(Clone)]
pub struct DomainConnector {
    client: Arc<AceClient>,
}

impl DomainConnector {
    pub fn new(client: Arc<AceClient>) -> Self {
        Self { client }
    }

    /// Retrieve the domain hierarchy in a minimal representation.
    ///
    /// ACE marks this endpoint as experimental.
    pub async fn domain_hierarchy(&self) -> Result<Vec<DomainRecord>, AceError> {
        let url = self
            .client
            .endpoint(&["experimental", "domains", "hierarchy"]);
        let value = self.client.get_value(url).await?;
        match value {
            Value::Null => Ok(Vec::new()),
            other => decode(other),
        }
    }

    /// Retrieve a domain by name.
    pub async fn get_domain(&self, name: &str) -> Result<DomainRecord, AceError> {
        let mut url = self.client.endpoint(&["domain"]);
        url.query_pairs_mut().append_pair("name", name);
        self.client.get_json(url).await
    }

    /// Retrieve a single attribute of a domain.
    ///
    /// The response is a domain record containing only the requested
    /// attribute.
    pub async fn get_domain_attribute(
        &self,
        name: &str,
        attribute: &str,
    ) -> Result<DomainRecord, AceError> {
        let url = self.client.endpoint(&["domains", name, attribute]);
        let record: DomainRecord = self.client.get_json(url).await?;
        debug!(domain = name, attribute, "retrieved domain attribute");
        Ok(record)
    }

    /// Create a domain with the reduced attribute set.
    pub async fn create_domain(&self, record: &DomainRecord) -> Result<DomainRecord, AceError> {
        let url = self.client.endpoint(&["domain"]);
        self.client
            .send_json(Method::POST, url, &to_body(record)?)
            .await
    }

    /// Create a domain with all attributes.
    pub async fn create_domain_complete(
        &self,
        record: &DomainRecord,
    ) -> Result<DomainRecord, AceError> {
        let url = self.client.endpoint(&["domain", "complete"]);
        self.client
            .send_json(Method::POST, url, &to_body(record)?)
            .await
    }

    /// Update a domain with the reduced attribute set.
    pub async fn update_domain(
        &self,
        name: &str,
        record: &DomainRecord,
    ) -> Result<DomainRecord, AceError> {
        let mut url = self.client.endpoint(&["domain"]);
        url.query_pairs_mut().append_pair("name", name);
        self.client
            .send_json(Method::PUT, url, &to_body(record)?)
            .await
    }

    /// Update a domain with all attributes, optionally cascading into
    /// sub-domains.
    pub async fn update_domain_complete(
        &self,
        name: &str,
        record: &DomainRecord,
        recursive: bool,
    ) -> Result<DomainRecord, AceError> {
        let url = self.update_domain_complete_url(name, recursive);
        self.client
            .send_json(Method::PUT, url, &to_body(record)?)
            .await
    }

    /// Delete a domain, optionally including its sub-domains.
    pub async fn delete_domain(&self, name: &str, recursive: bool) -> Result<(), AceError> {
        let mut url = self.client.endpoint(&["domain"]);
        url.query_pairs_mut()
            .append_pair("name", name)
            .append_pair("recursive", bool_str(recursive));
        self.client.send_no_content(Method::DELETE, url, None).await
    }

    /// Replace the salt of a domain.
    pub async fn update_salt(
        &self,
        name: &str,
        salt: &str,
        allow_empty: bool,
    ) -> Result<DomainRecord, AceError> {
        let url = self.update_salt_url(name, salt, allow_empty);
        let value = self.client.send_value(Method::PUT, url, None).await?;
        decode(value)
    }

    fn update_domain_complete_url(&self, name: &str, recursive: bool) -> Url {
        let mut url = self.client.endpoint(&["domain", "complete"]);
        url.query_pairs_mut()
            .append_pair("name", name)
            .append_pair("recursive", bool_str(recursive));
        url
    }

    fn update_salt_url(&self, name: &str, salt: &str, allow_empty: bool) -> Url {
        let mut url = self.client.endpoint(&["domains", name, "salt"]);
        url.query_pairs_mut()
            .append_pair("salt", salt)
            .append_pair("allowEmpty", bool_str(allow_empty));
        url
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

    fn test_connector() -> DomainConnector {
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
        DomainConnector::new(Arc::new(client))
    }

    #[test]
    fn update_domain_complete_url_carries_name_and_recursive() {
        let connector = test_connector();
        let url = connector.update_domain_complete_url("study-a", true);
        assert_eq!(
            url.as_str(),
            "http://ace.example.com/api/pseudonymization/domain/complete?name=study-a&recursive=true"
        );
    }

    #[test]
    fn update_salt_url_encodes_salt_value() {
        let connector = test_connector();
        let url = connector.update_salt_url("study-a", "s&lt=1", false);
        assert_eq!(
            url.as_str(),
            "http://ace.example.com/api/pseudonymization/domains/study-a/salt?salt=s%26lt%3D1&allowEmpty=false"
        );
    }
}
