// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

use std::sync::Arc;

use crate::ace::{AceClient, AceError, DomainConnector, PseudonymConnector};
use crate::auth::TokenProvider;
use crate::config::ConnectorConfig;

/// Shared application state: the two ACE connectors plus the token
/// provider they authenticate with.
#[derive(Clone)]
pub struct AppState {
    pub domains: DomainConnector,
    pub pseudonyms: PseudonymConnector,
    pub token_provider: Arc<TokenProvider>,
}

impl AppState {
    /// Build the connector stack from configuration.
    pub fn new(config: &ConnectorConfig) -> Result<Self, AceError> {
        let token_provider = Arc::new(TokenProvider::new(config));
        let client = Arc::new(AceClient::new(&config.service_url, token_provider.clone())?);
        Ok(Self {
            domains: DomainConnector::new(client.clone()),
            pseudonyms: PseudonymConnector::new(client),
            token_provider,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_config() -> ConnectorConfig {
        ConnectorConfig {
            service_url: "http://ace.example.com".to_string(),
            keycloak_url: "http://keycloak.example.com".to_string(),
            realm: "trustdeck".to_string(),
            client_id: "connector".to_string(),
            client_secret: "secret".to_string(),
            username: "svc-user".to_string(),
            password: "svc-pass".to_string(),
        }
    }

    #[test]
    fn state_builds_from_valid_config() {
        assert!(AppState::new(&test_config()).is_ok());
    }

    #[test]
    fn state_rejects_invalid_service_url() {
        let mut config = test_config();
        config.service_url = "not a url".to_string();
        assert!(AppState::new(&config).is_err());
    }
}
