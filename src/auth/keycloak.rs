// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Keycloak access token acquisition and caching.
//!
//! ## Token lifecycle
//!
//! - The first request fetches a token via the password grant.
//! - The token is cached without expiry tracking; the connector swaps it
//!   out only when ACE answers 401 (see `ace::AceClient`).
//! - `refresh()` always performs a fresh fetch and replaces the cache.

use std::time::Duration;

use serde::Deserialize;
use tokio::sync::RwLock;
use tracing::debug;

use super::error::AuthError;
use crate::config::ConnectorConfig;

/// Timeout for token requests against Keycloak.
const TOKEN_REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// Keycloak token provider using the password grant.
///
/// Cheap to share behind an `Arc`; the cached token sits in a `RwLock` so
/// concurrent requests observe either the old or the new token, never a
/// torn value.
pub struct TokenProvider {
    token_url: String,
    client_id: String,
    client_secret: String,
    username: String,
    password: String,
    http: reqwest::Client,
    cached: RwLock<Option<String>>,
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
}

impl TokenProvider {
    pub fn new(config: &ConnectorConfig) -> Self {
        Self {
            token_url: token_url(&config.keycloak_url, &config.realm),
            client_id: config.client_id.clone(),
            client_secret: config.client_secret.clone(),
            username: config.username.clone(),
            password: config.password.clone(),
            http: reqwest::Client::builder()
                .timeout(TOKEN_REQUEST_TIMEOUT)
                .build()
                .expect("Failed to create HTTP client"),
            cached: RwLock::new(None),
        }
    }

    /// Current bearer token, fetching one if none is cached yet.
    pub async fn bearer_token(&self) -> Result<String, AuthError> {
        {
            let cached = self.cached.read().await;
            if let Some(token) = &*cached {
                return Ok(token.clone());
            }
        }
        self.refresh().await
    }

    /// Fetch a fresh token and replace the cached one.
    pub async fn refresh(&self) -> Result<String, AuthError> {
        let token = self.fetch_token().await?;
        let mut cached = self.cached.write().await;
        *cached = Some(token.clone());
        Ok(token)
    }

    /// Whether a token has been fetched since startup.
    pub async fn is_cached(&self) -> bool {
        self.cached.read().await.is_some()
    }

    async fn fetch_token(&self) -> Result<String, AuthError> {
        debug!(token_url = %self.token_url, "requesting access token from Keycloak");

        let form = [
            ("grant_type", "password"),
            ("client_id", self.client_id.as_str()),
            ("client_secret", self.client_secret.as_str()),
            ("username", self.username.as_str()),
            ("password", self.password.as_str()),
        ];

        let response = self
            .http
            .post(&self.token_url)
            .form(&form)
            .send()
            .await
            .map_err(|e| AuthError::Request(e.to_string()))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(AuthError::Endpoint { status, body });
        }

        let token_response: TokenResponse = response
            .json()
            .await
            .map_err(|e| AuthError::InvalidResponse(e.to_string()))?;

        if token_response.access_token.trim().is_empty() {
            return Err(AuthError::InvalidResponse(
                "token response did not include access_token".to_string(),
            ));
        }

        Ok(token_response.access_token)
    }
}

/// Build the OpenID Connect token endpoint URL for a realm.
fn token_url(keycloak_url: &str, realm: &str) -> String {
    format!(
        "{}/realms/{}/protocol/openid-connect/token",
        keycloak_url.trim_end_matches('/'),
        realm
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_config() -> ConnectorConfig {
        ConnectorConfig {
            service_url: "http://ace.example.com".to_string(),
            keycloak_url: "http://keycloak.example.com/".to_string(),
            realm: "trustdeck".to_string(),
            client_id: "connector".to_string(),
            client_secret: "secret".to_string(),
            username: "svc-user".to_string(),
            password: "svc-pass".to_string(),
        }
    }

    #[test]
    fn token_url_handles_trailing_slash() {
        assert_eq!(
            token_url("http://keycloak.example.com/", "trustdeck"),
            "http://keycloak.example.com/realms/trustdeck/protocol/openid-connect/token"
        );
        assert_eq!(
            token_url("http://keycloak.example.com", "trustdeck"),
            "http://keycloak.example.com/realms/trustdeck/protocol/openid-connect/token"
        );
    }

    #[test]
    fn token_response_parses_access_token() {
        let parsed: TokenResponse = serde_json::from_str(
            r#"{"access_token":"abc123","expires_in":300,"token_type":"Bearer"}"#,
        )
        .unwrap();
        assert_eq!(parsed.access_token, "abc123");
    }

    #[tokio::test]
    async fn provider_starts_without_cached_token() {
        let provider = TokenProvider::new(&test_config());
        assert!(!provider.is_cached().await);
    }

    #[tokio::test]
    async fn cached_token_is_returned_without_refetch() {
        let provider = TokenProvider::new(&test_config());
        {
            let mut cached = provider.cached.write().await;
            *cached = Some("cached-token".to_string());
        }

        let token = provider.bearer_token().await.unwrap();
        assert_eq!(token, "cached-token");
        assert!(provider.is_cached().await);
    }
}
