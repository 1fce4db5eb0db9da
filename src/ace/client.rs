// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Shared HTTP plumbing for the ACE connectors.

use std::sync::Arc;
use std::time::Duration;

use reqwest::header::{ACCEPT, AUTHORIZATION, CONTENT_TYPE};
use reqwest::{Method, Response, StatusCode};
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::{debug, warn};
use url::Url;

use super::error::AceError;
use crate::auth::TokenProvider;

/// Timeout for forwarded requests against ACE.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(15);

/// All ACE endpoints live under this path prefix.
const API_PREFIX: [&str; 2] = ["api", "pseudonymization"];

/// HTTP client for the ACE service.
///
/// Owns the base URL, the bearer-token injection, and the
/// refresh-and-retry-once convention for expired tokens. The typed
/// connectors share one instance behind an `Arc`.
pub struct AceClient {
    base: Url,
    http: reqwest::Client,
    auth: Arc<TokenProvider>,
}

impl AceClient {
    pub fn new(service_url: &str, auth: Arc<TokenProvider>) -> Result<Self, AceError> {
        let base = Url::parse(service_url)
            .map_err(|e| AceError::InvalidServiceUrl(format!("{service_url}: {e}")))?;
        if base.cannot_be_a_base() {
            return Err(AceError::InvalidServiceUrl(format!(
                "{service_url}: URL cannot serve as a request base"
            )));
        }

        Ok(Self {
            base,
            http: reqwest::Client::builder()
                .timeout(REQUEST_TIMEOUT)
                .build()
                .expect("Failed to create HTTP client"),
            auth,
        })
    }

    /// Build an endpoint URL under `api/pseudonymization/`.
    ///
    /// Segments are appended as whole path segments, so domain names and
    /// attribute names are percent-encoded rather than spliced in raw.
    pub(super) fn endpoint(&self, segments: &[&str]) -> Url {
        let mut url = self.base.clone();
        {
            let mut path = url
                .path_segments_mut()
                .expect("base URL validated at construction");
            path.pop_if_empty();
            path.extend(API_PREFIX);
            path.extend(segments);
        }
        url
    }

    /// GET returning a typed JSON body.
    pub(super) async fn get_json<T: DeserializeOwned>(&self, url: Url) -> Result<T, AceError> {
        let value = self.request_value(Method::GET, url, None).await?;
        decode(value)
    }

    /// GET returning the raw JSON value (`Null` for an empty body).
    pub(super) async fn get_value(&self, url: Url) -> Result<Value, AceError> {
        self.request_value(Method::GET, url, None).await
    }

    /// GET returning the raw response text.
    pub(super) async fn get_text(&self, url: Url) -> Result<String, AceError> {
        let response = self.send(Method::GET, &url, None).await?;
        response
            .text()
            .await
            .map_err(|e| AceError::Request(format!("failed to read response body: {e}")))
    }

    /// Send a JSON body and decode a typed response.
    pub(super) async fn send_json<T: DeserializeOwned>(
        &self,
        method: Method,
        url: Url,
        body: &Value,
    ) -> Result<T, AceError> {
        let value = self.request_value(method, url, Some(body)).await?;
        decode(value)
    }

    /// Send an optional JSON body and return the raw JSON value.
    pub(super) async fn send_value(
        &self,
        method: Method,
        url: Url,
        body: Option<&Value>,
    ) -> Result<Value, AceError> {
        self.request_value(method, url, body).await
    }

    /// Send a request where the response body is irrelevant.
    pub(super) async fn send_no_content(
        &self,
        method: Method,
        url: Url,
        body: Option<&Value>,
    ) -> Result<(), AceError> {
        self.send(method, &url, body).await?;
        Ok(())
    }

    async fn request_value(
        &self,
        method: Method,
        url: Url,
        body: Option<&Value>,
    ) -> Result<Value, AceError> {
        let response = self.send(method, &url, body).await?;
        let text = response
            .text()
            .await
            .map_err(|e| AceError::Request(format!("failed to read response body: {e}")))?;
        if text.trim().is_empty() {
            return Ok(Value::Null);
        }
        serde_json::from_str(&text).map_err(|e| AceError::InvalidResponse(e.to_string()))
    }

    /// Issue one request; on 401, refresh the token and retry exactly once.
    async fn send(
        &self,
        method: Method,
        url: &Url,
        body: Option<&Value>,
    ) -> Result<Response, AceError> {
        let token = self.auth.bearer_token().await?;
        let response = self.dispatch(method.clone(), url, body, &token).await?;
        if response.status() != StatusCode::UNAUTHORIZED {
            return into_success(response).await;
        }

        warn!(
            method = %method,
            path = url.path(),
            "ACE rejected the access token, refreshing and retrying once"
        );
        let token = self.auth.refresh().await?;
        let response = self.dispatch(method, url, body, &token).await?;
        into_success(response).await
    }

    async fn dispatch(
        &self,
        method: Method,
        url: &Url,
        body: Option<&Value>,
        token: &str,
    ) -> Result<Response, AceError> {
        debug!(method = %method, path = url.path(), "forwarding request to ACE");

        let mut request = self
            .http
            .request(method.clone(), url.clone())
            .header(AUTHORIZATION, format!("Bearer {token}"))
            .header(CONTENT_TYPE, "application/json")
            .header(ACCEPT, "application/json");
        if let Some(body) = body {
            request = request.json(body);
        }

        request
            .send()
            .await
            .map_err(|e| AceError::Request(format!("{method} {} failed: {e}", url.path())))
    }
}

/// Map a non-success response to an error carrying status and body.
async fn into_success(response: Response) -> Result<Response, AceError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let body = response.text().await.unwrap_or_default();
    Err(AceError::Upstream { status, body })
}

pub(super) fn decode<T: DeserializeOwned>(value: Value) -> Result<T, AceError> {
    serde_json::from_value(value).map_err(|e| AceError::InvalidResponse(e.to_string()))
}

/// Stage a request body as a JSON value so a 401 retry can resend it.
pub(super) fn to_body<T: serde::Serialize>(value: &T) -> Result<Value, AceError> {
    serde_json::to_value(value)
        .map_err(|e| AceError::InvalidResponse(format!("serialize body failed: {e}")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ConnectorConfig;

    fn test_client(service_url: &str) -> Result<AceClient, AceError> {
        let config = ConnectorConfig {
            service_url: service_url.to_string(),
            keycloak_url: "http://keycloak.example.com".to_string(),
            realm: "trustdeck".to_string(),
            client_id: "connector".to_string(),
            client_secret: "secret".to_string(),
            username: "svc-user".to_string(),
            password: "svc-pass".to_string(),
        };
        AceClient::new(service_url, Arc::new(TokenProvider::new(&config)))
    }

    #[test]
    fn endpoint_prefixes_api_path() {
        let client = test_client("http://ace.example.com").unwrap();
        let url = client.endpoint(&["domain"]);
        assert_eq!(url.as_str(), "http://ace.example.com/api/pseudonymization/domain");
    }

    #[test]
    fn endpoint_tolerates_trailing_slash_in_base() {
        let client = test_client("http://ace.example.com/ace/").unwrap();
        let url = client.endpoint(&["domains", "study-a", "pseudonyms"]);
        assert_eq!(
            url.as_str(),
            "http://ace.example.com/ace/api/pseudonymization/domains/study-a/pseudonyms"
        );
    }

    #[test]
    fn endpoint_percent_encodes_path_segments() {
        let client = test_client("http://ace.example.com").unwrap();
        let url = client.endpoint(&["domains", "study a/b", "pseudonym"]);
        assert_eq!(
            url.as_str(),
            "http://ace.example.com/api/pseudonymization/domains/study%20a%2Fb/pseudonym"
        );
    }

    #[test]
    fn invalid_service_url_is_rejected() {
        assert!(matches!(
            test_client("not a url"),
            Err(AceError::InvalidServiceUrl(_))
        ));
        assert!(matches!(
            test_client("data:text/plain,hello"),
            Err(AceError::InvalidServiceUrl(_))
        ));
    }

    #[test]
    fn decode_reports_shape_mismatch() {
        let result: Result<Vec<String>, AceError> = decode(serde_json::json!({"a": 1}));
        assert!(matches!(result, Err(AceError::InvalidResponse(_))));
    }
}
