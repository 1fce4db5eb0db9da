// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # Runtime Configuration
//!
//! Configuration is loaded from the environment at startup. The connector
//! refuses to start when a required variable is missing or blank.
//!
//! ## Environment Variables
//!
//! | Variable | Description | Default |
//! |----------|-------------|---------|
//! | `ACE_SERVICE_URL` | Base URL of the ACE pseudonymization service | Required |
//! | `ACE_KEYCLOAK_URL` | Base URL of the Keycloak instance | Required |
//! | `ACE_KEYCLOAK_REALM` | Keycloak realm | Required |
//! | `ACE_CLIENT_ID` | Keycloak client ID | Required |
//! | `ACE_CLIENT_SECRET` | Keycloak client secret | Required |
//! | `ACE_USERNAME` | Keycloak username (password grant) | Required |
//! | `ACE_PASSWORD` | Keycloak user password | Required |
//! | `HOST` | Server bind address | `0.0.0.0` |
//! | `PORT` | Server bind port | `8080` |
//! | `LOG_FORMAT` | Logging format (`json` or `pretty`) | `pretty` |
//! | `RUST_LOG` | Log level filter | `info,tower_http=debug` |

use thiserror::Error;

/// Environment variable name for the ACE service base URL.
pub const SERVICE_URL_ENV: &str = "ACE_SERVICE_URL";
/// Environment variable name for the Keycloak base URL.
pub const KEYCLOAK_URL_ENV: &str = "ACE_KEYCLOAK_URL";
/// Environment variable name for the Keycloak realm.
pub const KEYCLOAK_REALM_ENV: &str = "ACE_KEYCLOAK_REALM";
/// Environment variable name for the Keycloak client ID.
pub const CLIENT_ID_ENV: &str = "ACE_CLIENT_ID";
/// Environment variable name for the Keycloak client secret.
pub const CLIENT_SECRET_ENV: &str = "ACE_CLIENT_SECRET";
/// Environment variable name for the Keycloak username.
pub const USERNAME_ENV: &str = "ACE_USERNAME";
/// Environment variable name for the Keycloak user password.
pub const PASSWORD_ENV: &str = "ACE_PASSWORD";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("required configuration missing: {0}")]
    Missing(&'static str),
}

/// Connection settings for the ACE service and its Keycloak instance.
///
/// Mirrors the credential set Keycloak needs for the password grant:
/// client id/secret identify the connector, username/password identify
/// the acting user.
#[derive(Debug, Clone)]
pub struct ConnectorConfig {
    pub service_url: String,
    pub keycloak_url: String,
    pub realm: String,
    pub client_id: String,
    pub client_secret: String,
    pub username: String,
    pub password: String,
}

impl ConnectorConfig {
    /// Load the connector configuration from the environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Ok(Self {
            service_url: env_required(SERVICE_URL_ENV)?,
            keycloak_url: env_required(KEYCLOAK_URL_ENV)?,
            realm: env_required(KEYCLOAK_REALM_ENV)?,
            client_id: env_required(CLIENT_ID_ENV)?,
            client_secret: env_required(CLIENT_SECRET_ENV)?,
            username: env_required(USERNAME_ENV)?,
            password: env_required(PASSWORD_ENV)?,
        })
    }
}

fn env_required(name: &'static str) -> Result<String, ConfigError> {
    env_optional(name).ok_or(ConfigError::Missing(name))
}

fn env_optional(name: &str) -> Option<String> {
    match std::env::var(name) {
        Ok(value) => {
            let trimmed = value.trim().to_string();
            if trimmed.is_empty() {
                None
            } else {
                Some(trimmed)
            }
        }
        Err(_) => None,
    }
}

/// Read an environment variable, falling back to a default when unset or blank.
pub fn env_or_default(name: &str, default: &str) -> String {
    std::env::var(name)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
        .unwrap_or_else(|| default.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn env_optional_rejects_blank_values() {
        // Variable names unique to this test keep it parallel-safe.
        std::env::set_var("ACE_CONNECTOR_TEST_BLANK", "   ");
        assert_eq!(env_optional("ACE_CONNECTOR_TEST_BLANK"), None);

        std::env::set_var("ACE_CONNECTOR_TEST_TRIM", " value ");
        assert_eq!(
            env_optional("ACE_CONNECTOR_TEST_TRIM"),
            Some("value".to_string())
        );
    }

    #[test]
    fn env_or_default_falls_back_when_unset() {
        assert_eq!(env_or_default("ACE_CONNECTOR_TEST_UNSET", "8080"), "8080");
    }

    #[test]
    fn missing_required_variable_is_named_in_error() {
        let err = env_required("ACE_CONNECTOR_TEST_MISSING").unwrap_err();
        assert_eq!(
            err.to_string(),
            "required configuration missing: ACE_CONNECTOR_TEST_MISSING"
        );
    }
}
