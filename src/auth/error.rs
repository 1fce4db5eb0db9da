// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Authentication errors.

use thiserror::Error;

/// Errors raised while obtaining an access token from Keycloak.
#[derive(Debug, Error)]
pub enum AuthError {
    /// The token request could not be sent or the response not read.
    #[error("token request failed: {0}")]
    Request(String),

    /// Keycloak answered with a non-success status.
    #[error("token endpoint returned {status}: {body}")]
    Endpoint {
        status: reqwest::StatusCode,
        body: String,
    },

    /// The token response could not be interpreted.
    #[error("token response was invalid: {0}")]
    InvalidResponse(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn endpoint_error_includes_status_and_body() {
        let err = AuthError::Endpoint {
            status: reqwest::StatusCode::FORBIDDEN,
            body: "account disabled".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "token endpoint returned 403 Forbidden: account disabled"
        );
    }
}
