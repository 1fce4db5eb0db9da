// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Connector errors.

use thiserror::Error;

use crate::auth::AuthError;

/// Errors raised while forwarding a request to the ACE service.
#[derive(Debug, Error)]
pub enum AceError {
    /// The configured service URL cannot be used as a request base.
    #[error("invalid ACE service URL: {0}")]
    InvalidServiceUrl(String),

    /// Obtaining a bearer token from Keycloak failed.
    #[error("ACE authentication failed: {0}")]
    Auth(#[from] AuthError),

    /// The request could not be sent or the response not read.
    #[error("ACE request failed: {0}")]
    Request(String),

    /// ACE answered with a non-success status (after the single
    /// refresh-and-retry on 401).
    #[error("ACE returned {status}: {body}")]
    Upstream {
        status: reqwest::StatusCode,
        body: String,
    },

    /// The response body could not be interpreted.
    #[error("ACE response was invalid: {0}")]
    InvalidResponse(String),
}
