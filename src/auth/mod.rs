// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Keycloak authentication for outbound ACE requests.
//!
//! The connector authenticates against Keycloak with the password grant
//! and attaches the resulting bearer token to every request it forwards.
//! Tokens are cached in memory and replaced when ACE rejects one with 401.

mod error;
mod keycloak;

pub use error::AuthError;
pub use keycloak::TokenProvider;
