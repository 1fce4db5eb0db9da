// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! ACE Connector - REST connector for the ACE pseudonymization service
//!
//! This crate exposes a validated HTTP API and forwards each request to an
//! external ACE instance, attaching OAuth2 bearer tokens obtained from
//! Keycloak. On an expired token (401 from ACE) the token is refreshed and
//! the request retried exactly once.
//!
//! ## Modules
//!
//! - `api` - HTTP API handlers (Axum)
//! - `auth` - Keycloak token acquisition (password grant)
//! - `ace` - Connector layer forwarding requests to ACE
//! - `models` - Domain and pseudonym record types

pub mod ace;
pub mod api;
pub mod auth;
pub mod config;
pub mod error;
pub mod models;
pub mod state;
