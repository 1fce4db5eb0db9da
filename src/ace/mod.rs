// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Connector layer for the ACE pseudonymization service.
//!
//! Every operation follows the same shape: build the upstream URL, attach
//! the bearer token, issue one HTTP call, and on a 401 refresh the token
//! and retry exactly once. [`AceClient`] owns that plumbing;
//! [`DomainConnector`] and [`PseudonymConnector`] expose the typed
//! operation sets on top of it.

mod client;
mod domains;
mod error;
mod pseudonyms;

pub use client::AceClient;
pub use domains::DomainConnector;
pub use error::AceError;
pub use pseudonyms::{PseudonymConnector, RecordSelector};
