// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # API Data Models
//!
//! This module defines the record types exchanged with the ACE
//! pseudonymization service. All types derive `Serialize`, `Deserialize`,
//! and `ToSchema` for automatic JSON handling and OpenAPI documentation.
//!
//! Field names follow the ACE wire model (camelCase); unset fields are
//! omitted from JSON so partial records forward exactly as received.
//!
//! ## Model Categories
//!
//! - **Pseudonym records**: identifier/pseudonym pairs within a domain
//! - **Domain records**: named configuration scopes for pseudonym generation

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

// =============================================================================
// Pseudonym Records
// =============================================================================

/// A pseudonym record, matching the ACE data model.
///
/// `id` and `id_type` identify the original record; `psn` is the substitute
/// value managed by ACE. Validity fields may be inherited from the domain.
#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct PseudonymRecord {
    /// Identifier of the record.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    /// Type of the identifier.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id_type: Option<String>,
    /// Pseudonym value.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub psn: Option<String>,
    /// Start of the validity period.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub valid_from: Option<NaiveDateTime>,
    /// Whether `valid_from` is inherited from the domain.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub valid_from_inherited: Option<bool>,
    /// End of the validity period.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub valid_to: Option<NaiveDateTime>,
    /// Whether `valid_to` is inherited from the domain.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub valid_to_inherited: Option<bool>,
    /// Validity period as a duration string (e.g. `"1d"`).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub validity_time: Option<String>,
    /// Name of the domain the record belongs to.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub domain_name: Option<String>,
}

impl PseudonymRecord {
    /// Check the fields the ACE service requires on submitted records.
    ///
    /// Returns the offending field name so callers can build a precise
    /// client error.
    pub fn require_identity(&self) -> Result<(), &'static str> {
        if !is_present(&self.id) {
            return Err("id");
        }
        if !is_present(&self.id_type) {
            return Err("idType");
        }
        Ok(())
    }
}

fn is_present(value: &Option<String>) -> bool {
    value.as_deref().is_some_and(|v| !v.trim().is_empty())
}

// =============================================================================
// Domain Records
// =============================================================================

/// A domain record, matching the ACE data model.
///
/// Domains are named configuration scopes (validity periods, algorithm
/// parameters) under which pseudonyms are generated. Most attributes can be
/// inherited from a super-domain; the paired `*_inherited` flags report
/// where a value came from.
#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct DomainRecord {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub prefix: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub valid_from: Option<NaiveDateTime>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub valid_from_inherited: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub valid_to: Option<NaiveDateTime>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub validity_time: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub valid_to_inherited: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub enforce_start_date_validity: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub enforce_start_date_validity_inherited: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub enforce_end_date_validity: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub enforce_end_date_validity_inherited: Option<bool>,
    /// Pseudonym generation algorithm name.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub algorithm: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub algorithm_inherited: Option<bool>,
    /// Alphabet used for generated pseudonyms.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub alphabet: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub alphabet_inherited: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub random_algorithm_desired_size: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub random_algorithm_desired_size_inherited: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub random_algorithm_desired_success_probability: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub random_algorithm_desired_success_probability_inherited: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub multiple_psn_allowed: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub multiple_psn_allowed_inherited: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub consecutive_value_counter: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pseudonym_length: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pseudonym_length_inherited: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub padding_character: Option<char>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub padding_character_inherited: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub add_check_digit: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub add_check_digit_inherited: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub length_includes_check_digit: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub length_includes_check_digit_inherited: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub salt: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub salt_length: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    // The ACE model spells this one with a trailing "ID".
    #[serde(rename = "superDomainID", skip_serializing_if = "Option::is_none")]
    pub super_domain_id: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub super_domain_name: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pseudonym_record_uses_camel_case_wire_names() {
        let record = PseudonymRecord {
            id: Some("rec-1".into()),
            id_type: Some("mrn".into()),
            psn: Some("PSN-42".into()),
            ..Default::default()
        };

        let json = serde_json::to_value(&record).unwrap();
        assert_eq!(json["id"], "rec-1");
        assert_eq!(json["idType"], "mrn");
        assert_eq!(json["psn"], "PSN-42");
        // Unset fields are omitted entirely.
        assert!(json.get("validFrom").is_none());
        assert!(json.get("domainName").is_none());
    }

    #[test]
    fn require_identity_names_the_blank_field() {
        let mut record = PseudonymRecord::default();
        assert_eq!(record.require_identity(), Err("id"));

        record.id = Some("rec-1".into());
        assert_eq!(record.require_identity(), Err("idType"));

        record.id_type = Some("   ".into());
        assert_eq!(record.require_identity(), Err("idType"));

        record.id_type = Some("mrn".into());
        assert!(record.require_identity().is_ok());
    }

    #[test]
    fn domain_record_round_trips_super_domain_id_spelling() {
        let record = DomainRecord {
            name: Some("study-a".into()),
            super_domain_id: Some(7),
            ..Default::default()
        };

        let json = serde_json::to_value(&record).unwrap();
        assert_eq!(json["superDomainID"], 7);
        assert!(json.get("superDomainId").is_none());

        let parsed: DomainRecord = serde_json::from_value(json).unwrap();
        assert_eq!(parsed.super_domain_id, Some(7));
    }

    #[test]
    fn domain_record_parses_ace_response_shape() {
        let json = serde_json::json!({
            "id": 3,
            "name": "study-a",
            "prefix": "SA-",
            "algorithm": "MD5",
            "multiplePsnAllowed": false,
            "validFrom": "2026-01-01T00:00:00",
            "paddingCharacter": "0"
        });

        let parsed: DomainRecord = serde_json::from_value(json).unwrap();
        assert_eq!(parsed.id, Some(3));
        assert_eq!(parsed.prefix.as_deref(), Some("SA-"));
        assert_eq!(parsed.multiple_psn_allowed, Some(false));
        assert_eq!(parsed.padding_character, Some('0'));
        assert!(parsed.valid_from.is_some());
    }
}
