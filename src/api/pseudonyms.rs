// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Pseudonym endpoints, forwarded to ACE.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use serde::Deserialize;
use utoipa::IntoParams;

use super::require_non_blank;
use crate::{
    ace::RecordSelector,
    error::ApiError,
    models::PseudonymRecord,
    state::AppState,
};

#[derive(Deserialize, IntoParams)]
pub struct OmitPrefixQuery {
    /// If true, the domain prefix is omitted from generated pseudonyms.
    #[serde(rename = "omitPrefix", default)]
    pub omit_prefix: bool,
}

#[derive(Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
pub struct LinkedPseudonymsQuery {
    /// The domain the search starts from.
    pub source_domain: String,
    /// The domain the search ends in.
    pub target_domain: String,
    /// Identifier of the record to start from.
    pub source_identifier: Option<String>,
    /// idType of the record to start from.
    pub source_id_type: Option<String>,
    /// Pseudonym of the record to start from.
    pub source_psn: Option<String>,
}

#[derive(Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
pub struct IdentifierQuery {
    /// Identifier of the record.
    pub id: String,
    /// Type of the identifier.
    pub id_type: String,
}

#[derive(Deserialize, IntoParams)]
pub struct PsnQuery {
    /// The pseudonym value.
    pub psn: String,
}

#[derive(Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
pub struct UpdateByIdentifierQuery {
    /// Identifier of the record.
    pub identifier: String,
    /// Type of the identifier.
    pub id_type: String,
}

#[derive(Deserialize, IntoParams)]
pub struct DeletePseudonymQuery {
    /// Identifier of the record.
    pub id: Option<String>,
    /// Type of the identifier.
    #[serde(rename = "idtype")]
    pub id_type: Option<String>,
    /// The pseudonym value.
    pub psn: Option<String>,
}

fn require_identity(record: &PseudonymRecord) -> Result<(), ApiError> {
    record
        .require_identity()
        .map_err(|field| ApiError::bad_request(format!("{field} must not be blank")))
}

/// Create a batch of pseudonym records in the specified domain.
#[utoipa::path(
    post,
    path = "/api/pseudonymization/domains/{domain}/pseudonyms",
    params(
        ("domain" = String, Path, description = "Domain the pseudonyms are stored in"),
        OmitPrefixQuery
    ),
    request_body = [PseudonymRecord],
    tag = "Pseudonyms",
    responses(
        (status = 201, description = "Created pseudonym records", body = [PseudonymRecord]),
        (status = 400, description = "Invalid input"),
        (status = 401, description = "Authentication failure")
    )
)]
pub async fn create_pseudonym_batch(
    Path(domain): Path<String>,
    State(state): State<AppState>,
    Query(params): Query<OmitPrefixQuery>,
    Json(records): Json<Vec<PseudonymRecord>>,
) -> Result<(StatusCode, Json<Vec<PseudonymRecord>>), ApiError> {
    require_non_blank(&domain, "domain")?;
    let created = state
        .pseudonyms
        .create_batch(&domain, params.omit_prefix, &records)
        .await?;
    Ok((StatusCode::CREATED, Json(created)))
}

/// Create a single pseudonym record in the specified domain.
#[utoipa::path(
    post,
    path = "/api/pseudonymization/domains/{domain}/pseudonym",
    params(
        ("domain" = String, Path, description = "Domain the pseudonym is stored in"),
        OmitPrefixQuery
    ),
    request_body = PseudonymRecord,
    tag = "Pseudonyms",
    responses(
        (status = 201, description = "Created pseudonym record(s)", body = [PseudonymRecord]),
        (status = 400, description = "Invalid input")
    )
)]
pub async fn create_pseudonym(
    Path(domain): Path<String>,
    State(state): State<AppState>,
    Query(params): Query<OmitPrefixQuery>,
    Json(record): Json<PseudonymRecord>,
) -> Result<(StatusCode, Json<Vec<PseudonymRecord>>), ApiError> {
    require_non_blank(&domain, "domain")?;
    require_identity(&record)?;
    let created = state
        .pseudonyms
        .create(&domain, &record, params.omit_prefix)
        .await?;
    Ok((StatusCode::CREATED, Json(created)))
}

/// Retrieve all pseudonym records stored in the specified domain.
#[utoipa::path(
    get,
    path = "/api/pseudonymization/domains/{domain}/pseudonyms",
    params(("domain" = String, Path, description = "Domain to read from")),
    tag = "Pseudonyms",
    responses(
        (status = 200, description = "Pseudonym records in the domain", body = [PseudonymRecord]),
        (status = 404, description = "No pseudonyms in the domain")
    )
)]
pub async fn get_pseudonym_batch(
    Path(domain): Path<String>,
    State(state): State<AppState>,
) -> Result<Json<Vec<PseudonymRecord>>, ApiError> {
    require_non_blank(&domain, "domain")?;
    Ok(Json(state.pseudonyms.get_batch(&domain).await?))
}

/// Search linked pseudonyms between a source and a target domain.
///
/// The search follows the pseudonym chain in the domain tree, starting
/// from the source domain and optionally from a concrete record.
#[utoipa::path(
    get,
    path = "/api/pseudonymization/domains/linked-pseudonyms",
    params(LinkedPseudonymsQuery),
    tag = "Pseudonyms",
    responses(
        (status = 200, description = "Linked pseudonym records", body = [PseudonymRecord]),
        (status = 404, description = "No linked pseudonyms found")
    )
)]
pub async fn get_linked_pseudonyms(
    State(state): State<AppState>,
    Query(params): Query<LinkedPseudonymsQuery>,
) -> Result<Json<Vec<PseudonymRecord>>, ApiError> {
    let records = state
        .pseudonyms
        .linked_pseudonyms(
            &params.source_domain,
            &params.target_domain,
            params.source_identifier.as_deref(),
            params.source_id_type.as_deref(),
            params.source_psn.as_deref(),
        )
        .await?;
    Ok(Json(records))
}

/// Retrieve a pseudonym record by its identifier and idType.
#[utoipa::path(
    get,
    path = "/api/pseudonymization/domains/{domain}/pseudonym/by-id",
    params(
        ("domain" = String, Path, description = "Domain the pseudonym is stored in"),
        IdentifierQuery
    ),
    tag = "Pseudonyms",
    responses(
        (status = 200, description = "Matching pseudonym records", body = [PseudonymRecord]),
        (status = 404, description = "No matching record")
    )
)]
pub async fn get_pseudonym_by_identifier(
    Path(domain): Path<String>,
    State(state): State<AppState>,
    Query(params): Query<IdentifierQuery>,
) -> Result<Json<Vec<PseudonymRecord>>, ApiError> {
    require_non_blank(&domain, "domain")?;
    require_non_blank(&params.id, "id")?;
    require_non_blank(&params.id_type, "idType")?;
    let records = state
        .pseudonyms
        .get_by_identifier(&domain, &params.id, &params.id_type)
        .await?;
    Ok(Json(records))
}

/// Retrieve a pseudonym record by its pseudonym value.
#[utoipa::path(
    get,
    path = "/api/pseudonymization/domains/{domain}/pseudonym/by-psn",
    params(
        ("domain" = String, Path, description = "Domain the pseudonym is stored in"),
        PsnQuery
    ),
    tag = "Pseudonyms",
    responses(
        (status = 200, description = "Matching pseudonym records", body = [PseudonymRecord]),
        (status = 404, description = "No matching record")
    )
)]
pub async fn get_pseudonym_by_psn(
    Path(domain): Path<String>,
    State(state): State<AppState>,
    Query(params): Query<PsnQuery>,
) -> Result<Json<Vec<PseudonymRecord>>, ApiError> {
    require_non_blank(&domain, "domain")?;
    require_non_blank(&params.psn, "psn")?;
    Ok(Json(state.pseudonyms.get_by_psn(&domain, &params.psn).await?))
}

/// Update a batch of pseudonym records in the specified domain.
#[utoipa::path(
    put,
    path = "/api/pseudonymization/domains/{domain}/pseudonyms",
    params(("domain" = String, Path, description = "Domain the pseudonyms are stored in")),
    request_body = [PseudonymRecord],
    tag = "Pseudonyms",
    responses(
        (status = 200, description = "Batch updated"),
        (status = 404, description = "No pseudonyms in the domain")
    )
)]
pub async fn update_pseudonym_batch(
    Path(domain): Path<String>,
    State(state): State<AppState>,
    Json(records): Json<Vec<PseudonymRecord>>,
) -> Result<StatusCode, ApiError> {
    require_non_blank(&domain, "domain")?;
    state.pseudonyms.update_batch(&domain, &records).await?;
    Ok(StatusCode::OK)
}

/// Update a pseudonym record addressed by identifier and idType.
#[utoipa::path(
    put,
    path = "/api/pseudonymization/{domain}/by-id",
    params(
        ("domain" = String, Path, description = "Domain the pseudonym is stored in"),
        UpdateByIdentifierQuery
    ),
    request_body = PseudonymRecord,
    tag = "Pseudonyms",
    responses(
        (status = 200, description = "The updated record", body = PseudonymRecord),
        (status = 404, description = "No matching record")
    )
)]
pub async fn update_pseudonym_by_identifier(
    Path(domain): Path<String>,
    State(state): State<AppState>,
    Query(params): Query<UpdateByIdentifierQuery>,
    Json(record): Json<PseudonymRecord>,
) -> Result<Json<PseudonymRecord>, ApiError> {
    require_non_blank(&params.identifier, "identifier")?;
    require_non_blank(&params.id_type, "idType")?;
    require_identity(&record)?;
    let updated = state
        .pseudonyms
        .update_by_identifier(&domain, &params.identifier, &params.id_type, &record)
        .await?;
    Ok(Json(updated))
}

/// Update a pseudonym record addressed by identifier and idType,
/// replacing the entire record.
#[utoipa::path(
    put,
    path = "/api/pseudonymization/domains/{domain}/pseudonym/complete/by-id",
    params(
        ("domain" = String, Path, description = "Domain the pseudonym is stored in"),
        IdentifierQuery
    ),
    request_body = PseudonymRecord,
    tag = "Pseudonyms",
    responses(
        (status = 200, description = "The updated record", body = PseudonymRecord),
        (status = 404, description = "No matching record")
    )
)]
pub async fn update_pseudonym_complete_by_identifier(
    Path(domain): Path<String>,
    State(state): State<AppState>,
    Query(params): Query<IdentifierQuery>,
    Json(record): Json<PseudonymRecord>,
) -> Result<Json<PseudonymRecord>, ApiError> {
    require_non_blank(&params.id, "id")?;
    require_non_blank(&params.id_type, "idType")?;
    let updated = state
        .pseudonyms
        .update_complete_by_identifier(&domain, &record, &params.id, &params.id_type)
        .await?;
    Ok(Json(updated))
}

/// Update a pseudonym record addressed by pseudonym value, replacing the
/// entire record.
#[utoipa::path(
    put,
    path = "/api/pseudonymization/domains/{domain}/pseudonym/complete/by-psn",
    params(
        ("domain" = String, Path, description = "Domain the pseudonym is stored in"),
        PsnQuery
    ),
    request_body = PseudonymRecord,
    tag = "Pseudonyms",
    responses(
        (status = 200, description = "The updated record", body = PseudonymRecord),
        (status = 404, description = "No matching record")
    )
)]
pub async fn update_pseudonym_complete_by_psn(
    Path(domain): Path<String>,
    State(state): State<AppState>,
    Query(params): Query<PsnQuery>,
    Json(record): Json<PseudonymRecord>,
) -> Result<Json<PseudonymRecord>, ApiError> {
    require_non_blank(&params.psn, "psn")?;
    let updated = state
        .pseudonyms
        .update_complete_by_psn(&domain, &record, &params.psn)
        .await?;
    Ok(Json(updated))
}

/// Update a pseudonym record addressed by pseudonym value.
#[utoipa::path(
    put,
    path = "/api/pseudonymization/{domain}/by-psn",
    params(
        ("domain" = String, Path, description = "Domain the pseudonym is stored in"),
        PsnQuery
    ),
    request_body = PseudonymRecord,
    tag = "Pseudonyms",
    responses(
        (status = 200, description = "The updated record", body = PseudonymRecord),
        (status = 404, description = "No matching record")
    )
)]
pub async fn update_pseudonym_by_psn(
    Path(domain): Path<String>,
    State(state): State<AppState>,
    Query(params): Query<PsnQuery>,
    Json(record): Json<PseudonymRecord>,
) -> Result<Json<PseudonymRecord>, ApiError> {
    require_non_blank(&domain, "domain")?;
    require_non_blank(&params.psn, "psn")?;
    require_identity(&record)?;
    let updated = state
        .pseudonyms
        .update_by_psn(&domain, &params.psn, &record)
        .await?;
    Ok(Json(updated))
}

/// Delete all pseudonym records in the specified domain.
#[utoipa::path(
    delete,
    path = "/api/pseudonymization/domains/{domain}/pseudonyms",
    params(("domain" = String, Path, description = "Domain to delete from")),
    tag = "Pseudonyms",
    responses((status = 204, description = "Batch deleted"))
)]
pub async fn delete_pseudonym_batch(
    Path(domain): Path<String>,
    State(state): State<AppState>,
) -> Result<StatusCode, ApiError> {
    require_non_blank(&domain, "domain")?;
    state.pseudonyms.delete_batch(&domain).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Delete a single pseudonym record, addressed either by identifier and
/// idType or by pseudonym value.
#[utoipa::path(
    delete,
    path = "/api/pseudonymization/domains/{domain}/pseudonym",
    params(
        ("domain" = String, Path, description = "Domain the pseudonym is stored in"),
        DeletePseudonymQuery
    ),
    tag = "Pseudonyms",
    responses(
        (status = 200, description = "Record deleted"),
        (status = 400, description = "Neither identifier and idType nor psn provided")
    )
)]
pub async fn delete_pseudonym(
    Path(domain): Path<String>,
    State(state): State<AppState>,
    Query(params): Query<DeletePseudonymQuery>,
) -> Result<StatusCode, ApiError> {
    require_non_blank(&domain, "domain")?;
    let selector = RecordSelector::from_parts(params.id, params.id_type, params.psn)
        .ok_or_else(|| {
            ApiError::bad_request("Either identifier and idType or psn must be provided")
        })?;
    state.pseudonyms.delete(&domain, &selector).await?;
    Ok(StatusCode::OK)
}

/// Validate a pseudonym value in the specified domain.
///
/// The verdict is forwarded as the raw text body ACE produced.
#[utoipa::path(
    get,
    path = "/api/pseudonymization/domains/{domain}/pseudonym/validation",
    params(
        ("domain" = String, Path, description = "Domain the pseudonym is stored in"),
        PsnQuery
    ),
    tag = "Pseudonyms",
    responses(
        (status = 200, description = "Validation verdict", body = String),
        (status = 404, description = "No matching record")
    )
)]
pub async fn validate_pseudonym(
    Path(domain): Path<String>,
    State(state): State<AppState>,
    Query(params): Query<PsnQuery>,
) -> Result<String, ApiError> {
    require_non_blank(&domain, "domain")?;
    Ok(state.pseudonyms.validate(&domain, &params.psn).await?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn omit_prefix_defaults_to_false() {
        let params: OmitPrefixQuery = serde_json::from_str("{}").unwrap();
        assert!(!params.omit_prefix);

        let params: OmitPrefixQuery =
            serde_json::from_str(r#"{"omitPrefix": true}"#).unwrap();
        assert!(params.omit_prefix);
    }

    #[test]
    fn delete_query_accepts_lowercase_idtype() {
        let params: DeletePseudonymQuery =
            serde_json::from_str(r#"{"id": "rec-1", "idtype": "mrn"}"#).unwrap();
        assert_eq!(params.id.as_deref(), Some("rec-1"));
        assert_eq!(params.id_type.as_deref(), Some("mrn"));
        assert_eq!(params.psn, None);
    }

    #[test]
    fn require_identity_maps_to_bad_request() {
        let record = PseudonymRecord {
            id: Some("rec-1".into()),
            ..Default::default()
        };
        let err = require_identity(&record).unwrap_err();
        assert_eq!(err.status, axum::http::StatusCode::BAD_REQUEST);
        assert_eq!(err.message, "idType must not be blank");
    }

    #[test]
    fn linked_query_parses_optional_parameters() {
        let params: LinkedPseudonymsQuery = serde_json::from_str(
            r#"{"sourceDomain": "src", "targetDomain": "dst", "sourcePsn": "PSN-1"}"#,
        )
        .unwrap();
        assert_eq!(params.source_domain, "src");
        assert_eq!(params.target_domain, "dst");
        assert_eq!(params.source_identifier, None);
        assert_eq!(params.source_psn.as_deref(), Some("PSN-1"));
    }
}
