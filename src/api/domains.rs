// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Domain management endpoints, forwarded to ACE.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use serde::Deserialize;
use utoipa::IntoParams;

use super::require_non_blank;
use crate::{error::ApiError, models::DomainRecord, state::AppState};

#[derive(Deserialize, IntoParams)]
pub struct DomainNameQuery {
    /// Name of the domain.
    pub name: String,
}

#[derive(Deserialize, IntoParams)]
pub struct RecursiveQuery {
    /// Whether to apply the operation recursively to sub-domains.
    #[serde(default = "default_true")]
    pub recursive: bool,
}

#[derive(Deserialize, IntoParams)]
pub struct SaltQuery {
    /// The new salt value.
    #[serde(rename = "new-salt")]
    pub new_salt: String,
    /// Whether an empty salt is acceptable.
    #[serde(rename = "allowEmpty", default)]
    pub allow_empty: bool,
}

fn default_true() -> bool {
    true
}

/// Retrieve the domain hierarchy in a minimal representation.
///
/// The underlying ACE endpoint is marked as experimental.
#[utoipa::path(
    get,
    path = "/api/pseudonymization/domain/hierarchy",
    tag = "Domains",
    responses(
        (status = 200, description = "Domain hierarchy", body = [DomainRecord]),
        (status = 401, description = "Authentication failure")
    )
)]
pub async fn get_domain_hierarchy(
    State(state): State<AppState>,
) -> Result<Json<Vec<DomainRecord>>, ApiError> {
    Ok(Json(state.domains.domain_hierarchy().await?))
}

/// Retrieve a domain by name.
#[utoipa::path(
    get,
    path = "/api/pseudonymization/domain",
    params(DomainNameQuery),
    tag = "Domains",
    responses(
        (status = 200, description = "The requested domain", body = DomainRecord),
        (status = 400, description = "Blank domain name"),
        (status = 404, description = "Domain not found")
    )
)]
pub async fn get_domain(
    State(state): State<AppState>,
    Query(params): Query<DomainNameQuery>,
) -> Result<Json<DomainRecord>, ApiError> {
    require_non_blank(&params.name, "name")?;
    Ok(Json(state.domains.get_domain(&params.name).await?))
}

/// Retrieve a single attribute of a domain.
#[utoipa::path(
    get,
    path = "/api/pseudonymization/domains/{domain}/{attribute}",
    params(
        ("domain" = String, Path, description = "Name of the domain"),
        ("attribute" = String, Path, description = "Name of the attribute to retrieve")
    ),
    tag = "Domains",
    responses(
        (status = 200, description = "Domain record holding only the requested attribute", body = DomainRecord)
    )
)]
pub async fn get_domain_attribute(
    Path((domain, attribute)): Path<(String, String)>,
    State(state): State<AppState>,
) -> Result<Json<DomainRecord>, ApiError> {
    require_non_blank(&domain, "domain")?;
    require_non_blank(&attribute, "attribute")?;
    Ok(Json(
        state.domains.get_domain_attribute(&domain, &attribute).await?,
    ))
}

/// Create a new domain with a reduced set of attributes.
#[utoipa::path(
    post,
    path = "/api/pseudonymization/domain",
    request_body = DomainRecord,
    tag = "Domains",
    responses((status = 200, description = "The created domain", body = DomainRecord))
)]
pub async fn create_domain(
    State(state): State<AppState>,
    Json(record): Json<DomainRecord>,
) -> Result<Json<DomainRecord>, ApiError> {
    Ok(Json(state.domains.create_domain(&record).await?))
}

/// Create a new domain with all attributes.
#[utoipa::path(
    post,
    path = "/api/pseudonymization/domain/complete",
    request_body = DomainRecord,
    tag = "Domains",
    responses((status = 200, description = "The created domain", body = DomainRecord))
)]
pub async fn create_domain_complete(
    State(state): State<AppState>,
    Json(record): Json<DomainRecord>,
) -> Result<Json<DomainRecord>, ApiError> {
    Ok(Json(state.domains.create_domain_complete(&record).await?))
}

/// Update an existing domain with a reduced set of attributes.
#[utoipa::path(
    put,
    path = "/api/pseudonymization/domain",
    params(DomainNameQuery),
    request_body = DomainRecord,
    tag = "Domains",
    responses((status = 200, description = "The updated domain", body = DomainRecord))
)]
pub async fn update_domain(
    State(state): State<AppState>,
    Query(params): Query<DomainNameQuery>,
    Json(record): Json<DomainRecord>,
) -> Result<Json<DomainRecord>, ApiError> {
    Ok(Json(state.domains.update_domain(&params.name, &record).await?))
}

/// Update an existing domain with all attributes.
#[utoipa::path(
    put,
    path = "/api/pseudonymization/domain/complete/{domain}",
    params(
        ("domain" = String, Path, description = "Name of the domain to update"),
        RecursiveQuery
    ),
    request_body = DomainRecord,
    tag = "Domains",
    responses((status = 200, description = "The updated domain", body = DomainRecord))
)]
pub async fn update_domain_complete(
    Path(domain): Path<String>,
    State(state): State<AppState>,
    Query(params): Query<RecursiveQuery>,
    Json(record): Json<DomainRecord>,
) -> Result<Json<DomainRecord>, ApiError> {
    require_non_blank(&domain, "domain")?;
    Ok(Json(
        state
            .domains
            .update_domain_complete(&domain, &record, params.recursive)
            .await?,
    ))
}

/// Replace the salt of a domain.
#[utoipa::path(
    put,
    path = "/api/pseudonymization/domains/{domain}/salt",
    params(
        ("domain" = String, Path, description = "Name of the domain"),
        SaltQuery
    ),
    tag = "Domains",
    responses((status = 200, description = "The updated domain", body = DomainRecord))
)]
pub async fn update_salt(
    Path(domain): Path<String>,
    State(state): State<AppState>,
    Query(params): Query<SaltQuery>,
) -> Result<Json<DomainRecord>, ApiError> {
    require_non_blank(&domain, "domain")?;
    require_non_blank(&params.new_salt, "new-salt")?;
    Ok(Json(
        state
            .domains
            .update_salt(&domain, &params.new_salt, params.allow_empty)
            .await?,
    ))
}

/// Delete a domain.
#[utoipa::path(
    delete,
    path = "/api/pseudonymization/domain/{domain}",
    params(
        ("domain" = String, Path, description = "Name of the domain to delete"),
        RecursiveQuery
    ),
    tag = "Domains",
    responses((status = 200, description = "Domain deleted"))
)]
pub async fn delete_domain(
    Path(domain): Path<String>,
    State(state): State<AppState>,
    Query(params): Query<RecursiveQuery>,
) -> Result<StatusCode, ApiError> {
    require_non_blank(&domain, "domain")?;
    state.domains.delete_domain(&domain, params.recursive).await?;
    Ok(StatusCode::OK)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn recursive_defaults_to_true() {
        let params: RecursiveQuery = serde_json::from_str("{}").unwrap();
        assert!(params.recursive);

        let params: RecursiveQuery = serde_json::from_str(r#"{"recursive": false}"#).unwrap();
        assert!(!params.recursive);
    }

    #[test]
    fn salt_query_uses_dashed_parameter_name() {
        let params: SaltQuery =
            serde_json::from_str(r#"{"new-salt": "abc"}"#).unwrap();
        assert_eq!(params.new_salt, "abc");
        assert!(!params.allow_empty);

        let params: SaltQuery =
            serde_json::from_str(r#"{"new-salt": "abc", "allowEmpty": true}"#).unwrap();
        assert!(params.allow_empty);
    }
}
