// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

use axum::{
    http::Request,
    routing::{delete, get, post, put},
    Router,
};
use tower_http::cors::CorsLayer;
use tower_http::request_id::{
    MakeRequestId, PropagateRequestIdLayer, RequestId, SetRequestIdLayer,
};
use tower_http::trace::TraceLayer;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;
use uuid::Uuid;

use crate::{
    error::ApiError,
    models::{DomainRecord, PseudonymRecord},
    state::AppState,
};

pub mod domains;
pub mod health;
pub mod pseudonyms;

pub fn router(state: AppState) -> Router {
    // Routes mirror the upstream ACE controller layout, including the
    // root-level by-id/by-psn update paths.
    let api_routes = Router::new()
        .route("/domain/hierarchy", get(domains::get_domain_hierarchy))
        .route(
            "/domain",
            get(domains::get_domain)
                .post(domains::create_domain)
                .put(domains::update_domain),
        )
        .route("/domain/complete", post(domains::create_domain_complete))
        .route(
            "/domain/complete/{domain}",
            put(domains::update_domain_complete),
        )
        .route("/domain/{domain}", delete(domains::delete_domain))
        .route("/domains/{domain}/salt", put(domains::update_salt))
        .route(
            "/domains/linked-pseudonyms",
            get(pseudonyms::get_linked_pseudonyms),
        )
        .route(
            "/domains/{domain}/pseudonyms",
            get(pseudonyms::get_pseudonym_batch)
                .post(pseudonyms::create_pseudonym_batch)
                .put(pseudonyms::update_pseudonym_batch)
                .delete(pseudonyms::delete_pseudonym_batch),
        )
        .route(
            "/domains/{domain}/pseudonym",
            post(pseudonyms::create_pseudonym).delete(pseudonyms::delete_pseudonym),
        )
        .route(
            "/domains/{domain}/pseudonym/by-id",
            get(pseudonyms::get_pseudonym_by_identifier),
        )
        .route(
            "/domains/{domain}/pseudonym/by-psn",
            get(pseudonyms::get_pseudonym_by_psn),
        )
        .route(
            "/domains/{domain}/pseudonym/complete/by-id",
            put(pseudonyms::update_pseudonym_complete_by_identifier),
        )
        .route(
            "/domains/{domain}/pseudonym/complete/by-psn",
            put(pseudonyms::update_pseudonym_complete_by_psn),
        )
        .route(
            "/domains/{domain}/pseudonym/validation",
            get(pseudonyms::validate_pseudonym),
        )
        .route(
            "/domains/{domain}/{attribute}",
            get(domains::get_domain_attribute),
        )
        .route(
            "/{domain}/by-id",
            put(pseudonyms::update_pseudonym_by_identifier),
        )
        .route("/{domain}/by-psn", put(pseudonyms::update_pseudonym_by_psn))
        .with_state(state.clone());

    let health_routes = Router::new()
        .route("/health", get(health::health))
        .route("/health/live", get(health::liveness))
        .route("/health/ready", get(health::readiness))
        .with_state(state);

    Router::new()
        .nest("/api/pseudonymization", api_routes)
        .merge(health_routes)
        .merge(SwaggerUi::new("/docs").url("/api-doc/openapi.json", ApiDoc::openapi()))
        .layer(PropagateRequestIdLayer::x_request_id())
        .layer(TraceLayer::new_for_http())
        .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
        .layer(CorsLayer::permissive())
}

/// Attach a fresh UUID as `x-request-id` to incoming requests.
#[derive(Clone, Copy, Default)]
struct MakeRequestUuid;

impl MakeRequestId for MakeRequestUuid {
    fn make_request_id<B>(&mut self, _request: &Request<B>) -> Option<RequestId> {
        let id = Uuid::new_v4().to_string().parse().ok()?;
        Some(RequestId::new(id))
    }
}

/// Reject blank values where the upstream contract requires content.
fn require_non_blank(value: &str, name: &str) -> Result<(), ApiError> {
    if value.trim().is_empty() {
        return Err(ApiError::bad_request(format!("{name} must not be blank")));
    }
    Ok(())
}

#[derive(OpenApi)]
#[openapi(
    paths(
        domains::get_domain_hierarchy,
        domains::get_domain,
        domains::get_domain_attribute,
        domains::create_domain,
        domains::create_domain_complete,
        domains::update_domain,
        domains::update_domain_complete,
        domains::update_salt,
        domains::delete_domain,
        pseudonyms::create_pseudonym_batch,
        pseudonyms::create_pseudonym,
        pseudonyms::get_pseudonym_batch,
        pseudonyms::get_linked_pseudonyms,
        pseudonyms::get_pseudonym_by_identifier,
        pseudonyms::get_pseudonym_by_psn,
        pseudonyms::update_pseudonym_batch,
        pseudonyms::update_pseudonym_by_identifier,
        pseudonyms::update_pseudonym_complete_by_identifier,
        pseudonyms::update_pseudonym_complete_by_psn,
        pseudonyms::update_pseudonym_by_psn,
        pseudonyms::delete_pseudonym_batch,
        pseudonyms::delete_pseudonym,
        pseudonyms::validate_pseudonym,
        health::health,
        health::liveness,
        health::readiness
    ),
    components(schemas(
        DomainRecord,
        PseudonymRecord,
        health::HealthChecks,
        health::HealthResponse,
        health::ReadyResponse
    )),
    tags(
        (name = "Domains", description = "Domain management forwarded to ACE"),
        (name = "Pseudonyms", description = "Pseudonym operations forwarded to ACE"),
        (name = "Health", description = "Service health probes")
    )
)]
struct ApiDoc;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ConnectorConfig;

    fn test_state() -> AppState {
        let config = ConnectorConfig {
            service_url: "http://ace.example.com".to_string(),
            keycloak_url: "http://keycloak.example.com".to_string(),
            realm: "trustdeck".to_string(),
            client_id: "connector".to_string(),
            client_secret: "secret".to_string(),
            username: "svc-user".to_string(),
            password: "svc-pass".to_string(),
        };
        AppState::new(&config).expect("test state builds")
    }

    #[tokio::test]
    async fn router_builds_with_all_routes() {
        let app = router(test_state());
        // Ensure the router can be converted into a service without panicking.
        let _ = app.into_make_service();
    }

    #[tokio::test]
    async fn liveness_probe_responds_ok() {
        use axum::body::Body;
        use axum::http::{Request, StatusCode};
        use tower::ServiceExt;

        let app = router(test_state());
        let response = app
            .oneshot(
                Request::builder()
                    .uri("/health/live")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert!(response.headers().contains_key("x-request-id"));
    }

    #[test]
    fn require_non_blank_rejects_whitespace() {
        assert!(require_non_blank("value", "name").is_ok());
        let err = require_non_blank("   ", "name").unwrap_err();
        assert_eq!(err.message, "name must not be blank");
    }

    #[test]
    fn openapi_document_includes_all_paths() {
        let doc = ApiDoc::openapi();
        let paths = doc.paths.paths;
        assert!(paths.contains_key("/api/pseudonymization/domain"));
        assert!(paths.contains_key("/api/pseudonymization/domain/hierarchy"));
        assert!(paths.contains_key("/api/pseudonymization/domains/{domain}/pseudonyms"));
        assert!(paths.contains_key("/api/pseudonymization/domains/linked-pseudonyms"));
        assert!(paths.contains_key("/health"));
    }
}
