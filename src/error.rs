// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

use crate::ace::AceError;

#[derive(Debug)]
pub struct ApiError {
    pub status: StatusCode,
    pub message: String,
}

#[derive(Serialize)]
struct ErrorBody {
    error: String,
}

impl ApiError {
    pub fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
        }
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, message)
    }

    pub fn bad_gateway(message: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_GATEWAY, message)
    }

    pub fn service_unavailable(message: impl Into<String>) -> Self {
        Self::new(StatusCode::SERVICE_UNAVAILABLE, message)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = Json(ErrorBody {
            error: self.message,
        });
        (self.status, body).into_response()
    }
}

/// Map connector failures onto the HTTP surface.
///
/// Upstream HTTP failures keep their status code (the ACE contract
/// promises 400/401/404 where they apply); transport failures become 502,
/// token acquisition failures 503.
impl From<AceError> for ApiError {
    fn from(error: AceError) -> Self {
        let message = error.to_string();
        match error {
            AceError::Upstream { status, .. } => {
                let status =
                    StatusCode::from_u16(status.as_u16()).unwrap_or(StatusCode::BAD_GATEWAY);
                ApiError::new(status, message)
            }
            AceError::Auth(_) => ApiError::service_unavailable(message),
            AceError::Request(_) | AceError::InvalidResponse(_) | AceError::InvalidServiceUrl(_) => {
                ApiError::bad_gateway(message)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::AuthError;
    use axum::body::to_bytes;

    #[test]
    fn constructors_set_status_and_message() {
        let bad = ApiError::bad_request("bad");
        assert_eq!(bad.status, StatusCode::BAD_REQUEST);
        assert_eq!(bad.message, "bad");

        let gw = ApiError::bad_gateway("gone");
        assert_eq!(gw.status, StatusCode::BAD_GATEWAY);

        let unavailable = ApiError::service_unavailable("later");
        assert_eq!(unavailable.status, StatusCode::SERVICE_UNAVAILABLE);
    }

    #[tokio::test]
    async fn into_response_returns_json_body() {
        let response = ApiError::bad_request("bad data").into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let body_bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let body = String::from_utf8(body_bytes.to_vec()).unwrap();
        assert_eq!(body, r#"{"error":"bad data"}"#);
    }

    #[test]
    fn upstream_status_codes_pass_through() {
        let err: ApiError = AceError::Upstream {
            status: reqwest::StatusCode::NOT_FOUND,
            body: "no such domain".to_string(),
        }
        .into();
        assert_eq!(err.status, StatusCode::NOT_FOUND);
        assert!(err.message.contains("no such domain"));

        let err: ApiError = AceError::Upstream {
            status: reqwest::StatusCode::UNAUTHORIZED,
            body: String::new(),
        }
        .into();
        assert_eq!(err.status, StatusCode::UNAUTHORIZED);
    }

    #[test]
    fn transport_and_auth_failures_map_to_gateway_statuses() {
        let err: ApiError = AceError::Request("connection reset".to_string()).into();
        assert_eq!(err.status, StatusCode::BAD_GATEWAY);

        let err: ApiError = AceError::Auth(AuthError::Request("refused".to_string())).into();
        assert_eq!(err.status, StatusCode::SERVICE_UNAVAILABLE);
    }
}
