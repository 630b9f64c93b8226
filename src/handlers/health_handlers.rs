//! Health & readiness handlers.
//!
//! - GET /healthz  -> simple liveness ("ok")
//! - GET /readyz   -> readiness that checks the provider answers a bucket listing

use crate::services::provisioning_service::ProvisioningService;
use axum::{Json, extract::State, http::StatusCode, response::IntoResponse};
use serde::Serialize;
use tracing::warn;

/// `GET /healthz`
///
/// Very small liveness probe — always returns 200 OK with a plain JSON body.
/// This endpoint should be cheap and never perform I/O.
pub async fn healthz() -> impl IntoResponse {
    (
        StatusCode::OK,
        Json(HealthResponse {
            status: "ok".into(),
            error: None,
        }),
    )
}

/// `GET /readyz`
///
/// Lists buckets once to prove credentials and connectivity.
/// HTTP 200 when the provider answers, HTTP 503 otherwise.
pub async fn readyz(State(service): State<ProvisioningService>) -> impl IntoResponse {
    match service.list_buckets().await {
        Ok(_) => (
            StatusCode::OK,
            Json(HealthResponse {
                status: "ok".into(),
                error: None,
            }),
        ),
        Err(err) => {
            warn!("readiness check failed: {}", err);
            (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(HealthResponse {
                    status: "error".into(),
                    error: Some(err.to_string()),
                }),
            )
        }
    }
}

#[derive(Serialize)]
struct HealthResponse {
    status: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}
