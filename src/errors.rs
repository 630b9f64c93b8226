use crate::services::{provider::ProviderError, provisioning_service::ProvisionError};
use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use std::fmt;
use tracing::error;

/// A lightweight wrapper for general errors that keeps the message local.
#[derive(Debug)]
pub struct AppError {
    pub status: StatusCode,
    pub message: String,
}

impl AppError {
    /// Create a new AppError with a specific status and message.
    pub fn new(status: StatusCode, msg: impl Into<String>) -> Self {
        Self {
            status,
            message: msg.into(),
        }
    }

    /// Shortcut for a 500 Internal Server Error
    pub fn internal(msg: impl Into<String>) -> Self {
        Self::new(StatusCode::INTERNAL_SERVER_ERROR, msg)
    }

    /// Shortcut for 400 Bad Request
    pub fn bad_request(msg: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, msg)
    }
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for AppError {}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let body = Json(json!({ "error": self.message }));

        (self.status, body).into_response()
    }
}

impl From<ProvisionError> for AppError {
    fn from(err: ProvisionError) -> Self {
        match &err {
            ProvisionError::Validation(_) => AppError::bad_request(err.to_string()),
            ProvisionError::BucketUnavailable { bucket, attempts } => {
                error!("bucket {} not accessible after {} checks", bucket, attempts);
                AppError::internal(err.to_string())
            }
            ProvisionError::Provider(ProviderError::Api { operation, message }) => {
                error!("provider call {} failed: {}", operation, message);
                AppError::internal(err.to_string())
            }
            ProvisionError::Provider(ProviderError::BucketNotFound(_))
            | ProvisionError::BucketAccess { .. } => {
                error!("provider call failed: {}", err);
                AppError::internal(err.to_string())
            }
        }
    }
}
