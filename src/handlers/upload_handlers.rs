//! Multipart upload handler.
//!
//! Collects the `bucket_name` field and every file part before touching the
//! provider, since the form may list the bucket after the files.

use crate::{
    errors::AppError,
    models::upload::{UploadFile, UploadRequest, UploadResponse},
    services::provisioning_service::ProvisioningService,
};
use axum::{
    Json,
    extract::{Multipart, State, multipart::MultipartRejection},
};
use tracing::debug;

const MISSING_INPUT: &str = "Files and bucket name are required";

/// POST `/upload` — write the submitted files into an existing bucket.
pub async fn upload_files(
    State(service): State<ProvisioningService>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<Json<UploadResponse>, AppError> {
    let mut multipart = multipart.map_err(|rejection| {
        debug!("upload body rejected: {}", rejection);
        AppError::bad_request(MISSING_INPUT)
    })?;

    let mut request = UploadRequest::default();
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|err| AppError::new(err.status(), err.body_text()))?
    {
        let name = field.name().unwrap_or_default().to_string();
        match name.as_str() {
            "bucket_name" => {
                let value = field
                    .text()
                    .await
                    .map_err(|err| AppError::new(err.status(), err.body_text()))?;
                request.bucket_name = Some(value);
            }
            "files" | "files[]" => {
                let filename = match field.file_name() {
                    Some(file_name) if !file_name.is_empty() => file_name.to_string(),
                    _ => continue,
                };
                let content_type = field.content_type().map(str::to_string);
                let content = field
                    .bytes()
                    .await
                    .map_err(|err| AppError::new(err.status(), err.body_text()))?;
                request.files.push(UploadFile {
                    filename,
                    content_type,
                    content,
                });
            }
            other => debug!("ignoring form field `{}`", other),
        }
    }

    let (bucket_name, files) = request
        .into_parts()
        .ok_or_else(|| AppError::bad_request(MISSING_INPUT))?;

    let url = service.upload_files(&bucket_name, files).await?;
    Ok(Json(UploadResponse { url }))
}
