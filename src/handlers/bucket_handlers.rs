//! HTTP handlers for bucket provisioning and listing.
//! Both delegate to `ProvisioningService` and only shape the JSON.

use crate::{
    errors::AppError,
    models::bucket::{BucketCreated, BucketList, CreateBucketReq},
    services::provisioning_service::ProvisioningService,
};
use axum::{
    Json,
    extract::{State, rejection::JsonRejection},
};
use tracing::debug;

/// POST `/create_bucket` — create and configure a public website bucket.
///
/// A body that is missing or not valid JSON is reported the same way as a
/// missing `bucket_name`.
pub async fn create_bucket(
    State(service): State<ProvisioningService>,
    payload: Result<Json<CreateBucketReq>, JsonRejection>,
) -> Result<Json<BucketCreated>, AppError> {
    let req = match payload {
        Ok(Json(req)) => req,
        Err(rejection) => {
            debug!("create_bucket body rejected: {}", rejection);
            CreateBucketReq::default()
        }
    };

    let message = service.create_bucket(req.bucket_name.as_deref()).await?;
    Ok(Json(BucketCreated { message }))
}

/// GET `/list_buckets` — names of every bucket the credentials can see.
pub async fn list_buckets(
    State(service): State<ProvisioningService>,
) -> Result<Json<BucketList>, AppError> {
    let buckets = service.list_buckets().await?;
    Ok(Json(BucketList { buckets }))
}
