//! src/services/provisioning_service.rs
//!
//! ProvisioningService — sequences the provider calls behind each endpoint.
//! It keeps no state of its own beyond the shared provider handle and the
//! read-only region/account configuration; every call starts from scratch.

use crate::{
    config::ProviderConfig,
    models::{
        bucket::{namespaced_bucket_name, prefixed_bucket_name, website_url},
        policy::BucketPolicy,
        upload::UploadFile,
    },
    services::{
        backoff::BackoffPolicy,
        provider::{ProviderError, PutObject, StorageProvider},
    },
};
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, error, info, warn};

pub const INDEX_DOCUMENT: &str = "index.html";
pub const ERROR_DOCUMENT: &str = "error.html";
pub const UPLOAD_CACHE_CONTROL: &str = "no-cache, no-store, must-revalidate";

#[derive(Debug, Error)]
pub enum ProvisionError {
    #[error("{0}")]
    Validation(String),
    #[error(transparent)]
    Provider(#[from] ProviderError),
    #[error("Error accessing bucket {bucket}: {message}")]
    BucketAccess { bucket: String, message: String },
    #[error("Bucket does not exist or is not accessible")]
    BucketUnavailable { bucket: String, attempts: u32 },
}

pub type ProvisionResult<T> = Result<T, ProvisionError>;

/// ProvisioningService provides the three provider-backed operations:
/// - Create a public static-website bucket
/// - List bucket names
/// - Upload files into an existing bucket
#[derive(Clone)]
pub struct ProvisioningService {
    /// Shared provider client; only ever used through `&self`.
    pub provider: Arc<dyn StorageProvider>,

    pub config: Arc<ProviderConfig>,

    /// Schedule for the pre-upload bucket existence check.
    pub backoff: BackoffPolicy,
}

impl ProvisioningService {
    pub fn new(
        provider: Arc<dyn StorageProvider>,
        config: ProviderConfig,
        backoff: BackoffPolicy,
    ) -> Self {
        Self {
            provider,
            config: Arc::new(config),
            backoff,
        }
    }

    /// Name of the bucket CreateBucket makes for a caller-supplied name.
    pub fn new_bucket_name(&self, name: &str) -> String {
        prefixed_bucket_name(&self.config.account_id, name)
    }

    /// Existing bucket a caller refers to, by bare or already-prefixed name.
    pub fn existing_bucket_name(&self, name: &str) -> String {
        namespaced_bucket_name(&self.config.account_id, name)
    }

    /// Create a bucket and configure it for public static-website hosting.
    ///
    /// Steps run strictly in order and the first failure aborts the rest.
    /// A partially configured bucket is left in place.
    ///
    /// Returns the success message naming the namespaced bucket.
    pub async fn create_bucket(&self, name: Option<&str>) -> ProvisionResult<String> {
        let name = name
            .map(str::trim)
            .filter(|n| !n.is_empty())
            .ok_or_else(|| ProvisionError::Validation("Bucket name is required".into()))?;

        let bucket = self.new_bucket_name(name);
        let region = self.config.region.as_str();

        debug!("creating bucket {} in {}", bucket, region);
        self.provider.create_bucket(&bucket, region).await?;

        debug!("waiting for bucket {} to exist", bucket);
        self.provider.wait_until_bucket_exists(&bucket).await?;

        debug!("disabling public access block on {}", bucket);
        self.provider.disable_public_access_block(&bucket).await?;

        debug!("enabling website hosting on {}", bucket);
        self.provider
            .put_bucket_website(&bucket, INDEX_DOCUMENT, ERROR_DOCUMENT)
            .await?;

        debug!("enabling versioning on {}", bucket);
        self.provider.enable_versioning(&bucket).await?;

        let policy = BucketPolicy::public_read(&bucket)
            .to_json()
            .map_err(|e| ProviderError::api("put_bucket_policy", e.to_string()))?;
        debug!("attaching public read policy to {}", bucket);
        self.provider.put_bucket_policy(&bucket, &policy).await?;

        info!("bucket {} provisioned with public read access", bucket);
        Ok(format!(
            "Bucket {} created successfully with public read access!",
            bucket
        ))
    }

    /// All bucket names in provider order.
    pub async fn list_buckets(&self) -> ProvisionResult<Vec<String>> {
        Ok(self.provider.list_buckets().await?)
    }

    /// Poll `head_bucket` until the bucket is reachable.
    ///
    /// Only not-found is retried, sleeping `base * 2^attempt` between tries.
    /// Any other error stops immediately.
    pub async fn wait_for_bucket(&self, bucket: &str) -> ProvisionResult<()> {
        let mut attempt = 0;
        loop {
            debug!("checking bucket {} (attempt {})", bucket, attempt + 1);
            match self.provider.head_bucket(bucket).await {
                Ok(()) => {
                    debug!("bucket {} is accessible", bucket);
                    return Ok(());
                }
                Err(err) if err.is_not_found() => {
                    warn!(
                        "bucket {} does not exist, attempt {} of {}",
                        bucket,
                        attempt + 1,
                        self.backoff.max_attempts
                    );
                    match self.backoff.delay_after(attempt) {
                        Some(delay) => tokio::time::sleep(delay).await,
                        None => {
                            return Err(ProvisionError::BucketUnavailable {
                                bucket: bucket.to_string(),
                                attempts: attempt + 1,
                            });
                        }
                    }
                }
                Err(err) => {
                    error!("error accessing bucket {}: {}", bucket, err);
                    return Err(ProvisionError::BucketAccess {
                        bucket: bucket.to_string(),
                        message: err.to_string(),
                    });
                }
            }
            attempt += 1;
        }
    }

    /// Upload `files` in order, keyed by filename, and return the website URL.
    ///
    /// The bucket must pass [`Self::wait_for_bucket`] first. The first failed
    /// upload aborts the remainder; objects already written stay in place.
    pub async fn upload_files(
        &self,
        bucket_name: &str,
        files: Vec<UploadFile>,
    ) -> ProvisionResult<String> {
        let bucket = self.existing_bucket_name(bucket_name.trim());
        self.wait_for_bucket(&bucket).await?;

        for file in files {
            debug!(
                "uploading {} ({}) to {}",
                file.filename,
                file.content_type.as_deref().unwrap_or("unknown type"),
                bucket
            );
            let key = file.filename;
            self.provider
                .put_object(PutObject {
                    bucket: bucket.clone(),
                    key: key.clone(),
                    body: file.content,
                    content_type: file.content_type,
                    cache_control: UPLOAD_CACHE_CONTROL.to_string(),
                })
                .await?;
            info!("uploaded {} to {}", key, bucket);
        }

        let url = website_url(&bucket, &self.config.region);
        info!("website URL: {}", url);
        Ok(url)
    }
}
