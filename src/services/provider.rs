//! Object-storage provider contract.
//!
//! The provisioning service only ever talks to the provider through
//! [`StorageProvider`], so the real S3 client and the in-memory test double
//! are interchangeable behind an `Arc<dyn StorageProvider>`.

use bytes::Bytes;
use futures::future::BoxFuture;
use thiserror::Error;

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ProviderError {
    /// The bucket does not exist (yet). The only condition worth retrying.
    #[error("bucket `{0}` not found")]
    BucketNotFound(String),
    #[error("{message}")]
    Api {
        operation: &'static str,
        message: String,
    },
}

impl ProviderError {
    pub fn api(operation: &'static str, message: impl Into<String>) -> Self {
        Self::Api {
            operation,
            message: message.into(),
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::BucketNotFound(_))
    }
}

pub type ProviderResult<T> = Result<T, ProviderError>;

/// A single object write.
#[derive(Debug, Clone)]
pub struct PutObject {
    pub bucket: String,
    pub key: String,
    pub body: Bytes,
    pub content_type: Option<String>,
    pub cache_control: String,
}

/// Control- and data-plane calls consumed from the object-storage provider.
pub trait StorageProvider: Send + Sync + 'static {
    /// Create `bucket` in `region`.
    fn create_bucket<'a>(
        &'a self,
        bucket: &'a str,
        region: &'a str,
    ) -> BoxFuture<'a, ProviderResult<()>>;

    /// Block until the provider reports `bucket` as existing.
    fn wait_until_bucket_exists<'a>(
        &'a self,
        bucket: &'a str,
    ) -> BoxFuture<'a, ProviderResult<()>>;

    /// Turn off all four public-access-block flags.
    fn disable_public_access_block<'a>(
        &'a self,
        bucket: &'a str,
    ) -> BoxFuture<'a, ProviderResult<()>>;

    /// Enable static website hosting with the given index and error documents.
    fn put_bucket_website<'a>(
        &'a self,
        bucket: &'a str,
        index_document: &'a str,
        error_document: &'a str,
    ) -> BoxFuture<'a, ProviderResult<()>>;

    fn enable_versioning<'a>(&'a self, bucket: &'a str) -> BoxFuture<'a, ProviderResult<()>>;

    /// Attach a JSON policy document to `bucket`.
    fn put_bucket_policy<'a>(
        &'a self,
        bucket: &'a str,
        policy: &'a str,
    ) -> BoxFuture<'a, ProviderResult<()>>;

    /// Names of all buckets visible to the credentials, in provider order.
    fn list_buckets(&self) -> BoxFuture<'_, ProviderResult<Vec<String>>>;

    /// Succeeds when `bucket` is accessible; [`ProviderError::BucketNotFound`] when missing.
    fn head_bucket<'a>(&'a self, bucket: &'a str) -> BoxFuture<'a, ProviderResult<()>>;

    fn put_object(&self, object: PutObject) -> BoxFuture<'_, ProviderResult<()>>;
}
