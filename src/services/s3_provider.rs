//! AWS S3 implementation of [`StorageProvider`].
//!
//! Credentials are resolved via the standard AWS credential chain
//! (env vars, `~/.aws/credentials`, IAM role, etc.).

use crate::services::provider::{ProviderError, ProviderResult, PutObject, StorageProvider};
use aws_sdk_s3::{
    Client,
    client::Waiters,
    error::{DisplayErrorContext, ProvideErrorMetadata},
    primitives::ByteStream,
    types::{
        BucketLocationConstraint, BucketVersioningStatus, CreateBucketConfiguration,
        ErrorDocument, IndexDocument, PublicAccessBlockConfiguration, VersioningConfiguration,
        WebsiteConfiguration,
    },
};
use futures::{FutureExt, future::BoxFuture};
use std::time::Duration;
use tracing::{debug, info};

/// Region that rejects an explicit location constraint.
const DEFAULT_REGION: &str = "us-east-1";

pub struct S3Provider {
    client: Client,
    /// Upper bound for the bucket-exists waiter.
    wait_timeout: Duration,
}

impl S3Provider {
    pub fn new(client: Client, wait_timeout: Duration) -> Self {
        Self {
            client,
            wait_timeout,
        }
    }

    /// Build a client for `region`, optionally pointed at a custom endpoint.
    pub async fn connect(
        region: &str,
        endpoint_url: Option<&str>,
        force_path_style: bool,
        wait_timeout: Duration,
    ) -> Self {
        let mut loader = aws_config::defaults(aws_config::BehaviorVersion::latest())
            .region(aws_config::Region::new(region.to_string()));
        if let Some(endpoint) = endpoint_url {
            loader = loader.endpoint_url(endpoint);
        }
        let sdk_config = loader.load().await;

        let s3_config = aws_sdk_s3::config::Builder::from(&sdk_config)
            .force_path_style(force_path_style)
            .build();

        info!(
            "S3 provider initialized: region={} endpoint={}",
            region,
            endpoint_url.unwrap_or("default")
        );

        Self::new(Client::from_conf(s3_config), wait_timeout)
    }
}

/// Render an SDK error as `Code: message`, falling back to the full error chain.
fn describe<E>(err: &E) -> String
where
    E: ProvideErrorMetadata + std::error::Error,
{
    match (err.code(), err.message()) {
        (Some(code), Some(message)) => format!("{code}: {message}"),
        (None, Some(message)) => message.to_string(),
        _ => DisplayErrorContext(err).to_string(),
    }
}

impl StorageProvider for S3Provider {
    fn create_bucket<'a>(
        &'a self,
        bucket: &'a str,
        region: &'a str,
    ) -> BoxFuture<'a, ProviderResult<()>> {
        async move {
            debug!("S3 create_bucket: bucket={} region={}", bucket, region);

            let mut request = self.client.create_bucket().bucket(bucket);
            if region != DEFAULT_REGION {
                let config = CreateBucketConfiguration::builder()
                    .location_constraint(BucketLocationConstraint::from(region))
                    .build();
                request = request.create_bucket_configuration(config);
            }

            request
                .send()
                .await
                .map_err(|e| ProviderError::api("create_bucket", describe(&e)))?;
            Ok(())
        }
        .boxed()
    }

    fn wait_until_bucket_exists<'a>(
        &'a self,
        bucket: &'a str,
    ) -> BoxFuture<'a, ProviderResult<()>> {
        async move {
            debug!(
                "S3 waiting for bucket {} (timeout {:?})",
                bucket, self.wait_timeout
            );

            self.client
                .wait_until_bucket_exists()
                .bucket(bucket)
                .wait(self.wait_timeout)
                .await
                .map_err(|e| {
                    ProviderError::api(
                        "wait_until_bucket_exists",
                        DisplayErrorContext(&e).to_string(),
                    )
                })?;
            Ok(())
        }
        .boxed()
    }

    fn disable_public_access_block<'a>(
        &'a self,
        bucket: &'a str,
    ) -> BoxFuture<'a, ProviderResult<()>> {
        async move {
            debug!("S3 put_public_access_block: bucket={}", bucket);

            let config = PublicAccessBlockConfiguration::builder()
                .block_public_acls(false)
                .ignore_public_acls(false)
                .block_public_policy(false)
                .restrict_public_buckets(false)
                .build();

            self.client
                .put_public_access_block()
                .bucket(bucket)
                .public_access_block_configuration(config)
                .send()
                .await
                .map_err(|e| ProviderError::api("put_public_access_block", describe(&e)))?;
            Ok(())
        }
        .boxed()
    }

    fn put_bucket_website<'a>(
        &'a self,
        bucket: &'a str,
        index_document: &'a str,
        error_document: &'a str,
    ) -> BoxFuture<'a, ProviderResult<()>> {
        async move {
            debug!(
                "S3 put_bucket_website: bucket={} index={} error={}",
                bucket, index_document, error_document
            );

            let index = IndexDocument::builder()
                .suffix(index_document)
                .build()
                .map_err(|e| ProviderError::api("put_bucket_website", e.to_string()))?;
            let error = ErrorDocument::builder()
                .key(error_document)
                .build()
                .map_err(|e| ProviderError::api("put_bucket_website", e.to_string()))?;
            let config = WebsiteConfiguration::builder()
                .index_document(index)
                .error_document(error)
                .build();

            self.client
                .put_bucket_website()
                .bucket(bucket)
                .website_configuration(config)
                .send()
                .await
                .map_err(|e| ProviderError::api("put_bucket_website", describe(&e)))?;
            Ok(())
        }
        .boxed()
    }

    fn enable_versioning<'a>(&'a self, bucket: &'a str) -> BoxFuture<'a, ProviderResult<()>> {
        async move {
            debug!("S3 put_bucket_versioning: bucket={}", bucket);

            let config = VersioningConfiguration::builder()
                .status(BucketVersioningStatus::Enabled)
                .build();

            self.client
                .put_bucket_versioning()
                .bucket(bucket)
                .versioning_configuration(config)
                .send()
                .await
                .map_err(|e| ProviderError::api("put_bucket_versioning", describe(&e)))?;
            Ok(())
        }
        .boxed()
    }

    fn put_bucket_policy<'a>(
        &'a self,
        bucket: &'a str,
        policy: &'a str,
    ) -> BoxFuture<'a, ProviderResult<()>> {
        async move {
            debug!("S3 put_bucket_policy: bucket={}", bucket);

            self.client
                .put_bucket_policy()
                .bucket(bucket)
                .policy(policy)
                .send()
                .await
                .map_err(|e| ProviderError::api("put_bucket_policy", describe(&e)))?;
            Ok(())
        }
        .boxed()
    }

    fn list_buckets(&self) -> BoxFuture<'_, ProviderResult<Vec<String>>> {
        async move {
            let resp = self
                .client
                .list_buckets()
                .send()
                .await
                .map_err(|e| ProviderError::api("list_buckets", describe(&e)))?;

            Ok(resp
                .buckets()
                .iter()
                .filter_map(|b| b.name().map(str::to_string))
                .collect())
        }
        .boxed()
    }

    fn head_bucket<'a>(&'a self, bucket: &'a str) -> BoxFuture<'a, ProviderResult<()>> {
        async move {
            debug!("S3 head_bucket: bucket={}", bucket);

            match self.client.head_bucket().bucket(bucket).send().await {
                Ok(_) => Ok(()),
                Err(e) => {
                    let service_err = e.into_service_error();
                    if service_err.is_not_found() {
                        Err(ProviderError::BucketNotFound(bucket.to_string()))
                    } else {
                        Err(ProviderError::api("head_bucket", describe(&service_err)))
                    }
                }
            }
        }
        .boxed()
    }

    fn put_object(&self, object: PutObject) -> BoxFuture<'_, ProviderResult<()>> {
        async move {
            debug!(
                "S3 put_object: bucket={} key={} bytes={}",
                object.bucket,
                object.key,
                object.body.len()
            );

            self.client
                .put_object()
                .bucket(&object.bucket)
                .key(&object.key)
                .body(ByteStream::from(object.body))
                .set_content_type(object.content_type)
                .cache_control(object.cache_control)
                .send()
                .await
                .map_err(|e| ProviderError::api("put_object", describe(&e)))?;
            Ok(())
        }
        .boxed()
    }
}
