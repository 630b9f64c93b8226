//! Bucket naming and the JSON shapes of the bucket endpoints.

use serde::{Deserialize, Serialize};

/// Body of `POST /create_bucket`.
///
/// The name is optional at the type level so a missing field reaches the
/// handler and is reported as a validation error rather than a rejection.
#[derive(Debug, Default, Deserialize)]
pub struct CreateBucketReq {
    pub bucket_name: Option<String>,
}

#[derive(Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct BucketCreated {
    pub message: String,
}

#[derive(Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct BucketList {
    pub buckets: Vec<String>,
}

/// Prefix `name` with the account id so it is unique in the provider's
/// global namespace. Always prepends, whatever `name` looks like.
pub fn prefixed_bucket_name(account_id: &str, name: &str) -> String {
    format!("{}-{}", account_id, name)
}

/// Resolve a name that may already be account-prefixed.
///
/// Names that already carry the prefix are returned unchanged, so bucket
/// names from a listing can be fed back in.
pub fn namespaced_bucket_name(account_id: &str, name: &str) -> String {
    let prefix = format!("{}-", account_id);
    if name.starts_with(&prefix) {
        name.to_string()
    } else {
        prefixed_bucket_name(account_id, name)
    }
}

/// Public static-website endpoint of `bucket`.
pub fn website_url(bucket: &str, region: &str) -> String {
    format!("http://{}.s3-website.{}.amazonaws.com", bucket, region)
}
