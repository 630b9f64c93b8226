//! Files collected from a multipart upload request.

use bytes::Bytes;
use serde::{Deserialize, Serialize};

/// One uploaded file, buffered in memory until it is written to the bucket.
#[derive(Debug, Clone)]
pub struct UploadFile {
    /// Used verbatim as the object key.
    pub filename: String,
    /// MIME type declared by the client, if any.
    pub content_type: Option<String>,
    pub content: Bytes,
}

#[derive(Debug, Default)]
pub struct UploadRequest {
    pub bucket_name: Option<String>,
    /// In the order they appeared in the form.
    pub files: Vec<UploadFile>,
}

impl UploadRequest {
    /// Bucket name and files, or `None` when either is missing.
    pub fn into_parts(self) -> Option<(String, Vec<UploadFile>)> {
        let bucket = self.bucket_name.filter(|name| !name.trim().is_empty())?;
        if self.files.is_empty() {
            return None;
        }
        Some((bucket, self.files))
    }
}

#[derive(Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct UploadResponse {
    pub url: String,
}
