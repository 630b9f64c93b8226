//! Bucket policy document granting anonymous read access.

use serde::Serialize;

const POLICY_VERSION: &str = "2012-10-17";

#[derive(Debug, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct BucketPolicy {
    pub version: &'static str,
    pub statement: Vec<PolicyStatement>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct PolicyStatement {
    pub effect: &'static str,
    pub principal: &'static str,
    pub action: &'static str,
    pub resource: String,
}

impl BucketPolicy {
    /// Allow anyone to `GetObject` on every key of `bucket`.
    pub fn public_read(bucket: &str) -> Self {
        Self {
            version: POLICY_VERSION,
            statement: vec![PolicyStatement {
                effect: "Allow",
                principal: "*",
                action: "s3:GetObject",
                resource: format!("arn:aws:s3:::{}/*", bucket),
            }],
        }
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }
}
