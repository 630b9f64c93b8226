pub mod backoff;
pub mod provider;
pub mod provisioning_service;
pub mod s3_provider;
