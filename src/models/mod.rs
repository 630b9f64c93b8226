//! Request-scoped data models for the provisioning API.
//!
//! Nothing here is persisted; values are built from an HTTP request,
//! handed to the provisioning service and dropped when the handler returns.

pub mod bucket;
pub mod policy;
pub mod upload;
