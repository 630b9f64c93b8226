//! Defines routes for the bucket provisioning API.
//!
//! ## Structure
//! - `GET  /`              — bundled UI page
//! - `POST /create_bucket` — create a public static-website bucket
//! - `GET  /list_buckets`  — list bucket names
//! - `POST /upload`        — multipart upload into a bucket
//! - `GET  /healthz`, `GET /readyz` — probes

use crate::{
    handlers::{
        bucket_handlers::{create_bucket, list_buckets},
        health_handlers::{healthz, readyz},
        page_handlers::homepage,
        upload_handlers::upload_files,
    },
    services::provisioning_service::ProvisioningService,
};
use axum::{
    Router,
    extract::DefaultBodyLimit,
    routing::{get, post},
};

/// Build and return the router for all endpoints.
///
/// The router carries shared state (`ProvisioningService`) to all handlers.
/// Only `/upload` gets the larger body limit.
pub fn routes(max_upload_bytes: usize) -> Router<ProvisioningService> {
    Router::new()
        // health endpoints (mounted at root)
        .route("/healthz", get(healthz))
        .route("/readyz", get(readyz))
        .route("/", get(homepage))
        .route("/create_bucket", post(create_bucket))
        .route("/list_buckets", get(list_buckets))
        .route(
            "/upload",
            post(upload_files).layer(DefaultBodyLimit::max(max_upload_bytes)),
        )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        config::ProviderConfig,
        services::{
            backoff::BackoffPolicy,
            provider::{ProviderError, mock::MockProvider},
        },
    };
    use axum::{
        Router,
        body::Body,
        http::{Request, StatusCode, header},
    };
    use http_body_util::BodyExt;
    use serde_json::{Value, json};
    use std::{sync::Arc, time::Duration};
    use tower::ServiceExt;

    const BOUNDARY: &str = "X-SITE-BUCKETS-BOUNDARY";

    fn app(mock: Arc<MockProvider>) -> Router {
        let service = ProvisioningService::new(
            mock,
            ProviderConfig {
                region: "ap-south-1".into(),
                account_id: "42".into(),
            },
            BackoffPolicy::new(10, Duration::from_millis(1)),
        );
        routes(1024 * 1024).with_state(service)
    }

    async fn body_json(body: Body) -> Value {
        let bytes = body.collect().await.unwrap().to_bytes();
        serde_json::from_slice(&bytes).unwrap()
    }

    fn json_post(uri: &str, body: &str) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    /// `(field name, optional (filename, content type), value)`
    fn multipart_request(parts: &[(&str, Option<(&str, &str)>, &str)]) -> Request<Body> {
        let mut body = String::new();
        for (name, file, value) in parts {
            body.push_str(&format!("--{BOUNDARY}\r\n"));
            match file {
                Some((filename, content_type)) => body.push_str(&format!(
                    "Content-Disposition: form-data; name=\"{name}\"; filename=\"{filename}\"\r\n\
                     Content-Type: {content_type}\r\n\r\n"
                )),
                None => body.push_str(&format!(
                    "Content-Disposition: form-data; name=\"{name}\"\r\n\r\n"
                )),
            }
            body.push_str(value);
            body.push_str("\r\n");
        }
        body.push_str(&format!("--{BOUNDARY}--\r\n"));

        Request::builder()
            .method("POST")
            .uri("/upload")
            .header(
                header::CONTENT_TYPE,
                format!("multipart/form-data; boundary={BOUNDARY}"),
            )
            .body(Body::from(body))
            .unwrap()
    }

    #[tokio::test]
    async fn homepage_serves_html() {
        let response = app(Arc::new(MockProvider::new()))
            .oneshot(Request::builder().uri("/").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let content_type = response.headers()[header::CONTENT_TYPE].to_str().unwrap();
        assert!(content_type.starts_with("text/html"));
    }

    #[tokio::test]
    async fn create_bucket_success() {
        let mock = Arc::new(MockProvider::new());
        let response = app(mock.clone())
            .oneshot(json_post("/create_bucket", r#"{"bucket_name":"blog"}"#))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            body_json(response.into_body()).await,
            json!({"message": "Bucket 42-blog created successfully with public read access!"})
        );
        assert_eq!(mock.operations().len(), 6);
    }

    #[tokio::test]
    async fn create_bucket_missing_name_is_bad_request() {
        for body in [r#"{}"#, r#"{"bucket_name":""}"#, r#"{"bucket_name":null}"#, "not json"] {
            let mock = Arc::new(MockProvider::new());
            let response = app(mock.clone())
                .oneshot(json_post("/create_bucket", body))
                .await
                .unwrap();

            assert_eq!(response.status(), StatusCode::BAD_REQUEST, "body: {body}");
            assert_eq!(
                body_json(response.into_body()).await,
                json!({"error": "Bucket name is required"})
            );
            assert!(mock.calls().is_empty());
        }
    }

    #[tokio::test]
    async fn create_bucket_provider_failure_is_server_error() {
        let mock = Arc::new(MockProvider::new().fail_on("put_bucket_policy", "MalformedPolicy"));
        let response = app(mock)
            .oneshot(json_post("/create_bucket", r#"{"bucket_name":"blog"}"#))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(
            body_json(response.into_body()).await,
            json!({"error": "MalformedPolicy"})
        );
    }

    #[tokio::test]
    async fn list_buckets_empty() {
        let response = app(Arc::new(MockProvider::new()))
            .oneshot(Request::builder().uri("/list_buckets").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(body_json(response.into_body()).await, json!({"buckets": []}));
    }

    #[tokio::test]
    async fn list_buckets_failure() {
        let mock = Arc::new(MockProvider::new().fail_on("list_buckets", "InvalidAccessKeyId"));
        let response = app(mock)
            .oneshot(Request::builder().uri("/list_buckets").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(
            body_json(response.into_body()).await,
            json!({"error": "InvalidAccessKeyId"})
        );
    }

    #[tokio::test]
    async fn upload_returns_website_url() {
        let mock = Arc::new(MockProvider::new());
        let request = multipart_request(&[
            ("files", Some(("index.html", "text/html")), "<h1>hi</h1>"),
            ("files[]", Some(("app.js", "text/javascript")), "console.log(1)"),
            ("bucket_name", None, "42-blog"),
        ]);

        let response = app(mock.clone()).oneshot(request).await.unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            body_json(response.into_body()).await,
            json!({"url": "http://42-blog.s3-website.ap-south-1.amazonaws.com"})
        );
        let uploads = mock.uploads();
        assert_eq!(uploads.len(), 2);
        assert_eq!(uploads[0].key, "index.html");
        assert_eq!(uploads[0].content_type.as_deref(), Some("text/html"));
        assert_eq!(uploads[0].body.as_ref(), b"<h1>hi</h1>");
        assert_eq!(uploads[1].key, "app.js");
    }

    #[tokio::test]
    async fn upload_without_files_is_bad_request() {
        let mock = Arc::new(MockProvider::new());
        let request = multipart_request(&[
            ("bucket_name", None, "42-blog"),
            ("files", Some(("", "application/octet-stream")), ""),
        ]);

        let response = app(mock.clone()).oneshot(request).await.unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(
            body_json(response.into_body()).await,
            json!({"error": "Files and bucket name are required"})
        );
        assert!(mock.calls().is_empty());
    }

    #[tokio::test]
    async fn upload_without_bucket_is_bad_request() {
        let request = multipart_request(&[("files", Some(("a.txt", "text/plain")), "a")]);
        let response = app(Arc::new(MockProvider::new()))
            .oneshot(request)
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn upload_with_blank_bucket_is_bad_request() {
        for bucket in ["", "  "] {
            let mock = Arc::new(MockProvider::new());
            let request = multipart_request(&[
                ("bucket_name", None, bucket),
                ("files", Some(("a.txt", "text/plain")), "a"),
            ]);

            let response = app(mock.clone()).oneshot(request).await.unwrap();

            assert_eq!(response.status(), StatusCode::BAD_REQUEST, "bucket: {bucket:?}");
            assert_eq!(
                body_json(response.into_body()).await,
                json!({"error": "Files and bucket name are required"})
            );
            assert!(mock.calls().is_empty());
        }
    }

    #[tokio::test]
    async fn upload_with_non_multipart_body_is_bad_request() {
        let response = app(Arc::new(MockProvider::new()))
            .oneshot(json_post("/upload", r#"{"bucket_name":"x"}"#))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(
            body_json(response.into_body()).await,
            json!({"error": "Files and bucket name are required"})
        );
    }

    #[tokio::test(start_paused = true)]
    async fn upload_to_missing_bucket_is_server_error() {
        let not_found = (0..10)
            .map(|_| Err(ProviderError::BucketNotFound("42-blog".into())))
            .collect();
        let mock = Arc::new(MockProvider::new().with_head_results(not_found));
        let request = multipart_request(&[
            ("bucket_name", None, "blog"),
            ("files", Some(("a.txt", "text/plain")), "a"),
        ]);

        let response = app(mock.clone()).oneshot(request).await.unwrap();

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(
            body_json(response.into_body()).await,
            json!({"error": "Bucket does not exist or is not accessible"})
        );
        assert!(mock.uploads().is_empty());
    }

    #[tokio::test]
    async fn probes_report_provider_health() {
        let ok = app(Arc::new(MockProvider::new()))
            .oneshot(Request::builder().uri("/readyz").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(ok.status(), StatusCode::OK);

        let down = app(Arc::new(MockProvider::new().fail_on("list_buckets", "timeout")))
            .oneshot(Request::builder().uri("/readyz").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(down.status(), StatusCode::SERVICE_UNAVAILABLE);
        assert_eq!(
            body_json(down.into_body()).await,
            json!({"status": "error", "error": "timeout"})
        );

        let live = app(Arc::new(MockProvider::new()))
            .oneshot(Request::builder().uri("/healthz").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(body_json(live.into_body()).await, json!({"status": "ok"}));
    }
}
