//! # Error Handling Integration Tests
//!
//! Failure classification against a mock backend, notification delivery on
//! the critical path, and best-effort degradation to safe defaults.

use async_trait::async_trait;
use marketplace_client::core::types::{ListParams, NewComment};
use marketplace_client::{ApiClient, ClientConfig, ErrorKind, Notification, Notifier};
use parking_lot::Mutex;
use serde_json::json;
use std::sync::Arc;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Captures notifications so tests can assert on the critical path
#[derive(Default)]
struct CaptureNotifier {
    delivered: Mutex<Vec<Notification>>,
}

#[async_trait]
impl Notifier for CaptureNotifier {
    async fn notify(&self, notification: Notification) {
        self.delivered.lock().push(notification);
    }
}

async fn client_for(server: &MockServer) -> ApiClient {
    let _ = tracing_subscriber::fmt().with_test_writer().try_init();
    let config = ClientConfig {
        base_url: format!("{}/", server.uri()),
        ..Default::default()
    };
    ApiClient::new(config).unwrap()
}

#[tokio::test]
async fn test_status_codes_map_to_error_kinds() {
    let cases = [
        (401, ErrorKind::Unauthorized),
        (403, ErrorKind::Forbidden),
        (404, ErrorKind::NotFound),
        (429, ErrorKind::RateLimited),
        (500, ErrorKind::Unknown),
    ];

    for (status, expected) in cases {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/posts/P1/comments"))
            .respond_with(ResponseTemplate::new(status))
            .mount(&server)
            .await;

        let client = client_for(&server).await;
        let err = client
            .comments()
            .list("P1", &ListParams::default())
            .await
            .unwrap_err();

        assert_eq!(err.kind(), expected, "status {}", status);
    }
}

#[tokio::test]
async fn test_rate_limit_carries_retry_after() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/posts/P1/comments"))
        .respond_with(ResponseTemplate::new(429).insert_header("retry-after", "7"))
        .mount(&server)
        .await;

    let client = client_for(&server).await;
    let err = client
        .comments()
        .list("P1", &ListParams::default())
        .await
        .unwrap_err();

    match err {
        marketplace_client::ApiError::RateLimited { retry_after_secs } => {
            assert_eq!(retry_after_secs, Some(7));
        }
        other => panic!("expected RateLimited, got {:?}", other),
    }
}

#[tokio::test]
async fn test_error_body_refines_classification_to_validation() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/posts/P1/comments"))
        .respond_with(ResponseTemplate::new(422).set_body_json(json!({
            "success": false,
            "data": null,
            "message": "content is required",
            "errors": [{ "field": "content", "message": "must not be empty" }]
        })))
        .mount(&server)
        .await;

    let client = client_for(&server).await;
    let err = client
        .comments()
        .add("P1", &NewComment::new(""))
        .await
        .unwrap_err();

    assert_eq!(err.kind(), ErrorKind::Validation);
    assert_eq!(err.user_message(), "content is required");
}

#[tokio::test]
async fn test_success_false_on_200_classifies_from_body() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/users/U1/follow"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "success": false,
            "data": null,
            "message": "profile is private"
        })))
        .mount(&server)
        .await;

    let client = client_for(&server).await;
    let err = client.follows().status("U1").await.unwrap_err();

    assert_eq!(err.kind(), ErrorKind::Validation);
}

#[tokio::test]
async fn test_unreachable_backend_is_a_network_error() {
    // Nothing listens on the discard port.
    let config = ClientConfig {
        base_url: "http://127.0.0.1:9/".to_string(),
        ..Default::default()
    };
    let client = ApiClient::new(config).unwrap();

    let err = client
        .comments()
        .list("P1", &ListParams::default())
        .await
        .unwrap_err();

    assert_eq!(err.kind(), ErrorKind::Network);
}

#[tokio::test]
async fn test_critical_failure_notifies_then_propagates() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/posts/P1/comments"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let notifier = Arc::new(CaptureNotifier::default());
    let config = ClientConfig {
        base_url: format!("{}/", server.uri()),
        ..Default::default()
    };
    let client = ApiClient::with_notifier(config, notifier.clone()).unwrap();

    let result = client.comments().add("P1", &NewComment::new("hi")).await;
    assert!(result.is_err());

    let delivered = notifier.delivered.lock();
    assert_eq!(delivered.len(), 1);
    assert_eq!(delivered[0].title, "Add comment failed");
    assert!(!delivered[0].body.is_empty());
}

#[tokio::test]
async fn test_best_effort_reads_degrade_to_defaults() {
    let server = MockServer::start().await;
    // Every endpoint fails.
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let notifier = Arc::new(CaptureNotifier::default());
    let config = ClientConfig {
        base_url: format!("{}/", server.uri()),
        ..Default::default()
    };
    let client = ApiClient::with_notifier(config, notifier.clone()).unwrap();

    let stats = client.comments().stats("P1").await;
    assert_eq!(stats.total, 0);

    let mutual = client.follows().mutual_count("U1").await;
    assert_eq!(mutual, 0);

    let trending = client.search().trending_hashtags().await;
    assert!(!trending.is_empty(), "trending falls back to the fixed list");
    assert!(trending.iter().all(|t| t.count == 0));

    // Best-effort failures are silent: no notifications delivered.
    assert!(notifier.delivered.lock().is_empty());
}
