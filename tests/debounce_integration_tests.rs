//! # Debounce Integration Tests
//!
//! Typeahead suggestion behavior through a real client: burst collapse to
//! one network call, empty resolution for short queries, and best-effort
//! degradation when the suggestion endpoint fails.

use marketplace_client::core::config::DebounceConfig;
use marketplace_client::{ApiClient, ClientConfig};
use serde_json::json;
use std::time::Duration;
use tokio::time::sleep;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn fast_debounce_config(server: &MockServer) -> ClientConfig {
    let mut config = ClientConfig {
        base_url: format!("{}/", server.uri()),
        ..Default::default()
    };
    config.debounce = DebounceConfig {
        quiet_period: Duration::from_millis(80),
        min_query_len: 2,
    };
    config
}

#[tokio::test]
async fn test_suggestion_burst_issues_one_network_call() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/search/suggestions"))
        .and(query_param("q", "abc"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "success": true,
            "data": [
                { "text": "abc consulting", "kind": "company" },
                { "text": "abc tenders", "kind": "tender" }
            ]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let client = ApiClient::new(fast_debounce_config(&server)).unwrap();
    let search = client.search();

    let mut handles = Vec::new();
    for (delay_ms, query) in [(0u64, "a"), (20, "ab"), (40, "abc")] {
        let search = search.clone();
        handles.push(tokio::spawn(async move {
            sleep(Duration::from_millis(delay_ms)).await;
            (query, search.suggestions(query).await)
        }));
    }

    for result in futures::future::join_all(handles).await {
        let (query, suggestions) = result.unwrap();
        match query {
            // Displaced and short calls resolve empty, never with "abc"'s data.
            "a" | "ab" => assert!(suggestions.is_empty(), "query {:?}", query),
            _ => {
                assert_eq!(suggestions.len(), 2);
                assert_eq!(suggestions[0].text, "abc consulting");
            }
        }
    }

    let requests = server.received_requests().await.unwrap();
    assert_eq!(requests.len(), 1, "burst must collapse to one fetch");
}

#[tokio::test]
async fn test_short_query_never_touches_the_network() {
    let server = MockServer::start().await;

    let client = ApiClient::new(fast_debounce_config(&server)).unwrap();
    let suggestions = client.search().suggestions("a").await;

    assert!(suggestions.is_empty());
    assert!(server.received_requests().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_failing_suggestions_resolve_empty() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/search/suggestions"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let client = ApiClient::new(fast_debounce_config(&server)).unwrap();
    let suggestions = client.search().suggestions("rust jobs").await;

    assert!(suggestions.is_empty(), "failure degrades to empty, not an error");
}

#[tokio::test]
async fn test_separate_search_boxes_do_not_displace_each_other() {
    let server = MockServer::start().await;
    for q in ["alpha", "beta"] {
        Mock::given(method("GET"))
            .and(path("/search/suggestions"))
            .and(query_param("q", q))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "success": true,
                "data": [{ "text": q, "kind": null }]
            })))
            .expect(1)
            .mount(&server)
            .await;
    }

    let client = ApiClient::new(fast_debounce_config(&server)).unwrap();

    // Two handles: two independent debounce channels.
    let box_one = client.search();
    let box_two = client.search();

    let (first, second) = tokio::join!(
        box_one.suggestions("alpha"),
        box_two.suggestions("beta"),
    );

    assert_eq!(first.len(), 1);
    assert_eq!(second.len(), 1);
}
