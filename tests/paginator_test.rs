// Integration tests for cursor pagination using wiremock.

use std::sync::Arc;

use pretty_assertions::assert_eq;
use serde_json::{json, Value};
use url::Url;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use zenkly::client::ZendeskClient;
use zenkly::config::Credentials;
use zenkly::error::ZenklyError;
use zenkly::paginator::{Paginator, RecordedProgress, Silent};
use zenkly::rate_limit::RateLimiter;

// ── Helpers ─────────────────────────────────────────────────────────

async fn setup() -> (MockServer, ZendeskClient) {
    let server = MockServer::start().await;
    let credentials = Credentials::new("acme", "agent@acme.com", "s3cret").unwrap();
    let base = Url::parse(&format!("{}/api/v2/", server.uri())).unwrap();
    let client =
        ZendeskClient::with_base_url(base, &credentials, Arc::new(RateLimiter::unlimited()))
            .unwrap();
    (server, client)
}

fn macros(ids: &[u64]) -> Vec<Value> {
    ids.iter()
        .map(|id| json!({"id": id, "title": format!("Macro {id}")}))
        .collect()
}

fn ids(items: &[Value]) -> Vec<u64> {
    items.iter().filter_map(|m| m["id"].as_u64()).collect()
}

/// Mounts a three-page macro listing with `count` = 5.
///
/// Page-specific mocks are mounted before the first page so they win
/// whenever the `page` parameter is present.
async fn mount_three_pages(server: &MockServer) {
    let page_url = |n: u32| format!("{}/api/v2/macros.json?page={n}", server.uri());

    Mock::given(method("GET"))
        .and(path("/api/v2/macros.json"))
        .and(query_param("page", "3"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "macros": macros(&[5]),
            "count": 5,
            "next_page": null
        })))
        .expect(1)
        .mount(server)
        .await;

    Mock::given(method("GET"))
        .and(path("/api/v2/macros.json"))
        .and(query_param("page", "2"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "macros": macros(&[3, 4]),
            "count": 5,
            "next_page": page_url(3)
        })))
        .expect(1)
        .mount(server)
        .await;

    Mock::given(method("GET"))
        .and(path("/api/v2/macros.json"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "macros": macros(&[1, 2]),
            "count": 5,
            "next_page": page_url(2)
        })))
        .expect(1)
        .mount(server)
        .await;
}

/// Mounts a two-page macro listing holding 2 + 2 items that declares `count`.
async fn mount_two_pages_declaring(server: &MockServer, count: u64) {
    Mock::given(method("GET"))
        .and(path("/api/v2/macros.json"))
        .and(query_param("page", "2"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "macros": macros(&[3, 4]),
            "count": count,
            "next_page": null
        })))
        .expect(1)
        .mount(server)
        .await;

    Mock::given(method("GET"))
        .and(path("/api/v2/macros.json"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "macros": macros(&[1, 2]),
            "count": count,
            "next_page": format!("{}/api/v2/macros.json?page=2", server.uri())
        })))
        .expect(1)
        .mount(server)
        .await;
}

// ── Tests ───────────────────────────────────────────────────────────

#[tokio::test]
async fn test_collect_all_concatenates_pages_in_order() {
    let (server, client) = setup().await;
    mount_three_pages(&server).await;

    let items = Paginator::new(&client)
        .collect_all("macros", "macros.json", &[], &Silent)
        .await
        .unwrap();

    assert_eq!(ids(&items), vec![1, 2, 3, 4, 5]);
}

#[tokio::test]
async fn test_collect_all_reports_progress_per_page() {
    let (server, client) = setup().await;
    mount_three_pages(&server).await;

    let progress = RecordedProgress::new();
    Paginator::new(&client)
        .collect_all("macros", "macros.json", &[], &progress)
        .await
        .unwrap();

    assert_eq!(progress.reports(), vec![(2, 5), (4, 5), (5, 5)]);
}

#[tokio::test]
async fn test_understated_count_does_not_truncate() {
    let (server, client) = setup().await;
    mount_two_pages_declaring(&server, 1).await;

    let progress = RecordedProgress::new();
    let items = Paginator::new(&client)
        .collect_all("macros", "macros.json", &[], &progress)
        .await
        .unwrap();

    assert_eq!(ids(&items), vec![1, 2, 3, 4]);
    assert_eq!(progress.reports(), vec![(2, 2), (4, 4)]);
}

#[tokio::test]
async fn test_overstated_count_stops_at_last_page() {
    let (server, client) = setup().await;
    mount_two_pages_declaring(&server, 10).await;

    let progress = RecordedProgress::new();
    let items = Paginator::new(&client)
        .collect_all("macros", "macros.json", &[], &progress)
        .await
        .unwrap();

    assert_eq!(items.len(), 4);
    assert_eq!(progress.reports(), vec![(2, 10), (4, 10)]);
    assert!(progress.is_finished());
}

#[tokio::test]
async fn test_single_page_without_next() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/api/v2/brands.json"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "brands": [{"id": 1}],
            "count": 1
        })))
        .expect(1)
        .mount(&server)
        .await;

    let items = Paginator::new(&client)
        .collect_all("brands", "brands.json", &[], &Silent)
        .await
        .unwrap();
    assert_eq!(items.len(), 1);
}

#[tokio::test]
async fn test_empty_collection() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/api/v2/views.json"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "views": [],
            "count": 0,
            "next_page": null
        })))
        .mount(&server)
        .await;

    let progress = RecordedProgress::new();
    let items = Paginator::new(&client)
        .collect_all("views", "views.json", &[], &progress)
        .await
        .unwrap();

    assert!(items.is_empty());
    assert_eq!(progress.reports(), vec![(0, 0)]);
}

#[tokio::test]
async fn test_filter_query_is_carried_to_next_page() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/api/v2/triggers.json"))
        .and(query_param("active", "true"))
        .and(query_param("page", "2"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "triggers": [{"id": 2}],
            "next_page": null
        })))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/api/v2/triggers.json"))
        .and(query_param("active", "true"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "triggers": [{"id": 1}],
            // The cursor drops the filter; it must be re-applied
            "next_page": format!("{}/api/v2/triggers.json?page=2", server.uri())
        })))
        .expect(1)
        .mount(&server)
        .await;

    let query = vec![("active".to_string(), "true".to_string())];
    let items = Paginator::new(&client)
        .collect_all("triggers", "triggers.json", &query, &Silent)
        .await
        .unwrap();

    assert_eq!(ids(&items), vec![1, 2]);
}

#[tokio::test]
async fn test_page_limit_is_enforced() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/api/v2/macros.json"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "macros": [{"id": 1}],
            "next_page": format!("{}/api/v2/macros.json?page=2", server.uri())
        })))
        .expect(2)
        .mount(&server)
        .await;

    let err = Paginator::new(&client)
        .with_max_pages(2)
        .collect_all("macros", "macros.json", &[], &Silent)
        .await
        .unwrap_err();

    assert!(
        matches!(err, ZenklyError::PageLimitExceeded { max_pages: 2, .. }),
        "{err:?}"
    );
}

#[tokio::test]
async fn test_failing_page_aborts_listing() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/api/v2/macros.json"))
        .and(query_param("page", "2"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/api/v2/macros.json"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "macros": [{"id": 1}],
            "next_page": format!("{}/api/v2/macros.json?page=2", server.uri())
        })))
        .mount(&server)
        .await;

    let progress = RecordedProgress::new();
    let err = Paginator::new(&client)
        .collect_all("macros", "macros.json", &[], &progress)
        .await
        .unwrap_err();
    assert!(matches!(err, ZenklyError::Transport { .. }));
    assert_eq!(progress.reports(), vec![(1, 1)]);
    assert!(progress.is_finished());
}

#[tokio::test]
async fn test_missing_collection_key_is_format_error() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/api/v2/macros.json"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"items": []})))
        .mount(&server)
        .await;

    let progress = RecordedProgress::new();
    let err = Paginator::new(&client)
        .collect_all("macros", "macros.json", &[], &progress)
        .await
        .unwrap_err();
    assert!(matches!(err, ZenklyError::ResponseFormat { .. }));
    assert!(progress.reports().is_empty());
    assert!(progress.is_finished());
}
