//! Integration tests for web routes.

use std::time::Duration;

use axum::body::{to_bytes, Body};
use axum::http::{header, Request, StatusCode};
use axum::Router;
use telegram_channel_rss::config::Config;
use telegram_channel_rss::web::{create_app, serve, AppState};
use tower::ServiceExt;
use wiremock::matchers::{method, path, query_param, query_param_is_missing};
use wiremock::{Mock, MockServer, ResponseTemplate};

const CHANNEL_PAGE: &str = include_str!("fixtures/channel_page.html");
const EMPTY_PAGE: &str = include_str!("fixtures/empty_page.html");

/// Create a test app talking to the given mock Telegram.
fn create_test_app(server: &MockServer) -> Router {
    let config = Config {
        hosting_url: "https://rss.example.org".to_string(),
        telegram_base_url: server.uri(),
        // Fixture media lives on hosts that do not exist
        probe_timeout: Duration::from_millis(300),
        ..Config::for_testing()
    };
    create_app(AppState::new(config).expect("Failed to create app state"))
}

async fn get(app: Router, uri: &str) -> (StatusCode, Option<String>, String) {
    let response = app
        .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
        .await
        .unwrap();
    let status = response.status();
    let content_type = response
        .headers()
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .map(ToString::to_string);
    let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    (status, content_type, String::from_utf8_lossy(&body).into_owned())
}

async fn mount_channel(server: &MockServer) {
    Mock::given(method("GET"))
        .and(path("/s/test"))
        .and(query_param_is_missing("before"))
        .respond_with(ResponseTemplate::new(200).set_body_string(CHANNEL_PAGE))
        .mount(server)
        .await;
}

#[tokio::test]
async fn test_health_endpoint() {
    let server = MockServer::start().await;
    let (status, _, body) = get(create_test_app(&server), "/healthz").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, "ok");
}

#[tokio::test]
async fn test_home_page() {
    let server = MockServer::start().await;
    let (status, content_type, body) = get(create_test_app(&server), "/").await;

    assert_eq!(status, StatusCode::OK);
    assert!(content_type.unwrap().starts_with("text/html"));
    assert!(body.contains("https://rss.example.org/rss/durov"));
}

#[tokio::test]
async fn test_channel_feed() {
    let server = MockServer::start().await;
    mount_channel(&server).await;

    let (status, content_type, body) = get(create_test_app(&server), "/rss/@test").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(content_type.as_deref(), Some("application/rss+xml; charset=utf-8"));
    assert!(body.starts_with("<?xml version=\"1.0\" encoding=\"UTF-8\"?>"));
    assert!(body.contains("<title><![CDATA[Test Channel]]></title>"));
    assert!(body.contains(
        r#"<atom:link href="https://rss.example.org/rss/test" rel="self" type="application/rss+xml" />"#
    ));
    assert!(body.contains("<generator>"));

    // Posts 1, 2, 3 and 5 in ascending order; 4 is unsupported
    let guids: Vec<&str> = body
        .match_indices("<guid>")
        .map(|(i, _)| &body[i + 6..i + 6 + body[i + 6..].find('<').unwrap()])
        .collect();
    assert_eq!(
        guids,
        vec!["t.me/s/test/1", "t.me/s/test/2", "t.me/s/test/3", "t.me/s/test/5"]
    );

    assert!(body.contains("<title><![CDATA[Hello world!]]></title>"));
    assert!(body.contains("<title><![CDATA[Best language?]]></title>"));
    assert!(body.contains("<td>75%</td><td>Rust</td>"));
    assert!(body.contains(r#"cite="https://t.me/s/test/1""#));
    assert!(body.contains(r#"type="" length="0" />"#));
    assert!(body.ends_with("</channel></rss>"));
}

#[tokio::test]
async fn test_count_is_clamped_and_backfills() {
    let server = MockServer::start().await;
    mount_channel(&server).await;
    Mock::given(method("GET"))
        .and(path("/s/test"))
        .and(query_param("before", "1"))
        .respond_with(ResponseTemplate::new(200).set_body_string(EMPTY_PAGE))
        .expect(1)
        .mount(&server)
        .await;

    let (status, _, body) = get(create_test_app(&server), "/rss/test?count=500").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body.matches("<item>").count(), 4);
}

#[tokio::test]
async fn test_title_max_length_option() {
    let server = MockServer::start().await;
    mount_channel(&server).await;

    let (status, _, body) = get(create_test_app(&server), "/rss/test?titleMaxLength=8").await;

    assert_eq!(status, StatusCode::OK);
    // "Agreed. Strongly agreed." is cut after its first sentence
    assert!(body.contains("<title><![CDATA[Agreed.]]></title>"));
}

#[tokio::test]
async fn test_missing_channel_name() {
    let server = MockServer::start().await;
    let (status, content_type, body) = get(create_test_app(&server), "/rss/@").await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(content_type.as_deref(), Some("application/json"));
    let json: serde_json::Value = serde_json::from_str(&body).unwrap();
    assert_eq!(json["error"], "Channel name is required");
}

#[tokio::test]
async fn test_empty_channel_segment() {
    let server = MockServer::start().await;

    for uri in ["/rss/", "/rss"] {
        let (status, _, body) = get(create_test_app(&server), uri).await;

        assert_eq!(status, StatusCode::BAD_REQUEST, "{uri}");
        let json: serde_json::Value = serde_json::from_str(&body).unwrap();
        assert_eq!(json["error"], "Channel name is required");
    }
}

#[tokio::test]
async fn test_serve_fails_when_port_is_taken() {
    let taken = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let config = Config {
        web_port: taken.local_addr().unwrap().port(),
        ..Config::for_testing()
    };

    let result = tokio::time::timeout(Duration::from_secs(5), serve(config))
        .await
        .expect("serve returns instead of hanging");

    assert!(result.is_err());
}

#[tokio::test]
async fn test_invalid_query_is_rejected() {
    let server = MockServer::start().await;
    let (status, _, body) = get(create_test_app(&server), "/rss/test?count=lots").await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    let json: serde_json::Value = serde_json::from_str(&body).unwrap();
    assert!(json["error"].is_string());
}

#[tokio::test]
async fn test_upstream_failure_is_bad_gateway() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/s/test"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&server)
        .await;

    let (status, _, body) = get(create_test_app(&server), "/rss/test").await;

    assert_eq!(status, StatusCode::BAD_GATEWAY);
    let json: serde_json::Value = serde_json::from_str(&body).unwrap();
    assert_eq!(json["error"], "Failed to fetch channel test: HTTP 503");
}
