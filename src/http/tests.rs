//! Tests for the HTTP transport module

use super::*;
use crate::error::Error;
use crate::types::BackoffType;
use serde_json::json;
use std::time::Duration;
use wiremock::matchers::{body_json, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn client_for(server: &MockServer) -> HttpClient {
    HttpClient::for_base_url(server.uri()).unwrap()
}

#[test]
fn test_http_client_config_default() {
    let config = HttpClientConfig::default();
    assert_eq!(config.timeout, Duration::from_secs(30));
    assert_eq!(config.max_retries, 0);
    assert!(config.base_url.is_none());
    assert!(config.rate_limit.is_none());
    assert!(config.user_agent.starts_with("storefront-query/"));
}

#[test]
fn test_http_client_config_builder() {
    let config = HttpClientConfig::builder()
        .base_url("https://shop.example.com/api")
        .timeout(Duration::from_secs(5))
        .max_retries(2)
        .backoff(
            BackoffType::Linear,
            Duration::from_millis(200),
            Duration::from_secs(3),
        )
        .rate_limit(RateLimiterConfig::new(20, 5))
        .header("X-Store", "eu")
        .user_agent("test-agent/1.0")
        .build();

    assert_eq!(
        config.base_url,
        Some("https://shop.example.com/api".to_string())
    );
    assert_eq!(config.timeout, Duration::from_secs(5));
    assert_eq!(config.max_retries, 2);
    assert_eq!(config.backoff_type, BackoffType::Linear);
    assert_eq!(config.rate_limit, Some(RateLimiterConfig::new(20, 5)));
    assert_eq!(config.default_headers.get("X-Store"), Some(&"eu".to_string()));
    assert_eq!(config.user_agent, "test-agent/1.0");
}

#[tokio::test]
async fn test_get_decodes_json_body() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/user/products"))
        .and(query_param("limit", "9"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "items": [{"id": 1}],
            "nextCursor": null
        })))
        .mount(&mock_server)
        .await;

    let client = client_for(&mock_server);
    let body = client.get("user/products?limit=9").await.unwrap().unwrap();

    assert_eq!(body["items"][0]["id"], 1);
}

#[tokio::test]
async fn test_get_empty_body_is_none() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/user/products/7"))
        .respond_with(ResponseTemplate::new(200))
        .mount(&mock_server)
        .await;

    let client = client_for(&mock_server);
    assert!(client.get("user/products/7").await.unwrap().is_none());
}

#[tokio::test]
async fn test_get_null_body_is_none() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/user/posts/3"))
        .respond_with(ResponseTemplate::new(200).set_body_string("null"))
        .mount(&mock_server)
        .await;

    let client = client_for(&mock_server);
    assert!(client.get("user/posts/3").await.unwrap().is_none());
}

#[tokio::test]
async fn test_post_sends_json_body() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/user/create-checkout-session"))
        .and(body_json(json!({"products": []})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"url": "https://pay"})))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = client_for(&mock_server);
    let body = client
        .post("user/create-checkout-session", json!({"products": []}))
        .await
        .unwrap();

    assert_eq!(body, Some(json!({"url": "https://pay"})));
}

#[tokio::test]
async fn test_default_headers_are_sent() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/user/filter-type"))
        .and(header("X-Store", "eu"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
        .mount(&mock_server)
        .await;

    let config = HttpClientConfig::builder()
        .base_url(mock_server.uri())
        .header("X-Store", "eu")
        .build();

    let client = HttpClient::with_config(config).unwrap();
    assert!(client.get("user/filter-type").await.unwrap().is_some());
}

#[tokio::test]
async fn test_non_2xx_is_http_status_error() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/user/products"))
        .respond_with(ResponseTemplate::new(500).set_body_string("Server error"))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = client_for(&mock_server);
    let err = client.get("user/products").await.unwrap_err();

    match err {
        Error::HttpStatus { status, body } => {
            assert_eq!(status, 500);
            assert_eq!(body, "Server error");
        }
        other => panic!("Expected HttpStatus, got {other:?}"),
    }
}

#[tokio::test]
async fn test_no_retry_by_default() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/user/products"))
        .respond_with(ResponseTemplate::new(503))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = client_for(&mock_server);
    assert!(client.get("user/products").await.is_err());
}

#[tokio::test]
async fn test_retry_on_500_when_enabled() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/user/products"))
        .respond_with(ResponseTemplate::new(500))
        .up_to_n_times(2)
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/user/products"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"items": []})))
        .mount(&mock_server)
        .await;

    let config = HttpClientConfig::builder()
        .base_url(mock_server.uri())
        .max_retries(3)
        .backoff(
            BackoffType::Constant,
            Duration::from_millis(10),
            Duration::from_secs(1),
        )
        .build();

    let client = HttpClient::with_config(config).unwrap();
    let body = client.get("user/products").await.unwrap();

    assert_eq!(body, Some(json!({"items": []})));
}

#[tokio::test]
async fn test_post_is_never_retried() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/user/create-checkout-session"))
        .respond_with(ResponseTemplate::new(503))
        .expect(1)
        .mount(&mock_server)
        .await;

    let config = HttpClientConfig::builder()
        .base_url(mock_server.uri())
        .max_retries(3)
        .backoff(
            BackoffType::Constant,
            Duration::from_millis(10),
            Duration::from_secs(1),
        )
        .build();

    let client = HttpClient::with_config(config).unwrap();
    let err = client
        .post("user/create-checkout-session", json!({"products": []}))
        .await
        .unwrap_err();

    assert_eq!(err.status(), Some(503));
}

#[tokio::test]
async fn test_client_errors_are_not_retried() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/user/products/1"))
        .respond_with(ResponseTemplate::new(404))
        .expect(1)
        .mount(&mock_server)
        .await;

    let config = HttpClientConfig::builder()
        .base_url(mock_server.uri())
        .max_retries(3)
        .build();

    let client = HttpClient::with_config(config).unwrap();
    let err = client.get("user/products/1").await.unwrap_err();

    assert!(err.is_not_found());
}

#[tokio::test]
async fn test_rate_limited_response() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/user/products"))
        .respond_with(ResponseTemplate::new(429).insert_header("retry-after", "7"))
        .mount(&mock_server)
        .await;

    let client = client_for(&mock_server);
    let err = client.get("user/products").await.unwrap_err();

    assert!(matches!(
        err,
        Error::RateLimited {
            retry_after_seconds: 7
        }
    ));
}

#[tokio::test]
async fn test_requests_pass_through_rate_limiter() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/user/products"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"items": []})))
        .expect(3)
        .mount(&mock_server)
        .await;

    let config = HttpClientConfig::builder()
        .base_url(mock_server.uri())
        .rate_limit(RateLimiterConfig::new(100, 10))
        .build();

    let client = HttpClient::with_config(config).unwrap();
    assert!(client.has_rate_limiter());

    for _ in 0..3 {
        client.get("user/products").await.unwrap();
    }
}

#[test]
fn test_calculate_backoff() {
    let build = |kind| {
        HttpClient::with_config(
            HttpClientConfig::builder()
                .backoff(kind, Duration::from_millis(100), Duration::from_millis(500))
                .build(),
        )
        .unwrap()
    };

    let constant = build(BackoffType::Constant);
    assert_eq!(constant.calculate_backoff(3), Duration::from_millis(100));

    let linear = build(BackoffType::Linear);
    assert_eq!(linear.calculate_backoff(1), Duration::from_millis(200));

    let exponential = build(BackoffType::Exponential);
    assert_eq!(exponential.calculate_backoff(2), Duration::from_millis(400));
    assert_eq!(exponential.calculate_backoff(10), Duration::from_millis(500));
}

#[test]
fn test_http_client_debug() {
    let client = HttpClient::for_base_url("http://localhost:3000").unwrap();
    let debug_str = format!("{client:?}");
    assert!(debug_str.contains("HttpClient"));
    assert!(debug_str.contains("localhost:3000"));
}
