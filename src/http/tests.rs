//! Tests for the HTTP transport module

use super::*;
use crate::error::Error;
use crate::types::Method;
use pretty_assertions::assert_eq;
use serde_json::json;
use std::time::Duration;
use test_case::test_case;
use url::Url;
use wiremock::matchers::{header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn api_root(server: &MockServer) -> Url {
    Url::parse(&format!("{}/{API_BASE}", server.uri())).unwrap()
}

fn fast_config(attempts: u32) -> HttpClientConfig {
    HttpClientConfig::builder()
        .max_attempts(attempts)
        .retry_delay(Duration::from_millis(5))
        .build()
}

fn fast_transport(server: &MockServer, attempts: u32) -> HttpTransport {
    let client = HttpClient::with_config(fast_config(attempts)).unwrap();
    HttpTransport::from_parts(client, api_root(server))
}

// ============================================================================
// Config Tests
// ============================================================================

#[test]
fn test_http_client_config_default() {
    let config = HttpClientConfig::default();
    assert_eq!(config.timeout, Duration::from_secs(30));
    assert_eq!(config.max_attempts, 5);
    assert_eq!(config.retry_delay, Duration::from_millis(500));
    assert!(config.basic_auth.is_none());
}

#[test]
fn test_http_client_config_builder() {
    let config = HttpClientConfig::builder()
        .timeout(Duration::from_secs(60))
        .max_attempts(3)
        .retry_delay(Duration::from_millis(200))
        .basic_auth("admin", Some("pass".to_string()))
        .header("X-Custom", "value")
        .user_agent("test-agent/1.0")
        .build();

    assert_eq!(config.timeout, Duration::from_secs(60));
    assert_eq!(config.max_attempts, 3);
    assert_eq!(config.retry_delay, Duration::from_millis(200));
    assert_eq!(config.basic_auth.as_ref().unwrap().user, "admin");
    assert_eq!(
        config.default_headers.get("X-Custom"),
        Some(&"value".to_string())
    );
    assert_eq!(config.user_agent, "test-agent/1.0");
}

#[test]
fn test_default_retry_policy_is_fixed_delay() {
    let config = crate::config::StashConfig::new(crate::config::ConnectionConfig::new("stash.local"))
        .http_client_config();
    assert_eq!(config.max_attempts, 5);
    assert_eq!(config.retry_delay, Duration::from_millis(500));

    let client = HttpClient::with_config(config).unwrap();
    assert_eq!(client.config().retry_delay, Duration::from_millis(500));
}

// ============================================================================
// Endpoint Tests
// ============================================================================

#[test_case(
    Endpoint::new("projects"),
    "http://stash.local:7990/rest/api/1.0/projects" ;
    "plain collection"
)]
#[test_case(
    Endpoint::new("../../build-status/1.0/commits/abc123"),
    "http://stash.local:7990/rest/build-status/1.0/commits/abc123" ;
    "build status escapes the api namespace"
)]
#[test_case(
    Endpoint::new("projects/PRJ/repos/app/commits").query("until", "feature/login"),
    "http://stash.local:7990/rest/api/1.0/projects/PRJ/repos/app/commits?until=feature%2Flogin" ;
    "query value is encoded"
)]
#[test_case(
    Endpoint::new("projects/PRJ/repos/app/browse")
        .segments(["docs", "read me.md"])
        .flag("raw")
        .query("at", "master"),
    "http://stash.local:7990/rest/api/1.0/projects/PRJ/repos/app/browse/docs/read%20me.md?raw&at=master" ;
    "file path segments and bare flag"
)]
fn test_endpoint_resolve(endpoint: Endpoint, expected: &str) {
    let base = Url::parse("http://stash.local:7990/rest/api/1.0/").unwrap();
    assert_eq!(endpoint.resolve(&base, &[]).unwrap().as_str(), expected);
}

#[test]
fn test_endpoint_resolve_appends_page_params_after_own_query() {
    let base = Url::parse("http://stash.local/rest/api/1.0/").unwrap();
    let endpoint = Endpoint::new("projects/PRJ/repos/app/commits").query("until", "main");
    let url = endpoint
        .resolve(&base, &[("start".to_string(), "25".to_string())])
        .unwrap();
    assert_eq!(url.query(), Some("until=main&start=25"));
}

#[test]
fn test_endpoint_display() {
    let endpoint = Endpoint::new("projects/PRJ/repos/app/browse")
        .segments(["src", "main.rs"])
        .flag("raw")
        .query("at", "dev");
    assert_eq!(
        endpoint.to_string(),
        "projects/PRJ/repos/app/browse/src/main.rs?raw&at=dev"
    );
    assert_eq!(endpoint.path(), "projects/PRJ/repos/app/browse");
}

// ============================================================================
// HttpClient Tests
// ============================================================================

#[tokio::test]
async fn test_http_client_retries_then_succeeds() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/rest/api/1.0/projects"))
        .respond_with(ResponseTemplate::new(503))
        .up_to_n_times(2)
        .expect(2)
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/rest/api/1.0/projects"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"values": []})))
        .expect(1)
        .mount(&mock_server)
        .await;

    let transport = fast_transport(&mock_server, 5);
    let body = transport
        .perform(&PageRequest::new(Method::GET, Endpoint::new("projects")))
        .await
        .unwrap();

    assert_eq!(body, json!({"values": []}));
}

#[tokio::test]
async fn test_http_client_gives_up_after_max_attempts() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/rest/api/1.0/projects"))
        .respond_with(ResponseTemplate::new(500).set_body_string("boom"))
        .expect(5)
        .mount(&mock_server)
        .await;

    let transport = fast_transport(&mock_server, 5);
    let err = transport
        .perform(&PageRequest::new(Method::GET, Endpoint::new("projects")))
        .await
        .unwrap_err();

    match err {
        Error::HttpStatus { status, body } => {
            assert_eq!(status, 500);
            assert_eq!(body, "boom");
        }
        other => panic!("Expected HttpStatus, got {other:?}"),
    }
}

#[tokio::test]
async fn test_http_client_does_not_retry_client_errors() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/rest/api/1.0/projects/NOPE/repos"))
        .respond_with(ResponseTemplate::new(404).set_body_string("no such project"))
        .expect(1)
        .mount(&mock_server)
        .await;

    let transport = fast_transport(&mock_server, 5);
    let err = transport
        .perform(&PageRequest::new(
            Method::GET,
            Endpoint::new("projects/NOPE/repos"),
        ))
        .await
        .unwrap_err();

    assert!(matches!(err, Error::HttpStatus { status: 404, .. }));
}

#[tokio::test]
async fn test_http_client_connection_refused() {
    let client = HttpClient::with_config(fast_config(2)).unwrap();
    let transport =
        HttpTransport::from_parts(client, Url::parse("http://127.0.0.1:1/rest/api/1.0/").unwrap());

    let err = transport
        .perform(&PageRequest::new(Method::GET, Endpoint::new("projects")))
        .await
        .unwrap_err();

    assert!(matches!(err, Error::Http(_)));
    assert!(err.is_retryable());
}

#[tokio::test]
async fn test_http_client_sends_basic_auth() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/rest/api/1.0/projects"))
        .and(header("Authorization", "Basic YWRtaW46cGFzcw=="))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"values": []})))
        .expect(1)
        .mount(&mock_server)
        .await;

    let config = HttpClientConfig::builder()
        .basic_auth("admin", Some("pass".to_string()))
        .build();
    let client = HttpClient::with_config(config).unwrap();
    let transport = HttpTransport::from_parts(client, api_root(&mock_server));

    transport
        .perform(&PageRequest::new(Method::GET, Endpoint::new("projects")))
        .await
        .unwrap();
}

#[tokio::test]
async fn test_http_transport_passes_page_params() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/rest/api/1.0/projects"))
        .and(query_param("start", "50"))
        .and(query_param("limit", "25"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"values": [1]})))
        .expect(1)
        .mount(&mock_server)
        .await;

    let transport = fast_transport(&mock_server, 1);
    let request = PageRequest::new(Method::GET, Endpoint::new("projects")).with_page_params(vec![
        ("start".to_string(), "50".to_string()),
        ("limit".to_string(), "25".to_string()),
    ]);

    let body = transport.perform(&request).await.unwrap();
    assert_eq!(body["values"][0], 1);
}

#[tokio::test]
async fn test_http_transport_raw_body_is_string() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/rest/api/1.0/projects/PRJ/repos/app/browse/README.md"))
        .and(query_param("at", "master"))
        .respond_with(ResponseTemplate::new(200).set_body_string("# App\n"))
        .mount(&mock_server)
        .await;

    let transport = fast_transport(&mock_server, 1);
    let endpoint = Endpoint::new("projects/PRJ/repos/app/browse")
        .segments(["README.md"])
        .flag("raw")
        .query("at", "master");

    let body = transport
        .perform(&PageRequest::new(Method::GET, endpoint))
        .await
        .unwrap();
    assert_eq!(body, json!("# App\n"));
}

#[tokio::test]
async fn test_http_transport_rejects_write_methods() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&mock_server)
        .await;

    let transport = fast_transport(&mock_server, 1);
    let err = transport
        .perform(&PageRequest::new(Method::POST, Endpoint::new("projects")))
        .await
        .unwrap_err();

    assert!(matches!(err, Error::UnsupportedMethod { ref method } if method == "POST"));
}
