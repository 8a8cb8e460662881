//! In-process API tests with a mocked upstream tracker
//!
//! Builds the router directly and drives it with `tower::ServiceExt`;
//! the tracker side is a wiremock server.

use std::sync::Arc;
use std::time::Duration;

use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode, header};
use http_body_util::BodyExt;
use serde_json::{Value, json};
use tower::ServiceExt;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use zamunda_core::ClientConfig;
use zamunda_server::api::{AppState, create_router};

/// Router wired to the mock tracker, with near-zero backoff delays
fn router_for(upstream: &MockServer) -> Router {
    let state = Arc::new(AppState {
        client_config: ClientConfig {
            base_url: upstream.uri(),
            timeout_secs: 5,
            max_retries: 1,
            backoff_factor: 2,
            initial_delay: Duration::from_millis(1),
        },
    });
    create_router(state)
}

async fn get(router: Router, uri: &str) -> (StatusCode, Value) {
    let response = router
        .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
        .await
        .unwrap();
    into_parts(response).await
}

async fn post(router: Router, uri: &str, body: Value) -> (StatusCode, Value) {
    let request = Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap();
    let response = router.oneshot(request).await.unwrap();
    into_parts(response).await
}

async fn into_parts(response: axum::response::Response) -> (StatusCode, Value) {
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let body = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap_or(Value::Null)
    };
    (status, body)
}

async fn mount_login(server: &MockServer) {
    Mock::given(method("GET"))
        .and(path("/login.php"))
        .respond_with(ResponseTemplate::new(200))
        .mount(server)
        .await;
    Mock::given(method("POST"))
        .and(path("/takelogin.php"))
        .respond_with(ResponseTemplate::new(200))
        .mount(server)
        .await;
}

fn results_page() -> String {
    r#"<html><body>
    <table id="zbtable">
      <tr><td>Cat</td><td>Name</td><td>Size</td><td>Files</td><td>Seed</td><td>Leech</td></tr>
      <tr>
        <td>1</td>
        <td>
          <a href="/banan?id=1"><b>Served Movie</b></a>
          <div><a href="/magnetlink.php?id=1">M</a></div>
        </td>
        <td>1.2 GB</td>
        <td>2</td>
        <td>11</td>
        <td>1</td>
      </tr>
    </table>
    </body></html>"#
        .to_string()
}

#[tokio::test]
async fn health_reports_ok_and_version() {
    let upstream = MockServer::start().await;
    let (status, body) = get(router_for(&upstream), "/api/v1/health").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
    assert!(body["version"].is_string());
}

#[tokio::test]
async fn search_returns_results_as_json() {
    let upstream = MockServer::start().await;
    mount_login(&upstream).await;
    Mock::given(method("GET"))
        .and(path("/bananas"))
        .respond_with(ResponseTemplate::new(200).set_body_string(results_page()))
        .mount(&upstream)
        .await;

    let (status, body) = post(
        router_for(&upstream),
        "/api/v1/search",
        json!({"query": "served", "username": "user", "password": "pass"}),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    let results = body.as_array().expect("body should be an array");
    assert_eq!(results.len(), 1);
    assert_eq!(results[0]["name"], "Served Movie");
    assert_eq!(results[0]["seeders"], 11);
    // wire field names, not struct field names
    assert!(results[0]["magnetlink"].is_string());
    assert_eq!(results[0]["bg_audio"], false);
}

#[tokio::test]
async fn empty_credentials_map_to_bad_request() {
    let upstream = MockServer::start().await;

    let (status, body) = post(
        router_for(&upstream),
        "/api/v1/search",
        json!({"query": "anything", "username": "", "password": ""}),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].as_str().unwrap().contains("Invalid credentials"));

    let requests = upstream.received_requests().await.unwrap();
    assert!(requests.is_empty());
}

#[tokio::test]
async fn rejected_login_maps_to_bad_gateway() {
    let upstream = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/login.php"))
        .respond_with(ResponseTemplate::new(200))
        .mount(&upstream)
        .await;
    Mock::given(method("POST"))
        .and(path("/takelogin.php"))
        .respond_with(ResponseTemplate::new(403))
        .mount(&upstream)
        .await;

    let (status, body) = post(
        router_for(&upstream),
        "/api/v1/search",
        json!({"query": "x", "username": "user", "password": "wrong"}),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_GATEWAY);
    assert!(body["error"].is_string());
}

#[tokio::test]
async fn batch_search_accumulates_across_queries() {
    let upstream = MockServer::start().await;
    mount_login(&upstream).await;
    Mock::given(method("GET"))
        .and(path("/bananas"))
        .respond_with(ResponseTemplate::new(200).set_body_string(results_page()))
        .mount(&upstream)
        .await;

    let (status, body) = post(
        router_for(&upstream),
        "/api/v1/search/batch",
        json!({
            "queries": ["first", "second"],
            "username": "user",
            "password": "pass"
        }),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body.as_array().unwrap().len(), 2);
}

#[tokio::test]
async fn malformed_body_is_rejected() {
    let upstream = MockServer::start().await;

    let request = Request::builder()
        .method("POST")
        .uri("/api/v1/search")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from("{\"query\": \"no creds\"}"))
        .unwrap();
    let response = router_for(&upstream).oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
}
