//! Fetch client behavior against a mock HTTP server.

mod common;

use std::time::Duration;

use backoffice_lib::FetchClient;
use backoffice_lib::error::ErrorKind;
use backoffice_lib::fetch::RequestOptions;
use backoffice_lib::model::TableData;
use serde_json::json;
use tokio_util::sync::CancellationToken;
use wiremock::Mock;
use wiremock::MockServer;
use wiremock::ResponseTemplate;
use wiremock::matchers::body_json;
use wiremock::matchers::header;
use wiremock::matchers::method;
use wiremock::matchers::path;

use common::customers_table;
use common::fast_client;

#[tokio::test]
async fn get_returns_table_payload_as_is() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/customers/table"))
        .and(header("accept", "application/json"))
        .respond_with(ResponseTemplate::new(200).set_body_json(customers_table()))
        .expect(1)
        .mount(&server)
        .await;

    let client = fast_client(&format!("{}/api/customers", server.uri()));
    let table: TableData = client.get_as("/table", RequestOptions::new()).await.unwrap();

    assert_eq!(table.columns.len(), 3);
    assert_eq!(table.rows.len(), 2);
    assert_eq!(table.rows[0].get("name").to_display_string(), "Acme");
}

#[tokio::test]
async fn data_wrapper_is_unwrapped() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/products/table"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": {"columns": [], "rows": [{"id": 7}]},
            "success": true
        })))
        .mount(&server)
        .await;

    let client = fast_client(&format!("{}/api/products", server.uri()));
    let payload = client.get("/table", RequestOptions::new()).await.unwrap();
    assert_eq!(payload, json!({"columns": [], "rows": [{"id": 7}]}));
}

#[tokio::test]
async fn post_sends_json_body() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/customers/table"))
        .and(header("content-type", "application/json"))
        .and(body_json(json!({"name": "Acme"})))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({"id": 1, "name": "Acme"})))
        .expect(1)
        .mount(&server)
        .await;

    let client = fast_client(&format!("{}/api/customers", server.uri()));
    let created = client
        .post("/table", &json!({"name": "Acme"}), RequestOptions::new())
        .await
        .unwrap();
    assert_eq!(created["id"], 1);
}

#[tokio::test]
async fn empty_success_body_is_null() {
    let server = MockServer::start().await;
    Mock::given(method("DELETE"))
        .respond_with(ResponseTemplate::new(204))
        .mount(&server)
        .await;

    let client = fast_client(&server.uri());
    let payload = client.delete("/table/1", RequestOptions::new()).await.unwrap();
    assert!(payload.is_null());
}

#[tokio::test]
async fn persistent_failure_is_attempted_retries_plus_one_times() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(500))
        .expect(4)
        .mount(&server)
        .await;

    let client = fast_client(&server.uri());
    let error = client.get("/table", RequestOptions::new()).await.unwrap_err();

    assert_eq!(error.code, "HTTP_500");
    assert_eq!(error.message, "HTTP 500: Internal Server Error");
    assert_eq!(error.kind, ErrorKind::Http { status: 500 });
    assert_eq!(error.endpoint(), Some("/table"));
}

#[tokio::test]
async fn retry_recovers_after_transient_failures() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(503))
        .up_to_n_times(2)
        .expect(2)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"ok": true})))
        .expect(1)
        .mount(&server)
        .await;

    let client = fast_client(&server.uri());
    let payload = client.get("/health", RequestOptions::new()).await.unwrap();
    assert_eq!(payload, json!({"ok": true}));
}

#[tokio::test]
async fn disabled_retry_makes_one_attempt() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(502))
        .expect(1)
        .mount(&server)
        .await;

    let client = fast_client(&server.uri());
    let error = client
        .get("/table", RequestOptions::new().no_retry())
        .await
        .unwrap_err();
    assert_eq!(error.status_code(), Some(502));
}

#[tokio::test]
async fn server_error_body_is_used() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(400).set_body_json(json!({
            "message": "Invalid email",
            "code": "VALIDATION"
        })))
        .mount(&server)
        .await;

    let client = fast_client(&server.uri());
    let error = client
        .post("/table", &json!({"email": "nope"}), RequestOptions::new().no_retry())
        .await
        .unwrap_err();
    assert_eq!(error.message, "Invalid email");
    assert_eq!(error.code, "VALIDATION");
}

#[tokio::test]
async fn slow_response_times_out() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({}))
                .set_delay(Duration::from_millis(500)),
        )
        .expect(2)
        .mount(&server)
        .await;

    let client = fast_client(&server.uri());
    let options = RequestOptions::new()
        .timeout(Duration::from_millis(50))
        .retry_attempts(1);
    let error = client.get("/slow", options).await.unwrap_err();

    assert_eq!(error.code, "TIMEOUT");
    assert_eq!(error.message, "Request timeout");
    assert!(error.is_timeout());
}

#[tokio::test]
async fn unreachable_host_is_network_error() {
    // Bind and drop a listener to get a local port nothing listens on.
    let port = std::net::TcpListener::bind("127.0.0.1:0")
        .unwrap()
        .local_addr()
        .unwrap()
        .port();

    let client = FetchClient::builder()
        .base_url(format!("http://127.0.0.1:{}", port))
        .build();
    let error = client
        .get("/table", RequestOptions::new().no_retry())
        .await
        .unwrap_err();

    assert_eq!(error.code, "NETWORK_ERROR");
    assert_eq!(error.message, "Network error - unable to connect to server");
    assert_eq!(error.kind, ErrorKind::Network);
}

#[tokio::test]
async fn cancellation_stops_in_flight_request() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({}))
                .set_delay(Duration::from_secs(5)),
        )
        .mount(&server)
        .await;

    let client = fast_client(&server.uri());
    let token = CancellationToken::new();
    let canceller = token.clone();
    tokio::spawn(async move {
        tokio::time::sleep(Duration::from_millis(50)).await;
        canceller.cancel();
    });

    let started = std::time::Instant::now();
    let error = client
        .get("/table", RequestOptions::new().cancel_token(token))
        .await
        .unwrap_err();

    assert!(error.is_cancelled());
    assert_eq!(error.code, "CANCELLED");
    assert!(started.elapsed() < Duration::from_secs(2));
}

#[tokio::test]
async fn cancellation_during_backoff_is_not_retried() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(500))
        .expect(1)
        .mount(&server)
        .await;

    let client = FetchClient::builder()
        .base_url(server.uri())
        .build();
    let token = CancellationToken::new();
    let canceller = token.clone();
    tokio::spawn(async move {
        tokio::time::sleep(Duration::from_millis(200)).await;
        canceller.cancel();
    });

    // Default backoff waits a full second before the first retry.
    let error = client
        .get("/table", RequestOptions::new().cancel_token(token))
        .await
        .unwrap_err();
    assert!(error.is_cancelled());
}
