//! HttpTransport tests against a local mock server.

use std::time::Duration;

use serde_json::json;
use wiremock::matchers::{body_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use kluis::{HttpTransport, Transport, TransportError, TransportRequest};

#[tokio::test]
async fn post_round_trips_method_headers_and_body() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/auth"))
        .and(header("x-client-id", "verteo-clinical-submissions-client-loader"))
        .and(header("content-type", "application/json"))
        .and(body_json(json!({"username": "u", "password": "p"})))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({"responseStatus": "SUCCESS", "sessionId": "abc123"}))
                .insert_header("x-vaultapi-burst", "1999"),
        )
        .mount(&server)
        .await;

    let transport = HttpTransport::new();
    let request = TransportRequest::post(format!("{}/auth", server.uri()))
        .header("X-Client-Id", "verteo-clinical-submissions-client-loader")
        .header("Content-Type", "application/json")
        .body(serde_json::to_vec(&json!({"username": "u", "password": "p"})).unwrap());

    let response = transport.send(request).await.unwrap();

    assert_eq!(response.status, 200);
    assert_eq!(response.header_value("x-vaultapi-burst"), Some("1999"));
    let body: serde_json::Value = serde_json::from_slice(&response.body).unwrap();
    assert_eq!(body["sessionId"], "abc123");
}

#[tokio::test]
async fn non_success_status_is_a_response_not_an_error() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api"))
        .respond_with(
            ResponseTemplate::new(401)
                .set_body_json(json!({"responseStatus": "FAILURE", "responseMessage": "no session"})),
        )
        .mount(&server)
        .await;

    let transport = HttpTransport::new();
    let response = transport
        .send(TransportRequest::get(format!("{}/api", server.uri())))
        .await
        .unwrap();

    assert_eq!(response.status, 401);
    assert!(!response.is_success());
}

#[tokio::test]
async fn construction_time_timeout_cuts_off_slow_responses() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/slow"))
        .respond_with(ResponseTemplate::new(200).set_delay(Duration::from_secs(5)))
        .mount(&server)
        .await;

    let transport = HttpTransport::with_timeout(Duration::from_millis(100));
    let err = transport
        .send(TransportRequest::get(format!("{}/slow", server.uri())))
        .await
        .unwrap_err();

    assert!(matches!(err, TransportError::Timeout));
}

#[tokio::test]
async fn connection_refused_is_a_transport_error() {
    // Port 9 (discard) is almost certainly closed.
    let transport = HttpTransport::new();
    let result = transport
        .send(TransportRequest::get("http://127.0.0.1:9/api"))
        .await;

    assert!(result.is_err());
}
