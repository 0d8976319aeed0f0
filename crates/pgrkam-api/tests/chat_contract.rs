//! Chat endpoint contract tests
//!
//! These tests pin the HTTP shape of `POST /chat`: request body, reply parsing,
//! and how failures are classified.

use pgrkam_api::{ChatApi, ChatRequest, ErrorKind, HistoryEntry, HttpChatClient, Role};
use serde_json::json;
use std::time::Duration;
use wiremock::matchers::{body_partial_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn request(message: &str, session_id: Option<&str>) -> ChatRequest {
    ChatRequest {
        message: message.to_string(),
        language: "en".to_string(),
        session_id: session_id.map(str::to_string),
        history: vec![HistoryEntry::new(Role::Assistant, "Welcome to PGRKAM!")],
    }
}

fn reply_body() -> serde_json::Value {
    json!({
        "text": "Here are jobs...",
        "session_id": "abc123",
        "response_id": "r1",
        "original_language": "en",
        "timestamp": "2024-01-01T00:00:00Z"
    })
}

#[tokio::test]
async fn test_request_carries_message_language_and_history() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/chat"))
        .and(header("accept", "application/json"))
        .and(body_partial_json(json!({
            "message": "Show engineering jobs in Raipur",
            "language": "en",
            "history": [{"role": "assistant", "content": "Welcome to PGRKAM!"}]
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(reply_body()))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = HttpChatClient::new(mock_server.uri());
    let reply = client
        .chat(&request("Show engineering jobs in Raipur", None))
        .await
        .expect("chat should succeed");

    assert_eq!(reply.text, "Here are jobs...");
    assert_eq!(reply.session_id, "abc123");
    assert_eq!(reply.response_id, "r1");
    assert_eq!(reply.timestamp.as_deref(), Some("2024-01-01T00:00:00Z"));
}

#[tokio::test]
async fn test_request_without_session_omits_field() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/chat"))
        .respond_with(ResponseTemplate::new(200).set_body_json(reply_body()))
        .mount(&mock_server)
        .await;

    let client = HttpChatClient::new(mock_server.uri());
    client.chat(&request("hello", None)).await.unwrap();

    let received = mock_server.received_requests().await.unwrap();
    assert_eq!(received.len(), 1);
    let body: serde_json::Value = serde_json::from_slice(&received[0].body).unwrap();
    assert!(body.get("session_id").is_none(), "body: {}", body);
}

#[tokio::test]
async fn test_request_with_session_sends_it() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/chat"))
        .and(body_partial_json(json!({"session_id": "abc123"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(reply_body()))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = HttpChatClient::new(mock_server.uri());
    assert!(client.chat(&request("again", Some("abc123"))).await.is_ok());
}

#[tokio::test]
async fn test_api_prefix_is_respected() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/v1/chat"))
        .respond_with(ResponseTemplate::new(200).set_body_json(reply_body()))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = HttpChatClient::new(format!("{}/api/v1/", mock_server.uri()));
    assert!(client.chat(&request("hi", None)).await.is_ok());
}

#[tokio::test]
async fn test_error_detail_becomes_message() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/chat"))
        .respond_with(
            ResponseTemplate::new(500).set_body_json(json!({"detail": "Vector store unavailable"})),
        )
        .mount(&mock_server)
        .await;

    let client = HttpChatClient::new(mock_server.uri());
    let err = client.chat(&request("hi", None)).await.unwrap_err();

    assert_eq!(err.kind(), ErrorKind::Server);
    assert_eq!(err.user_message(), "Vector store unavailable");
}

#[tokio::test]
async fn test_error_without_detail_synthesizes_status() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/chat"))
        .respond_with(ResponseTemplate::new(503).set_body_string("upstream down"))
        .mount(&mock_server)
        .await;

    let client = HttpChatClient::new(mock_server.uri());
    let err = client.chat(&request("hi", None)).await.unwrap_err();

    assert_eq!(err.kind(), ErrorKind::Server);
    assert_eq!(err.user_message(), "Server error: 503");
}

#[tokio::test]
async fn test_malformed_success_body_is_server_error() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/chat"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>oops</html>"))
        .mount(&mock_server)
        .await;

    let client = HttpChatClient::new(mock_server.uri());
    let err = client.chat(&request("hi", None)).await.unwrap_err();

    assert_eq!(err.kind(), ErrorKind::Server);
}

#[tokio::test]
async fn test_missing_text_parses_as_empty() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/chat"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({"session_id": "s9", "response_id": "r9"})),
        )
        .mount(&mock_server)
        .await;

    let client = HttpChatClient::new(mock_server.uri());
    let reply = client.chat(&request("hi", None)).await.unwrap();
    assert!(reply.text.is_empty());
    assert_eq!(reply.session_id, "s9");
}

#[tokio::test]
async fn test_unreachable_host_is_network_error() {
    // Grab a free port, then close it so the connection is refused.
    let port = {
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        listener.local_addr().unwrap().port()
    };

    let client = HttpChatClient::new(format!("http://127.0.0.1:{}", port));
    let err = client.chat(&request("hi", None)).await.unwrap_err();

    assert_eq!(err.kind(), ErrorKind::Network);
    assert_eq!(
        err.user_message(),
        "Network connection failed. Please check your internet connection."
    );
}

#[tokio::test]
async fn test_timeout_is_network_error() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/chat"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(reply_body())
                .set_delay(Duration::from_secs(2)),
        )
        .mount(&mock_server)
        .await;

    let client =
        HttpChatClient::with_timeout(mock_server.uri(), Duration::from_millis(100)).unwrap();
    let err = client.chat(&request("hi", None)).await.unwrap_err();

    assert!(err.is_network(), "got: {:?}", err);
}
