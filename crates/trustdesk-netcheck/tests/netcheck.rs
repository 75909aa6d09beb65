//! Reachability checks exercised against a local mock HTTP server.

use serde_json::json;
use wiremock::matchers::method;
use wiremock::{Mock, MockServer, ResponseTemplate};

use trustdesk_common::platform::Platform;
use trustdesk_netcheck::NetCheckCore;

fn core() -> NetCheckCore {
    NetCheckCore::with_platform(
        Platform::LinuxOther,
        std::env::temp_dir().join("trustdesk-netcheck-it.json"),
    )
}

#[tokio::test]
async fn ok_response_is_accessible_with_timing() {
    let server = MockServer::start().await;
    Mock::given(method("HEAD"))
        .respond_with(ResponseTemplate::new(200))
        .mount(&server)
        .await;

    let result = core()
        .check_value(&json!({"type": "http", "url": server.uri()}))
        .await;

    assert!(result.accessible);
    assert!(result.error_message.is_none());
    assert_eq!(result.status_code, Some(200));
    assert!(result.response_time_ms.is_some());
    assert_eq!(result.ip.as_deref(), Some("127.0.0.1"));
}

#[tokio::test]
async fn error_status_carries_http_code_message() {
    let server = MockServer::start().await;
    Mock::given(method("HEAD"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    let result = core()
        .check_value(&json!({"type": "http", "url": server.uri()}))
        .await;

    assert!(!result.accessible);
    assert_eq!(result.error_message.as_deref(), Some("HTTP 404"));
    assert_eq!(result.status_code, Some(404));
    assert!(result.response_time_ms.is_some());
}

#[tokio::test]
async fn redirects_answer_for_themselves() {
    let server = MockServer::start().await;
    Mock::given(method("HEAD"))
        .respond_with(ResponseTemplate::new(302).insert_header("Location", "http://203.0.113.9/"))
        .mount(&server)
        .await;

    let result = core()
        .check_value(&json!({"type": "http", "url": server.uri()}))
        .await;

    assert!(result.accessible);
    assert_eq!(result.status_code, Some(302));
    assert!(result.error_message.is_none());
}

#[tokio::test]
async fn refused_connection_is_classified() {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let port = listener.local_addr().unwrap().port();
    drop(listener);

    let result = core()
        .check_value(&json!({"type": "http", "url": format!("http://127.0.0.1:{port}/")}))
        .await;

    assert!(!result.accessible);
    assert_eq!(result.error_message.as_deref(), Some("连接被拒绝"));
    assert!(result.status_code.is_none());
    assert!(result.ip.is_none());
}

#[tokio::test]
async fn slow_responses_hit_the_request_timeout() {
    let server = MockServer::start().await;
    Mock::given(method("HEAD"))
        .respond_with(ResponseTemplate::new(200).set_delay(std::time::Duration::from_millis(3500)))
        .mount(&server)
        .await;

    let result = core()
        .check_value(&json!({"type": "http", "url": server.uri()}))
        .await;

    assert!(!result.accessible);
    assert_eq!(result.error_message.as_deref(), Some("请求超时"));
    assert!(result.response_time_ms.is_none());
    assert!(result.status_code.is_none());
}
