//! HTTP surface for reachability checks, mounted by the binary under
//! `/v1/net`.

use std::sync::Arc;

use axum::body::Bytes;
use axum::extract::Extension;
use axum::response::{IntoResponse, Json, Response};
use axum::routing::{get, post};
use axum::Router;

use trustdesk_common::error::ErrorCode;
use trustdesk_common::http::error_response;

use crate::NetCheckCore;

/// Reachability routes, sharing one [`NetCheckCore`].
pub fn routes(core: Arc<NetCheckCore>) -> Router {
    Router::new()
        .route("/domains", get(domains_handler))
        .route("/check", post(check_handler))
        .layer(Extension(core))
}

async fn domains_handler(Extension(core): Extension<Arc<NetCheckCore>>) -> impl IntoResponse {
    Json(core.domains().await)
}

async fn check_handler(Extension(core): Extension<Arc<NetCheckCore>>, body: Bytes) -> Response {
    // The body is any JSON value: a bare string is the legacy ping form.
    let value: serde_json::Value = match serde_json::from_slice(&body) {
        Ok(value) => value,
        Err(e) => return error_response(ErrorCode::InvalidPayload, e.to_string()),
    };
    Json(core.check_value(&value).await).into_response()
}

#[cfg(test)]
mod tests {
    use super::*;
    use trustdesk_common::platform::Platform;

    fn test_core() -> Arc<NetCheckCore> {
        Arc::new(NetCheckCore::with_platform(
            Platform::LinuxOther,
            std::env::temp_dir().join("trustdesk-net-http-missing.json"),
        ))
    }

    async fn body_json(response: Response) -> serde_json::Value {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn invalid_json_maps_to_invalid_payload() {
        let response = check_handler(Extension(test_core()), Bytes::from_static(b"{oops")).await;
        assert_eq!(response.status(), axum::http::StatusCode::BAD_REQUEST);
        assert_eq!(body_json(response).await["error"], "invalid_payload");
    }

    #[tokio::test]
    async fn valid_json_with_bad_shape_is_a_domain_result() {
        let response =
            check_handler(Extension(test_core()), Bytes::from_static(b"{\"type\":\"ftp\"}")).await;
        assert_eq!(response.status(), axum::http::StatusCode::OK);

        let value = body_json(response).await;
        assert_eq!(value["accessible"], false);
        assert_eq!(value["errorMessage"], "配置格式错误");
    }

    #[tokio::test]
    async fn missing_domains_file_serves_empty_array() {
        let response = domains_handler(Extension(test_core())).await.into_response();
        assert_eq!(response.status(), axum::http::StatusCode::OK);
        assert_eq!(body_json(response).await, serde_json::json!([]));
    }
}
