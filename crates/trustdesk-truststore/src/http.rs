//! HTTP surface for certificate trust management, mounted by the binary
//! under `/v1/certs`.

use std::sync::Arc;

use axum::body::Bytes;
use axum::extract::Extension;
use axum::response::{IntoResponse, Json, Response};
use axum::routing::{get, post};
use axum::Router;

use trustdesk_common::error::ErrorCode;
use trustdesk_common::http::error_response;

use crate::{CertificateInfo, InstallCandidate, RefreshEntry, TrustCore};

#[derive(Debug, serde::Deserialize)]
struct CheckTrustRequest {
    // The front end also sends `content` in this body; the probe only
    // needs the parsed info.
    info: CertificateInfo,
}

#[derive(Debug, serde::Deserialize)]
struct InstallRequest {
    content: String,
}

/// Certificate routes, sharing one [`TrustCore`].
pub fn routes(core: Arc<TrustCore>) -> Router {
    Router::new()
        .route("/", get(list_handler))
        .route("/check", post(check_handler))
        .route("/install", post(install_handler))
        .route("/install-all", post(install_all_handler))
        .route("/refresh", post(refresh_handler))
        .layer(Extension(core))
}

async fn list_handler(Extension(core): Extension<Arc<TrustCore>>) -> impl IntoResponse {
    Json(core.list_certificates().await)
}

async fn check_handler(Extension(core): Extension<Arc<TrustCore>>, body: Bytes) -> Response {
    let request: CheckTrustRequest = match serde_json::from_slice(&body) {
        Ok(request) => request,
        Err(e) => return error_response(ErrorCode::InvalidPayload, e.to_string()),
    };
    let installed = core.check_trust(&request.info).await;
    Json(serde_json::json!({ "installed": installed })).into_response()
}

async fn install_handler(Extension(core): Extension<Arc<TrustCore>>, body: Bytes) -> Response {
    let request: InstallRequest = match serde_json::from_slice(&body) {
        Ok(request) => request,
        Err(e) => return error_response(ErrorCode::InvalidPayload, e.to_string()),
    };
    Json(core.install_trust(&request.content).await).into_response()
}

async fn install_all_handler(Extension(core): Extension<Arc<TrustCore>>, body: Bytes) -> Response {
    let certs: Vec<InstallCandidate> = match serde_json::from_slice(&body) {
        Ok(certs) => certs,
        Err(e) => return error_response(ErrorCode::InvalidPayload, e.to_string()),
    };
    Json(core.install_all(certs).await).into_response()
}

async fn refresh_handler(Extension(core): Extension<Arc<TrustCore>>, body: Bytes) -> Response {
    let certs: Vec<RefreshEntry> = match serde_json::from_slice(&body) {
        Ok(certs) => certs,
        Err(e) => return error_response(ErrorCode::InvalidPayload, e.to_string()),
    };
    Json(core.refresh_status(certs).await).into_response()
}
