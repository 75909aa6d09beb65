//! HTTP client for talking to a running trustdesk daemon.
//!
//! Uses blocking `ureq`, so the client path needs no async runtime. Only
//! the unified status surface is consumed here; domain operations run
//! in-process against the cores instead of round-tripping through a daemon.

use std::time::Duration;

/// TCP connection timeout for API requests.
const CONNECT_TIMEOUT: Duration = Duration::from_secs(5);

/// Read timeout for API requests.
const READ_TIMEOUT: Duration = Duration::from_secs(10);

/// Timeout for the fast health check probe.
const HEALTH_TIMEOUT: Duration = Duration::from_millis(200);

#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    #[error("Daemon not reachable: {0}")]
    Unreachable(String),

    #[error("{error}: {message}")]
    Api { error: String, message: String },

    #[error("Invalid response: {0}")]
    Decode(String),
}

pub type Result<T> = std::result::Result<T, ClientError>;

pub struct TrustdeskClient {
    endpoint: String,
    agent: ureq::Agent,
}

impl TrustdeskClient {
    pub fn new(endpoint: &str) -> Self {
        let agent = ureq::AgentBuilder::new()
            .timeout_connect(CONNECT_TIMEOUT)
            .timeout_read(READ_TIMEOUT)
            .build();
        Self {
            endpoint: endpoint.trim_end_matches('/').to_string(),
            agent,
        }
    }

    /// Quick health check with a 200ms timeout.
    pub fn health(&self) -> Result<()> {
        let agent = ureq::AgentBuilder::new()
            .timeout_connect(HEALTH_TIMEOUT)
            .timeout_read(HEALTH_TIMEOUT)
            .build();
        let url = format!("{}/healthz", self.endpoint);
        agent.get(&url).call().map_err(map_error)?;
        Ok(())
    }

    /// Fetch unified status from `/v1/status`.
    pub fn unified_status(&self) -> Result<serde_json::Value> {
        let url = format!("{}/v1/status", self.endpoint);
        let resp = self.agent.get(&url).call().map_err(map_error)?;
        resp.into_json()
            .map_err(|e| ClientError::Decode(e.to_string()))
    }
}

fn map_error(e: ureq::Error) -> ClientError {
    match e {
        ureq::Error::Status(_status, resp) => {
            let body = resp.into_string().unwrap_or_default();
            if let Ok(json) = serde_json::from_str::<serde_json::Value>(&body) {
                let error = json
                    .get("error")
                    .and_then(|v| v.as_str())
                    .unwrap_or("unknown")
                    .to_string();
                let message = json
                    .get("message")
                    .and_then(|v| v.as_str())
                    .unwrap_or(&body)
                    .to_string();
                ClientError::Api { error, message }
            } else {
                ClientError::Api {
                    error: "http_error".into(),
                    message: body,
                }
            }
        }
        ureq::Error::Transport(t) => ClientError::Unreachable(t.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn client_new_strips_trailing_slash() {
        let client = TrustdeskClient::new("http://127.0.0.1:8787/");
        assert_eq!(client.endpoint, "http://127.0.0.1:8787");
    }

    #[test]
    fn client_new_preserves_clean_endpoint() {
        let client = TrustdeskClient::new("http://127.0.0.1:8787");
        assert_eq!(client.endpoint, "http://127.0.0.1:8787");
    }

    #[test]
    fn client_error_unreachable_display() {
        let err = ClientError::Unreachable("connection refused".into());
        assert_eq!(err.to_string(), "Daemon not reachable: connection refused");
    }

    #[test]
    fn client_error_api_display_includes_code_and_message() {
        let err = ClientError::Api {
            error: "invalid_payload".into(),
            message: "bad body".into(),
        };
        assert_eq!(err.to_string(), "invalid_payload: bad body");
    }

    #[test]
    fn health_fails_fast_without_a_daemon() {
        // Nothing speaks HTTP on port 9; refusal and silence both map to
        // transport errors within the health timeout.
        let client = TrustdeskClient::new("http://127.0.0.1:9");
        assert!(client.health().is_err());
    }
}
