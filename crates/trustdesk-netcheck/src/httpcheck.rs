//! HEAD-request reachability for web services.

use std::time::{Duration, Instant};

use crate::protocol::ReachabilityResult;

/// Whole-request budget; elapsed times at or past it are not reported.
const TIMEOUT_MS: u64 = 3000;

const USER_AGENT: &str = concat!("trustdesk/", env!("CARGO_PKG_VERSION"));

/// HEAD the URL and classify the outcome. Any HTTP response counts as a
/// completed check; 200-399 is accessible, other statuses carry an
/// `HTTP <code>` message. Redirects are not followed, so a 3xx answers
/// for itself.
pub(crate) async fn check(url: &str) -> ReachabilityResult {
    // Reject malformed URLs before any network traffic.
    if let Err(e) = reqwest::Url::parse(url) {
        return ReachabilityResult::failure(format!("URL格式错误: {e}"));
    }

    let client = match reqwest::Client::builder()
        .timeout(Duration::from_millis(TIMEOUT_MS))
        .user_agent(USER_AGENT)
        .redirect(reqwest::redirect::Policy::none())
        .build()
    {
        Ok(client) => client,
        Err(e) => {
            tracing::warn!(error = %e, "HTTP client construction failed");
            return ReachabilityResult::failure("连接失败");
        }
    };

    let started = Instant::now();
    match client.head(url).send().await {
        Ok(response) => {
            let elapsed = started.elapsed().as_millis() as u64;
            let status = response.status().as_u16();
            let accessible = (200..400).contains(&status);
            tracing::debug!(url, status, elapsed, "HEAD completed");
            ReachabilityResult {
                accessible,
                error_message: (!accessible).then(|| format!("HTTP {status}")),
                ip: response.remote_addr().map(|addr| addr.ip().to_string()),
                response_time_ms: Some(elapsed),
                status_code: Some(status),
            }
        }
        Err(e) => {
            let elapsed = started.elapsed().as_millis() as u64;
            tracing::debug!(url, error = %e, "HEAD failed");
            if e.is_timeout() {
                return ReachabilityResult::failure("请求超时");
            }
            ReachabilityResult {
                response_time_ms: (elapsed < TIMEOUT_MS).then_some(elapsed),
                ..ReachabilityResult::failure(classify_transport_error(&e))
            }
        }
    }
}

/// Map a transport failure onto a user-facing message by walking the
/// error chain for the underlying io error kind or a DNS marker. Falls
/// back to the deepest source message.
pub(crate) fn classify_transport_error(error: &(dyn std::error::Error + 'static)) -> String {
    let mut dns = false;
    let mut deepest = String::new();
    let mut source: Option<&(dyn std::error::Error + 'static)> = Some(error);
    while let Some(err) = source {
        if let Some(io) = err.downcast_ref::<std::io::Error>() {
            match io.kind() {
                std::io::ErrorKind::ConnectionRefused => return "连接被拒绝".to_string(),
                std::io::ErrorKind::ConnectionReset => return "连接被重置".to_string(),
                std::io::ErrorKind::TimedOut => return "连接超时".to_string(),
                _ => {}
            }
        }
        deepest = err.to_string();
        if deepest.contains("lookup address") || deepest.contains("dns error") {
            dns = true;
        }
        source = err.source();
    }
    if dns {
        return "DNS解析失败".to_string();
    }
    if deepest.is_empty() {
        "连接失败".to_string()
    } else {
        deepest
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug)]
    struct Chained {
        message: &'static str,
        inner: Option<std::io::Error>,
    }

    impl std::fmt::Display for Chained {
        fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
            write!(f, "{}", self.message)
        }
    }

    impl std::error::Error for Chained {
        fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
            self.inner
                .as_ref()
                .map(|e| e as &(dyn std::error::Error + 'static))
        }
    }

    fn chained(kind: std::io::ErrorKind) -> Chained {
        Chained {
            message: "error sending request",
            inner: Some(std::io::Error::new(kind, "io layer")),
        }
    }

    #[test]
    fn io_kinds_map_to_distinct_messages() {
        assert_eq!(
            classify_transport_error(&chained(std::io::ErrorKind::ConnectionRefused)),
            "连接被拒绝"
        );
        assert_eq!(
            classify_transport_error(&chained(std::io::ErrorKind::ConnectionReset)),
            "连接被重置"
        );
        assert_eq!(
            classify_transport_error(&chained(std::io::ErrorKind::TimedOut)),
            "连接超时"
        );
    }

    #[test]
    fn dns_marker_wins_over_message_passthrough() {
        let error = Chained {
            message: "client error",
            inner: Some(std::io::Error::other(
                "failed to lookup address information: Name or service not known",
            )),
        };
        assert_eq!(classify_transport_error(&error), "DNS解析失败");
    }

    #[test]
    fn unrecognized_errors_pass_their_deepest_message_through() {
        let error = Chained {
            message: "tls handshake failed",
            inner: None,
        };
        assert_eq!(classify_transport_error(&error), "tls handshake failed");
    }

    #[tokio::test]
    async fn malformed_url_fails_without_network() {
        let result = check("not a url").await;
        assert!(!result.accessible);
        assert!(result
            .error_message
            .as_deref()
            .unwrap_or_default()
            .starts_with("URL格式错误"));
        assert!(result.status_code.is_none());
    }
}
