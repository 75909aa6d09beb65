//! ICMP-style reachability through the OS ping utility.
//!
//! DNS is resolved first: a resolution failure short-circuits to a
//! DNS-specific result without spawning anything. The platform variants
//! only differ in argument spelling and failure-output vocabulary.

mod darwin;
mod linux;
mod windows;

use std::time::Instant;

use hickory_resolver::TokioResolver;
use tokio::process::Command;

use trustdesk_common::platform::Platform;
use trustdesk_common::proc::hide_window;

use crate::protocol::ReachabilityResult;

const PING: &str = "ping";

pub(crate) async fn check(
    platform: Platform,
    resolver: Option<&TokioResolver>,
    domain: &str,
) -> ReachabilityResult {
    check_with(platform, resolver, PING, domain).await
}

/// Check through an explicit ping program (for testing).
pub(crate) async fn check_with(
    platform: Platform,
    resolver: Option<&TokioResolver>,
    ping: &str,
    domain: &str,
) -> ReachabilityResult {
    let ip = match resolve_ipv4(resolver, domain).await {
        Ok(ip) => ip,
        Err(message) => {
            tracing::debug!(domain, %message, "DNS resolution failed");
            return ReachabilityResult::failure(format!("DNS解析失败: {message}"));
        }
    };

    tracing::debug!(domain, ip = ip.as_deref().unwrap_or("-"), "pinging");
    run(platform, ping, domain, ip).await
}

/// First IPv4 address for the domain. `Ok(None)` (an empty answer) still
/// proceeds to the ping; only a resolver error short-circuits.
async fn resolve_ipv4(
    resolver: Option<&TokioResolver>,
    domain: &str,
) -> Result<Option<String>, String> {
    let resolver = resolver.ok_or_else(|| "system resolver unavailable".to_string())?;
    let lookup = resolver
        .ipv4_lookup(domain)
        .await
        .map_err(|e| e.to_string())?;
    Ok(lookup.iter().next().map(|a| a.0.to_string()))
}

async fn run(
    platform: Platform,
    ping: &str,
    domain: &str,
    ip: Option<String>,
) -> ReachabilityResult {
    let args = match platform {
        Platform::Windows => windows::args(domain),
        Platform::MacOs => darwin::args(domain),
        Platform::LinuxOther => linux::args(domain),
    };

    let started = Instant::now();
    let mut cmd = Command::new(ping);
    cmd.args(args);
    match hide_window(&mut cmd).output().await {
        Ok(output) => {
            let elapsed = started.elapsed().as_millis() as u64;
            let stdout = String::from_utf8_lossy(&output.stdout);
            if output.status.success() {
                let rtt = parse_rtt(&stdout).unwrap_or(elapsed);
                ReachabilityResult {
                    accessible: true,
                    error_message: None,
                    ip,
                    response_time_ms: Some(rtt),
                    status_code: None,
                }
            } else {
                let message = match platform {
                    Platform::Windows => windows::classify_failure(&stdout),
                    Platform::MacOs => darwin::classify_failure(&stdout),
                    Platform::LinuxOther => linux::classify_failure(&stdout),
                };
                tracing::debug!(domain, code = output.status.code(), message, "ping failed");
                ReachabilityResult {
                    ip,
                    ..ReachabilityResult::failure(message)
                }
            }
        }
        Err(e) => {
            tracing::debug!(domain, error = %e, "ping could not be spawned");
            ReachabilityResult {
                ip,
                ..ReachabilityResult::failure(format!("网络检测失败: {e}"))
            }
        }
    }
}

/// Round-trip milliseconds from ping output: `time=12.3 ms`, the
/// sub-millisecond `time<1ms`, or the localized `时间=` forms.
pub(crate) fn parse_rtt(output: &str) -> Option<u64> {
    for marker in ["time=", "时间="] {
        if let Some(at) = output.find(marker) {
            let number: String = output[at + marker.len()..]
                .chars()
                .take_while(|c| c.is_ascii_digit() || *c == '.')
                .collect();
            if let Ok(ms) = number.parse::<f64>() {
                return Some(ms.round() as u64);
            }
        }
    }
    if output.contains("time<1ms") || output.contains("时间<1ms") {
        return Some(1);
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rtt_parsing_covers_all_ping_dialects() {
        assert_eq!(
            parse_rtt("64 bytes from 203.0.113.7: icmp_seq=0 ttl=117 time=23.4 ms"),
            Some(23)
        );
        assert_eq!(parse_rtt("Reply from 203.0.113.7: bytes=32 time=5ms TTL=117"), Some(5));
        assert_eq!(parse_rtt("Reply from 203.0.113.7: bytes=32 time<1ms TTL=128"), Some(1));
        assert_eq!(parse_rtt("来自 203.0.113.7 的回复: 字节=32 时间=8ms TTL=117"), Some(8));
        assert_eq!(parse_rtt("时间<1ms"), Some(1));
        assert_eq!(parse_rtt("Request timeout for icmp_seq 0"), None);
        assert_eq!(parse_rtt("time=abc ms"), None);
    }

    #[test]
    fn rtt_rounds_to_nearest_millisecond() {
        assert_eq!(parse_rtt("time=0.5 ms"), Some(1));
        assert_eq!(parse_rtt("time=12.49 ms"), Some(12));
    }

    #[tokio::test]
    async fn missing_resolver_reports_dns_failure() {
        let result = check_with(Platform::LinuxOther, None, PING, "example.com").await;
        assert!(!result.accessible);
        assert!(result
            .error_message
            .as_deref()
            .unwrap_or_default()
            .starts_with("DNS解析失败"));
        assert!(result.ip.is_none());
        assert!(result.response_time_ms.is_none());
    }

    #[tokio::test]
    async fn spawn_failure_keeps_resolved_ip() {
        let result = run(
            Platform::LinuxOther,
            "trustdesk-no-such-ping",
            "example.com",
            Some("203.0.113.7".to_string()),
        )
        .await;
        assert!(!result.accessible);
        assert!(result
            .error_message
            .as_deref()
            .unwrap_or_default()
            .starts_with("网络检测失败"));
        assert_eq!(result.ip.as_deref(), Some("203.0.113.7"));
    }
}
