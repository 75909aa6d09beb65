//! macOS ping dialect.

/// One probe, 5000 ms wait (`-W` takes milliseconds here).
pub(super) fn args(domain: &str) -> [&str; 5] {
    ["-c", "1", "-W", "5000", domain]
}

pub(super) fn classify_failure(output: &str) -> &'static str {
    if output.contains("Host is down") || output.contains("host down") {
        "目标主机已关闭"
    } else if output.contains("No route to host") {
        "无路由到达主机"
    } else if output.contains("Request timeout") || output.contains("100.0% packet loss") {
        "请求超时"
    } else if output.contains("cannot resolve") {
        "无法解析主机名"
    } else {
        "目标网络不可达"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classifies_known_failure_output() {
        assert_eq!(
            classify_failure("ping: sendto: Host is down"),
            "目标主机已关闭"
        );
        assert_eq!(
            classify_failure("ping: sendto: No route to host"),
            "无路由到达主机"
        );
        assert_eq!(
            classify_failure("Request timeout for icmp_seq 0"),
            "请求超时"
        );
        assert_eq!(
            classify_failure("1 packets transmitted, 0 packets received, 100.0% packet loss"),
            "请求超时"
        );
        assert_eq!(
            classify_failure("ping: cannot resolve nope.invalid: Unknown host"),
            "无法解析主机名"
        );
        assert_eq!(classify_failure("something else"), "目标网络不可达");
    }
}
