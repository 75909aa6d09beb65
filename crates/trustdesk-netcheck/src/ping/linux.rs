//! Linux ping dialect, also the fallback for unrecognized platforms.

/// One probe, 5 second wait (`-W` takes seconds here, unlike macOS).
pub(super) fn args(domain: &str) -> [&str; 5] {
    ["-c", "1", "-W", "5", domain]
}

pub(super) fn classify_failure(output: &str) -> &'static str {
    if output.contains("Host is down") {
        "目标主机已关闭"
    } else if output.contains("No route to host") {
        "无路由到达主机"
    } else if output.contains("Request timeout") || output.contains("100% packet loss") {
        "请求超时"
    } else if output.contains("cannot resolve") || output.contains("Name or service not known") {
        "无法解析主机名"
    } else {
        "目标网络不可达"
    }
}
