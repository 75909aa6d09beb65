//! Windows ping dialect. Output arrives localized, so the failure
//! vocabulary covers the English and Chinese spellings.

/// One echo request, 5000 ms reply timeout.
pub(super) fn args(domain: &str) -> [&str; 5] {
    ["-n", "1", "-w", "5000", domain]
}

pub(super) fn classify_failure(output: &str) -> &'static str {
    if output.contains("Request timed out") || output.contains("请求超时") {
        "请求超时"
    } else if output.contains("Destination host unreachable") || output.contains("无法访问目标主机")
    {
        "无路由到达主机"
    } else if output.contains("could not find host") || output.contains("找不到主机") {
        "无法解析主机名"
    } else {
        "目标网络不可达"
    }
}
