//! Human-readable CLI output formatting.
//!
//! This is the presentation layer for verb subcommands. JSON output
//! bypasses this module entirely.

use trustdesk_netcheck::ReachabilityResult;
use trustdesk_truststore::{CertificateInfo, CertificateRecord, InstallReport, InstallResult};

/// Print a single-line summary of a certificate record.
///
/// Format: `[+|-]\tFILENAME\tCOMMON NAME\tVALID TO`
pub fn cert_line(record: &CertificateRecord) {
    let marker = if record.is_installed { '+' } else { '-' };
    println!(
        "[{marker}]\t{}\t{}\t{}",
        record.filename, record.info.common_name, record.info.valid_to
    );
}

/// Print detailed multi-line info for one certificate.
pub fn cert_detail(info: &CertificateInfo) {
    println!("{}", info.name);
    println!("  Common name: {}", info.common_name);
    println!("  Subject:     {}", info.subject);
    println!("  Issuer:      {}", info.issuer);
    println!("  Valid:       {} to {}", info.valid_from, info.valid_to);
    println!("  Serial:      {}", info.serial_number);
    println!("  Fingerprint: {}", info.fingerprint);
}

/// Print the outcome of a single installation.
pub fn install_result(result: &InstallResult) {
    if result.success {
        println!("OK: {}", result.message.as_deref().unwrap_or(""));
    } else {
        println!("FAILED: {}", result.error.as_deref().unwrap_or(""));
    }
}

/// Print one row of a bulk installation report.
pub fn install_report_line(report: &InstallReport) {
    let marker = if report.result.success { '+' } else { '-' };
    let detail = report
        .result
        .message
        .as_deref()
        .or(report.result.error.as_deref())
        .unwrap_or("");
    println!("[{marker}]\t{}\t{detail}", report.filename);
}

/// Print one entry of the configured domain list. Entries are free-form
/// JSON; bare strings print unquoted.
pub fn domain_line(entry: &serde_json::Value) {
    match entry.as_str() {
        Some(s) => println!("{s}"),
        None => println!("{entry}"),
    }
}

/// Print detailed multi-line info for a reachability result.
pub fn reachability(target: &str, result: &ReachabilityResult) {
    println!("{target}");
    let reachable = if result.accessible { "yes" } else { "no" };
    println!("  Reachable: {reachable}");
    if let Some(ip) = &result.ip {
        println!("  IP:        {ip}");
    }
    if let Some(ms) = result.response_time_ms {
        println!("  Time:      {ms}ms");
    }
    if let Some(code) = result.status_code {
        println!("  Status:    {code}");
    }
    if let Some(message) = &result.error_message {
        println!("  Error:     {message}");
    }
}

/// Render the `/v1/status` payload of a running daemon.
pub fn unified_status(json: &serde_json::Value) {
    let version = json
        .get("version")
        .and_then(|v| v.as_str())
        .unwrap_or("unknown");
    let platform = json
        .get("platform")
        .and_then(|v| v.as_str())
        .unwrap_or("unknown");
    let uptime = json.get("uptime_secs").and_then(|v| v.as_u64());

    println!("trustdesk v{version}");
    println!("  Platform:  {platform}");
    if let Some(secs) = uptime {
        println!("  Uptime:    {secs}s");
    }
    println!("  Daemon:    running");

    if let Some(caps) = json.get("capabilities").and_then(|v| v.as_array()) {
        for cap in caps {
            let name = cap.get("name").and_then(|v| v.as_str()).unwrap_or("?");
            let summary = cap.get("summary").and_then(|v| v.as_str()).unwrap_or("");
            let healthy = cap
                .get("healthy")
                .and_then(|v| v.as_bool())
                .unwrap_or(false);
            let marker = if healthy { "+" } else { "-" };
            println!("  [{marker}] {name}:  {summary}");
        }
    }
}
