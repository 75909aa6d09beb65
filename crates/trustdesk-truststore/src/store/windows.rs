//! Windows trust store: `certutil` probe and UAC-elevated installation
//! through a PowerShell `Start-Process -Verb RunAs` wrapper.
//!
//! The wrapper's own exit code only reflects whether elevation ran; the
//! actual `certutil` exit code is echoed to stdout by the wrapper script
//! and parsed from there.

use tokio::process::Command;

use trustdesk_common::proc::hide_window;

use crate::info::{normalized_fingerprint, CertificateInfo};
use crate::staged::StagedCert;
use crate::store::InstallResult;

const CERTUTIL: &str = "certutil";
const POWERSHELL: &str = "powershell.exe";

/// Machine-wide root CA store.
const ROOT_STORE: &str = "Root";

pub(crate) async fn probe(info: &CertificateInfo) -> bool {
    probe_with(CERTUTIL, info).await
}

/// Probe through an explicit utility program (for testing).
pub(crate) async fn probe_with(certutil: &str, info: &CertificateInfo) -> bool {
    let Some(needle) = normalized_fingerprint(&info.fingerprint) else {
        return false;
    };

    let mut cmd = Command::new(certutil);
    cmd.args(["-store", ROOT_STORE]);
    match hide_window(&mut cmd).output().await {
        Ok(output) if output.status.success() => {
            listing_contains(&String::from_utf8_lossy(&output.stdout), &needle)
        }
        Ok(output) => {
            tracing::debug!(code = output.status.code(), "certutil exited non-zero");
            false
        }
        Err(e) => {
            tracing::debug!(error = %e, "certutil could not be spawned");
            false
        }
    }
}

/// Case- and whitespace-insensitive containment check. certutil prints
/// SHA-1 thumbprints with varying byte grouping across Windows versions.
pub(crate) fn listing_contains(listing: &str, normalized_fp: &str) -> bool {
    let haystack: String = listing
        .chars()
        .filter(|c| !c.is_whitespace())
        .collect::<String>()
        .to_lowercase();
    haystack.contains(normalized_fp)
}

pub(crate) async fn install(content: &str) -> InstallResult {
    install_with(POWERSHELL, content).await
}

/// Install through an explicit elevation wrapper program (for testing).
pub(crate) async fn install_with(powershell: &str, content: &str) -> InstallResult {
    let staged = match StagedCert::write(content) {
        Ok(staged) => staged,
        Err(e) => {
            tracing::warn!(error = %e, "could not stage certificate");
            return InstallResult::failed(format!("临时证书文件创建失败: {e}"));
        }
    };

    let script = elevation_script(&staged.path_str());
    let mut cmd = Command::new(powershell);
    cmd.args([
        "-ExecutionPolicy",
        "Bypass",
        "-NoProfile",
        "-WindowStyle",
        "Hidden",
        "-Command",
        script.as_str(),
    ]);
    match hide_window(&mut cmd).output().await {
        Ok(output) => {
            tracing::debug!(code = output.status.code(), "elevation wrapper finished");
            classify_install(
                output.status.code(),
                &String::from_utf8_lossy(&output.stdout),
                &String::from_utf8_lossy(&output.stderr),
            )
        }
        Err(e) => {
            tracing::warn!(error = %e, "elevation wrapper could not be spawned");
            InstallResult::failed(format!("权限提升失败: {e}"))
        }
    }
}

fn elevation_script(staged_path: &str) -> String {
    format!(
        "$process = Start-Process -FilePath \"certutil.exe\" -ArgumentList \"-addstore\", \"-f\", \"{ROOT_STORE}\", \"{staged_path}\" -Verb RunAs -Wait -PassThru\n\
         Write-Output \"ExitCode: $($process.ExitCode)\""
    )
}

/// Pull the echoed `ExitCode: <n>` line out of the wrapper's stdout.
pub(crate) fn parse_inner_exit_code(stdout: &str) -> Option<u32> {
    let lower = stdout.to_ascii_lowercase();
    let at = lower.find("exitcode")?;
    let rest = lower[at + "exitcode".len()..].trim_start();
    let rest = rest.strip_prefix(':')?;
    let digits: String = rest
        .trim_start()
        .chars()
        .take_while(char::is_ascii_digit)
        .collect();
    digits.parse().ok()
}

/// Map wrapper exit code, echoed certutil exit code and stderr to an
/// install outcome. The certutil code wins when present; a wrapper that
/// exits zero without echoing one still counts as success.
pub(crate) fn classify_install(
    wrapper_code: Option<i32>,
    stdout: &str,
    stderr: &str,
) -> InstallResult {
    match parse_inner_exit_code(stdout) {
        Some(0) => InstallResult::ok("证书导入成功（已自动提权）"),
        None if wrapper_code == Some(0) => InstallResult::ok("证书导入成功"),
        inner => {
            if is_cancellation(stderr) {
                InstallResult::failed("用户取消了权限提升请求")
            } else {
                let code = inner.map_or_else(|| "unknown".to_string(), |c| c.to_string());
                InstallResult::failed(format!("证书导入失败 (certutil exit code: {code})"))
            }
        }
    }
}

fn is_cancellation(stderr: &str) -> bool {
    stderr.contains("cancelled") || stderr.contains("用户取消")
}
