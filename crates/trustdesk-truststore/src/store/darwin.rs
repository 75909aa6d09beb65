//! macOS trust store: `security` keychain probe and installation elevated
//! through `osascript … with administrator privileges`.
//!
//! Installation tries `add-trusted-cert -r trustRoot` first. Some error
//! states of that call are recoverable (certificate already present, the
//! trust-settings API refusing, the elevated shell unable to read the
//! staged file); those fall back to a two-step strategy that adds the
//! certificate first and requests trust settings separately.

use futures_util::future::join_all;
use tokio::process::Command;

use crate::info::{normalized_fingerprint, CertificateInfo};
use crate::staged::StagedCert;
use crate::store::InstallResult;

const SECURITY: &str = "security";
const OSASCRIPT: &str = "osascript";

const SYSTEM_KEYCHAIN: &str = "/Library/Keychains/System.keychain";

/// Keychains consulted by the probe.
const KEYCHAINS: &[&str] = &[SYSTEM_KEYCHAIN];

pub(crate) async fn probe(info: &CertificateInfo) -> bool {
    probe_with(SECURITY, info).await
}

/// Probe through an explicit utility program (for testing).
pub(crate) async fn probe_with(security: &str, info: &CertificateInfo) -> bool {
    let Some(needle) = normalized_fingerprint(&info.fingerprint) else {
        return false;
    };

    // Every keychain is queried; the listings are joined before any match
    // is judged so a hit in a later keychain is never lost.
    let listings = join_all(
        KEYCHAINS
            .iter()
            .map(|keychain| list_keychain(security, keychain)),
    )
    .await;
    listings
        .iter()
        .flatten()
        .any(|listing| keychain_contains(listing, &needle))
}

/// `security find-certificate -a -Z` over one keychain. `None` when the
/// utility cannot run or exits non-zero.
async fn list_keychain(security: &str, keychain: &str) -> Option<String> {
    match Command::new(security)
        .args(["find-certificate", "-a", "-Z", keychain])
        .output()
        .await
    {
        Ok(output) if output.status.success() => {
            Some(String::from_utf8_lossy(&output.stdout).into_owned())
        }
        Ok(output) => {
            tracing::debug!(
                keychain,
                code = output.status.code(),
                "find-certificate exited non-zero"
            );
            None
        }
        Err(e) => {
            tracing::debug!(keychain, error = %e, "security could not be spawned");
            None
        }
    }
}

/// Match `SHA-1 hash:` lines of a `find-certificate -Z` listing against
/// the normalized fingerprint. Equality is exact per line, never substring.
pub(crate) fn keychain_contains(listing: &str, normalized_fp: &str) -> bool {
    listing
        .lines()
        .filter_map(|line| line.trim_start().strip_prefix("SHA-1 hash:"))
        .any(|value| {
            let hash: String = value
                .chars()
                .filter(|c| !c.is_whitespace())
                .collect::<String>()
                .to_ascii_lowercase();
            hash == normalized_fp
        })
}

pub(crate) async fn install(content: &str) -> InstallResult {
    install_with(OSASCRIPT, content).await
}

/// Install through an explicit elevation program (for testing).
pub(crate) async fn install_with(osascript: &str, content: &str) -> InstallResult {
    let staged = match StagedCert::write(content) {
        Ok(staged) => staged,
        Err(e) => {
            tracing::warn!(error = %e, "could not stage certificate");
            return InstallResult::failed(format!("临时证书文件创建失败: {e}"));
        }
    };

    let primary = format!(
        "security add-trusted-cert -r trustRoot -k {SYSTEM_KEYCHAIN} '{}'",
        staged.path_str()
    );
    let output = match run_elevated(osascript, &primary).await {
        Ok(output) => output,
        Err(e) => {
            tracing::warn!(error = %e, "elevation wrapper could not be spawned");
            return InstallResult::failed(format!("权限提升失败: {e}"));
        }
    };

    let stderr = String::from_utf8_lossy(&output.stderr);
    match classify_primary(output.status.code(), &stderr) {
        PrimaryOutcome::Trusted => InstallResult::ok("证书导入成功并已设置为受信任的根证书"),
        PrimaryOutcome::UserCancelled => InstallResult::failed("用户取消了权限提升请求"),
        PrimaryOutcome::AlternateStrategy => {
            tracing::info!("primary trust command rejected; switching to two-step strategy");
            install_alternate(osascript, &staged).await
        }
        PrimaryOutcome::Failed => {
            InstallResult::failed(format!("证书导入失败: {}", stderr_or_unknown(&stderr)))
        }
    }
}

/// Two-step fallback: add the certificate without trust flags, then
/// request trust settings with the reduced flag set.
async fn install_alternate(osascript: &str, staged: &StagedCert) -> InstallResult {
    let add = format!(
        "security add-cert -k {SYSTEM_KEYCHAIN} '{}'",
        staged.path_str()
    );
    let output = match run_elevated(osascript, &add).await {
        Ok(output) => output,
        Err(e) => return InstallResult::failed(format!("权限提升失败: {e}")),
    };

    let stderr = String::from_utf8_lossy(&output.stderr);
    if !add_step_succeeded(output.status.code(), &stderr) {
        return InstallResult::failed(format!("证书添加失败: {}", stderr_or_unknown(&stderr)));
    }

    set_manual_trust(osascript, staged).await
}

/// Final step of the fallback: `add-trusted-cert` without `-r trustRoot`,
/// which stores the certificate but leaves full trust to the user.
async fn set_manual_trust(osascript: &str, staged: &StagedCert) -> InstallResult {
    let trust = format!(
        "security add-trusted-cert -k {SYSTEM_KEYCHAIN} '{}'",
        staged.path_str()
    );
    let output = match run_elevated(osascript, &trust).await {
        Ok(output) => output,
        Err(e) => return InstallResult::failed(format!("设置信任失败: {e}")),
    };

    let stderr = String::from_utf8_lossy(&output.stderr);
    match classify_trust_step(output.status.code(), &stderr) {
        TrustStepOutcome::Trusted => InstallResult::ok("证书导入成功，请在系统设置中验证信任状态"),
        TrustStepOutcome::AlreadyTrusted => InstallResult::ok("证书已存在并设置为受信任状态"),
        TrustStepOutcome::Failed => InstallResult::failed(format!(
            "信任设置失败: {}，请手动在系统设置中设置证书信任",
            stderr_or_unknown(&stderr)
        )),
    }
}

/// Run one shell command through the macOS elevation prompt.
async fn run_elevated(
    osascript: &str,
    shell_command: &str,
) -> std::io::Result<std::process::Output> {
    let script = format!("do shell script \"{shell_command}\" with administrator privileges");
    Command::new(osascript).args(["-e", &script]).output().await
}

/// Terminal states of the primary `add-trusted-cert -r trustRoot` attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum PrimaryOutcome {
    Trusted,
    UserCancelled,
    AlternateStrategy,
    Failed,
}

pub(crate) fn classify_primary(code: Option<i32>, stderr: &str) -> PrimaryOutcome {
    if code == Some(0) {
        return PrimaryOutcome::Trusted;
    }
    if is_cancellation(stderr) {
        return PrimaryOutcome::UserCancelled;
    }
    if stderr.contains("already exists")
        || stderr.contains("SecTrustSettingsSetTrustSettings")
        || stderr.contains("Error reading file")
    {
        return PrimaryOutcome::AlternateStrategy;
    }
    PrimaryOutcome::Failed
}

/// The add step tolerates a certificate that is already in the keychain.
pub(crate) fn add_step_succeeded(code: Option<i32>, stderr: &str) -> bool {
    code == Some(0) || stderr.contains("already exists")
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum TrustStepOutcome {
    Trusted,
    AlreadyTrusted,
    Failed,
}

pub(crate) fn classify_trust_step(code: Option<i32>, stderr: &str) -> TrustStepOutcome {
    if code == Some(0) {
        return TrustStepOutcome::Trusted;
    }
    if stderr.contains("already trusted") || stderr.contains("already exists") {
        return TrustStepOutcome::AlreadyTrusted;
    }
    TrustStepOutcome::Failed
}

// osascript reports a declined prompt with either spelling depending on
// the macOS release.
fn is_cancellation(stderr: &str) -> bool {
    stderr.contains("User cancelled")
        || stderr.contains("User canceled")
        || stderr.contains("用户取消")
}

fn stderr_or_unknown(stderr: &str) -> String {
    let trimmed = stderr.trim();
    if trimmed.is_empty() {
        "未知错误".to_string()
    } else {
        trimmed.to_string()
    }
}
