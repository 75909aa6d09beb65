//! Linux trust store behavior, also the fallback for unrecognized
//! platforms. Installation copies the certificate into the local CA
//! directory under `pkexec` and rebuilds the bundle.

use tokio::process::Command;

use crate::info::CertificateInfo;
use crate::staged::StagedCert;
use crate::store::InstallResult;

/// PolicyKit elevation helper.
const PKEXEC: &str = "pkexec";

/// Where Debian-family tooling picks up locally added CA certificates.
const CA_CERT_DIR: &str = "/usr/local/share/ca-certificates/";

/// Rebuilds the system CA bundle from that directory.
const UPDATE_COMMAND: &str = "update-ca-certificates";

/// The bundle-based stores are not scanned, so every certificate reports
/// as not installed here, including ones this module installed earlier.
/// Callers needing positive confirmation on Linux cannot get it from
/// this probe.
pub(crate) fn probe(info: &CertificateInfo) -> bool {
    tracing::debug!(name = %info.name, "trust probe not supported on this platform");
    false
}

pub(crate) async fn install(content: &str) -> InstallResult {
    install_with(PKEXEC, content).await
}

/// Install through an explicit elevation helper (for testing).
pub(crate) async fn install_with(pkexec: &str, content: &str) -> InstallResult {
    let staged = match StagedCert::write(content) {
        Ok(staged) => staged,
        Err(e) => {
            tracing::warn!(error = %e, "could not stage certificate");
            return InstallResult::failed(format!("临时证书文件创建失败: {e}"));
        }
    };

    let copy = Command::new(pkexec)
        .args(["cp", staged.path_str().as_str(), CA_CERT_DIR])
        .output()
        .await;

    let copied = match copy {
        Ok(output) => output.status.success(),
        Err(e) => {
            tracing::warn!(error = %e, "elevation helper could not be spawned");
            return InstallResult::failed(format!("权限提升失败: {e}"));
        }
    };
    drop(staged);

    if !copied {
        return InstallResult::failed("证书导入失败，权限提升被拒绝或系统不支持");
    }

    match Command::new(pkexec).args([UPDATE_COMMAND]).output().await {
        Ok(output) if output.status.success() => InstallResult::ok("证书导入成功（已自动提权）"),
        Ok(output) => {
            tracing::warn!(code = output.status.code(), "CA bundle rebuild failed");
            InstallResult::failed("证书导入成功但更新证书存储失败")
        }
        Err(e) => {
            tracing::warn!(error = %e, "CA bundle rebuild could not be spawned");
            InstallResult::failed("证书导入成功但更新证书存储失败")
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::info::test_info;

    #[test]
    fn probe_always_reports_not_installed() {
        assert!(!probe(&test_info(
            "00:11:22:33:44:55:66:77:88:99:AA:BB:CC:DD:EE:FF:00:11:22:33"
        )));
    }

    #[tokio::test]
    async fn install_reports_spawn_failure() {
        let result =
            install_with("trustdesk-no-such-pkexec", "-----BEGIN CERTIFICATE-----\n").await;
        assert!(!result.success);
        assert!(result
            .error
            .as_deref()
            .unwrap_or_default()
            .starts_with("权限提升失败"));
    }
}
