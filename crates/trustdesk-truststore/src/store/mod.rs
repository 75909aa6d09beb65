//! Platform-keyed dispatch over the trust store backends.
//!
//! Every platform family gets a backend even when the build host differs,
//! so dispatch is a runtime decision and all branches stay compiled and
//! testable everywhere.

mod darwin;
mod linux;
mod windows;

use serde::{Deserialize, Serialize};

use trustdesk_common::platform::Platform;

use crate::info::CertificateInfo;

/// Outcome of an installation attempt, shaped for the wire: exactly one
/// of `message` (success) or `error` (failure) is present.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InstallResult {
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl InstallResult {
    pub(crate) fn ok(message: impl Into<String>) -> Self {
        Self {
            success: true,
            message: Some(message.into()),
            error: None,
        }
    }

    pub(crate) fn failed(error: impl Into<String>) -> Self {
        Self {
            success: false,
            message: None,
            error: Some(error.into()),
        }
    }
}

/// Whether the certificate is present in the platform trust store.
/// Probe failures (missing utility, non-zero exit) report `false`.
pub async fn probe_trust(platform: Platform, info: &CertificateInfo) -> bool {
    match platform {
        Platform::Windows => windows::probe(info).await,
        Platform::MacOs => darwin::probe(info).await,
        Platform::LinuxOther => linux::probe(info),
    }
}

/// Install certificate content into the platform trust store, elevating
/// through the platform's native mechanism.
pub async fn install_trust(platform: Platform, content: &str) -> InstallResult {
    match platform {
        Platform::Windows => windows::install(content).await,
        Platform::MacOs => darwin::install(content).await,
        Platform::LinuxOther => linux::install(content).await,
    }
}

/// Install through an explicit elevation program instead of the platform
/// default (for testing).
pub async fn install_trust_with(
    platform: Platform,
    program: &str,
    content: &str,
) -> InstallResult {
    match platform {
        Platform::Windows => windows::install_with(program, content).await,
        Platform::MacOs => darwin::install_with(program, content).await,
        Platform::LinuxOther => linux::install_with(program, content).await,
    }
}
