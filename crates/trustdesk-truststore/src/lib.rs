//! OS trust store management for locally issued certificates.
//!
//! One platform-independent facade over three backends: probe whether a
//! certificate is already trusted and install it through the platform's
//! privilege-escalation mechanism when it is not. Listings come from a
//! certificate directory on disk; trust state is re-derived from the OS
//! on every query rather than cached.

pub mod http;

mod info;
mod staged;
mod store;

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use trustdesk_common::api::{Capability, CapabilityStatus};
use trustdesk_common::platform::Platform;

pub use info::{display_name, extract_info, CertificateInfo, CERT_EXTENSIONS};
pub use store::{install_trust, install_trust_with, probe_trust, InstallResult};

/// One certificate file as the front end sees it: source content plus
/// parsed info and current trust state.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CertificateRecord {
    pub filename: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
    pub content: String,
    pub info: CertificateInfo,
    pub is_installed: bool,
    #[serde(default)]
    pub installing: bool,
}

/// Input row for bulk installation: just the fields the operation
/// consumes. Full certificate records deserialize into this cleanly.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InstallCandidate {
    pub filename: String,
    pub content: String,
    #[serde(default)]
    pub is_installed: bool,
}

/// Input row for a trust-state refresh.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RefreshEntry {
    pub filename: String,
    pub content: String,
    pub info: CertificateInfo,
}

/// Per-file outcome of a bulk installation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InstallReport {
    pub filename: String,
    #[serde(flatten)]
    pub result: InstallResult,
}

/// Core trust facade consumed by the HTTP adapter and the CLI.
pub struct TrustCore {
    platform: Platform,
    cert_dir: PathBuf,
}

impl TrustCore {
    /// Facade for the running host, scanning `cert_dir`.
    pub fn new(cert_dir: impl Into<PathBuf>) -> Self {
        Self::with_platform(Platform::current(), cert_dir)
    }

    /// Facade pinned to a platform family (for testing).
    pub fn with_platform(platform: Platform, cert_dir: impl Into<PathBuf>) -> Self {
        Self {
            platform,
            cert_dir: cert_dir.into(),
        }
    }

    pub fn platform(&self) -> Platform {
        self.platform
    }

    pub fn cert_dir(&self) -> &Path {
        &self.cert_dir
    }

    /// Scan the certificate directory and probe trust for every
    /// certificate file found, sorted by filename. An unreadable
    /// directory yields an empty listing rather than an error.
    pub async fn list_certificates(&self) -> Vec<CertificateRecord> {
        let mut entries = match tokio::fs::read_dir(&self.cert_dir).await {
            Ok(entries) => entries,
            Err(e) => {
                tracing::warn!(dir = %self.cert_dir.display(), error = %e, "certificate directory not readable");
                return Vec::new();
            }
        };

        let mut records = Vec::new();
        loop {
            let entry = match entries.next_entry().await {
                Ok(Some(entry)) => entry,
                Ok(None) => break,
                Err(e) => {
                    tracing::warn!(dir = %self.cert_dir.display(), error = %e, "directory scan aborted");
                    break;
                }
            };

            let path = entry.path();
            if !is_certificate_file(&path) {
                continue;
            }
            let filename = entry.file_name().to_string_lossy().into_owned();
            let content = match tokio::fs::read_to_string(&path).await {
                Ok(content) => content,
                Err(e) => {
                    tracing::warn!(file = %path.display(), error = %e, "certificate file not readable");
                    continue;
                }
            };

            let info = extract_info(&content, &filename);
            let is_installed = store::probe_trust(self.platform, &info).await;
            records.push(CertificateRecord {
                filename,
                path: Some(path.to_string_lossy().into_owned()),
                content,
                info,
                is_installed,
                installing: false,
            });
        }

        records.sort_by(|a, b| a.filename.cmp(&b.filename));
        records
    }

    /// Probe the OS trust store for one certificate.
    pub async fn check_trust(&self, info: &CertificateInfo) -> bool {
        store::probe_trust(self.platform, info).await
    }

    /// Install certificate content into the OS trust store.
    pub async fn install_trust(&self, content: &str) -> InstallResult {
        store::install_trust(self.platform, content).await
    }

    /// Install every candidate not already marked trusted, sequentially
    /// so elevation prompts never stack. Each row gets its own result;
    /// one failure does not stop the rest.
    pub async fn install_all(&self, certs: Vec<InstallCandidate>) -> Vec<InstallReport> {
        let mut reports = Vec::new();
        for cert in certs {
            if cert.is_installed {
                tracing::debug!(filename = %cert.filename, "already trusted, skipping");
                continue;
            }
            tracing::info!(filename = %cert.filename, "installing certificate");
            let result = store::install_trust(self.platform, &cert.content).await;
            reports.push(InstallReport {
                filename: cert.filename,
                result,
            });
        }
        reports
    }

    /// Re-probe a batch of certificates, preserving order and length.
    /// A failed probe marks its row not installed; it never aborts the
    /// batch.
    pub async fn refresh_status(&self, certs: Vec<RefreshEntry>) -> Vec<CertificateRecord> {
        let mut records = Vec::with_capacity(certs.len());
        for cert in certs {
            let is_installed = store::probe_trust(self.platform, &cert.info).await;
            tracing::debug!(filename = %cert.filename, is_installed, "trust state refreshed");
            records.push(CertificateRecord {
                filename: cert.filename,
                path: None,
                content: cert.content,
                info: cert.info,
                is_installed,
                installing: false,
            });
        }
        records
    }
}

impl Capability for TrustCore {
    fn name(&self) -> &str {
        "certs"
    }

    fn status(&self) -> CapabilityStatus {
        let count = std::fs::read_dir(&self.cert_dir).map(|entries| {
            entries
                .flatten()
                .filter(|e| is_certificate_file(&e.path()))
                .count()
        });
        match count {
            Ok(n) => CapabilityStatus {
                name: self.name().to_string(),
                summary: format!("{n} certificate files in {}", self.cert_dir.display()),
                healthy: true,
            },
            Err(_) => CapabilityStatus {
                name: self.name().to_string(),
                summary: format!("certificate directory unavailable: {}", self.cert_dir.display()),
                healthy: false,
            },
        }
    }
}

fn is_certificate_file(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| {
            CERT_EXTENSIONS
                .iter()
                .any(|known| ext.eq_ignore_ascii_case(known))
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::info::{test_info, test_pem};

    fn temp_cert_dir(tag: &str) -> PathBuf {
        let nanos = std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .unwrap()
            .as_nanos();
        let dir = std::env::temp_dir().join(format!("trustdesk-certs-{tag}-{nanos}"));
        std::fs::create_dir_all(&dir).unwrap();
        dir
    }

    #[tokio::test]
    async fn lists_certificate_files_sorted_with_parsed_info() {
        let dir = temp_cert_dir("list");
        std::fs::write(dir.join("beta.crt"), "not a certificate").unwrap();
        std::fs::write(dir.join("alpha.pem"), test_pem()).unwrap();
        std::fs::write(dir.join("notes.txt"), "ignored").unwrap();

        let core = TrustCore::with_platform(Platform::LinuxOther, &dir);
        let records = core.list_certificates().await;

        assert_eq!(records.len(), 2);
        assert_eq!(records[0].filename, "alpha.pem");
        assert_eq!(records[1].filename, "beta.crt");
        assert_eq!(records[0].info.common_name, "Trustdesk Test Root");
        assert_eq!(records[1].info.subject, "Certificate parsing failed");
        assert!(records.iter().all(|r| !r.is_installed && !r.installing));
        assert!(records[0]
            .path
            .as_deref()
            .unwrap_or_default()
            .ends_with("alpha.pem"));

        std::fs::remove_dir_all(&dir).unwrap();
    }

    #[tokio::test]
    async fn missing_directory_lists_empty() {
        let core = TrustCore::with_platform(
            Platform::LinuxOther,
            std::env::temp_dir().join("trustdesk-definitely-missing"),
        );
        assert!(core.list_certificates().await.is_empty());
    }

    #[tokio::test]
    async fn install_all_skips_rows_marked_installed() {
        let core = TrustCore::with_platform(Platform::LinuxOther, std::env::temp_dir());
        let reports = core
            .install_all(vec![
                InstallCandidate {
                    filename: "a.pem".to_string(),
                    content: "x".to_string(),
                    is_installed: true,
                },
                InstallCandidate {
                    filename: "b.pem".to_string(),
                    content: "y".to_string(),
                    is_installed: true,
                },
            ])
            .await;
        assert!(reports.is_empty());
    }

    #[tokio::test]
    async fn refresh_preserves_order_and_length() {
        let core = TrustCore::with_platform(Platform::LinuxOther, std::env::temp_dir());
        let entries = vec![
            RefreshEntry {
                filename: "a.pem".to_string(),
                content: "x".to_string(),
                info: test_info("Unknown"),
            },
            RefreshEntry {
                filename: "b.pem".to_string(),
                content: "y".to_string(),
                info: test_info("Unknown"),
            },
        ];

        let records = core.refresh_status(entries).await;

        assert_eq!(records.len(), 2);
        assert_eq!(records[0].filename, "a.pem");
        assert_eq!(records[1].filename, "b.pem");
        assert!(records.iter().all(|r| !r.is_installed && !r.installing));
        assert!(records.iter().all(|r| r.path.is_none()));
    }

    #[test]
    fn capability_reports_directory_state() {
        let dir = temp_cert_dir("cap");
        std::fs::write(dir.join("one.pem"), "x").unwrap();

        let core = TrustCore::with_platform(Platform::LinuxOther, &dir);
        let status = core.status();
        assert!(status.healthy);
        assert!(status.summary.starts_with("1 certificate"));

        let missing = TrustCore::with_platform(
            Platform::LinuxOther,
            std::env::temp_dir().join("trustdesk-definitely-missing"),
        );
        assert!(!missing.status().healthy);

        std::fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn record_wire_format_uses_camel_case() {
        let record = CertificateRecord {
            filename: "a.pem".to_string(),
            path: None,
            content: "x".to_string(),
            info: test_info("Unknown"),
            is_installed: false,
            installing: false,
        };
        let value = serde_json::to_value(&record).unwrap();
        assert!(value.get("isInstalled").is_some());
        assert!(value.get("installing").is_some());
        assert!(value.get("path").is_none());
    }

    #[test]
    fn install_candidates_accept_full_records() {
        let body = serde_json::json!([{
            "filename": "a.pem",
            "path": "/tmp/a.pem",
            "content": "x",
            "info": {
                "name": "a", "commonName": "a", "subject": "s", "issuer": "i",
                "validFrom": "v", "validTo": "v", "serialNumber": "1", "fingerprint": "f"
            },
            "isInstalled": true,
            "installing": false
        }]);
        let candidates: Vec<InstallCandidate> = serde_json::from_value(body).unwrap();
        assert_eq!(candidates.len(), 1);
        assert!(candidates[0].is_installed);
    }
}
