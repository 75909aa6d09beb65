//! End-to-end exercises of the trust facade against a scratch directory.

use std::collections::HashSet;
use std::path::PathBuf;

use trustdesk_common::platform::Platform;
use trustdesk_truststore::{install_trust_with, CertificateRecord, TrustCore};

fn scratch_dir(tag: &str) -> PathBuf {
    let nanos = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .unwrap()
        .as_nanos();
    let dir = std::env::temp_dir().join(format!("trustdesk-it-{tag}-{nanos}"));
    std::fs::create_dir_all(&dir).unwrap();
    dir
}

fn mint_pem(common_name: &str) -> String {
    let key = rcgen::KeyPair::generate().unwrap();
    let mut params = rcgen::CertificateParams::new(vec!["trustdesk.test".to_string()]).unwrap();
    params.distinguished_name = rcgen::DistinguishedName::new();
    params
        .distinguished_name
        .push(rcgen::DnType::CommonName, common_name);
    params.self_signed(&key).unwrap().pem()
}

#[tokio::test]
async fn listing_round_trips_over_json() {
    let dir = scratch_dir("listing");
    std::fs::write(dir.join("root-ca.pem"), mint_pem("Integration Root")).unwrap();
    std::fs::write(dir.join("broken.crt"), "garbage").unwrap();

    let core = TrustCore::with_platform(Platform::LinuxOther, &dir);
    let records = core.list_certificates().await;
    assert_eq!(records.len(), 2);

    let json = serde_json::to_string(&records).unwrap();
    let value: serde_json::Value = serde_json::from_str(&json).unwrap();
    assert_eq!(value[1]["info"]["commonName"], "Integration Root");
    assert_eq!(value[1]["isInstalled"], false);
    assert_eq!(value[0]["info"]["subject"], "Certificate parsing failed");

    let parsed: Vec<CertificateRecord> = serde_json::from_str(&json).unwrap();
    assert_eq!(parsed[0].filename, "broken.crt");
    assert_eq!(parsed[1].filename, "root-ca.pem");

    std::fs::remove_dir_all(&dir).unwrap();
}

#[tokio::test]
async fn trust_check_uses_real_fingerprints_only() {
    let dir = scratch_dir("check");
    std::fs::write(dir.join("ca.pem"), mint_pem("Check Root")).unwrap();

    let core = TrustCore::with_platform(Platform::LinuxOther, &dir);
    let records = core.list_certificates().await;
    assert_eq!(records[0].info.fingerprint.len(), 59);

    // Linux probing is unsupported, so even a real fingerprint reports
    // not installed.
    assert!(!core.check_trust(&records[0].info).await);

    std::fs::remove_dir_all(&dir).unwrap();
}

fn staged_files() -> HashSet<String> {
    std::fs::read_dir(std::env::temp_dir())
        .map(|entries| {
            entries
                .flatten()
                .filter_map(|e| e.file_name().into_string().ok())
                .filter(|name| name.starts_with("install_cert_") && name.ends_with(".pem"))
                .collect()
        })
        .unwrap_or_default()
}

#[tokio::test]
async fn failed_installs_leave_no_staged_certificate() {
    let before = staged_files();

    for platform in [Platform::Windows, Platform::MacOs, Platform::LinuxOther] {
        let result = install_trust_with(
            platform,
            "trustdesk-no-such-elevator",
            "-----BEGIN CERTIFICATE-----\nAAAA\n-----END CERTIFICATE-----\n",
        )
        .await;
        assert!(!result.success, "{platform:?} install should fail");
        assert!(result
            .error
            .as_deref()
            .unwrap_or_default()
            .starts_with("权限提升失败"));
    }

    assert_eq!(staged_files(), before);
}
