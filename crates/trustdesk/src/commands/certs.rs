//! Certificate trust command handlers.

use std::path::Path;

use trustdesk_truststore::{extract_info, InstallCandidate, TrustCore};

use crate::cli::Config;
use crate::commands::print_json;
use crate::format;

pub async fn list(config: &Config, json: bool) -> anyhow::Result<()> {
    let core = TrustCore::new(&config.cert_dir);
    let records = core.list_certificates().await;
    if json {
        print_json(&records);
    } else if records.is_empty() {
        println!("No certificate files in {}", config.cert_dir.display());
    } else {
        for record in &records {
            format::cert_line(record);
        }
    }
    Ok(())
}

pub async fn check(config: &Config, file: &Path, json: bool) -> anyhow::Result<()> {
    let content = read_cert(file).await?;
    let info = extract_info(&content, &filename_of(file));

    let core = TrustCore::new(&config.cert_dir);
    let installed = core.check_trust(&info).await;

    if json {
        print_json(&serde_json::json!({ "installed": installed }));
    } else {
        format::cert_detail(&info);
        println!("  Installed:   {}", if installed { "yes" } else { "no" });
    }
    Ok(())
}

pub async fn install(config: &Config, file: &Path, json: bool) -> anyhow::Result<()> {
    let content = read_cert(file).await?;

    let core = TrustCore::new(&config.cert_dir);
    let result = core.install_trust(&content).await;

    if json {
        print_json(&result);
    } else {
        format::install_result(&result);
    }
    Ok(())
}

pub async fn install_all(config: &Config, json: bool) -> anyhow::Result<()> {
    let core = TrustCore::new(&config.cert_dir);
    let candidates: Vec<InstallCandidate> = core
        .list_certificates()
        .await
        .into_iter()
        .map(|record| InstallCandidate {
            filename: record.filename,
            content: record.content,
            is_installed: record.is_installed,
        })
        .collect();

    let reports = core.install_all(candidates).await;

    if json {
        print_json(&reports);
    } else if reports.is_empty() {
        println!("Nothing to install.");
    } else {
        for report in &reports {
            format::install_report_line(report);
        }
    }
    Ok(())
}

async fn read_cert(file: &Path) -> anyhow::Result<String> {
    tokio::fs::read_to_string(file)
        .await
        .map_err(|e| anyhow::anyhow!("could not read {}: {e}", file.display()))
}

fn filename_of(file: &Path) -> String {
    file.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| file.display().to_string())
}
