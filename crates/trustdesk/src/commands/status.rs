//! Unified status command handler.
//!
//! Shows the status of all capabilities, connecting to a running daemon
//! if one listens on the configured port, otherwise reporting offline.

use trustdesk_common::api::{Capability, CapabilityStatus};
use trustdesk_truststore::TrustCore;

use crate::cli::{Cli, Config};
use crate::client::TrustdeskClient;
use crate::format;

pub fn status(cli: &Cli, config: &Config) -> anyhow::Result<()> {
    use serde::Serialize;

    #[derive(Serialize)]
    struct UnifiedStatus {
        version: String,
        platform: String,
        daemon: bool,
        capabilities: Vec<CapabilityStatus>,
    }

    // Try to connect to a daemon first
    let client = TrustdeskClient::new(&config.local_endpoint());
    if client.health().is_ok() {
        match client.unified_status() {
            Ok(status_json) => {
                if cli.json {
                    println!("{}", serde_json::to_string_pretty(&status_json)?);
                } else {
                    format::unified_status(&status_json);
                }
                return Ok(());
            }
            Err(e) => {
                tracing::debug!(error = %e, "Could not fetch unified status");
            }
        }
    }

    // No daemon: report offline status from local state
    let capabilities = offline_capabilities(config);

    let status = UnifiedStatus {
        version: env!("CARGO_PKG_VERSION").to_string(),
        platform: std::env::consts::OS.to_string(),
        daemon: false,
        capabilities,
    };

    if cli.json {
        println!("{}", serde_json::to_string_pretty(&status)?);
    } else {
        println!("trustdesk v{}", status.version);
        println!("  Platform:  {}", status.platform);
        println!("  Daemon:    not running");
        for cap in &status.capabilities {
            let marker = if cap.healthy { "+" } else { "-" };
            println!("  [{}] {}:  {}", marker, cap.name, cap.summary);
        }
    }

    Ok(())
}

fn offline_capabilities(config: &Config) -> Vec<CapabilityStatus> {
    // Trust probing needs no daemon state, so "certs" carries its real
    // summary. The net core builds a DNS resolver at construction; its
    // summary needs only the config, so it is assembled directly.
    let trust = TrustCore::new(&config.cert_dir);
    let net_summary = if config.domains_file.exists() {
        format!("domains from {}", config.domains_file.display())
    } else {
        "no domains file configured".to_string()
    };
    vec![
        trust.status(),
        CapabilityStatus {
            name: "net".to_string(),
            summary: net_summary,
            healthy: true,
        },
    ]
}
