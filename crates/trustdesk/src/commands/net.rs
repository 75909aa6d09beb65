//! Network reachability command handlers.

use trustdesk_netcheck::{CheckRequest, NetCheckCore};

use crate::cli::Config;
use crate::commands::print_json;
use crate::format;

pub async fn domains(config: &Config, json: bool) -> anyhow::Result<()> {
    let core = NetCheckCore::new(&config.domains_file);
    let domains = core.domains().await;
    if json {
        print_json(&domains);
    } else if domains.is_empty() {
        println!("No domains configured in {}", config.domains_file.display());
    } else {
        for entry in &domains {
            format::domain_line(entry);
        }
    }
    Ok(())
}

pub async fn check(config: &Config, target: &str, http: bool, json: bool) -> anyhow::Result<()> {
    let request = if http {
        CheckRequest::Http {
            url: target.to_string(),
        }
    } else {
        CheckRequest::Ping {
            domain: target.to_string(),
        }
    };

    let core = NetCheckCore::new(&config.domains_file);
    let result = core.check(request).await;

    if json {
        print_json(&result);
    } else {
        format::reachability(target, &result);
    }
    Ok(())
}
