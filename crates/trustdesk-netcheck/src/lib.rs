//! Reachability checks for domains and web services.
//!
//! Two strategies behind one facade: ping through the OS utility (DNS
//! resolved first) and HTTP HEAD with a short fixed timeout. Requests
//! arrive in a legacy-tolerant wire form; results are plain values and
//! never errors, so a failed check is still a completed operation.

pub mod http;

mod domains;
mod httpcheck;
mod ping;
mod protocol;

use std::path::{Path, PathBuf};

use hickory_resolver::{Resolver, TokioResolver};

use trustdesk_common::api::{Capability, CapabilityStatus};
use trustdesk_common::platform::Platform;

pub use protocol::{parse_check_request, CheckRequest, ReachabilityResult};

/// Core reachability facade consumed by the HTTP adapter and the CLI.
pub struct NetCheckCore {
    platform: Platform,
    domains_file: PathBuf,
    resolver: Option<TokioResolver>,
}

impl NetCheckCore {
    /// Facade for the running host, reading the domain list from
    /// `domains_file`.
    pub fn new(domains_file: impl Into<PathBuf>) -> Self {
        Self::with_platform(Platform::current(), domains_file)
    }

    /// Facade pinned to a platform family (for testing).
    pub fn with_platform(platform: Platform, domains_file: impl Into<PathBuf>) -> Self {
        // A host without a usable system resolver config still gets a
        // core; its ping checks degrade to DNS-failure results.
        let resolver = Resolver::builder_tokio()
            .map(|builder| builder.build())
            .ok();
        Self {
            platform,
            domains_file: domains_file.into(),
            resolver,
        }
    }

    pub fn platform(&self) -> Platform {
        self.platform
    }

    pub fn domains_file(&self) -> &Path {
        &self.domains_file
    }

    /// The configured domain list; empty when the file is missing or
    /// malformed.
    pub async fn domains(&self) -> Vec<serde_json::Value> {
        domains::load_domains(&self.domains_file).await
    }

    /// Run one reachability check from its wire form (bare string or
    /// structured object). Malformed requests yield a bad-configuration
    /// result without any network activity.
    pub async fn check_value(&self, request: &serde_json::Value) -> ReachabilityResult {
        match protocol::parse_check_request(request) {
            Some(request) => self.check(request).await,
            None => {
                tracing::debug!("malformed reachability request");
                ReachabilityResult::failure("配置格式错误")
            }
        }
    }

    /// Run one parsed reachability check.
    pub async fn check(&self, request: CheckRequest) -> ReachabilityResult {
        match request {
            CheckRequest::Ping { domain } => {
                ping::check(self.platform, self.resolver.as_ref(), &domain).await
            }
            CheckRequest::Http { url } => httpcheck::check(&url).await,
        }
    }
}

impl Capability for NetCheckCore {
    fn name(&self) -> &str {
        "net"
    }

    fn status(&self) -> CapabilityStatus {
        let summary = if self.domains_file.exists() {
            format!("domains from {}", self.domains_file.display())
        } else {
            "no domains file configured".to_string()
        };
        CapabilityStatus {
            name: self.name().to_string(),
            summary,
            healthy: true,
        }
    }
}
