//! Wire types for reachability checks.
//!
//! Requests arrive either as a bare JSON string (the legacy form, a domain
//! to ping) or as an object selecting a strategy. Parsing is a pure
//! function; anything unrecognized is reported as a bad configuration by
//! the caller without touching the network.

use serde::{Deserialize, Serialize};

/// Outcome of one reachability check. `statusCode` only appears for HTTP
/// checks; the other fields are always present, null when unknown.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReachabilityResult {
    pub accessible: bool,
    pub error_message: Option<String>,
    pub ip: Option<String>,
    pub response_time_ms: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status_code: Option<u16>,
}

impl ReachabilityResult {
    /// Not-accessible result carrying only a message.
    pub(crate) fn failure(message: impl Into<String>) -> Self {
        Self {
            accessible: false,
            error_message: Some(message.into()),
            ip: None,
            response_time_ms: None,
            status_code: None,
        }
    }
}

/// A parsed reachability request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CheckRequest {
    /// ICMP-style check through the OS ping utility.
    Ping { domain: String },
    /// HEAD request against a full URL.
    Http { url: String },
}

/// Parse the wire form of a check request. A bare string means "ping this
/// domain"; objects carry an optional `type` defaulting to `"ping"`.
/// Returns `None` for anything malformed: wrong JSON type, unknown
/// `type`, or a missing/empty target field.
pub fn parse_check_request(value: &serde_json::Value) -> Option<CheckRequest> {
    if let Some(domain) = value.as_str() {
        return Some(CheckRequest::Ping {
            domain: domain.to_string(),
        });
    }

    let object = value.as_object()?;
    let kind = object
        .get("type")
        .and_then(|t| t.as_str())
        .unwrap_or("ping");
    match kind {
        "http" => {
            let url = object
                .get("url")
                .and_then(|u| u.as_str())
                .filter(|u| !u.is_empty())?;
            Some(CheckRequest::Http {
                url: url.to_string(),
            })
        }
        "ping" => {
            let domain = object
                .get("domain")
                .and_then(|d| d.as_str())
                .filter(|d| !d.is_empty())?;
            Some(CheckRequest::Ping {
                domain: domain.to_string(),
            })
        }
        _ => None,
    }
}
