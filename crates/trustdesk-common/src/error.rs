use serde::{Deserialize, Serialize};

/// Machine-readable error codes for the HTTP boundary.
///
/// Domain operations themselves never fail: probes resolve to booleans and
/// installs to result records. The code set only covers transport-level
/// faults, meaning bodies that do not deserialize, routes that do not
/// exist, and the catch-all for adapter bugs.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ErrorCode {
    InvalidPayload,
    NotFound,
    Internal,
}

impl ErrorCode {
    /// Suggested HTTP status code for this error.
    /// Transport-agnostic (returns u16, not an axum type).
    pub fn http_status(&self) -> u16 {
        match self {
            Self::InvalidPayload => 400,
            Self::NotFound => 404,
            Self::Internal => 500,
        }
    }
}
