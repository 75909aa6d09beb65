use serde::{Deserialize, Serialize};

use crate::error::ErrorCode;

/// Standard error body for API responses.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorBody {
    pub error: ErrorCode,
    pub message: String,
}

pub fn error_body(code: ErrorCode, message: impl Into<String>) -> ErrorBody {
    ErrorBody {
        error: code,
        message: message.into(),
    }
}

/// Summary of a capability's current state for the unified status surface.
#[derive(Debug, Clone, Serialize)]
pub struct CapabilityStatus {
    pub name: String,
    pub summary: String,
    pub healthy: bool,
}

/// Trait implemented by each domain core to participate in `trustdesk status`
/// and the daemon's `/v1/status` endpoint.
pub trait Capability: Send + Sync {
    fn name(&self) -> &str;
    fn status(&self) -> CapabilityStatus;
}
