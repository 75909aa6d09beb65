//! Domain list configuration.
//!
//! The list is an operator-maintained JSON array; entries are passed
//! through to the front end untouched, so no schema is imposed here.

use std::path::Path;

/// Read the configured domain list. A missing or malformed file yields an
/// empty list, never an error.
pub async fn load_domains(path: &Path) -> Vec<serde_json::Value> {
    let content = match tokio::fs::read_to_string(path).await {
        Ok(content) => content,
        Err(e) => {
            tracing::warn!(path = %path.display(), error = %e, "domains file not readable");
            return Vec::new();
        }
    };

    match serde_json::from_str(&content) {
        Ok(domains) => domains,
        Err(e) => {
            tracing::warn!(path = %path.display(), error = %e, "domains file is not a JSON array");
            Vec::new()
        }
    }
}
