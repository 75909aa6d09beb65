//! CLI command handlers, split by capability.
//!
//! Every verb operates directly on an in-process core; only `status`
//! consults a running daemon (and falls back to offline reporting).

pub mod certs;
pub mod net;
pub mod status;

/// Print a serializable value as JSON, handling serialization errors
/// gracefully instead of panicking.
pub(crate) fn print_json<T: serde::Serialize>(value: &T) {
    match serde_json::to_string(value) {
        Ok(json) => println!("{json}"),
        Err(e) => eprintln!("Error: failed to serialize response: {e}"),
    }
}
