//! Runtime platform selection.
//!
//! Trust-store probing, privileged installation, and ping invocation all
//! differ per OS family. Dispatch happens on a closed enum chosen by a pure
//! function over the OS identifier, so call sites match exhaustively and
//! every branch compiles (and is testable) on every host.

/// OS families with distinct trust-store and reachability behavior.
///
/// Unrecognized systems map to `LinuxOther`, which reports certificates as
/// not installed and uses POSIX tooling for installation. Falling back is
/// safe: the caller's reaction to "not installed" is to offer installation,
/// never to crash.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Platform {
    Windows,
    MacOs,
    LinuxOther,
}

impl Platform {
    /// Select the platform family for an OS identifier as reported by
    /// `std::env::consts::OS`.
    pub fn from_os(os: &str) -> Self {
        match os {
            "windows" => Self::Windows,
            "macos" => Self::MacOs,
            _ => Self::LinuxOther,
        }
    }

    /// Platform family of the running host.
    pub fn current() -> Self {
        Self::from_os(std::env::consts::OS)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Windows => "windows",
            Self::MacOs => "macos",
            Self::LinuxOther => "linux-other",
        }
    }
}
