use std::path::PathBuf;

/// Root data directory for trustdesk.
///
/// Everything here is machine-local (certificate sources, domain config,
/// logs). None of it should roam across machines via AD roaming profiles.
///
/// - Linux: `~/.trustdesk/`
/// - macOS: `~/Library/Application Support/trustdesk/`
/// - Windows: `%LOCALAPPDATA%\trustdesk\`
pub fn data_dir() -> PathBuf {
    #[cfg(target_os = "macos")]
    {
        if let Some(home) = std::env::var_os("HOME") {
            return PathBuf::from(home)
                .join("Library")
                .join("Application Support")
                .join("trustdesk");
        }
    }

    #[cfg(windows)]
    {
        if let Some(local) = std::env::var_os("LOCALAPPDATA") {
            return PathBuf::from(local).join("trustdesk");
        }
    }

    #[cfg(not(any(target_os = "macos", windows)))]
    {
        if let Some(home) = std::env::var_os("HOME") {
            return PathBuf::from(home).join(".trustdesk");
        }
    }

    // Fallback
    PathBuf::from(".trustdesk")
}

/// Directory scanned for certificate files (`.pem`, `.crt`, `.cert`).
pub fn certs_dir() -> PathBuf {
    data_dir().join("certs")
}

/// Configuration directory.
pub fn config_dir() -> PathBuf {
    data_dir().join("config")
}

/// Log directory.
pub fn log_dir() -> PathBuf {
    data_dir().join("logs")
}

/// Domain list consulted by the reachability checker.
pub fn domains_file() -> PathBuf {
    config_dir().join("domains.json")
}

/// Create the data directory tree if missing. Failures are logged and left
/// to surface at first use.
pub fn ensure_data_dir() {
    for dir in [data_dir(), certs_dir(), config_dir(), log_dir()] {
        if let Err(e) = std::fs::create_dir_all(&dir) {
            tracing::warn!(dir = %dir.display(), error = %e, "could not create data directory");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn data_dir_is_named_for_the_app() {
        let dir = data_dir();
        let name = dir
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        assert!(
            name == "trustdesk" || name == ".trustdesk",
            "unexpected data dir name: {name}"
        );
    }

    #[test]
    fn derived_dirs_live_under_the_data_dir() {
        assert!(certs_dir().starts_with(data_dir()));
        assert!(log_dir().starts_with(data_dir()));
        assert!(domains_file().starts_with(config_dir()));
    }
}
