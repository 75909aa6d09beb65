//! Staging of certificate content for external installer commands.
//!
//! The OS utilities only take file paths, so content is written to a
//! uniquely named file in the system temp directory for the duration of
//! the install and removed when the guard drops, on every exit path.

use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{SystemTime, UNIX_EPOCH};

/// Disambiguates staged files created within the same millisecond.
static STAGE_SEQ: AtomicU64 = AtomicU64::new(0);

/// A certificate staged on disk, deleted on drop.
#[derive(Debug)]
pub(crate) struct StagedCert {
    path: PathBuf,
}

impl StagedCert {
    /// Write `content` to a fresh file under the system temp directory.
    pub(crate) fn write(content: &str) -> std::io::Result<Self> {
        let millis = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map_or(0, |d| d.as_millis() as u64);
        let seq = STAGE_SEQ.fetch_add(1, Ordering::Relaxed);
        let path = std::env::temp_dir().join(format!("install_cert_{millis}_{seq}.pem"));

        std::fs::write(&path, content)?;

        // The elevated installer may run as a different user; it still
        // has to be able to read the file.
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            std::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o644))?;
        }

        Ok(Self { path })
    }

    pub(crate) fn path(&self) -> &Path {
        &self.path
    }

    /// Path as a string for embedding in command lines.
    pub(crate) fn path_str(&self) -> String {
        self.path.to_string_lossy().into_owned()
    }
}

impl Drop for StagedCert {
    fn drop(&mut self) {
        if let Err(e) = std::fs::remove_file(&self.path) {
            if e.kind() != std::io::ErrorKind::NotFound {
                tracing::warn!(path = %self.path.display(), error = %e, "staged certificate not removed");
            }
        }
    }
}
