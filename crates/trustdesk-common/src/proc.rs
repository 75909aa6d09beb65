//! Subprocess spawning helpers shared by the trust-store and reachability
//! crates.

use tokio::process::Command;

/// Keep a spawned console utility from flashing a window when the daemon
/// runs detached from a terminal on Windows. No-op elsewhere.
#[cfg(windows)]
pub fn hide_window(cmd: &mut Command) -> &mut Command {
    // CREATE_NO_WINDOW
    cmd.creation_flags(0x0800_0000)
}

#[cfg(not(windows))]
pub fn hide_window(cmd: &mut Command) -> &mut Command {
    cmd
}
