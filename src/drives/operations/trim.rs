use crate::drives::mount::mount_point;
use crate::{WipeError, WipeResult};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
#[cfg(any(target_os = "linux", windows))]
use std::process::Command;

/// Result of the discard hint that follows an unlink
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum TrimOutcome {
    /// A TRIM command was issued against the given mount point or volume
    Issued { target: String },
    /// The filesystem discards freed blocks on its own
    Automatic,
    /// The hint could not be issued; the unlink still happened
    Failed(String),
}

impl TrimOutcome {
    pub fn is_failure(&self) -> bool {
        matches!(self, TrimOutcome::Failed(_))
    }
}

pub struct TrimOperations;

impl TrimOperations {
    /// Unlink `path` and ask the device to reclaim the freed blocks.
    ///
    /// Unlink failure is an error. TRIM failure is only logged: the file's
    /// logical mapping is already gone at that point.
    pub fn erase_file(path: &Path) -> WipeResult<TrimOutcome> {
        tracing::info!(path = %path.display(), "Using unlink + TRIM");

        // Resolve while the path still exists
        let parent = path
            .parent()
            .filter(|p| !p.as_os_str().is_empty())
            .unwrap_or_else(|| Path::new("."));
        let mount = mount_point(parent);

        fs::remove_file(path).map_err(|e| {
            tracing::error!(path = %path.display(), error = %e, "Unlink failed");
            WipeError::io(path, e)
        })?;

        let outcome = mount
            .and_then(|mount| Self::issue_trim(&mount))
            .unwrap_or_else(|e| {
                tracing::warn!(path = %path.display(), error = %e, "TRIM not issued");
                TrimOutcome::Failed(e.to_string())
            });

        Ok(outcome)
    }

    #[cfg(target_os = "linux")]
    fn issue_trim(mount: &Path) -> WipeResult<TrimOutcome> {
        let output = Command::new("fstrim")
            .arg("-v")
            .arg(mount)
            .output()
            .map_err(|e| WipeError::TrimFailed(format!("fstrim failed: {}", e)))?;

        if !output.status.success() {
            return Err(WipeError::TrimFailed(format!(
                "fstrim failed: {}",
                String::from_utf8_lossy(&output.stderr).trim()
            )));
        }

        tracing::info!(mount = %mount.display(), "TRIM issued for mount point");
        Ok(TrimOutcome::Issued {
            target: mount.display().to_string(),
        })
    }

    #[cfg(windows)]
    fn issue_trim(mount: &Path) -> WipeResult<TrimOutcome> {
        use crate::drives::DriveClassifier;

        let letter = DriveClassifier::drive_letter(mount).ok_or_else(|| {
            WipeError::TrimFailed(format!("no drive letter in {}", mount.display()))
        })?;
        let drive = format!("{}:", letter);

        let output = Command::new("defrag")
            .args([drive.as_str(), "/L"])
            .output()
            .map_err(|e| WipeError::TrimFailed(format!("defrag failed: {}", e)))?;

        if !output.status.success() {
            return Err(WipeError::TrimFailed(format!(
                "defrag /L failed on {}",
                drive
            )));
        }

        tracing::info!(drive = %drive, "TRIM issued for drive");
        Ok(TrimOutcome::Issued { target: drive })
    }

    /// APFS and the remaining platforms discard freed blocks themselves
    #[cfg(not(any(target_os = "linux", windows)))]
    fn issue_trim(mount: &Path) -> WipeResult<TrimOutcome> {
        tracing::info!(mount = %mount.display(), "TRIM will be handled by the filesystem");
        Ok(TrimOutcome::Automatic)
    }
}
