use crate::{WipeError, WipeResult};
use std::path::{Path, PathBuf};

/// Resolve the mount point containing `path`.
///
/// Walks up from the canonical path until the device id changes, so the
/// result is the topmost directory still on the same filesystem.
#[cfg(unix)]
pub fn mount_point(path: &Path) -> WipeResult<PathBuf> {
    let mut current = path.canonicalize().map_err(|e| WipeError::io(path, e))?;
    let device = device_id(&current)?;

    while let Some(parent) = current.parent() {
        if device_id(parent)? != device {
            break;
        }
        current = parent.to_path_buf();
    }

    Ok(current)
}

/// Resolve the volume root (e.g. `C:\`) containing `path`.
#[cfg(not(unix))]
pub fn mount_point(path: &Path) -> WipeResult<PathBuf> {
    let canonical = path.canonicalize().map_err(|e| WipeError::io(path, e))?;
    canonical
        .ancestors()
        .last()
        .map(Path::to_path_buf)
        .ok_or_else(|| WipeError::DetectionFailed(format!("no volume root for {}", path.display())))
}

#[cfg(unix)]
pub(crate) fn device_id(path: &Path) -> WipeResult<u64> {
    use std::os::unix::fs::MetadataExt;

    std::fs::metadata(path)
        .map(|m| m.dev())
        .map_err(|e| WipeError::io(path, e))
}
