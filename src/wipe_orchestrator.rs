// Deletion Orchestrator - Routes each file to the erase path for its media
//
// Rotational media: 3-pass overwrite, obscure the name, unlink.
// Flash media: obscure the name, unlink, TRIM hint.
// Folders are deleted file by file and keep going after a failure.

use crate::algorithms::{DoDWipe, Overwrite};
use crate::drives::{DriveClassifier, MediaProbe, TrimOperations};
use crate::io::{list_tree, obscure_filename};
use crate::{EraseMethod, WipeError, WipeResult};
use serde::Serialize;
use std::fs;
use std::io::ErrorKind;
use std::iter;
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Outcome of a folder deletion
#[derive(Debug, Clone, Default, Serialize)]
pub struct FolderReport {
    pub root: PathBuf,
    pub files_found: usize,
    pub files_deleted: usize,
    pub failed_files: Vec<PathBuf>,
    pub directories_removed: usize,
    /// Directories and links that could not be removed
    pub failed_removals: Vec<PathBuf>,
    pub unreadable_entries: usize,
}

impl FolderReport {
    fn new(root: &Path) -> Self {
        Self {
            root: root.to_path_buf(),
            ..Default::default()
        }
    }

    pub fn failures(&self) -> usize {
        self.failed_files.len() + self.failed_removals.len() + self.unreadable_entries
    }

    pub fn success(&self) -> bool {
        self.failures() == 0
    }

    pub fn into_result(self) -> WipeResult<FolderReport> {
        if self.success() {
            Ok(self)
        } else {
            Err(WipeError::FolderIncomplete {
                failures: self.failures(),
                path: self.root,
            })
        }
    }
}

/// Drive-aware secure deleter
pub struct SecureDeleter {
    probe: Arc<dyn MediaProbe>,
    engine: Arc<dyn Overwrite>,
}

impl Default for SecureDeleter {
    fn default() -> Self {
        Self::new()
    }
}

impl SecureDeleter {
    /// Platform drive classifier and the DoD overwrite engine
    pub fn new() -> Self {
        Self::with_components(Arc::new(DriveClassifier), Arc::new(DoDWipe))
    }

    pub fn with_components(probe: Arc<dyn MediaProbe>, engine: Arc<dyn Overwrite>) -> Self {
        Self { probe, engine }
    }

    /// Securely delete one regular file.
    ///
    /// On success the original path no longer exists. Any failing step
    /// stops the operation; nothing is retried.
    pub fn secure_delete_file(&self, path: &Path) -> WipeResult<()> {
        tracing::info!(path = %path.display(), "Securely deleting file");

        let result = self.delete_file_inner(path);
        match &result {
            Ok(()) => tracing::info!(path = %path.display(), "Successfully deleted"),
            Err(e) => tracing::error!(path = %path.display(), error = %e, "Failed to delete"),
        }

        result
    }

    fn delete_file_inner(&self, path: &Path) -> WipeResult<()> {
        Self::validate_file(path)?;

        let drive = DriveClassifier::classify_with(self.probe.as_ref(), path);
        tracing::info!(kind = ?drive.kind, device = %drive.device, "Drive type");

        match drive.erase_method() {
            EraseMethod::Trim => {
                let obscured = obscure_filename(path);
                TrimOperations::erase_file(&obscured)?;
            }
            EraseMethod::Overwrite => {
                self.engine.overwrite(path)?;
                let obscured = obscure_filename(path);
                fs::remove_file(&obscured).map_err(|e| WipeError::io(&obscured, e))?;
            }
        }

        Ok(())
    }

    /// Securely delete every regular file under `path`, then the emptied
    /// directory tree.
    ///
    /// Only validation problems are returned as `Err`. A failing file does
    /// not stop the remaining ones; it shows up in the report and makes
    /// [`FolderReport::success`] false. Already destroyed files stay destroyed.
    pub fn secure_delete_folder(&self, path: &Path) -> WipeResult<FolderReport> {
        let metadata = Self::metadata(path)?;
        if !metadata.is_dir() {
            return Err(WipeError::NotADirectory(path.to_path_buf()));
        }

        tracing::info!(path = %path.display(), "Securely deleting folder");

        let listing = list_tree(path);
        let mut report = FolderReport::new(path);
        report.files_found = listing.files.len();
        report.unreadable_entries = listing.unreadable.len();

        tracing::info!(count = report.files_found, "Found file(s) to delete");

        for file in &listing.files {
            match self.secure_delete_file(file) {
                Ok(()) => report.files_deleted += 1,
                Err(_) => report.failed_files.push(file.clone()),
            }
        }

        // Links are removed, never followed
        for link in &listing.symlinks {
            if let Err(e) = fs::remove_file(link) {
                tracing::warn!(path = %link.display(), error = %e, "Could not remove link");
                report.failed_removals.push(link.clone());
            }
        }

        let root = path.to_path_buf();
        for dir in listing.directories.iter().chain(iter::once(&root)) {
            match fs::remove_dir(dir) {
                Ok(()) => report.directories_removed += 1,
                Err(e) => {
                    tracing::warn!(path = %dir.display(), error = %e, "Could not remove directory");
                    report.failed_removals.push(dir.clone());
                }
            }
        }

        if report.success() {
            tracing::info!(path = %path.display(), "Folder structure removed");
        } else {
            tracing::warn!(
                path = %path.display(),
                failures = report.failures(),
                "Folder only partially deleted"
            );
        }

        Ok(report)
    }

    /// Dispatch on what `path` is. Directories need `recursive`.
    pub fn secure_delete_path(&self, path: &Path, recursive: bool) -> WipeResult<()> {
        if Self::metadata(path)?.is_dir() {
            if !recursive {
                return Err(WipeError::InvalidRequest(format!(
                    "{} is a directory, recursive deletion not requested",
                    path.display()
                )));
            }
            self.secure_delete_folder(path)?.into_result().map(|_| ())
        } else {
            self.secure_delete_file(path)
        }
    }

    fn validate_file(path: &Path) -> WipeResult<()> {
        // Symlinks are not followed: only the entry itself would be renamed
        if Self::metadata(path)?.file_type().is_file() {
            Ok(())
        } else {
            Err(WipeError::NotAFile(path.to_path_buf()))
        }
    }

    fn metadata(path: &Path) -> WipeResult<fs::Metadata> {
        fs::symlink_metadata(path).map_err(|e| match e.kind() {
            ErrorKind::NotFound => WipeError::PathNotFound(path.to_path_buf()),
            _ => WipeError::io(path, e),
        })
    }
}
