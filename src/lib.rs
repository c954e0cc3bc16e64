// Allow uppercase acronyms for industry-standard terms like HDD, SSD, TRIM
#![allow(clippy::upper_case_acronyms)]

pub mod algorithms;
pub mod config;
pub mod drives;
pub mod io;
pub mod session;
pub mod wipe_orchestrator;

// Re-export the main entry points for convenience
pub use algorithms::{DoDWipe, Overwrite, OverwritePattern};
pub use config::ShredConfig;
pub use drives::{DriveClassifier, MediaProbe, TrimOperations, TrimOutcome};
pub use session::{StartWipeRequest, StartWipeResponse, WipeSessionManager, WipeStatus};
pub use wipe_orchestrator::{FolderReport, SecureDeleter};

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum WipeError {
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    #[error("Session not found: {0}")]
    SessionNotFound(String),

    #[error("Path not found: {}", .0.display())]
    PathNotFound(PathBuf),

    #[error("Not a regular file: {}", .0.display())]
    NotAFile(PathBuf),

    #[error("Not a directory: {}", .0.display())]
    NotADirectory(PathBuf),

    #[error("Folder {} not fully deleted: {failures} failure(s)", path.display())]
    FolderIncomplete { path: PathBuf, failures: usize },

    #[error("I/O error on {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Drive detection failed: {0}")]
    DetectionFailed(String),

    #[error("TRIM operation failed: {0}")]
    TrimFailed(String),

    #[error("Configuration error: {0}")]
    Config(String),
}

impl WipeError {
    /// Wrap an I/O error together with the path it happened on
    pub fn io(path: impl AsRef<Path>, source: std::io::Error) -> Self {
        WipeError::Io {
            path: path.as_ref().to_path_buf(),
            source,
        }
    }

    /// Errors a caller of the session API is responsible for
    pub fn is_caller_error(&self) -> bool {
        matches!(
            self,
            WipeError::InvalidRequest(_) | WipeError::SessionNotFound(_)
        )
    }
}

impl From<::config::ConfigError> for WipeError {
    fn from(err: ::config::ConfigError) -> Self {
        WipeError::Config(err.to_string())
    }
}

pub type WipeResult<T> = Result<T, WipeError>;

/// Media kind of the device backing a path
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum MediaKind {
    Rotational,
    Flash,
    Unknown,
}

/// How a file gets destroyed once its media kind is known
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum EraseMethod {
    /// 3-pass pattern overwrite, obscure, unlink
    Overwrite,
    /// Obscure, unlink, TRIM hint
    Trim,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct DriveInfo {
    pub kind: MediaKind,
    pub device: String,
}

impl DriveInfo {
    pub fn new(kind: MediaKind, device: impl Into<String>) -> Self {
        Self {
            kind,
            device: device.into(),
        }
    }

    pub fn unknown() -> Self {
        Self::new(MediaKind::Unknown, "unknown")
    }

    pub fn is_flash(&self) -> bool {
        self.kind == MediaKind::Flash
    }

    /// Erase policy. Unknown media is treated as rotational: overwriting
    /// is harmless on flash, skipping it on a spinning disk is not.
    pub fn erase_method(&self) -> EraseMethod {
        match self.kind {
            MediaKind::Flash => EraseMethod::Trim,
            MediaKind::Rotational => EraseMethod::Overwrite,
            MediaKind::Unknown => {
                tracing::warn!(
                    device = %self.device,
                    "Media kind unknown, falling back to overwrite"
                );
                EraseMethod::Overwrite
            }
        }
    }
}
