/// Test fixtures: directory trees and stand-ins for the injectable seams

use sayonara_shred::{DriveInfo, MediaKind, MediaProbe, Overwrite, WipeResult, DoDWipe};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

/// Probe that reports the same media kind for every path
pub struct FixedProbe(pub MediaKind);

impl MediaProbe for FixedProbe {
    fn probe(&self, _path: &Path) -> WipeResult<DriveInfo> {
        Ok(DriveInfo::new(self.0, "fixture0"))
    }
}

/// Runs the real 3-pass engine and records what it touched
#[derive(Default)]
pub struct RecordingEngine {
    pub touched: Mutex<Vec<PathBuf>>,
}

impl RecordingEngine {
    pub fn touched(&self) -> Vec<PathBuf> {
        self.touched.lock().map(|t| t.clone()).unwrap_or_default()
    }
}

impl Overwrite for RecordingEngine {
    fn overwrite(&self, path: &Path) -> WipeResult<()> {
        if let Ok(mut touched) = self.touched.lock() {
            touched.push(path.to_path_buf());
        }
        DoDWipe::overwrite_file(path)
    }
}

/// Builds a directory tree of files with known content
pub struct TreeBuilder {
    root: PathBuf,
}

impl TreeBuilder {
    pub fn new(root: &Path) -> Self {
        fs::create_dir_all(root).expect("Failed to create fixture root");
        Self {
            root: root.to_path_buf(),
        }
    }

    /// Add a file at `relative`, creating parent directories
    pub fn file(self, relative: &str, content: &[u8]) -> Self {
        let path = self.root.join(relative);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).expect("Failed to create fixture directory");
        }
        fs::write(&path, content).expect("Failed to write fixture file");
        self
    }

    pub fn dir(self, relative: &str) -> Self {
        fs::create_dir_all(self.root.join(relative)).expect("Failed to create fixture directory");
        self
    }

    pub fn build(self) -> PathBuf {
        self.root
    }
}
