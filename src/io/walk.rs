use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// Contents of a directory tree, root excluded
#[derive(Debug, Default, Clone)]
pub struct TreeListing {
    /// Regular files, in traversal order
    pub files: Vec<PathBuf>,
    /// Symbolic links (never followed)
    pub symlinks: Vec<PathBuf>,
    /// Subdirectories, deepest first
    pub directories: Vec<PathBuf>,
    /// Entries that could not be read
    pub unreadable: Vec<String>,
}

/// Enumerate everything under `root` without following links.
pub fn list_tree(root: &Path) -> TreeListing {
    let mut listing = TreeListing::default();

    let walker = WalkDir::new(root)
        .min_depth(1)
        .follow_links(false)
        .contents_first(true)
        .sort_by_file_name();

    for entry in walker {
        let entry = match entry {
            Ok(entry) => entry,
            Err(e) => {
                tracing::warn!(root = %root.display(), error = %e, "Unreadable entry");
                listing.unreadable.push(e.to_string());
                continue;
            }
        };

        let file_type = entry.file_type();
        if file_type.is_symlink() {
            listing.symlinks.push(entry.into_path());
        } else if file_type.is_dir() {
            listing.directories.push(entry.into_path());
        } else if file_type.is_file() {
            listing.files.push(entry.into_path());
        }
    }

    listing
}
