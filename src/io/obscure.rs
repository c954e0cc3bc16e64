use rand::Rng;
use std::fs;
use std::path::{Path, PathBuf};

/// Length of the random replacement name
pub const OBSCURED_NAME_LEN: usize = 16;

const HEX_DIGITS: &[u8; 16] = b"0123456789abcdef";
const MAX_ATTEMPTS: usize = 8;

/// Random lowercase-hex file name
pub fn random_hex_name() -> String {
    let mut rng = rand::thread_rng();
    (0..OBSCURED_NAME_LEN)
        .map(|_| HEX_DIGITS[rng.gen_range(0..HEX_DIGITS.len())] as char)
        .collect()
}

/// Rename `path` to a random name in the same directory so the original
/// name does not outlive the file in directory entries or the journal.
///
/// Best effort: on failure the original path is returned and the caller
/// carries on with it.
pub fn obscure_filename(path: &Path) -> PathBuf {
    let parent = path.parent().unwrap_or_else(|| Path::new(""));

    for _ in 0..MAX_ATTEMPTS {
        let candidate = parent.join(random_hex_name());

        // Never clobber an existing entry
        if candidate.symlink_metadata().is_ok() {
            continue;
        }

        return match fs::rename(path, &candidate) {
            Ok(()) => {
                tracing::debug!(from = %path.display(), to = %candidate.display(), "Obscured filename");
                candidate
            }
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %e, "Could not obscure filename");
                path.to_path_buf()
            }
        };
    }

    tracing::warn!(path = %path.display(), "No free random name, keeping original");
    path.to_path_buf()
}
