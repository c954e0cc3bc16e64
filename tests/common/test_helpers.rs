/// Common test helper functions

use std::fs;
use std::io::Read;
use std::path::Path;

/// Verify that a file contains only the given byte
pub fn verify_filled_with(path: &Path, value: u8) -> std::io::Result<bool> {
    let mut file = fs::File::open(path)?;
    let mut buffer = vec![0u8; 4096];

    loop {
        let bytes_read = file.read(&mut buffer)?;
        if bytes_read == 0 {
            break;
        }

        if buffer[..bytes_read].iter().any(|&byte| byte != value) {
            return Ok(false);
        }
    }

    Ok(true)
}

/// Verify that a file contains only zeros
pub fn verify_all_zeros(path: &Path) -> std::io::Result<bool> {
    verify_filled_with(path, 0x00)
}

/// Calculate Shannon entropy of a file
pub fn calculate_file_entropy(path: &Path) -> std::io::Result<f64> {
    let mut file = fs::File::open(path)?;
    let mut buffer = Vec::new();
    file.read_to_end(&mut buffer)?;

    if buffer.is_empty() {
        return Ok(0.0);
    }

    let mut counts = [0u64; 256];
    for &byte in &buffer {
        counts[byte as usize] += 1;
    }

    let length = buffer.len() as f64;
    let mut entropy = 0.0;

    for &count in &counts {
        if count > 0 {
            let probability = count as f64 / length;
            entropy -= probability * probability.log2();
        }
    }

    Ok(entropy)
}

/// Number of entries (files, links and directories) directly inside `dir`
pub fn entry_count(dir: &Path) -> usize {
    fs::read_dir(dir).map(|entries| entries.count()).unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_verify_all_zeros() {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(&[0u8; 1000]).unwrap();
        file.flush().unwrap();

        assert!(verify_all_zeros(file.path()).unwrap());
    }

    #[test]
    fn test_verify_filled_with_detects_stray_byte() {
        let mut file = NamedTempFile::new().unwrap();
        let mut data = vec![0xFFu8; 5000];
        data[4500] = 0x00;
        file.write_all(&data).unwrap();
        file.flush().unwrap();

        assert!(!verify_filled_with(file.path(), 0xFF).unwrap());
    }

    #[test]
    fn test_entropy_of_constant_file_is_zero() {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(&[0x42u8; 1000]).unwrap();
        file.flush().unwrap();

        assert_eq!(calculate_file_entropy(file.path()).unwrap(), 0.0);
    }
}
