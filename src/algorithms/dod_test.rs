/// Tests for the 3-pass file overwrite
///
/// Tests verify:
/// - Pass sequence and constants (0x00, 0xFF, random)
/// - On-disk content after every pass
/// - Size preservation and chunk boundaries
/// - Empty and missing files

#[cfg(test)]
mod dod_algorithm_tests {
    use crate::algorithms::{DoDWipe, Overwrite, OverwritePattern};
    use crate::WipeError;
    use std::fs;
    use std::io::Write;
    use tempfile::{NamedTempFile, TempDir};

    fn entropy(data: &[u8]) -> f64 {
        let mut counts = [0u64; 256];
        for &byte in data {
            counts[byte as usize] += 1;
        }

        let length = data.len() as f64;
        counts
            .iter()
            .filter(|&&c| c > 0)
            .map(|&c| {
                let p = c as f64 / length;
                -p * p.log2()
            })
            .sum()
    }

    fn file_with(content: &[u8]) -> NamedTempFile {
        let mut file = NamedTempFile::new().expect("Failed to create temp file");
        file.write_all(content).unwrap();
        file.flush().unwrap();
        file
    }

    #[test]
    fn test_dod_constants() {
        assert_eq!(DoDWipe::PASS_COUNT, 3, "DoD 5220.22-M requires exactly 3 passes");
        assert_eq!(DoDWipe::PASS_1_PATTERN, 0x00);
        assert_eq!(DoDWipe::PASS_2_PATTERN, 0xFF);
        assert_eq!(DoDWipe::CHUNK_SIZE, 65536);
        assert_eq!(OverwritePattern::SEQUENCE.len(), DoDWipe::PASS_COUNT);
    }

    #[test]
    fn test_pattern_sequence_order() {
        assert_eq!(
            OverwritePattern::SEQUENCE,
            [
                OverwritePattern::Zeros,
                OverwritePattern::Ones,
                OverwritePattern::Random
            ]
        );
        assert_eq!(OverwritePattern::Zeros.fill_byte(), Some(0x00));
        assert_eq!(OverwritePattern::Ones.fill_byte(), Some(0xFF));
        assert_eq!(OverwritePattern::Random.fill_byte(), None);
    }

    #[test]
    fn test_content_after_each_pass() {
        // Spans several chunks plus a partial tail
        let size = DoDWipe::CHUNK_SIZE * 3 + 1234;
        let original = vec![0x5Au8; size];
        let file = file_with(&original);
        let path = file.path().to_path_buf();

        let mut seen = Vec::new();
        DoDWipe::overwrite_file_with_progress(&path, |pass| {
            let data = fs::read(&path).unwrap();
            assert_eq!(data.len(), size, "Size must not change in pass {}", pass);

            match pass {
                1 => assert!(data.iter().all(|&b| b == 0x00), "Pass 1 must leave zeros"),
                2 => assert!(data.iter().all(|&b| b == 0xFF), "Pass 2 must leave 0xFF"),
                3 => {
                    let e = entropy(&data);
                    assert!(e > 7.9, "Pass 3 should look random, entropy was {}", e);
                }
                _ => panic!("Unexpected pass {}", pass),
            }
            seen.push(pass);
        })
        .expect("Overwrite should succeed");

        assert_eq!(seen, vec![1, 2, 3]);
        assert_ne!(fs::read(&path).unwrap(), original);
    }

    #[test]
    fn test_size_unchanged_for_small_file() {
        let file = file_with(b"secret");
        DoDWipe::overwrite_file(file.path()).unwrap();

        let data = fs::read(file.path()).unwrap();
        assert_eq!(data.len(), 6);
        assert_ne!(&data[..], b"secret");
    }

    #[test]
    fn test_empty_file_skips_pass_loop() {
        let file = NamedTempFile::new().unwrap();
        let mut passes = 0;

        DoDWipe::overwrite_file_with_progress(file.path(), |_| passes += 1)
            .expect("Empty file is a no-op success");

        assert_eq!(passes, 0, "No pass should run for a zero-length file");
        assert_eq!(fs::metadata(file.path()).unwrap().len(), 0);
    }

    #[test]
    fn test_missing_file_fails() {
        let dir = TempDir::new().unwrap();
        let missing = dir.path().join("missing.bin");

        let err = DoDWipe.overwrite(&missing).unwrap_err();
        assert!(matches!(err, WipeError::Io { .. }));
    }

    #[test]
    fn test_overwrite_does_not_unlink() {
        let file = file_with(&[1u8; 4096]);
        DoDWipe.overwrite(file.path()).unwrap();
        assert!(file.path().exists(), "Engine must leave unlinking to the caller");
    }

    #[test]
    fn test_exact_chunk_multiple() {
        let file = file_with(&vec![7u8; DoDWipe::CHUNK_SIZE * 2]);
        let mut passes = Vec::new();
        DoDWipe::overwrite_file_with_progress(file.path(), |p| passes.push(p)).unwrap();

        assert_eq!(passes, vec![1, 2, 3]);
        assert_eq!(
            fs::metadata(file.path()).unwrap().len(),
            (DoDWipe::CHUNK_SIZE * 2) as u64
        );
    }

    /// In-memory target whose writes fail once `limit` bytes have gone through
    struct FailingTarget {
        inner: std::io::Cursor<Vec<u8>>,
        total: u64,
        limit: u64,
    }

    impl Write for FailingTarget {
        fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
            if self.total + buf.len() as u64 > self.limit {
                return Err(std::io::Error::other("device write error"));
            }
            self.total += buf.len() as u64;
            self.inner.write(buf)
        }

        fn flush(&mut self) -> std::io::Result<()> {
            self.inner.flush()
        }
    }

    impl std::io::Seek for FailingTarget {
        fn seek(&mut self, pos: std::io::SeekFrom) -> std::io::Result<u64> {
            self.inner.seek(pos)
        }
    }

    #[test]
    fn test_write_error_mid_sequence_stops_remaining_passes() {
        let size = 1000u64;
        let mut target = FailingTarget {
            inner: std::io::Cursor::new(vec![0x5Au8; size as usize]),
            total: 0,
            limit: size + size / 2,
        };
        let mut passes = Vec::new();
        let mut syncs = 0;

        let result = DoDWipe::run_passes(
            &mut target,
            size,
            |_| {
                syncs += 1;
                Ok(())
            },
            &mut |p| passes.push(p),
        );

        let (failed_pass, err) = result.unwrap_err();
        assert_eq!(failed_pass, 2);
        assert_eq!(err.to_string(), "device write error");
        assert_eq!(passes, vec![1], "Pass 3 must never run");
        assert_eq!(syncs, 1);
        assert!(target.inner.get_ref().iter().all(|&b| b == 0x00));
    }

    #[test]
    fn test_sync_error_is_reported_for_its_pass() {
        let size = 64u64;
        let mut target = std::io::Cursor::new(vec![0u8; size as usize]);
        let mut passes = Vec::new();
        let mut syncs = 0;

        let result = DoDWipe::run_passes(
            &mut target,
            size,
            |_| {
                syncs += 1;
                if syncs == 3 {
                    Err(std::io::Error::other("flush to media failed"))
                } else {
                    Ok(())
                }
            },
            &mut |p| passes.push(p),
        );

        assert_eq!(result.unwrap_err().0, 3);
        assert_eq!(passes, vec![1, 2]);
    }
}
