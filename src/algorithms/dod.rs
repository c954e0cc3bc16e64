use super::{Overwrite, OverwritePattern};
use crate::{WipeError, WipeResult};
use rand::RngCore;
use std::fs::{self, File, OpenOptions};
use std::io::{self, Seek, SeekFrom, Write};
use std::path::Path;

/// DoD 5220.22-M style 3-pass file overwrite
pub struct DoDWipe;

impl DoDWipe {
    /// DoD 5220.22-M standard pass 1 pattern (all zeros)
    pub const PASS_1_PATTERN: u8 = 0x00;

    /// DoD 5220.22-M standard pass 2 pattern (all ones)
    pub const PASS_2_PATTERN: u8 = 0xFF;

    /// DoD 5220.22-M requires exactly 3 passes
    pub const PASS_COUNT: usize = 3;

    /// Upper bound on the write buffer
    pub const CHUNK_SIZE: usize = 64 * 1024;

    pub fn overwrite_file(path: &Path) -> WipeResult<()> {
        Self::overwrite_file_with_progress(path, |_| {})
    }

    /// Overwrite `path` in place. `on_pass` is called with the pass number
    /// (1..=3) once that pass has been written and synced to disk.
    pub fn overwrite_file_with_progress<F>(path: &Path, mut on_pass: F) -> WipeResult<()>
    where
        F: FnMut(usize),
    {
        let size = fs::metadata(path)
            .map_err(|e| WipeError::io(path, e))?
            .len();

        if size == 0 {
            tracing::debug!(path = %path.display(), "Empty file, nothing to overwrite");
            return Ok(());
        }

        tracing::info!(
            path = %path.display(),
            size,
            "Using DoD 5220.22-M (3-pass overwrite)"
        );

        let mut file = OpenOptions::new()
            .write(true)
            .open(path)
            .map_err(|e| WipeError::io(path, e))?;

        Self::run_passes(&mut file, size, File::sync_all, &mut on_pass).map_err(|(pass, e)| {
            tracing::error!(path = %path.display(), pass, error = %e, "Overwrite pass failed");
            WipeError::io(path, e)
        })
    }

    /// Write every pass of the sequence over the first `size` bytes of
    /// `target`, calling `sync` after each one. Stops at the first failing
    /// pass and returns its number with the error.
    pub(crate) fn run_passes<W, S, F>(
        target: &mut W,
        size: u64,
        mut sync: S,
        on_pass: &mut F,
    ) -> Result<(), (usize, io::Error)>
    where
        W: Write + Seek,
        S: FnMut(&W) -> io::Result<()>,
        F: FnMut(usize),
    {
        let mut buffer = vec![0u8; size.min(Self::CHUNK_SIZE as u64) as usize];
        let mut rng = rand::thread_rng();

        for (index, pattern) in OverwritePattern::SEQUENCE.iter().enumerate() {
            let pass = index + 1;
            tracing::debug!(pass, total = Self::PASS_COUNT, ?pattern, "Overwrite pass");

            Self::write_pass(target, size, *pattern, &mut buffer, &mut rng)
                .and_then(|_| sync(target))
                .map_err(|e| (pass, e))?;

            on_pass(pass);
        }

        Ok(())
    }

    fn write_pass<W: Write + Seek, R: RngCore>(
        file: &mut W,
        size: u64,
        pattern: OverwritePattern,
        buffer: &mut [u8],
        rng: &mut R,
    ) -> io::Result<()> {
        file.seek(SeekFrom::Start(0))?;

        // Constant patterns only need filling once per pass
        if let Some(byte) = pattern.fill_byte() {
            buffer.fill(byte);
        }

        let mut written = 0u64;
        while written < size {
            let len = (size - written).min(buffer.len() as u64) as usize;
            let chunk = &mut buffer[..len];
            if pattern.fill_byte().is_none() {
                pattern.fill(chunk, rng);
            }
            file.write_all(chunk)?;
            written += len as u64;
        }

        file.flush()
    }
}

impl Overwrite for DoDWipe {
    fn overwrite(&self, path: &Path) -> WipeResult<()> {
        Self::overwrite_file(path)
    }
}
