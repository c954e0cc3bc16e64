pub mod dod;

#[cfg(test)]
mod dod_test;

pub use dod::DoDWipe;

use crate::WipeResult;
use rand::RngCore;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// One pass of the fixed overwrite sequence
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum OverwritePattern {
    Zeros,
    Ones,
    Random,
}

impl OverwritePattern {
    /// Zero fill, one fill, random fill. Not configurable.
    pub const SEQUENCE: [OverwritePattern; 3] = [
        OverwritePattern::Zeros,
        OverwritePattern::Ones,
        OverwritePattern::Random,
    ];

    /// Constant byte for fixed patterns, `None` for random fill
    pub fn fill_byte(&self) -> Option<u8> {
        match self {
            OverwritePattern::Zeros => Some(DoDWipe::PASS_1_PATTERN),
            OverwritePattern::Ones => Some(DoDWipe::PASS_2_PATTERN),
            OverwritePattern::Random => None,
        }
    }

    /// Fill a chunk for this pass
    pub fn fill<R: RngCore>(&self, chunk: &mut [u8], rng: &mut R) {
        match self.fill_byte() {
            Some(byte) => chunk.fill(byte),
            None => rng.fill_bytes(chunk),
        }
    }
}

/// In-place content overwrite of a single regular file
#[cfg_attr(test, mockall::automock)]
pub trait Overwrite: Send + Sync {
    fn overwrite(&self, path: &Path) -> WipeResult<()>;
}
