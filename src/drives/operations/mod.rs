// Media-specific erase operations

pub mod trim; // Unlink + TRIM/discard for flash media

pub use trim::{TrimOperations, TrimOutcome};

#[cfg(test)]
mod trim_tests;
