#![allow(dead_code)]

/// Common test utilities for integration tests
///
/// This module provides shared functionality for integration tests including:
/// - File content verification helpers
/// - Directory tree fixtures
/// - Fixed media probes and a recording overwrite engine

pub mod fixtures;
pub mod test_helpers;
