/// Tests for the flash erase path (unlink + TRIM hint)
use super::trim::*;
use crate::WipeError;
use std::fs;
use tempfile::TempDir;

#[test]
fn test_erase_file_unlinks() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("photo.jpg");
    fs::write(&path, b"jpeg bytes").unwrap();

    let outcome = TrimOperations::erase_file(&path).expect("Unlink should succeed");

    assert!(!path.exists(), "File must be gone after erase");
    // fstrim usually needs privileges; either way the erase succeeded
    assert!(matches!(
        outcome,
        TrimOutcome::Issued { .. } | TrimOutcome::Automatic | TrimOutcome::Failed(_)
    ));
}

#[test]
fn test_erase_missing_file_is_fatal() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("gone.txt");

    let result = TrimOperations::erase_file(&path);
    assert!(matches!(result, Err(WipeError::Io { .. })));
}

#[test]
fn test_erase_leaves_siblings() {
    let dir = TempDir::new().unwrap();
    let target = dir.path().join("a");
    let sibling = dir.path().join("b");
    fs::write(&target, b"a").unwrap();
    fs::write(&sibling, b"b").unwrap();

    TrimOperations::erase_file(&target).unwrap();

    assert!(!target.exists());
    assert_eq!(fs::read(&sibling).unwrap(), b"b");
}

#[test]
fn test_outcome_failure_flag() {
    assert!(TrimOutcome::Failed("no fstrim".to_string()).is_failure());
    assert!(!TrimOutcome::Automatic.is_failure());
    assert!(!TrimOutcome::Issued {
        target: "/".to_string()
    }
    .is_failure());
}
