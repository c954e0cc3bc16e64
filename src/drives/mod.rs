// Drive detection and flash erase operations
//
// - detection.rs: media kind classification for the device behind a path
// - mount.rs: mount point resolution
// - operations/: erase operations that depend on the media (TRIM/discard)

pub mod detection;
pub mod mount;
pub mod operations;


pub use detection::{DriveClassifier, MediaProbe};
pub use mount::mount_point;
pub use operations::{TrimOperations, TrimOutcome};
