use std::path::Path;

pub mod error;
pub mod result;

/// Attaches the archive path a low-level failure belongs to, classifying it
/// as a write-side or read-side archive error.
pub trait WithArchivePath {
    fn while_writing(self, path: &Path) -> Self;
    fn while_reading(self, path: &Path) -> Self;
}
