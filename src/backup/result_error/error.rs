use crate::backup::result_error::WithArchivePath;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Source not found: {0:?}")]
    SourceNotFound(PathBuf),
    #[error("Backup archive not found: {0:?}")]
    ArchiveNotFound(PathBuf),
    #[error("Invalid backup name {name:?}: {reason}")]
    InvalidName { name: String, reason: String },
    #[error("Writing archive {path:?} failed: {source}")]
    ArchiveWrite { path: PathBuf, source: Box<Error> },
    #[error("Reading archive {path:?} failed: {source}")]
    ArchiveRead { path: PathBuf, source: Box<Error> },
    #[error("Removing old backup {path:?} failed: {source}")]
    PruneDelete {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error(transparent)]
    Io(#[from] std::io::Error),
    #[error(transparent)]
    Zip(#[from] zip::result::ZipError),
    #[error(transparent)]
    WalkDir(#[from] walkdir::Error),
    #[error(transparent)]
    Globset(#[from] globset::Error),
    #[error(transparent)]
    ValidationError(#[from] validator::ValidationErrors),
    #[error(transparent)]
    SerdeYml(#[from] serde_yml::Error),
    #[error(transparent)]
    SerdeJson(#[from] serde_json::Error),
}

impl WithArchivePath for Error {
    fn while_writing(self, path: &Path) -> Self {
        match self {
            // validation kinds are detected before any archive I/O and keep
            // their identity
            e @ (Error::SourceNotFound(_)
            | Error::ArchiveNotFound(_)
            | Error::InvalidName { .. }) => e,
            e => Error::ArchiveWrite {
                path: path.to_path_buf(),
                source: Box::new(e),
            },
        }
    }

    fn while_reading(self, path: &Path) -> Self {
        match self {
            e @ (Error::SourceNotFound(_)
            | Error::ArchiveNotFound(_)
            | Error::InvalidName { .. }) => e,
            e => Error::ArchiveRead {
                path: path.to_path_buf(),
                source: Box::new(e),
            },
        }
    }
}
