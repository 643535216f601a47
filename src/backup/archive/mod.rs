pub mod copy;
pub mod tar;
pub mod zip;

use crate::backup::file_ext::FileExtProvider;
use crate::backup::result_error::error::Error;
use crate::backup::result_error::result::Result;
use clap::ValueEnum;
use derive_more::Display;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Container format of a backup archive
///
/// This enum represents the different ways a source can be serialized into
/// an archive:
/// - None: plain copy of the file or directory tree, no container
/// - Zip: deflate-compressed ZIP container
/// - Tar/TarGz: TAR container, optionally gzip-framed
///
/// The variant is selected once at the engine boundary; every operation
/// dispatches on it instead of re-inspecting strings.
#[derive(
    ValueEnum, Display, Clone, Copy, Default, PartialEq, Eq, Debug, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum ArchiveFormat {
    #[display("none")]
    None,
    #[default]
    #[display("zip")]
    Zip,
    #[display("tar")]
    Tar,
    #[serde(rename = "tar.gz")]
    #[value(name = "tar.gz")]
    #[display("tar.gz")]
    TarGz,
}

impl FileExtProvider for ArchiveFormat {
    fn file_ext(&self) -> Option<&'static str> {
        match self {
            ArchiveFormat::None => None,
            ArchiveFormat::Zip => Some("zip"),
            ArchiveFormat::Tar => Some("tar"),
            ArchiveFormat::TarGz => Some("tar.gz"),
        }
    }
}

impl ArchiveFormat {
    /// Picks the codec for an existing archive from its file name.
    ///
    /// `.zip` wins, then any name carrying a `.tar` component (gzip framing
    /// is detected from the content, not the name), everything else is
    /// treated as a plain copy.
    pub fn sniff<S: AsRef<str>>(file_name: S) -> ArchiveFormat {
        let file_name = file_name.as_ref();
        if file_name.ends_with(".zip") {
            ArchiveFormat::Zip
        } else if file_name.contains(".tar") {
            ArchiveFormat::Tar
        } else {
            ArchiveFormat::None
        }
    }

    /// Writes `source` (a file or a directory tree) into the archive at
    /// `dest`.
    pub fn write(&self, source: &Path, dest: &Path) -> Result<()> {
        if !source.exists() {
            return Err(Error::SourceNotFound(source.to_path_buf()));
        }

        match self {
            ArchiveFormat::None => copy::write(source, dest),
            ArchiveFormat::Zip => zip::write(source, dest),
            ArchiveFormat::Tar => tar::write(source, dest, false),
            ArchiveFormat::TarGz => tar::write(source, dest, true),
        }
    }

    /// Extracts the archive at `archive` into `dest`.
    pub fn read(&self, archive: &Path, dest: &Path) -> Result<()> {
        if !archive.exists() {
            return Err(Error::ArchiveNotFound(archive.to_path_buf()));
        }

        match self {
            ArchiveFormat::None => copy::read(archive, dest),
            ArchiveFormat::Zip => zip::read(archive, dest),
            ArchiveFormat::Tar | ArchiveFormat::TarGz => tar::read(archive, dest),
        }
    }
}

/// Base name the source is anchored under inside an archive.
pub(crate) fn base_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default()
}
