//! Backup engine: create, list and restore versioned archives.
//!
//! The backup directory is flat and is the only source of truth: records
//! are rebuilt on every scan by parsing archive file names, no index file
//! is kept. One engine instance per directory, one operation at a time;
//! concurrent creates for the same name can leave more versions than the
//! retention count allows.

use crate::backup::archive::ArchiveFormat;
use crate::backup::format_bytes;
use crate::backup::naming;
use crate::backup::result_error::error::Error;
use crate::backup::result_error::result::Result;
use crate::backup::result_error::WithArchivePath;
use crate::backup::retention::RetentionPolicy;
use bon::Builder;
use chrono::{Local, NaiveDateTime};
use getset::Getters;
use itertools::Itertools;
use serde::Serialize;
use std::cmp::Reverse;
use std::ffi::OsStr;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::SystemTime;
use tracing::{error, info};

/// One archived version of a logical backup name.
#[derive(Clone, Debug, Serialize)]
pub struct BackupRecord {
    pub logical_name: String,
    pub timestamp: NaiveDateTime,
    pub path: PathBuf,
    pub size_bytes: u64,
    pub format: ArchiveFormat,
    #[serde(skip)]
    modified: SystemTime,
}

/// Versioned backup engine operating on one backup directory.
#[derive(Builder, Getters, Clone, Debug)]
#[getset(get = "pub")]
pub struct BackupEngine {
    /// Directory all archives for all logical names live in. Created on
    /// first use.
    #[builder(into)]
    backup_dir: PathBuf,
    /// Container format used by `create`.
    #[builder(default)]
    format: ArchiveFormat,
    /// Retention applied after every successful create.
    #[builder(default)]
    retention: RetentionPolicy,
}

impl BackupEngine {
    /// Creates a timestamped archive of `source` and prunes old versions.
    ///
    /// The backup name defaults to the source's base name. Two creates for
    /// the same name within one second collide and the later write wins.
    pub fn create(&self, source: &Path, name: Option<&str>) -> Result<BackupRecord> {
        if !source.exists() {
            return Err(Error::SourceNotFound(source.to_path_buf()));
        }
        let source = fs::canonicalize(source)?;

        let logical_name = match name {
            Some(n) => n.to_string(),
            None => source
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .ok_or_else(|| Error::InvalidName {
                    name: source.display().to_string(),
                    reason: "cannot derive a backup name from the source path".to_string(),
                })?,
        };

        let timestamp = Local::now().naive_local();
        let file_name = naming::file_name(&logical_name, timestamp, self.format)?;

        fs::create_dir_all(&self.backup_dir)?;
        let target = self.backup_dir.join(&file_name);
        self.write_staged(&source, &target)?;

        let metadata = fs::metadata(&target)?;
        info!(
            "Backup created: {} ({})",
            file_name,
            format_bytes(metadata.len())
        );

        let deleted = self
            .retention
            .prune(self.candidates(Some(logical_name.as_str()))?);
        if !deleted.is_empty() {
            info!(
                "Pruned {} old version(s) of {:?}",
                deleted.len(),
                logical_name
            );
        }

        Ok(BackupRecord {
            logical_name,
            timestamp,
            size_bytes: metadata.len(),
            format: self.format,
            modified: metadata.modified()?,
            path: target,
        })
    }

    /// Lists archived versions, newest first, optionally filtered by name.
    ///
    /// Entries whose file name does not follow the naming scheme are
    /// skipped. A missing backup directory yields an empty list.
    pub fn list(&self, name: Option<&str>) -> Result<Vec<BackupRecord>> {
        Ok(self
            .candidates(name)?
            .iter()
            .filter_map(|path| record(path))
            .sorted_unstable_by_key(|r| {
                Reverse((
                    r.modified,
                    r.path.file_name().map(OsStr::to_os_string).unwrap_or_default(),
                ))
            })
            .collect())
    }

    /// Restores `archive` into `destination`, choosing the codec from the
    /// archive's file name.
    ///
    /// Never panics and never propagates: every failure is logged and
    /// reported as `false` so interactive callers degrade gracefully.
    pub fn restore(&self, archive: &Path, destination: &Path) -> bool {
        match self.try_restore(archive, destination) {
            Ok(()) => {
                info!("Restored {:?} to {:?}", archive, destination);
                true
            }
            Err(e) => {
                error!("Failed to restore backup: {e}");
                false
            }
        }
    }

    fn try_restore(&self, archive: &Path, destination: &Path) -> Result<()> {
        if !archive.exists() {
            return Err(Error::ArchiveNotFound(archive.to_path_buf()));
        }

        let format = ArchiveFormat::sniff(
            archive
                .file_name()
                .map(|n| n.to_string_lossy())
                .unwrap_or_default(),
        );
        format.read(archive, destination).while_reading(archive)
    }

    /// Stages the archive next to its final name and renames it into place
    /// on success; a failed write leaves no partial archive behind.
    fn write_staged(&self, source: &Path, target: &Path) -> Result<()> {
        let mut tmp = target.as_os_str().to_os_string();
        tmp.push(".tmp");
        let tmp = PathBuf::from(tmp);

        let res = self
            .format
            .write(source, &tmp)
            .and_then(|()| fs::rename(&tmp, target).map_err(Error::from));
        if res.is_err() {
            let _ = if tmp.is_dir() {
                fs::remove_dir_all(&tmp)
            } else {
                fs::remove_file(&tmp)
            };
        }
        res.while_writing(target)
    }

    /// Directory entries belonging to `name`, or every entry when no name
    /// is given. Ordering is left to the caller.
    fn candidates(&self, name: Option<&str>) -> Result<Vec<PathBuf>> {
        let matcher = name.map(naming::candidate_matcher).transpose()?;

        let entries = match fs::read_dir(&self.backup_dir) {
            Ok(entries) => entries,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(e.into()),
        };

        let mut out = Vec::new();
        for entry in entries {
            let entry = entry?;
            let file_name = entry.file_name();
            if matcher
                .as_ref()
                .map_or(true, |m| m.is_match(Path::new(&file_name)))
            {
                out.push(entry.path());
            }
        }
        Ok(out)
    }
}

fn record(path: &Path) -> Option<BackupRecord> {
    let file_name = path.file_name()?.to_str()?;
    let (logical_name, timestamp, format) = naming::parse_file_name(file_name)?;
    let metadata = fs::metadata(path).ok()?;
    Some(BackupRecord {
        logical_name,
        timestamp,
        path: path.to_path_buf(),
        size_bytes: metadata.len(),
        format,
        modified: metadata.modified().ok()?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn engine(temp_dir: &TempDir, format: ArchiveFormat, keep: usize) -> BackupEngine {
        BackupEngine::builder()
            .backup_dir(temp_dir.path().join("backups"))
            .format(format)
            .retention(keep.into())
            .build()
    }

    fn make_source(temp_dir: &TempDir) -> PathBuf {
        let src = temp_dir.path().join("project");
        fs::create_dir_all(src.join("sub")).unwrap();
        fs::write(src.join("a.txt"), "alpha").unwrap();
        fs::write(src.join("sub/b.txt"), "beta").unwrap();
        src
    }

    #[test]
    fn test_create_zip_record() {
        let temp_dir = TempDir::new().unwrap();
        let src = make_source(&temp_dir);
        let engine = engine(&temp_dir, ArchiveFormat::Zip, 3);

        let record = engine.create(&src, None).unwrap();

        assert_eq!(record.logical_name, "project");
        assert_eq!(record.format, ArchiveFormat::Zip);
        assert!(record.size_bytes > 0);
        assert!(record.path.exists());
        assert!(record
            .path
            .file_name()
            .unwrap()
            .to_str()
            .unwrap()
            .ends_with(".zip"));
    }

    #[test]
    fn test_create_missing_source_has_no_side_effects() {
        let temp_dir = TempDir::new().unwrap();
        let engine = engine(&temp_dir, ArchiveFormat::Zip, 3);

        let err = engine
            .create(&temp_dir.path().join("missing"), None)
            .unwrap_err();
        match err {
            Error::SourceNotFound(_) => (),
            other => panic!("Expected SourceNotFound, got {other:?}"),
        }
        assert!(!engine.backup_dir().exists());
    }

    #[test]
    fn test_create_invalid_name_fails_before_io() {
        let temp_dir = TempDir::new().unwrap();
        let src = make_source(&temp_dir);
        let engine = engine(&temp_dir, ArchiveFormat::Zip, 3);

        let err = engine.create(&src, Some("pro*ject")).unwrap_err();
        match err {
            Error::InvalidName { .. } => (),
            other => panic!("Expected InvalidName, got {other:?}"),
        }
        assert!(!engine.backup_dir().exists());
    }

    #[test]
    fn test_create_twice_with_keep_one() {
        let temp_dir = TempDir::new().unwrap();
        let src = make_source(&temp_dir);
        let engine = engine(&temp_dir, ArchiveFormat::Zip, 1);

        engine.create(&src, Some("proj")).unwrap();
        std::thread::sleep(std::time::Duration::from_millis(50));
        engine.create(&src, Some("proj")).unwrap();

        let records = engine.list(Some("proj")).unwrap();
        assert_eq!(records.len(), 1);

        let on_disk: Vec<_> = fs::read_dir(engine.backup_dir())
            .unwrap()
            .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
            .filter(|n| n.starts_with("proj_") && n.ends_with(".zip"))
            .collect();
        assert_eq!(on_disk.len(), 1);
    }

    #[test]
    fn test_retention_bounds_listing() {
        let temp_dir = TempDir::new().unwrap();
        let src = make_source(&temp_dir);
        let engine = engine(&temp_dir, ArchiveFormat::Tar, 2);

        for _ in 0..4 {
            engine.create(&src, Some("proj")).unwrap();
            std::thread::sleep(std::time::Duration::from_millis(50));
        }

        let records = engine.list(Some("proj")).unwrap();
        assert_eq!(records.len(), 2);
        // newest first
        assert!(records[0].modified >= records[1].modified);
    }

    #[test]
    fn test_keep_zero_leaves_nothing() {
        let temp_dir = TempDir::new().unwrap();
        let src = make_source(&temp_dir);
        let engine = engine(&temp_dir, ArchiveFormat::Zip, 0);

        engine.create(&src, Some("proj")).unwrap();

        assert!(engine.list(Some("proj")).unwrap().is_empty());
    }

    #[test]
    fn test_list_filters_by_name() {
        let temp_dir = TempDir::new().unwrap();
        let src = make_source(&temp_dir);
        let engine = engine(&temp_dir, ArchiveFormat::Zip, 5);

        engine.create(&src, Some("alpha")).unwrap();
        engine.create(&src, Some("beta")).unwrap();

        assert_eq!(engine.list(Some("alpha")).unwrap().len(), 1);
        assert_eq!(engine.list(Some("beta")).unwrap().len(), 1);
        assert_eq!(engine.list(None).unwrap().len(), 2);
    }

    #[test]
    fn test_list_skips_foreign_files() {
        let temp_dir = TempDir::new().unwrap();
        let src = make_source(&temp_dir);
        let engine = engine(&temp_dir, ArchiveFormat::Zip, 5);

        engine.create(&src, Some("proj")).unwrap();
        fs::write(engine.backup_dir().join("README.md"), "not a backup").unwrap();

        assert_eq!(engine.list(None).unwrap().len(), 1);
    }

    #[test]
    fn test_list_missing_backup_dir() {
        let temp_dir = TempDir::new().unwrap();
        let engine = engine(&temp_dir, ArchiveFormat::Zip, 5);

        assert!(engine.list(None).unwrap().is_empty());
    }

    #[test]
    fn test_round_trip_every_format() {
        for format in [
            ArchiveFormat::None,
            ArchiveFormat::Zip,
            ArchiveFormat::Tar,
            ArchiveFormat::TarGz,
        ] {
            let temp_dir = TempDir::new().unwrap();
            let src = make_source(&temp_dir);
            let engine = engine(&temp_dir, format, 3);

            let record = engine.create(&src, Some("proj")).unwrap();
            let dest = temp_dir.path().join("restored");
            assert!(engine.restore(&record.path, &dest), "format {format}");

            // plain copies restore the tree itself, containers restore a
            // top-level folder named after the source
            let root = match format {
                ArchiveFormat::None => dest.clone(),
                _ => dest.join("project"),
            };
            assert_eq!(
                fs::read_to_string(root.join("a.txt")).unwrap(),
                "alpha",
                "format {format}"
            );
            assert_eq!(
                fs::read_to_string(root.join("sub/b.txt")).unwrap(),
                "beta",
                "format {format}"
            );
        }
    }

    #[test]
    fn test_restore_single_file_zip() {
        let temp_dir = TempDir::new().unwrap();
        let src = temp_dir.path().join("notes.txt");
        fs::write(&src, "important").unwrap();
        let engine = engine(&temp_dir, ArchiveFormat::Zip, 3);

        let record = engine.create(&src, None).unwrap();
        let dest = temp_dir.path().join("restored");
        assert!(engine.restore(&record.path, &dest));
        assert_eq!(fs::read_to_string(dest.join("notes.txt")).unwrap(), "important");
    }

    #[test]
    fn test_restore_missing_archive_returns_false() {
        let temp_dir = TempDir::new().unwrap();
        let engine = engine(&temp_dir, ArchiveFormat::Zip, 3);

        assert!(!engine.restore(
            &temp_dir.path().join("nope_20250101_120000.zip"),
            &temp_dir.path().join("out"),
        ));
    }

    #[test]
    fn test_restore_corrupt_archive_returns_false() {
        let temp_dir = TempDir::new().unwrap();
        let engine = engine(&temp_dir, ArchiveFormat::Zip, 3);

        let bogus = temp_dir.path().join("broken_20250101_120000.zip");
        fs::write(&bogus, "garbage").unwrap();

        assert!(!engine.restore(&bogus, &temp_dir.path().join("out")));
    }

    #[test]
    fn test_failed_write_leaves_no_staging_file() {
        let temp_dir = TempDir::new().unwrap();
        let engine = engine(&temp_dir, ArchiveFormat::Zip, 3);
        fs::create_dir_all(engine.backup_dir()).unwrap();

        // a directory squatting on the target path makes the rename fail
        let src = temp_dir.path().join("notes.txt");
        fs::write(&src, "x").unwrap();
        let target = engine.backup_dir().join("blocked.zip");
        fs::create_dir_all(&target).unwrap();

        assert!(engine.write_staged(&src, &target).is_err());
        let mut tmp = target.as_os_str().to_os_string();
        tmp.push(".tmp");
        assert!(!PathBuf::from(tmp).exists());
    }
}
