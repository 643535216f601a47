//! On-disk configuration: defaults for the backup directory, container
//! format and retention count.

use crate::backup::archive::ArchiveFormat;
use crate::backup::engine::BackupEngine;
use crate::backup::result_error::result::Result;
use crate::backup::validate::validate_backup_dir;
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::path::{Path, PathBuf};
use validator::Validate;

#[derive(Clone, Debug, Serialize, Deserialize, Validate)]
#[serde(deny_unknown_fields)]
pub struct BackupConfig {
    #[serde(default = "default_backup_dir")]
    #[validate(custom(function = validate_backup_dir))]
    pub backup_dir: PathBuf,
    #[serde(default)]
    pub compression: ArchiveFormat,
    #[serde(default = "default_keep_versions")]
    pub keep_versions: usize,
}

fn default_backup_dir() -> PathBuf {
    PathBuf::from("backups")
}

fn default_keep_versions() -> usize {
    5
}

impl Default for BackupConfig {
    fn default() -> Self {
        Self {
            backup_dir: default_backup_dir(),
            compression: ArchiveFormat::default(),
            keep_versions: default_keep_versions(),
        }
    }
}

impl BackupConfig {
    /// Reads and validates a YAML config file.
    pub fn load(path: &Path) -> Result<Self> {
        let config: BackupConfig = serde_yml::from_reader(File::open(path)?)?;
        config.validate()?;
        Ok(config)
    }

    /// Builds an engine from these defaults; `compression` overrides the
    /// configured format for one run.
    pub fn engine(&self, compression: Option<ArchiveFormat>) -> BackupEngine {
        BackupEngine::builder()
            .backup_dir(self.backup_dir.clone())
            .format(compression.unwrap_or(self.compression))
            .retention(self.keep_versions.into())
            .build()
    }
}
