use crate::backup::result_error::error::Error;
use derive_more::From;
use getset::CopyGetters;
use itertools::Itertools;
use std::cmp::Reverse;
use std::ffi::OsStr;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::SystemTime;
use tracing::{info, warn};

/// How many archived versions of each logical name survive a prune.
const DEFAULT_KEEP_VERSIONS: usize = 5;

#[derive(Clone, Copy, Debug, PartialEq, Eq, From, CopyGetters)]
#[getset(get_copy = "pub")]
pub struct RetentionPolicy {
    keep_versions: usize,
}

impl Default for RetentionPolicy {
    fn default() -> Self {
        DEFAULT_KEEP_VERSIONS.into()
    }
}

impl RetentionPolicy {
    /// Deletes every candidate beyond the newest `keep_versions`.
    ///
    /// Candidates are ordered by modification time descending, with the file
    /// name as tie breaker (later embedded timestamps sort later). Returns
    /// the paths that were actually removed. A failed deletion is logged and
    /// skipped, the prune keeps going.
    pub fn prune(&self, candidates: Vec<PathBuf>) -> Vec<PathBuf> {
        candidates
            .into_iter()
            .map(|path| {
                let modified = fs::metadata(&path)
                    .and_then(|md| md.modified())
                    .unwrap_or(SystemTime::UNIX_EPOCH);
                let name = path.file_name().map(OsStr::to_os_string).unwrap_or_default();
                (path, modified, name)
            })
            .sorted_unstable_by_key(|(_, modified, name)| Reverse((*modified, name.clone())))
            .skip(self.keep_versions)
            .filter_map(|(path, _, _)| match delete(&path) {
                Ok(()) => {
                    info!("Removed old backup: {:?}", path);
                    Some(path)
                }
                Err(source) => {
                    warn!(
                        "{}",
                        Error::PruneDelete {
                            path: path.clone(),
                            source,
                        }
                    );
                    None
                }
            })
            .collect()
    }
}

/// Archives made with the plain-copy format can be directories.
fn delete(path: &Path) -> std::io::Result<()> {
    if path.is_dir() {
        fs::remove_dir_all(path)
    } else {
        fs::remove_file(path)
    }
}
