//! Archive file naming: `{name}_{timestamp}{extension}`.
//!
//! The embedded timestamp is second-resolution and lexicographically
//! sortable, so the rendered names order the same way the creation times do.

use crate::backup::archive::ArchiveFormat;
use crate::backup::file_ext::FileExtProvider;
use crate::backup::result_error::error::Error;
use crate::backup::result_error::result::Result;
use crate::backup::validate::validate_backup_name;
use chrono::NaiveDateTime;
use globset::{GlobBuilder, GlobMatcher};

pub const TIME_FORMAT: &str = "%Y%m%d_%H%M%S";

/// Rendered length of [`TIME_FORMAT`].
const TIME_LEN: usize = 15;

/// Builds the archive file name for one version of `name`.
pub fn file_name(name: &str, timestamp: NaiveDateTime, format: ArchiveFormat) -> Result<String> {
    validate_name(name)?;
    let ext = format
        .file_ext()
        .map(|e| format!(".{e}"))
        .unwrap_or_default();
    Ok(format!("{}_{}{}", name, timestamp.format(TIME_FORMAT), ext))
}

/// Splits an archive file name back into logical name, timestamp and format.
///
/// Returns `None` for entries that do not follow the naming scheme; a
/// directory scan uses this to skip foreign files.
pub fn parse_file_name(file_name: &str) -> Option<(String, NaiveDateTime, ArchiveFormat)> {
    let format = ArchiveFormat::sniff(file_name);
    let stem = match format.file_ext() {
        Some(ext) => file_name.strip_suffix(ext)?.strip_suffix('.')?,
        None => file_name,
    };

    if stem.len() < TIME_LEN + 2 {
        return None;
    }
    let split = stem.len() - TIME_LEN - 1;
    let name = stem.get(..split)?;
    let rest = stem.get(split..)?;

    let time_str = rest.strip_prefix('_')?;
    let timestamp = NaiveDateTime::parse_from_str(time_str, TIME_FORMAT).ok()?;
    Some((name.to_string(), timestamp, format))
}

/// Glob matcher covering every archive that belongs to `name`.
pub fn candidate_matcher(name: &str) -> Result<GlobMatcher> {
    validate_name(name)?;
    let glob = GlobBuilder::new(&format!("{name}_*"))
        .literal_separator(true)
        .build()?;
    Ok(glob.compile_matcher())
}

pub fn validate_name(name: &str) -> Result<()> {
    validate_backup_name(name).map_err(|e| Error::InvalidName {
        name: name.to_string(),
        reason: e
            .message
            .map(|m| m.into_owned())
            .unwrap_or_else(|| e.code.into_owned()),
    })
}
