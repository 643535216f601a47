use crate::backup::compress::{Compressor, Decompressor};
use crate::backup::result_error::result::Result;
use std::fs::File;
use std::io::{BufReader, BufWriter, IntoInnerError};
use std::path::Path;

/// Writes `source` as a TAR archive at `dest`, gzip-framed when `gzip` is
/// set.
///
/// The whole source (file or directory) is added as one entry tree rooted
/// at its base name.
pub fn write(source: &Path, dest: &Path, gzip: bool) -> Result<()> {
    let file = BufWriter::new(File::create(dest)?);
    let compressor = if gzip {
        Compressor::gzip(file)
    } else {
        Compressor::Plain(file)
    };

    let mut writer = tar::Builder::new(BufWriter::new(compressor));
    writer.follow_symlinks(true);

    let base = super::base_name(source);
    if source.is_dir() {
        writer.append_dir_all(&base, source)?;
    } else {
        writer.append_path_with_name(source, &base)?;
    }

    writer
        .into_inner()?
        .into_inner()
        .map_err(IntoInnerError::into_error)?
        .finish()?
        .into_inner()
        .map_err(IntoInnerError::into_error)?;

    Ok(())
}

/// Extracts all members of `archive` into `dest`.
///
/// Gzip framing is detected from the container header, so a mislabelled
/// `.tar` holding gzip data still extracts.
pub fn read(archive: &Path, dest: &Path) -> Result<()> {
    let reader = Decompressor::sniff(BufReader::new(File::open(archive)?))?;
    std::fs::create_dir_all(dest)?;
    tar::Archive::new(reader).unpack(dest)?;
    Ok(())
}
