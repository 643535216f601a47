use crate::backup::result_error::result::Result;
use itertools::Itertools;
use std::fs::File;
use std::io;
use std::io::{BufReader, BufWriter, IntoInnerError};
use std::path::Path;
use walkdir::WalkDir;
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipArchive, ZipWriter};

/// Writes `source` into a deflate-compressed ZIP at `dest`.
///
/// A single file is stored under its base name. A directory stores every
/// contained file under `{dir_name}/{relative_path}`, so extraction
/// reproduces a top-level folder named after the source.
pub fn write(source: &Path, dest: &Path) -> Result<()> {
    let mut writer = ZipWriter::new(BufWriter::new(File::create(dest)?));
    let options = SimpleFileOptions::default().compression_method(CompressionMethod::Deflated);
    let base = super::base_name(source);

    if source.is_file() {
        append_file(&mut writer, source, base, options)?;
    } else {
        for entry in WalkDir::new(source).follow_links(true) {
            let entry = entry?;
            if !entry.file_type().is_file() {
                continue;
            }
            let rel = entry.path().strip_prefix(source).map_err(io::Error::other)?;
            append_file(&mut writer, entry.path(), entry_name(&base, rel), options)?;
        }
    }

    writer
        .finish()?
        .into_inner()
        .map_err(IntoInnerError::into_error)?;
    Ok(())
}

/// Extracts all entries of `archive` into `dest`, recreating the relative
/// structure.
pub fn read(archive: &Path, dest: &Path) -> Result<()> {
    let mut zip = ZipArchive::new(BufReader::new(File::open(archive)?))?;
    std::fs::create_dir_all(dest)?;
    zip.extract(dest)?;
    Ok(())
}

fn append_file<W: io::Write + io::Seek>(
    writer: &mut ZipWriter<W>,
    path: &Path,
    name: String,
    options: SimpleFileOptions,
) -> Result<()> {
    writer.start_file(name, options)?;
    let mut reader = BufReader::new(File::open(path)?);
    io::copy(&mut reader, writer)?;
    Ok(())
}

/// ZIP entry names always use `/`, whatever the platform separator is.
fn entry_name(base: &str, rel: &Path) -> String {
    std::iter::once(base.to_owned())
        .filter(|s| !s.is_empty())
        .chain(
            rel.components()
                .map(|c| c.as_os_str().to_string_lossy().into_owned()),
        )
        .join("/")
}
