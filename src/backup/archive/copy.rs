use crate::backup::result_error::result::Result;
use std::fs;
use std::io;
use std::path::Path;
use walkdir::WalkDir;

/// Copies `source` to `dest`, file to file or tree to tree.
pub fn write(source: &Path, dest: &Path) -> Result<()> {
    if source.is_dir() {
        copy_tree(source, dest)
    } else {
        fs::copy(source, dest)?;
        Ok(())
    }
}

/// Inverse of [`write`]: copy a file back, or merge a tree into `dest`.
///
/// A file restored into an existing directory lands inside it under the
/// archive's own name.
pub fn read(archive: &Path, dest: &Path) -> Result<()> {
    if archive.is_dir() {
        return copy_tree(archive, dest);
    }

    let target = if dest.is_dir() {
        dest.join(super::base_name(archive))
    } else {
        if let Some(parent) = dest.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }
        dest.to_path_buf()
    };
    fs::copy(archive, target)?;
    Ok(())
}

fn copy_tree(src: &Path, dst: &Path) -> Result<()> {
    for entry in WalkDir::new(src).follow_links(true) {
        let entry = entry?;
        let rel = entry.path().strip_prefix(src).map_err(io::Error::other)?;
        let target = dst.join(rel);
        if entry.file_type().is_dir() {
            fs::create_dir_all(&target)?;
        } else {
            if let Some(parent) = target.parent() {
                fs::create_dir_all(parent)?;
            }
            fs::copy(entry.path(), &target)?;
        }
    }
    Ok(())
}
