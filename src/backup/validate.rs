//! Validation functions for configuration values.
//!
//! Provides custom validation functions for backup names and the backup
//! directory, usable both directly and as `validator` custom functions.

use sanitize_filename::{is_sanitized, sanitize};
use validator::ValidationError;

use std::path::Path;

/// Checks that `name` is usable as the stable prefix of archive file names.
///
/// The prefix must survive as a literal in a file name and in a `{name}_*`
/// glob, so path separators and `*` are rejected outright before the general
/// file name sanitization check.
pub fn validate_backup_name<S: AsRef<str>>(name: S) -> Result<(), ValidationError> {
    let name = name.as_ref();
    if name.is_empty() {
        return Err(ValidationError::new("InvalidBackupName")
            .with_message("Backup name must not be empty".into()));
    }

    if name.contains(['/', '\\', '*']) {
        return Err(ValidationError::new("InvalidBackupName").with_message(
            format!("Backup name {name:?} must not contain '/', '\\' or '*'").into(),
        ));
    }

    if !is_sanitized(name) {
        return Err(ValidationError::new("InvalidBackupName").with_message(
            format!("Invalid backup name, try sanitizing like {:?}", sanitize(name)).into(),
        ));
    }

    Ok(())
}

pub fn validate_backup_dir<P: AsRef<Path>>(dir: P) -> Result<(), ValidationError> {
    let dir = dir.as_ref();
    if dir.exists() && !dir.is_dir() {
        return Err(ValidationError::new("InvalidDirectory")
            .with_message(format!("{:?} is not a directory", dir).into()));
    }

    Ok(())
}
