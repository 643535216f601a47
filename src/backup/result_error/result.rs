use crate::backup::result_error::error::Error;
use crate::backup::result_error::WithArchivePath;
use std::path::Path;

pub type Result<T> = std::result::Result<T, Error>;

impl<T> WithArchivePath for Result<T> {
    fn while_writing(self, path: &Path) -> Self {
        self.map_err(|e| e.while_writing(path))
    }

    fn while_reading(self, path: &Path) -> Self {
        self.map_err(|e| e.while_reading(path))
    }
}
