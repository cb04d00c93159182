use std::path::{Path, PathBuf};

use super::{record_file_name, LicenseFormatWriter};
use crate::error::WriterError;
use crate::models::{License, LicenseException};

/// Writes each record's text to `{id}.txt`.
pub struct TextFormatWriter {
    dir: PathBuf,
}

impl TextFormatWriter {
    pub fn new(dir: &Path) -> Self {
        Self {
            dir: dir.to_path_buf(),
        }
    }
}

impl LicenseFormatWriter for TextFormatWriter {
    fn name(&self) -> &'static str {
        "text"
    }

    fn write_license(
        &mut self,
        license: &License,
        deprecated: bool,
        _deprecated_version: Option<&str>,
    ) -> Result<(), WriterError> {
        let path = self.dir.join(record_file_name(&license.id, deprecated, ".txt"));
        std::fs::write(path, &license.text)?;
        Ok(())
    }

    fn write_exception(
        &mut self,
        exception: &LicenseException,
        deprecated: bool,
        _deprecated_version: Option<&str>,
    ) -> Result<(), WriterError> {
        let path = self.dir.join(record_file_name(&exception.id, deprecated, ".txt"));
        std::fs::write(path, &exception.text)?;
        Ok(())
    }

    fn write_toc(&mut self) -> Result<(), WriterError> {
        Ok(())
    }
}
