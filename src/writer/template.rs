use std::path::{Path, PathBuf};

use super::{record_file_name, LicenseFormatWriter};
use crate::error::WriterError;
use crate::models::{License, LicenseException};

/// Writes matching templates to `{id}.template.txt`. Records without an
/// explicit template get their plain text, which matches only itself.
pub struct TemplateFormatWriter {
    dir: PathBuf,
}

impl TemplateFormatWriter {
    pub fn new(dir: &Path) -> Self {
        Self {
            dir: dir.to_path_buf(),
        }
    }
}

impl LicenseFormatWriter for TemplateFormatWriter {
    fn name(&self) -> &'static str {
        "template"
    }

    fn write_license(
        &mut self,
        license: &License,
        deprecated: bool,
        _deprecated_version: Option<&str>,
    ) -> Result<(), WriterError> {
        let path = self
            .dir
            .join(record_file_name(&license.id, deprecated, ".template.txt"));
        std::fs::write(path, license.template_text())?;
        Ok(())
    }

    fn write_exception(
        &mut self,
        exception: &LicenseException,
        deprecated: bool,
        _deprecated_version: Option<&str>,
    ) -> Result<(), WriterError> {
        let path = self
            .dir
            .join(record_file_name(&exception.id, deprecated, ".template.txt"));
        std::fs::write(path, exception.template_text())?;
        Ok(())
    }

    fn write_toc(&mut self) -> Result<(), WriterError> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_template_or_text() {
        let dir = tempfile::tempdir().unwrap();
        let mut writer = TemplateFormatWriter::new(dir.path());
        let with_template = License {
            id: "BSD".into(),
            text: "plain".into(),
            template: Some("<<var;name=x;original=plain;match=.+>>".into()),
            ..Default::default()
        };
        let without = License {
            id: "MIT".into(),
            text: "plain".into(),
            ..Default::default()
        };
        writer.write_license(&with_template, false, None).unwrap();
        writer.write_license(&without, false, None).unwrap();

        let read = |name: &str| std::fs::read_to_string(dir.path().join(name)).unwrap();
        assert!(read("BSD.template.txt").starts_with("<<var"));
        assert_eq!(read("MIT.template.txt"), "plain");
    }
}
