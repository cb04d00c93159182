use std::fmt::Write as _;
use std::path::{Path, PathBuf};

use super::{record_file_name, LicenseFormatWriter, ListMetadata, TEXT_FOLDER_NAME};
use crate::error::WriterError;
use crate::models::{License, LicenseException};

struct Row {
    name: String,
    id: String,
    text_file: String,
    /// OSI flag for licenses, deprecation version for deprecated records.
    extra: String,
}

/// Human-readable table of contents at the output root.
///
/// Rows are buffered and the whole file is written by `write_toc`.
pub struct MarkdownFormatWriter {
    file: PathBuf,
    meta: ListMetadata,
    licenses: Vec<Row>,
    exceptions: Vec<Row>,
    deprecated: Vec<Row>,
}

impl MarkdownFormatWriter {
    pub fn new(file: &Path, meta: ListMetadata) -> Self {
        Self {
            file: file.to_path_buf(),
            meta,
            licenses: Vec::new(),
            exceptions: Vec::new(),
            deprecated: Vec::new(),
        }
    }

    fn render(&self) -> String {
        let mut out = String::new();
        out.push_str("# License List\n\n");
        let _ = writeln!(out, "- Version: {}", self.meta.version_or_unknown());
        let _ = writeln!(out, "- Release date: {}\n", self.meta.release_date_or_unknown());

        out.push_str("## Licenses\n\n");
        table(&mut out, &self.licenses, "OSI Approved");
        out.push_str("\n## Exceptions\n\n");
        table(&mut out, &self.exceptions, "");
        out.push_str("\n## Deprecated Licenses\n\n");
        table(&mut out, &self.deprecated, "Deprecated Since");
        out
    }
}

fn table(out: &mut String, rows: &[Row], extra_header: &str) {
    if extra_header.is_empty() {
        out.push_str("| Full Name | Identifier | Text |\n| --- | --- | --- |\n");
    } else {
        let _ = writeln!(
            out,
            "| Full Name | Identifier | {} | Text |\n| --- | --- | --- | --- |",
            extra_header
        );
    }
    for row in rows {
        let link = format!("[{0}](./{1}/{0})", row.text_file, TEXT_FOLDER_NAME);
        if extra_header.is_empty() {
            let _ = writeln!(out, "| {} | {} | {} |", cell(&row.name), cell(&row.id), link);
        } else {
            let _ = writeln!(
                out,
                "| {} | {} | {} | {} |",
                cell(&row.name),
                cell(&row.id),
                cell(&row.extra),
                link
            );
        }
    }
}

/// Table cells cannot contain pipes or line breaks.
fn cell(value: &str) -> String {
    value.replace('|', "\\|").replace(['\r', '\n'], " ")
}

impl LicenseFormatWriter for MarkdownFormatWriter {
    fn name(&self) -> &'static str {
        "markdown"
    }

    fn write_license(
        &mut self,
        license: &License,
        deprecated: bool,
        deprecated_version: Option<&str>,
    ) -> Result<(), WriterError> {
        let mut row = Row {
            name: license.name.clone(),
            id: license.id.clone(),
            text_file: record_file_name(&license.id, deprecated, ".txt"),
            extra: String::new(),
        };
        if deprecated {
            row.extra = deprecated_version.unwrap_or_default().to_string();
            self.deprecated.push(row);
        } else {
            row.extra = if license.osi_approved { "Y" } else { "" }.to_string();
            self.licenses.push(row);
        }
        Ok(())
    }

    fn write_exception(
        &mut self,
        exception: &LicenseException,
        deprecated: bool,
        _deprecated_version: Option<&str>,
    ) -> Result<(), WriterError> {
        self.exceptions.push(Row {
            name: exception.name.clone(),
            id: exception.id.clone(),
            text_file: record_file_name(&exception.id, deprecated, ".txt"),
            extra: String::new(),
        });
        Ok(())
    }

    fn write_toc(&mut self) -> Result<(), WriterError> {
        std::fs::write(&self.file, self.render())?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_toc_written_once_at_end() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("licenses.md");
        let meta = ListMetadata {
            version: Some("3.20".into()),
            release_date: Some("2023-02-17".into()),
        };
        let mut writer = MarkdownFormatWriter::new(&file, meta);

        let mit = License {
            id: "MIT".into(),
            name: "MIT License".into(),
            osi_approved: true,
            ..Default::default()
        };
        let old = License {
            id: "eCos-2.0".into(),
            name: "eCos license | version 2.0".into(),
            ..Default::default()
        };
        writer.write_license(&mit, false, None).unwrap();
        writer.write_license(&old, true, Some("2.0")).unwrap();
        writer
            .write_exception(
                &LicenseException {
                    id: "LLVM-exception".into(),
                    name: "LLVM Exception".into(),
                    ..Default::default()
                },
                false,
                None,
            )
            .unwrap();
        assert!(!file.exists());

        writer.write_toc().unwrap();
        let md = std::fs::read_to_string(&file).unwrap();
        assert!(md.contains("- Version: 3.20"));
        assert!(md.contains("| MIT License | MIT | Y | [MIT.txt](./text/MIT.txt) |"));
        assert!(md.contains("| LLVM Exception | LLVM-exception | [LLVM-exception.txt](./text/LLVM-exception.txt) |"));
        assert!(md.contains(
            "| eCos license \\| version 2.0 | eCos-2.0 | 2.0 | [deprecated_eCos-2.0.txt](./text/deprecated_eCos-2.0.txt) |"
        ));
    }
}
