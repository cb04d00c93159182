use std::path::{Path, PathBuf};

use serde::Serialize;

use super::{record_file_name, LicenseFormatWriter, ListMetadata};
use crate::error::WriterError;
use crate::models::{License, LicenseException};

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct LicenseDetails<'a> {
    license_id: &'a str,
    name: &'a str,
    license_text: &'a str,
    standard_license_template: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    standard_license_header: Option<&'a str>,
    is_osi_approved: bool,
    is_fsf_libre: bool,
    is_deprecated_license_id: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    deprecated_version: Option<&'a str>,
    see_also: &'a [String],
    #[serde(skip_serializing_if = "Option::is_none")]
    license_comments: Option<&'a str>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ExceptionDetails<'a> {
    license_exception_id: &'a str,
    name: &'a str,
    license_exception_text: &'a str,
    license_exception_template: &'a str,
    is_deprecated_license_id: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    deprecated_version: Option<&'a str>,
    see_also: &'a [String],
    #[serde(skip_serializing_if = "Option::is_none")]
    license_comments: Option<&'a str>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct LicenseSummary {
    reference: String,
    is_deprecated_license_id: bool,
    details_url: String,
    reference_number: usize,
    name: String,
    license_id: String,
    see_also: Vec<String>,
    is_osi_approved: bool,
    is_fsf_libre: bool,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ExceptionSummary {
    reference: String,
    is_deprecated_license_id: bool,
    details_url: String,
    reference_number: usize,
    name: String,
    license_exception_id: String,
    see_also: Vec<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct LicenseIndex<'a> {
    license_list_version: &'a str,
    licenses: &'a [LicenseSummary],
    release_date: &'a str,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ExceptionIndex<'a> {
    license_list_version: &'a str,
    exceptions: &'a [ExceptionSummary],
    release_date: &'a str,
}

/// Machine-readable index: one details file per record, plus
/// `licenses.json` and `exceptions.json` summaries written with the table of
/// contents.
pub struct JsonFormatWriter {
    root: PathBuf,
    details_dir: PathBuf,
    exceptions_dir: PathBuf,
    meta: ListMetadata,
    licenses: Vec<LicenseSummary>,
    exceptions: Vec<ExceptionSummary>,
}

impl JsonFormatWriter {
    pub fn new(root: &Path, details_dir: &Path, exceptions_dir: &Path, meta: ListMetadata) -> Self {
        Self {
            root: root.to_path_buf(),
            details_dir: details_dir.to_path_buf(),
            exceptions_dir: exceptions_dir.to_path_buf(),
            meta,
            licenses: Vec::new(),
            exceptions: Vec::new(),
        }
    }
}

fn write_json(path: PathBuf, value: &impl Serialize) -> Result<(), WriterError> {
    let mut json = serde_json::to_string_pretty(value)?;
    json.push('\n');
    std::fs::write(path, json)?;
    Ok(())
}

impl LicenseFormatWriter for JsonFormatWriter {
    fn name(&self) -> &'static str {
        "json"
    }

    fn write_license(
        &mut self,
        license: &License,
        deprecated: bool,
        deprecated_version: Option<&str>,
    ) -> Result<(), WriterError> {
        let details = LicenseDetails {
            license_id: &license.id,
            name: &license.name,
            license_text: &license.text,
            standard_license_template: license.template_text(),
            standard_license_header: license.header.as_deref(),
            is_osi_approved: license.osi_approved,
            is_fsf_libre: license.fsf_libre,
            is_deprecated_license_id: deprecated,
            deprecated_version: deprecated_version.filter(|_| deprecated),
            see_also: &license.see_also,
            license_comments: license.comments.as_deref(),
        };
        let file = record_file_name(&license.id, false, ".json");
        write_json(self.details_dir.join(&file), &details)?;

        self.licenses.push(LicenseSummary {
            reference: format!("./{}", record_file_name(&license.id, deprecated, ".html")),
            is_deprecated_license_id: deprecated,
            details_url: format!("./details/{}", file),
            reference_number: self.licenses.len(),
            name: license.name.clone(),
            license_id: license.id.clone(),
            see_also: license.see_also.clone(),
            is_osi_approved: license.osi_approved,
            is_fsf_libre: license.fsf_libre,
        });
        Ok(())
    }

    fn write_exception(
        &mut self,
        exception: &LicenseException,
        deprecated: bool,
        deprecated_version: Option<&str>,
    ) -> Result<(), WriterError> {
        let details = ExceptionDetails {
            license_exception_id: &exception.id,
            name: &exception.name,
            license_exception_text: &exception.text,
            license_exception_template: exception.template_text(),
            is_deprecated_license_id: deprecated,
            deprecated_version: deprecated_version.filter(|_| deprecated),
            see_also: &exception.see_also,
            license_comments: exception.comments.as_deref(),
        };
        let file = record_file_name(&exception.id, false, ".json");
        write_json(self.exceptions_dir.join(&file), &details)?;

        self.exceptions.push(ExceptionSummary {
            reference: format!("./{}", record_file_name(&exception.id, deprecated, ".html")),
            is_deprecated_license_id: deprecated,
            details_url: format!("./exceptions/{}", file),
            reference_number: self.exceptions.len(),
            name: exception.name.clone(),
            license_exception_id: exception.id.clone(),
            see_also: exception.see_also.clone(),
        });
        Ok(())
    }

    fn write_toc(&mut self) -> Result<(), WriterError> {
        let version = self.meta.version_or_unknown();
        let release_date = self.meta.release_date_or_unknown();
        write_json(
            self.root.join("licenses.json"),
            &LicenseIndex {
                license_list_version: version,
                licenses: &self.licenses,
                release_date,
            },
        )?;
        write_json(
            self.root.join("exceptions.json"),
            &ExceptionIndex {
                license_list_version: version,
                exceptions: &self.exceptions,
                release_date,
            },
        )
    }
}
