//! Output formats.
//!
//! Every format is a [`LicenseFormatWriter`]; the generator hands each record
//! to all writers in registration order and asks each for its table of
//! contents once every record is written.
//!
//! - [`text`] — plain license text.
//! - [`template`] — matching templates.
//! - [`html`] — standalone HTML, RDFa-annotated HTML, and the website pages.
//! - [`json`] — per-record details plus `licenses.json` / `exceptions.json`.
//! - [`rdf`] — RDF/XML, Turtle and N-Triples.
//! - [`markdown`] — the `licenses.md` table of contents.
//! - [`assets`] — static website files.

use std::path::{Path, PathBuf};

use crate::error::{GeneratorError, GeneratorResult, WriterError};
use crate::models::{License, LicenseException};

pub mod assets;
pub mod html;
pub mod json;
pub mod markdown;
pub mod rdf;
pub mod template;
pub mod text;

pub trait LicenseFormatWriter {
    /// Short format name used in error messages.
    fn name(&self) -> &'static str;

    fn write_license(
        &mut self,
        license: &License,
        deprecated: bool,
        deprecated_version: Option<&str>,
    ) -> Result<(), WriterError>;

    fn write_exception(
        &mut self,
        exception: &LicenseException,
        deprecated: bool,
        deprecated_version: Option<&str>,
    ) -> Result<(), WriterError>;

    /// Called once, after every record has been written.
    fn write_toc(&mut self) -> Result<(), WriterError>;
}

/// Version and release date stamped into list-level output.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ListMetadata {
    pub version: Option<String>,
    pub release_date: Option<String>,
}

impl ListMetadata {
    pub fn version_or_unknown(&self) -> &str {
        self.version.as_deref().unwrap_or("unknown")
    }

    pub fn release_date_or_unknown(&self) -> &str {
        self.release_date.as_deref().unwrap_or("unknown")
    }
}

pub const TEXT_FOLDER_NAME: &str = "text";
pub const TEMPLATE_FOLDER_NAME: &str = "template";
pub const HTML_FOLDER_NAME: &str = "html";
pub const RDFA_FOLDER_NAME: &str = "rdfa";
pub const JSON_FOLDER_NAME: &str = "json";
pub const WEBSITE_FOLDER_NAME: &str = "website";
pub const RDFXML_FOLDER_NAME: &str = "rdfxml";
pub const RDFTURTLE_FOLDER_NAME: &str = "rdfturtle";
pub const RDFNT_FOLDER_NAME: &str = "rdfnt";
pub const TABLE_OF_CONTENTS_FILE_NAME: &str = "licenses.md";

/// Every location the writers need under the output root.
#[derive(Debug, Clone)]
pub struct OutputLayout {
    pub root: PathBuf,
    pub text: PathBuf,
    pub template: PathBuf,
    pub html: PathBuf,
    pub rdfa: PathBuf,
    pub json: PathBuf,
    pub json_details: PathBuf,
    pub json_exceptions: PathBuf,
    pub website: PathBuf,
    pub rdf_xml: PathBuf,
    pub rdf_turtle: PathBuf,
    pub rdf_nt: PathBuf,
    pub toc_file: PathBuf,
}

impl OutputLayout {
    pub fn new(root: &Path) -> Self {
        let json = root.join(JSON_FOLDER_NAME);
        Self {
            root: root.to_path_buf(),
            text: root.join(TEXT_FOLDER_NAME),
            template: root.join(TEMPLATE_FOLDER_NAME),
            html: root.join(HTML_FOLDER_NAME),
            rdfa: root.join(RDFA_FOLDER_NAME),
            json_details: json.join("details"),
            json_exceptions: json.join("exceptions"),
            json,
            website: root.join(WEBSITE_FOLDER_NAME),
            rdf_xml: root.join(RDFXML_FOLDER_NAME),
            rdf_turtle: root.join(RDFTURTLE_FOLDER_NAME),
            rdf_nt: root.join(RDFNT_FOLDER_NAME),
            toc_file: root.join(TABLE_OF_CONTENTS_FILE_NAME),
        }
    }

    /// Create every directory and the table-of-contents file, reusing what
    /// already exists. Fails on the first location that cannot be created.
    pub fn prepare(&self) -> GeneratorResult<()> {
        let dirs = [
            &self.root,
            &self.text,
            &self.template,
            &self.html,
            &self.rdfa,
            &self.json,
            &self.json_details,
            &self.json_exceptions,
            &self.website,
            &self.rdf_xml,
            &self.rdf_turtle,
            &self.rdf_nt,
        ];
        for dir in dirs {
            ensure_dir(dir)?;
        }

        if !self.toc_file.is_file() {
            std::fs::File::create(&self.toc_file).map_err(|source| {
                GeneratorError::OutputPreparation {
                    path: self.toc_file.clone(),
                    source,
                }
            })?;
        }
        Ok(())
    }

    /// The standard writer set, in registration order.
    pub fn writers(&self, meta: &ListMetadata) -> Vec<Box<dyn LicenseFormatWriter>> {
        vec![
            Box::new(text::TextFormatWriter::new(&self.text)),
            Box::new(template::TemplateFormatWriter::new(&self.template)),
            Box::new(html::HtmlFormatWriter::new(
                &self.html,
                html::HtmlFlavor::Plain,
                meta.clone(),
            )),
            Box::new(html::HtmlFormatWriter::new(
                &self.rdfa,
                html::HtmlFlavor::Rdfa,
                meta.clone(),
            )),
            Box::new(json::JsonFormatWriter::new(
                &self.json,
                &self.json_details,
                &self.json_exceptions,
                meta.clone(),
            )),
            Box::new(html::HtmlFormatWriter::new(
                &self.website,
                html::HtmlFlavor::Website,
                meta.clone(),
            )),
            Box::new(rdf::RdfFormatWriter::new(
                &self.rdf_xml,
                &self.rdf_turtle,
                &self.rdf_nt,
            )),
            Box::new(markdown::MarkdownFormatWriter::new(
                &self.toc_file,
                meta.clone(),
            )),
        ]
    }
}

fn ensure_dir(dir: &Path) -> GeneratorResult<()> {
    if dir.is_dir() {
        return Ok(());
    }
    std::fs::create_dir(dir).map_err(|source| GeneratorError::OutputPreparation {
        path: dir.to_path_buf(),
        source,
    })
}

/// File name for a record: `{id}{suffix}`, prefixed with `deprecated_` for
/// deprecated records. Path separators in ids are replaced.
pub fn record_file_name(id: &str, deprecated: bool, suffix: &str) -> String {
    let safe: String = id
        .trim()
        .chars()
        .map(|c| if matches!(c, '/' | '\\') { '_' } else { c })
        .collect();
    if deprecated {
        format!("deprecated_{}{}", safe, suffix)
    } else {
        format!("{}{}", safe, suffix)
    }
}
