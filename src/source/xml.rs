use std::path::{Path, PathBuf};

use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;

use super::{LicenseProvider, RecordIter};
use crate::error::SourceError;
use crate::models::{DeprecatedLicense, License, LicenseException};

/// Provider backed by a directory of license XML files.
///
/// Files are visited in file-name order and re-read on every pass, so each
/// iterator starts from the first file.
pub struct XmlLicenseProvider {
    files: Vec<PathBuf>,
    /// Files whose warnings have already been recorded, parallel to `files`.
    scanned: Vec<bool>,
    warnings: Vec<String>,
}

impl XmlLicenseProvider {
    pub fn open(dir: &Path) -> Result<Self, SourceError> {
        let io_err = |source| SourceError::Io {
            path: dir.to_path_buf(),
            source,
        };

        let mut files = Vec::new();
        for entry in std::fs::read_dir(dir).map_err(io_err)? {
            let path = entry.map_err(io_err)?.path();
            let is_xml = path
                .extension()
                .and_then(|e| e.to_str())
                .is_some_and(|e| e.eq_ignore_ascii_case("xml"));
            if is_xml && path.is_file() {
                files.push(path);
            }
        }
        files.sort();

        Ok(Self {
            scanned: vec![false; files.len()],
            files,
            warnings: Vec::new(),
        })
    }

    /// Parse every file in order. A file's warnings are recorded the first
    /// time it is parsed.
    fn documents(&mut self) -> impl Iterator<Item = Result<XmlDocument, SourceError>> + '_ {
        let warnings = &mut self.warnings;
        self.files
            .iter()
            .zip(self.scanned.iter_mut())
            .map(move |(path, scanned)| {
                let content = std::fs::read_to_string(path).map_err(|source| SourceError::Io {
                    path: path.clone(),
                    source,
                })?;
                let doc = parse_document(&content, path)?;
                if !*scanned {
                    warnings.extend(doc.warnings.iter().cloned());
                    *scanned = true;
                }
                Ok(doc)
            })
    }
}

impl LicenseProvider for XmlLicenseProvider {
    fn licenses(&mut self) -> Result<RecordIter<'_, License>, SourceError> {
        let iter = self.documents().flat_map(|doc| match doc {
            Ok(doc) => doc
                .licenses
                .into_iter()
                .filter(|l| !l.deprecated)
                .map(Ok)
                .collect::<Vec<_>>(),
            Err(e) => vec![Err(e)],
        });
        Ok(Box::new(iter))
    }

    fn exceptions(&mut self) -> Result<RecordIter<'_, LicenseException>, SourceError> {
        let iter = self.documents().flat_map(|doc| match doc {
            Ok(doc) => doc.exceptions.into_iter().map(Ok).collect::<Vec<_>>(),
            Err(e) => vec![Err(e)],
        });
        Ok(Box::new(iter))
    }

    fn deprecated_licenses(&mut self) -> Result<RecordIter<'_, DeprecatedLicense>, SourceError> {
        let iter = self.documents().flat_map(|doc| match doc {
            Ok(doc) => doc
                .licenses
                .into_iter()
                .filter(|l| l.deprecated)
                .map(|license| {
                    Ok(DeprecatedLicense {
                        deprecated_version: license.deprecated_version.clone().unwrap_or_default(),
                        license,
                    })
                })
                .collect::<Vec<_>>(),
            Err(e) => vec![Err(e)],
        });
        Ok(Box::new(iter))
    }

    fn warnings(&self) -> Vec<String> {
        self.warnings.clone()
    }
}

/// Records found in one XML file.
#[derive(Debug, Default)]
struct XmlDocument {
    licenses: Vec<License>,
    exceptions: Vec<LicenseException>,
    warnings: Vec<String>,
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum RecordKind {
    License,
    Exception,
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum Field {
    Text,
    CrossRef,
    Notes,
    Header,
}

/// Record under construction while its element is open.
#[derive(Default)]
struct RecordBuilder {
    id: String,
    name: String,
    osi_approved: bool,
    deprecated: bool,
    deprecated_version: Option<String>,
    text: String,
    template: String,
    has_markup: bool,
    see_also: Vec<String>,
    notes: String,
    header: String,
}

/// `<alt>` element being read: its name, match pattern and original text.
struct AltBlock {
    name: String,
    pattern: String,
    original: String,
}

fn attr(e: &BytesStart, key: &str, path: &Path) -> Result<Option<String>, SourceError> {
    for a in e.attributes() {
        let a = a.map_err(|err| xml_error(path, err))?;
        if a.key.local_name().as_ref() == key.as_bytes() {
            let value = a.unescape_value().map_err(|err| xml_error(path, err))?;
            return Ok(Some(value.into_owned()));
        }
    }
    Ok(None)
}

fn flag(e: &BytesStart, key: &str, path: &Path) -> Result<bool, SourceError> {
    Ok(attr(e, key, path)?.is_some_and(|v| v.trim().eq_ignore_ascii_case("true")))
}

fn xml_error(path: &Path, err: impl std::fmt::Display) -> SourceError {
    SourceError::Xml {
        path: path.to_path_buf(),
        message: err.to_string(),
    }
}

/// Parse one `SPDXLicenseCollection` document.
fn parse_document(xml: &str, path: &Path) -> Result<XmlDocument, SourceError> {
    let mut reader = Reader::from_str(xml);
    let mut doc = XmlDocument::default();

    let mut current: Option<(RecordKind, RecordBuilder)> = None;
    let mut field: Option<Field> = None;
    let mut alt: Option<AltBlock> = None;

    loop {
        let event = reader.read_event().map_err(|e| {
            xml_error(path, format!("{} at position {}", e, reader.buffer_position()))
        })?;

        match event {
            Event::Start(ref e) => {
                let tag = String::from_utf8_lossy(e.name().local_name().as_ref()).into_owned();
                let in_text = field == Some(Field::Text);
                match (tag.as_str(), current.is_some()) {
                    ("license" | "exception", false) => {
                        let kind = if tag == "license" {
                            RecordKind::License
                        } else {
                            RecordKind::Exception
                        };
                        let builder = RecordBuilder {
                            id: attr(e, "licenseId", path)?.unwrap_or_default(),
                            name: attr(e, "name", path)?.unwrap_or_default(),
                            osi_approved: flag(e, "isOsiApproved", path)?,
                            deprecated: flag(e, "isDeprecated", path)?,
                            deprecated_version: attr(e, "deprecatedVersion", path)?,
                            ..Default::default()
                        };
                        current = Some((kind, builder));
                    }
                    ("text", true) if field.is_none() => field = Some(Field::Text),
                    ("crossRef", true) if field.is_none() => field = Some(Field::CrossRef),
                    ("notes", true) if field.is_none() => field = Some(Field::Notes),
                    ("standardLicenseHeader", true) if field.is_none() => {
                        field = Some(Field::Header)
                    }
                    ("p" | "item", true) if in_text => {
                        if let Some((_, b)) = current.as_mut() {
                            b.text.push('\n');
                            b.template.push('\n');
                        }
                    }
                    ("optional", true) if in_text => {
                        if let Some((_, b)) = current.as_mut() {
                            b.has_markup = true;
                            b.template.push_str(" <<beginOptional>> ");
                        }
                    }
                    ("alt", true) if in_text => {
                        alt = Some(AltBlock {
                            name: attr(e, "name", path)?.unwrap_or_default(),
                            pattern: attr(e, "match", path)?.unwrap_or_default(),
                            original: String::new(),
                        });
                    }
                    _ => {}
                }
            }
            Event::Empty(ref e) => {
                let tag = e.name().local_name();
                if let Some((_, b)) = current.as_mut() {
                    if field == Some(Field::Text) && tag.as_ref() == b"br" {
                        b.text.push('\n');
                        b.template.push('\n');
                    }
                }
            }
            Event::Text(ref e) => {
                // Layout whitespace is insignificant; structure comes from <p>/<br>.
                let text = e.unescape().map_err(|err| xml_error(path, err))?;
                let collapsed = collapse_whitespace(&text);
                push_text(current.as_mut(), field, alt.as_mut(), &collapsed);
            }
            Event::CData(e) => {
                let raw = e.into_inner();
                let text = String::from_utf8_lossy(&raw);
                push_text(current.as_mut(), field, alt.as_mut(), &text);
            }
            Event::End(ref e) => {
                let tag = String::from_utf8_lossy(e.name().local_name().as_ref()).into_owned();
                match tag.as_str() {
                    "license" | "exception" => {
                        if let Some((kind, b)) = current.take() {
                            finish_record(&mut doc, kind, b, path);
                        }
                        field = None;
                    }
                    "text" if field == Some(Field::Text) => field = None,
                    "crossRef" if field == Some(Field::CrossRef) => field = None,
                    "notes" if field == Some(Field::Notes) => field = None,
                    "standardLicenseHeader" if field == Some(Field::Header) => field = None,
                    "p" if field == Some(Field::Text) => {
                        if let Some((_, b)) = current.as_mut() {
                            b.text.push('\n');
                            b.template.push('\n');
                        }
                    }
                    "optional" if field == Some(Field::Text) => {
                        if let Some((_, b)) = current.as_mut() {
                            b.template.push_str(" <<endOptional>> ");
                        }
                    }
                    "alt" => {
                        if let (Some(block), Some((_, b))) = (alt.take(), current.as_mut()) {
                            b.has_markup = true;
                            b.template.push_str(&format!(
                                "<<var;name=\"{}\";original=\"{}\";match=\"{}\">>",
                                block.name,
                                block.original.trim(),
                                block.pattern
                            ));
                        }
                    }
                    _ => {}
                }
            }
            Event::Eof => break,
            _ => {}
        }
    }

    if doc.licenses.is_empty() && doc.exceptions.is_empty() {
        doc.warnings.push(format!(
            "No license or exception found in {}",
            path.display()
        ));
    }

    Ok(doc)
}

fn push_text(
    current: Option<&mut (RecordKind, RecordBuilder)>,
    field: Option<Field>,
    alt: Option<&mut AltBlock>,
    text: &str,
) {
    let Some((_, b)) = current else {
        return;
    };
    match field {
        Some(Field::Text) => {
            b.text.push_str(text);
            match alt {
                Some(block) => block.original.push_str(text),
                None => b.template.push_str(text),
            }
        }
        Some(Field::CrossRef) => {
            let url = text.trim();
            if !url.is_empty() {
                b.see_also.push(url.to_string());
            }
        }
        Some(Field::Notes) => b.notes.push_str(text),
        Some(Field::Header) => b.header.push_str(text),
        None => {}
    }
}

fn finish_record(doc: &mut XmlDocument, kind: RecordKind, b: RecordBuilder, path: &Path) {
    let label = match kind {
        RecordKind::License => "license",
        RecordKind::Exception => "exception",
    };
    if b.id.trim().is_empty() {
        doc.warnings.push(format!(
            "Missing licenseId for {} in {}",
            label,
            path.display()
        ));
    }

    let text = flatten_text(&b.text);
    let template = b.has_markup.then(|| flatten_text(&b.template));
    let comments = Some(flatten_text(&b.notes)).filter(|s| !s.is_empty());

    match kind {
        RecordKind::License => doc.licenses.push(License {
            id: b.id,
            name: b.name,
            text,
            template,
            header: Some(flatten_text(&b.header)).filter(|s| !s.is_empty()),
            see_also: b.see_also,
            comments,
            osi_approved: b.osi_approved,
            fsf_libre: false,
            deprecated: b.deprecated,
            deprecated_version: b.deprecated_version,
        }),
        RecordKind::Exception => doc.exceptions.push(LicenseException {
            id: b.id,
            name: b.name,
            text,
            template,
            see_also: b.see_also,
            comments,
            deprecated: b.deprecated,
            deprecated_version: b.deprecated_version,
        }),
    }
}

fn collapse_whitespace(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut in_space = false;
    for c in text.chars() {
        if c.is_whitespace() {
            if !in_space {
                out.push(' ');
            }
            in_space = true;
        } else {
            out.push(c);
            in_space = false;
        }
    }
    out
}

/// Collapse the indentation of pretty-printed XML: whitespace runs inside a
/// line become one space, and at most one blank line separates paragraphs.
fn flatten_text(raw: &str) -> String {
    let mut out: Vec<String> = Vec::new();
    for line in raw.lines() {
        let collapsed = line.split_whitespace().collect::<Vec<_>>().join(" ");
        if collapsed.is_empty() && out.last().map_or(true, |l| l.is_empty()) {
            continue;
        }
        out.push(collapsed);
    }
    while out.last().is_some_and(|l| l.is_empty()) {
        out.pop();
    }
    out.join("\n")
}
