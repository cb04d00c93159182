use std::fmt::Write as _;
use std::path::{Path, PathBuf};

use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use quick_xml::Writer;

use super::{record_file_name, LicenseFormatWriter};
use crate::error::WriterError;
use crate::models::{License, LicenseException};

const SPDX_NS: &str = "http://spdx.org/rdf/terms#";
const RDF_NS: &str = "http://www.w3.org/1999/02/22-rdf-syntax-ns#";
const RDFS_NS: &str = "http://www.w3.org/2000/01/rdf-schema#";
const XSD_BOOLEAN: &str = "http://www.w3.org/2001/XMLSchema#boolean";
const LICENSE_BASE: &str = "http://spdx.org/licenses/";

#[derive(Debug, Clone, PartialEq)]
enum Object {
    Literal(String),
    Boolean(bool),
    Iri(String),
}

/// Predicate as (namespace, local name), object.
#[derive(Debug, Clone, PartialEq)]
struct Statement {
    ns: &'static str,
    local: &'static str,
    object: Object,
}

/// All statements about one record, sharing a subject.
struct Description {
    subject: String,
    class: &'static str,
    statements: Vec<Statement>,
}

impl Description {
    fn new(id: &str, class: &'static str) -> Self {
        Self {
            subject: format!("{}{}", LICENSE_BASE, id),
            class,
            statements: Vec::new(),
        }
    }

    fn add(&mut self, ns: &'static str, local: &'static str, object: Object) {
        self.statements.push(Statement { ns, local, object });
    }

    fn literal(&mut self, local: &'static str, value: &str) {
        self.add(SPDX_NS, local, Object::Literal(value.to_string()));
    }

    fn see_also(&mut self, urls: &[String]) {
        for url in urls {
            self.add(RDFS_NS, "seeAlso", Object::Literal(url.clone()));
        }
    }

    fn comment(&mut self, comments: Option<&str>) {
        if let Some(c) = comments {
            self.add(RDFS_NS, "comment", Object::Literal(c.to_string()));
        }
    }

    fn ntriples(&self) -> String {
        let mut out = String::new();
        let _ = writeln!(
            out,
            "<{}> <{}type> <{}{}> .",
            self.subject, RDF_NS, SPDX_NS, self.class
        );
        for s in &self.statements {
            let _ = writeln!(
                out,
                "<{}> <{}{}> {} .",
                self.subject,
                s.ns,
                s.local,
                nt_object(&s.object)
            );
        }
        out
    }

    fn turtle(&self) -> String {
        let mut out = String::new();
        let _ = writeln!(out, "@prefix spdx: <{}> .", SPDX_NS);
        let _ = writeln!(out, "@prefix rdfs: <{}> .", RDFS_NS);
        let _ = writeln!(out, "@prefix xsd: <http://www.w3.org/2001/XMLSchema#> .\n");
        let _ = write!(out, "<{}>\n    a spdx:{}", self.subject, self.class);
        for s in &self.statements {
            let prefix = if s.ns == RDFS_NS { "rdfs" } else { "spdx" };
            let object = match &s.object {
                Object::Boolean(b) => format!("\"{}\"^^xsd:boolean", b),
                other => nt_object(other),
            };
            let _ = write!(out, " ;\n    {}:{} {}", prefix, s.local, object);
        }
        out.push_str(" .\n");
        out
    }

    fn rdf_xml(&self) -> Result<Vec<u8>, WriterError> {
        let mut writer = Writer::new_with_indent(Vec::new(), b' ', 2);

        writer
            .write_event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None)))
            .map_err(xml_err)?;
        writer
            .write_event(Event::Start(BytesStart::new("rdf:RDF").with_attributes([
                ("xmlns:rdf", RDF_NS),
                ("xmlns:rdfs", RDFS_NS),
                ("xmlns:spdx", SPDX_NS),
            ])))
            .map_err(xml_err)?;

        let class = format!("spdx:{}", self.class);
        writer
            .write_event(Event::Start(
                BytesStart::new(class.as_str())
                    .with_attributes([("rdf:about", self.subject.as_str())]),
            ))
            .map_err(xml_err)?;

        for s in &self.statements {
            let prefix = if s.ns == RDFS_NS { "rdfs" } else { "spdx" };
            let tag = format!("{}:{}", prefix, s.local);
            match &s.object {
                Object::Iri(iri) => {
                    writer
                        .write_event(Event::Empty(
                            BytesStart::new(tag.as_str())
                                .with_attributes([("rdf:resource", iri.as_str())]),
                        ))
                        .map_err(xml_err)?;
                }
                Object::Literal(_) | Object::Boolean(_) => {
                    let mut start = BytesStart::new(tag.as_str());
                    let value = match &s.object {
                        Object::Boolean(b) => {
                            start.push_attribute(("rdf:datatype", XSD_BOOLEAN));
                            b.to_string()
                        }
                        Object::Literal(v) | Object::Iri(v) => v.clone(),
                    };
                    writer.write_event(Event::Start(start)).map_err(xml_err)?;
                    writer
                        .write_event(Event::Text(BytesText::new(&value)))
                        .map_err(xml_err)?;
                    writer
                        .write_event(Event::End(BytesEnd::new(tag.as_str())))
                        .map_err(xml_err)?;
                }
            }
        }

        writer
            .write_event(Event::End(BytesEnd::new(class.as_str())))
            .map_err(xml_err)?;
        writer
            .write_event(Event::End(BytesEnd::new("rdf:RDF")))
            .map_err(xml_err)?;

        let mut bytes = writer.into_inner();
        bytes.push(b'\n');
        Ok(bytes)
    }
}

fn xml_err(e: impl std::fmt::Display) -> WriterError {
    WriterError::Xml(e.to_string())
}

/// N-Triples rendering of an object term.
fn nt_object(object: &Object) -> String {
    match object {
        Object::Iri(iri) => format!("<{}>", iri),
        Object::Boolean(b) => format!("\"{}\"^^<{}>", b, XSD_BOOLEAN),
        Object::Literal(s) => {
            let mut escaped = String::with_capacity(s.len() + 2);
            escaped.push('"');
            for c in s.chars() {
                match c {
                    '\\' => escaped.push_str("\\\\"),
                    '"' => escaped.push_str("\\\""),
                    '\n' => escaped.push_str("\\n"),
                    '\r' => escaped.push_str("\\r"),
                    '\t' => escaped.push_str("\\t"),
                    other => escaped.push(other),
                }
            }
            escaped.push('"');
            escaped
        }
    }
}

/// Writes every record as RDF/XML, Turtle and N-Triples.
pub struct RdfFormatWriter {
    xml_dir: PathBuf,
    turtle_dir: PathBuf,
    nt_dir: PathBuf,
}

impl RdfFormatWriter {
    pub fn new(xml_dir: &Path, turtle_dir: &Path, nt_dir: &Path) -> Self {
        Self {
            xml_dir: xml_dir.to_path_buf(),
            turtle_dir: turtle_dir.to_path_buf(),
            nt_dir: nt_dir.to_path_buf(),
        }
    }

    fn write_all(&self, id: &str, deprecated: bool, desc: &Description) -> Result<(), WriterError> {
        std::fs::write(
            self.xml_dir.join(record_file_name(id, deprecated, ".rdf")),
            desc.rdf_xml()?,
        )?;
        std::fs::write(
            self.turtle_dir.join(record_file_name(id, deprecated, ".turtle")),
            desc.turtle(),
        )?;
        std::fs::write(
            self.nt_dir.join(record_file_name(id, deprecated, ".nt")),
            desc.ntriples(),
        )?;
        Ok(())
    }
}

impl LicenseFormatWriter for RdfFormatWriter {
    fn name(&self) -> &'static str {
        "rdf"
    }

    fn write_license(
        &mut self,
        license: &License,
        deprecated: bool,
        deprecated_version: Option<&str>,
    ) -> Result<(), WriterError> {
        let mut desc = Description::new(&license.id, "ListedLicense");
        desc.literal("licenseId", &license.id);
        desc.literal("name", &license.name);
        desc.add(SPDX_NS, "isOsiApproved", Object::Boolean(license.osi_approved));
        desc.add(SPDX_NS, "isFsfLibre", Object::Boolean(license.fsf_libre));
        desc.add(SPDX_NS, "isDeprecatedLicenseId", Object::Boolean(deprecated));
        if let Some(version) = deprecated_version.filter(|_| deprecated) {
            desc.literal("deprecatedVersion", version);
        }
        desc.see_also(&license.see_also);
        desc.comment(license.comments.as_deref());
        if let Some(header) = &license.header {
            desc.literal("standardLicenseHeader", header);
        }
        desc.literal("standardLicenseTemplate", license.template_text());
        desc.literal("licenseText", &license.text);
        desc.add(
            SPDX_NS,
            "licenseTextHtml",
            Object::Iri(format!("{}{}.html", LICENSE_BASE, license.id)),
        );
        self.write_all(&license.id, deprecated, &desc)
    }

    fn write_exception(
        &mut self,
        exception: &LicenseException,
        deprecated: bool,
        deprecated_version: Option<&str>,
    ) -> Result<(), WriterError> {
        let mut desc = Description::new(&exception.id, "ListedLicenseException");
        desc.literal("licenseExceptionId", &exception.id);
        desc.literal("name", &exception.name);
        desc.add(SPDX_NS, "isDeprecatedLicenseId", Object::Boolean(deprecated));
        if let Some(version) = deprecated_version.filter(|_| deprecated) {
            desc.literal("deprecatedVersion", version);
        }
        desc.see_also(&exception.see_also);
        desc.comment(exception.comments.as_deref());
        desc.literal("licenseExceptionTemplate", exception.template_text());
        desc.literal("licenseExceptionText", &exception.text);
        self.write_all(&exception.id, deprecated, &desc)
    }

    fn write_toc(&mut self) -> Result<(), WriterError> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dirs() -> (tempfile::TempDir, RdfFormatWriter) {
        let dir = tempfile::tempdir().unwrap();
        for sub in ["rdfxml", "rdfturtle", "rdfnt"] {
            std::fs::create_dir(dir.path().join(sub)).unwrap();
        }
        let writer = RdfFormatWriter::new(
            &dir.path().join("rdfxml"),
            &dir.path().join("rdfturtle"),
            &dir.path().join("rdfnt"),
        );
        (dir, writer)
    }

    #[test]
    fn test_license_in_three_serializations() {
        let (dir, mut writer) = dirs();
        let license = License {
            id: "MIT".into(),
            name: "MIT License".into(),
            text: "line one\n\"quoted\" & <tag>".into(),
            osi_approved: true,
            ..Default::default()
        };
        writer.write_license(&license, false, None).unwrap();

        let nt = std::fs::read_to_string(dir.path().join("rdfnt/MIT.nt")).unwrap();
        assert!(nt.contains(
            "<http://spdx.org/licenses/MIT> <http://spdx.org/rdf/terms#licenseId> \"MIT\" ."
        ));
        assert!(nt.contains("\"line one\\n\\\"quoted\\\" & <tag>\""));
        assert!(nt.contains("\"true\"^^<http://www.w3.org/2001/XMLSchema#boolean>"));

        let ttl = std::fs::read_to_string(dir.path().join("rdfturtle/MIT.turtle")).unwrap();
        assert!(ttl.contains("a spdx:ListedLicense"));
        assert!(ttl.contains("spdx:isOsiApproved \"true\"^^xsd:boolean"));
        assert!(ttl.trim_end().ends_with(" ."));

        let xml = std::fs::read_to_string(dir.path().join("rdfxml/MIT.rdf")).unwrap();
        assert!(xml.starts_with("<?xml version=\"1.0\" encoding=\"UTF-8\"?>"));
        assert!(xml.contains("<spdx:ListedLicense rdf:about=\"http://spdx.org/licenses/MIT\">"));
        assert!(xml.contains("&lt;tag&gt;"));
        assert!(xml.contains("rdf:resource=\"http://spdx.org/licenses/MIT.html\""));
    }

    #[test]
    fn test_deprecated_exception() {
        let (dir, mut writer) = dirs();
        let exception = LicenseException {
            id: "Nokia-Qt-exception-1.1".into(),
            name: "Nokia Qt LGPL exception 1.1".into(),
            text: "body".into(),
            ..Default::default()
        };
        writer.write_exception(&exception, true, Some("2.0rc2")).unwrap();
        let nt = std::fs::read_to_string(
            dir.path().join("rdfnt/deprecated_Nokia-Qt-exception-1.1.nt"),
        )
        .unwrap();
        assert!(nt.contains("ListedLicenseException"));
        assert!(nt.contains("<http://spdx.org/rdf/terms#deprecatedVersion> \"2.0rc2\""));
    }
}
