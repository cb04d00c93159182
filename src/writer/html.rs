use std::fmt::Write as _;
use std::path::{Path, PathBuf};

use quick_xml::escape::escape;

use super::{record_file_name, LicenseFormatWriter, ListMetadata};
use crate::error::WriterError;
use crate::models::{License, LicenseException};

const SPDX_VOCAB: &str = "http://spdx.org/rdf/terms#";

/// Which HTML rendering a writer produces.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HtmlFlavor {
    /// Standalone page, no metadata annotations.
    Plain,
    /// Page annotated with RDFa `property` attributes.
    Rdfa,
    /// RDFa page linking the site stylesheet, plus an `index.html` listing.
    Website,
}

/// One line of the website index.
struct IndexRow {
    id: String,
    name: String,
    file: String,
    osi_approved: bool,
    fsf_libre: bool,
    deprecated_version: Option<String>,
}

pub struct HtmlFormatWriter {
    dir: PathBuf,
    flavor: HtmlFlavor,
    meta: ListMetadata,
    licenses: Vec<IndexRow>,
    deprecated: Vec<IndexRow>,
    exceptions: Vec<IndexRow>,
}

/// Fields shared by license and exception pages.
struct Page<'a> {
    kind: &'a str,
    id: &'a str,
    name: &'a str,
    text: &'a str,
    header: Option<&'a str>,
    see_also: &'a [String],
    comments: Option<&'a str>,
    osi_approved: Option<bool>,
    fsf_libre: Option<bool>,
    deprecated_version: Option<&'a str>,
}

impl HtmlFormatWriter {
    pub fn new(dir: &Path, flavor: HtmlFlavor, meta: ListMetadata) -> Self {
        Self {
            dir: dir.to_path_buf(),
            flavor,
            meta,
            licenses: Vec::new(),
            deprecated: Vec::new(),
            exceptions: Vec::new(),
        }
    }

    fn annotated(&self) -> bool {
        self.flavor != HtmlFlavor::Plain
    }

    /// ` property="spdx:{name}"` for annotated flavors, empty otherwise.
    fn prop(&self, name: &str) -> String {
        if self.annotated() {
            format!(" property=\"spdx:{}\"", name)
        } else {
            String::new()
        }
    }

    fn render_page(&self, page: &Page) -> String {
        let mut out = String::new();
        let title = if page.name.is_empty() { page.id } else { page.name };

        out.push_str("<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n<meta charset=\"utf-8\">\n");
        let _ = writeln!(out, "<title>{}</title>", escape(title));
        if self.flavor == HtmlFlavor::Website {
            out.push_str("<link rel=\"stylesheet\" href=\"screen.css\">\n");
        }
        out.push_str("</head>\n");

        if self.annotated() {
            let _ = writeln!(
                out,
                "<body vocab=\"{}\" typeof=\"spdx:{}\">",
                SPDX_VOCAB, page.kind
            );
        } else {
            out.push_str("<body>\n");
        }

        let _ = writeln!(out, "<h1{}>{}</h1>", self.prop("name"), escape(title));
        out.push_str("<dl>\n");
        let _ = writeln!(
            out,
            "<dt>Identifier</dt><dd><code{}>{}</code></dd>",
            self.prop("licenseId"),
            escape(page.id)
        );
        if let Some(osi) = page.osi_approved {
            let _ = writeln!(
                out,
                "<dt>OSI approved</dt><dd{}>{}</dd>",
                self.prop("isOsiApproved"),
                yes_no(osi)
            );
        }
        if let Some(fsf) = page.fsf_libre {
            let _ = writeln!(
                out,
                "<dt>FSF libre</dt><dd{}>{}</dd>",
                self.prop("isFsfLibre"),
                yes_no(fsf)
            );
        }
        if let Some(version) = page.deprecated_version {
            let _ = writeln!(
                out,
                "<dt>Deprecated</dt><dd>Deprecated since list version <span{}>{}</span></dd>",
                self.prop("deprecatedVersion"),
                escape(version)
            );
        }
        if !page.see_also.is_empty() {
            out.push_str("<dt>Other web pages</dt><dd><ul>\n");
            for url in page.see_also {
                let rel = if self.annotated() { " rel=\"rdfs:seeAlso\"" } else { "" };
                let _ = writeln!(
                    out,
                    "<li><a href=\"{0}\"{1}>{0}</a></li>",
                    escape(url.as_str()),
                    rel
                );
            }
            out.push_str("</ul></dd>\n");
        }
        if let Some(comments) = page.comments {
            let _ = writeln!(out, "<dt>Notes</dt><dd>{}</dd>", escape(comments));
        }
        out.push_str("</dl>\n");

        if let Some(header) = page.header {
            out.push_str("<h2>Standard license header</h2>\n");
            let _ = writeln!(
                out,
                "<div{}>\n{}</div>",
                self.prop("standardLicenseHeader"),
                paragraphs(header)
            );
        }

        out.push_str("<h2>Text</h2>\n");
        let _ = writeln!(
            out,
            "<div{}>\n{}</div>",
            self.prop("licenseText"),
            paragraphs(page.text)
        );

        let _ = writeln!(
            out,
            "<footer>License list version {}, released {}</footer>",
            escape(self.meta.version_or_unknown()),
            escape(self.meta.release_date_or_unknown())
        );
        out.push_str("</body>\n</html>\n");
        out
    }

    fn render_index(&self) -> String {
        let mut out = String::new();
        out.push_str("<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n<meta charset=\"utf-8\">\n");
        out.push_str("<title>License List</title>\n");
        out.push_str("<link rel=\"stylesheet\" href=\"screen.css\">\n");
        out.push_str("<script src=\"sorttable.js\"></script>\n</head>\n<body>\n");
        out.push_str("<h1>License List</h1>\n");
        let _ = writeln!(
            out,
            "<p>Version: {}<br>Released: {}</p>",
            escape(self.meta.version_or_unknown()),
            escape(self.meta.release_date_or_unknown())
        );

        out.push_str("<h2>Licenses</h2>\n");
        render_table(
            &mut out,
            &self.licenses,
            &["Full name", "Identifier", "OSI approved", "FSF libre"],
            |r| vec![yes_no(r.osi_approved).to_string(), yes_no(r.fsf_libre).to_string()],
        );

        out.push_str("<h2>Exceptions</h2>\n");
        render_table(&mut out, &self.exceptions, &["Full name", "Identifier"], |_| Vec::new());

        out.push_str("<h2>Deprecated licenses</h2>\n");
        render_table(
            &mut out,
            &self.deprecated,
            &["Full name", "Identifier", "Deprecated since"],
            |r| vec![r.deprecated_version.clone().unwrap_or_default()],
        );

        out.push_str("</body>\n</html>\n");
        out
    }
}

fn render_table(
    out: &mut String,
    rows: &[IndexRow],
    headers: &[&str],
    extra: impl Fn(&IndexRow) -> Vec<String>,
) {
    out.push_str("<table class=\"sortable\">\n<thead><tr>");
    for h in headers {
        let _ = write!(out, "<th>{}</th>", h);
    }
    out.push_str("</tr></thead>\n<tbody>\n");
    for row in rows {
        let _ = write!(
            out,
            "<tr><td><a href=\"{}\">{}</a></td><td><code>{}</code></td>",
            escape(row.file.as_str()),
            escape(row.name.as_str()),
            escape(row.id.as_str())
        );
        for cell in extra(row) {
            let _ = write!(out, "<td>{}</td>", escape(cell.as_str()));
        }
        out.push_str("</tr>\n");
    }
    out.push_str("</tbody>\n</table>\n");
}

fn yes_no(value: bool) -> &'static str {
    if value {
        "Yes"
    } else {
        "No"
    }
}

/// Blank-line separated blocks become `<p>` elements; single line breaks
/// become `<br>`.
fn paragraphs(text: &str) -> String {
    let mut out = String::new();
    for block in text.split("\n\n").map(str::trim).filter(|b| !b.is_empty()) {
        let lines: Vec<String> = block.lines().map(|l| escape(l.trim()).into_owned()).collect();
        let _ = writeln!(out, "<p>{}</p>", lines.join("<br>\n"));
    }
    out
}

impl LicenseFormatWriter for HtmlFormatWriter {
    fn name(&self) -> &'static str {
        match self.flavor {
            HtmlFlavor::Plain => "html",
            HtmlFlavor::Rdfa => "rdfa",
            HtmlFlavor::Website => "website",
        }
    }

    fn write_license(
        &mut self,
        license: &License,
        deprecated: bool,
        deprecated_version: Option<&str>,
    ) -> Result<(), WriterError> {
        let file = record_file_name(&license.id, deprecated, ".html");
        let page = Page {
            kind: "ListedLicense",
            id: &license.id,
            name: &license.name,
            text: &license.text,
            header: license.header.as_deref(),
            see_also: &license.see_also,
            comments: license.comments.as_deref(),
            osi_approved: Some(license.osi_approved),
            fsf_libre: Some(license.fsf_libre),
            deprecated_version: deprecated.then(|| deprecated_version.unwrap_or("")),
        };
        std::fs::write(self.dir.join(&file), self.render_page(&page))?;

        let row = IndexRow {
            id: license.id.clone(),
            name: license.name.clone(),
            file,
            osi_approved: license.osi_approved,
            fsf_libre: license.fsf_libre,
            deprecated_version: deprecated_version.map(str::to_string),
        };
        if deprecated {
            self.deprecated.push(row);
        } else {
            self.licenses.push(row);
        }
        Ok(())
    }

    fn write_exception(
        &mut self,
        exception: &LicenseException,
        deprecated: bool,
        deprecated_version: Option<&str>,
    ) -> Result<(), WriterError> {
        let file = record_file_name(&exception.id, deprecated, ".html");
        let page = Page {
            kind: "ListedLicenseException",
            id: &exception.id,
            name: &exception.name,
            text: &exception.text,
            header: None,
            see_also: &exception.see_also,
            comments: exception.comments.as_deref(),
            osi_approved: None,
            fsf_libre: None,
            deprecated_version: deprecated.then(|| deprecated_version.unwrap_or("")),
        };
        std::fs::write(self.dir.join(&file), self.render_page(&page))?;

        self.exceptions.push(IndexRow {
            id: exception.id.clone(),
            name: exception.name.clone(),
            file,
            osi_approved: false,
            fsf_libre: false,
            deprecated_version: deprecated_version.map(str::to_string),
        });
        Ok(())
    }

    fn write_toc(&mut self) -> Result<(), WriterError> {
        if self.flavor == HtmlFlavor::Website {
            std::fs::write(self.dir.join("index.html"), self.render_index())?;
        }
        Ok(())
    }
}
