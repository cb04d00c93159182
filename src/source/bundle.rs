use std::path::{Path, PathBuf};

use serde::Deserialize;

use super::{LicenseProvider, RecordIter};
use crate::error::SourceError;
use crate::models::{DeprecatedLicense, License, LicenseException};

/// Single-file license list: list metadata plus license, exception and
/// deprecated-license tables. Record text is inline or in a file relative to
/// the bundle.
#[derive(Debug, Deserialize)]
struct BundleFile {
    #[serde(default)]
    list: ListInfo,
    #[serde(default, rename = "license")]
    licenses: Vec<BundleRecord>,
    #[serde(default, rename = "exception")]
    exceptions: Vec<BundleRecord>,
    #[serde(default)]
    deprecated: Vec<BundleRecord>,
}

#[derive(Debug, Default, Deserialize)]
struct ListInfo {
    version: Option<String>,
    release_date: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct BundleRecord {
    id: String,
    name: String,
    text: Option<String>,
    text_file: Option<PathBuf>,
    template: Option<String>,
    template_file: Option<PathBuf>,
    header: Option<String>,
    see_also: Vec<String>,
    comments: Option<String>,
    osi_approved: bool,
    deprecated_version: Option<String>,
}

/// Provider backed by a `.toml` bundle.
///
/// The bundle is parsed once at open; text files are read lazily as records
/// are iterated.
pub struct BundleLicenseProvider {
    base_dir: PathBuf,
    bundle: BundleFile,
    warnings: Vec<String>,
}

impl BundleLicenseProvider {
    pub fn open(path: &Path) -> Result<Self, SourceError> {
        let content = std::fs::read_to_string(path).map_err(|source| SourceError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let bundle: BundleFile = toml::from_str(&content).map_err(|source| SourceError::Toml {
            path: path.to_path_buf(),
            source,
        })?;

        Ok(Self {
            base_dir: path.parent().map(Path::to_path_buf).unwrap_or_default(),
            bundle,
            warnings: Vec::new(),
        })
    }
}

/// Resolve a record's text: inline text wins over a text file.
fn resolve_text(
    base_dir: &Path,
    id: &str,
    inline: Option<&String>,
    file: Option<&PathBuf>,
) -> Result<Option<String>, SourceError> {
    if let Some(text) = inline {
        return Ok(Some(text.clone()));
    }
    let Some(file) = file else {
        return Ok(None);
    };

    let path = base_dir.join(file);
    if !path.is_file() {
        return Err(SourceError::MissingText {
            id: id.to_string(),
            path,
        });
    }
    std::fs::read_to_string(&path)
        .map(Some)
        .map_err(|source| SourceError::Io { path, source })
}

fn push_unique(warnings: &mut Vec<String>, warning: String) {
    if !warnings.contains(&warning) {
        warnings.push(warning);
    }
}

fn build_license(
    base_dir: &Path,
    record: &BundleRecord,
    warnings: &mut Vec<String>,
) -> Result<License, SourceError> {
    let text = resolve_text(base_dir, &record.id, record.text.as_ref(), record.text_file.as_ref())?;
    if text.is_none() {
        push_unique(warnings, format!("No text found for license {}", record.id));
    }
    let template = resolve_text(
        base_dir,
        &record.id,
        record.template.as_ref(),
        record.template_file.as_ref(),
    )?;

    Ok(License {
        id: record.id.clone(),
        name: record.name.clone(),
        text: text.unwrap_or_default(),
        template,
        header: record.header.clone(),
        see_also: record.see_also.clone(),
        comments: record.comments.clone(),
        osi_approved: record.osi_approved,
        fsf_libre: false,
        deprecated: false,
        deprecated_version: None,
    })
}

impl LicenseProvider for BundleLicenseProvider {
    fn licenses(&mut self) -> Result<RecordIter<'_, License>, SourceError> {
        let base_dir = &self.base_dir;
        let warnings = &mut self.warnings;
        let iter = self
            .bundle
            .licenses
            .iter()
            .map(move |record| build_license(base_dir, record, warnings));
        Ok(Box::new(iter))
    }

    fn exceptions(&mut self) -> Result<RecordIter<'_, LicenseException>, SourceError> {
        let base_dir = &self.base_dir;
        let warnings = &mut self.warnings;
        let iter = self.bundle.exceptions.iter().map(move |record| {
            let text =
                resolve_text(base_dir, &record.id, record.text.as_ref(), record.text_file.as_ref())?;
            if text.is_none() {
                push_unique(warnings, format!("No text found for exception {}", record.id));
            }
            let template = resolve_text(
                base_dir,
                &record.id,
                record.template.as_ref(),
                record.template_file.as_ref(),
            )?;
            Ok(LicenseException {
                id: record.id.clone(),
                name: record.name.clone(),
                text: text.unwrap_or_default(),
                template,
                see_also: record.see_also.clone(),
                comments: record.comments.clone(),
                deprecated: false,
                deprecated_version: None,
            })
        });
        Ok(Box::new(iter))
    }

    fn deprecated_licenses(&mut self) -> Result<RecordIter<'_, DeprecatedLicense>, SourceError> {
        let base_dir = &self.base_dir;
        let warnings = &mut self.warnings;
        let iter = self.bundle.deprecated.iter().map(move |record| {
            let version = record.deprecated_version.clone().unwrap_or_default();
            if version.is_empty() {
                push_unique(
                    warnings,
                    format!("No deprecated version for deprecated license {}", record.id),
                );
            }
            let mut license = build_license(base_dir, record, warnings)?;
            license.deprecated = true;
            license.deprecated_version = Some(version.clone());
            Ok(DeprecatedLicense {
                license,
                deprecated_version: version,
            })
        });
        Ok(Box::new(iter))
    }

    fn warnings(&self) -> Vec<String> {
        self.warnings.clone()
    }

    fn list_version(&self) -> Option<&str> {
        self.bundle.list.version.as_deref()
    }

    fn release_date(&self) -> Option<&str> {
        self.bundle.list.release_date.as_deref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const BUNDLE: &str = r#"
[list]
version = "3.20"
release_date = "2023-02-17"

[[license]]
id = "MIT"
name = "MIT License"
text_file = "text/MIT.txt"
osi_approved = true
see_also = ["https://opensource.org/licenses/MIT"]

[[license]]
id = "Inline"
name = "Inline License"
text = "inline body"
template = "<<var;name=x;original=inline;match=.+>> body"

[[license]]
id = "NoText"

[[exception]]
id = "Classpath-exception-2.0"
name = "Classpath exception 2.0"
text = "Linking this library"

[[deprecated]]
id = "GPL-2.0"
name = "GNU GPL v2.0 only"
text = "GNU GENERAL PUBLIC LICENSE"
deprecated_version = "3.0"
"#;

    fn bundle_dir() -> tempfile::TempDir {
        let dir = tempfile::tempdir().unwrap();
        std::fs::create_dir(dir.path().join("text")).unwrap();
        std::fs::write(dir.path().join("text/MIT.txt"), "MIT License body").unwrap();
        std::fs::write(dir.path().join("list.toml"), BUNDLE).unwrap();
        dir
    }

    #[test]
    fn test_list_metadata() {
        let dir = bundle_dir();
        let provider = BundleLicenseProvider::open(&dir.path().join("list.toml")).unwrap();
        assert_eq!(provider.list_version(), Some("3.20"));
        assert_eq!(provider.release_date(), Some("2023-02-17"));
    }

    #[test]
    fn test_licenses_resolve_text() {
        let dir = bundle_dir();
        let mut provider = BundleLicenseProvider::open(&dir.path().join("list.toml")).unwrap();
        let licenses: Vec<License> = provider.licenses().unwrap().map(Result::unwrap).collect();
        assert_eq!(licenses.len(), 3);
        assert_eq!(licenses[0].text, "MIT License body");
        assert!(licenses[0].osi_approved);
        assert_eq!(licenses[1].text, "inline body");
        assert!(licenses[1].template.is_some());
        assert_eq!(licenses[2].text, "");
        assert_eq!(provider.warnings(), vec!["No text found for license NoText"]);

        // A second pass starts over and does not repeat warnings.
        assert_eq!(provider.licenses().unwrap().count(), 3);
        assert_eq!(provider.warnings().len(), 1);
    }

    #[test]
    fn test_exceptions_and_deprecated() {
        let dir = bundle_dir();
        let mut provider = BundleLicenseProvider::open(&dir.path().join("list.toml")).unwrap();
        let exceptions: Vec<_> = provider.exceptions().unwrap().map(Result::unwrap).collect();
        assert_eq!(exceptions[0].id, "Classpath-exception-2.0");

        let deprecated: Vec<_> = provider
            .deprecated_licenses()
            .unwrap()
            .map(Result::unwrap)
            .collect();
        assert_eq!(deprecated[0].deprecated_version, "3.0");
        assert!(deprecated[0].license.deprecated);
        assert_eq!(deprecated[0].license.deprecated_version.as_deref(), Some("3.0"));
    }

    #[test]
    fn test_missing_text_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("list.toml");
        std::fs::write(&path, "[[license]]\nid = \"X\"\ntext_file = \"nope.txt\"\n").unwrap();
        let mut provider = BundleLicenseProvider::open(&path).unwrap();
        let first = provider.licenses().unwrap().next().unwrap();
        assert!(matches!(first, Err(SourceError::MissingText { .. })));
    }

    #[test]
    fn test_malformed_bundle() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("list.toml");
        std::fs::write(&path, "[[license]\nid = ").unwrap();
        assert!(matches!(
            BundleLicenseProvider::open(&path),
            Err(SourceError::Toml { .. })
        ));
    }
}
