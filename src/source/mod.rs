//! License sources.
//!
//! A [`LicenseProvider`] yields the records of one license list. Two
//! interchangeable implementations exist, picked by [`open_provider`] from the
//! shape of the input path:
//!
//! - [`xml::XmlLicenseProvider`] — a directory of license XML files.
//! - [`bundle::BundleLicenseProvider`] — a single `.toml` bundle file.

use std::path::Path;

use crate::error::SourceError;
use crate::models::{DeprecatedLicense, License, LicenseException};

pub mod bundle;
pub mod xml;

/// Single-pass sequence of records; each item may fail independently.
pub type RecordIter<'a, T> = Box<dyn Iterator<Item = Result<T, SourceError>> + 'a>;

pub trait LicenseProvider {
    /// Non-deprecated licenses, in source order.
    fn licenses(&mut self) -> Result<RecordIter<'_, License>, SourceError>;

    fn exceptions(&mut self) -> Result<RecordIter<'_, LicenseException>, SourceError>;

    fn deprecated_licenses(&mut self) -> Result<RecordIter<'_, DeprecatedLicense>, SourceError>;

    /// Problems noticed in the source itself; complete once iteration is done.
    fn warnings(&self) -> Vec<String>;

    /// License list version recorded in the source, if any.
    fn list_version(&self) -> Option<&str> {
        None
    }

    fn release_date(&self) -> Option<&str> {
        None
    }
}

/// Choose a provider from the input's shape: a directory of XML files or a
/// `.toml` bundle.
pub fn open_provider(input: &Path) -> Result<Box<dyn LicenseProvider>, SourceError> {
    if input.is_dir() {
        return Ok(Box::new(xml::XmlLicenseProvider::open(input)?));
    }

    let is_bundle = input
        .extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case("toml"));

    if input.is_file() && is_bundle {
        return Ok(Box::new(bundle::BundleLicenseProvider::open(input)?));
    }

    Err(SourceError::Unsupported(input.to_path_buf()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unsupported_input_shape() {
        let dir = tempfile::tempdir().unwrap();
        let xls = dir.path().join("licenses.xls");
        std::fs::write(&xls, b"not a list").unwrap();
        assert!(matches!(
            open_provider(&xls),
            Err(SourceError::Unsupported(_))
        ));
        assert!(matches!(
            open_provider(&dir.path().join("missing.toml")),
            Err(SourceError::Unsupported(_))
        ));
    }

    #[test]
    fn test_directory_opens_xml_provider() {
        let dir = tempfile::tempdir().unwrap();
        let mut provider = open_provider(dir.path()).unwrap();
        assert_eq!(provider.licenses().unwrap().count(), 0);
        assert!(provider.list_version().is_none());
    }

    #[test]
    fn test_toml_file_opens_bundle_provider() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("list.toml");
        std::fs::write(&path, "[list]\nversion = \"3.1\"\n").unwrap();
        let provider = open_provider(&path).unwrap();
        assert_eq!(provider.list_version(), Some("3.1"));
    }
}
