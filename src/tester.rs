use std::path::{Path, PathBuf};

use crate::check::compare::TextEquivalence;
use crate::models::{License, LicenseException};

/// Compares generated records against an independently maintained corpus.
///
/// Each returned string describes one mismatch; an empty list means the
/// record passed. Implementations report problems instead of failing.
pub trait LicenseTester {
    fn test_license(&self, license: &License) -> Vec<String>;
    fn test_exception(&self, exception: &LicenseException) -> Vec<String>;
}

/// Tester reading `{dir}/{id}.txt` reference files.
pub struct ReferenceDirTester<'a> {
    dir: PathBuf,
    comparator: &'a dyn TextEquivalence,
}

impl<'a> ReferenceDirTester<'a> {
    pub fn new(dir: &Path, comparator: &'a dyn TextEquivalence) -> Self {
        Self {
            dir: dir.to_path_buf(),
            comparator,
        }
    }

    fn test_text(&self, id: &str, text: &str) -> Vec<String> {
        let file_name = format!("{}.txt", id);
        let path = self.dir.join(&file_name);
        if !path.is_file() {
            return vec![format!("missing reference text file {}", file_name)];
        }

        let reference = match std::fs::read_to_string(&path) {
            Ok(reference) => reference,
            Err(e) => return vec![format!("unable to read {}: {}", file_name, e)],
        };

        match self.comparator.first_difference(&reference, text) {
            Some(diff) => vec![diff.to_string()],
            None => Vec::new(),
        }
    }
}

impl LicenseTester for ReferenceDirTester<'_> {
    fn test_license(&self, license: &License) -> Vec<String> {
        self.test_text(&license.id, &license.text)
    }

    fn test_exception(&self, exception: &LicenseException) -> Vec<String> {
        self.test_text(&exception.id, &exception.text)
    }
}
