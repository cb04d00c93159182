use std::collections::{HashMap, HashSet};
use std::path::Path;

use serde::Deserialize;

use crate::error::GeneratorError;
use crate::models::{License, LicenseException};

/// Adds metadata from outside the license source before a record is checked
/// and written.
pub trait MetadataAugmenter {
    fn augment_license(&self, license: &mut License);

    /// Exceptions carry no external metadata yet.
    fn augment_exception(&self, _exception: &mut LicenseException) {}
}

/// FSF license data, as published by the FSF license API
/// (`licenses-full.json`).
#[derive(Debug, Deserialize)]
struct FsfData {
    #[serde(default)]
    licenses: HashMap<String, FsfEntry>,
}

#[derive(Debug, Deserialize)]
struct FsfEntry {
    #[serde(default)]
    identifiers: FsfIdentifiers,
    #[serde(default)]
    tags: Vec<String>,
}

#[derive(Debug, Default, Deserialize)]
struct FsfIdentifiers {
    #[serde(default)]
    spdx: Vec<String>,
}

/// Sets [`License::fsf_libre`] for every SPDX id the FSF tags `libre`.
#[derive(Debug, Default)]
pub struct FsfLibreAugmenter {
    libre_ids: HashSet<String>,
}

impl FsfLibreAugmenter {
    /// No FSF data: every license is reported as not libre.
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        let data: FsfData = serde_json::from_str(json)?;
        let libre_ids = data
            .licenses
            .into_values()
            .filter(|entry| entry.tags.iter().any(|t| t == "libre"))
            .flat_map(|entry| entry.identifiers.spdx)
            .collect();
        Ok(Self { libre_ids })
    }

    pub fn load(path: &Path) -> Result<Self, GeneratorError> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            GeneratorError::Argument(format!("unable to read FSF data {}: {}", path.display(), e))
        })?;
        Self::from_json(&content).map_err(|e| {
            GeneratorError::Argument(format!("invalid FSF data {}: {}", path.display(), e))
        })
    }

    pub fn is_libre(&self, id: &str) -> bool {
        self.libre_ids.contains(id)
    }
}

impl MetadataAugmenter for FsfLibreAugmenter {
    fn augment_license(&self, license: &mut License) {
        license.fsf_libre = self.is_libre(&license.id);
    }
}
