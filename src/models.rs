use serde::{Deserialize, Serialize};

/// A listed license as read from the source.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct License {
    pub id: String,
    pub name: String,
    pub text: String,
    /// Matching template; writers fall back to `text` when absent.
    pub template: Option<String>,
    /// Standard license header, if the license defines one.
    pub header: Option<String>,
    pub see_also: Vec<String>,
    pub comments: Option<String>,
    pub osi_approved: bool,
    /// Set by the metadata augmenter, never by a provider.
    pub fsf_libre: bool,
    pub deprecated: bool,
    pub deprecated_version: Option<String>,
}

impl License {
    /// Records without an identifier are dropped from every pipeline stage.
    pub fn has_id(&self) -> bool {
        !self.id.trim().is_empty()
    }

    /// The text used for templates: the explicit template, else the license text.
    pub fn template_text(&self) -> &str {
        self.template.as_deref().unwrap_or(&self.text)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LicenseException {
    /// May be blank; such exceptions are silently skipped.
    pub id: String,
    pub name: String,
    pub text: String,
    pub template: Option<String>,
    pub see_also: Vec<String>,
    pub comments: Option<String>,
    pub deprecated: bool,
    pub deprecated_version: Option<String>,
}

impl LicenseException {
    pub fn has_id(&self) -> bool {
        !self.id.trim().is_empty()
    }

    pub fn template_text(&self) -> &str {
        self.template.as_deref().unwrap_or(&self.text)
    }
}

/// A license retired from the list, kept for historical output.
#[derive(Debug, Clone, PartialEq)]
pub struct DeprecatedLicense {
    pub license: License,
    pub deprecated_version: String,
}

/// Category of a [`Warning`], used for grouping in reports only.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub enum WarningKind {
    InvalidCharacter,
    DuplicateLicense,
    DuplicateException,
    IdCollision,
    TestFailure,
    Source,
}

impl std::fmt::Display for WarningKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            WarningKind::InvalidCharacter => write!(f, "Invalid character"),
            WarningKind::DuplicateLicense => write!(f, "Duplicate license"),
            WarningKind::DuplicateException => write!(f, "Duplicate exception"),
            WarningKind::IdCollision => write!(f, "ID collision"),
            WarningKind::TestFailure => write!(f, "Reference test"),
            WarningKind::Source => write!(f, "Source"),
        }
    }
}

/// One detected, non-fatal problem.
///
/// The rendered `message` is what ignore lists match against, so it must carry
/// all identifying context (record id, location).
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Warning {
    pub kind: WarningKind,
    pub message: String,
}

impl Warning {
    pub fn new(kind: WarningKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }

    pub fn duplicate_license(new_id: &str, existing_id: &str) -> Self {
        Self::new(
            WarningKind::DuplicateLicense,
            format!("Duplicates licenses: {}, {}", new_id, existing_id),
        )
    }

    pub fn duplicate_exception(new_id: &str, existing_id: &str) -> Self {
        Self::new(
            WarningKind::DuplicateException,
            format!("Duplicates exceptions: {}, {}", new_id, existing_id),
        )
    }

    pub fn id_collision(id: &str) -> Self {
        Self::new(
            WarningKind::IdCollision,
            format!(
                "A license ID exists with the same ID as an exception ID: {}",
                id
            ),
        )
    }

    pub fn license_test_failed(id: &str, description: &str) -> Self {
        Self::new(
            WarningKind::TestFailure,
            format!("Test for license {} failed: {}", id, description),
        )
    }

    pub fn exception_test_failed(id: &str, description: &str) -> Self {
        Self::new(
            WarningKind::TestFailure,
            format!("Test for exception {} failed: {}", id, description),
        )
    }
}

impl std::fmt::Display for Warning {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.message)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_blank_id_is_missing() {
        let license = License {
            id: "   ".into(),
            ..Default::default()
        };
        assert!(!license.has_id());
        let exception = LicenseException::default();
        assert!(!exception.has_id());
    }

    #[test]
    fn test_template_falls_back_to_text() {
        let mut license = License {
            id: "MIT".into(),
            text: "body".into(),
            ..Default::default()
        };
        assert_eq!(license.template_text(), "body");
        license.template = Some("<<var;name=x;original=body;match=.+>>".into());
        assert!(license.template_text().starts_with("<<var"));
    }

    #[test]
    fn test_warning_messages() {
        assert_eq!(
            Warning::duplicate_license("B", "A").to_string(),
            "Duplicates licenses: B, A"
        );
        assert_eq!(
            Warning::id_collision("A").message,
            "A license ID exists with the same ID as an exception ID: A"
        );
        assert_eq!(
            Warning::license_test_failed("MIT", "missing").message,
            "Test for license MIT failed: missing"
        );
    }
}
