use std::collections::HashSet;

use super::compare::TextEquivalence;
use crate::models::Warning;

/// Running memory of license texts, compared by semantic equivalence.
///
/// Every new text is compared with all previously seen ones in insertion
/// order; quadratic, but license lists are in the hundreds.
pub struct LicenseDuplicates<'a> {
    comparator: &'a dyn TextEquivalence,
    seen: Vec<(String, String)>,
}

impl<'a> LicenseDuplicates<'a> {
    pub fn new(comparator: &'a dyn TextEquivalence) -> Self {
        Self {
            comparator,
            seen: Vec::new(),
        }
    }

    /// Record `(id, text)` and return a warning naming the first earlier
    /// license with equivalent text. The pair is stored either way.
    pub fn check(&mut self, id: &str, text: &str) -> Option<Warning> {
        let warning = self
            .seen
            .iter()
            .find(|(_, seen_text)| self.comparator.is_equivalent(seen_text, text))
            .map(|(seen_id, _)| Warning::duplicate_license(id, seen_id));
        self.seen.push((id.to_string(), text.to_string()));
        warning
    }
}

/// Running memory of exception texts, compared exactly after trimming.
#[derive(Default)]
pub struct ExceptionDuplicates {
    seen: Vec<(String, String)>,
}

impl ExceptionDuplicates {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn check(&mut self, id: &str, text: &str) -> Option<Warning> {
        let trimmed = text.trim();
        let warning = self
            .seen
            .iter()
            .find(|(_, seen_text)| seen_text == trimmed)
            .map(|(seen_id, _)| Warning::duplicate_exception(id, seen_id));
        self.seen.push((id.to_string(), trimmed.to_string()));
        warning
    }
}

/// License ids collected before the exception pass.
///
/// `None` means the ids could not be enumerated and the check is disabled.
pub struct IdCollisions {
    license_ids: Option<HashSet<String>>,
}

impl IdCollisions {
    pub fn new(license_ids: Option<HashSet<String>>) -> Self {
        Self { license_ids }
    }

    pub fn check(&self, exception_id: &str) -> Option<Warning> {
        self.license_ids
            .as_ref()
            .filter(|ids| ids.contains(exception_id.trim()))
            .map(|_| Warning::id_collision(exception_id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::check::compare::TemplateAwareComparator;
    use crate::models::WarningKind;

    #[test]
    fn test_equivalent_licenses_warn_once_in_either_order() {
        let comparator = TemplateAwareComparator::new().unwrap();

        let mut dups = LicenseDuplicates::new(&comparator);
        assert!(dups.check("A", "MIT License body").is_none());
        let w = dups.check("B", "MIT License body   \n").unwrap();
        assert_eq!(w.kind, WarningKind::DuplicateLicense);
        assert_eq!(w.message, "Duplicates licenses: B, A");

        let mut dups = LicenseDuplicates::new(&comparator);
        assert!(dups.check("B", "MIT License body   \n").is_none());
        let w = dups.check("A", "MIT License body").unwrap();
        assert!(w.message.contains('A') && w.message.contains('B'));
    }

    #[test]
    fn test_only_first_match_is_reported() {
        let comparator = TemplateAwareComparator::new().unwrap();
        let mut dups = LicenseDuplicates::new(&comparator);
        dups.check("A", "same");
        dups.check("B", "same");
        let w = dups.check("C", "same").unwrap();
        assert_eq!(w.message, "Duplicates licenses: C, A");
    }

    #[test]
    fn test_distinct_texts_do_not_warn() {
        let comparator = TemplateAwareComparator::new().unwrap();
        let mut dups = LicenseDuplicates::new(&comparator);
        assert!(dups.check("A", "one text").is_none());
        assert!(dups.check("B", "another text").is_none());
    }

    #[test]
    fn test_exception_comparison_is_exact_after_trim() {
        let mut dups = ExceptionDuplicates::new();
        assert!(dups.check("E1", "Exception body").is_none());
        assert!(dups.check("E2", "exception   body").is_none());
        let w = dups.check("E3", "  Exception body\n").unwrap();
        assert_eq!(w.message, "Duplicates exceptions: E3, E1");
    }

    #[test]
    fn test_id_collision() {
        let ids: HashSet<String> = ["A".to_string(), "MIT".to_string()].into();
        let collisions = IdCollisions::new(Some(ids));
        assert_eq!(
            collisions.check("A").unwrap().message,
            "A license ID exists with the same ID as an exception ID: A"
        );
        assert!(collisions.check("Classpath-exception-2.0").is_none());

        let disabled = IdCollisions::new(None);
        assert!(disabled.check("A").is_none());
    }
}
