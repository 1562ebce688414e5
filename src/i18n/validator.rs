//! Catalog consistency checks.
//!
//! Used at startup (and by the `check-catalogs` binary) to make sure every
//! served catalog has the keys the pages need, and that translations keep
//! the `{placeholder}` names of the default catalog.

use crate::i18n::Catalog;
use regex::Regex;
use std::collections::BTreeSet;
use std::sync::OnceLock;

/// Validation report containing errors and warnings about a catalog.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ValidationReport {
    /// Problems that make the catalog unusable
    pub errors: Vec<String>,

    /// Problems worth a log line but not worth refusing to start
    pub warnings: Vec<String>,
}

impl ValidationReport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }

    pub fn has_warnings(&self) -> bool {
        !self.warnings.is_empty()
    }

    /// No errors and no warnings.
    pub fn is_clean(&self) -> bool {
        !self.has_errors() && !self.has_warnings()
    }

    /// Append another report's findings to this one.
    pub fn merge(&mut self, other: ValidationReport) {
        self.errors.extend(other.errors);
        self.warnings.extend(other.warnings);
    }
}

/// Validator for message catalogs.
pub struct CatalogValidator;

static PLACEHOLDER_REGEX: OnceLock<Regex> = OnceLock::new();

impl CatalogValidator {
    /// Check that a catalog defines every key in `keys`.
    ///
    /// Each missing key is reported as an error.
    pub fn require_keys(catalog: &Catalog, keys: &[&str]) -> ValidationReport {
        let mut report = ValidationReport::new();

        for key in keys {
            if catalog.get(key).is_none() {
                report.errors.push(format!("Missing key: {}", key));
            }
        }

        report
    }

    /// Compare a translated catalog against the reference (default) one.
    ///
    /// This checks that:
    /// - every reference key exists in the candidate (error)
    /// - the candidate has no keys the reference lacks (warning)
    /// - shared keys use the same placeholder names (warning)
    pub fn compare(reference: &Catalog, candidate: &Catalog) -> ValidationReport {
        let mut report = ValidationReport::new();

        for key in reference.keys() {
            match candidate.get(key) {
                None => report.errors.push(format!("Missing key: {}", key)),
                Some(translated) => {
                    let expected = Self::extract_placeholders(reference.get(key).unwrap_or_default());
                    let actual = Self::extract_placeholders(translated);
                    if expected != actual {
                        report.warnings.push(format!(
                            "Placeholder mismatch in {}: expected {:?}, found {:?}",
                            key, expected, actual
                        ));
                    }
                }
            }
        }

        for key in candidate.keys() {
            if reference.get(key).is_none() {
                report.warnings.push(format!("Unknown key: {}", key));
            }
        }

        report
    }

    /// Extract the set of `{name}` placeholders in a message
    fn extract_placeholders(text: &str) -> BTreeSet<String> {
        let regex = PLACEHOLDER_REGEX
            .get_or_init(|| Regex::new(r"\{([a-zA-Z_][a-zA-Z0-9_]*)\}").unwrap());

        regex
            .captures_iter(text)
            .filter_map(|cap| cap.get(1).map(|m| m.as_str().to_string()))
            .collect()
    }
}
