//! Exit status policy.
//!
//! A run that completes with no warnings, or only ignored ones, exits
//! [`SUCCESS`]. Any unexpected warning turns it into [`WARNING_STATUS`]; fatal
//! errors exit [`ERROR_STATUS`].

use std::path::Path;

use crate::error::GeneratorError;
use crate::models::Warning;

pub const SUCCESS: i32 = 0;
pub const WARNING_STATUS: i32 = 64;
pub const ERROR_STATUS: i32 = 1;

/// Warning messages the operator expects and does not want to fail on.
///
/// Matching is case-insensitive over the whole message.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct IgnoreList {
    entries: Vec<String>,
}

impl IgnoreList {
    pub fn new(entries: Vec<String>) -> Self {
        Self { entries }
    }

    /// Parse the command-line form: a path to an existing file whose first
    /// CSV record lists the warnings, or the CSV record itself.
    pub fn from_arg(arg: &str) -> Result<Self, GeneratorError> {
        let path = Path::new(arg);
        let record = if path.exists() {
            let content = std::fs::read_to_string(path).map_err(|e| {
                GeneratorError::Argument(format!(
                    "unable to read ignored warnings {}: {}",
                    path.display(),
                    e
                ))
            })?;
            first_csv_record(&content)
        } else {
            first_csv_record(arg)
        };
        Ok(Self::new(record))
    }

    pub fn extend(&mut self, more: impl IntoIterator<Item = String>) {
        self.entries.extend(more);
    }

    pub fn matches(&self, message: &str) -> bool {
        self.entries
            .iter()
            .any(|entry| entry.to_lowercase() == message.to_lowercase())
    }
}

/// Split `warnings` into (unexpected, ignored), keeping order.
pub fn partition<'a>(warnings: &'a [Warning], ignored: &IgnoreList) -> (Vec<&'a Warning>, Vec<&'a Warning>) {
    warnings.iter().partition(|w| !ignored.matches(&w.message))
}

pub fn exit_status(warnings: &[Warning], ignored: &IgnoreList) -> i32 {
    let (unexpected, _) = partition(warnings, ignored);
    if unexpected.is_empty() {
        SUCCESS
    } else {
        WARNING_STATUS
    }
}

/// Fields of the first record of `input`. Fields may be double-quoted, with
/// `""` standing for a literal quote; quoted fields may span lines.
fn first_csv_record(input: &str) -> Vec<String> {
    let mut fields = Vec::new();
    let mut field = String::new();
    let mut in_quotes = false;
    let mut chars = input.chars().peekable();

    while let Some(c) = chars.next() {
        match c {
            '"' if in_quotes && chars.peek() == Some(&'"') => {
                field.push('"');
                chars.next();
            }
            '"' => in_quotes = !in_quotes,
            ',' if !in_quotes => fields.push(std::mem::take(&mut field)),
            '\r' | '\n' if !in_quotes => break,
            _ => field.push(c),
        }
    }

    if !field.is_empty() || !fields.is_empty() {
        fields.push(field);
    }
    fields
}
