use crate::models::{Warning, WarningKind};

/// Characters that must never appear in record text.
///
/// U+FFFD is what an upstream decoder leaves behind when it hits bytes it
/// cannot decode.
pub const INVALID_TEXT_CHARS: &[char] = &['\u{FFFD}'];

/// Report every forbidden character in `text`, one warning per occurrence.
///
/// Line numbers are 1-based and character locations 0-based, counted in
/// characters rather than bytes.
pub fn validate_text(text: &str, label: &str) -> Vec<Warning> {
    let mut warnings = Vec::new();

    for (line_idx, line) in split_lines(text).into_iter().enumerate() {
        for (col, c) in line.chars().enumerate() {
            if INVALID_TEXT_CHARS.contains(&c) {
                warnings.push(Warning::new(
                    WarningKind::InvalidCharacter,
                    format!(
                        "Invalid character in {} at line number {} \"{}\" at character location {}",
                        label,
                        line_idx + 1,
                        line,
                        col
                    ),
                ));
            }
        }
    }

    warnings
}

/// Lines ended by `\n`, `\r\n` or a lone `\r`; a trailing terminator does not
/// start an empty line.
fn split_lines(text: &str) -> Vec<&str> {
    let bytes = text.as_bytes();
    let mut lines = Vec::new();
    let mut start = 0;
    let mut i = 0;
    while i < bytes.len() {
        match bytes[i] {
            b'\n' => {
                lines.push(&text[start..i]);
                i += 1;
                start = i;
            }
            b'\r' => {
                lines.push(&text[start..i]);
                i += if bytes.get(i + 1) == Some(&b'\n') { 2 } else { 1 };
                start = i;
            }
            _ => i += 1,
        }
    }
    if start < text.len() {
        lines.push(&text[start..]);
    }
    lines
}

pub fn license_label(id: &str) -> String {
    format!("License text for {}", id)
}

pub fn exception_label(id: &str) -> String {
    format!("License Exception Text for {}", id)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clean_text_has_no_warnings() {
        assert!(validate_text("Permission is hereby granted\nfree of charge", "x").is_empty());
        assert!(validate_text("", "x").is_empty());
    }

    #[test]
    fn test_location_is_reported() {
        let text = "first line\nsecond \u{FFFD}line\nthird";
        let warnings = validate_text(text, &license_label("MIT"));
        assert_eq!(warnings.len(), 1);
        assert_eq!(warnings[0].kind, WarningKind::InvalidCharacter);
        assert_eq!(
            warnings[0].message,
            "Invalid character in License text for MIT at line number 2 \"second \u{FFFD}line\" at character location 7"
        );
    }

    #[test]
    fn test_one_warning_per_occurrence() {
        let text = "\u{FFFD}a\u{FFFD}\r\nb\u{FFFD}";
        let warnings = validate_text(text, &exception_label("E"));
        assert_eq!(warnings.len(), 3);
        assert!(warnings[0].message.ends_with("at character location 0"));
        assert!(warnings[1].message.ends_with("at character location 2"));
        assert!(warnings[2].message.contains("line number 2"));
        assert!(warnings[2].message.starts_with("Invalid character in License Exception Text for E"));

        let warnings = validate_text("one\rtwo \u{FFFD}\rthree\u{FFFD}", "x");
        assert_eq!(warnings.len(), 2);
        assert_eq!(
            warnings[0].message,
            "Invalid character in x at line number 2 \"two \u{FFFD}\" at character location 4"
        );
        assert!(warnings[1].message.contains("line number 3 \"three\u{FFFD}\""));
    }

    #[test]
    fn test_split_lines_terminators() {
        assert_eq!(split_lines("a\r\nb\rc\nd\n"), vec!["a", "b", "c", "d"]);
        assert_eq!(split_lines("\n\nx"), vec!["", "", "x"]);
        assert!(split_lines("").is_empty());
    }

    #[test]
    fn test_columns_count_characters_not_bytes() {
        let warnings = validate_text("é€\u{FFFD}", "x");
        assert!(warnings[0].message.ends_with("at character location 2"));
    }
}
