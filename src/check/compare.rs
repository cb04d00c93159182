use regex::Regex;

/// Decides whether two license texts say the same thing.
pub trait TextEquivalence {
    fn is_equivalent(&self, a: &str, b: &str) -> bool;

    /// Describe the first place where `candidate` departs from `expected`,
    /// or `None` when the two are equivalent.
    fn first_difference(&self, expected: &str, candidate: &str) -> Option<TextDifference>;
}

/// First token mismatch between two normalized texts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextDifference {
    /// 0-based index into the normalized token stream.
    pub token_index: usize,
    pub expected: Option<String>,
    pub found: Option<String>,
}

impl std::fmt::Display for TextDifference {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let show = |t: &Option<String>| match t {
            Some(s) => format!("\"{}\"", s),
            None => "end of text".to_string(),
        };
        write!(
            f,
            "text differs at token {}: expected {}, found {}",
            self.token_index,
            show(&self.expected),
            show(&self.found)
        )
    }
}

/// Token-level comparison that ignores case, whitespace layout, quote and
/// dash variants, and template markup.
///
/// `<<var;...;original=X;...>>` is replaced by `X`; optional-block markers are
/// dropped while their contents are kept.
pub struct TemplateAwareComparator {
    var_re: Regex,
    optional_re: Regex,
}

impl TemplateAwareComparator {
    pub fn new() -> Result<Self, regex::Error> {
        Ok(Self {
            var_re: Regex::new(r"(?s)<<var;(.*?)>>")?,
            optional_re: Regex::new(r"<<(?:beginOptional(?:;[^>]*)?|endOptional)>>")?,
        })
    }

    /// Normalize `text` into the token stream used for comparison.
    pub fn tokens(&self, text: &str) -> Vec<String> {
        let expanded = self.var_re.replace_all(text, |caps: &regex::Captures| {
            caps[1]
                .split(';')
                .find_map(|part| part.trim().strip_prefix("original="))
                .unwrap_or("")
                .trim_matches('"')
                .to_string()
        });
        let stripped = self.optional_re.replace_all(&expanded, " ");

        let unified: String = stripped
            .chars()
            .map(|c| match c {
                '\u{201C}' | '\u{201D}' | '\u{201E}' | '\u{00AB}' | '\u{00BB}' => '"',
                '\u{2018}' | '\u{2019}' | '\u{201A}' | '`' => '\'',
                '\u{2010}' | '\u{2011}' | '\u{2012}' | '\u{2013}' | '\u{2014}' | '\u{2212}' => '-',
                '\u{00A0}' => ' ',
                other => other,
            })
            .collect();

        unified
            .split_whitespace()
            .map(|t| t.to_lowercase().replace("''", "\""))
            .collect()
    }
}

impl TextEquivalence for TemplateAwareComparator {
    fn is_equivalent(&self, a: &str, b: &str) -> bool {
        self.tokens(a) == self.tokens(b)
    }

    fn first_difference(&self, expected: &str, candidate: &str) -> Option<TextDifference> {
        let expected = self.tokens(expected);
        let candidate = self.tokens(candidate);
        let len = expected.len().max(candidate.len());
        (0..len)
            .find(|&i| expected.get(i) != candidate.get(i))
            .map(|i| TextDifference {
                token_index: i,
                expected: expected.get(i).cloned(),
                found: candidate.get(i).cloned(),
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn comparator() -> TemplateAwareComparator {
        TemplateAwareComparator::new().unwrap()
    }

    #[test]
    fn test_whitespace_and_case_ignored() {
        let c = comparator();
        assert!(c.is_equivalent("MIT License body", "mit   license\n body  \n"));
        assert!(!c.is_equivalent("MIT License body", "MIT License"));
    }

    #[test]
    fn test_quotes_and_dashes_unified() {
        let c = comparator();
        assert!(c.is_equivalent(
            "the \u{201C}Software\u{201D} \u{2014} as is",
            "the \"Software\" - as is"
        ));
    }

    #[test]
    fn test_template_markup_expanded() {
        let c = comparator();
        let template = "Copyright <<var;name=\"copyright\";original=(c) Holder;match=.+>> \
                        <<beginOptional>>All rights reserved.<<endOptional>> Permission granted";
        assert!(c.is_equivalent(
            template,
            "Copyright (c) Holder All rights reserved. Permission granted"
        ));
        assert!(c.is_equivalent(
            "<<var;name=\"c\";original=\"(c) <year>\";match=\".+\">> MIT",
            "(c) <year> MIT"
        ));
    }

    #[test]
    fn test_first_difference() {
        let c = comparator();
        assert_eq!(c.first_difference("a b c", "A  b\nc"), None);
        let diff = c.first_difference("a b c", "a x c").unwrap();
        assert_eq!(diff.token_index, 1);
        assert_eq!(diff.expected.as_deref(), Some("b"));
        assert_eq!(diff.found.as_deref(), Some("x"));

        let diff = c.first_difference("a b", "a").unwrap();
        assert_eq!(diff.found, None);
        assert_eq!(
            diff.to_string(),
            "text differs at token 1: expected \"b\", found end of text"
        );
    }
}
