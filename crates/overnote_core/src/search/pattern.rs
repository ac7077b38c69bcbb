//! Search pattern compilation and paragraph matching.
//!
//! # Invariants
//! - Default phrases are matched case-insensitively.
//! - Raw mode passes the phrase to the regex engine unmodified.
//! - A paragraph is a run of text separated by one blank line (`\n\n`).

use regex::Regex;
use std::error::Error;
use std::fmt::{Display, Formatter};

const PARAGRAPH_SEPARATOR: &str = "\n\n";

pub type SearchResult<T> = Result<T, SearchError>;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SearchError {
    /// Phrase did not compile as a regular expression.
    InvalidPattern { pattern: String, message: String },
}

impl Display for SearchError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidPattern { pattern, message } => {
                write!(f, "failed to compile pattern `{pattern}`: {message}")
            }
        }
    }
}

impl Error for SearchError {}

/// Compiled search phrase.
#[derive(Debug, Clone)]
pub struct SearchPattern {
    phrase: String,
    regex: Regex,
}

impl SearchPattern {
    /// Compiles `phrase`.
    ///
    /// When `raw` is `false` the phrase is prefixed with `(?i)`; otherwise
    /// the phrase keeps its own flags.
    pub fn compile(phrase: &str, raw: bool) -> SearchResult<Self> {
        let pattern = if raw {
            phrase.to_string()
        } else {
            format!("(?i){phrase}")
        };

        let regex = Regex::new(&pattern).map_err(|err| SearchError::InvalidPattern {
            pattern: pattern.clone(),
            message: err.to_string(),
        })?;

        Ok(Self {
            phrase: phrase.to_string(),
            regex,
        })
    }

    pub fn phrase(&self) -> &str {
        &self.phrase
    }

    pub fn regex(&self) -> &Regex {
        &self.regex
    }

    pub fn is_match(&self, text: &str) -> bool {
        self.regex.is_match(text)
    }
}

/// Keeps the paragraphs of `body` that match `pattern`.
///
/// Kept paragraphs are rejoined with a blank line and the result is
/// trimmed. Returns an empty string when nothing matched.
pub fn matching_paragraphs(body: &str, pattern: &Regex) -> String {
    let kept = body
        .split(PARAGRAPH_SEPARATOR)
        .filter(|paragraph| pattern.is_match(paragraph))
        .collect::<Vec<_>>();

    kept.join(PARAGRAPH_SEPARATOR).trim().to_string()
}

#[cfg(test)]
mod tests {
    use super::{matching_paragraphs, SearchError, SearchPattern};

    #[test]
    fn keeps_only_matching_paragraphs() {
        let pattern = SearchPattern::compile("fox", false).unwrap();
        assert_eq!(matching_paragraphs("A fox\n\nB dog", pattern.regex()), "A fox");
    }

    #[test]
    fn no_match_yields_empty_string() {
        let pattern = SearchPattern::compile("THE", false).unwrap();
        assert_eq!(matching_paragraphs("A fox\n\nB dog", pattern.regex()), "");
    }

    #[test]
    fn default_mode_ignores_case() {
        let pattern = SearchPattern::compile("FOX", false).unwrap();
        assert!(pattern.is_match("a quick fox"));
    }

    #[test]
    fn raw_mode_keeps_case_sensitivity() {
        let pattern = SearchPattern::compile("FOX", true).unwrap();
        assert!(!pattern.is_match("a quick fox"));
        let pattern = SearchPattern::compile("(?i)FOX", true).unwrap();
        assert!(pattern.is_match("a quick fox"));
    }

    #[test]
    fn rejoins_multiple_matches_with_blank_line() {
        let pattern = SearchPattern::compile("tar", false).unwrap();
        let body = "tar -x\n\nzip -r\n\ntar -c\n";
        assert_eq!(matching_paragraphs(body, pattern.regex()), "tar -x\n\ntar -c");
    }

    #[test]
    fn invalid_pattern_is_reported() {
        let err = SearchPattern::compile("(", true).unwrap_err();
        assert!(matches!(err, SearchError::InvalidPattern { .. }));
    }
}
