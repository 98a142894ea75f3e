//! Name matching for searches.
//!
//! Glob patterns support `*` (any run of characters, including none) and `?`
//! (exactly one character). Every other character is literal. Globs are
//! compiled once into a fully anchored regular expression; the all-match
//! pattern `*` compiles to nothing at all.

use crate::error::{BurrowError, Result};
use regex::{Regex, RegexBuilder};
use std::fmt;
use std::sync::Arc;

/// The pattern that matches every name.
pub const MATCH_ALL: &str = "*";

/// A compiled name matcher shared by every level of a walk.
///
/// Cloning is cheap: the compiled expression is reference counted, so
/// rebinding a search to a sub-directory never recompiles it.
#[derive(Clone)]
pub struct NameMatcher {
    regex: Arc<Regex>,
    custom: bool,
}

impl fmt::Debug for NameMatcher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NameMatcher")
            .field("regex", &self.regex.as_str())
            .field("custom", &self.custom)
            .finish()
    }
}

impl NameMatcher {
    /// Compile a glob pattern.
    ///
    /// Returns `None` for `*`, which needs no matcher.
    pub fn from_glob(pattern: &str, ignore_case: bool) -> Result<Option<Self>> {
        if pattern == MATCH_ALL {
            return Ok(None);
        }

        let regex = RegexBuilder::new(&glob_to_regex(pattern))
            .case_insensitive(ignore_case)
            .dot_matches_new_line(true)
            .build()
            .map_err(|e| BurrowError::InvalidPattern {
                pattern: pattern.to_string(),
                reason: e.to_string(),
            })?;

        Ok(Some(NameMatcher {
            regex: Arc::new(regex),
            custom: false,
        }))
    }

    /// Wrap a caller-supplied expression, used exactly as given.
    pub fn from_regex(regex: Regex) -> Self {
        NameMatcher {
            regex: Arc::new(regex),
            custom: true,
        }
    }

    pub fn is_match(&self, name: &str) -> bool {
        self.regex.is_match(name)
    }

    /// Returns true if this matcher came from a caller-supplied expression
    pub fn is_custom(&self) -> bool {
        self.custom
    }

    pub fn as_regex(&self) -> &Regex {
        &self.regex
    }
}

/// Translate a glob into an anchored regular expression source.
pub fn glob_to_regex(pattern: &str) -> String {
    let mut regex_pattern = String::with_capacity(pattern.len() * 2 + 2);
    regex_pattern.push('^');

    let mut literal = String::new();
    for c in pattern.chars() {
        match c {
            '*' | '?' => {
                regex_pattern.push_str(&regex::escape(&literal));
                literal.clear();
                regex_pattern.push_str(if c == '*' { ".*" } else { "." });
            }
            _ => literal.push(c),
        }
    }
    regex_pattern.push_str(&regex::escape(&literal));
    regex_pattern.push('$');
    regex_pattern
}

/// Check that a glob only names characters a file name may contain.
///
/// Wildcards are stripped first; an empty pattern is never valid.
pub fn is_valid_name_pattern(pattern: &str) -> bool {
    if pattern.is_empty() {
        return false;
    }
    !pattern
        .chars()
        .filter(|c| *c != '*' && *c != '?')
        .any(is_invalid_name_char)
}

#[cfg(windows)]
fn is_invalid_name_char(c: char) -> bool {
    matches!(c, '"' | '<' | '>' | '|' | ':' | '/' | '\\') || (c as u32) < 0x20
}

#[cfg(not(windows))]
fn is_invalid_name_char(c: char) -> bool {
    c == '/' || c == '\0'
}

#[cfg(test)]
mod tests {
    use super::*;

    fn glob(pattern: &str, ignore_case: bool) -> NameMatcher {
        NameMatcher::from_glob(pattern, ignore_case).unwrap().unwrap()
    }

    #[test]
    fn test_star_needs_no_matcher() {
        assert!(NameMatcher::from_glob("*", true).unwrap().is_none());
        assert!(NameMatcher::from_glob("*", false).unwrap().is_none());
    }

    #[test]
    fn test_extension_glob() {
        let m = glob("*.txt", true);
        assert!(m.is_match("a.txt"));
        assert!(m.is_match("A.TXT"));
        assert!(!m.is_match("a.txtx"));
        assert!(!m.is_match("atxt"));

        let m = glob("*.txt", false);
        assert!(m.is_match("a.txt"));
        assert!(!m.is_match("A.TXT"));
    }

    #[test]
    fn test_question_mark_is_one_char() {
        let m = glob("test?.log", true);
        assert!(m.is_match("test1.log"));
        assert!(!m.is_match("test.log"));
        assert!(!m.is_match("test12.log"));
    }

    #[test]
    fn test_wildcards_match_newlines() {
        let m = glob("*.txt", false);
        assert!(m.is_match("a\nb.txt"));
        assert!(!m.is_match("a.txt\n"));

        let m = glob("?", false);
        assert!(m.is_match("\n"));
        assert!(!m.is_match("\n\n"));
    }

    #[test]
    fn test_regex_metacharacters_are_literal() {
        let m = glob("a+b(1).[x]", false);
        assert!(m.is_match("a+b(1).[x]"));
        assert!(!m.is_match("aab(1).[x]"));
        assert!(!m.is_match("a+b1.x"));

        let m = glob("$*^", false);
        assert!(m.is_match("$money^"));
    }

    #[test]
    fn test_glob_to_regex_is_anchored() {
        assert_eq!(glob_to_regex("*.rs"), r"^.*\.rs$");
        assert_eq!(glob_to_regex("a?"), "^a.$");
    }

    #[test]
    fn test_custom_regex() {
        let m = NameMatcher::from_regex(Regex::new(r"^\d+$").unwrap());
        assert!(m.is_custom());
        assert!(m.is_match("123"));
        assert!(!m.is_match("12a"));
    }

    #[test]
    fn test_valid_name_pattern() {
        assert!(is_valid_name_pattern("*"));
        assert!(is_valid_name_pattern("*.txt"));
        assert!(is_valid_name_pattern("file?.log"));
        assert!(!is_valid_name_pattern(""));
        assert!(!is_valid_name_pattern("dir/*.txt"));
        assert!(!is_valid_name_pattern("a\0b"));
    }
}
