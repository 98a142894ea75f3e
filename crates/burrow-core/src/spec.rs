//! Search specifications.
//!
//! A [`SearchSpec`] describes one enumeration request: where to start, which
//! names to match, which kinds of entries to return and how to walk. It is
//! validated once at construction and never changes afterwards; walking into
//! a sub-directory produces a rebound copy through [`SearchSpec::derive`].

use crate::error::{BurrowError, Result};
use crate::pattern::{is_valid_name_pattern, NameMatcher, MATCH_ALL};
use crate::types::{EntryKind, ErrorPolicy, FileFindInfo, SearchOrder};
use regex::Regex;
use std::path::{Path, PathBuf};

/// An immutable, validated search request.
#[derive(Debug, Clone)]
pub struct SearchSpec {
    path: PathBuf,
    pattern: String,
    include_files: bool,
    include_dirs: bool,
    order: SearchOrder,
    ignore_case: bool,
    matcher: Option<NameMatcher>,
    error_policy: ErrorPolicy,
}

impl SearchSpec {
    /// Create a glob search.
    ///
    /// # Errors
    ///
    /// Fails with `InvalidArgument` if both inclusion flags are false, if
    /// `AllSubdirectories` is combined with anything but `*`, or if the
    /// pattern names characters a file name cannot contain.
    ///
    /// # Example
    /// ```
    /// use burrow_core::{SearchOrder, SearchSpec};
    /// let spec = SearchSpec::new("/var/log", "*.log", true, false, SearchOrder::AllDirectories, true).unwrap();
    /// assert!(spec.is_match("syslog.log"));
    /// ```
    pub fn new(
        path: impl Into<PathBuf>,
        pattern: &str,
        include_files: bool,
        include_dirs: bool,
        order: SearchOrder,
        ignore_case: bool,
    ) -> Result<Self> {
        check_flags(include_files, include_dirs)?;
        if order == SearchOrder::AllSubdirectories && pattern != MATCH_ALL {
            return Err(BurrowError::invalid_argument(
                "all-subdirectories can only be used with a search pattern of '*'",
            ));
        }
        if !is_valid_name_pattern(pattern) {
            return Err(BurrowError::invalid_argument(format!(
                "'{}' is not a valid wildcard pattern",
                pattern
            )));
        }

        Ok(SearchSpec {
            path: path.into(),
            pattern: pattern.to_string(),
            include_files,
            include_dirs,
            order,
            ignore_case,
            matcher: NameMatcher::from_glob(pattern, ignore_case)?,
            error_policy: ErrorPolicy::default(),
        })
    }

    /// Create a glob search for one kind of entry.
    pub fn for_kind(
        path: impl Into<PathBuf>,
        pattern: &str,
        kind: EntryKind,
        order: SearchOrder,
        ignore_case: bool,
    ) -> Result<Self> {
        let (files, dirs) = kind.flags();
        SearchSpec::new(path, pattern, files, dirs, order, ignore_case)
    }

    /// Create a search with a caller-supplied expression.
    ///
    /// The expression is matched against entry names as given, with its own
    /// case rules. `ignore_case` states whether those rules fold case; it is
    /// reported by [`ignore_case`](Self::ignore_case) and forwarded as the
    /// backend's case hint, but never alters the expression. Because the
    /// depth-stack order cannot filter per level, `AllSubdirectories` is
    /// rejected.
    pub fn with_regex(
        path: impl Into<PathBuf>,
        regex: Regex,
        include_files: bool,
        include_dirs: bool,
        order: SearchOrder,
        ignore_case: bool,
    ) -> Result<Self> {
        check_flags(include_files, include_dirs)?;
        if order == SearchOrder::AllSubdirectories {
            return Err(BurrowError::invalid_argument(
                "all-subdirectories can only be used with a search pattern of '*'",
            ));
        }

        Ok(SearchSpec {
            path: path.into(),
            pattern: MATCH_ALL.to_string(),
            include_files,
            include_dirs,
            order,
            ignore_case,
            matcher: Some(NameMatcher::from_regex(regex)),
            error_policy: ErrorPolicy::default(),
        })
    }

    /// Set the policy for failing sub-directories.
    pub fn with_error_policy(mut self, policy: ErrorPolicy) -> Self {
        self.error_policy = policy;
        self
    }

    /// Rebind this search to another directory.
    ///
    /// Everything except the path is carried over untouched, including the
    /// compiled matcher.
    pub fn derive(&self, path: impl Into<PathBuf>) -> SearchSpec {
        SearchSpec {
            path: path.into(),
            ..self.clone()
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// The glob pattern (`*` for caller-supplied expressions)
    pub fn pattern(&self) -> &str {
        &self.pattern
    }

    pub fn include_files(&self) -> bool {
        self.include_files
    }

    pub fn include_dirs(&self) -> bool {
        self.include_dirs
    }

    pub fn order(&self) -> SearchOrder {
        self.order
    }

    pub fn ignore_case(&self) -> bool {
        self.ignore_case
    }

    pub fn error_policy(&self) -> ErrorPolicy {
        self.error_policy
    }

    pub fn matcher(&self) -> Option<&NameMatcher> {
        self.matcher.as_ref()
    }

    /// Returns true if names are filtered at all
    pub fn has_pattern(&self) -> bool {
        self.matcher.is_some()
    }

    /// Check a name against the compiled matcher.
    pub fn is_match(&self, name: &str) -> bool {
        self.matcher.as_ref().map_or(true, |m| m.is_match(name))
    }

    /// Returns true if the entry's kind is one this search returns
    pub fn includes_kind(&self, info: &FileFindInfo) -> bool {
        if info.is_directory() {
            self.include_dirs
        } else {
            self.include_files
        }
    }

    /// The pattern handed to the native scan call.
    ///
    /// Only single-level glob searches may let the platform pre-filter: the
    /// multi-level orders must see every directory, and custom expressions
    /// have no native form.
    pub fn native_pattern(&self) -> &str {
        match &self.matcher {
            Some(m) if !m.is_custom() && self.order == SearchOrder::TopDirectoryOnly => {
                &self.pattern
            }
            _ => MATCH_ALL,
        }
    }
}

fn check_flags(include_files: bool, include_dirs: bool) -> Result<()> {
    if !include_files && !include_dirs {
        return Err(BurrowError::invalid_argument(
            "files or directories must be included",
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use regex::RegexBuilder;

    #[test]
    fn test_rejects_no_inclusion_flags() {
        let err =
            SearchSpec::new("/r", "*", false, false, SearchOrder::TopDirectoryOnly, true).unwrap_err();
        assert!(err.is_invalid_argument());
    }

    #[test]
    fn test_all_subdirectories_requires_match_all() {
        assert!(SearchSpec::new("/r", "*", true, true, SearchOrder::AllSubdirectories, true).is_ok());

        for pattern in ["*.txt", "a*", "?", "**"] {
            let err = SearchSpec::new("/r", pattern, true, true, SearchOrder::AllSubdirectories, true)
                .unwrap_err();
            assert!(err.is_invalid_argument(), "pattern {pattern} was accepted");
        }

        let err = SearchSpec::with_regex(
            "/r",
            Regex::new(".*").unwrap(),
            true,
            true,
            SearchOrder::AllSubdirectories,
            false,
        )
        .unwrap_err();
        assert!(err.is_invalid_argument());
    }

    #[test]
    fn test_rejects_invalid_name_characters() {
        let err = SearchSpec::new("/r", "a/*.txt", true, false, SearchOrder::AllDirectories, true)
            .unwrap_err();
        assert!(err.is_invalid_argument());
        assert!(SearchSpec::new("/r", "", true, false, SearchOrder::AllDirectories, true).is_err());
    }

    #[test]
    fn test_derive_rebinds_only_the_path() {
        let spec = SearchSpec::new("/r", "*.txt", true, false, SearchOrder::AllDepths, false)
            .unwrap()
            .with_error_policy(ErrorPolicy::Skip);
        let child = spec.derive("/r/d");

        assert_eq!(child.path(), Path::new("/r/d"));
        assert_eq!(child.pattern(), "*.txt");
        assert_eq!(child.order(), SearchOrder::AllDepths);
        assert_eq!(child.error_policy(), ErrorPolicy::Skip);
        assert!(!child.ignore_case());
        assert!(child.include_files() && !child.include_dirs());

        let parent_regex = spec.matcher().unwrap().as_regex() as *const Regex;
        let child_regex = child.matcher().unwrap().as_regex() as *const Regex;
        assert_eq!(parent_regex, child_regex);
    }

    #[test]
    fn test_native_pattern() {
        let top = SearchSpec::new("/r", "*.txt", true, false, SearchOrder::TopDirectoryOnly, true)
            .unwrap();
        assert_eq!(top.native_pattern(), "*.txt");

        let all = SearchSpec::new("/r", "*.txt", true, false, SearchOrder::AllDirectories, true)
            .unwrap();
        assert_eq!(all.native_pattern(), "*");

        let custom = SearchSpec::with_regex(
            "/r",
            Regex::new("(?i)txt").unwrap(),
            true,
            false,
            SearchOrder::TopDirectoryOnly,
            true,
        )
        .unwrap();
        assert_eq!(custom.native_pattern(), "*");
        assert!(custom.ignore_case());
    }

    #[test]
    fn test_regex_case_flag_is_explicit() {
        let folded = RegexBuilder::new("^readme$")
            .case_insensitive(true)
            .build()
            .unwrap();
        let spec = SearchSpec::with_regex(
            "/r",
            folded,
            true,
            false,
            SearchOrder::AllDirectories,
            true,
        )
        .unwrap();
        assert!(spec.ignore_case());
        assert!(spec.is_match("README"));

        let inline = Regex::new("^a(?i:b)$").unwrap();
        let spec = SearchSpec::with_regex(
            "/r",
            inline,
            true,
            false,
            SearchOrder::AllDirectories,
            false,
        )
        .unwrap();
        assert!(!spec.ignore_case());
        assert!(spec.is_match("aB"));
        assert!(!spec.is_match("AB"));
    }

    #[test]
    fn test_match_all_has_no_matcher() {
        let spec = SearchSpec::for_kind("/r", "*", EntryKind::All, SearchOrder::AllDepths, true)
            .unwrap();
        assert!(!spec.has_pattern());
        assert!(spec.is_match("anything at all"));
    }
}
