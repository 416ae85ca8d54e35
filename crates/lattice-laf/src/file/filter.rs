//! File filters for directory listings.
//!
//! A filter is either a set of glob patterns matched against file names or
//! an arbitrary predicate. Glob filters always accept directories so the
//! user can still navigate while a file-type filter is active.
//!
//! Supported glob syntax:
//! - `*` matches any sequence of characters
//! - `?` matches a single character
//! - `[abc]`, `[a-z]` and `[!abc]` match character classes
//!
//! Matching is case-insensitive.

use std::fmt;
use std::sync::Arc;

use regex::Regex;

use super::error::{FileError, FileResult};
use super::system::DirectoryEntry;

type Predicate = Arc<dyn Fn(&DirectoryEntry) -> bool + Send + Sync>;

#[derive(Clone)]
enum Matcher {
    Glob { patterns: Vec<String>, regexes: Vec<Regex> },
    Custom(Predicate),
}

/// A named file filter.
#[derive(Clone)]
pub struct FileFilter {
    name: String,
    matcher: Matcher,
}

impl FileFilter {
    /// Create a glob filter from one or more patterns.
    pub fn glob(name: impl Into<String>, patterns: &[&str]) -> FileResult<Self> {
        let regexes = patterns
            .iter()
            .map(|p| glob_to_regex(p))
            .collect::<FileResult<Vec<_>>>()?;
        Ok(Self {
            name: name.into(),
            matcher: Matcher::Glob {
                patterns: patterns.iter().map(|s| (*s).to_string()).collect(),
                regexes,
            },
        })
    }

    /// Create a filter from a predicate. Directories are passed to it too.
    pub fn custom<F>(name: impl Into<String>, predicate: F) -> Self
    where
        F: Fn(&DirectoryEntry) -> bool + Send + Sync + 'static,
    {
        Self {
            name: name.into(),
            matcher: Matcher::Custom(Arc::new(predicate)),
        }
    }

    /// A filter accepting everything.
    pub fn all_files() -> Self {
        Self::custom("All Files", |_| true)
    }

    /// Display name of the filter.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The glob patterns, empty for custom filters.
    pub fn patterns(&self) -> &[String] {
        match &self.matcher {
            Matcher::Glob { patterns, .. } => patterns,
            Matcher::Custom(_) => &[],
        }
    }

    /// Get the display text for this filter (name + patterns).
    pub fn display_text(&self) -> String {
        let patterns = self.patterns();
        if patterns.is_empty() {
            self.name.clone()
        } else {
            format!("{} ({})", self.name, patterns.join(" "))
        }
    }

    /// Check if `entry` passes the filter.
    pub fn accept(&self, entry: &DirectoryEntry) -> bool {
        match &self.matcher {
            Matcher::Glob { regexes, .. } => {
                entry.is_directory || regexes.iter().any(|re| re.is_match(&entry.name))
            }
            Matcher::Custom(predicate) => predicate(entry),
        }
    }
}

impl fmt::Debug for FileFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FileFilter")
            .field("name", &self.name)
            .field("patterns", &self.patterns())
            .finish()
    }
}

/// Converts a glob pattern to an anchored, case-insensitive regex.
pub(crate) fn glob_to_regex(pattern: &str) -> FileResult<Regex> {
    let mut regex = String::with_capacity(pattern.len() * 2 + 6);
    regex.push_str("(?i)^");

    let mut chars = pattern.chars().peekable();
    while let Some(c) = chars.next() {
        match c {
            '*' => regex.push_str(".*"),
            '?' => regex.push('.'),
            '[' => {
                regex.push('[');
                if let Some(&neg) = chars.peek()
                    && (neg == '!' || neg == '^')
                {
                    regex.push('^');
                    chars.next();
                }
                let mut closed = false;
                for c in chars.by_ref() {
                    if c == ']' {
                        closed = true;
                        break;
                    }
                    if c == '\\' || c == '^' || c == '[' {
                        regex.push('\\');
                    }
                    regex.push(c);
                }
                if !closed {
                    return Err(FileError::invalid_pattern(pattern, "unclosed character class"));
                }
                regex.push(']');
            }
            '.' | '+' | '(' | ')' | '{' | '}' | '|' | '^' | '$' | '\\' | ']' => {
                regex.push('\\');
                regex.push(c);
            }
            c => regex.push(c),
        }
    }
    regex.push('$');

    Regex::new(&regex).map_err(|e| FileError::invalid_pattern(pattern, e))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::file::FileErrorKind;

    #[test]
    fn test_glob_matches_files_case_insensitive() {
        let filter = FileFilter::glob("Rust Files", &["*.rs", "Cargo.???l"]).unwrap();
        assert!(filter.accept(&DirectoryEntry::file("/src/lib.rs")));
        assert!(filter.accept(&DirectoryEntry::file("/src/MAIN.RS")));
        assert!(filter.accept(&DirectoryEntry::file("/Cargo.toml")));
        assert!(!filter.accept(&DirectoryEntry::file("/src/lib.rs.bak")));
        assert_eq!(filter.display_text(), "Rust Files (*.rs Cargo.???l)");
    }

    #[test]
    fn test_glob_accepts_directories() {
        let filter = FileFilter::glob("Images", &["*.png"]).unwrap();
        assert!(filter.accept(&DirectoryEntry::directory("/photos")));
    }

    #[test]
    fn test_character_classes() {
        let filter = FileFilter::glob("Logs", &["log[0-9].txt", "[!x]*.md"]).unwrap();
        assert!(filter.accept(&DirectoryEntry::file("log3.txt")));
        assert!(!filter.accept(&DirectoryEntry::file("logx.txt")));
        assert!(filter.accept(&DirectoryEntry::file("readme.md")));
        assert!(!filter.accept(&DirectoryEntry::file("xnotes.md")));
    }

    #[test]
    fn test_invalid_pattern() {
        let err = FileFilter::glob("Broken", &["[abc"]).unwrap_err();
        assert_eq!(err.kind(), FileErrorKind::InvalidPattern);
    }

    #[test]
    fn test_custom_filter_sees_directories() {
        let filter = FileFilter::custom("Files only", |e| !e.is_directory);
        assert!(!filter.accept(&DirectoryEntry::directory("/tmp")));
        assert!(filter.accept(&DirectoryEntry::file("/tmp/a")));
        assert!(filter.patterns().is_empty());
    }
}
