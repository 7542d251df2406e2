//! Wildcard matching: the pattern primitive behind every rule
//!
//! A wildcard pattern is a literal string in which `*` stands for any run of
//! zero or more characters. Nothing else is special: `.`, `?`, `[`, `\` and
//! friends all match themselves. Matches are anchored at both ends, so
//! `"*.local"` accepts `"test.local"` but `"est.local*"` rejects it.
//!
//! Matching walks the pattern with a single backtrack point (the most recent
//! `*`), so there is no compilation step and nothing that can fail. Any input
//! produces a `bool`.
//!
//! # Example
//!
//! ```
//! use envdetect::wildcard;
//!
//! assert!(wildcard::is_match("api.staging.example.com", "*.staging.*", false));
//! assert!(wildcard::is_match("WEB-01", "web-*", true));
//! assert!(!wildcard::is_match("web-01", "web-?", false)); // `?` is literal
//! ```

use std::fmt;

/// The wildcard character.
pub const WILDCARD: char = '*';

/// Test `value` against `pattern`.
///
/// Equivalent to `WildcardPattern::new(pattern, case_insensitive).is_match(value)`
/// without keeping the compiled pattern around.
#[must_use]
pub fn is_match(value: &str, pattern: &str, case_insensitive: bool) -> bool {
    let value: Vec<char> = value.chars().collect();
    let pattern: Vec<char> = pattern.chars().collect();
    match_chars(&value, &pattern, case_insensitive)
}

/// Returns `true` if `pattern` contains at least one `*`.
#[must_use]
pub fn has_wildcard(pattern: &str) -> bool {
    pattern.contains(WILDCARD)
}

/// A wildcard pattern decoded once and reusable across many values.
///
/// # Example
///
/// ```
/// use envdetect::WildcardPattern;
///
/// let pattern = WildcardPattern::new("*.example.com", false);
/// assert!(pattern.is_match("www.example.com"));
/// assert!(pattern.is_match(".example.com"));
/// assert!(!pattern.is_match("example.com"));
/// ```
#[derive(Clone, PartialEq, Eq)]
pub struct WildcardPattern {
    source: String,
    chars: Box<[char]>,
    case_insensitive: bool,
}

impl WildcardPattern {
    /// Decode `pattern`. Never fails.
    pub fn new(pattern: impl Into<String>, case_insensitive: bool) -> Self {
        let source = pattern.into();
        let chars = source.chars().collect();
        Self {
            source,
            chars,
            case_insensitive,
        }
    }

    /// Test a value against this pattern.
    #[must_use]
    pub fn is_match(&self, value: &str) -> bool {
        let value: Vec<char> = value.chars().collect();
        match_chars(&value, &self.chars, self.case_insensitive)
    }

    /// The pattern as written.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.source
    }

    /// Whether matching ignores case.
    #[must_use]
    pub fn is_case_insensitive(&self) -> bool {
        self.case_insensitive
    }
}

impl fmt::Debug for WildcardPattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.case_insensitive {
            write!(f, "WildcardPattern(\"{}\", i)", self.source)
        } else {
            write!(f, "WildcardPattern(\"{}\")", self.source)
        }
    }
}

impl fmt::Display for WildcardPattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.source)
    }
}

fn char_eq(a: char, b: char, case_insensitive: bool) -> bool {
    a == b || (case_insensitive && a.to_lowercase().eq(b.to_lowercase()))
}

/// Iterative match with one backtrack point.
///
/// On mismatch we return to the last `*` and let it swallow one more
/// character. Earlier stars never need revisiting: whatever the later star
/// can absorb, it absorbs at least as well as an earlier one could.
fn match_chars(value: &[char], pattern: &[char], case_insensitive: bool) -> bool {
    let mut v = 0;
    let mut p = 0;
    let mut star: Option<usize> = None;
    let mut resume = 0;

    while v < value.len() {
        if p < pattern.len() && pattern[p] == WILDCARD {
            star = Some(p);
            resume = v;
            p += 1;
        } else if p < pattern.len() && char_eq(pattern[p], value[v], case_insensitive) {
            v += 1;
            p += 1;
        } else if let Some(s) = star {
            p = s + 1;
            resume += 1;
            v = resume;
        } else {
            return false;
        }
    }

    // Value exhausted: only trailing stars may remain.
    pattern[p..].iter().all(|&c| c == WILDCARD)
}
