//! Compiled regex patterns for word tokenization.
//!
//! The default pattern is compiled once using `LazyLock` and shared by every
//! extractor that runs with the default configuration.

#![allow(clippy::expect_used)]

use std::sync::LazyLock;

use regex::Regex;

use crate::error::{Error, Result};

/// Character class defining a "word": ASCII letters, digits, apostrophe and
/// any Unicode letter.
///
/// The quantifier is `*`, so the pattern can match the empty string between
/// words. Empty matches are discarded by the extractor.
pub const DEFAULT_WORD_PATTERN: &str = r"[a-zA-Z0-9'\p{L}]*";

/// Default word pattern, compiled once.
pub static DEFAULT_WORD_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(DEFAULT_WORD_PATTERN).expect("DEFAULT_WORD_PATTERN regex"));

/// Compile a token pattern, reusing the shared default when possible.
///
/// # Errors
///
/// Returns [`Error::InvalidPattern`] when `pattern` is not a valid regex.
pub fn compile_token_pattern(pattern: &str) -> Result<Regex> {
    if pattern == DEFAULT_WORD_PATTERN {
        return Ok(DEFAULT_WORD_RE.clone());
    }
    Regex::new(pattern).map_err(|e| Error::InvalidPattern(e.to_string()))
}

/// Iterate over the non-empty tokens `re` finds in `text`, left to right.
pub fn tokens<'r, 't>(re: &'r Regex, text: &'t str) -> impl Iterator<Item = &'t str> + 'r
where
    't: 'r,
{
    re.find_iter(text)
        .map(|m| m.as_str())
        .filter(|token| !token.is_empty())
}
