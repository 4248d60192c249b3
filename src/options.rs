//! Configuration options for word extraction.
//!
//! The `Options` struct carries the switches that control which parts of a
//! document contribute words, plus the pattern that defines a word. Options
//! are fixed for the duration of one extraction run.

use std::path::Path;

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::patterns::{compile_token_pattern, DEFAULT_WORD_PATTERN};

/// Configuration options for word extraction.
///
/// All fields are public for easy configuration. Use `Default::default()`
/// for standard settings.
///
/// # Example
///
/// ```rust
/// use html_wordlist::Options;
///
/// let options = Options {
///     force_lowercase: true,
///     ignore_style_tags: true,
///     ..Options::default()
/// };
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
#[allow(clippy::struct_excessive_bools)]
pub struct Options {
    /// Lowercase every token before it is added to the word set.
    ///
    /// Default: `false`
    pub force_lowercase: bool,

    /// Track `<script>` regions.
    ///
    /// Script text is still extracted when this is set: only style regions
    /// gate ordinary text.
    ///
    /// Default: `false`
    pub ignore_script_tags: bool,

    /// Drop text found inside `<style>` elements.
    ///
    /// Default: `false`
    pub ignore_style_tags: bool,

    /// Drop the text of HTML comments.
    ///
    /// Default: `false`
    pub ignore_comments: bool,

    /// Skip documents whose Content-Type is binary (images, audio, video,
    /// javascript, octet-stream, pdf).
    ///
    /// Default: `true`
    pub check_content_type: bool,

    /// Regular expression whose matches are the words of a span.
    ///
    /// Default: [`DEFAULT_WORD_PATTERN`]
    pub token_pattern: String,
}

impl Default for Options {
    fn default() -> Self {
        Self {
            force_lowercase: false,
            ignore_script_tags: false,
            ignore_style_tags: false,
            ignore_comments: false,
            check_content_type: true,
            token_pattern: DEFAULT_WORD_PATTERN.to_string(),
        }
    }
}

impl Options {
    /// Parse options from a JSON document. Missing fields take their defaults.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Config`] if the JSON is malformed.
    pub fn from_json(json: &str) -> Result<Self> {
        serde_json::from_str(json).map_err(|e| Error::Config(e.to_string()))
    }

    /// Read options from a JSON file.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Config`] if the file cannot be read or parsed.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path)
            .map_err(|e| Error::Config(format!("{}: {e}", path.display())))?;
        Self::from_json(&json)
    }

    /// Compile `token_pattern`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidPattern`] if the pattern does not compile.
    pub fn compile_pattern(&self) -> Result<Regex> {
        compile_token_pattern(&self.token_pattern)
    }
}
