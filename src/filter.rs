//! Content filter: which documents are read, and which spans inside them
//! contribute words.
//!
//! The document-level gate inspects the Content-Type header. The span-level
//! gate tracks whether the tokenizer is inside a `<style>` or `<script>`
//! element.

use crate::options::Options;

/// Content-Type prefixes that mark a document as binary.
const SKIPPED_TYPE_PREFIXES: &[&str] = &["image/", "audio/", "video/"];

/// Content-Type values that mark a document as non-markup.
const SKIPPED_TYPES: &[&str] = &[
    "application/javascript",
    "application/octet-stream",
    "application/pdf",
];

/// Whether a document with these header lines should be skipped entirely.
///
/// Always `false` when `check_content_type` is off or no Content-Type header
/// is present. Header names are matched case-insensitively, and the value is
/// everything after the first space of the line.
#[must_use]
pub fn should_skip_document(headers: &[String], options: &Options) -> bool {
    options.check_content_type && headers.iter().any(|h| is_skipped_content_type(h))
}

fn is_skipped_content_type(header: &str) -> bool {
    let header = header.to_lowercase();
    if !header.starts_with("content-type:") {
        return false;
    }
    // A line without a space yields the whole line, which never matches.
    let value = header.find(' ').map_or(header.as_str(), |i| &header[i + 1..]);

    SKIPPED_TYPE_PREFIXES.iter().any(|p| value.starts_with(p)) || SKIPPED_TYPES.contains(&value)
}

/// The kind of span the tokenizer produced.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpanKind {
    /// Ordinary character data.
    Text,
    /// The body of an HTML comment.
    Comment,
}

/// Per-document tag context.
///
/// The two flags are independent: malformed markup can leave both set.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TagContext {
    pub in_style: bool,
    pub in_script: bool,
}

impl TagContext {
    /// Update the context for an opening tag. `name` must be lowercase.
    pub fn enter(&mut self, name: &str, options: &Options) {
        match name {
            "style" if options.ignore_style_tags => self.in_style = true,
            "script" if options.ignore_script_tags => self.in_script = true,
            _ => {}
        }
    }

    /// Update the context for a closing tag. Unbalanced end tags are fine.
    pub fn leave(&mut self, name: &str) {
        match name {
            "style" => self.in_style = false,
            "script" => self.in_script = false,
            _ => {}
        }
    }

    /// Whether a span of `kind` should be tokenized in this context.
    ///
    /// Comments are gated only by `ignore_comments`. Text is gated only by
    /// `in_style`; `in_script` is tracked but does not suppress text.
    #[must_use]
    pub fn admits(&self, kind: SpanKind, options: &Options) -> bool {
        match kind {
            SpanKind::Comment => !options.ignore_comments,
            SpanKind::Text => !self.in_style,
        }
    }
}
