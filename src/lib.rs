//! # html-wordlist
//!
//! Builds a word list from captured HTTP responses.
//!
//! Every response body is run through a streaming HTML tokenizer. Text and
//! comment spans that pass the content filter are split into words with a
//! character-class pattern, and all words are gathered into one sorted,
//! duplicate-free set.
//!
//! ## Quick Start
//!
//! ```rust
//! use html_wordlist::{extract_words, Options};
//!
//! let html = "<style>p { color: red }</style><p>Hello, hello world</p>";
//! let options = Options {
//!     force_lowercase: true,
//!     ignore_style_tags: true,
//!     ..Options::default()
//! };
//!
//! let words = extract_words(html, &options)?;
//! assert_eq!(words.into_iter().collect::<Vec<_>>(), vec!["hello", "world"]);
//! # Ok::<(), html_wordlist::Error>(())
//! ```
//!
//! ## Features
//!
//! - **Content-type gate**: binary responses (images, audio, video, pdf, ...) are skipped
//! - **Tag scoping**: `<style>` text and comments can be left out
//! - **Charset aware**: bodies are decoded using the header or `<meta>` charset
//! - **Cancellable**: [`ExtractionTask`] runs in the background and can be stopped

mod error;
mod extract;
mod options;
mod result;
mod task;

/// Compiled regex patterns for word tokenization.
pub mod patterns;

/// Character encoding detection and body decoding.
pub mod encoding;

/// Content-type and tag-context filtering.
pub mod filter;

/// HTTP messages and the source, inspector and sink collaborators.
pub mod message;

/// Streaming HTML tokenizer.
pub mod tokenizer;

// Public API - re-exports
pub use error::{Error, Result};
pub use extract::WordExtractor;
pub use message::{
    ContentInspector, Document, HttpMessage, HttpResponseInspector, MessageSource, ResponseInfo,
    WordSink,
};
pub use options::Options;
pub use result::{DocumentOutcome, ExtractionReport, ExtractionSummary, RunOutcome, WordSet};
pub use task::ExtractionTask;
pub use tokio_util::sync::CancellationToken;

/// Extracts the words of a single decoded HTML document.
///
/// # Example
///
/// ```rust
/// use html_wordlist::{extract_words, Options};
///
/// let words = extract_words("<p>foo-bar, baz_123!</p>", &Options::default())?;
/// assert_eq!(words.len(), 4);
/// # Ok::<(), html_wordlist::Error>(())
/// ```
#[allow(clippy::missing_errors_doc)]
pub fn extract_words(html: &str, options: &Options) -> Result<WordSet> {
    let extractor = WordExtractor::new(options.clone())?;
    let mut words = WordSet::new();
    extractor.extract_html(html, &mut words);
    Ok(words)
}

/// Extracts words from raw HTTP responses (or bare HTML bodies).
///
/// Responses are split with [`HttpResponseInspector`]. Bytes that are
/// malformed in a response's charset are replaced, and the rest of that
/// response still contributes words.
///
/// # Example
///
/// ```rust
/// use html_wordlist::{extract_words_from_responses, Options};
///
/// let page: &[u8] = b"HTTP/1.1 200 OK\r\nContent-Type: text/html\r\n\r\n<p>kept</p>";
/// let logo: &[u8] = b"HTTP/1.1 200 OK\r\nContent-Type: image/png\r\n\r\n<p>dropped</p>";
///
/// let report = extract_words_from_responses(&[page, logo], &Options::default())?;
/// assert!(report.words.contains("kept"));
/// assert!(!report.words.contains("dropped"));
/// # Ok::<(), html_wordlist::Error>(())
/// ```
#[allow(clippy::missing_errors_doc)]
pub fn extract_words_from_responses(
    responses: &[&[u8]],
    options: &Options,
) -> Result<ExtractionReport> {
    let extractor = WordExtractor::new(options.clone())?;
    let documents: Vec<Document> = responses
        .iter()
        .map(|raw| Document::from_response(raw.to_vec(), &HttpResponseInspector))
        .collect();

    // A fresh token is never cancelled, so the report is always present.
    Ok(extractor
        .extract(&documents, &CancellationToken::new())
        .unwrap_or_default())
}
