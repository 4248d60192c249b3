//! Word extraction engine.
//!
//! A [`WordExtractor`] folds the token stream of each document into a shared
//! [`WordSet`], carrying a per-document [`TagContext`]. Documents are handled
//! strictly one after another; a document whose body cannot be located is
//! logged and contributes nothing, while failures of the message source or
//! result sink end the run.

use regex::Regex;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::encoding::decode_body;
use crate::error::Result;
use crate::filter::{should_skip_document, SpanKind, TagContext};
use crate::message::{ContentInspector, Document, MessageSource, WordSink};
use crate::options::Options;
use crate::patterns;
use crate::result::{DocumentOutcome, ExtractionReport, ExtractionSummary, RunOutcome, WordSet};
use crate::tokenizer::{HtmlTokenizer, Token};

/// Extracts distinct words from HTML documents.
#[derive(Debug, Clone)]
pub struct WordExtractor {
    options: Options,
    pattern: Regex,
}

impl WordExtractor {
    /// Create an extractor, compiling the configured token pattern.
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::InvalidPattern`] if the pattern does not compile.
    pub fn new(options: Options) -> Result<Self> {
        let pattern = options.compile_pattern()?;
        Ok(Self { options, pattern })
    }

    /// The options this extractor was built with.
    #[must_use]
    pub fn options(&self) -> &Options {
        &self.options
    }

    /// Add the words of one decoded HTML document to `words`.
    pub fn extract_html(&self, html: &str, words: &mut WordSet) {
        let mut context = TagContext::default();

        for token in HtmlTokenizer::new(html) {
            match token {
                Token::StartTag {
                    name,
                    self_closing: false,
                } => context.enter(&name, &self.options),
                Token::StartTag { .. } => {}
                Token::EndTag { name } => context.leave(&name),
                Token::Text(text) => {
                    if context.admits(SpanKind::Text, &self.options) {
                        self.add_tokens(&text, words);
                    }
                }
                Token::Comment(text) => {
                    if context.admits(SpanKind::Comment, &self.options) {
                        self.add_tokens(text, words);
                    }
                }
            }
        }
    }

    fn add_tokens(&self, span: &str, words: &mut WordSet) {
        for token in patterns::tokens(&self.pattern, span) {
            let word = if self.options.force_lowercase {
                token.to_lowercase()
            } else {
                token.to_string()
            };
            words.insert(word);
        }
    }

    /// Gate, decode and tokenize one document.
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::Decode`] if the body offset lies outside the
    /// raw bytes. The error concerns this document only.
    pub fn process_document(
        &self,
        document: &Document,
        words: &mut WordSet,
    ) -> Result<DocumentOutcome> {
        if should_skip_document(&document.headers, &self.options) {
            return Ok(DocumentOutcome::Skipped);
        }
        let html = decode_body(document.body()?, &document.headers);
        self.extract_html(&html, words);
        Ok(DocumentOutcome::Processed)
    }

    /// Extract words from in-memory documents.
    ///
    /// Returns `None` if `cancel` fires before every document was handled;
    /// partial results are dropped.
    pub fn extract<'d, D>(
        &self,
        documents: D,
        cancel: &CancellationToken,
    ) -> Option<ExtractionReport>
    where
        D: IntoIterator<Item = &'d Document>,
    {
        let mut report = ExtractionReport::default();

        for (index, document) in documents.into_iter().enumerate() {
            if cancel.is_cancelled() {
                info!(documents = index, "extraction cancelled");
                return None;
            }
            let outcome = self.process_document(document, &mut report.words);
            tally(&mut report.summary, index, outcome);
        }

        report.summary.word_count = report.words.len();
        Some(report)
    }

    /// Pull every message from `source`, then hand the words to `sink`.
    ///
    /// The cancellation token is checked before each message and once more
    /// before delivery. A cancelled run never touches the sink.
    ///
    /// # Errors
    ///
    /// Returns the error of the source or sink. Per-document failures are
    /// logged and counted instead.
    pub fn run<S, I, K>(
        &self,
        mut source: S,
        inspector: &I,
        mut sink: K,
        cancel: &CancellationToken,
    ) -> Result<RunOutcome>
    where
        S: MessageSource,
        I: ContentInspector + ?Sized,
        K: WordSink,
    {
        let mut words = WordSet::new();
        let mut summary = ExtractionSummary::default();

        for index in 0.. {
            if cancel.is_cancelled() {
                info!(documents = index, "extraction cancelled");
                return Ok(RunOutcome::Cancelled);
            }
            let Some(message) = source.next_message()? else {
                break;
            };
            // A message without a response counts as skipped.
            let outcome = match message.response {
                Some(raw) => {
                    let document = Document::from_response(raw, inspector);
                    self.process_document(&document, &mut words)
                }
                None => Ok(DocumentOutcome::Skipped),
            };
            tally(&mut summary, index, outcome);
        }

        if cancel.is_cancelled() {
            info!(documents = summary.documents_seen, "extraction cancelled");
            return Ok(RunOutcome::Cancelled);
        }

        summary.word_count = words.len();
        sink.add_words(words)?;
        info!(
            documents = summary.documents_seen,
            processed = summary.documents_processed,
            skipped = summary.documents_skipped,
            failed = summary.documents_failed,
            words = summary.word_count,
            "extraction complete"
        );
        Ok(RunOutcome::Completed(summary))
    }
}

fn tally(summary: &mut ExtractionSummary, index: usize, outcome: Result<DocumentOutcome>) {
    summary.documents_seen += 1;
    match outcome {
        Ok(DocumentOutcome::Processed) => summary.documents_processed += 1,
        Ok(DocumentOutcome::Skipped) => {
            debug!(document = index, "document skipped");
            summary.documents_skipped += 1;
        }
        Err(e) => {
            warn!(document = index, error = %e, "could not parse HTML document");
            summary.documents_failed += 1;
            summary.warnings.push(format!("document {index}: {e}"));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::message::{HttpMessage, HttpResponseInspector};
    use crate::Error;

    fn words(html: &str, options: Options) -> Vec<String> {
        let extractor = WordExtractor::new(options).expect("valid options");
        let mut set = WordSet::new();
        extractor.extract_html(html, &mut set);
        set.into_iter().collect()
    }

    struct FailingSink;

    impl WordSink for FailingSink {
        fn add_words(&mut self, _words: WordSet) -> Result<()> {
            Err(Error::Sink("disk full".to_string()))
        }
    }

    struct FailingSource;

    impl MessageSource for FailingSource {
        fn next_message(&mut self) -> Result<Option<HttpMessage>> {
            Err(Error::Source("proxy history unavailable".to_string()))
        }
    }

    #[test]
    fn collects_text_and_comments() {
        assert_eq!(
            words("<!-- note --><p>Hello world</p>", Options::default()),
            vec!["Hello", "note", "world"]
        );
    }

    #[test]
    fn style_context_resets_per_document() {
        let extractor = WordExtractor::new(Options {
            ignore_style_tags: true,
            ..Options::default()
        })
        .expect("valid options");
        let mut set = WordSet::new();

        extractor.extract_html("<style>unclosed", &mut set);
        extractor.extract_html("fresh", &mut set);

        assert_eq!(set.into_iter().collect::<Vec<_>>(), vec!["fresh"]);
    }

    #[test]
    fn self_closing_style_does_not_hide_text() {
        let options = Options {
            ignore_style_tags: true,
            ..Options::default()
        };
        assert_eq!(words("<style/>visible", options), vec!["visible"]);
    }

    #[test]
    fn custom_pattern_changes_word_boundaries() {
        let options = Options {
            token_pattern: r"\w+".to_string(),
            ..Options::default()
        };
        assert_eq!(words("<p>baz_123!</p>", options), vec!["baz_123"]);
    }

    #[test]
    fn invalid_pattern_fails_construction() {
        let err = WordExtractor::new(Options {
            token_pattern: "(".to_string(),
            ..Options::default()
        })
        .expect_err("invalid pattern");
        assert!(matches!(err, Error::InvalidPattern(_)));
    }

    #[test]
    fn process_document_reports_skip_and_failure() {
        let extractor = WordExtractor::new(Options::default()).expect("valid options");
        let mut set = WordSet::new();

        let image = Document::from_response(
            b"HTTP/1.1 200 OK\r\nContent-Type: image/png\r\n\r\n<p>pixels</p>".to_vec(),
            &HttpResponseInspector,
        );
        assert_eq!(
            extractor.process_document(&image, &mut set).expect("skip is not an error"),
            DocumentOutcome::Skipped
        );

        let truncated = Document::new(b"<p>short</p>".to_vec(), Vec::new(), 64);
        let err = extractor
            .process_document(&truncated, &mut set)
            .expect_err("body offset out of range");
        assert!(matches!(err, Error::Decode(_)));
        assert!(set.is_empty());
    }

    #[test]
    fn malformed_bytes_keep_the_valid_words() {
        let extractor = WordExtractor::new(Options::default()).expect("valid options");
        let mut set = WordSet::new();
        let mut raw = b"HTTP/1.1 200 OK\r\nContent-Type: text/html\r\n\r\n".to_vec();
        raw.extend_from_slice(b"<p>hello caf\xE9 world</p>");
        let latin1 = Document::from_response(raw, &HttpResponseInspector);

        assert_eq!(
            extractor.process_document(&latin1, &mut set).expect("decodes with replacement"),
            DocumentOutcome::Processed
        );
        assert_eq!(set.into_iter().collect::<Vec<_>>(), vec!["caf", "hello", "world"]);
    }

    #[test]
    fn extract_counts_documents() {
        let extractor = WordExtractor::new(Options::default()).expect("valid options");
        let documents = vec![
            Document::from_html("<p>one</p>"),
            Document::new(b"<p>lost</p>".to_vec(), Vec::new(), 99),
            Document::from_html("<p>two</p>"),
        ];

        let report = extractor
            .extract(&documents, &CancellationToken::new())
            .expect("not cancelled");

        assert_eq!(report.words.into_iter().collect::<Vec<_>>(), vec!["one", "two"]);
        assert_eq!(report.summary.documents_seen, 3);
        assert_eq!(report.summary.documents_processed, 2);
        assert_eq!(report.summary.documents_failed, 1);
        assert_eq!(report.summary.word_count, 2);
        assert!(report.summary.warnings[0].starts_with("document 1:"));
    }

    #[test]
    fn extract_returns_none_when_cancelled() {
        let extractor = WordExtractor::new(Options::default()).expect("valid options");
        let cancel = CancellationToken::new();
        cancel.cancel();

        assert!(extractor.extract(&[Document::from_html("<p>x</p>")], &cancel).is_none());
    }

    #[test]
    fn run_delivers_once_to_sink() {
        let extractor = WordExtractor::new(Options::default()).expect("valid options");
        let source = vec![
            HttpMessage::new("<p>alpha beta</p>"),
            HttpMessage { response: None },
            HttpMessage::new("<p>beta gamma</p>"),
        ]
        .into_iter();
        let mut delivered: Vec<WordSet> = Vec::new();

        let outcome = extractor
            .run(source, &HttpResponseInspector, &mut delivered, &CancellationToken::new())
            .expect("run succeeds");

        assert_eq!(delivered.len(), 1);
        assert_eq!(
            delivered[0].iter().map(String::as_str).collect::<Vec<_>>(),
            vec!["alpha", "beta", "gamma"]
        );
        let summary = outcome.summary().expect("completed");
        assert_eq!(summary.documents_seen, 3);
        assert_eq!(summary.documents_skipped, 1);
    }

    #[test]
    fn run_surfaces_sink_failure() {
        let extractor = WordExtractor::new(Options::default()).expect("valid options");
        let source = vec![HttpMessage::new("<p>x</p>")].into_iter();

        let err = extractor
            .run(source, &HttpResponseInspector, FailingSink, &CancellationToken::new())
            .expect_err("sink fails");
        assert!(matches!(err, Error::Sink(_)));
    }

    #[test]
    fn run_surfaces_source_failure() {
        let extractor = WordExtractor::new(Options::default()).expect("valid options");
        let mut delivered: Vec<WordSet> = Vec::new();

        let err = extractor
            .run(
                FailingSource,
                &HttpResponseInspector,
                &mut delivered,
                &CancellationToken::new(),
            )
            .expect_err("source fails");
        assert!(matches!(err, Error::Source(_)));
        assert!(delivered.is_empty());
    }
}
