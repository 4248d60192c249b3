//! Captured HTTP messages and the collaborators that supply and consume them.
//!
//! - [`MessageSource`] yields the messages of a run, in order.
//! - [`ContentInspector`] splits a raw response into header lines and body.
//! - [`WordSink`] receives the finished word set.

use std::collections::BTreeSet;

use crate::error::{Error, Result};

/// A captured request/response pair, reduced to what extraction needs.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HttpMessage {
    /// Raw response bytes (status line, headers and body), if one was captured.
    pub response: Option<Vec<u8>>,
}

impl HttpMessage {
    /// Wrap raw response bytes.
    #[must_use]
    pub fn new(response: impl Into<Vec<u8>>) -> Self {
        Self {
            response: Some(response.into()),
        }
    }
}

/// Header lines and body location of a raw response.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResponseInfo {
    /// Byte offset at which the body starts.
    pub body_offset: usize,
    /// Header lines in order, status line first.
    pub headers: Vec<String>,
}

/// A response ready for extraction: raw bytes, header lines and body offset.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Document {
    pub raw_bytes: Vec<u8>,
    pub headers: Vec<String>,
    pub body_offset: usize,
}

impl Document {
    #[must_use]
    pub fn new(raw_bytes: Vec<u8>, headers: Vec<String>, body_offset: usize) -> Self {
        Self {
            raw_bytes,
            headers,
            body_offset,
        }
    }

    /// A bare HTML body without headers.
    #[must_use]
    pub fn from_html(html: impl Into<String>) -> Self {
        Self::new(html.into().into_bytes(), Vec::new(), 0)
    }

    /// Split a raw response with `inspector`.
    #[must_use]
    pub fn from_response<I>(raw_bytes: Vec<u8>, inspector: &I) -> Self
    where
        I: ContentInspector + ?Sized,
    {
        let ResponseInfo {
            body_offset,
            headers,
        } = inspector.analyze(&raw_bytes);
        Self::new(raw_bytes, headers, body_offset)
    }

    /// The body bytes.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Decode`] if the body offset lies past the end of the
    /// response.
    pub fn body(&self) -> Result<&[u8]> {
        self.raw_bytes.get(self.body_offset..).ok_or_else(|| {
            Error::Decode(format!(
                "body offset {} is beyond response length {}",
                self.body_offset,
                self.raw_bytes.len()
            ))
        })
    }
}

/// Analyzes raw response bytes.
pub trait ContentInspector {
    /// Locate the body and list the header lines of `response`.
    fn analyze(&self, response: &[u8]) -> ResponseInfo;
}

/// Parses HTTP/1.x responses. Anything that does not start with `HTTP/` is
/// treated as a bare body without headers.
#[derive(Debug, Clone, Copy, Default)]
pub struct HttpResponseInspector;

impl ContentInspector for HttpResponseInspector {
    fn analyze(&self, response: &[u8]) -> ResponseInfo {
        if !response.starts_with(b"HTTP/") {
            return ResponseInfo::default();
        }

        let (head_end, body_offset) = find_header_end(response)
            .unwrap_or((response.len(), response.len()));

        let headers = String::from_utf8_lossy(&response[..head_end])
            .lines()
            .map(|line| line.trim_end_matches('\r'))
            .filter(|line| !line.is_empty())
            .map(str::to_string)
            .collect();

        ResponseInfo {
            body_offset,
            headers,
        }
    }
}

/// Find the blank line ending the header block.
///
/// Returns the end of the header text and the start of the body.
fn find_header_end(response: &[u8]) -> Option<(usize, usize)> {
    let crlf = response.windows(4).position(|w| w == b"\r\n\r\n");
    let lf = response.windows(2).position(|w| w == b"\n\n");

    match (crlf, lf) {
        (Some(c), Some(l)) if l < c => Some((l, l + 2)),
        (Some(c), _) => Some((c, c + 4)),
        (None, Some(l)) => Some((l, l + 2)),
        (None, None) => None,
    }
}

/// Supplies the messages of an extraction run.
///
/// An error from the source is fatal to the run.
pub trait MessageSource {
    /// Next message, or `None` once the source is exhausted.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Source`](crate::Error::Source) when the message cannot be produced.
    fn next_message(&mut self) -> Result<Option<HttpMessage>>;
}

impl MessageSource for std::vec::IntoIter<HttpMessage> {
    fn next_message(&mut self) -> Result<Option<HttpMessage>> {
        Ok(self.next())
    }
}

/// Receives the word set of a completed run.
///
/// An error from the sink is fatal to the run.
pub trait WordSink {
    /// Accept the final, sorted word set.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Sink`](crate::Error::Sink) when the words cannot be stored.
    fn add_words(&mut self, words: BTreeSet<String>) -> Result<()>;
}

impl WordSink for Vec<BTreeSet<String>> {
    fn add_words(&mut self, words: BTreeSet<String>) -> Result<()> {
        self.push(words);
        Ok(())
    }
}

impl<S: WordSink + ?Sized> WordSink for &mut S {
    fn add_words(&mut self, words: BTreeSet<String>) -> Result<()> {
        (**self).add_words(words)
    }
}

impl<S: MessageSource + ?Sized> MessageSource for &mut S {
    fn next_message(&mut self) -> Result<Option<HttpMessage>> {
        (**self).next_message()
    }
}
