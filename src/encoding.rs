//! Character encoding detection and decoding of response bodies.
//!
//! The encoding of a body is taken from the `charset` parameter of its
//! Content-Type header, then from HTML meta tags, and finally defaults to
//! UTF-8. Byte sequences that are malformed in the resolved encoding are
//! replaced with U+FFFD, so the rest of the body still yields words.

use encoding_rs::{Encoding, UTF_8};
use regex::Regex;
use std::sync::LazyLock;
use tracing::warn;

/// Match `<meta charset="...">` tag
#[allow(clippy::expect_used)]
static CHARSET_META_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?i)<meta[^>]+charset\s*=\s*["']?([^"'\s>]+)"#).expect("valid regex")
});

/// Match `<meta http-equiv="Content-Type" content="...; charset=...">` tag
#[allow(clippy::expect_used)]
static CONTENT_TYPE_CHARSET_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?i)<meta[^>]+http-equiv\s*=\s*["']?content-type["']?[^>]+content\s*=\s*["']?[^"'>]*;\s*charset\s*=\s*([^"'\s>]+)"#).expect("valid regex")
});

/// Match the `charset=` parameter of a `Content-Type` header line.
#[allow(clippy::expect_used)]
static HEADER_CHARSET_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?i)^content-type:.*;\s*charset\s*=\s*["']?([^"'\s;]+)"#).expect("valid regex")
});

/// Resolve the encoding declared by the `Content-Type` header, if any.
#[must_use]
pub fn encoding_from_headers(headers: &[String]) -> Option<&'static Encoding> {
    headers
        .iter()
        .filter_map(|h| HEADER_CHARSET_RE.captures(h))
        .filter_map(|c| c.get(1))
        .find_map(|m| Encoding::for_label(m.as_str().as_bytes()))
}

/// Detect character encoding from HTML bytes.
///
/// Looks for `<meta charset>` first, then `<meta http-equiv="Content-Type">`.
/// Only the first 1024 bytes are examined.
#[must_use]
pub fn detect_encoding(html: &[u8]) -> &'static Encoding {
    let head = &html[..html.len().min(1024)];
    let head_str = String::from_utf8_lossy(head);

    [&*CHARSET_META_RE, &*CONTENT_TYPE_CHARSET_RE]
        .into_iter()
        .filter_map(|re| re.captures(&head_str))
        .filter_map(|c| c.get(1))
        .find_map(|m| Encoding::for_label(m.as_str().as_bytes()))
        .unwrap_or(UTF_8)
}

/// Decode a response body to a `String`.
///
/// A leading byte order mark overrides every other declaration. Malformed
/// sequences become U+FFFD and are logged once per body.
#[must_use]
pub fn decode_body(body: &[u8], headers: &[String]) -> String {
    let (encoding, body) = match Encoding::for_bom(body) {
        Some((encoding, bom_len)) => (encoding, &body[bom_len..]),
        None => (
            encoding_from_headers(headers).unwrap_or_else(|| detect_encoding(body)),
            body,
        ),
    };

    let (decoded, had_errors) = encoding.decode_without_bom_handling(body);
    if had_errors {
        warn!(encoding = encoding.name(), "body contains malformed bytes, replaced");
    }
    decoded.into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn headers(lines: &[&str]) -> Vec<String> {
        lines.iter().map(|s| (*s).to_string()).collect()
    }

    #[test]
    fn detect_utf8_from_meta_charset() {
        let html = br#"<html><head><meta charset="utf-8"></head><body>Test</body></html>"#;
        assert_eq!(detect_encoding(html), UTF_8);
    }

    #[test]
    fn detect_iso88591_from_meta_charset() {
        let html = br#"<html><head><meta charset="ISO-8859-1"></head><body>Test</body></html>"#;
        // encoding_rs maps ISO-8859-1 to windows-1252 per WHATWG
        assert_eq!(detect_encoding(html).name(), "windows-1252");
    }

    #[test]
    fn detect_charset_from_http_equiv() {
        let html = br#"<meta http-equiv="Content-Type" content="text/html; charset=ISO-8859-1">"#;
        assert_eq!(detect_encoding(html).name(), "windows-1252");
    }

    #[test]
    fn default_to_utf8_when_no_charset() {
        assert_eq!(detect_encoding(b"<html><body>Test</body></html>"), UTF_8);
    }

    #[test]
    fn header_charset_is_case_insensitive() {
        let h = headers(&["HTTP/1.1 200 OK", "CONTENT-TYPE: text/html; Charset=\"Shift_JIS\""]);
        assert_eq!(encoding_from_headers(&h).map(Encoding::name), Some("Shift_JIS"));
    }

    #[test]
    fn header_without_charset_yields_none() {
        let h = headers(&["Content-Type: text/html"]);
        assert!(encoding_from_headers(&h).is_none());
    }

    #[test]
    fn header_charset_wins_over_meta() {
        let body = b"<meta charset=\"utf-8\"><p>Caf\xE9</p>";
        let h = headers(&["Content-Type: text/html; charset=windows-1252"]);
        assert_eq!(decode_body(body, &h), "<meta charset=\"utf-8\"><p>Café</p>");
    }

    #[test]
    fn decode_uses_meta_charset() {
        let body = b"<meta charset=\"ISO-8859-1\"><p>Caf\xE9</p>";
        assert!(decode_body(body, &[]).contains("Café"));
    }

    #[test]
    fn decode_strips_utf8_bom() {
        let body = b"\xEF\xBB\xBF<p>hi</p>";
        assert_eq!(decode_body(body, &[]), "<p>hi</p>");
    }

    #[test]
    fn decode_replaces_malformed_utf8() {
        let decoded = decode_body(b"<p>Test \xFF\xFE Invalid</p>", &[]);
        assert_eq!(decoded, "<p>Test \u{FFFD}\u{FFFD} Invalid</p>");
    }

    #[test]
    fn undeclared_latin1_keeps_valid_text() {
        let h = headers(&["Content-Type: text/html"]);
        let decoded = decode_body(b"<p>hello caf\xE9 world</p>", &h);
        assert_eq!(decoded, "<p>hello caf\u{FFFD} world</p>");
    }
}
