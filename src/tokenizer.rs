//! Streaming HTML tokenizer.
//!
//! [`HtmlTokenizer`] walks a decoded document once, front to back, and yields
//! [`Token`]s in document order. It never fails: unclosed tags, stray `<`
//! characters and broken character references are recovered from by treating
//! them as text or by consuming the rest of the input.
//!
//! `<script>` and `<style>` contents are raw text and are yielded verbatim
//! as a single [`Token::Text`] up to the matching end tag.

use std::borrow::Cow;

use markup5ever::data::NAMED_ENTITIES;

/// A span recognized by the tokenizer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Token<'a> {
    /// An opening tag. `name` is lowercase.
    StartTag { name: String, self_closing: bool },
    /// A closing tag. `name` is lowercase.
    EndTag { name: String },
    /// Character data, with character references decoded outside raw text.
    Text(Cow<'a, str>),
    /// The inside of `<!-- ... -->`.
    Comment(&'a str),
}

/// What the input at the cursor starts with.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Markup {
    Text,
    Comment,
    Declaration,
    StartTag,
    EndTag,
}

fn markup_at(input: &str) -> Markup {
    let bytes = input.as_bytes();
    if bytes.first() != Some(&b'<') {
        return Markup::Text;
    }
    if input.starts_with("<!--") {
        return Markup::Comment;
    }
    match bytes.get(1) {
        Some(b'!' | b'?') => Markup::Declaration,
        Some(b'/') if bytes.get(2).is_some_and(u8::is_ascii_alphabetic) => Markup::EndTag,
        Some(b) if b.is_ascii_alphabetic() => Markup::StartTag,
        _ => Markup::Text,
    }
}

/// Elements whose content is raw text.
fn raw_text_element(name: &str) -> Option<&'static str> {
    match name {
        "script" => Some("script"),
        "style" => Some("style"),
        _ => None,
    }
}

fn is_name_end(c: char) -> bool {
    c.is_ascii_whitespace() || c == '/' || c == '>'
}

/// Single-pass tokenizer over a decoded HTML document.
///
/// The iterator is finite and cannot be restarted.
#[derive(Debug, Clone)]
pub struct HtmlTokenizer<'a> {
    input: &'a str,
    pos: usize,
    raw_text_until: Option<&'static str>,
}

impl<'a> HtmlTokenizer<'a> {
    #[must_use]
    pub fn new(input: &'a str) -> Self {
        Self {
            input,
            pos: 0,
            raw_text_until: None,
        }
    }

    fn rest(&self) -> &'a str {
        &self.input[self.pos..]
    }

    fn raw_text(&mut self, element: &'static str) -> Option<Token<'a>> {
        let rest = self.rest();
        let end = find_end_tag(rest, element).unwrap_or(rest.len());
        self.pos += end;
        self.raw_text_until = None;
        (end > 0).then(|| Token::Text(Cow::Borrowed(&rest[..end])))
    }

    fn text(&mut self) -> Token<'a> {
        let rest = self.rest();
        let end = rest
            .match_indices('<')
            .map(|(i, _)| i)
            .find(|&i| i > 0 && markup_at(&rest[i..]) != Markup::Text)
            .unwrap_or(rest.len());
        self.pos += end;
        Token::Text(decode_entities(&rest[..end]))
    }

    fn comment(&mut self) -> Token<'a> {
        let body = &self.rest()["<!--".len()..];
        // `<!-->` and `<!--->` close immediately.
        let (text, consumed) = if body.starts_with('>') {
            ("", 1)
        } else if body.starts_with("->") {
            ("", 2)
        } else {
            match body.find("-->") {
                Some(i) => (&body[..i], i + "-->".len()),
                None => (body, body.len()),
            }
        };
        self.pos += "<!--".len() + consumed;
        Token::Comment(text)
    }

    fn skip_declaration(&mut self) {
        let rest = self.rest();
        self.pos += rest.find('>').map_or(rest.len(), |i| i + 1);
    }

    fn start_tag(&mut self) -> Token<'a> {
        let after_lt = &self.rest()[1..];
        let name_len = after_lt.find(is_name_end).unwrap_or(after_lt.len());
        let name = after_lt[..name_len].to_ascii_lowercase();
        let (attrs_len, self_closing) = scan_attributes(&after_lt[name_len..]);
        self.pos += 1 + name_len + attrs_len;

        if !self_closing {
            self.raw_text_until = raw_text_element(&name);
        }
        Token::StartTag { name, self_closing }
    }

    fn end_tag(&mut self) -> Token<'a> {
        let after_slash = &self.rest()[2..];
        let name_len = after_slash.find(is_name_end).unwrap_or(after_slash.len());
        let name = after_slash[..name_len].to_ascii_lowercase();
        let tail = &after_slash[name_len..];
        self.pos += 2 + name_len + tail.find('>').map_or(tail.len(), |i| i + 1);
        Token::EndTag { name }
    }
}

impl<'a> Iterator for HtmlTokenizer<'a> {
    type Item = Token<'a>;

    fn next(&mut self) -> Option<Token<'a>> {
        loop {
            if let Some(element) = self.raw_text_until {
                match self.raw_text(element) {
                    Some(token) => return Some(token),
                    None => continue,
                }
            }
            let rest = self.rest();
            if rest.is_empty() {
                return None;
            }
            match markup_at(rest) {
                Markup::Text => return Some(self.text()),
                Markup::Comment => return Some(self.comment()),
                Markup::Declaration => self.skip_declaration(),
                Markup::StartTag => return Some(self.start_tag()),
                Markup::EndTag => return Some(self.end_tag()),
            }
        }
    }
}

/// Scan the attribute section of a start tag up to and including `>`.
///
/// Quoted values may contain `>`. Returns the consumed length and whether the
/// tag ends with `/>`. An unterminated tag consumes everything.
fn scan_attributes(input: &str) -> (usize, bool) {
    let mut quote: Option<char> = None;
    for (i, c) in input.char_indices() {
        match (quote, c) {
            (Some(q), c) if c == q => quote = None,
            (Some(_), _) => {}
            (None, '"' | '\'') => quote = Some(c),
            (None, '>') => return (i + 1, input[..i].trim_end().ends_with('/')),
            (None, _) => {}
        }
    }
    (input.len(), false)
}

/// Byte offset of `</element` (ASCII case-insensitive) in `input`.
fn find_end_tag(input: &str, element: &str) -> Option<usize> {
    let bytes = input.as_bytes();
    input.match_indices("</").map(|(i, _)| i).find(|&i| {
        let candidate = &bytes[i + 2..];
        candidate.len() >= element.len()
            && candidate[..element.len()].eq_ignore_ascii_case(element.as_bytes())
            && candidate
                .get(element.len())
                .is_none_or(|b| b.is_ascii_whitespace() || *b == b'/' || *b == b'>')
    })
}

/// Decode character references in `text`.
///
/// Handles every HTML named reference terminated by `;` and numeric
/// references. Anything else is left as written.
#[must_use]
pub fn decode_entities(text: &str) -> Cow<'_, str> {
    if !text.contains('&') {
        return Cow::Borrowed(text);
    }

    let mut out = String::with_capacity(text.len());
    let mut rest = text;
    while let Some(amp) = rest.find('&') {
        out.push_str(&rest[..amp]);
        let candidate = &rest[amp..];
        match decode_reference(candidate, &mut out) {
            Some(len) => rest = &candidate[len..],
            None => {
                out.push('&');
                rest = &candidate[1..];
            }
        }
    }
    out.push_str(rest);
    Cow::Owned(out)
}

/// Longest reference body considered, excluding `&` and `;`. The longest
/// named reference, `CounterClockwiseContourIntegral`, has 31 characters.
const MAX_REFERENCE_LEN: usize = 32;

/// Decode one reference at the start of `input` (which begins with `&`),
/// pushing its characters onto `out`. Returns the consumed length.
fn decode_reference(input: &str, out: &mut String) -> Option<usize> {
    let semi = input
        .bytes()
        .skip(1)
        .take(MAX_REFERENCE_LEN + 1)
        .position(|b| b == b';')?
        + 1;
    let body = &input[1..semi];
    if body.is_empty() || !body.chars().all(|c| c.is_ascii_alphanumeric() || c == '#') {
        return None;
    }

    if let Some(number) = body.strip_prefix('#') {
        let code = match number.strip_prefix(['x', 'X']) {
            Some(hex) => u32::from_str_radix(hex, 16).ok()?,
            None => number.parse::<u32>().ok()?,
        };
        out.push(char::from_u32(code).unwrap_or(char::REPLACEMENT_CHARACTER));
    } else {
        // Keys carry their trailing `;`. Prefix entries map to (0, 0).
        let &(first, second) = NAMED_ENTITIES.get(&input[1..=semi])?;
        out.push(char::from_u32(first).filter(|&c| c != '\0')?);
        if let Some(c) = char::from_u32(second).filter(|&c| c != '\0') {
            out.push(c);
        }
    }
    Some(semi + 1)
}
