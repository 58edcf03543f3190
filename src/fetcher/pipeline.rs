//! Turning a response body into text.
//!
//! Pages routinely lie about or omit their encoding, so detection walks
//! the usual ladder: the Content-Type header, then a `<meta>` declaration
//! near the top of the document, then statistical guessing. Decoding is
//! lossy on purpose: a page with a few bad bytes still gets analysed.

use encoding_rs::Encoding;
use regex::Regex;
use std::sync::LazyLock;

const META_SNIFF_BYTES: usize = 4096;

static HEADER_CHARSET_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"(?i)charset\s*=\s*["']?([^"'\s;]+)"#).unwrap());

static META_CHARSET_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"(?i)<meta\s+[^>]*?charset\s*=\s*["']?([^"'\s/>;]+)"#).unwrap());

/// Decode `body` to UTF-8, returning the text and the encoding used.
pub fn decode_body(content_type: Option<&str>, body: &[u8]) -> (String, &'static Encoding) {
    let encoding = detect_encoding(content_type, body);
    let (text, _, _) = encoding.decode(body);
    (text.into_owned(), encoding)
}

fn detect_encoding(content_type: Option<&str>, body: &[u8]) -> &'static Encoding {
    if let Some(encoding) = content_type.and_then(|ct| label_from(&HEADER_CHARSET_REGEX, ct)) {
        return encoding;
    }

    // Byte order marks beat any declaration inside the document.
    if let Some((encoding, _)) = Encoding::for_bom(body) {
        return encoding;
    }

    let head = &body[..body.len().min(META_SNIFF_BYTES)];
    let head_text = String::from_utf8_lossy(head);
    // Covers both <meta charset=..> and <meta http-equiv content="..; charset=..">.
    if let Some(encoding) = label_from(&META_CHARSET_REGEX, &head_text) {
        return encoding;
    }

    let mut detector = chardetng::EncodingDetector::new();
    detector.feed(head, head.len() == body.len());
    detector.guess(None, true)
}

fn label_from(regex: &Regex, haystack: &str) -> Option<&'static Encoding> {
    let label = regex.captures(haystack)?.get(1)?.as_str();
    Encoding::for_label(label.trim().as_bytes())
}
