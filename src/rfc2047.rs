//! Module for decoding RFC 2047 strings, plus the quoted-printable and
//! header-folding helpers that share its escape handling.
use base64::alphabet;
use base64::engine::general_purpose::{GeneralPurpose, GeneralPurposeConfig};
use base64::engine::DecodePaddingMode;
use base64::Engine;
use encoding_rs::Encoding;

/// Base64 engine accepting padded or unpadded input, as found in the wild.
pub(crate) const LENIENT_BASE64: GeneralPurpose = GeneralPurpose::new(
    &alphabet::STANDARD,
    GeneralPurposeConfig::new()
        .with_decode_padding_mode(DecodePaddingMode::Indifferent)
        .with_decode_allow_trailing_bits(true),
);

/// Decode an RFC 2047 encoded word (`s`) into a Rust String.
///
/// Will accept either "Q" encoding (RFC 2047 Section 4.2) or
/// "B" encoding (BASE64). Charsets unknown to `encoding_rs` are read as
/// UTF-8 with replacement characters.
pub fn decode_rfc2047(s: &str) -> Option<String> {
    let parts: Vec<&str> = s.split('?').collect();
    if parts.len() != 5 || parts[0] != "=" || parts[4] != "=" {
        return None;
    }
    let charset = parts[1].trim();
    let content = parts[3];

    let bytes = match &parts[2].to_ascii_lowercase()[..] {
        "q" => decode_q_encoding(content),
        "b" => LENIENT_BASE64.decode(content.trim_end_matches('=')).ok()?,
        _ => return None,
    };

    // RFC 2231 allows a language suffix: "utf-8*en"
    let label = charset.split('*').next().unwrap_or(charset);
    let encoding = Encoding::for_label(label.as_bytes()).unwrap_or(encoding_rs::UTF_8);
    let (decoded, _, _) = encoding.decode(&bytes);
    Some(decoded.into_owned())
}

/// Decode the "Q" encoding: `_` is a space, the rest is quoted-printable.
pub fn decode_q_encoding(s: &str) -> Vec<u8> {
    let spaced = s.replace('_', "=20");
    decode_quoted_printable(&spaced)
}

/// Decode `=XX` escapes of one quoted-printable line into bytes.
///
/// An `=` that is not followed by two hex digits is kept as-is, so this
/// never fails.
pub fn decode_quoted_printable(s: &str) -> Vec<u8> {
    let bytes = s.as_bytes();
    let mut result = Vec::with_capacity(bytes.len());
    let mut i = 0;

    while i < bytes.len() {
        if bytes[i] == b'=' && i + 2 < bytes.len() {
            if let (Some(hi), Some(lo)) = (hex_value(bytes[i + 1]), hex_value(bytes[i + 2])) {
                result.push(hi << 4 | lo);
                i += 3;
                continue;
            }
        }
        result.push(bytes[i]);
        i += 1;
    }

    result
}

fn hex_value(b: u8) -> Option<u8> {
    match b {
        b'0'..=b'9' => Some(b - b'0'),
        b'A'..=b'F' => Some(b - b'A' + 10),
        b'a'..=b'f' => Some(b - b'a' + 10),
        _ => None,
    }
}

/// Decode every encoded word found in `s`, leaving other text untouched.
///
/// Linear whitespace between two adjacent encoded words is dropped
/// (RFC 2047 Section 6.2). Words that fail to decode are kept verbatim.
pub fn decode_text(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut rest = s;
    // Whitespace seen since the last decoded word, held back in case
    // another encoded word follows it.
    let mut pending_ws = "";
    let mut after_word = false;

    while let Some(start) = rest.find("=?") {
        let (literal, candidate) = rest.split_at(start);
        let word_len = match encoded_word_len(candidate) {
            Some(len) => len,
            None => {
                // Not an encoded word: emit "=?" literally and keep scanning.
                out.push_str(pending_ws);
                out.push_str(literal);
                out.push_str("=?");
                pending_ws = "";
                after_word = false;
                rest = &candidate[2..];
                continue;
            }
        };

        let word = &candidate[..word_len];
        match decode_rfc2047(word) {
            Some(decoded) => {
                let only_ws = literal.chars().all(|c| c == ' ' || c == '\t');
                if !(after_word && only_ws) {
                    out.push_str(pending_ws);
                    out.push_str(literal);
                }
                out.push_str(&decoded);
                after_word = true;
            }
            None => {
                out.push_str(pending_ws);
                out.push_str(literal);
                out.push_str(word);
                after_word = false;
            }
        }
        pending_ws = "";
        rest = &candidate[word_len..];

        if after_word {
            let trimmed = rest.trim_start_matches(|c: char| c == ' ' || c == '\t');
            pending_ws = &rest[..rest.len() - trimmed.len()];
            rest = trimmed;
        }
    }

    out.push_str(pending_ws);
    out.push_str(rest);
    out
}

/// Length of the `=?charset?enc?text?=` word at the start of `s`, if any.
fn encoded_word_len(s: &str) -> Option<usize> {
    let body = s.strip_prefix("=?")?;
    let charset_end = body.find('?')?;
    let after_charset = &body[charset_end + 1..];
    let mut enc = after_charset.chars();
    match enc.next() {
        Some('b') | Some('B') | Some('q') | Some('Q') => {}
        _ => return None,
    }
    if enc.next() != Some('?') || charset_end == 0 {
        return None;
    }
    let text = &after_charset[2..];
    let text_end = text.find("?=")?;
    if text[..text_end].contains(|c: char| c == ' ' || c == '\t') {
        return None;
    }
    Some(2 + charset_end + 1 + 2 + text_end + 2)
}

/// Number of leading characters to strip from a folded header line.
///
/// Returns 0 when `line` does not continue the previous header value:
/// either it does not start with whitespace, or it is whitespace only
/// (the blank line that ends the header block).
pub fn continuation_prefix_len(line: &str) -> usize {
    let prefix = line.len() - line.trim_start_matches(|c: char| c == ' ' || c == '\t').len();
    if prefix == 0 || line.trim().is_empty() {
        0
    } else {
        prefix
    }
}
