use super::header::FromHeader;
use super::rfc2045::Rfc2045Parser;
use super::rfc2047::{decode_quoted_printable, LENIENT_BASE64};

use base64::Engine;
use std::collections::HashMap;

/// Content-Type string, major/minor as the first and second elements
/// respectively.
pub type MimeContentType = (String, String);

/// Special header type for the Content-Type header.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MimeContentTypeHeader {
    /// The content type presented by this header, lower-cased
    pub content_type: MimeContentType,
    /// Parameters of this header
    pub params: HashMap<String, String>,
}

impl MimeContentTypeHeader {
    /// True when this header declares `major/minor`, ignoring case.
    pub fn is_mime_type(&self, major: &str, minor: &str) -> bool {
        self.content_type.0.eq_ignore_ascii_case(major) && self.content_type.1.eq_ignore_ascii_case(minor)
    }

    pub fn boundary(&self) -> Option<&str> {
        self.params.get("boundary").map(|b| &b[..]).filter(|b| !b.is_empty())
    }
}

impl FromHeader for MimeContentTypeHeader {
    fn from_header(value: &str) -> Option<MimeContentTypeHeader> {
        let mut parser = Rfc2045Parser::new(value);
        let (value, params) = parser.consume_all();

        let mime_parts: Vec<&str> = value.splitn(2, '/').collect();

        if mime_parts.len() == 2 {
            Some(MimeContentTypeHeader {
                content_type: (
                    mime_parts[0].trim().to_ascii_lowercase(),
                    mime_parts[1].trim().to_ascii_lowercase(),
                ),
                params,
            })
        } else {
            None
        }
    }
}

/// Special header type for the Content-Transfer-Encoding header.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MimeContentTransferEncoding {
    /// Message content is not encoded in any way.
    Identity,
    /// Content transfered using the quoted-printable encoding.
    ///
    /// This encoding is defined in RFC 2045 Section 6.7
    QuotedPrintable,
    /// Content transfered as BASE64
    ///
    /// This encoding is defined in RFC 2045 Section 6.8
    Base64,
}

impl Default for MimeContentTransferEncoding {
    fn default() -> MimeContentTransferEncoding {
        MimeContentTransferEncoding::Identity
    }
}

impl MimeContentTransferEncoding {
    /// Decode content lines whose soft line breaks have already been
    /// removed. Lines are joined without separators.
    ///
    /// Base64 that fails to decode yields `None`.
    pub fn decode<S: AsRef<str>>(&self, lines: &[S]) -> Option<Vec<u8>> {
        match *self {
            MimeContentTransferEncoding::Identity => Some(join(lines).into_bytes()),
            MimeContentTransferEncoding::QuotedPrintable => Some(
                lines
                    .iter()
                    .flat_map(|line| decode_quoted_printable(line.as_ref()))
                    .collect(),
            ),
            MimeContentTransferEncoding::Base64 => {
                let joined: String = join(lines).chars().filter(|c| !c.is_whitespace()).collect();
                LENIENT_BASE64.decode(joined.trim_end_matches('=')).ok()
            }
        }
    }
}

fn join<S: AsRef<str>>(lines: &[S]) -> String {
    lines.iter().map(|l| l.as_ref()).collect()
}

impl FromHeader for MimeContentTransferEncoding {
    fn from_header(value: &str) -> Option<MimeContentTransferEncoding> {
        let token = value.split_whitespace().next()?.trim_end_matches(';');
        match &token.to_ascii_lowercase()[..] {
            "7bit" | "8bit" | "binary" => Some(MimeContentTransferEncoding::Identity),
            "quoted-printable" => Some(MimeContentTransferEncoding::QuotedPrintable),
            "base64" => Some(MimeContentTransferEncoding::Base64),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::collections::HashMap;

    struct ContentTypeParseTestResult<'a> {
        major_type: &'a str,
        minor_type: &'a str,
        params: Vec<(&'a str, &'a str)>,
    }

    struct ContentTypeParseTest<'a> {
        input: &'a str,
        result: Option<ContentTypeParseTestResult<'a>>,
    }

    #[test]
    fn test_content_type_parse() {
        let tests = vec![
            ContentTypeParseTest {
                input: "text/plain",
                result: Some(ContentTypeParseTestResult {
                    major_type: "text",
                    minor_type: "plain",
                    params: vec![],
                }),
            },
            ContentTypeParseTest {
                input: "Text/HTML; charset=us-ascii",
                result: Some(ContentTypeParseTestResult {
                    major_type: "text",
                    minor_type: "html",
                    params: vec![("charset", "us-ascii")],
                }),
            },
            ContentTypeParseTest {
                input: "multipart/alternative; boundary=\"----=_Part_1\"",
                result: Some(ContentTypeParseTestResult {
                    major_type: "multipart",
                    minor_type: "alternative",
                    params: vec![("boundary", "----=_Part_1")],
                }),
            },
            ContentTypeParseTest {
                input: "garbage",
                result: None,
            },
        ];

        for test in tests.into_iter() {
            let parsed = MimeContentTypeHeader::from_header(test.input);
            match (parsed, test.result) {
                (Some(header), Some(expected)) => {
                    assert_eq!(
                        header.content_type,
                        (expected.major_type.to_string(), expected.minor_type.to_string())
                    );
                    let params: HashMap<String, String> = expected
                        .params
                        .iter()
                        .map(|&(k, v)| (k.to_string(), v.to_string()))
                        .collect();
                    assert_eq!(header.params, params);
                }
                (None, None) => {}
                (parsed, _) => panic!("unexpected parse of {}: {:?}", test.input, parsed),
            }
        }
    }

    #[test]
    fn test_content_transfer_encoding_parse() {
        struct EncodingTest<'a> {
            input: &'a str,
            output: Option<MimeContentTransferEncoding>,
        }

        let tests = [
            EncodingTest { input: "7bit", output: Some(MimeContentTransferEncoding::Identity) },
            EncodingTest { input: "BASE64", output: Some(MimeContentTransferEncoding::Base64) },
            EncodingTest { input: " base64 ", output: Some(MimeContentTransferEncoding::Base64) },
            EncodingTest {
                input: "quoted-printable",
                output: Some(MimeContentTransferEncoding::QuotedPrintable),
            },
            EncodingTest { input: "x-uuencode", output: None },
            EncodingTest { input: "", output: None },
        ];

        for test in tests.iter() {
            assert_eq!(MimeContentTransferEncoding::from_header(test.input), test.output, "{}", test.input);
        }
    }

    #[test]
    fn test_content_transfer_decode() {
        struct ContentTransferDecodeTest<'a> {
            encoding: MimeContentTransferEncoding,
            input: Vec<&'a str>,
            output: Option<Vec<u8>>,
        }

        let tests = vec![
            ContentTransferDecodeTest {
                encoding: MimeContentTransferEncoding::Identity,
                input: vec!["foo ", "bar"],
                output: Some(b"foo bar".to_vec()),
            },
            ContentTransferDecodeTest {
                encoding: MimeContentTransferEncoding::QuotedPrintable,
                input: vec!["foo=20", "bar=C3", "=A9"],
                output: Some("foo bar\u{e9}".as_bytes().to_vec()),
            },
            ContentTransferDecodeTest {
                encoding: MimeContentTransferEncoding::Base64,
                input: vec!["Zm9vCmJhcgpi", "YXoKcXV4Cg"],
                output: Some(b"foo\nbar\nbaz\nqux\n".to_vec()),
            },
            ContentTransferDecodeTest {
                encoding: MimeContentTransferEncoding::Base64,
                input: vec!["Zm9v", " YmFy "],
                output: Some(b"foobar".to_vec()),
            },
            // Bad base64 content
            ContentTransferDecodeTest {
                encoding: MimeContentTransferEncoding::Base64,
                input: vec!["/?#"],
                output: None,
            },
        ];

        for test in tests.into_iter() {
            assert_eq!(test.encoding.decode(&test.input), test.output);
        }
    }
}
