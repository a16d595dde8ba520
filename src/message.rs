use std::fmt;

use chrono::{DateTime, FixedOffset};
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use super::address::Person;
use super::body::MimeBodyExtractor;
use super::config::ParserConfig;
use super::header::{HeaderFieldExtractor, HeaderFields};
use super::rfc822::epoch;
use super::utils::starts_with_ignore_case;

/// Identifier stored when a message has no usable `Message-ID:`.
pub const NO_ID: &str = "NO ID";

/// One retrieved email, parsed.
///
/// Every field is always populated: whatever could not be read from the
/// raw lines is replaced by a sentinel (`NO_ID`, the `ERROR` recipient, the
/// default subject, the Unix epoch) rather than reported as an error.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Message {
    /// Text between the brackets of `Message-ID:`, never empty
    pub id: String,
    /// The `From:` sender; empty name and address when unreadable
    pub sender: Person,
    /// Recipients of the first accepted `To:` field, never empty
    pub receivers: Vec<Person>,
    /// Decoded subject, never empty
    pub subject: String,
    pub arrival_time: DateTime<FixedOffset>,
    /// Decoded text of every retained MIME section, concatenated
    pub body: String,
    /// True when any raw line declares HTML content
    pub contains_html: bool,
    /// Raw lines before the first blank line
    pub header: Vec<String>,
    /// The full input, unchanged
    pub raw: Vec<String>,
}

impl Message {
    /// Parse the lines of one message with the default configuration.
    ///
    /// The lines must already be stripped of protocol framing (status line,
    /// terminator, dot-stuffing); see [`crate::response::retr_lines`].
    pub fn parse(lines: Vec<String>) -> Message {
        Message::parse_with_config(lines, &ParserConfig::default())
    }

    pub fn parse_with_config(lines: Vec<String>, config: &ParserConfig) -> Message {
        let fields = HeaderFieldExtractor::new(&lines, config).extract();
        let body = MimeBodyExtractor::new(&lines).body();
        let contains_html = lines
            .iter()
            .any(|line| starts_with_ignore_case(line.trim_start(), &config.html_marker));

        Message::finish(fields, body, contains_html, lines, config)
    }

    /// Split `text` on CRLF or LF and parse the resulting lines.
    pub fn from_text(text: &str) -> Message {
        Message::parse(text.lines().map(str::to_string).collect())
    }

    /// Fill in sentinels for everything the header scan did not find.
    fn finish(
        fields: HeaderFields,
        body: String,
        contains_html: bool,
        raw: Vec<String>,
        config: &ParserConfig,
    ) -> Message {
        let id = fields.id.unwrap_or_else(|| {
            log::debug!("no message id, using {:?}", NO_ID);
            NO_ID.to_string()
        });
        let receivers = match fields.receivers {
            Some(receivers) if !receivers.is_empty() => receivers,
            _ => {
                log::debug!("no recipients in message {}", id);
                vec![Person::unknown_receiver()]
            }
        };
        let arrival_time = fields.arrival_time.unwrap_or_else(|| {
            log::debug!("no usable date in message {}, using the epoch", id);
            epoch()
        });

        Message {
            sender: fields.sender.unwrap_or_default(),
            subject: fields.subject.unwrap_or_else(|| config.default_subject.clone()),
            receivers,
            arrival_time,
            body,
            contains_html,
            header: fields.header,
            raw,
            id,
        }
    }
}

impl fmt::Display for Message {
    fn fmt(&self, fmt: &mut fmt::Formatter) -> fmt::Result {
        writeln!(fmt, "Id:      {}", self.id)?;
        writeln!(fmt, "From:    {}", self.sender)?;
        let receivers: Vec<String> = self.receivers.iter().map(|p| p.to_string()).collect();
        writeln!(fmt, "To:      {}", receivers.join(", "))?;
        writeln!(fmt, "Subject: {}", self.subject)?;
        writeln!(fmt, "Date:    {}", self.arrival_time.to_rfc2822())?;
        writeln!(fmt, "HTML:    {}", if self.contains_html { "yes" } else { "no" })?;
        writeln!(fmt)?;
        write!(fmt, "{}", self.body)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use base64::engine::general_purpose::STANDARD;
    use base64::Engine;

    fn lines(input: &[&str]) -> Vec<String> {
        input.iter().map(|l| l.to_string()).collect()
    }

    #[test]
    fn test_full_message() {
        let message = Message::parse(lines(&[
            "Message-ID: <20130102023157.1234@mail.example.org>",
            "From: \"John Doe\" <john@EXAMPLE.com>",
            "To: a@x.com, \"B C\" <b@x.com>",
            "Subject: =?UTF-8?Q?Caf=C3=A9?= menu",
            "Date: Wed, 2 Jan 2013 02:31:57 +0000 (GMT+00:00)",
            "Content-Type: text/plain",
            "",
            "Soup of the day",
        ]));

        assert_eq!(message.id, "20130102023157.1234@mail.example.org");
        assert_eq!(message.sender, Person::new("John Doe", "john@example.com"));
        assert_eq!(
            message.receivers,
            vec![Person::new("", "a@x.com"), Person::new("B C", "b@x.com")]
        );
        assert_eq!(message.subject, "Caf\u{e9} menu");
        assert_eq!(message.arrival_time.timestamp(), 1357093917);
        assert_eq!(message.body, "Soup of the day");
        assert!(!message.contains_html);
        assert_eq!(message.header.len(), 6);
        assert_eq!(message.raw.len(), 8);
    }

    #[test]
    fn test_sentinels() {
        let message = Message::parse(lines(&["X-Mailer: nothing useful", "", "body"]));

        assert_eq!(message.id, NO_ID);
        assert_eq!(message.receivers, vec![Person::new("ERROR", "ERROR")]);
        assert_eq!(message.sender, Person::default());
        assert_eq!(message.subject, "(No Subject)");
        assert_eq!(message.arrival_time, epoch());
        assert_eq!(message.arrival_time.timestamp(), 0);
    }

    #[test]
    fn test_bad_dates_fall_back_to_epoch() {
        let dates = [
            "Date: 1 Jan 2000 10:00 +99999999",
            "Date: 1 Jan 2000 10:00 +2147483647",
            "Date: 1 Jan 4294967296 10:00 +0000",
            "Date: not a date at all",
        ];

        for date in dates.iter() {
            let message = Message::parse(lines(&[*date, "", "body"]));
            assert_eq!(message.arrival_time, epoch(), "{}", date);
            assert_eq!(message.body, "body");
        }
    }

    #[test]
    fn test_no_blank_line() {
        let input = lines(&["From: a@b.org", "Subject: hi", "some text"]);
        let message = Message::parse(input.clone());

        assert_eq!(message.header, input);
        assert_eq!(message.raw, input);
        assert_eq!(message.body, "");
    }

    #[test]
    fn test_empty_input() {
        let message = Message::parse(Vec::new());
        assert_eq!(message.id, NO_ID);
        assert!(message.header.is_empty());
        assert_eq!(message.body, "");
    }

    #[test]
    fn test_html_alternative() {
        let message = Message::parse(lines(&[
            "From: a@example.org",
            "Content-Type: multipart/alternative; boundary=\"alt\"",
            "",
            "--alt",
            "Content-Type: text/plain; charset=utf-8",
            "",
            "plain version",
            "--alt",
            "Content-Type: text/html; charset=utf-8",
            "Content-Transfer-Encoding: quoted-printable",
            "",
            "<p>html=20version</p>",
            "--alt--",
        ]));

        assert_eq!(message.body, "<p>html version</p>");
        assert!(message.contains_html);
    }

    #[test]
    fn test_base64_round_trip() {
        let texts = ["plain ascii", "caf\u{e9} \u{2603} \u{1f600}", ""];

        for text in texts.iter() {
            let encoded = STANDARD.encode(text.as_bytes());
            let message = Message::parse(lines(&[
                "Content-Type: multipart/mixed; boundary=b",
                "",
                "--b",
                "Content-Transfer-Encoding: base64",
                "",
                encoded.as_str(),
                "--b--",
            ]));
            assert_eq!(message.body, *text);
        }
    }

    #[test]
    fn test_quoted_printable_soft_break() {
        let message = Message::parse(lines(&[
            "Content-Type: multipart/mixed; boundary=b",
            "",
            "--b",
            "Content-Transfer-Encoding: quoted-printable",
            "",
            "first half=",
            "second half",
            "--b--",
        ]));
        assert_eq!(message.body, "first halfsecond half");
    }

    #[test]
    fn test_idempotent() {
        let input = lines(&[
            "Message-ID: <x@y>",
            "From: =?utf-8?B?w4ltaWxl?= <EMILE@example.org>",
            "To: \"Doe, Jane\" <jane@example.org>,",
            "\tbob@example.org",
            "Subject: again",
            "",
            "body",
        ]);

        let first = Message::parse(input.clone());
        let second = Message::parse(input);
        assert_eq!(first, second);
        assert_eq!(first.receivers.len(), 2);
    }

    #[test]
    fn test_from_text() {
        let message = Message::from_text("Subject: crlf\r\nTo: a@b.org\r\n\r\nline one\r\nline two\r\n");

        assert_eq!(message.subject, "crlf");
        assert_eq!(message.receivers, vec![Person::new("", "a@b.org")]);
        assert_eq!(message.header, vec!["Subject: crlf", "To: a@b.org"]);
        assert_eq!(message.body, "line oneline two");
    }

    #[test]
    fn test_config() {
        let config = ParserConfig {
            default_subject: "untitled".to_string(),
            html_marker: "<html".to_string(),
            ..ParserConfig::default()
        };
        let message = Message::parse_with_config(lines(&["From: a@b.org", "", "<HTML><body>"]), &config);

        assert_eq!(message.subject, "untitled");
        assert!(message.contains_html);
    }

    #[test]
    fn test_display() {
        let message = Message::from_text("From: Ann <ann@example.org>\nSubject: Hi\n\nHello");
        let shown = message.to_string();

        assert!(shown.contains("From:    \"Ann\" <ann@example.org>"));
        assert!(shown.contains("To:      \"ERROR\" <ERROR>"));
        assert!(shown.ends_with("\n\nHello"));
    }
}

#[cfg(all(feature = "nightly", test))]
mod bench {
    extern crate test;

    use self::test::Bencher;
    use super::Message;

    macro_rules! bench_parser {
        ($name:ident, $test:expr) => {
            #[bench]
            fn $name(b: &mut Bencher) {
                let s = $test;
                b.iter(|| Message::from_text(s));
            }
        };
    }

    bench_parser!(
        bench_simple,
        "From: joe@example.org\r\nTo: john@example.org\r\n\r\nHello!"
    );
    bench_parser!(
        bench_alternative,
        "From: \"Joe\" <joe@example.org>\r\n\
         To: john@example.org, \"Jane, Q\" <jane@example.org>\r\n\
         Subject: =?UTF-8?B?SGVsbG8=?=\r\n\
         Content-Type: multipart/alternative; boundary=foo\r\n\
         \r\n\
         --foo\r\n\
         Content-Type: text/plain\r\n\
         \r\n\
         Hello!\r\n\
         --foo\r\n\
         Content-Type: text/html\r\n\
         Content-Transfer-Encoding: base64\r\n\
         \r\n\
         PGI+SGVsbG8hPC9iPg==\r\n\
         --foo--\r\n"
    );
}
