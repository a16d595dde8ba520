use chrono::{DateTime, FixedOffset};

use super::address::{parse_receivers, parse_sender, Person};
use super::config::ParserConfig;
use super::finisher::{finish_subject, strip_date_trailers};
use super::rfc2047::{continuation_prefix_len, decode_text};
use super::rfc822::parse_date;
use super::utils::between;

/// Trait for converting from RFC822 Header values into
/// Rust types.
pub trait FromHeader: Sized {
    /// Parse the `value` of the header.
    ///
    /// Returns None if the value failed to be parsed
    fn from_header(value: &str) -> Option<Self>;
}

/// Header-derived fields as found, before any sentinel is filled in.
///
/// `None` means the field never appeared (or held nothing usable).
#[derive(Debug, Clone, Default, PartialEq)]
pub struct HeaderFields {
    pub id: Option<String>,
    pub sender: Option<Person>,
    pub receivers: Option<Vec<Person>>,
    pub subject: Option<String>,
    pub arrival_time: Option<DateTime<FixedOffset>>,
    /// Raw lines before the first blank line; every line when there is none.
    pub header: Vec<String>,
}

/// Field prefixes the extractor acts on, matched against the lower-cased line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Field {
    MessageId,
    From,
    To,
    Subject,
    Date,
}

impl Field {
    const ALL: [(&'static str, Field); 5] = [
        ("message-id:", Field::MessageId),
        ("from:", Field::From),
        ("to:", Field::To),
        ("subject:", Field::Subject),
        ("date:", Field::Date),
    ];

    fn recognize(lowered: &str) -> Option<(Field, usize)> {
        Field::ALL
            .iter()
            .find(|(prefix, _)| lowered.starts_with(prefix))
            .map(|&(prefix, field)| (field, prefix.len()))
    }
}

/// Scans the header block of one message's raw lines.
pub struct HeaderFieldExtractor<'a, S> {
    lines: &'a [S],
    config: &'a ParserConfig,
}

impl<'a, S: AsRef<str>> HeaderFieldExtractor<'a, S> {
    pub fn new(lines: &'a [S], config: &'a ParserConfig) -> HeaderFieldExtractor<'a, S> {
        HeaderFieldExtractor { lines, config }
    }

    /// Walk the lines up to the first blank one, collecting known fields.
    pub fn extract(&self) -> HeaderFields {
        let mut fields = HeaderFields::default();
        let mut header_end = self.lines.len();

        for (index, line) in self.lines.iter().enumerate() {
            let trimmed = line.as_ref().trim();
            if trimmed.is_empty() {
                header_end = index;
                break;
            }

            // ASCII lower-casing keeps byte offsets, so `value` can be cut
            // from the original text.
            let lowered = trimmed.to_ascii_lowercase();
            let (field, label_len) = match Field::recognize(&lowered) {
                Some(found) => found,
                None => continue,
            };
            let value = &trimmed[label_len..];

            match field {
                Field::MessageId => {
                    fields.id = between(value, '<', '>', 0)
                        .map(str::trim)
                        .filter(|id| !id.is_empty())
                        .map(str::to_string);
                }
                Field::From => {
                    fields.sender = Some(parse_sender(self.lines, index, self.config.sender_lookahead));
                }
                Field::To if fields.receivers.is_none() => {
                    fields.receivers = parse_receivers(self.lines, index);
                }
                Field::To => {}
                Field::Subject => {
                    fields.subject = Some(self.subject(value, index));
                }
                Field::Date => {
                    let date = strip_date_trailers(value);
                    fields.arrival_time = parse_date(&date);
                    if fields.arrival_time.is_none() {
                        log::debug!("unparseable date {:?}", value.trim());
                    }
                }
            }
        }

        fields.header = self.lines[..header_end]
            .iter()
            .map(|l| l.as_ref().to_string())
            .collect();
        fields
    }

    /// Decode the subject value at `index`, unfolding its continuation lines.
    fn subject(&self, value: &str, index: usize) -> String {
        let mut text = value.strip_prefix(' ').unwrap_or(value).to_string();
        for line in self.lines[index + 1..].iter().map(|l| l.as_ref()) {
            let prefix = continuation_prefix_len(line);
            if prefix == 0 {
                break;
            }
            text.push(' ');
            text.push_str(&line[prefix..]);
        }

        let decoded = decode_text(&text).replace('_', " ");
        finish_subject(&decoded, &self.config.default_subject)
    }
}
