//! Splitting a message body into MIME sections and decoding them.

use std::borrow::Cow;

use super::header::FromHeader;
use super::mimeheaders::{MimeContentTransferEncoding, MimeContentTypeHeader};
use super::rfc2047::continuation_prefix_len;
use super::utils::{is_blank, strip_prefix_ignore_case};

/// Decodes the body of one message from its raw lines.
///
/// Only one level of multipart is understood. Each section between two
/// boundary lines is decoded on its own and the results are concatenated;
/// a plain-text/HTML alternative pair keeps only the HTML part.
pub struct MimeBodyExtractor<'a, S> {
    lines: &'a [S],
    boundary: Option<String>,
}

impl<'a, S: AsRef<str>> MimeBodyExtractor<'a, S> {
    pub fn new(lines: &'a [S]) -> MimeBodyExtractor<'a, S> {
        let boundary = header_block(lines)
            .and_then(|headers| header_value(headers, "content-type:"))
            .and_then(|value| MimeContentTypeHeader::from_header(&value))
            .and_then(|ct| ct.boundary().map(|b| format!("--{}", b)));
        log::trace!("multipart boundary: {:?}", boundary);

        MimeBodyExtractor { lines, boundary }
    }

    /// The boundary marker, already prefixed with `--`.
    pub fn boundary(&self) -> Option<&str> {
        self.boundary.as_deref()
    }

    /// Sections that will be decoded, each starting with its boundary line.
    pub fn sections(&self) -> Vec<&'a [S]> {
        let boundary = match self.boundary {
            Some(ref b) => b,
            None => return Vec::new(),
        };

        let markers: Vec<usize> = self
            .lines
            .iter()
            .enumerate()
            .filter(|(_, line)| line.as_ref().starts_with(&boundary[..]))
            .map(|(index, _)| index)
            .collect();
        let mut sections: Vec<&'a [S]> = markers
            .windows(2)
            .map(|pair| &self.lines[pair[0]..pair[1]])
            .collect();

        if sections.len() == 2
            && declares(sections[0], "text", "plain")
            && declares(sections[1], "text", "html")
        {
            sections.remove(0);
        }
        log::trace!("{} of {} boundary lines kept as sections", sections.len(), markers.len());
        sections
    }

    /// Decode every section and concatenate the text.
    ///
    /// Without a usable boundary the content after the first blank line is
    /// decoded as a single section.
    pub fn body(&self) -> String {
        let boundary_seen = self.boundary.as_ref().map_or(false, |b| {
            self.lines.iter().any(|l| l.as_ref().starts_with(&b[..]))
        });

        if boundary_seen {
            self.sections().into_iter().map(decode_section).collect()
        } else if self.lines.iter().any(|l| is_blank(l.as_ref())) {
            decode_section(self.lines)
        } else {
            String::new()
        }
    }
}

/// Lines before the first blank line, or `None` when the input is empty.
fn header_block<S: AsRef<str>>(lines: &[S]) -> Option<&[S]> {
    if lines.is_empty() {
        return None;
    }
    let end = lines.iter().position(|l| is_blank(l.as_ref())).unwrap_or(lines.len());
    Some(&lines[..end])
}

/// The unfolded value of the first `name` header in `headers`.
fn header_value<S: AsRef<str>>(headers: &[S], name: &str) -> Option<String> {
    let (index, first) = headers
        .iter()
        .enumerate()
        .find_map(|(i, l)| strip_prefix_ignore_case(l.as_ref().trim_start(), name).map(|v| (i, v)))?;
    let mut value = first.trim().to_string();

    for line in headers[index + 1..].iter().map(|l| l.as_ref()) {
        let prefix = continuation_prefix_len(line);
        if prefix == 0 {
            break;
        }
        value.push(' ');
        value.push_str(line[prefix..].trim_end());
    }
    Some(value)
}

/// True when the section's own headers declare `major/minor`.
fn declares<S: AsRef<str>>(section: &[S], major: &str, minor: &str) -> bool {
    let headers = match section.iter().position(|l| is_blank(l.as_ref())) {
        Some(end) => &section[..end],
        None => section,
    };
    header_value(headers, "content-type:")
        .and_then(|value| MimeContentTypeHeader::from_header(&value))
        .map_or(false, |ct| ct.is_mime_type(major, minor))
}

/// Decode one section: its headers run up to the first blank line, the
/// content follows it. A section with no blank line loses only its first
/// (boundary) line.
fn decode_section<S: AsRef<str>>(section: &[S]) -> String {
    let (headers, content) = match section.iter().position(|l| is_blank(l.as_ref())) {
        Some(blank) => (&section[..blank], &section[blank + 1..]),
        None if section.is_empty() => (section, section),
        None => (&section[..0], &section[1..]),
    };

    let encoding = header_value(headers, "content-transfer-encoding:")
        .and_then(|value| MimeContentTransferEncoding::from_header(&value))
        .unwrap_or_default();

    // A trailing "=" is a soft line break.
    let content: Vec<&str> = content
        .iter()
        .map(|l| {
            let l = l.as_ref();
            l.strip_suffix('=').unwrap_or(l)
        })
        .collect();

    match encoding.decode(&content) {
        Some(bytes) => match String::from_utf8_lossy(&bytes) {
            Cow::Borrowed(text) => text.to_string(),
            Cow::Owned(text) => {
                log::debug!("section is not valid UTF-8, replaced invalid bytes");
                text
            }
        },
        None => {
            log::warn!("could not decode {:?} section of {} lines", encoding, content.len());
            String::new()
        }
    }
}
