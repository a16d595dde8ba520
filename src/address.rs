use std::fmt;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use super::rfc2047::{continuation_prefix_len, decode_text};
use super::utils::{between, is_blank, strip_prefix_ignore_case};

/// A display name and mailbox address pair.
///
/// Absent parts are empty strings, never missing.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Person {
    /// The display name, possibly empty
    pub name: String,
    /// The mailbox address, lower-cased by the parsers
    pub email_address: String,
}

impl Person {
    pub fn new(name: impl Into<String>, email_address: impl Into<String>) -> Person {
        Person {
            name: name.into(),
            email_address: email_address.into(),
        }
    }

    /// Stand-in recipient for messages without a usable `To:` field.
    pub fn unknown_receiver() -> Person {
        Person::new("ERROR", "ERROR")
    }

    fn lowercased(mut self) -> Person {
        self.email_address = self.email_address.to_lowercase();
        self
    }
}

impl fmt::Display for Person {
    fn fmt(&self, fmt: &mut fmt::Formatter) -> fmt::Result {
        if self.name.is_empty() {
            write!(fmt, "<{}>", self.email_address)
        } else {
            write!(fmt, "\"{}\" <{}>", self.name, self.email_address)
        }
    }
}

/// Parse the sender out of the `From:` line at `lines[index]`.
///
/// When the value after the label is blank the sender is read from the
/// following line instead, looking at most `lookahead` lines ahead and
/// never past the blank line that ends the header block.
pub fn parse_sender<S: AsRef<str>>(lines: &[S], index: usize, lookahead: usize) -> Person {
    let mut current = index;
    loop {
        let trimmed = match lines.get(current) {
            Some(line) => line.as_ref().trim(),
            None => break,
        };
        let value = strip_prefix_ignore_case(trimmed, "from:").unwrap_or(trimmed);
        let decoded = decode_text(value);
        let decoded = decoded.trim();
        if !decoded.is_empty() {
            let next = lines.get(current + 1).map(|l| l.as_ref());
            return parse_sender_value(decoded, next);
        }

        current += 1;
        let exhausted = current - index > lookahead;
        if exhausted || lines.get(current).map_or(true, |l| is_blank(l.as_ref())) {
            break;
        }
    }

    log::debug!("no sender found after line {}", index);
    Person::default()
}

/// Split one decoded sender value into name and address. `next_line` is the
/// raw physical line after it, which may hold a folded `<address>`.
fn parse_sender_value(s: &str, next_line: Option<&str>) -> Person {
    let (name, rest) = if let Some(open) = s.find('"') {
        match s[open + 1..].find('"') {
            Some(len) => (&s[open + 1..open + 1 + len], &s[open + 1 + len + 1..]),
            None => ("", &s[open + 1..]),
        }
    } else {
        match s.find('<') {
            Some(angle) if angle > 0 => (s[..angle].trim(), &s[angle..]),
            _ => ("", s),
        }
    };
    let name = name.replace('_', " ");

    let mut address = between(s, '<', '>', 0).unwrap_or("").trim().to_string();
    if let Some(folded) = next_line.and_then(folded_address) {
        address = folded.to_string();
    }
    if address.is_empty() {
        address = rest.trim().to_string();
    }

    Person::new(name, address).lowercased()
}

/// The address on a continuation line holding nothing but `<local@domain>`.
fn folded_address(line: &str) -> Option<&str> {
    if !(line.starts_with('\t') || line.starts_with(' ')) {
        return None;
    }
    let trimmed = line.trim();
    if trimmed.starts_with('<') && trimmed.ends_with('>') && trimmed.contains('@') {
        between(trimmed, '<', '>', 0).map(str::trim)
    } else {
        None
    }
}

/// Parse every recipient of the `To:` line at `lines[index]`, absorbing the
/// folded continuation lines that follow it.
///
/// Returns `None` when the field holds nothing.
pub fn parse_receivers<S: AsRef<str>>(lines: &[S], index: usize) -> Option<Vec<Person>> {
    let trimmed = lines.get(index)?.as_ref().trim();
    let value = match trimmed.find(':') {
        Some(colon) => &trimmed[colon + 1..],
        None => trimmed,
    };
    let mut text = value.strip_prefix(' ').unwrap_or(value).to_string();

    for line in lines[index + 1..].iter().map(|l| l.as_ref()) {
        let prefix = continuation_prefix_len(line);
        if prefix == 0 {
            break;
        }
        text.push(' ');
        text.push_str(&line[prefix..]);
    }

    let decoded = decode_text(&text);
    if decoded.trim().is_empty() {
        return None;
    }

    let receivers = split_recipients(&decoded);
    if receivers.is_empty() {
        None
    } else {
        Some(receivers)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum TokenState {
    BetweenEntries,
    InQuotedName,
    InBracketAddress,
    InBareToken,
}

/// Pieces of one comma-separated entry collected by the tokenizer.
#[derive(Default)]
struct RawEntry {
    raw: String,
    quoted: Option<String>,
    bare: String,
    bracket: Option<String>,
}

impl RawEntry {
    fn into_person(self, terminated: bool) -> Option<Person> {
        if self.raw.trim().is_empty() {
            return None;
        }
        if !terminated {
            // An unclosed quote or bracket swallowed the rest of the list.
            return Some(Person::new("", self.raw.trim()).lowercased());
        }

        let (name, address) = match (self.quoted, self.bracket) {
            (Some(quoted), Some(bracket)) => (quoted, bracket),
            (Some(quoted), None) => (quoted, self.bare),
            (None, Some(bracket)) => (self.bare, bracket),
            (None, None) => (String::new(), self.bare),
        };
        let name = name.trim();
        let address = address.trim();

        let artifact = name.eq_ignore_ascii_case(address)
            || name
                .trim_matches(|c: char| c == '"' || c == '\'')
                .eq_ignore_ascii_case(address);
        let name = if artifact { "" } else { name };

        if address.is_empty() {
            // "Just A Name" with nothing else: keep the text as the address.
            Some(Person::new("", name).lowercased())
        } else {
            Some(Person::new(name, address).lowercased())
        }
    }
}

/// Split a decoded recipient list into people, one per comma-separated
/// entry. Commas inside quoted names or angle brackets do not split.
fn split_recipients(s: &str) -> Vec<Person> {
    let mut people = Vec::new();
    let mut state = TokenState::BetweenEntries;
    let mut entry = RawEntry::default();

    for c in s.chars() {
        if c == ',' && matches!(state, TokenState::BetweenEntries | TokenState::InBareToken) {
            people.extend(std::mem::take(&mut entry).into_person(true));
            state = TokenState::BetweenEntries;
            continue;
        }
        entry.raw.push(c);

        state = match (state, c) {
            (TokenState::BetweenEntries, '"') | (TokenState::InBareToken, '"') => {
                entry.quoted = Some(String::new());
                TokenState::InQuotedName
            }
            (TokenState::BetweenEntries, '<') | (TokenState::InBareToken, '<') => {
                entry.bracket = Some(String::new());
                TokenState::InBracketAddress
            }
            (TokenState::BetweenEntries, c) if c.is_whitespace() => TokenState::BetweenEntries,
            (TokenState::BetweenEntries, c) | (TokenState::InBareToken, c) => {
                entry.bare.push(c);
                TokenState::InBareToken
            }
            (TokenState::InQuotedName, '"') => TokenState::BetweenEntries,
            (TokenState::InQuotedName, c) => {
                entry.quoted.get_or_insert_with(String::new).push(c);
                TokenState::InQuotedName
            }
            (TokenState::InBracketAddress, '>') => TokenState::BetweenEntries,
            (TokenState::InBracketAddress, c) => {
                entry.bracket.get_or_insert_with(String::new).push(c);
                TokenState::InBracketAddress
            }
        };
    }

    let terminated = matches!(state, TokenState::BetweenEntries | TokenState::InBareToken);
    people.extend(entry.into_person(terminated));
    people
}
