//! Helpers for the POP3 responses that surround a message.
//!
//! Nothing here talks to a server; these functions only pick apart response
//! text that has already been read.
use std::fmt;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use super::results::{ParsingError, ParsingResult};

pub const OK: &str = "+OK";
pub const ERR: &str = "-ERR";

/// True when `line` carries the `+OK` status marker.
pub fn is_ok(line: &str) -> bool {
    line.trim_start().starts_with(OK)
}

/// The text after a `+OK` or `-ERR` marker, trimmed. `None` when the line
/// has neither.
pub fn strip_status(line: &str) -> Option<&str> {
    let line = line.trim();
    line.strip_prefix(OK)
        .or_else(|| line.strip_prefix(ERR))
        .map(str::trim_start)
}

/// Message count and total octets reported by `STAT`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct MailboxStat {
    pub count: i64,
    pub size: i64,
}

impl MailboxStat {
    /// Reported for any reply that is not `+OK`.
    pub const FAILURE: MailboxStat = MailboxStat { count: -1, size: -1 };

    pub fn is_failure(&self) -> bool {
        *self == MailboxStat::FAILURE
    }
}

impl fmt::Display for MailboxStat {
    fn fmt(&self, fmt: &mut fmt::Formatter) -> fmt::Result {
        write!(fmt, "{} messages ({} octets)", self.count, self.size)
    }
}

/// Parse a `STAT` reply such as `+OK 2 320`.
///
/// A reply without `+OK` yields [`MailboxStat::FAILURE`]. Once the server
/// has said `+OK` the two numbers are expected to be well formed, so
/// anything else is an error.
pub fn parse_stat(line: &str) -> ParsingResult<MailboxStat> {
    if !is_ok(line) {
        log::debug!("STAT refused: {:?}", line.trim());
        return Ok(MailboxStat::FAILURE);
    }

    let mut fields = strip_status(line).unwrap_or("").split_whitespace();
    let count = parse_number(fields.next(), "count")?;
    let size = parse_number(fields.next(), "size")?;
    Ok(MailboxStat { count, size })
}

fn parse_number(field: Option<&str>, name: &'static str) -> ParsingResult<i64> {
    let value = field.unwrap_or("");
    value.parse().map_err(|_| ParsingError::MalformedNumber {
        field: name,
        value: value.to_string(),
    })
}

/// Turn a complete multi-line `RETR`/`TOP` reply into the message's lines.
///
/// The status line and the `.` terminator are dropped and dot-stuffed
/// lines are restored.
pub fn retr_lines(response: &str) -> ParsingResult<Vec<String>> {
    let mut lines = response.lines();
    let status = lines.next().unwrap_or("");
    if !is_ok(status) {
        return Err(match strip_status(status) {
            Some(reason) => ParsingError::new(format!("server refused: {}", reason)),
            None => ParsingError::MissingStatus(status.to_string()),
        });
    }

    let mut message = Vec::new();
    for line in lines {
        if line == "." {
            return Ok(message);
        }
        let line = if line.starts_with("..") { &line[1..] } else { line };
        message.push(line.to_string());
    }
    Err(ParsingError::Unterminated)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status() {
        assert!(is_ok("+OK 2 320"));
        assert!(is_ok("  +OK"));
        assert!(!is_ok("-ERR no such message"));
        assert_eq!(strip_status("+OK  ready "), Some("ready"));
        assert_eq!(strip_status("-ERR nope"), Some("nope"));
        assert_eq!(strip_status("hello"), None);
    }

    #[test]
    fn test_parse_stat() {
        struct StatTest<'s> {
            input: &'s str,
            output: ParsingResult<MailboxStat>,
        }

        let tests = vec![
            StatTest { input: "+OK 2 320", output: Ok(MailboxStat { count: 2, size: 320 }) },
            StatTest { input: "+OK 0 0\r\n", output: Ok(MailboxStat { count: 0, size: 0 }) },
            StatTest { input: "-ERR mailbox locked", output: Ok(MailboxStat::FAILURE) },
            StatTest { input: "2 320", output: Ok(MailboxStat::FAILURE) },
            StatTest {
                input: "+OK two 320",
                output: Err(ParsingError::MalformedNumber { field: "count", value: "two".to_string() }),
            },
            StatTest {
                input: "+OK 2",
                output: Err(ParsingError::MalformedNumber { field: "size", value: "".to_string() }),
            },
        ];

        for t in tests.into_iter() {
            assert_eq!(parse_stat(t.input), t.output, "{}", t.input);
        }
        assert!(MailboxStat::FAILURE.is_failure());
    }

    #[test]
    fn test_retr_lines() {
        let response = "+OK 120 octets\r\nSubject: hi\r\n\r\n..hidden dot\r\n.\r\n";
        assert_eq!(
            retr_lines(response),
            Ok(vec!["Subject: hi".to_string(), "".to_string(), ".hidden dot".to_string()])
        );

        assert_eq!(retr_lines("+OK\r\nSubject: hi\r\n"), Err(ParsingError::Unterminated));
        assert_eq!(
            retr_lines("Subject: hi\r\n.\r\n"),
            Err(ParsingError::MissingStatus("Subject: hi".to_string()))
        );
        assert_eq!(
            retr_lines("-ERR no such message\r\n"),
            Err(ParsingError::new("server refused: no such message"))
        );
    }
}
