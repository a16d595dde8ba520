//! Knobs for the message parser.
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use super::finisher::DEFAULT_SUBJECT;

/// Settings shared by every parse. `ParserConfig::default()` gives the
/// behaviour of [`Message::parse`](crate::Message::parse).
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize), serde(default))]
pub struct ParserConfig {
    /// Subject stored when a message has none.
    pub default_subject: String,
    /// Line prefix (matched ignoring case) that marks HTML content.
    pub html_marker: String,
    /// How many lines past a blank `From:` the sender parser may read.
    pub sender_lookahead: usize,
}

impl Default for ParserConfig {
    fn default() -> ParserConfig {
        ParserConfig {
            default_subject: DEFAULT_SUBJECT.to_string(),
            html_marker: "Content-Type: text/html".to_string(),
            sender_lookahead: 1,
        }
    }
}
