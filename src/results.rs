use thiserror::Error;

/// Failures surfaced by the protocol helpers and the internal sub-parsers.
///
/// Message parsing itself never returns these: malformed mail degrades to
/// sentinel values instead.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParsingError {
    /// The line does not start with a `+OK` or `-ERR` status marker.
    #[error("missing status marker in {0:?}")]
    MissingStatus(String),
    /// A numeric field after `+OK` was not a well-formed integer.
    #[error("malformed {field}: {value:?}")]
    MalformedNumber { field: &'static str, value: String },
    /// A multi-line response ended before its `.` terminator.
    #[error("multi-line response is not terminated")]
    Unterminated,
    #[error("{0}")]
    Invalid(String),
}

impl ParsingError {
    pub fn new(desc: impl Into<String>) -> Self {
        ParsingError::Invalid(desc.into())
    }
}

pub type ParsingResult<T> = Result<T, ParsingError>;
