//! Clean-up applied to subject and date values before they are stored.

/// Subject used when a message has none.
pub const DEFAULT_SUBJECT: &str = "(No Subject)";

/// Trims `s`, substituting `default` when nothing is left.
pub fn finish_subject(s: &str, default: &str) -> String {
    let trimmed = s.trim();
    if trimmed.is_empty() {
        default.to_string()
    } else {
        trimmed.to_string()
    }
}

/// Removes trailing commentary such as `(PDT)` or `(GMT+00:00)` and any
/// stray punctuation after the last digit or letter of a date string.
pub fn strip_date_trailers(s: &str) -> String {
    let mut date = s.trim();

    while date.ends_with(')') {
        match date.rfind('(') {
            Some(open) => date = date[..open].trim_end(),
            None => break,
        }
    }

    date.trim_end_matches(|c: char| !c.is_alphanumeric()).to_string()
}
