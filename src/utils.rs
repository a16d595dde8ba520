//! Small string helpers shared by the header and body parsers.

/// Returns the text strictly between the first `begin` at or after `from`
/// and the next `end` after it.
///
/// ```
/// use popmail::utils::between;
///
/// assert_eq!(between("<abc@host>", '<', '>', 0), Some("abc@host"));
/// assert_eq!(between("no brackets", '<', '>', 0), None);
/// ```
pub fn between(s: &str, begin: char, end: char, from: usize) -> Option<&str> {
    let rest = s.get(from..)?;
    let start = rest.find(begin)? + begin.len_utf8();
    let len = rest[start..].find(end)?;
    Some(&rest[start..start + len])
}

/// Case-insensitive (ASCII) prefix test.
#[inline]
pub fn starts_with_ignore_case(s: &str, prefix: &str) -> bool {
    s.len() >= prefix.len()
        && s.as_bytes()[..prefix.len()].eq_ignore_ascii_case(prefix.as_bytes())
}

/// Strips `prefix` from `s`, ignoring ASCII case.
pub fn strip_prefix_ignore_case<'s>(s: &'s str, prefix: &str) -> Option<&'s str> {
    if starts_with_ignore_case(s, prefix) {
        s.get(prefix.len()..)
    } else {
        None
    }
}

/// True for lines that separate headers from content.
#[inline]
pub fn is_blank(line: &str) -> bool {
    line.trim().is_empty()
}
