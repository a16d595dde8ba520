//! Module with helpers for dealing with RFC 5322

trait Rfc5322Character {
    /// Is considered a special character by RFC 5322 Section 3.2.3
    fn is_special(&self) -> bool;
    /// Is considered to be a VCHAR by RFC 5234 Appendix B.1
    fn is_vchar(&self) -> bool;

    fn is_atext(&self) -> bool {
        self.is_vchar() && !self.is_special()
    }
}

impl Rfc5322Character for char {
    fn is_special(&self) -> bool {
        matches!(
            *self,
            '(' | ')' | '<' | '>' | '[' | ']' | ':' | ';' | '@' | '\\' | ',' | '.' | '"' | ' '
        )
    }

    fn is_vchar(&self) -> bool {
        matches!(*self, '!'..='~')
    }
}

/// RFC 5322 base parser for parsing `atom`, `dot-atom` and `quoted-string`.
///
/// Every `consume_*` call stops quietly at the end of input instead of
/// failing, so callers can feed it arbitrary header text.
///
/// It also implements a stack for tracking the position.
/// This allows the simple implementation of backtracking, by pushing the position
/// before a test and popping it if the test should fail.
pub struct Rfc5322Parser<'s> {
    s: &'s str,
    pos: usize,
    pos_stack: Vec<usize>,
}

impl<'s> Rfc5322Parser<'s> {
    /// Make a new parser, initialized with the given string.
    pub fn new(source: &'s str) -> Rfc5322Parser<'s> {
        Rfc5322Parser {
            s: source,
            pos: 0,
            pos_stack: Vec::new(),
        }
    }

    /// Push the current position onto the stack.
    pub fn push_position(&mut self) {
        self.pos_stack.push(self.pos);
    }

    /// Move the position back to the last entry pushed.
    ///
    /// Popping an empty stack rewinds to the start of the input.
    pub fn pop_position(&mut self) {
        self.pos = self.pos_stack.pop().unwrap_or(0);
    }

    /// Forget the last pushed position without moving.
    pub fn drop_position(&mut self) {
        self.pos_stack.pop();
    }

    /// Consume a word from the input.
    ///
    /// A word is defined as:
    ///
    /// `word = atom / quoted-string`
    pub fn consume_word(&mut self) -> Option<String> {
        match self.peek() {
            Some('"') => self.consume_quoted_string(),
            Some(c) if c.is_atext() => self.consume_atom(),
            _ => None,
        }
    }

    /// Consume a quoted string from the input
    pub fn consume_quoted_string(&mut self) -> Option<String> {
        if self.peek() != Some('"') {
            return None;
        }

        let mut quoted_string = String::new();
        let mut inside_escape = false;
        let mut terminated = false;
        // Consume the leading "
        self.consume_char();
        while !terminated {
            match self.consume_char() {
                Some('\\') if !inside_escape => inside_escape = true,
                Some('"') if !inside_escape => terminated = true,
                Some(c) => {
                    quoted_string.push(c);
                    inside_escape = false;
                }
                None => break,
            }
        }

        if inside_escape || !terminated {
            None
        } else {
            Some(quoted_string)
        }
    }

    /// Consume an atom from the input.
    pub fn consume_atom(&mut self) -> Option<String> {
        match self.peek() {
            Some(c) if c.is_atext() => Some(self.consume_while(|c| c.is_atext())),
            _ => None,
        }
    }

    /// Consume LWSP (Linear whitespace)
    pub fn consume_linear_whitespace(&mut self) {
        self.consume_while(|c| c == '\t' || c == ' ');
    }

    /// Consume a single character from the input.
    #[inline]
    pub fn consume_char(&mut self) -> Option<char> {
        let c = self.peek()?;
        self.pos += c.len_utf8();
        Some(c)
    }

    /// Consume the next character only if it is `c`.
    pub fn consume_if(&mut self, c: char) -> bool {
        if self.peek() == Some(c) {
            self.pos += c.len_utf8();
            true
        } else {
            false
        }
    }

    /// Consume a set of characters, each passed to `test` until this function
    /// returns false.
    ///
    /// The position after calling this function will be pointing to the character
    /// which caused a false result from `test`.
    ///
    /// Returns the string of characters that returned true for the test function.
    #[inline]
    pub fn consume_while<F: Fn(char) -> bool>(&mut self, test: F) -> String {
        let start_pos = self.pos;
        while let Some(c) = self.peek() {
            if !test(c) {
                break;
            }
            self.pos += c.len_utf8();
        }
        self.s[start_pos..self.pos].to_string()
    }

    /// Peek at the current character.
    #[inline]
    pub fn peek(&self) -> Option<char> {
        self.s[self.pos..].chars().next()
    }

    /// Returns true if we have reached the end of the input.
    #[inline]
    pub fn eof(&self) -> bool {
        self.pos >= self.s.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct WordTestCase<'s> {
        input: &'s str,
        output: Option<&'s str>,
        next: Option<char>,
        name: &'s str,
    }

    #[test]
    fn test_consume_word() {
        let tests = [
            WordTestCase {
                input: "\"test phrase\" rest",
                output: Some("test phrase"),
                next: Some(' '),
                name: "Simple quoted-string",
            },
            WordTestCase {
                input: "\"test \\\"phrase\\\"\"",
                output: Some("test \"phrase\""),
                next: None,
                name: "quoted-string with escape character",
            },
            WordTestCase {
                input: "\"unterminated",
                output: None,
                next: None,
                name: "Unterminated quoted-string",
            },
            WordTestCase {
                input: "atom.dot test",
                output: Some("atom"),
                next: Some('.'),
                name: "Atom stops at dot",
            },
            WordTestCase {
                input: "<angle>",
                output: None,
                next: Some('<'),
                name: "Special character is not a word",
            },
            WordTestCase {
                input: "",
                output: None,
                next: None,
                name: "Empty input",
            },
        ];

        for t in tests.iter() {
            let mut p = Rfc5322Parser::new(t.input);
            assert_eq!(p.consume_word().as_deref(), t.output, "{}", t.name);
            assert_eq!(p.peek(), t.next, "{}", t.name);
        }
    }

    #[test]
    fn test_backtracking() {
        let mut p = Rfc5322Parser::new("Mon, 20 Jun");
        p.push_position();
        assert_eq!(p.consume_word(), Some("Mon".to_string()));
        p.pop_position();
        assert_eq!(p.peek(), Some('M'));

        // Popping with nothing pushed goes back to the start.
        p.consume_atom();
        assert_eq!(p.peek(), Some(','));
        p.pop_position();
        assert_eq!(p.consume_atom(), Some("Mon".to_string()));
    }

    #[test]
    fn test_consume_past_end() {
        let mut p = Rfc5322Parser::new("é");
        assert_eq!(p.consume_char(), Some('é'));
        assert_eq!(p.consume_char(), None);
        assert!(p.eof());
        assert!(!p.consume_if(' '));
    }
}
