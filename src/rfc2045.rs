//! Module for dealing with RFC2045 style headers.
use super::rfc5322::Rfc5322Parser;

use std::collections::HashMap;

/// Parser over RFC 2045 style headers.
///
/// Things of the style `value; param1=foo; param2="bar"`
pub struct Rfc2045Parser<'s> {
    parser: Rfc5322Parser<'s>,
}

impl<'s> Rfc2045Parser<'s> {
    /// Create a new parser over `s`
    pub fn new(s: &str) -> Rfc2045Parser {
        Rfc2045Parser {
            parser: Rfc5322Parser::new(s),
        }
    }

    fn consume_token(&mut self) -> Option<String> {
        let token = self.parser.consume_while(|c| {
            match c {
                // Not any tspecials
                '(' | ')' | '<' | '>' | '@' | ',' | ';' | ':' | '\\' | '\"' | '/' | '[' | ']'
                | '?' | '=' => false,
                '!'..='~' => true,
                _ => false,
            }
        });

        if !token.is_empty() {
            Some(token)
        } else {
            None
        }
    }

    /// Consume up to all of the input into the value and a hashmap
    /// over parameters to values.
    ///
    /// Attribute names are lower-cased. Malformed parameters are skipped up
    /// to the next `;` rather than aborting the parse.
    pub fn consume_all(&mut self) -> (String, HashMap<String, String>) {
        let value = self.parser.consume_while(|c| c != ';').trim().to_string();

        let mut params = HashMap::new();
        while self.parser.consume_if(';') {
            // RFC ignorant mail systems may append a ';' without a parameter after.
            self.parser.consume_linear_whitespace();
            if self.parser.eof() {
                break;
            }

            let attribute = self.consume_token();
            self.parser.consume_linear_whitespace();
            if !self.parser.consume_if('=') {
                self.skip_parameter();
                continue;
            }
            self.parser.consume_linear_whitespace();
            // Value can be token or quoted-string. Unquoted values often carry
            // tspecials such as '=' in the wild, so they run to ';' or space.
            let value = if self.parser.peek() == Some('"') {
                self.parser.consume_quoted_string()
            } else {
                self.consume_bare_value()
            };

            if let (Some(attrib), Some(val)) = (attribute, value) {
                params.insert(attrib.to_ascii_lowercase(), val);
            }
            self.skip_parameter();
        }

        (value, params)
    }

    fn consume_bare_value(&mut self) -> Option<String> {
        let value = self.parser.consume_while(|c| c != ';' && !c.is_whitespace());
        if !value.is_empty() {
            Some(value)
        } else {
            None
        }
    }

    fn skip_parameter(&mut self) {
        self.parser.consume_while(|c| c != ';');
    }
}
