//! JSON text to [`Value`].
//!
//! A recursive-descent parser over the input bytes. Depth and size limits
//! from [`ParseOptions`] are enforced here so that nothing downstream has
//! to guard against adversarial nesting.

use crate::error::{ParseError, ParseErrorKind};
use crate::limits::ParseOptions;
use crate::model::{Map, Value};

/// Parses JSON text with default limits.
pub fn parse(input: &str) -> Result<Value, ParseError> {
    parse_with_options(input, &ParseOptions::default())
}

/// Parses JSON text with the given limits.
pub fn parse_with_options(input: &str, options: &ParseOptions) -> Result<Value, ParseError> {
    let result = Parser::new(input, options).parse_document();
    if let Err(e) = &result {
        tracing::debug!(position = e.position, kind = %e.kind, "rejected malformed JSON");
    }
    result
}

/// Cursor over the input with the current nesting depth.
struct Parser<'a> {
    input: &'a str,
    bytes: &'a [u8],
    pos: usize,
    depth: usize,
    options: &'a ParseOptions,
}

impl<'a> Parser<'a> {
    fn new(input: &'a str, options: &'a ParseOptions) -> Self {
        Self {
            input,
            bytes: input.as_bytes(),
            pos: 0,
            depth: 0,
            options,
        }
    }

    fn error(&self, kind: ParseErrorKind) -> ParseError {
        ParseError::new(kind, self.input, self.pos)
    }

    fn error_at(&self, kind: ParseErrorKind, position: usize) -> ParseError {
        ParseError::new(kind, self.input, position)
    }

    fn parse_document(&mut self) -> Result<Value, ParseError> {
        if self.input.len() > self.options.max_input_len {
            return Err(self.error(ParseErrorKind::InputTooLarge {
                len: self.input.len(),
                max: self.options.max_input_len,
            }));
        }
        let value = self.parse_value()?;
        self.skip_whitespace();
        if self.pos < self.bytes.len() {
            return Err(self.error(ParseErrorKind::TrailingCharacters));
        }
        Ok(value)
    }

    // =========================================================================
    // Cursor helpers
    // =========================================================================

    fn skip_whitespace(&mut self) {
        while let Some(b' ' | b'\t' | b'\n' | b'\r') = self.bytes.get(self.pos) {
            self.pos += 1;
        }
    }

    fn peek(&self) -> Option<u8> {
        self.bytes.get(self.pos).copied()
    }

    /// Returns the character at the cursor, for error reporting.
    fn current_char(&self) -> char {
        self.input[self.pos..].chars().next().unwrap_or('\0')
    }

    fn unexpected(&self, expected: &'static str) -> ParseError {
        if self.pos >= self.bytes.len() {
            self.error(ParseErrorKind::UnexpectedEof { context: expected })
        } else {
            self.error(ParseErrorKind::UnexpectedCharacter {
                found: self.current_char(),
                expected,
            })
        }
    }

    fn expect_byte(&mut self, byte: u8, expected: &'static str) -> Result<(), ParseError> {
        self.skip_whitespace();
        if self.peek() == Some(byte) {
            self.pos += 1;
            Ok(())
        } else {
            Err(self.unexpected(expected))
        }
    }

    fn expect_literal(&mut self, literal: &'static str, value: Value) -> Result<Value, ParseError> {
        let rest = &self.input[self.pos..];
        if rest.starts_with(literal) {
            self.pos += literal.len();
            Ok(value)
        } else if literal.starts_with(rest) {
            Err(self.error_at(ParseErrorKind::UnexpectedEof { context: literal }, self.bytes.len()))
        } else {
            Err(self.unexpected(literal))
        }
    }

    fn enter(&mut self) -> Result<(), ParseError> {
        self.depth += 1;
        if self.depth > self.options.max_depth {
            return Err(self.error(ParseErrorKind::DepthLimitExceeded {
                max: self.options.max_depth,
            }));
        }
        Ok(())
    }

    fn leave(&mut self) {
        self.depth -= 1;
    }

    // =========================================================================
    // Grammar
    // =========================================================================

    fn parse_value(&mut self) -> Result<Value, ParseError> {
        self.skip_whitespace();
        match self.peek() {
            Some(b'{') => self.parse_object(),
            Some(b'[') => self.parse_array(),
            Some(b'"') => self.parse_string().map(Value::String),
            Some(b't') => self.expect_literal("true", Value::Bool(true)),
            Some(b'f') => self.expect_literal("false", Value::Bool(false)),
            Some(b'n') => self.expect_literal("null", Value::Null),
            Some(b'-' | b'0'..=b'9') => self.parse_number().map(Value::Number),
            _ => Err(self.unexpected("value")),
        }
    }

    fn parse_object(&mut self) -> Result<Value, ParseError> {
        self.enter()?;
        self.pos += 1;
        let mut map = Map::new();

        self.skip_whitespace();
        if self.peek() == Some(b'}') {
            self.pos += 1;
            self.leave();
            return Ok(Value::Object(map));
        }

        loop {
            self.skip_whitespace();
            if self.peek() != Some(b'"') {
                return Err(self.unexpected("object key"));
            }
            let key_pos = self.pos;
            let key = self.parse_string()?;
            self.expect_byte(b':', "':'")?;
            let value = self.parse_value()?;

            if self.options.reject_duplicate_keys && map.contains_key(&key) {
                return Err(self.error_at(ParseErrorKind::DuplicateKey(key), key_pos));
            }
            map.insert(key, value);

            self.skip_whitespace();
            match self.peek() {
                Some(b',') => self.pos += 1,
                Some(b'}') => {
                    self.pos += 1;
                    break;
                }
                _ => return Err(self.unexpected("',' or '}'")),
            }
        }

        self.leave();
        Ok(Value::Object(map))
    }

    fn parse_array(&mut self) -> Result<Value, ParseError> {
        self.enter()?;
        self.pos += 1;
        let mut items = Vec::new();

        self.skip_whitespace();
        if self.peek() == Some(b']') {
            self.pos += 1;
            self.leave();
            return Ok(Value::Array(items));
        }

        loop {
            items.push(self.parse_value()?);
            self.skip_whitespace();
            match self.peek() {
                Some(b',') => self.pos += 1,
                Some(b']') => {
                    self.pos += 1;
                    break;
                }
                _ => return Err(self.unexpected("',' or ']'")),
            }
        }

        self.leave();
        Ok(Value::Array(items))
    }

    /// Parses a string literal; the cursor is on the opening quote.
    fn parse_string(&mut self) -> Result<String, ParseError> {
        self.pos += 1;
        let mut out = String::new();
        loop {
            // Copy the unescaped run in one go.
            let start = self.pos;
            while let Some(&b) = self.bytes.get(self.pos) {
                if b == b'"' || b == b'\\' || b < 0x20 {
                    break;
                }
                self.pos += 1;
            }
            out.push_str(&self.input[start..self.pos]);

            match self.peek() {
                None => {
                    return Err(self.error(ParseErrorKind::UnexpectedEof { context: "string" }));
                }
                Some(b'"') => {
                    self.pos += 1;
                    return Ok(out);
                }
                Some(b'\\') => {
                    self.pos += 1;
                    self.parse_escape(&mut out)?;
                }
                Some(_) => return Err(self.error(ParseErrorKind::ControlCharacterInString)),
            }
        }
    }

    /// Parses one escape sequence; the cursor is just past the backslash.
    fn parse_escape(&mut self, out: &mut String) -> Result<(), ParseError> {
        let Some(b) = self.peek() else {
            return Err(self.error(ParseErrorKind::UnexpectedEof { context: "escape" }));
        };
        match b {
            b'"' => out.push('"'),
            b'\\' => out.push('\\'),
            b'/' => out.push('/'),
            b'b' => out.push('\u{08}'),
            b'f' => out.push('\u{0C}'),
            b'n' => out.push('\n'),
            b'r' => out.push('\r'),
            b't' => out.push('\t'),
            b'u' => {
                let escape_pos = self.pos - 1;
                self.pos += 1;
                let ch = self.parse_unicode_escape(escape_pos)?;
                out.push(ch);
                return Ok(());
            }
            _ => return Err(self.error(ParseErrorKind::InvalidEscape(self.current_char()))),
        }
        self.pos += 1;
        Ok(())
    }

    /// Parses the hex digits of `\uXXXX`, joining surrogate pairs.
    fn parse_unicode_escape(&mut self, escape_pos: usize) -> Result<char, ParseError> {
        let high = self.read_hex4()?;
        let code = match high {
            0xD800..=0xDBFF => {
                if !self.input[self.pos..].starts_with("\\u") {
                    return Err(self.error_at(ParseErrorKind::InvalidUnicodeEscape, escape_pos));
                }
                self.pos += 2;
                let low = self.read_hex4()?;
                if !(0xDC00..=0xDFFF).contains(&low) {
                    return Err(self.error_at(ParseErrorKind::InvalidUnicodeEscape, escape_pos));
                }
                0x10000 + ((high - 0xD800) << 10) + (low - 0xDC00)
            }
            0xDC00..=0xDFFF => {
                return Err(self.error_at(ParseErrorKind::InvalidUnicodeEscape, escape_pos));
            }
            _ => high,
        };
        char::from_u32(code).ok_or_else(|| self.error_at(ParseErrorKind::InvalidUnicodeEscape, escape_pos))
    }

    fn read_hex4(&mut self) -> Result<u32, ParseError> {
        let mut code = 0u32;
        for _ in 0..4 {
            let digit = match self.peek() {
                Some(b) => (b as char).to_digit(16),
                None => {
                    return Err(self.error(ParseErrorKind::UnexpectedEof {
                        context: "unicode escape",
                    }));
                }
            };
            match digit {
                Some(d) => code = code * 16 + d,
                None => return Err(self.error(ParseErrorKind::InvalidUnicodeEscape)),
            }
            self.pos += 1;
        }
        Ok(code)
    }

    /// Parses a number per the JSON grammar:
    /// `-? (0 | [1-9][0-9]*) (. [0-9]+)? ([eE] [+-]? [0-9]+)?`
    fn parse_number(&mut self) -> Result<f64, ParseError> {
        let start = self.pos;
        if self.peek() == Some(b'-') {
            self.pos += 1;
        }

        match self.peek() {
            Some(b'0') => {
                self.pos += 1;
                if let Some(b'0'..=b'9') = self.peek() {
                    return Err(self.error_at(ParseErrorKind::InvalidNumber, start));
                }
            }
            Some(b'1'..=b'9') => self.skip_digits(),
            _ => return Err(self.error_at(ParseErrorKind::InvalidNumber, start)),
        }

        if self.peek() == Some(b'.') {
            self.pos += 1;
            if !self.at_digit() {
                return Err(self.error_at(ParseErrorKind::InvalidNumber, start));
            }
            self.skip_digits();
        }

        if let Some(b'e' | b'E') = self.peek() {
            self.pos += 1;
            if let Some(b'+' | b'-') = self.peek() {
                self.pos += 1;
            }
            if !self.at_digit() {
                return Err(self.error_at(ParseErrorKind::InvalidNumber, start));
            }
            self.skip_digits();
        }

        let literal = &self.input[start..self.pos];
        let value: f64 = literal
            .parse()
            .map_err(|_| self.error_at(ParseErrorKind::InvalidNumber, start))?;
        if !value.is_finite() {
            return Err(self.error_at(ParseErrorKind::NumberOutOfRange, start));
        }
        Ok(value)
    }

    fn at_digit(&self) -> bool {
        matches!(self.peek(), Some(b'0'..=b'9'))
    }

    fn skip_digits(&mut self) {
        while self.at_digit() {
            self.pos += 1;
        }
    }
}
