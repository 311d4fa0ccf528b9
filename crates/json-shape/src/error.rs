//! Error types for JSON parsing and schema declaration.
//!
//! Only two things can fail outright: parsing malformed JSON text and
//! declaring/registering a schema. Per-field problems found while decoding
//! are not errors in the `Result` sense; they are recorded in a
//! [`ModelState`](crate::model::ModelState).

use thiserror::Error;

/// Error categories for malformed JSON input.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseErrorKind {
    #[error("unexpected end of input while reading {context}")]
    UnexpectedEof { context: &'static str },

    #[error("unexpected character {found:?}, expected {expected}")]
    UnexpectedCharacter { found: char, expected: &'static str },

    #[error("trailing characters after JSON value")]
    TrailingCharacters,

    #[error("invalid number literal")]
    InvalidNumber,

    #[error("number out of range for a double-precision float")]
    NumberOutOfRange,

    #[error("invalid escape sequence \\{0}")]
    InvalidEscape(char),

    #[error("invalid unicode escape")]
    InvalidUnicodeEscape,

    #[error("unescaped control character in string")]
    ControlCharacterInString,

    #[error("duplicate object key {0:?}")]
    DuplicateKey(String),

    #[error("nesting depth exceeds maximum {max}")]
    DepthLimitExceeded { max: usize },

    #[error("input length {len} exceeds maximum {max}")]
    InputTooLarge { len: usize, max: usize },
}

/// Malformed JSON text.
///
/// `position` is the byte offset of the offending input; `line` and
/// `column` are 1-based and count characters, not bytes.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{kind} at line {line}, column {column}")]
pub struct ParseError {
    pub kind: ParseErrorKind,
    pub position: usize,
    pub line: usize,
    pub column: usize,
}

impl ParseError {
    /// Creates a parse error, deriving line and column from `input`.
    pub fn new(kind: ParseErrorKind, input: &str, position: usize) -> Self {
        let position = position.min(input.len());
        let mut line = 1;
        let mut column = 1;
        for ch in input[..floor_char_boundary(input, position)].chars() {
            if ch == '\n' {
                line += 1;
                column = 1;
            } else {
                column += 1;
            }
        }
        Self {
            kind,
            position,
            line,
            column,
        }
    }
}

fn floor_char_boundary(input: &str, mut index: usize) -> usize {
    while index > 0 && !input.is_char_boundary(index) {
        index -= 1;
    }
    index
}

/// Error while declaring or registering a schema.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SchemaError {
    #[error("schema {schema} declares property {property:?} more than once")]
    DuplicateProperty {
        schema: &'static str,
        property: String,
    },

    #[error("schema {schema} declares a property with an empty name")]
    EmptyPropertyName { schema: &'static str },

    #[error("invalid pattern for property {property:?}: {reason}")]
    InvalidPattern { property: String, reason: String },

    #[error("property {property:?} of {schema} holds records and can not take predicates")]
    PredicateOnObject {
        schema: &'static str,
        property: String,
    },

    #[error("schema for {schema} is already registered")]
    AlreadyRegistered { schema: &'static str },

    #[error("property {property:?} of {schema} refers to unregistered type {referenced}")]
    UnknownSchema {
        schema: &'static str,
        property: String,
        referenced: &'static str,
    },
}
