//! Predicates over decoded scalar values.
//!
//! A predicate is a pure check with a fixed failure message. Predicates are
//! attached to properties when a schema is declared and evaluated by the
//! decoder after structural conversion succeeds. The message never embeds
//! the failing value, so it can be computed once at construction.

use std::fmt;

use regex::Regex;

/// A decoded scalar, borrowed from the parsed input.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Scalar<'a> {
    String(&'a str),
    Number(f64),
    Bool(bool),
}

/// A validation check attachable to a property.
pub trait Predicate: Send + Sync {
    /// Returns true if `value` passes.
    fn evaluate(&self, value: &Scalar<'_>) -> bool;

    /// Returns the failure message. Must not depend on the evaluated value.
    fn message(&self) -> &str;
}

/// Comparison bound for the ordering predicates.
///
/// Numbers compare numerically and strings compare byte-wise. A bound only
/// accepts scalars of its own kind.
#[derive(Debug, Clone, PartialEq)]
pub enum Bound {
    Number(f64),
    String(String),
}

impl Bound {
    fn compare(&self, value: &Scalar<'_>) -> Option<std::cmp::Ordering> {
        match (value, self) {
            (Scalar::Number(v), Bound::Number(b)) => v.partial_cmp(b),
            (Scalar::String(v), Bound::String(b)) => Some(v.as_bytes().cmp(b.as_bytes())),
            _ => None,
        }
    }
}

impl fmt::Display for Bound {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Bound::Number(n) => write!(f, "{n}"),
            Bound::String(s) => write!(f, "{s:?}"),
        }
    }
}

macro_rules! impl_bound_from_number {
    ($($ty:ty),*) => {
        $(
            impl From<$ty> for Bound {
                fn from(n: $ty) -> Self {
                    Bound::Number(n as f64)
                }
            }
        )*
    };
}

impl_bound_from_number!(f64, f32, i64, i32, u64, u32);

impl From<&str> for Bound {
    fn from(s: &str) -> Self {
        Bound::String(s.to_string())
    }
}

impl From<String> for Bound {
    fn from(s: String) -> Self {
        Bound::String(s)
    }
}

// =============================================================================
// ORDERING PREDICATES
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Comparison {
    Greater,
    Less,
    GreaterEq,
    LessEq,
}

/// Compares the value against a single bound.
#[derive(Debug, Clone)]
pub struct Compare {
    op: Comparison,
    bound: Bound,
    message: String,
}

impl Compare {
    fn new(op: Comparison, bound: Bound) -> Self {
        let relation = match op {
            Comparison::Greater => "greater than",
            Comparison::Less => "less than",
            Comparison::GreaterEq => "greater than or equal to",
            Comparison::LessEq => "less than or equal to",
        };
        let message = format!("value must be {relation} {bound}");
        Self { op, bound, message }
    }
}

impl Predicate for Compare {
    fn evaluate(&self, value: &Scalar<'_>) -> bool {
        use std::cmp::Ordering::*;
        match (self.op, self.bound.compare(value)) {
            (Comparison::Greater, Some(Greater)) => true,
            (Comparison::Less, Some(Less)) => true,
            (Comparison::GreaterEq, Some(Greater | Equal)) => true,
            (Comparison::LessEq, Some(Less | Equal)) => true,
            _ => false,
        }
    }

    fn message(&self) -> &str {
        &self.message
    }
}

/// Value must be strictly greater than `bound`.
pub fn greater(bound: impl Into<Bound>) -> Compare {
    Compare::new(Comparison::Greater, bound.into())
}

/// Value must be strictly less than `bound`.
pub fn less(bound: impl Into<Bound>) -> Compare {
    Compare::new(Comparison::Less, bound.into())
}

/// Value must be greater than or equal to `bound`.
pub fn greater_eq(bound: impl Into<Bound>) -> Compare {
    Compare::new(Comparison::GreaterEq, bound.into())
}

/// Value must be less than or equal to `bound`.
pub fn less_eq(bound: impl Into<Bound>) -> Compare {
    Compare::new(Comparison::LessEq, bound.into())
}

/// Checks the value against a lower and an upper bound.
#[derive(Debug, Clone)]
pub struct Range {
    low: Compare,
    high: Compare,
    message: String,
}

impl Predicate for Range {
    fn evaluate(&self, value: &Scalar<'_>) -> bool {
        self.low.evaluate(value) && self.high.evaluate(value)
    }

    fn message(&self) -> &str {
        &self.message
    }
}

/// Value must lie strictly between `low` and `high`.
pub fn range(low: impl Into<Bound>, high: impl Into<Bound>) -> Range {
    let (low, high) = (low.into(), high.into());
    Range {
        message: format!("value must be in range ({low}, {high})"),
        low: Compare::new(Comparison::Greater, low),
        high: Compare::new(Comparison::Less, high),
    }
}

/// Value must lie between `low` and `high`, inclusive.
pub fn range_eq(low: impl Into<Bound>, high: impl Into<Bound>) -> Range {
    let (low, high) = (low.into(), high.into());
    Range {
        message: format!("value must be in range [{low}, {high}]"),
        low: Compare::new(Comparison::GreaterEq, low),
        high: Compare::new(Comparison::LessEq, high),
    }
}

// =============================================================================
// PATTERN PREDICATE
// =============================================================================

/// String must match a regular expression in full.
#[derive(Debug, Clone)]
pub struct Matches {
    regex: Regex,
    message: String,
}

impl Predicate for Matches {
    fn evaluate(&self, value: &Scalar<'_>) -> bool {
        match value {
            Scalar::String(s) => self.regex.is_match(s),
            _ => false,
        }
    }

    fn message(&self) -> &str {
        &self.message
    }
}

/// Value must be a string matching `pattern` from start to end.
pub fn regex(pattern: &str) -> Result<Matches, regex::Error> {
    let regex = Regex::new(&format!("^(?:{pattern})$"))?;
    Ok(Matches {
        regex,
        message: format!("value must match pattern {pattern:?}"),
    })
}

// =============================================================================
// CUSTOM PREDICATES
// =============================================================================

/// A predicate built from a closure and a fixed message.
pub struct Custom<F> {
    check: F,
    message: String,
}

impl<F> Predicate for Custom<F>
where
    F: Fn(&Scalar<'_>) -> bool + Send + Sync,
{
    fn evaluate(&self, value: &Scalar<'_>) -> bool {
        (self.check)(value)
    }

    fn message(&self) -> &str {
        &self.message
    }
}

/// Wraps `check` as a predicate failing with `message`.
pub fn custom<F>(message: impl Into<String>, check: F) -> Custom<F>
where
    F: Fn(&Scalar<'_>) -> bool + Send + Sync,
{
    Custom {
        check,
        message: message.into(),
    }
}
