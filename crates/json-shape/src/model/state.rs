//! Per-decode error aggregation.

use std::fmt;

use indexmap::IndexMap;
use thiserror::Error;

use crate::model::{Map, Value};

/// Category of a soft decoding error.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// A required property was absent (or the input root was not an object).
    MissingProperty,
    /// A present value had the wrong JSON kind for the property's shape.
    TypeMismatch,
    /// A converted value failed an attached predicate.
    PredicateFailure,
}

impl ErrorKind {
    /// Returns a stable snake_case identifier.
    pub fn as_str(self) -> &'static str {
        match self {
            ErrorKind::MissingProperty => "missing_property",
            ErrorKind::TypeMismatch => "type_mismatch",
            ErrorKind::PredicateFailure => "predicate_failure",
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One soft error recorded against a property.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct ErrorRecord {
    pub kind: ErrorKind,
    pub message: String,
}

impl ErrorRecord {
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }

    pub fn missing(property: &str) -> Self {
        Self::new(
            ErrorKind::MissingProperty,
            format!("missing required property {property:?}"),
        )
    }

    pub fn type_mismatch(expected: impl fmt::Display, found: impl fmt::Display) -> Self {
        Self::new(
            ErrorKind::TypeMismatch,
            format!("expected {expected}, found {found}"),
        )
    }

    pub fn predicate_failure(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::PredicateFailure, message)
    }
}

/// Errors collected by one decode call, keyed by top-level property name.
///
/// A property with no entry had no errors. Properties appear in the order
/// they first recorded an error, which for a single decode is declaration
/// order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ModelState {
    errors: IndexMap<String, Vec<ErrorRecord>>,
}

impl ModelState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns true if no errors were recorded.
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    /// Returns the number of properties with at least one error.
    pub fn len(&self) -> usize {
        self.errors.len()
    }

    /// Returns the total number of error records across all properties.
    pub fn error_count(&self) -> usize {
        self.errors.values().map(Vec::len).sum()
    }

    /// Returns the errors recorded for `property`.
    pub fn get(&self, property: &str) -> Option<&[ErrorRecord]> {
        self.errors.get(property).map(Vec::as_slice)
    }

    pub fn contains(&self, property: &str) -> bool {
        self.errors.contains_key(property)
    }

    /// Returns the names of properties that have errors.
    pub fn properties(&self) -> impl Iterator<Item = &str> {
        self.errors.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &[ErrorRecord])> {
        self.errors.iter().map(|(k, v)| (k.as_str(), v.as_slice()))
    }

    /// Appends an error under `property`.
    pub fn add(&mut self, property: &str, record: ErrorRecord) {
        match self.errors.get_mut(property) {
            Some(records) => records.push(record),
            None => {
                self.errors.insert(property.to_string(), vec![record]);
            }
        }
    }

    /// Appends several errors under `property`; nothing is inserted when
    /// `records` is empty.
    pub fn extend(&mut self, property: &str, records: impl IntoIterator<Item = ErrorRecord>) {
        for record in records {
            self.add(property, record);
        }
    }

    /// Consumes the state, yielding every record in order without its key.
    pub fn into_records(self) -> impl Iterator<Item = ErrorRecord> {
        self.errors.into_values().flatten()
    }

    /// Exports the errors as a JSON object.
    ///
    /// ```json
    /// {"age": [{"kind": "predicate_failure", "message": "..."}]}
    /// ```
    pub fn to_value(&self) -> Value {
        let mut map = Map::with_capacity(self.errors.len());
        for (property, records) in &self.errors {
            let records = records
                .iter()
                .map(|r| {
                    Value::object([
                        ("kind", Value::from(r.kind.as_str())),
                        ("message", Value::from(r.message.as_str())),
                    ])
                })
                .collect();
            map.insert(property.clone(), Value::Array(records));
        }
        Value::Object(map)
    }
}

impl fmt::Display for ModelState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for (property, records) in &self.errors {
            for record in records {
                if !first {
                    writeln!(f)?;
                }
                first = false;
                write!(f, "{property}: {} ({})", record.message, record.kind)?;
            }
        }
        Ok(())
    }
}

impl<'a> IntoIterator for &'a ModelState {
    type Item = (&'a String, &'a Vec<ErrorRecord>);
    type IntoIter = indexmap::map::Iter<'a, String, Vec<ErrorRecord>>;

    fn into_iter(self) -> Self::IntoIter {
        self.errors.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_state_is_valid() {
        let state = ModelState::new();
        assert!(state.is_valid());
        assert_eq!(state.error_count(), 0);
        assert_eq!(state.get("name"), None);
    }

    #[test]
    fn test_extend_with_nothing_adds_no_entry() {
        let mut state = ModelState::new();
        state.extend("name", Vec::new());
        assert!(state.is_valid());
        assert!(!state.contains("name"));
    }

    #[test]
    fn test_records_accumulate_per_property() {
        let mut state = ModelState::new();
        state.add("age", ErrorRecord::predicate_failure("too small"));
        state.add("name", ErrorRecord::missing("name"));
        state.add("age", ErrorRecord::predicate_failure("too odd"));

        assert_eq!(state.len(), 2);
        assert_eq!(state.error_count(), 3);
        let age = state.get("age").unwrap();
        assert_eq!(age[0].message, "too small");
        assert_eq!(age[1].message, "too odd");
        assert_eq!(state.properties().collect::<Vec<_>>(), ["age", "name"]);
    }

    #[test]
    fn test_record_messages() {
        assert_eq!(
            ErrorRecord::missing("name").message,
            "missing required property \"name\""
        );
        assert_eq!(
            ErrorRecord::type_mismatch("number", "string").message,
            "expected number, found string"
        );
    }

    #[test]
    fn test_to_value() {
        let mut state = ModelState::new();
        state.add("name", ErrorRecord::missing("name"));
        let value = state.to_value();
        let records = value.get("name").and_then(Value::as_array).unwrap();
        assert_eq!(records[0].get("kind"), Some(&Value::from("missing_property")));
    }

    #[test]
    fn test_display() {
        let mut state = ModelState::new();
        state.add("age", ErrorRecord::type_mismatch("number", "string"));
        assert_eq!(
            state.to_string(),
            "age: expected number, found string (type_mismatch)"
        );
    }
}
