//! json-shape: schema-driven JSON conversion with per-field diagnostics.
//!
//! This crate parses JSON text into typed Rust records, validating each
//! field against attached predicates without giving up on the whole
//! document when one field is bad, and prints records back as canonical
//! JSON.
//!
//! # Overview
//!
//! - **Total decoding**: only malformed JSON syntax fails outright; missing
//!   properties, wrong types and failed predicates are collected per
//!   property in a [`ModelState`] while every field gets a value
//! - **Shapes**: a property is a scalar, a nested record, an array or an
//!   optional, composed to any depth
//! - **Canonical output**: sorted keys, no whitespace, deterministic
//!
//! # Quick Start
//!
//! ```rust
//! use json_shape::{Model, SchemaBuilder, ErrorKind};
//!
//! #[derive(Debug, Default)]
//! struct Person {
//!     name: String,
//!     age: f64,
//!     email: Option<String>,
//! }
//!
//! impl Model for Person {
//!     fn describe(schema: SchemaBuilder<Self>) -> SchemaBuilder<Self> {
//!         schema
//!             .property("name", |p| &p.name, |p| &mut p.name)
//!             .property_with("age", |p| &p.age, |p| &mut p.age, |c| c.greater(0).less(100))
//!             .property_with("email", |p| &p.email, |p| &mut p.email, |c| c.matches(r"[^@]+@[^@]+"))
//!     }
//! }
//!
//! json_shape::register::<Person>().unwrap();
//!
//! let (person, state) = json_shape::from_json::<Person>(r#"{"age": 150}"#).unwrap();
//! assert_eq!(person.age, 150.0);
//! assert_eq!(state.get("name").unwrap()[0].kind, ErrorKind::MissingProperty);
//! assert_eq!(state.get("age").unwrap()[0].kind, ErrorKind::PredicateFailure);
//! assert!(!state.contains("email"));
//!
//! let text = json_shape::to_json(&Person { name: "Ada".into(), age: 36.0, email: None });
//! assert_eq!(text, r#"{"age":36,"name":"Ada"}"#);
//! ```
//!
//! # Modules
//!
//! - [`model`]: values, shapes, field bridges and decode diagnostics
//! - [`codec`]: parser, printer, decoder and encoder
//! - [`schema`]: schema builder and registry
//! - [`validate`]: predicates
//! - [`error`]: error types
//! - [`limits`]: parser limits
//!
//! # Security
//!
//! Input is untrusted by default: the parser caps nesting depth and input
//! size (see [`ParseOptions`]), so decoding never recurses deeper than the
//! configured limit.

pub mod codec;
pub mod error;
pub mod limits;
pub mod model;
pub mod schema;
pub mod validate;

// Re-export commonly used types at crate root
pub use codec::{parse, parse_with_options, print, print_pretty};
pub use error::{ParseError, ParseErrorKind, SchemaError};
pub use limits::ParseOptions;
pub use model::{
    ErrorKind, ErrorRecord, FieldValue, Map, Model, ModelState, ScalarKind, SchemaId, Shape,
    Value, ValueKind,
};
pub use schema::registry::{global, is_registered, register};
pub use schema::{PropertyBuilder, PropertyDescriptor, Registry, Schema, SchemaBuilder};
pub use validate::{Predicate, Scalar};

/// Crate version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Parses `text` and decodes it into `T` using the process-wide registry.
///
/// Returns the instance together with the per-property errors; malformed
/// JSON syntax is the only `Err`.
///
/// # Panics
///
/// Panics if `T`, or a type nested in it, was not registered with
/// [`register`].
pub fn from_json<T: Model>(text: &str) -> Result<(T, ModelState), ParseError> {
    global().from_json(text)
}

/// Like [`from_json`], with explicit parse limits.
pub fn from_json_with_options<T: Model>(
    text: &str,
    options: &ParseOptions,
) -> Result<(T, ModelState), ParseError> {
    global().from_json_with_options(text, options)
}

/// Encodes `instance` as canonical JSON using the process-wide registry.
///
/// # Panics
///
/// Panics if `T`, or a type nested in it, was not registered with
/// [`register`].
pub fn to_json<T: Model>(instance: &T) -> String {
    global().to_json(instance)
}

/// Encodes `instance` as indented JSON with sorted keys.
pub fn to_json_pretty<T: Model>(instance: &T) -> String {
    global().to_json_pretty(instance)
}
