//! Data model types.
//!
//! - JSON values ([`Value`])
//! - Shapes describing a property's JSON form ([`Shape`])
//! - Field bridges between Rust types and shapes ([`FieldValue`], [`Model`])
//! - Decode diagnostics ([`ModelState`])

pub mod field;
pub mod shape;
pub mod state;
pub mod value;

pub use field::{Field, FieldRef, FieldValue, Model};
pub use shape::{ScalarKind, SchemaId, Shape};
pub use state::{ErrorKind, ErrorRecord, ModelState};
pub use value::{Map, Value, ValueKind};
