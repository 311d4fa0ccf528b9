//! Conversion between JSON text, [`Value`](crate::Value) trees and typed
//! instances.
//!
//! - [`parse`] / [`print`]: text and values
//! - [`decode`] / [`encode`]: values and instances, driven by a schema

pub mod decode;
pub mod encode;
pub mod parse;
pub mod print;

pub use decode::decode_instance;
pub use encode::encode_instance;
pub use parse::{parse, parse_with_options};
pub use print::{print, print_pretty};
