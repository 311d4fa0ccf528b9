//! [`Value`] to JSON text.
//!
//! Output is canonical: object keys sorted byte-wise, no whitespace between
//! tokens, and the same text for equal values. The pretty form uses the same
//! key order with two-space indentation.

use std::fmt::Write as _;

use crate::model::{Map, Value};

/// Prints `value` as canonical JSON.
pub fn print(value: &Value) -> String {
    let mut printer = Printer::new(None);
    printer.write_value(value);
    printer.into_string()
}

/// Prints `value` with two-space indentation and sorted keys.
pub fn print_pretty(value: &Value) -> String {
    let mut printer = Printer::new(Some(2));
    printer.write_value(value);
    printer.into_string()
}

struct Printer {
    out: String,
    indent: Option<usize>,
    level: usize,
}

impl Printer {
    fn new(indent: Option<usize>) -> Self {
        Self {
            out: String::new(),
            indent,
            level: 0,
        }
    }

    fn into_string(self) -> String {
        self.out
    }

    fn newline(&mut self) {
        if let Some(width) = self.indent {
            self.out.push('\n');
            for _ in 0..width * self.level {
                self.out.push(' ');
            }
        }
    }

    fn write_value(&mut self, value: &Value) {
        match value {
            Value::Null => self.out.push_str("null"),
            Value::Bool(true) => self.out.push_str("true"),
            Value::Bool(false) => self.out.push_str("false"),
            Value::Number(n) => self.write_number(*n),
            Value::String(s) => self.write_string(s),
            Value::Array(items) => self.write_array(items),
            Value::Object(map) => self.write_object(map),
        }
    }

    /// Finite numbers use Rust's shortest round-trip form, which never uses
    /// an exponent and drops a zero fraction. NaN and infinities have no
    /// JSON form and print as `null`.
    fn write_number(&mut self, n: f64) {
        if n.is_finite() {
            let _ = write!(self.out, "{n}");
        } else {
            self.out.push_str("null");
        }
    }

    fn write_string(&mut self, s: &str) {
        self.out.push('"');
        let mut start = 0;
        for (i, b) in s.bytes().enumerate() {
            let escape = match b {
                b'"' => "\\\"",
                b'\\' => "\\\\",
                b'\n' => "\\n",
                b'\r' => "\\r",
                b'\t' => "\\t",
                0x08 => "\\b",
                0x0C => "\\f",
                0x00..=0x1F => "",
                _ => continue,
            };
            self.out.push_str(&s[start..i]);
            if escape.is_empty() {
                let _ = write!(self.out, "\\u{b:04x}");
            } else {
                self.out.push_str(escape);
            }
            start = i + 1;
        }
        self.out.push_str(&s[start..]);
        self.out.push('"');
    }

    fn write_array(&mut self, items: &[Value]) {
        self.out.push('[');
        if !items.is_empty() {
            self.level += 1;
            for (i, item) in items.iter().enumerate() {
                if i > 0 {
                    self.out.push(',');
                }
                self.newline();
                self.write_value(item);
            }
            self.level -= 1;
            self.newline();
        }
        self.out.push(']');
    }

    fn write_object(&mut self, map: &Map) {
        let mut entries: Vec<_> = map.iter().collect();
        entries.sort_unstable_by(|a, b| a.0.as_bytes().cmp(b.0.as_bytes()));

        self.out.push('{');
        if !entries.is_empty() {
            self.level += 1;
            for (i, (key, value)) in entries.into_iter().enumerate() {
                if i > 0 {
                    self.out.push(',');
                }
                self.newline();
                self.write_string(key);
                self.out.push(':');
                if self.indent.is_some() {
                    self.out.push(' ');
                }
                self.write_value(value);
            }
            self.level -= 1;
            self.newline();
        }
        self.out.push('}');
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codec::parse;
    use proptest::prelude::*;

    #[test]
    fn test_scalars() {
        assert_eq!(print(&Value::Null), "null");
        assert_eq!(print(&Value::Bool(true)), "true");
        assert_eq!(print(&Value::Number(150.0)), "150");
        assert_eq!(print(&Value::Number(-0.5)), "-0.5");
        assert_eq!(print(&Value::Number(1e21)), "1000000000000000000000");
        assert_eq!(print(&Value::Number(f64::NAN)), "null");
        assert_eq!(print(&Value::Number(f64::INFINITY)), "null");
    }

    #[test]
    fn test_string_escapes() {
        let s = Value::from("a\"b\\c\nd\u{01}é");
        assert_eq!(print(&s), r#""a\"b\\c\nd\u0001é""#);
        assert_eq!(print(&Value::from("\u{08}\u{0C}\t\r")), r#""\b\f\t\r""#);
        assert_eq!(print(&Value::from("/")), r#""/""#);
    }

    #[test]
    fn test_keys_sorted_without_whitespace() {
        let v = Value::object([
            ("zeta", Value::from(1)),
            ("Alpha", Value::from(2)),
            ("alpha", Value::Array(vec![Value::from(true), Value::Null])),
        ]);
        assert_eq!(print(&v), r#"{"Alpha":2,"alpha":[true,null],"zeta":1}"#);
    }

    #[test]
    fn test_nested_objects_sorted() {
        let v = parse(r#"{"b": {"y": 1, "x": 2}, "a": []}"#).unwrap();
        assert_eq!(print(&v), r#"{"a":[],"b":{"x":2,"y":1}}"#);
    }

    #[test]
    fn test_pretty() {
        let v = parse(r#"{"b":[1,2],"a":{}}"#).unwrap();
        assert_eq!(print_pretty(&v), "{\n  \"a\": {},\n  \"b\": [\n    1,\n    2\n  ]\n}");
    }

    #[test]
    fn test_display_is_canonical() {
        let v = parse(r#"{ "b" : 1 , "a" : 2 }"#).unwrap();
        assert_eq!(v.to_string(), r#"{"a":2,"b":1}"#);
    }

    fn arb_value() -> impl Strategy<Value = Value> {
        let leaf = prop_oneof![
            Just(Value::Null),
            any::<bool>().prop_map(Value::Bool),
            (-1e12f64..1e12f64).prop_map(Value::Number),
            ".{0,12}".prop_map(Value::String),
        ];
        leaf.prop_recursive(4, 48, 6, |inner| {
            prop_oneof![
                prop::collection::vec(inner.clone(), 0..6).prop_map(Value::Array),
                prop::collection::vec(("[a-z]{0,4}", inner), 0..6).prop_map(Value::object),
            ]
        })
    }

    proptest! {
        #[test]
        fn prop_print_parses_back(value in arb_value()) {
            let text = print(&value);
            prop_assert_eq!(parse(&text).unwrap(), value.clone());
            let pretty = print_pretty(&value);
            prop_assert_eq!(parse(&pretty).unwrap(), value);
        }

        #[test]
        fn prop_print_is_canonical(value in arb_value()) {
            let text = print(&value);
            let reparsed = parse(&text).unwrap();
            prop_assert_eq!(print(&reparsed), text);
        }
    }
}
