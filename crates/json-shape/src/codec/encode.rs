//! Schema-driven conversion from typed instances to [`Value`].
//!
//! Encoding is total: every well-typed instance has a JSON form. Properties
//! are emitted in declaration order; the printer sorts keys.

use crate::model::{FieldRef, Map, Model, Shape, Value};
use crate::schema::{Registry, Schema};

/// Encodes `instance` as a JSON object.
pub fn encode_instance<T: Model>(schema: &Schema<T>, registry: &Registry, instance: &T) -> Value {
    let mut map = Map::with_capacity(schema.properties().len());
    for property in schema.properties() {
        match property.read(instance) {
            // An empty top-level optional is written as an absent key.
            FieldRef::Optional(None) => {}
            field => {
                let value = encode_field(registry, property.shape(), field);
                map.insert(property.name().to_string(), value);
            }
        }
    }
    Value::Object(map)
}

fn encode_field(registry: &Registry, shape: &Shape, field: FieldRef<'_>) -> Value {
    match (shape, field) {
        (_, FieldRef::String(s)) => Value::String(s.to_string()),
        (_, FieldRef::Number(n)) => Value::Number(n),
        (_, FieldRef::Bool(b)) => Value::Bool(b),
        (Shape::Array(element), FieldRef::Array(items)) => Value::Array(
            items
                .into_iter()
                .map(|item| encode_field(registry, element, item))
                .collect(),
        ),
        (Shape::Optional(_), FieldRef::Optional(None)) => Value::Null,
        (Shape::Optional(inner), FieldRef::Optional(Some(item))) => {
            encode_field(registry, inner, *item)
        }
        (Shape::Object(id), FieldRef::Object(instance)) => {
            registry.erased(*id).encode_any(registry, instance)
        }
        // Field types derive their shape, so the two always agree.
        _ => Value::Null,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codec::print;
    use crate::schema::SchemaBuilder;

    #[derive(Debug, Default, Clone, PartialEq)]
    struct Line {
        sku: String,
        qty: u32,
        gift: bool,
    }

    impl Model for Line {
        fn describe(schema: SchemaBuilder<Self>) -> SchemaBuilder<Self> {
            schema
                .property("sku", |l| &l.sku, |l| &mut l.sku)
                .property("qty", |l| &l.qty, |l| &mut l.qty)
                .property("gift", |l| &l.gift, |l| &mut l.gift)
        }
    }

    #[derive(Debug, Default, Clone, PartialEq)]
    struct Order {
        id: String,
        lines: Vec<Line>,
        coupon: Option<String>,
        discounts: Vec<Option<f64>>,
        shipping: Option<Line>,
    }

    impl Model for Order {
        fn describe(schema: SchemaBuilder<Self>) -> SchemaBuilder<Self> {
            schema
                .property("id", |o| &o.id, |o| &mut o.id)
                .property("lines", |o| &o.lines, |o| &mut o.lines)
                .property("coupon", |o| &o.coupon, |o| &mut o.coupon)
                .property("discounts", |o| &o.discounts, |o| &mut o.discounts)
                .property("shipping", |o| &o.shipping, |o| &mut o.shipping)
        }
    }

    fn registry() -> Registry {
        Registry::new().with::<Line>().unwrap().with::<Order>().unwrap()
    }

    #[test]
    fn test_encode_declaration_order() {
        let registry = registry();
        let line = Line {
            sku: "A".into(),
            qty: 2,
            gift: false,
        };
        let value = registry.encode(&line);
        let keys: Vec<_> = value.as_object().unwrap().keys().map(String::as_str).collect();
        assert_eq!(keys, ["sku", "qty", "gift"]);
        assert_eq!(print(&value), r#"{"gift":false,"qty":2,"sku":"A"}"#);
    }

    #[test]
    fn test_encode_nested_and_optional() {
        let registry = registry();
        let order = Order {
            id: "o-1".into(),
            lines: vec![Line {
                sku: "B".into(),
                qty: 1,
                gift: true,
            }],
            coupon: None,
            discounts: vec![Some(0.5), None],
            shipping: Some(Line::default()),
        };
        assert_eq!(
            registry.to_json(&order),
            concat!(
                r#"{"discounts":[0.5,null],"id":"o-1","#,
                r#""lines":[{"gift":true,"qty":1,"sku":"B"}],"#,
                r#""shipping":{"gift":false,"qty":0,"sku":""}}"#
            )
        );
    }

    #[test]
    fn test_encode_then_decode() {
        let registry = registry();
        let order = Order {
            id: "o-2".into(),
            lines: vec![Line::default(), Line {
                sku: "C".into(),
                qty: 7,
                gift: false,
            }],
            coupon: Some("SAVE".into()),
            discounts: vec![],
            shipping: None,
        };
        let (decoded, state) = registry.decode::<Order>(&registry.encode(&order));
        assert!(state.is_valid());
        assert_eq!(decoded, order);
    }
}
