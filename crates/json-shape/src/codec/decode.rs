//! Schema-driven conversion from [`Value`] to typed instances.
//!
//! Each property is converted independently by walking its [`Shape`]
//! against the JSON value. Problems are recorded as [`ErrorRecord`]s under
//! the top-level property name and the field falls back to its default, so
//! a decode always yields a fully built instance.

use std::sync::Arc;

use crate::model::{ErrorRecord, Field, Model, ModelState, ScalarKind, Shape, Value};
use crate::schema::{Registry, Schema};
use crate::validate::{Predicate, Scalar};

/// Decodes `root` into a fresh `T` using `schema`.
///
/// Nested `Object` shapes are resolved through `registry`.
pub fn decode_instance<T: Model>(
    schema: &Schema<T>,
    registry: &Registry,
    root: &Value,
) -> (T, ModelState) {
    let mut instance = T::default();
    let mut state = ModelState::new();
    // A non-object root makes every property absent.
    let members = root.as_object();

    for property in schema.properties() {
        let name = property.name();
        let value = members.and_then(|m| m.get(name));
        let mut errors = Vec::new();
        let field = decode_property(
            registry,
            name,
            property.shape(),
            property.predicates(),
            value,
            &mut errors,
        );
        property.write(&mut instance, field);
        for record in &errors {
            tracing::trace!(property = name, kind = %record.kind, "recorded decode error");
        }
        state.extend(name, errors);
    }

    (instance, state)
}

/// Converts one property and runs its predicates.
fn decode_property(
    registry: &Registry,
    name: &str,
    shape: &Shape,
    predicates: &[Arc<dyn Predicate>],
    value: Option<&Value>,
    errors: &mut Vec<ErrorRecord>,
) -> Field {
    let Some(value) = value else {
        if shape.is_optional() {
            return Field::Optional(None);
        }
        errors.push(ErrorRecord::missing(name));
        return Field::Default;
    };

    let mut checked = Vec::new();
    let Some(field) = decode_value(registry, shape, value, errors, &mut checked) else {
        return Field::Default;
    };

    for predicate in predicates {
        if checked.iter().any(|scalar| !predicate.evaluate(scalar)) {
            errors.push(ErrorRecord::predicate_failure(predicate.message()));
        }
    }
    field
}

/// Converts `value` against `shape`.
///
/// Returns `None` after recording a type mismatch. Successfully converted
/// scalars at this property's level (not inside nested objects, which check
/// their own predicates) are pushed to `checked`.
fn decode_value<'v>(
    registry: &Registry,
    shape: &Shape,
    value: &'v Value,
    errors: &mut Vec<ErrorRecord>,
    checked: &mut Vec<Scalar<'v>>,
) -> Option<Field> {
    let field = match (shape, value) {
        (Shape::Scalar(ScalarKind::String), Value::String(s)) => {
            checked.push(Scalar::String(s));
            Field::String(s.clone())
        }
        (Shape::Scalar(ScalarKind::Number), Value::Number(n)) => {
            checked.push(Scalar::Number(*n));
            Field::Number(*n)
        }
        (Shape::Scalar(ScalarKind::Bool), Value::Bool(b)) => {
            checked.push(Scalar::Bool(*b));
            Field::Bool(*b)
        }
        (Shape::Optional(_), Value::Null) => Field::Optional(None),
        (Shape::Optional(inner), value) => {
            let inner = decode_value(registry, inner, value, errors, checked)?;
            Field::Optional(Some(Box::new(inner)))
        }
        (Shape::Array(element), Value::Array(items)) => {
            let mut fields = Vec::with_capacity(items.len());
            for (index, item) in items.iter().enumerate() {
                let mark = errors.len();
                let field = decode_value(registry, element, item, errors, checked);
                for record in &mut errors[mark..] {
                    record.message = format!("element {index}: {}", record.message);
                }
                fields.push(field.unwrap_or(Field::Default));
            }
            Field::Array(fields)
        }
        (Shape::Object(id), Value::Object(_)) => {
            let (instance, nested) = registry.erased(*id).decode_any(registry, value);
            errors.extend(nested.into_records());
            Field::Object(instance)
        }
        (shape, value) => {
            errors.push(ErrorRecord::type_mismatch(shape, value.kind()));
            return None;
        }
    };
    Some(field)
}
