//! Bridges between Rust field types and shapes.
//!
//! The decoder and encoder never see concrete field types. They walk a
//! [`Shape`] and exchange [`Field`] (owned, produced by decoding) and
//! [`FieldRef`] (borrowed, consumed by encoding) values, which
//! [`FieldValue`] converts to and from the real field.

use std::any::Any;

use crate::model::{SchemaId, Shape};
use crate::schema::SchemaBuilder;

/// A decoded field, shaped like the [`Shape`] it was decoded against.
pub enum Field {
    String(String),
    Number(f64),
    Bool(bool),
    /// A nested instance; its concrete type is the schema's type.
    Object(Box<dyn Any + Send>),
    Array(Vec<Field>),
    Optional(Option<Box<Field>>),
    /// The value could not be converted; the field takes its default.
    Default,
}

/// A borrowed view of a field, for encoding.
pub enum FieldRef<'a> {
    String(&'a str),
    Number(f64),
    Bool(bool),
    Object(&'a dyn Any),
    Array(Vec<FieldRef<'a>>),
    Optional(Option<Box<FieldRef<'a>>>),
}

/// A Rust type that can back a schema property.
///
/// Implemented for `String`, `bool`, the primitive numeric types, `Vec<F>`,
/// `Option<F>` and every [`Model`]. Numeric fields are stored as `f64` in
/// JSON and converted with `as` semantics (integers truncate and saturate).
pub trait FieldValue: Default + Send + Sync + 'static {
    /// The shape this type takes in JSON.
    fn shape() -> Shape;

    /// Builds the field from a decoded value. Mismatched or
    /// [`Field::Default`] input yields `Self::default()`.
    fn from_field(field: Field) -> Self;

    fn as_field(&self) -> FieldRef<'_>;
}

/// A record type with a declared schema.
///
/// `describe` is the schema declaration step: it lists the properties in
/// order, each with its accessor and predicates.
///
/// ```
/// use json_shape::{Model, SchemaBuilder};
///
/// #[derive(Debug, Default)]
/// struct Person {
///     name: String,
///     age: f64,
/// }
///
/// impl Model for Person {
///     fn describe(schema: SchemaBuilder<Self>) -> SchemaBuilder<Self> {
///         schema
///             .property("name", |p| &p.name, |p| &mut p.name)
///             .property_with("age", |p| &p.age, |p| &mut p.age, |c| c.greater(0).less(150))
///     }
/// }
/// ```
pub trait Model: Default + Send + Sync + 'static {
    fn describe(schema: SchemaBuilder<Self>) -> SchemaBuilder<Self>;
}

impl FieldValue for String {
    fn shape() -> Shape {
        Shape::string()
    }

    fn from_field(field: Field) -> Self {
        match field {
            Field::String(s) => s,
            _ => String::new(),
        }
    }

    fn as_field(&self) -> FieldRef<'_> {
        FieldRef::String(self)
    }
}

impl FieldValue for bool {
    fn shape() -> Shape {
        Shape::bool()
    }

    fn from_field(field: Field) -> Self {
        matches!(field, Field::Bool(true))
    }

    fn as_field(&self) -> FieldRef<'_> {
        FieldRef::Bool(*self)
    }
}

macro_rules! impl_number_field {
    ($($ty:ty),*) => {
        $(
            impl FieldValue for $ty {
                fn shape() -> Shape {
                    Shape::number()
                }

                fn from_field(field: Field) -> Self {
                    match field {
                        Field::Number(n) => n as $ty,
                        _ => <$ty>::default(),
                    }
                }

                fn as_field(&self) -> FieldRef<'_> {
                    FieldRef::Number(*self as f64)
                }
            }
        )*
    };
}

impl_number_field!(f64, i64, i32, u64, u32);

impl FieldValue for f32 {
    fn shape() -> Shape {
        Shape::number()
    }

    /// Finite values beyond `f32` saturate at `±f32::MAX` rather than
    /// becoming infinite, which would have no JSON form.
    fn from_field(field: Field) -> Self {
        match field {
            Field::Number(n) => n.clamp(-f32::MAX as f64, f32::MAX as f64) as f32,
            _ => 0.0,
        }
    }

    fn as_field(&self) -> FieldRef<'_> {
        FieldRef::Number(*self as f64)
    }
}

impl<F: FieldValue> FieldValue for Vec<F> {
    fn shape() -> Shape {
        Shape::array(F::shape())
    }

    fn from_field(field: Field) -> Self {
        match field {
            Field::Array(items) => items.into_iter().map(F::from_field).collect(),
            _ => Vec::new(),
        }
    }

    fn as_field(&self) -> FieldRef<'_> {
        FieldRef::Array(self.iter().map(F::as_field).collect())
    }
}

impl<F: FieldValue> FieldValue for Option<F> {
    fn shape() -> Shape {
        Shape::optional(F::shape())
    }

    fn from_field(field: Field) -> Self {
        match field {
            Field::Optional(Some(inner)) => Some(F::from_field(*inner)),
            _ => None,
        }
    }

    fn as_field(&self) -> FieldRef<'_> {
        FieldRef::Optional(self.as_ref().map(|v| Box::new(v.as_field())))
    }
}

impl<M: Model> FieldValue for M {
    fn shape() -> Shape {
        Shape::Object(SchemaId::of::<M>())
    }

    fn from_field(field: Field) -> Self {
        match field {
            Field::Object(instance) => instance.downcast::<M>().map(|b| *b).unwrap_or_default(),
            _ => M::default(),
        }
    }

    fn as_field(&self) -> FieldRef<'_> {
        FieldRef::Object(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Default, PartialEq)]
    struct Point {
        x: f64,
    }

    impl Model for Point {
        fn describe(schema: SchemaBuilder<Self>) -> SchemaBuilder<Self> {
            schema.property("x", |p| &p.x, |p| &mut p.x)
        }
    }

    #[test]
    fn test_shapes_compose() {
        assert_eq!(
            <Option<Vec<Point>>>::shape(),
            Shape::optional(Shape::array(Shape::Object(SchemaId::of::<Point>())))
        );
        assert_eq!(<Vec<String>>::shape(), Shape::array(Shape::string()));
        assert_eq!(u32::shape(), Shape::number());
    }

    #[test]
    fn test_default_field_yields_default() {
        assert_eq!(String::from_field(Field::Default), "");
        assert_eq!(i32::from_field(Field::Default), 0);
        assert_eq!(<Option<bool>>::from_field(Field::Default), None);
        assert_eq!(Point::from_field(Field::Default), Point::default());
    }

    #[test]
    fn test_number_conversion_truncates() {
        assert_eq!(i64::from_field(Field::Number(2.9)), 2);
        assert_eq!(u32::from_field(Field::Number(-4.0)), 0);
    }

    #[test]
    fn test_f32_saturates_instead_of_overflowing() {
        assert_eq!(f32::from_field(Field::Number(1e39)), f32::MAX);
        assert_eq!(f32::from_field(Field::Number(-1e39)), -f32::MAX);
        assert_eq!(f32::from_field(Field::Number(0.5)), 0.5);
        assert!(f32::from_field(Field::Number(f64::MAX)).is_finite());
    }

    #[test]
    fn test_object_downcast() {
        let field = Field::Object(Box::new(Point { x: 1.5 }));
        assert_eq!(Point::from_field(field), Point { x: 1.5 });

        let wrong = Field::Object(Box::new(String::from("nope")));
        assert_eq!(Point::from_field(wrong), Point::default());
    }

    #[test]
    fn test_vec_of_optional() {
        let field = Field::Array(vec![
            Field::Optional(Some(Box::new(Field::Bool(true)))),
            Field::Optional(None),
            Field::Default,
        ]);
        assert_eq!(<Vec<Option<bool>>>::from_field(field), vec![Some(true), None, None]);
    }
}
