//! Shape descriptors: how a property's JSON form maps to a typed field.

use std::any::TypeId;
use std::fmt;
use std::hash::{Hash, Hasher};

use crate::model::ValueKind;

/// Scalar kinds a property can hold.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ScalarKind {
    String,
    Number,
    Bool,
}

impl ScalarKind {
    /// Returns the JSON value kind this scalar is read from.
    pub fn value_kind(self) -> ValueKind {
        match self {
            ScalarKind::String => ValueKind::String,
            ScalarKind::Number => ValueKind::Number,
            ScalarKind::Bool => ValueKind::Bool,
        }
    }
}

/// Identity of a registered schema.
///
/// Two ids are equal when they name the same Rust type; the type name is
/// carried along for diagnostics only.
#[derive(Debug, Clone, Copy)]
pub struct SchemaId {
    type_id: TypeId,
    name: &'static str,
}

impl SchemaId {
    /// Returns the id for type `T`.
    pub fn of<T: 'static>() -> Self {
        Self {
            type_id: TypeId::of::<T>(),
            name: std::any::type_name::<T>(),
        }
    }

    pub fn type_id(&self) -> TypeId {
        self.type_id
    }

    /// Returns the Rust type name.
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Returns the type name without its module path or generic arguments.
    ///
    /// This is the form used in decode diagnostics, which can reach callers
    /// that should not see crate internals.
    pub fn short_name(&self) -> &'static str {
        let base = self.name.split('<').next().unwrap_or(self.name);
        base.rsplit("::").next().unwrap_or(base)
    }
}

impl PartialEq for SchemaId {
    fn eq(&self, other: &Self) -> bool {
        self.type_id == other.type_id
    }
}

impl Eq for SchemaId {}

impl Hash for SchemaId {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.type_id.hash(state);
    }
}

/// Describes the JSON form of a property.
///
/// Shapes compose: `Optional(Array(Object(id)))` is an optional list of
/// nested records.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Shape {
    Scalar(ScalarKind),
    Object(SchemaId),
    Array(Box<Shape>),
    Optional(Box<Shape>),
}

impl Shape {
    pub fn string() -> Shape {
        Shape::Scalar(ScalarKind::String)
    }

    pub fn number() -> Shape {
        Shape::Scalar(ScalarKind::Number)
    }

    pub fn bool() -> Shape {
        Shape::Scalar(ScalarKind::Bool)
    }

    pub fn array(element: Shape) -> Shape {
        Shape::Array(Box::new(element))
    }

    pub fn optional(inner: Shape) -> Shape {
        Shape::Optional(Box::new(inner))
    }

    /// Returns true if absence of the property is not an error.
    pub fn is_optional(&self) -> bool {
        matches!(self, Shape::Optional(_))
    }

    /// Returns the JSON kind a present value must have to match this shape.
    ///
    /// Optional shapes report their inner kind; `null` is handled separately.
    pub fn expected_kind(&self) -> ValueKind {
        match self {
            Shape::Scalar(kind) => kind.value_kind(),
            Shape::Object(_) => ValueKind::Object,
            Shape::Array(_) => ValueKind::Array,
            Shape::Optional(inner) => inner.expected_kind(),
        }
    }

    /// Returns true if values of this shape reach predicates.
    ///
    /// Predicates see the scalars at a property's own level, through any
    /// arrays and optionals. Nested records check their own properties.
    pub fn holds_scalars(&self) -> bool {
        match self {
            Shape::Scalar(_) => true,
            Shape::Object(_) => false,
            Shape::Array(inner) | Shape::Optional(inner) => inner.holds_scalars(),
        }
    }

    /// Calls `f` for every schema referenced anywhere inside this shape.
    pub fn visit_schemas(&self, f: &mut impl FnMut(SchemaId)) {
        match self {
            Shape::Scalar(_) => {}
            Shape::Object(id) => f(*id),
            Shape::Array(inner) | Shape::Optional(inner) => inner.visit_schemas(f),
        }
    }
}

impl fmt::Display for Shape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Shape::Scalar(kind) => write!(f, "{}", kind.value_kind()),
            Shape::Object(id) => write!(f, "object {}", id.short_name()),
            Shape::Array(inner) => write!(f, "array of {inner}"),
            Shape::Optional(inner) => write!(f, "optional {inner}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Address;

    #[test]
    fn test_display_nested() {
        let shape = Shape::optional(Shape::array(Shape::string()));
        assert_eq!(shape.to_string(), "optional array of string");
    }

    #[test]
    fn test_expected_kind_unwraps_optional() {
        let shape = Shape::optional(Shape::Object(SchemaId::of::<Address>()));
        assert_eq!(shape.expected_kind(), ValueKind::Object);
        assert!(shape.is_optional());
        assert!(!Shape::number().is_optional());
    }

    #[test]
    fn test_holds_scalars() {
        let object = Shape::Object(SchemaId::of::<Address>());
        assert!(Shape::optional(Shape::array(Shape::number())).holds_scalars());
        assert!(!object.holds_scalars());
        assert!(!Shape::array(Shape::optional(object)).holds_scalars());
    }

    #[test]
    fn test_visit_schemas() {
        let id = SchemaId::of::<Address>();
        let shape = Shape::optional(Shape::array(Shape::Object(id)));
        let mut seen = Vec::new();
        shape.visit_schemas(&mut |s| seen.push(s));
        assert_eq!(seen, vec![id]);
    }

    #[test]
    fn test_display_object_uses_short_name() {
        let id = SchemaId::of::<Address>();
        assert!(id.name().contains("::"));
        assert_eq!(id.short_name(), "Address");
        assert_eq!(Shape::array(Shape::Object(id)).to_string(), "array of object Address");
        assert_eq!(SchemaId::of::<Vec<Address>>().short_name(), "Vec");
    }

    #[test]
    fn test_schema_id_identity() {
        assert_eq!(SchemaId::of::<Address>(), SchemaId::of::<Address>());
        assert_ne!(SchemaId::of::<Address>(), SchemaId::of::<String>());
    }
}
