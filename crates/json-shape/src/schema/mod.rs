//! Schemas: the ordered property descriptors of one record type.
//!
//! A [`Schema`] is built once per type through [`SchemaBuilder`], stored in
//! a [`Registry`], and read concurrently by every decode and encode of that
//! type afterwards. Nothing in a schema is mutable after construction.

pub mod builder;
pub mod registry;

use std::any::Any;
use std::fmt;
use std::marker::PhantomData;
use std::sync::Arc;

use crate::codec::{decode, encode};
use crate::model::{Field, FieldRef, FieldValue, Model, ModelState, SchemaId, Shape, Value};
use crate::validate::Predicate;

pub use builder::{PropertyBuilder, SchemaBuilder};
pub use registry::Registry;

/// Reads and writes one field of `T`.
pub(crate) trait Accessor<T>: Send + Sync {
    fn read<'a>(&self, instance: &'a T) -> FieldRef<'a>;
    fn write(&self, instance: &mut T, field: Field);
}

pub(crate) struct FieldAccessor<T, F> {
    get: fn(&T) -> &F,
    get_mut: fn(&mut T) -> &mut F,
    _marker: PhantomData<fn() -> F>,
}

impl<T, F> FieldAccessor<T, F> {
    pub(crate) fn new(get: fn(&T) -> &F, get_mut: fn(&mut T) -> &mut F) -> Self {
        Self {
            get,
            get_mut,
            _marker: PhantomData,
        }
    }
}

impl<T, F: FieldValue> Accessor<T> for FieldAccessor<T, F> {
    fn read<'a>(&self, instance: &'a T) -> FieldRef<'a> {
        (self.get)(instance).as_field()
    }

    fn write(&self, instance: &mut T, field: Field) {
        *(self.get_mut)(instance) = F::from_field(field);
    }
}

/// One declared property: name, shape, predicates and field accessor.
pub struct PropertyDescriptor<T> {
    name: String,
    shape: Shape,
    predicates: Vec<Arc<dyn Predicate>>,
    accessor: Box<dyn Accessor<T>>,
}

impl<T> PropertyDescriptor<T> {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn shape(&self) -> &Shape {
        &self.shape
    }

    pub fn predicates(&self) -> &[Arc<dyn Predicate>] {
        &self.predicates
    }

    pub(crate) fn read<'a>(&self, instance: &'a T) -> FieldRef<'a> {
        self.accessor.read(instance)
    }

    pub(crate) fn write(&self, instance: &mut T, field: Field) {
        self.accessor.write(instance, field)
    }
}

impl<T> fmt::Debug for PropertyDescriptor<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PropertyDescriptor")
            .field("name", &self.name)
            .field("shape", &self.shape)
            .field("predicates", &self.predicates.len())
            .finish()
    }
}

/// The ordered property list of type `T`.
pub struct Schema<T> {
    id: SchemaId,
    properties: Vec<PropertyDescriptor<T>>,
}

impl<T: 'static> Schema<T> {
    pub fn id(&self) -> SchemaId {
        self.id
    }

    /// Returns the Rust type name this schema describes.
    pub fn name(&self) -> &'static str {
        self.id.name()
    }

    pub fn properties(&self) -> &[PropertyDescriptor<T>] {
        &self.properties
    }

    pub fn property(&self, name: &str) -> Option<&PropertyDescriptor<T>> {
        self.properties.iter().find(|p| p.name == name)
    }
}

impl<T> fmt::Debug for Schema<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Schema")
            .field("name", &self.id.name())
            .field("properties", &self.properties)
            .finish()
    }
}

/// Type-erased schema, as stored in a [`Registry`].
///
/// Nested `Object` shapes only carry a [`SchemaId`], so the traversal
/// reaches nested schemas through this trait.
pub(crate) trait ErasedSchema: Send + Sync {
    fn id(&self) -> SchemaId;

    fn as_any(&self) -> &dyn Any;

    /// Decodes a fresh instance from `value`.
    fn decode_any(&self, registry: &Registry, value: &Value) -> (Box<dyn Any + Send>, ModelState);

    /// Encodes `instance`, which must be of this schema's type.
    fn encode_any(&self, registry: &Registry, instance: &dyn Any) -> Value;
}

impl<T: Model> ErasedSchema for Schema<T> {
    fn id(&self) -> SchemaId {
        self.id
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn decode_any(&self, registry: &Registry, value: &Value) -> (Box<dyn Any + Send>, ModelState) {
        let (instance, state) = decode::decode_instance(self, registry, value);
        (Box::new(instance), state)
    }

    fn encode_any(&self, registry: &Registry, instance: &dyn Any) -> Value {
        match instance.downcast_ref::<T>() {
            Some(instance) => encode::encode_instance(self, registry, instance),
            None => Value::Null,
        }
    }
}
