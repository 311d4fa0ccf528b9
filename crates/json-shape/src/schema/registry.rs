//! Schema registry keyed by type identity.
//!
//! Every type that is decoded or encoded, and every type reachable from it
//! through an `Object` shape, must be registered first. Looking up a type
//! that was never registered is a programming error and panics; it can not
//! be triggered by input data.

use std::any::TypeId;
use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard};

use lazy_static::lazy_static;
use rustc_hash::FxHashMap;

use crate::codec::{decode, encode, parse_with_options, print, print_pretty};
use crate::error::{ParseError, SchemaError};
use crate::limits::ParseOptions;
use crate::model::{Model, ModelState, SchemaId, Value};
use crate::schema::{ErasedSchema, Schema, SchemaBuilder};

/// A set of registered schemas.
#[derive(Default)]
pub struct Registry {
    schemas: FxHashMap<TypeId, Arc<dyn ErasedSchema>>,
}

impl std::fmt::Debug for Registry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut names: Vec<_> = self.schemas.values().map(|s| s.id().name()).collect();
        names.sort_unstable();
        f.debug_struct("Registry").field("schemas", &names).finish()
    }
}

impl Registry {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Declares and stores the schema of `T`.
    ///
    /// Types referenced through nested `Object` shapes must already be
    /// registered, unless they are `T` itself.
    pub fn register<T: Model>(&mut self) -> Result<&mut Self, SchemaError> {
        let schema = T::describe(SchemaBuilder::new()).build()?;
        self.insert(schema)?;
        Ok(self)
    }

    /// Consuming form of [`register`](Self::register), for chaining.
    pub fn with<T: Model>(mut self) -> Result<Self, SchemaError> {
        self.register::<T>()?;
        Ok(self)
    }

    /// Stores an already built schema.
    pub fn insert<T: Model>(&mut self, schema: Schema<T>) -> Result<(), SchemaError> {
        let id = schema.id();
        if self.schemas.contains_key(&id.type_id()) {
            return Err(SchemaError::AlreadyRegistered { schema: id.name() });
        }
        for property in schema.properties() {
            let mut missing = None;
            property.shape().visit_schemas(&mut |referenced| {
                if missing.is_none()
                    && referenced != id
                    && !self.schemas.contains_key(&referenced.type_id())
                {
                    missing = Some(referenced);
                }
            });
            if let Some(referenced) = missing {
                return Err(SchemaError::UnknownSchema {
                    schema: id.name(),
                    property: property.name().to_string(),
                    referenced: referenced.name(),
                });
            }
        }
        tracing::debug!(
            schema = id.name(),
            properties = schema.properties().len(),
            "registered schema"
        );
        self.schemas.insert(id.type_id(), Arc::new(schema));
        Ok(())
    }

    pub fn contains<T: 'static>(&self) -> bool {
        self.schemas.contains_key(&TypeId::of::<T>())
    }

    pub fn len(&self) -> usize {
        self.schemas.len()
    }

    pub fn is_empty(&self) -> bool {
        self.schemas.is_empty()
    }

    /// Returns the schema of `T`, if registered.
    pub fn get<T: Model>(&self) -> Option<&Schema<T>> {
        self.schemas
            .get(&TypeId::of::<T>())
            .and_then(|s| s.as_any().downcast_ref::<Schema<T>>())
    }

    /// Returns the schema of `T`.
    ///
    /// # Panics
    ///
    /// Panics if `T` was never registered.
    pub fn schema<T: Model>(&self) -> &Schema<T> {
        match self.get::<T>() {
            Some(schema) => schema,
            None => unregistered(SchemaId::of::<T>()),
        }
    }

    /// Returns the erased schema for a nested `Object` shape.
    pub(crate) fn erased(&self, id: SchemaId) -> &dyn ErasedSchema {
        match self.schemas.get(&id.type_id()) {
            Some(schema) => schema.as_ref(),
            None => unregistered(id),
        }
    }

    // =========================================================================
    // Conversion
    // =========================================================================

    /// Decodes a parsed value into `T`, collecting per-field errors.
    ///
    /// # Panics
    ///
    /// Panics if `T` or a type nested in it was never registered.
    pub fn decode<T: Model>(&self, value: &Value) -> (T, ModelState) {
        let schema = self.schema::<T>();
        let (instance, state) = decode::decode_instance(schema, self, value);
        tracing::debug!(
            schema = schema.name(),
            errors = state.error_count(),
            "decoded instance"
        );
        (instance, state)
    }

    /// Encodes `instance` into a JSON value.
    ///
    /// # Panics
    ///
    /// Panics if `T` or a type nested in it was never registered.
    pub fn encode<T: Model>(&self, instance: &T) -> Value {
        encode::encode_instance(self.schema::<T>(), self, instance)
    }

    /// Parses `text` and decodes it into `T`.
    ///
    /// Malformed JSON is the only failure; every field-level problem is
    /// recorded in the returned [`ModelState`].
    pub fn from_json<T: Model>(&self, text: &str) -> Result<(T, ModelState), ParseError> {
        self.from_json_with_options(text, &ParseOptions::default())
    }

    /// Like [`from_json`](Self::from_json), with explicit parse limits.
    pub fn from_json_with_options<T: Model>(
        &self,
        text: &str,
        options: &ParseOptions,
    ) -> Result<(T, ModelState), ParseError> {
        let value = parse_with_options(text, options)?;
        Ok(self.decode(&value))
    }

    /// Encodes `instance` as canonical JSON text.
    pub fn to_json<T: Model>(&self, instance: &T) -> String {
        print(&self.encode(instance))
    }

    /// Encodes `instance` as indented JSON text with sorted keys.
    pub fn to_json_pretty<T: Model>(&self, instance: &T) -> String {
        print_pretty(&self.encode(instance))
    }
}

fn unregistered(id: SchemaId) -> ! {
    panic!(
        "no schema registered for {}; register it before decoding or encoding",
        id.name()
    )
}

// =============================================================================
// PROCESS-WIDE REGISTRY
// =============================================================================

lazy_static! {
    static ref GLOBAL: RwLock<Registry> = RwLock::new(Registry::new());
}

/// Registers `T` in the process-wide registry.
pub fn register<T: Model>() -> Result<(), SchemaError> {
    let mut registry = GLOBAL.write().unwrap_or_else(PoisonError::into_inner);
    registry.register::<T>()?;
    Ok(())
}

/// Returns true if `T` is registered in the process-wide registry.
pub fn is_registered<T: 'static>() -> bool {
    global().contains::<T>()
}

/// Read access to the process-wide registry.
///
/// The guard blocks registration while held; conversions only need it for
/// the duration of one call.
pub fn global() -> RwLockReadGuard<'static, Registry> {
    GLOBAL.read().unwrap_or_else(PoisonError::into_inner)
}
