//! Builder API for schema declaration.
//!
//! Provides a fluent interface for listing a type's properties in order.
//!
//! # Example
//!
//! ```rust
//! use json_shape::schema::SchemaBuilder;
//!
//! #[derive(Default)]
//! struct Account {
//!     email: String,
//!     tags: Vec<String>,
//!     nickname: Option<String>,
//! }
//!
//! let schema = SchemaBuilder::<Account>::new()
//!     .property_with("email", |a| &a.email, |a| &mut a.email, |c| c.matches(r"[^@]+@[^@]+"))
//!     .property("tags", |a| &a.tags, |a| &mut a.tags)
//!     .property("nickname", |a| &a.nickname, |a| &mut a.nickname)
//!     .build()
//!     .unwrap();
//!
//! assert_eq!(schema.properties().len(), 3);
//! ```

use std::sync::Arc;

use rustc_hash::FxHashSet;

use crate::error::SchemaError;
use crate::model::{FieldValue, SchemaId};
use crate::schema::{FieldAccessor, PropertyDescriptor, Schema};
use crate::validate::{self, Bound, Predicate};

/// Builder for the ordered property list of `T`.
pub struct SchemaBuilder<T> {
    properties: Vec<PropertyDescriptor<T>>,
    error: Option<SchemaError>,
}

impl<T: 'static> Default for SchemaBuilder<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: 'static> SchemaBuilder<T> {
    /// Creates an empty builder.
    pub fn new() -> Self {
        Self {
            properties: Vec::new(),
            error: None,
        }
    }

    /// Adds a property with no predicates.
    ///
    /// `get` and `get_mut` select the backing field; its type decides the
    /// property's shape.
    pub fn property<F: FieldValue>(
        self,
        name: impl Into<String>,
        get: fn(&T) -> &F,
        get_mut: fn(&mut T) -> &mut F,
    ) -> Self {
        self.property_with(name, get, get_mut, |c| c)
    }

    /// Adds a property and attaches predicates using a builder function.
    pub fn property_with<F, C>(
        mut self,
        name: impl Into<String>,
        get: fn(&T) -> &F,
        get_mut: fn(&mut T) -> &mut F,
        checks: C,
    ) -> Self
    where
        F: FieldValue,
        C: FnOnce(PropertyBuilder) -> PropertyBuilder,
    {
        let name = name.into();
        let checks = checks(PropertyBuilder::new(&name));
        if self.error.is_none() {
            self.error = checks.error;
        }
        self.properties.push(PropertyDescriptor {
            name,
            shape: F::shape(),
            predicates: checks.predicates,
            accessor: Box::new(FieldAccessor::new(get, get_mut)),
        });
        self
    }

    /// Finishes the schema.
    ///
    /// Fails on an empty or repeated property name, on a pattern that did
    /// not compile, or on predicates attached to a property holding nested
    /// records.
    pub fn build(self) -> Result<Schema<T>, SchemaError> {
        if let Some(error) = self.error {
            return Err(error);
        }
        let id = SchemaId::of::<T>();
        let mut seen = FxHashSet::default();
        for property in &self.properties {
            if property.name.is_empty() {
                return Err(SchemaError::EmptyPropertyName { schema: id.name() });
            }
            if !seen.insert(property.name.as_str()) {
                return Err(SchemaError::DuplicateProperty {
                    schema: id.name(),
                    property: property.name.clone(),
                });
            }
            if !property.predicates.is_empty() && !property.shape.holds_scalars() {
                return Err(SchemaError::PredicateOnObject {
                    schema: id.name(),
                    property: property.name.clone(),
                });
            }
        }
        Ok(Schema {
            id,
            properties: self.properties,
        })
    }
}

/// Collects the predicates of one property.
pub struct PropertyBuilder {
    property: String,
    predicates: Vec<Arc<dyn Predicate>>,
    error: Option<SchemaError>,
}

impl PropertyBuilder {
    fn new(property: &str) -> Self {
        Self {
            property: property.to_string(),
            predicates: Vec::new(),
            error: None,
        }
    }

    /// Attaches any predicate.
    pub fn check(mut self, predicate: impl Predicate + 'static) -> Self {
        self.predicates.push(Arc::new(predicate));
        self
    }

    /// Attaches an already shared predicate.
    pub fn check_shared(mut self, predicate: Arc<dyn Predicate>) -> Self {
        self.predicates.push(predicate);
        self
    }

    pub fn greater(self, bound: impl Into<Bound>) -> Self {
        self.check(validate::greater(bound))
    }

    pub fn less(self, bound: impl Into<Bound>) -> Self {
        self.check(validate::less(bound))
    }

    pub fn greater_eq(self, bound: impl Into<Bound>) -> Self {
        self.check(validate::greater_eq(bound))
    }

    pub fn less_eq(self, bound: impl Into<Bound>) -> Self {
        self.check(validate::less_eq(bound))
    }

    pub fn range(self, low: impl Into<Bound>, high: impl Into<Bound>) -> Self {
        self.check(validate::range(low, high))
    }

    pub fn range_eq(self, low: impl Into<Bound>, high: impl Into<Bound>) -> Self {
        self.check(validate::range_eq(low, high))
    }

    /// Attaches a full-match regex. A pattern that fails to compile is
    /// reported by [`SchemaBuilder::build`].
    pub fn matches(mut self, pattern: &str) -> Self {
        match validate::regex(pattern) {
            Ok(predicate) => self.check(predicate),
            Err(e) => {
                if self.error.is_none() {
                    self.error = Some(SchemaError::InvalidPattern {
                        property: self.property.clone(),
                        reason: e.to_string(),
                    });
                }
                self
            }
        }
    }
}
