//! Thread-safe type whitelist.
//!
//! A [`TypeRegistry`] collects the destination types an application is
//! willing to decode into and exports them as an
//! [`OptionOverride::AllowedTypes`] whitelist. Clones share the same
//! underlying table.

use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::RwLock;
use tracing::debug;

use crate::options::OptionOverride;
use crate::shape::{Shape, Shaped};

/// Shared registry of allowed destination types.
#[derive(Debug, Clone, Default)]
pub struct TypeRegistry {
    inner: Arc<RwLock<HashMap<&'static str, Shape>>>,
}

impl TypeRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register the type of `sample`.
    ///
    /// One level of indirection is stripped, so registering a `&User` or a
    /// `Box<User>` registers `User`. Registering twice is a no-op.
    pub fn register<T: Shaped + ?Sized>(&self, _sample: &T) -> &Self {
        self.register_shape(T::shape())
    }

    /// Register `T` without a sample value.
    pub fn register_type<T: Shaped + ?Sized>(&self) -> &Self {
        self.register_shape(T::shape())
    }

    /// Register a shape directly, normalized the same way as [`register`](Self::register).
    pub fn register_shape(&self, shape: Shape) -> &Self {
        let shape = shape.pointee();
        let inserted = self.inner.write().insert(shape.name(), shape).is_none();
        if inserted {
            debug!(type_name = shape.name(), "registered allowed type");
        }
        self
    }

    /// Register several shapes under a single write lock.
    pub fn register_all<I>(&self, shapes: I) -> &Self
    where
        I: IntoIterator<Item = Shape>,
    {
        let mut added = Vec::new();
        {
            let mut types = self.inner.write();
            for shape in shapes {
                let shape = shape.pointee();
                if types.insert(shape.name(), shape).is_none() {
                    added.push(shape.name());
                }
            }
        }
        for type_name in added {
            debug!(type_name, "registered allowed type");
        }
        self
    }

    /// Whether the type of `sample` (normalized as on registration) is registered.
    pub fn is_registered<T: Shaped + ?Sized>(&self, _sample: &T) -> bool {
        self.is_type_registered::<T>()
    }

    pub fn is_type_registered<T: Shaped + ?Sized>(&self) -> bool {
        self.contains(T::shape().pointee().name())
    }

    /// Whether a fully-qualified type name is registered.
    pub fn contains(&self, type_name: &str) -> bool {
        self.inner.read().contains_key(type_name)
    }

    /// Look up the registered shape for a type name.
    pub fn shape(&self, type_name: &str) -> Option<Shape> {
        self.inner.read().get(type_name).copied()
    }

    /// Snapshot of the registered type names, sorted.
    pub fn type_names(&self) -> Vec<String> {
        let mut names: Vec<String> = self
            .inner
            .read()
            .keys()
            .map(|name| (*name).to_string())
            .collect();
        names.sort_unstable();
        names
    }

    pub fn len(&self) -> usize {
        self.inner.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.read().is_empty()
    }

    /// Export the current snapshot as a whitelist override.
    ///
    /// An empty registry yields an empty whitelist, which disables
    /// whitelisting rather than rejecting everything.
    pub fn as_option(&self) -> OptionOverride {
        OptionOverride::AllowedTypes(self.type_names())
    }
}
