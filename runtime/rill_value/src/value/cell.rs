//! Mutable storage values: containers and object instances.

use parking_lot::RwLock;
use rill_ir::Name;
use rustc_hash::FxHashMap;
use std::fmt;
use std::sync::Arc;

use crate::types::TypeId;
use crate::Value;

/// Mutable container holding one value.
///
/// This is the caller-visible storage an `rw` parameter aliases: the
/// callee's lexical slot and the caller's argument share one cell, so
/// writes through either side are seen by both.
#[derive(Clone)]
pub struct CellValue(Arc<RwLock<Value>>);

impl CellValue {
    /// Create a container holding `value`.
    pub fn new(value: Value) -> Self {
        CellValue(Arc::new(RwLock::new(value)))
    }

    /// Read the contained value.
    #[inline]
    pub fn get(&self) -> Value {
        self.0.read().clone()
    }

    /// Replace the contained value.
    #[inline]
    pub fn set(&self, value: Value) {
        *self.0.write() = value;
    }

    /// Whether two handles share the same storage.
    #[inline]
    pub fn ptr_eq(a: &Self, b: &Self) -> bool {
        Arc::ptr_eq(&a.0, &b.0)
    }
}

impl PartialEq for CellValue {
    fn eq(&self, other: &Self) -> bool {
        CellValue::ptr_eq(self, other) || self.get() == other.get()
    }
}

impl fmt::Debug for CellValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("CellValue").field(&self.get()).finish()
    }
}

/// Object instance: a runtime type plus mutable attribute storage.
///
/// The target of attributive binding - a parameter can write its value
/// into an instance attribute instead of (or alongside) a lexical name.
#[derive(Clone)]
pub struct InstanceValue {
    type_id: TypeId,
    attrs: Arc<RwLock<FxHashMap<Name, Value>>>,
}

impl InstanceValue {
    /// Create an instance of the given type with no attributes set.
    pub fn new(type_id: TypeId) -> Self {
        InstanceValue {
            type_id,
            attrs: Arc::new(RwLock::new(FxHashMap::default())),
        }
    }

    /// The instance's runtime type.
    #[inline]
    pub fn type_id(&self) -> TypeId {
        self.type_id
    }

    /// Read an attribute.
    pub fn attr(&self, name: Name) -> Option<Value> {
        self.attrs.read().get(&name).cloned()
    }

    /// Write an attribute, overwriting any previous value.
    pub fn set_attr(&self, name: Name, value: Value) {
        self.attrs.write().insert(name, value);
    }

    /// Whether two handles refer to the same object.
    #[inline]
    pub fn ptr_eq(a: &Self, b: &Self) -> bool {
        Arc::ptr_eq(&a.attrs, &b.attrs)
    }
}

impl PartialEq for InstanceValue {
    fn eq(&self, other: &Self) -> bool {
        // Object identity, not structural equality.
        InstanceValue::ptr_eq(self, other)
    }
}

impl fmt::Debug for InstanceValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("InstanceValue")
            .field("type_id", &self.type_id)
            .finish_non_exhaustive()
    }
}
