//! Runtime values for the Rill binder and its collaborators.
//!
//! # Heap enforcement
//!
//! Heap payloads go through [`Heap<T>`], whose constructor is
//! crate-private: external code builds heap values through the factory
//! methods on [`Value`] (`Value::str`, `Value::list`, ...), so every
//! clone is a reference-count bump and never a deep copy.
//!
//! # Thread safety
//!
//! Immutable payloads use `Arc`; the mutable shapes ([`CellValue`],
//! [`InstanceValue`]) use `Arc<parking_lot::RwLock<..>>` so caller
//! containers can cross threads between calls.

mod cell;
mod heap;
mod junction;

use rill_ir::Name;
use rustc_hash::FxHashMap;

use crate::capture::Capture;
use crate::types::TypeId;

pub use cell::{CellValue, InstanceValue};
pub use heap::Heap;
pub use junction::{JunctionKind, JunctionValue};

/// Runtime value.
#[derive(Clone, Debug, PartialEq)]
pub enum Value {
    // Scalars (inline, no heap allocation)
    /// Integer value.
    Int(i64),
    /// Floating-point value.
    Float(f64),
    /// Boolean value.
    Bool(bool),
    /// Absent/undefined value.
    Nil,

    // Heap payloads
    /// String value.
    Str(Heap<String>),
    /// Ordered mutable-shape collection.
    List(Heap<Vec<Value>>),
    /// Immutable tuple ("parcel").
    Tuple(Heap<Vec<Value>>),
    /// Mapping from interned names to values.
    Map(Heap<FxHashMap<Name, Value>>),
    /// A nested argument bundle, preserving its own call boundary.
    Capture(Heap<Capture>),
    /// Superposition of alternatives.
    Junction(Heap<JunctionValue>),

    // Mutable storage
    /// Mutable container; the storage an `rw` parameter aliases.
    Cell(CellValue),
    /// Object instance with attribute storage.
    Instance(InstanceValue),

    /// First-class type object. Undefined in the definedness sense;
    /// bound for type captures and defaulted optional positionals.
    Type(TypeId),
}

// Factory methods (the only way to construct heap values)
impl Value {
    /// Create an integer value.
    #[inline]
    pub fn int(v: i64) -> Self {
        Value::Int(v)
    }

    /// Create a float value.
    #[inline]
    pub fn float(v: f64) -> Self {
        Value::Float(v)
    }

    /// Create a boolean value.
    #[inline]
    pub fn bool(v: bool) -> Self {
        Value::Bool(v)
    }

    /// Create a string value.
    pub fn str(v: impl Into<String>) -> Self {
        Value::Str(Heap::new(v.into()))
    }

    /// Create a list value.
    pub fn list(items: Vec<Value>) -> Self {
        Value::List(Heap::new(items))
    }

    /// Create a tuple (parcel) value.
    pub fn tuple(items: Vec<Value>) -> Self {
        Value::Tuple(Heap::new(items))
    }

    /// Create a map value.
    pub fn map(entries: FxHashMap<Name, Value>) -> Self {
        Value::Map(Heap::new(entries))
    }

    /// Wrap a capture as a value, preserving its call boundary.
    pub fn capture(capture: Capture) -> Self {
        Value::Capture(Heap::new(capture))
    }

    /// Create a junction value.
    pub fn junction(kind: JunctionKind, alternatives: Vec<Value>) -> Self {
        Value::Junction(Heap::new(JunctionValue::new(kind, alternatives)))
    }

    /// Create a mutable container holding `v`.
    pub fn cell(v: Value) -> Self {
        Value::Cell(CellValue::new(v))
    }
}

impl Value {
    /// Whether this value is defined.
    ///
    /// `Nil` and type objects are undefined; everything else is defined.
    /// A container answers for its contents.
    pub fn is_defined(&self) -> bool {
        match self {
            Value::Nil | Value::Type(_) => false,
            Value::Cell(cell) => cell.get().is_defined(),
            _ => true,
        }
    }

    /// Read through a container, if this value is one.
    ///
    /// Non-container values are returned as-is. One level is enough:
    /// containers hold plain values, not other containers.
    pub fn deref_cell(&self) -> Value {
        match self {
            Value::Cell(cell) => cell.get(),
            other => other.clone(),
        }
    }

    /// The container behind this value, if any.
    pub fn as_cell(&self) -> Option<&CellValue> {
        match self {
            Value::Cell(cell) => Some(cell),
            _ => None,
        }
    }

    /// Structural shape name, for diagnostics.
    pub fn shape_name(&self) -> &'static str {
        match self {
            Value::Int(_) => "int",
            Value::Float(_) => "float",
            Value::Bool(_) => "bool",
            Value::Nil => "nil",
            Value::Str(_) => "str",
            Value::List(_) => "list",
            Value::Tuple(_) => "tuple",
            Value::Map(_) => "map",
            Value::Capture(_) => "capture",
            Value::Junction(_) => "junction",
            Value::Cell(_) => "cell",
            Value::Instance(_) => "instance",
            Value::Type(_) => "type",
        }
    }
}
