//! The nominal type model and the smart-match seam.
//!
//! The binder never inspects type structure itself: it asks an opaque
//! [`TypeSystem`] whether a value satisfies a constraint, what a value's
//! runtime type is, and how to coerce. [`TypeRegistry`] is the concrete
//! nominal implementation (named types in a parent chain rooted at the
//! top type); an embedding host can substitute its own.
//!
//! The two identities the binder consults directly - the top type that
//! accepts anything and the junction type - are carried by an explicit
//! [`RuntimeConfig`] value supplied at construction, never by global
//! state.

use rill_ir::{Name, SharedInterner};
use rustc_hash::FxHashMap;
use std::fmt;

use crate::errors::{EvalError, EvalResult};
use crate::Value;

/// Interned type identity.
#[derive(Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash)]
#[repr(transparent)]
pub struct TypeId(u32);

impl TypeId {
    /// Create from a raw index.
    #[inline]
    pub const fn from_raw(raw: u32) -> Self {
        TypeId(raw)
    }

    /// The raw index.
    #[inline]
    pub const fn raw(self) -> u32 {
        self.0
    }

    #[inline]
    const fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Debug for TypeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "TypeId({})", self.0)
    }
}

/// Runtime-wide type identities the binder consults.
///
/// Supplied once at runtime start-up and passed to the binder at
/// construction; process-wide lifecycle is owned by the embedding
/// application.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct RuntimeConfig {
    /// The universal top type; a parameter with no nominal type accepts
    /// anything, junctions included.
    pub top_type: TypeId,
    /// The junction type; values of this type trigger autothreading
    /// when bound to parameters that do not accept junctions.
    pub junction_type: TypeId,
}

/// Host-registered coercion method.
pub type CoerceFn = fn(&Value) -> EvalResult;

/// Smart-match and type-identity capability.
///
/// The binder treats this as an opaque dependency: nominal checks go
/// through [`TypeSystem::accepts`], type captures through
/// [`TypeSystem::type_of`], and declared coercions through
/// [`TypeSystem::coerce`].
pub trait TypeSystem: Send + Sync {
    /// The runtime type of a value.
    fn type_of(&self, value: &Value) -> TypeId;

    /// Whether `value` satisfies the nominal `constraint`.
    fn accepts(&self, value: &Value, constraint: TypeId) -> bool;

    /// Whether `value`'s type answers the coercion method `method`.
    ///
    /// A `false` here is an ordinary bind failure, not a fault: no
    /// user code has run yet.
    fn can_coerce(&self, value: &Value, method: Name) -> bool;

    /// Invoke the coercion method `method` on `value`, producing a value
    /// of (at least) `target`. Errors from the method propagate as
    /// user-code faults. Callers gate on [`TypeSystem::can_coerce`]
    /// first; an unanswerable method here is still an error.
    fn coerce(&self, value: &Value, target: TypeId, method: Name) -> EvalResult;

    /// The declared name of a type, for diagnostics.
    fn type_name(&self, ty: TypeId) -> Name;
}

/// Identities of the built-in value shapes.
#[derive(Copy, Clone, Debug)]
pub struct BuiltinTypes {
    pub any: TypeId,
    pub junction: TypeId,
    pub int: TypeId,
    pub float: TypeId,
    pub bool: TypeId,
    pub str: TypeId,
    pub list: TypeId,
    pub tuple: TypeId,
    pub map: TypeId,
    pub capture: TypeId,
    pub nil: TypeId,
}

/// Concrete nominal type registry.
///
/// Types form a parent chain rooted at the top type (`Any`). `accepts`
/// walks the chain; coercion methods are registered per source type and
/// inherited down the chain.
pub struct TypeRegistry {
    names: Vec<Name>,
    parents: Vec<Option<TypeId>>,
    coercions: FxHashMap<(TypeId, Name), CoerceFn>,
    builtins: BuiltinTypes,
    interner: SharedInterner,
}

impl TypeRegistry {
    /// Create a registry with the built-in types installed.
    pub fn new(interner: SharedInterner) -> Self {
        let mut registry = TypeRegistry {
            names: Vec::new(),
            parents: Vec::new(),
            coercions: FxHashMap::default(),
            builtins: BuiltinTypes {
                any: TypeId::from_raw(0),
                junction: TypeId::from_raw(0),
                int: TypeId::from_raw(0),
                float: TypeId::from_raw(0),
                bool: TypeId::from_raw(0),
                str: TypeId::from_raw(0),
                list: TypeId::from_raw(0),
                tuple: TypeId::from_raw(0),
                map: TypeId::from_raw(0),
                capture: TypeId::from_raw(0),
                nil: TypeId::from_raw(0),
            },
            interner,
        };
        let any = registry.add(registry.interner.intern("Any"), None);
        registry.builtins = BuiltinTypes {
            any,
            junction: registry.add(registry.interner.intern("Junction"), Some(any)),
            int: registry.add(registry.interner.intern("Int"), Some(any)),
            float: registry.add(registry.interner.intern("Float"), Some(any)),
            bool: registry.add(registry.interner.intern("Bool"), Some(any)),
            str: registry.add(registry.interner.intern("Str"), Some(any)),
            list: registry.add(registry.interner.intern("List"), Some(any)),
            tuple: registry.add(registry.interner.intern("Tuple"), Some(any)),
            map: registry.add(registry.interner.intern("Map"), Some(any)),
            capture: registry.add(registry.interner.intern("Capture"), Some(any)),
            nil: registry.add(registry.interner.intern("Nil"), Some(any)),
        };
        registry
    }

    fn add(&mut self, name: Name, parent: Option<TypeId>) -> TypeId {
        let id = TypeId::from_raw(u32::try_from(self.names.len()).unwrap_or(u32::MAX));
        self.names.push(name);
        self.parents.push(parent);
        id
    }

    /// Register a user type under `parent`.
    pub fn register(&mut self, name: Name, parent: TypeId) -> TypeId {
        self.add(name, Some(parent))
    }

    /// Register a coercion method on `source`. Subtypes of `source`
    /// inherit it.
    pub fn register_coercion(&mut self, source: TypeId, method: Name, f: CoerceFn) {
        self.coercions.insert((source, method), f);
    }

    /// The built-in type identities.
    pub fn builtins(&self) -> &BuiltinTypes {
        &self.builtins
    }

    /// The interner type names live in.
    pub fn interner(&self) -> &SharedInterner {
        &self.interner
    }

    /// The runtime configuration this registry induces.
    pub fn config(&self) -> RuntimeConfig {
        RuntimeConfig {
            top_type: self.builtins.any,
            junction_type: self.builtins.junction,
        }
    }

    /// Resolve a coercion method along `ty`'s parent chain.
    fn resolve_coercion(&self, ty: TypeId, method: Name) -> Option<&CoerceFn> {
        let mut current = Some(ty);
        while let Some(t) = current {
            if let Some(f) = self.coercions.get(&(t, method)) {
                return Some(f);
            }
            current = self.parents.get(t.index()).copied().flatten();
        }
        None
    }

    /// Whether `ty` is `ancestor` or a descendant of it.
    pub fn is_subtype(&self, ty: TypeId, ancestor: TypeId) -> bool {
        let mut current = Some(ty);
        while let Some(t) = current {
            if t == ancestor {
                return true;
            }
            current = self.parents.get(t.index()).copied().flatten();
        }
        false
    }
}

impl TypeSystem for TypeRegistry {
    fn type_of(&self, value: &Value) -> TypeId {
        match value {
            Value::Int(_) => self.builtins.int,
            Value::Float(_) => self.builtins.float,
            Value::Bool(_) => self.builtins.bool,
            Value::Str(_) => self.builtins.str,
            Value::List(_) => self.builtins.list,
            Value::Tuple(_) => self.builtins.tuple,
            Value::Map(_) => self.builtins.map,
            Value::Capture(_) => self.builtins.capture,
            Value::Junction(_) => self.builtins.junction,
            Value::Nil => self.builtins.nil,
            Value::Cell(cell) => self.type_of(&cell.get()),
            Value::Instance(instance) => instance.type_id(),
            // A type object answers its own type (it is the undefined
            // value of that type).
            Value::Type(ty) => *ty,
        }
    }

    fn accepts(&self, value: &Value, constraint: TypeId) -> bool {
        constraint == self.builtins.any || self.is_subtype(self.type_of(value), constraint)
    }

    fn can_coerce(&self, value: &Value, method: Name) -> bool {
        self.resolve_coercion(self.type_of(value), method).is_some()
    }

    fn coerce(&self, value: &Value, _target: TypeId, method: Name) -> EvalResult {
        match self.resolve_coercion(self.type_of(value), method) {
            Some(f) => f(value),
            None => Err(EvalError::new(format!(
                "no coercion method '{}' on {}",
                self.interner.lookup(method),
                self.interner.lookup(self.type_name(self.type_of(value))),
            ))),
        }
    }

    fn type_name(&self, ty: TypeId) -> Name {
        self.names.get(ty.index()).copied().unwrap_or_default()
    }
}

#[cfg(test)]
#[expect(clippy::unwrap_used, reason = "Tests use unwrap for brevity")]
mod tests;
