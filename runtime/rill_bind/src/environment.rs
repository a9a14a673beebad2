//! Lexical environment the binder writes into.
//!
//! Uses a scope stack (not cloning) for efficient scope management. The
//! binder itself only needs one operation - define/overwrite a binding
//! in the current scope with a storage mode - but the surrounding
//! runtime reads and assigns through the same structure, so lookup and
//! assignment live here too.

// Rc is the intentional implementation detail of LocalScope<T>: an
// environment belongs to exactly one activation frame and never crosses
// threads.

use rustc_hash::FxHashMap;
use std::cell::RefCell;
use std::fmt;
use std::ops::Deref;
use std::rc::Rc;

use rill_ir::Name;
use rill_value::{CellValue, Value};

/// How a bound name stores its value.
///
/// The storage mode decides what the callee's writes mean to the
/// caller: an alias shares the caller's container, a copy is private,
/// and a plain value binding is read-only.
#[derive(Clone, Debug, PartialEq)]
pub enum Slot {
    /// Read-only binding (also used for snapshots).
    Value(Value),
    /// Shares the caller's container; writes are visible to the caller.
    Alias(CellValue),
    /// Private mutable copy; writes are invisible to the caller.
    Copied(CellValue),
}

impl Slot {
    /// Read the bound value, through the container if any.
    pub fn read(&self) -> Value {
        match self {
            Slot::Value(v) => v.clone(),
            Slot::Alias(cell) | Slot::Copied(cell) => cell.get(),
        }
    }

    /// Whether assignment through this slot is allowed.
    pub fn is_writable(&self) -> bool {
        matches!(self, Slot::Alias(_) | Slot::Copied(_))
    }
}

/// Error returned by `assign` when assignment fails.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AssignError {
    /// Binding exists but is read-only.
    ReadOnly,
    /// Name not bound in any scope.
    Undefined,
}

/// A single-threaded scope wrapper for reference-counted interior
/// mutability. All scope allocations go through `LocalScope::new()`.
#[repr(transparent)]
pub struct LocalScope<T>(Rc<RefCell<T>>);

impl<T> LocalScope<T> {
    /// Create a new `LocalScope` wrapping the given value.
    #[inline]
    pub fn new(value: T) -> Self {
        LocalScope(Rc::new(RefCell::new(value)))
    }
}

impl<T> Clone for LocalScope<T> {
    #[inline]
    fn clone(&self) -> Self {
        LocalScope(Rc::clone(&self.0))
    }
}

impl<T: fmt::Debug> fmt::Debug for LocalScope<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("LocalScope").field(&self.0).finish()
    }
}

impl<T: Default> Default for LocalScope<T> {
    fn default() -> Self {
        LocalScope::new(T::default())
    }
}

impl<T> Deref for LocalScope<T> {
    type Target = RefCell<T>;

    #[inline]
    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

/// A single scope containing bindings.
#[derive(Clone, Debug, Default)]
pub struct Scope {
    bindings: FxHashMap<Name, Slot>,
    /// Parent scope (for lexical scoping).
    parent: Option<LocalScope<Scope>>,
}

impl Scope {
    /// Create a new empty scope with no parent.
    pub fn new() -> Self {
        Scope::default()
    }

    /// Create a new scope with a parent.
    pub fn with_parent(parent: LocalScope<Scope>) -> Self {
        Scope {
            bindings: FxHashMap::default(),
            parent: Some(parent),
        }
    }

    /// Define or overwrite a binding in this scope.
    #[inline]
    pub fn bind(&mut self, name: Name, slot: Slot) {
        self.bindings.insert(name, slot);
    }

    /// Look up a binding's value by name.
    pub fn lookup(&self, name: Name) -> Option<Value> {
        if let Some(slot) = self.bindings.get(&name) {
            return Some(slot.read());
        }
        if let Some(parent) = &self.parent {
            return parent.borrow().lookup(name);
        }
        None
    }

    /// Look up a binding's slot by name.
    pub fn slot(&self, name: Name) -> Option<Slot> {
        if let Some(slot) = self.bindings.get(&name) {
            return Some(slot.clone());
        }
        if let Some(parent) = &self.parent {
            return parent.borrow().slot(name);
        }
        None
    }

    /// Assign through a binding.
    pub fn assign(&mut self, name: Name, value: Value) -> Result<(), AssignError> {
        if let Some(slot) = self.bindings.get(&name) {
            return match slot {
                Slot::Alias(cell) | Slot::Copied(cell) => {
                    cell.set(value);
                    Ok(())
                }
                Slot::Value(_) => Err(AssignError::ReadOnly),
            };
        }
        if let Some(parent) = &self.parent {
            return parent.borrow_mut().assign(name, value);
        }
        Err(AssignError::Undefined)
    }
}

/// Lexical environment using a scope stack.
///
/// Owned by one activation frame; created by the caller, written by the
/// binder, read by the callee's body. Never shared between concurrent
/// calls.
pub struct Environment {
    /// Stack of scopes, with current scope at the top.
    scopes: Vec<LocalScope<Scope>>,
    /// Global scope (always at the bottom).
    global: LocalScope<Scope>,
}

impl Environment {
    /// Create a new environment with a global scope.
    pub fn new() -> Self {
        let global = LocalScope::new(Scope::new());
        Environment {
            scopes: vec![global.clone()],
            global,
        }
    }

    /// Push a new scope onto the stack.
    pub fn push_scope(&mut self) {
        let parent = self.current_scope();
        self.scopes.push(LocalScope::new(Scope::with_parent(parent)));
    }

    /// Pop the current scope from the stack. The global scope stays.
    pub fn pop_scope(&mut self) {
        if self.scopes.len() > 1 {
            self.scopes.pop();
        }
    }

    #[inline]
    fn current_scope(&self) -> LocalScope<Scope> {
        self.scopes.last().unwrap_or(&self.global).clone()
    }

    /// Define or overwrite a binding in the current scope.
    ///
    /// This is the whole interface the binder's contract needs.
    #[inline]
    pub fn bind(&mut self, name: Name, slot: Slot) {
        self.scopes
            .last()
            .unwrap_or(&self.global)
            .borrow_mut()
            .bind(name, slot);
    }

    /// Look up a binding's value by name.
    pub fn lookup(&self, name: Name) -> Option<Value> {
        self.scopes
            .last()
            .unwrap_or(&self.global)
            .borrow()
            .lookup(name)
    }

    /// Look up a binding's slot by name.
    pub fn slot(&self, name: Name) -> Option<Slot> {
        self.scopes
            .last()
            .unwrap_or(&self.global)
            .borrow()
            .slot(name)
    }

    /// Assign through a binding.
    pub fn assign(&mut self, name: Name, value: Value) -> Result<(), AssignError> {
        self.scopes
            .last()
            .unwrap_or(&self.global)
            .borrow_mut()
            .assign(name, value)
    }

    /// Create a child environment for a callee's activation frame.
    ///
    /// Shares the global scope but has its own local scope stack.
    #[must_use]
    pub fn child(&self) -> Self {
        let global = self.global.clone();
        Environment {
            scopes: vec![global.clone()],
            global,
        }
    }
}

impl Default for Environment {
    fn default() -> Self {
        Self::new()
    }
}
