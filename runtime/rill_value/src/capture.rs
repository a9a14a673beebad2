//! The per-call argument bundle.

use rill_ir::Name;
use rustc_hash::FxHashMap;

use crate::Value;

/// Caller-supplied argument bundle: ordered positional values plus a
/// name-to-value mapping.
///
/// A capture is constructed by the caller per call and consumed
/// (read-only) by exactly one bind. Captures can nest: a positional
/// value may itself be a [`Value::Capture`], which the tuple-of-tuples
/// slurpy uses to preserve per-call boundaries through currying chains.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Capture {
    positional: Vec<Value>,
    named: FxHashMap<Name, Value>,
}

impl Capture {
    /// An empty capture (no arguments).
    pub fn empty() -> Self {
        Capture::default()
    }

    /// Capture with positional arguments only.
    pub fn of(positional: Vec<Value>) -> Self {
        Capture {
            positional,
            named: FxHashMap::default(),
        }
    }

    /// Capture with positional and named arguments.
    pub fn new(positional: Vec<Value>, named: FxHashMap<Name, Value>) -> Self {
        Capture { positional, named }
    }

    /// Add a named argument (builder style).
    #[must_use]
    pub fn with_named(mut self, name: Name, value: Value) -> Self {
        self.named.insert(name, value);
        self
    }

    /// The positional arguments, in call order.
    #[inline]
    pub fn positional(&self) -> &[Value] {
        &self.positional
    }

    /// The named arguments.
    #[inline]
    pub fn named(&self) -> &FxHashMap<Name, Value> {
        &self.named
    }

    /// Look up a named argument.
    pub fn lookup_named(&self, name: Name) -> Option<&Value> {
        self.named.get(&name)
    }

    /// Number of positional arguments.
    pub fn len(&self) -> usize {
        self.positional.len()
    }

    /// Whether the capture carries no arguments at all.
    pub fn is_empty(&self) -> bool {
        self.positional.is_empty() && self.named.is_empty()
    }
}
