//! Shared immutable heap payloads.

use std::fmt;
use std::ops::Deref;
use std::sync::Arc;

/// Shared immutable heap allocation.
///
/// All heap payloads of [`Value`](crate::Value) go through this wrapper
/// so cloning a value is always a reference-count bump. Construction is
/// crate-private; external code builds heap values through the `Value`
/// factory methods.
pub struct Heap<T>(Arc<T>);

impl<T> Heap<T> {
    /// Allocate a new shared payload.
    pub(crate) fn new(value: T) -> Self {
        Heap(Arc::new(value))
    }

    /// Whether two handles share the same allocation.
    #[inline]
    pub fn ptr_eq(a: &Self, b: &Self) -> bool {
        Arc::ptr_eq(&a.0, &b.0)
    }
}

impl<T> Clone for Heap<T> {
    #[inline]
    fn clone(&self) -> Self {
        Heap(Arc::clone(&self.0))
    }
}

impl<T> Deref for Heap<T> {
    type Target = T;

    #[inline]
    fn deref(&self) -> &T {
        &self.0
    }
}

impl<T: PartialEq> PartialEq for Heap<T> {
    fn eq(&self, other: &Self) -> bool {
        *self.0 == *other.0
    }
}

impl<T: fmt::Debug> fmt::Debug for Heap<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}
