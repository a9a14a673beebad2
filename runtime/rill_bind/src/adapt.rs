//! Capture adaptation helpers.
//!
//! Different call sites consume the positional part of a capture in
//! different shapes: slurpy binding wants a list, currying wants an
//! immutable tuple, lazy consumers want a pull-based iterator. These
//! are pure shape conversions - no type checking happens here.

use rill_value::Value;

/// Whether `list_of` flattens nested sequences one level.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Flatten {
    /// Keep values as they are.
    None,
    /// Splice one level of list/tuple/capture positionals in place.
    One,
}

/// Convert positional values to an immutable tuple ("parcel").
pub fn parcel_of(values: &[Value]) -> Value {
    Value::tuple(values.to_vec())
}

/// Lazy pull-based iterator over positional values.
///
/// Borrows the capture's positional slice and clones one value per
/// pull; nothing is copied up front.
pub struct ValueIter<'a> {
    items: std::slice::Iter<'a, Value>,
}

impl Iterator for ValueIter<'_> {
    type Item = Value;

    fn next(&mut self) -> Option<Value> {
        self.items.next().cloned()
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.items.size_hint()
    }
}

impl ExactSizeIterator for ValueIter<'_> {}

/// Convert positional values to a lazy pull-based iterator.
pub fn iter_of(values: &[Value]) -> ValueIter<'_> {
    ValueIter {
        items: values.iter(),
    }
}

/// Convert positional values to an ordered collection, optionally
/// splicing one level of nested sequences in place.
pub fn list_of(values: &[Value], flatten: Flatten) -> Vec<Value> {
    match flatten {
        Flatten::None => values.to_vec(),
        Flatten::One => {
            let mut out = Vec::with_capacity(values.len());
            for value in values {
                match value.deref_cell() {
                    Value::List(items) | Value::Tuple(items) => {
                        out.extend(items.iter().cloned());
                    }
                    Value::Capture(capture) => {
                        out.extend(capture.positional().iter().cloned());
                    }
                    other => out.push(other),
                }
            }
            out
        }
    }
}
