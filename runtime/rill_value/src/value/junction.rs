//! Junction values: superpositions of alternatives.

use crate::Value;

/// How a junction combines its alternatives.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum JunctionKind {
    /// True when all alternatives hold.
    All,
    /// True when any alternative holds.
    Any,
    /// True when exactly one alternative holds.
    One,
    /// True when no alternative holds.
    None,
}

/// A value representing several alternatives simultaneously.
///
/// Matching a junction against a parameter that does not accept
/// junctions defers the whole call back to the dispatch layer, which
/// re-runs the call once per alternative and recombines the results
/// according to [`JunctionKind`]. The binder only recognizes junctions;
/// autothreading policy lives with the dispatcher.
#[derive(Clone, Debug, PartialEq)]
pub struct JunctionValue {
    kind: JunctionKind,
    alternatives: Vec<Value>,
}

impl JunctionValue {
    /// Create a junction over the given alternatives.
    pub fn new(kind: JunctionKind, alternatives: Vec<Value>) -> Self {
        JunctionValue { kind, alternatives }
    }

    /// The combining mode.
    #[inline]
    pub fn kind(&self) -> JunctionKind {
        self.kind
    }

    /// The alternative values.
    #[inline]
    pub fn alternatives(&self) -> &[Value] {
        &self.alternatives
    }
}
